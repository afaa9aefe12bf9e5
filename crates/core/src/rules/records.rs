//! Checks for the per-person record sections.

use std::sync::LazyLock;

use regex::Regex;
use rrf_reference::Table;
use rrf_types::{is_blank, Field};

use super::codes::validate_reference_code;
use super::names::validate_name;
use super::RuleContext;
use crate::constants::ADDRESS_TYPE_TELEPHONE;
use crate::identity::Identity;
use crate::{IssueKind, ValidationResult};

/// Letters and decimal digits of any script, and spaces.
static DOCUMENT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{Nd} ]+$").expect("document number pattern compiles")
});

/// `DocumentNumber` must hold letters, digits and spaces only.
pub fn validate_document(identity: &Identity, number: &Field<String>, result: &mut ValidationResult) {
    let Some(number) = number.as_present() else {
        return;
    };

    let number = number.trim();
    if number.is_empty() {
        result.add_error(
            IssueKind::MissingField,
            format!("Empty (or missing) 'DocumentNumber' for individual {identity}"),
        );
    } else if !DOCUMENT_NUMBER.is_match(number) {
        result.add_error(
            IssueKind::InvalidValue,
            format!("Non-alphanumeric 'DocumentNumber' for individual {identity}: {number}"),
        );
    }
}

/// Fields of a `DataAddress` record that take part in validation.
#[derive(Debug, Clone, Default)]
pub struct AddressFields {
    pub country: Field<String>,
    pub address_type: Field<String>,
    /// `LocationLevel6`, which holds the number of a telephone address.
    pub phone: Field<String>,
}

pub fn validate_address(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    address: &AddressFields,
    result: &mut ValidationResult,
) {
    validate_reference_code(ctx, identity, "AddressCountry", &address.country, Table::Country, result);
    validate_reference_code(ctx, identity, "AddressType", &address.address_type, Table::AddressType, result);

    let is_telephone = address
        .address_type
        .as_present()
        .is_some_and(|kind| kind == ADDRESS_TYPE_TELEPHONE);
    let has_phone = address.phone.as_present().is_some_and(|phone| !is_blank(phone));
    if is_telephone && !has_phone {
        result.add_error(
            IssueKind::MissingField,
            format!("Empty (or missing) phone number in 'LocationLevel6' for individual {identity}"),
        );
    }
}

/// Alias names may be left blank but must still be clean names.
pub fn validate_alias(
    identity: &Identity,
    first_name: &Field<String>,
    last_name: &Field<String>,
    result: &mut ValidationResult,
) {
    validate_name(identity, "IndividualAliasFirstName", first_name, true, result);
    validate_name(identity, "IndividualAliasLastName", last_name, true, result);
}

pub fn validate_employment(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    employment_type: &Field<String>,
    occupation: &Field<String>,
    result: &mut ValidationResult,
) {
    validate_reference_code(ctx, identity, "EmploymentTypeCode", employment_type, Table::EmploymentType, result);
    validate_reference_code(ctx, identity, "OccupationCode", occupation, Table::Occupation, result);
}

pub fn validate_education(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    level: &Field<String>,
    result: &mut ValidationResult,
) {
    validate_reference_code(ctx, identity, "EducationLevelCode", level, Table::EducationLevel, result);
}

/// Fields of a `DataLanguage` record.
#[derive(Debug, Clone, Default)]
pub struct LanguageFields {
    pub language: Field<String>,
    pub read: Field<String>,
    pub speak: Field<String>,
    pub understand: Field<String>,
    pub write: Field<String>,
}

pub fn validate_language(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    language: &LanguageFields,
    result: &mut ValidationResult,
) {
    validate_reference_code(ctx, identity, "LanguageCode", &language.language, Table::Language, result);

    let levels = [
        ("LanguageReadCode", &language.read),
        ("LanguageSpeakCode", &language.speak),
        ("LanguageUnderstandCode", &language.understand),
        ("LanguageWriteCode", &language.write),
    ];
    for (field, level) in levels {
        validate_reference_code(ctx, identity, field, level, Table::LanguageLevel, result);
    }
}

pub fn validate_resettlement(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    criteria: &Field<String>,
    second_criteria: &Field<String>,
    priority: &Field<String>,
    result: &mut ValidationResult,
) {
    validate_reference_code(ctx, identity, "ResettlementCriteriaCode", criteria, Table::ResettlementCriteria, result);
    validate_reference_code(
        ctx,
        identity,
        "ResettlementCriteriaCode2",
        second_criteria,
        Table::ResettlementCriteria,
        result,
    );
    validate_reference_code(ctx, identity, "ResettlementPriorityCode", priority, Table::ResettlementPriority, result);
}

pub fn validate_vulnerability(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    code: &Field<String>,
    result: &mut ValidationResult,
) {
    validate_reference_code(ctx, identity, "VulnerabilityCode", code, Table::Vulnerability, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::context;
    use crate::ValidatorConfig;

    fn text(value: &str) -> Field<String> {
        Field::mandatory_text(Some(value))
    }

    fn person() -> Identity {
        Identity::of_id(Some("3"))
    }

    #[test]
    fn document_numbers_are_trimmed_and_alphanumeric() {
        let mut result = ValidationResult::new();
        validate_document(&person(), &text("  AB 12345 "), &mut result);
        assert!(result.is_success());

        validate_document(&person(), &text("AB-12345"), &mut result);
        validate_document(&person(), &text("   "), &mut result);
        assert_eq!(
            result.error_messages(),
            vec![
                "Non-alphanumeric 'DocumentNumber' for individual 3: AB-12345",
                "Empty (or missing) 'DocumentNumber' for individual 3",
            ]
        );
    }

    #[test]
    fn test_document_number_accepts_letters_and_decimal_digits_only() {
        let mut result = ValidationResult::new();
        validate_document(&person(), &text("\u{0410}\u{0411} \u{0661}\u{0662}3"), &mut result);
        assert!(result.is_success());

        validate_document(&person(), &text("AB\u{2167}"), &mut result);
        assert_eq!(
            result.error_messages(),
            vec!["Non-alphanumeric 'DocumentNumber' for individual 3: AB\u{2167}"]
        );
    }

    #[test]
    fn telephone_address_needs_a_number() {
        let config = ValidatorConfig::default();
        let ctx = context(&config);
        let mut result = ValidationResult::new();

        let address = AddressFields {
            country: text("JOR"),
            address_type: text("TEL"),
            phone: Field::optional_text(Some(" ")),
        };
        validate_address(&ctx, &person(), &address, &mut result);
        assert_eq!(
            result.error_messages(),
            vec!["Empty (or missing) phone number in 'LocationLevel6' for individual 3"]
        );

        let mut result = ValidationResult::new();
        let address = AddressFields {
            phone: text("+962 6 000 0000"),
            ..address
        };
        validate_address(&ctx, &person(), &address, &mut result);
        assert!(result.is_success());
    }

    #[test]
    fn telephone_match_is_exact() {
        let config = ValidatorConfig::default();
        let ctx = context(&config);
        let mut result = ValidationResult::new();

        let address = AddressFields {
            country: text("JOR"),
            address_type: text("tel"),
            phone: Field::Absent,
        };
        validate_address(&ctx, &person(), &address, &mut result);
        assert!(result.is_success());
    }

    #[test]
    fn alias_names_may_be_blank() {
        let mut result = ValidationResult::new();
        validate_alias(&person(), &text(""), &text("Sm1th"), &mut result);
        assert_eq!(
            result.error_messages(),
            vec!["Name 'IndividualAliasLastName' value for individual 3 contains digit(s): Sm1th"]
        );
    }

    #[test]
    fn language_levels_use_the_level_table() {
        let config = ValidatorConfig::default().without_suggestions();
        let ctx = context(&config);
        let mut result = ValidationResult::new();

        let language = LanguageFields {
            language: text("ARA"),
            read: text("FL"),
            speak: text("FL"),
            understand: text("ARA"),
            write: text(""),
        };
        validate_language(&ctx, &person(), &language, &mut result);
        assert_eq!(
            result.error_messages(),
            vec![
                "Invalid value 'LanguageUnderstandCode' value for individual 3: ARA",
                "Empty (or missing) 'LanguageWriteCode' value for individual 3",
            ]
        );
    }

    #[test]
    fn resettlement_codes_are_checked_in_order() {
        let config = ValidatorConfig::default().without_suggestions();
        let ctx = context(&config);
        let mut result = ValidationResult::new();

        validate_resettlement(
            &ctx,
            &person(),
            &text("LPN"),
            &Field::optional_text(None),
            &text("SOON"),
            &mut result,
        );
        assert_eq!(
            result.error_messages(),
            vec!["Invalid value 'ResettlementPriorityCode' value for individual 3: SOON"]
        );
    }

    #[test]
    fn employment_and_education_codes() {
        let config = ValidatorConfig::default().without_suggestions();
        let ctx = context(&config);
        let mut result = ValidationResult::new();

        validate_education(&ctx, &person(), &text("99"), &mut result);
        validate_vulnerability(&ctx, &person(), &text("SM"), &mut result);
        assert!(result.is_success());

        validate_employment(&ctx, &person(), &text("NOPE"), &Field::Absent, &mut result);
        assert_eq!(
            result.error_messages(),
            vec!["Invalid value 'EmploymentTypeCode' value for individual 3: NOPE"]
        );
    }
}
