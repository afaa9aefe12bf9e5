//! Version 4 rule-set: one or more cases per file, people keyed by `IndividualGUID`.
//!
//! Compared with version 3, relationships to the principal representative move from the
//! person record into `DataIndividualProcessGroup`, photographs get their own section and
//! most sections carry a GUID of their own that must be unique within the case.

use std::sync::Arc;

use rrf_model::v4::{Case, DataResettlement, UnhcrRrf};
use rrf_reference::ReferenceRegistry;
use rrf_types::{Field, ParsedDate};

use super::{is_case_file, mentions_individual_guid, run, RuleSet};
use crate::constants::{RELATIONSHIP_CODE_PRIMARY_APPLICANT, RULE_SET_V4};
use crate::identity::{validate_identity_set, Identity};
use crate::mapper::{map_records_to_identities, SectionRules};
use crate::rules::applicant::{
    validate_coa_address, validate_primary_applicant_dates, validate_primary_applicants,
};
use crate::rules::duplicates::{validate_no_duplicates, validate_no_duplicates_per_individual};
use crate::rules::group::{
    validate_batch_type, validate_cross_references, validate_individual_process_group,
    validate_process_group, ProcessGroup,
};
use crate::rules::person::{validate_person, PersonFields};
use crate::rules::photo::validate_photo;
use crate::rules::records::{
    validate_address, validate_alias, validate_education, validate_employment,
    validate_language, validate_resettlement, validate_vulnerability, AddressFields,
    LanguageFields,
};
use crate::rules::RuleContext;
use crate::{CaseResult, FatalCaseError, IssueKind, ValidationResult, ValidatorConfig};

const INDIVIDUALS: SectionRules = SectionRules::new("DataIndividual", true, true);
const PHOTOGRAPHS: SectionRules = SectionRules::new("DataPhotograph", false, false);
const INDIVIDUAL_PROCESS_GROUPS: SectionRules =
    SectionRules::new("DataIndividualProcessGroup", true, true);
const ALIASES: SectionRules = SectionRules::new("DataAlias", false, false);
const EMPLOYMENTS: SectionRules = SectionRules::new("DataEmployment", false, false);
const ADDRESSES: SectionRules = SectionRules::new("DataAddress", false, false);
const RELATIVES: SectionRules = SectionRules::new("DataIndividualRelatives", false, false);
const EDUCATIONS: SectionRules = SectionRules::new("DataEducation", false, false);
const LANGUAGES: SectionRules = SectionRules::new("DataLanguage", false, false);
const RESETTLEMENTS: SectionRules = SectionRules::new("DataResettlement", false, true);
const VULNERABILITIES: SectionRules = SectionRules::new("DataVulnerability", false, false);

fn text(value: &Option<String>) -> Field<String> {
    Field::mandatory_text(value.as_deref())
}

fn optional(value: &Option<String>) -> Field<String> {
    Field::optional_text(value.as_deref())
}

fn by_guid(value: &Option<String>) -> Identity {
    Identity::of_guid(value.as_deref())
}

/// Validator for version 4 case files.
#[derive(Debug, Clone)]
pub struct V4RuleSet {
    registry: Arc<ReferenceRegistry>,
    config: ValidatorConfig,
}

impl V4RuleSet {
    pub fn new(registry: Arc<ReferenceRegistry>, config: ValidatorConfig) -> Self {
        Self { registry, config }
    }

    fn validate_document(&self, document: UnhcrRrf, result: &mut ValidationResult) -> CaseResult<()> {
        let ctx = RuleContext::new(&self.registry, &self.config);

        let indicator = document
            .batch_type
            .as_ref()
            .and_then(|batch| batch.group_individual_indicator.as_deref());
        validate_batch_type(indicator, document.cases.len(), result)?;

        validate_no_duplicates(
            "CASE.DataProcessGroup.ProcessingGroupNumber",
            document
                .cases
                .iter()
                .filter_map(|case| case.process_group.as_ref())
                .map(|group| group.processing_group_number.as_deref()),
            result,
        );

        for (index, case) in document.cases.iter().enumerate() {
            tracing::debug!("validating v4 case {} of {}", index + 1, document.cases.len());
            validate_case(&ctx, case, result)?;
        }
        Ok(())
    }
}

impl RuleSet for V4RuleSet {
    fn id(&self) -> &str {
        RULE_SET_V4
    }

    fn is_applicable(&self, bytes: &[u8]) -> bool {
        is_case_file(bytes) && mentions_individual_guid(bytes)
    }

    fn validate(&self, bytes: &[u8]) -> ValidationResult {
        run(self, bytes, |document: UnhcrRrf, result| {
            self.validate_document(document, result)
        })
    }
}

fn validate_case(ctx: &RuleContext<'_>, case: &Case, result: &mut ValidationResult) -> CaseResult<()> {
    let people: Vec<Identity> = case
        .individuals
        .iter()
        .map(|individual| by_guid(&individual.individual_guid))
        .collect();
    validate_identity_set(INDIVIDUALS.name, &people, result)?;

    let group = case
        .process_group
        .as_ref()
        .ok_or(FatalCaseError::MissingProcessGroup)?;
    validate_process_group(
        &ProcessGroup {
            number: group.processing_group_number.as_deref(),
            guid: Some(group.processing_group_guid.as_deref()),
            size: group.processing_group_size,
        },
        people.len(),
        result,
    )?;
    let case_group_guid = group.processing_group_guid.as_deref().unwrap_or_default();

    let individuals = map_records_to_identities(
        &INDIVIDUALS,
        &people,
        &case.individuals,
        |individual| by_guid(&individual.individual_guid),
        result,
    )?;
    for (identity, individual) in individuals.iter() {
        let person = PersonFields {
            family_name: text(&individual.family_name),
            second_family_name: optional(&individual.second_family_name),
            given_name: optional(&individual.given_name),
            middle_name: optional(&individual.middle_name),
            maiden_name: optional(&individual.maiden_name),
            registration_date: Field::mandatory_date(individual.registration_date),
            date_of_birth: Field::optional_date(individual.date_of_birth),
            birth_country: text(&individual.birth_country_code),
            origin_country: text(&individual.origin_country_code),
            asylum_country: text(&individual.asylum_country_code),
            arrival_date: Field::optional_date(individual.arrival_date),
            sex: text(&individual.sex_code),
            nationality: text(&individual.nationality_code),
            marital_status: text(&individual.marriage_status_code),
            religion: text(&individual.religion_code),
            ethnicity: text(&individual.ethnicity_code),
            education_level: text(&individual.education_level_code),
            mother_name: optional(&individual.mother_name),
            father_name: optional(&individual.father_name),
            ..PersonFields::default()
        };
        validate_person(ctx, identity, &person, result);
    }
    validate_no_duplicates(
        "DataIndividual.IndividualID",
        individuals.records().map(|individual| individual.individual_id.as_deref()),
        result,
    );
    validate_no_duplicates(
        "DataIndividual.IndividualGUID",
        individuals.records().map(|individual| individual.individual_guid.as_deref()),
        result,
    );

    let photographs = map_records_to_identities(
        &PHOTOGRAPHS,
        &people,
        &case.photographs,
        |photograph| by_guid(&photograph.individual_guid),
        result,
    )?;
    for (identity, photograph) in photographs.iter() {
        match photograph.photo.as_deref() {
            Some(photo) => validate_photo(identity, photo, result),
            None => result.add_error(
                IssueKind::MissingField,
                format!("Empty (or missing) 'DataPhotograph.Photo' for individual {identity}"),
            ),
        }
    }
    validate_no_duplicates(
        "DataPhotograph.PhotoGUID",
        photographs.records().map(|photograph| photograph.photo_guid.as_deref()),
        result,
    );

    // Process group membership decides who the primary applicant is.
    let memberships = map_records_to_identities(
        &INDIVIDUAL_PROCESS_GROUPS,
        &people,
        &case.individual_process_groups,
        |membership| by_guid(&membership.individual_guid),
        result,
    )?;
    for (identity, membership) in memberships.iter() {
        validate_individual_process_group(
            ctx,
            identity,
            case_group_guid,
            membership.processing_group_guid.as_deref(),
            membership.relationship_to_principal_representative.as_deref(),
            result,
        );
    }
    validate_no_duplicates(
        "DataIndividualProcessGroup.IndividualProcessingGroupGUID",
        memberships
            .records()
            .map(|membership| membership.individual_processing_group_guid.as_deref()),
        result,
    );

    // Every membership record counts here, including those of people with several.
    let mut applicants = Vec::new();
    for (identity, individual) in individuals.iter() {
        let is_applicant = case.individual_process_groups.iter().any(|membership| {
            by_guid(&membership.individual_guid) == *identity
                && membership.relationship_to_principal_representative.as_deref()
                    == Some(RELATIONSHIP_CODE_PRIMARY_APPLICANT)
        });
        if is_applicant {
            validate_primary_applicant_dates(
                identity,
                ParsedDate(individual.registration_date),
                ParsedDate(individual.arrival_date),
                result,
            );
            applicants.push(identity.clone());
        }
    }
    let applicant = validate_primary_applicants(&applicants, result);

    let aliases = map_records_to_identities(
        &ALIASES,
        &people,
        &case.aliases,
        |alias| by_guid(&alias.individual_guid),
        result,
    )?;
    for (identity, alias) in aliases.iter() {
        validate_alias(
            identity,
            &optional(&alias.alias_first_name),
            &text(&alias.alias_last_name),
            result,
        );
    }
    validate_no_duplicates(
        "DataAlias.AliasGUID",
        aliases.records().map(|alias| alias.alias_guid.as_deref()),
        result,
    );

    let employments = map_records_to_identities(
        &EMPLOYMENTS,
        &people,
        &case.employments,
        |employment| by_guid(&employment.individual_guid),
        result,
    )?;
    for (identity, employment) in employments.iter() {
        validate_employment(
            ctx,
            identity,
            &text(&employment.employment_type_code),
            &text(&employment.occupation_code),
            result,
        );
    }
    validate_no_duplicates(
        "DataEmployment.EmploymentGUID",
        employments.records().map(|employment| employment.employment_guid.as_deref()),
        result,
    );

    let addresses = map_records_to_identities(
        &ADDRESSES,
        &people,
        &case.addresses,
        |address| by_guid(&address.individual_guid),
        result,
    )?;
    for (identity, address) in addresses.iter() {
        let fields = AddressFields {
            country: text(&address.address_country),
            address_type: text(&address.address_type),
            phone: optional(&address.location_level6),
        };
        validate_address(ctx, identity, &fields, result);
    }
    validate_no_duplicates(
        "DataAddress.AddressGUID",
        addresses.records().map(|address| address.address_guid.as_deref()),
        result,
    );
    if let Some(applicant) = &applicant {
        validate_coa_address(
            applicant,
            addresses
                .iter()
                .map(|(identity, address)| (identity, address.address_type.as_deref())),
            result,
        );
    }

    let relatives = map_records_to_identities(
        &RELATIVES,
        &people,
        &case.relatives,
        |relative| by_guid(&relative.individual_guid),
        result,
    )?;
    for (identity, relative) in relatives.iter() {
        let person = PersonFields {
            family_name: text(&relative.family_name),
            second_family_name: optional(&relative.second_family_name),
            given_name: optional(&relative.given_name),
            middle_name: optional(&relative.middle_name),
            maiden_name: optional(&relative.maiden_name),
            sex: text(&relative.sex_code),
            nationality: text(&relative.nationality_code),
            residence_country: text(&relative.residence_country_code),
            marital_status: text(&relative.marriage_status_code),
            relationship: text(&relative.relationship_code),
            deceased_date: Field::optional_date(relative.deceased_date),
            ..PersonFields::default()
        };
        validate_person(ctx, identity, &person, result);
    }
    validate_no_duplicates(
        "DataIndividualRelatives.IndividualRelativesGUID",
        relatives.records().map(|relative| relative.individual_relatives_guid.as_deref()),
        result,
    );

    let educations = map_records_to_identities(
        &EDUCATIONS,
        &people,
        &case.educations,
        |education| by_guid(&education.individual_guid),
        result,
    )?;
    for (identity, education) in educations.iter() {
        validate_education(ctx, identity, &text(&education.education_level_code), result);
    }
    validate_no_duplicates(
        "DataEducation.EducationGUID",
        educations.records().map(|education| education.education_guid.as_deref()),
        result,
    );

    let languages = map_records_to_identities(
        &LANGUAGES,
        &people,
        &case.languages,
        |language| by_guid(&language.individual_guid),
        result,
    )?;
    for (identity, language) in languages.iter() {
        let fields = LanguageFields {
            language: text(&language.language_code),
            read: text(&language.read_code),
            speak: text(&language.speak_code),
            understand: text(&language.understand_code),
            write: text(&language.write_code),
        };
        validate_language(ctx, identity, &fields, result);
    }
    validate_no_duplicates(
        "DataLanguage.LanguageGUID",
        languages.records().map(|language| language.language_guid.as_deref()),
        result,
    );

    let resettlement_records: &[DataResettlement] = match &case.resettlement {
        Some(resettlement) => std::slice::from_ref(resettlement),
        None => &[],
    };
    let resettlements = map_records_to_identities(
        &RESETTLEMENTS,
        &people,
        resettlement_records,
        |resettlement| by_guid(&resettlement.individual_guid),
        result,
    )?;
    for (identity, resettlement) in resettlements.iter() {
        validate_resettlement(
            ctx,
            identity,
            &text(&resettlement.criteria_code),
            &optional(&resettlement.criteria_code2),
            &text(&resettlement.priority_code),
            result,
        );
    }
    validate_no_duplicates(
        "DataResettlement.IndividualGUID",
        resettlements
            .records()
            .map(|resettlement| resettlement.individual_guid.as_deref()),
        result,
    );

    let vulnerabilities = map_records_to_identities(
        &VULNERABILITIES,
        &people,
        &case.vulnerabilities,
        |vulnerability| by_guid(&vulnerability.individual_guid),
        result,
    )?;
    for (identity, vulnerability) in vulnerabilities.iter() {
        validate_vulnerability(ctx, identity, &text(&vulnerability.vulnerability_code), result);
    }
    validate_no_duplicates(
        "DataVulnerability.VulnerabilityGUID",
        vulnerabilities
            .records()
            .map(|vulnerability| vulnerability.vulnerability_guid.as_deref()),
        result,
    );
    validate_no_duplicates_per_individual(
        "DataVulnerability.VulnerabilityCode",
        vulnerabilities
            .iter()
            .map(|(identity, vulnerability)| (identity, vulnerability.vulnerability_code.as_deref())),
        result,
    );

    validate_cross_references(
        case.cross_references.iter().map(|reference| {
            (
                reference.processing_group_number_from.as_deref(),
                reference.processing_group_number_to.as_deref(),
            )
        }),
        result,
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = include_str!("../../fixtures/v4_valid.xml");
    const APPLICANT: &str = "a3f4e1c2-0b5d-4d8e-9f61-2c7a8b9d0e11";
    const SPOUSE: &str = "b7e2d3f4-1c6e-4a9f-8b72-3d8b9c0e1f22";

    fn rule_set() -> V4RuleSet {
        let registry = ReferenceRegistry::builtin().expect("embedded tables load");
        V4RuleSet::new(Arc::new(registry), ValidatorConfig::default().without_suggestions())
    }

    /// Remove the `<tag>` element that encloses the first occurrence of `marker`.
    fn remove_element(xml: &str, tag: &str, marker: &str) -> String {
        let at = xml.find(marker).expect("marker in fixture");
        let start = xml[..at].rfind(&format!("<{tag}>")).expect("opening tag");
        let close = format!("</{tag}>");
        let end = at + xml[at..].find(&close).expect("closing tag") + close.len();
        format!("{}{}", &xml[..start], &xml[end..])
    }

    fn single_case(xml: &str) -> &str {
        let start = xml.find("<CASE>").expect("fixture has a case");
        let close = "</CASE>";
        let end = xml.find(close).expect("fixture closes the case") + close.len();
        &xml[start..end]
    }

    #[test]
    fn test_valid_case_file_passes() {
        let result = rule_set().validate(VALID.as_bytes());

        assert!(result.is_success(), "unexpected errors: {:?}", result.error_messages());
        assert_eq!(result.validator_id(), Some("v4"));
    }

    #[test]
    fn test_two_cases_need_a_group_submission_with_distinct_numbers() {
        let case = single_case(VALID);
        let xml = VALID.replacen(case, &format!("{case}\n  {case}"), 1);

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![
                "For multi-case file, 'GroupIndividualIndicator' must be Group Submission",
                "Duplicated 'CASE.DataProcessGroup.ProcessingGroupNumber'(s): SYR-17C00871",
            ]
        );
    }

    #[test]
    fn test_blank_process_group_guid_is_fatal() {
        let guid = "<ProcessingGroupGUID>5d1c2a60-8a4e-4f0e-9d7b-0a4c1b7e2f10</ProcessingGroupGUID>";
        let xml = VALID
            .replacen(guid, "<ProcessingGroupGUID></ProcessingGroupGUID>", 1)
            .replace("<SexCode>F</SexCode>", "<SexCode>Q</SexCode>");

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec!["Empty (or missing) 'ProcessingGroupGUID' in DataProcessGroup section"]
        );
        assert_eq!(result.errors()[0].kind, IssueKind::Fatal);
    }

    #[test]
    fn test_every_individual_needs_a_process_group_membership() {
        let xml = remove_element(VALID, "DataIndividualProcessGroup", "e3c4d5f6-4f91-4d2c-9ea5-6a1e2f3b4c55");

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![format!("None of DataIndividualProcessGroup objects maps to individual(s) {SPOUSE}")]
        );
    }

    #[test]
    fn test_membership_in_another_group_is_reported() {
        let xml = VALID.replacen(
            "<ProcessingGroupGUID>5d1c2a60-8a4e-4f0e-9d7b-0a4c1b7e2f10</ProcessingGroupGUID>\n      <RelationshipToPrincipalRepresentative>WIF",
            "<ProcessingGroupGUID>other-group</ProcessingGroupGUID>\n      <RelationshipToPrincipalRepresentative>WIF",
            1,
        );

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![format!(
                "'ProcessingGroupGUID' in DataIndividualProcessGroup section for individual {SPOUSE} is different from case ProcessingGroupGUID 5d1c2a60-8a4e-4f0e-9d7b-0a4c1b7e2f10: other-group"
            )]
        );
    }

    #[test]
    fn test_photograph_without_photo_is_reported() {
        let xml = remove_element(VALID, "Photo", "iVBORw0KGgo");

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![format!("Empty (or missing) 'DataPhotograph.Photo' for individual {APPLICANT}")]
        );
    }

    #[test]
    fn test_primary_applicant_needs_a_coa_address() {
        let xml = VALID.replace("<AddressType>coa</AddressType>", "<AddressType>RES</AddressType>");

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![format!("No 'COA' addresses for Primary Applicant {APPLICANT}")]
        );
    }

    #[test]
    fn test_records_for_unknown_people_are_reported() {
        let xml = VALID.replacen(
            &format!("<IndividualGUID>{APPLICANT}</IndividualGUID>\n      <AliasGUID>"),
            "<IndividualGUID>nobody</IndividualGUID>\n      <AliasGUID>",
            1,
        );

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec!["Object 'DataAlias' relates to non-existing individual nobody"]
        );
        assert_eq!(result.errors()[0].kind, IssueKind::UnknownReference);
    }

    #[test]
    fn test_repeated_vulnerability_code_for_one_individual() {
        let extra = format!(
            "<DataVulnerability>\n      <IndividualGUID>{SPOUSE}</IndividualGUID>\n      \
             <VulnerabilityGUID>7b2f3a4c-3c8a-4a1f-8b3e-5d0b1c2edfee</VulnerabilityGUID>\n      \
             <VulnerabilityCode>SM</VulnerabilityCode>\n    </DataVulnerability>\n  </CASE>"
        );
        let xml = VALID.replacen("</CASE>", &extra, 1);

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![format!("Duplicated 'DataVulnerability.VulnerabilityCode'(s) for individual {SPOUSE}: SM")]
        );
    }

    #[test]
    fn test_duplicate_individual_guids_are_accumulated() {
        let xml = VALID.replacen(
            &format!("<IndividualGUID>{SPOUSE}</IndividualGUID>\n      <IndividualID>"),
            &format!("<IndividualGUID>{APPLICANT}</IndividualGUID>\n      <IndividualID>"),
            1,
        );

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![
                format!("Duplicated 'IndividualGUID'(s): {APPLICANT}"),
                format!("More than one DataIndividual objects maps to the same individual {APPLICANT}"),
                format!("Object 'DataIndividualProcessGroup' relates to non-existing individual {SPOUSE}"),
                "Missing Primary Applicant".to_string(),
                format!("Object 'DataVulnerability' relates to non-existing individual {SPOUSE}"),
            ]
        );
    }

    #[test]
    fn test_repeated_membership_keeps_the_primary_applicant() {
        let membership = "<IndividualProcessingGroupGUID>d2b3c4e5-3e80-4c1b-8d94-5f0d1e2a3b44</IndividualProcessingGroupGUID>";
        let repeated = format!(
            "</DataIndividualProcessGroup>
    <DataIndividualProcessGroup>
      <IndividualGUID>{APPLICANT}</IndividualGUID>
      <IndividualProcessingGroupGUID>7b2f3a4c-3c8a-4a1f-9b3e-5d0a1b2c3d66</IndividualProcessingGroupGUID>
      <ProcessingGroupGUID>5d1c2a60-8a4e-4f0e-9d7b-0a4c1b7e2f10</ProcessingGroupGUID>
      <RelationshipToPrincipalRepresentative>PA</RelationshipToPrincipalRepresentative>
    </DataIndividualProcessGroup>"
        );
        let at = VALID.find(membership).expect("membership in fixture");
        let end = at + VALID[at..].find("</DataIndividualProcessGroup>").expect("closing tag");
        let xml = format!(
            "{}{}{}",
            &VALID[..end],
            repeated,
            &VALID[end + "</DataIndividualProcessGroup>".len()..]
        );

        let result = rule_set().validate(xml.as_bytes());

        assert_eq!(
            result.error_messages(),
            vec![format!(
                "More than one DataIndividualProcessGroup objects maps to the same individual {APPLICANT}"
            )]
        );
    }

    #[test]
    fn test_validation_is_repeatable() {
        let rule_set = rule_set();
        let xml = VALID.replace("<EthnicityCode>1</EthnicityCode>", "<EthnicityCode>77</EthnicityCode>");

        let first = rule_set.validate(xml.as_bytes());
        let second = rule_set.validate(xml.as_bytes());

        assert_eq!(
            first.error_messages(),
            vec![format!("Invalid value 'EthnicityCode' value for individual {SPOUSE}: 77")]
        );
        assert_eq!(first, second);
    }
}
