//! Version 3 rule-set: one case per file, people keyed by `IndividualID`.

use std::sync::Arc;

use rrf_model::v3::{Case, DataAddress, DataResettlement, UnhcrRrf};
use rrf_reference::ReferenceRegistry;
use rrf_types::{Field, ParsedDate};

use super::{is_case_file, mentions_individual_guid, run, RuleSet};
use crate::constants::{RELATIONSHIP_CODE_PRIMARY_APPLICANT, RULE_SET_V3};
use crate::identity::{validate_identity_set, Identity};
use crate::mapper::{map_records_to_identities, SectionRules};
use crate::rules::applicant::{
    validate_coa_address, validate_primary_applicant_dates, validate_primary_applicants,
};
use crate::rules::duplicates::validate_no_duplicates;
use crate::rules::group::{
    validate_batch_type, validate_cross_references, validate_process_group, ProcessGroup,
};
use crate::rules::person::{validate_person, PersonFields};
use crate::rules::records::{
    validate_address, validate_alias, validate_document, validate_education,
    validate_employment, validate_language, validate_resettlement, AddressFields,
    LanguageFields,
};
use crate::rules::RuleContext;
use crate::{CaseResult, FatalCaseError, ValidationResult, ValidatorConfig};

const INDIVIDUALS: SectionRules = SectionRules::new("DataIndividual", true, true);
const DOCUMENTS: SectionRules = SectionRules::new("DataDocument", false, false);
const ALIASES: SectionRules = SectionRules::new("DataAlias", false, false);
const EMPLOYMENTS: SectionRules = SectionRules::new("DataEmployment", false, false);
const ADDRESSES: SectionRules = SectionRules::new("DataAddress", false, false);
const RELATIVES: SectionRules = SectionRules::new("DataIndividualRelatives", false, false);
const EDUCATIONS: SectionRules = SectionRules::new("DataEducation", false, true);
const LANGUAGES: SectionRules = SectionRules::new("DataLanguage", false, false);
const RESETTLEMENTS: SectionRules = SectionRules::new("DataResettlement", false, true);

fn text(value: &Option<String>) -> Field<String> {
    Field::mandatory_text(value.as_deref())
}

fn by_id(value: &Option<String>) -> Identity {
    Identity::of_id(value.as_deref())
}

/// Validator for version 3 case files.
#[derive(Debug, Clone)]
pub struct V3RuleSet {
    registry: Arc<ReferenceRegistry>,
    config: ValidatorConfig,
}

impl V3RuleSet {
    pub fn new(registry: Arc<ReferenceRegistry>, config: ValidatorConfig) -> Self {
        Self { registry, config }
    }

    fn validate_document(&self, document: UnhcrRrf, result: &mut ValidationResult) -> CaseResult<()> {
        let ctx = RuleContext::new(&self.registry, &self.config);

        let indicator = document
            .batch_type
            .as_ref()
            .and_then(|batch| batch.group_individual_indicator.as_deref());
        let case_count = usize::from(document.case.is_some());
        validate_batch_type(indicator, case_count, result)?;

        match &document.case {
            Some(case) => validate_case(&ctx, case, result),
            None => Err(FatalCaseError::NoCases),
        }
    }
}

impl RuleSet for V3RuleSet {
    fn id(&self) -> &str {
        RULE_SET_V3
    }

    fn is_applicable(&self, bytes: &[u8]) -> bool {
        is_case_file(bytes) && !mentions_individual_guid(bytes)
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
        .map(|individual| by_id(&individual.individual_id))
        .collect();
    validate_identity_set(INDIVIDUALS.name, &people, result)?;
    tracing::debug!("validating v3 case with {} individual(s)", people.len());

    let group = case
        .process_group
        .as_ref()
        .ok_or(FatalCaseError::MissingProcessGroup)?;
    validate_process_group(
        &ProcessGroup {
            number: group.processing_group_number.as_deref(),
            guid: None,
            size: group.processing_group_size,
        },
        people.len(),
        result,
    )?;

    // Individuals and the primary applicant.
    let individuals = map_records_to_identities(
        &INDIVIDUALS,
        &people,
        &case.individuals,
        |individual| by_id(&individual.individual_id),
        result,
    )?;
    for (identity, individual) in individuals.iter() {
        let person = PersonFields {
            concatenated_name: text(&individual.concatenated_name),
            family_name: text(&individual.family_name),
            given_name: text(&individual.given_name),
            registration_date: Field::optional_date(individual.registration_date),
            date_of_birth: Field::mandatory_date(individual.date_of_birth),
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
            mother_name: text(&individual.mother_name),
            father_name: text(&individual.father_name),
            relationship_to_principal_representative: text(
                &individual.relationship_to_principal_representative,
            ),
            photo: text(&individual.photo),
            ..PersonFields::default()
        };
        validate_person(ctx, identity, &person, result);
    }

    let mut applicants = Vec::new();
    for (identity, individual) in individuals.iter() {
        if individual.relationship_to_principal_representative.as_deref()
            == Some(RELATIONSHIP_CODE_PRIMARY_APPLICANT)
        {
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

    let documents = map_records_to_identities(
        &DOCUMENTS,
        &people,
        &case.documents,
        |document| by_id(&document.individual_id),
        result,
    )?;
    for (identity, document) in documents.iter() {
        validate_document(identity, &text(&document.document_number), result);
    }
    validate_no_duplicates(
        "DataDocument.DocumentNumber",
        documents
            .records()
            .map(|document| document.document_number.as_deref().map(str::trim)),
        result,
    );

    let aliases = map_records_to_identities(
        &ALIASES,
        &people,
        &case.aliases,
        |alias| by_id(&alias.individual_id),
        result,
    )?;
    for (identity, alias) in aliases.iter() {
        validate_alias(identity, &text(&alias.alias_first_name), &text(&alias.alias_last_name), result);
    }

    let employments = map_records_to_identities(
        &EMPLOYMENTS,
        &people,
        &case.employments,
        |employment| by_id(&employment.individual_id),
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

    let address_records: &[DataAddress] = match &case.address {
        Some(address) => std::slice::from_ref(address),
        None => &[],
    };
    let addresses = map_records_to_identities(
        &ADDRESSES,
        &people,
        address_records,
        |address| by_id(&address.individual_id),
        result,
    )?;
    for (identity, address) in addresses.iter() {
        let fields = AddressFields {
            country: text(&address.address_country),
            address_type: text(&address.address_type),
            phone: text(&address.location_level6),
        };
        validate_address(ctx, identity, &fields, result);
    }
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
        |relative| by_id(&relative.individual_id),
        result,
    )?;
    for (identity, relative) in relatives.iter() {
        let person = PersonFields {
            family_name: text(&relative.family_name),
            given_name: text(&relative.given_name),
            sex: text(&relative.sex_code),
            nationality: text(&relative.nationality_code),
            residence_country: text(&relative.residence_country_code),
            marital_status: text(&relative.marriage_status_code),
            relationship: text(&relative.relationship_code),
            ..PersonFields::default()
        };
        validate_person(ctx, identity, &person, result);
    }

    let educations = map_records_to_identities(
        &EDUCATIONS,
        &people,
        &case.educations,
        |education| by_id(&education.individual_id),
        result,
    )?;
    for (identity, education) in educations.iter() {
        validate_education(ctx, identity, &text(&education.education_level_code), result);
    }

    let languages = map_records_to_identities(
        &LANGUAGES,
        &people,
        &case.languages,
        |language| by_id(&language.individual_id),
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

    let resettlement_records: &[DataResettlement] = match &case.resettlement {
        Some(resettlement) => std::slice::from_ref(resettlement),
        None => &[],
    };
    let resettlements = map_records_to_identities(
        &RESETTLEMENTS,
        &people,
        resettlement_records,
        |resettlement| by_id(&resettlement.individual_id),
        result,
    )?;
    for (identity, resettlement) in resettlements.iter() {
        validate_resettlement(
            ctx,
            identity,
            &text(&resettlement.criteria_code),
            &text(&resettlement.criteria_code2),
            &text(&resettlement.priority_code),
            result,
        );
    }

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
