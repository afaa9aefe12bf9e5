//! Version 4 case-file wire model.
//!
//! A file batches one or more `CASE` elements. People are keyed by `IndividualGUID`, every
//! dependent record carries its own GUID, and photographs live in a separate
//! `DataPhotograph` section. The relationship to the principal representative moved from
//! the individual record to `DataIndividualProcessGroup`.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::date::optional_date;

/// Root `UNHCR_RRF` element.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UnhcrRrf {
    #[serde(rename = "RRF_BATCH_TYPE", default)]
    pub batch_type: Option<BatchType>,
    #[serde(rename = "CASE", default)]
    pub cases: Vec<Case>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BatchType {
    #[serde(rename = "GroupIndividualIndicator", default)]
    pub group_individual_indicator: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Case {
    #[serde(rename = "DataProcessGroup", default)]
    pub process_group: Option<DataProcessGroup>,
    #[serde(rename = "DataIndividual", default)]
    pub individuals: Vec<DataIndividual>,
    #[serde(rename = "DataPhotograph", default)]
    pub photographs: Vec<DataPhotograph>,
    #[serde(rename = "DataIndividualProcessGroup", default)]
    pub individual_process_groups: Vec<DataIndividualProcessGroup>,
    #[serde(rename = "DataAlias", default)]
    pub aliases: Vec<DataAlias>,
    #[serde(rename = "DataEmployment", default)]
    pub employments: Vec<DataEmployment>,
    #[serde(rename = "DataAddress", default)]
    pub addresses: Vec<DataAddress>,
    #[serde(rename = "DataIndividualRelatives", default)]
    pub relatives: Vec<DataIndividualRelatives>,
    #[serde(rename = "DataEducation", default)]
    pub educations: Vec<DataEducation>,
    #[serde(rename = "DataLanguage", default)]
    pub languages: Vec<DataLanguage>,
    #[serde(rename = "DataResettlement", default)]
    pub resettlement: Option<DataResettlement>,
    #[serde(rename = "DataVulnerability", default)]
    pub vulnerabilities: Vec<DataVulnerability>,
    #[serde(rename = "DataProcessGroupCrossReference", default)]
    pub cross_references: Vec<DataProcessGroupCrossReference>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataProcessGroup {
    #[serde(rename = "ProcessingGroupGUID", default)]
    pub processing_group_guid: Option<String>,
    #[serde(rename = "ProcessingGroupNumber", default)]
    pub processing_group_number: Option<String>,
    #[serde(rename = "ProcessingGroupSize", default)]
    pub processing_group_size: u32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataIndividual {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "FamilyName", default)]
    pub family_name: Option<String>,
    #[serde(rename = "SecondFamilyName", default)]
    pub second_family_name: Option<String>,
    #[serde(rename = "GivenName", default)]
    pub given_name: Option<String>,
    #[serde(rename = "MiddleName", default)]
    pub middle_name: Option<String>,
    #[serde(rename = "MaidenName", default)]
    pub maiden_name: Option<String>,
    #[serde(rename = "RegistrationDate", default, deserialize_with = "optional_date")]
    pub registration_date: Option<NaiveDate>,
    #[serde(rename = "DateofBirth", default, deserialize_with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(rename = "DateofBirthEstimate", default)]
    pub date_of_birth_estimate: Option<bool>,
    #[serde(rename = "BirthCountryCode", default)]
    pub birth_country_code: Option<String>,
    #[serde(rename = "BirthCityTownVillage", default)]
    pub birth_city_town_village: Option<String>,
    #[serde(rename = "OriginCountryCode", default)]
    pub origin_country_code: Option<String>,
    #[serde(rename = "AsylumCountryCode", default)]
    pub asylum_country_code: Option<String>,
    #[serde(rename = "ArrivalDate", default, deserialize_with = "optional_date")]
    pub arrival_date: Option<NaiveDate>,
    #[serde(rename = "SexCode", default)]
    pub sex_code: Option<String>,
    #[serde(rename = "NationalityCode", default)]
    pub nationality_code: Option<String>,
    #[serde(rename = "MarriageStatusCode", default)]
    pub marriage_status_code: Option<String>,
    #[serde(rename = "ReligionCode", default)]
    pub religion_code: Option<String>,
    #[serde(rename = "EthnicityCode", default)]
    pub ethnicity_code: Option<String>,
    #[serde(rename = "EducationLevelCode", default)]
    pub education_level_code: Option<String>,
    #[serde(rename = "MotherName", default)]
    pub mother_name: Option<String>,
    #[serde(rename = "FatherName", default)]
    pub father_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataPhotograph {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "PhotoGUID", default)]
    pub photo_guid: Option<String>,
    #[serde(rename = "PhotoTypeCode", default)]
    pub photo_type_code: Option<i32>,
    /// Base64 encoded photograph. `None` when the element is left out.
    #[serde(rename = "Photo", default)]
    pub photo: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataIndividualProcessGroup {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "IndividualProcessingGroupGUID", default)]
    pub individual_processing_group_guid: Option<String>,
    #[serde(rename = "ProcessingGroupGUID", default)]
    pub processing_group_guid: Option<String>,
    #[serde(rename = "RelationshipToPrincipalRepresentative", default)]
    pub relationship_to_principal_representative: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataAlias {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "AliasGUID", default)]
    pub alias_guid: Option<String>,
    #[serde(rename = "IndividualAliasFirstName", default)]
    pub alias_first_name: Option<String>,
    #[serde(rename = "IndividualAliasLastName", default)]
    pub alias_last_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataEmployment {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "EmploymentGUID", default)]
    pub employment_guid: Option<String>,
    #[serde(rename = "EmploymentTypeCode", default)]
    pub employment_type_code: Option<String>,
    #[serde(rename = "OccupationCode", default)]
    pub occupation_code: Option<String>,
    #[serde(rename = "OccupationText", default)]
    pub occupation_text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataAddress {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "AddressGUID", default)]
    pub address_guid: Option<String>,
    #[serde(rename = "AddressCountry", default)]
    pub address_country: Option<String>,
    #[serde(rename = "AddressType", default)]
    pub address_type: Option<String>,
    #[serde(rename = "LocationLevel1Description", default)]
    pub location_level1_description: Option<String>,
    #[serde(rename = "LocationLevel2Description", default)]
    pub location_level2_description: Option<String>,
    #[serde(rename = "LocationLevel3Description", default)]
    pub location_level3_description: Option<String>,
    #[serde(rename = "LocationLevel4Description", default)]
    pub location_level4_description: Option<String>,
    #[serde(rename = "LocationLevel5Description", default)]
    pub location_level5_description: Option<String>,
    /// Phone number for `TEL` addresses.
    #[serde(rename = "LocationLevel6", default)]
    pub location_level6: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataIndividualRelatives {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "IndividualRelativesGUID", default)]
    pub individual_relatives_guid: Option<String>,
    #[serde(rename = "FamilyName", default)]
    pub family_name: Option<String>,
    #[serde(rename = "SecondFamilyName", default)]
    pub second_family_name: Option<String>,
    #[serde(rename = "GivenName", default)]
    pub given_name: Option<String>,
    #[serde(rename = "MiddleName", default)]
    pub middle_name: Option<String>,
    #[serde(rename = "MaidenName", default)]
    pub maiden_name: Option<String>,
    #[serde(rename = "SexCode", default)]
    pub sex_code: Option<String>,
    #[serde(rename = "NationalityCode", default)]
    pub nationality_code: Option<String>,
    #[serde(rename = "ResidenceCountryCode", default)]
    pub residence_country_code: Option<String>,
    #[serde(rename = "MarriageStatusCode", default)]
    pub marriage_status_code: Option<String>,
    #[serde(rename = "RelationshipCode", default)]
    pub relationship_code: Option<String>,
    #[serde(rename = "Deceased", default)]
    pub deceased: Option<bool>,
    #[serde(rename = "DeceasedDate", default, deserialize_with = "optional_date")]
    pub deceased_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataEducation {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "EducationGUID", default)]
    pub education_guid: Option<String>,
    #[serde(rename = "EducationLevelCode", default)]
    pub education_level_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataLanguage {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "LanguageGUID", default)]
    pub language_guid: Option<String>,
    #[serde(rename = "LanguageCode", default)]
    pub language_code: Option<String>,
    #[serde(rename = "LanguageReadCode", default)]
    pub read_code: Option<String>,
    #[serde(rename = "LanguageSpeakCode", default)]
    pub speak_code: Option<String>,
    #[serde(rename = "LanguageUnderstandCode", default)]
    pub understand_code: Option<String>,
    #[serde(rename = "LanguageWriteCode", default)]
    pub write_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataResettlement {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "ResettlementCriteriaCode", default)]
    pub criteria_code: Option<String>,
    #[serde(rename = "ResettlementCriteria2Code", default)]
    pub criteria_code2: Option<String>,
    #[serde(rename = "ResettlementPriorityCode", default)]
    pub priority_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataVulnerability {
    #[serde(rename = "IndividualGUID", default)]
    pub individual_guid: Option<String>,
    #[serde(rename = "VulnerabilityGUID", default)]
    pub vulnerability_guid: Option<String>,
    #[serde(rename = "VulnerabilityCode", default)]
    pub vulnerability_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataProcessGroupCrossReference {
    #[serde(rename = "ProcessingGroupNumberFrom", default)]
    pub processing_group_number_from: Option<String>,
    #[serde(rename = "ProcessingGroupNumberTo", default)]
    pub processing_group_number_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const SAMPLE: &str = r#"<UNHCR_RRF>
  <RRF_BATCH_TYPE><GroupIndividualIndicator>Group Submission</GroupIndividualIndicator></RRF_BATCH_TYPE>
  <CASE>
    <DataProcessGroup>
      <ProcessingGroupGUID>pg-1</ProcessingGroupGUID>
      <ProcessingGroupNumber>100-16C00001</ProcessingGroupNumber>
      <ProcessingGroupSize>1</ProcessingGroupSize>
    </DataProcessGroup>
    <DataIndividual>
      <IndividualGUID>ind-1</IndividualGUID>
      <DateofBirthEstimate>false</DateofBirthEstimate>
    </DataIndividual>
    <DataPhotograph>
      <IndividualGUID>ind-1</IndividualGUID>
      <PhotoGUID>photo-1</PhotoGUID>
      <PhotoTypeCode>1</PhotoTypeCode>
    </DataPhotograph>
    <DataVulnerability>
      <IndividualGUID>ind-1</IndividualGUID>
      <VulnerabilityCode>SM</VulnerabilityCode>
    </DataVulnerability>
    <DataVulnerability>
      <IndividualGUID>ind-1</IndividualGUID>
      <VulnerabilityCode>DS</VulnerabilityCode>
    </DataVulnerability>
  </CASE>
  <CASE>
    <DataIndividual><IndividualGUID>ind-2</IndividualGUID></DataIndividual>
  </CASE>
</UNHCR_RRF>"#;

    #[test]
    fn parses_multiple_cases() {
        let rrf: UnhcrRrf = parse(SAMPLE.as_bytes()).expect("sample should parse");
        assert_eq!(rrf.cases.len(), 2);

        let first = &rrf.cases[0];
        assert_eq!(
            first
                .process_group
                .as_ref()
                .and_then(|g| g.processing_group_guid.as_deref()),
            Some("pg-1")
        );
        assert_eq!(first.individuals[0].date_of_birth_estimate, Some(false));
        assert_eq!(first.photographs[0].photo_type_code, Some(1));
        assert!(first.photographs[0].photo.is_none());
        assert_eq!(first.vulnerabilities.len(), 2);

        assert!(rrf.cases[1].process_group.is_none());
    }

    #[test]
    fn file_without_cases_parses_to_empty_list() {
        let rrf: UnhcrRrf = parse(b"<UNHCR_RRF><RRF_BATCH_TYPE/></UNHCR_RRF>").expect("should parse");
        assert!(rrf.cases.is_empty());
    }
}
