//! Version 3 case-file wire model.
//!
//! One `CASE` per file. People are keyed by `IndividualID`; the address and resettlement
//! sections hold at most one record each, and the photograph is embedded in the individual
//! record.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::date::optional_date;

/// Root `UNHCR_RRF` element.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UnhcrRrf {
    #[serde(rename = "RRF_BATCH_TYPE", default)]
    pub batch_type: Option<BatchType>,
    #[serde(rename = "CASE", default)]
    pub case: Option<Case>,
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
    #[serde(rename = "DataDocument", default)]
    pub documents: Vec<DataDocument>,
    #[serde(rename = "DataAlias", default)]
    pub aliases: Vec<DataAlias>,
    #[serde(rename = "DataEmployment", default)]
    pub employments: Vec<DataEmployment>,
    #[serde(rename = "DataAddress", default)]
    pub address: Option<DataAddress>,
    #[serde(rename = "DataIndividualRelatives", default)]
    pub relatives: Vec<DataIndividualRelatives>,
    #[serde(rename = "DataEducation", default)]
    pub educations: Vec<DataEducation>,
    #[serde(rename = "DataLanguage", default)]
    pub languages: Vec<DataLanguage>,
    #[serde(rename = "DataResettlement", default)]
    pub resettlement: Option<DataResettlement>,
    #[serde(rename = "DataProcessGroupCrossReference", default)]
    pub cross_references: Vec<DataProcessGroupCrossReference>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataProcessGroup {
    #[serde(rename = "ProcessingGroupNumber", default)]
    pub processing_group_number: Option<String>,
    #[serde(rename = "ProcessingGroupSize", default)]
    pub processing_group_size: u32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataIndividual {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "ConcatenatedName", default)]
    pub concatenated_name: Option<String>,
    #[serde(rename = "FamilyName", default)]
    pub family_name: Option<String>,
    #[serde(rename = "GivenName", default)]
    pub given_name: Option<String>,
    #[serde(rename = "RegistrationDate", default, deserialize_with = "optional_date")]
    pub registration_date: Option<NaiveDate>,
    #[serde(rename = "DateofBirth", default, deserialize_with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
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
    #[serde(rename = "RelationshipToPrincipalRepresentative", default)]
    pub relationship_to_principal_representative: Option<String>,
    /// Base64 encoded photograph.
    #[serde(rename = "Photo", default)]
    pub photo: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataDocument {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "DocumentNumber", default)]
    pub document_number: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataAlias {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "IndividualAliasFirstName", default)]
    pub alias_first_name: Option<String>,
    #[serde(rename = "IndividualAliasLastName", default)]
    pub alias_last_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataEmployment {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "EmploymentTypeCode", default)]
    pub employment_type_code: Option<String>,
    #[serde(rename = "OccupationCode", default)]
    pub occupation_code: Option<String>,
    #[serde(rename = "OccupationText", default)]
    pub occupation_text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataAddress {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
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
    /// Phone number for `TEL` addresses.
    #[serde(rename = "LocationLevel6", default)]
    pub location_level6: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataIndividualRelatives {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "FamilyName", default)]
    pub family_name: Option<String>,
    #[serde(rename = "GivenName", default)]
    pub given_name: Option<String>,
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
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataEducation {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "EducationLevelCode", default)]
    pub education_level_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataLanguage {
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
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
    #[serde(rename = "IndividualID", default)]
    pub individual_id: Option<String>,
    #[serde(rename = "ResettlementCriteriaCode", default)]
    pub criteria_code: Option<String>,
    #[serde(rename = "ResettlementCriteriaCode2", default)]
    pub criteria_code2: Option<String>,
    #[serde(rename = "ResettlementPriorityCode", default)]
    pub priority_code: Option<String>,
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

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<UNHCR_RRF xmlns="http://tempuri.org/ElectronicRRF.xsd">
  <RRF_BATCH_TYPE>
    <GroupIndividualIndicator>Single Submission</GroupIndividualIndicator>
  </RRF_BATCH_TYPE>
  <CASE>
    <DataProcessGroup>
      <ProcessingGroupNumber>100-16C00001</ProcessingGroupNumber>
      <ProcessingGroupSize>2</ProcessingGroupSize>
    </DataProcessGroup>
    <DataIndividual>
      <IndividualID>100-00000001</IndividualID>
      <FamilyName>Haddad</FamilyName>
      <DateofBirth>1980-05-17</DateofBirth>
      <RelationshipToPrincipalRepresentative>PA</RelationshipToPrincipalRepresentative>
    </DataIndividual>
    <DataAddress>
      <IndividualID>100-00000001</IndividualID>
      <AddressType>COA</AddressType>
    </DataAddress>
    <DataIndividual>
      <IndividualID>100-00000002</IndividualID>
      <FamilyName>Haddad</FamilyName>
    </DataIndividual>
    <DataProcessGroupCrossReference>
      <ProcessingGroupNumberFrom>100-16C00001</ProcessingGroupNumberFrom>
      <ProcessingGroupNumberTo>100-16C00002</ProcessingGroupNumberTo>
    </DataProcessGroupCrossReference>
  </CASE>
</UNHCR_RRF>"#;

    #[test]
    fn parses_case_sections() {
        let rrf: UnhcrRrf = parse(SAMPLE.as_bytes()).expect("sample should parse");
        let case = rrf.case.expect("one case");

        let group = case.process_group.expect("process group");
        assert_eq!(group.processing_group_number.as_deref(), Some("100-16C00001"));
        assert_eq!(group.processing_group_size, 2);

        assert_eq!(case.individuals.len(), 2);
        assert_eq!(
            case.individuals[0].date_of_birth,
            NaiveDate::from_ymd_opt(1980, 5, 17)
        );
        assert_eq!(case.individuals[0].registration_date, None);
        assert_eq!(
            case.address.and_then(|a| a.address_type).as_deref(),
            Some("COA")
        );
        assert_eq!(case.cross_references.len(), 1);
    }

    #[test]
    fn missing_case_is_none() {
        let rrf: UnhcrRrf = parse(b"<UNHCR_RRF></UNHCR_RRF>").expect("should parse");
        assert!(rrf.case.is_none());
        assert!(rrf.batch_type.is_none());
    }

    #[test]
    fn non_numeric_group_size_is_rejected() {
        let xml = br#"<UNHCR_RRF><CASE><DataProcessGroup><ProcessingGroupSize>two</ProcessingGroupSize></DataProcessGroup></CASE></UNHCR_RRF>"#;
        assert!(parse::<UnhcrRrf>(xml).is_err());
    }
}
