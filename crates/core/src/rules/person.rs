//! Checks shared by people and their relatives.
//!
//! `DataIndividual` and `DataIndividualRelatives` records describe a person with largely the
//! same vocabulary. Each rule-set fills in the fields its schema carries and leaves the rest
//! [`Field::Absent`].

use rrf_reference::Table;
use rrf_types::{Field, ParsedDate};

use super::codes::validate_reference_code;
use super::dates::validate_date;
use super::names::validate_name;
use super::photo::validate_photo;
use super::RuleContext;
use crate::identity::Identity;
use crate::ValidationResult;

/// Person fields that take part in validation.
#[derive(Debug, Clone, Default)]
pub struct PersonFields {
    pub concatenated_name: Field<String>,
    pub family_name: Field<String>,
    pub second_family_name: Field<String>,
    pub given_name: Field<String>,
    pub middle_name: Field<String>,
    pub maiden_name: Field<String>,
    pub registration_date: Field<ParsedDate>,
    pub date_of_birth: Field<ParsedDate>,
    pub birth_country: Field<String>,
    pub origin_country: Field<String>,
    pub asylum_country: Field<String>,
    pub arrival_date: Field<ParsedDate>,
    pub sex: Field<String>,
    pub nationality: Field<String>,
    pub residence_country: Field<String>,
    pub marital_status: Field<String>,
    pub religion: Field<String>,
    pub ethnicity: Field<String>,
    pub education_level: Field<String>,
    pub mother_name: Field<String>,
    pub father_name: Field<String>,
    pub relationship_to_principal_representative: Field<String>,
    /// Relationship of a relative to the person.
    pub relationship: Field<String>,
    pub deceased_date: Field<ParsedDate>,
    /// Base64 photograph embedded in the record.
    pub photo: Field<String>,
}

/// Run every person check, in a fixed order.
pub fn validate_person(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    person: &PersonFields,
    result: &mut ValidationResult,
) {
    let names = [
        ("ConcatenatedName", &person.concatenated_name),
        ("FamilyName", &person.family_name),
        ("SecondFamilyName", &person.second_family_name),
        ("GivenName", &person.given_name),
        ("MiddleName", &person.middle_name),
        ("MaidenName", &person.maiden_name),
    ];
    for (field, name) in names {
        validate_name(identity, field, name, false, result);
    }

    validate_date(identity, "RegistrationDate", &person.registration_date, result);
    validate_date(identity, "DateofBirth", &person.date_of_birth, result);

    validate_reference_code(ctx, identity, "BirthCountryCode", &person.birth_country, Table::Country, result);
    validate_reference_code(ctx, identity, "OriginCountryCode", &person.origin_country, Table::Country, result);
    validate_reference_code(ctx, identity, "AsylumCountryCode", &person.asylum_country, Table::Country, result);

    validate_date(identity, "ArrivalDate", &person.arrival_date, result);

    validate_reference_code(ctx, identity, "SexCode", &person.sex, Table::Sex, result);
    validate_reference_code(ctx, identity, "NationalityCode", &person.nationality, Table::Country, result);
    validate_reference_code(
        ctx,
        identity,
        "ResidenceCountryCode",
        &person.residence_country,
        Table::Country,
        result,
    );
    validate_reference_code(
        ctx,
        identity,
        "MarriageStatusCode",
        &person.marital_status,
        Table::MaritalStatus,
        result,
    );
    validate_reference_code(ctx, identity, "ReligionCode", &person.religion, Table::Religion, result);
    validate_reference_code(ctx, identity, "EthnicityCode", &person.ethnicity, Table::Ethnicity, result);
    validate_reference_code(
        ctx,
        identity,
        "EducationLevelCode",
        &person.education_level,
        Table::EducationLevel,
        result,
    );

    validate_name(identity, "MotherName", &person.mother_name, false, result);
    validate_name(identity, "FatherName", &person.father_name, false, result);

    validate_reference_code(
        ctx,
        identity,
        "RelationshipToPrincipalRepresentative",
        &person.relationship_to_principal_representative,
        Table::Relationship,
        result,
    );
    validate_reference_code(ctx, identity, "RelationshipCode", &person.relationship, Table::Relationship, result);

    validate_date(identity, "DeceasedDate", &person.deceased_date, result);

    if let Some(photo) = person.photo.as_present() {
        validate_photo(identity, photo, result);
    }
}
