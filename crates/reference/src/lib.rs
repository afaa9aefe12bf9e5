//! Reference code dictionaries used by case-file validation.
//!
//! Every coded element of a case file (country, sex, relationship, language level, ...) is
//! checked against a static table. The tables ship embedded in the binary as YAML and are
//! loaded once at startup into a [`ReferenceRegistry`], which is then shared read-only
//! between validation runs.
//!
//! A deployment can replace individual tables by pointing the registry at a directory that
//! contains `{table}.yaml` files with the same layout as the embedded ones; tables missing
//! from the directory fall back to the embedded copy.
//!
//! Table file layout:
//!
//! ```yaml
//! ignore_case: false
//! ignore_leading_zeros: true
//! codes:
//!   - { code: "01", description: Grade 1 }
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Number of codes listed by [`ReferenceData::sample_values`].
pub const SAMPLE_VALUES_SIZE: usize = 8;

/// Errors returned while loading reference tables.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference table {table} schema mismatch at {path}: {message}")]
    Schema {
        table: String,
        path: String,
        message: String,
    },

    #[error("reference table {table} has a blank code")]
    BlankCode { table: String },

    #[error("reference table {table} lists code '{code}' more than once")]
    DuplicateCode { table: String, code: String },

    #[error("failed to read reference table {path}: {source}", path = path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reference directory {path} is not a directory", path = path.display())]
    NotADirectory { path: std::path::PathBuf },
}

pub type ReferenceResult<T> = std::result::Result<T, ReferenceError>;

/// One row of a reference table, as written in the table file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceEntry {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TableWire {
    #[serde(default)]
    ignore_case: bool,
    #[serde(default)]
    ignore_leading_zeros: bool,
    codes: Vec<ReferenceEntry>,
}

/// An immutable code dictionary.
///
/// Lookups normalise the candidate code the same way the table codes were normalised at
/// load time: leading zeros are stripped when `ignore_leading_zeros` is set (an all-zero
/// code becomes `"0"`), and the code is lower-cased when `ignore_case` is set.
#[derive(Clone, Debug)]
pub struct ReferenceData {
    name: String,
    ignore_case: bool,
    ignore_leading_zeros: bool,
    entries: Vec<ReferenceEntry>,
    index: HashMap<String, usize>,
}

impl ReferenceData {
    /// Build a dictionary from table rows, keeping their order for [`Self::sample_values`].
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::BlankCode`] for an empty code and
    /// [`ReferenceError::DuplicateCode`] when two rows normalise to the same key.
    pub fn from_entries(
        name: impl Into<String>,
        ignore_case: bool,
        ignore_leading_zeros: bool,
        entries: Vec<ReferenceEntry>,
    ) -> ReferenceResult<Self> {
        let name = name.into();
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if entry.code.trim().is_empty() {
                return Err(ReferenceError::BlankCode { table: name });
            }
            let key = normalise(&entry.code, ignore_case, ignore_leading_zeros);
            if index.insert(key, position).is_some() {
                return Err(ReferenceError::DuplicateCode {
                    table: name,
                    code: entry.code.clone(),
                });
            }
        }

        Ok(Self {
            name,
            ignore_case,
            ignore_leading_zeros,
            entries,
            index,
        })
    }

    /// Parse a dictionary from YAML table text.
    ///
    /// Schema mismatches are reported with the path of the offending key
    /// (for example `codes[3].code`).
    pub fn from_yaml(name: impl Into<String>, yaml_text: &str) -> ReferenceResult<Self> {
        let name = name.into();
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, TableWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                return Err(ReferenceError::Schema {
                    table: name,
                    path,
                    message: err.into_inner().to_string(),
                });
            }
        };

        Self::from_entries(name, wire.ignore_case, wire.ignore_leading_zeros, wire.codes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when the code is listed in the table. Blank codes are never listed.
    pub fn contains_code(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// Description of a listed code.
    pub fn description(&self, code: &str) -> Option<&str> {
        self.lookup(code).map(|entry| entry.description.as_str())
    }

    /// A short list of valid codes for error messages.
    ///
    /// The first [`SAMPLE_VALUES_SIZE`] codes in table order, comma-joined, followed by
    /// `,...` when the table holds more.
    pub fn sample_values(&self) -> String {
        let mut sample = self
            .entries
            .iter()
            .take(SAMPLE_VALUES_SIZE)
            .map(|entry| entry.code.as_str())
            .collect::<Vec<_>>()
            .join(",");

        if self.entries.len() > SAMPLE_VALUES_SIZE {
            sample.push_str(",...");
        }
        sample
    }

    fn lookup(&self, code: &str) -> Option<&ReferenceEntry> {
        if code.trim().is_empty() {
            return None;
        }
        let key = normalise(code, self.ignore_case, self.ignore_leading_zeros);
        self.index.get(&key).map(|&position| &self.entries[position])
    }
}

fn normalise(code: &str, ignore_case: bool, ignore_leading_zeros: bool) -> String {
    let mut key = code;
    if ignore_leading_zeros {
        key = key.trim_start_matches('0');
        if key.trim().is_empty() {
            key = "0";
        }
    }

    if ignore_case {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// The tables known to the validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    AddressType,
    Country,
    EducationDegreeType,
    EducationLevel,
    EmploymentType,
    Ethnicity,
    Language,
    LanguageLevel,
    MaritalStatus,
    Occupation,
    Relationship,
    Religion,
    ResettlementCriteria,
    ResettlementPriority,
    Sex,
    Vulnerability,
}

impl Table {
    pub const ALL: [Table; 16] = [
        Table::AddressType,
        Table::Country,
        Table::EducationDegreeType,
        Table::EducationLevel,
        Table::EmploymentType,
        Table::Ethnicity,
        Table::Language,
        Table::LanguageLevel,
        Table::MaritalStatus,
        Table::Occupation,
        Table::Relationship,
        Table::Religion,
        Table::ResettlementCriteria,
        Table::ResettlementPriority,
        Table::Sex,
        Table::Vulnerability,
    ];

    /// File name (without `.yaml`) of the table, embedded or in an override directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            Table::AddressType => "address_type",
            Table::Country => "country",
            Table::EducationDegreeType => "education_degree_type",
            Table::EducationLevel => "education_level",
            Table::EmploymentType => "employment_type",
            Table::Ethnicity => "ethnicity",
            Table::Language => "language",
            Table::LanguageLevel => "language_level",
            Table::MaritalStatus => "marital_status",
            Table::Occupation => "occupation",
            Table::Relationship => "relationship",
            Table::Religion => "religion",
            Table::ResettlementCriteria => "resettlement_criteria",
            Table::ResettlementPriority => "resettlement_priority",
            Table::Sex => "sex",
            Table::Vulnerability => "vulnerability",
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            Table::AddressType => include_str!("../tables/address_type.yaml"),
            Table::Country => include_str!("../tables/country.yaml"),
            Table::EducationDegreeType => include_str!("../tables/education_degree_type.yaml"),
            Table::EducationLevel => include_str!("../tables/education_level.yaml"),
            Table::EmploymentType => include_str!("../tables/employment_type.yaml"),
            Table::Ethnicity => include_str!("../tables/ethnicity.yaml"),
            Table::Language => include_str!("../tables/language.yaml"),
            Table::LanguageLevel => include_str!("../tables/language_level.yaml"),
            Table::MaritalStatus => include_str!("../tables/marital_status.yaml"),
            Table::Occupation => include_str!("../tables/occupation.yaml"),
            Table::Relationship => include_str!("../tables/relationship.yaml"),
            Table::Religion => include_str!("../tables/religion.yaml"),
            Table::ResettlementCriteria => include_str!("../tables/resettlement_criteria.yaml"),
            Table::ResettlementPriority => include_str!("../tables/resettlement_priority.yaml"),
            Table::Sex => include_str!("../tables/sex.yaml"),
            Table::Vulnerability => include_str!("../tables/vulnerability.yaml"),
        }
    }
}

/// All reference tables, loaded once and shared read-only.
#[derive(Clone, Debug)]
pub struct ReferenceRegistry {
    tables: HashMap<Table, ReferenceData>,
}

impl ReferenceRegistry {
    /// Load the embedded tables.
    pub fn builtin() -> ReferenceResult<Self> {
        Self::load(None)
    }

    /// Load every table, preferring `{dir}/{table}.yaml` when an override directory is given.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError`] when the directory does not exist, an override file cannot
    /// be read, or any table fails to parse.
    pub fn load(override_dir: Option<&Path>) -> ReferenceResult<Self> {
        if let Some(dir) = override_dir {
            if !dir.is_dir() {
                return Err(ReferenceError::NotADirectory {
                    path: dir.to_path_buf(),
                });
            }
        }

        let mut tables = HashMap::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let candidate = override_dir.map(|dir| dir.join(format!("{}.yaml", table.file_stem())));

            let data = match candidate {
                Some(path) if path.is_file() => {
                    let text = std::fs::read_to_string(&path).map_err(|source| {
                        ReferenceError::Read {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    tracing::info!("using reference table override {}", path.display());
                    ReferenceData::from_yaml(table.file_stem(), &text)?
                }
                _ => ReferenceData::from_yaml(table.file_stem(), table.embedded())?,
            };

            tracing::debug!("loaded reference table {} ({} codes)", data.name(), data.len());
            tables.insert(table, data);
        }

        Ok(Self { tables })
    }

    /// The dictionary for `table`.
    pub fn table(&self, table: Table) -> &ReferenceData {
        // Every variant of `Table` is inserted by `load`.
        &self.tables[&table]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str) -> ReferenceEntry {
        ReferenceEntry {
            code: code.to_string(),
            description: format!("{code} description"),
        }
    }

    #[test]
    fn builtin_registry_loads_every_table() {
        let registry = ReferenceRegistry::builtin().expect("embedded tables should parse");
        for table in Table::ALL {
            assert!(
                !registry.table(table).is_empty(),
                "table {} should not be empty",
                table.file_stem()
            );
        }
    }

    #[test]
    fn test_each_embedded_table_parses_on_its_own() {
        for table in Table::ALL {
            if let Err(err) = ReferenceData::from_yaml(table.file_stem(), table.embedded()) {
                panic!("embedded table {} should parse: {err}", table.file_stem());
            }
        }
    }

    #[test]
    fn test_descriptions_with_commas_are_kept_whole() {
        let registry = ReferenceRegistry::builtin().expect("embedded tables should parse");
        let occupation = registry.table(Table::Occupation);
        assert_eq!(
            occupation.description("6"),
            Some("Skilled agricultural, forestry and fishery workers")
        );
        assert_eq!(
            occupation.description("7531"),
            Some("Tailors, dressmakers, furriers and hatters")
        );
        assert_eq!(occupation.description("8322"), Some("Car, taxi and van drivers"));
    }

    #[test]
    fn builtin_tables_carry_codes_the_rules_depend_on() {
        let registry = ReferenceRegistry::builtin().expect("embedded tables should parse");
        assert!(registry.table(Table::Relationship).contains_code("PA"));
        assert!(registry.table(Table::AddressType).contains_code("COA"));
        assert!(registry.table(Table::AddressType).contains_code("tel"));
        assert!(registry.table(Table::Country).contains_code("SYR"));
        assert!(registry.table(Table::EducationLevel).contains_code("0012"));
    }

    #[test]
    fn exact_lookup_is_case_sensitive_by_default() {
        let data = ReferenceData::from_entries("sex", false, false, vec![entry("M"), entry("F")])
            .expect("valid table");
        assert!(data.contains_code("M"));
        assert!(!data.contains_code("m"));
        assert!(!data.contains_code("X"));
        assert!(!data.contains_code(""));
        assert!(!data.contains_code("   "));
    }

    #[test]
    fn ignore_case_lowercases_both_sides() {
        let data = ReferenceData::from_entries("address", true, false, vec![entry("COA")])
            .expect("valid table");
        assert!(data.contains_code("coa"));
        assert!(data.contains_code("CoA"));
        assert_eq!(data.description("coa"), Some("COA description"));
    }

    #[test]
    fn ignore_leading_zeros_strips_both_sides() {
        let data = ReferenceData::from_entries(
            "level",
            false,
            true,
            vec![entry("000"), entry("01"), entry("12")],
        )
        .expect("valid table");
        assert!(data.contains_code("1"));
        assert!(data.contains_code("0001"));
        assert!(data.contains_code("0"));
        assert!(data.contains_code("00"));
        assert!(data.contains_code("012"));
        assert!(!data.contains_code("2"));
    }

    #[test]
    fn sample_values_are_bounded() {
        let small = ReferenceData::from_entries("small", false, false, vec![entry("A"), entry("B")])
            .expect("valid table");
        assert_eq!(small.sample_values(), "A,B");

        let codes = (1..=10).map(|n| entry(&format!("C{n}"))).collect();
        let large = ReferenceData::from_entries("large", false, false, codes).expect("valid table");
        assert_eq!(large.sample_values(), "C1,C2,C3,C4,C5,C6,C7,C8,...");

        let exact = (1..=8).map(|n| entry(&format!("C{n}"))).collect();
        let exact = ReferenceData::from_entries("exact", false, false, exact).expect("valid table");
        assert!(!exact.sample_values().ends_with(",..."));
    }

    #[test]
    fn blank_and_duplicate_codes_are_rejected() {
        let err = ReferenceData::from_entries("t", false, false, vec![entry(" ")])
            .expect_err("blank code should be rejected");
        assert!(matches!(err, ReferenceError::BlankCode { .. }));

        let err = ReferenceData::from_entries("t", false, true, vec![entry("01"), entry("1")])
            .expect_err("normalised duplicates should be rejected");
        assert!(matches!(err, ReferenceError::DuplicateCode { ref code, .. } if code == "1"));
    }

    #[test]
    fn yaml_schema_errors_name_the_path() {
        let err = ReferenceData::from_yaml("t", "codes:\n  - { code: A, colour: red }\n")
            .expect_err("unknown key should fail");
        match err {
            ReferenceError::Schema { table, path, .. } => {
                assert_eq!(table, "t");
                assert!(path.contains("codes"), "unexpected path {path}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn override_directory_replaces_single_tables() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("sex.yaml"),
            "codes:\n  - { code: X, description: Unspecified }\n",
        )
        .expect("write override");

        let registry = ReferenceRegistry::load(Some(dir.path())).expect("registry should load");
        assert!(registry.table(Table::Sex).contains_code("X"));
        assert!(!registry.table(Table::Sex).contains_code("M"));
        assert!(registry.table(Table::Relationship).contains_code("PA"));
    }

    #[test]
    fn missing_override_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope");
        let err = ReferenceRegistry::load(Some(&missing)).expect_err("missing dir should fail");
        assert!(matches!(err, ReferenceError::NotADirectory { .. }));
    }
}
