//! Wire models for RRF (resettlement registration form) case files.
//!
//! Two schema versions are in circulation:
//! - [`v3`] identifies people by `IndividualID` and carries exactly one case per file;
//! - [`v4`] identifies people by `IndividualGUID` and may batch several cases.
//!
//! Both are plain serde structs deserialised from XML with `quick-xml`. Every text element
//! is optional on the wire: whether a missing value is an error is decided by the
//! validation rules, not by the parser. The parser only rejects documents that are not
//! well-formed XML or whose values cannot be converted to the declared type (dates,
//! integers, booleans).

pub mod v3;
pub mod v4;

mod date;

use serde::de::DeserializeOwned;

/// Errors returned by the model crate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },
}

/// Type alias for Results that can fail with a [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Parse a case file into the wire model `T`.
///
/// This uses `serde_path_to_error` so that a failure names the element that could not be
/// read (for example `CASE.DataIndividual[0].DateofBirth`). The root element name is not
/// checked here; callers sniff it before choosing a model.
///
/// # Errors
///
/// Returns [`ModelError::Encoding`] for non UTF-8 input and [`ModelError::Schema`] when the
/// XML is malformed or a value does not fit its declared type.
pub fn parse<T: DeserializeOwned>(bytes: &[u8]) -> ModelResult<T> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.trim_start_matches('\u{feff}');

    let mut deserializer = quick_xml::de::Deserializer::from_str(text);
    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            Err(ModelError::Schema {
                path,
                message: err.into_inner().to_string(),
            })
        }
    }
}
