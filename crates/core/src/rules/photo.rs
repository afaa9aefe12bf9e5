//! Embedded photograph checks.
//!
//! Photographs travel as Base64 text. The payload must decode, stay under the size limit
//! and be an image the `image` crate can read whose sides are longer than
//! [`MIN_PHOTO_DIMENSION`] pixels. Only the first failure is reported.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use rrf_types::is_blank;

use crate::constants::{MAX_PHOTO_BYTES, MIN_PHOTO_DIMENSION};
use crate::identity::Identity;
use crate::{IssueKind, ValidationResult};

/// Standard alphabet, padding optional.
const PHOTO_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Validate a Base64 encoded photograph.
pub fn validate_photo(identity: &Identity, photo: &str, result: &mut ValidationResult) {
    if is_blank(photo) {
        result.add_error(
            IssueKind::MissingField,
            format!("Photo for individual '{identity}' is empty (zero-length file)"),
        );
        return;
    }

    // Encoders wrap long payloads over several lines.
    let compact: String = photo.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = match PHOTO_ENGINE.decode(compact.as_bytes()) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!("photo for individual {identity} is not base64: {err}");
            result.add_error(
                IssueKind::MalformedPayload,
                format!("Photo for individual '{identity}' cannot be decoded (base64)"),
            );
            return;
        }
    };

    if bytes.is_empty() {
        result.add_error(
            IssueKind::MissingField,
            format!("Photo for individual '{identity}' is empty (zero-length file)"),
        );
        return;
    }
    if bytes.len() >= MAX_PHOTO_BYTES {
        result.add_error(
            IssueKind::InvalidValue,
            format!(
                "Photo for individual '{identity}' is too large ({} bytes, limit 50 MB)",
                bytes.len()
            ),
        );
        return;
    }

    match image::load_from_memory(&bytes) {
        Ok(image) => {
            let (width, height) = (image.width(), image.height());
            if width <= MIN_PHOTO_DIMENSION || height <= MIN_PHOTO_DIMENSION {
                result.add_error(
                    IssueKind::InvalidValue,
                    format!("Photo for individual '{identity}' is too small ({width} x {height})"),
                );
            }
        }
        Err(err) => {
            result.add_error(
                IssueKind::MalformedPayload,
                format!(
                    "Photo for individual '{identity}' cannot be read: {err}. Is that a valid image format?"
                ),
            );
        }
    }
}
