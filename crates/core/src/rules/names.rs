//! Personal name checks.

use std::sync::LazyLock;

use regex::Regex;
use rrf_types::{is_blank, Field};

use crate::identity::Identity;
use crate::{IssueKind, ValidationResult};

/// Decimal digits of any script; numeric letters and superscripts are not digits.
static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}$").expect("decimal digit pattern compiles"));

/// Check a name element.
///
/// A blank name is reported unless `allow_blank` is set. The characters are then scanned
/// and the first offending one produces a single error: a digit, an ISO control character
/// or a character with no printable form. Control and non-printable characters are shown
/// as `[decimal code]` in the message.
pub fn validate_name(
    identity: &Identity,
    field: &str,
    name: &Field<String>,
    allow_blank: bool,
    result: &mut ValidationResult,
) {
    let Some(name) = name.as_present() else {
        return;
    };

    if !allow_blank && is_blank(name) {
        result.add_error(
            IssueKind::MissingField,
            format!("Empty (or missing) '{field}' for individual {identity}"),
        );
    }

    for character in name.chars() {
        if is_decimal_digit(character) {
            result.add_error(
                IssueKind::InvalidValue,
                format!("Name '{field}' value for individual {identity} contains digit(s): {name}"),
            );
            break;
        } else if character.is_control() {
            result.add_error(
                IssueKind::InvalidValue,
                format!(
                    "Name '{field}' value for individual {identity} contains iso-control characters(s): {}",
                    encode(name, character)
                ),
            );
            break;
        } else if !is_printable(character) {
            result.add_error(
                IssueKind::InvalidValue,
                format!(
                    "Name '{field}' value for individual {identity} contains non-printable characters(s): {}",
                    encode(name, character)
                ),
            );
            break;
        }
    }
}

fn is_decimal_digit(character: char) -> bool {
    let mut buffer = [0; 4];
    DECIMAL_DIGIT.is_match(character.encode_utf8(&mut buffer))
}

/// Characters of the Unicode Specials block (U+FFF0..U+FFFF) have no printable form.
fn is_printable(character: char) -> bool {
    !character.is_control() && !('\u{FFF0}'..='\u{FFFF}').contains(&character)
}

fn encode(name: &str, character: char) -> String {
    name.replace(character, &format!("[{}]", u32::from(character)))
}
