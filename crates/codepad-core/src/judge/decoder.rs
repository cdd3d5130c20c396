//! Output decoding for judge result fields.
//!
//! The judge returns `stdout`, `stderr` and `compile_output` base64-encoded
//! on some paths and as plain text on others, with nothing in the payload
//! saying which. [`decode_field`] guesses: a value is taken as base64 only if
//! it uses the base64 alphabet, decodes cleanly, re-encodes to the same
//! characters (padding aside) and decodes to UTF-8 text.
//!
//! This is best-effort. Short plain strings that happen to be valid base64
//! (`"test"`, `"abcd"`) can be misread, and are only saved when their decoded
//! bytes are not UTF-8.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

/// Shown when none of the three streams has content.
pub const NO_OUTPUT: &str = "No output";

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn is_base64_alphabet(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=' || c.is_whitespace()
}

/// Bytes behind `raw` if it round-trips as base64, `None` otherwise.
///
/// Whitespace is ignored so that line-wrapped encodings are accepted.
pub fn decode_base64(raw: &str) -> Option<Vec<u8>> {
    if !raw.chars().all(is_base64_alphabet) {
        return None;
    }

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let unpadded = compact.trim_end_matches('=');

    let bytes = LENIENT.decode(unpadded).ok()?;
    let reencoded = STANDARD.encode(&bytes);

    (reencoded.trim_end_matches('=') == unpadded).then_some(bytes)
}

/// Decode one result field; absent fields become the empty string.
pub fn decode_field(field: Option<&str>) -> String {
    let Some(raw) = field else {
        return String::new();
    };

    match decode_base64(raw).map(String::from_utf8) {
        Some(Ok(text)) => text,
        _ => raw.to_string(),
    }
}

/// Reduce the three decoded streams to the one message shown to the user.
///
/// Compile output wins over stderr, which wins over stdout.
pub fn prioritize_output(compile_output: &str, stderr: &str, stdout: &str) -> String {
    [compile_output, stderr, stdout]
        .into_iter()
        .find(|stream| !stream.is_empty())
        .unwrap_or(NO_OUTPUT)
        .to_string()
}
