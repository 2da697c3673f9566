//! Host inputs: base64 documents and JSON region lists.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{DecodeError, RegionParseError};
use crate::model::AnnotationRegion;

/// Standard alphabet, padding optional (browsers' `atob` accepts both).
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Strip a `data:<mime>;base64,` prefix if present.
fn strip_data_url(input: &str) -> &str {
    if input.starts_with("data:") {
        if let Some(idx) = input.find(";base64,") {
            return &input[idx + ";base64,".len()..];
        }
    }
    input
}

/// Decode a host-supplied base64 document.
///
/// Accepts plain base64 or a data URL; ASCII whitespace anywhere is ignored.
/// Returns `Ok(None)` for an empty input, which means "no document".
pub fn decode_document(input: &str) -> Result<Option<Vec<u8>>, DecodeError> {
    let payload = strip_data_url(input.trim());
    let cleaned: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if cleaned.is_empty() {
        log::debug!("Empty document input");
        return Ok(None);
    }

    let bytes = LENIENT_BASE64.decode(cleaned.as_bytes())?;
    log::debug!("Decoded {} document bytes", bytes.len());
    Ok(if bytes.is_empty() { None } else { Some(bytes) })
}

/// Parse a host region list.
///
/// A value that is not a JSON array yields an empty list, matching how the
/// viewers treat a missing or unset binding.
pub fn parse_regions(json: &str) -> Result<Vec<AnnotationRegion>, RegionParseError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value = serde_json::from_str(json)?;
    regions_from_value(value)
}

/// Convert an already-parsed JSON value into regions.
pub fn regions_from_value(
    value: serde_json::Value,
) -> Result<Vec<AnnotationRegion>, RegionParseError> {
    let serde_json::Value::Array(items) = value else {
        log::debug!("Region input is not an array, treating as empty");
        return Ok(Vec::new());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| RegionParseError::InvalidRegion { index, source })
        })
        .collect()
}
