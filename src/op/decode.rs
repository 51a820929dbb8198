/// Decoding of `op` stdout into typed records.
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::args::{begin_marker, end_marker};
use super::errors::OpError;

/// Decode the whole buffer as one JSON value (object or array).
///
/// # Errors
///
/// Returns `OpError::Decode` if the buffer is not valid JSON of shape `T`.
pub fn decode<T: DeserializeOwned>(stdout: &[u8]) -> Result<T, OpError> {
    Ok(serde_json::from_slice(stdout)?)
}

/// Decode a batch response.
///
/// Tries a single JSON array first. If that fails, falls back to reading one JSON
/// value after another (newline-delimited or simply concatenated objects) until the
/// input is exhausted. A failure anywhere in the fallback fails the whole batch.
///
/// # Errors
///
/// Returns `OpError::Decode` carrying the fallback's error when neither shape parses.
pub fn decode_batch<T: DeserializeOwned>(stdout: &[u8]) -> Result<Vec<T>, OpError> {
    match serde_json::from_slice::<Vec<T>>(stdout) {
        Ok(items) => Ok(items),
        Err(array_err) => {
            tracing::debug!(error = %array_err, "batch output is not a JSON array, decoding as a stream");
            serde_json::Deserializer::from_slice(stdout)
                .into_iter::<T>()
                .collect::<Result<Vec<T>, _>>()
                .map_err(OpError::from)
        }
    }
}

/// `op read` output: UTF-8 text with surrounding whitespace trimmed.
#[must_use]
pub fn decode_text(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout).trim().to_owned()
}

/// Split `op inject` output back into one value per reference.
///
/// # Errors
///
/// Returns `OpError::MissingSecret` for the first reference whose delimited value
/// is not present in the output.
pub fn decode_injected<S: AsRef<str>>(
    stdout: &[u8],
    references: &[S],
) -> Result<BTreeMap<String, String>, OpError> {
    let text = String::from_utf8_lossy(stdout);
    let mut values = BTreeMap::new();
    for (i, reference) in references.iter().enumerate() {
        let reference = reference.as_ref();
        let missing = || OpError::MissingSecret {
            reference: reference.to_owned(),
        };
        let begin = begin_marker(i);
        let start = text.find(&begin).ok_or_else(missing)? + begin.len();
        let len = text[start..].find(&end_marker(i)).ok_or_else(missing)?;
        values.insert(reference.to_owned(), text[start..start + len].trim().to_owned());
    }
    Ok(values)
}
