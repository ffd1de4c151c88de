use super::IngestError;

/// Strict UTF-8 decode. Invalid sequences are an error, never replaced.
pub fn decode(bytes: &[u8]) -> Result<String, IngestError> {
    Ok(String::from_utf8(bytes.to_vec())?)
}
