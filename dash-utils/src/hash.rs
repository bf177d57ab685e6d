use crate::jsonify;
use serde::Serialize;

pub fn u8s_from_str(input: &str) -> [u8; 32] {
    blake3::hash(input.as_bytes()).into()
}

/// Stable identity of a serializable value. Two values with the same canonical
/// JSON always share a fingerprint, regardless of map key order. Values that
/// cannot be serialized have no fingerprint.
pub fn fingerprint<T>(obj: &T) -> serde_json::Result<String>
where
    T: Serialize,
{
    Ok(hex::encode(u8s_from_str(&jsonify(obj)?)))
}
