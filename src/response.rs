//! Response normalization: envelope unwrapping and error-body decoding.
//!
//! Success bodies usually arrive wrapped as `{"data": ...}`, but some
//! endpoints return the payload bare (a plain list or string). Error bodies
//! are just as inconsistent: sometimes `{"message": ...}`, sometimes plain
//! text. Both paths are handled here so the rest of the SDK sees one shape.

use serde_json::Value;

use crate::error::{classify, Error, ErrorKind, Result};
use crate::transport::RawResponse;

/// Normalize a JSON API response.
///
/// For 2xx: decode JSON and return the `data` field when the envelope is
/// present, otherwise the whole decoded body. For anything else: extract the
/// error message (JSON `message` field, falling back to the raw text) and
/// classify the status into the error taxonomy.
pub(crate) fn normalize(raw: RawResponse) -> Result<Value> {
    if raw.is_success() {
        let value: Value = serde_json::from_slice(raw.body())
            .map_err(|e| Error::with_source(ErrorKind::Json(e.to_string()), e))?;
        return Ok(unwrap_envelope(value));
    }
    Err(Error::new(classify(raw.status(), error_message(&raw))))
}

/// Check a raw-byte response for an error status without touching the body
/// on success.
pub(crate) fn check_bytes(raw: RawResponse) -> Result<bytes::Bytes> {
    if raw.is_success() {
        return Ok(raw.into_body());
    }
    Err(Error::new(classify(raw.status(), error_message(&raw))))
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Best-effort error message from a failure body.
fn error_message(raw: &RawResponse) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(raw.body()) {
        if let Some(Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    raw.text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crate::transport::RawResponse;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse::new(status, Bytes::copy_from_slice(body.as_bytes()))
    }

    #[test]
    fn unwraps_data_envelope() {
        let value = normalize(raw(200, r#"{"data": {"id": 7}}"#)).unwrap();
        assert_eq!(value, serde_json::json!({"id": 7}));
    }

    #[test]
    fn bare_list_passes_through() {
        let value = normalize(raw(200, "[1,2,3]")).unwrap();
        assert_eq!(value, serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn bare_string_passes_through() {
        let value = normalize(raw(200, r#""success""#)).unwrap();
        assert_eq!(value, serde_json::json!("success"));
    }

    #[test]
    fn object_without_data_key_passes_through() {
        let value = normalize(raw(200, r#"{"allowed": true}"#)).unwrap();
        assert_eq!(value, serde_json::json!({"allowed": true}));
    }

    #[test]
    fn invalid_json_on_success_is_json_error() {
        let err = normalize(raw(200, "<html>gateway</html>")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Json(_)));
    }

    #[test]
    fn error_message_from_json_body() {
        let err = normalize(raw(404, r#"{"message": "site not found"}"#)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "[404] not found: site not found");
    }

    #[test]
    fn error_message_falls_back_to_raw_text() {
        let err = normalize(raw(500, "upstream exploded")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Server { .. }));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn bytes_path_skips_json_decoding() {
        let body = check_bytes(RawResponse::new(200, Bytes::from_static(b"\x1f\x8b raw tar")))
            .unwrap();
        assert_eq!(&body[..], b"\x1f\x8b raw tar");
    }

    #[test]
    fn bytes_path_still_classifies_errors() {
        let err = check_bytes(raw(404, r#"{"message": "no such backup"}"#)).unwrap_err();
        assert!(err.is_not_found());
    }
}
