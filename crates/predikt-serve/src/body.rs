use serde_json::{Map, Value};

/// Why a request body could not be used as a JSON object.
#[derive(Debug)]
pub enum BodyError {
    /// Blank body, `null`, `{}`, or any non-object JSON value.
    Empty,
    /// Not parseable as JSON at all.
    Invalid(serde_json::Error),
}

/// Parse a raw request body into a non-empty JSON object.
///
/// The content type header is not checked.
pub fn json_object(body: &[u8]) -> Result<Map<String, Value>, BodyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(BodyError::Empty);
    }
    match serde_json::from_slice::<Value>(body).map_err(BodyError::Invalid)? {
        Value::Object(map) if !map.is_empty() => Ok(map),
        _ => Err(BodyError::Empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_object() {
        let map = json_object(br#"{"from": "Recife (PE)", "time": 1.5}"#).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_empty_shapes() {
        for body in [&b""[..], b"   ", b"null", b"{}", b"[1,2]", b"42"] {
            assert!(matches!(json_object(body), Err(BodyError::Empty)), "{:?}", body);
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(json_object(b"{oops"), Err(BodyError::Invalid(_))));
    }
}
