use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::types::{ApiResponse, ApiResult, ApiSdkError, LwApiError};

/// Decode a response body into a JSON object, surfacing any application error it reports.
///
/// Only a non-empty `error_class` marks an application error. When it is set, `error` and
/// `full_message` have to be strings too or the response is treated as malformed.
pub fn decode_object(body: &[u8]) -> ApiResult<Map<String, Value>> {
    let decoded: Value = serde_json::from_slice(body)
        .map_err(|e| ApiSdkError::Decode(format!("response is not valid JSON: {}", e)))?;

    let Value::Object(object) = decoded else {
        return Err(ApiSdkError::Decode(
            "endpoint did not return the expected JSON structure".to_string(),
        ));
    };

    if let Some(error) = application_error(&object)? {
        debug!("API reported {}", error.error_class);
        return Err(ApiSdkError::Api(error));
    }

    Ok(object)
}

fn application_error(object: &Map<String, Value>) -> ApiResult<Option<LwApiError>> {
    let error_class = match object.get("error_class") {
        None => return Ok(None),
        Some(value) => string_field(value, "error_class")?,
    };

    if error_class.is_empty() {
        return Ok(None);
    }

    Ok(Some(LwApiError {
        message: required_string(object, "error")?,
        full_message: required_string(object, "full_message")?,
        error_class,
    }))
}

fn required_string(object: &Map<String, Value>, field: &str) -> ApiResult<String> {
    let value = object.get(field).ok_or_else(|| {
        ApiSdkError::Decode(format!("error response is missing the `{}` field", field))
    })?;
    string_field(value, field)
}

fn string_field(value: &Value, field: &str) -> ApiResult<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        ApiSdkError::Decode(format!("`{}` should be a string, found {}", field, value))
    })
}

/// Decode a response body into `target`, then report the error state it holds.
///
/// `target` is only overwritten once decoding succeeded.
pub fn decode_into<T>(body: &[u8], target: &mut T) -> ApiResult<()>
where
    T: DeserializeOwned + ApiResponse,
{
    *target = serde_json::from_slice(body)
        .map_err(|e| ApiSdkError::Decode(format!("response does not match the target: {}", e)))?;

    match target.api_error() {
        Some(error) => Err(ApiSdkError::Api(error)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_api_response;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct ZoneDetails {
        #[serde(flatten)]
        error: LwApiError,
        #[serde(default)]
        name: String,
        #[serde(default)]
        id: u64,
    }

    impl_api_response!(ZoneDetails, error);

    #[test]
    fn test_success_object_is_returned_whole() {
        let object = decode_object(br#"{"foo":"bar","uniq_id":"X"}"#).unwrap();
        assert_eq!(Value::Object(object), json!({"foo": "bar", "uniq_id": "X"}));
    }

    #[test]
    fn test_error_class_becomes_api_error() {
        let body = br#"{"error_class":"LW::Exception","error":"bad","full_message":"Bad thing happened"}"#;

        match decode_object(body) {
            Err(ApiSdkError::Api(error)) => {
                assert_eq!(error.error_class, "LW::Exception");
                assert_eq!(error.message, "bad");
                assert_eq!(error.full_message, "Bad thing happened");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_error_class_is_success() {
        let object = decode_object(br#"{"error_class":"","id":1}"#).unwrap();
        assert_eq!(object["id"], json!(1));
    }

    #[test]
    fn test_error_without_class_is_success() {
        let object = decode_object(br#"{"error":"looks bad","id":1}"#).unwrap();
        assert_eq!(object["error"], json!("looks bad"));
    }

    #[test]
    fn test_malformed_error_payloads_are_decode_errors() {
        let bodies: [&[u8]; 4] = [
            br#"{"error_class":42}"#,
            br#"{"error_class":"LW::Exception","full_message":"x"}"#,
            br#"{"error_class":"LW::Exception","error":"bad"}"#,
            br#"{"error_class":"LW::Exception","error":"bad","full_message":null}"#,
        ];

        for body in bodies {
            assert!(
                matches!(decode_object(body), Err(ApiSdkError::Decode(_))),
                "{}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_non_object_bodies_are_decode_errors() {
        assert!(matches!(decode_object(b"not json"), Err(ApiSdkError::Decode(_))));
        assert!(matches!(decode_object(b"[1,2,3]"), Err(ApiSdkError::Decode(_))));
        assert!(matches!(decode_object(b"\"text\""), Err(ApiSdkError::Decode(_))));
    }

    #[test]
    fn test_decode_into_populates_target() {
        let mut zone = ZoneDetails::default();
        decode_into(br#"{"id":1,"name":"Zone C"}"#, &mut zone).unwrap();

        assert_eq!(zone.id, 1);
        assert_eq!(zone.name, "Zone C");
    }

    #[test]
    fn test_decode_into_populates_target_and_reports_error() {
        let mut zone = ZoneDetails::default();
        let body = br#"{"error_class":"LW::Exception::RecordNotFound","error":"missing","full_message":"Zone 9 not found","id":9}"#;

        let err = decode_into(body, &mut zone).unwrap_err();

        assert_eq!(zone.id, 9);
        assert_eq!(zone.error.error_class, "LW::Exception::RecordNotFound");
        assert_eq!(err.api_error(), Some(&zone.error));
    }

    #[test]
    fn test_decode_into_shape_mismatch_leaves_target() {
        let mut zone = ZoneDetails { id: 3, ..Default::default() };

        let err = decode_into(br#"{"id":"not a number"}"#, &mut zone).unwrap_err();

        assert!(matches!(err, ApiSdkError::Decode(_)));
        assert_eq!(zone.id, 3);
    }
}
