//! Response decoding boundary
//!
//! Decoders are pure functions from response bytes to typed results; this
//! helper is the JSON entry point used once per API call after the pipeline
//! returns a successful response. Decode failures are always
//! distinguishable from transport failures.

use serde::de::DeserializeOwned;

use crate::api::transport::ApiResponse;
use crate::error::{ClientError, Result};

/// Decode a response body as JSON into `T`.
///
/// # Errors
/// Returns `ClientError::Decode` (whose message contains `wrong json`)
/// carrying the response and the parser's detail when the body is not the
/// JSON it was required to be.
pub fn decode_json<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|err| ClientError::Decode {
        detail: err.to_string(),
        response: Box::new(response.clone()),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Report {
        id: u64,
        name: String,
    }

    fn response(body: &str) -> ApiResponse {
        ApiResponse { status: 200, headers: HashMap::new(), body: body.as_bytes().to_vec() }
    }

    #[test]
    fn decodes_typed_results() {
        let report: Report =
            decode_json(&response(r#"{"id":7,"name":"weekly"}"#)).expect("should decode");
        assert_eq!(report, Report { id: 7, name: "weekly".to_string() });
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_json::<Report>(&response("<html>oops</html>")).expect_err("should fail");
        assert!(err.to_string().contains("wrong json"));
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn decode_error_keeps_the_response() {
        let err = decode_json::<Report>(&response("nope")).expect_err("should fail");
        assert_eq!(err.response().map(|r| r.status), Some(200));
    }
}
