//! Interpretation of the ES feeder response envelope.

use serde_json::Value;
use tracing::{error, info};

use resource_processor_shared::ChallengeId;

use crate::errors::ReindexError;

/// Decide whether a re-index succeeded from the raw response body.
///
/// The body is expected to look like `{"result": {"status": 200, "success": true}}`.
/// Only `result.status` is authoritative: it must be present, a number or a
/// numeric string, and in `[200, 300)`. Anything else, including a body that is not JSON, is a
/// [`ReindexError::Rejected`] carrying the raw body. The body is logged before
/// the error is returned.
pub fn check_response(challenge_id: ChallengeId, body: &[u8]) -> Result<(), ReindexError> {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let status = parsed
        .as_ref()
        .and_then(|value| value.pointer("/result/status"))
        .and_then(status_code);

    match status {
        Some(status) if (200.0..300.0).contains(&status) => {
            info!(
                challenge_id = %challenge_id,
                "Successfully updated challenge details of id {} in Elasticsearch.",
                challenge_id
            );
            Ok(())
        }
        _ => {
            let raw = String::from_utf8_lossy(body).into_owned();
            let pretty = parsed
                .as_ref()
                .and_then(|value| serde_json::to_string_pretty(value).ok())
                .unwrap_or_else(|| raw.clone());
            error!(
                challenge_id = %challenge_id,
                result_status = ?status,
                "{}",
                pretty
            );
            Err(ReindexError::rejected(challenge_id, raw))
        }
    }
}

fn status_code(status: &Value) -> Option<f64> {
    match status {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(status: u16) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "result": { "success": (200..300).contains(&status), "status": status }
        }))
        .unwrap()
    }

    #[test]
    fn test_success_range() {
        let id = ChallengeId::new(30075466);
        assert!(check_response(id, &body(200)).is_ok());
        assert!(check_response(id, &body(204)).is_ok());
        assert!(check_response(id, &body(299)).is_ok());
    }

    #[test]
    fn test_status_outside_success_range() {
        let id = ChallengeId::new(222222);
        for status in [100, 199, 300, 404, 500] {
            let err = check_response(id, &body(status)).unwrap_err();
            assert_eq!(err.challenge_id(), Some(id));
        }
    }

    #[test]
    fn test_missing_status() {
        let id = ChallengeId::new(111111);
        let err = check_response(id, b"{}").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to update challenge details of id 111111 in Elasticsearch."
        );
        assert_eq!(err.response_body(), Some("{}"));
    }

    #[test]
    fn test_success_flag_alone_is_not_enough() {
        let id = ChallengeId::new(111111);
        let err = check_response(id, br#"{"result":{"success":true}}"#).unwrap_err();
        assert!(matches!(err, ReindexError::Rejected { .. }));
    }

    #[test]
    fn test_non_json_and_empty_bodies() {
        let id = ChallengeId::new(333333);
        assert!(check_response(id, b"").is_err());
        assert!(check_response(id, b"<html>Not Found</html>").is_err());
        assert!(check_response(id, br#"{"result":{"status":"ok"}}"#).is_err());
        assert!(check_response(id, br#"{"result":{"status":""}}"#).is_err());
    }

    #[test]
    fn test_numeric_string_status() {
        let id = ChallengeId::new(30075466);
        assert!(check_response(id, br#"{"result":{"status":"200"}}"#).is_ok());
        assert!(check_response(id, br#"{"result":{"status":" 201 "}}"#).is_ok());
        assert!(check_response(id, br#"{"result":{"status":"404"}}"#).is_err());
    }
}
