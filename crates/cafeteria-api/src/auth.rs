use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";
const EXPECTED_ISSUER: &str = "ssu.blue";
const EXPECTED_SUBJECT: i64 = -1;

#[derive(Debug, Deserialize)]
struct WriteClaims {
    iss: Option<String>,
    sub: Option<Value>,
}

/// Proof that the request carries a valid write token.
///
/// Add it as a handler parameter to guard mutating routes:
///
/// ```ignore
/// async fn create(_auth: WriteAuth, ...) -> Result<..., AppError> { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WriteAuth;

impl FromRequestParts<AppState> for WriteAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;
        let header = header.to_str().map_err(|_| invalid_token())?;
        verify_write_token(header, state.jwt_secret.as_deref())
    }
}

fn invalid_token() -> AppError {
    AppError::InvalidToken("Invalid or expired token.".into())
}

/// Check an `Authorization` header value against the write-token rules
pub fn verify_write_token(header: &str, secret: Option<&str>) -> Result<WriteAuth, AppError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(invalid_token)?;

    let secret = secret
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidToken("Invalid token configuration.".into()))?;

    let mut validation = Validation::new(Algorithm::HS256);
    // `exp` is checked when present but not required
    validation.required_spec_claims.clear();

    let claims = decode::<WriteClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected write token");
        invalid_token()
    })?
    .claims;

    let subject = match &claims.sub {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    if claims.iss.as_deref() != Some(EXPECTED_ISSUER) || subject != Some(EXPECTED_SUBJECT) {
        return Err(invalid_token());
    }

    Ok(WriteAuth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn token(claims: Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn bearer(claims: Value) -> String {
        format!("Bearer {}", token(claims, SECRET))
    }

    fn rejection_message(result: Result<WriteAuth, AppError>) -> String {
        match result {
            Err(AppError::InvalidToken(msg)) => msg,
            other => panic!("expected invalid token, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_numeric_and_string_subject() {
        for sub in [json!(-1), json!("-1")] {
            let header = bearer(json!({ "iss": "ssu.blue", "sub": sub }));
            assert!(verify_write_token(&header, Some(SECRET)).is_ok());
        }
    }

    #[test]
    fn test_rejects_wrong_issuer_or_subject() {
        for claims in [
            json!({ "iss": "example.com", "sub": -1 }),
            json!({ "iss": "ssu.blue", "sub": 1 }),
            json!({ "iss": "ssu.blue", "sub": "abc" }),
            json!({ "sub": -1 }),
        ] {
            assert_eq!(
                rejection_message(verify_write_token(&bearer(claims), Some(SECRET))),
                "Invalid or expired token."
            );
        }
    }

    #[test]
    fn test_rejects_bad_signature() {
        let header = format!(
            "Bearer {}",
            token(json!({ "iss": "ssu.blue", "sub": -1 }), "other-secret")
        );
        assert!(verify_write_token(&header, Some(SECRET)).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let header = bearer(json!({ "iss": "ssu.blue", "sub": -1, "exp": 1_000_000 }));
        assert_eq!(
            rejection_message(verify_write_token(&header, Some(SECRET))),
            "Invalid or expired token."
        );
    }

    #[test]
    fn test_rejects_non_bearer_and_empty_tokens() {
        assert!(verify_write_token("Basic abc", Some(SECRET)).is_err());
        assert!(verify_write_token("Bearer   ", Some(SECRET)).is_err());
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let header = bearer(json!({ "iss": "ssu.blue", "sub": -1 }));
        assert_eq!(
            rejection_message(verify_write_token(&header, None)),
            "Invalid token configuration."
        );
    }
}
