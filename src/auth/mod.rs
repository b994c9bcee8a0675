use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Token payload. The subject field is `user_id`, kept as an opaque string.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub exp: i64,
    pub iat: i64,
}

/// Classified verification failures. Only tokens that were well-formed
/// enough to attempt decoding end up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Expired,
    Invalid,
}

/// Extract and verify the bearer credential from request headers.
///
/// Returns `(identity, failure)`:
/// - no `Authorization` header, or a malformed one -> `(None, None)`;
///   callers that allow anonymous access proceed without an identity
/// - verified token -> `(Some(user_id), None)`
/// - expired token -> `(None, Some(Expired))`
/// - bad signature / malformed payload -> `(None, Some(Invalid))`
///
/// Pure computation over the headers and the injected secret; safe to call
/// concurrently without coordination.
pub fn verify_bearer(headers: &HeaderMap, secret: &str) -> (Option<String>, Option<AuthFailure>) {
    let token = match extract_bearer_token(headers) {
        Some(token) => token,
        None => return (None, None),
    };

    match validate_token(&token, secret) {
        Ok(claims) => {
            debug!(user_id = %claims.user_id, "Token verified");
            (Some(claims.user_id), None)
        }
        Err(failure) => (None, Some(failure)),
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Absent and malformed headers are both treated as anonymous rather than
/// errors, matching the public-view endpoints that admit anonymous viewers.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = match headers.get(AUTHORIZATION) {
        Some(value) => value,
        None => {
            debug!("No Authorization header present");
            return None;
        }
    };

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => {
            debug!("Authorization header is not valid ASCII");
            return None;
        }
    };

    let parts: Vec<&str> = auth_str.split(' ').collect();
    if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") || parts[1].is_empty() {
        debug!("Malformed Authorization header");
        return None;
    }

    Some(parts[1].to_string())
}

/// Decode and verify the token against the server-held secret. HS256 only.
fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthFailure> {
    if secret.is_empty() {
        warn!("JWT secret not configured; rejecting token");
        return Err(AuthFailure::Invalid);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            debug!("Token expired");
            Err(AuthFailure::Expired)
        }
        Err(e) => {
            debug!(error = %e, "Token invalid");
            Err(AuthFailure::Invalid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret";

    fn mint(user_id: &str, exp_offset_secs: i64, secret: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            exp: (now + Duration::seconds(exp_offset_secs)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        let headers = HeaderMap::new();
        assert_eq!(verify_bearer(&headers, SECRET), (None, None));
    }

    #[test]
    fn malformed_headers_are_anonymous() {
        for value in ["Token abc", "Bearer", "Bearer ", "Bearer a b", "abc"] {
            let headers = headers_with(value);
            assert_eq!(verify_bearer(&headers, SECRET), (None, None), "value: {value:?}");
        }
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let token = mint("u-1", 3600, SECRET);
        let headers = headers_with(&format!("bearer {}", token));
        let (identity, failure) = verify_bearer(&headers, SECRET);
        assert_eq!(identity.as_deref(), Some("u-1"));
        assert_eq!(failure, None);
    }

    #[test]
    fn valid_token_yields_identity() {
        let token = mint("user-42", 3600, SECRET);
        let headers = headers_with(&format!("Bearer {}", token));
        let (identity, failure) = verify_bearer(&headers, SECRET);
        assert_eq!(identity.as_deref(), Some("user-42"));
        assert_eq!(failure, None);
    }

    #[test]
    fn expired_token_is_classified() {
        // Well past the default decode leeway
        let token = mint("user-42", -7200, SECRET);
        let headers = headers_with(&format!("Bearer {}", token));
        assert_eq!(verify_bearer(&headers, SECRET), (None, Some(AuthFailure::Expired)));
    }

    #[test]
    fn wrong_signature_is_invalid() {
        let token = mint("user-42", 3600, "some-other-secret");
        let headers = headers_with(&format!("Bearer {}", token));
        assert_eq!(verify_bearer(&headers, SECRET), (None, Some(AuthFailure::Invalid)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let headers = headers_with("Bearer not.a.jwt");
        assert_eq!(verify_bearer(&headers, SECRET), (None, Some(AuthFailure::Invalid)));
    }

    #[test]
    fn empty_secret_rejects_all_tokens() {
        let token = mint("user-42", 3600, SECRET);
        let headers = headers_with(&format!("Bearer {}", token));
        assert_eq!(verify_bearer(&headers, ""), (None, Some(AuthFailure::Invalid)));
    }
}
