//! Raw credential extraction from request headers.
//!
//! Nothing here checks whether a token is genuine; that is left to
//! [`crate::jwt::JwtConfig`] or the refresh-token store.

use axum::http::{HeaderMap, header::AUTHORIZATION};

use super::errors::AuthError;

/// Header carrying the pre-shared service key for webhook calls.
pub const API_KEY_HEADER: &str = "x-api-key";

const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The header must split on single spaces into exactly two fields, the first
/// being the literal `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = header_str(headers, AUTHORIZATION.as_str())?;

    let mut fields = value.split(' ');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingOrMalformedCredential),
    }
}

/// Extract the service key from the `X-Api-Key` header.
///
/// The value must be a single non-empty field with no embedded spaces.
pub fn api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = header_str(headers, API_KEY_HEADER)?;

    let mut fields = value.split(' ');
    match (fields.next(), fields.next()) {
        (Some(key), None) if !key.is_empty() => Ok(key),
        _ => Err(AuthError::MissingOrMalformedCredential),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AuthError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingOrMalformedCredential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_simple() {
        let headers = with_authorization("Bearer abc123");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_token_no_scheme() {
        let headers = with_authorization("abc123");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingOrMalformedCredential)
        ));
    }

    #[test]
    fn test_bearer_token_empty() {
        let headers = with_authorization("");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingOrMalformedCredential)
        ));
    }

    #[test]
    fn test_bearer_token_no_header() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingOrMalformedCredential)
        ));
    }

    #[test]
    fn test_bearer_token_wrong_shape() {
        for value in [
            "Bearer",
            "Bearer ",
            "Bearer  abc123",
            "Bearer abc 123",
            "Basic abc123",
            "ApiKey abc123",
        ] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            assert!(
                bearer_token(&headers).is_err(),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_api_key_simple() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("f271c81ff7084ee5b99a5091b42d486e"));
        assert_eq!(api_key(&headers).unwrap(), "f271c81ff7084ee5b99a5091b42d486e");
    }

    #[test]
    fn test_api_key_missing_or_malformed() {
        assert!(api_key(&HeaderMap::new()).is_err());

        for value in ["", "two fields", " leading"] {
            let mut headers = HeaderMap::new();
            headers.insert(API_KEY_HEADER, HeaderValue::from_str(value).unwrap());
            assert!(api_key(&headers).is_err(), "{value:?} should be rejected");
        }
    }

    #[test]
    fn test_api_key_ignores_authorization() {
        let headers = with_authorization("Bearer abc123");
        assert!(api_key(&headers).is_err());
    }
}
