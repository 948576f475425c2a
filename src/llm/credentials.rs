//! Credential resolution for the two backends.
//!
//! - CAII takes a JWT document (`{"token": "..."}`) from the run settings or,
//!   failing that, from the `CDP_TOKEN` environment variable.
//! - Bedrock takes a bearer API key from `AWS_BEARER_TOKEN_BEDROCK`.

use super::RemoteCallError;
use serde::Deserialize;

/// Environment variable holding the CAII JWT document.
pub const CDP_TOKEN_ENV: &str = "CDP_TOKEN";

/// Environment variable holding the Bedrock API key.
pub const BEDROCK_TOKEN_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

#[derive(Deserialize)]
struct JwtDocument {
    token: String,
}

/// Extract the bearer token from a JWT document.
pub fn parse_jwt_token(raw: &str) -> Result<String, RemoteCallError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        RemoteCallError::Credentials(format!("invalid JWT format, expected valid JSON: {}", e))
    })?;
    let doc: JwtDocument = serde_json::from_value(value).map_err(|_| {
        RemoteCallError::Credentials(
            "invalid JWT structure, expected a 'token' key in the JSON document".to_string(),
        )
    })?;
    Ok(doc.token)
}

/// Resolve the CAII API key from an explicit JWT or the environment.
pub fn caii_api_key(jwt: Option<&str>) -> Result<String, RemoteCallError> {
    if let Some(jwt) = jwt.filter(|j| !j.trim().is_empty()) {
        tracing::debug!("using JWT from run settings");
        return parse_jwt_token(jwt);
    }

    let raw = std::env::var(CDP_TOKEN_ENV).map_err(|_| {
        RemoteCallError::Credentials(format!(
            "no JWT provided and {} environment variable not set",
            CDP_TOKEN_ENV
        ))
    })?;
    tracing::debug!("using {} from environment", CDP_TOKEN_ENV);
    parse_jwt_token(&raw)
}

/// Resolve the Bedrock API key from the environment.
pub fn bedrock_api_key() -> Result<String, RemoteCallError> {
    match std::env::var(BEDROCK_TOKEN_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(RemoteCallError::Credentials(format!(
            "{} environment variable not set",
            BEDROCK_TOKEN_ENV
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_jwt_token() {
        assert_eq!(parse_jwt_token(r#"{"token": "abc123"}"#).unwrap(), "abc123");
    }

    #[test]
    fn test_parse_jwt_rejects_non_json() {
        let err = parse_jwt_token("not json").unwrap_err();
        assert!(err.to_string().contains("expected valid JSON"));
    }

    #[test]
    fn test_parse_jwt_rejects_missing_token_key() {
        let err = parse_jwt_token(r#"{"access": "abc"}"#).unwrap_err();
        assert!(err.to_string().contains("'token' key"));
    }

    #[test]
    #[serial]
    fn test_explicit_jwt_wins_over_environment() {
        unsafe { std::env::set_var(CDP_TOKEN_ENV, r#"{"token": "from-env"}"#) };
        let key = caii_api_key(Some(r#"{"token": "explicit"}"#)).unwrap();
        unsafe { std::env::remove_var(CDP_TOKEN_ENV) };
        assert_eq!(key, "explicit");
    }

    #[test]
    #[serial]
    fn test_caii_key_from_environment() {
        unsafe { std::env::set_var(CDP_TOKEN_ENV, r#"{"token": "from-env"}"#) };
        let key = caii_api_key(None).unwrap();
        unsafe { std::env::remove_var(CDP_TOKEN_ENV) };
        assert_eq!(key, "from-env");
    }

    #[test]
    #[serial]
    fn test_caii_key_missing_everywhere() {
        unsafe { std::env::remove_var(CDP_TOKEN_ENV) };
        let err = caii_api_key(Some("  ")).unwrap_err();
        assert!(err.to_string().contains("CDP_TOKEN"));
    }

    #[test]
    #[serial]
    fn test_bedrock_key() {
        unsafe { std::env::remove_var(BEDROCK_TOKEN_ENV) };
        assert!(bedrock_api_key().is_err());

        unsafe { std::env::set_var(BEDROCK_TOKEN_ENV, "bedrock-key") };
        let key = bedrock_api_key().unwrap();
        unsafe { std::env::remove_var(BEDROCK_TOKEN_ENV) };
        assert_eq!(key, "bedrock-key");
    }
}
