//! Bearer token verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use arbor_core::config::AuthConfig;
use arbor_core::error::AppError;

use super::Principal;
use super::claims::ProviderClaims;

/// Verifies HS256 tokens from the identity provider and yields principals.
#[derive(Clone)]
pub struct PrincipalDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for PrincipalDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl PrincipalDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_audience(&[config.jwt_audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a bearer token.
    ///
    /// Checks signature, expiration, and audience.
    pub fn decode(&self, token: &str) -> Result<Principal, AppError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        let result = decode::<ProviderClaims>(token, &self.decoding_key, &self.validation);
        let data = result.map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::authentication("Token has expired")
            }
            _ => {
                debug!(error = %e, "Rejected bearer token");
                AppError::authentication("Invalid token")
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AppError::authentication("Invalid token"));
        }

        Ok(Principal::from(data.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::error::ErrorKind;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_audience: "authenticated".to_string(),
            leeway_seconds: 0,
        }
    }

    fn mint(secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_an_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_decodes_valid_token_with_profile() {
        let token = mint(
            "test-secret",
            json!({
                "sub": "5b7c0c7e-principal",
                "aud": "authenticated",
                "exp": in_an_hour(),
                "email": "ada@example.com",
                "user_metadata": { "full_name": "Ada", "avatar_url": "avatars/ada.png" }
            }),
        );
        let principal = PrincipalDecoder::new(&config())
            .decode(&format!("Bearer {token}"))
            .unwrap();
        assert_eq!(principal.id, "5b7c0c7e-principal");
        assert_eq!(principal.email.as_deref(), Some("ada@example.com"));
        assert_eq!(principal.full_name.as_deref(), Some("Ada"));
        assert_eq!(principal.avatar_url.as_deref(), Some("avatars/ada.png"));
    }

    #[test]
    fn test_oauth_metadata_keys_fill_profile() {
        let token = mint(
            "test-secret",
            json!({
                "sub": "p2",
                "aud": "authenticated",
                "exp": in_an_hour(),
                "user_metadata": { "name": "Grace", "picture": "https://img/grace" }
            }),
        );
        let principal = PrincipalDecoder::new(&config()).decode(&token).unwrap();
        assert_eq!(principal.full_name.as_deref(), Some("Grace"));
        assert_eq!(principal.avatar_url.as_deref(), Some("https://img/grace"));
        assert_eq!(principal.email, None);
    }

    #[test]
    fn test_rejects_expired_token() {
        let exp = chrono::Utc::now().timestamp() - 600;
        let token = mint(
            "test-secret",
            json!({ "sub": "p", "aud": "authenticated", "exp": exp }),
        );
        let err = PrincipalDecoder::new(&config()).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_rejects_wrong_secret_and_audience() {
        let decoder = PrincipalDecoder::new(&config());

        let forged = mint(
            "other-secret",
            json!({ "sub": "p", "aud": "authenticated", "exp": in_an_hour() }),
        );
        assert_eq!(decoder.decode(&forged).unwrap_err().message, "Invalid token");

        let wrong_aud = mint(
            "test-secret",
            json!({ "sub": "p", "aud": "service_role", "exp": in_an_hour() }),
        );
        assert_eq!(decoder.decode(&wrong_aud).unwrap_err().message, "Invalid token");

        assert!(decoder.decode("not-a-token").is_err());
    }
}
