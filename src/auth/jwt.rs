use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
    models::domain::Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("token not found")]
    MissingCredential,

    #[error("user unauthorized")]
    InvalidCredential,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme must be `Bearer` (any case) followed by exactly one token
/// segment.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential)?;
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MissingCredential),
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, expiration_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation: Validation::default(),
            expiration_hours,
        }
    }

    /// Signs a token for an account. Issuance lives with the identity
    /// provider; the server only needs this to mint tokens for tooling.
    pub fn create_token(&self, email: &str, role: Role) -> AppResult<String> {
        let claims = Claims::new(email, role, self.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => log::debug!("rejected expired token"),
                    ErrorKind::InvalidSignature => log::warn!("rejected token with bad signature"),
                    _ => log::debug!("rejected token: {}", e),
                }
                AuthError::InvalidCredential
            })
    }

    /// Header in, verified claims out.
    pub fn verify(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let token = parse_bearer(authorization)?;
        self.validate_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::Utc;

    fn service() -> JwtService {
        let config = Config::test_config();
        JwtService::new(&config.jwt_secret, 1)
    }

    #[test]
    fn test_jwt_create_and_validate() {
        let jwt_service = service();
        let token = jwt_service.create_token("ada@example.com", Role::Instructor).unwrap();

        assert!(!token.is_empty());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "ada@example.com");
        assert_eq!(claims.role, Role::Instructor);
    }

    #[test]
    fn test_jwt_invalid_token() {
        let result = service().validate_token("invalid.token.here");
        assert_eq!(result, Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_jwt_wrong_secret() {
        let other = JwtService::new(&SecretString::from("another_secret".to_string()), 1);
        let token = other.create_token("ada@example.com", Role::Student).unwrap();

        assert_eq!(service().validate_token(&token), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_jwt_expired_token() {
        let jwt_service = service();
        let past = Utc::now().timestamp() as usize - 3600;
        let claims = Claims {
            sub: "ada@example.com".to_string(),
            role: Role::Student,
            iat: past - 3600,
            exp: past,
        };
        let token = encode(&Header::default(), &claims, &jwt_service.encoding_key).unwrap();

        assert_eq!(jwt_service.validate_token(&token), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_parse_bearer_accepts_any_case() {
        assert_eq!(parse_bearer(Some("Bearer abc")), Ok("abc"));
        assert_eq!(parse_bearer(Some("bearer abc")), Ok("abc"));
        assert_eq!(parse_bearer(Some("BEARER\tabc\n")), Ok("abc"));
    }

    #[test]
    fn test_parse_bearer_rejects_malformed_headers() {
        assert_eq!(parse_bearer(None), Err(AuthError::MissingCredential));
        assert_eq!(parse_bearer(Some("")), Err(AuthError::MissingCredential));
        assert_eq!(parse_bearer(Some("Bearer")), Err(AuthError::MissingCredential));
        assert_eq!(parse_bearer(Some("Basic abc")), Err(AuthError::MissingCredential));
        assert_eq!(parse_bearer(Some("Bearer abc def")), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_verify_runs_both_steps() {
        let jwt_service = service();
        let token = jwt_service.create_token("sam@example.com", Role::Student).unwrap();
        let header = format!("Bearer {}", token);

        let claims = jwt_service.verify(Some(&header)).unwrap();
        assert_eq!(claims.email(), "sam@example.com");
        assert_eq!(jwt_service.verify(None), Err(AuthError::MissingCredential));
        assert_eq!(
            jwt_service.verify(Some("Bearer nope")),
            Err(AuthError::InvalidCredential)
        );
    }
}
