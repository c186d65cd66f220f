//! JWT token service for admin sessions

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_EXPIRY_HOURS: i64 = 24;

/// Claims embedded in an admin bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin user ID
    pub sub: i64,
    /// Admin username
    pub username: String,
    /// Role the admin holds
    pub role_id: i64,
    /// Administrative flag; tokens without it are rejected by the guard
    pub is_admin: bool,
    /// Expiration (Unix timestamp seconds)
    pub exp: i64,
    /// Issued at (Unix timestamp seconds)
    pub iat: i64,
}

/// Create a signed token for an admin user
pub fn create_token(
    admin_id: i64,
    username: &str,
    role_id: i64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = AdminClaims {
        sub: admin_id,
        username: username.to_string(),
        role_id,
        is_admin: true,
        exp: (now + Duration::hours(TOKEN_EXPIRY_HOURS)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the decoded claims
pub fn validate_token(
    token: &str,
    secret: &str,
) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    const SECRET: &str = "test-secret-not-for-production-0123456789";

    #[test]
    fn token_round_trip() {
        let token = create_token(7, "ops_admin", 2, SECRET).expect("create token");
        let claims = validate_token(&token, SECRET).expect("validate token");

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "ops_admin");
        assert_eq!(claims.role_id, 2);
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(1, "root", 1, SECRET).expect("create token");
        let err = validate_token(&token, "a-completely-different-secret").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: 1,
            username: "root".into(),
            role_id: 1,
            is_admin: true,
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode");

        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }
}
