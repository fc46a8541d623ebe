use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Account;
use crate::error::Error;

#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub expiry_hours: i64,
    pub issuer: String,
}

impl TokenConfig {
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-before-deploying".to_string()),
            expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            issuer: "hackney".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    fn new(account: &Account, config: &TokenConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiry_hours);

        Self {
            sub: account.id,
            role: account.role.name(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

pub fn create(account: &Account, config: &TokenConfig) -> Result<String, Error> {
    let claims = Claims::new(account, config);

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify(token: &str, config: &TokenConfig) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    fn config() -> TokenConfig {
        TokenConfig {
            secret: "test-secret".into(),
            expiry_hours: 1,
            issuer: "hackney".into(),
        }
    }

    #[test]
    fn create_and_verify_round_trip() {
        let account =
            Account::new("Rafi".into(), "rafi@example.com".into(), Role::Driver).unwrap();

        let token = create(&account, &config()).unwrap();
        let claims = verify(&token, &config()).unwrap();

        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.role, "driver");
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify("not-a-token", &config()).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let account =
            Account::new("Rafi".into(), "rafi@example.com".into(), Role::Driver).unwrap();

        let token = create(&account, &config()).unwrap();

        let mut other = config();
        other.secret = "different-secret".into();

        assert!(verify(&token, &other).is_err());
    }
}
