// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::caller::Caller};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Display name of the user.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// Resolves the caller; a subject that is not a positive user id is rejected.
    pub fn caller(&self) -> Result<Caller, AppError> {
        let user_id = self
            .sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(AppError::AuthRequired)?;

        Ok(Caller {
            user_id,
            name: self.name.clone(),
            email: self.email.clone(),
        })
    }
}

/// Signs a token for the caller that expires after `expiration_seconds`.
pub fn sign_jwt(caller: &Caller, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: caller.user_id.to_string(),
        name: caller.name.clone(),
        email: caller.email.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthRequired)?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects the
/// resolved [`Caller`] into the request extensions. Anything else is answered
/// with 401 `auth_required` before the handler runs.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::AuthRequired)?;

    let caller = verify_jwt(token, &config.jwt_secret)?.caller()?;
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> Caller {
        Caller {
            user_id: 42,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn sign_then_verify_resolves_caller() {
        let token = sign_jwt(&caller(), "secret", 60).unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.caller().unwrap(), caller());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(&caller(), "secret", 60).unwrap();
        assert!(matches!(verify_jwt(&token, "other"), Err(AppError::AuthRequired)));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let claims = Claims {
            sub: "someone".into(),
            name: String::new(),
            email: String::new(),
            exp: 0,
        };
        assert!(matches!(claims.caller(), Err(AppError::AuthRequired)));
    }
}
