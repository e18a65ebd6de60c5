use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // subject (email)
    pub exp: usize,  // expiration time
    pub iat: usize,  // issued at
    pub user_id: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("stored token is not valid: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("stored token has expired, sign in again")]
    Expired,
}

/// Decode the claims of a stored bearer token without verifying the
/// signature. The client never holds the signing secret; the backend is the
/// authority on validity; this only reads identity and expiry locally.
pub fn decode_claims(token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Claims of a token that has not expired yet. Called before hitting any
/// authorized endpoint so the UI can bounce to sign-in early.
pub fn active_claims(token: &str) -> Result<Claims, AuthError> {
    let claims = decode_claims(token)?;
    if (claims.exp as i64) <= Utc::now().timestamp() {
        return Err(AuthError::Expired);
    }
    Ok(claims)
}
