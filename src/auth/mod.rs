use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// HMAC algorithms accepted for signed tokens. Anything else (including
/// asymmetric schemes) is rejected before the signature is checked.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Identity of the authenticated caller, taken from the token's `user_id` claim.
///
/// Only the verifier creates these, so holding one means the token was valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CallerIdentity(i64);

impl CallerIdentity {
    pub fn id(&self) -> i64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn for_test(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subject identifier as issued by the identity service. It is sometimes
/// encoded as a JSON string holding a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    Numeric(i64),
    Text(String),
}

impl SubjectId {
    fn normalize(&self) -> Option<i64> {
        match self {
            SubjectId::Numeric(id) => Some(*id),
            SubjectId::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: SubjectId,
    /// NumericDate; fractional seconds are allowed
    pub exp: Option<f64>,
}

/// Reasons a bearer credential is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is required")]
    Missing,

    #[error("Invalid token format")]
    Malformed,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

/// Verify an `Authorization` header value against the signing key using the current time.
pub fn verify(authorization: Option<&str>, signing_key: &[u8]) -> Result<CallerIdentity, AuthError> {
    verify_at(authorization, signing_key, chrono::Utc::now().timestamp())
}

/// Verify an `Authorization` header value at a fixed instant (seconds since epoch).
pub fn verify_at(
    authorization: Option<&str>,
    signing_key: &[u8],
    now: i64,
) -> Result<CallerIdentity, AuthError> {
    let header = match authorization {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::Missing),
    };

    let token = extract_bearer_token(header)?;
    let claims = decode_claims(token, signing_key)?;

    let exp = claims.exp.ok_or(AuthError::Invalid)?;

    // The expiry instant itself counts as expired.
    if exp <= now as f64 {
        return Err(AuthError::Expired);
    }

    claims
        .user_id
        .normalize()
        .map(CallerIdentity)
        .ok_or(AuthError::Invalid)
}

fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    header.strip_prefix(BEARER_PREFIX).ok_or(AuthError::Malformed)
}

fn decode_claims(token: &str, signing_key: &[u8]) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    // Presence and value of `exp` are checked in verify_at, which also
    // accepts fractional and negative NumericDates.
    validation.set_required_spec_claims::<&str>(&[]);
    validation.validate_exp = false;
    validation.leeway = 0;

    let decoding_key = DecodingKey::from_secret(signing_key);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AuthError::Invalid
        })
}
