//! Stateless bearer tokens: HS256 JWTs carrying a single `sub` claim.

use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Claim set: exactly one claim, the owning user's id.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: Uuid,
}

/// Issues and verifies access tokens with a secret injected at startup.
///
/// Tokens carry no expiry; validity is solely a function of signature
/// correctness, so the server needs no session table.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        // No exp claim is issued, so the verifier must not demand one.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Produce a signed token embedding `user_id`.
    ///
    /// # Errors
    /// Returns an error if JWT serialization fails.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        encode(&Header::default(), &Claims { sub: user_id }, &self.encoding)
            .context("failed to sign access token")
    }

    /// Resolve a token back into the user id it was issued for.
    ///
    /// Returns `None` for malformed tokens and bad signatures alike; the
    /// caller converts that into a 401.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims.sub),
            Err(err) => {
                debug!("Token verification failed: {err}");
                None
            }
        }
    }
}
