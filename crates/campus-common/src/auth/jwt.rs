//! Session tokens
//!
//! After the identity provider confirms a sign-in, the server mints its own
//! access/refresh pair with `jsonwebtoken`. The access token carries the
//! verified email so services receive an explicit [`Caller`].

use campus_core::Caller;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Profile id; a non-uuid subject fails decoding
    pub sub: Uuid,
    /// Verified email at sign-in time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// Identity to pass into service calls
    #[must_use]
    pub fn caller(&self) -> Caller {
        Caller::new(self.sub, self.email.clone())
    }
}

/// Issued session, also the body of `POST /api/auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl JwtService {
    /// Lifetimes are in seconds
    #[must_use]
    pub fn new(secret: &str, access_ttl: i64, refresh_ttl: i64) -> Self {
        let secret = secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    fn ttl(&self, kind: TokenType) -> i64 {
        match kind {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        email: Option<String>,
    ) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.sign(user_id, email.clone(), TokenType::Access)?,
            refresh_token: self.sign(user_id, email, TokenType::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl,
            refresh_expires_in: self.refresh_ttl,
        })
    }

    fn sign(&self, sub: Uuid, email: Option<String>, token_type: TokenType) -> Result<String, AppError> {
        let issued = Utc::now();
        let claims = Claims {
            sub,
            email,
            iat: issued.timestamp(),
            exp: (issued + Duration::seconds(self.ttl(token_type))).timestamp(),
            token_type,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("signing session token: {e}")))
    }

    /// Decode `token` and require it to be of `kind`
    pub fn validate(&self, token: &str, kind: TokenType) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?
            .claims;

        if claims.token_type == kind {
            Ok(claims)
        } else {
            Err(AppError::InvalidToken)
        }
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate(token, TokenType::Access)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate(token, TokenType::Refresh)
    }

    /// Rotate: a valid refresh token buys a whole new pair. Returns the claims
    /// of the new access token alongside it.
    pub fn refresh_tokens(&self, refresh_token: &str) -> Result<(Claims, TokenPair), AppError> {
        let previous = self.validate_refresh_token(refresh_token)?;
        let pair = self.generate_token_pair(previous.sub, previous.email)?;
        let claims = self.validate_access_token(&pair.access_token)?;
        Ok((claims, pair))
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
