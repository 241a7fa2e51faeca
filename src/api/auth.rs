//! Caller identity for incoming requests.
//!
//! The bearer token is verified once at the transport boundary. Whatever goes
//! wrong there collapses into "no identity", so handlers only ever see a
//! [`CallerIdentity`] or an `Unauthenticated` error.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::error::ServiceError;

/// Claims carried by an access token (Supabase-style).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

/// Why a bearer token was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("JWT is malformed")]
    Malformed,

    #[error("JWT is expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("unexpected signing method")]
    UnexpectedSigningMethod,

    #[error("JWT was invalid")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnexpectedSigningMethod
            }
            _ => TokenError::Invalid,
        }
    }
}

/// Verifies HS256 bearer tokens against a shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// `audience`, when set, must match the token's `aud` claim. Without it
    /// the audience claim is not checked.
    pub fn new(secret: &[u8], audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }

    /// Verified claims from the request's `Authorization: Bearer` header.
    ///
    /// A missing header, a non-bearer scheme or a rejected token all yield
    /// `None`.
    pub fn claims_from_request(&self, req: &HttpRequest) -> Option<Claims> {
        let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = bearer_token(value)?;

        match self.verify(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!("Rejected bearer token: {}", e);
                None
            }
        }
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    let (scheme, token) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// The authenticated user a request acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    user_id: String,
}

impl CallerIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The caller named by the subject of an already verified claim set.
    pub fn from_claims(claims: Option<&Claims>) -> Result<Self, ServiceError> {
        // Missing claims and a missing subject are the same failure to callers.
        match claims.and_then(|claims| claims.sub.as_deref()).map(str::trim) {
            Some(sub) if !sub.is_empty() => Ok(Self::new(sub)),
            _ => Err(ServiceError::Unauthenticated("no identity found".to_string())),
        }
    }
}

impl FromRequest for CallerIdentity {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = match req.app_data::<web::Data<TokenVerifier>>() {
            Some(verifier) => verifier.claims_from_request(req),
            None => {
                warn!("No token verifier registered; treating request as anonymous");
                None
            }
        };

        let identity = CallerIdentity::from_claims(claims.as_ref());
        if let Ok(caller) = &identity {
            debug!("Request authenticated as user={}", caller.user_id());
        }
        ready(identity)
    }
}
