//! `Identity` as a handler argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::entity::identity::Identity;
use crate::error::AuthError;

/// Reads the identity attached by `require_identity`. Handlers mounted
/// without that middleware reject every request with 403.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or(AuthError::MissingToken)
    }
}
