//! Path extractors.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::Redirect,
};

use corner_store_core::ProductId;

/// A product ID taken from the `{id}` path segment.
///
/// A segment that is not an integer sends the client to `/login`, the same
/// place unknown routes go. Range checks (non-positive IDs) are left to the
/// services so they surface as validation errors.
pub struct PathProductId(pub ProductId);

impl<S> FromRequestParts<S> for PathProductId
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(path = %parts.uri.path(), error = %rejection, "Unparseable product id");
                Redirect::to("/login")
            })?;

        Ok(Self(ProductId::new(raw)))
    }
}
