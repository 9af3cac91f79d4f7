use axum::extract::FromRequestParts;

use crate::error::AppError;

pub const SESSION_HEADER: &str = "x-session-id";

/// The opaque session identifier carried on every cart, order, wishlist,
/// and comparison request. The value is chosen by the client and only
/// validated for shape; authentication is a concern of the surrounding
/// deployment, not of this API.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| AppError::BadRequest("Missing x-session-id header".into()))?;

        let value = header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid x-session-id header".into()))?
            .trim();

        if value.is_empty() || value.len() > 128 {
            return Err(AppError::BadRequest("Invalid x-session-id header".into()));
        }

        Ok(SessionId(value.to_string()))
    }
}
