//! Uploader identity taken from the authenticating proxy.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AdminError;

/// Header carrying the authenticated admin's identity.
pub const ADMIN_USER_HEADER: &str = "x-admin-user";

/// The authenticated admin making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ADMIN_USER_HEADER) else {
            return Err(AdminError::Unauthorized);
        };

        let Ok(value) = value.to_str() else {
            return Err(AdminError::Unauthorized);
        };

        let user = value.trim();
        if user.is_empty() {
            return Err(AdminError::Unauthorized);
        }

        Ok(AdminUser(user.to_string()))
    }
}
