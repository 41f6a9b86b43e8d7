//! # Request Identity
//!
//! Sign-in is handled by an external identity provider; the front-end
//! forwards the signed-in user's id in the `x-user-id` header. The only
//! questions the core asks are "who is acting" and "is anyone signed in".
//!
//! ```text
//! GET /api/dashboard
//! x-user-id: 7c9e6679-...      ──► CurrentUser("7c9e6679-...") ──► handler
//!
//! GET /api/dashboard
//! (no header / blank)          ──► 401 UNAUTHENTICATED (handler never runs)
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

/// Header carrying the signed-in user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The signed-in user performing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CurrentUser(id.to_string()))
            .ok_or_else(ApiError::unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<CurrentUser, ApiError> {
        let mut builder = Request::builder().uri("/api/dashboard");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_present() {
        let user = extract(Some(" user-42 ")).await.unwrap();
        assert_eq!(user.id(), "user-42");
    }

    #[tokio::test]
    async fn test_header_missing_or_blank() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);

        let err = extract(Some("   ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }
}
