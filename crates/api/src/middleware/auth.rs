//! Authentication extractors.
//!
//! Authentication itself lives in a separate service; by the time a
//! request reaches this binary, the fronting auth layer has verified the
//! session and injected the caller's identity as trusted headers:
//!
//! - `x-user-id` - the authenticated user's numeric ID
//! - `x-user-role` - `customer` or `admin` (absent means `customer`)
//!
//! These extractors are the only place those headers are read.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use arcadia_core::{UserId, UserRole};

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether the caller has administrative privileges.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Error returned when identity headers are missing or malformed.
pub enum AuthRejection {
    /// No (valid) identity attached to the request.
    Unauthorized,
    /// Identity present but lacks the admin role.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let id = parts
        .headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .parse::<i32>()
        .ok()?;

    let role = match parts.headers.get(USER_ROLE_HEADER) {
        Some(value) => value.to_str().ok()?.parse::<UserRole>().ok()?,
        None => UserRole::Customer,
    };

    Some(CurrentUser {
        id: UserId::new(id),
        role,
    })
}

/// Extractor that requires an authenticated caller.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(user: CurrentUser) -> impl IntoResponse {
///     format!("Hello, user {}!", user.id)
/// }
/// ```
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).ok_or(AuthRejection::Unauthorized)
    }
}

/// Extractor that requires an authenticated caller with the admin role.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).ok_or(AuthRejection::Unauthorized)?;
        if !user.is_admin() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/orders");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_missing_headers_is_anonymous() {
        assert!(current_user(&parts(&[])).is_none());
    }

    #[test]
    fn test_user_id_header_parsed() {
        let user = current_user(&parts(&[("x-user-id", "42")])).unwrap();
        assert_eq!(user.id, UserId::new(42));
        assert_eq!(user.role, UserRole::Customer);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_admin_role_header() {
        let user = current_user(&parts(&[("x-user-id", "7"), ("x-user-role", "admin")])).unwrap();
        assert!(user.is_admin());
    }

    #[test]
    fn test_garbage_headers_rejected() {
        assert!(current_user(&parts(&[("x-user-id", "forty-two")])).is_none());
        assert!(current_user(&parts(&[("x-user-id", "1"), ("x-user-role", "root")])).is_none());
    }
}
