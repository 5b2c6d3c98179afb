use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use osce_core::models::session::UserRole;

const ROLE_HEADER: &str = "x-user-role";

/// Bearer token middleware.
///
/// Requires `Authorization: Bearer <token>` and reads the caller's role from
/// `X-User-Role`, defaulting to student. Tokens are not verified here; the
/// upstream identity service has already done that.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let sub = {
        let auth_header = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }
        token.to_string()
    };

    let role = match req.headers().get(ROLE_HEADER) {
        None => UserRole::default(),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<UserRole>().ok())
            .ok_or(StatusCode::BAD_REQUEST)?,
    };

    req.extensions_mut().insert(AuthUser { sub, role });

    Ok(next.run(req).await)
}

/// Authenticated caller.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
    pub role: UserRole,
}
