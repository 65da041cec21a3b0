use crate::errors::app_error::AppError;
use crate::models::transient::authenticated_user::{AuthenticatedUser, SessionToken};
use crate::state::AppState;
use crate::stores::sessions::resolve_token;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

pub const SESSION_COOKIE: &str = "safe_travel_session";

fn not_logged_in() -> AppError {
    AppError::Authentication(String::from("User not logged in"))
}

/// Token from a bearer `Authorization` header, or else from the session cookie.
/// Other authorization schemes are ignored.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|authorization| authorization.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            pair.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
                .map(str::to_string)
        })
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}")
}

pub async fn authentication(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers()).ok_or_else(not_logged_in)?;

    let user = {
        let connection = &mut state.pool.get()?;
        resolve_token(connection, &token, Utc::now().naive_utc())?
    }
    .ok_or_else(not_logged_in)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(&user));
    request.extensions_mut().insert(SessionToken(token));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn other_schemes_fall_back_to_the_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWxleDpzZWNyZXQ="));
        headers.insert(COOKIE, HeaderValue::from_static("safe_travel_session=zzz"));

        assert_eq!(session_token(&headers).as_deref(), Some("zzz"));
    }

    #[test]
    fn bearer_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        headers.insert(COOKIE, HeaderValue::from_static("safe_travel_session=zzz"));

        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; safe_travel_session=tok_en=; other=1"),
        );

        assert_eq!(session_token(&headers).as_deref(), Some("tok_en="));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("safe_travel_session="));
        assert_eq!(session_token(&headers), None);
    }
}
