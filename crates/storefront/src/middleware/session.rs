//! Session token cookie.
//!
//! The signed token travels in an `HttpOnly` cookie. There is no server-side
//! session store; the cookie is the session.

use axum::http::{HeaderMap, header::COOKIE};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

/// Session cookie name.
pub const TOKEN_COOKIE_NAME: &str = "token";

/// Build the cookie carrying a freshly issued token.
#[must_use]
pub fn token_cookie(token: String, secure: bool, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Build a cookie that makes the browser drop the token.
#[must_use]
pub fn expired_token_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Read the token cookie value from request headers.
#[must_use]
pub fn read_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == TOKEN_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_token_cookie_attributes() {
        let cookie = token_cookie("abc".to_string(), false, chrono::Duration::hours(1)).to_string();
        assert!(cookie.starts_with("token=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        let secure = token_cookie("abc".to_string(), true, chrono::Duration::hours(1)).to_string();
        assert!(secure.contains("Secure"));
    }

    #[test]
    fn test_expired_cookie() {
        let cookie = expired_token_cookie(false).to_string();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_read_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=t0k3n; lang=en"));
        assert_eq!(read_token(&headers).as_deref(), Some("t0k3n"));
    }

    #[test]
    fn test_read_token_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(read_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(read_token(&headers), None);
    }
}
