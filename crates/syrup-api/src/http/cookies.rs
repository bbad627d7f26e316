//! Session cookie construction and parsing.
//!
//! Tokens travel in `HttpOnly` cookies so page scripts never see them.
//! `SameSite=Lax` keeps cross-site POSTs from carrying the session
//! while normal navigation still works.

/// Build a `Set-Cookie` value binding `value` under `name` for
/// `max_age_seconds`.
pub fn session_cookie(name: &str, value: &str, max_age_seconds: i64) -> String {
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}")
}

/// Build a `Set-Cookie` value that expires the cookie immediately.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract a cookie's value from a `Cookie` request header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}
