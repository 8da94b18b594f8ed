//! The `sessionid` cookie.
//!
//! The cookie value is the email submitted at login and is trusted as the
//! caller's identity as-is: no signing, expiry or server-side lookup.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

pub const SESSION_COOKIE_NAME: &str = "sessionid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    email: String,
}

impl Session {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Read the session from the request `Cookie` headers, if present.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|value| value.split(';'))
            .find_map(|pair| {
                let (key, val) = pair.trim().split_once('=')?;
                (key.trim() == SESSION_COOKIE_NAME)
                    .then(|| Self::new(percent_decode_str(val.trim()).decode_utf8_lossy()))
            })
    }
}

// Bytes outside the RFC 6265 cookie-octet set, plus '%' as the escape byte.
// Non-ASCII bytes are always escaped.
const COOKIE_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

/// Build the `Set-Cookie` value for a login: `sessionid=<email>; Path=/`.
///
/// No `Expires`, `Secure` or `HttpOnly` attributes are set.
///
/// # Errors
/// Returns an error if the value is not a valid header value.
pub fn session_cookie(email: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={}; Path=/",
        utf8_percent_encode(email, COOKIE_ESCAPE)
    ))
}
