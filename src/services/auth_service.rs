use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Settings, error::SessionError};

/// Cookie standing in for the browser's local-storage disclaimer flag.
pub const DISCLAIMER_COOKIE: &str = "carlsberg-disclaimer-accepted";

/// Listing picked on the login page's share-price card.
pub const LISTING_COOKIE: &str = "carlsberg-login-listing";

/// Upper bound on token lifetime; the session countdown normally ends it first.
const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    // session id
    pub sub: String,
    // expiry (unix timestamp seconds)
    pub exp: usize,
}

pub fn make_session_token(settings: &Settings, session_id: &str) -> Result<String, String> {
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        sub: session_id.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

/// Returns the session id carried by a valid, unexpired token.
pub fn decode_session_token(settings: &Settings, token: &str) -> Result<String, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims.sub)
}

pub fn auth_cookie(settings: &Settings, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.jwt_cookie_name.clone(), token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if settings.cookie_secure {
        cookie.set_secure(true);
    }
    cookie
}

pub fn clear_auth_cookie(settings: &Settings) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.jwt_cookie_name.clone(), "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.make_removal();
    cookie
}

/// Long-lived, survives logout and session expiry.
pub fn disclaimer_cookie(settings: &Settings) -> Cookie<'static> {
    let mut cookie = Cookie::new(DISCLAIMER_COOKIE, "true");
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie.make_permanent();
    if settings.cookie_secure {
        cookie.set_secure(true);
    }
    cookie
}

pub fn listing_cookie(settings: &Settings, symbol: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(LISTING_COOKIE, symbol.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    if settings.cookie_secure {
        cookie.set_secure(true);
    }
    cookie
}
