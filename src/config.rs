use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub jwt_secret: String,
    pub jwt_cookie_name: String,
    pub cookie_secure: bool,

    // fixed delay before a login "succeeds"; there is no credential check
    pub login_delay_ms: u64,
    pub session_timeout_secs: u32,

    pub share_base_url: String,
    pub templates_dir: String,
    pub static_dir: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());
    let jwt_cookie_name = env::var("JWT_COOKIE_NAME").unwrap_or_else(|_| "auth".to_string());

    let cookie_secure = env::var("COOKIE_SECURE")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);

    let login_delay_ms = env::var("LOGIN_DELAY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2500);

    let session_timeout_secs = env::var("SESSION_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(900);

    let share_base_url = env::var("SHARE_BASE_URL")
        .unwrap_or_else(|_| "https://sg3.trading".to_string())
        .trim_end_matches('/')
        .to_string();

    let templates_dir = env::var("TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

    Settings {
        host,
        port,
        jwt_secret,
        jwt_cookie_name,
        cookie_secure,
        login_delay_ms,
        session_timeout_secs,
        share_base_url,
        templates_dir,
        static_dir,
    }
}
