/// Why a request could not be tied to a live session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no session cookie")]
    MissingCookie,

    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("session {0} not found")]
    NotFound(String),

    #[error("session expired")]
    Expired,
}
