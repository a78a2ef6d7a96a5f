use serde::{Deserialize, Serialize};

/// Error codes reported by the Critica API, plus `Network` for transport
/// failures that never reached the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    #[error("NO_CAPABILITY")]
    NoCapability,
    #[error("ARTICLE_NONEXISTENT")]
    ArticleNonexistent,
    #[error("ARTICLE_SECTION_NONEXISTENT")]
    ArticleSectionNonexistent,
    #[error("INVALID_DURATION")]
    InvalidDuration,
    #[error("INVALID_POSITION")]
    InvalidPosition,
    #[error("DECODE_ERROR")]
    DecodeError,
    #[error("INTERNAL_SERVER_ERROR")]
    InternalServerError,
    #[error("METHOD_NOT_ALLOWED")]
    MethodNotAllowed,
    #[error("UNAUTHORIZED")]
    Unauthorized,
    #[error("BAD_REQUEST")]
    BadRequest,
    #[error("NOT_FOUND")]
    NotFound,
    #[error("NETWORK")]
    Network,
    #[error("UNKNOWN")]
    Unknown,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::NoCapability,
        ErrorCode::ArticleNonexistent,
        ErrorCode::ArticleSectionNonexistent,
        ErrorCode::InvalidDuration,
        ErrorCode::InvalidPosition,
        ErrorCode::DecodeError,
        ErrorCode::InternalServerError,
        ErrorCode::MethodNotAllowed,
        ErrorCode::Unauthorized,
        ErrorCode::BadRequest,
        ErrorCode::NotFound,
        ErrorCode::Network,
        ErrorCode::Unknown,
    ];

    /// Human readable text shown by the error message component.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::NoCapability => "You do not have permission to do this.",
            ErrorCode::ArticleNonexistent => "This article does not exist.",
            ErrorCode::ArticleSectionNonexistent => "This article section does not exist.",
            ErrorCode::InvalidDuration => "The duration estimate must be greater than zero.",
            ErrorCode::InvalidPosition => "The section position must not be negative.",
            ErrorCode::DecodeError => "The server could not understand the request.",
            ErrorCode::InternalServerError => "The server encountered an internal error.",
            ErrorCode::MethodNotAllowed => "The server does not allow this method.",
            ErrorCode::Unauthorized => "You must be logged in to do this.",
            ErrorCode::BadRequest => "The request was malformed.",
            ErrorCode::NotFound => "Not found.",
            ErrorCode::Network => "Could not reach the server.",
            ErrorCode::Unknown => "An unknown error occurred.",
        }
    }
}

pub type ApiResult<T> = Result<T, ErrorCode>;

/// Takes the first element, failing with `code` on an empty list.
pub fn first_or<T>(items: Vec<T>, code: ErrorCode) -> ApiResult<T> {
    items.into_iter().next().ok_or(code)
}
