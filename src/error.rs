use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to fetch document: {0}")]
    Fetch(String),
    #[error("JSON syntax error: {message}")]
    Parse { message: String },
    #[error("Document is missing the \"{0}\" section")]
    MissingSection(&'static str),
    #[error("Index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No item editor is open")]
    EditorClosed,
    #[error("Portfolio item \"{0}\" no longer exists")]
    ItemRemoved(String),
    #[error("Language code must not be empty")]
    InvalidLanguage,
    #[error("Move direction must be -1 or 1, got {0}")]
    InvalidDirection(i64),
    #[error("{0}")]
    Validation(String),
    #[error("Unauthorized token.")]
    Unauthorized,
    #[error("No document has been loaded")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, FolioError>;

impl ResponseError for FolioError {
    fn status_code(&self) -> StatusCode {
        match self {
            FolioError::Parse { .. }
            | FolioError::MissingSection(_)
            | FolioError::IndexOutOfRange { .. }
            | FolioError::InvalidLanguage
            | FolioError::InvalidDirection(_)
            | FolioError::Validation(_)
            | FolioError::Json(_) => StatusCode::BAD_REQUEST,
            FolioError::Unauthorized => StatusCode::UNAUTHORIZED,
            FolioError::EditorClosed | FolioError::ItemRemoved(_) | FolioError::NotLoaded => {
                StatusCode::CONFLICT
            }
            FolioError::Fetch(_) => StatusCode::BAD_GATEWAY,
            FolioError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
