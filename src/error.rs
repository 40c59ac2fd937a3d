use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Every failure the SDK raises across its boundary.
///
/// The first four variants are raised by the command model and the checksum
/// engine. `Http`, `Timeout` and `Network` belong to the transport seam, and
/// `Csv` / `Io` to the CSV interface; they share this type so callers can handle
/// every failure uniformly.
#[derive(Error, Diagnostic, Debug)]
pub enum PaymentError {
    #[error("Field \"{field}\" is required.")]
    #[diagnostic(code(ecpay::required))]
    Required { field: &'static str },

    #[error("Field \"{field}\" must be less than {max} characters.")]
    #[diagnostic(code(ecpay::too_long))]
    TooLong { field: &'static str, max: usize },

    #[error("Field \"{field}\" is invalid: {reason}")]
    #[diagnostic(code(ecpay::invalid))]
    Invalid { field: &'static str, reason: String },

    #[error("CheckMacValue verification failed.")]
    #[diagnostic(
        code(ecpay::check_mac_failed),
        help("check that the HashKey, HashIV and digest algorithm match the merchant settings")
    )]
    CheckMacFailed,

    #[error("HTTP Error: {status} {status_text}")]
    #[diagnostic(code(ecpay::http_error))]
    Http { status: u16, status_text: String },

    #[error("Request timeout after {timeout_ms}ms{}", url_suffix(.url))]
    #[diagnostic(code(ecpay::timeout))]
    Timeout { timeout_ms: u64, url: Option<String> },

    #[error("Network error: {0}")]
    #[diagnostic(code(ecpay::network_error))]
    Network(String),

    #[error("CSV error: {0}")]
    #[diagnostic(code(ecpay::csv))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(ecpay::io))]
    Io(#[from] std::io::Error),
}

fn url_suffix(url: &Option<String>) -> String {
    url.as_deref()
        .map(|url| format!(" for {url}"))
        .unwrap_or_default()
}

/// Machine-readable error code, serialized as `SCREAMING_SNAKE_CASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Required,
    TooLong,
    Invalid,
    CheckMacFailed,
    HttpError,
    Timeout,
    NetworkError,
    PaymentError,
}

/// Plain record form of a [`PaymentError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub name: &'static str,
    pub message: String,
    pub code: ErrorCode,
    pub field: Option<&'static str>,
}

impl PaymentError {
    pub fn required(field: &'static str) -> Self {
        Self::Required { field }
    }

    pub fn too_long(field: &'static str, max: usize) -> Self {
        Self::TooLong { field, max }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Required { .. } => ErrorCode::Required,
            Self::TooLong { .. } => ErrorCode::TooLong,
            Self::Invalid { .. } => ErrorCode::Invalid,
            Self::CheckMacFailed => ErrorCode::CheckMacFailed,
            Self::Http { .. } => ErrorCode::HttpError,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Network(_) => ErrorCode::NetworkError,
            Self::Csv(_) | Self::Io(_) => ErrorCode::PaymentError,
        }
    }

    /// The offending gateway field, if the error concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Required { field } | Self::TooLong { field, .. } | Self::Invalid { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }

    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            name: "PaymentError",
            message: self.to_string(),
            code: self.code(),
            field: self.field(),
        }
    }
}
