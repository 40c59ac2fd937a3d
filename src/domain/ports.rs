use super::field::FieldMap;
use crate::error::Result;
use async_trait::async_trait;

/// Raw reply from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Posts a signed field map as an `application/x-www-form-urlencoded` body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(&self, url: &str, form: &FieldMap) -> Result<TransportResponse>;
}

pub type TransportBox = Box<dyn Transport>;
