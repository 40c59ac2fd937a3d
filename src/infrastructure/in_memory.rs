use crate::domain::field::FieldMap;
use crate::domain::ports::{Transport, TransportResponse};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A request captured by [`InMemoryTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub form: FieldMap,
}

/// A scripted transport for tests and offline runs.
///
/// Responses are served in the order they were queued; once the queue is
/// empty every request gets an empty `200 OK`. Cloned handles share the same
/// queue and request log.
#[derive(Default, Clone)]
pub struct InMemoryTransport {
    responses: Arc<Mutex<VecDeque<TransportResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every reply, e.g. to exercise client timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_response(&self, response: TransportResponse) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn post_form(&self, url: &str, form: &FieldMap) -> Result<TransportResponse> {
        self.requests.lock().await.push(RecordedRequest {
            url: url.to_string(),
            form: form.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().await.pop_front();
        Ok(next.unwrap_or_else(|| TransportResponse::ok("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::field_map;

    #[tokio::test]
    async fn test_serves_queued_responses_in_order() {
        let transport = InMemoryTransport::new();
        transport.push_response(TransportResponse::ok("a=1")).await;
        transport.push_response(TransportResponse::ok("b=2")).await;

        let form = field_map([("MerchantID", "2000132")]);
        let first = transport.post_form("https://x/1", &form).await.unwrap();
        let second = transport.post_form("https://x/2", &form).await.unwrap();
        let third = transport.post_form("https://x/3", &form).await.unwrap();

        assert_eq!(first.body, "a=1");
        assert_eq!(second.body, "b=2");
        assert_eq!(third.body, "");
        assert!(third.is_success());
    }

    #[tokio::test]
    async fn test_records_requests_across_clones() {
        let transport = InMemoryTransport::new();
        let handle = transport.clone();

        let form = field_map([("MerchantID", "2000132")]);
        handle.post_form("https://x/query", &form).await.unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://x/query");
        assert_eq!(requests[0].form, form);
    }
}
