use crate::command::Command;
use crate::domain::enums::EncryptType;
use crate::domain::field::{FieldMap, keys, parse_form};
use crate::domain::ports::TransportBox;
use crate::error::{PaymentError, Result};
use crate::security::CheckMacEncoder;
use serde::Deserialize;
use std::time::Duration;

pub const STAGE_SERVER_URL: &str = "https://payment-stage.ecpay.com.tw";
pub const PRODUCTION_SERVER_URL: &str = "https://payment.ecpay.com.tw";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

fn default_server_url() -> String {
    STAGE_SERVER_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Client settings, deserializable from JSON or any other serde format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub hash_key: String,
    pub hash_iv: String,
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub encrypt_type: EncryptType,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(hash_key: impl Into<String>, hash_iv: impl Into<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
            hash_iv: hash_iv.into(),
            server_url: default_server_url(),
            encrypt_type: EncryptType::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Sends signed commands through a [`Transport`](crate::domain::ports::Transport)
/// and checks the gateway's reply.
pub struct EcPayClient {
    config: ClientConfig,
    transport: TransportBox,
}

impl EcPayClient {
    /// Creates a client. A trailing `/` on the server URL is dropped.
    pub fn new(mut config: ClientConfig, transport: TransportBox) -> Self {
        let trimmed = config.server_url.trim_end_matches('/').len();
        config.server_url.truncate(trimmed);
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn encoder(&self) -> CheckMacEncoder {
        CheckMacEncoder::new(
            self.config.hash_key.as_str(),
            self.config.hash_iv.as_str(),
            self.config.encrypt_type,
        )
    }

    pub fn endpoint(&self, command: &Command) -> String {
        format!("{}{}", self.config.server_url, command.request_path())
    }

    /// Signs `command` with the client's key pair, posts it and returns the
    /// parsed reply.
    ///
    /// A reply carrying a `CheckMacValue` must verify; replies without one
    /// are returned as is.
    pub async fn query(&self, command: &mut Command) -> Result<FieldMap> {
        let encoder = self.encoder();
        command
            .set_hash_key(self.config.hash_key.as_str())
            .set_hash_iv(self.config.hash_iv.as_str())
            .set_encrypt_type(self.config.encrypt_type)
            .set_encoder(encoder.clone());

        let form = command.content()?;
        let url = self.endpoint(command);
        tracing::info!(kind = %command.kind(), %url, "sending gateway request");

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let response = tokio::time::timeout(timeout, self.transport.post_form(&url, &form))
            .await
            .map_err(|_| PaymentError::Timeout {
                timeout_ms: self.config.timeout_ms,
                url: Some(url.clone()),
            })??;

        if !response.is_success() {
            tracing::warn!(status = response.status, %url, "gateway returned an error status");
            return Err(PaymentError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let reply = parse_form(&response.body);
        if reply.contains_key(keys::CHECK_MAC_VALUE) {
            encoder.verify_or_fail(&reply)?;
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryTransport;

    #[test]
    fn test_config_defaults_from_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"hash_key":"K","hash_iv":"I"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("K", "I"));
        assert_eq!(config.server_url, STAGE_SERVER_URL);
        assert_eq!(config.encrypt_type, EncryptType::Sha256);
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn test_config_md5_from_json() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"hash_key":"K","hash_iv":"I","encrypt_type":"md5","server_url":"https://x/"}"#,
        )
        .unwrap();
        assert_eq!(config.encrypt_type, EncryptType::Md5);
    }

    #[test]
    fn test_trailing_slash_removed() {
        let mut config = ClientConfig::new("K", "I");
        config.server_url = "https://payment.ecpay.com.tw//".to_string();
        let client = EcPayClient::new(config, Box::new(InMemoryTransport::new()));
        assert_eq!(client.config().server_url, PRODUCTION_SERVER_URL);
    }
}
