use crate::domain::enums::EncryptType;
use crate::domain::field::{FieldMap, FieldValue, keys};
use crate::error::{PaymentError, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};
use std::fmt;

/// Bytes left unescaped: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Replacements applied to the lowercased encoding, in this order. Only
/// `%20` can occur after encoding with [`COMPONENT`].
const COMPAT_REPLACEMENTS: [(&str, &str); 8] = [
    ("%2d", "-"),
    ("%5f", "_"),
    ("%2e", "."),
    ("%21", "!"),
    ("%2a", "*"),
    ("%28", "("),
    ("%29", ")"),
    ("%20", "+"),
];

/// Generates and verifies `CheckMacValue` checksums.
///
/// Immutable once built; share it freely across threads.
#[derive(Clone, PartialEq, Eq)]
pub struct CheckMacEncoder {
    hash_key: String,
    hash_iv: String,
    encrypt_type: EncryptType,
}

impl fmt::Debug for CheckMacEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckMacEncoder")
            .field("hash_key", &"***")
            .field("hash_iv", &"***")
            .field("encrypt_type", &self.encrypt_type)
            .finish()
    }
}

impl CheckMacEncoder {
    pub fn new(hash_key: impl Into<String>, hash_iv: impl Into<String>, encrypt_type: EncryptType) -> Self {
        Self {
            hash_key: hash_key.into(),
            hash_iv: hash_iv.into(),
            encrypt_type,
        }
    }

    pub fn encrypt_type(&self) -> EncryptType {
        self.encrypt_type
    }

    /// Computes the checksum of `data`, ignoring any `CheckMacValue` entry.
    pub fn generate(&self, data: &FieldMap) -> String {
        let canonical = self.canonicalize(data);
        let checksum = match self.encrypt_type {
            EncryptType::Sha256 => hex::encode_upper(Sha256::digest(canonical.as_bytes())),
            EncryptType::Md5 => hex::encode_upper(md5::compute(canonical.as_bytes()).0),
        };
        tracing::debug!(
            fields = data.len(),
            algorithm = %self.encrypt_type,
            "generated CheckMacValue"
        );
        checksum
    }

    /// The exact string that gets hashed.
    pub(crate) fn canonicalize(&self, data: &FieldMap) -> String {
        let mut entries: Vec<(&String, &FieldValue)> = data
            .iter()
            .filter(|(key, _)| key.as_str() != keys::CHECK_MAC_VALUE)
            .collect();
        entries.sort_by(|(a, _), (b, _)| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        let joined = entries
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        let raw = format!("HashKey={}&{}&HashIV={}", self.hash_key, joined, self.hash_iv);

        let mut encoded = utf8_percent_encode(&raw, COMPONENT)
            .to_string()
            .to_lowercase();
        for (from, to) in COMPAT_REPLACEMENTS {
            encoded = encoded.replace(from, to);
        }
        encoded
    }

    /// Returns a copy of `payload` carrying a fresh `CheckMacValue`.
    pub fn encode_payload(&self, payload: &FieldMap) -> FieldMap {
        let mut signed = payload.clone();
        signed.remove(keys::CHECK_MAC_VALUE);
        let checksum = self.generate(&signed);
        signed.insert(keys::CHECK_MAC_VALUE.to_string(), FieldValue::Text(checksum));
        signed
    }

    /// Checks the embedded `CheckMacValue`. Fails closed when it is absent.
    pub fn verify(&self, data: &FieldMap) -> bool {
        let Some(received) = data.get(keys::CHECK_MAC_VALUE) else {
            return false;
        };
        let expected = self.generate(data);
        received.to_string().eq_ignore_ascii_case(&expected)
    }

    pub fn verify_or_fail<'a>(&self, data: &'a FieldMap) -> Result<&'a FieldMap> {
        if self.verify(data) {
            Ok(data)
        } else {
            tracing::warn!(fields = data.len(), "CheckMacValue verification failed");
            Err(PaymentError::CheckMacFailed)
        }
    }
}
