//! Inbound payment notifications.
//!
//! A handler keeps the most recently verified raw field map. Accessors read
//! that map whatever the verification outcome, so callers must check
//! [`NotifyHandler::is_verified`] (or use [`NotifyHandler::verify_or_fail`])
//! before trusting a field.

use crate::domain::enums::EncryptType;
use crate::domain::field::{FieldMap, keys};
use crate::error::{PaymentError, Result};
use crate::security::CheckMacEncoder;

/// Body a notification endpoint returns to acknowledge receipt.
pub const SUCCESS_RESPONSE: &str = "1|OK";

const SUCCESS_CODE: &str = "1";

pub trait NotifyHandler {
    /// Replaces the stored map with `data` and verifies it.
    fn verify(&mut self, data: FieldMap) -> bool;

    fn data(&self) -> &FieldMap;

    fn is_verified(&self) -> bool;

    fn verify_or_fail(&mut self, data: FieldMap) -> Result<&mut Self>
    where
        Self: Sized,
    {
        if self.verify(data) {
            Ok(self)
        } else {
            Err(PaymentError::CheckMacFailed)
        }
    }

    /// Text of `key`, or an empty string when absent.
    fn text(&self, key: &str) -> String {
        self.data()
            .get(key)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }

    fn rtn_code(&self) -> String {
        self.text(keys::RTN_CODE)
    }

    fn rtn_msg(&self) -> String {
        self.text(keys::RTN_MSG)
    }

    fn merchant_id(&self) -> String {
        self.text(keys::MERCHANT_ID)
    }

    fn merchant_trade_no(&self) -> String {
        self.text(keys::MERCHANT_TRADE_NO)
    }

    fn trade_no(&self) -> String {
        self.text(keys::TRADE_NO)
    }

    /// Paid amount; `0` when absent or not an integer.
    fn trade_amt(&self) -> i64 {
        self.text(keys::TRADE_AMT).trim().parse().unwrap_or(0)
    }

    fn payment_type(&self) -> String {
        self.text(keys::PAYMENT_TYPE)
    }

    fn payment_date(&self) -> String {
        self.text(keys::PAYMENT_DATE)
    }

    /// `CustomField1` to `CustomField4`; any other index reads as empty.
    fn custom_field(&self, index: u8) -> String {
        usize::from(index)
            .checked_sub(1)
            .and_then(|slot| keys::CUSTOM_FIELDS.get(slot))
            .map(|key| self.text(key))
            .unwrap_or_default()
    }

    fn is_simulate_paid(&self) -> bool {
        self.text(keys::SIMULATE_PAID) == "1"
    }

    fn is_success(&self) -> bool {
        self.rtn_code() == SUCCESS_CODE
    }

    fn success_response(&self) -> &'static str {
        SUCCESS_RESPONSE
    }
}

/// Generic payment result notification.
#[derive(Debug, Clone)]
pub struct PaymentNotify {
    encoder: CheckMacEncoder,
    data: FieldMap,
    verified: bool,
}

impl PaymentNotify {
    pub fn new(hash_key: impl Into<String>, hash_iv: impl Into<String>) -> Self {
        Self::with_encoder(CheckMacEncoder::new(hash_key, hash_iv, EncryptType::Sha256))
    }

    pub fn with_encoder(encoder: CheckMacEncoder) -> Self {
        Self {
            encoder,
            data: FieldMap::new(),
            verified: false,
        }
    }
}

impl NotifyHandler for PaymentNotify {
    fn verify(&mut self, data: FieldMap) -> bool {
        self.verified = self.encoder.verify(&data);
        if !self.verified {
            let trade_no = data
                .get(keys::MERCHANT_TRADE_NO)
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::warn!(merchant_trade_no = %trade_no, "rejected notification with invalid CheckMacValue");
        }
        self.data = data;
        self.verified
    }

    fn data(&self) -> &FieldMap {
        &self.data
    }

    fn is_verified(&self) -> bool {
        self.verified
    }
}

/// ATM payment-info notification (virtual account issued).
#[derive(Debug, Clone)]
pub struct AtmNotify {
    inner: PaymentNotify,
}

impl AtmNotify {
    pub fn new(hash_key: impl Into<String>, hash_iv: impl Into<String>) -> Self {
        Self {
            inner: PaymentNotify::new(hash_key, hash_iv),
        }
    }

    pub fn with_encoder(encoder: CheckMacEncoder) -> Self {
        Self {
            inner: PaymentNotify::with_encoder(encoder),
        }
    }

    pub fn bank_code(&self) -> String {
        self.text(keys::BANK_CODE)
    }

    pub fn v_account(&self) -> String {
        self.text(keys::V_ACCOUNT)
    }

    pub fn expire_date(&self) -> String {
        self.text(keys::EXPIRE_DATE)
    }
}

impl NotifyHandler for AtmNotify {
    fn verify(&mut self, data: FieldMap) -> bool {
        self.inner.verify(data)
    }

    fn data(&self) -> &FieldMap {
        self.inner.data()
    }

    fn is_verified(&self) -> bool {
        self.inner.is_verified()
    }
}

/// CVS and barcode payment-info notification.
#[derive(Debug, Clone)]
pub struct CvsNotify {
    inner: PaymentNotify,
}

impl CvsNotify {
    pub fn new(hash_key: impl Into<String>, hash_iv: impl Into<String>) -> Self {
        Self {
            inner: PaymentNotify::new(hash_key, hash_iv),
        }
    }

    pub fn with_encoder(encoder: CheckMacEncoder) -> Self {
        Self {
            inner: PaymentNotify::with_encoder(encoder),
        }
    }

    /// CVS payment code.
    pub fn payment_no(&self) -> String {
        self.text(keys::PAYMENT_NO)
    }

    pub fn expire_date(&self) -> String {
        self.text(keys::EXPIRE_DATE)
    }

    /// `Barcode1` to `Barcode3`; any other index reads as empty.
    pub fn barcode(&self, index: u8) -> String {
        usize::from(index)
            .checked_sub(1)
            .and_then(|slot| keys::BARCODES.get(slot))
            .map(|key| self.text(key))
            .unwrap_or_default()
    }
}

impl NotifyHandler for CvsNotify {
    fn verify(&mut self, data: FieldMap) -> bool {
        self.inner.verify(data)
    }

    fn data(&self) -> &FieldMap {
        self.inner.data()
    }

    fn is_verified(&self) -> bool {
        self.inner.is_verified()
    }
}
