//! Checkout operations and queries.
//!
//! A [`Command`] owns one field map plus the merchant identifier and signing
//! key pair. Setters validate immediately; [`Command::payload`] checks the
//! required fields of the command's [`CommandKind`] in a fixed order and
//! [`Command::content`] signs the result.

pub mod kind;

pub use kind::CommandKind;

use crate::domain::canonical::format_timestamp;
use crate::domain::enums::{
    ChoosePayment, DateType, EncryptType, Language, MediaFormat, PayDateType, PeriodType, UnionPay,
    YesNo,
};
use crate::domain::field::{FieldMap, FieldValue, keys};
use crate::error::{PaymentError, Result};
use crate::security::CheckMacEncoder;
use chrono::NaiveDateTime;
use std::fmt;

pub const MERCHANT_TRADE_NO_MAX_LENGTH: usize = 20;
pub const TRADE_DESC_MAX_LENGTH: usize = 200;
pub const ITEM_NAME_MAX_LENGTH: usize = 400;

const INSTALLMENT_PERIODS: [u32; 5] = [3, 6, 12, 18, 24];

#[derive(Clone)]
pub struct Command {
    kind: CommandKind,
    merchant_id: String,
    hash_key: String,
    hash_iv: String,
    encrypt_type: EncryptType,
    encoder: Option<CheckMacEncoder>,
    fields: FieldMap,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind)
            .field("merchant_id", &self.merchant_id)
            .field("encrypt_type", &self.encrypt_type)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

fn ensure_max_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(PaymentError::too_long(field, max));
    }
    Ok(())
}

fn ensure_positive(field: &'static str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(PaymentError::invalid(field, "must be greater than 0"));
    }
    Ok(())
}

fn ensure_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(PaymentError::invalid(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

fn indexed<const N: usize>(names: &[&'static str; N], index: u8, family: &'static str) -> Result<&'static str> {
    usize::from(index)
        .checked_sub(1)
        .and_then(|slot| names.get(slot))
        .copied()
        .ok_or_else(|| PaymentError::invalid(family, format!("index must be between 1 and {N}")))
}

impl Command {
    /// Creates a command of `kind` with its default fields, including a
    /// trade date of now for checkout kinds and a Unix `TimeStamp` for order
    /// queries.
    pub fn new(
        kind: CommandKind,
        merchant_id: impl Into<String>,
        hash_key: impl Into<String>,
        hash_iv: impl Into<String>,
    ) -> Self {
        let merchant_id = merchant_id.into();
        let encrypt_type = EncryptType::default();
        let fields = kind.initial_fields(&merchant_id, encrypt_type);
        Self {
            kind,
            merchant_id,
            hash_key: hash_key.into(),
            hash_iv: hash_iv.into(),
            encrypt_type,
            encoder: None,
            fields,
        }
    }

    /// The variant this command was created as.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Merchant identifier resynchronized into `MerchantID` at finalization.
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Endpoint path appended to the gateway server URL.
    pub fn request_path(&self) -> &'static str {
        self.kind.request_path()
    }

    /// Default payment selector of this kind; `None` for queries.
    pub fn choose_payment(&self) -> Option<ChoosePayment> {
        self.kind.choose_payment()
    }

    /// Digest used when no explicit encoder is set.
    pub fn encrypt_type(&self) -> EncryptType {
        self.encrypt_type
    }

    /// Current value of `field`, before finalization.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    fn put(&mut self, field: &'static str, value: impl Into<FieldValue>) -> Result<&mut Self> {
        if !self.kind.accepts(field) {
            return Err(PaymentError::invalid(
                field,
                format!("not supported by {}", self.kind),
            ));
        }
        self.fields.insert(field.to_string(), value.into());
        Ok(self)
    }

    // Credentials and signing

    /// Replaces the merchant identifier and its `MerchantID` entry.
    pub fn set_merchant_id(&mut self, merchant_id: impl Into<String>) -> &mut Self {
        self.merchant_id = merchant_id.into();
        self.fields
            .insert(keys::MERCHANT_ID.to_string(), self.merchant_id.as_str().into());
        self
    }

    /// Replaces the HashKey used to build the default encoder.
    pub fn set_hash_key(&mut self, hash_key: impl Into<String>) -> &mut Self {
        self.hash_key = hash_key.into();
        self
    }

    /// Replaces the HashIV used to build the default encoder.
    pub fn set_hash_iv(&mut self, hash_iv: impl Into<String>) -> &mut Self {
        self.hash_iv = hash_iv.into();
        self
    }

    /// Selects the digest; checkout kinds also carry it as `EncryptType`.
    pub fn set_encrypt_type(&mut self, encrypt_type: EncryptType) -> &mut Self {
        self.encrypt_type = encrypt_type;
        if self.kind.is_checkout() {
            self.fields
                .insert(keys::ENCRYPT_TYPE.to_string(), encrypt_type.into());
        }
        self
    }

    /// Overrides the encoder built from the key pair.
    pub fn set_encoder(&mut self, encoder: CheckMacEncoder) -> &mut Self {
        self.encoder = Some(encoder);
        self
    }

    /// The explicit encoder if one was set, otherwise one built from the
    /// key pair and digest.
    pub fn encoder(&self) -> CheckMacEncoder {
        self.encoder.clone().unwrap_or_else(|| {
            CheckMacEncoder::new(self.hash_key.as_str(), self.hash_iv.as_str(), self.encrypt_type)
        })
    }

    // Shared checkout fields

    /// Merchant order number, at most 20 characters.
    pub fn set_merchant_trade_no(&mut self, trade_no: &str) -> Result<&mut Self> {
        ensure_max_len(keys::MERCHANT_TRADE_NO, trade_no, MERCHANT_TRADE_NO_MAX_LENGTH)?;
        self.put(keys::MERCHANT_TRADE_NO, trade_no)
    }

    /// Trade date rendered as `yyyy/MM/dd HH:mm:ss`.
    pub fn set_merchant_trade_date(&mut self, at: NaiveDateTime) -> Result<&mut Self> {
        self.put(keys::MERCHANT_TRADE_DATE, format_timestamp(at))
    }

    /// Stores an already formatted `yyyy/MM/dd HH:mm:ss` trade date verbatim.
    pub fn set_merchant_trade_date_text(&mut self, date: &str) -> Result<&mut Self> {
        self.put(keys::MERCHANT_TRADE_DATE, date)
    }

    /// Order total in whole dollars; must be greater than 0.
    pub fn set_total_amount(&mut self, amount: i64) -> Result<&mut Self> {
        ensure_positive(keys::TOTAL_AMOUNT, amount)?;
        self.put(keys::TOTAL_AMOUNT, amount)
    }

    /// Trade description, at most 200 characters.
    pub fn set_trade_desc(&mut self, desc: &str) -> Result<&mut Self> {
        ensure_max_len(keys::TRADE_DESC, desc, TRADE_DESC_MAX_LENGTH)?;
        self.put(keys::TRADE_DESC, desc)
    }

    /// Item names, at most 400 characters. Multiple items are joined with `#`
    /// by the caller.
    pub fn set_item_name(&mut self, name: &str) -> Result<&mut Self> {
        ensure_max_len(keys::ITEM_NAME, name, ITEM_NAME_MAX_LENGTH)?;
        self.put(keys::ITEM_NAME, name)
    }

    /// Server-side URL receiving the payment result notification.
    pub fn set_return_url(&mut self, url: &str) -> Result<&mut Self> {
        self.put(keys::RETURN_URL, url)
    }

    /// URL behind the "back to shop" button on the payment page.
    pub fn set_client_back_url(&mut self, url: &str) -> Result<&mut Self> {
        self.put(keys::CLIENT_BACK_URL, url)
    }

    /// Browser redirect target after payment.
    pub fn set_order_result_url(&mut self, url: &str) -> Result<&mut Self> {
        self.put(keys::ORDER_RESULT_URL, url)
    }

    /// Asks the gateway to include extra payment details in the notification.
    pub fn set_need_extra_paid_info(&mut self, need: YesNo) -> Result<&mut Self> {
        self.put(keys::NEED_EXTRA_PAID_INFO, need)
    }

    /// Sets `CustomField1` to `CustomField4`.
    pub fn set_custom_field(&mut self, index: u8, value: &str) -> Result<&mut Self> {
        let field = indexed(&keys::CUSTOM_FIELDS, index, "CustomField")?;
        self.put(field, value)
    }

    /// Narrows the selected method, e.g. a specific bank or store chain.
    pub fn set_choose_sub_payment(&mut self, sub_payment: &str) -> Result<&mut Self> {
        self.put(keys::CHOOSE_SUB_PAYMENT, sub_payment)
    }

    // AllInOne

    /// Hides payment methods from the all-in-one page (joined with `#`).
    pub fn set_ignore_payment(&mut self, methods: &[ChoosePayment]) -> Result<&mut Self> {
        let joined = methods
            .iter()
            .map(|method| method.as_ref())
            .collect::<Vec<_>>()
            .join("#");
        self.put(keys::IGNORE_PAYMENT, joined)
    }

    // Credit card family

    /// Enables credit card bonus point redemption.
    pub fn set_redeem(&mut self, enable: bool) -> Result<&mut Self> {
        self.put(keys::REDEEM, YesNo::from(enable))
    }

    /// UnionPay selection on the card form.
    pub fn set_union_pay(&mut self, union_pay: UnionPay) -> Result<&mut Self> {
        self.put(keys::UNION_PAY, union_pay)
    }

    /// Member identifier used for card binding.
    pub fn set_merchant_member_id(&mut self, member_id: &str) -> Result<&mut Self> {
        self.put(keys::MERCHANT_MEMBER_ID, member_id)
    }

    /// Offers to remember the card for `MerchantMemberID`.
    pub fn set_binding_card(&mut self, enable: bool) -> Result<&mut Self> {
        self.put(keys::BINDING_CARD, i64::from(enable))
    }

    /// Payment page language.
    pub fn set_language(&mut self, language: Language) -> Result<&mut Self> {
        self.put(keys::LANGUAGE, language)
    }

    /// Number of installments; one of 3, 6, 12, 18 or 24.
    pub fn set_credit_installment(&mut self, periods: u32) -> Result<&mut Self> {
        if !INSTALLMENT_PERIODS.contains(&periods) {
            return Err(PaymentError::invalid(
                keys::CREDIT_INSTALLMENT,
                "Periods must be one of: 3, 6, 12, 18, 24",
            ));
        }
        self.put(keys::CREDIT_INSTALLMENT, periods.to_string())
    }

    /// Amount charged per period; must be greater than 0.
    pub fn set_period_amount(&mut self, amount: i64) -> Result<&mut Self> {
        ensure_positive(keys::PERIOD_AMOUNT, amount)?;
        self.put(keys::PERIOD_AMOUNT, amount)
    }

    pub fn set_period_type(&mut self, period_type: PeriodType) -> Result<&mut Self> {
        self.put(keys::PERIOD_TYPE, period_type)
    }

    /// Periods between charges, in units of `PeriodType`.
    pub fn set_frequency(&mut self, frequency: u32) -> Result<&mut Self> {
        ensure_positive(keys::FREQUENCY, frequency.into())?;
        self.put(keys::FREQUENCY, frequency)
    }

    /// Total number of charges.
    pub fn set_exec_times(&mut self, times: u32) -> Result<&mut Self> {
        ensure_positive(keys::EXEC_TIMES, times.into())?;
        self.put(keys::EXEC_TIMES, times)
    }

    /// URL notified after each recurring charge.
    pub fn set_period_return_url(&mut self, url: &str) -> Result<&mut Self> {
        self.put(keys::PERIOD_RETURN_URL, url)
    }

    // ATM, CVS and barcode

    /// Days the ATM virtual account stays valid.
    pub fn set_expire_date(&mut self, days: u32) -> Result<&mut Self> {
        ensure_range(keys::EXPIRE_DATE, days, 1, 60)?;
        self.put(keys::EXPIRE_DATE, days)
    }

    /// Minutes for CVS codes, days (1 to 7) for barcodes.
    pub fn set_store_expire_date(&mut self, value: u32) -> Result<&mut Self> {
        match self.kind {
            CommandKind::Barcode => ensure_range(keys::STORE_EXPIRE_DATE, value, 1, 7)?,
            _ => ensure_positive(keys::STORE_EXPIRE_DATE, value.into())?,
        }
        self.put(keys::STORE_EXPIRE_DATE, value)
    }

    /// Sets `Desc_1` to `Desc_4`.
    pub fn set_desc(&mut self, index: u8, desc: &str) -> Result<&mut Self> {
        let field = indexed(&keys::DESCS, index, "Desc")?;
        self.put(field, desc)
    }

    /// Server-side URL receiving the issued payment code or account.
    pub fn set_payment_info_url(&mut self, url: &str) -> Result<&mut Self> {
        self.put(keys::PAYMENT_INFO_URL, url)
    }

    /// Browser redirect target showing the issued payment code.
    pub fn set_client_redirect_url(&mut self, url: &str) -> Result<&mut Self> {
        self.put(keys::CLIENT_REDIRECT_URL, url)
    }

    // Queries

    /// Platform merchant identifier for platform-mode queries.
    pub fn set_platform_id(&mut self, platform_id: &str) -> Result<&mut Self> {
        self.put(keys::PLATFORM_ID, platform_id)
    }

    /// Credit card authorization serial (`gwsr`).
    pub fn set_credit_refund_id(&mut self, refund_id: &str) -> Result<&mut Self> {
        self.put(keys::CREDIT_REFUND_ID, refund_id)
    }

    /// Authorized amount; must be greater than 0.
    pub fn set_credit_amount(&mut self, amount: i64) -> Result<&mut Self> {
        ensure_positive(keys::CREDIT_AMOUNT, amount)?;
        self.put(keys::CREDIT_AMOUNT, amount)
    }

    /// Merchant check code issued with the credit card contract.
    pub fn set_credit_check_code(&mut self, code: &str) -> Result<&mut Self> {
        self.put(keys::CREDIT_CHECK_CODE, code)
    }

    /// Whether `StartDate`/`EndDate` refer to close or funding dates.
    pub fn set_pay_date_type(&mut self, date_type: PayDateType) -> Result<&mut Self> {
        self.put(keys::PAY_DATE_TYPE, date_type)
    }

    /// `yyyy-MM-dd`.
    pub fn set_start_date(&mut self, date: &str) -> Result<&mut Self> {
        self.put(keys::START_DATE, date)
    }

    pub fn set_begin_date(&mut self, date: &str) -> Result<&mut Self> {
        self.put(keys::BEGIN_DATE, date)
    }

    /// Last day of the range, inclusive.
    pub fn set_end_date(&mut self, date: &str) -> Result<&mut Self> {
        self.put(keys::END_DATE, date)
    }

    /// Which trade date the range filters on.
    pub fn set_date_type(&mut self, date_type: DateType) -> Result<&mut Self> {
        self.put(keys::DATE_TYPE, date_type)
    }

    /// Report format of the balance download.
    pub fn set_media_format(&mut self, format: MediaFormat) -> Result<&mut Self> {
        self.put(keys::MEDIA_FORMATED, format)
    }

    // Finalization

    /// Validates required fields and returns the unsigned field map.
    ///
    /// Fails with `REQUIRED` for the first missing field in the order given
    /// by [`CommandKind::required_fields`]. Repeatable.
    pub fn payload(&self) -> Result<FieldMap> {
        for field in self.kind.required_fields() {
            let missing = if field == keys::MERCHANT_ID {
                self.merchant_id.is_empty()
            } else {
                self.fields.get(field).is_none_or(FieldValue::is_blank)
            };
            if missing {
                return Err(PaymentError::required(field));
            }
        }

        let mut payload = self.fields.clone();
        payload.insert(keys::MERCHANT_ID.to_string(), self.merchant_id.as_str().into());
        tracing::debug!(kind = %self.kind, fields = payload.len(), "finalized payload");
        Ok(payload)
    }

    /// The finalized payload plus its `CheckMacValue`.
    pub fn content(&self) -> Result<FieldMap> {
        let payload = self.payload()?;
        Ok(self.encoder().encode_payload(&payload))
    }
}
