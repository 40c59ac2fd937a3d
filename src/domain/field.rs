use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Gateway field names shared by commands, the checksum engine and notifications.
pub mod keys {
    pub const CHECK_MAC_VALUE: &str = "CheckMacValue";

    pub const MERCHANT_ID: &str = "MerchantID";
    pub const MERCHANT_TRADE_NO: &str = "MerchantTradeNo";
    pub const MERCHANT_TRADE_DATE: &str = "MerchantTradeDate";
    pub const PAYMENT_TYPE: &str = "PaymentType";
    pub const TOTAL_AMOUNT: &str = "TotalAmount";
    pub const TRADE_DESC: &str = "TradeDesc";
    pub const ITEM_NAME: &str = "ItemName";
    pub const RETURN_URL: &str = "ReturnURL";
    pub const CHOOSE_PAYMENT: &str = "ChoosePayment";
    pub const ENCRYPT_TYPE: &str = "EncryptType";
    pub const CLIENT_BACK_URL: &str = "ClientBackURL";
    pub const ORDER_RESULT_URL: &str = "OrderResultURL";
    pub const NEED_EXTRA_PAID_INFO: &str = "NeedExtraPaidInfo";
    pub const CHOOSE_SUB_PAYMENT: &str = "ChooseSubPayment";
    pub const CUSTOM_FIELDS: [&str; 4] = ["CustomField1", "CustomField2", "CustomField3", "CustomField4"];

    pub const IGNORE_PAYMENT: &str = "IgnorePayment";

    pub const REDEEM: &str = "Redeem";
    pub const UNION_PAY: &str = "UnionPay";
    pub const MERCHANT_MEMBER_ID: &str = "MerchantMemberID";
    pub const BINDING_CARD: &str = "BindingCard";
    pub const LANGUAGE: &str = "Language";
    pub const CREDIT_INSTALLMENT: &str = "CreditInstallment";

    pub const PERIOD_AMOUNT: &str = "PeriodAmount";
    pub const PERIOD_TYPE: &str = "PeriodType";
    pub const FREQUENCY: &str = "Frequency";
    pub const EXEC_TIMES: &str = "ExecTimes";
    pub const PERIOD_RETURN_URL: &str = "PeriodReturnURL";

    pub const EXPIRE_DATE: &str = "ExpireDate";
    pub const STORE_EXPIRE_DATE: &str = "StoreExpireDate";
    pub const PAYMENT_INFO_URL: &str = "PaymentInfoURL";
    pub const CLIENT_REDIRECT_URL: &str = "ClientRedirectURL";
    pub const DESCS: [&str; 4] = ["Desc_1", "Desc_2", "Desc_3", "Desc_4"];

    pub const TIME_STAMP: &str = "TimeStamp";
    pub const PLATFORM_ID: &str = "PlatformID";
    pub const CREDIT_REFUND_ID: &str = "CreditRefundId";
    pub const CREDIT_AMOUNT: &str = "CreditAmount";
    pub const CREDIT_CHECK_CODE: &str = "CreditCheckCode";
    pub const PAY_DATE_TYPE: &str = "PayDateType";
    pub const START_DATE: &str = "StartDate";
    pub const END_DATE: &str = "EndDate";
    pub const DATE_TYPE: &str = "DateType";
    pub const BEGIN_DATE: &str = "BeginDate";
    pub const MEDIA_FORMATED: &str = "MediaFormated";

    pub const RTN_CODE: &str = "RtnCode";
    pub const RTN_MSG: &str = "RtnMsg";
    pub const TRADE_NO: &str = "TradeNo";
    pub const TRADE_AMT: &str = "TradeAmt";
    pub const PAYMENT_DATE: &str = "PaymentDate";
    pub const SIMULATE_PAID: &str = "SimulatePaid";
    pub const BANK_CODE: &str = "BankCode";
    pub const V_ACCOUNT: &str = "vAccount";
    pub const PAYMENT_NO: &str = "PaymentNo";
    pub const BARCODES: [&str; 3] = ["Barcode1", "Barcode2", "Barcode3"];
}

/// A scalar gateway value.
///
/// Integers render in plain base-10; enumerations are stored as their tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// Whether the value counts as unset for required-field checks.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Int(value) => *value == 0,
            Self::Text(value) => value.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

/// Flat string-keyed set of transaction parameters exchanged with the gateway.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Builds a [`FieldMap`] from `(key, value)` pairs.
pub fn field_map<I, K, V>(pairs: I) -> FieldMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

// application/x-www-form-urlencoded byte set; space is handled separately.
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b' ');

fn form_encode(text: &str) -> String {
    utf8_percent_encode(text, FORM).to_string().replace(' ', "+")
}

/// Renders `map` as an `application/x-www-form-urlencoded` body.
pub fn form_body(map: &FieldMap) -> String {
    map.iter()
        .map(|(key, value)| format!("{}={}", form_encode(key), form_encode(&value.to_string())))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_decode(text: &str) -> String {
    let spaced = text.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parses an `application/x-www-form-urlencoded` gateway response body.
///
/// `+` decodes to a space and `%2B` to a literal `+`, so any body produced by
/// [`form_body`] parses back to the same map. Pairs with an empty key are
/// skipped and a value containing `=` keeps everything after the first one.
pub fn parse_form(text: &str) -> FieldMap {
    text.split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            Some((form_decode(key), FieldValue::Text(form_decode(value))))
        })
        .collect()
}
