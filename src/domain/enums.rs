use super::field::FieldValue;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Payment method selector sent as `ChoosePayment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize, Deserialize)]
pub enum ChoosePayment {
    #[strum(serialize = "ALL")]
    #[serde(rename = "ALL")]
    All,
    Credit,
    #[strum(serialize = "WebATM")]
    #[serde(rename = "WebATM")]
    WebAtm,
    #[strum(serialize = "ATM")]
    #[serde(rename = "ATM")]
    Atm,
    #[strum(serialize = "CVS")]
    #[serde(rename = "CVS")]
    Cvs,
    #[strum(serialize = "BARCODE")]
    #[serde(rename = "BARCODE")]
    Barcode,
    ApplePay,
    #[strum(serialize = "TWQR")]
    #[serde(rename = "TWQR")]
    Twqr,
    #[strum(serialize = "BNPL")]
    #[serde(rename = "BNPL")]
    Bnpl,
    #[strum(serialize = "WeiXin")]
    #[serde(rename = "WeiXin")]
    WeChat,
}

/// Digest used for `CheckMacValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptType {
    #[default]
    #[strum(serialize = "SHA256")]
    Sha256,
    #[strum(serialize = "MD5")]
    Md5,
}

impl EncryptType {
    /// Numeric code carried in the `EncryptType` field.
    pub fn code(self) -> i64 {
        match self {
            Self::Sha256 => 1,
            Self::Md5 => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum PeriodType {
    #[strum(serialize = "D")]
    Day,
    #[strum(serialize = "M")]
    Month,
    #[strum(serialize = "Y")]
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum YesNo {
    #[strum(serialize = "Y")]
    Yes,
    #[strum(serialize = "N")]
    No,
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionPay {
    No = 0,
    Yes = 1,
    Priority = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum Language {
    #[strum(serialize = "ENG")]
    English,
    /// Gateway default (Traditional Chinese).
    #[strum(serialize = "")]
    Default,
}

/// Credit-card reconciliation date basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PayDateType {
    Close,
    Fund,
}

/// Date basis for merchant balance downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum DateType {
    #[strum(serialize = "2")]
    Payment,
    #[strum(serialize = "4")]
    Allocation,
    #[strum(serialize = "5")]
    Reject,
    #[strum(serialize = "6")]
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum MediaFormat {
    #[strum(serialize = "0")]
    Text,
    #[strum(serialize = "1")]
    Xml,
}

macro_rules! text_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Text(value.as_ref().to_string())
                }
            }
        )+
    };
}

text_field!(ChoosePayment, PeriodType, YesNo, Language, PayDateType, DateType, MediaFormat);

impl From<EncryptType> for FieldValue {
    fn from(value: EncryptType) -> Self {
        FieldValue::Int(value.code())
    }
}

impl From<UnionPay> for FieldValue {
    fn from(value: UnionPay) -> Self {
        FieldValue::Int(value as i64)
    }
}
