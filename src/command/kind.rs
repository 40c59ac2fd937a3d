use crate::domain::canonical::{now_timestamp, unix_timestamp};
use crate::domain::enums::{ChoosePayment, DateType, EncryptType, MediaFormat, PayDateType};
use crate::domain::field::{FieldMap, FieldValue, keys};
use strum::{Display, EnumIter};

pub const CHECKOUT_PATH: &str = "/Cashier/AioCheckOut/V5";
pub const QUERY_ORDER_PATH: &str = "/Cashier/QueryTradeInfo/V5";
pub const QUERY_CREDIT_DETAIL_PATH: &str = "/CreditDetail/QueryTrade/V2";
pub const QUERY_RECURRING_ORDER_PATH: &str = "/Cashier/QueryCreditCardPeriodInfo";
pub const DOWNLOAD_CREDIT_BALANCE_PATH: &str = "/CreditDetail/FundingReconDetail";
pub const DOWNLOAD_MERCHANT_BALANCE_PATH: &str = "/Cashier/TradeNoAio";

const CHECKOUT_FIELDS: &[&str] = &[
    keys::MERCHANT_ID,
    keys::MERCHANT_TRADE_NO,
    keys::MERCHANT_TRADE_DATE,
    keys::PAYMENT_TYPE,
    keys::TOTAL_AMOUNT,
    keys::TRADE_DESC,
    keys::ITEM_NAME,
    keys::RETURN_URL,
    keys::CHOOSE_PAYMENT,
    keys::ENCRYPT_TYPE,
    keys::CLIENT_BACK_URL,
    keys::ORDER_RESULT_URL,
    keys::NEED_EXTRA_PAID_INFO,
    keys::CHOOSE_SUB_PAYMENT,
    keys::CUSTOM_FIELDS[0],
    keys::CUSTOM_FIELDS[1],
    keys::CUSTOM_FIELDS[2],
    keys::CUSTOM_FIELDS[3],
];

const CHECKOUT_REQUIRED: &[&str] = &[
    keys::MERCHANT_ID,
    keys::MERCHANT_TRADE_NO,
    keys::TOTAL_AMOUNT,
    keys::TRADE_DESC,
    keys::ITEM_NAME,
    keys::RETURN_URL,
];

const CREDIT_FIELDS: &[&str] = &[
    keys::REDEEM,
    keys::UNION_PAY,
    keys::MERCHANT_MEMBER_ID,
    keys::BINDING_CARD,
    keys::LANGUAGE,
];

const CREDIT_INSTALLMENT_FIELDS: &[&str] = &[
    keys::REDEEM,
    keys::UNION_PAY,
    keys::MERCHANT_MEMBER_ID,
    keys::BINDING_CARD,
    keys::LANGUAGE,
    keys::CREDIT_INSTALLMENT,
];

const RECURRING_FIELDS: &[&str] = &[
    keys::REDEEM,
    keys::UNION_PAY,
    keys::MERCHANT_MEMBER_ID,
    keys::BINDING_CARD,
    keys::LANGUAGE,
    keys::PERIOD_AMOUNT,
    keys::PERIOD_TYPE,
    keys::FREQUENCY,
    keys::EXEC_TIMES,
    keys::PERIOD_RETURN_URL,
];

const RECURRING_REQUIRED: &[&str] = &[
    keys::PERIOD_AMOUNT,
    keys::PERIOD_TYPE,
    keys::FREQUENCY,
    keys::EXEC_TIMES,
    keys::PERIOD_RETURN_URL,
];

const ATM_FIELDS: &[&str] = &[
    keys::EXPIRE_DATE,
    keys::PAYMENT_INFO_URL,
    keys::CLIENT_REDIRECT_URL,
];

const STORE_FIELDS: &[&str] = &[
    keys::STORE_EXPIRE_DATE,
    keys::DESCS[0],
    keys::DESCS[1],
    keys::DESCS[2],
    keys::DESCS[3],
    keys::PAYMENT_INFO_URL,
    keys::CLIENT_REDIRECT_URL,
];

const QUERY_ORDER_FIELDS: &[&str] = &[
    keys::MERCHANT_ID,
    keys::MERCHANT_TRADE_NO,
    keys::TIME_STAMP,
    keys::PLATFORM_ID,
];

const QUERY_RECURRING_FIELDS: &[&str] = &[keys::MERCHANT_ID, keys::MERCHANT_TRADE_NO, keys::TIME_STAMP];

const QUERY_BY_TRADE_NO_REQUIRED: &[&str] = &[keys::MERCHANT_ID, keys::MERCHANT_TRADE_NO];

const CREDIT_DETAIL_FIELDS: &[&str] = &[
    keys::MERCHANT_ID,
    keys::CREDIT_REFUND_ID,
    keys::CREDIT_AMOUNT,
    keys::CREDIT_CHECK_CODE,
];

const CREDIT_BALANCE_FIELDS: &[&str] = &[
    keys::MERCHANT_ID,
    keys::PAY_DATE_TYPE,
    keys::START_DATE,
    keys::END_DATE,
];

const CREDIT_BALANCE_REQUIRED: &[&str] = &[keys::MERCHANT_ID, keys::START_DATE, keys::END_DATE];

const MERCHANT_BALANCE_FIELDS: &[&str] = &[
    keys::MERCHANT_ID,
    keys::DATE_TYPE,
    keys::BEGIN_DATE,
    keys::END_DATE,
    keys::MEDIA_FORMATED,
];

const MERCHANT_BALANCE_REQUIRED: &[&str] = &[keys::MERCHANT_ID, keys::BEGIN_DATE, keys::END_DATE];

/// Every concrete command the gateway accepts.
///
/// Checkout variants share the AioCheckOut field set and differ only in their
/// payment selector and a small delta of extra fields. Queries carry their
/// own field sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum CommandKind {
    AllInOne,
    Credit,
    CreditInstallment,
    CreditRecurring,
    Atm,
    WebAtm,
    Cvs,
    Barcode,
    ApplePay,
    Twqr,
    Bnpl,
    WeChat,
    QueryOrder,
    QueryCreditDetail,
    QueryRecurringOrder,
    DownloadCreditBalance,
    DownloadMerchantBalance,
}

impl CommandKind {
    pub fn is_checkout(self) -> bool {
        self.choose_payment().is_some()
    }

    pub fn request_path(self) -> &'static str {
        match self {
            Self::QueryOrder => QUERY_ORDER_PATH,
            Self::QueryCreditDetail => QUERY_CREDIT_DETAIL_PATH,
            Self::QueryRecurringOrder => QUERY_RECURRING_ORDER_PATH,
            Self::DownloadCreditBalance => DOWNLOAD_CREDIT_BALANCE_PATH,
            Self::DownloadMerchantBalance => DOWNLOAD_MERCHANT_BALANCE_PATH,
            _ => CHECKOUT_PATH,
        }
    }

    /// Default `ChoosePayment`; `None` for queries, which do not send one.
    pub fn choose_payment(self) -> Option<ChoosePayment> {
        let choose = match self {
            Self::AllInOne => ChoosePayment::All,
            Self::Credit | Self::CreditInstallment | Self::CreditRecurring => ChoosePayment::Credit,
            Self::Atm => ChoosePayment::Atm,
            Self::WebAtm => ChoosePayment::WebAtm,
            Self::Cvs => ChoosePayment::Cvs,
            Self::Barcode => ChoosePayment::Barcode,
            Self::ApplePay => ChoosePayment::ApplePay,
            Self::Twqr => ChoosePayment::Twqr,
            Self::Bnpl => ChoosePayment::Bnpl,
            Self::WeChat => ChoosePayment::WeChat,
            Self::QueryOrder
            | Self::QueryCreditDetail
            | Self::QueryRecurringOrder
            | Self::DownloadCreditBalance
            | Self::DownloadMerchantBalance => return None,
        };
        Some(choose)
    }

    /// Fields this kind adds on top of the shared checkout set. Queries list
    /// their whole field set here.
    pub fn extra_fields(self) -> &'static [&'static str] {
        match self {
            Self::AllInOne => &[keys::IGNORE_PAYMENT],
            Self::Credit => CREDIT_FIELDS,
            Self::CreditInstallment => CREDIT_INSTALLMENT_FIELDS,
            Self::CreditRecurring => RECURRING_FIELDS,
            Self::Atm => ATM_FIELDS,
            Self::Cvs | Self::Barcode => STORE_FIELDS,
            Self::WebAtm | Self::ApplePay | Self::Twqr | Self::Bnpl | Self::WeChat => &[],
            Self::QueryOrder => QUERY_ORDER_FIELDS,
            Self::QueryCreditDetail => CREDIT_DETAIL_FIELDS,
            Self::QueryRecurringOrder => QUERY_RECURRING_FIELDS,
            Self::DownloadCreditBalance => CREDIT_BALANCE_FIELDS,
            Self::DownloadMerchantBalance => MERCHANT_BALANCE_FIELDS,
        }
    }

    pub fn accepts(self, field: &str) -> bool {
        let listed = |set: &[&str]| set.iter().any(|known| *known == field);
        (self.is_checkout() && listed(CHECKOUT_FIELDS)) || listed(self.extra_fields())
    }

    /// Required fields in the order they are checked at finalization.
    pub fn required_fields(self) -> Vec<&'static str> {
        match self {
            Self::CreditRecurring => CHECKOUT_REQUIRED
                .iter()
                .chain(RECURRING_REQUIRED)
                .copied()
                .collect(),
            Self::QueryOrder | Self::QueryRecurringOrder => QUERY_BY_TRADE_NO_REQUIRED.to_vec(),
            Self::QueryCreditDetail => CREDIT_DETAIL_FIELDS.to_vec(),
            Self::DownloadCreditBalance => CREDIT_BALANCE_REQUIRED.to_vec(),
            Self::DownloadMerchantBalance => MERCHANT_BALANCE_REQUIRED.to_vec(),
            _ => CHECKOUT_REQUIRED.to_vec(),
        }
    }

    /// Initial field map for a freshly created command.
    pub(crate) fn initial_fields(self, merchant_id: &str, encrypt_type: EncryptType) -> FieldMap {
        let mut fields = FieldMap::new();
        let mut put = |key: &str, value: FieldValue| {
            fields.insert(key.to_string(), value);
        };
        put(keys::MERCHANT_ID, merchant_id.into());

        if let Some(choose) = self.choose_payment() {
            put(keys::MERCHANT_TRADE_NO, "".into());
            put(keys::MERCHANT_TRADE_DATE, now_timestamp().into());
            put(keys::PAYMENT_TYPE, "aio".into());
            put(keys::TOTAL_AMOUNT, FieldValue::Int(0));
            put(keys::TRADE_DESC, "".into());
            put(keys::ITEM_NAME, "".into());
            put(keys::RETURN_URL, "".into());
            put(keys::CHOOSE_PAYMENT, choose.into());
            put(keys::ENCRYPT_TYPE, encrypt_type.into());
            return fields;
        }

        match self {
            Self::QueryOrder | Self::QueryRecurringOrder => {
                put(keys::MERCHANT_TRADE_NO, "".into());
                put(keys::TIME_STAMP, unix_timestamp().into());
            }
            Self::DownloadCreditBalance => {
                put(keys::PAY_DATE_TYPE, PayDateType::Close.into());
                put(keys::START_DATE, "".into());
                put(keys::END_DATE, "".into());
            }
            Self::DownloadMerchantBalance => {
                put(keys::DATE_TYPE, DateType::Payment.into());
                put(keys::BEGIN_DATE, "".into());
                put(keys::END_DATE, "".into());
                put(keys::MEDIA_FORMATED, MediaFormat::Text.into());
            }
            _ => {}
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_request_paths() {
        assert_eq!(CommandKind::Credit.request_path(), "/Cashier/AioCheckOut/V5");
        assert_eq!(CommandKind::QueryOrder.request_path(), "/Cashier/QueryTradeInfo/V5");
        assert_eq!(
            CommandKind::DownloadMerchantBalance.request_path(),
            "/Cashier/TradeNoAio"
        );
    }

    #[test]
    fn test_every_required_field_is_accepted() {
        for kind in CommandKind::iter() {
            for field in kind.required_fields() {
                assert!(kind.accepts(field), "{kind} does not accept {field}");
            }
        }
    }

    #[test]
    fn test_every_initial_field_is_accepted() {
        for kind in CommandKind::iter() {
            for field in kind.initial_fields("2000132", EncryptType::Sha256).keys() {
                assert!(kind.accepts(field), "{kind} does not accept {field}");
            }
        }
    }

    #[test]
    fn test_recurring_required_order() {
        let required = CommandKind::CreditRecurring.required_fields();
        assert_eq!(required[5], keys::RETURN_URL);
        assert_eq!(required[6], keys::PERIOD_AMOUNT);
        assert_eq!(required.last(), Some(&keys::PERIOD_RETURN_URL));
    }

    #[test]
    fn test_deltas_are_scoped() {
        assert!(CommandKind::Credit.accepts(keys::REDEEM));
        assert!(!CommandKind::Atm.accepts(keys::REDEEM));
        assert!(!CommandKind::Credit.accepts(keys::CREDIT_INSTALLMENT));
        assert!(CommandKind::Barcode.accepts(keys::DESCS[3]));
        assert!(!CommandKind::QueryOrder.accepts(keys::TOTAL_AMOUNT));
        assert!(CommandKind::QueryOrder.accepts(keys::PLATFORM_ID));
    }

    #[test]
    fn test_queries_have_no_choose_payment() {
        let fields = CommandKind::QueryOrder.initial_fields("2000132", EncryptType::Sha256);
        assert!(!fields.contains_key(keys::CHOOSE_PAYMENT));
        assert!(fields.contains_key(keys::TIME_STAMP));
        assert!(!CommandKind::QueryOrder.is_checkout());
    }
}
