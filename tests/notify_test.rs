mod common;

use common::*;
use ecpay_checkout::domain::enums::EncryptType;
use ecpay_checkout::domain::field::keys;
use ecpay_checkout::notify::SUCCESS_RESPONSE;
use ecpay_checkout::{
    AtmNotify, CheckMacEncoder, FieldMap, NotifyHandler, PaymentError, PaymentNotify, field_map,
};

fn callback_with(check_mac: &str) -> FieldMap {
    let mut data = field_map(CALLBACK);
    data.insert(keys::CHECK_MAC_VALUE.to_string(), check_mac.into());
    data
}

#[test]
fn test_known_callback_verifies() {
    let mut notify = PaymentNotify::new(HASH_KEY, HASH_IV);
    assert!(notify.verify(callback_with(CALLBACK_SHA256)));
    assert!(notify.is_verified());
    assert!(notify.is_success());
    assert_eq!(notify.merchant_id(), MERCHANT_ID);
    assert_eq!(notify.rtn_msg(), "Succeeded");
    assert_eq!(notify.trade_amt(), 100);
    assert_eq!(notify.success_response(), SUCCESS_RESPONSE);
}

#[test]
fn test_tampered_amount_is_rejected() {
    let mut data = callback_with(CALLBACK_SHA256);
    data.insert(keys::TRADE_AMT.to_string(), "1".into());

    let mut notify = PaymentNotify::new(HASH_KEY, HASH_IV);
    assert!(matches!(
        notify.verify_or_fail(data),
        Err(PaymentError::CheckMacFailed)
    ));
    assert!(!notify.is_verified());
    assert_eq!(notify.trade_amt(), 1);
}

#[test]
fn test_missing_check_mac_is_rejected() {
    let mut notify = PaymentNotify::new(HASH_KEY, HASH_IV);
    assert!(!notify.verify(field_map(CALLBACK)));
}

#[test]
fn test_md5_callback_needs_md5_encoder() {
    let md5 = CheckMacEncoder::new(HASH_KEY, HASH_IV, EncryptType::Md5);

    let mut notify = PaymentNotify::new(HASH_KEY, HASH_IV);
    assert!(!notify.verify(callback_with(CALLBACK_MD5)));

    let mut notify = PaymentNotify::with_encoder(md5);
    assert!(notify.verify(callback_with(CALLBACK_MD5)));
}

#[test]
fn test_atm_payment_info() {
    let encoder = CheckMacEncoder::new(HASH_KEY, HASH_IV, EncryptType::Sha256);
    let data = encoder.encode_payload(&field_map([
        ("MerchantID", MERCHANT_ID),
        ("MerchantTradeNo", "Test123456"),
        ("RtnCode", "2"),
        ("BankCode", "812"),
        ("vAccount", "9103522175887271"),
        ("ExpireDate", "2024/01/12"),
        ("CustomField1", "order-7"),
        ("SimulatePaid", "1"),
    ]));

    let mut notify = AtmNotify::with_encoder(encoder);
    notify.verify_or_fail(data).unwrap();
    assert_eq!(notify.bank_code(), "812");
    assert_eq!(notify.v_account(), "9103522175887271");
    assert_eq!(notify.expire_date(), "2024/01/12");
    assert_eq!(notify.merchant_trade_no(), "Test123456");
    assert_eq!(notify.custom_field(1), "order-7");
    assert!(notify.is_simulate_paid());
    assert!(!notify.is_success());
}
