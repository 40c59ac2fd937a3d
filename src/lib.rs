//! Core of an ECPay (綠界) payment gateway SDK: the `CheckMacValue` checksum
//! engine, typed commands for checkout and query requests, notification
//! verification and a transport-agnostic client.

pub mod application;
pub mod command;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod notify;
pub mod security;

pub use application::client::{ClientConfig, EcPayClient};
pub use command::{Command, CommandKind};
pub use domain::field::{FieldMap, FieldValue, field_map};
pub use error::{PaymentError, Result};
pub use notify::{AtmNotify, CvsNotify, NotifyHandler, PaymentNotify};
pub use security::CheckMacEncoder;
