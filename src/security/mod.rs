pub mod check_mac;

pub use check_mac::CheckMacEncoder;
