//! Application layer wiring commands, the checksum engine and a transport.
//!
//! `EcPayClient` is the entry point for server-to-server calls such as order
//! queries. It owns the transport behind the `Transport` port so any HTTP
//! stack (or the in-memory double) can be plugged in.

pub mod client;
