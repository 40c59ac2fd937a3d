#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::{Path, PathBuf};

/// Stage credentials of the public test merchant 2000132.
pub const HASH_KEY: &str = "5294y06JbISpM5x9";
pub const HASH_IV: &str = "v77hoKGq4kWxNNIS";
pub const MERCHANT_ID: &str = "2000132";

/// Credentials used by the gateway's published AioCheckOut example.
pub const DOC_HASH_KEY: &str = "pwFHCqoQZGmho4w6";
pub const DOC_HASH_IV: &str = "EkRm7iFT261dpevs";
pub const DOC_MERCHANT_ID: &str = "3002607";
pub const DOC_CHECK_MAC_VALUE: &str =
    "6C51C9E6888DE861FD62FB1DD17029FC742634498FD813DC43D4243B5685B840";

/// A successful callback for merchant 2000132 and its SHA256 checksum.
pub const CALLBACK: [(&str, &str); 4] = [
    ("MerchantID", "2000132"),
    ("RtnCode", "1"),
    ("RtnMsg", "Succeeded"),
    ("TradeAmt", "100"),
];
pub const CALLBACK_SHA256: &str =
    "5AC1F1842F1260B105FFCB26F2362AFBEB553B530EA915637E6CCF78DA695256";
pub const CALLBACK_MD5: &str = "C8E72976E197BD1A3ACAB2F38821B4D1";

pub fn write_fields_csv(dir: &Path, name: &str, rows: &[(&str, &str)]) -> Result<PathBuf, Error> {
    let path = dir.join(name);
    let file = File::create(&path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["field", "value"])?;
    for (field, value) in rows {
        wtr.write_record([*field, *value])?;
    }

    wtr.flush()?;
    Ok(path)
}
