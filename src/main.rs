use clap::{Parser, Subcommand, ValueEnum};
use ecpay_checkout::domain::enums::EncryptType;
use ecpay_checkout::domain::field::{FieldMap, form_body};
use ecpay_checkout::interfaces::csv::field_reader::FieldReader;
use ecpay_checkout::interfaces::csv::field_writer::FieldWriter;
use ecpay_checkout::{CheckMacEncoder, NotifyHandler, PaymentNotify};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Merchant HashKey
    #[arg(long, env = "ECPAY_HASH_KEY", hide_env_values = true)]
    hash_key: String,

    /// Merchant HashIV
    #[arg(long, env = "ECPAY_HASH_IV", hide_env_values = true)]
    hash_iv: String,

    /// Use the legacy MD5 digest instead of SHA256
    #[arg(long)]
    md5: bool,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Append a CheckMacValue to a `field,value` CSV file
    Sign {
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Check the CheckMacValue of a gateway callback stored as `field,value` CSV
    Verify { input: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Form,
    Json,
}

fn read_fields(path: PathBuf) -> Result<FieldMap> {
    let file = File::open(path).into_diagnostic()?;
    Ok(FieldReader::new(file).into_map()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let encrypt_type = if cli.md5 {
        EncryptType::Md5
    } else {
        EncryptType::Sha256
    };
    let encoder = CheckMacEncoder::new(cli.hash_key, cli.hash_iv, encrypt_type);

    let stdout = io::stdout();
    match cli.command {
        Action::Sign { input, format } => {
            let signed = encoder.encode_payload(&read_fields(input)?);
            match format {
                Format::Csv => FieldWriter::new(stdout.lock()).write_fields(&signed)?,
                Format::Form => writeln!(stdout.lock(), "{}", form_body(&signed)).into_diagnostic()?,
                Format::Json => {
                    let json = serde_json::to_string_pretty(&signed).into_diagnostic()?;
                    writeln!(stdout.lock(), "{json}").into_diagnostic()?;
                }
            }
        }
        Action::Verify { input } => {
            let mut notify = PaymentNotify::with_encoder(encoder);
            notify.verify_or_fail(read_fields(input)?)?;
            writeln!(stdout.lock(), "{}", notify.success_response()).into_diagnostic()?;
        }
    }

    Ok(())
}
