//! Gatekeeper license operator tool.
//!
//! Usage:
//!   gatekeeper keygen --out license_sk.hex
//!   gatekeeper issue --secret license_sk.hex --domain example.com --days 365
//!   gatekeeper validate GF-example.com-UNLIMITED-... --domain https://example.com/
//!   gatekeeper render --config gatekeeper.toml --domain example.com
//!
//! Only `issue` and `keygen` touch the secret key. Keep it off any machine
//! that serves the script.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "gatekeeper")]
#[command(about = "Issue and check Gatekeeper license keys")]
struct Args {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a license key
    Validate {
        /// License key (falls back to GATEKEEPER_LICENSE_KEY)
        #[arg(env = "GATEKEEPER_LICENSE_KEY")]
        token: String,
        /// Domain or page URL the key must cover
        #[arg(short, long)]
        domain: Option<String>,
        /// Hex public key to verify against instead of the embedded one
        #[arg(long)]
        public_key: Option<String>,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a license key's shape without verifying its signature
    CheckFormat {
        token: String,
    },

    /// Print the hostname of a URL or bare domain
    ExtractDomain {
        input: String,
    },

    /// Generate a new signing key pair
    Keygen {
        /// Where to write the hex-encoded secret key
        #[arg(short, long, default_value = "license_sk.hex")]
        out: PathBuf,
    },

    /// Issue a license key
    Issue {
        /// Hex-encoded secret key file
        #[arg(short, long, default_value = "license_sk.hex")]
        secret: PathBuf,
        /// Licensed domain, e.g. example.com or *.example.com
        #[arg(short, long)]
        domain: String,
        /// Expiry date as YYYYMMDD, or UNLIMITED
        #[arg(long)]
        expires: Option<String>,
        /// Expire this many days from today
        #[arg(long)]
        days: Option<u64>,
    },

    /// Render the protection script
    Render {
        /// Script configuration file
        #[arg(short, long, default_value = "gatekeeper.toml")]
        config: PathBuf,
        /// Domain or page URL the script is served for
        #[arg(short, long)]
        domain: Option<String>,
        /// Hex public key to verify against instead of the embedded one
        #[arg(long)]
        public_key: Option<String>,
        /// Write the script here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::Validate { token, domain, public_key, json } => {
            let output = gatekeeper_cli::validate(&token, domain.as_deref(), public_key.as_deref(), json)?;
            println!("{}", output.report);
            return Ok(if output.valid { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Command::CheckFormat { token } => {
            let ok = gatekeeper_cli::check_format(&token);
            println!("{}", if ok { "well-formed" } else { "malformed" });
            return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Command::ExtractDomain { input } => match gatekeeper_cli::extract(&input) {
            Some(host) => println!("{host}"),
            None => return Ok(ExitCode::FAILURE),
        },
        Command::Keygen { out } => {
            println!("{}", gatekeeper_cli::keygen(&out)?);
        }
        Command::Issue { secret, domain, expires, days } => {
            let today = chrono::Utc::now().date_naive();
            let expiry = gatekeeper_cli::resolve_expiry(expires.as_deref(), days, today)?;
            println!("{}", gatekeeper_cli::issue(&secret, &domain, expiry)?);
        }
        Command::Render { config, domain, public_key, out } => {
            let script = gatekeeper_cli::render(&config, domain.as_deref(), public_key.as_deref())?;
            match out {
                Some(path) => std::fs::write(&path, script)?,
                None => print!("{script}"),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
