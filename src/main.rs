//! Passkeep - a password store with recipient-drift re-encryption.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use passkeep::cli::output;
use passkeep::cli::{execute, Cli};
use passkeep::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("PASSKEEP_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("passkeep=debug")
        } else {
            EnvFilter::new("passkeep=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, &cli.store) {
        let suggestion = match &e {
            Error::AccessControlMissing { .. } => Some("run: passkeep init <key-id>"),
            Error::NoSecretKeyAvailable => Some("run: passkeep keys, then init with a key marked sec"),
            Error::InvalidKeySelector { .. } => {
                Some("use a long key id or fingerprint, see: passkeep keys")
            }
            Error::Config(ConfigError::StoreNotFound(_)) => Some("run: passkeep init <key-id>"),
            Error::Config(ConfigError::ToolNotFound(_)) => {
                Some("set --gpg / --git-bin or PASSKEEP_GPG / PASSKEEP_GIT")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
