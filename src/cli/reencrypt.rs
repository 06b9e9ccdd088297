//! Reencrypt command.
//!
//! Brings every entry beneath a directory in line with its `.gpg-id`, or
//! reports the drift without touching anything.

use std::path::Path;

use tracing::info;

use crate::cli::{output, Session};
use crate::core::domain::{Drift, WalkReport};
use crate::core::inspect::GpgInspector;
use crate::core::reencrypt::Reencryptor;
use crate::error::Result;

/// Re-encrypt drifted entries, or list them with `dry_run`.
pub fn execute(session: &Session, dir: Option<&Path>, dry_run: bool, json: bool) -> Result<()> {
    session.require_store()?;
    let dir = dir.unwrap_or_else(|| Path::new(""));
    let inspector = GpgInspector::new(&session.settings, &session.runner);
    let engine = Reencryptor::new(&session.settings, &session.runner, &inspector);

    if dry_run {
        let drift = engine.drift(dir)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&drift)?);
        } else {
            print_drift(&drift);
        }
        return Ok(());
    }

    info!(dir = %dir.display(), "reencrypt requested");
    let report = engine.run(dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_drift(drift: &[Drift]) {
    if drift.is_empty() {
        output::success("all entries match their .gpg-id");
        return;
    }
    output::section(&format!("{} drifted entries", drift.len()));
    for d in drift {
        output::list_item(&output::entry(&d.entry));
        output::kv("actual:  ", d.actual.join(", "));
        output::kv("declared:", d.declared.join(", "));
    }
}

/// Human-readable walk summary.
pub(crate) fn print_report(report: &WalkReport) {
    for advisory in &report.advisories {
        output::warn(&format!(
            "{} exited with status {}",
            advisory.command, advisory.exit_code
        ));
    }
    for name in &report.failed {
        output::warn(&format!("could not decrypt {}, left untouched", output::entry(name)));
    }

    if report.is_converged() {
        output::success(&format!("{} entries already up to date", report.scanned));
        return;
    }
    if !report.reencrypted.is_empty() {
        output::success(&format!("re-encrypted {} entries", report.reencrypted.len()));
        for name in &report.reencrypted {
            output::list_item(&output::entry(name));
        }
    }
    output::kv("scanned:", report.scanned);
    output::kv("up to date:", report.converged);
}
