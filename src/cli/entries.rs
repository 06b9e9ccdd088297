//! Entry commands.
//!
//! Implements insert, show, rm and ls.

use std::io::{self, Read, Write};

use dialoguer::{Confirm, Password};
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::{output, Session};
use crate::core::exec::Completion;
use crate::core::entry::EntryMutator;
use crate::core::store::Store;
use crate::error::{Error, Result};

fn interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Read the secret from a hidden prompt, or from stdin when piped.
///
/// Piped input is taken byte for byte, so secrets need not be UTF-8.
fn read_secret(name: &str) -> Result<Zeroizing<Vec<u8>>> {
    if interactive() {
        let value = Password::new()
            .with_prompt(format!("Secret for {}", output::entry(name)))
            .with_confirmation("Retype secret", "secrets do not match")
            .interact()?;
        return Ok(Zeroizing::new(value.into_bytes()));
    }
    let mut input = Zeroizing::new(Vec::new());
    io::stdin().read_to_end(&mut input)?;
    Ok(input)
}

/// Insert a new entry, or overwrite one with `force`.
pub fn insert(session: &mut Session, name: &str, force: bool) -> Result<()> {
    session.require_store()?;
    let store = Store::new(&session.settings.store);
    let exists = store.ciphertext_path(name)?.is_file();

    if exists && !force {
        let overwrite = interactive()
            && Confirm::new()
                .with_prompt(format!("{} already exists. Overwrite?", output::entry(name)))
                .default(false)
                .interact()?;
        if !overwrite {
            return Err(Error::InvalidEntry {
                name: name.to_string(),
                reason: "entry already exists, use --force to overwrite",
            });
        }
    }

    let secret = read_secret(name)?;
    if secret.is_empty() {
        return Err(Error::InvalidEntry {
            name: name.to_string(),
            reason: "secret is empty",
        });
    }

    info!(entry = %name, overwrite = exists, "inserting entry");
    let jobs = EntryMutator::new(&session.settings, &session.runner).create(
        name,
        secret.as_slice(),
        exists,
    )?;
    let encrypted = session
        .settle(&jobs)
        .first()
        .is_some_and(|c| c.succeeded());
    if encrypted {
        let verb = if exists { "updated" } else { "added" };
        output::success(&format!("{} {}", verb, output::entry(name)));
    }
    Ok(())
}

/// Decrypt an entry and print it.
pub fn show(session: &mut Session, name: &str) -> Result<()> {
    let store = Store::new(&session.settings.store);
    if !store.ciphertext_path(name)?.is_file() {
        return Err(Error::EntryNotFound(name.to_string()));
    }

    let job = EntryMutator::new(&session.settings, &session.runner).show(name)?;
    let completions = session.settle(&[job]);
    let mut stdout = io::stdout().lock();
    for completion in completions {
        if let Ok(out) = &completion.result {
            if out.success() {
                stdout.write_all(&out.stdout)?;
            }
        }
    }
    stdout.flush()?;
    Ok(())
}

/// Remove an entry, or a directory with `recursive`.
pub fn rm(session: &mut Session, name: &str, recursive: bool, yes: bool) -> Result<()> {
    let store = Store::new(&session.settings.store);
    let target = if recursive {
        store.dir_path(name)?
    } else {
        store.ciphertext_path(name)?
    };
    if !target.exists() {
        return Err(Error::EntryNotFound(name.to_string()));
    }

    if !yes {
        let what = if recursive { "directory" } else { "entry" };
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {} {}?", what, output::entry(name)))
            .default(false)
            .interact()?;
        if !confirmed {
            output::dimmed("nothing removed");
            return Ok(());
        }
    }

    let jobs = EntryMutator::new(&session.settings, &session.runner).delete(name, recursive)?;
    let removed = session.settle(&jobs).iter().all(Completion::succeeded) && !target.exists();
    if removed {
        output::success(&format!("removed {}", output::entry(name)));
    }
    Ok(())
}

/// List entries in walk order.
pub fn list(session: &Session, json: bool) -> Result<()> {
    session.require_store()?;
    let store = Store::new(&session.settings.store);
    let names: Vec<String> = store
        .entries(store.root())?
        .iter()
        .map(|p| store.entry_name(p))
        .collect();

    if json {
        let result = serde_json::json!({
            "entries": names,
            "count": names.len()
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if names.is_empty() {
        output::dimmed("store is empty");
    } else {
        output::section(&format!("{} entries", names.len()));
        for name in &names {
            output::list_item(name);
        }
    }
    Ok(())
}
