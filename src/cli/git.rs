//! Git command - init, pull and push the store repository.

use crate::cli::{output, GitAction, Session};
use crate::core::git::VersionSync;
use crate::error::Result;

/// Run one git action and wait for it.
pub fn execute(session: &mut Session, action: GitAction) -> Result<()> {
    let git = VersionSync::new(&session.settings, &session.runner);
    let (job, done) = match action {
        GitAction::Init => {
            std::fs::create_dir_all(&session.settings.store)?;
            (git.init()?, "initialized git repository")
        }
        GitAction::Pull => {
            session.require_store()?;
            (git.pull()?, "pulled")
        }
        GitAction::Push => {
            session.require_store()?;
            (git.push()?, "pushed")
        }
    };

    let succeeded = session.settle(&[job]).iter().all(|c| c.succeeded());
    if succeeded {
        output::success(done);
    }
    Ok(())
}
