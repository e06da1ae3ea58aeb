//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of Git
//! operations the update-file workflow needs, allowing the orchestrator to
//! run against a real repository or a recording mock.
//!
//! # Overview
//!
//! - [repository::Git2Vcs]: A real implementation using the `git2` crate
//! - [mock::MockVcs]: A mock implementation for testing
//!
//! ```rust
//! # use version_bump::git::Vcs;
//! # use std::path::Path;
//! # fn example<V: Vcs>(vcs: &V) -> version_bump::Result<()> {
//! vcs.configure_identity("GitHub Action", "action@github.com")?;
//! vcs.stage_file(Path::new("build.gradle"))?;
//! vcs.commit("Increment version to 1.1.0")?;
//! vcs.push("origin", "feature/login", false)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{MockVcs, VcsCall};
pub use repository::Git2Vcs;

use crate::error::Result;
use std::path::Path;

/// Version-control operations used to persist a version bump
///
/// ## Error Handling
///
/// Implementations map every underlying failure to
/// [crate::error::BumpError::VcsOperationFailed].
pub trait Vcs {
    /// Set the author/committer identity used by [Vcs::commit]
    fn configure_identity(&self, name: &str, email: &str) -> Result<()>;

    /// Stage a single file
    ///
    /// `path` may be absolute or relative to the current directory; it must
    /// lie inside the repository work tree.
    fn stage_file(&self, path: &Path) -> Result<()>;

    /// Commit the staged changes on top of HEAD
    ///
    /// # Returns
    /// * `Ok(String)` - Hash of the new commit
    fn commit(&self, message: &str) -> Result<String>;

    /// Push HEAD to `refs/heads/<branch>` on `remote`
    ///
    /// With `force` the remote branch is overwritten even when the push is not
    /// a fast-forward.
    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()>;
}

/// Refspec pushing HEAD to `branch`, prefixed with `+` when forced.
pub fn push_refspec(branch: &str, force: bool) -> String {
    let prefix = if force { "+" } else { "" };
    format!("{}HEAD:refs/heads/{}", prefix, branch)
}

/// Commit message recorded for a version bump.
pub fn commit_message(new_version: &str) -> String {
    format!("Increment version to {}", new_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_refspec() {
        assert_eq!(push_refspec("main", false), "HEAD:refs/heads/main");
        assert_eq!(
            push_refspec("feature/x", true),
            "+HEAD:refs/heads/feature/x"
        );
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(commit_message("1.1.0"), "Increment version to 1.1.0");
    }
}
