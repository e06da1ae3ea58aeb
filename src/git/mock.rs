use crate::error::{BumpError, Result};
use crate::git::Vcs;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A call observed by [MockVcs]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    ConfigureIdentity { name: String, email: String },
    Stage(PathBuf),
    Commit(String),
    Push {
        remote: String,
        branch: String,
        force: bool,
    },
}

/// Mock VCS for testing without actual git operations
///
/// Records every call in order. A failing operation can be injected with
/// [MockVcs::failing_on].
#[derive(Default)]
pub struct MockVcs {
    calls: RefCell<Vec<VcsCall>>,
    fail_on: Option<&'static str>,
}

impl MockVcs {
    /// Create a mock where every operation succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose `operation` (`"stage"`, `"commit"`, `"push"`, ...)
    /// fails with a VCS error
    pub fn failing_on(operation: &'static str) -> Self {
        MockVcs {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(operation),
        }
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.borrow().clone()
    }

    /// Commit messages recorded so far
    pub fn commits(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                VcsCall::Commit(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, operation: &'static str, call: VcsCall) -> Result<()> {
        if self.fail_on == Some(operation) {
            return Err(BumpError::vcs(format!("mock {} failure", operation)));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Vcs for MockVcs {
    fn configure_identity(&self, name: &str, email: &str) -> Result<()> {
        self.record(
            "configure_identity",
            VcsCall::ConfigureIdentity {
                name: name.to_string(),
                email: email.to_string(),
            },
        )
    }

    fn stage_file(&self, path: &Path) -> Result<()> {
        self.record("stage", VcsCall::Stage(path.to_path_buf()))
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.record("commit", VcsCall::Commit(message.to_string()))?;
        Ok(format!("{:040x}", self.calls.borrow().len()))
    }

    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()> {
        self.record(
            "push",
            VcsCall::Push {
                remote: remote.to_string(),
                branch: branch.to_string(),
                force,
            },
        )
    }
}
