use crate::error::{BumpError, Result};
use crate::github::comments::Notifier;
use crate::github::outputs::OutputSink;
use std::cell::RefCell;

/// A comment captured by [MockNotifier]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedComment {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub body: String,
}

/// Notifier that records comments instead of sending them
#[derive(Default)]
pub struct MockNotifier {
    comments: RefCell<Vec<PostedComment>>,
    failure: Option<String>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with [BumpError::NotificationFailed] carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        MockNotifier {
            comments: RefCell::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn comments(&self) -> Vec<PostedComment> {
        self.comments.borrow().clone()
    }
}

impl Notifier for MockNotifier {
    fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<()> {
        if let Some(message) = &self.failure {
            return Err(BumpError::notification(message.clone()));
        }
        self.comments.borrow_mut().push(PostedComment {
            owner: owner.to_string(),
            repo: repo.to_string(),
            issue_number,
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Output sink that keeps outputs and failures in memory
#[derive(Default)]
pub struct RecordingOutputs {
    outputs: RefCell<Vec<(String, String)>>,
    failure: RefCell<Option<String>>,
    reject_outputs: bool,
}

impl RecordingOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose `set_outputs` always fails with an I/O error
    pub fn rejecting() -> Self {
        RecordingOutputs {
            reject_outputs: true,
            ..Self::default()
        }
    }

    pub fn outputs(&self) -> Vec<(String, String)> {
        self.outputs.borrow().clone()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.outputs
            .borrow()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    pub fn failure(&self) -> Option<String> {
        self.failure.borrow().clone()
    }
}

impl OutputSink for RecordingOutputs {
    fn set_outputs(&self, outputs: &[(&str, String)]) -> Result<()> {
        if self.reject_outputs {
            return Err(BumpError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "output file is read-only",
            )));
        }
        self.outputs.borrow_mut().extend(
            outputs
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone())),
        );
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        *self.failure.borrow_mut() = Some(message.to_string());
    }
}
