//! Post pull request comments via the REST API.

use crate::error::{BumpError, Result};
use crate::github::context::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};

/// Destination for the version reminder
pub trait Notifier {
    /// Create a comment on issue (or pull request) `issue_number` of `owner/repo`.
    ///
    /// Failures to deliver are reported as [BumpError::NotificationFailed];
    /// a missing token as [BumpError::MissingCredential].
    fn create_comment(&self, owner: &str, repo: &str, issue_number: u64, body: &str)
        -> Result<()>;
}

#[derive(Clone, Debug, Serialize)]
struct CommentPayload<'a> {
    body: &'a str,
}

/// A successfully created comment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedComment {
    pub id: u64,
    pub html_url: String,
}

/// [Notifier] backed by the GitHub issues API
pub struct GitHubNotifier {
    api_url: String,
    token: Option<String>,
}

impl GitHubNotifier {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        GitHubNotifier {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Notifier for github.com
    pub fn public(token: Option<String>) -> Self {
        Self::new(DEFAULT_API_URL, token)
    }

    pub fn comments_url(&self, owner: &str, repo: &str, issue_number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, owner, repo, issue_number
        )
    }
}

impl Notifier for GitHubNotifier {
    fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<()> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| BumpError::MissingCredential("github-token".to_string()))?;

        let url = self.comments_url(owner, repo, issue_number);
        let request = ureq::post(&url)
            .set("User-Agent", "version-bump")
            .set("Accept", "application/vnd.github+json")
            .set("Authorization", &format!("Bearer {token}"));

        let response = match request.send_json(CommentPayload { body }) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(BumpError::notification(format!("HTTP {code}: {body}")));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(BumpError::notification(err.to_string()));
            }
        };

        let created = response
            .into_json::<CreatedComment>()
            .map_err(|err| BumpError::notification(err.to_string()))?;
        tracing::debug!(comment_id = created.id, url = %created.html_url, "comment created");
        Ok(())
    }
}
