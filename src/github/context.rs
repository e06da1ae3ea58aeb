//! The GitHub Actions run context: repository and pull request of the event
//! that triggered the workflow.

use crate::error::{BumpError, Result};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// `owner/repo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(RepoSlug {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(BumpError::context(format!(
                "Invalid repository slug (expected OWNER/REPO): {}",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// The pull request an event belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    /// Branch the pull request merges from
    pub head_ref: String,
}

/// Everything the workflow needs to know about where it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub event_name: Option<String>,
    pub repository: Option<RepoSlug>,
    pub pull_request: Option<PullRequest>,
    pub api_url: String,
}

impl Default for ActionContext {
    fn default() -> Self {
        ActionContext {
            event_name: None,
            repository: None,
            pull_request: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    head: HeadPayload,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    full_name: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl ActionContext {
    /// Build the context from the `GITHUB_*` environment of a workflow run.
    ///
    /// Outside of Actions (no `GITHUB_EVENT_PATH`) this yields a context
    /// without a pull request.
    pub fn from_env() -> Result<Self> {
        let mut context = match non_empty_var("GITHUB_EVENT_PATH") {
            Some(path) => Self::from_event_file(Path::new(&path))?,
            None => ActionContext::default(),
        };

        context.event_name = non_empty_var("GITHUB_EVENT_NAME");
        if let Some(slug) = non_empty_var("GITHUB_REPOSITORY") {
            context.repository = Some(slug.parse()?);
        }
        if let Some(api_url) = non_empty_var("GITHUB_API_URL") {
            context.api_url = api_url.trim_end_matches('/').to_string();
        }
        Ok(context)
    }

    /// Read a webhook event payload from disk.
    pub fn from_event_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            BumpError::context(format!("cannot read event payload {}: {}", path.display(), e))
        })?;
        Self::from_event_json(&json)
    }

    /// Parse a webhook event payload.
    pub fn from_event_json(json: &str) -> Result<Self> {
        let payload: EventPayload = serde_json::from_str(json)
            .map_err(|e| BumpError::context(format!("invalid event payload: {}", e)))?;

        let repository = match payload.repository.and_then(|r| r.full_name) {
            Some(full_name) => Some(full_name.parse()?),
            None => None,
        };

        Ok(ActionContext {
            repository,
            pull_request: payload.pull_request.map(|pr| PullRequest {
                number: pr.number,
                head_ref: pr.head.git_ref,
            }),
            ..ActionContext::default()
        })
    }

    pub fn with_pull_request(mut self, number: u64, head_ref: impl Into<String>) -> Self {
        self.pull_request = Some(PullRequest {
            number,
            head_ref: head_ref.into(),
        });
        self
    }

    pub fn with_repository(mut self, slug: RepoSlug) -> Self {
        self.repository = Some(slug);
        self
    }
}
