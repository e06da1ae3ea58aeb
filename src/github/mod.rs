//! GitHub Actions collaborators: run context, PR comments and step outputs

pub mod comments;
pub mod context;
pub mod mock;
pub mod outputs;

pub use comments::{GitHubNotifier, Notifier};
pub use context::{ActionContext, PullRequest, RepoSlug};
pub use mock::{MockNotifier, PostedComment, RecordingOutputs};
pub use outputs::{OutputSink, WorkflowOutputs};
