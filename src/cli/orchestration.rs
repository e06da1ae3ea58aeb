//! Main workflow orchestration logic
//!
//! Reads the build file, computes the next version and dispatches to either
//! the update-file workflow (write, commit, push) or the comment-only
//! workflow (pull request reminder). Collaborators are passed in so the
//! whole flow runs against mocks in tests.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{
    apply_version_fields, extract_version_fields, increment_version_code,
    increment_version_name, FieldLayout, IncrementKind, Version,
};
use crate::error::{BumpError, Result};
use crate::git::{commit_message, Vcs};
use crate::github::{ActionContext, Notifier, OutputSink};

/// Which workflow a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    UpdateFile,
    CommentOnly,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::UpdateFile => "update-file",
            Mode::CommentOnly => "comment-only",
        }
    }
}

impl FromStr for Mode {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "update-file" => Ok(Mode::UpdateFile),
            "comment-only" => Ok(Mode::CommentOnly),
            _ => Err(BumpError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run inputs for the workflow
///
/// Decoupled from the clap `Args` so the workflow can be driven
/// programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    /// Build file to read (and, in update-file mode, rewrite)
    pub file_path: PathBuf,

    /// `major`, `minor` or `patch`, any case
    pub increment_type: String,

    /// `update-file` or `comment-only`
    pub mode: String,

    pub github_token: Option<String>,

    /// Push target used when the event has no pull request
    pub branch: Option<String>,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub mode: Mode,
    pub previous_version: String,
    pub new_version: String,
    pub previous_version_code: Option<String>,
    pub new_version_code: Option<u64>,

    /// Hash of the version commit (update-file only)
    pub commit: Option<String>,

    /// Whether a reminder was posted (comment-only only)
    pub commented: bool,
}

impl RunOutcome {
    /// Step outputs in the order they are published
    pub fn outputs(&self) -> Vec<(&'static str, String)> {
        let mut outputs = vec![
            ("previous-version", self.previous_version.clone()),
            ("new-version", self.new_version.clone()),
        ];
        if let Some(code) = self.new_version_code {
            outputs.push(("new-version-code", code.to_string()));
        }
        outputs
    }
}

/// Drives one version bump from build file to commit or comment
pub struct ReleaseOrchestrator<'a> {
    config: &'a Config,
    context: &'a ActionContext,
    vcs: Option<&'a dyn Vcs>,
    notifier: &'a dyn Notifier,
}

impl<'a> ReleaseOrchestrator<'a> {
    /// `vcs` may be `None` when no repository is available; only the
    /// update-file workflow needs one.
    pub fn new(
        config: &'a Config,
        context: &'a ActionContext,
        vcs: Option<&'a dyn Vcs>,
        notifier: &'a dyn Notifier,
    ) -> Self {
        ReleaseOrchestrator {
            config,
            context,
            vcs,
            notifier,
        }
    }

    fn layout(&self) -> FieldLayout {
        FieldLayout::from_tracking(self.config.fields.track_version_code)
    }

    /// Run the selected workflow
    ///
    /// Mode and increment type are validated before the file is touched, so
    /// bad inputs never mutate anything or reach a collaborator.
    pub fn run(&self, args: &WorkflowArgs) -> Result<RunOutcome> {
        let span = tracing::info_span!(
            "version_bump",
            file = %args.file_path.display(),
            mode = %args.mode,
            event = self.context.event_name.as_deref().unwrap_or("none"),
        );
        let _entered = span.enter();

        let mode: Mode = args.mode.parse()?;
        let kind: IncrementKind = args.increment_type.parse()?;
        info!(%mode, increment = %kind, "starting version bump");

        let layout = self.layout();
        let blob = fs::read_to_string(&args.file_path).map_err(|e| {
            error!(path = %args.file_path.display(), error = %e, "cannot read build file");
            e
        })?;

        let fields = extract_version_fields(&blob, layout)?;
        let version = Version::parse(&fields.version_name)?;
        let new_version = increment_version_name(&version, kind.as_str())?;
        let new_version_code = fields
            .version_code
            .as_deref()
            .map(increment_version_code)
            .transpose()?;

        info!(
            previous = %fields.version_name,
            new = %new_version,
            previous_code = fields.version_code.as_deref(),
            new_code = new_version_code,
            "computed next version"
        );

        let mut outcome = RunOutcome {
            mode,
            previous_version: fields.version_name.clone(),
            new_version,
            previous_version_code: fields.version_code.clone(),
            new_version_code,
            commit: None,
            commented: false,
        };

        match mode {
            Mode::UpdateFile => {
                outcome.commit = Some(self.update_file(args, &blob, &outcome)?);
            }
            Mode::CommentOnly => {
                outcome.commented = self.comment_only(args, &outcome.new_version)?;
            }
        }

        Ok(outcome)
    }

    fn push_branch(&self, args: &WorkflowArgs) -> Result<String> {
        if let Some(pr) = &self.context.pull_request {
            info!(branch = %pr.head_ref, pr = pr.number, "detected branch for PR");
            return Ok(pr.head_ref.clone());
        }
        args.branch.clone().ok_or(BumpError::BranchNotDetected)
    }

    fn update_file(&self, args: &WorkflowArgs, blob: &str, outcome: &RunOutcome) -> Result<String> {
        let vcs = self
            .vcs
            .ok_or_else(|| BumpError::vcs("No git repository available"))?;
        let branch = self.push_branch(args)?;

        let updated = apply_version_fields(
            blob,
            self.layout(),
            &outcome.new_version,
            outcome.new_version_code,
        );
        fs::write(&args.file_path, &updated)?;
        info!(path = %args.file_path.display(), version = %outcome.new_version, "updated build file");

        let git = &self.config.git;
        vcs.configure_identity(&git.user_name, &git.user_email)?;
        vcs.stage_file(&args.file_path)?;
        let commit = vcs.commit(&commit_message(&outcome.new_version))?;

        if git.force_push {
            warn!(remote = %git.remote, %branch, "force-pushing; remote history on this branch will be overwritten");
        }
        vcs.push(&git.remote, &branch, git.force_push)?;
        info!(%commit, remote = %git.remote, %branch, "committed and pushed version update");

        Ok(commit)
    }

    /// Returns whether a comment was posted
    fn comment_only(&self, args: &WorkflowArgs, new_version: &str) -> Result<bool> {
        let Some(pr) = &self.context.pull_request else {
            info!("not in a pull request context - skipping PR comment");
            return Ok(false);
        };

        if args.github_token.is_none() {
            return Err(BumpError::MissingCredential("github-token".to_string()));
        }
        let repository = self
            .context
            .repository
            .as_ref()
            .ok_or_else(|| BumpError::context("repository of the pull request is unknown"))?;

        let body = self
            .config
            .comment
            .render(new_version, &display_file_name(&args.file_path));

        match self
            .notifier
            .create_comment(&repository.owner, &repository.repo, pr.number, &body)
        {
            Ok(()) => {
                info!(pr = pr.number, repository = %repository, "added PR comment");
                Ok(true)
            }
            Err(e) if e.is_recoverable() => {
                warn!(pr = pr.number, error = %e, "could not add PR comment; continuing");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Publish a run's result and return the process exit code.
///
/// Success sets every output; failure sets only the failure message.
pub fn report(result: &Result<RunOutcome>, sink: &dyn OutputSink) -> i32 {
    match result {
        Ok(outcome) => {
            if let Err(e) = sink.set_outputs(&outcome.outputs()) {
                error!(error = %e, "cannot set outputs");
                sink.set_failed(&format!("Action failed: cannot set outputs: {}", e));
                return 1;
            }
            info!(
                previous = %outcome.previous_version,
                new = %outcome.new_version,
                previous_code = outcome.previous_version_code.as_deref(),
                new_code = outcome.new_version_code,
                "version bump finished"
            );
            0
        }
        Err(e) => {
            error!(error = %e, "version bump failed");
            sink.set_failed(&format!("Action failed: {}", e));
            1
        }
    }
}
