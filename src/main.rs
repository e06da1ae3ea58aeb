use clap::error::ErrorKind;
use clap::Parser;

use version_bump::cli::{report, Args, Mode, ReleaseOrchestrator, RunOutcome};
use version_bump::config;
use version_bump::domain::IncrementKind;
use version_bump::git::{Git2Vcs, Vcs};
use version_bump::github::{ActionContext, GitHubNotifier, OutputSink, WorkflowOutputs};
use version_bump::logging;

fn main() {
    let outputs = WorkflowOutputs::from_env();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            outputs.set_failed(&format!("Action failed: {}", usage_error_summary(&e)));
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init() {
        eprintln!("Warning: {:#}", e);
    }

    let result = run(&args);
    std::process::exit(report(&result, &outputs));
}

/// First paragraph of a clap error, without the usage block
fn usage_error_summary(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let summary = rendered.split("\n\n").next().unwrap_or(&rendered);
    summary.trim().trim_start_matches("error: ").to_string()
}

fn run(args: &Args) -> version_bump::Result<RunOutcome> {
    let workflow = args.workflow_args();

    // Reject bad inputs before touching the environment or the checkout
    let mode: Mode = workflow.mode.parse()?;
    workflow.increment_type.parse::<IncrementKind>()?;

    let mut settings = config::load_config(args.config_path().as_deref())?;
    args.apply_overrides(&mut settings)?;

    let context = ActionContext::from_env()?;
    let notifier = GitHubNotifier::new(context.api_url.as_str(), workflow.github_token.clone());

    // Comment-only runs do not need a checkout
    let git = match mode {
        Mode::UpdateFile => Some(Git2Vcs::open(".", workflow.github_token.clone())?),
        Mode::CommentOnly => None,
    };

    let orchestrator = ReleaseOrchestrator::new(
        &settings,
        &context,
        git.as_ref().map(|vcs| vcs as &dyn Vcs),
        &notifier,
    );
    orchestrator.run(&workflow)
}
