// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::{Repository, Signature};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_version-bump");

fn bump_command(work_dir: &Path) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.current_dir(work_dir)
        .env_remove("GITHUB_EVENT_PATH")
        .env_remove("GITHUB_EVENT_NAME")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_OUTPUT")
        .env_remove("INPUT_FILE-PATH")
        .env_remove("INPUT_INCREMENT-TYPE")
        .env_remove("INPUT_MODE")
        .env_remove("INPUT_GITHUB-TOKEN")
        .env_remove("INPUT_BRANCH")
        .env_remove("INPUT_CONFIG")
        .env_remove("INPUT_FORCE-PUSH")
        .env_remove("INPUT_TRACK-VERSION-CODE")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_help_mentions_inputs() {
    let output = Command::new(BIN)
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--file-path"));
    assert!(stdout.contains("--increment-type"));
    assert!(stdout.contains("--mode"));
}

#[test]
fn test_binary_comment_only_without_pr_sets_outputs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build.gradle"), "version = '0.9.3'\n").unwrap();
    let output_file = dir.path().join("github_output");

    let output = bump_command(dir.path())
        .env("GITHUB_OUTPUT", &output_file)
        .args([
            "--file-path",
            "build.gradle",
            "--increment-type",
            "patch",
            "--mode",
            "comment-only",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        fs::read_to_string(&output_file).unwrap(),
        "previous-version=0.9.3\nnew-version=0.9.4\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("build.gradle")).unwrap(),
        "version = '0.9.3'\n"
    );
}

#[test]
fn test_binary_reads_action_inputs_from_env() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build.gradle"), "version = \"3.1\"\n").unwrap();

    let output = bump_command(dir.path())
        .env("INPUT_FILE-PATH", "build.gradle")
        .env("INPUT_INCREMENT-TYPE", "Major")
        .env("INPUT_MODE", "comment-only")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("::set-output name=previous-version::3.1"));
    assert!(stdout.contains("::set-output name=new-version::4.0.0"));
}

#[test]
fn test_binary_invalid_mode_fails_without_outputs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build.gradle"), "version = \"1.0.0\"\n").unwrap();
    let output_file = dir.path().join("github_output");

    let output = bump_command(dir.path())
        .env("GITHUB_OUTPUT", &output_file)
        .args([
            "--file-path",
            "build.gradle",
            "--increment-type",
            "patch",
            "--mode",
            "publish",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("::error::Action failed: Invalid mode: publish"));
    assert!(!output_file.exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("build.gradle")).unwrap(),
        "version = \"1.0.0\"\n"
    );
}

#[test]
fn test_binary_treats_blank_inputs_as_unset() {
    let blank_inputs = [
        "INPUT_CONFIG",
        "INPUT_FORCE-PUSH",
        "INPUT_TRACK-VERSION-CODE",
        "INPUT_BRANCH",
        "INPUT_GITHUB-TOKEN",
    ];

    for input in blank_inputs {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle"), "version = '2.4.1'\n").unwrap();

        let output = bump_command(dir.path())
            .env(input, "")
            .env("INPUT_FILE-PATH", "build.gradle")
            .env("INPUT_INCREMENT-TYPE", "minor")
            .env("INPUT_MODE", "comment-only")
            .output()
            .expect("Failed to execute command");

        assert_eq!(
            output.status.code(),
            Some(0),
            "{} blank: stdout {} stderr {}",
            input,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("::set-output name=new-version::2.5.0"), "{}", input);
    }
}

#[test]
fn test_binary_missing_required_input_reports_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build.gradle"), "version = '1.0.0'\n").unwrap();

    let output = bump_command(dir.path())
        .env("INPUT_FILE-PATH", "build.gradle")
        .env("INPUT_INCREMENT-TYPE", "patch")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("::error::Action failed:"), "stdout: {}", stdout);
    assert!(stdout.contains("--mode"), "stdout: {}", stdout);
}

#[test]
fn test_binary_bad_increment_type_reported_before_git() {
    // Not a git checkout, so opening the repository would fail first
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build.gradle"), "version = '1.0.0'\n").unwrap();

    let output = bump_command(dir.path())
        .args([
            "--file-path",
            "build.gradle",
            "--increment-type",
            "revision",
            "--mode",
            "update-file",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("::error::Action failed: Invalid increment type: revision"));
}

#[cfg(test)]
mod git_operations_tests {
    use super::*;
    use version_bump::cli::{ReleaseOrchestrator, WorkflowArgs};
    use version_bump::config::Config;
    use version_bump::git::Git2Vcs;
    use version_bump::github::{ActionContext, MockNotifier};

    const BUILD_FILE: &str = "plugins {\n    id 'application'\n}\n\nversion = '1.0.0'\n";

    fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("build.gradle"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");
        let sig = Signature::now("Test User", "test@example.com").unwrap();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[])
            .expect("Could not create commit")
    }

    // Work repository with one commit and a bare `origin`
    fn setup_repos() -> (TempDir, TempDir) {
        let remote_dir = TempDir::new().expect("Could not create temp dir");
        Repository::init_bare(remote_dir.path()).expect("Could not init bare repo");

        let work_dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(work_dir.path()).expect("Could not init git repo");
        fs::write(work_dir.path().join("build.gradle"), BUILD_FILE).unwrap();
        commit_all(&repo, "Initial commit");
        repo.remote("origin", remote_dir.path().to_str().unwrap())
            .expect("Could not add remote");

        (work_dir, remote_dir)
    }

    #[test]
    fn test_update_file_commits_and_pushes_to_pr_branch() {
        let (work_dir, remote_dir) = setup_repos();
        let build_file = work_dir.path().join("build.gradle");

        let config = Config::default();
        let context = ActionContext::default().with_pull_request(5, "feature/bump");
        let vcs = Git2Vcs::open(work_dir.path(), None).unwrap();
        let notifier = MockNotifier::new();
        let orchestrator = ReleaseOrchestrator::new(&config, &context, Some(&vcs), &notifier);

        let outcome = orchestrator
            .run(&WorkflowArgs {
                file_path: build_file.clone(),
                increment_type: "minor".to_string(),
                mode: "update-file".to_string(),
                github_token: None,
                branch: None,
            })
            .unwrap();

        assert_eq!(outcome.previous_version, "1.0.0");
        assert_eq!(outcome.new_version, "1.1.0");
        assert!(fs::read_to_string(&build_file)
            .unwrap()
            .contains("version = \"1.1.0\""));

        let remote = Repository::open_bare(remote_dir.path()).unwrap();
        let pushed = remote
            .find_reference("refs/heads/feature/bump")
            .expect("branch should be pushed")
            .peel_to_commit()
            .unwrap();
        assert_eq!(pushed.id().to_string(), outcome.commit.unwrap());
        assert_eq!(pushed.message(), Some("Increment version to 1.1.0"));
        assert_eq!(pushed.author().name(), Some("GitHub Action"));
        assert_eq!(pushed.parent_count(), 1);

        let blob = pushed
            .tree()
            .unwrap()
            .get_path(Path::new("build.gradle"))
            .unwrap()
            .to_object(&remote)
            .unwrap()
            .peel_to_blob()
            .unwrap();
        assert!(String::from_utf8_lossy(blob.content()).contains("version = \"1.1.0\""));
    }

    #[test]
    fn test_non_forced_push_rejected_on_divergence() {
        let (work_dir, remote_dir) = setup_repos();
        let build_file = work_dir.path().join("build.gradle");

        // Someone else already owns the branch on the remote
        {
            let other_dir = TempDir::new().unwrap();
            let other = Repository::init(other_dir.path()).unwrap();
            fs::write(other_dir.path().join("build.gradle"), "version = '9.9.9'\n").unwrap();
            commit_all(&other, "Unrelated history");
            let mut origin = other
                .remote("origin", remote_dir.path().to_str().unwrap())
                .unwrap();
            let head = other.head().unwrap().name().unwrap().to_string();
            origin
                .push(&[format!("{}:refs/heads/feature/bump", head)], None)
                .unwrap();
        }

        let context = ActionContext::default().with_pull_request(5, "feature/bump");
        let vcs = Git2Vcs::open(work_dir.path(), None).unwrap();
        let notifier = MockNotifier::new();
        let args = WorkflowArgs {
            file_path: build_file,
            increment_type: "patch".to_string(),
            mode: "update-file".to_string(),
            github_token: None,
            branch: None,
        };

        let config = Config::default();
        let orchestrator = ReleaseOrchestrator::new(&config, &context, Some(&vcs), &notifier);
        assert!(orchestrator.run(&args).is_err());

        let mut forced = Config::default();
        forced.git.force_push = true;
        let orchestrator = ReleaseOrchestrator::new(&forced, &context, Some(&vcs), &notifier);
        let outcome = orchestrator.run(&args).unwrap();

        let remote = Repository::open_bare(remote_dir.path()).unwrap();
        let pushed = remote
            .find_reference("refs/heads/feature/bump")
            .unwrap()
            .peel_to_commit()
            .unwrap();
        assert_eq!(pushed.id().to_string(), outcome.commit.unwrap());
    }
}
