//! Step inputs. Every flag can also come from the `INPUT_*` variable the
//! Actions runner sets for a `with:` entry.

use crate::cli::orchestration::WorkflowArgs;
use crate::config::Config;
use crate::error::{BumpError, Result};
use std::path::PathBuf;

#[derive(clap::Parser, Debug, Clone)]
#[command(
    name = "version-bump",
    about = "Increment the version in a build file, then commit it or remind the pull request",
    version
)]
pub struct Args {
    #[arg(long, env = "INPUT_FILE-PATH", help = "Path to the build file holding the version")]
    pub file_path: PathBuf,

    #[arg(
        long,
        env = "INPUT_INCREMENT-TYPE",
        help = "Which component to increment: major, minor or patch"
    )]
    pub increment_type: String,

    #[arg(long, env = "INPUT_MODE", help = "update-file or comment-only")]
    pub mode: String,

    #[arg(
        long,
        env = "INPUT_GITHUB-TOKEN",
        hide_env_values = true,
        help = "Token used to comment on the pull request and to push"
    )]
    pub github_token: Option<String>,

    #[arg(
        long,
        env = "INPUT_TRACK-VERSION-CODE",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Bump versionCode alongside versionName [true|false]"
    )]
    pub track_version_code: Option<String>,

    #[arg(
        long,
        env = "INPUT_FORCE-PUSH",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Force-push the version commit, overwriting the remote branch [true|false]"
    )]
    pub force_push: Option<String>,

    #[arg(
        long,
        env = "INPUT_BRANCH",
        help = "Branch to push to when not running for a pull request"
    )]
    pub branch: Option<String>,

    #[arg(long, env = "INPUT_CONFIG", help = "Custom settings file path")]
    pub config: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Boolean input in the spellings the Actions toolkit accepts; blank is unset.
fn parse_flag(input: &str, value: &Option<String>) -> Result<Option<bool>> {
    match non_empty(value).as_deref() {
        None => Ok(None),
        Some("true" | "True" | "TRUE") => Ok(Some(true)),
        Some("false" | "False" | "FALSE") => Ok(Some(false)),
        Some(other) => Err(BumpError::config(format!(
            "input {} must be true or false, got '{}'",
            input, other
        ))),
    }
}

impl Args {
    /// Token with blank values treated as absent
    pub fn github_token(&self) -> Option<String> {
        non_empty(&self.github_token)
    }

    /// Settings file path with blank values treated as absent
    pub fn config_path(&self) -> Option<String> {
        non_empty(&self.config)
    }

    /// Let explicit inputs win over the settings file
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(track) = parse_flag("track-version-code", &self.track_version_code)? {
            config.fields.track_version_code = track;
        }
        if let Some(force) = parse_flag("force-push", &self.force_push)? {
            config.git.force_push = force;
        }
        Ok(())
    }

    pub fn workflow_args(&self) -> WorkflowArgs {
        WorkflowArgs {
            file_path: self.file_path.clone(),
            increment_type: self.increment_type.trim().to_string(),
            mode: self.mode.trim().to_string(),
            github_token: self.github_token(),
            branch: non_empty(&self.branch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "version-bump",
            "--file-path",
            "app/build.gradle",
            "--increment-type",
            "minor",
            "--mode",
            "update-file",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_required_inputs() {
        let args = parse(&[]);
        assert_eq!(args.file_path, PathBuf::from("app/build.gradle"));
        assert_eq!(args.increment_type, "minor");
        assert_eq!(args.mode, "update-file");
        assert_eq!(args.track_version_code, None);
        assert_eq!(args.force_push, None);
    }

    #[test]
    fn test_bare_flags_mean_true() {
        let args = parse(&["--force-push", "--track-version-code"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config).unwrap();
        assert!(config.git.force_push);
        assert!(config.fields.track_version_code);
    }

    #[test]
    fn test_explicit_false_overrides_config() {
        let args = parse(&["--force-push=false"]);
        let mut config = Config::default();
        config.git.force_push = true;
        args.apply_overrides(&mut config).unwrap();
        assert!(!config.git.force_push);
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let args = parse(&[]);
        let mut config = Config::default();
        config.fields.track_version_code = true;
        args.apply_overrides(&mut config).unwrap();
        assert!(config.fields.track_version_code);
    }

    #[test]
    fn test_blank_flag_values_are_unset() {
        assert_eq!(parse_flag("force-push", &Some(String::new())).unwrap(), None);
        assert_eq!(parse_flag("force-push", &Some("  ".to_string())).unwrap(), None);
        assert_eq!(parse_flag("force-push", &None).unwrap(), None);

        let mut args = parse(&[]);
        args.config = Some(String::new());
        assert_eq!(args.config_path(), None);
    }

    #[test]
    fn test_flag_spellings() {
        let args = parse(&["--force-push=TRUE", "--track-version-code=False"]);
        let mut config = Config::default();
        config.fields.track_version_code = true;
        args.apply_overrides(&mut config).unwrap();
        assert!(config.git.force_push);
        assert!(!config.fields.track_version_code);

        let args = parse(&["--force-push=yes"]);
        assert!(matches!(
            args.apply_overrides(&mut Config::default()),
            Err(BumpError::Config(_))
        ));
    }

    #[test]
    fn test_blank_token_and_branch_are_absent() {
        let args = parse(&["--github-token", "  ", "--branch", ""]);
        let workflow = args.workflow_args();
        assert_eq!(workflow.github_token, None);
        assert_eq!(workflow.branch, None);
    }

    #[test]
    fn test_missing_mode_is_rejected() {
        let result = Args::try_parse_from([
            "version-bump",
            "--file-path",
            "build.gradle",
            "--increment-type",
            "patch",
        ]);
        // INPUT_MODE is not set under `cargo test`
        assert!(result.is_err());
    }
}
