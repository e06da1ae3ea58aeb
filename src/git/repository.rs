use crate::error::{BumpError, Result};
use crate::git::{push_refspec, Vcs};
use git2::{Cred, CredentialType, PushOptions, RemoteCallbacks, Repository, Signature};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository implementing [Vcs]
pub struct Git2Vcs {
    repo: Repository,
    token: Option<String>,
    identity: RefCell<Option<(String, String)>>,
}

impl Git2Vcs {
    /// Open or discover a git repository
    ///
    /// `token` is offered as HTTPS credentials when pushing.
    pub fn open<P: AsRef<Path>>(path: P, token: Option<String>) -> Result<Self> {
        let repo = Repository::discover(path)
            .map_err(|e| BumpError::vcs(format!("Not in a git repository: {}", e.message())))?;
        Ok(Self::from_git2(repo, token))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Repository, token: Option<String>) -> Self {
        Git2Vcs {
            repo,
            token,
            identity: RefCell::new(None),
        }
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.identity.borrow().as_ref() {
            Some((name, email)) => Ok(Signature::now(name, email)?),
            None => Ok(self.repo.signature()?),
        }
    }

    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| BumpError::vcs("Cannot stage files in a bare repository"))?;
        let workdir = fs::canonicalize(workdir)?;
        let absolute = fs::canonicalize(path)
            .map_err(|e| BumpError::vcs(format!("Cannot resolve {}: {}", path.display(), e)))?;

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BumpError::vcs(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }
}

impl Vcs for Git2Vcs {
    fn configure_identity(&self, name: &str, email: &str) -> Result<()> {
        tracing::debug!(name, email, "configuring git identity");
        let mut config = self.repo.config()?;
        config.set_str("user.name", name)?;
        config.set_str("user.email", email)?;
        *self.identity.borrow_mut() = Some((name.to_string(), email.to_string()));
        Ok(())
    }

    fn stage_file(&self, path: &Path) -> Result<()> {
        let relative = self.relative_to_workdir(path)?;
        tracing::debug!(path = %relative.display(), "staging file");

        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        // An unborn HEAD has no parent to build on
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let signature = self.signature()?;
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        tracing::debug!(commit = %oid, "created commit");
        Ok(oid.to_string())
    }

    fn push(&self, remote_name: &str, branch: &str, force: bool) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| BumpError::vcs(format!("No remote named '{}' found", remote_name)))?;

        let mut callbacks = RemoteCallbacks::new();
        let token = self.token.clone();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = token.as_deref() {
                    return Cred::userpass_plaintext("x-access-token", token);
                }
            }
            if allowed_types.contains(CredentialType::SSH_KEY) {
                return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
            }
            Cred::default()
        });

        // The server may reject a ref without failing the whole push
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = push_refspec(branch, force);
        tracing::debug!(remote = remote_name, %refspec, "pushing");

        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    BumpError::vcs(format!("Network error during push: {}", e.message()))
                }
                git2::ErrorClass::Reference => {
                    BumpError::vcs(format!("Reference error during push: {}", e.message()))
                }
                _ => BumpError::vcs(format!(
                    "Failed to push to '{}/{}': {}",
                    remote_name,
                    branch,
                    e.message()
                )),
            })
    }
}
