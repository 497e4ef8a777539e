use crate::error::{ReportError, Result};
use crate::model::CommitMetric;
use crate::util::issue_ref;
use chrono::DateTime;
use gix::{discover, Repository};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::debug;

/// In-process repository access for everything that does not need the git binary.
pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

fn repo_err(err: impl Display) -> ReportError {
    ReportError::GitRepo(err.to_string())
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    /// Short name of the checked-out branch, or `HEAD` when detached.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head_name().map_err(repo_err)?;
        Ok(head
            .map(|name| name.shorten().to_string())
            .unwrap_or_else(|| "HEAD".to_string()))
    }

    /// Walks every local branch and describes each reachable commit.
    ///
    /// A commit reachable from several branches is reported once per branch.
    pub fn commit_metrics(&self) -> Result<Vec<CommitMetric>> {
        let platform = self.repo.references().map_err(repo_err)?;
        let branches = platform.local_branches().map_err(repo_err)?;

        let mut metrics = Vec::new();
        for reference in branches {
            let mut reference = reference.map_err(repo_err)?;
            let branch = reference.name().shorten().to_string();
            debug!(event = "git.branch_walk_started", branch = %branch);

            let tip = reference.peel_to_id_in_place().map_err(repo_err)?.detach();
            let walk = self.repo.rev_walk([tip]).all().map_err(repo_err)?;

            for info in walk {
                let info = info.map_err(repo_err)?;
                let commit = info.object().map_err(repo_err)?;

                let secs = commit.time().map_err(repo_err)?.seconds;
                let commit_date = DateTime::from_timestamp(secs, 0)
                    .ok_or_else(|| ReportError::InvalidDate(format!("Invalid timestamp: {secs}")))?;
                let author = commit.author().map_err(repo_err)?.name.to_string();
                let message = commit.message_raw_sloppy().to_string().trim().to_string();

                metrics.push(CommitMetric {
                    branch: branch.clone(),
                    commit_date,
                    author,
                    issue_ref: issue_ref(&message),
                    message,
                });
            }
        }

        Ok(metrics)
    }
}
