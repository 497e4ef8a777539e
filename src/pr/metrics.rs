use super::azure::PullRequestSource;
use crate::git::GitRepo;
use crate::model::{CommitMetric, PullRequestMetric};
use std::path::Path;
use tracing::{error, info};

/// Commit metrics for every local branch; any failure yields an empty list.
pub fn calculate_git_metrics(repo_path: Option<&Path>) -> Vec<CommitMetric> {
    let repo = match GitRepo::open(repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            error!(event = "pr.git_metrics_failed", error = ?e, "Failed to calculate Git metrics.");
            return Vec::new();
        }
    };
    if repo.is_bare() {
        error!("Invalid Git repository.");
        return Vec::new();
    }

    info!("Calculating Git metrics...");
    match repo.commit_metrics() {
        Ok(metrics) => metrics,
        Err(e) => {
            error!(event = "pr.git_metrics_failed", error = ?e, "Failed to calculate Git metrics.");
            Vec::new()
        }
    }
}

/// Completed pull requests with lead times; any failure yields an empty list.
pub fn get_pr_metrics(source: &dyn PullRequestSource) -> Vec<PullRequestMetric> {
    info!("Fetching PR metrics from Azure DevOps...");
    match source.completed_pull_requests() {
        Ok(prs) => prs.into_iter().map(PullRequestMetric::from).collect(),
        Err(e) => {
            error!(event = "pr.fetch_failed", error = ?e, "Failed to fetch PR metrics.");
            Vec::new()
        }
    }
}

pub fn mean_lead_time_hours(metrics: &[PullRequestMetric]) -> Option<f64> {
    let hours: Vec<f64> = metrics.iter().filter_map(|m| m.lead_time_hours).collect();
    if hours.is_empty() {
        None
    } else {
        Some(hours.iter().sum::<f64>() / hours.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReportError, Result};
    use crate::pr::azure::PullRequest;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    struct Failing;

    impl PullRequestSource for Failing {
        fn completed_pull_requests(&self) -> Result<Vec<PullRequest>> {
            Err(ReportError::Parse("401 Unauthorized".to_string()))
        }
    }

    fn metric(hours: Option<f64>) -> PullRequestMetric {
        PullRequestMetric {
            pr_id: 1,
            title: String::new(),
            status: "completed".to_string(),
            created_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            completed_date: None,
            lead_time_hours: hours,
            reviewers: Vec::new(),
        }
    }

    #[test]
    fn source_failure_yields_empty_metrics() {
        assert!(get_pr_metrics(&Failing).is_empty());
    }

    #[test]
    fn mean_ignores_open_requests() {
        let metrics = vec![metric(Some(2.0)), metric(None), metric(Some(4.0))];
        assert_eq!(mean_lead_time_hours(&metrics), Some(3.0));
        assert_eq!(mean_lead_time_hours(&[metric(None)]), None);
    }

    #[test]
    fn non_repository_yields_empty_git_metrics() {
        let dir = tempfile::tempdir().unwrap();
        assert!(calculate_git_metrics(Some(dir.path())).is_empty());
    }
}
