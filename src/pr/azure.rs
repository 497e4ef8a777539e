//! Azure DevOps pull request client.

use crate::error::Result;
use crate::model::PullRequestMetric;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const API_VERSION: &str = "7.0";
pub const PAGE_SIZE: usize = 100;

pub trait PullRequestSource {
    fn completed_pull_requests(&self) -> Result<Vec<PullRequest>>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub closed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewers: Vec<Reviewer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestPage {
    #[serde(default)]
    value: Vec<PullRequest>,
}

pub fn lead_time_hours(created: DateTime<Utc>, completed: Option<DateTime<Utc>>) -> Option<f64> {
    completed.map(|done| (done - created).num_seconds() as f64 / 3600.0)
}

impl From<PullRequest> for PullRequestMetric {
    fn from(pr: PullRequest) -> Self {
        PullRequestMetric {
            pr_id: pr.pull_request_id,
            lead_time_hours: lead_time_hours(pr.creation_date, pr.closed_date),
            title: pr.title,
            status: pr.status,
            created_date: pr.creation_date,
            completed_date: pr.closed_date,
            reviewers: pr.reviewers.into_iter().map(|r| r.display_name).collect(),
        }
    }
}

pub struct AzureDevOpsClient {
    agent: ureq::Agent,
    org_url: String,
    project: String,
    authorization: String,
}

impl AzureDevOpsClient {
    pub fn new(org_url: &str, project: &str, pat: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .user_agent(concat!("gmetrics/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            org_url: org_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
            authorization: format!("Basic {}", STANDARD.encode(format!(":{pat}"))),
        }
    }

    pub fn pulls_url(&self) -> String {
        format!(
            "{}/{}/_apis/git/pullrequests",
            self.org_url,
            self.project.replace(' ', "%20")
        )
    }

    fn fetch_page(&self, skip: usize) -> Result<Vec<PullRequest>> {
        let url = self.pulls_url();
        debug!(event = "pr.page_requested", url = %url, skip = skip);
        let response = self
            .agent
            .get(&url)
            .set("Authorization", &self.authorization)
            .set("Accept", "application/json")
            .query("searchCriteria.status", "completed")
            .query("api-version", API_VERSION)
            .query("$top", &PAGE_SIZE.to_string())
            .query("$skip", &skip.to_string())
            .call()?;
        let page: PullRequestPage = response.into_json()?;
        Ok(page.value)
    }

    /// One request against the pull request endpoint; the outcome is only logged.
    pub fn test_connectivity(&self) -> bool {
        info!("Testing connection to Azure DevOps Pull Requests API...");
        match self.fetch_page(0) {
            Ok(prs) => {
                info!("Successfully connected to Azure DevOps and fetched pull requests.");
                for pr in &prs {
                    debug!("Pull Request: {} - {}", pr.pull_request_id, pr.title);
                }
                true
            }
            Err(e) => {
                error!(event = "pr.connectivity_failed", error = ?e, "Failed to connect to Azure DevOps Pull Requests API.");
                false
            }
        }
    }
}

impl PullRequestSource for AzureDevOpsClient {
    fn completed_pull_requests(&self) -> Result<Vec<PullRequest>> {
        collect_pages(|skip| self.fetch_page(skip))
    }
}

/// Requests pages until one comes back short or empty.
///
/// A page whose first id was already collected means the server ignored
/// `$skip`; paging stops there instead of requesting the same page forever.
fn collect_pages<F>(mut fetch: F) -> Result<Vec<PullRequest>>
where
    F: FnMut(usize) -> Result<Vec<PullRequest>>,
{
    let mut all = Vec::new();
    let mut seen = HashSet::new();
    loop {
        let page = fetch(all.len())?;
        let fetched = page.len();
        if page
            .first()
            .is_some_and(|pr| seen.contains(&pr.pull_request_id))
        {
            warn!(
                event = "pr.page_repeated",
                skip = all.len(),
                "Page repeats pull requests already fetched; stopping"
            );
            break;
        }
        all.extend(page.into_iter().filter(|pr| seen.insert(pr.pull_request_id)));
        if fetched < PAGE_SIZE {
            break;
        }
    }
    Ok(all)
}
