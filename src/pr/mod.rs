pub mod azure;
pub mod exec;
pub mod metrics;
pub mod output;

pub use azure::{lead_time_hours, AzureDevOpsClient, PullRequest, PullRequestSource};
pub use exec::{exec, PrArgs};
pub use metrics::{calculate_git_metrics, get_pr_metrics, mean_lead_time_hours};
pub use output::{write_commit_report, write_pr_report};
