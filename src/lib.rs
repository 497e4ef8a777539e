pub mod branches;
pub mod churn;
pub mod cli;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod pr;
pub mod report;
pub mod util;
