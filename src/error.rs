use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for ReportError {
    fn from(err: gix::discover::Error) -> Self {
        ReportError::GitDiscover(Box::new(err))
    }
}

impl From<ureq::Error> for ReportError {
    fn from(err: ureq::Error) -> Self {
        ReportError::Http(Box::new(err))
    }
}
