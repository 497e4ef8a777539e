use crate::model::{CommitRecord, StatLine};
use crate::util::looks_like_object_id;
use tracing::{debug, info, warn};

/// Commit headers are the only log lines that open with this character.
pub const HEADER_MARKER: char = '\'';

/// Supplies the merge-corrected line delta for a finished commit.
pub trait ModifiedLines {
    fn modified_lines(&self, commit_id: &str) -> u64;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub commit_id: String,
    pub date: String,
    pub message: String,
}

/// Splits `'id,date,message'` into its fields.
///
/// Only the first two commas separate fields; the message keeps any further
/// commas and quotes. Exactly one quote is removed from each end.
pub fn parse_header(line: &str) -> Option<Header> {
    let body = line.strip_prefix(HEADER_MARKER)?;
    let body = body.strip_suffix(HEADER_MARKER).unwrap_or(body);

    let mut parts = body.splitn(3, ',');
    let commit_id = parts.next()?.trim();
    let date = parts.next()?.trim();
    let message = parts.next()?;
    if commit_id.is_empty() {
        return None;
    }

    Some(Header {
        commit_id: commit_id.to_string(),
        date: date.to_string(),
        message: message.to_string(),
    })
}

struct Accumulator {
    header: Header,
    added: u64,
    removed: u64,
}

impl Accumulator {
    fn new(header: Header) -> Self {
        Self {
            header,
            added: 0,
            removed: 0,
        }
    }

    fn add(&mut self, stat: &StatLine) {
        if stat.has_fallback() {
            warn!(
                event = "churn.count_fallback",
                commit = %self.header.commit_id,
                path = %stat.path,
                "Non-numeric count treated as 0"
            );
        }
        self.added = self.added.saturating_add(stat.added.value());
        self.removed = self.removed.saturating_add(stat.removed.value());
        debug!(
            event = "churn.file_changed",
            added = stat.added.value(),
            removed = stat.removed.value(),
            path = %stat.path
        );
    }

    fn finish(self, counter: Option<&dyn ModifiedLines>) -> CommitRecord {
        let modified_lines = counter.map(|c| c.modified_lines(&self.header.commit_id));
        let record = CommitRecord {
            commit_id: self.header.commit_id,
            date: self.header.date,
            message: self.header.message,
            added_lines: self.added,
            removed_lines: self.removed,
            modified_lines,
        };
        debug!(event = "churn.commit_stored", commit = %record.commit_id);
        record
    }
}

/// Turns `git log --numstat` text into one record per commit header.
///
/// Stat lines belong to the closest preceding header. When `counter` is given
/// it is consulted once per commit, as the commit is finalized.
pub fn parse_log(output: &str, counter: Option<&dyn ModifiedLines>) -> Vec<CommitRecord> {
    let mut records = Vec::new();
    let mut current: Option<Accumulator> = None;

    for line in output.lines() {
        if line.starts_with(HEADER_MARKER) {
            if let Some(acc) = current.take() {
                records.push(acc.finish(counter));
            }
            match parse_header(line) {
                Some(header) => {
                    if !looks_like_object_id(&header.commit_id) {
                        warn!(
                            event = "churn.header_suspicious",
                            commit = %header.commit_id,
                            "Header id does not look like an object id"
                        );
                    }
                    debug!(event = "churn.header_parsed", commit = %header.commit_id, date = %header.date);
                    current = Some(Accumulator::new(header));
                }
                None => {
                    warn!(event = "churn.header_malformed", line = %line, "Skipping malformed header");
                }
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        match (StatLine::parse(line), current.as_mut()) {
            (Some(stat), Some(acc)) => acc.add(&stat),
            (Some(_), None) => {
                warn!(event = "churn.stat_orphaned", line = %line, "Skipping stat line without a commit header");
            }
            (None, _) => {
                warn!(event = "churn.stat_malformed", line = %line, "Skipping malformed line");
            }
        }
    }

    if let Some(acc) = current.take() {
        records.push(acc.finish(counter));
    }

    info!("Parsed {} commits.", records.len());
    records
}
