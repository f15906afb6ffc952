//! Rule table errors.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuleError>;

#[derive(Error, Debug)]
pub enum RuleError {
    /// The rules document is not valid YAML or has the wrong shape.
    #[error("Failed to parse rules from {source_name}: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The rules parsed but are inconsistent.
    ///
    /// Every problem found is listed, not only the first.
    #[error("Invalid rule tables ({} problem(s)): {}", problems.len(), problems.join("; "))]
    Invalid { problems: Vec<String> },

    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RuleError {
    pub fn invalid(problem: impl Into<String>) -> Self {
        Self::Invalid {
            problems: vec![problem.into()],
        }
    }
}
