//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers.
///
/// Malformed dataset rows are not errors: they are dropped while loading and only show up in
/// the logs. An unreachable destination isn't one either, see
/// [`PathOutcome`](crate::path::PathOutcome).
#[derive(Debug, Error)]
pub enum Error {
    /// A node id that isn't part of the graph was passed to a path or removal operation.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Power iteration didn't settle within the iteration cap.
    #[error("eigenvector centrality failed to converge in {iterations} iterations")]
    NoConvergence { iterations: usize },

    /// A dataset or configuration file couldn't be read.
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    /// The CSV reader failed on the underlying stream.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configuration file isn't valid TOML for [`Config`](crate::config::Config).
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn unknown_node<T: std::fmt::Debug>(node: &T) -> Self {
        Error::UnknownNode(format!("{node:?}"))
    }

    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            source,
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_message() {
        let err = Error::unknown_node(&42u32);

        assert_eq!(err.to_string(), "unknown node: 42");
    }

    #[test]
    fn no_convergence_message() {
        let err = Error::NoConvergence { iterations: 1000 };

        assert_eq!(
            err.to_string(),
            "eigenvector centrality failed to converge in 1000 iterations"
        );
    }
}
