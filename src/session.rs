//! Load once, analyse many times.

use std::{cell::OnceCell, path::PathBuf};

use tracing::debug;

use crate::{builder::Network, dataset::Dataset, error::Result};

enum Source {
    Files { airports: PathBuf, routes: PathBuf },
    Loaded,
}

/// Memoizes the dataset and the network built from it.
///
/// The files are read on the first call that needs them, the network is built on the first
/// call to [`Session::network`]. Later calls hand out the cached values.
pub struct Session {
    source: Source,
    country: String,
    dataset: OnceCell<Dataset>,
    network: OnceCell<Network>,
}

impl Session {
    /// A session reading `airports.dat` and `routes.dat` style files on demand.
    pub fn new(
        airports: impl Into<PathBuf>,
        routes: impl Into<PathBuf>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            source: Source::Files {
                airports: airports.into(),
                routes: routes.into(),
            },
            country: country.into(),
            dataset: OnceCell::new(),
            network: OnceCell::new(),
        }
    }

    /// A session over an already loaded dataset.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::dataset::Dataset;
    /// use airnet::session::Session;
    ///
    /// let session = Session::from_dataset(Dataset::default(), "Brazil");
    /// let network = session.network().unwrap();
    ///
    /// assert!(network.graph.is_empty());
    /// assert!(std::ptr::eq(network, session.network().unwrap()));
    /// ```
    pub fn from_dataset(dataset: Dataset, country: impl Into<String>) -> Self {
        Self {
            source: Source::Loaded,
            country: country.into(),
            dataset: OnceCell::from(dataset),
            network: OnceCell::new(),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn dataset(&self) -> Result<&Dataset> {
        if let Some(dataset) = self.dataset.get() {
            return Ok(dataset);
        }

        let dataset = match &self.source {
            Source::Files { airports, routes } => Dataset::load(airports, routes)?,
            Source::Loaded => Dataset::default(),
        };

        Ok(self.dataset.get_or_init(|| dataset))
    }

    pub fn network(&self) -> Result<&Network> {
        if let Some(network) = self.network.get() {
            return Ok(network);
        }

        let network = self.dataset()?.network(&self.country);
        debug!(country = %self.country, "cached route network");

        Ok(self.network.get_or_init(|| network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_fail_every_time() {
        let session = Session::new("missing/airports.dat", "missing/routes.dat", "Brazil");

        assert!(session.dataset().is_err());
        assert!(session.network().is_err());
    }

    #[test]
    fn network_is_built_once() {
        let session = Session::from_dataset(Dataset::default(), "Brazil");
        let first: *const Network = session.network().unwrap();
        let second: *const Network = session.network().unwrap();

        assert_eq!(first, second);
        assert_eq!(session.country(), "Brazil");
    }
}
