//! Analysis configuration, read from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid configuration:
//!
//! ```toml
//! country = "Brazil"
//! histogram_bins = 30
//!
//! [centrality.betweenness]
//! # 0 computes betweenness exactly.
//! sample_size = 50
//! seed = 42
//!
//! [communities]
//! seed = 42
//! min_degree = 0
//!
//! [robustness]
//! count = 1
//! seed = 42
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    centrality::CentralityConfig,
    degree::DEFAULT_HISTOGRAM_BINS,
    error::{Error, Result},
    louvain::LouvainConfig,
    robustness::RobustnessConfig,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Only airports in this country (exact match) become vertices.
    pub country: String,
    pub histogram_bins: usize,
    pub centrality: CentralityConfig,
    pub communities: LouvainConfig,
    pub robustness: RobustnessConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: "Brazil".to_owned(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            centrality: CentralityConfig::default(),
            communities: LouvainConfig::default(),
            robustness: RobustnessConfig::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::config::Config;
    ///
    /// let config = Config::from_toml_str("country = \"Chile\"\n[communities]\nseed = 7").unwrap();
    ///
    /// assert_eq!(config.country, "Chile");
    /// assert_eq!(config.communities.seed, 7);
    /// assert_eq!(config.histogram_bins, 30);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| Error::io(err, path))?;

        Self::from_toml_str(&text)
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn nested_sections() {
        let text = r#"
            [centrality.betweenness]
            sample_size = 10

            [centrality.eigenvector]
            max_iterations = 50

            [robustness]
            count = 3
        "#;
        let config = Config::from_toml_str(text).unwrap();

        assert_eq!(config.centrality.betweenness.sample_size, Some(10));
        assert_eq!(config.centrality.betweenness.seed, 42);
        assert_eq!(config.centrality.eigenvector.max_iterations, 50);
        assert_eq!(config.robustness.count, 3);
        assert_eq!(config.robustness.seed, 42);
    }

    #[test]
    fn invalid_toml() {
        let err = Config::from_toml_str("histogram_bins = \"many\"").unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn exact_betweenness_round_trips() {
        let config = Config {
            centrality: CentralityConfig::default().with_sample_size(None),
            ..Config::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();

        assert_eq!(parsed.centrality.betweenness.sample_size, None);
        assert_eq!(parsed, config);
    }

    #[test]
    fn zero_sample_size_means_exact() {
        let config = Config::from_toml_str("[centrality.betweenness]\nsample_size = 0").unwrap();

        assert_eq!(config.centrality.betweenness.sample_size, None);
    }

    #[test]
    fn round_trip_through_toml() {
        let config = Config::default().with_country("Chile");
        let text = toml::to_string(&config).unwrap();

        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
