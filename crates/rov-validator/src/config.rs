//! Store configuration
//!
//! Built once by the caller and handed to a store at construction; stores
//! never read configuration from anywhere else.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

const DEFAULT_CANDIDATE_LIMIT: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(limit) => limit,
    None => panic!("candidate limit must be non-zero"),
};

/// Order in which candidate lists are returned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrder {
    /// Longest prefix length first
    #[default]
    MostSpecificFirst,
    /// Shortest prefix length first
    LeastSpecificFirst,
}

/// In-memory store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum candidates returned per pre-filter query
    ///
    /// Zero is unrepresentable: an empty candidate list would turn every
    /// covered route into `NON_INTERSECTING`.
    pub candidate_limit: NonZeroUsize,
    /// Candidate ordering
    pub candidate_order: CandidateOrder,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            candidate_order: CandidateOrder::MostSpecificFirst,
        }
    }
}

impl StoreConfig {
    /// Override the candidate limit
    pub fn with_candidate_limit(mut self, limit: NonZeroUsize) -> Self {
        self.candidate_limit = limit;
        self
    }

    /// Override the candidate order
    pub fn with_candidate_order(mut self, order: CandidateOrder) -> Self {
        self.candidate_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.candidate_limit.get(), 256);
        assert_eq!(config.candidate_order, CandidateOrder::MostSpecificFirst);
    }

    #[test]
    fn test_zero_candidate_limit_rejected() {
        let err = serde_json::from_str::<StoreConfig>(r#"{"candidate_limit": 0}"#);
        assert!(err.is_err());

        let config: StoreConfig = serde_json::from_str(r#"{"candidate_limit": 4}"#).unwrap();
        assert_eq!(config.candidate_limit.get(), 4);
        assert_eq!(config.candidate_order, CandidateOrder::MostSpecificFirst);
    }
}
