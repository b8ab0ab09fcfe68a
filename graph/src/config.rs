//! Graph configuration

/// Configuration for a graph instance.
#[derive(Debug, Clone, Default)]
pub struct GraphConfig {
    /// Re-check every property index against a label scan after each
    /// mutation (debug builds only).
    pub verify_indexes: bool,
    /// Hand out ids of deleted entities to later creations.
    pub recycle_ids: bool,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verify_indexes(mut self, enabled: bool) -> Self {
        self.verify_indexes = enabled;
        self
    }

    pub fn with_recycle_ids(mut self, enabled: bool) -> Self {
        self.recycle_ids = enabled;
        self
    }

    /// Configuration used by tests: every mutation is followed by an index
    /// consistency check.
    pub fn strict() -> Self {
        Self {
            verify_indexes: true,
            recycle_ids: false,
        }
    }
}
