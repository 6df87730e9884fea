//! Repository configuration.

/// Configuration for a repository's key layout.
///
/// Every storage key is composed as
/// `prefix<separator>EntityType<separator>segment`, where the segment
/// is a record id, the identifier-counter name, or the sorted-index
/// name.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Prefix namespacing all keys of this repository.
    pub prefix: String,

    /// Separator joining the key parts.
    pub separator: String,

    /// Segment name of the per-type identifier counter.
    ///
    /// Must keep the reserved `__name__` shape so it can never collide
    /// with a declared column.
    pub counter_segment: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            prefix: "hashorm".to_owned(),
            separator: ":".to_owned(),
            counter_segment: "__latest__".to_owned(),
        }
    }
}

impl RepositoryConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the key separator.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the identifier-counter segment name.
    #[must_use]
    pub fn counter_segment(mut self, segment: impl Into<String>) -> Self {
        self.counter_segment = segment.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RepositoryConfig::default();
        assert_eq!(config.prefix, "hashorm");
        assert_eq!(config.separator, ":");
        assert_eq!(config.counter_segment, "__latest__");
    }

    #[test]
    fn builder_overrides() {
        let config = RepositoryConfig::new()
            .prefix("app")
            .separator("/")
            .counter_segment("__next__");
        assert_eq!(config.prefix, "app");
        assert_eq!(config.separator, "/");
        assert_eq!(config.counter_segment, "__next__");
    }
}
