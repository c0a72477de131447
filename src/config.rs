//! Configuration for the filter compiler
//!
//! Provides a builder pattern for the pagination bounds applied to
//! caller-supplied limits.

/// Configuration for compiling caller requests into queries
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// LIMIT used when the caller supplies none (default: 100)
    pub default_limit: u64,
    /// Largest LIMIT a caller may request (default: 1000)
    pub max_limit: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CompilerConfig {
    /// Create a new configuration builder
    pub fn builder() -> CompilerConfigBuilder {
        CompilerConfigBuilder::new()
    }
}

/// Builder for CompilerConfig
#[derive(Debug)]
pub struct CompilerConfigBuilder {
    default_limit: u64,
    max_limit: u64,
}

impl Default for CompilerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerConfigBuilder {
    /// Create a new builder with the default bounds
    pub fn new() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }

    /// Set the LIMIT used when none is requested (default: 100)
    pub fn default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    /// Set the largest LIMIT a caller may request (default: 1000)
    pub fn max_limit(mut self, limit: u64) -> Self {
        self.max_limit = limit;
        self
    }

    /// Build the configuration
    ///
    /// The default limit never exceeds the maximum.
    pub fn build(self) -> CompilerConfig {
        CompilerConfig {
            default_limit: self.default_limit.min(self.max_limit),
            max_limit: self.max_limit,
        }
    }
}
