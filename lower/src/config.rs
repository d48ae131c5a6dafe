//! Lowering configuration.
//!
//! Supports both explicit configuration through a bon builder and
//! environment variable fallbacks.

use bon::bon;

/// Environment variable enabling runtime bounds diagnostics.
pub const CHECK_OUT_OF_BOUND_ENV: &str = "VEIL_DYNAMIC_INDEXING_CHECK_OUT_OF_BOUND";

/// Configuration for indexing lowering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexingConfig {
    /// Emit runtime warnings when a dynamic index falls outside its axis.
    ///
    /// The warnings never change a computed value.
    pub dynamic_indexing_check_out_of_bound: bool,
}

#[bon]
impl IndexingConfig {
    /// Create an indexing configuration with builder pattern.
    #[builder]
    pub fn new(#[builder(default = false)] dynamic_indexing_check_out_of_bound: bool) -> Self {
        Self { dynamic_indexing_check_out_of_bound }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `VEIL_DYNAMIC_INDEXING_CHECK_OUT_OF_BOUND` - `1`, `true`, `yes` or `on`
    ///   enables runtime bounds diagnostics (default: disabled)
    pub fn from_env() -> Self {
        let dynamic_indexing_check_out_of_bound =
            std::env::var(CHECK_OUT_OF_BOUND_ENV).ok().is_some_and(|value| parse_flag(&value));

        Self { dynamic_indexing_check_out_of_bound }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
