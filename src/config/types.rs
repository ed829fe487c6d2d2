//! Configuration constants and defaults for crumbs.

use crate::restart::DEFAULT_QUERY_ATTEMPTS;

/// Upper bound for `query_attempts`.
pub const MAX_QUERY_ATTEMPTS: u32 = 10;

// Default value functions for serde
pub(crate) fn default_query_attempts() -> u32 {
    DEFAULT_QUERY_ATTEMPTS
}
