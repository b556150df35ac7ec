// SPDX-License-Identifier: MPL-2.0
//! Notification queue newtypes.
//!
//! This module provides type-safe wrappers for queue settings,
//! ensuring they are always within valid ranges.

// =============================================================================
// Queue Limit Bounds
// =============================================================================

/// Queue limit bounds, taken from [`crate::config::defaults`].
pub mod queue_limit_bounds {
    use crate::config::defaults;

    /// Minimum number of retained notifications.
    pub const MIN: usize = defaults::MIN_QUEUE_LIMIT;
    /// Maximum number of retained notifications.
    pub const MAX: usize = defaults::MAX_QUEUE_LIMIT;
    /// Default number of retained notifications.
    pub const DEFAULT: usize = defaults::DEFAULT_QUEUE_LIMIT;
}

// =============================================================================
// QueueLimit
// =============================================================================

/// Maximum number of notifications the store retains.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–100 notifications).
///
/// # Example
///
/// ```
/// use toastbox::domain::toast::QueueLimit;
///
/// let limit = QueueLimit::new(5);
/// assert_eq!(limit.value(), 5);
///
/// // Values outside range are clamped
/// assert_eq!(QueueLimit::new(0).value(), 1);
/// assert_eq!(QueueLimit::new(1_000).value(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueLimit(usize);

impl QueueLimit {
    /// Creates a new queue limit, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(queue_limit_bounds::MIN, queue_limit_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }

    /// Returns true if this is the minimum value.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= queue_limit_bounds::MIN
    }

    /// Returns true if this is the maximum value.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= queue_limit_bounds::MAX
    }
}

impl Default for QueueLimit {
    fn default() -> Self {
        Self(queue_limit_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================
