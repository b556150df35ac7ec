// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Queue**: How many notifications the store retains
//! - **Removal**: Delay between dismissal and permanent removal
//! - **Durations**: Auto-dismiss countdown per notification kind
//! - **Layout**: Spacing used when stacking notifications

// ==========================================================================
// Queue Defaults
// ==========================================================================

/// Default number of notifications retained by the store.
pub const DEFAULT_QUEUE_LIMIT: usize = 20;

/// Minimum allowed queue limit.
pub const MIN_QUEUE_LIMIT: usize = 1;

/// Maximum allowed queue limit.
pub const MAX_QUEUE_LIMIT: usize = 100;

// ==========================================================================
// Removal Defaults
// ==========================================================================

/// Delay between dismissal and permanent removal (in milliseconds).
pub const DEFAULT_REMOVE_DELAY_MS: u64 = 1000;

// ==========================================================================
// Duration Defaults (milliseconds, `None` = never auto-dismiss)
// ==========================================================================

/// Auto-dismiss delay for plain notifications.
pub const DEFAULT_PLAIN_DURATION_MS: Option<u64> = Some(4000);

/// Auto-dismiss delay for success notifications.
pub const DEFAULT_SUCCESS_DURATION_MS: Option<u64> = Some(2000);

/// Auto-dismiss delay for error notifications.
pub const DEFAULT_ERROR_DURATION_MS: Option<u64> = Some(4000);

/// Loading notifications stay until they are updated or dismissed.
pub const DEFAULT_LOADING_DURATION_MS: Option<u64> = None;

/// Auto-dismiss delay for custom notifications.
pub const DEFAULT_CUSTOM_DURATION_MS: Option<u64> = Some(4000);

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Gap between stacked notifications (in pixels).
pub const DEFAULT_GUTTER_PX: u32 = 8;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Queue validation
    assert!(MIN_QUEUE_LIMIT > 0);
    assert!(MAX_QUEUE_LIMIT >= MIN_QUEUE_LIMIT);
    assert!(DEFAULT_QUEUE_LIMIT >= MIN_QUEUE_LIMIT);
    assert!(DEFAULT_QUEUE_LIMIT <= MAX_QUEUE_LIMIT);

    // Removal validation
    assert!(DEFAULT_REMOVE_DELAY_MS > 0);

    // Loading must never auto-dismiss
    assert!(DEFAULT_LOADING_DURATION_MS.is_none());
};
