// SPDX-License-Identifier: MPL-2.0
//! Stacking offsets for renderers.
//!
//! Pure functions of a snapshot: notifications sharing a position are
//! stacked, and each one is shifted by the heights of the visible
//! notifications ahead of it.

use super::notification::{NotificationId, Position};
use super::store::State;
use crate::config::defaults::DEFAULT_GUTTER_PX;
use crate::config::Policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Stacks oldest first instead of newest first.
    pub reverse_order: bool,
    /// Space between two stacked notifications, in pixels.
    pub gutter: u32,
    /// Position of notifications that do not set one.
    pub default_position: Position,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            reverse_order: false,
            gutter: DEFAULT_GUTTER_PX,
            default_position: Position::default(),
        }
    }
}

impl From<&Policy> for LayoutOptions {
    fn from(policy: &Policy) -> Self {
        Self {
            default_position: policy.default_position,
            ..Self::default()
        }
    }
}

/// Pixel offset of `id` within its position group.
///
/// Only notifications with a recorded height take part in stacking.
/// Returns `None` when `id` is absent or has not been measured yet.
/// Offsets saturate at `u32::MAX`.
#[must_use]
pub fn offset(state: &State, id: &NotificationId, options: &LayoutOptions) -> Option<u32> {
    let target = state.get(id)?;
    let position = target.position().unwrap_or(options.default_position);

    let group: Vec<_> = state
        .iter()
        .filter(|n| n.height().is_some())
        .filter(|n| n.position().unwrap_or(options.default_position) == position)
        .collect();
    let index = group.iter().position(|n| n.id() == id)?;
    let visible_before = group[..index].iter().filter(|n| n.visible()).count();

    let visible = group.iter().filter(|n| n.visible());
    let ahead: Vec<_> = if options.reverse_order {
        visible.skip(visible_before + 1).collect()
    } else {
        visible.take(visible_before).collect()
    };
    let stacked = ahead.iter().fold(0u32, |total, n| {
        total.saturating_add(n.height().unwrap_or(0).saturating_add(options.gutter))
    });
    Some(stacked)
}
