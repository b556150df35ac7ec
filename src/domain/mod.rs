// SPDX-License-Identifier: MPL-2.0
//! Domain value types shared by configuration and the notification store.

pub mod toast;
