// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity store layer.

pub mod memory;

pub use memory::ActivityStore;

use crate::models::UserId;

/// Which activities a caller may see, by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityFilter {
    /// Super-admin view: everything
    All,
    /// Admin view: activities of the systems they administer
    Systems(Vec<u64>),
    /// User view: activities the user is assigned to
    AssignedTo(UserId),
}
