// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Aggregate state guarded by the registry lock, and its snapshot form.

use serde::{Deserialize, Serialize};

/// Point-in-time copy of every registry field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub get_count: u64,
    pub post_count: u64,
    pub delete_count: u64,
    pub put_count: u64,
    pub auth_success: u64,
    pub auth_failure: u64,
    pub active_users: u64,
    pub purchase_count: u64,
    pub failed_creations: u64,
    pub total_revenue: f64,
}

impl RegistrySnapshot {
    /// Sum of the four tracked request methods.
    pub fn total_requests(&self) -> u64 {
        self.get_count
            .saturating_add(self.post_count)
            .saturating_add(self.delete_count)
            .saturating_add(self.put_count)
    }
}

/// Mutable state. Only touched under the registry mutex.
#[derive(Debug, Default)]
pub(super) struct RegistryState {
    pub(super) counts: RegistrySnapshot,
}

impl RegistryState {
    pub(super) fn request(&mut self, method: &str) -> bool {
        let c = &mut self.counts;
        let slot = match method {
            "GET" => &mut c.get_count,
            "POST" => &mut c.post_count,
            "DELETE" => &mut c.delete_count,
            "PUT" => &mut c.put_count,
            _ => return false,
        };
        *slot = slot.saturating_add(1);
        true
    }

    pub(super) fn user_connected(&mut self) -> u64 {
        self.counts.active_users = self.counts.active_users.saturating_add(1);
        self.counts.active_users
    }

    pub(super) fn user_disconnected(&mut self) -> u64 {
        self.counts.active_users = self.counts.active_users.saturating_sub(1);
        self.counts.active_users
    }

    pub(super) fn auth(&mut self, success: bool) {
        let slot = if success {
            &mut self.counts.auth_success
        } else {
            &mut self.counts.auth_failure
        };
        *slot = slot.saturating_add(1);
    }

    /// Both fields change under the same lock hold.
    pub(super) fn purchase(&mut self, item_count: u64, revenue: f64) {
        self.counts.purchase_count = self.counts.purchase_count.saturating_add(item_count);
        self.counts.total_revenue += revenue;
    }

    pub(super) fn creation_failure(&mut self) {
        self.counts.failed_creations = self.counts.failed_creations.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_requests_sums_methods() {
        let snap = RegistrySnapshot {
            get_count: 2,
            post_count: 1,
            delete_count: 4,
            put_count: 3,
            ..Default::default()
        };
        assert_eq!(snap.total_requests(), 10);
    }

    #[test]
    fn test_method_match_is_exact() {
        let mut state = RegistryState::default();
        assert!(state.request("GET"));
        assert!(!state.request("get"));
        assert!(!state.request("PATCH"));
        assert_eq!(state.counts.get_count, 1);
    }

    #[test]
    fn test_disconnect_saturates() {
        let mut state = RegistryState::default();
        assert_eq!(state.user_disconnected(), 0);
        assert_eq!(state.user_connected(), 1);
        assert_eq!(state.user_disconnected(), 0);
        assert_eq!(state.user_disconnected(), 0);
    }
}
