//! Tests for the counter/gauge registry hooks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pulse_core::registry::{MetricsRegistry, RegistrySnapshot};

// =============================================================================
// Request Counters
// =============================================================================

#[test]
fn test_request_methods_are_counted_separately() {
    let reg = MetricsRegistry::new();
    for method in ["GET", "GET", "POST", "DELETE", "PUT", "PUT", "PUT"] {
        reg.record_request(method);
    }

    let snap = reg.snapshot();
    assert_eq!(snap.get_count, 2);
    assert_eq!(snap.post_count, 1);
    assert_eq!(snap.delete_count, 1);
    assert_eq!(snap.put_count, 3);
    assert_eq!(snap.total_requests(), 7);
}

#[test]
fn test_unknown_methods_leave_counters_unchanged() {
    let reg = MetricsRegistry::new();
    for method in ["PATCH", "OPTIONS", "HEAD", "get", "", "GET "] {
        reg.record_request(method);
    }
    assert_eq!(reg.snapshot(), RegistrySnapshot::default());
}

#[test]
fn test_total_matches_tracked_calls_for_mixed_sequence() {
    let reg = MetricsRegistry::new();
    let methods = ["GET", "TRACE", "POST", "patch", "DELETE", "PUT", "CONNECT"];
    let mut expected = 0;
    for i in 0..700 {
        let m = methods[i % methods.len()];
        if matches!(m, "GET" | "POST" | "DELETE" | "PUT") {
            expected += 1;
        }
        reg.record_request(m);
    }
    assert_eq!(reg.snapshot().total_requests(), expected);
}

// =============================================================================
// Active Users
// =============================================================================

#[test]
fn test_disconnect_at_zero_stays_zero() {
    let reg = MetricsRegistry::new();
    reg.user_disconnected();
    reg.user_disconnected();
    assert_eq!(reg.snapshot().active_users, 0);

    reg.user_connected();
    reg.user_connected();
    reg.user_disconnected();
    reg.user_disconnected();
    reg.user_disconnected();
    assert_eq!(reg.snapshot().active_users, 0);

    reg.user_connected();
    assert_eq!(reg.snapshot().active_users, 1);
}

#[test]
fn test_concurrent_connect_disconnect_exact_count() {
    let reg = Arc::new(MetricsRegistry::new());
    // disconnects on an empty registry stay at zero
    for _ in 0..3 {
        reg.user_disconnected();
    }
    assert_eq!(reg.snapshot().active_users, 0);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                // each disconnect follows this thread's own connect, so the
                // count is never zero when it runs
                for _ in 0..1000 {
                    reg.user_connected();
                    reg.user_disconnected();
                }
                reg.user_connected();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(reg.snapshot().active_users, 8);
}

// =============================================================================
// Auth and Purchases
// =============================================================================

#[test]
fn test_auth_outcomes() {
    let reg = MetricsRegistry::new();
    reg.record_auth_outcome(true);
    reg.record_auth_outcome(false);
    reg.record_auth_outcome(false);

    let snap = reg.snapshot();
    assert_eq!(snap.auth_success, 1);
    assert_eq!(snap.auth_failure, 2);
}

#[test]
fn test_zero_item_purchase_is_noop() {
    let reg = MetricsRegistry::new();
    reg.record_purchase(0, 12.5);
    reg.record_purchase(0, 0.0);
    reg.record_purchase(0, f64::NAN);

    let snap = reg.snapshot();
    assert_eq!(snap.purchase_count, 0);
    assert_eq!(snap.total_revenue, 0.0);
}

#[test]
fn test_creation_failures_counted() {
    let reg = MetricsRegistry::new();
    reg.record_creation_failure();
    reg.record_creation_failure();
    assert_eq!(reg.snapshot().failed_creations, 2);
    assert_eq!(reg.snapshot().purchase_count, 0);
}

#[test]
fn test_snapshot_is_a_copy() {
    let reg = MetricsRegistry::new();
    reg.record_request("GET");
    let before = reg.snapshot();
    reg.record_request("GET");

    assert_eq!(before.get_count, 1);
    assert_eq!(reg.snapshot().get_count, 2);
}

#[test]
fn test_snapshot_never_sees_half_a_purchase() {
    let reg = Arc::new(MetricsRegistry::new());
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                for _ in 0..5000 {
                    // revenue is always 1.5 per item
                    reg.record_purchase(2, 3.0);
                }
            })
        })
        .collect();

    let reader = {
        let reg = Arc::clone(&reg);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut checks = 0u64;
            while !done.load(Ordering::Acquire) {
                let snap = reg.snapshot();
                assert_eq!(snap.total_revenue, snap.purchase_count as f64 * 1.5);
                checks += 1;
            }
            checks
        })
    };

    for w in writers {
        w.join().unwrap();
    }
    done.store(true, Ordering::Release);
    assert!(reader.join().unwrap() > 0);

    let snap = reg.snapshot();
    assert_eq!(snap.purchase_count, 40_000);
    assert_eq!(snap.total_revenue, 60_000.0);
}

#[test]
fn test_concurrent_requests_are_not_lost() {
    let reg = Arc::new(MetricsRegistry::new());
    let handles: Vec<_> = ["GET", "POST", "DELETE", "PUT"]
        .into_iter()
        .map(|method| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                for _ in 0..2500 {
                    reg.record_request(method);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let snap = reg.snapshot();
    assert_eq!(snap.get_count, 2500);
    assert_eq!(snap.put_count, 2500);
    assert_eq!(snap.total_requests(), 10_000);
}

// =============================================================================
// Latency Windows
// =============================================================================

#[test]
fn test_service_latency_window() {
    let reg = MetricsRegistry::new();
    reg.record_service_latency(Duration::from_millis(10));
    reg.record_service_latency(Duration::from_millis(30));

    let windows = reg.take_latencies();
    assert_eq!(windows.service.count, 2);
    assert_eq!(windows.service.min_ms, 10.0);
    assert_eq!(windows.service.max_ms, 30.0);
    assert_eq!(windows.service.mean_ms(), Some(20.0));
    assert_eq!(windows.creation.mean_ms(), None);
}

#[test]
fn test_snapshot_serializes() {
    let reg = MetricsRegistry::new();
    reg.record_request("POST");
    let json = serde_json::to_value(reg.snapshot()).unwrap();
    assert_eq!(json["post_count"], 1);
    assert_eq!(json["active_users"], 0);
}
