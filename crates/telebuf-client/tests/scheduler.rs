//! Scheduler lifecycle tests under paused virtual time.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{init_tracing, test_config, MockBackend};
use telebuf_client::{FlushScheduler, MetricBuffer, MetricKind};
use tokio::time::Duration;

#[tokio::test(start_paused = true)]
async fn timer_drives_cycles_until_stopped() {
    init_tracing();
    let mock = Arc::new(MockBackend::default());
    let mut cfg = test_config();
    cfg.flush_interval_ms = 200;
    let buffer = MetricBuffer::new(cfg, mock.clone());

    let depth = buffer.define_gauge("queue_depth", MetricKind::Int64).unwrap();
    depth.set(5i64).unwrap();

    let scheduler = FlushScheduler::start(buffer.clone()).expect("interval > 0");
    tokio::time::sleep(Duration::from_millis(450)).await;
    scheduler.stop().await;

    // first tick flushed the written gauge; later ticks had nothing to send
    assert_eq!(mock.submitted_count(), 1);
    assert_eq!(mock.registered_count(), 1);

    // stopped: further virtual time produces no cycles
    depth.set(6i64).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(mock.submitted_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cycle_errors_do_not_kill_the_loop() {
    init_tracing();
    let mock = Arc::new(MockBackend::default());
    let mut cfg = test_config();
    cfg.flush_interval_ms = 200;
    let buffer = MetricBuffer::new(cfg, mock.clone());

    let depth = buffer.define_gauge("queue_depth", MetricKind::Int64).unwrap();
    depth.set(5i64).unwrap();
    mock.fail_submit.store(true, Ordering::SeqCst);

    let scheduler = FlushScheduler::start(buffer.clone()).expect("interval > 0");
    tokio::time::sleep(Duration::from_millis(450)).await;
    assert_eq!(mock.submitted_count(), 0);

    // backend recovers; the loop is still ticking and drains the buffer
    mock.fail_submit.store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(450)).await;
    scheduler.stop().await;

    assert_eq!(mock.submitted_count(), 1);
}

#[tokio::test]
async fn zero_interval_disables_the_timer() {
    let mock = Arc::new(MockBackend::default());
    let buffer = MetricBuffer::new(test_config(), mock); // flush_interval_ms: 0

    assert!(FlushScheduler::start(buffer).is_none());
}
