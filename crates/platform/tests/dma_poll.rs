//! Bounded DMA enable/disable polling — fails closed on a stuck engine.
// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use core::cell::Cell;

use platform::dma::{self, DmaChannel, DmaTimeout, DMA_POLL_BUDGET};

/// Acknowledges requests after a fixed number of status polls; a latency of
/// `usize::MAX` models a stuck engine that never acknowledges.
struct TestChannel {
    enabled: Cell<bool>,
    pending: Cell<Option<(bool, usize)>>,
    latency: usize,
}

impl TestChannel {
    fn new(latency: usize) -> Self {
        Self {
            enabled: Cell::new(false),
            pending: Cell::new(None),
            latency,
        }
    }
}

impl DmaChannel for TestChannel {
    fn request_enable(&mut self) {
        self.pending.set(Some((true, self.latency)));
    }

    fn request_disable(&mut self) {
        self.pending.set(Some((false, self.latency)));
    }

    fn is_enabled(&self) -> bool {
        if let Some((target, left)) = self.pending.get() {
            if left == 0 {
                self.enabled.set(target);
                self.pending.set(None);
            } else {
                self.pending.set(Some((target, left.saturating_sub(1))));
            }
        }
        self.enabled.get()
    }
}

#[tokio::test]
async fn enable_acknowledged_immediately() {
    let mut ch = TestChannel::new(0);
    dma::enable(&mut ch).await.expect("enable should succeed");
    assert!(ch.is_enabled());
}

#[tokio::test]
async fn enable_acknowledged_after_latency() {
    // Latency well inside the poll budget.
    let mut ch = TestChannel::new(DMA_POLL_BUDGET / 2);
    dma::enable(&mut ch).await.expect("enable should succeed");
    assert!(ch.is_enabled());
}

#[tokio::test]
async fn enable_times_out_on_stuck_engine() {
    let mut ch = TestChannel::new(usize::MAX);
    assert_eq!(dma::enable(&mut ch).await, Err(DmaTimeout));
    assert!(!ch.is_enabled(), "timeout must fail closed");
}

#[tokio::test]
async fn disable_roundtrip() {
    let mut ch = TestChannel::new(1);
    dma::enable(&mut ch).await.expect("enable should succeed");
    dma::disable(&mut ch).await.expect("disable should succeed");
    assert!(!ch.is_enabled());
}

#[tokio::test]
async fn enable_times_out_when_latency_exceeds_budget() {
    let mut ch = TestChannel::new(DMA_POLL_BUDGET + 1);
    assert_eq!(dma::enable(&mut ch).await, Err(DmaTimeout));
}
