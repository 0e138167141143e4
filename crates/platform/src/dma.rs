//! DMA stream control with bounded enable/disable polling.
//!
//! The audio DMA stream runs in circular mode and is reconfigured only
//! during codec bring-up. Enabling or disabling a stream is not immediate:
//! the engine acknowledges the request some cycles later, so bring-up polls
//! the status flag for a fixed iteration budget and fails closed on timeout.
//! No unbounded waits, no retries of the whole bring-up.

/// How many status polls an enable/disable request is granted before the
/// operation is reported as timed out.
pub const DMA_POLL_BUDGET: usize = 1000;

/// A controllable DMA stream.
///
/// The hardware implementation wraps the STM32 stream registers; the mock
/// in [`crate::mocks`] acknowledges after a configurable number of polls.
pub trait DmaChannel {
    /// Request the stream to start running.
    fn request_enable(&mut self);

    /// Request the stream to stop.
    fn request_disable(&mut self);

    /// Current acknowledged state of the stream.
    fn is_enabled(&self) -> bool;
}

/// The DMA engine did not acknowledge within [`DMA_POLL_BUDGET`] polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaTimeout;

/// Enable a DMA stream, polling until acknowledged.
///
/// Yields to the executor between polls so other tasks keep running while
/// the engine settles.
///
/// # Errors
///
/// [`DmaTimeout`] if the stream does not report enabled within
/// [`DMA_POLL_BUDGET`] polls.
pub async fn enable<C: DmaChannel>(channel: &mut C) -> Result<(), DmaTimeout> {
    channel.request_enable();
    for _ in 0..DMA_POLL_BUDGET {
        if channel.is_enabled() {
            return Ok(());
        }
        embassy_futures::yield_now().await;
    }
    Err(DmaTimeout)
}

/// Disable a DMA stream, polling until acknowledged.
///
/// # Errors
///
/// [`DmaTimeout`] if the stream does not report disabled within
/// [`DMA_POLL_BUDGET`] polls.
pub async fn disable<C: DmaChannel>(channel: &mut C) -> Result<(), DmaTimeout> {
    channel.request_disable();
    for _ in 0..DMA_POLL_BUDGET {
        if !channel.is_enabled() {
            return Ok(());
        }
        embassy_futures::yield_now().await;
    }
    Err(DmaTimeout)
}
