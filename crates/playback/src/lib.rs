//! Double-buffered playback core — DMA half/transfer handshake, lifecycle
//! state machine, volume mapping.
//!
//! This crate is hardware-free: the DMA side is represented only by the
//! [`HalfFlags`] handshake and the storage side by the
//! [`platform::SampleSource`] trait, so the whole state machine runs under
//! host tests.
#![cfg_attr(not(test), no_std)]

pub mod half_buffer;
pub mod player;
pub mod volume;

pub use half_buffer::{DmaEvent, Half, HalfFlags};
pub use player::{Player, PlayerError, State};
pub use volume::volume_to_ctrl;

// Tests come first — implementations below will make them pass
#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    /// Half flag handshake tests
    mod half_flags_tests {
        use crate::{DmaEvent, Half, HalfFlags};

        #[test]
        fn test_both_halves_start_drained() {
            let flags = HalfFlags::new();
            assert!(!flags.is_valid(Half::Lower));
            assert!(!flags.is_valid(Half::Upper));
            assert!(flags.all_drained());
        }

        #[test]
        fn test_set_valid_is_per_half() {
            let flags = HalfFlags::new();
            flags.set_valid(Half::Lower);
            assert!(flags.is_valid(Half::Lower));
            assert!(!flags.is_valid(Half::Upper));
            assert!(!flags.all_drained());
        }

        #[test]
        fn test_half_complete_drains_lower() {
            let flags = HalfFlags::new();
            flags.set_valid(Half::Lower);
            flags.set_valid(Half::Upper);
            flags.mark_drained(DmaEvent::HalfComplete);
            assert!(!flags.is_valid(Half::Lower));
            assert!(flags.is_valid(Half::Upper));
        }

        #[test]
        fn test_transfer_complete_drains_upper() {
            let flags = HalfFlags::new();
            flags.set_valid(Half::Lower);
            flags.set_valid(Half::Upper);
            flags.mark_drained(DmaEvent::TransferComplete);
            assert!(flags.is_valid(Half::Lower));
            assert!(!flags.is_valid(Half::Upper));
        }

        #[test]
        fn test_clear_resets_both() {
            let flags = HalfFlags::new();
            flags.set_valid(Half::Lower);
            flags.set_valid(Half::Upper);
            flags.clear();
            assert!(flags.all_drained());
        }
    }

    /// Playback state machine tests
    mod player_tests {
        use platform::mocks::MockSource;

        use crate::{DmaEvent, Half, HalfFlags, Player, PlayerError, State};

        const RING: usize = 8;
        const HALF: usize = RING / 2;

        fn player(flags: &HalfFlags) -> Player<'_, MockSource, RING> {
            Player::new(flags)
        }

        #[test]
        fn test_starts_not_initialized() {
            let flags = HalfFlags::new();
            let p = player(&flags);
            assert_eq!(p.state(), State::NotInitialized);
        }

        #[test]
        fn test_play_before_init_is_rejected() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            assert_eq!(
                p.play(),
                Err(PlayerError::InvalidState(State::NotInitialized))
            );
        }

        #[test]
        fn test_poll_before_init_is_rejected() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            assert_eq!(
                p.poll(),
                Err(PlayerError::InvalidState(State::NotInitialized))
            );
            assert!(p.buffer().iter().all(|&s| s == 0));
        }

        #[test]
        fn test_init_enters_stopped() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless()).expect("first init");
            assert_eq!(p.state(), State::Stopped);
        }

        #[test]
        fn test_double_init_is_rejected() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless()).expect("first init");
            assert_eq!(
                p.init(MockSource::endless()),
                Err(PlayerError::AlreadyInitialized)
            );
        }

        #[test]
        fn test_play_preloads_both_halves() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless().with_fill(7)).expect("init");
            p.play().expect("play from stopped");

            assert_eq!(p.state(), State::Playing);
            assert!(flags.is_valid(Half::Lower));
            assert!(flags.is_valid(Half::Upper));
            assert!(p.buffer().iter().all(|&s| s == 7));
            assert_eq!(p.source().expect("attached").reads(), 2);
        }

        #[test]
        fn test_poll_refills_only_drained_halves() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless().with_fill(3)).expect("init");
            p.play().expect("play");

            flags.mark_drained(DmaEvent::HalfComplete);
            assert_eq!(p.poll(), Ok(State::Playing));
            assert!(flags.is_valid(Half::Lower));
            // Two preload reads plus exactly one refill.
            assert_eq!(p.source().expect("attached").reads(), 3);

            // Nothing drained: poll must not read again.
            assert_eq!(p.poll(), Ok(State::Playing));
            assert_eq!(p.source().expect("attached").reads(), 3);
        }

        #[test]
        fn test_short_read_zero_fills_tail_and_starts_stopping() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            // One full lower half, then two samples and end-of-stream.
            p.init(MockSource::new(HALF + 2).with_fill(5)).expect("init");
            p.play().expect("play");

            assert_eq!(p.state(), State::Stopping);
            assert_eq!(p.half(Half::Lower), &[5; HALF]);
            assert_eq!(p.half(Half::Upper), &[5, 5, 0, 0]);
            // The truncated half still goes out so the tail is audible.
            assert!(flags.is_valid(Half::Upper));
        }

        #[test]
        fn test_source_error_is_end_of_stream() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless().with_fill(9).failing_on_read(1))
                .expect("init");
            p.play().expect("play");

            assert_eq!(p.state(), State::Stopping);
            assert_eq!(p.half(Half::Lower), &[9; HALF]);
            assert_eq!(p.half(Half::Upper), &[0; HALF]);
            assert!(flags.is_valid(Half::Upper));
        }

        #[test]
        fn test_play_while_playing_reprimes_drained_halves() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless().with_fill(2)).expect("init");
            p.play().expect("play from stopped");

            flags.mark_drained(DmaEvent::HalfComplete);
            p.play().expect("play while playing");
            assert_eq!(p.state(), State::Playing);
            assert!(flags.is_valid(Half::Lower));
            // Two preload reads plus one re-prime of the drained half.
            assert_eq!(p.source().expect("attached").reads(), 3);
        }

        #[test]
        fn test_play_resumes_from_stopping() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless().with_fill(8)).expect("init");
            p.play().expect("play");
            p.stop().expect("stop");
            assert_eq!(p.state(), State::Stopping);

            p.play().expect("play while stopping");
            assert_eq!(p.state(), State::Playing);
        }

        #[test]
        fn test_stop_requests_drain() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless()).expect("init");
            p.play().expect("play");
            p.stop().expect("stop from playing");
            assert_eq!(p.state(), State::Stopping);
            // Idempotent while draining.
            p.stop().expect("stop while stopping");
            assert_eq!(p.state(), State::Stopping);
        }

        #[test]
        fn test_stopping_waits_for_both_halves() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless().with_fill(1)).expect("init");
            p.play().expect("play");
            p.stop().expect("stop");

            // Halves still in flight: no transition, no writes.
            assert_eq!(p.poll(), Ok(State::Stopping));
            let reads = p.source().expect("attached").reads();

            flags.mark_drained(DmaEvent::HalfComplete);
            assert_eq!(p.poll(), Ok(State::Stopping));

            flags.mark_drained(DmaEvent::TransferComplete);
            assert_eq!(p.poll(), Ok(State::Stopped));
            // The ring is silenced for the next start.
            assert!(p.buffer().iter().all(|&s| s == 0));
            // Stopping never reads the source.
            assert_eq!(p.source().expect("attached").reads(), reads);
        }

        #[test]
        fn test_stop_before_play_is_a_no_op() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless()).expect("init");
            p.stop().expect("stop while stopped");
            assert_eq!(p.state(), State::Stopped);
        }

        #[test]
        fn test_stop_before_init_is_rejected() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            assert_eq!(
                p.stop(),
                Err(PlayerError::InvalidState(State::NotInitialized))
            );
        }

        #[test]
        fn test_replay_after_full_stop() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless().with_fill(4)).expect("init");
            p.play().expect("first play");
            p.stop().expect("stop");
            flags.mark_drained(DmaEvent::HalfComplete);
            flags.mark_drained(DmaEvent::TransferComplete);
            assert_eq!(p.poll(), Ok(State::Stopped));

            p.play().expect("second play");
            assert_eq!(p.state(), State::Playing);
            assert!(p.buffer().iter().all(|&s| s == 4));
        }

        #[test]
        fn test_take_source_only_when_quiet() {
            let flags = HalfFlags::new();
            let mut p = player(&flags);
            p.init(MockSource::endless()).expect("init");
            p.play().expect("play");
            assert!(matches!(
                p.take_source(),
                Err(PlayerError::InvalidState(State::Playing))
            ));

            p.stop().expect("stop");
            flags.mark_drained(DmaEvent::HalfComplete);
            flags.mark_drained(DmaEvent::TransferComplete);
            p.poll().expect("poll while initialized");

            let source = p.take_source().expect("quiet");
            assert!(source.is_some());
            assert_eq!(p.state(), State::NotInitialized);
        }
    }
}
