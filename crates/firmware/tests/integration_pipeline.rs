//! End-to-end pipeline tests: player refills feeding the spectrum tap,
//! exactly the way the firmware audio task wires them.
// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

use firmware::config::{DFT_N, MAGNITUDE_BINS, UNDERSAMPLING, WINDOW_SAMPLES};
use firmware::SpectrumPipeline;
use platform::mocks::{MockSink, MockSource};
use playback::{DmaEvent, Half, HalfFlags, Player, State};
use spectrum::{Channel, SpectrumAnalyzer};

// Scaled-down geometry so one test cycle is a handful of samples.
const RING: usize = 64;
const HALF: usize = RING / 2;
const N: usize = 8;
const WINDOW: usize = 32; // two batches at undersampling 1

type TestPipeline = SpectrumPipeline<MockSink, N, WINDOW>;

fn pipeline() -> TestPipeline {
    SpectrumPipeline::new(SpectrumAnalyzer::<N>::new(1, Channel::Left), MockSink::new(), 100)
}

/// One iteration of the firmware audio task: note the drained halves,
/// poll, feed the tap with what just got refilled.
fn task_cycle(
    flags: &HalfFlags,
    player: &mut Player<'_, MockSource, RING>,
    pipeline: &mut TestPipeline,
) -> State {
    let pending = [
        !flags.is_valid(Half::Lower),
        !flags.is_valid(Half::Upper),
    ];
    let state = player.poll().expect("player is initialized");
    if state == State::Playing {
        for (half, was_pending) in Half::ALL.into_iter().zip(pending) {
            if was_pending {
                pipeline.feed(player.half(half)).expect("tap keeps up");
            }
        }
    }
    state
}

#[test]
fn silence_flows_through_to_an_all_zero_spectrum() {
    let flags = HalfFlags::new();
    let mut player: Player<'_, MockSource, RING> = Player::new(&flags);
    player.init(MockSource::endless()).expect("init");
    player.play().expect("play");

    let mut pipeline = pipeline();
    // Preloaded halves feed the first window.
    pipeline.feed(player.half(Half::Lower)).expect("lower");
    pipeline.feed(player.half(Half::Upper)).expect("upper");

    let sink = pipeline.sink();
    assert!(sink.updates >= 1);
    assert_eq!(sink.last_bins.len(), N / 2);
    assert!(sink.last_bins.iter().all(|&b| b == 0));
}

#[test]
fn endless_source_keeps_playing_across_many_dma_cycles() {
    let flags = HalfFlags::new();
    let mut player: Player<'_, MockSource, RING> = Player::new(&flags);
    player.init(MockSource::endless().with_fill(11)).expect("init");
    player.play().expect("play");

    let mut pipeline = pipeline();
    for cycle in 0..100 {
        let event = if cycle % 2 == 0 {
            DmaEvent::HalfComplete
        } else {
            DmaEvent::TransferComplete
        };
        flags.mark_drained(event);
        assert_eq!(
            task_cycle(&flags, &mut player, &mut pipeline),
            State::Playing,
            "cycle {cycle}"
        );
    }
    // 100 halves of 32 samples, one update per 32-sample window.
    assert!(pipeline.sink().updates >= 90);
}

#[test]
fn short_read_drains_out_then_silences_the_ring() {
    let flags = HalfFlags::new();
    let mut player: Player<'_, MockSource, RING> = Player::new(&flags);
    // One full half plus a quarter, then end of stream.
    player
        .init(MockSource::new(HALF + HALF / 4).with_fill(6))
        .expect("init");
    player.play().expect("play");

    let mut pipeline = pipeline();
    assert_eq!(player.state(), State::Stopping);
    // The truncated half still carries the tail followed by silence.
    assert_eq!(player.half(Half::Upper)[..HALF / 4], [6; HALF / 4]);
    assert!(player.half(Half::Upper)[HALF / 4..].iter().all(|&s| s == 0));

    // Only the interrupt drains halves now; no refills happen.
    assert_eq!(task_cycle(&flags, &mut player, &mut pipeline), State::Stopping);
    flags.mark_drained(DmaEvent::HalfComplete);
    assert_eq!(task_cycle(&flags, &mut player, &mut pipeline), State::Stopping);
    flags.mark_drained(DmaEvent::TransferComplete);
    assert_eq!(task_cycle(&flags, &mut player, &mut pipeline), State::Stopped);

    assert!(player.buffer().iter().all(|&s| s == 0));
    assert!(flags.all_drained());
}

#[test]
fn production_geometry_produces_one_bar_per_bin() {
    let analyzer = SpectrumAnalyzer::<DFT_N>::new(UNDERSAMPLING, Channel::Left);
    let mut pipeline: SpectrumPipeline<MockSink, DFT_N, WINDOW_SAMPLES> =
        SpectrumPipeline::new(analyzer, MockSink::new(), u32::MAX);

    let window = vec![0i16; WINDOW_SAMPLES];
    assert!(pipeline.feed(&window).expect("exact window"));
    assert_eq!(pipeline.sink().last_bins.len(), MAGNITUDE_BINS);
}
