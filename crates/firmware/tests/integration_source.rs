//! WAV stream → player wiring: header parsing, sample delivery and
//! progress bookkeeping through the `WavSource` adapter.
// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::indexing_slicing
)]

use firmware::audio::WavSource;
use library::WavError;
use platform::SampleSource;
use playback::{DmaEvent, Half, HalfFlags, Player, State};

const RING: usize = 64;
const HALF: usize = RING / 2;

/// A minimal stereo/48k/16-bit file with the given PCM halfwords.
fn wav_with_pcm(samples: &[i16]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"fmt ");
    body.extend_from_slice(&16u32.to_le_bytes());
    body.extend_from_slice(&1u16.to_le_bytes()); // PCM
    body.extend_from_slice(&2u16.to_le_bytes()); // stereo
    body.extend_from_slice(&48_000u32.to_le_bytes());
    body.extend_from_slice(&192_000u32.to_le_bytes());
    body.extend_from_slice(&4u16.to_le_bytes());
    body.extend_from_slice(&16u16.to_le_bytes());
    body.extend_from_slice(b"LIST");
    body.extend_from_slice(&20u32.to_le_bytes());
    body.extend_from_slice(b"INFO");
    body.extend_from_slice(b"INAM");
    body.extend_from_slice(&8u32.to_le_bytes());
    body.extend_from_slice(b"Ramp Up\0");
    body.extend_from_slice(b"data");
    body.extend_from_slice(&((samples.len() * 2) as u32).to_le_bytes());
    for &s in samples {
        body.extend_from_slice(&s.to_le_bytes());
    }

    let mut file = Vec::new();
    file.extend_from_slice(b"RIFF");
    file.extend_from_slice(&((4 + body.len()) as u32).to_le_bytes());
    file.extend_from_slice(b"WAVE");
    file.extend_from_slice(&body);
    file
}

#[test]
fn open_parses_tags_and_length() {
    let pcm: Vec<i16> = (1..=100).collect();
    let file = wav_with_pcm(&pcm);
    let source = WavSource::open(file.as_slice()).expect("valid file");

    let track = source.track();
    assert_eq!(track.title.as_str(), "Ramp Up");
    assert_eq!(track.artist.as_str(), "Unknown");
    assert_eq!(track.samples(), 100);
    assert_eq!(track.samples_read(), 0);
}

#[test]
fn open_rejects_garbage() {
    assert_eq!(
        WavSource::open(&b"not a wav file"[..]).err(),
        Some(WavError::NotRiff)
    );
}

#[test]
fn read_decodes_little_endian_halfwords() {
    let pcm: Vec<i16> = vec![-1, 0, 257, i16::MIN, i16::MAX];
    let file = wav_with_pcm(&pcm);
    let mut source = WavSource::open(file.as_slice()).expect("open");

    let mut buffer = [0i16; 8];
    let n = source.read(&mut buffer).expect("read");
    assert_eq!(n, 5);
    assert_eq!(&buffer[..5], &pcm[..]);
    assert_eq!(source.track().samples_read(), 5);
}

#[test]
fn read_stops_at_the_data_chunk_end() {
    let pcm: Vec<i16> = (0..10).collect();
    let mut file = wav_with_pcm(&pcm);
    // Trailing junk after the data chunk must never be played.
    file.extend_from_slice(&[0x55; 32]);
    let mut source = WavSource::open(file.as_slice()).expect("open");

    let mut buffer = [0i16; 64];
    assert_eq!(source.read(&mut buffer).expect("read"), 10);
    assert_eq!(source.read(&mut buffer).expect("eof"), 0);
}

#[test]
fn player_streams_a_whole_track_to_the_end() {
    let pcm: Vec<i16> = (1..=100).collect();
    let file = wav_with_pcm(&pcm);
    let source = WavSource::open(file.as_slice()).expect("open");

    let flags = HalfFlags::new();
    let mut player: Player<'_, _, RING> = Player::new(&flags);
    player.init(source).expect("init");
    player.play().expect("play");

    // 100 samples fill one ring (64) plus a truncated lower half.
    assert_eq!(player.state(), State::Playing);
    assert_eq!(player.half(Half::Lower)[..], pcm[..HALF]);
    assert_eq!(player.half(Half::Upper)[..], pcm[HALF..RING]);
    assert_eq!(player.source().expect("attached").track().samples_read(), 64);

    // Lower drains and refills with the next full half.
    flags.mark_drained(DmaEvent::HalfComplete);
    assert_eq!(player.poll(), Ok(State::Playing));
    assert_eq!(player.half(Half::Lower)[..], pcm[RING..RING + HALF]);
    assert_eq!(player.source().expect("attached").track().samples_read(), 96);

    // Upper drains; only 4 samples remain, so the stop sequence begins.
    flags.mark_drained(DmaEvent::TransferComplete);
    assert_eq!(player.poll(), Ok(State::Stopping));
    assert_eq!(player.half(Half::Upper)[..4], pcm[96..]);
    assert!(player.half(Half::Upper)[4..].iter().all(|&s| s == 0));
    assert!(player.source().expect("attached").track().is_finished());

    // Both halves play out, then the ring is silenced.
    flags.mark_drained(DmaEvent::HalfComplete);
    assert_eq!(player.poll(), Ok(State::Stopping));
    flags.mark_drained(DmaEvent::TransferComplete);
    assert_eq!(player.poll(), Ok(State::Stopped));
    assert!(player.buffer().iter().all(|&s| s == 0));
}
