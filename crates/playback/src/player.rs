//! Playback state machine over a double-buffered DMA ring.
//!
//! The [`Player`] owns the sample ring and the current source and runs in
//! task context only. The interrupt handler is expected to call
//! [`HalfFlags::mark_drained`] on the shared flags; everything else,
//! including the stop/quiescence sequence and all sample writes, happens
//! inside [`Player::poll`].

use platform::SampleSource;

use crate::half_buffer::{Half, HalfFlags};

/// Lifecycle of the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No source has ever been attached.
    NotInitialized,
    /// Idle with a fully zeroed ring; ready to start.
    Stopped,
    /// Ring halves are being drained by DMA and refilled on demand.
    Playing,
    /// No more data will be written; waiting for both halves to drain.
    Stopping,
}

/// Errors surfaced by the player control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError {
    /// `init` was called twice without an intervening teardown.
    AlreadyInitialized,
    /// The requested transition is not legal from the current state.
    InvalidState(State),
}

/// Double-buffered sample player, generic over the ring size `N` (total
/// samples across both halves, must be even).
///
/// The flags reference is shared with the DMA interrupt handler; the
/// buffer and source are owned exclusively by the task context.
pub struct Player<'f, S, const N: usize> {
    state: State,
    source: Option<S>,
    buffer: [i16; N],
    flags: &'f HalfFlags,
}

impl<'f, S, const N: usize> Player<'f, S, N>
where
    S: SampleSource,
{
    const HALF_LEN: usize = {
        assert!(N % 2 == 0, "ring buffer must split into two equal halves");
        assert!(N > 0, "ring buffer cannot be empty");
        N / 2
    };

    /// A player with no source attached. The ring starts zeroed and both
    /// halves drained.
    pub fn new(flags: &'f HalfFlags) -> Self {
        flags.clear();
        Self {
            state: State::NotInitialized,
            source: None,
            buffer: [0; N],
            flags,
        }
    }

    /// Attach the sample source. Legal exactly once per player.
    pub fn init(&mut self, source: S) -> Result<(), PlayerError> {
        if self.state != State::NotInitialized {
            return Err(PlayerError::AlreadyInitialized);
        }
        self.source = Some(source);
        self.flags.clear();
        self.state = State::Stopped;
        Ok(())
    }

    /// Preload any drained halves from the source and enter `Playing`.
    ///
    /// Legal from every state but [`State::NotInitialized`]: from
    /// `Stopped` this primes both halves of the zeroed ring, from
    /// `Playing` it refills whatever the interrupt has drained since the
    /// last `poll`, and from `Stopping` it cancels the drain and resumes
    /// the stream.
    ///
    /// Runs the same refill path `poll` uses, so a source that ends during
    /// the preload short-circuits straight into `Stopping` with the tail
    /// of the ring zero-filled.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        if self.state == State::NotInitialized {
            return Err(PlayerError::InvalidState(State::NotInitialized));
        }
        self.state = State::Playing;
        for half in Half::ALL {
            if self.flags.is_valid(half) {
                continue;
            }
            if !self.refill(half) {
                self.state = State::Stopping;
                break;
            }
        }
        Ok(())
    }

    /// Request a stop. No further data is written; the ring keeps playing
    /// until both halves drain, at which point `poll` completes the
    /// transition to [`State::Stopped`].
    pub fn stop(&mut self) -> Result<(), PlayerError> {
        match self.state {
            State::Playing => {
                self.state = State::Stopping;
                Ok(())
            }
            // Already on the way down or already idle: nothing to do.
            State::Stopping | State::Stopped => Ok(()),
            State::NotInitialized => Err(PlayerError::InvalidState(self.state)),
        }
    }

    /// Advance the state machine. Call from task context whenever a DMA
    /// event has fired (or on a periodic tick).
    ///
    /// Returns the state after the step so the caller can react to the
    /// `Stopping -> Stopped` edge (mute, disable the stream, ...). Before
    /// `init` there is nothing to advance and no buffer to touch, so the
    /// call is rejected outright.
    pub fn poll(&mut self) -> Result<State, PlayerError> {
        match self.state {
            State::NotInitialized => {
                return Err(PlayerError::InvalidState(State::NotInitialized));
            }
            State::Stopped => {}
            State::Playing => {
                for half in Half::ALL {
                    if self.flags.is_valid(half) {
                        continue;
                    }
                    if !self.refill(half) {
                        self.state = State::Stopping;
                        break;
                    }
                }
            }
            State::Stopping => {
                // Drained halves stay drained; once both are, silence the
                // whole ring so a later `play` starts from clean memory.
                if self.flags.all_drained() {
                    self.buffer.fill(0);
                    self.state = State::Stopped;
                }
            }
        }
        Ok(self.state)
    }

    /// Read one half's worth of samples from the source into `half` and
    /// publish it. Returns `false` when the source is exhausted (short
    /// read or read error), in which case the unread tail of the half has
    /// been zero-filled and the half is still published, so the last real
    /// samples play out before silence.
    fn refill(&mut self, half: Half) -> bool {
        let (lower, upper) = self.buffer.split_at_mut(Self::HALF_LEN);
        let slot = match half {
            Half::Lower => lower,
            Half::Upper => upper,
        };
        let read = match self.source.as_mut() {
            Some(source) => source.read(slot).unwrap_or(0),
            None => 0,
        };
        let complete = read >= slot.len();
        if !complete {
            if let Some(tail) = slot.get_mut(read..) {
                tail.fill(0);
            }
        }
        self.flags.set_valid(half);
        complete
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The whole ring, for handing to the DMA engine.
    pub fn buffer(&self) -> &[i16; N] {
        &self.buffer
    }

    /// One half of the ring, read-only (spectrum taps read drained data
    /// from task context between refills).
    pub fn half(&self, half: Half) -> &[i16] {
        let (lower, upper) = self.buffer.split_at(Self::HALF_LEN);
        match half {
            Half::Lower => lower,
            Half::Upper => upper,
        }
    }

    /// Borrow the attached source, if any.
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Mutable access to the attached source (progress bookkeeping).
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    /// Detach the source and return to [`State::NotInitialized`]. Only
    /// legal once the ring is quiet.
    pub fn take_source(&mut self) -> Result<Option<S>, PlayerError> {
        match self.state {
            State::NotInitialized | State::Stopped => {
                self.state = State::NotInitialized;
                self.flags.clear();
                Ok(self.source.take())
            }
            State::Playing | State::Stopping => Err(PlayerError::InvalidState(self.state)),
        }
    }
}
