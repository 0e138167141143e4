//! WAV stream → sample feed adapter.

use embedded_io::Read;
use library::{Track, WavError, WavInfo};
use platform::SampleSource;

/// Feeds the playback ring from a parsed WAV stream while keeping the
/// track cursor in step for the progress display.
///
/// Reads stop at the end of the `data` chunk, so trailing chunks in the
/// file are never played as noise.
pub struct WavSource<R> {
    reader: R,
    track: Track,
}

impl<R: Read> WavSource<R> {
    /// Parse the WAV headers and position the reader at the PCM stream.
    pub fn open(mut reader: R) -> Result<Self, WavError> {
        let info = WavInfo::parse(&mut reader)?;
        Ok(Self {
            reader,
            track: Track::new(info),
        })
    }

    /// Tags and progress of the playing track.
    pub fn track(&self) -> &Track {
        &self.track
    }
}

impl<R: Read> SampleSource for WavSource<R> {
    type Error = R::Error;

    fn read(&mut self, buffer: &mut [i16]) -> Result<usize, Self::Error> {
        let remaining = self.track.samples().saturating_sub(self.track.samples_read());
        let want = buffer.len().min(remaining);

        let mut filled = 0usize;
        let mut scratch = [0u8; 64];
        'fill: while filled < want {
            let step = want.saturating_sub(filled).min(scratch.len() / 2);
            let Some(raw) = scratch.get_mut(..step.saturating_mul(2)) else {
                break;
            };
            // The reader may hand back short counts; collect until the
            // scratch is full or the stream ends mid-way.
            let mut have = 0usize;
            while have < raw.len() {
                let Some(rest) = raw.get_mut(have..) else {
                    break;
                };
                let n = self.reader.read(rest)?;
                if n == 0 {
                    break; // end of stream, convert what we got
                }
                have = have.saturating_add(n);
            }
            for (slot, bytes) in buffer
                .iter_mut()
                .skip(filled)
                .zip(raw.get(..have & !1).unwrap_or(&[]).chunks_exact(2))
            {
                let &[lo, hi] = bytes else { break };
                *slot = i16::from_le_bytes([lo, hi]);
                filled = filled.saturating_add(1);
            }
            if have < raw.len() {
                break 'fill;
            }
        }

        self.track.advance(filled);
        Ok(filled)
    }
}
