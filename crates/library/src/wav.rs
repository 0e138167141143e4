//! RIFF/WAVE header parsing.
//!
//! Walks the chunk list of a `.wav` file sequentially over any
//! [`embedded_io::Read`], so the parser works against FAT files, in-memory
//! fixtures and test slices alike. Only the exact stream format the codec
//! path is configured for is accepted: uncompressed PCM, stereo, 48 kHz,
//! 16 bits per sample.
//!
//! Chunk layout references:
//! <http://soundfile.sapp.org/doc/WaveFormat/>
//! <https://www.recordingblogs.com/wiki/list-chunk-of-a-wave-file>

// Chunk sizes are u32 by format definition; casts to usize cannot truncate
// on the 32-bit target and scratch buffers are bounded by MAX_TAG_LEN.
#![allow(clippy::cast_possible_truncation)]

use embedded_io::{Read, ReadExactError};
use heapless::String;

/// Longest artist/title tag retained, in bytes. Longer INFO strings are
/// truncated at a character boundary.
pub const MAX_TAG_LEN: usize = 30;

/// Metadata extracted from the headers of a `.wav` file.
///
/// After a successful [`parse`](WavInfo::parse) the reader is positioned
/// at the first byte of the raw PCM stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WavInfo {
    /// Track title from the `INAM` tag, or "Unknown".
    pub title: String<MAX_TAG_LEN>,
    /// Artist from the `IART` tag, or "Unknown".
    pub artist: String<MAX_TAG_LEN>,
    /// Length of the PCM stream in samples (i16 halfwords, both channels).
    pub samples: usize,
}

/// Why a file was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WavError {
    /// The reader failed or the file ended inside a header.
    #[error("read failed or truncated header")]
    Io,
    /// The outer chunk is not `RIFF`.
    #[error("not a RIFF container")]
    NotRiff,
    /// The RIFF form type is not `WAVE`.
    #[error("not a WAVE file")]
    NotWave,
    /// The `fmt ` chunk is missing, malformed, or describes a stream
    /// other than 16-bit stereo PCM at 48 kHz.
    #[error("unsupported stream format")]
    BadFormat,
    /// The chunk list ended without a `data` chunk.
    #[error("no data chunk")]
    MissingData,
}

/// `fmt ` chunk payload (the 16-byte PCM variant).
struct FmtChunk {
    audio_format: u16,
    num_channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

const FMT_CHUNK_LEN: u32 = 16;

impl WavInfo {
    /// Parse the headers of a `.wav` stream.
    ///
    /// Consumes everything up to and including the `data` chunk header;
    /// tags and unknown chunks are skipped in place, never buffered.
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self, WavError> {
        let (riff_id, _) = read_chunk_header(reader)?;
        if &riff_id != b"RIFF" {
            return Err(WavError::NotRiff);
        }
        let mut form = [0u8; 4];
        read_exact(reader, &mut form)?;
        if &form != b"WAVE" {
            return Err(WavError::NotWave);
        }

        // The format chunk must come first and must be the plain 16-byte
        // PCM variant.
        let (fmt_id, fmt_len) = read_chunk_header(reader)?;
        if &fmt_id != b"fmt " || fmt_len != FMT_CHUNK_LEN {
            return Err(WavError::BadFormat);
        }
        let fmt = read_fmt(reader)?;
        if fmt.audio_format != 1
            || fmt.num_channels != 2
            || fmt.sample_rate != 48_000
            || fmt.bits_per_sample != 16
        {
            return Err(WavError::BadFormat);
        }

        let mut info = Self {
            title: String::new(),
            artist: String::new(),
            samples: 0,
        };

        // Walk the remaining chunks until `data`. A LIST/INFO chunk on the
        // way contributes the tags; everything else is skipped, padded to
        // even sizes.
        loop {
            let (id, len) = match read_chunk_header(reader) {
                Ok(header) => header,
                Err(_) => return Err(WavError::MissingData),
            };
            match &id {
                b"data" => {
                    // Halfwords, two bytes apiece.
                    info.samples = (len / 2) as usize;
                    break;
                }
                b"LIST" => parse_list(reader, len, &mut info)?,
                _ => skip_padded(reader, len)?,
            }
        }

        if info.title.is_empty() {
            let _ = info.title.push_str("Unknown");
        }
        if info.artist.is_empty() {
            let _ = info.artist.push_str("Unknown");
        }
        Ok(info)
    }
}

/// Read the IART/INAM tags out of a LIST chunk. Non-INFO lists and
/// unrecognized INFO entries are skipped.
fn parse_list<R: Read>(reader: &mut R, len: u32, info: &mut WavInfo) -> Result<(), WavError> {
    if len < 4 {
        return skip_padded(reader, len);
    }
    let mut form = [0u8; 4];
    read_exact(reader, &mut form)?;
    let mut remaining = len.saturating_sub(4);
    if &form != b"INFO" {
        return skip_padded(reader, remaining);
    }
    while remaining >= 8 {
        let (id, tag_len) = read_chunk_header(reader)?;
        remaining = remaining.saturating_sub(8);
        let padded = tag_len.saturating_add(tag_len % 2);
        match &id {
            b"INAM" => read_tag(reader, tag_len, &mut info.title)?,
            b"IART" => read_tag(reader, tag_len, &mut info.artist)?,
            _ => skip(reader, padded)?,
        }
        remaining = remaining.saturating_sub(padded);
    }
    // A ragged tail would misalign the outer walk; drop it.
    skip(reader, remaining)
}

/// Read a NUL-terminated tag of `len` bytes, keeping at most
/// [`MAX_TAG_LEN`] bytes of valid UTF-8, and consume the pad byte of
/// odd-sized tags.
fn read_tag<R: Read>(
    reader: &mut R,
    len: u32,
    out: &mut String<MAX_TAG_LEN>,
) -> Result<(), WavError> {
    let mut scratch = [0u8; MAX_TAG_LEN];
    let keep = (len as usize).min(scratch.len());
    let head = scratch.get_mut(..keep).unwrap_or(&mut []);
    read_exact(reader, head)?;

    let end = head.iter().position(|&b| b == 0).unwrap_or(head.len());
    let bytes = head.get(..end).unwrap_or(&[]);
    let text = match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            let valid = bytes.get(..error.valid_up_to()).unwrap_or(&[]);
            // valid_up_to marks a char boundary
            core::str::from_utf8(valid).unwrap_or("")
        }
    };
    out.clear();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }

    let consumed = keep as u32;
    let padded = len.saturating_add(len % 2);
    skip(reader, padded.saturating_sub(consumed))
}

// Safety: constant indices into a fixed 16-byte buffer.
#[allow(clippy::indexing_slicing)]
fn read_fmt<R: Read>(reader: &mut R) -> Result<FmtChunk, WavError> {
    let mut raw = [0u8; FMT_CHUNK_LEN as usize];
    read_exact(reader, &mut raw)?;
    Ok(FmtChunk {
        audio_format: u16::from_le_bytes([raw[0], raw[1]]),
        num_channels: u16::from_le_bytes([raw[2], raw[3]]),
        sample_rate: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
        bits_per_sample: u16::from_le_bytes([raw[14], raw[15]]),
    })
}

/// An 8-byte chunk header: four-byte id plus little-endian payload size.
// Safety: constant indices into a fixed 8-byte buffer.
#[allow(clippy::indexing_slicing)]
fn read_chunk_header<R: Read>(reader: &mut R) -> Result<([u8; 4], u32), WavError> {
    let mut raw = [0u8; 8];
    read_exact(reader, &mut raw)?;
    let id = [raw[0], raw[1], raw[2], raw[3]];
    let len = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);
    Ok((id, len))
}

/// Discard `len` bytes plus the pad byte of odd-sized chunks.
fn skip_padded<R: Read>(reader: &mut R, len: u32) -> Result<(), WavError> {
    skip(reader, len.saturating_add(len % 2))
}

/// Discard exactly `len` bytes through the reader.
fn skip<R: Read>(reader: &mut R, len: u32) -> Result<(), WavError> {
    let mut scratch = [0u8; 32];
    let mut remaining = len as usize;
    while remaining > 0 {
        let step = remaining.min(scratch.len());
        let chunk = scratch.get_mut(..step).unwrap_or(&mut []);
        read_exact(reader, chunk)?;
        remaining = remaining.saturating_sub(step);
    }
    Ok(())
}

fn read_exact<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<(), WavError> {
    reader.read_exact(buffer).map_err(|error| match error {
        ReadExactError::UnexpectedEof | ReadExactError::Other(_) => WavError::Io,
    })
}
