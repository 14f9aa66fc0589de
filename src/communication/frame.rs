//! Frame
//!
//! Packing of talker data into the fixed fields of a TALK request.
//!
//! A TALK request carries up to three data bytes and a length/EOI byte in the
//! `wValue` and `wIndex` fields of a control transfer:
//!
//! - `wValue` = `d0 | d1 << 8`
//! - `wIndex` = `(len | EOI) << 8 | d2`
//!

use crate::constants::misc;
use crate::error::Error;

use anyhow::Result;

/// ### Talk Chunk
///
/// One packed TALK request, ready to be handed to the bridge.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalkChunk {
    value: u16,
    index: u16,
}

impl TalkChunk {
    /// The `wValue` field of the request
    pub fn value(&self) -> u16 {
        self.value
    }

    /// The `wIndex` field of the request
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Number of meaningful data bytes
    pub fn len(&self) -> usize {
        (self.control() & !misc::TALK_EOI_FLAG) as usize
    }

    /// Whether the chunk carries no data bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the bridge asserts EOI with the last byte of this chunk
    pub fn eoi(&self) -> bool {
        self.control() & misc::TALK_EOI_FLAG != 0
    }

    /// The meaningful data bytes
    pub fn data(&self) -> Vec<u8> {
        let [d0, d1] = self.value.to_le_bytes();
        let d2 = self.index.to_le_bytes()[0];
        let mut data = vec![d0, d1, d2];
        data.truncate(self.len().min(misc::TALK_CHUNK_SIZE));
        data
    }

    fn control(&self) -> u8 {
        self.index.to_le_bytes()[1]
    }
}

/// ### Encode Talk Chunk
///
/// Pack up to three bytes into the TALK request layout. EOI is requested only
/// when the caller wants it and this is the final chunk of the frame.
///
pub fn encode_talk_chunk(chunk: &[u8], is_final: bool, want_eoi: bool) -> Result<TalkChunk> {
    if chunk.is_empty() || chunk.len() > misc::TALK_CHUNK_SIZE {
        return Err(Error::InvalidChunkLength(chunk.len()).into());
    }

    // unused trailing bytes stay zero, the length tells the bridge what to send
    let mut bytes: [u8; 3] = [0x00; 3];
    bytes[..chunk.len()].copy_from_slice(chunk);

    let mut control = chunk.len() as u8;
    if want_eoi && is_final {
        control |= misc::TALK_EOI_FLAG;
    }

    Ok(TalkChunk {
        value: u16::from_le_bytes([bytes[0], bytes[1]]),
        index: u16::from_le_bytes([bytes[2], control]),
    })
}

/// ### Talk Chunks
///
/// Split a data frame into packed TALK requests, in order.
///
pub fn talk_chunks(data: &[u8], eoi: bool) -> Result<Vec<TalkChunk>> {
    // count the number of requests to do
    let num_chunks = data.len().div_ceil(misc::TALK_CHUNK_SIZE);

    data.chunks(misc::TALK_CHUNK_SIZE)
        .enumerate()
        .map(|(chunk_number, chunk)| {
            encode_talk_chunk(chunk, chunk_number + 1 == num_chunks, eoi)
        })
        .collect()
}
