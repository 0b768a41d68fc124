//! # Frame Reassembly
//!
//! A byte stream gives no message boundaries: one read may carry half a message,
//! exactly one, or several glued together. Every message kind has a fixed size, so
//! reassembly is a matter of buffering until a full frame is present and slicing it
//! off, keeping the remainder for the next read.
//!
//! [`WireCodec`] applies the split inside a `tokio_util` codec and is what the
//! host and the player read through, since `Framed` already owns the read buffer.
//! [`FrameReassembler`] is the same rule over caller-supplied chunks, for byte
//! sources that are not an `AsyncRead` (datagram batches, replayed captures, fuzz
//! input). Both slice frames with `split_frame`, so they agree on every chunking.

use std::marker::PhantomData;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::core::message::WireMessage;
use crate::error::{ProtocolError, Result};

/// Slice one `frame_size` frame off the front of `buf`, if a whole one is buffered.
#[inline]
fn split_frame(buf: &mut BytesMut, frame_size: usize) -> Option<BytesMut> {
    if buf.len() >= frame_size {
        Some(buf.split_to(frame_size))
    } else {
        None
    }
}

/// Turns arbitrarily sized chunks into complete frames of one fixed size.
///
/// Frames come out in arrival order and are not interpreted. A zero-length chunk
/// marks the end of the stream; after it no further frames are produced.
#[derive(Debug)]
pub struct FrameReassembler {
    frame_size: usize,
    buffer: BytesMut,
    closed: bool,
}

impl FrameReassembler {
    pub fn new(frame_size: usize) -> Self {
        Self {
            frame_size,
            buffer: BytesMut::with_capacity(frame_size * 4),
            closed: false,
        }
    }

    /// Reassembler sized for messages of type `M`.
    pub fn for_message<M: WireMessage>() -> Self {
        Self::new(M::SIZE)
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Feed one chunk. Returns every frame completed by it, oldest first.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        if chunk.is_empty() {
            self.closed = true;
            return Vec::new();
        }
        if self.closed {
            return Vec::new();
        }

        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::with_capacity(self.buffer.len() / self.frame_size);
        while let Some(frame) = split_frame(&mut self.buffer, self.frame_size) {
            frames.push(frame.freeze());
        }
        frames
    }

    /// Bytes held back waiting for the rest of a frame.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the zero-length end-of-stream chunk has been seen.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Codec that decodes fixed-size messages of type `In` and encodes any wire message.
///
/// The decoder never looks past one frame: bytes of the next message stay buffered
/// until they are complete.
#[derive(Debug)]
pub struct WireCodec<In> {
    _inbound: PhantomData<fn() -> In>,
}

impl<In> WireCodec<In> {
    pub fn new() -> Self {
        Self {
            _inbound: PhantomData,
        }
    }
}

impl<In> Default for WireCodec<In> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: WireMessage> Decoder for WireCodec<In> {
    type Item = In;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<In>> {
        match split_frame(src, In::SIZE) {
            Some(frame) => In::from_bytes(&frame).map(Some),
            None => {
                src.reserve(In::SIZE - src.len());
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<In>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                if !src.is_empty() {
                    debug!(bytes = src.len(), "Discarding partial frame at end of stream");
                    src.clear();
                }
                Ok(None)
            }
        }
    }
}

impl<In, M: WireMessage> Encoder<M> for WireCodec<In> {
    type Error = ProtocolError;

    fn encode(&mut self, item: M, dst: &mut BytesMut) -> Result<()> {
        item.encode(dst);
        Ok(())
    }
}
