//! # Core Protocol Components
//!
//! Fixed-layout wire messages and stream framing.
//!
//! ## Components
//! - **Message**: the four message kinds and their byte-exact encoding
//! - **Codec**: frame reassembly over byte streams, as a plain buffer and as a Tokio codec
//!
//! ## Wire Format
//! ```text
//! [Magic 0xABCDDCBA (4)] [Kind(1)] [Fields(N)]
//! ```
//!
//! Each kind has a constant size; decoding demands exactly that many bytes.

pub mod codec;
pub mod message;
