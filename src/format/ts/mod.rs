//! # MPEG Transport Stream (TS) Demultiplexing
//!
//! This module turns a raw MPEG-2 transport stream into complete PES units:
//!
//! - Resynchronizing an arbitrarily chunked byte stream into 188 byte packets
//! - TS packet header and adaptation field decoding (PCR/OPCR, splicing, extension)
//! - Program Specific Information (PAT/PMT) parsing
//! - Per-PID PES reassembly with continuity counter checking
//! - PES header decoding (PTS/DTS, ESCR, trick mode, ...)
//!
//! ## Data Flow
//!
//! ```text
//! bytes -> TSPacketizer -> 188 byte packets -> TSDemuxer -> PES units -> PESPacket
//!                                                  |
//!                                                  +-> PAT / PMT
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use tsdemux::format::ts::{PESUnit, TSDemuxer, TSPacketizer};
//!
//! fn demux(chunks: &[&[u8]]) -> Vec<PESUnit> {
//!     let mut demuxer = TSDemuxer::new();
//!     let mut units = Vec::new();
//!
//!     let mut packetizer = TSPacketizer::new(|packet: &[u8]| {
//!         // A packet that fails to decode is skipped, the stream goes on
//!         if demuxer.read(packet).is_ok() {
//!             if let Some(unit) = demuxer.take_pes() {
//!                 units.push(unit);
//!             }
//!         }
//!     });
//!     for chunk in chunks {
//!         packetizer.read(chunk);
//!     }
//!     drop(packetizer);
//!     units
//! }
//!
//! assert!(demux(&[&[0x47, 0x00]]).is_empty());
//! ```

/// Adaptation field decoding
pub mod adaptation;

/// Timestamp assembly, continuity math and tick conversions
pub mod clock;

/// PID routing, continuity checking and PES reassembly
pub mod demuxer;

/// TS packet header decoding
pub mod packet;

/// Byte stream to packet resynchronization
pub mod packetizer;

/// Program Association Table
pub mod pat;

/// PES unit decoding
pub mod pes;

/// Program Map Table
pub mod pmt;

/// Core TS types and constants
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types and constants
pub use adaptation::{AdaptationExtension, AdaptationField, LegalTimeWindow, SeamlessSplice};
pub use demuxer::{PESUnit, TSDemuxer};
pub use packet::TSPacket;
pub use packetizer::TSPacketizer;
pub use pat::{PATEntry, PAT};
pub use pes::{PESHeader, PESPacket, TrickMode};
pub use pmt::{Descriptor, ElementaryStreamInfo, PMT};
pub use types::{StreamType, PID_NULL, PID_PAT, SYNC_BYTE, TS_PACKET_SIZE};
