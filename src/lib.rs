#![doc(html_root_url = "https://docs.rs/tsdemux/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # tsdemux - MPEG-2 Transport Stream demultiplexer
//!
//! `tsdemux` extracts Packetized Elementary Stream (PES) units from an
//! MPEG-2 transport stream as received from a file, a socket or any other
//! byte source. It does no I/O of its own: the caller pushes bytes in and
//! pulls completed units out.
//!
//! ## Features
//!
//! ### Stream Handling
//! - Resynchronization of arbitrarily chunked input into 188 byte packets
//! - Continuity counter checking with per-PID loss recovery
//! - Bounded per-PID reassembly buffers
//!
//! ### Decoding
//! - TS packet headers and adaptation fields (PCR, OPCR, splicing, extension)
//! - PAT and PMT sections, including descriptors
//! - PES headers with PTS/DTS, ESCR, ES rate, trick mode and copy info
//! - Stream type labels for every ISO/IEC 13818-1 stream_type code
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::io::Read;
//! use tsdemux::format::ts::{TSDemuxer, TSPacketizer};
//! use tsdemux::DemuxerConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut demuxer = TSDemuxer::with_config(DemuxerConfig::from_env()?);
//!     let mut packetizer = TSPacketizer::new(|packet: &[u8]| {
//!         if let Err(e) = demuxer.read(packet) {
//!             eprintln!("skipping packet: {}", e);
//!             return;
//!         }
//!         if let Some(Ok(pes)) = demuxer.decode_pes() {
//!             println!(
//!                 "PID {:#x}: stream {:#x}, pts {:?}, {} bytes",
//!                 demuxer.pes_pid(),
//!                 pes.stream_id,
//!                 pes.pts(),
//!                 pes.payload.len()
//!             );
//!         }
//!     });
//!
//!     let mut file = std::fs::File::open("input.ts")?;
//!     let mut buf = [0u8; 64 * 1024];
//!     loop {
//!         let n = file.read(&mut buf)?;
//!         if n == 0 {
//!             break;
//!         }
//!         packetizer.read(&buf[..n]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `format::ts`: transport stream packetizer, decoders and demuxer
//! - `config`: demuxer tunables, optionally read from the environment
//! - `error`: error type and `Result` alias
//! - `utils`: the big-endian bit reader every decoder is built on

/// Demuxer configuration
pub mod config;

/// Error types and utilities
pub mod error;

/// Container format implementations
pub mod format;

/// Utility functions and helpers
pub mod utils;

pub use config::DemuxerConfig;
pub use error::{Result, TsError};
