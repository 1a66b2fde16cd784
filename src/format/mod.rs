//! Container formats.

/// MPEG-2 transport stream demultiplexing
pub mod ts;
