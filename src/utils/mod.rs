//! # Utility Types
//!
//! Bit-level reading shared by every transport stream decoder in the crate.
//!
//! ```rust
//! use tsdemux::utils::BitReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = vec![0b10110011u8];
//! let mut reader = BitReader::new(&data);
//!
//! // Read specific number of bits
//! let value = reader.read_bits(3)?; // Reads first 3 bits (101)
//! assert_eq!(value, 0b101);
//! # Ok(())
//! # }
//! ```

/// Big-endian bit cursor and packed bit fields
pub mod bits;

pub use bits::{BitFields, BitReader};
