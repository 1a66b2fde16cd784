use crate::error::{Result, TsError};

/// A big-endian, MSB-first bit cursor over a byte slice.
///
/// Every transport stream decoder in this crate is composed from it:
/// - Reading individual bits or up to 64 bits as a number
/// - Reading byte-aligned integers and byte runs
/// - Reading a group of fixed-width sub-fields at once ([`BitFields`])
/// - Splitting off a bounded sub-reader over the next N bytes
///
/// Once a read fails the reader stays failed: every further read returns
/// [`TsError::ReaderFailed`] without moving the cursor.
///
/// Example:
/// ```
/// use tsdemux::utils::BitReader;
///
/// let data = [0b10110011, 0xAB];
/// let mut reader = BitReader::new(&data);
///
/// assert_eq!(reader.read_bit().unwrap(), true);    // 1
/// assert_eq!(reader.read_bits(3).unwrap(), 0b011); // 011
/// reader.skip_bits(4).unwrap();
/// assert_eq!(reader.read_u8().unwrap(), 0xAB);
/// ```
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_offset: usize,
    bit_offset: u8,
    failed: bool,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader from a byte slice
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            byte_offset: 0,
            bit_offset: 0,
            failed: false,
        }
    }

    /// Returns true once any read on this reader has failed.
    pub fn has_error(&self) -> bool {
        self.failed
    }

    fn fail(&mut self, error: TsError) -> TsError {
        self.failed = true;
        error
    }

    fn ensure_bits(&mut self, needed: usize) -> Result<()> {
        if self.failed {
            return Err(TsError::ReaderFailed);
        }
        let available = self.available_bits();
        if needed > available {
            return Err(self.fail(TsError::EndOfData { needed, available }));
        }
        Ok(())
    }

    fn ensure_aligned(&mut self) -> Result<()> {
        if self.bit_offset != 0 {
            return Err(self.fail(TsError::Parser(
                "byte read at unaligned bit position".into(),
            )));
        }
        Ok(())
    }

    /// Reads a single bit from the stream.
    /// Returns true for 1, false for 0.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.ensure_bits(1)?;

        let bit = (self.data[self.byte_offset] >> (7 - self.bit_offset)) & 1;
        self.bit_offset += 1;

        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.byte_offset += 1;
        }

        Ok(bit == 1)
    }

    /// Reads n bits and returns them as a number.
    /// The bits are interpreted as big-endian.
    ///
    /// Returns error if n > 64 or end of data is reached. Nothing is
    /// consumed when the read fails.
    pub fn read_bits(&mut self, n: u32) -> Result<u64> {
        if n > 64 {
            return Err(self.fail(TsError::Parser(format!(
                "cannot read {} bits into a 64 bit value",
                n
            ))));
        }
        self.ensure_bits(n as usize)?;

        let mut value = 0u64;
        for _ in 0..n {
            let bit = (self.data[self.byte_offset] >> (7 - self.bit_offset)) & 1;
            value = (value << 1) | bit as u64;
            self.bit_offset += 1;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.byte_offset += 1;
            }
        }

        Ok(value)
    }

    /// Reads 8 bits as a `u8`.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Reads 16 bits as a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_bits(16)? as u16)
    }

    /// Reads 24 bits as a big-endian value in a `u32`.
    pub fn read_u24(&mut self) -> Result<u32> {
        Ok(self.read_bits(24)? as u32)
    }

    /// Reads 32 bits as a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_bits(32)? as u32)
    }

    /// Reads consecutive sub-fields with the given bit widths, MSB first.
    ///
    /// The widths describe one packed big-endian word, so their sum must be
    /// a whole number of bytes (at most 64 bits).
    ///
    /// ```
    /// use tsdemux::utils::BitReader;
    ///
    /// let data = [0x41, 0x00];
    /// let mut reader = BitReader::new(&data);
    /// let fields = reader.read_fields([1, 1, 1, 13]).unwrap();
    /// assert!(!fields.flag(0));
    /// assert!(fields.flag(1));
    /// assert_eq!(fields.get(3), 0x0100);
    /// ```
    pub fn read_fields<const N: usize>(&mut self, widths: [u32; N]) -> Result<BitFields<N>> {
        let total: u32 = widths.iter().sum();
        debug_assert!(total % 8 == 0, "field widths must add up to whole bytes");
        debug_assert!(total <= 64, "field widths must fit in 64 bits");
        self.ensure_bits(total as usize)?;

        let mut values = [0u64; N];
        for (value, &width) in values.iter_mut().zip(widths.iter()) {
            *value = self.read_bits(width)?;
        }
        Ok(BitFields { values })
    }

    /// Requires field `index` of `fields` to equal `expected`.
    ///
    /// A mismatch fails this reader like any other read error.
    pub fn expect_eq<const N: usize>(
        &mut self,
        fields: &BitFields<N>,
        index: usize,
        expected: u64,
    ) -> Result<()> {
        let actual = fields.get(index);
        if actual != expected {
            return Err(self.fail(TsError::UnexpectedValue {
                index,
                expected,
                actual,
            }));
        }
        Ok(())
    }

    /// Requires field `index` of `fields` to differ from `value`.
    ///
    /// A match fails this reader like any other read error.
    pub fn expect_ne<const N: usize>(
        &mut self,
        fields: &BitFields<N>,
        index: usize,
        value: u64,
    ) -> Result<()> {
        if fields.get(index) == value {
            return Err(self.fail(TsError::ForbiddenValue { index, value }));
        }
        Ok(())
    }

    /// Reads the next `n` bytes as a slice of the underlying buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure_aligned()?;
        self.ensure_bits(n * 8)?;
        let bytes = &self.data[self.byte_offset..self.byte_offset + n];
        self.byte_offset += n;
        Ok(bytes)
    }

    /// Skips the next `n` bytes and returns a reader bounded to exactly
    /// those bytes.
    ///
    /// Fails (and marks this reader as failed) if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) -> Result<BitReader<'a>> {
        let bytes = self.read_bytes(n)?;
        Ok(BitReader::new(bytes))
    }

    /// Skips n bits in the stream.
    pub fn skip_bits(&mut self, n: u32) -> Result<()> {
        self.ensure_bits(n as usize)?;
        for _ in 0..n {
            self.read_bit()?;
        }
        Ok(())
    }

    /// Aligns reader to next byte boundary by skipping remaining bits in current byte.
    pub fn align_byte(&mut self) {
        if self.bit_offset != 0 {
            self.bit_offset = 0;
            self.byte_offset += 1;
        }
    }

    /// The unread bytes, starting at the current byte.
    pub fn remaining_data(&self) -> &'a [u8] {
        &self.data[self.byte_offset.min(self.data.len())..]
    }

    /// Number of whole bytes left to read.
    pub fn remaining_bytes(&self) -> usize {
        self.available_bits() / 8
    }

    /// Returns number of bits available to read.
    pub fn available_bits(&self) -> usize {
        (self.data.len() - self.byte_offset) * 8 - self.bit_offset as usize
    }
}

/// The sub-field values produced by [`BitReader::read_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitFields<const N: usize> {
    values: [u64; N],
}

impl<const N: usize> BitFields<N> {
    /// Value of the field at `index`.
    pub fn get(&self, index: usize) -> u64 {
        self.values[index]
    }

    /// The field at `index` interpreted as a flag.
    pub fn flag(&self, index: usize) -> bool {
        self.values[index] != 0
    }

}
