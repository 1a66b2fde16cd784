use crate::error::Result;
use crate::utils::BitReader;
use log::trace;

use super::types::CRC_SIZE;

/// A program number to PID mapping from the PAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PATEntry {
    /// 0 marks the network information PID
    pub program_number: u16,
    /// PMT PID, or the network information PID when `program_number` is 0.
    pub pid: u16,
}

impl PATEntry {
    /// True for the network information entry, which is not a program.
    pub fn is_network_pid(&self) -> bool {
        self.program_number == 0
    }
}

/// Program Association Table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PAT {
    /// table_id, 0x00 for a PAT
    pub table_id: u8,
    /// section_syntax_indicator
    pub section_syntax_indicator: bool,
    /// transport_stream_id
    pub transport_stream_id: u16,
    /// version_number (5 bits)
    pub version_number: u8,
    /// current_next_indicator
    pub current_next_indicator: bool,
    /// section_number
    pub section_number: u8,
    /// last_section_number
    pub last_section_number: u8,
    /// Program entries in section order
    pub entries: Vec<PATEntry>,
    /// CRC_32 as found in the section, not verified.
    pub crc: u32,
}

impl PAT {
    /// Parses a PAT section starting at its table_id byte.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_from(&mut BitReader::new(data))
    }

    /// Parses a PAT section from `reader`, leaving it after the CRC.
    pub fn parse_from(reader: &mut BitReader<'_>) -> Result<Self> {
        let table_id = reader.read_u8()?;
        let fields = reader.read_fields([1, 1, 2, 12])?;
        let mut section = reader.skip(fields.get(3) as usize)?;

        let transport_stream_id = section.read_u16()?;
        let version = section.read_fields([2, 5, 1])?;
        let section_number = section.read_u8()?;
        let last_section_number = section.read_u8()?;

        let mut entries = Vec::new();
        while section.remaining_bytes() > CRC_SIZE {
            let program_number = section.read_u16()?;
            let pid = section.read_fields([3, 13])?.get(1) as u16;
            entries.push(PATEntry {
                program_number,
                pid,
            });
        }
        let crc = section.read_u32()?;

        trace!(
            "PAT ts_id={} version={} with {} entries",
            transport_stream_id,
            version.get(1),
            entries.len()
        );

        Ok(PAT {
            table_id,
            section_syntax_indicator: fields.flag(0),
            transport_stream_id,
            version_number: version.get(1) as u8,
            current_next_indicator: version.flag(2),
            section_number,
            last_section_number,
            entries,
            crc,
        })
    }

    /// PMT PIDs of the real programs, skipping the network PID entry.
    pub fn program_pids(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .iter()
            .filter(|entry| !entry.is_network_pid())
            .map(|entry| entry.pid)
    }
}
