use bytes::Bytes;
use log::trace;

use super::types::{StreamType, CRC_SIZE};
use crate::error::Result;
use crate::utils::BitReader;

/// A `{tag, length, data}` descriptor from a PMT descriptor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// descriptor_tag
    pub tag: u8,
    /// The descriptor_length bytes following the tag
    pub data: Bytes,
}

/// One elementary stream announced by a PMT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryStreamInfo {
    /// stream_type
    pub stream_type: StreamType,
    /// elementary_PID
    pub pid: u16,
    /// ES_info descriptors
    pub descriptors: Vec<Descriptor>,
}

/// Program Map Table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PMT {
    /// table_id, 0x02 for a PMT
    pub table_id: u8,
    /// section_syntax_indicator
    pub section_syntax_indicator: bool,
    /// program_number
    pub program_number: u16,
    /// version_number (5 bits)
    pub version_number: u8,
    /// current_next_indicator
    pub current_next_indicator: bool,
    /// section_number
    pub section_number: u8,
    /// last_section_number
    pub last_section_number: u8,
    /// PID of the packets carrying this program's PCR
    pub pcr_pid: u16,
    /// Raw program_info descriptor bytes.
    pub program_info: Bytes,
    /// Elementary streams in section order
    pub streams: Vec<ElementaryStreamInfo>,
    /// CRC_32 as found in the section, not verified.
    pub crc: u32,
}

impl PMT {
    /// Parses a PMT section starting at its table_id byte.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_from(&mut BitReader::new(data))
    }

    /// Parses a PMT section from `reader`, leaving it after the CRC.
    pub fn parse_from(reader: &mut BitReader<'_>) -> Result<Self> {
        let table_id = reader.read_u8()?;
        let fields = reader.read_fields([1, 1, 2, 2, 10])?;
        reader.expect_eq(&fields, 3, 0)?;
        let mut section = reader.skip(fields.get(4) as usize)?;

        let program_number = section.read_u16()?;
        let version = section.read_fields([2, 5, 1])?;
        let section_number = section.read_u8()?;
        let last_section_number = section.read_u8()?;
        let pcr_pid = section.read_fields([3, 13])?.get(1) as u16;

        let program_info_length = section.read_fields([4, 2, 10])?;
        section.expect_eq(&program_info_length, 1, 0)?;
        let program_info =
            Bytes::copy_from_slice(section.read_bytes(program_info_length.get(2) as usize)?);

        let mut streams = Vec::new();
        while section.remaining_bytes() > CRC_SIZE {
            let stream_type = StreamType(section.read_u8()?);
            let pid = section.read_fields([3, 13])?.get(1) as u16;
            let es_info_length = section.read_fields([4, 2, 10])?;
            section.expect_eq(&es_info_length, 1, 0)?;
            let mut es_info = section.skip(es_info_length.get(2) as usize)?;

            streams.push(ElementaryStreamInfo {
                stream_type,
                pid,
                descriptors: parse_descriptors(&mut es_info)?,
            });
        }
        let crc = section.read_u32()?;

        trace!(
            "PMT program={} pcr_pid={} with {} streams",
            program_number,
            pcr_pid,
            streams.len()
        );

        Ok(PMT {
            table_id,
            section_syntax_indicator: fields.flag(0),
            program_number,
            version_number: version.get(1) as u8,
            current_next_indicator: version.flag(2),
            section_number,
            last_section_number,
            pcr_pid,
            program_info,
            streams,
            crc,
        })
    }

    /// The stream entry for `pid`, if this program carries it.
    pub fn stream(&self, pid: u16) -> Option<&ElementaryStreamInfo> {
        self.streams.iter().find(|stream| stream.pid == pid)
    }
}

fn parse_descriptors(reader: &mut BitReader<'_>) -> Result<Vec<Descriptor>> {
    let mut descriptors = Vec::new();
    while reader.remaining_bytes() > 0 {
        let tag = reader.read_u8()?;
        let length = reader.read_u8()? as usize;
        descriptors.push(Descriptor {
            tag,
            data: Bytes::copy_from_slice(reader.read_bytes(length)?),
        });
    }
    Ok(descriptors)
}
