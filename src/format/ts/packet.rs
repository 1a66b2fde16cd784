use super::adaptation::AdaptationField;
use super::types::{PID_NULL, SYNC_BYTE, TS_PACKET_SIZE};
use crate::error::{Result, TsError};
use crate::utils::BitReader;

/// One decoded 188 byte transport stream packet.
///
/// The adaptation field and payload borrow from the packet buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TSPacket<'a> {
    /// Always false: packets with the indicator set fail to parse
    pub transport_error_indicator: bool,
    /// PUSI, set on the first packet of a PES unit or PSI section
    pub payload_unit_start_indicator: bool,
    /// transport_priority
    pub transport_priority: bool,
    /// 13 bit packet identifier
    pub pid: u16,
    /// transport_scrambling_control (2 bits)
    pub transport_scrambling_control: u8,
    /// 1 = payload only, 2 = adaptation field only, 3 = both.
    pub adaptation_field_control: u8,
    /// 4 bit per-PID sequence number
    pub continuity_counter: u8,
    /// Present when `adaptation_field_control` is 2 or 3
    pub adaptation_field: Option<AdaptationField<'a>>,
    /// Bytes after the header and adaptation field. Empty when the packet
    /// has no payload field.
    pub payload: &'a [u8],
}

impl<'a> TSPacket<'a> {
    /// Decodes a packet from exactly [`TS_PACKET_SIZE`] bytes.
    ///
    /// Fails on a wrong length, a missing sync byte, a set transport error
    /// indicator or an adaptation field longer than the packet.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() != TS_PACKET_SIZE {
            return Err(TsError::InvalidPacketSize(data.len()));
        }

        let mut reader = BitReader::new(data);
        let sync_byte = reader.read_u8()?;
        if sync_byte != SYNC_BYTE {
            return Err(TsError::InvalidSyncByte(sync_byte));
        }

        let fields = reader.read_fields([1, 1, 1, 13, 2, 2, 4])?;
        if fields.flag(0) {
            return Err(TsError::TransportError);
        }

        let mut packet = TSPacket {
            transport_error_indicator: false,
            payload_unit_start_indicator: fields.flag(1),
            transport_priority: fields.flag(2),
            pid: fields.get(3) as u16,
            transport_scrambling_control: fields.get(4) as u8,
            adaptation_field_control: fields.get(5) as u8,
            continuity_counter: fields.get(6) as u8,
            adaptation_field: None,
            payload: &[],
        };

        if packet.has_adaptation_field() {
            packet.adaptation_field = Some(AdaptationField::parse(&mut reader)?);
        }

        if packet.has_payload_field() {
            packet.payload = reader.remaining_data();
        }

        Ok(packet)
    }

    /// True when `adaptation_field_control` announces an adaptation field.
    pub fn has_adaptation_field(&self) -> bool {
        self.adaptation_field_control & 0x2 != 0
    }

    /// True when `adaptation_field_control` announces a payload.
    pub fn has_payload_field(&self) -> bool {
        self.adaptation_field_control & 0x1 != 0
    }

    /// True for stuffing packets on [`PID_NULL`].
    pub fn is_null_packet(&self) -> bool {
        self.pid == PID_NULL
    }
}
