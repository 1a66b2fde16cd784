use super::clock::{clock_reference, read_timestamp};
use super::types::*;
use crate::error::{Result, TsError};
use crate::utils::{BitFields, BitReader};

/// DSM trick mode fields of the PES header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickMode {
    /// trick_mode_control (fast forward, slow motion, ...)
    pub control: u8,
    /// The 5 bits following the control, interpreted per control value
    pub data: u8,
}

/// Optional Packetized Elementary Stream (PES) header
///
/// Present for every stream id except the ones listed in
/// [`has_optional_header`]. Timestamp values are already assembled from
/// their split wire layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PESHeader {
    /// Control field for scrambling mode
    pub scrambling_control: u8,
    /// Priority flag for the packet
    pub priority: bool,
    /// Data alignment indicator
    pub data_alignment: bool,
    /// Copyright indicator
    pub copyright: bool,
    /// Original/copy indicator
    pub original: bool,
    /// 0b10 when only a PTS follows, 0b11 for PTS and DTS
    pub pts_dts_flags: u8,
    /// PES extension flag; the extension itself is not decoded
    pub extension_flag: bool,
    /// Length of the header data following this field
    pub header_data_length: u8,
    /// Presentation Time Stamp (33 bits, 90 kHz)
    pub pts: Option<u64>,
    /// Decoding Time Stamp (33 bits, 90 kHz)
    pub dts: Option<u64>,
    /// Elementary Stream Clock Reference (27 MHz)
    pub escr: Option<u64>,
    /// Elementary stream rate in units of 50 bytes/second
    pub es_rate: Option<u32>,
    /// DSM trick mode
    pub trick_mode: Option<TrickMode>,
    /// Additional copy info (7 bits)
    pub additional_copy_info: Option<u8>,
    /// CRC of the previous PES packet
    pub previous_pes_crc: Option<u16>,
}

/// A decoded PES unit, borrowing its payload from the reassembled buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PESPacket<'a> {
    /// Stream identifier indicating content type (video/audio/etc.)
    pub stream_id: u8,
    /// PES_packet_length as found in the unit; 0 means unbounded
    pub packet_length: u16,
    /// The optional header, `None` for stream ids without one
    pub header: Option<PESHeader>,
    /// Elementary stream bytes following the header
    pub payload: &'a [u8],
}

/// Whether PES units with this stream id carry the optional header.
pub fn has_optional_header(stream_id: u8) -> bool {
    !matches!(
        stream_id,
        STREAM_ID_PROGRAM_STREAM_MAP
            | STREAM_ID_PADDING
            | STREAM_ID_PRIVATE_STREAM_2
            | STREAM_ID_ECM
            | STREAM_ID_EMM
            | STREAM_ID_PROGRAM_STREAM_DIRECTORY
            | STREAM_ID_DSMCC
            | STREAM_ID_H222_1_TYPE_E
    )
}

/// Whether `stream_id` is one of the video stream ids 0xE0..=0xEF.
pub fn is_video_stream_id(stream_id: u8) -> bool {
    (STREAM_ID_VIDEO_FIRST..=STREAM_ID_VIDEO_LAST).contains(&stream_id)
}

impl<'a> PESPacket<'a> {
    /// Parses a reassembled PES unit.
    ///
    /// A `packet_length` of 0 extends the unit to the end of `data` for
    /// every stream id.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Self::parse_with(data, false)
    }

    /// Like [`parse`](Self::parse), but rejects a `packet_length` of 0
    /// unless the stream id is a video stream.
    pub fn parse_strict(data: &'a [u8]) -> Result<Self> {
        Self::parse_with(data, true)
    }

    pub(crate) fn parse_with(data: &'a [u8], strict_length: bool) -> Result<Self> {
        let mut reader = BitReader::new(data);

        let start_code = reader.read_u24()?;
        if start_code != 0x000001 {
            return Err(TsError::InvalidData(format!(
                "invalid PES start code {:#08x}",
                start_code
            )));
        }

        let stream_id = reader.read_u8()?;
        let packet_length = reader.read_u16()?;

        let mut body = if packet_length == 0 {
            if strict_length && !is_video_stream_id(stream_id) {
                return Err(TsError::InvalidData(format!(
                    "unbounded PES length for non-video stream id {:#04x}",
                    stream_id
                )));
            }
            let remaining = reader.remaining_bytes();
            reader.skip(remaining)?
        } else {
            reader.skip(packet_length as usize)?
        };

        let header = if has_optional_header(stream_id) {
            Some(parse_header(&mut body)?)
        } else {
            None
        };

        Ok(PESPacket {
            stream_id,
            packet_length,
            header,
            payload: body.remaining_data(),
        })
    }

    /// PTS from the optional header, if present.
    pub fn pts(&self) -> Option<u64> {
        self.header.as_ref().and_then(|header| header.pts)
    }

    /// DTS from the optional header, if present.
    pub fn dts(&self) -> Option<u64> {
        self.header.as_ref().and_then(|header| header.dts)
    }
}

fn parse_header(reader: &mut BitReader<'_>) -> Result<PESHeader> {
    let fields = reader.read_fields([2, 2, 1, 1, 1, 1])?;
    reader.expect_eq(&fields, 0, 0b10)?;
    let flags = reader.read_fields([2, 1, 1, 1, 1, 1, 1])?;
    reader.expect_ne(&flags, 0, 0b01)?;
    let header_data_length = reader.read_u8()?;
    let mut data = reader.skip(header_data_length as usize)?;

    let mut header = PESHeader {
        scrambling_control: fields.get(1) as u8,
        priority: fields.flag(2),
        data_alignment: fields.flag(3),
        copyright: fields.flag(4),
        original: fields.flag(5),
        pts_dts_flags: flags.get(0) as u8,
        extension_flag: flags.flag(6),
        header_data_length,
        ..Default::default()
    };

    if header.pts_dts_flags & 0b10 != 0 {
        header.pts = Some(timestamp(&data.read_fields([4, 3, 1, 15, 1, 15, 1])?));
    }

    if header.pts_dts_flags == 0b11 {
        header.dts = Some(timestamp(&data.read_fields([4, 3, 1, 15, 1, 15, 1])?));
    }

    if flags.flag(1) {
        let escr = data.read_fields([2, 3, 1, 15, 1, 15, 1, 9, 1])?;
        let base = read_timestamp(
            escr.get(1) as u8,
            escr.get(3) as u16,
            escr.get(5) as u16,
        );
        header.escr = Some(clock_reference(base, escr.get(7) as u16));
    }

    if flags.flag(2) {
        header.es_rate = Some(data.read_fields([1, 22, 1])?.get(1) as u32);
    }

    if flags.flag(3) {
        let trick_mode = data.read_fields([3, 5])?;
        header.trick_mode = Some(TrickMode {
            control: trick_mode.get(0) as u8,
            data: trick_mode.get(1) as u8,
        });
    }

    if flags.flag(4) {
        header.additional_copy_info = Some(data.read_fields([1, 7])?.get(1) as u8);
    }

    if flags.flag(5) {
        header.previous_pes_crc = Some(data.read_u16()?);
    }

    Ok(header)
}

/// PTS/DTS: 4 prefix bits, then 3/15/15 bit chunks each followed by a marker.
fn timestamp(fields: &BitFields<7>) -> u64 {
    read_timestamp(
        fields.get(1) as u8,
        fields.get(3) as u16,
        fields.get(5) as u16,
    )
}
