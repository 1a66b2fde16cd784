use std::fmt;

/// Size of every transport stream packet
pub const TS_PACKET_SIZE: usize = 188;
/// First byte of every packet
pub const SYNC_BYTE: u8 = 0x47;
/// Size of the CRC_32 closing a PSI section
pub const CRC_SIZE: usize = 4;

/// PID carrying the Program Association Table
pub const PID_PAT: u16 = 0x0000;
/// PID of null (stuffing) packets
pub const PID_NULL: u16 = 0x1FFF;

/// table_id of a program_association_section
pub const TABLE_ID_PAT: u8 = 0x00;
/// table_id of a TS_program_map_section
pub const TABLE_ID_PMT: u8 = 0x02;

// Stream IDs without the optional PES header
/// program_stream_map
pub const STREAM_ID_PROGRAM_STREAM_MAP: u8 = 0xbc;
/// padding_stream
pub const STREAM_ID_PADDING: u8 = 0xbe;
/// private_stream_2
pub const STREAM_ID_PRIVATE_STREAM_2: u8 = 0xbf;
/// ECM_stream
pub const STREAM_ID_ECM: u8 = 0xf0;
/// EMM_stream
pub const STREAM_ID_EMM: u8 = 0xf1;
/// DSMCC_stream
pub const STREAM_ID_DSMCC: u8 = 0xf2;
/// ITU-T Rec. H.222.1 type E stream
pub const STREAM_ID_H222_1_TYPE_E: u8 = 0xf8;
/// program_stream_directory
pub const STREAM_ID_PROGRAM_STREAM_DIRECTORY: u8 = 0xff;

/// First video stream id
pub const STREAM_ID_VIDEO_FIRST: u8 = 0xe0;
/// Last video stream id
pub const STREAM_ID_VIDEO_LAST: u8 = 0xef;

/// Elementary stream type code from a PMT stream entry (ISO/IEC 13818-1 table 2-34).
///
/// ```
/// use tsdemux::format::ts::StreamType;
///
/// assert_eq!(StreamType::AVC_VIDEO.description(), "AVC video stream");
/// assert_eq!(StreamType(0x0F).to_string(), "ISO/IEC 13818-7 Audio with ADTS transport syntax");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamType(pub u8);

macro_rules! stream_types {
    ($($value:literal => $name:ident, $description:literal;)*) => {
        impl StreamType {
            $(
                #[doc = $description]
                pub const $name: StreamType = StreamType($value);
            )*

            /// Human readable label for this stream type.
            pub fn description(&self) -> &'static str {
                match self.0 {
                    $($value => $description,)*
                    0x25..=0x7e => "ISO/IEC 13818-1 Reserved",
                    0x80..=0xff => "User Private",
                }
            }
        }
    };
}

stream_types! {
    0x00 => RESERVED, "Reserved";
    0x01 => VIDEO_11172_2, "ISO/IEC 11172-2 Video";
    0x02 => VIDEO_13818_2, "ISO/IEC 13818-2 Video";
    0x03 => AUDIO_11172_3, "ISO/IEC 11172-3 Audio";
    0x04 => AUDIO_13818_3, "ISO/IEC 13818-3 Audio";
    0x05 => PRIVATE_SECTIONS, "ISO/IEC 13818-1 private_sections";
    0x06 => PRIVATE_DATA, "ISO/IEC 13818-1 PES packets containing private data";
    0x07 => MHEG, "ISO/IEC 13522 MHEG";
    0x08 => DSMCC_ANNEX_A, "ISO/IEC 13818-1 Annex A DSM-CC";
    0x09 => H222_1, "Rec. ITU-T H.222.1";
    0x0a => DSMCC_TYPE_A, "ISO/IEC 13818-6 type A";
    0x0b => DSMCC_TYPE_B, "ISO/IEC 13818-6 type B";
    0x0c => DSMCC_TYPE_C, "ISO/IEC 13818-6 type C";
    0x0d => DSMCC_TYPE_D, "ISO/IEC 13818-6 type D";
    0x0e => AUXILIARY, "ISO/IEC 13818-1 auxiliary";
    0x0f => ADTS_AUDIO, "ISO/IEC 13818-7 Audio with ADTS transport syntax";
    0x10 => VISUAL_14496_2, "ISO/IEC 14496-2 Visual";
    0x11 => LATM_AUDIO, "ISO/IEC 14496-3 Audio with the LATM transport syntax";
    0x12 => SL_PES, "SL-packetized or FlexMux stream in PES packets";
    0x13 => SL_SECTIONS, "SL-packetized or FlexMux stream in ISO/IEC 14496 sections";
    0x14 => SYNCHRONIZED_DOWNLOAD, "ISO/IEC 13818-6 Synchronized Download Protocol";
    0x15 => METADATA_PES, "Metadata carried in PES packets";
    0x16 => METADATA_SECTIONS, "Metadata carried in metadata_sections";
    0x17 => METADATA_DATA_CAROUSEL, "Metadata carried in ISO/IEC 13818-6 Data Carousel";
    0x18 => METADATA_OBJECT_CAROUSEL, "Metadata carried in ISO/IEC 13818-6 Object Carousel";
    0x19 => METADATA_DOWNLOAD, "Metadata carried in ISO/IEC 13818-6 Synchronized Download Protocol";
    0x1a => IPMP_13818_11, "MPEG-2 IPMP stream";
    0x1b => AVC_VIDEO, "AVC video stream";
    0x1c => AUDIO_14496_3, "ISO/IEC 14496-3 Audio, without using any additional transport syntax";
    0x1d => TEXT_14496_17, "ISO/IEC 14496-17 Text";
    0x1e => AUXILIARY_VIDEO, "Auxiliary video stream as defined in ISO/IEC 23002-3";
    0x1f => SVC_VIDEO, "SVC video sub-bitstream of an AVC video stream";
    0x20 => MVC_VIDEO, "MVC video sub-bitstream of an AVC video stream";
    0x21 => JPEG_2000_VIDEO, "Video stream conforming to one or more profiles as defined in Rec. ITU-T T.800";
    0x22 => STEREOSCOPIC_VIDEO, "Video stream for service-compatible stereoscopic 3D services";
    0x23 => STEREOSCOPIC_AVC_VIDEO, "ISO/IEC 14496-10 video stream conforming to one or more profiles";
    0x24 => HEVC_VIDEO, "HEVC video stream";
    0x7f => IPMP, "IPMP stream";
}

impl StreamType {
    /// The raw stream_type code.
    pub fn code(&self) -> u8 {
        self.0
    }
}

impl From<u8> for StreamType {
    fn from(code: u8) -> Self {
        StreamType(code)
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
