use super::clock::{clock_reference, read_timestamp};
use crate::error::Result;
use crate::utils::BitReader;

/// Legal time window fields of the adaptation field extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalTimeWindow {
    /// ltw_valid_flag
    pub valid: bool,
    /// ltw_offset (15 bits)
    pub offset: u16,
}

/// Seamless splice fields of the adaptation field extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeamlessSplice {
    /// splice_type (4 bits)
    pub splice_type: u8,
    /// DTS of the next access unit, 90 kHz ticks.
    pub dts_next_au: u64,
}

/// The adaptation field extension. Each part is present when its flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdaptationExtension {
    /// Legal time window
    pub ltw: Option<LegalTimeWindow>,
    /// piecewise_rate (22 bits, 50 bytes/second units)
    pub piecewise_rate: Option<u32>,
    /// Seamless splice
    pub seamless_splice: Option<SeamlessSplice>,
}

/// The optional adaptation field of a TS packet.
///
/// A field with `length() == 0` carries nothing beyond its length byte; all
/// of its flags read as false and every optional value as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdaptationField<'a> {
    length: u8,
    discontinuity_indicator: bool,
    random_access_indicator: bool,
    es_priority_indicator: bool,
    pcr: Option<u64>,
    opcr: Option<u64>,
    splice_countdown: Option<i8>,
    private_data: Option<&'a [u8]>,
    extension: Option<AdaptationExtension>,
}

impl<'a> AdaptationField<'a> {
    /// Parses an adaptation field starting at its length byte.
    ///
    /// The reader is advanced past the whole field, stuffing bytes included.
    /// Any sub-field reaching past the declared length is an error.
    pub fn parse(reader: &mut BitReader<'a>) -> Result<Self> {
        let mut field = AdaptationField {
            length: reader.read_u8()?,
            ..Default::default()
        };
        if field.length == 0 {
            return Ok(field);
        }

        let mut body = reader.skip(field.length as usize)?;
        let flags = body.read_fields([1, 1, 1, 1, 1, 1, 1, 1])?;
        field.discontinuity_indicator = flags.flag(0);
        field.random_access_indicator = flags.flag(1);
        field.es_priority_indicator = flags.flag(2);

        if flags.flag(3) {
            field.pcr = Some(read_clock_reference(&mut body)?);
        }

        if flags.flag(4) {
            field.opcr = Some(read_clock_reference(&mut body)?);
        }

        if flags.flag(5) {
            field.splice_countdown = Some(body.read_u8()? as i8);
        }

        if flags.flag(6) {
            let length = body.read_u8()? as usize;
            field.private_data = Some(body.read_bytes(length)?);
        }

        if flags.flag(7) {
            let length = body.read_u8()? as usize;
            let mut extension = body.skip(length)?;
            field.extension = Some(parse_extension(&mut extension)?);
        }

        Ok(field)
    }

    /// adaptation_field_length, not counting the length byte itself.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// discontinuity_indicator
    pub fn discontinuity_indicator(&self) -> bool {
        self.discontinuity_indicator
    }

    /// random_access_indicator
    pub fn random_access_indicator(&self) -> bool {
        self.random_access_indicator
    }

    /// elementary_stream_priority_indicator
    pub fn es_priority_indicator(&self) -> bool {
        self.es_priority_indicator
    }

    /// Program clock reference in 27 MHz ticks.
    pub fn pcr(&self) -> Option<u64> {
        self.pcr
    }

    /// Original program clock reference in 27 MHz ticks.
    pub fn opcr(&self) -> Option<u64> {
        self.opcr
    }

    /// Packets left until the splicing point, negative once past it.
    pub fn splice_countdown(&self) -> Option<i8> {
        self.splice_countdown
    }

    /// Transport private data, borrowed from the packet.
    pub fn private_data(&self) -> Option<&'a [u8]> {
        self.private_data
    }

    /// The adaptation field extension.
    pub fn extension(&self) -> Option<&AdaptationExtension> {
        self.extension.as_ref()
    }
}

/// 33 bit base, 6 reserved bits, 9 bit extension.
fn read_clock_reference(reader: &mut BitReader<'_>) -> Result<u64> {
    let fields = reader.read_fields([33, 6, 9])?;
    Ok(clock_reference(fields.get(0), fields.get(2) as u16))
}

fn parse_extension(reader: &mut BitReader<'_>) -> Result<AdaptationExtension> {
    let flags = reader.read_fields([1, 1, 1, 5])?;
    let mut extension = AdaptationExtension::default();

    if flags.flag(0) {
        let fields = reader.read_fields([1, 15])?;
        extension.ltw = Some(LegalTimeWindow {
            valid: fields.flag(0),
            offset: fields.get(1) as u16,
        });
    }

    if flags.flag(1) {
        let fields = reader.read_fields([2, 22])?;
        extension.piecewise_rate = Some(fields.get(1) as u32);
    }

    if flags.flag(2) {
        let fields = reader.read_fields([4, 3, 1, 15, 1, 15, 1])?;
        extension.seamless_splice = Some(SeamlessSplice {
            splice_type: fields.get(0) as u8,
            dts_next_au: read_timestamp(
                fields.get(1) as u8,
                fields.get(3) as u16,
                fields.get(5) as u16,
            ),
        });
    }

    Ok(extension)
}
