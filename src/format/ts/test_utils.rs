//! Builders for synthetic transport stream data used by the unit tests.

use super::types::{SYNC_BYTE, TS_PACKET_SIZE};
use bytes::{BufMut, BytesMut};

/// 5 byte PTS/DTS layout: 4 marker bits, then 3/15/15 bit chunks each
/// followed by a marker bit.
pub fn encode_timestamp(marker: u8, ts: u64) -> [u8; 5] {
    let mut buf = BytesMut::with_capacity(5);
    buf.put_u8(marker | ((ts >> 29) & 0x0E) as u8 | 0x01);
    buf.put_u16((((ts >> 14) & 0xFFFE) | 0x01) as u16);
    buf.put_u16((((ts << 1) & 0xFFFE) | 0x01) as u16);
    let mut out = [0u8; 5];
    out.copy_from_slice(&buf);
    out
}

/// 6 byte PCR layout: 33 bit base, 6 reserved bits, 9 bit extension.
pub fn encode_pcr(pcr: u64) -> [u8; 6] {
    let base = pcr / 300;
    let ext = pcr % 300;
    [
        (base >> 25) as u8,
        (base >> 17) as u8,
        (base >> 9) as u8,
        (base >> 1) as u8,
        (((base & 1) << 7) as u8) | 0x7E | ((ext >> 8) & 1) as u8,
        ext as u8,
    ]
}

/// A full 188 byte packet.
///
/// With an adaptation field body (flags and optional fields, without the
/// length byte) the field is stuffed so that `payload` ends the packet.
/// Without one, the payload is padded with 0xFF.
pub fn ts_packet(
    pid: u16,
    pusi: bool,
    continuity_counter: u8,
    adaptation: Option<&[u8]>,
    payload: &[u8],
) -> Vec<u8> {
    assert!(payload.len() <= 184);
    let adaptation_field_control = match (adaptation.is_some(), payload.is_empty()) {
        (false, _) => 0x1,
        (true, true) => 0x2,
        (true, false) => 0x3,
    };

    let mut buf = BytesMut::with_capacity(TS_PACKET_SIZE);
    buf.put_u8(SYNC_BYTE);
    buf.put_u16(((pusi as u16) << 14) | (pid & 0x1FFF));
    buf.put_u8((adaptation_field_control << 4) | (continuity_counter & 0x0F));

    if let Some(body) = adaptation {
        let field_size = 184 - payload.len();
        assert!(field_size > body.len(), "adaptation field does not fit");
        buf.put_u8((field_size - 1) as u8);
        if field_size > 1 {
            if body.is_empty() {
                buf.put_u8(0x00);
            } else {
                buf.put_slice(body);
            }
        }
        while buf.len() < TS_PACKET_SIZE - payload.len() {
            buf.put_u8(0xFF);
        }
    }

    buf.put_slice(payload);
    while buf.len() < TS_PACKET_SIZE {
        buf.put_u8(0xFF);
    }
    buf.to_vec()
}

/// Splits a PES unit over as many packets as needed, PUSI on the first.
/// The last packet is filled with adaptation field stuffing.
pub fn pes_packets(pid: u16, first_counter: u8, unit: &[u8]) -> Vec<Vec<u8>> {
    unit.chunks(184)
        .enumerate()
        .map(|(i, chunk)| {
            let counter = (first_counter as usize + i) as u8 % 16;
            let adaptation: Option<&[u8]> = if chunk.len() < 184 { Some(&[]) } else { None };
            ts_packet(pid, i == 0, counter, adaptation, chunk)
        })
        .collect()
}

/// A PSI section in a single packet, behind a zero pointer field.
pub fn psi_packet(pid: u16, continuity_counter: u8, section: &[u8]) -> Vec<u8> {
    let mut payload = vec![0x00];
    payload.extend_from_slice(section);
    ts_packet(pid, true, continuity_counter, None, &payload)
}

pub fn pat_section(transport_stream_id: u16, programs: &[(u16, u16)]) -> Vec<u8> {
    let section_length = 5 + 4 * programs.len() + 4;
    let mut buf = BytesMut::new();
    buf.put_u8(0x00);
    buf.put_u16(0xB000 | section_length as u16);
    buf.put_u16(transport_stream_id);
    buf.put_u8(0xC1);
    buf.put_u8(0x00);
    buf.put_u8(0x00);
    for &(program_number, pid) in programs {
        buf.put_u16(program_number);
        buf.put_u16(0xE000 | pid);
    }
    buf.put_u32(0xDEADBEEF);
    buf.to_vec()
}

/// PMT section with `(stream_type, pid, es_info)` entries.
pub fn pmt_section(
    program_number: u16,
    pcr_pid: u16,
    program_info: &[u8],
    streams: &[(u8, u16, &[u8])],
) -> Vec<u8> {
    let entries: usize = streams.iter().map(|(_, _, info)| 5 + info.len()).sum();
    let section_length = 9 + program_info.len() + entries + 4;

    let mut buf = BytesMut::new();
    buf.put_u8(0x02);
    buf.put_u16(0xB000 | section_length as u16);
    buf.put_u16(program_number);
    buf.put_u8(0xC1);
    buf.put_u8(0x00);
    buf.put_u8(0x00);
    buf.put_u16(0xE000 | pcr_pid);
    buf.put_u16(0xF000 | program_info.len() as u16);
    buf.put_slice(program_info);
    for &(stream_type, pid, info) in streams {
        buf.put_u8(stream_type);
        buf.put_u16(0xE000 | pid);
        buf.put_u16(0xF000 | info.len() as u16);
        buf.put_slice(info);
    }
    buf.put_u32(0x12345678);
    buf.to_vec()
}

/// A PES unit with an optional header carrying PTS and optionally DTS.
pub fn pes_unit(stream_id: u8, pts: u64, dts: Option<u64>, payload: &[u8]) -> Vec<u8> {
    let header_data_length = if dts.is_some() { 10 } else { 5 };
    let packet_length = 3 + header_data_length + payload.len();

    let mut buf = BytesMut::new();
    buf.put_slice(&[0x00, 0x00, 0x01, stream_id]);
    buf.put_u16(if packet_length > 0xFFFF { 0 } else { packet_length as u16 });
    buf.put_u8(0x80);
    buf.put_u8(if dts.is_some() { 0xC0 } else { 0x80 });
    buf.put_u8(header_data_length as u8);
    match dts {
        Some(dts) => {
            buf.put_slice(&encode_timestamp(0x30, pts));
            buf.put_slice(&encode_timestamp(0x10, dts));
        }
        None => buf.put_slice(&encode_timestamp(0x20, pts)),
    }
    buf.put_slice(payload);
    buf.to_vec()
}
