#[cfg(test)]
mod tests {
    use bytes::{BufMut, BytesMut};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tsdemux::format::ts::{
        PESPacket, PESUnit, StreamType, TSDemuxer, TSPacket, TSPacketizer, TS_PACKET_SIZE,
    };
    use tsdemux::DemuxerConfig;

    const PMT_PID: u16 = 0x1000;
    const VIDEO_PID: u16 = 0x100;
    const AUDIO_PID: u16 = 0x101;
    const UNIT_COUNT: usize = 20;

    /// Writes TS packets with per-PID continuity counters.
    #[derive(Default)]
    struct StreamBuilder {
        packets: Vec<Vec<u8>>,
        counters: HashMap<u16, u8>,
    }

    impl StreamBuilder {
        fn next_counter(&mut self, pid: u16) -> u8 {
            let counter = self.counters.entry(pid).or_insert(0);
            let current = *counter;
            *counter = (current + 1) % 16;
            current
        }

        fn packet(&mut self, pid: u16, pusi: bool, adaptation: Option<&[u8]>, payload: &[u8]) {
            let counter = self.next_counter(pid);
            let adaptation_field_control: u8 = if adaptation.is_some() { 3 } else { 1 };

            let mut buf = BytesMut::with_capacity(TS_PACKET_SIZE);
            buf.put_u8(0x47);
            buf.put_u16(((pusi as u16) << 14) | pid);
            buf.put_u8((adaptation_field_control << 4) | counter);
            if let Some(body) = adaptation {
                let field_size = 184 - payload.len();
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
            self.packets.push(buf.to_vec());
        }

        fn psi(&mut self, pid: u16, section: &[u8]) {
            let mut payload = vec![0x00];
            payload.extend_from_slice(section);
            self.packet(pid, true, None, &payload);
        }

        /// Splits `unit` over packets; the first one carries a PCR when given.
        fn pes(&mut self, pid: u16, unit: &[u8], pcr: Option<u64>) {
            let mut rest = unit;
            let mut first = true;
            while !rest.is_empty() {
                let pcr_field = if first { pcr.map(pcr_field) } else { None };
                let room = 184 - pcr_field.as_ref().map_or(0, |field| field.len() + 1);
                let (chunk, tail) = rest.split_at(rest.len().min(room));
                let adaptation = match &pcr_field {
                    Some(field) => Some(field.as_slice()),
                    None if chunk.len() < 184 => Some(&[][..]),
                    None => None,
                };
                self.packet(pid, first, adaptation, chunk);
                rest = tail;
                first = false;
            }
        }

        fn null(&mut self) {
            self.packet(0x1FFF, false, None, &[0xFF; 184]);
        }

        fn bytes(&self) -> Vec<u8> {
            self.packets.concat()
        }
    }

    /// Adaptation field body with the random access and PCR flags set.
    fn pcr_field(pcr: u64) -> Vec<u8> {
        let base = pcr / 300;
        let ext = pcr % 300;
        vec![
            0x50,
            (base >> 25) as u8,
            (base >> 17) as u8,
            (base >> 9) as u8,
            (base >> 1) as u8,
            (((base & 1) << 7) as u8) | 0x7E | ((ext >> 8) & 1) as u8,
            ext as u8,
        ]
    }

    fn pat_section() -> Vec<u8> {
        let mut buf = BytesMut::new();
        buf.put_slice(&[0x00, 0xB0, 0x11, 0x00, 0x01, 0xC1, 0x00, 0x00]);
        buf.put_u16(0x0000);
        buf.put_u16(0xE010); // network PID
        buf.put_u16(0x0001);
        buf.put_u16(0xE000 | PMT_PID);
        buf.put_u32(0);
        buf.to_vec()
    }

    fn pmt_section() -> Vec<u8> {
        let mut buf = BytesMut::new();
        buf.put_slice(&[0x02, 0xB0, 0x17, 0x00, 0x01, 0xC1, 0x00, 0x00]);
        buf.put_u16(0xE000 | VIDEO_PID);
        buf.put_u16(0xF000);
        buf.put_u8(0x1B);
        buf.put_u16(0xE000 | VIDEO_PID);
        buf.put_u16(0xF000);
        buf.put_u8(0x0F);
        buf.put_u16(0xE000 | AUDIO_PID);
        buf.put_u16(0xF000);
        buf.put_u32(0);
        buf.to_vec()
    }

    /// PES unit carrying a PTS only.
    fn pes_unit(stream_id: u8, pts: u64, payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        buf.put_slice(&[0x00, 0x00, 0x01, stream_id]);
        buf.put_u16((8 + payload.len()) as u16);
        buf.put_slice(&[0x80, 0x80, 0x05]);
        buf.put_u8(0x21 | ((pts >> 29) & 0x0E) as u8);
        buf.put_u16((((pts >> 14) & 0xFFFE) | 0x01) as u16);
        buf.put_u16((((pts << 1) & 0xFFFE) | 0x01) as u16);
        buf.put_slice(payload);
        buf.to_vec()
    }

    /// Alternating video and audio units with varying sizes.
    fn units() -> Vec<PESUnit> {
        (0..UNIT_COUNT)
            .map(|i| {
                let pts = i as u64 * 1800;
                if i % 2 == 0 {
                    let payload = vec![i as u8; 300 + (i * 137) % 900];
                    PESUnit {
                        pid: VIDEO_PID,
                        data: pes_unit(0xE0, pts, &payload).into(),
                    }
                } else {
                    let payload = vec![i as u8; 50 + i * 11];
                    PESUnit {
                        pid: AUDIO_PID,
                        data: pes_unit(0xC0, pts, &payload).into(),
                    }
                }
            })
            .collect()
    }

    fn build_stream(units: &[PESUnit]) -> StreamBuilder {
        let mut builder = StreamBuilder::default();
        builder.psi(0x0000, &pat_section());
        builder.psi(PMT_PID, &pmt_section());
        for (i, unit) in units.iter().enumerate() {
            let pcr = (unit.pid == VIDEO_PID).then(|| i as u64 * 1800 * 300);
            builder.pes(unit.pid, &unit.data, pcr);
            if i % 3 == 0 {
                builder.null();
            }
        }
        // Starting one more unit per PID completes the last real ones
        builder.pes(VIDEO_PID, &pes_unit(0xE0, 0, &[]), None);
        builder.pes(AUDIO_PID, &pes_unit(0xC0, 0, &[]), None);
        builder
    }

    fn demux(config: DemuxerConfig, data: &[u8], chunk_sizes: &[usize]) -> (Vec<PESUnit>, TSDemuxer) {
        let mut demuxer = TSDemuxer::with_config(config);
        let mut units = Vec::new();
        {
            let mut packetizer = TSPacketizer::new(|packet: &[u8]| {
                demuxer.read(packet).unwrap();
                if let Some(unit) = demuxer.take_pes() {
                    units.push(unit);
                }
            });
            let mut sizes = chunk_sizes.iter().cycle();
            let mut offset = 0;
            while offset < data.len() {
                let size = sizes.next().map_or(TS_PACKET_SIZE, |&s| s).min(data.len() - offset);
                packetizer.read(&data[offset..offset + size]);
                offset += size;
            }
        }
        (units, demuxer)
    }

    #[test]
    fn test_demux_synthetic_stream() {
        let expected = units();
        let data = build_stream(&expected).bytes();

        let (units, demuxer) = demux(DemuxerConfig::default(), &data, &[1, 7, 188, 500, 33, 2000]);
        assert_eq!(units, expected);
        assert_eq!(demuxer.continuity_errors(), 0);
        assert_eq!(demuxer.oversized_errors(), 0);
        assert_eq!(demuxer.stream_type(VIDEO_PID), Some(StreamType::AVC_VIDEO));
        assert_eq!(demuxer.stream_type(AUDIO_PID), Some(StreamType::ADTS_AUDIO));

        for (i, unit) in units.iter().enumerate() {
            let pes = PESPacket::parse(&unit.data).unwrap();
            assert_eq!(pes.pts(), Some(i as u64 * 1800));
            assert!(pes.payload.iter().all(|&b| b == i as u8));
        }
    }

    #[test]
    fn test_pcr_on_first_video_packet() {
        let builder = build_stream(&units());
        let packet = builder
            .packets
            .iter()
            .map(|data| TSPacket::parse(data).unwrap())
            .find(|packet| packet.pid == VIDEO_PID && packet.payload_unit_start_indicator)
            .unwrap();

        let field = packet.adaptation_field.unwrap();
        assert!(field.random_access_indicator());
        assert_eq!(field.pcr(), Some(0));
        assert_eq!(&packet.payload[..4], &[0x00, 0x00, 0x01, 0xE0]);
    }

    #[test]
    fn test_chunk_size_does_not_matter() {
        let expected = units();
        let data = build_stream(&expected).bytes();

        for sizes in [&[data.len()][..], &[1], &[187], &[189, 3], &[4096]] {
            let (units, demuxer) = demux(DemuxerConfig::default(), &data, sizes);
            assert_eq!(units, expected, "chunk sizes {:?}", sizes);
            assert_eq!(demuxer.continuity_errors(), 0);
        }
    }

    #[test]
    fn test_leading_garbage() {
        let expected = units();
        let mut data = vec![0x00; 1000];
        data.extend(build_stream(&expected).bytes());

        let (units, _) = demux(DemuxerConfig::default(), &data, &[2000]);
        assert_eq!(units, expected);
    }

    #[test]
    fn test_lost_packet_drops_in_flight_units() {
        let expected = units();
        let mut builder = build_stream(&expected);

        // The first video unit spans several packets; lose its second one
        let lost = builder
            .packets
            .iter()
            .position(|data| {
                let packet = TSPacket::parse(data).unwrap();
                packet.pid == VIDEO_PID && !packet.payload_unit_start_indicator
            })
            .unwrap();
        builder.packets.remove(lost);

        let (units, demuxer) = demux(DemuxerConfig::default(), &builder.bytes(), &[512]);
        assert_eq!(demuxer.continuity_errors(), 1);

        // The jump is only noticed on the start of the next video unit, so
        // that unit goes too; the one after it starts a fresh buffer.
        let survivors: Vec<PESUnit> = expected
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != 0 && *i != 2)
            .map(|(_, unit)| unit)
            .collect();
        assert_eq!(units, survivors);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = DemuxerConfig::from_lookup(|key: &str| match key {
            "TSDEMUX_MAX_PES_SIZE" => Some("400".to_string()),
            _ => None,
        })
        .unwrap();

        let expected = units();
        let data = build_stream(&expected).bytes();
        let (units, demuxer) = demux(config, &data, &[4096]);

        let small: Vec<PESUnit> = expected.into_iter().filter(|u| u.data.len() <= 400).collect();
        assert!(demuxer.oversized_errors() > 0);
        assert_eq!(units, small);
    }

    /// Replays a recorded stream. Place it at tests/data/test.ts to run.
    #[test]
    #[ignore]
    fn test_demux_fixture() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/test.ts");
        let data = std::fs::read(&path).unwrap();

        let (units, demuxer) = demux(DemuxerConfig::default(), &data, &[4096]);
        assert_eq!(units.len(), 198);
        assert_eq!(demuxer.continuity_errors(), 0);

        let mut expected_pids = vec![256; 12];
        expected_pids.push(257);
        expected_pids.extend([256; 5]);
        expected_pids.push(257);
        expected_pids.extend([256; 5]);
        let pids: Vec<u16> = units.iter().take(24).map(|unit| unit.pid).collect();
        assert_eq!(pids, expected_pids);
    }
}
