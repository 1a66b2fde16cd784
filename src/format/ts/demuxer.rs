use std::collections::{BTreeMap, HashMap};

use bytes::{Bytes, BytesMut};
use log::{debug, trace, warn};

use super::clock::continuity_loss;
use super::packet::TSPacket;
use super::pat::PAT;
use super::pes::PESPacket;
use super::pmt::PMT;
use super::types::{StreamType, PID_PAT, TABLE_ID_PAT, TABLE_ID_PMT};
use crate::config::DemuxerConfig;
use crate::error::Result;
use crate::utils::BitReader;

/// A completed PES unit as reassembled from the TS packets of one PID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PESUnit {
    /// PID the unit was carried on
    pub pid: u16,
    /// The unit, starting at its PES start code
    pub data: Bytes,
}

/// What is known about a PMT PID announced by the PAT.
#[derive(Debug, Clone)]
enum ProgramState {
    /// Announced by the PAT, PMT not parsed yet.
    Unresolved,
    Resolved(PMT),
}

/// Reassembly state of one elementary stream PID.
#[derive(Debug)]
struct StreamState {
    data: BytesMut,
    last_continuity_counter: u8,
}

/// MPEG Transport Stream demuxer.
///
/// Fed one aligned 188 byte packet per [`read`](Self::read) call (usually
/// from a [`TSPacketizer`](super::TSPacketizer) callback), it:
/// - learns the programs from the PAT and the elementary streams from each PMT
/// - checks the continuity counter of every elementary stream packet
/// - reassembles PES units per PID
///
/// A PES unit is complete once the next unit on the same PID starts. It is
/// then pending until the following `read`, which discards it.
///
/// ```
/// use tsdemux::format::ts::{TSDemuxer, TSPacketizer};
///
/// let mut demuxer = TSDemuxer::new();
/// let mut units = Vec::new();
/// let mut packetizer = TSPacketizer::new(|packet: &[u8]| {
///     if demuxer.read(packet).is_ok() {
///         if let Some(unit) = demuxer.take_pes() {
///             units.push(unit);
///         }
///     }
/// });
/// packetizer.read(&[0x47, 0x1f, 0xff, 0x10]);
/// drop(packetizer);
/// assert!(units.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TSDemuxer {
    config: DemuxerConfig,
    pat: Option<PAT>,
    programs: BTreeMap<u16, ProgramState>,
    streams: HashMap<u16, StreamState>,
    pes: Option<PESUnit>,
    continuity_errors: u64,
    oversized_errors: u64,
}

impl TSDemuxer {
    /// Creates a demuxer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a demuxer with the given configuration.
    pub fn with_config(config: DemuxerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DemuxerConfig {
        &self.config
    }

    /// Processes one 188 byte packet.
    ///
    /// Any PES unit still pending from the previous call is dropped first.
    /// An error means this packet could not be decoded and was skipped; the
    /// demuxer stays usable for the next one.
    pub fn read(&mut self, data: &[u8]) -> Result<()> {
        self.pes = None;

        let packet = TSPacket::parse(data)?;
        if !packet.has_payload_field() {
            return Ok(());
        }

        if self.has_stream(packet.pid) {
            self.read_stream(&packet);
            Ok(())
        } else {
            self.read_psi(&packet)
        }
    }

    fn read_stream(&mut self, packet: &TSPacket<'_>) {
        let pid = packet.pid;

        if let Some(state) = self.streams.get_mut(&pid) {
            let expected = (state.last_continuity_counter + 1) % 16;
            if packet.continuity_counter != expected {
                warn!(
                    "PID {:#x}: continuity counter {} where {} was expected, {} packets lost, dropping {} buffered bytes",
                    pid,
                    packet.continuity_counter,
                    expected,
                    continuity_loss(expected, packet.continuity_counter),
                    state.data.len()
                );
                self.streams.remove(&pid);
                self.continuity_errors += 1;
                return;
            }
            state.last_continuity_counter = expected;
        }

        if packet.payload_unit_start_indicator {
            let state = StreamState {
                data: BytesMut::new(),
                last_continuity_counter: packet.continuity_counter,
            };
            if let Some(previous) = self.streams.insert(pid, state) {
                trace!("PID {:#x}: PES unit of {} bytes complete", pid, previous.data.len());
                self.pes = Some(PESUnit {
                    pid,
                    data: previous.data.freeze(),
                });
            }
        }

        let Some(state) = self.streams.get_mut(&pid) else {
            trace!("PID {:#x}: no PES unit started, skipping payload", pid);
            return;
        };

        if state.data.len() + packet.payload.len() > self.config.max_pes_size {
            warn!(
                "PID {:#x}: PES unit exceeds {} bytes, dropping it",
                pid, self.config.max_pes_size
            );
            self.streams.remove(&pid);
            self.oversized_errors += 1;
            return;
        }
        state.data.extend_from_slice(packet.payload);
    }

    fn read_psi(&mut self, packet: &TSPacket<'_>) -> Result<()> {
        let pid = packet.pid;
        let table_id = if pid == PID_PAT {
            TABLE_ID_PAT
        } else if let Some(ProgramState::Unresolved) = self.programs.get(&pid) {
            TABLE_ID_PMT
        } else {
            return Ok(());
        };

        if !packet.payload_unit_start_indicator {
            trace!("PID {:#x}: ignoring packet without a section start", pid);
            return Ok(());
        }

        let mut reader = BitReader::new(packet.payload);
        let pointer_field = reader.read_u8()?;
        reader.skip(pointer_field as usize)?;

        if let Some(&found) = reader.remaining_data().first() {
            if found != table_id {
                debug!(
                    "PID {:#x}: skipping section with table_id {:#04x}, expected {:#04x}",
                    pid, found, table_id
                );
                return Ok(());
            }
        }

        if table_id == TABLE_ID_PAT {
            let pat = PAT::parse_from(&mut reader)?;
            for program_pid in pat.program_pids() {
                if !self.programs.contains_key(&program_pid) {
                    debug!("PAT announces program on PID {:#x}", program_pid);
                    self.programs.insert(program_pid, ProgramState::Unresolved);
                }
            }
            self.pat = Some(pat);
        } else {
            let pmt = PMT::parse_from(&mut reader)?;
            for stream in &pmt.streams {
                debug!(
                    "PMT on PID {:#x}: stream on PID {:#x} is {}",
                    pid, stream.pid, stream.stream_type
                );
            }
            self.programs.insert(pid, ProgramState::Resolved(pmt));
        }

        Ok(())
    }

    /// True when a completed PES unit is waiting to be read.
    pub fn has_pes(&self) -> bool {
        self.pes.is_some()
    }

    /// Bytes of the pending PES unit.
    ///
    /// # Panics
    ///
    /// Panics unless [`has_pes`](Self::has_pes) is true.
    pub fn pes_data(&self) -> &[u8] {
        match &self.pes {
            Some(unit) => &unit.data,
            None => panic!("pes_data called without a pending PES unit"),
        }
    }

    /// PID of the pending PES unit.
    ///
    /// # Panics
    ///
    /// Panics unless [`has_pes`](Self::has_pes) is true.
    pub fn pes_pid(&self) -> u16 {
        match &self.pes {
            Some(unit) => unit.pid,
            None => panic!("pes_pid called without a pending PES unit"),
        }
    }

    /// Hands the pending PES unit over to the caller.
    pub fn take_pes(&mut self) -> Option<PESUnit> {
        self.pes.take()
    }

    /// Decodes the pending PES unit, honoring
    /// [`strict_pes_length`](DemuxerConfig::strict_pes_length).
    pub fn decode_pes(&self) -> Option<Result<PESPacket<'_>>> {
        self.pes
            .as_ref()
            .map(|unit| PESPacket::parse_with(&unit.data, self.config.strict_pes_length))
    }

    /// True when a parsed PMT lists `pid` as an elementary stream.
    pub fn has_stream(&self, pid: u16) -> bool {
        self.stream_type(pid).is_some()
    }

    /// Stream type of `pid` as announced by a parsed PMT.
    pub fn stream_type(&self, pid: u16) -> Option<StreamType> {
        self.programs()
            .find_map(|pmt| pmt.stream(pid))
            .map(|stream| stream.stream_type)
    }

    /// Number of PES units dropped because of a continuity counter jump.
    pub fn continuity_errors(&self) -> u64 {
        self.continuity_errors
    }

    /// Number of PES units dropped for growing past `max_pes_size`.
    pub fn oversized_errors(&self) -> u64 {
        self.oversized_errors
    }

    /// The last PAT seen.
    pub fn pat(&self) -> Option<&PAT> {
        self.pat.as_ref()
    }

    /// The PMT carried on `pmt_pid`, once parsed.
    pub fn program(&self, pmt_pid: u16) -> Option<&PMT> {
        match self.programs.get(&pmt_pid) {
            Some(ProgramState::Resolved(pmt)) => Some(pmt),
            _ => None,
        }
    }

    /// All parsed PMTs, ordered by PMT PID.
    pub fn programs(&self) -> impl Iterator<Item = &PMT> + '_ {
        self.programs.values().filter_map(|state| match state {
            ProgramState::Resolved(pmt) => Some(pmt),
            ProgramState::Unresolved => None,
        })
    }

    /// Forgets all tables, partial units and the pending unit, for seeking
    /// or restarting a stream. Error counters are kept.
    pub fn reset(&mut self) {
        self.pat = None;
        self.programs.clear();
        self.streams.clear();
        self.pes = None;
    }
}
