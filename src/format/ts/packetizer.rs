use super::types::{SYNC_BYTE, TS_PACKET_SIZE};
use log::{debug, trace};

/// Turns a byte stream cut at arbitrary places into aligned 188 byte
/// transport stream packets.
///
/// Every packet handed to the callback starts with the sync byte. A window
/// of data counts as aligned when the sync byte appears at its start and at
/// the start of every further complete packet in it. Bytes that cannot be
/// aligned are dropped; a trailing partial packet is kept until the next
/// [`read`](Self::read) completes it.
///
/// ```
/// use tsdemux::format::ts::{TSPacketizer, TS_PACKET_SIZE};
///
/// let mut stream = vec![0u8; TS_PACKET_SIZE * 2];
/// stream[0] = 0x47;
/// stream[TS_PACKET_SIZE] = 0x47;
///
/// let mut packets = 0;
/// let mut packetizer = TSPacketizer::new(|packet: &[u8]| {
///     assert_eq!(packet.len(), TS_PACKET_SIZE);
///     packets += 1;
/// });
/// packetizer.read(&stream[..100]);
/// packetizer.read(&stream[100..]);
/// assert_eq!(packetizer.buffered(), 0);
/// drop(packetizer);
/// assert_eq!(packets, 2);
/// ```
pub struct TSPacketizer<F>
where
    F: FnMut(&[u8]),
{
    incomplete: Vec<u8>,
    on_packet: F,
}

impl<F> TSPacketizer<F>
where
    F: FnMut(&[u8]),
{
    /// Creates a packetizer delivering each complete packet to `on_packet`.
    ///
    /// The slice passed to the callback is only valid for the duration of
    /// the call.
    pub fn new(on_packet: F) -> Self {
        Self {
            incomplete: Vec::with_capacity(TS_PACKET_SIZE),
            on_packet,
        }
    }

    /// Drops any buffered partial packet.
    pub fn reset(&mut self) {
        self.incomplete.clear();
    }

    /// Number of bytes held back waiting for the rest of their packet.
    pub fn buffered(&self) -> usize {
        self.incomplete.len()
    }

    /// Consumes the next chunk of the stream.
    pub fn read(&mut self, data: &[u8]) {
        debug_assert!(!data.is_empty(), "read called with an empty chunk");
        if data.is_empty() {
            return;
        }

        let mut window = data;
        if !self.incomplete.is_empty() {
            window = match self.complete_incomplete(window) {
                Some(rest) => rest,
                None => return,
            };
        }

        let window = match sync(window) {
            Some(window) => window,
            None => {
                debug!("no sync point found, dropping {} bytes", window.len());
                return;
            }
        };

        let mut packets = window.chunks_exact(TS_PACKET_SIZE);
        for packet in &mut packets {
            (self.on_packet)(packet);
        }

        let partial = packets.remainder();
        if partial.first() == Some(&SYNC_BYTE) {
            self.incomplete.extend_from_slice(partial);
        } else if !partial.is_empty() {
            debug!("dropping {} byte partial packet without sync byte", partial.len());
        }
    }

    /// Tries to finish the buffered partial packet with the head of `data`.
    ///
    /// Returns the unconsumed rest of `data` if anything is left to process.
    fn complete_incomplete<'d>(&mut self, data: &'d [u8]) -> Option<&'d [u8]> {
        let missing = TS_PACKET_SIZE - self.incomplete.len();

        if data.len() < missing {
            self.incomplete.extend_from_slice(data);
            return None;
        }

        let (head, rest) = data.split_at(missing);
        if rest.is_empty() || in_sync(rest) {
            self.incomplete.extend_from_slice(head);
            (self.on_packet)(&self.incomplete);
            self.incomplete.clear();
            return if rest.is_empty() { None } else { Some(rest) };
        }

        // The next sync byte is not where the buffered bytes say it should
        // be, so they cannot be trusted.
        debug!(
            "lost sync completing a partial packet, dropping {} buffered bytes",
            self.incomplete.len()
        );
        self.incomplete.clear();
        Some(data)
    }
}

fn sync_at(data: &[u8], offset: usize) -> bool {
    data.get(offset) == Some(&SYNC_BYTE)
}

/// True when the sync byte starts `data` and every further complete packet.
fn in_sync(data: &[u8]) -> bool {
    if !sync_at(data, 0) {
        return false;
    }
    let packets = data.len() / TS_PACKET_SIZE;
    (1..packets).all(|i| sync_at(data, i * TS_PACKET_SIZE))
}

/// Finds the first offset at which `data` is in sync.
///
/// Only offsets leaving at least one full packet are candidates, so a
/// misaligned window shorter than a packet is dropped.
fn sync(data: &[u8]) -> Option<&[u8]> {
    if in_sync(data) {
        return Some(data);
    }
    if data.len() < TS_PACKET_SIZE {
        return None;
    }

    let max_offset = data.len() - TS_PACKET_SIZE;
    let offset = (1..=max_offset).find(|&offset| in_sync(&data[offset..]))?;
    trace!("resynchronized at offset {}", offset);
    Some(&data[offset..])
}
