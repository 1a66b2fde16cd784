use std::time::Duration;

/// PTS/DTS tick rate.
pub const PTS_HZ: u64 = 90_000;
/// PCR/OPCR/ESCR tick rate.
pub const PCR_HZ: u64 = 27_000_000;
/// 27 MHz ticks per 90 kHz tick.
pub const PCR_PER_PTS: u64 = PCR_HZ / PTS_HZ;

/// Joins the three chunks of a 33 bit timestamp as they are split on the
/// wire: bits 32..30, 29..15 and 14..0.
///
/// Used for PTS, DTS, ESCR base and DTS_next_AU.
///
/// ```
/// use tsdemux::format::ts::clock::read_timestamp;
///
/// assert_eq!(read_timestamp(1, 2, 3), 1073807363);
/// ```
pub fn read_timestamp(ts_32_30: u8, ts_29_15: u16, ts_14_0: u16) -> u64 {
    ((ts_32_30 as u64 & 0x7) << 30) | ((ts_29_15 as u64 & 0x7fff) << 15) | (ts_14_0 as u64 & 0x7fff)
}

/// Combines a 90 kHz base with its 27 MHz extension (PCR, OPCR, ESCR).
pub fn clock_reference(base: u64, extension: u16) -> u64 {
    base * PCR_PER_PTS + extension as u64
}

/// Number of packets missing between the `expected` and the `actual`
/// continuity counter, modulo 16.
pub fn continuity_loss(expected: u8, actual: u8) -> u8 {
    debug_assert!(expected < 16 && actual < 16);
    (actual + 16 - expected) % 16
}

/// Converts 90 kHz ticks to a duration.
pub fn pts_to_duration(pts: u64) -> Duration {
    Duration::from_nanos(((pts as u128 * 1_000_000_000) / PTS_HZ as u128) as u64)
}

/// Converts 27 MHz ticks to a duration.
pub fn pcr_to_duration(pcr: u64) -> Duration {
    Duration::from_nanos(((pcr as u128 * 1_000_000_000) / PCR_HZ as u128) as u64)
}
