//! Manufacturer segment and message record extraction.
//!
//! Raw advertisement bytes are a sequence of AD structures, each
//! `[length][type][payload...]`. The extractors here pull out the payloads
//! of vendor-specific structures carrying the target company identifier,
//! then decode each payload into message records: either one legacy
//! whole-segment message (first byte `0x01`) or a run of
//! `[type][length][data]` triples.
//!
//! Input is untrusted and frequently corrupted. Extraction never fails the
//! caller: a unit that cannot be bounded is dropped and counted, and
//! everything decoded before it is kept.

use tracing::trace;

/// AD type byte marking a manufacturer-specific data structure.
pub const MANUFACTURER_DATA_TYPE: u8 = 0xFF;

/// Company identifier of the target vendor (Apple).
pub const APPLE_COMPANY_ID: u16 = 0x004C;

/// First byte of a legacy-format segment: the whole segment is one message.
pub const LEGACY_MESSAGE_MARKER: u8 = 0x01;

const COMPANY_ID_LE: [u8; 2] = APPLE_COMPANY_ID.to_le_bytes();

/// AD type byte followed by the little-endian company identifier.
const SEGMENT_MARKER: [u8; 3] = [MANUFACTURER_DATA_TYPE, COMPANY_ID_LE[0], COMPANY_ID_LE[1]];

/// Units decoded from one extraction pass, plus how many were dropped.
///
/// Decode failure is a data value here, not an error path: the pipeline
/// keeps whatever bounded cleanly and counts the rest.
#[derive(Debug, Default)]
pub struct Extraction<'a> {
    /// Decoded units, in the order found.
    pub units: Vec<&'a [u8]>,
    /// Units discarded because a length field overran the input or a header
    /// byte was missing.
    pub skipped: usize,
}

/// Find every vendor-specific data segment in a raw advertisement buffer.
///
/// Scans byte offsets for the marker `FF 4C 00` and reads the AD length
/// byte preceding each hit; the length counts the type byte, the two
/// company-id bytes, and the payload, so the segment is the `length - 3`
/// bytes following the marker. A hit at offset zero (no length byte) or a
/// length that overruns the buffer drops that hit only.
///
/// The scan advances one byte at a time and deliberately does not jump past
/// a consumed segment, so a marker recurring inside payload bytes is
/// detected again and can yield overlapping segments. Downstream consumers
/// depend on this exact behavior; see the regression tests before touching
/// the loop.
#[must_use]
pub fn extract_manufacturer_data(raw: &[u8]) -> Extraction<'_> {
    let mut out = Extraction::default();
    if raw.len() < SEGMENT_MARKER.len() {
        return out;
    }
    for i in 0..=raw.len() - SEGMENT_MARKER.len() {
        if raw[i..i + SEGMENT_MARKER.len()] != SEGMENT_MARKER {
            continue;
        }
        let Some(declared) = i.checked_sub(1).map(|at| raw[at] as usize) else {
            trace!(offset = i, "marker at buffer start has no length byte");
            out.skipped += 1;
            continue;
        };
        let Some(payload_len) = declared.checked_sub(SEGMENT_MARKER.len()) else {
            trace!(offset = i, declared, "declared length shorter than marker");
            out.skipped += 1;
            continue;
        };
        let payload_start = i + SEGMENT_MARKER.len();
        match raw.get(payload_start..payload_start + payload_len) {
            Some(segment) => out.units.push(segment),
            None => {
                trace!(offset = i, declared, "declared length overruns buffer");
                out.skipped += 1;
            }
        }
    }
    out
}

/// Decode message records out of manufacturer segments.
///
/// Each segment is handled independently; one malformed segment never
/// affects the others. A segment starting with [`LEGACY_MESSAGE_MARKER`] is
/// one whole message. Any other segment is walked as `[type][length][data]`
/// records; the walk stops when fewer than two bytes remain for a header or
/// a record's declared length overruns the segment, keeping the records
/// decoded so far and dropping the remainder.
#[must_use]
pub fn extract_message_data<'a>(segments: &[&'a [u8]]) -> Extraction<'a> {
    let mut out = Extraction::default();
    for &segment in segments {
        if segment.first() == Some(&LEGACY_MESSAGE_MARKER) {
            out.units.push(segment);
            continue;
        }
        let mut i = 0;
        while i + 1 < segment.len() {
            let record_len = segment[i + 1] as usize + 2;
            match segment.get(i..i + record_len) {
                Some(message) => {
                    out.units.push(message);
                    i += record_len;
                }
                None => {
                    trace!(offset = i, record_len, "record overruns segment");
                    out.skipped += 1;
                    break;
                }
            }
        }
    }
    out
}
