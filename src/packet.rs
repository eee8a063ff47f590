//! Packet types carried between stages.

use crate::clock::ClockTime;
use crate::element::PadId;
use bytes::Bytes;

/// One per-step value emitted on an output pad.
///
/// A packet is an opaque byte payload tagged with the logical timestamp
/// of the step that produced it. Payloads are passed through unmodified;
/// cloning a packet is cheap (the payload is reference-counted).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    payload: Bytes,
    pts: ClockTime,
    sequence: u64,
}

impl Packet {
    /// Create a packet with the given payload and timestamp.
    pub fn new(payload: impl Into<Bytes>, pts: ClockTime) -> Self {
        Self {
            payload: payload.into(),
            pts,
            sequence: 0,
        }
    }

    /// Set the sequence number (the producing step index).
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Get the payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Take the payload.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Get the logical timestamp.
    pub fn pts(&self) -> ClockTime {
        self.pts
    }

    /// Get the sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Get the payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// A one-shot scalar emitted at open time, outside the timed stream.
///
/// Side packets carry per-sequence metadata (such as a record
/// identifier) that applies to the whole stream rather than to one step.
/// They are delivered at most once, before any timed packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidePacket {
    pad: PadId,
    value: Bytes,
}

impl SidePacket {
    /// Create a side packet for the given pad.
    pub fn new(pad: PadId, value: impl Into<Bytes>) -> Self {
        Self {
            pad,
            value: value.into(),
        }
    }

    /// Get the destination pad.
    pub fn pad(&self) -> PadId {
        self.pad
    }

    /// Get the scalar value.
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// View the value as UTF-8, if it is.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_passthrough() {
        let packet = Packet::new(&b"p0"[..], ClockTime::ZERO).with_sequence(7);
        assert_eq!(packet.as_bytes(), b"p0");
        assert_eq!(packet.pts(), ClockTime::ZERO);
        assert_eq!(packet.sequence(), 7);
        assert_eq!(packet.len(), 2);
        assert!(!packet.is_empty());
    }

    #[test]
    fn test_side_packet_str_view() {
        let side = SidePacket::new(PadId::new(2), Bytes::from_static(b"abc123"));
        assert_eq!(side.as_str(), Some("abc123"));
        assert_eq!(side.pad(), PadId::new(2));
    }
}
