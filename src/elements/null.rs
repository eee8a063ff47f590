//! NullSink: discards all packets.

use crate::element::{PacketSink, PadId};
use crate::error::Result;
use crate::packet::{Packet, SidePacket};

/// A sink that discards everything it receives.
///
/// Useful for benchmarking a source and for draining a stage without
/// side effects. Only counts are kept.
#[derive(Debug, Default)]
pub struct NullSink {
    name: String,
    count: u64,
    side_count: u64,
}

impl NullSink {
    /// Create a new NullSink.
    pub fn new() -> Self {
        Self {
            name: "nullsink".to_string(),
            count: 0,
            side_count: 0,
        }
    }

    /// Create a NullSink with a custom name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            side_count: 0,
        }
    }

    /// Get the number of timed packets discarded.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Get the number of side packets discarded.
    pub fn side_count(&self) -> u64 {
        self.side_count
    }
}

impl PacketSink for NullSink {
    fn consume(&mut self, _pad: PadId, _packet: Packet) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn consume_side(&mut self, _side: SidePacket) -> Result<()> {
        self.side_count += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;

    #[test]
    fn test_nullsink_counts() {
        let mut sink = NullSink::new();
        sink.consume(PadId::new(0), Packet::new(&b"a"[..], ClockTime::ZERO))
            .unwrap();
        sink.consume(PadId::new(1), Packet::new(&b"b"[..], ClockTime::ZERO))
            .unwrap();
        assert_eq!(sink.count(), 2);
        assert_eq!(sink.side_count(), 0);
    }
}
