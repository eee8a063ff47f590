//! CollectSink for extracting packets to application code.

use crate::element::{PacketSink, PadId};
use crate::error::Result;
use crate::packet::{Packet, SidePacket};
use std::collections::{HashMap, VecDeque};

/// A sink that queues packets per pad for the application to pull.
///
/// CollectSink is the host-side end of a stage's output channels: one
/// internal queue per pad, filled as the host drives the stage and
/// drained by application code. Stepping is cooperative and
/// single-threaded, so pulling never blocks; an empty queue just returns
/// `None`.
///
/// # Example
///
/// ```rust
/// use lockstep::element::{PacketSink, PadId};
/// use lockstep::elements::CollectSink;
/// use lockstep::packet::Packet;
/// use lockstep::clock::ClockTime;
///
/// let mut sink = CollectSink::new();
/// sink.consume(PadId::new(0), Packet::new(&b"p0"[..], ClockTime::ZERO)).unwrap();
///
/// let packet = sink.pull(PadId::new(0)).unwrap();
/// assert_eq!(packet.as_bytes(), b"p0");
/// assert!(sink.pull(PadId::new(0)).is_none());
/// ```
#[derive(Debug, Default)]
pub struct CollectSink {
    name: String,
    queues: HashMap<PadId, VecDeque<Packet>>,
    sides: Vec<SidePacket>,
    total_received: u64,
}

impl CollectSink {
    /// Create a new CollectSink.
    pub fn new() -> Self {
        Self {
            name: "collectsink".to_string(),
            ..Default::default()
        }
    }

    /// Create a CollectSink with a custom name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Pull the oldest queued packet for a pad.
    pub fn pull(&mut self, pad: PadId) -> Option<Packet> {
        self.queues.get_mut(&pad)?.pop_front()
    }

    /// Drain all queued packets for a pad, oldest first.
    pub fn drain(&mut self, pad: PadId) -> Vec<Packet> {
        self.queues
            .remove(&pad)
            .map(Vec::from)
            .unwrap_or_default()
    }

    /// Get the number of packets queued on a pad.
    pub fn queued(&self, pad: PadId) -> usize {
        self.queues.get(&pad).map_or(0, VecDeque::len)
    }

    /// Get the side packets received so far, in arrival order.
    pub fn side_packets(&self) -> &[SidePacket] {
        &self.sides
    }

    /// Get the total number of timed packets received.
    pub fn total_received(&self) -> u64 {
        self.total_received
    }
}

impl PacketSink for CollectSink {
    fn consume(&mut self, pad: PadId, packet: Packet) -> Result<()> {
        self.queues.entry(pad).or_default().push_back(packet);
        self.total_received += 1;
        Ok(())
    }

    fn consume_side(&mut self, side: SidePacket) -> Result<()> {
        self.sides.push(side);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
