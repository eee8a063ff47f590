//! Core stage traits.

use crate::error::Result;
use crate::packet::{Packet, SidePacket};
use smallvec::SmallVec;

// ============================================================================
// Pads
// ============================================================================

/// Output pad identifier.
///
/// Each modality a stage emits gets a dedicated pad; hosts route packets
/// to downstream channels keyed by pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PadId(pub u32);

impl PadId {
    /// Create a new pad ID.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for PadId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PadId> for u32 {
    fn from(id: PadId) -> Self {
        id.0
    }
}

// ============================================================================
// Step Output
// ============================================================================

/// Routed output of one step (packets with destination pads).
///
/// Uses SmallVec to avoid allocation for the common paired-output case.
#[derive(Debug, Default)]
pub struct RoutedPackets(pub SmallVec<[(PadId, Packet); 2]>);

impl RoutedPackets {
    /// Create an empty routed batch.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Create a batch with a single packet.
    pub fn single(pad: PadId, packet: Packet) -> Self {
        let mut r = Self::new();
        r.push(pad, packet);
        r
    }

    /// Add a packet for a specific pad.
    pub fn push(&mut self, pad: PadId, packet: Packet) {
        self.0.push((pad, packet));
    }

    /// Get the packet routed to a pad, if any.
    pub fn get(&self, pad: PadId) -> Option<&Packet> {
        self.0.iter().find(|(p, _)| *p == pad).map(|(_, pkt)| pkt)
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of routed packets.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl IntoIterator for RoutedPackets {
    type Item = (PadId, Packet);
    type IntoIter = smallvec::IntoIter<[(PadId, Packet); 2]>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RoutedPackets {
    type Item = &'a (PadId, Packet);
    type IntoIter = std::slice::Iter<'a, (PadId, Packet)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of one successful step of a [`PacketSource`].
///
/// End-of-stream is a distinct, non-error signal: errors travel through
/// `Result`, while `Eos` marks normal exhaustion. A source that has
/// reached `Eos` keeps returning it on further steps.
#[derive(Debug)]
pub enum StepOutput {
    /// One batch of packets, at most one per output pad, all sharing one
    /// timestamp.
    Emit(RoutedPackets),
    /// Normal end of stream; no packets were produced.
    Eos,
}

impl StepOutput {
    /// Check whether this is end-of-stream.
    pub fn is_eos(&self) -> bool {
        matches!(self, Self::Eos)
    }

    /// Take the emitted batch, returning `None` at end-of-stream.
    pub fn into_packets(self) -> Option<RoutedPackets> {
        match self {
            Self::Emit(routed) => Some(routed),
            Self::Eos => None,
        }
    }
}

// ============================================================================
// Source Trait
// ============================================================================

/// A stepped source that produces routed packet batches.
///
/// Sources own the iteration state over some already-resident input and
/// are driven cooperatively: the host calls [`open`](Self::open) once,
/// then [`step`](Self::step) repeatedly until it returns
/// [`StepOutput::Eos`]. No step blocks or runs concurrently with another.
///
/// # Lifecycle
///
/// - `open()` validates the input once and may emit side packets
/// - `step()` yields `Ok(StepOutput::Emit(..))` per successful step
/// - `step()` yields `Ok(StepOutput::Eos)` once exhausted, idempotently
/// - `Err(..)` signals a validation failure, never normal termination
pub trait PacketSource: Send {
    /// Validate input and emit any one-shot side packets.
    ///
    /// Called exactly once, before the first `step()`. A source that
    /// fails `open()` must not be stepped.
    fn open(&mut self) -> Result<SmallVec<[SidePacket; 1]>> {
        Ok(SmallVec::new())
    }

    /// Produce the next routed batch, or signal end-of-stream.
    fn step(&mut self) -> Result<StepOutput>;

    /// Get the name of this source (for debugging/logging).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Get the output pads this source emits on.
    fn outputs(&self) -> &[PadId];
}

// ============================================================================
// Sink Trait
// ============================================================================

/// A sink that consumes routed packets.
///
/// Sinks are the host-side output channels: one logical channel per pad.
pub trait PacketSink: Send {
    /// Consume one packet arriving on a pad.
    fn consume(&mut self, pad: PadId, packet: Packet) -> Result<()>;

    /// Consume a one-shot side packet.
    ///
    /// The default implementation discards it.
    fn consume_side(&mut self, side: SidePacket) -> Result<()> {
        let _ = side;
        Ok(())
    }

    /// Get the name of this sink (for debugging/logging).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
