//! Host loop for driving a source to completion.
//!
//! The [`Runner`] is a composition root, not a graph engine: the host
//! constructs a stage, hands it over together with a sink, and the
//! runner performs the open-then-step-until-eos protocol. Stages never
//! register themselves anywhere; discovery is plain dependency
//! injection.

use crate::element::{PacketSink, PacketSource, StepOutput};
use crate::error::Result;

/// Statistics from one completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunnerStats {
    /// Number of successful steps before end-of-stream.
    pub steps: u64,
    /// Total timed packets delivered to the sink.
    pub packets: u64,
    /// Side packets delivered at open time.
    pub side_packets: u64,
}

/// Drives a [`PacketSource`] to completion against a [`PacketSink`].
///
/// # Example
///
/// ```rust,ignore
/// use lockstep::pipeline::Runner;
///
/// let mut sink = CollectSink::new();
/// let stats = Runner::new().run(&mut unpacker, &mut sink)?;
/// assert_eq!(stats.steps, 3);
/// ```
#[derive(Debug, Default)]
pub struct Runner {
    max_steps: Option<u64>,
}

impl Runner {
    /// Create a runner with no step bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of steps (the run stops early when reached).
    pub fn with_max_steps(mut self, max: u64) -> Self {
        self.max_steps = Some(max);
        self
    }

    /// Open the source, forward its side packets, then step it until
    /// end-of-stream, routing every batch to the sink.
    ///
    /// A failed `open()` aborts before any step; a failed step aborts
    /// the run with that error.
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> Result<RunnerStats>
    where
        S: PacketSource,
        K: PacketSink,
    {
        let mut stats = RunnerStats::default();

        for side in source.open()? {
            sink.consume_side(side)?;
            stats.side_packets += 1;
        }

        loop {
            if let Some(max) = self.max_steps {
                if stats.steps >= max {
                    tracing::warn!(source = source.name(), max, "step bound reached");
                    break;
                }
            }
            match source.step()? {
                StepOutput::Emit(routed) => {
                    for (pad, packet) in routed {
                        sink.consume(pad, packet)?;
                        stats.packets += 1;
                    }
                    stats.steps += 1;
                }
                StepOutput::Eos => break,
            }
        }

        tracing::debug!(
            source = source.name(),
            sink = sink.name(),
            steps = stats.steps,
            packets = stats.packets,
            "run complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::element::{PadId, RoutedPackets, StepOutput};
    use crate::elements::NullSink;
    use crate::packet::Packet;

    struct CountingSource {
        count: u64,
        max: u64,
        pads: [PadId; 1],
    }

    impl CountingSource {
        fn new(max: u64) -> Self {
            Self {
                count: 0,
                max,
                pads: [PadId::new(0)],
            }
        }
    }

    impl PacketSource for CountingSource {
        fn step(&mut self) -> Result<StepOutput> {
            if self.count >= self.max {
                return Ok(StepOutput::Eos);
            }
            let packet = Packet::new(
                self.count.to_le_bytes().to_vec(),
                ClockTime::from_secs(self.count),
            );
            self.count += 1;
            Ok(StepOutput::Emit(RoutedPackets::single(self.pads[0], packet)))
        }

        fn outputs(&self) -> &[PadId] {
            &self.pads
        }
    }

    #[test]
    fn test_runner_drives_to_eos() {
        let mut source = CountingSource::new(5);
        let mut sink = NullSink::new();
        let stats = Runner::new().run(&mut source, &mut sink).unwrap();
        assert_eq!(stats.steps, 5);
        assert_eq!(stats.packets, 5);
        assert_eq!(stats.side_packets, 0);
        assert_eq!(sink.count(), 5);
    }

    #[test]
    fn test_runner_respects_step_bound() {
        let mut source = CountingSource::new(100);
        let mut sink = NullSink::new();
        let stats = Runner::new()
            .with_max_steps(10)
            .run(&mut source, &mut sink)
            .unwrap();
        assert_eq!(stats.steps, 10);
        assert_eq!(sink.count(), 10);
    }
}
