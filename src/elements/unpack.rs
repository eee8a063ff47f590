//! Paired-sequence unpacking stage.

use crate::clock::ClockTime;
use crate::container::{FeatureEntry, SequenceContainer};
use crate::element::{PacketSource, PadId, RoutedPackets, StepOutput};
use crate::error::{Error, Result};
use crate::packet::{Packet, SidePacket};
use bytes::Bytes;
use smallvec::SmallVec;
use std::sync::Arc;

/// Pad carrying the primary modality (e.g. video features).
pub const PAD_PRIMARY: PadId = PadId::new(0);

/// Pad carrying the secondary modality (e.g. audio features).
pub const PAD_SECONDARY: PadId = PadId::new(1);

/// Pad carrying the one-shot record identifier side packet.
pub const PAD_ID: PadId = PadId::new(2);

/// Configuration for a [`SequenceUnpacker`].
#[derive(Clone, Debug)]
pub struct UnpackerConfig {
    /// Container key of the primary modality's feature list.
    pub primary_key: String,
    /// Container key of the secondary modality's feature list.
    pub secondary_key: String,
    /// Emit the record identifier once on [`PAD_ID`] at open time.
    pub emit_id: bool,
}

impl Default for UnpackerConfig {
    fn default() -> Self {
        Self {
            primary_key: "rgb".to_string(),
            secondary_key: "audio".to_string(),
            emit_id: false,
        }
    }
}

impl UnpackerConfig {
    /// Set the container keys to read the two modalities from.
    pub fn with_keys(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary_key = primary.into();
        self.secondary_key = secondary.into();
        self
    }

    /// Request the identifier side output.
    pub fn with_emit_id(mut self, emit: bool) -> Self {
        self.emit_id = emit;
        self
    }
}

/// A source that unpacks a paired-modality sequence container into a
/// timed packet stream.
///
/// The container holds two length-aligned feature lists (quantized byte
/// blobs, one entry per time step). Each step emits the next entry of
/// both lists as a pair of packets sharing one timestamp; timestamps
/// advance by exactly [`SequenceUnpacker::STEP_DURATION`] per step,
/// starting at zero. Payloads pass through byte-for-byte; downstream
/// stages do any dequantization.
///
/// `open()` validates once that both configured lists are present in
/// the container and equal in length, failing with
/// [`Error::PreconditionFailed`] (carrying the record identifier)
/// otherwise. The only mutable state afterwards is the step cursor.
///
/// # Example
///
/// ```rust
/// use lockstep::container::SequenceContainer;
/// use lockstep::element::{PacketSource, StepOutput};
/// use lockstep::elements::{SequenceUnpacker, UnpackerConfig, PAD_PRIMARY};
/// use std::sync::Arc;
///
/// let container = Arc::new(
///     SequenceContainer::builder()
///         .identifier("abc123")
///         .push_value("rgb", &b"p0"[..])
///         .push_value("audio", &b"s0"[..])
///         .build(),
/// );
///
/// let mut unpacker = SequenceUnpacker::new(container, UnpackerConfig::default());
/// unpacker.open().unwrap();
///
/// let batch = unpacker.step().unwrap().into_packets().unwrap();
/// assert_eq!(batch.get(PAD_PRIMARY).unwrap().as_bytes(), b"p0");
/// assert!(unpacker.step().unwrap().is_eos());
/// ```
pub struct SequenceUnpacker {
    container: Arc<SequenceContainer>,
    config: UnpackerConfig,
    pads: [PadId; 2],
    sequence_length: usize,
    cursor: usize,
    opened: bool,
}

impl SequenceUnpacker {
    /// Logical time advance per step: one second of source time,
    /// expressed in microsecond ticks.
    pub const STEP_DURATION: ClockTime = ClockTime::from_secs(1);

    /// Create an unpacker over a container.
    ///
    /// Validation happens in [`open`](PacketSource::open), not here.
    pub fn new(container: Arc<SequenceContainer>, config: UnpackerConfig) -> Self {
        Self {
            container,
            config,
            pads: [PAD_PRIMARY, PAD_SECONDARY],
            sequence_length: 0,
            cursor: 0,
            opened: false,
        }
    }

    /// Get the validated sequence length. Zero before `open()`.
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Get the number of steps left before end-of-stream.
    pub fn remaining(&self) -> usize {
        self.sequence_length - self.cursor.min(self.sequence_length)
    }

    /// Look up a configured modality's feature list, rejecting absence.
    ///
    /// A key with no list at all (as opposed to an empty one) means the
    /// container does not carry this modality; defaulting it to empty
    /// would make a misspelled key look like a valid empty sequence.
    fn require_list(&self, id: &str, key: &str) -> Result<&[FeatureEntry]> {
        self.container.feature_list(key).ok_or_else(|| {
            Error::failed_precondition(
                id,
                format!("required modality '{key}' is missing from the container"),
            )
        })
    }

    /// Fetch the single byte-string payload of one modality at an index.
    ///
    /// Panics if the entry is malformed or the index is out of range;
    /// either condition means `open()`-time validation was bypassed.
    fn quantized_value(&self, key: &str, index: usize) -> Bytes {
        let list = self
            .container
            .feature_list(key)
            .unwrap_or_else(|| panic!("modality '{key}' vanished after validation"));
        list[index].sole_value().clone()
    }
}

impl PacketSource for SequenceUnpacker {
    fn open(&mut self) -> Result<SmallVec<[SidePacket; 1]>> {
        // Missing identifier panics: the container is assumed well-formed
        // by the time it reaches this stage.
        let id = self.container.identifier().to_string();

        let mut side = SmallVec::new();
        if self.config.emit_id {
            side.push(SidePacket::new(PAD_ID, Bytes::from(id.clone())));
        }

        let primary_len = self.require_list(&id, &self.config.primary_key)?.len();
        let secondary_len = self.require_list(&id, &self.config.secondary_key)?.len();
        if primary_len != secondary_len {
            return Err(Error::failed_precondition(
                id,
                format!(
                    "feature list lengths differ: '{}' has {}, '{}' has {}",
                    self.config.primary_key, primary_len, self.config.secondary_key, secondary_len,
                ),
            ));
        }

        self.sequence_length = primary_len;
        self.cursor = 0;
        self.opened = true;
        tracing::info!(
            id = %id,
            length = self.sequence_length,
            "opened sequence container"
        );
        Ok(side)
    }

    fn step(&mut self) -> Result<StepOutput> {
        debug_assert!(self.opened, "step() called before open()");
        if self.cursor >= self.sequence_length {
            return Ok(StepOutput::Eos);
        }

        let pts = Self::STEP_DURATION * self.cursor as u64;
        let sequence = self.cursor as u64;

        let mut routed = RoutedPackets::new();
        routed.push(
            PAD_PRIMARY,
            Packet::new(self.quantized_value(&self.config.primary_key, self.cursor), pts)
                .with_sequence(sequence),
        );
        routed.push(
            PAD_SECONDARY,
            Packet::new(
                self.quantized_value(&self.config.secondary_key, self.cursor),
                pts,
            )
            .with_sequence(sequence),
        );

        self.cursor += 1;
        Ok(StepOutput::Emit(routed))
    }

    fn name(&self) -> &str {
        "sequenceunpacker"
    }

    fn outputs(&self) -> &[PadId] {
        &self.pads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired_container(len: usize) -> Arc<SequenceContainer> {
        let mut builder = SequenceContainer::builder().identifier("abc123");
        for i in 0..len {
            builder = builder
                .push_value("rgb", format!("p{i}").into_bytes())
                .push_value("audio", format!("s{i}").into_bytes());
        }
        Arc::new(builder.build())
    }

    #[test]
    fn test_open_succeeds_on_aligned_lists() {
        let mut unpacker = SequenceUnpacker::new(paired_container(3), UnpackerConfig::default());
        let side = unpacker.open().unwrap();
        assert!(side.is_empty());
        assert_eq!(unpacker.sequence_length(), 3);
        assert_eq!(unpacker.remaining(), 3);
    }

    #[test]
    fn test_open_fails_on_length_mismatch() {
        let container = Arc::new(
            SequenceContainer::builder()
                .identifier("abc123")
                .push_value("rgb", &b"p0"[..])
                .push_value("rgb", &b"p1"[..])
                .push_value("rgb", &b"p2"[..])
                .push_value("audio", &b"s0"[..])
                .push_value("audio", &b"s1"[..])
                .build(),
        );
        let mut unpacker = SequenceUnpacker::new(container, UnpackerConfig::default());
        let err = unpacker.open().unwrap_err();
        assert!(err.is_precondition());
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("lengths differ"));
    }

    #[test]
    fn test_open_fails_on_absent_modality() {
        // "audio" list absent entirely, not merely empty.
        let container = Arc::new(
            SequenceContainer::builder()
                .identifier("abc123")
                .push_value("rgb", &b"p0"[..])
                .build(),
        );
        let mut unpacker = SequenceUnpacker::new(container, UnpackerConfig::default());
        let err = unpacker.open().unwrap_err();
        assert!(err.is_precondition());
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("'audio'"));
    }

    #[test]
    fn test_open_fails_when_both_modalities_absent() {
        // A container holding only an identifier must not pass for a
        // valid empty sequence.
        let container = Arc::new(SequenceContainer::builder().identifier("abc123").build());
        let mut unpacker = SequenceUnpacker::new(container, UnpackerConfig::default());
        let err = unpacker.open().unwrap_err();
        assert!(err.is_precondition());
        assert!(err.to_string().contains("missing from the container"));
    }

    #[test]
    fn test_steps_emit_pairs_with_spaced_timestamps() {
        let mut unpacker = SequenceUnpacker::new(paired_container(3), UnpackerConfig::default());
        unpacker.open().unwrap();

        for i in 0..3u64 {
            let batch = unpacker.step().unwrap().into_packets().unwrap();
            assert_eq!(batch.len(), 2);

            let primary = batch.get(PAD_PRIMARY).unwrap();
            let secondary = batch.get(PAD_SECONDARY).unwrap();
            assert_eq!(primary.as_bytes(), format!("p{i}").as_bytes());
            assert_eq!(secondary.as_bytes(), format!("s{i}").as_bytes());

            let expected = SequenceUnpacker::STEP_DURATION * i;
            assert_eq!(primary.pts(), expected);
            assert_eq!(secondary.pts(), expected);
            assert_eq!(primary.sequence(), i);
        }
        assert!(unpacker.step().unwrap().is_eos());
    }

    #[test]
    fn test_eos_is_idempotent() {
        let mut unpacker = SequenceUnpacker::new(paired_container(1), UnpackerConfig::default());
        unpacker.open().unwrap();
        assert!(!unpacker.step().unwrap().is_eos());
        for _ in 0..3 {
            assert!(unpacker.step().unwrap().is_eos());
        }
        assert_eq!(unpacker.remaining(), 0);
    }

    #[test]
    fn test_empty_sequence_is_immediate_eos() {
        let container = Arc::new(
            SequenceContainer::builder()
                .identifier("abc123")
                .empty_modality("rgb")
                .empty_modality("audio")
                .build(),
        );
        let mut unpacker = SequenceUnpacker::new(
            container,
            UnpackerConfig::default().with_emit_id(true),
        );
        let side = unpacker.open().unwrap();
        assert_eq!(side.len(), 1);
        assert_eq!(side[0].as_str(), Some("abc123"));
        assert!(unpacker.step().unwrap().is_eos());
    }

    #[test]
    fn test_identifier_side_packet() {
        let mut unpacker = SequenceUnpacker::new(
            paired_container(2),
            UnpackerConfig::default().with_emit_id(true),
        );
        let side = unpacker.open().unwrap();
        assert_eq!(side.len(), 1);
        assert_eq!(side[0].pad(), PAD_ID);
        assert_eq!(side[0].as_str(), Some("abc123"));
    }

    #[test]
    fn test_custom_modality_keys() {
        let container = Arc::new(
            SequenceContainer::builder()
                .identifier("rec-1")
                .push_value("video", &b"v"[..])
                .push_value("depth", &b"d"[..])
                .build(),
        );
        let mut unpacker = SequenceUnpacker::new(
            container,
            UnpackerConfig::default().with_keys("video", "depth"),
        );
        unpacker.open().unwrap();
        let batch = unpacker.step().unwrap().into_packets().unwrap();
        assert_eq!(batch.get(PAD_PRIMARY).unwrap().as_bytes(), b"v");
        assert_eq!(batch.get(PAD_SECONDARY).unwrap().as_bytes(), b"d");
    }

    #[test]
    #[should_panic(expected = "no 'id' context value")]
    fn test_open_panics_without_identifier() {
        let container = Arc::new(
            SequenceContainer::builder()
                .push_value("rgb", &b"p0"[..])
                .push_value("audio", &b"s0"[..])
                .build(),
        );
        let mut unpacker = SequenceUnpacker::new(container, UnpackerConfig::default());
        let _ = unpacker.open();
    }

    #[test]
    #[should_panic(expected = "exactly one value")]
    fn test_malformed_entry_aborts_step() {
        let mut entry = FeatureEntry::from_value(&b"a"[..]);
        entry.push(&b"b"[..]);
        let container = Arc::new(
            SequenceContainer::builder()
                .identifier("abc123")
                .push_entry("rgb", entry)
                .push_value("audio", &b"s0"[..])
                .build(),
        );
        let mut unpacker = SequenceUnpacker::new(container, UnpackerConfig::default());
        unpacker.open().unwrap();
        let _ = unpacker.step();
    }
}
