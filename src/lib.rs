//! # Lockstep
//!
//! A cooperative stepping engine for unpacking aligned multi-modal
//! feature sequences into synchronized, evenly paced packet streams.
//!
//! A [`SequenceContainer`](container::SequenceContainer) arrives fully
//! parsed: one record identifier plus named per-step feature lists
//! (opaque quantized byte blobs, one entry per time step). The
//! [`SequenceUnpacker`](elements::SequenceUnpacker) validates once that
//! the lists it reads are length-aligned, then re-emits them step by
//! step: one packet per modality per step, all sharing a logical
//! timestamp that advances by a fixed duration per index.
//!
//! ## Features
//!
//! - **Host-driven stepping**: stages expose `open()`/`step()` and run
//!   under any scheduling model
//! - **Eager validation**: alignment is checked once at open time and
//!   reported with the offending record's identifier
//! - **Deterministic pacing**: timestamps are pure functions of the
//!   step index, never of a system clock
//! - **Distinct termination**: end-of-stream is a tagged result, never
//!   an error
//!
//! ## Quick Start
//!
//! ```rust
//! use lockstep::container::SequenceContainer;
//! use lockstep::elements::{CollectSink, SequenceUnpacker, UnpackerConfig, PAD_PRIMARY};
//! use lockstep::pipeline::Runner;
//! use std::sync::Arc;
//!
//! let container = Arc::new(
//!     SequenceContainer::builder()
//!         .identifier("abc123")
//!         .push_value("rgb", &b"p0"[..])
//!         .push_value("audio", &b"s0"[..])
//!         .build(),
//! );
//!
//! let mut unpacker = SequenceUnpacker::new(container, UnpackerConfig::default());
//! let mut sink = CollectSink::new();
//! let stats = Runner::new().run(&mut unpacker, &mut sink).unwrap();
//!
//! assert_eq!(stats.steps, 1);
//! assert_eq!(sink.pull(PAD_PRIMARY).unwrap().as_bytes(), b"p0");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod container;
pub mod element;
pub mod elements;
pub mod error;
pub mod fsutil;
pub mod packet;
pub mod pipeline;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clock::ClockTime;
    pub use crate::container::{FeatureEntry, SequenceContainer};
    pub use crate::element::{PacketSink, PacketSource, PadId, RoutedPackets, StepOutput};
    pub use crate::elements::{CollectSink, SequenceUnpacker, UnpackerConfig};
    pub use crate::error::{Error, Result};
    pub use crate::packet::{Packet, SidePacket};
    pub use crate::pipeline::Runner;
}

pub use error::{Error, Result};
