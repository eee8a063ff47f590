//! Built-in stages.
//!
//! ## Sources
//! - [`SequenceUnpacker`]: Unpacks a paired-modality sequence container
//!   into a timed packet stream
//!
//! ## Sinks
//! - [`CollectSink`]: Queues packets per pad for application pull
//! - [`NullSink`]: Discards all packets (useful for benchmarking)

mod collect;
mod null;
mod unpack;

pub use collect::CollectSink;
pub use null::NullSink;
pub use unpack::{SequenceUnpacker, UnpackerConfig, PAD_ID, PAD_PRIMARY, PAD_SECONDARY};
