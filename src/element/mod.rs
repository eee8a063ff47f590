//! Stage system for lockstep pipelines.
//!
//! This module defines the core traits and types for stepped stages:
//!
//! - [`PacketSource`]: Produces timed packet batches from resident input
//! - [`PacketSink`]: Consumes routed packets (the host's output channels)
//!
//! # Design
//!
//! Stages follow a cooperative stepping model: `open`/`step`/`consume`
//! are **synchronous** and the host drives exactly one step at a time.
//! This keeps stage implementations deterministic and lets the same
//! stage run under a plain loop, a thread pool, or an event loop.
//!
//! # Step results
//!
//! [`StepOutput`] is the tagged step result:
//! - `StepOutput::Emit`: one routed batch, one shared timestamp
//! - `StepOutput::Eos`: normal end of stream, distinct from errors

mod traits;

pub use traits::{PacketSink, PacketSource, PadId, RoutedPackets, StepOutput};
