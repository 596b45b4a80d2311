//! Core state and logic for the bourdon drone synthesizer.
//!
//! This crate is the hardware-free half of the instrument: everything the
//! control loop computes each cycle, with no bus traffic and no allocation.
//!
//! # Architecture
//!
//! Data flows strictly downward once per cycle:
//!
//! ```text
//! InputFrame (encoder positions + at most one key edge)
//!     │  controls::DroneControl::apply
//!     ▼
//! VoiceBank (per-voice frequency / bend / gate)          → audio path
//!     │  visual::Visual::render
//!     ▼
//! Scene (backdrop + overlay display list)                → display path
//! ```
//!
//! The only cross-cycle state is the encoder accumulators (owned by the
//! firmware's input tasks), the scrolling-trace phase accumulators (owned
//! by the [`visual`] strategy), and the scene overlay, which is rebuilt
//! from scratch every render.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation; all storage is fixed-size. The optional `defmt`
//! feature derives [`defmt::Format`] on the value types for structured
//! logging on embedded targets.

#![no_std]

pub mod controls;
pub mod scene;
pub mod tuning;
pub mod visual;
pub mod voices;
