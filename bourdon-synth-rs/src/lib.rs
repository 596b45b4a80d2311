//! Sawtooth drone engine for the bourdon instrument.
//!
//! The control loop never calls into this crate directly: it publishes
//! [`VoiceBank`](bourdon::voices::VoiceBank) snapshots, and the audio task
//! applies them between DMA buffer fills. Rendering is a pure buffer
//! fill: no allocation, no locking, nothing that can block the audio path.
//!
//! Output wiring is resolved once at startup into an [`OutputChain`]:
//! engine → echo → output when a delay line was provisioned, engine →
//! output otherwise.

#![no_std]

pub mod chain;
pub mod echo;
pub mod engine;
pub mod wavetable;

pub use chain::OutputChain;
pub use echo::{delay_samples, Echo, EchoConfig};
pub use engine::DroneSynth;
