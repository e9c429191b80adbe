//! Vocl Core - real-time echo processing primitives
//!
//! This crate holds everything that runs inside the audio callback, plus the
//! validation that must happen before it runs. Nothing here talks to audio
//! hardware; see `vocl-io` for that.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe per-sample transform
//! - [`EchoEffect`] - Delay-line echo with independent feedback and mix
//! - [`DelayLine`] - Fixed-length ring buffer behind the echo
//!
//! ## Buffer Handling
//!
//! - [`deinterleave`] / [`interleave`] - Whole-block conversion between
//!   interleaved and planar layouts
//! - [`deinterleave_channel`] / [`interleave_channel`] - Allocation-free
//!   per-channel forms used on the audio thread
//!
//! ## Processing
//!
//! - [`ChannelProcessor`] - One effect applied to one channel's planar samples
//! - [`StreamEngine`] - Per-buffer callback body: split, process, merge
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for targets without an OS.
//! Only `alloc` is required, and only at construction time.
//!
//! # Example
//!
//! ```rust
//! use vocl_core::{EchoEffect, EchoParams, Effect, StreamEngine};
//!
//! let sample_rate = 44100.0;
//! let params = EchoParams { delay_ms: 250.0, feedback: 0.4, mix: 0.5 };
//!
//! // One echo per channel, bound in order.
//! let effects: Vec<Box<dyn Effect + Send>> = (0..2)
//!     .map(|_| Box::new(EchoEffect::new(sample_rate, params).unwrap()) as Box<dyn Effect + Send>)
//!     .collect();
//! let mut engine = StreamEngine::new(2, 256, effects).unwrap();
//!
//! // Called once per buffer period by the transport.
//! let input = vec![0.0f32; 256 * 2];
//! let mut output = vec![0.0f32; 256 * 2];
//! engine.process(&input, &mut output);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or I/O in processing paths
//! - **Fail early**: Every configuration error surfaces from a constructor
//! - **Object-safe traits**: The engine does not know which effect it runs

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod channel;
pub mod delay;
pub mod echo;
pub mod effect;
pub mod engine;
pub mod error;
pub mod interleave;

pub use channel::ChannelProcessor;
pub use delay::DelayLine;
pub use echo::{EchoEffect, EchoParams, MAX_DELAY_SAMPLES, delay_samples};
pub use effect::Effect;
pub use engine::StreamEngine;
pub use error::ConfigError;
pub use interleave::{
    deinterleave, deinterleave_channel, frame_count, interleave, interleave_channel,
};
