//! Foundation types for padkit.
//!
//! Platform-agnostic types shared by the padkit crates: geometry, input
//! events and the input sink trait, engine configuration, and errors.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;

pub use config::EngineConfig;
pub use error::{LoadError, Result, SkinError};
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use input::{InputEvent, InputSink, RecordingSink, TouchPhase};
