//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the local player core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! Every other crate in the workspace depends on this one for its
//! configuration types, its event vocabulary and its logging conventions.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, LengthUnit};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, PlayerEvent, SessionEvent};
