//! # cookie-vision-core
//!
//! Core library for building a labeled screen-capture dataset for a
//! game-state classifier: capture a frame of the game monitor, encode it as
//! a fixed-length feature vector, and append it with an operator-chosen
//! label to an on-disk dataset.
//!
//! ## Modules
//!
//! - [`capture`] - Virtual-desktop grab, region geometry, canonical frames
//! - [`config`] - Collector configuration with JSON persistence
//! - [`encoder`] - Frame flattening and block-mean pooling
//! - [`error`] - Error types and Result alias
//! - [`label`] - The closed set of game-state labels
//! - [`session`] - The blocking capture loop and its input abstraction
//! - [`store`] - The paired features/labels `.npy` dataset files
//!
//! ## Example
//!
//! ```no_run
//! use cookie_vision_core::capture::{FrameCapturer, GdiGrabber};
//! use cookie_vision_core::store::DatasetStore;
//! use cookie_vision_core::{encoder, Label};
//!
//! # fn main() -> cookie_vision_core::Result<()> {
//! let store = DatasetStore::new("dataset");
//! store.initialize()?;
//!
//! let mut capturer = FrameCapturer::new(GdiGrabber::new());
//! let frame = capturer.capture()?;
//! let feature = encoder::encode(&frame, 3)?;
//! store.append(&feature, Label::GoldenCookie)?;
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod capture;
pub mod config;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod label;
pub mod session;
pub mod store;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Data model
pub use frame::Frame;
pub use label::Label;

// Capture
pub use capture::{region_for, CaptureRegion, DesktopGrabber, FrameCapturer, GdiGrabber};

// Configuration
pub use config::Config;

// Storage
pub use store::{Dataset, DatasetStore};

// Capture loop
pub use session::{
    CaptureProgress, CaptureSession, InputEvent, LabelInputSource, LoopState, ProgressCallback,
};
