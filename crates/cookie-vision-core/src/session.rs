//! The labeling capture loop
//!
//! A blocking, single-threaded state machine: wait for a labeling event,
//! capture and encode one frame, append the (feature, label) pair, cool
//! down, repeat. Everything runs on the caller's thread; the only pauses
//! are the blocking wait for input and the post-capture cooldown.

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::capture::{DesktopGrabber, FrameCapturer};
use crate::encoder;
use crate::error::Result;
use crate::label::Label;
use crate::store::DatasetStore;

/// One event from the operator's label input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A recognized label key/button
    Label(Label),
    /// Input that maps to nothing; the loop ignores it
    Unrecognized,
    /// Stop collecting
    Quit,
}

/// Blocking source of labeling events.
///
/// Implemented by the CLI keyboard reader in production and by scripted
/// sources in tests; the loop never depends on a concrete input mechanism.
pub trait LabelInputSource {
    /// Block until the operator produces the next event
    fn next_event(&mut self) -> Result<InputEvent>;
}

/// Capture loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for a labeling event
    Idle,
    /// Capturing, encoding, and appending one pair
    Capturing,
    /// Post-capture delay before accepting the next event
    Cooldown,
    /// Quit received; the loop has exited
    Terminated,
}

/// Progress notifications for the operator-facing output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureProgress {
    /// A capture has started for the given label
    Capturing(Label),
    /// The pair was appended; `total` pairs are now stored
    Saved { total: usize },
    /// Cooldown finished, ready for the next event
    Ready,
}

/// Callback invoked with progress notifications
pub type ProgressCallback = Box<dyn Fn(CaptureProgress) + Send>;

/// Default post-capture cooldown
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

/// The capture-encode-persist loop driver
pub struct CaptureSession<G: DesktopGrabber, I: LabelInputSource> {
    capturer: FrameCapturer<G>,
    input: I,
    store: DatasetStore,
    pool_size: u32,
    cooldown: Duration,
    progress_callback: Option<ProgressCallback>,
    state: LoopState,
}

impl<G: DesktopGrabber, I: LabelInputSource> CaptureSession<G, I> {
    /// Create a session with the default 1 second cooldown
    pub fn new(capturer: FrameCapturer<G>, input: I, store: DatasetStore, pool_size: u32) -> Self {
        Self {
            capturer,
            input,
            store,
            pool_size,
            cooldown: DEFAULT_COOLDOWN,
            progress_callback: None,
            state: LoopState::Idle,
        }
    }

    /// Override the post-capture cooldown
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Register a progress callback
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run until the input source yields `Quit`.
    ///
    /// Returns the number of pairs appended during this session. Any capture,
    /// encode, or store error aborts the in-progress event and the loop; the
    /// event is never retried automatically. The session ends in
    /// [`LoopState::Terminated`] whether it quit cleanly or aborted.
    pub fn run(&mut self) -> Result<usize> {
        let result = self.run_loop();
        if result.is_err() {
            self.state = LoopState::Terminated;
        }
        result
    }

    fn run_loop(&mut self) -> Result<usize> {
        let mut captured = 0;

        loop {
            self.state = LoopState::Idle;
            let label = match self.input.next_event()? {
                InputEvent::Label(label) => label,
                InputEvent::Unrecognized => continue,
                InputEvent::Quit => {
                    self.state = LoopState::Terminated;
                    info!(captured, "capture session terminated");
                    return Ok(captured);
                }
            };

            self.state = LoopState::Capturing;
            self.notify(CaptureProgress::Capturing(label));
            let total = match self.capture_one(label) {
                Ok(total) => total,
                Err(e) => {
                    warn!(%label, error = %e, "capture event failed");
                    return Err(e);
                }
            };
            captured += 1;
            self.notify(CaptureProgress::Saved { total });

            self.state = LoopState::Cooldown;
            thread::sleep(self.cooldown);
            self.notify(CaptureProgress::Ready);
        }
    }

    /// Capture, encode, and append a single pair
    fn capture_one(&mut self, label: Label) -> Result<usize> {
        let frame = self.capturer.capture()?;
        let feature = encoder::encode(&frame, self.pool_size)?;
        let total = self.store.append(&feature, label)?;
        info!(%label, total, feature_len = feature.len(), "pair appended");
        Ok(total)
    }

    fn notify(&self, progress: CaptureProgress) {
        if let Some(ref callback) = self.progress_callback {
            callback(progress);
        }
    }
}
