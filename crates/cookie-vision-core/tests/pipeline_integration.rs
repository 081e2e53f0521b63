//! Integration tests for the capture-encode-persist pipeline.
//!
//! These tests drive a full `CaptureSession` with a synthetic desktop and a
//! scripted input source, then reload the dataset from disk with a fresh
//! store to verify what actually persisted.

use std::time::Duration;

use cookie_vision_core::capture::{DesktopGrabber, FrameCapturer};
use cookie_vision_core::store::DatasetStore;
use cookie_vision_core::{
    encoder, CaptureSession, Error, Frame, InputEvent, Label, LabelInputSource, Result,
};
use tempfile::TempDir;

/// Synthetic desktop whose pixel values change every grab.
struct CountingGrabber {
    width: u32,
    height: u32,
    grabs: u8,
}

impl DesktopGrabber for CountingGrabber {
    fn grab(&mut self) -> Result<Frame> {
        self.grabs = self.grabs.wrapping_add(1);
        let data = vec![self.grabs; (self.width * self.height * 3) as usize];
        Frame::from_rgb(self.width, self.height, data)
    }
}

/// Input source replaying a fixed script, then quitting.
struct Script(std::vec::IntoIter<InputEvent>);

impl Script {
    fn of(labels: &[Label]) -> Self {
        Self(
            labels
                .iter()
                .map(|&l| InputEvent::Label(l))
                .collect::<Vec<_>>()
                .into_iter(),
        )
    }
}

impl LabelInputSource for Script {
    fn next_event(&mut self) -> Result<InputEvent> {
        Ok(self.0.next().unwrap_or(InputEvent::Quit))
    }
}

fn run_session(dir: &TempDir, labels: &[Label], pool_size: u32) -> usize {
    let store = DatasetStore::new(dir.path());
    store.initialize().expect("Failed to initialize store");

    // Desktop is taller than the 6x6 canonical region, so the crop path runs
    let grabber = CountingGrabber {
        width: 8,
        height: 10,
        grabs: 0,
    };
    let capturer = FrameCapturer::with_canonical(grabber, 6, 6);
    let mut session = CaptureSession::new(capturer, Script::of(labels), store, pool_size)
        .with_cooldown(Duration::ZERO);
    session.run().expect("Session failed")
}

#[test]
fn full_pipeline_persists_ordered_pairs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let labels = [Label::Empty, Label::GoldenCookie, Label::Effect];
    assert_eq!(run_session(&dir, &labels, 1), 3);

    let dataset = DatasetStore::new(dir.path()).load().expect("Load failed");
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.feature_len(), 6 * 6 * 3);
    assert_eq!(dataset.labels(), &labels);

    // Frames were flat-colored 1, 2, 3 in capture order
    for (i, expected) in [1u8, 2, 3].into_iter().enumerate() {
        assert!(dataset.feature(i).iter().all(|&v| v == expected));
    }
}

#[test]
fn pooled_session_stores_pooled_vectors() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    run_session(&dir, &[Label::Empty], 3);

    let dataset = DatasetStore::new(dir.path()).load().expect("Load failed");
    assert_eq!(dataset.feature_len(), 2 * 2 * 3);
    // A flat frame pools to the same flat value
    assert!(dataset.feature(0).iter().all(|&v| v == 1));
}

#[test]
fn sessions_accumulate_across_restarts() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    run_session(&dir, &[Label::Empty, Label::Empty], 1);

    // Second process lifetime, same dataset directory
    run_session(&dir, &[Label::GoldenCookie], 1);

    let dataset = DatasetStore::new(dir.path()).load().expect("Load failed");
    assert_eq!(dataset.len(), 3);
    assert_eq!(
        dataset.labels(),
        &[Label::Empty, Label::Empty, Label::GoldenCookie]
    );
}

#[test]
fn stored_vector_matches_direct_encoding() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    run_session(&dir, &[Label::Effect], 2);

    // Re-derive the expected vector from an identical frame
    let frame = Frame::from_rgb(6, 6, vec![1u8; 6 * 6 * 3]).expect("Bad frame");
    let expected = encoder::encode(&frame, 2).expect("Encode failed");

    let dataset = DatasetStore::new(dir.path()).load().expect("Load failed");
    assert_eq!(dataset.feature(0), expected.as_slice());
}

#[test]
fn interrupted_event_poisons_the_pair() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    run_session(&dir, &[Label::Empty], 1);

    let store = DatasetStore::new(dir.path());
    // Simulate a crash between the feature append and the label append
    store
        .append_feature(&vec![0u8; 6 * 6 * 3])
        .expect("Append failed");

    let err = store.load().expect_err("Load should have failed");
    assert!(matches!(err, Error::CorruptStore { .. }));
    assert_eq!(store.counts().expect("Counts failed"), (2, 1));
}
