//! Durable dataset storage
//!
//! The dataset is two parallel append-only `.npy` files: `features.npy` with
//! shape `(N, F)` and `labels.npy` with shape `(N,)`. They are written
//! independently, so the pairing is only as strong as the count-equality
//! invariant — [`DatasetStore::load`] refuses a pair whose counts diverge
//! instead of guessing which rows to drop.
//!
//! Appends reread and rewrite the whole file. That is quadratic across a
//! collection campaign and fine at the few-thousand-frame scale this tool
//! targets; a genuinely incremental log would be the next step beyond that.

mod npy;

pub use npy::NpyArray;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::label::Label;

/// Feature sequence file name
pub const FEATURES_FILE: &str = "features.npy";
/// Label sequence file name
pub const LABELS_FILE: &str = "labels.npy";

/// A fully loaded, consistency-checked dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_len: usize,
    features: Vec<u8>,
    labels: Vec<Label>,
}

impl Dataset {
    /// Number of (feature, label) pairs
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the dataset has no pairs
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length `F` shared by every feature vector (0 while empty)
    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    /// Feature vector of the `index`-th pair
    pub fn feature(&self, index: usize) -> &[u8] {
        &self.features[index * self.feature_len..(index + 1) * self.feature_len]
    }

    /// All labels, in capture order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

/// Store for one dataset: a features file and a labels file in `data_dir`
#[derive(Debug, Clone)]
pub struct DatasetStore {
    features_path: PathBuf,
    labels_path: PathBuf,
}

impl DatasetStore {
    /// Create a store over `data_dir/features.npy` and `data_dir/labels.npy`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            features_path: data_dir.join(FEATURES_FILE),
            labels_path: data_dir.join(LABELS_FILE),
        }
    }

    /// Path of the features file
    pub fn features_path(&self) -> &Path {
        &self.features_path
    }

    /// Path of the labels file
    pub fn labels_path(&self) -> &Path {
        &self.labels_path
    }

    /// Create empty sequence files for any that do not exist yet.
    ///
    /// Existing files are left untouched, whatever they contain; this never
    /// truncates a dataset already on disk.
    pub fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.features_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if self.features_path.exists() {
            debug!(path = %self.features_path.display(), "features file already present");
        } else {
            npy::write_u8_array(&self.features_path, &[0, 0], &[])?;
            info!(path = %self.features_path.display(), "created empty features file");
        }
        if self.labels_path.exists() {
            debug!(path = %self.labels_path.display(), "labels file already present");
        } else {
            npy::write_u8_array(&self.labels_path, &[0], &[])?;
            info!(path = %self.labels_path.display(), "created empty labels file");
        }
        Ok(())
    }

    /// Load and consistency-check the full dataset.
    ///
    /// Fails with [`Error::NotFound`] if either file is missing (loading
    /// never creates files) and with [`Error::CorruptStore`] if the files are
    /// malformed, hold unknown label codes, or disagree on the pair count —
    /// the aftermath of a crash between the two appends of one event.
    pub fn load(&self) -> Result<Dataset> {
        let features = npy::read_u8_array(&self.features_path)?;
        let labels = npy::read_u8_array(&self.labels_path)?;

        let (rows, feature_len) = feature_dims(&features, &self.features_path)?;
        if labels.shape.len() != 1 {
            return Err(Error::TypeMismatch {
                path: self.labels_path.clone(),
                expected: "1-dimensional label array".to_string(),
                actual: format!("{}-dimensional array", labels.shape.len()),
            });
        }

        if rows != labels.data.len() {
            return Err(Error::corrupt(
                &self.features_path,
                format!(
                    "{} feature rows but {} labels; the pair is out of sync",
                    rows,
                    labels.data.len()
                ),
            ));
        }

        let labels = labels
            .data
            .iter()
            .map(|&code| {
                Label::from_code(code).ok_or_else(|| {
                    Error::corrupt(&self.labels_path, format!("unknown label code {}", code))
                })
            })
            .collect::<Result<Vec<Label>>>()?;

        Ok(Dataset {
            feature_len,
            features: features.data,
            labels,
        })
    }

    /// Header shapes of (features, labels), without reading any payload
    pub fn shapes(&self) -> Result<(Vec<usize>, Vec<usize>)> {
        Ok((
            npy::read_shape(&self.features_path)?,
            npy::read_shape(&self.labels_path)?,
        ))
    }

    /// Row counts of (features, labels), from the headers only
    pub fn counts(&self) -> Result<(usize, usize)> {
        let (features, labels) = self.shapes()?;
        let feature_rows = features.first().copied().unwrap_or(0);
        let label_rows = labels.first().copied().unwrap_or(0);
        Ok((feature_rows, label_rows))
    }

    /// Append one feature vector to the features file.
    ///
    /// Reads the whole file back, concatenates, and rewrites it. The vector
    /// must match the stored length `F` once the file is non-empty.
    pub fn append_feature(&self, feature: &[u8]) -> Result<()> {
        if feature.is_empty() {
            return Err(Error::Config(
                "refusing to append an empty feature vector".to_string(),
            ));
        }

        let existing = npy::read_u8_array(&self.features_path)?;
        let (rows, feature_len) = feature_dims(&existing, &self.features_path)?;
        if rows > 0 && feature.len() != feature_len {
            return Err(Error::TypeMismatch {
                path: self.features_path.clone(),
                expected: format!("feature vector of length {}", feature_len),
                actual: format!("length {}", feature.len()),
            });
        }

        let mut data = existing.data;
        data.extend_from_slice(feature);
        npy::write_u8_array(&self.features_path, &[rows + 1, feature.len()], &data)?;
        debug!(rows = rows + 1, "features file rewritten");
        Ok(())
    }

    /// Append one label to the labels file (same reread/rewrite scheme)
    pub fn append_label(&self, label: Label) -> Result<()> {
        let existing = npy::read_u8_array(&self.labels_path)?;
        if existing.shape.len() != 1 {
            return Err(Error::TypeMismatch {
                path: self.labels_path.clone(),
                expected: "1-dimensional label array".to_string(),
                actual: format!("{}-dimensional array", existing.shape.len()),
            });
        }

        let mut data = existing.data;
        data.push(label.code());
        npy::write_u8_array(&self.labels_path, &[data.len()], &data)?;
        debug!(rows = data.len(), "labels file rewritten");
        Ok(())
    }

    /// Append one (feature, label) pair; returns the new pair count.
    ///
    /// Two independent writes with no transaction between them: a crash
    /// after the first leaves the counts out of step, which `load` reports
    /// as a corrupt store rather than repairing.
    pub fn append(&self, feature: &[u8], label: Label) -> Result<usize> {
        self.append_feature(feature)?;
        self.append_label(label)?;
        let (_, count) = self.counts()?;
        Ok(count)
    }
}

/// Interpret a loaded features array as `(rows, feature_len)`
fn feature_dims(array: &NpyArray, path: &Path) -> Result<(usize, usize)> {
    match array.shape.as_slice() {
        [rows, feature_len] => Ok((*rows, *feature_len)),
        other => Err(Error::TypeMismatch {
            path: path.to_path_buf(),
            expected: "2-dimensional feature array".to_string(),
            actual: format!("{}-dimensional array", other.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_store(dir: &tempfile::TempDir) -> DatasetStore {
        let store = DatasetStore::new(dir.path());
        store.initialize().unwrap();
        store
    }

    #[test]
    fn test_initialize_creates_empty_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);
        let dataset = store.load().unwrap();
        assert!(dataset.is_empty());
        assert_eq!(store.counts().unwrap(), (0, 0));
    }

    #[test]
    fn test_initialize_never_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);
        store.append(&[1, 2, 3], Label::Empty).unwrap();

        // A second initialize must leave the data alone
        store.initialize().unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_single_event_growth() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);

        let feature = vec![9u8; 12];
        assert_eq!(store.append(&feature, Label::Empty).unwrap(), 1);

        let dataset = store.load().unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.feature_len(), 12);
        assert_eq!(dataset.labels(), &[Label::Empty]);
    }

    #[test]
    fn test_three_events_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);

        for (i, label) in [Label::Empty, Label::GoldenCookie, Label::Effect]
            .into_iter()
            .enumerate()
        {
            let feature = vec![i as u8; 6];
            assert_eq!(store.append(&feature, label).unwrap(), i + 1);
        }

        let dataset = store.load().unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.labels(),
            &[Label::Empty, Label::GoldenCookie, Label::Effect]
        );
        assert_eq!(dataset.feature(0), &[0; 6]);
        assert_eq!(dataset.feature(2), &[2; 6]);
    }

    #[test]
    fn test_round_trip_is_bit_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);

        let feature: Vec<u8> = (0..=255).collect();
        store.append(&feature, Label::GoldenCookie).unwrap();

        let dataset = store.load().unwrap();
        assert_eq!(dataset.feature(0), feature.as_slice());
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("nowhere"));
        assert!(matches!(store.load().unwrap_err(), Error::NotFound(_)));
    }

    #[test]
    fn test_append_never_initializes() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        let err = store.append(&[1, 2], Label::Empty).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_feature_length_drift_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);
        store.append(&[1, 2, 3, 4], Label::Empty).unwrap();

        let err = store.append_feature(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_crash_between_appends_detected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);
        store.append(&[5, 5], Label::Effect).unwrap();

        // Simulated crash: the feature write landed, the label write did not
        store.append_feature(&[6, 6]).unwrap();
        assert_eq!(store.counts().unwrap(), (2, 1));

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::CorruptStore { .. }));
    }

    #[test]
    fn test_unknown_label_code_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh_store(&dir);
        store.append(&[1], Label::Empty).unwrap();

        // Overwrite the labels file with an out-of-range code
        npy::write_u8_array(store.labels_path(), &[1], &[7]).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::CorruptStore { .. }));
    }
}
