//! Persistent per-sequence label storage.
//!
//! Labels are stored as a compressed NumPy archive (`.npz`) holding a single
//! `label` array of shape `(N, 1)`, so `numpy.load(path)["label"]` reads them
//! back directly.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek};
use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayD};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError, ReadableElement};
use tempfile::NamedTempFile;

use crate::constants::{LABEL_ARRAY, LABEL_EXTENSION};
use crate::error::LabelStoreError;
use crate::model::{AttributeCode, LabelVector};

/// Label file of `id` below `attr_root`.
pub fn label_path(attr_root: &Path, id: &str) -> PathBuf {
    attr_root.join(format!("{}.{}", id, LABEL_EXTENSION))
}

/// Storage backend for label vectors.
///
/// Implementors provide raw reads and writes; length alignment is shared.
pub trait LabelStorage: Send {
    /// Read the stored vector, `Ok(None)` when nothing is stored at `path`.
    fn read(&self, path: &Path) -> Result<Option<LabelVector>, LabelStoreError>;

    /// Replace the stored vector. Either the whole vector is written or the
    /// previous contents stay in place.
    fn write(&self, path: &Path, labels: &LabelVector) -> Result<(), LabelStoreError>;

    /// Load labels for a sequence of `expected_len` frames.
    ///
    /// Missing storage yields all zeros; a shorter stored vector is padded
    /// with zeros. A stored vector at least `expected_len` long is returned
    /// as stored.
    fn load(&self, path: &Path, expected_len: usize) -> Result<LabelVector, LabelStoreError> {
        let Some(mut labels) = self.read(path)? else {
            log::info!(
                "No label file at {:?}, starting with {} unset frames",
                path,
                expected_len
            );
            return Ok(LabelVector::zeros(expected_len));
        };

        let stored_len = labels.len();
        if stored_len < expected_len {
            log::info!(
                "Only {} of {} frames annotated in {:?}, padding with zeros",
                stored_len,
                expected_len,
                path
            );
            labels.pad_to(expected_len);
        } else if stored_len > expected_len {
            log::warn!(
                "Label file {:?} holds {} entries for {} frames; keeping all of them",
                path,
                stored_len,
                expected_len
            );
        }

        Ok(labels)
    }

    /// Persist labels to `path`.
    fn save(&self, path: &Path, labels: &LabelVector) -> Result<(), LabelStoreError> {
        self.write(path, labels)?;
        log::info!("Saved {} labels to {:?}", labels.len(), path);
        Ok(())
    }
}

/// Label storage in compressed `.npz` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpzLabelStore;

impl NpzLabelStore {
    pub fn new() -> Self {
        Self
    }

    /// Read the label array as `T`, `Ok(None)` when it is stored in another dtype.
    fn read_as<T, R>(
        path: &Path,
        npz: &mut NpzReader<R>,
    ) -> Result<Option<ArrayD<T>>, LabelStoreError>
    where
        T: ReadableElement,
        R: Read + Seek,
    {
        match npz.by_name(LABEL_ARRAY) {
            Ok(array) => Ok(Some(array)),
            Err(ReadNpzError::Npy(e)) => {
                log::trace!(
                    "Label array of {:?} is not {}: {}",
                    path,
                    std::any::type_name::<T>(),
                    e
                );
                Ok(None)
            }
            Err(e) => Err(LabelStoreError::malformed(
                path,
                format!("missing '{}' array: {}", LABEL_ARRAY, e),
            )),
        }
    }

    /// Decode the label array, trying the dtypes label files are written in.
    fn decode<R: Read + Seek>(
        path: &Path,
        npz: &mut NpzReader<R>,
    ) -> Result<ArrayD<i64>, LabelStoreError> {
        if let Some(array) = Self::read_as::<i64, _>(path, npz)? {
            return Ok(array);
        }
        if let Some(array) = Self::read_as::<i32, _>(path, npz)? {
            return Ok(array.mapv(i64::from));
        }
        if let Some(array) = Self::read_as::<u8, _>(path, npz)? {
            return Ok(array.mapv(i64::from));
        }
        if let Some(array) = Self::read_as::<f64, _>(path, npz)? {
            if array.iter().all(|v| v.fract() == 0.0) {
                return Ok(array.mapv(|v| v as i64));
            }
            return Err(LabelStoreError::malformed(path, "non-integral label values"));
        }
        Err(LabelStoreError::malformed(path, "unsupported label dtype"))
    }

    fn to_labels(path: &Path, array: ArrayD<i64>) -> Result<LabelVector, LabelStoreError> {
        let shape = array.shape();
        if !matches!(shape, [_] | [_, 1]) {
            return Err(LabelStoreError::malformed(
                path,
                format!("expected an (N, 1) label array, found shape {:?}", shape),
            ));
        }

        array
            .iter()
            .map(|&v| AttributeCode::try_from(v))
            .collect::<Result<LabelVector, _>>()
            .map_err(|e| LabelStoreError::malformed(path, e.to_string()))
    }
}

impl LabelStorage for NpzLabelStore {
    fn read(&self, path: &Path) -> Result<Option<LabelVector>, LabelStoreError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LabelStoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut npz = NpzReader::new(file)
            .map_err(|e| LabelStoreError::malformed(path, format!("not an npz archive: {}", e)))?;
        let array = Self::decode(path, &mut npz)?;

        let labels = Self::to_labels(path, array)?;
        log::debug!("Read {} labels from {:?}", labels.len(), path);
        Ok(Some(labels))
    }

    fn write(&self, path: &Path, labels: &LabelVector) -> Result<(), LabelStoreError> {
        let column = Array2::from_shape_vec((labels.len(), 1), labels.to_raw())
            .map_err(|e| LabelStoreError::write_failure(path, e))?;

        write_atomically(path, |file| {
            let mut npz = NpzWriter::new_compressed(file);
            npz.add_array(LABEL_ARRAY, &column)?;
            npz.finish().map(drop)
        })
    }
}

/// Replace `path` with what `encode` writes, or leave it untouched.
///
/// The content goes to a temporary file in the same directory, is synced, and
/// is then renamed over the target.
fn write_atomically<F, E>(path: &Path, encode: F) -> Result<(), LabelStoreError>
where
    F: FnOnce(&mut File) -> Result<(), E>,
    E: ToString,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| LabelStoreError::write_failure(path, e))?;

    // Write next to the target so the final rename stays on one filesystem
    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| LabelStoreError::write_failure(path, e))?;

    encode(tmp.as_file_mut()).map_err(|e| LabelStoreError::write_failure(path, e))?;

    tmp.as_file()
        .sync_all()
        .map_err(|e| LabelStoreError::write_failure(path, e))?;
    tmp.persist(path)
        .map_err(|e| LabelStoreError::write_failure(path, e.error))?;

    Ok(())
}
