mod atomic;
mod dedup;

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PersistenceError;
use crate::model::{ArticleRecord, CategoryBuckets};

pub use atomic::write_atomic;
pub use dedup::DedupSet;

/// JSON file holding the full collection of work done so far.
///
/// `T` is either `Vec<ArticleRecord>` (records mode) or `CategoryBuckets`
/// (buckets mode). A missing file loads as `T::default()`.
#[derive(Debug, Clone)]
pub struct CheckpointStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

pub type RecordStore = CheckpointStore<Vec<ArticleRecord>>;
pub type BucketStore = CheckpointStore<CategoryBuckets>;

impl<T> CheckpointStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<T, PersistenceError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(PersistenceError::io(&self.path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Decode { path: self.path.clone(), source })
    }

    pub fn save(&self, value: &T) -> Result<(), PersistenceError> {
        let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Encode { source })?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes)
    }
}

impl RecordStore {
    /// Load records and build the dedup set in one pass.
    pub fn load_with_keys(&self) -> Result<(Vec<ArticleRecord>, DedupSet), PersistenceError> {
        let records = self.load()?;
        let seen = DedupSet::from_records(&records);
        Ok((records, seen))
    }
}
