use crate::dataset::Dataset;
use crate::error::AccessorError;
use crate::path_key::PathKey;

/// Trait for reading a dataset from disk or from a generator.
pub trait DatasetReader {
    /// Opens and parses the dataset at `file_path`.
    fn read(&self, file_path: &str) -> anyhow::Result<Dataset>;
}

type KeyFn<T> = dyn Fn(&T) -> Result<PathKey, AccessorError> + Send + Sync;
type ValueFn<T> = dyn Fn(&T) -> Result<f64, AccessorError> + Send + Sync;

/// Key and value accessors for a record type.
///
/// The hierarchy pipeline never looks inside records directly; it goes
/// through these two functions. Either may fail on a malformed record.
pub struct Accessors<T> {
    key: Box<KeyFn<T>>,
    value: Box<ValueFn<T>>,
}

impl<T> Accessors<T> {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Fn(&T) -> Result<PathKey, AccessorError> + Send + Sync + 'static,
        V: Fn(&T) -> Result<f64, AccessorError> + Send + Sync + 'static,
    {
        Accessors {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Replaces the value accessor, keeping the key accessor.
    pub fn with_value<V>(self, value: V) -> Self
    where
        V: Fn(&T) -> Result<f64, AccessorError> + Send + Sync + 'static,
    {
        Accessors {
            key: self.key,
            value: Box::new(value),
        }
    }

    /// Key of `record`.
    pub fn key(&self, record: &T) -> Result<PathKey, AccessorError> {
        (self.key)(record)
    }

    /// Own (non-aggregated) value of `record`.
    pub fn value(&self, record: &T) -> Result<f64, AccessorError> {
        (self.value)(record)
    }
}

impl<T> std::fmt::Debug for Accessors<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessors").finish_non_exhaustive()
    }
}
