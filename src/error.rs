use crate::path_key::PathKey;

/// Failures while turning flat records into a hierarchy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HierarchyError {
    /// Two input records resolved to the same key.
    #[error("duplicate key '{key}'")]
    DuplicateKey { key: PathKey },

    /// A node's parent key is absent from the node set. Ancestor synthesis
    /// guarantees this cannot happen, so seeing it is a bug in this crate.
    #[error("stratify failed: parent '{parent}' of '{key}' is missing")]
    Stratify { key: PathKey, parent: PathKey },
}

/// Failure of a key or value accessor on a single record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessorError {
    #[error("record has no {field}")]
    Missing { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, HierarchyError>;
