//! Error types for the collection.

use thiserror::Error;

/// Errors surfaced by collection operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// A field write referenced an id that is not in the collection.
    #[error("no such id: {0}")]
    NoSuchId(String),

    /// A traversal ran past its deadline and was cancelled.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// `set` was called with a field name list whose length does not match
    /// the value list.
    #[error("argument mismatch: {fields} fields, {values} values")]
    ArgumentMismatch { fields: usize, values: usize },
}

pub type Result<T> = std::result::Result<T, CollectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CollectionError::NoSuchId("truck1".to_string()).to_string(),
            "no such id: truck1"
        );
        assert_eq!(
            CollectionError::DeadlineExceeded.to_string(),
            "deadline exceeded"
        );
        assert_eq!(
            CollectionError::ArgumentMismatch {
                fields: 2,
                values: 3
            }
            .to_string(),
            "argument mismatch: 2 fields, 3 values"
        );
    }
}
