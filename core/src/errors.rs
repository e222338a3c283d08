use deepfreeze_types::Path;
use thiserror::Error;

use crate::classify::UnsupportedKind;
use crate::heap::HeapError;

/// Why a freeze call failed. Any error aborts the whole call; no partial result is returned.
#[derive(Debug, Error)]
pub enum FreezeError {
    /// A value with no immutable representation was found at `path`.
    #[error("unsupported type `{kind}` at {path}")]
    UnsupportedType { kind: UnsupportedKind, path: Path },
    /// A direct constructor was handed a value of the wrong shape.
    #[error("invalid argument: expected a {expected}, found {found}")]
    InvalidArgument {
        expected: &'static str,
        found: &'static str,
    },
    #[error("nesting deeper than the configured limit of {limit} at {path}")]
    DepthExceeded { limit: usize, path: Path },
    #[error(transparent)]
    Heap(#[from] HeapError),
}

impl FreezeError {
    /// Where in the input the failure happened, when it is tied to a position.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            FreezeError::UnsupportedType { path, .. } | FreezeError::DepthExceeded { path, .. } => {
                Some(path)
            }
            FreezeError::InvalidArgument { .. } | FreezeError::Heap(_) => None,
        }
    }
}
