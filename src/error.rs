use std::{io, path::PathBuf};
use thiserror::Error;

/// Result alias used throughout the loader.
pub type Result<T> = std::result::Result<T, MapError>;

/// Coarse classification of a [`MapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file could not be read or is not well-formed XML.
    DocumentUnparsable,
    /// The document root (or another required node) is absent.
    RequiredNodeMissing,
    /// A relative reference could not be rebased against its document.
    PathResolutionFailed,
    /// Layer data could not be decoded or decompressed.
    DecodeFailed,
}

/// Error type for TMX / TSX loading.
#[derive(Debug, Error)]
pub enum MapError {
    /// The document could not be read from disk.
    #[error("could not read {}: {source}", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed XML.
    #[error("could not parse {}: {source}", path.display())]
    Xml {
        /// Offending document.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: roxmltree::Error,
    },

    /// The document does not have the expected root node.
    #[error("Could not parse document {}. Node not found: {expected}", path.display())]
    MissingNode {
        /// Offending document.
        path: PathBuf,
        /// Tag name that was expected at the root.
        expected: &'static str,
    },

    /// `base` has no directory component to rebase `relative` against.
    #[error("could not find a base directory in {base} to resolve {relative}")]
    PathResolution {
        /// The reference as written in the document.
        relative: String,
        /// Path of the referencing document.
        base: String,
    },

    /// Encoded layer data was not valid base64.
    #[error("invalid base64 layer data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decompression or GID reassembly failed.
    #[error("failed to decode {codec} layer data: {reason}")]
    Decode {
        /// Codec that failed (`zlib`, `gzip`, `zstd`, `csv`).
        codec: &'static str,
        /// What went wrong.
        reason: String,
    },
}

impl MapError {
    /// Maps the error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapError::Io { .. } | MapError::Xml { .. } => ErrorKind::DocumentUnparsable,
            MapError::MissingNode { .. } => ErrorKind::RequiredNodeMissing,
            MapError::PathResolution { .. } => ErrorKind::PathResolutionFailed,
            MapError::Base64(_) | MapError::Decode { .. } => ErrorKind::DecodeFailed,
        }
    }

    pub(crate) fn decode(codec: &'static str, reason: impl Into<String>) -> Self {
        MapError::Decode {
            codec,
            reason: reason.into(),
        }
    }
}
