/// Result alias used throughout the crate.
pub type GifweaveResult<T> = Result<T, GifweaveError>;

/// Every failure the crate reports.
#[derive(thiserror::Error, Debug)]
pub enum GifweaveError {
    /// A source image could not be opened or decoded.
    #[error("decode error: '{name}': {reason}")]
    Decode {
        /// Display name of the source.
        name: String,
        /// Decoder message.
        reason: String,
    },

    /// Invalid options, inputs or preconditions.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A sequence position outside `[0, len)`.
    #[error("index error: index {index} is out of range for length {len}")]
    Index {
        /// Requested position.
        index: usize,
        /// Sequence length at the time of the call.
        len: usize,
    },

    /// An item failed during export; the whole export was abandoned.
    #[error("export error: failed to process '{name}': {source}")]
    Export {
        /// Display name of the failing item.
        name: String,
        /// What went wrong with it.
        #[source]
        source: Box<GifweaveError>,
    },

    /// The GIF encoder or output file failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// A [`CancelToken`](crate::CancelToken) was triggered.
    #[error("export cancelled")]
    Cancelled,

    /// Anything else, usually IO with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifweaveError {
    /// Build a [`GifweaveError::Decode`].
    pub fn decode(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`GifweaveError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`GifweaveError::Index`].
    pub fn index(index: usize, len: usize) -> Self {
        Self::Index { index, len }
    }

    /// Wrap `source` as the failure of item `name`.
    pub fn export(name: impl Into<String>, source: GifweaveError) -> Self {
        Self::Export {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Build a [`GifweaveError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Display name of the source item this error is about, if any.
    pub fn item_name(&self) -> Option<&str> {
        match self {
            Self::Decode { name, .. } | Self::Export { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
