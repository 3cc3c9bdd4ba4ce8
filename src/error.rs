/// Errors surfaced by the decoder and the name map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed stream: {reason}")]
    MalformedStream { reason: String },

    #[error("incomplete stream: {reason}")]
    IncompleteStream { reason: String },

    #[error("signal has no recorded names")]
    NameNotFound,
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedStream {
            reason: reason.into(),
        }
    }

    pub(crate) fn incomplete(reason: impl Into<String>) -> Self {
        Self::IncompleteStream {
            reason: reason.into(),
        }
    }
}
