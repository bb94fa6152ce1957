//! Stream protocol violations.

/// Framing violations detected on a link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// A beat with `first` arrived while a frame was still open.
    #[error("interleaved frame on link {link}: first beat inside an open frame")]
    Interleaved {
        /// Link description, `source -> sink`.
        link: String,
    },

    /// A beat without `first` arrived while no frame was open.
    #[error("orphan beat on link {link}: no open frame")]
    Orphan {
        /// Link description, `source -> sink`.
        link: String,
    },
}
