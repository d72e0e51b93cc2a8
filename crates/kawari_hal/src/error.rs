//! Error types for bounded register operations.

/// Failures of the bounded polling routines.
///
/// The unbounded routines never fail; they spin until the hardware answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The persist busy bit stayed set for the whole budget.
    #[error("busy bit still set after {polls} polls, write to {addr:#06x} skipped")]
    Busy {
        /// Address the write was aimed at.
        addr: u16,
        /// Polls spent waiting.
        polls: u32,
    },

    /// No key press or switch change within the budget.
    #[error("no key or switch change after {polls} polls")]
    Timeout {
        /// Polls spent waiting.
        polls: u32,
    },
}

/// Result type for bounded register operations.
pub type Result<T> = core::result::Result<T, ProbeError>;
