use thiserror::Error;

/// Errors surfaced by the host-facing accessor and snapshot APIs.
///
/// Instruction dispatch has no error path: unassigned opcodes execute as
/// no-ops and bus accesses are infallible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid register identifier '{0}'")]
    InvalidRegister(String),
    #[error("snapshot truncated: expected at least {expected} bytes, found {found}")]
    SnapshotTruncated { expected: usize, found: usize },
    #[error("unsupported snapshot version {0}")]
    UnsupportedSnapshotVersion(u8),
}

pub type Result<T> = std::result::Result<T, CoreError>;
