use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("length mismatch for `{operand}`: expected {expected}, got {actual}")]
    LengthMismatch {
        operand: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidOverride { var: &'static str, value: String },
}

pub type KernelResult<T> = Result<T, KernelError>;

/// Check that `operand` holds exactly `expected` elements.
#[inline]
pub(crate) fn check_len(operand: &'static str, expected: usize, actual: usize) -> KernelResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(KernelError::LengthMismatch { operand, expected, actual })
    }
}
