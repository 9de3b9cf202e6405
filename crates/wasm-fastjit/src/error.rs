use crate::ir::RegKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("WASM parsing error: {0}")]
    WasmParse(#[from] wasmparser::BinaryReaderError),

    #[error("Unsupported WASM operator: {0}")]
    Unsupported(String),

    #[error("Register kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: RegKind, found: RegKind },

    #[error("Value stack underflow")]
    StackUnderflow,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
