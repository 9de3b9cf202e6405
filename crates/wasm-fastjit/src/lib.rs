//! Numeric-conversion lowering stage of a WASM JIT frontend.
//!
//! Translates the WebAssembly conversion operator family (wrap, extend,
//! trunc and trunc_sat, convert, demote/promote, reinterpret) into a
//! typed register-based IR, reproducing the exact trap and saturation
//! semantics the WASM specification mandates for the generated code.

#![allow(
    clippy::missing_errors_doc // error contracts are documented on the Error enum
)]

pub mod error;
pub mod ir;
pub mod lower;

/// Test harness module: a reference evaluator for emitted IR blocks.
///
/// Only available when running tests or when the `test-harness` feature
/// is enabled.
#[cfg(any(test, feature = "test-harness"))]
pub mod test_harness;

pub use error::{Error, Result};
pub use ir::{Block, Cond, ExceptionCode, IrInstruction, NativeHelper, RegKind, RegPool, VReg};
pub use lower::{CompileContext, ConvOp, lower_conversion};
