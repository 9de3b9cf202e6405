mod context;
mod conversion;
mod helpers;
mod opcode;
mod trap;

pub use context::CompileContext;
pub use helpers::{emit_helper_call, native};
pub use opcode::{ConvOp, lower_conversion};
pub use trap::emit_trap_if;
