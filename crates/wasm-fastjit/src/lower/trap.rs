use crate::Result;
use crate::ir::{Cond, ExceptionCode, IrInstruction, VReg};

use super::CompileContext;

/// Emit a comparison into the context's flag register followed by a
/// conditional branch whose taken edge raises `code` at execution time.
///
/// The fall-through edge continues normal lowering. `lhs` and `rhs` must
/// be registers of the same kind; the emitted `Cmp` leaves a three-way
/// code that `cond` is tested against.
pub fn emit_trap_if(
    ctx: &mut CompileContext,
    code: ExceptionCode,
    cond: Cond,
    lhs: VReg,
    rhs: VReg,
) -> Result<()> {
    let cmp = ctx.cmp_reg();
    ctx.emit(IrInstruction::Cmp { dst: cmp, lhs, rhs });
    ctx.emit(IrInstruction::TrapIf { cond, cmp, code });
    Ok(())
}
