//! Lowering routines for the WASM numeric-conversion operator family.
//!
//! Each routine pops its declared operands from the value stack, emits
//! trap checks or saturation clamps as required, emits the conversion
//! itself, and pushes exactly one typed result. Trapping and saturating
//! truncations share the same boundary constants and differ only in
//! policy: guard-and-trap versus clamp.

use crate::ir::{Cond, ExceptionCode, IrInstruction, NativeHelper, RegKind, VReg};
use crate::{Error, Result};

use super::context::CompileContext;
use super::helpers::emit_helper_call;
use super::trap::emit_trap_if;

/// Valid-range boundaries for f32 truncation, per signedness and target
/// width. The bounds are the exact representable f32 values one ULP
/// outside the valid integer range: trapping lowering traps on
/// `value <= min` or `value >= max`, saturating lowering clamps into
/// `[min, max]` before converting.
const fn f32_trunc_bounds(signed: bool, to_i64: bool) -> (f32, f32) {
    match (signed, to_i64) {
        (true, false) => (-2_147_483_904.0, 2_147_483_648.0),
        (false, false) => (-1.0, 4_294_967_296.0),
        (true, true) => (-9_223_373_136_366_403_584.0, 9_223_372_036_854_775_808.0),
        (false, true) => (-1.0, 18_446_744_073_709_551_616.0),
    }
}

/// Valid-range boundaries for f64 truncation; see [`f32_trunc_bounds`].
const fn f64_trunc_bounds(signed: bool, to_i64: bool) -> (f64, f64) {
    match (signed, to_i64) {
        (true, false) => (-2_147_483_649.0, 2_147_483_648.0),
        (false, false) => (-1.0, 4_294_967_296.0),
        (true, true) => (-9_223_372_036_854_777_856.0, 9_223_372_036_854_775_808.0),
        (false, true) => (-1.0, 18_446_744_073_709_551_616.0),
    }
}

fn f32_const(ctx: &mut CompileContext, value: f32) -> VReg {
    let dst = ctx.alloc(RegKind::F32);
    ctx.emit(IrInstruction::F32Const { dst, value });
    dst
}

fn f64_const(ctx: &mut CompileContext, value: f64) -> VReg {
    let dst = ctx.alloc(RegKind::F64);
    ctx.emit(IrInstruction::F64Const { dst, value });
    dst
}

/// Trap checks for a trapping truncation: NaN raises
/// invalid-conversion-to-integer, out-of-range raises integer-overflow.
/// The range compares never see NaN because the NaN check traps first.
fn emit_trunc_guards(
    ctx: &mut CompileContext,
    is_nan: NativeHelper,
    value: VReg,
    min: VReg,
    max: VReg,
) -> Result<()> {
    let nan_ret = ctx.alloc(RegKind::I32);
    emit_helper_call(ctx, is_nan, nan_ret, &[value])?;
    let one = ctx.alloc(RegKind::I32);
    ctx.emit(IrInstruction::I32Const { dst: one, value: 1 });
    emit_trap_if(
        ctx,
        ExceptionCode::InvalidConversionToInteger,
        Cond::Eq,
        nan_ret,
        one,
    )?;

    emit_trap_if(ctx, ExceptionCode::IntegerOverflow, Cond::GeS, min, value)?;
    emit_trap_if(ctx, ExceptionCode::IntegerOverflow, Cond::GeS, value, max)?;
    Ok(())
}

/// Clamp `value` into `[min, max]` for a saturating truncation. Min/max
/// propagate NaN, so a NaN input flows through to the (total) convert
/// instruction and yields 0 there.
fn emit_f32_clamp(ctx: &mut CompileContext, value: VReg, min: VReg, max: VReg) -> VReg {
    let lo = ctx.alloc(RegKind::F32);
    ctx.emit(IrInstruction::F32Max {
        dst: lo,
        lhs: value,
        rhs: min,
    });
    let clamped = ctx.alloc(RegKind::F32);
    ctx.emit(IrInstruction::F32Min {
        dst: clamped,
        lhs: lo,
        rhs: max,
    });
    clamped
}

fn emit_f64_clamp(ctx: &mut CompileContext, value: VReg, min: VReg, max: VReg) -> VReg {
    let lo = ctx.alloc(RegKind::F64);
    ctx.emit(IrInstruction::F64Max {
        dst: lo,
        lhs: value,
        rhs: min,
    });
    let clamped = ctx.alloc(RegKind::F64);
    ctx.emit(IrInstruction::F64Min {
        dst: clamped,
        lhs: lo,
        rhs: max,
    });
    clamped
}

pub fn lower_i32_wrap_i64(ctx: &mut CompileContext) -> Result<()> {
    let num = ctx.pop(RegKind::I64)?;
    let res = ctx.alloc(RegKind::I32);
    ctx.emit(IrInstruction::I64ToI32 { dst: res, src: num });
    ctx.push(res);
    Ok(())
}

pub fn lower_i32_trunc_f32(ctx: &mut CompileContext, signed: bool, saturating: bool) -> Result<()> {
    let mut value = ctx.pop(RegKind::F32)?;
    let (min, max) = f32_trunc_bounds(signed, false);
    let min = f32_const(ctx, min);
    let max = f32_const(ctx, max);

    if saturating {
        value = emit_f32_clamp(ctx, value, min, max);
    } else {
        emit_trunc_guards(ctx, NativeHelper::IsNanF32, value, min, max)?;
    }

    let res = ctx.alloc(RegKind::I32);
    if signed {
        ctx.emit(IrInstruction::F32ToI32S {
            dst: res,
            src: value,
        });
    } else {
        ctx.emit(IrInstruction::F32ToU32 {
            dst: res,
            src: value,
        });
    }
    ctx.push(res);
    Ok(())
}

pub fn lower_i32_trunc_f64(ctx: &mut CompileContext, signed: bool, saturating: bool) -> Result<()> {
    let mut value = ctx.pop(RegKind::F64)?;
    let (min, max) = f64_trunc_bounds(signed, false);
    let min = f64_const(ctx, min);
    let max = f64_const(ctx, max);

    if saturating {
        value = emit_f64_clamp(ctx, value, min, max);
    } else {
        emit_trunc_guards(ctx, NativeHelper::IsNanF64, value, min, max)?;
    }

    let res = ctx.alloc(RegKind::I32);
    if signed {
        ctx.emit(IrInstruction::F64ToI32S {
            dst: res,
            src: value,
        });
    } else {
        ctx.emit(IrInstruction::F64ToU32 {
            dst: res,
            src: value,
        });
    }
    ctx.push(res);
    Ok(())
}

/// f32 to i64 truncation. The signed case has a direct instruction; the
/// unsigned case has none on all targets, so after the usual guards or
/// clamps the conversion itself goes through the `f32_to_u64` helper.
pub fn lower_i64_trunc_f32(ctx: &mut CompileContext, signed: bool, saturating: bool) -> Result<()> {
    let mut value = ctx.pop(RegKind::F32)?;
    let (min, max) = f32_trunc_bounds(signed, true);
    let min = f32_const(ctx, min);
    let max = f32_const(ctx, max);

    if saturating {
        value = emit_f32_clamp(ctx, value, min, max);
    } else {
        emit_trunc_guards(ctx, NativeHelper::IsNanF32, value, min, max)?;
    }

    let res = ctx.alloc(RegKind::I64);
    if signed {
        ctx.emit(IrInstruction::F32ToI64S {
            dst: res,
            src: value,
        });
    } else {
        emit_helper_call(ctx, NativeHelper::F32ToU64, res, &[value])?;
    }
    ctx.push(res);
    Ok(())
}

/// f64 to i64 truncation; see [`lower_i64_trunc_f32`].
pub fn lower_i64_trunc_f64(ctx: &mut CompileContext, signed: bool, saturating: bool) -> Result<()> {
    let mut value = ctx.pop(RegKind::F64)?;
    let (min, max) = f64_trunc_bounds(signed, true);
    let min = f64_const(ctx, min);
    let max = f64_const(ctx, max);

    if saturating {
        value = emit_f64_clamp(ctx, value, min, max);
    } else {
        emit_trunc_guards(ctx, NativeHelper::IsNanF64, value, min, max)?;
    }

    let res = ctx.alloc(RegKind::I64);
    if signed {
        ctx.emit(IrInstruction::F64ToI64S {
            dst: res,
            src: value,
        });
    } else {
        emit_helper_call(ctx, NativeHelper::F64ToU64, res, &[value])?;
    }
    ctx.push(res);
    Ok(())
}

pub fn lower_i64_extend_i32(ctx: &mut CompileContext, signed: bool) -> Result<()> {
    let num = ctx.pop(RegKind::I32)?;
    let res = ctx.alloc(RegKind::I64);
    if signed {
        ctx.emit(IrInstruction::I32ToI64 { dst: res, src: num });
    } else {
        ctx.emit(IrInstruction::U32ToI64 { dst: res, src: num });
    }
    ctx.push(res);
    Ok(())
}

/// `i32.extend8_s` / `i32.extend16_s`: narrow to the given width, then
/// sign-extend back to 32 bits. Any other width is a decoder-side defect.
pub fn lower_i32_extend(ctx: &mut CompileContext, bitwidth: u8) -> Result<()> {
    let value = ctx.pop(RegKind::I32)?;
    let tmp = ctx.alloc(RegKind::I32);
    let res = ctx.alloc(RegKind::I32);

    match bitwidth {
        8 => {
            ctx.emit(IrInstruction::I32ToI8 {
                dst: tmp,
                src: value,
            });
            ctx.emit(IrInstruction::I8ToI32 { dst: res, src: tmp });
        }
        16 => {
            ctx.emit(IrInstruction::I32ToI16 {
                dst: tmp,
                src: value,
            });
            ctx.emit(IrInstruction::I16ToI32 { dst: res, src: tmp });
        }
        _ => {
            return Err(Error::Internal(format!(
                "unsupported i32 sign-extension width: {bitwidth}"
            )));
        }
    }

    ctx.push(res);
    Ok(())
}

/// `i64.extend8_s` / `i64.extend16_s` / `i64.extend32_s`.
pub fn lower_i64_extend(ctx: &mut CompileContext, bitwidth: u8) -> Result<()> {
    let value = ctx.pop(RegKind::I64)?;

    let res = match bitwidth {
        8 => {
            let tmp = ctx.alloc(RegKind::I64);
            let res = ctx.alloc(RegKind::I64);
            ctx.emit(IrInstruction::I64ToI8 {
                dst: tmp,
                src: value,
            });
            ctx.emit(IrInstruction::I8ToI64 { dst: res, src: tmp });
            res
        }
        16 => {
            let tmp = ctx.alloc(RegKind::I64);
            let res = ctx.alloc(RegKind::I64);
            ctx.emit(IrInstruction::I64ToI16 {
                dst: tmp,
                src: value,
            });
            ctx.emit(IrInstruction::I16ToI64 { dst: res, src: tmp });
            res
        }
        32 => {
            let tmp = ctx.alloc(RegKind::I32);
            let res = ctx.alloc(RegKind::I64);
            ctx.emit(IrInstruction::I64ToI32 {
                dst: tmp,
                src: value,
            });
            ctx.emit(IrInstruction::I32ToI64 { dst: res, src: tmp });
            res
        }
        _ => {
            return Err(Error::Internal(format!(
                "unsupported i64 sign-extension width: {bitwidth}"
            )));
        }
    };

    ctx.push(res);
    Ok(())
}

pub fn lower_f32_convert_i32(ctx: &mut CompileContext, signed: bool) -> Result<()> {
    let value = ctx.pop(RegKind::I32)?;
    let res = ctx.alloc(RegKind::F32);
    if signed {
        ctx.emit(IrInstruction::I32ToF32S {
            dst: res,
            src: value,
        });
    } else {
        ctx.emit(IrInstruction::U32ToF32 {
            dst: res,
            src: value,
        });
    }
    ctx.push(res);
    Ok(())
}

/// i64 to f32. No unsigned variant of the convert instruction exists, so
/// the unsigned case calls the bit-pattern-correct `u64_to_f32` helper.
pub fn lower_f32_convert_i64(ctx: &mut CompileContext, signed: bool) -> Result<()> {
    let value = ctx.pop(RegKind::I64)?;
    let res = ctx.alloc(RegKind::F32);
    if signed {
        ctx.emit(IrInstruction::I64ToF32S {
            dst: res,
            src: value,
        });
    } else {
        emit_helper_call(ctx, NativeHelper::U64ToF32, res, &[value])?;
    }
    ctx.push(res);
    Ok(())
}

pub fn lower_f64_convert_i32(ctx: &mut CompileContext, signed: bool) -> Result<()> {
    let value = ctx.pop(RegKind::I32)?;
    let res = ctx.alloc(RegKind::F64);
    if signed {
        ctx.emit(IrInstruction::I32ToF64S {
            dst: res,
            src: value,
        });
    } else {
        ctx.emit(IrInstruction::U32ToF64 {
            dst: res,
            src: value,
        });
    }
    ctx.push(res);
    Ok(())
}

pub fn lower_f64_convert_i64(ctx: &mut CompileContext, signed: bool) -> Result<()> {
    let value = ctx.pop(RegKind::I64)?;
    let res = ctx.alloc(RegKind::F64);
    if signed {
        ctx.emit(IrInstruction::I64ToF64S {
            dst: res,
            src: value,
        });
    } else {
        emit_helper_call(ctx, NativeHelper::U64ToF64, res, &[value])?;
    }
    ctx.push(res);
    Ok(())
}

pub fn lower_f32_demote_f64(ctx: &mut CompileContext) -> Result<()> {
    let value = ctx.pop(RegKind::F64)?;
    let res = ctx.alloc(RegKind::F32);
    ctx.emit(IrInstruction::F64ToF32 {
        dst: res,
        src: value,
    });
    ctx.push(res);
    Ok(())
}

pub fn lower_f64_promote_f32(ctx: &mut CompileContext) -> Result<()> {
    let value = ctx.pop(RegKind::F32)?;
    let res = ctx.alloc(RegKind::F64);
    ctx.emit(IrInstruction::F32ToF64 {
        dst: res,
        src: value,
    });
    ctx.push(res);
    Ok(())
}

pub fn lower_i32_reinterpret_f32(ctx: &mut CompileContext) -> Result<()> {
    let value = ctx.pop(RegKind::F32)?;
    let res = ctx.alloc(RegKind::I32);
    ctx.emit(IrInstruction::F32CastI32 {
        dst: res,
        src: value,
    });
    ctx.push(res);
    Ok(())
}

pub fn lower_i64_reinterpret_f64(ctx: &mut CompileContext) -> Result<()> {
    let value = ctx.pop(RegKind::F64)?;
    let res = ctx.alloc(RegKind::I64);
    ctx.emit(IrInstruction::F64CastI64 {
        dst: res,
        src: value,
    });
    ctx.push(res);
    Ok(())
}

pub fn lower_f32_reinterpret_i32(ctx: &mut CompileContext) -> Result<()> {
    let value = ctx.pop(RegKind::I32)?;
    let res = ctx.alloc(RegKind::F32);
    ctx.emit(IrInstruction::I32CastF32 {
        dst: res,
        src: value,
    });
    ctx.push(res);
    Ok(())
}

pub fn lower_f64_reinterpret_i64(ctx: &mut CompileContext) -> Result<()> {
    let value = ctx.pop(RegKind::I64)?;
    let res = ctx.alloc(RegKind::F64);
    ctx.emit(IrInstruction::I64CastF64 {
        dst: res,
        src: value,
    });
    ctx.push(res);
    Ok(())
}
