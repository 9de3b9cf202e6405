use crate::ir::{IrInstruction, NativeHelper, VReg};
use crate::{Error, Result};

use super::CompileContext;

/// Emit a call to a native helper routine, placing its return value in
/// `dst`.
///
/// Used strictly for operations with no direct IR instruction: NaN
/// classification and conversions between u64 and floating point. The
/// generated call passes the active execution-environment handle as a
/// hidden leading argument, so the helper observes the same instance
/// state as inline-emitted code; the handle never appears as an IR
/// operand. Argument and result kinds are checked against the helper's
/// declared signature; a mismatch is a defect in the calling routine.
pub fn emit_helper_call(
    ctx: &mut CompileContext,
    helper: NativeHelper,
    dst: VReg,
    args: &[VReg],
) -> Result<()> {
    if dst.kind() != helper.result_kind() {
        return Err(Error::KindMismatch {
            expected: helper.result_kind(),
            found: dst.kind(),
        });
    }
    let expected = helper.arg_kinds();
    if args.len() != expected.len() {
        return Err(Error::Internal(format!(
            "helper {helper} takes {} args, got {}",
            expected.len(),
            args.len()
        )));
    }
    for (arg, kind) in args.iter().zip(expected) {
        if arg.kind() != *kind {
            return Err(Error::KindMismatch {
                expected: *kind,
                found: arg.kind(),
            });
        }
    }

    ctx.emit(IrInstruction::CallHelper {
        helper,
        dst,
        args: args.to_vec(),
    });
    Ok(())
}

/// The helper implementations linked into generated code.
///
/// These are the routines [`NativeHelper`] variants resolve to at
/// call-emission time, and the reference the test evaluator executes.
/// Rust's numeric casts give exactly the required behavior: `u64` to
/// float is correctly rounded, float to `u64` truncates with saturation
/// and maps NaN to 0.
pub mod native {
    #[must_use]
    pub fn is_nan_f32(value: f32) -> i32 {
        i32::from(value.is_nan())
    }

    #[must_use]
    pub fn is_nan_f64(value: f64) -> i32 {
        i32::from(value.is_nan())
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn u64_to_f32(value: u64) -> f32 {
        value as f32
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn u64_to_f64(value: u64) -> f64 {
        value as f64
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn f32_to_u64(value: f32) -> u64 {
        value as u64
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn f64_to_u64(value: f64) -> u64 {
        value as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RegKind;

    #[test]
    fn test_signature_checked() {
        let mut ctx = CompileContext::new();
        let arg = ctx.alloc(RegKind::F32);
        let dst = ctx.alloc(RegKind::I32);

        emit_helper_call(&mut ctx, NativeHelper::IsNanF32, dst, &[arg]).expect("valid call");

        // Wrong argument kind.
        let bad_arg = ctx.alloc(RegKind::F64);
        assert!(emit_helper_call(&mut ctx, NativeHelper::IsNanF32, dst, &[bad_arg]).is_err());

        // Wrong result kind.
        let bad_dst = ctx.alloc(RegKind::F64);
        assert!(emit_helper_call(&mut ctx, NativeHelper::IsNanF32, bad_dst, &[arg]).is_err());

        // Wrong arity.
        assert!(emit_helper_call(&mut ctx, NativeHelper::IsNanF32, dst, &[]).is_err());
    }

    #[test]
    fn test_native_u64_boundaries() {
        assert_eq!(native::u64_to_f64(0), 0.0);
        assert_eq!(native::u64_to_f64(1 << 63), 9_223_372_036_854_775_808.0);
        assert_eq!(native::u64_to_f64(u64::MAX), 18_446_744_073_709_551_616.0);
        assert_eq!(native::u64_to_f32(u64::MAX), 18_446_744_073_709_551_616.0);
    }

    #[test]
    fn test_native_f64_to_u64_total() {
        assert_eq!(native::f64_to_u64(f64::NAN), 0);
        assert_eq!(native::f64_to_u64(-0.5), 0);
        assert_eq!(native::f64_to_u64(18_446_744_073_709_551_616.0), u64::MAX);
    }
}
