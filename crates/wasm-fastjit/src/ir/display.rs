use std::fmt;

use super::{Cond, ExceptionCode, IrInstruction, NativeHelper, RegKind, VReg};

impl fmt::Display for RegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegKind::I32 => write!(f, "i32"),
            RegKind::I64 => write!(f, "i64"),
            RegKind::F32 => write!(f, "f32"),
            RegKind::F64 => write!(f, "f64"),
        }
    }
}

impl fmt::Display for VReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}:{}", self.id(), self.kind())
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cond::Eq => write!(f, "eq"),
            Cond::Ne => write!(f, "ne"),
            Cond::LtS => write!(f, "lt_s"),
            Cond::GtS => write!(f, "gt_s"),
            Cond::LeS => write!(f, "le_s"),
            Cond::GeS => write!(f, "ge_s"),
        }
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionCode::IntegerOverflow => write!(f, "integer-overflow"),
            ExceptionCode::InvalidConversionToInteger => {
                write!(f, "invalid-conversion-to-integer")
            }
        }
    }
}

impl fmt::Display for NativeHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeHelper::IsNanF32 => write!(f, "is_nan_f32"),
            NativeHelper::IsNanF64 => write!(f, "is_nan_f64"),
            NativeHelper::U64ToF32 => write!(f, "u64_to_f32"),
            NativeHelper::U64ToF64 => write!(f, "u64_to_f64"),
            NativeHelper::F32ToU64 => write!(f, "f32_to_u64"),
            NativeHelper::F64ToU64 => write!(f, "f64_to_u64"),
        }
    }
}

impl fmt::Display for IrInstruction {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use IrInstruction as I;

        let unary = |f: &mut fmt::Formatter<'_>, name: &str, dst: &VReg, src: &VReg| {
            write!(f, "{dst} = {name} {src}")
        };

        match self {
            I::I32Const { dst, value } => write!(f, "{dst} = i32.const {value}"),
            I::I64Const { dst, value } => write!(f, "{dst} = i64.const {value}"),
            I::F32Const { dst, value } => write!(f, "{dst} = f32.const {value}"),
            I::F64Const { dst, value } => write!(f, "{dst} = f64.const {value}"),

            I::I64ToI32 { dst, src } => unary(f, "i64_to_i32", dst, src),
            I::I32ToI64 { dst, src } => unary(f, "i32_to_i64", dst, src),
            I::U32ToI64 { dst, src } => unary(f, "u32_to_i64", dst, src),

            I::I32ToI8 { dst, src } => unary(f, "i32_to_i8", dst, src),
            I::I8ToI32 { dst, src } => unary(f, "i8_to_i32", dst, src),
            I::I32ToI16 { dst, src } => unary(f, "i32_to_i16", dst, src),
            I::I16ToI32 { dst, src } => unary(f, "i16_to_i32", dst, src),
            I::I64ToI8 { dst, src } => unary(f, "i64_to_i8", dst, src),
            I::I8ToI64 { dst, src } => unary(f, "i8_to_i64", dst, src),
            I::I64ToI16 { dst, src } => unary(f, "i64_to_i16", dst, src),
            I::I16ToI64 { dst, src } => unary(f, "i16_to_i64", dst, src),

            I::F32ToI32S { dst, src } => unary(f, "f32_to_i32_s", dst, src),
            I::F32ToU32 { dst, src } => unary(f, "f32_to_u32", dst, src),
            I::F64ToI32S { dst, src } => unary(f, "f64_to_i32_s", dst, src),
            I::F64ToU32 { dst, src } => unary(f, "f64_to_u32", dst, src),
            I::F32ToI64S { dst, src } => unary(f, "f32_to_i64_s", dst, src),
            I::F64ToI64S { dst, src } => unary(f, "f64_to_i64_s", dst, src),

            I::I32ToF32S { dst, src } => unary(f, "i32_to_f32_s", dst, src),
            I::U32ToF32 { dst, src } => unary(f, "u32_to_f32", dst, src),
            I::I32ToF64S { dst, src } => unary(f, "i32_to_f64_s", dst, src),
            I::U32ToF64 { dst, src } => unary(f, "u32_to_f64", dst, src),
            I::I64ToF32S { dst, src } => unary(f, "i64_to_f32_s", dst, src),
            I::I64ToF64S { dst, src } => unary(f, "i64_to_f64_s", dst, src),

            I::F64ToF32 { dst, src } => unary(f, "f64_to_f32", dst, src),
            I::F32ToF64 { dst, src } => unary(f, "f32_to_f64", dst, src),

            I::F32CastI32 { dst, src } => unary(f, "f32_cast_i32", dst, src),
            I::I32CastF32 { dst, src } => unary(f, "i32_cast_f32", dst, src),
            I::F64CastI64 { dst, src } => unary(f, "f64_cast_i64", dst, src),
            I::I64CastF64 { dst, src } => unary(f, "i64_cast_f64", dst, src),

            I::F32Min { dst, lhs, rhs } => write!(f, "{dst} = f32.min {lhs}, {rhs}"),
            I::F32Max { dst, lhs, rhs } => write!(f, "{dst} = f32.max {lhs}, {rhs}"),
            I::F64Min { dst, lhs, rhs } => write!(f, "{dst} = f64.min {lhs}, {rhs}"),
            I::F64Max { dst, lhs, rhs } => write!(f, "{dst} = f64.max {lhs}, {rhs}"),

            I::Cmp { dst, lhs, rhs } => write!(f, "{dst} = cmp {lhs}, {rhs}"),
            I::TrapIf { cond, cmp, code } => write!(f, "trap_if.{cond} {cmp}, {code}"),

            I::CallHelper { helper, dst, args } => {
                write!(f, "{dst} = call {helper}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::RegPool;
    use super::*;

    #[test]
    fn test_display_formats() {
        let mut pool = RegPool::new();
        let dst = pool.alloc(RegKind::I32);
        let src = pool.alloc(RegKind::I64);
        assert_eq!(
            IrInstruction::I64ToI32 { dst, src }.to_string(),
            "%0:i32 = i64_to_i32 %1:i64"
        );

        let cmp = pool.alloc(RegKind::I32);
        assert_eq!(
            IrInstruction::TrapIf {
                cond: Cond::GeS,
                cmp,
                code: ExceptionCode::IntegerOverflow,
            }
            .to_string(),
            "trap_if.ge_s %2:i32, integer-overflow"
        );
    }
}
