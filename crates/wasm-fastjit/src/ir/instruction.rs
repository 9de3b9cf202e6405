use super::{RegKind, VReg};

/// Condition tested by [`IrInstruction::TrapIf`] against the three-way
/// comparison code left in the flag register by [`IrInstruction::Cmp`].
///
/// The code is -1 / 0 / 1 for less / equal / greater, and 2 for an
/// unordered float comparison (either operand NaN). Conditions match
/// explicit code sets, so an unordered compare never satisfies `GeS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Eq,
    Ne,
    LtS,
    GtS,
    LeS,
    GeS,
}

impl Cond {
    /// Whether a comparison code satisfies this condition.
    #[must_use]
    pub fn holds(&self, code: i32) -> bool {
        match self {
            Cond::Eq => code == 0,
            Cond::Ne => code == -1 || code == 1,
            Cond::LtS => code == -1,
            Cond::GtS => code == 1,
            Cond::LeS => code == -1 || code == 0,
            Cond::GeS => code == 0 || code == 1,
        }
    }
}

/// Trap category raised by the taken edge of a [`IrInstruction::TrapIf`].
///
/// Carried into the generated code; it selects the exception the runtime's
/// unwinding path reports when the branch is taken at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionCode {
    IntegerOverflow,
    InvalidConversionToInteger,
}

/// The fixed set of native helper routines reachable from generated code.
///
/// Helpers cover exactly the operations with no direct IR instruction:
/// NaN classification and conversions between u64 and floating point.
/// The emitted call passes the active execution-environment handle as a
/// hidden leading argument ahead of the listed operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeHelper {
    IsNanF32,
    IsNanF64,
    U64ToF32,
    U64ToF64,
    F32ToU64,
    F64ToU64,
}

impl NativeHelper {
    /// Declared argument kinds of the helper (excluding the hidden
    /// execution-environment handle).
    #[must_use]
    pub const fn arg_kinds(&self) -> &'static [RegKind] {
        match self {
            NativeHelper::IsNanF32 | NativeHelper::F32ToU64 => &[RegKind::F32],
            NativeHelper::IsNanF64 | NativeHelper::F64ToU64 => &[RegKind::F64],
            NativeHelper::U64ToF32 | NativeHelper::U64ToF64 => &[RegKind::I64],
        }
    }

    /// Declared result kind of the helper.
    #[must_use]
    pub const fn result_kind(&self) -> RegKind {
        match self {
            NativeHelper::IsNanF32 | NativeHelper::IsNanF64 => RegKind::I32,
            NativeHelper::U64ToF32 => RegKind::F32,
            NativeHelper::U64ToF64 => RegKind::F64,
            NativeHelper::F32ToU64 | NativeHelper::F64ToU64 => RegKind::I64,
        }
    }
}

/// Register-based IR instruction set for the conversion lowering stage.
///
/// Each variant declares the kinds of its operand and result registers;
/// `kinds_ok` checks them. Float-to-int converts are total with WASM
/// `trunc_sat` semantics (NaN yields 0, out-of-range saturates): trapping
/// lowering guards them so they only see in-range values, saturating
/// lowering relies on the totality for its clamped edge cases. Float
/// min/max are NaN-propagating (IEEE 754-2019 minimum/maximum).
#[derive(Debug, Clone, PartialEq)]
pub enum IrInstruction {
    // === Constants ===
    I32Const { dst: VReg, value: i32 },
    I64Const { dst: VReg, value: i64 },
    F32Const { dst: VReg, value: f32 },
    F64Const { dst: VReg, value: f64 },

    // === Integer wrap / extend ===
    I64ToI32 { dst: VReg, src: VReg },
    I32ToI64 { dst: VReg, src: VReg },
    U32ToI64 { dst: VReg, src: VReg },

    // === Narrowing and sign-extending within a width ===
    I32ToI8 { dst: VReg, src: VReg },
    I8ToI32 { dst: VReg, src: VReg },
    I32ToI16 { dst: VReg, src: VReg },
    I16ToI32 { dst: VReg, src: VReg },
    I64ToI8 { dst: VReg, src: VReg },
    I8ToI64 { dst: VReg, src: VReg },
    I64ToI16 { dst: VReg, src: VReg },
    I16ToI64 { dst: VReg, src: VReg },

    // === Float to int (total, trunc_sat semantics) ===
    F32ToI32S { dst: VReg, src: VReg },
    F32ToU32 { dst: VReg, src: VReg },
    F64ToI32S { dst: VReg, src: VReg },
    F64ToU32 { dst: VReg, src: VReg },
    F32ToI64S { dst: VReg, src: VReg },
    F64ToI64S { dst: VReg, src: VReg },

    // === Int to float ===
    I32ToF32S { dst: VReg, src: VReg },
    U32ToF32 { dst: VReg, src: VReg },
    I32ToF64S { dst: VReg, src: VReg },
    U32ToF64 { dst: VReg, src: VReg },
    I64ToF32S { dst: VReg, src: VReg },
    I64ToF64S { dst: VReg, src: VReg },

    // === Float demote / promote ===
    F64ToF32 { dst: VReg, src: VReg },
    F32ToF64 { dst: VReg, src: VReg },

    // === Bit-pattern reinterpret casts ===
    F32CastI32 { dst: VReg, src: VReg },
    I32CastF32 { dst: VReg, src: VReg },
    F64CastI64 { dst: VReg, src: VReg },
    I64CastF64 { dst: VReg, src: VReg },

    // === Float min / max (NaN-propagating) ===
    F32Min { dst: VReg, lhs: VReg, rhs: VReg },
    F32Max { dst: VReg, lhs: VReg, rhs: VReg },
    F64Min { dst: VReg, lhs: VReg, rhs: VReg },
    F64Max { dst: VReg, lhs: VReg, rhs: VReg },

    // === Comparison and trap edge ===
    Cmp { dst: VReg, lhs: VReg, rhs: VReg },
    TrapIf { cond: Cond, cmp: VReg, code: ExceptionCode },

    // === Native helper call ===
    CallHelper { helper: NativeHelper, dst: VReg, args: Vec<VReg> },
}

impl IrInstruction {
    /// Operand and result kinds match the variant's declared signature.
    ///
    /// A violation is a compiler-internal defect, not user-facing input;
    /// callers assert on this rather than propagating it as an error.
    #[must_use]
    #[allow(clippy::too_many_lines, clippy::match_same_arms)]
    pub fn kinds_ok(&self) -> bool {
        use RegKind::{F32, F64, I32, I64};

        let unary = |dst: &VReg, src: &VReg, dk: RegKind, sk: RegKind| {
            dst.kind() == dk && src.kind() == sk
        };

        match self {
            IrInstruction::I32Const { dst, .. } => dst.kind() == I32,
            IrInstruction::I64Const { dst, .. } => dst.kind() == I64,
            IrInstruction::F32Const { dst, .. } => dst.kind() == F32,
            IrInstruction::F64Const { dst, .. } => dst.kind() == F64,

            IrInstruction::I64ToI32 { dst, src } => unary(dst, src, I32, I64),
            IrInstruction::I32ToI64 { dst, src } | IrInstruction::U32ToI64 { dst, src } => {
                unary(dst, src, I64, I32)
            }

            IrInstruction::I32ToI8 { dst, src }
            | IrInstruction::I8ToI32 { dst, src }
            | IrInstruction::I32ToI16 { dst, src }
            | IrInstruction::I16ToI32 { dst, src } => unary(dst, src, I32, I32),
            IrInstruction::I64ToI8 { dst, src }
            | IrInstruction::I8ToI64 { dst, src }
            | IrInstruction::I64ToI16 { dst, src }
            | IrInstruction::I16ToI64 { dst, src } => unary(dst, src, I64, I64),

            IrInstruction::F32ToI32S { dst, src } | IrInstruction::F32ToU32 { dst, src } => {
                unary(dst, src, I32, F32)
            }
            IrInstruction::F64ToI32S { dst, src } | IrInstruction::F64ToU32 { dst, src } => {
                unary(dst, src, I32, F64)
            }
            IrInstruction::F32ToI64S { dst, src } => unary(dst, src, I64, F32),
            IrInstruction::F64ToI64S { dst, src } => unary(dst, src, I64, F64),

            IrInstruction::I32ToF32S { dst, src } | IrInstruction::U32ToF32 { dst, src } => {
                unary(dst, src, F32, I32)
            }
            IrInstruction::I32ToF64S { dst, src } | IrInstruction::U32ToF64 { dst, src } => {
                unary(dst, src, F64, I32)
            }
            IrInstruction::I64ToF32S { dst, src } => unary(dst, src, F32, I64),
            IrInstruction::I64ToF64S { dst, src } => unary(dst, src, F64, I64),

            IrInstruction::F64ToF32 { dst, src } => unary(dst, src, F32, F64),
            IrInstruction::F32ToF64 { dst, src } => unary(dst, src, F64, F32),

            IrInstruction::F32CastI32 { dst, src } => unary(dst, src, I32, F32),
            IrInstruction::I32CastF32 { dst, src } => unary(dst, src, F32, I32),
            IrInstruction::F64CastI64 { dst, src } => unary(dst, src, I64, F64),
            IrInstruction::I64CastF64 { dst, src } => unary(dst, src, F64, I64),

            IrInstruction::F32Min { dst, lhs, rhs } | IrInstruction::F32Max { dst, lhs, rhs } => {
                dst.kind() == F32 && lhs.kind() == F32 && rhs.kind() == F32
            }
            IrInstruction::F64Min { dst, lhs, rhs } | IrInstruction::F64Max { dst, lhs, rhs } => {
                dst.kind() == F64 && lhs.kind() == F64 && rhs.kind() == F64
            }

            IrInstruction::Cmp { dst, lhs, rhs } => {
                dst.kind() == I32 && lhs.kind() == rhs.kind()
            }
            IrInstruction::TrapIf { cmp, .. } => cmp.kind() == I32,

            IrInstruction::CallHelper { helper, dst, args } => {
                dst.kind() == helper.result_kind()
                    && args.len() == helper.arg_kinds().len()
                    && args
                        .iter()
                        .zip(helper.arg_kinds())
                        .all(|(a, k)| a.kind() == *k)
            }
        }
    }
}
