use wasmparser::Operator;

use crate::Result;

use super::context::CompileContext;
use super::conversion;

/// The closed set of WASM numeric-conversion opcodes handled by this
/// stage, with their static parameters. One variant per operator family;
/// the exhaustive match in [`lower_conversion`] keeps the dispatch checked
/// at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvOp {
    I32WrapI64,
    I32TruncF32 { signed: bool, saturating: bool },
    I32TruncF64 { signed: bool, saturating: bool },
    I64TruncF32 { signed: bool, saturating: bool },
    I64TruncF64 { signed: bool, saturating: bool },
    I64ExtendI32 { signed: bool },
    I32Extend { bitwidth: u8 },
    I64Extend { bitwidth: u8 },
    F32ConvertI32 { signed: bool },
    F32ConvertI64 { signed: bool },
    F64ConvertI32 { signed: bool },
    F64ConvertI64 { signed: bool },
    F32DemoteF64,
    F64PromoteF32,
    I32ReinterpretF32,
    I64ReinterpretF64,
    F32ReinterpretI32,
    F64ReinterpretI64,
}

impl ConvOp {
    /// Map a decoded operator to its conversion opcode, or `None` if the
    /// operator belongs to another instruction family.
    #[must_use]
    pub fn from_operator(op: &Operator) -> Option<Self> {
        let conv = match op {
            Operator::I32WrapI64 => ConvOp::I32WrapI64,

            Operator::I32TruncF32S => ConvOp::I32TruncF32 {
                signed: true,
                saturating: false,
            },
            Operator::I32TruncF32U => ConvOp::I32TruncF32 {
                signed: false,
                saturating: false,
            },
            Operator::I32TruncSatF32S => ConvOp::I32TruncF32 {
                signed: true,
                saturating: true,
            },
            Operator::I32TruncSatF32U => ConvOp::I32TruncF32 {
                signed: false,
                saturating: true,
            },

            Operator::I32TruncF64S => ConvOp::I32TruncF64 {
                signed: true,
                saturating: false,
            },
            Operator::I32TruncF64U => ConvOp::I32TruncF64 {
                signed: false,
                saturating: false,
            },
            Operator::I32TruncSatF64S => ConvOp::I32TruncF64 {
                signed: true,
                saturating: true,
            },
            Operator::I32TruncSatF64U => ConvOp::I32TruncF64 {
                signed: false,
                saturating: true,
            },

            Operator::I64TruncF32S => ConvOp::I64TruncF32 {
                signed: true,
                saturating: false,
            },
            Operator::I64TruncF32U => ConvOp::I64TruncF32 {
                signed: false,
                saturating: false,
            },
            Operator::I64TruncSatF32S => ConvOp::I64TruncF32 {
                signed: true,
                saturating: true,
            },
            Operator::I64TruncSatF32U => ConvOp::I64TruncF32 {
                signed: false,
                saturating: true,
            },

            Operator::I64TruncF64S => ConvOp::I64TruncF64 {
                signed: true,
                saturating: false,
            },
            Operator::I64TruncF64U => ConvOp::I64TruncF64 {
                signed: false,
                saturating: false,
            },
            Operator::I64TruncSatF64S => ConvOp::I64TruncF64 {
                signed: true,
                saturating: true,
            },
            Operator::I64TruncSatF64U => ConvOp::I64TruncF64 {
                signed: false,
                saturating: true,
            },

            Operator::I64ExtendI32S => ConvOp::I64ExtendI32 { signed: true },
            Operator::I64ExtendI32U => ConvOp::I64ExtendI32 { signed: false },
            Operator::I32Extend8S => ConvOp::I32Extend { bitwidth: 8 },
            Operator::I32Extend16S => ConvOp::I32Extend { bitwidth: 16 },
            Operator::I64Extend8S => ConvOp::I64Extend { bitwidth: 8 },
            Operator::I64Extend16S => ConvOp::I64Extend { bitwidth: 16 },
            Operator::I64Extend32S => ConvOp::I64Extend { bitwidth: 32 },

            Operator::F32ConvertI32S => ConvOp::F32ConvertI32 { signed: true },
            Operator::F32ConvertI32U => ConvOp::F32ConvertI32 { signed: false },
            Operator::F32ConvertI64S => ConvOp::F32ConvertI64 { signed: true },
            Operator::F32ConvertI64U => ConvOp::F32ConvertI64 { signed: false },
            Operator::F64ConvertI32S => ConvOp::F64ConvertI32 { signed: true },
            Operator::F64ConvertI32U => ConvOp::F64ConvertI32 { signed: false },
            Operator::F64ConvertI64S => ConvOp::F64ConvertI64 { signed: true },
            Operator::F64ConvertI64U => ConvOp::F64ConvertI64 { signed: false },

            Operator::F32DemoteF64 => ConvOp::F32DemoteF64,
            Operator::F64PromoteF32 => ConvOp::F64PromoteF32,

            Operator::I32ReinterpretF32 => ConvOp::I32ReinterpretF32,
            Operator::I64ReinterpretF64 => ConvOp::I64ReinterpretF64,
            Operator::F32ReinterpretI32 => ConvOp::F32ReinterpretI32,
            Operator::F64ReinterpretI64 => ConvOp::F64ReinterpretI64,

            _ => return None,
        };
        Some(conv)
    }
}

/// Lower one conversion opcode into the context's current block.
///
/// On error the caller must discard the whole function's IR; the block
/// may hold a partially lowered instruction sequence.
pub fn lower_conversion(ctx: &mut CompileContext, op: ConvOp) -> Result<()> {
    tracing::trace!(?op, "lowering conversion");

    match op {
        ConvOp::I32WrapI64 => conversion::lower_i32_wrap_i64(ctx),
        ConvOp::I32TruncF32 { signed, saturating } => {
            conversion::lower_i32_trunc_f32(ctx, signed, saturating)
        }
        ConvOp::I32TruncF64 { signed, saturating } => {
            conversion::lower_i32_trunc_f64(ctx, signed, saturating)
        }
        ConvOp::I64TruncF32 { signed, saturating } => {
            conversion::lower_i64_trunc_f32(ctx, signed, saturating)
        }
        ConvOp::I64TruncF64 { signed, saturating } => {
            conversion::lower_i64_trunc_f64(ctx, signed, saturating)
        }
        ConvOp::I64ExtendI32 { signed } => conversion::lower_i64_extend_i32(ctx, signed),
        ConvOp::I32Extend { bitwidth } => conversion::lower_i32_extend(ctx, bitwidth),
        ConvOp::I64Extend { bitwidth } => conversion::lower_i64_extend(ctx, bitwidth),
        ConvOp::F32ConvertI32 { signed } => conversion::lower_f32_convert_i32(ctx, signed),
        ConvOp::F32ConvertI64 { signed } => conversion::lower_f32_convert_i64(ctx, signed),
        ConvOp::F64ConvertI32 { signed } => conversion::lower_f64_convert_i32(ctx, signed),
        ConvOp::F64ConvertI64 { signed } => conversion::lower_f64_convert_i64(ctx, signed),
        ConvOp::F32DemoteF64 => conversion::lower_f32_demote_f64(ctx),
        ConvOp::F64PromoteF32 => conversion::lower_f64_promote_f32(ctx),
        ConvOp::I32ReinterpretF32 => conversion::lower_i32_reinterpret_f32(ctx),
        ConvOp::I64ReinterpretF64 => conversion::lower_i64_reinterpret_f64(ctx),
        ConvOp::F32ReinterpretI32 => conversion::lower_f32_reinterpret_i32(ctx),
        ConvOp::F64ReinterpretI64 => conversion::lower_f64_reinterpret_i64(ctx),
    }
}
