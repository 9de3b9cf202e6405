//! Test harness for wasm-fastjit unit tests.
//!
//! Provides a reference evaluator for emitted IR blocks so tests can
//! check the *runtime* behavior of lowered code (traps, saturation,
//! rounding) and not just instruction shapes, plus conveniences for
//! lowering a single conversion over a seeded operand.
//!
//! The evaluator implements the normative IR semantics the downstream
//! code generator must honor: float-to-int converts are total with
//! `trunc_sat` behavior, float min/max propagate NaN, and `Cmp` leaves a
//! three-way code with 2 for unordered.

#![allow(
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use std::collections::HashMap;

use crate::ir::{Block, ExceptionCode, IrInstruction, NativeHelper, RegKind, VReg};
use crate::lower::{CompileContext, ConvOp, lower_conversion, native};

/// A concrete value held by a virtual register during evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Value {
    pub fn kind(&self) -> RegKind {
        match self {
            Value::I32(_) => RegKind::I32,
            Value::I64(_) => RegKind::I64,
            Value::F32(_) => RegKind::F32,
            Value::F64(_) => RegKind::F64,
        }
    }

    pub fn unwrap_i32(self) -> i32 {
        match self {
            Value::I32(v) => v,
            other => panic!("expected i32 value, got {other:?}"),
        }
    }

    pub fn unwrap_i64(self) -> i64 {
        match self {
            Value::I64(v) => v,
            other => panic!("expected i64 value, got {other:?}"),
        }
    }

    pub fn unwrap_f32(self) -> f32 {
        match self {
            Value::F32(v) => v,
            other => panic!("expected f32 value, got {other:?}"),
        }
    }

    pub fn unwrap_f64(self) -> f64 {
        match self {
            Value::F64(v) => v,
            other => panic!("expected f64 value, got {other:?}"),
        }
    }
}

/// Executes an IR block over a register file.
///
/// Panics on malformed IR (undefined register read, kind mismatch); that
/// indicates a defect in a lowering routine, which is exactly what a test
/// should surface loudly.
#[derive(Debug, Default)]
pub struct Evaluator {
    regs: HashMap<u32, Value>,
}

fn min_propagating_f32(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.min(b)
    }
}

fn max_propagating_f32(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}

fn min_propagating_f64(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn max_propagating_f64(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, reg: VReg, value: Value) {
        assert_eq!(reg.kind(), value.kind(), "seeding {reg} with {value:?}");
        self.regs.insert(reg.id(), value);
    }

    pub fn get(&self, reg: VReg) -> Value {
        *self
            .regs
            .get(&reg.id())
            .unwrap_or_else(|| panic!("read of undefined register {reg}"))
    }

    fn get_i32(&self, reg: VReg) -> i32 {
        self.get(reg).unwrap_i32()
    }

    fn get_i64(&self, reg: VReg) -> i64 {
        self.get(reg).unwrap_i64()
    }

    fn get_f32(&self, reg: VReg) -> f32 {
        self.get(reg).unwrap_f32()
    }

    fn get_f64(&self, reg: VReg) -> f64 {
        self.get(reg).unwrap_f64()
    }

    /// Three-way comparison code: -1 / 0 / 1, or 2 for unordered.
    fn compare(&self, lhs: VReg, rhs: VReg) -> i32 {
        let ord = match (self.get(lhs), self.get(rhs)) {
            (Value::I32(a), Value::I32(b)) => a.partial_cmp(&b),
            (Value::I64(a), Value::I64(b)) => a.partial_cmp(&b),
            (Value::F32(a), Value::F32(b)) => a.partial_cmp(&b),
            (Value::F64(a), Value::F64(b)) => a.partial_cmp(&b),
            (a, b) => panic!("cmp of mismatched kinds: {a:?} vs {b:?}"),
        };
        match ord {
            Some(std::cmp::Ordering::Less) => -1,
            Some(std::cmp::Ordering::Equal) => 0,
            Some(std::cmp::Ordering::Greater) => 1,
            None => 2,
        }
    }

    /// Run the block to completion, or stop at the first taken trap edge.
    ///
    /// # Errors
    ///
    /// Returns the [`ExceptionCode`] of the taken trap edge.
    #[allow(clippy::too_many_lines)]
    pub fn run(&mut self, block: &Block) -> Result<(), ExceptionCode> {
        use IrInstruction as I;

        for instr in block.instructions() {
            match instr {
                I::I32Const { dst, value } => self.set(*dst, Value::I32(*value)),
                I::I64Const { dst, value } => self.set(*dst, Value::I64(*value)),
                I::F32Const { dst, value } => self.set(*dst, Value::F32(*value)),
                I::F64Const { dst, value } => self.set(*dst, Value::F64(*value)),

                I::I64ToI32 { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::I32(v as i32));
                }
                I::I32ToI64 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::I64(i64::from(v)));
                }
                I::U32ToI64 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::I64(i64::from(v as u32)));
                }

                I::I32ToI8 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::I32(v & 0xff));
                }
                I::I8ToI32 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::I32(i32::from(v as u8 as i8)));
                }
                I::I32ToI16 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::I32(v & 0xffff));
                }
                I::I16ToI32 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::I32(i32::from(v as u16 as i16)));
                }
                I::I64ToI8 { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::I64(v & 0xff));
                }
                I::I8ToI64 { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::I64(i64::from(v as u8 as i8)));
                }
                I::I64ToI16 { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::I64(v & 0xffff));
                }
                I::I16ToI64 { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::I64(i64::from(v as u16 as i16)));
                }

                I::F32ToI32S { dst, src } => {
                    let v = self.get_f32(*src);
                    self.set(*dst, Value::I32(v as i32));
                }
                I::F32ToU32 { dst, src } => {
                    let v = self.get_f32(*src);
                    self.set(*dst, Value::I32((v as u32) as i32));
                }
                I::F64ToI32S { dst, src } => {
                    let v = self.get_f64(*src);
                    self.set(*dst, Value::I32(v as i32));
                }
                I::F64ToU32 { dst, src } => {
                    let v = self.get_f64(*src);
                    self.set(*dst, Value::I32((v as u32) as i32));
                }
                I::F32ToI64S { dst, src } => {
                    let v = self.get_f32(*src);
                    self.set(*dst, Value::I64(v as i64));
                }
                I::F64ToI64S { dst, src } => {
                    let v = self.get_f64(*src);
                    self.set(*dst, Value::I64(v as i64));
                }

                I::I32ToF32S { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::F32(v as f32));
                }
                I::U32ToF32 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::F32((v as u32) as f32));
                }
                I::I32ToF64S { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::F64(f64::from(v)));
                }
                I::U32ToF64 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::F64(f64::from(v as u32)));
                }
                I::I64ToF32S { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::F32(v as f32));
                }
                I::I64ToF64S { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::F64(v as f64));
                }

                I::F64ToF32 { dst, src } => {
                    let v = self.get_f64(*src);
                    self.set(*dst, Value::F32(v as f32));
                }
                I::F32ToF64 { dst, src } => {
                    let v = self.get_f32(*src);
                    self.set(*dst, Value::F64(f64::from(v)));
                }

                I::F32CastI32 { dst, src } => {
                    let v = self.get_f32(*src);
                    self.set(*dst, Value::I32(v.to_bits() as i32));
                }
                I::I32CastF32 { dst, src } => {
                    let v = self.get_i32(*src);
                    self.set(*dst, Value::F32(f32::from_bits(v as u32)));
                }
                I::F64CastI64 { dst, src } => {
                    let v = self.get_f64(*src);
                    self.set(*dst, Value::I64(v.to_bits() as i64));
                }
                I::I64CastF64 { dst, src } => {
                    let v = self.get_i64(*src);
                    self.set(*dst, Value::F64(f64::from_bits(v as u64)));
                }

                I::F32Min { dst, lhs, rhs } => {
                    let v = min_propagating_f32(self.get_f32(*lhs), self.get_f32(*rhs));
                    self.set(*dst, Value::F32(v));
                }
                I::F32Max { dst, lhs, rhs } => {
                    let v = max_propagating_f32(self.get_f32(*lhs), self.get_f32(*rhs));
                    self.set(*dst, Value::F32(v));
                }
                I::F64Min { dst, lhs, rhs } => {
                    let v = min_propagating_f64(self.get_f64(*lhs), self.get_f64(*rhs));
                    self.set(*dst, Value::F64(v));
                }
                I::F64Max { dst, lhs, rhs } => {
                    let v = max_propagating_f64(self.get_f64(*lhs), self.get_f64(*rhs));
                    self.set(*dst, Value::F64(v));
                }

                I::Cmp { dst, lhs, rhs } => {
                    let code = self.compare(*lhs, *rhs);
                    self.set(*dst, Value::I32(code));
                }
                I::TrapIf { cond, cmp, code } => {
                    if cond.holds(self.get_i32(*cmp)) {
                        return Err(*code);
                    }
                }

                I::CallHelper { helper, dst, args } => {
                    let result = match helper {
                        NativeHelper::IsNanF32 => {
                            Value::I32(native::is_nan_f32(self.get_f32(args[0])))
                        }
                        NativeHelper::IsNanF64 => {
                            Value::I32(native::is_nan_f64(self.get_f64(args[0])))
                        }
                        NativeHelper::U64ToF32 => {
                            Value::F32(native::u64_to_f32(self.get_i64(args[0]) as u64))
                        }
                        NativeHelper::U64ToF64 => {
                            Value::F64(native::u64_to_f64(self.get_i64(args[0]) as u64))
                        }
                        NativeHelper::F32ToU64 => {
                            Value::I64(native::f32_to_u64(self.get_f32(args[0])) as i64)
                        }
                        NativeHelper::F64ToU64 => {
                            Value::I64(native::f64_to_u64(self.get_f64(args[0])) as i64)
                        }
                    };
                    self.set(*dst, result);
                }
            }
        }
        Ok(())
    }
}

/// A single conversion lowered over one seeded operand register.
#[derive(Debug)]
pub struct LoweredUnary {
    pub block: Block,
    pub input: VReg,
    pub result: VReg,
}

/// Lower `op` in a fresh context with one operand of `input_kind` on the
/// value stack. Panics if lowering fails or leaves the stack without a
/// result (both are defects the calling test should surface).
pub fn lower_unary(op: ConvOp, input_kind: RegKind) -> LoweredUnary {
    let mut ctx = CompileContext::new();
    let input = ctx.alloc(input_kind);
    ctx.push(input);
    lower_conversion(&mut ctx, op).unwrap_or_else(|e| panic!("lowering {op:?} failed: {e}"));
    assert_eq!(ctx.stack().len(), 1, "conversion must be 1-in-1-out");
    let result = ctx.stack()[0];
    LoweredUnary {
        block: ctx.finish(),
        input,
        result,
    }
}

/// Lower `op` and execute the emitted block on `input`, returning the
/// pushed result or the trap the generated code would raise.
///
/// # Errors
///
/// Returns the [`ExceptionCode`] of the taken trap edge.
pub fn eval_unary(op: ConvOp, input: Value) -> Result<Value, ExceptionCode> {
    let lowered = lower_unary(op, input.kind());
    let mut evaluator = Evaluator::new();
    evaluator.set(lowered.input, input);
    evaluator.run(&lowered.block)?;
    Ok(evaluator.get(lowered.result))
}
