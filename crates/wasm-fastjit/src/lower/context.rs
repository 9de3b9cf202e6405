use crate::ir::{Block, IrInstruction, RegKind, RegPool, VReg};
use crate::{Error, Result};

/// Per-function compilation state for the lowering stage.
///
/// Owns the register pool, the current basic block, the typed value stack
/// mirroring the WASM operand stack, and the shared comparison-flag
/// register. One context belongs to exactly one function compilation on
/// one thread; no lowering routine retains it beyond its invocation.
#[derive(Debug)]
pub struct CompileContext {
    regs: RegPool,
    block: Block,
    stack: Vec<VReg>,
    cmp_reg: VReg,
}

impl CompileContext {
    #[must_use]
    pub fn new() -> Self {
        let mut regs = RegPool::new();
        let cmp_reg = regs.alloc(RegKind::I32);
        Self {
            regs,
            block: Block::new(),
            stack: Vec::new(),
            cmp_reg,
        }
    }

    pub fn alloc(&mut self, kind: RegKind) -> VReg {
        self.regs.alloc(kind)
    }

    pub fn emit(&mut self, instr: IrInstruction) {
        self.block.emit(instr);
    }

    /// The shared comparison-flag register, written by `Cmp` and read by
    /// `TrapIf`. One per context, so parallel function compilations on
    /// different threads never alias it.
    #[must_use]
    pub const fn cmp_reg(&self) -> VReg {
        self.cmp_reg
    }

    pub fn push(&mut self, reg: VReg) {
        self.stack.push(reg);
    }

    /// Pop the top of the value stack, checking its kind.
    ///
    /// A mismatch or underflow is a defect in a lowering routine (operand
    /// kinds were validated upstream); it aborts the function's lowering.
    pub fn pop(&mut self, kind: RegKind) -> Result<VReg> {
        let reg = self.stack.pop().ok_or(Error::StackUnderflow)?;
        if reg.kind() != kind {
            return Err(Error::KindMismatch {
                expected: kind,
                found: reg.kind(),
            });
        }
        Ok(reg)
    }

    #[must_use]
    pub fn stack(&self) -> &[VReg] {
        &self.stack
    }

    #[must_use]
    pub fn block(&self) -> &Block {
        &self.block
    }

    /// Finalize the function's IR, consuming the context. On a failed
    /// compilation the driver drops the context instead, discarding the
    /// partial block wholesale.
    #[must_use]
    pub fn finish(self) -> Block {
        self.block
    }
}

impl Default for CompileContext {
    fn default() -> Self {
        Self::new()
    }
}
