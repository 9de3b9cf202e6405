mod display;
mod instruction;

pub use instruction::{Cond, ExceptionCode, IrInstruction, NativeHelper};

/// Numeric kind of a virtual register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegKind {
    I32,
    I64,
    F32,
    F64,
}

/// A typed virtual register, valid only within the compilation that
/// allocated it. Identity is unique per [`RegPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VReg {
    id: u32,
    kind: RegKind,
}

impl VReg {
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> RegKind {
        self.kind
    }
}

/// Allocates virtual registers for one function compilation.
///
/// There is no deallocation primitive: registers are retired wholesale
/// when the function's IR is finalized or discarded.
#[derive(Debug, Default)]
pub struct RegPool {
    next_id: u32,
}

impl RegPool {
    #[must_use]
    pub const fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn alloc(&mut self, kind: RegKind) -> VReg {
        let id = self.next_id;
        self.next_id += 1;
        VReg { id, kind }
    }

    #[must_use]
    pub const fn allocated(&self) -> u32 {
        self.next_id
    }
}

/// Append-only instruction list for the current basic block.
///
/// Instructions are kept in program order; operand kinds are checked
/// against each variant's declared signature as a debug assertion (a
/// mismatch is a defect in a lowering routine, not recoverable input).
#[derive(Debug, Default)]
pub struct Block {
    instructions: Vec<IrInstruction>,
}

impl Block {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    pub fn emit(&mut self, instr: IrInstruction) {
        debug_assert!(instr.kinds_ok(), "operand kind mismatch: {instr}");
        self.instructions.push(instr);
    }

    #[must_use]
    pub fn instructions(&self) -> &[IrInstruction] {
        &self.instructions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
