use crate::jvm::code::Instruction;

/// Receiver of decoded instructions
///
/// The decoder calls `visit` once per instruction, in program order. Visitors that only care about
/// a handful of instructions `match` on those and ignore the rest. Any closure taking a `pc` and an
/// instruction is also a visitor.
pub trait BytecodeVisitor<'p> {
    fn visit(&mut self, pc: u32, instruction: &Instruction<'p>);
}

/// Visitor which ignores everything (useful for just validating a code array)
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopVisitor;

impl<'p> BytecodeVisitor<'p> for NoopVisitor {
    fn visit(&mut self, _pc: u32, _instruction: &Instruction<'p>) {}
}

impl<'p, F> BytecodeVisitor<'p> for F
where
    F: FnMut(u32, &Instruction<'p>),
{
    fn visit(&mut self, pc: u32, instruction: &Instruction<'p>) {
        self(pc, instruction)
    }
}
