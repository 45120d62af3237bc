//! Bytecode decoding
//!
//! ### Structure
//!
//! The [list of bytecode instructions][0] maps onto [`Opcode`] (just the opcode byte) and
//! [`Instruction`] (the opcode along with its decoded operands). Decoding walks the `code` array
//! of a [`CodeBuffer`](crate::jvm::class_file::CodeBuffer) front to back, one instruction at a
//! time, and there are two ways to consume the result:
//!
//!   - [`InstructionReader`] is an iterator of `(pc, instruction)` pairs
//!   - [`decode`] pushes the same pairs into a [`BytecodeVisitor`]
//!
//! Either way, the first malformed instruction ends decoding.
//!
//! ### Example
//!
//! ```
//! use jvm_bytecode::jvm::class_file::{CodeBuffer, ConstantPool};
//! use jvm_bytecode::jvm::code::{decode, Instruction};
//!
//! let pool = ConstantPool::new();
//! let code = CodeBuffer::new(1, 0, vec![0x03, 0xac]); // iconst_0; ireturn
//!
//! let mut seen = vec![];
//! decode(&code, &pool, &mut |pc: u32, instruction: &Instruction| {
//!     seen.push(format!("{}: {}", pc, instruction));
//! })
//! .unwrap();
//! assert_eq!(seen, vec!["0: iconst_0", "1: ireturn"]);
//! ```
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-6.html#jvms-6.5

mod decoder;
mod disassembler;
mod instructions;
mod opcode;
mod visitor;

pub use decoder::*;
pub use disassembler::*;
pub use instructions::*;
pub use opcode::*;
pub use visitor::*;
