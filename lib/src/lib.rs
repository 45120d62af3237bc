//! Decode the bytecode stored in JVM `Code` attributes
//!
//! The interesting entry points live in [`jvm::code`]: an [`InstructionReader`] walks a method's
//! `code` array and yields typed [`Instruction`]s, while [`decode`] pushes the same instructions
//! into a [`BytecodeVisitor`]. Operands which refer to the constant pool are resolved (and their
//! kind checked) through a [`ConstantPoolView`].
//!
//! [`InstructionReader`]: jvm::code::InstructionReader
//! [`Instruction`]: jvm::code::Instruction
//! [`decode`]: jvm::code::decode
//! [`BytecodeVisitor`]: jvm::code::BytecodeVisitor
//! [`ConstantPoolView`]: jvm::class_file::ConstantPoolView

pub mod jvm;
pub mod util;
