use crate::jvm::class_file::{ConstantIndex, ConstantKind, ConstantKinds};
use std::fmt;

/// Reasons a `Code` attribute (or the bytecode inside it) is rejected
///
/// Every variant is fatal to the decode that produced it: the decoder never skips over or
/// resynchronizes after a bad instruction. Program counters are relative to the start of the
/// method's code array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassFormatError {
    /// A constant pool index is out of range, lands on an unusable slot, or refers to an entry of
    /// a kind which is not allowed where it is used
    InvalidConstantPoolEntry {
        index: ConstantIndex,

        /// Kind of the entry at `index` (`None` if there is no usable entry there)
        found: Option<ConstantKind>,

        /// Kinds that would have been accepted
        expected: ConstantKinds,
    },

    /// The fourth operand byte of `invokeinterface` must be zero
    InvalidArgumentsForInvokeinterface { pc: u32, reserved: u8 },

    /// Unknown opcode, or a switch with impossible bounds
    InvalidBytecode { pc: u32, opcode: u8 },

    /// Code array ends in the middle of an instruction
    TruncatedCode {
        pc: u32,

        /// Bytes the instruction needs (counting from its opcode)
        needed: usize,

        /// Bytes left in the code array (counting from the opcode)
        available: usize,
    },

    /// Attribute body ends before all of its fields have been read
    TruncatedAttribute(&'static str),
}

impl fmt::Display for ClassFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassFormatError::InvalidConstantPoolEntry {
                index,
                found: Some(found),
                expected,
            } => write!(
                f,
                "constant pool entry {} is {} but expected {}",
                index, found, expected
            ),
            ClassFormatError::InvalidConstantPoolEntry {
                index, found: None, ..
            } => write!(f, "constant pool index {} has no usable entry", index),
            ClassFormatError::InvalidArgumentsForInvokeinterface { pc, reserved } => write!(
                f,
                "invokeinterface at pc {} has non-zero reserved byte {:#04x}",
                pc, reserved
            ),
            ClassFormatError::InvalidBytecode { pc, opcode } => {
                write!(f, "invalid bytecode {:#04x} at pc {}", opcode, pc)
            }
            ClassFormatError::TruncatedCode {
                pc,
                needed,
                available,
            } => write!(
                f,
                "instruction at pc {} needs {} bytes but only {} remain",
                pc, needed, available
            ),
            ClassFormatError::TruncatedAttribute(name) => {
                write!(f, "{} attribute is truncated", name)
            }
        }
    }
}

impl std::error::Error for ClassFormatError {}
