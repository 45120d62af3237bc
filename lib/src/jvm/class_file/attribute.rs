use crate::jvm::class_file::{
    ClassConstantIndex, ConstantKinds, ConstantPoolView, Deserialize, Serialize,
    Utf8ConstantIndex,
};
use crate::jvm::code::{decode, BytecodeVisitor, InstructionReader};
use crate::jvm::ClassFormatError;
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::Read;

/// Attributes (used in classes, fields, methods, and even on some attributes)
///
/// Only the `Code` attribute gets interpreted here. Everything nested inside of it (line numbers,
/// local variables, stack maps, type annotations, ...) is kept as an opaque blob.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name_index: Utf8ConstantIndex,
    pub info: Vec<u8>,
}

impl Attribute {
    /// Name of the attribute, if the name index points at a `Utf8` entry
    pub fn name<'p, P: ConstantPoolView + ?Sized>(&self, pool: &'p P) -> Option<&'p str> {
        pool.utf8(self.name_index)
    }
}

impl Serialize for Attribute {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.name_index.serialize(writer)?;

        // Attribute info length is 4 bytes
        (self.info.len() as u32).serialize(writer)?;
        writer.write_all(&self.info)?;

        Ok(())
    }
}

impl Deserialize for Attribute {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        let name_index = Utf8ConstantIndex::deserialize(reader)?;
        let len = u32::deserialize(reader)?;
        let info = read_exact_vec(reader, len)?;
        Ok(Attribute { name_index, info })
    }
}

/// Body of a method's `Code` attribute
///
/// The decoder only cares about `code`, but the rest of the attribute is kept around (and
/// re-serialized untouched) so that callers have the full picture.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBuffer {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_array: BytecodeArray,
    pub exception_table: Vec<ExceptionHandler>,
    pub attributes: Vec<Attribute>,
}

impl CodeBuffer {
    pub const NAME: &'static str = "Code";

    /// Wrap a bare code array (no exception handlers or nested attributes)
    pub fn new(max_stack: u16, max_locals: u16, code: Vec<u8>) -> CodeBuffer {
        CodeBuffer {
            max_stack,
            max_locals,
            code_array: BytecodeArray(code),
            exception_table: vec![],
            attributes: vec![],
        }
    }

    /// Parse the body of a `Code` attribute (everything after the attribute name and length)
    ///
    /// The names of nested attributes must all be `Utf8` entries in the constant pool. The code
    /// array itself is not decoded yet: use [`CodeBuffer::instructions`] or
    /// [`CodeBuffer::decode`] for that.
    pub fn parse<P: ConstantPoolView + ?Sized>(
        info: &[u8],
        pool: &P,
    ) -> Result<CodeBuffer, ClassFormatError> {
        let mut reader = info;
        let code = CodeBuffer::deserialize(&mut reader)
            .map_err(|_| ClassFormatError::TruncatedAttribute(CodeBuffer::NAME))?;
        for attribute in &code.attributes {
            pool.entry_of_kind(attribute.name_index.0, ConstantKinds::UTF8)?;
        }
        log::debug!(
            "Parsed code attribute: {} bytes of code, {} exception handlers, {} attributes",
            code.code_length(),
            code.exception_table.len(),
            code.attributes.len()
        );
        Ok(code)
    }

    /// Raw bytecode
    pub fn code(&self) -> &[u8] {
        &self.code_array.0
    }

    pub fn code_length(&self) -> u32 {
        self.code_array.0.len() as u32
    }

    /// First nested attribute with the given name
    pub fn attribute<P: ConstantPoolView + ?Sized>(
        &self,
        pool: &P,
        name: &str,
    ) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name(pool) == Some(name))
    }

    pub fn line_number_table<P: ConstantPoolView + ?Sized>(&self, pool: &P) -> Option<&Attribute> {
        self.attribute(pool, "LineNumberTable")
    }

    pub fn local_variable_table<P: ConstantPoolView + ?Sized>(
        &self,
        pool: &P,
    ) -> Option<&Attribute> {
        self.attribute(pool, "LocalVariableTable")
    }

    pub fn stack_map_table<P: ConstantPoolView + ?Sized>(&self, pool: &P) -> Option<&Attribute> {
        self.attribute(pool, "StackMapTable")
    }

    /// Iterate through the decoded instructions
    pub fn instructions<'c, 'p, P: ConstantPoolView + ?Sized>(
        &'c self,
        pool: &'p P,
    ) -> InstructionReader<'c, 'p, P> {
        InstructionReader::new(self.code(), pool)
    }

    /// Decode the instructions, feeding them to a visitor
    pub fn decode<'p, P, V>(&self, pool: &'p P, visitor: &mut V) -> Result<(), ClassFormatError>
    where
        P: ConstantPoolView + ?Sized,
        V: BytecodeVisitor<'p> + ?Sized,
    {
        decode(self, pool, visitor)
    }
}

impl Serialize for CodeBuffer {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.max_stack.serialize(writer)?;
        self.max_locals.serialize(writer)?;
        self.code_array.serialize(writer)?;
        self.exception_table.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for CodeBuffer {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        Ok(CodeBuffer {
            max_stack: u16::deserialize(reader)?,
            max_locals: u16::deserialize(reader)?,
            code_array: BytecodeArray::deserialize(reader)?,
            exception_table: Vec::deserialize(reader)?,
            attributes: Vec::deserialize(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
    /// Start of exception handler range (inclusive)
    pub start_pc: BytecodeIndex,

    /// End of exception handler range (exclusive)
    pub end_pc: BytecodeIndex,

    /// Start of the exception handler
    pub handler_pc: BytecodeIndex,

    /// Class of exceptions caught (index 0 catches everything, eg. for `finally`)
    pub catch_type: ClassConstantIndex,
}

impl ExceptionHandler {
    pub fn catches_all(&self) -> bool {
        (self.catch_type.0).0 == 0
    }
}

impl Serialize for ExceptionHandler {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.end_pc.serialize(writer)?;
        self.handler_pc.serialize(writer)?;
        self.catch_type.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for ExceptionHandler {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        Ok(ExceptionHandler {
            start_pc: BytecodeIndex::deserialize(reader)?,
            end_pc: BytecodeIndex::deserialize(reader)?,
            handler_pc: BytecodeIndex::deserialize(reader)?,
            catch_type: ClassConstantIndex::deserialize(reader)?,
        })
    }
}

/// Encoded bytecode instructions (length is a `u4`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeArray(pub Vec<u8>);

impl Serialize for BytecodeArray {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        let len = self.0.len() as u32;
        len.serialize(writer)?;
        writer.write_all(&self.0)?;
        Ok(())
    }
}

impl Deserialize for BytecodeArray {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        let len = u32::deserialize(reader)?;
        read_exact_vec(reader, len).map(BytecodeArray)
    }
}

/// Index into `BytecodeArray`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BytecodeIndex(pub u16);

impl Serialize for BytecodeIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for BytecodeIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        u16::deserialize(reader).map(BytecodeIndex)
    }
}

/// Read a `u4`-sized blob without trusting the length for the up-front allocation
fn read_exact_vec<R: ReadBytesExt>(reader: &mut R, len: u32) -> std::io::Result<Vec<u8>> {
    let mut buffer = vec![];
    let read = reader.by_ref().take(len as u64).read_to_end(&mut buffer)?;
    if read != len as usize {
        return Err(std::io::ErrorKind::UnexpectedEof.into());
    }
    Ok(buffer)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_file::{ConstantIndex, ConstantKind, ConstantPool};

    fn code_attribute_bytes() -> (ConstantPool, Vec<u8>) {
        let mut pool = ConstantPool::new();
        let line_numbers = pool.get_utf8("LineNumberTable").unwrap();
        let exception = pool.get_class("java/lang/Exception").unwrap();

        let mut bytes = vec![
            0x00, 0x02, // max_stack
            0x00, 0x01, // max_locals
            0x00, 0x00, 0x00, 0x02, // code_length
            0x03, 0xac, // iconst_0, ireturn
            0x00, 0x01, // exception_table_length
            0x00, 0x00, 0x00, 0x01, 0x00, 0x01, // start, end, handler
        ];
        bytes.extend_from_slice(&(exception.0).0.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x01]); // attributes_count
        bytes.extend_from_slice(&(line_numbers.0).0.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x00, 0x00, 0x07]);
        (pool, bytes)
    }

    #[test]
    fn parse_envelope() {
        let (pool, bytes) = code_attribute_bytes();
        let code = CodeBuffer::parse(&bytes, &pool).unwrap();

        assert_eq!(code.max_stack, 2);
        assert_eq!(code.max_locals, 1);
        assert_eq!(code.code(), &[0x03, 0xac]);
        assert_eq!(code.code_length(), 2);
        assert_eq!(code.exception_table.len(), 1);
        assert_eq!(code.exception_table[0].handler_pc, BytecodeIndex(1));
        assert!(!code.exception_table[0].catches_all());

        let line_numbers = code.line_number_table(&pool).unwrap();
        assert_eq!(line_numbers.info, vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x07]);
        assert!(code.local_variable_table(&pool).is_none());
        assert!(code.stack_map_table(&pool).is_none());
    }

    #[test]
    fn serialize_reproduces_input() {
        let (pool, bytes) = code_attribute_bytes();
        let code = CodeBuffer::parse(&bytes, &pool).unwrap();

        let mut out = vec![];
        code.serialize(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn every_prefix_is_truncated() {
        let (pool, bytes) = code_attribute_bytes();
        for len in 0..bytes.len() {
            assert_eq!(
                CodeBuffer::parse(&bytes[..len], &pool),
                Err(ClassFormatError::TruncatedAttribute("Code")),
                "prefix of length {}",
                len
            );
        }
    }

    #[test]
    fn attribute_names_must_be_utf8() {
        let (pool, mut bytes) = code_attribute_bytes();

        // point the nested attribute name at the `Class` entry (#3)
        let name_at = bytes.len() - 12;
        bytes[name_at..name_at + 2].copy_from_slice(&[0x00, 0x03]);

        assert_eq!(
            CodeBuffer::parse(&bytes, &pool),
            Err(ClassFormatError::InvalidConstantPoolEntry {
                index: ConstantIndex(3),
                found: Some(ConstantKind::Class),
                expected: ConstantKinds::UTF8,
            })
        );
    }

    #[test]
    fn huge_lengths_do_not_allocate_up_front() {
        let pool = ConstantPool::new();
        let bytes = [0x00, 0x01, 0x00, 0x01, 0xff, 0xff, 0xff, 0xff, 0xb1];
        assert_eq!(
            CodeBuffer::parse(&bytes, &pool),
            Err(ClassFormatError::TruncatedAttribute("Code"))
        );
    }
}
