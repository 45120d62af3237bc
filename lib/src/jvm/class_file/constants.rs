use crate::jvm::class_file::{Deserialize, Serialize};
use crate::jvm::ClassFormatError;
use crate::util::{Offset, OffsetResult, OffsetVec, Width};
use bitflags::bitflags;
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::result::Result;

/// Read-only access to an already-built constant pool
///
/// The decoder only ever needs to look entries up: building the pool (eg. out of the bytes of a
/// class file) is the job of whoever hands the pool over. Indices are 1-based, so index 0 is never
/// valid, and neither is the slot right after a `Long` or `Double` entry.
pub trait ConstantPoolView {
    /// Look up the entry at an index
    fn entry(&self, index: ConstantIndex) -> Result<&Constant, ClassFormatError>;

    /// Look up the kind of the entry at an index
    fn kind(&self, index: ConstantIndex) -> Result<ConstantKind, ClassFormatError> {
        self.entry(index).map(Constant::kind)
    }

    /// Look up an entry, making sure it has one of the expected kinds
    fn entry_of_kind(
        &self,
        index: ConstantIndex,
        expected: ConstantKinds,
    ) -> Result<&Constant, ClassFormatError> {
        let entry = match self.entry(index) {
            Ok(entry) => entry,
            Err(ClassFormatError::InvalidConstantPoolEntry { found: None, .. }) => {
                return Err(ClassFormatError::InvalidConstantPoolEntry {
                    index,
                    found: None,
                    expected,
                })
            }
            Err(err) => return Err(err),
        };
        let kind = entry.kind();
        if expected.contains(kind.into()) {
            Ok(entry)
        } else {
            Err(ClassFormatError::InvalidConstantPoolEntry {
                index,
                found: Some(kind),
                expected,
            })
        }
    }

    /// Contents of a `Utf8` entry
    fn utf8(&self, index: Utf8ConstantIndex) -> Option<&str> {
        self.entry(index.0).ok()?.utf8_value()
    }

    /// Internal name of the class referred to by a `Class` entry (eg. `java/lang/Object`)
    fn class_name(&self, index: ClassConstantIndex) -> Option<&str> {
        let name = self.entry(index.0).ok()?.class_name_index()?;
        self.utf8(name)
    }

    /// Name and descriptor of a `NameAndType` entry
    fn name_and_type(&self, index: NameAndTypeConstantIndex) -> Option<(&str, &str)> {
        let entry = self.entry(index.0).ok()?;
        let name = self.utf8(entry.name_index()?)?;
        let descriptor = self.utf8(entry.descriptor_index()?)?;
        Some((name, descriptor))
    }
}

/// In-memory constant pool
///
/// Entries are pushed in order, and only after they have been decoded (or constructed) by some
/// other means. The pool takes care of handing out slot indices, so that `Long` and `Double`
/// entries correctly take up two slots. A handful of `get_*` helpers build up the usual entry
/// graphs (eg. a `Fieldref` and everything it points to), sharing `Utf8` entries.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    constants: OffsetVec<Constant>,
    utf8s: HashMap<String, Utf8ConstantIndex>,
}

impl ConstantPool {
    /// Make a fresh empty constants pool
    pub fn new() -> ConstantPool {
        ConstantPool {
            constants: OffsetVec::new_starting_at(Offset(1)),
            utf8s: HashMap::new(),
        }
    }

    /// Push a constant into the constant pool, provided there is space for it
    ///
    /// Note: the largest valid index is 65534, indexing starts at 1, and some constants take two
    /// spaces.
    pub fn push(&mut self, constant: Constant) -> Result<ConstantIndex, ConstantPoolOverflow> {
        // Compute the offset at which this constant will be inserted
        let offset: u16 = self.constants.offset_len().0 as u16;

        // Detect if the next constant would overflow the pool
        if offset.checked_add(constant.width() as u16).is_none() {
            return Err(ConstantPoolOverflow { constant, offset });
        }

        self.constants.push(constant);
        Ok(ConstantIndex(offset))
    }

    /// Value of `constant_pool_count` in a class file holding this pool (one more than the
    /// largest slot index)
    pub fn count(&self) -> u16 {
        self.constants.offset_len().0 as u16
    }

    /// Number of entries (as opposed to slots)
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Iterate through entries along with their indices
    pub fn iter(&self) -> impl Iterator<Item = (ConstantIndex, &Constant)> + '_ {
        self.constants
            .iter()
            .map(|(offset, _, constant)| (ConstantIndex(offset.0 as u16), constant))
    }

    /// Get or insert a utf8 constant
    pub fn get_utf8(&mut self, utf8: &str) -> Result<Utf8ConstantIndex, ConstantPoolOverflow> {
        if let Some(idx) = self.utf8s.get(utf8) {
            Ok(*idx)
        } else {
            let idx = Utf8ConstantIndex(self.push(Constant::Utf8(utf8.to_owned()))?);
            self.utf8s.insert(utf8.to_owned(), idx);
            Ok(idx)
        }
    }

    /// Insert a class constant for an internal class name (eg. `java/lang/String`)
    pub fn get_class(&mut self, name: &str) -> Result<ClassConstantIndex, ConstantPoolOverflow> {
        let name = self.get_utf8(name)?;
        Ok(ClassConstantIndex(self.push(Constant::Class(name))?))
    }

    /// Insert a string constant
    pub fn get_string(&mut self, value: &str) -> Result<ConstantIndex, ConstantPoolOverflow> {
        let utf8 = self.get_utf8(value)?;
        self.push(Constant::String(utf8))
    }

    /// Insert a name & type constant
    pub fn get_name_and_type(
        &mut self,
        name: &str,
        descriptor: &str,
    ) -> Result<NameAndTypeConstantIndex, ConstantPoolOverflow> {
        let name = self.get_utf8(name)?;
        let descriptor = self.get_utf8(descriptor)?;
        let constant = Constant::NameAndType { name, descriptor };
        Ok(NameAndTypeConstantIndex(self.push(constant)?))
    }

    /// Insert a field reference (along with its class and name & type)
    pub fn get_field_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex, ConstantPoolOverflow> {
        let class = self.get_class(class)?;
        let name_and_type = self.get_name_and_type(name, descriptor)?;
        self.push(Constant::FieldRef(class, name_and_type))
    }

    /// Insert a method reference (along with its class and name & type)
    pub fn get_method_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) -> Result<ConstantIndex, ConstantPoolOverflow> {
        let class = self.get_class(class)?;
        let name_and_type = self.get_name_and_type(name, descriptor)?;
        self.push(Constant::MethodRef {
            class,
            name_and_type,
            is_interface,
        })
    }

    /// Insert an invoke dynamic constant
    pub fn get_invoke_dynamic(
        &mut self,
        bootstrap_method: u16,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex, ConstantPoolOverflow> {
        let method_descriptor = self.get_name_and_type(name, descriptor)?;
        self.push(Constant::InvokeDynamic {
            bootstrap_method,
            method_descriptor,
        })
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        ConstantPool::new()
    }
}

impl ConstantPoolView for ConstantPool {
    fn entry(&self, index: ConstantIndex) -> Result<&Constant, ClassFormatError> {
        match self.constants.get_offset(Offset(index.0 as usize)) {
            OffsetResult::Ok(_, constant) => Ok(constant),
            OffsetResult::InvalidOffset(_) | OffsetResult::TooSmall | OffsetResult::TooLarge => {
                Err(ClassFormatError::InvalidConstantPoolEntry {
                    index,
                    found: None,
                    expected: ConstantKinds::all(),
                })
            }
        }
    }
}

/// Build a pool out of constants, in order
///
/// Panics if the constants don't fit in a pool (more than 65534 slots).
impl std::iter::FromIterator<Constant> for ConstantPool {
    fn from_iter<I: IntoIterator<Item = Constant>>(constants: I) -> Self {
        let mut pool = ConstantPool::new();
        for constant in constants {
            if let Constant::Utf8(string) = &constant {
                let idx = Utf8ConstantIndex(ConstantIndex(pool.count()));
                pool.utf8s.entry(string.clone()).or_insert(idx);
            }
            if let Err(overflow) = pool.push(constant) {
                panic!("constant pool overflow at {}", overflow.offset);
            }
        }
        pool
    }
}

#[derive(Debug)]
pub struct ConstantPoolOverflow {
    pub constant: Constant,
    pub offset: u16,
}

/// Constants as in the constant pool
///
/// Note: the `Dynamic`, `Module`, and `Package` constants are not included, since no bytecode
/// operand may refer to them.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Class or an interface
    Class(Utf8ConstantIndex),

    /// Field
    FieldRef(ClassConstantIndex, NameAndTypeConstantIndex),

    /// Method (this combines `Methodref` and `InterfaceMethodref`)
    MethodRef {
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
        is_interface: bool,
    },

    /// Constant object of type `java.lang.String`
    String(Utf8ConstantIndex),

    /// Constant primitive of type `int`
    Integer(i32),

    /// Constant primitive of type `float`
    Float(f32),

    /// Constant primitive of type `long`
    Long(i64),

    /// Constant primitive of type `double`
    Double(f64),

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    },

    /// Constant UTF-8 encoded raw string value
    ///
    /// The class file stores these in modified UTF-8. By the time they land in the pool, they
    /// have been decoded into regular strings.
    Utf8(String),

    /// Constant object of type `java.lang.invoke.MethodHandle`
    MethodHandle {
        handle_kind: HandleKind,

        /// Depending on the method kind, this points to different things:
        ///
        ///   - `FieldRef` for `GetField`, `GetStatic`, `PutField`, `PutStatic`
        ///   - `MethodRef` for the rest
        member: ConstantIndex,
    },

    /// Method type
    MethodType { descriptor: Utf8ConstantIndex },

    /// Dynamically-computed call site
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        method_descriptor: NameAndTypeConstantIndex,
    },
}

impl Constant {
    pub fn kind(&self) -> ConstantKind {
        match self {
            Constant::Class(_) => ConstantKind::Class,
            Constant::FieldRef(_, _) => ConstantKind::FieldRef,
            Constant::MethodRef {
                is_interface: false,
                ..
            } => ConstantKind::MethodRef,
            Constant::MethodRef {
                is_interface: true, ..
            } => ConstantKind::InterfaceMethodRef,
            Constant::String(_) => ConstantKind::String,
            Constant::Integer(_) => ConstantKind::Integer,
            Constant::Float(_) => ConstantKind::Float,
            Constant::Long(_) => ConstantKind::Long,
            Constant::Double(_) => ConstantKind::Double,
            Constant::NameAndType { .. } => ConstantKind::NameAndType,
            Constant::Utf8(_) => ConstantKind::Utf8,
            Constant::MethodHandle { .. } => ConstantKind::MethodHandle,
            Constant::MethodType { .. } => ConstantKind::MethodType,
            Constant::InvokeDynamic { .. } => ConstantKind::InvokeDynamic,
        }
    }

    pub fn utf8_value(&self) -> Option<&str> {
        match self {
            Constant::Utf8(string) => Some(string),
            _ => None,
        }
    }

    pub fn integer_value(&self) -> Option<i32> {
        match self {
            Constant::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    pub fn float_value(&self) -> Option<f32> {
        match self {
            Constant::Float(float) => Some(*float),
            _ => None,
        }
    }

    pub fn long_value(&self) -> Option<i64> {
        match self {
            Constant::Long(long) => Some(*long),
            _ => None,
        }
    }

    pub fn double_value(&self) -> Option<f64> {
        match self {
            Constant::Double(double) => Some(*double),
            _ => None,
        }
    }

    /// Name of a `Class` entry
    pub fn class_name_index(&self) -> Option<Utf8ConstantIndex> {
        match self {
            Constant::Class(name) => Some(*name),
            _ => None,
        }
    }

    /// Contents of a `String` entry
    pub fn string_index(&self) -> Option<Utf8ConstantIndex> {
        match self {
            Constant::String(utf8) => Some(*utf8),
            _ => None,
        }
    }

    /// Declaring class of a field or method reference
    pub fn class_index(&self) -> Option<ClassConstantIndex> {
        match self {
            Constant::FieldRef(class, _) | Constant::MethodRef { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Name and type of a field reference, method reference, or dynamic call site
    pub fn name_and_type_index(&self) -> Option<NameAndTypeConstantIndex> {
        match self {
            Constant::FieldRef(_, name_and_type)
            | Constant::MethodRef { name_and_type, .. }
            | Constant::InvokeDynamic {
                method_descriptor: name_and_type,
                ..
            } => Some(*name_and_type),
            _ => None,
        }
    }

    pub fn name_index(&self) -> Option<Utf8ConstantIndex> {
        match self {
            Constant::NameAndType { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Descriptor of a `NameAndType` or `MethodType` entry
    pub fn descriptor_index(&self) -> Option<Utf8ConstantIndex> {
        match self {
            Constant::NameAndType { descriptor, .. } | Constant::MethodType { descriptor } => {
                Some(*descriptor)
            }
            _ => None,
        }
    }

    pub fn bootstrap_method_index(&self) -> Option<u16> {
        match self {
            Constant::InvokeDynamic {
                bootstrap_method, ..
            } => Some(*bootstrap_method),
            _ => None,
        }
    }

    /// Kind and target of a `MethodHandle` entry
    pub fn method_handle(&self) -> Option<(HandleKind, ConstantIndex)> {
        match self {
            Constant::MethodHandle {
                handle_kind,
                member,
            } => Some((*handle_kind, *member)),
            _ => None,
        }
    }
}

/// Almost all constants have width 1, except for `Constant::Long` and `Constant::Double`. From
/// JVMS 4.4.5:
///
/// > All 8-byte constants take up two entries in the constant_pool table of the class file. If a
/// > CONSTANT_Long_info or CONSTANT_Double_info structure is the item in the constant_pool table
/// > at index n, then the next usable item in the pool is located at index n+2. The constant_pool
/// > index n+1 must be valid but is considered unusable.
/// >
/// > In retrospect, making 8-byte constants take two constant pool entries was a poor choice.
impl Width for Constant {
    fn width(&self) -> usize {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

/// Tag of a constant pool entry
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ConstantKind {
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    InvokeDynamic,
}

impl ConstantKind {
    pub const ALL: [ConstantKind; 14] = [
        ConstantKind::Utf8,
        ConstantKind::Integer,
        ConstantKind::Float,
        ConstantKind::Long,
        ConstantKind::Double,
        ConstantKind::Class,
        ConstantKind::String,
        ConstantKind::FieldRef,
        ConstantKind::MethodRef,
        ConstantKind::InterfaceMethodRef,
        ConstantKind::NameAndType,
        ConstantKind::MethodHandle,
        ConstantKind::MethodType,
        ConstantKind::InvokeDynamic,
    ];

    /// Tag byte used in the class file
    pub fn tag(self) -> u8 {
        match self {
            ConstantKind::Utf8 => 1,
            ConstantKind::Integer => 3,
            ConstantKind::Float => 4,
            ConstantKind::Long => 5,
            ConstantKind::Double => 6,
            ConstantKind::Class => 7,
            ConstantKind::String => 8,
            ConstantKind::FieldRef => 9,
            ConstantKind::MethodRef => 10,
            ConstantKind::InterfaceMethodRef => 11,
            ConstantKind::NameAndType => 12,
            ConstantKind::MethodHandle => 15,
            ConstantKind::MethodType => 16,
            ConstantKind::InvokeDynamic => 18,
        }
    }

    /// Name as used in the JVM specification (eg. `CONSTANT_Fieldref`)
    pub fn name(self) -> &'static str {
        match self {
            ConstantKind::Utf8 => "CONSTANT_Utf8",
            ConstantKind::Integer => "CONSTANT_Integer",
            ConstantKind::Float => "CONSTANT_Float",
            ConstantKind::Long => "CONSTANT_Long",
            ConstantKind::Double => "CONSTANT_Double",
            ConstantKind::Class => "CONSTANT_Class",
            ConstantKind::String => "CONSTANT_String",
            ConstantKind::FieldRef => "CONSTANT_Fieldref",
            ConstantKind::MethodRef => "CONSTANT_Methodref",
            ConstantKind::InterfaceMethodRef => "CONSTANT_InterfaceMethodref",
            ConstantKind::NameAndType => "CONSTANT_NameAndType",
            ConstantKind::MethodHandle => "CONSTANT_MethodHandle",
            ConstantKind::MethodType => "CONSTANT_MethodType",
            ConstantKind::InvokeDynamic => "CONSTANT_InvokeDynamic",
        }
    }
}

impl TryFrom<u8> for ConstantKind {
    type Error = u8;

    fn try_from(tag: u8) -> Result<ConstantKind, u8> {
        ConstantKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == tag)
            .ok_or(tag)
    }
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of constant kinds
    ///
    /// Instructions with a constant pool operand only accept some kinds of entries (eg. `ldc`
    /// takes an `Integer`, `Float`, `String`, or `Class`).
    pub struct ConstantKinds: u16 {
        const UTF8 = 1 << 0;
        const INTEGER = 1 << 1;
        const FLOAT = 1 << 2;
        const LONG = 1 << 3;
        const DOUBLE = 1 << 4;
        const CLASS = 1 << 5;
        const STRING = 1 << 6;
        const FIELD_REF = 1 << 7;
        const METHOD_REF = 1 << 8;
        const INTERFACE_METHOD_REF = 1 << 9;
        const NAME_AND_TYPE = 1 << 10;
        const METHOD_HANDLE = 1 << 11;
        const METHOD_TYPE = 1 << 12;
        const INVOKE_DYNAMIC = 1 << 13;

        /// Operands of `ldc` and `ldc_w`
        const LOADABLE = Self::INTEGER.bits | Self::FLOAT.bits | Self::STRING.bits | Self::CLASS.bits;

        /// Operands of `ldc2_w`
        const LOADABLE_WIDE = Self::LONG.bits | Self::DOUBLE.bits;
    }
}

impl From<ConstantKind> for ConstantKinds {
    fn from(kind: ConstantKind) -> ConstantKinds {
        match kind {
            ConstantKind::Utf8 => ConstantKinds::UTF8,
            ConstantKind::Integer => ConstantKinds::INTEGER,
            ConstantKind::Float => ConstantKinds::FLOAT,
            ConstantKind::Long => ConstantKinds::LONG,
            ConstantKind::Double => ConstantKinds::DOUBLE,
            ConstantKind::Class => ConstantKinds::CLASS,
            ConstantKind::String => ConstantKinds::STRING,
            ConstantKind::FieldRef => ConstantKinds::FIELD_REF,
            ConstantKind::MethodRef => ConstantKinds::METHOD_REF,
            ConstantKind::InterfaceMethodRef => ConstantKinds::INTERFACE_METHOD_REF,
            ConstantKind::NameAndType => ConstantKinds::NAME_AND_TYPE,
            ConstantKind::MethodHandle => ConstantKinds::METHOD_HANDLE,
            ConstantKind::MethodType => ConstantKinds::METHOD_TYPE,
            ConstantKind::InvokeDynamic => ConstantKinds::INVOKE_DYNAMIC,
        }
    }
}

/// Renders as `CONSTANT_Long | CONSTANT_Double`
impl fmt::Display for ConstantKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in ConstantKind::ALL {
            if self.contains(kind.into()) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(kind.name())?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct ConstantIndex(pub u16);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Utf8ConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ClassConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct NameAndTypeConstantIndex(pub ConstantIndex);

/// Renders as `#12`, the way `javap` refers to pool entries
impl fmt::Display for ConstantIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<Utf8ConstantIndex> for ConstantIndex {
    fn from(index: Utf8ConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<ClassConstantIndex> for ConstantIndex {
    fn from(index: ClassConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<NameAndTypeConstantIndex> for ConstantIndex {
    fn from(index: NameAndTypeConstantIndex) -> ConstantIndex {
        index.0
    }
}

impl Serialize for ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for Utf8ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for ClassConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for ConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        u16::deserialize(reader).map(ConstantIndex)
    }
}
impl Deserialize for Utf8ConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        ConstantIndex::deserialize(reader).map(Utf8ConstantIndex)
    }
}
impl Deserialize for ClassConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        ConstantIndex::deserialize(reader).map(ClassConstantIndex)
    }
}

/// Type of method handle
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-5.html#jvms-5.4.3.5-220
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl HandleKind {
    /// Name of the reference kind, as printed by `javap` (eg. `REF_invokeStatic`)
    pub fn name(self) -> &'static str {
        match self {
            HandleKind::GetField => "REF_getField",
            HandleKind::GetStatic => "REF_getStatic",
            HandleKind::PutField => "REF_putField",
            HandleKind::PutStatic => "REF_putStatic",
            HandleKind::InvokeVirtual => "REF_invokeVirtual",
            HandleKind::InvokeStatic => "REF_invokeStatic",
            HandleKind::InvokeSpecial => "REF_invokeSpecial",
            HandleKind::NewInvokeSpecial => "REF_newInvokeSpecial",
            HandleKind::InvokeInterface => "REF_invokeInterface",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_pool() -> ConstantPool {
        let mut pool = ConstantPool::new();
        pool.get_field_ref("java/lang/System", "out", "Ljava/io/PrintStream;")
            .unwrap();
        pool.push(Constant::Long(1 << 40)).unwrap();
        pool.push(Constant::Integer(7)).unwrap();
        pool
    }

    #[test]
    fn slots_follow_entry_widths() {
        let pool = sample_pool();

        // 1: utf8, 2: class, 3: utf8, 4: utf8, 5: name & type, 6: fieldref, 7-8: long, 9: int
        assert_eq!(pool.kind(ConstantIndex(2)), Ok(ConstantKind::Class));
        assert_eq!(pool.kind(ConstantIndex(6)), Ok(ConstantKind::FieldRef));
        assert_eq!(pool.kind(ConstantIndex(7)), Ok(ConstantKind::Long));
        assert_eq!(pool.kind(ConstantIndex(9)), Ok(ConstantKind::Integer));
        assert_eq!(pool.count(), 10);
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn unusable_indices_are_errors() {
        let pool = sample_pool();
        for index in [0, 8, 10, 500] {
            assert_eq!(
                pool.entry(ConstantIndex(index)),
                Err(ClassFormatError::InvalidConstantPoolEntry {
                    index: ConstantIndex(index),
                    found: None,
                    expected: ConstantKinds::all(),
                })
            );
        }
    }

    #[test]
    fn kind_checks() {
        let pool = sample_pool();
        assert!(pool
            .entry_of_kind(ConstantIndex(9), ConstantKinds::LOADABLE)
            .is_ok());
        assert_eq!(
            pool.entry_of_kind(ConstantIndex(7), ConstantKinds::LOADABLE),
            Err(ClassFormatError::InvalidConstantPoolEntry {
                index: ConstantIndex(7),
                found: Some(ConstantKind::Long),
                expected: ConstantKinds::LOADABLE,
            })
        );
        assert_eq!(
            pool.entry_of_kind(ConstantIndex(8), ConstantKinds::LOADABLE_WIDE),
            Err(ClassFormatError::InvalidConstantPoolEntry {
                index: ConstantIndex(8),
                found: None,
                expected: ConstantKinds::LOADABLE_WIDE,
            })
        );
    }

    #[test]
    fn name_resolution() {
        let pool = sample_pool();
        let field = pool.entry(ConstantIndex(6)).unwrap();
        assert_eq!(
            pool.class_name(field.class_index().unwrap()),
            Some("java/lang/System")
        );
        assert_eq!(
            pool.name_and_type(field.name_and_type_index().unwrap()),
            Some(("out", "Ljava/io/PrintStream;"))
        );

        // accessors for other kinds come back empty
        assert_eq!(field.utf8_value(), None);
        assert_eq!(field.name_index(), None);
        assert_eq!(field.integer_value(), None);
    }

    #[test]
    fn utf8_entries_are_shared() {
        let mut pool = ConstantPool::new();
        let first = pool.get_class("java/lang/Object").unwrap();
        let second = pool.get_class("java/lang/Object").unwrap();
        assert_ne!(first, second);
        assert_eq!(
            pool.entry(first.0).unwrap().class_name_index(),
            pool.entry(second.0).unwrap().class_name_index()
        );
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn interface_methods_have_their_own_kind() {
        let mut pool = ConstantPool::new();
        let virt = pool
            .get_method_ref("java/lang/Object", "hashCode", "()I", false)
            .unwrap();
        let iface = pool
            .get_method_ref("java/util/List", "size", "()I", true)
            .unwrap();
        assert_eq!(pool.kind(virt), Ok(ConstantKind::MethodRef));
        assert_eq!(pool.kind(iface), Ok(ConstantKind::InterfaceMethodRef));
    }

    #[test]
    fn kind_tags() {
        for kind in ConstantKind::ALL {
            assert_eq!(ConstantKind::try_from(kind.tag()), Ok(kind));
        }
        assert_eq!(ConstantKind::try_from(2), Err(2));
        assert_eq!(ConstantKind::try_from(17), Err(17));
    }

    #[test]
    fn kind_sets_render() {
        assert_eq!(
            ConstantKinds::LOADABLE_WIDE.to_string(),
            "CONSTANT_Long | CONSTANT_Double"
        );
        assert_eq!(
            ConstantKinds::from(ConstantKind::NameAndType).to_string(),
            "CONSTANT_NameAndType"
        );
    }

    #[test]
    fn pool_from_constants() {
        let pool: ConstantPool = vec![
            Constant::Utf8(String::from("hello")),
            Constant::String(Utf8ConstantIndex(ConstantIndex(1))),
            Constant::Double(0.5),
            Constant::Float(1.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(pool.kind(ConstantIndex(2)), Ok(ConstantKind::String));
        assert_eq!(pool.kind(ConstantIndex(5)), Ok(ConstantKind::Float));
        assert!(pool.kind(ConstantIndex(4)).is_err());
        assert_eq!(
            pool.iter().map(|(idx, _)| idx.0).collect::<Vec<_>>(),
            vec![1, 2, 3, 5]
        );
    }
}
