//! Decoded JVM instructions
//!
//! Unlike an instruction set meant for emitting code, this representation stays as close as
//! possible to the bytes in the code array: every opcode has its own variant (so `iload` and
//! `iload_0` are distinct), `ldc` and `ldc_w` are not merged, and `wide` shows up as its own pair
//! of variants. That way the encoded width of an instruction is always recoverable from the
//! instruction itself.

use crate::jvm::class_file::{Constant, ConstantIndex};
use crate::jvm::code::Opcode;
use crate::util::Width;
use std::convert::TryFrom;
use std::fmt;

/// Constant pool operand, along with the entry it resolved to
///
/// The decoder checks the kind of the entry before handing out a `ConstantRef`, so (for example)
/// the operand of `getfield` always points at a `Fieldref`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantRef<'p> {
    pub index: ConstantIndex,
    pub entry: &'p Constant,
}

/// JVM bytecode instruction, as found in a method's code array
///
/// Branch offsets are relative to the `pc` of the branch instruction itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction<'p> {
    Nop,
    AConstNull,
    IConstM1,
    IConst0,
    IConst1,
    IConst2,
    IConst3,
    IConst4,
    IConst5,
    LConst0,
    LConst1,
    FConst0,
    FConst1,
    FConst2,
    DConst0,
    DConst1,
    BiPush(i8),
    SiPush(i16),
    Ldc(ConstantRef<'p>), // `Integer`, `Float`, `String`, or `Class`
    LdcW(ConstantRef<'p>),
    Ldc2W(ConstantRef<'p>), // `Long` or `Double`
    ILoad(u8), // see `Wide` for indices above 255
    LLoad(u8),
    FLoad(u8),
    DLoad(u8),
    ALoad(u8),
    ILoad0,
    ILoad1,
    ILoad2,
    ILoad3,
    LLoad0,
    LLoad1,
    LLoad2,
    LLoad3,
    FLoad0,
    FLoad1,
    FLoad2,
    FLoad3,
    DLoad0,
    DLoad1,
    DLoad2,
    DLoad3,
    ALoad0,
    ALoad1,
    ALoad2,
    ALoad3,
    IALoad,
    LALoad,
    FALoad,
    DALoad,
    AALoad,
    BALoad,
    CALoad,
    SALoad,
    IStore(u8),
    LStore(u8),
    FStore(u8),
    DStore(u8),
    AStore(u8),
    IStore0,
    IStore1,
    IStore2,
    IStore3,
    LStore0,
    LStore1,
    LStore2,
    LStore3,
    FStore0,
    FStore1,
    FStore2,
    FStore3,
    DStore0,
    DStore1,
    DStore2,
    DStore3,
    AStore0,
    AStore1,
    AStore2,
    AStore3,
    IAStore,
    LAStore,
    FAStore,
    DAStore,
    AAStore,
    BAStore,
    CAStore,
    SAStore,
    Pop,
    Pop2,
    Dup,
    DupX1,
    DupX2,
    Dup2,
    Dup2X1,
    Dup2X2,
    Swap,
    IAdd,
    LAdd,
    FAdd,
    DAdd,
    ISub,
    LSub,
    FSub,
    DSub,
    IMul,
    LMul,
    FMul,
    DMul,
    IDiv,
    LDiv,
    FDiv,
    DDiv,
    IRem,
    LRem,
    FRem,
    DRem,
    INeg,
    LNeg,
    FNeg,
    DNeg,
    IShl,
    LShl,
    IShr,
    LShr,
    IUShr,
    LUShr,
    IAnd,
    LAnd,
    IOr,
    LOr,
    IXor,
    LXor,
    IInc { index: u8, constant: i8 },
    I2L,
    I2F,
    I2D,
    L2I,
    L2F,
    L2D,
    F2I,
    F2L,
    F2D,
    D2I,
    D2L,
    D2F,
    I2B,
    I2C,
    I2S,
    LCmp,
    FCmpL,
    FCmpG,
    DCmpL,
    DCmpG,
    IfEq(i16),
    IfNe(i16),
    IfLt(i16),
    IfGe(i16),
    IfGt(i16),
    IfLe(i16),
    IfICmpEq(i16),
    IfICmpNe(i16),
    IfICmpLt(i16),
    IfICmpGe(i16),
    IfICmpGt(i16),
    IfICmpLe(i16),
    IfACmpEq(i16),
    IfACmpNe(i16),
    Goto(i16),
    Jsr(i16),
    Ret(u8),
    TableSwitch(TableSwitch),
    LookupSwitch(LookupSwitch),
    IReturn,
    LReturn,
    FReturn,
    DReturn,
    AReturn,
    Return,
    GetStatic(ConstantRef<'p>),
    PutStatic(ConstantRef<'p>),
    GetField(ConstantRef<'p>),
    PutField(ConstantRef<'p>),
    InvokeVirtual(ConstantRef<'p>),
    InvokeSpecial(ConstantRef<'p>),
    InvokeStatic(ConstantRef<'p>),
    InvokeInterface { method: ConstantRef<'p>, count: u8 },
    InvokeDynamic(ConstantRef<'p>),
    New(ConstantRef<'p>),
    NewArray(u8), // array type code (see `ArrayType`)
    ANewArray(ConstantRef<'p>),
    ArrayLength,
    AThrow,
    CheckCast(ConstantRef<'p>),
    InstanceOf(ConstantRef<'p>),
    MonitorEnter,
    MonitorExit,
    /// `wide` followed by anything but `iinc`
    ///
    /// The sub-opcode is kept as a raw byte: only loads, stores, and `ret` are meaningful here, but
    /// the encoding is the same for any byte.
    Wide { opcode: u8, index: u16 },
    WideIInc { index: u16, constant: i16 },
    MultiANewArray { class: ConstantRef<'p>, dimensions: u8 },
    IfNull(i16),
    IfNonNull(i16),
    GotoW(i32),
    JsrW(i32),
    Breakpoint,
    ImpDep1,
    ImpDep2,
}

impl<'p> Instruction<'p> {
    /// Opcode byte the instruction starts with (`wide` for the widened forms)
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Nop => Opcode::Nop,
            Instruction::AConstNull => Opcode::AConstNull,
            Instruction::IConstM1 => Opcode::IConstM1,
            Instruction::IConst0 => Opcode::IConst0,
            Instruction::IConst1 => Opcode::IConst1,
            Instruction::IConst2 => Opcode::IConst2,
            Instruction::IConst3 => Opcode::IConst3,
            Instruction::IConst4 => Opcode::IConst4,
            Instruction::IConst5 => Opcode::IConst5,
            Instruction::LConst0 => Opcode::LConst0,
            Instruction::LConst1 => Opcode::LConst1,
            Instruction::FConst0 => Opcode::FConst0,
            Instruction::FConst1 => Opcode::FConst1,
            Instruction::FConst2 => Opcode::FConst2,
            Instruction::DConst0 => Opcode::DConst0,
            Instruction::DConst1 => Opcode::DConst1,
            Instruction::BiPush(_) => Opcode::BiPush,
            Instruction::SiPush(_) => Opcode::SiPush,
            Instruction::Ldc(_) => Opcode::Ldc,
            Instruction::LdcW(_) => Opcode::LdcW,
            Instruction::Ldc2W(_) => Opcode::Ldc2W,
            Instruction::ILoad(_) => Opcode::ILoad,
            Instruction::LLoad(_) => Opcode::LLoad,
            Instruction::FLoad(_) => Opcode::FLoad,
            Instruction::DLoad(_) => Opcode::DLoad,
            Instruction::ALoad(_) => Opcode::ALoad,
            Instruction::ILoad0 => Opcode::ILoad0,
            Instruction::ILoad1 => Opcode::ILoad1,
            Instruction::ILoad2 => Opcode::ILoad2,
            Instruction::ILoad3 => Opcode::ILoad3,
            Instruction::LLoad0 => Opcode::LLoad0,
            Instruction::LLoad1 => Opcode::LLoad1,
            Instruction::LLoad2 => Opcode::LLoad2,
            Instruction::LLoad3 => Opcode::LLoad3,
            Instruction::FLoad0 => Opcode::FLoad0,
            Instruction::FLoad1 => Opcode::FLoad1,
            Instruction::FLoad2 => Opcode::FLoad2,
            Instruction::FLoad3 => Opcode::FLoad3,
            Instruction::DLoad0 => Opcode::DLoad0,
            Instruction::DLoad1 => Opcode::DLoad1,
            Instruction::DLoad2 => Opcode::DLoad2,
            Instruction::DLoad3 => Opcode::DLoad3,
            Instruction::ALoad0 => Opcode::ALoad0,
            Instruction::ALoad1 => Opcode::ALoad1,
            Instruction::ALoad2 => Opcode::ALoad2,
            Instruction::ALoad3 => Opcode::ALoad3,
            Instruction::IALoad => Opcode::IALoad,
            Instruction::LALoad => Opcode::LALoad,
            Instruction::FALoad => Opcode::FALoad,
            Instruction::DALoad => Opcode::DALoad,
            Instruction::AALoad => Opcode::AALoad,
            Instruction::BALoad => Opcode::BALoad,
            Instruction::CALoad => Opcode::CALoad,
            Instruction::SALoad => Opcode::SALoad,
            Instruction::IStore(_) => Opcode::IStore,
            Instruction::LStore(_) => Opcode::LStore,
            Instruction::FStore(_) => Opcode::FStore,
            Instruction::DStore(_) => Opcode::DStore,
            Instruction::AStore(_) => Opcode::AStore,
            Instruction::IStore0 => Opcode::IStore0,
            Instruction::IStore1 => Opcode::IStore1,
            Instruction::IStore2 => Opcode::IStore2,
            Instruction::IStore3 => Opcode::IStore3,
            Instruction::LStore0 => Opcode::LStore0,
            Instruction::LStore1 => Opcode::LStore1,
            Instruction::LStore2 => Opcode::LStore2,
            Instruction::LStore3 => Opcode::LStore3,
            Instruction::FStore0 => Opcode::FStore0,
            Instruction::FStore1 => Opcode::FStore1,
            Instruction::FStore2 => Opcode::FStore2,
            Instruction::FStore3 => Opcode::FStore3,
            Instruction::DStore0 => Opcode::DStore0,
            Instruction::DStore1 => Opcode::DStore1,
            Instruction::DStore2 => Opcode::DStore2,
            Instruction::DStore3 => Opcode::DStore3,
            Instruction::AStore0 => Opcode::AStore0,
            Instruction::AStore1 => Opcode::AStore1,
            Instruction::AStore2 => Opcode::AStore2,
            Instruction::AStore3 => Opcode::AStore3,
            Instruction::IAStore => Opcode::IAStore,
            Instruction::LAStore => Opcode::LAStore,
            Instruction::FAStore => Opcode::FAStore,
            Instruction::DAStore => Opcode::DAStore,
            Instruction::AAStore => Opcode::AAStore,
            Instruction::BAStore => Opcode::BAStore,
            Instruction::CAStore => Opcode::CAStore,
            Instruction::SAStore => Opcode::SAStore,
            Instruction::Pop => Opcode::Pop,
            Instruction::Pop2 => Opcode::Pop2,
            Instruction::Dup => Opcode::Dup,
            Instruction::DupX1 => Opcode::DupX1,
            Instruction::DupX2 => Opcode::DupX2,
            Instruction::Dup2 => Opcode::Dup2,
            Instruction::Dup2X1 => Opcode::Dup2X1,
            Instruction::Dup2X2 => Opcode::Dup2X2,
            Instruction::Swap => Opcode::Swap,
            Instruction::IAdd => Opcode::IAdd,
            Instruction::LAdd => Opcode::LAdd,
            Instruction::FAdd => Opcode::FAdd,
            Instruction::DAdd => Opcode::DAdd,
            Instruction::ISub => Opcode::ISub,
            Instruction::LSub => Opcode::LSub,
            Instruction::FSub => Opcode::FSub,
            Instruction::DSub => Opcode::DSub,
            Instruction::IMul => Opcode::IMul,
            Instruction::LMul => Opcode::LMul,
            Instruction::FMul => Opcode::FMul,
            Instruction::DMul => Opcode::DMul,
            Instruction::IDiv => Opcode::IDiv,
            Instruction::LDiv => Opcode::LDiv,
            Instruction::FDiv => Opcode::FDiv,
            Instruction::DDiv => Opcode::DDiv,
            Instruction::IRem => Opcode::IRem,
            Instruction::LRem => Opcode::LRem,
            Instruction::FRem => Opcode::FRem,
            Instruction::DRem => Opcode::DRem,
            Instruction::INeg => Opcode::INeg,
            Instruction::LNeg => Opcode::LNeg,
            Instruction::FNeg => Opcode::FNeg,
            Instruction::DNeg => Opcode::DNeg,
            Instruction::IShl => Opcode::IShl,
            Instruction::LShl => Opcode::LShl,
            Instruction::IShr => Opcode::IShr,
            Instruction::LShr => Opcode::LShr,
            Instruction::IUShr => Opcode::IUShr,
            Instruction::LUShr => Opcode::LUShr,
            Instruction::IAnd => Opcode::IAnd,
            Instruction::LAnd => Opcode::LAnd,
            Instruction::IOr => Opcode::IOr,
            Instruction::LOr => Opcode::LOr,
            Instruction::IXor => Opcode::IXor,
            Instruction::LXor => Opcode::LXor,
            Instruction::IInc { .. } => Opcode::IInc,
            Instruction::I2L => Opcode::I2L,
            Instruction::I2F => Opcode::I2F,
            Instruction::I2D => Opcode::I2D,
            Instruction::L2I => Opcode::L2I,
            Instruction::L2F => Opcode::L2F,
            Instruction::L2D => Opcode::L2D,
            Instruction::F2I => Opcode::F2I,
            Instruction::F2L => Opcode::F2L,
            Instruction::F2D => Opcode::F2D,
            Instruction::D2I => Opcode::D2I,
            Instruction::D2L => Opcode::D2L,
            Instruction::D2F => Opcode::D2F,
            Instruction::I2B => Opcode::I2B,
            Instruction::I2C => Opcode::I2C,
            Instruction::I2S => Opcode::I2S,
            Instruction::LCmp => Opcode::LCmp,
            Instruction::FCmpL => Opcode::FCmpL,
            Instruction::FCmpG => Opcode::FCmpG,
            Instruction::DCmpL => Opcode::DCmpL,
            Instruction::DCmpG => Opcode::DCmpG,
            Instruction::IfEq(_) => Opcode::IfEq,
            Instruction::IfNe(_) => Opcode::IfNe,
            Instruction::IfLt(_) => Opcode::IfLt,
            Instruction::IfGe(_) => Opcode::IfGe,
            Instruction::IfGt(_) => Opcode::IfGt,
            Instruction::IfLe(_) => Opcode::IfLe,
            Instruction::IfICmpEq(_) => Opcode::IfICmpEq,
            Instruction::IfICmpNe(_) => Opcode::IfICmpNe,
            Instruction::IfICmpLt(_) => Opcode::IfICmpLt,
            Instruction::IfICmpGe(_) => Opcode::IfICmpGe,
            Instruction::IfICmpGt(_) => Opcode::IfICmpGt,
            Instruction::IfICmpLe(_) => Opcode::IfICmpLe,
            Instruction::IfACmpEq(_) => Opcode::IfACmpEq,
            Instruction::IfACmpNe(_) => Opcode::IfACmpNe,
            Instruction::Goto(_) => Opcode::Goto,
            Instruction::Jsr(_) => Opcode::Jsr,
            Instruction::Ret(_) => Opcode::Ret,
            Instruction::TableSwitch(_) => Opcode::TableSwitch,
            Instruction::LookupSwitch(_) => Opcode::LookupSwitch,
            Instruction::IReturn => Opcode::IReturn,
            Instruction::LReturn => Opcode::LReturn,
            Instruction::FReturn => Opcode::FReturn,
            Instruction::DReturn => Opcode::DReturn,
            Instruction::AReturn => Opcode::AReturn,
            Instruction::Return => Opcode::Return,
            Instruction::GetStatic(_) => Opcode::GetStatic,
            Instruction::PutStatic(_) => Opcode::PutStatic,
            Instruction::GetField(_) => Opcode::GetField,
            Instruction::PutField(_) => Opcode::PutField,
            Instruction::InvokeVirtual(_) => Opcode::InvokeVirtual,
            Instruction::InvokeSpecial(_) => Opcode::InvokeSpecial,
            Instruction::InvokeStatic(_) => Opcode::InvokeStatic,
            Instruction::InvokeInterface { .. } => Opcode::InvokeInterface,
            Instruction::InvokeDynamic(_) => Opcode::InvokeDynamic,
            Instruction::New(_) => Opcode::New,
            Instruction::NewArray(_) => Opcode::NewArray,
            Instruction::ANewArray(_) => Opcode::ANewArray,
            Instruction::ArrayLength => Opcode::ArrayLength,
            Instruction::AThrow => Opcode::AThrow,
            Instruction::CheckCast(_) => Opcode::CheckCast,
            Instruction::InstanceOf(_) => Opcode::InstanceOf,
            Instruction::MonitorEnter => Opcode::MonitorEnter,
            Instruction::MonitorExit => Opcode::MonitorExit,
            Instruction::Wide { .. } | Instruction::WideIInc { .. } => Opcode::Wide,
            Instruction::MultiANewArray { .. } => Opcode::MultiANewArray,
            Instruction::IfNull(_) => Opcode::IfNull,
            Instruction::IfNonNull(_) => Opcode::IfNonNull,
            Instruction::GotoW(_) => Opcode::GotoW,
            Instruction::JsrW(_) => Opcode::JsrW,
            Instruction::Breakpoint => Opcode::Breakpoint,
            Instruction::ImpDep1 => Opcode::ImpDep1,
            Instruction::ImpDep2 => Opcode::ImpDep2,
        }
    }

    /// Relative jump offset, for conditional and unconditional branches (but not switches)
    pub fn branch_offset(&self) -> Option<i32> {
        match self {
            Instruction::IfEq(offset)
            | Instruction::IfNe(offset)
            | Instruction::IfLt(offset)
            | Instruction::IfGe(offset)
            | Instruction::IfGt(offset)
            | Instruction::IfLe(offset)
            | Instruction::IfICmpEq(offset)
            | Instruction::IfICmpNe(offset)
            | Instruction::IfICmpLt(offset)
            | Instruction::IfICmpGe(offset)
            | Instruction::IfICmpGt(offset)
            | Instruction::IfICmpLe(offset)
            | Instruction::IfACmpEq(offset)
            | Instruction::IfACmpNe(offset)
            | Instruction::Goto(offset)
            | Instruction::Jsr(offset)
            | Instruction::IfNull(offset)
            | Instruction::IfNonNull(offset) => Some(*offset as i32),
            Instruction::GotoW(offset) | Instruction::JsrW(offset) => Some(*offset),
            _ => None,
        }
    }

    /// Constant pool operand, if the instruction has one
    pub fn constant(&self) -> Option<ConstantRef<'p>> {
        match self {
            Instruction::Ldc(constant)
            | Instruction::LdcW(constant)
            | Instruction::Ldc2W(constant)
            | Instruction::GetStatic(constant)
            | Instruction::PutStatic(constant)
            | Instruction::GetField(constant)
            | Instruction::PutField(constant)
            | Instruction::InvokeVirtual(constant)
            | Instruction::InvokeSpecial(constant)
            | Instruction::InvokeStatic(constant)
            | Instruction::InvokeDynamic(constant)
            | Instruction::New(constant)
            | Instruction::ANewArray(constant)
            | Instruction::CheckCast(constant)
            | Instruction::InstanceOf(constant)
            | Instruction::InvokeInterface {
                method: constant, ..
            }
            | Instruction::MultiANewArray {
                class: constant, ..
            } => Some(*constant),
            _ => None,
        }
    }
}

impl<'p> Width for Instruction<'p> {
    fn width(&self) -> usize {
        match self {
            Instruction::Nop
            | Instruction::AConstNull
            | Instruction::IConstM1
            | Instruction::IConst0
            | Instruction::IConst1
            | Instruction::IConst2
            | Instruction::IConst3
            | Instruction::IConst4
            | Instruction::IConst5
            | Instruction::LConst0
            | Instruction::LConst1
            | Instruction::FConst0
            | Instruction::FConst1
            | Instruction::FConst2
            | Instruction::DConst0
            | Instruction::DConst1
            | Instruction::ILoad0
            | Instruction::ILoad1
            | Instruction::ILoad2
            | Instruction::ILoad3
            | Instruction::LLoad0
            | Instruction::LLoad1
            | Instruction::LLoad2
            | Instruction::LLoad3
            | Instruction::FLoad0
            | Instruction::FLoad1
            | Instruction::FLoad2
            | Instruction::FLoad3
            | Instruction::DLoad0
            | Instruction::DLoad1
            | Instruction::DLoad2
            | Instruction::DLoad3
            | Instruction::ALoad0
            | Instruction::ALoad1
            | Instruction::ALoad2
            | Instruction::ALoad3
            | Instruction::IALoad
            | Instruction::LALoad
            | Instruction::FALoad
            | Instruction::DALoad
            | Instruction::AALoad
            | Instruction::BALoad
            | Instruction::CALoad
            | Instruction::SALoad
            | Instruction::IStore0
            | Instruction::IStore1
            | Instruction::IStore2
            | Instruction::IStore3
            | Instruction::LStore0
            | Instruction::LStore1
            | Instruction::LStore2
            | Instruction::LStore3
            | Instruction::FStore0
            | Instruction::FStore1
            | Instruction::FStore2
            | Instruction::FStore3
            | Instruction::DStore0
            | Instruction::DStore1
            | Instruction::DStore2
            | Instruction::DStore3
            | Instruction::AStore0
            | Instruction::AStore1
            | Instruction::AStore2
            | Instruction::AStore3
            | Instruction::IAStore
            | Instruction::LAStore
            | Instruction::FAStore
            | Instruction::DAStore
            | Instruction::AAStore
            | Instruction::BAStore
            | Instruction::CAStore
            | Instruction::SAStore
            | Instruction::Pop
            | Instruction::Pop2
            | Instruction::Dup
            | Instruction::DupX1
            | Instruction::DupX2
            | Instruction::Dup2
            | Instruction::Dup2X1
            | Instruction::Dup2X2
            | Instruction::Swap
            | Instruction::IAdd
            | Instruction::LAdd
            | Instruction::FAdd
            | Instruction::DAdd
            | Instruction::ISub
            | Instruction::LSub
            | Instruction::FSub
            | Instruction::DSub
            | Instruction::IMul
            | Instruction::LMul
            | Instruction::FMul
            | Instruction::DMul
            | Instruction::IDiv
            | Instruction::LDiv
            | Instruction::FDiv
            | Instruction::DDiv
            | Instruction::IRem
            | Instruction::LRem
            | Instruction::FRem
            | Instruction::DRem
            | Instruction::INeg
            | Instruction::LNeg
            | Instruction::FNeg
            | Instruction::DNeg
            | Instruction::IShl
            | Instruction::LShl
            | Instruction::IShr
            | Instruction::LShr
            | Instruction::IUShr
            | Instruction::LUShr
            | Instruction::IAnd
            | Instruction::LAnd
            | Instruction::IOr
            | Instruction::LOr
            | Instruction::IXor
            | Instruction::LXor
            | Instruction::I2L
            | Instruction::I2F
            | Instruction::I2D
            | Instruction::L2I
            | Instruction::L2F
            | Instruction::L2D
            | Instruction::F2I
            | Instruction::F2L
            | Instruction::F2D
            | Instruction::D2I
            | Instruction::D2L
            | Instruction::D2F
            | Instruction::I2B
            | Instruction::I2C
            | Instruction::I2S
            | Instruction::LCmp
            | Instruction::FCmpL
            | Instruction::FCmpG
            | Instruction::DCmpL
            | Instruction::DCmpG
            | Instruction::IReturn
            | Instruction::LReturn
            | Instruction::FReturn
            | Instruction::DReturn
            | Instruction::AReturn
            | Instruction::Return
            | Instruction::ArrayLength
            | Instruction::AThrow
            | Instruction::MonitorEnter
            | Instruction::MonitorExit
            | Instruction::Breakpoint
            | Instruction::ImpDep1
            | Instruction::ImpDep2 => 1,

            Instruction::BiPush(_)
            | Instruction::Ldc(_)
            | Instruction::ILoad(_)
            | Instruction::LLoad(_)
            | Instruction::FLoad(_)
            | Instruction::DLoad(_)
            | Instruction::ALoad(_)
            | Instruction::IStore(_)
            | Instruction::LStore(_)
            | Instruction::FStore(_)
            | Instruction::DStore(_)
            | Instruction::AStore(_)
            | Instruction::Ret(_)
            | Instruction::NewArray(_) => 2,

            Instruction::SiPush(_)
            | Instruction::LdcW(_)
            | Instruction::Ldc2W(_)
            | Instruction::IInc { .. }
            | Instruction::IfEq(_)
            | Instruction::IfNe(_)
            | Instruction::IfLt(_)
            | Instruction::IfGe(_)
            | Instruction::IfGt(_)
            | Instruction::IfLe(_)
            | Instruction::IfICmpEq(_)
            | Instruction::IfICmpNe(_)
            | Instruction::IfICmpLt(_)
            | Instruction::IfICmpGe(_)
            | Instruction::IfICmpGt(_)
            | Instruction::IfICmpLe(_)
            | Instruction::IfACmpEq(_)
            | Instruction::IfACmpNe(_)
            | Instruction::Goto(_)
            | Instruction::Jsr(_)
            | Instruction::GetStatic(_)
            | Instruction::PutStatic(_)
            | Instruction::GetField(_)
            | Instruction::PutField(_)
            | Instruction::InvokeVirtual(_)
            | Instruction::InvokeSpecial(_)
            | Instruction::InvokeStatic(_)
            | Instruction::New(_)
            | Instruction::ANewArray(_)
            | Instruction::CheckCast(_)
            | Instruction::InstanceOf(_)
            | Instruction::IfNull(_)
            | Instruction::IfNonNull(_) => 3,

            Instruction::MultiANewArray { .. } => 4,

            Instruction::InvokeInterface { .. }
            | Instruction::InvokeDynamic(_)
            | Instruction::GotoW(_)
            | Instruction::JsrW(_) => 5,
            Instruction::Wide { .. } => 4,
            Instruction::WideIInc { .. } => 6,

            Instruction::TableSwitch(table) => {
                1 + table.padding as usize + 4 * (3 + table.offsets.len())
            }

            Instruction::LookupSwitch(lookup) => {
                1 + lookup.padding as usize + 8 * (1 + lookup.pairs.len())
            }
        }
    }
}

impl<'p> fmt::Display for Instruction<'p> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Wide { opcode, index } => {
                return match Opcode::try_from(*opcode) {
                    Ok(widened) => write!(f, "wide {} {}", widened, index),
                    Err(byte) => write!(f, "wide {:#04x} {}", byte, index),
                }
            }
            Instruction::WideIInc { index, constant } => {
                return write!(f, "wide iinc {}, {}", index, constant)
            }
            _ => f.write_str(self.opcode().mnemonic())?,
        }

        if let Some(offset) = self.branch_offset() {
            return write!(f, " {:+}", offset);
        }

        match self {
            Instruction::BiPush(value) => write!(f, " {}", value),
            Instruction::SiPush(value) => write!(f, " {}", value),
            Instruction::ILoad(index)
            | Instruction::LLoad(index)
            | Instruction::FLoad(index)
            | Instruction::DLoad(index)
            | Instruction::ALoad(index)
            | Instruction::IStore(index)
            | Instruction::LStore(index)
            | Instruction::FStore(index)
            | Instruction::DStore(index)
            | Instruction::AStore(index)
            | Instruction::Ret(index) => write!(f, " {}", index),
            Instruction::IInc { index, constant } => write!(f, " {}, {}", index, constant),
            Instruction::InvokeInterface { method, count } => {
                write!(f, " {}, {}", method.index, count)
            }
            Instruction::MultiANewArray { class, dimensions } => {
                write!(f, " {}, {}", class.index, dimensions)
            }
            Instruction::NewArray(atype) => match ArrayType::try_from(*atype) {
                Ok(array_type) => write!(f, " {}", array_type),
                Err(_) => write!(f, " {}", atype),
            },
            Instruction::TableSwitch(table) => {
                f.write_str(" {")?;
                for (key, offset) in table.cases() {
                    write!(f, " {}: {:+},", key, offset)?;
                }
                write!(f, " default: {:+} }}", table.default)
            }
            Instruction::LookupSwitch(lookup) => {
                f.write_str(" {")?;
                for (key, offset) in &lookup.pairs {
                    write!(f, " {}: {:+},", key, offset)?;
                }
                write!(f, " default: {:+} }}", lookup.default)
            }
            other => match other.constant() {
                Some(constant) => write!(f, " {}", constant.index),
                None => Ok(()),
            },
        }
    }
}

/// Operands of `tableswitch`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSwitch {
    /// Bytes between the opcode and the 4-byte aligned operands (0 to 3 inclusive)
    pub padding: u8,

    pub default: i32,
    pub low: i32,
    pub high: i32,

    /// Jump offsets for the keys `low` through `high`
    pub offsets: Vec<i32>,
}

impl TableSwitch {
    /// Key and jump offset of every (non-default) case
    pub fn cases(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .map(move |(i, offset)| (self.low.wrapping_add(i as i32), *offset))
    }
}

/// Operands of `lookupswitch`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupSwitch {
    /// Bytes between the opcode and the 4-byte aligned operands (0 to 3 inclusive)
    pub padding: u8,

    pub default: i32,

    /// Match keys and their jump offsets
    pub pairs: Vec<(i32, i32)>,
}

/// Element type code used by `newarray`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrayType {
    Boolean,
    Char,
    Float,
    Double,
    Byte,
    Short,
    Int,
    Long,
}

impl ArrayType {
    pub fn code(self) -> u8 {
        match self {
            ArrayType::Boolean => 4,
            ArrayType::Char => 5,
            ArrayType::Float => 6,
            ArrayType::Double => 7,
            ArrayType::Byte => 8,
            ArrayType::Short => 9,
            ArrayType::Int => 10,
            ArrayType::Long => 11,
        }
    }
}

impl TryFrom<u8> for ArrayType {
    type Error = u8;

    fn try_from(code: u8) -> Result<ArrayType, u8> {
        match code {
            4 => Ok(ArrayType::Boolean),
            5 => Ok(ArrayType::Char),
            6 => Ok(ArrayType::Float),
            7 => Ok(ArrayType::Double),
            8 => Ok(ArrayType::Byte),
            9 => Ok(ArrayType::Short),
            10 => Ok(ArrayType::Int),
            11 => Ok(ArrayType::Long),
            other => Err(other),
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArrayType::Boolean => "boolean",
            ArrayType::Char => "char",
            ArrayType::Float => "float",
            ArrayType::Double => "double",
            ArrayType::Byte => "byte",
            ArrayType::Short => "short",
            ArrayType::Int => "int",
            ArrayType::Long => "long",
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn widths() {
        let class = Constant::Integer(1);
        let constant = ConstantRef {
            index: ConstantIndex(4),
            entry: &class,
        };
        assert_eq!(Instruction::Nop.width(), 1);
        assert_eq!(Instruction::ILoad0.width(), 1);
        assert_eq!(Instruction::ILoad(4).width(), 2);
        assert_eq!(Instruction::Ldc(constant).width(), 2);
        assert_eq!(Instruction::LdcW(constant).width(), 3);
        assert_eq!(Instruction::IInc { index: 1, constant: -1 }.width(), 3);
        assert_eq!(Instruction::Goto(-3).width(), 3);
        assert_eq!(Instruction::GotoW(70000).width(), 5);
        assert_eq!(Instruction::InvokeDynamic(constant).width(), 5);
        assert_eq!(
            Instruction::InvokeInterface {
                method: constant,
                count: 2
            }
            .width(),
            5
        );
        assert_eq!(
            Instruction::MultiANewArray {
                class: constant,
                dimensions: 2
            }
            .width(),
            4
        );
        assert_eq!(
            Instruction::Wide {
                opcode: Opcode::ALoad.byte(),
                index: 300
            }
            .width(),
            4
        );
        assert_eq!(
            Instruction::WideIInc {
                index: 300,
                constant: -5
            }
            .width(),
            6
        );
    }

    #[test]
    fn switch_widths() {
        let table = TableSwitch {
            padding: 3,
            default: 20,
            low: -1,
            high: 1,
            offsets: vec![4, 8, 12],
        };
        assert_eq!(Instruction::TableSwitch(table.clone()).width(), 1 + 3 + 12 + 12);
        assert_eq!(table.cases().collect::<Vec<_>>(), vec![(-1, 4), (0, 8), (1, 12)]);

        let lookup = LookupSwitch {
            padding: 0,
            default: 20,
            pairs: vec![(5, 4), (900, 8)],
        };
        assert_eq!(Instruction::LookupSwitch(lookup).width(), 1 + 8 + 16);
    }

    #[test]
    fn opcodes_of_wide_forms() {
        let wide = Instruction::Wide {
            opcode: Opcode::IStore.byte(),
            index: 256,
        };
        assert_eq!(wide.opcode(), Opcode::Wide);
        assert_eq!(
            Instruction::WideIInc {
                index: 0,
                constant: 0
            }
            .opcode(),
            Opcode::Wide
        );
        assert_eq!(Instruction::IfNonNull(3).opcode(), Opcode::IfNonNull);
    }

    #[test]
    fn display() {
        let field = Constant::Integer(0);
        let constant = ConstantRef {
            index: ConstantIndex(12),
            entry: &field,
        };
        assert_eq!(Instruction::IConstM1.to_string(), "iconst_m1");
        assert_eq!(Instruction::BiPush(-8).to_string(), "bipush -8");
        assert_eq!(Instruction::IfICmpGe(12).to_string(), "if_icmpge +12");
        assert_eq!(Instruction::Goto(-7).to_string(), "goto -7");
        assert_eq!(Instruction::GetField(constant).to_string(), "getfield #12");
        assert_eq!(
            Instruction::InvokeInterface {
                method: constant,
                count: 3
            }
            .to_string(),
            "invokeinterface #12, 3"
        );
        assert_eq!(Instruction::NewArray(10).to_string(), "newarray int");
        assert_eq!(Instruction::NewArray(42).to_string(), "newarray 42");
        assert_eq!(
            Instruction::WideIInc {
                index: 300,
                constant: -5
            }
            .to_string(),
            "wide iinc 300, -5"
        );
        assert_eq!(
            Instruction::Wide {
                opcode: 0x16,
                index: 1000
            }
            .to_string(),
            "wide lload 1000"
        );
        assert_eq!(
            Instruction::Wide {
                opcode: 0xee,
                index: 7
            }
            .to_string(),
            "wide 0xee 7"
        );
        assert_eq!(
            Instruction::LookupSwitch(LookupSwitch {
                padding: 2,
                default: 30,
                pairs: vec![(1, 20)],
            })
            .to_string(),
            "lookupswitch { 1: +20, default: +30 }"
        );
    }

    #[test]
    fn array_types() {
        for code in 4..=11 {
            assert_eq!(ArrayType::try_from(code).map(ArrayType::code), Ok(code));
        }
        assert_eq!(ArrayType::try_from(3), Err(3));
    }
}
