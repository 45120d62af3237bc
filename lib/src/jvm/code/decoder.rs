use crate::jvm::class_file::{CodeBuffer, ConstantIndex, ConstantKinds, ConstantPoolView};
use crate::jvm::code::{
    BytecodeVisitor, ConstantRef, Instruction, LookupSwitch, Opcode, TableSwitch,
};
use crate::jvm::ClassFormatError;
use crate::util::Width;
use byteorder::{BigEndian, ByteOrder};
use std::convert::TryFrom;
use std::iter::FusedIterator;

/// Decode the code array of a `Code` attribute, feeding every instruction to the visitor
///
/// Instructions are visited in program order. Decoding stops at the first malformed instruction,
/// in which case the visitor will already have seen every instruction before it.
pub fn decode<'p, P, V>(
    code: &CodeBuffer,
    pool: &'p P,
    visitor: &mut V,
) -> Result<(), ClassFormatError>
where
    P: ConstantPoolView + ?Sized,
    V: BytecodeVisitor<'p> + ?Sized,
{
    decode_bytes(code.code(), pool, visitor)
}

/// Decode a bare code array, feeding every instruction to the visitor
///
/// See [`decode`].
pub fn decode_bytes<'p, P, V>(
    code: &[u8],
    pool: &'p P,
    visitor: &mut V,
) -> Result<(), ClassFormatError>
where
    P: ConstantPoolView + ?Sized,
    V: BytecodeVisitor<'p> + ?Sized,
{
    log::debug!("Decoding {} bytes of code", code.len());
    let mut decoded = 0;
    for result in InstructionReader::new(code, pool) {
        match result {
            Ok((pc, instruction)) => {
                visitor.visit(pc, &instruction);
                decoded += 1;
            }
            Err(err) => {
                log::debug!("Decoding stopped after {} instructions: {}", decoded, err);
                return Err(err);
            }
        }
    }
    log::debug!("Decoded {} instructions", decoded);
    Ok(())
}

/// Iterator over the instructions in a code array
///
/// Every item is the `pc` of an instruction along with the instruction. After the first error,
/// the iterator is exhausted.
pub struct InstructionReader<'c, 'p, P: ?Sized> {
    code: &'c [u8],
    pool: &'p P,

    /// Offset of the next instruction
    pc: usize,

    failed: bool,
}

impl<'c, 'p, P: ConstantPoolView + ?Sized> InstructionReader<'c, 'p, P> {
    pub fn new(code: &'c [u8], pool: &'p P) -> InstructionReader<'c, 'p, P> {
        InstructionReader {
            code,
            pool,
            pc: 0,
            failed: false,
        }
    }

    /// Offset of the next instruction to be read
    pub fn pc(&self) -> u32 {
        self.pc as u32
    }
}

impl<'c, 'p, P: ConstantPoolView + ?Sized> Iterator for InstructionReader<'c, 'p, P> {
    type Item = Result<(u32, Instruction<'p>), ClassFormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pc >= self.code.len() {
            return None;
        }

        let pc = self.pc;
        let mut cursor = CodeCursor::new(self.code, pc);
        match read_instruction(self.pool, &mut cursor) {
            Ok(instruction) => {
                debug_assert_eq!(instruction.width(), cursor.position - pc);
                log::trace!("{:>5}: {}", pc, instruction);
                self.pc = cursor.position;
                Some(Ok((pc as u32, instruction)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<'c, 'p, P: ConstantPoolView + ?Sized> FusedIterator for InstructionReader<'c, 'p, P> {}

/// Bounds-checked reads of the operands of a single instruction
struct CodeCursor<'c> {
    code: &'c [u8],

    /// Offset of the opcode of the instruction being read
    pc: usize,

    /// Offset of the next byte to read
    position: usize,
}

impl<'c> CodeCursor<'c> {
    fn new(code: &'c [u8], pc: usize) -> CodeCursor<'c> {
        CodeCursor {
            code,
            pc,
            position: pc,
        }
    }

    fn remaining(&self) -> usize {
        self.code.len() - self.position
    }

    fn truncated(&self, len: usize) -> ClassFormatError {
        ClassFormatError::TruncatedCode {
            pc: self.pc as u32,
            needed: (self.position - self.pc).saturating_add(len),
            available: self.code.len() - self.pc,
        }
    }

    fn invalid(&self, opcode: u8) -> ClassFormatError {
        ClassFormatError::InvalidBytecode {
            pc: self.pc as u32,
            opcode,
        }
    }

    fn take(&mut self, len: usize) -> Result<&'c [u8], ClassFormatError> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let bytes = &self.code[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, ClassFormatError> {
        Ok(self.take(1)?[0])
    }

    fn i8(&mut self) -> Result<i8, ClassFormatError> {
        Ok(self.u8()? as i8)
    }

    fn u16(&mut self) -> Result<u16, ClassFormatError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    fn i16(&mut self) -> Result<i16, ClassFormatError> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    fn i32(&mut self) -> Result<i32, ClassFormatError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    /// Skip the padding that aligns switch operands to a multiple of 4 bytes from the start of
    /// the code array
    fn switch_padding(&mut self) -> Result<u8, ClassFormatError> {
        let padding = (4 - self.position % 4) % 4;
        self.take(padding)?;
        Ok(padding as u8)
    }

    /// Take a table of `count` entries each `entry_len` bytes long, checking first that the code
    /// array is long enough to hold it
    fn table(&mut self, count: u64, entry_len: usize) -> Result<&'c [u8], ClassFormatError> {
        let len = usize::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(entry_len))
            .unwrap_or(usize::MAX);
        self.take(len)
    }
}

fn constant<'p, P: ConstantPoolView + ?Sized>(
    pool: &'p P,
    index: u16,
    expected: ConstantKinds,
) -> Result<ConstantRef<'p>, ClassFormatError> {
    let index = ConstantIndex(index);
    let entry = pool.entry_of_kind(index, expected)?;
    Ok(ConstantRef { index, entry })
}

fn read_instruction<'p, P: ConstantPoolView + ?Sized>(
    pool: &'p P,
    cursor: &mut CodeCursor<'_>,
) -> Result<Instruction<'p>, ClassFormatError> {
    let byte = cursor.u8()?;
    let opcode = Opcode::try_from(byte).map_err(|byte| cursor.invalid(byte))?;

    let instruction = match opcode {
        Opcode::Nop => Instruction::Nop,
        Opcode::AConstNull => Instruction::AConstNull,
        Opcode::IConstM1 => Instruction::IConstM1,
        Opcode::IConst0 => Instruction::IConst0,
        Opcode::IConst1 => Instruction::IConst1,
        Opcode::IConst2 => Instruction::IConst2,
        Opcode::IConst3 => Instruction::IConst3,
        Opcode::IConst4 => Instruction::IConst4,
        Opcode::IConst5 => Instruction::IConst5,
        Opcode::LConst0 => Instruction::LConst0,
        Opcode::LConst1 => Instruction::LConst1,
        Opcode::FConst0 => Instruction::FConst0,
        Opcode::FConst1 => Instruction::FConst1,
        Opcode::FConst2 => Instruction::FConst2,
        Opcode::DConst0 => Instruction::DConst0,
        Opcode::DConst1 => Instruction::DConst1,
        Opcode::ILoad0 => Instruction::ILoad0,
        Opcode::ILoad1 => Instruction::ILoad1,
        Opcode::ILoad2 => Instruction::ILoad2,
        Opcode::ILoad3 => Instruction::ILoad3,
        Opcode::LLoad0 => Instruction::LLoad0,
        Opcode::LLoad1 => Instruction::LLoad1,
        Opcode::LLoad2 => Instruction::LLoad2,
        Opcode::LLoad3 => Instruction::LLoad3,
        Opcode::FLoad0 => Instruction::FLoad0,
        Opcode::FLoad1 => Instruction::FLoad1,
        Opcode::FLoad2 => Instruction::FLoad2,
        Opcode::FLoad3 => Instruction::FLoad3,
        Opcode::DLoad0 => Instruction::DLoad0,
        Opcode::DLoad1 => Instruction::DLoad1,
        Opcode::DLoad2 => Instruction::DLoad2,
        Opcode::DLoad3 => Instruction::DLoad3,
        Opcode::ALoad0 => Instruction::ALoad0,
        Opcode::ALoad1 => Instruction::ALoad1,
        Opcode::ALoad2 => Instruction::ALoad2,
        Opcode::ALoad3 => Instruction::ALoad3,
        Opcode::IALoad => Instruction::IALoad,
        Opcode::LALoad => Instruction::LALoad,
        Opcode::FALoad => Instruction::FALoad,
        Opcode::DALoad => Instruction::DALoad,
        Opcode::AALoad => Instruction::AALoad,
        Opcode::BALoad => Instruction::BALoad,
        Opcode::CALoad => Instruction::CALoad,
        Opcode::SALoad => Instruction::SALoad,
        Opcode::IStore0 => Instruction::IStore0,
        Opcode::IStore1 => Instruction::IStore1,
        Opcode::IStore2 => Instruction::IStore2,
        Opcode::IStore3 => Instruction::IStore3,
        Opcode::LStore0 => Instruction::LStore0,
        Opcode::LStore1 => Instruction::LStore1,
        Opcode::LStore2 => Instruction::LStore2,
        Opcode::LStore3 => Instruction::LStore3,
        Opcode::FStore0 => Instruction::FStore0,
        Opcode::FStore1 => Instruction::FStore1,
        Opcode::FStore2 => Instruction::FStore2,
        Opcode::FStore3 => Instruction::FStore3,
        Opcode::DStore0 => Instruction::DStore0,
        Opcode::DStore1 => Instruction::DStore1,
        Opcode::DStore2 => Instruction::DStore2,
        Opcode::DStore3 => Instruction::DStore3,
        Opcode::AStore0 => Instruction::AStore0,
        Opcode::AStore1 => Instruction::AStore1,
        Opcode::AStore2 => Instruction::AStore2,
        Opcode::AStore3 => Instruction::AStore3,
        Opcode::IAStore => Instruction::IAStore,
        Opcode::LAStore => Instruction::LAStore,
        Opcode::FAStore => Instruction::FAStore,
        Opcode::DAStore => Instruction::DAStore,
        Opcode::AAStore => Instruction::AAStore,
        Opcode::BAStore => Instruction::BAStore,
        Opcode::CAStore => Instruction::CAStore,
        Opcode::SAStore => Instruction::SAStore,
        Opcode::Pop => Instruction::Pop,
        Opcode::Pop2 => Instruction::Pop2,
        Opcode::Dup => Instruction::Dup,
        Opcode::DupX1 => Instruction::DupX1,
        Opcode::DupX2 => Instruction::DupX2,
        Opcode::Dup2 => Instruction::Dup2,
        Opcode::Dup2X1 => Instruction::Dup2X1,
        Opcode::Dup2X2 => Instruction::Dup2X2,
        Opcode::Swap => Instruction::Swap,
        Opcode::IAdd => Instruction::IAdd,
        Opcode::LAdd => Instruction::LAdd,
        Opcode::FAdd => Instruction::FAdd,
        Opcode::DAdd => Instruction::DAdd,
        Opcode::ISub => Instruction::ISub,
        Opcode::LSub => Instruction::LSub,
        Opcode::FSub => Instruction::FSub,
        Opcode::DSub => Instruction::DSub,
        Opcode::IMul => Instruction::IMul,
        Opcode::LMul => Instruction::LMul,
        Opcode::FMul => Instruction::FMul,
        Opcode::DMul => Instruction::DMul,
        Opcode::IDiv => Instruction::IDiv,
        Opcode::LDiv => Instruction::LDiv,
        Opcode::FDiv => Instruction::FDiv,
        Opcode::DDiv => Instruction::DDiv,
        Opcode::IRem => Instruction::IRem,
        Opcode::LRem => Instruction::LRem,
        Opcode::FRem => Instruction::FRem,
        Opcode::DRem => Instruction::DRem,
        Opcode::INeg => Instruction::INeg,
        Opcode::LNeg => Instruction::LNeg,
        Opcode::FNeg => Instruction::FNeg,
        Opcode::DNeg => Instruction::DNeg,
        Opcode::IShl => Instruction::IShl,
        Opcode::LShl => Instruction::LShl,
        Opcode::IShr => Instruction::IShr,
        Opcode::LShr => Instruction::LShr,
        Opcode::IUShr => Instruction::IUShr,
        Opcode::LUShr => Instruction::LUShr,
        Opcode::IAnd => Instruction::IAnd,
        Opcode::LAnd => Instruction::LAnd,
        Opcode::IOr => Instruction::IOr,
        Opcode::LOr => Instruction::LOr,
        Opcode::IXor => Instruction::IXor,
        Opcode::LXor => Instruction::LXor,
        Opcode::I2L => Instruction::I2L,
        Opcode::I2F => Instruction::I2F,
        Opcode::I2D => Instruction::I2D,
        Opcode::L2I => Instruction::L2I,
        Opcode::L2F => Instruction::L2F,
        Opcode::L2D => Instruction::L2D,
        Opcode::F2I => Instruction::F2I,
        Opcode::F2L => Instruction::F2L,
        Opcode::F2D => Instruction::F2D,
        Opcode::D2I => Instruction::D2I,
        Opcode::D2L => Instruction::D2L,
        Opcode::D2F => Instruction::D2F,
        Opcode::I2B => Instruction::I2B,
        Opcode::I2C => Instruction::I2C,
        Opcode::I2S => Instruction::I2S,
        Opcode::LCmp => Instruction::LCmp,
        Opcode::FCmpL => Instruction::FCmpL,
        Opcode::FCmpG => Instruction::FCmpG,
        Opcode::DCmpL => Instruction::DCmpL,
        Opcode::DCmpG => Instruction::DCmpG,
        Opcode::IReturn => Instruction::IReturn,
        Opcode::LReturn => Instruction::LReturn,
        Opcode::FReturn => Instruction::FReturn,
        Opcode::DReturn => Instruction::DReturn,
        Opcode::AReturn => Instruction::AReturn,
        Opcode::Return => Instruction::Return,
        Opcode::ArrayLength => Instruction::ArrayLength,
        Opcode::AThrow => Instruction::AThrow,
        Opcode::MonitorEnter => Instruction::MonitorEnter,
        Opcode::MonitorExit => Instruction::MonitorExit,
        Opcode::Breakpoint => Instruction::Breakpoint,
        Opcode::ImpDep1 => Instruction::ImpDep1,
        Opcode::ImpDep2 => Instruction::ImpDep2,

        Opcode::BiPush => Instruction::BiPush(cursor.i8()?),
        Opcode::SiPush => Instruction::SiPush(cursor.i16()?),

        Opcode::Ldc => {
            let index = cursor.u8()?;
            Instruction::Ldc(constant(pool, index as u16, ConstantKinds::LOADABLE)?)
        }
        Opcode::LdcW => Instruction::LdcW(constant(pool, cursor.u16()?, ConstantKinds::LOADABLE)?),
        Opcode::Ldc2W => {
            let index = cursor.u16()?;
            Instruction::Ldc2W(constant(pool, index, ConstantKinds::LOADABLE_WIDE)?)
        }

        Opcode::ILoad => Instruction::ILoad(cursor.u8()?),
        Opcode::LLoad => Instruction::LLoad(cursor.u8()?),
        Opcode::FLoad => Instruction::FLoad(cursor.u8()?),
        Opcode::DLoad => Instruction::DLoad(cursor.u8()?),
        Opcode::ALoad => Instruction::ALoad(cursor.u8()?),
        Opcode::IStore => Instruction::IStore(cursor.u8()?),
        Opcode::LStore => Instruction::LStore(cursor.u8()?),
        Opcode::FStore => Instruction::FStore(cursor.u8()?),
        Opcode::DStore => Instruction::DStore(cursor.u8()?),
        Opcode::AStore => Instruction::AStore(cursor.u8()?),
        Opcode::Ret => Instruction::Ret(cursor.u8()?),
        Opcode::IInc => Instruction::IInc {
            index: cursor.u8()?,
            constant: cursor.i8()?,
        },

        Opcode::IfEq => Instruction::IfEq(cursor.i16()?),
        Opcode::IfNe => Instruction::IfNe(cursor.i16()?),
        Opcode::IfLt => Instruction::IfLt(cursor.i16()?),
        Opcode::IfGe => Instruction::IfGe(cursor.i16()?),
        Opcode::IfGt => Instruction::IfGt(cursor.i16()?),
        Opcode::IfLe => Instruction::IfLe(cursor.i16()?),
        Opcode::IfICmpEq => Instruction::IfICmpEq(cursor.i16()?),
        Opcode::IfICmpNe => Instruction::IfICmpNe(cursor.i16()?),
        Opcode::IfICmpLt => Instruction::IfICmpLt(cursor.i16()?),
        Opcode::IfICmpGe => Instruction::IfICmpGe(cursor.i16()?),
        Opcode::IfICmpGt => Instruction::IfICmpGt(cursor.i16()?),
        Opcode::IfICmpLe => Instruction::IfICmpLe(cursor.i16()?),
        Opcode::IfACmpEq => Instruction::IfACmpEq(cursor.i16()?),
        Opcode::IfACmpNe => Instruction::IfACmpNe(cursor.i16()?),
        Opcode::Goto => Instruction::Goto(cursor.i16()?),
        Opcode::Jsr => Instruction::Jsr(cursor.i16()?),
        Opcode::IfNull => Instruction::IfNull(cursor.i16()?),
        Opcode::IfNonNull => Instruction::IfNonNull(cursor.i16()?),
        Opcode::GotoW => Instruction::GotoW(cursor.i32()?),
        Opcode::JsrW => Instruction::JsrW(cursor.i32()?),

        Opcode::TableSwitch => {
            let padding = cursor.switch_padding()?;
            let default = cursor.i32()?;
            let low = cursor.i32()?;
            let high = cursor.i32()?;
            if high < low {
                return Err(cursor.invalid(byte));
            }
            let count = (high as i64 - low as i64 + 1) as u64;
            let offsets = cursor
                .table(count, 4)?
                .chunks_exact(4)
                .map(BigEndian::read_i32)
                .collect();
            Instruction::TableSwitch(TableSwitch {
                padding,
                default,
                low,
                high,
                offsets,
            })
        }
        Opcode::LookupSwitch => {
            let padding = cursor.switch_padding()?;
            let default = cursor.i32()?;
            let npairs = cursor.i32()?;
            if npairs < 0 {
                return Err(cursor.invalid(byte));
            }
            let pairs = cursor
                .table(npairs as u64, 8)?
                .chunks_exact(8)
                .map(|pair| (BigEndian::read_i32(&pair[..4]), BigEndian::read_i32(&pair[4..])))
                .collect();
            Instruction::LookupSwitch(LookupSwitch {
                padding,
                default,
                pairs,
            })
        }

        Opcode::GetStatic => {
            Instruction::GetStatic(constant(pool, cursor.u16()?, ConstantKinds::FIELD_REF)?)
        }
        Opcode::PutStatic => {
            Instruction::PutStatic(constant(pool, cursor.u16()?, ConstantKinds::FIELD_REF)?)
        }
        Opcode::GetField => {
            Instruction::GetField(constant(pool, cursor.u16()?, ConstantKinds::FIELD_REF)?)
        }
        Opcode::PutField => {
            Instruction::PutField(constant(pool, cursor.u16()?, ConstantKinds::FIELD_REF)?)
        }
        Opcode::InvokeVirtual => {
            Instruction::InvokeVirtual(constant(pool, cursor.u16()?, ConstantKinds::METHOD_REF)?)
        }
        Opcode::InvokeSpecial => {
            Instruction::InvokeSpecial(constant(pool, cursor.u16()?, ConstantKinds::METHOD_REF)?)
        }
        Opcode::InvokeStatic => {
            Instruction::InvokeStatic(constant(pool, cursor.u16()?, ConstantKinds::METHOD_REF)?)
        }
        Opcode::InvokeInterface => {
            let index = cursor.u16()?;
            let count = cursor.u8()?;
            let reserved = cursor.u8()?;
            let method = constant(pool, index, ConstantKinds::INTERFACE_METHOD_REF)?;
            if reserved != 0 {
                return Err(ClassFormatError::InvalidArgumentsForInvokeinterface {
                    pc: cursor.pc as u32,
                    reserved,
                });
            }
            Instruction::InvokeInterface { method, count }
        }
        Opcode::InvokeDynamic => {
            let index = cursor.u16()?;
            cursor.take(2)?;
            Instruction::InvokeDynamic(constant(pool, index, ConstantKinds::INVOKE_DYNAMIC)?)
        }

        Opcode::New => Instruction::New(constant(pool, cursor.u16()?, ConstantKinds::CLASS)?),
        Opcode::NewArray => Instruction::NewArray(cursor.u8()?),
        Opcode::ANewArray => {
            Instruction::ANewArray(constant(pool, cursor.u16()?, ConstantKinds::CLASS)?)
        }
        Opcode::CheckCast => {
            Instruction::CheckCast(constant(pool, cursor.u16()?, ConstantKinds::CLASS)?)
        }
        Opcode::InstanceOf => {
            Instruction::InstanceOf(constant(pool, cursor.u16()?, ConstantKinds::CLASS)?)
        }
        Opcode::MultiANewArray => {
            let index = cursor.u16()?;
            let dimensions = cursor.u8()?;
            let class = constant(pool, index, ConstantKinds::CLASS)?;
            Instruction::MultiANewArray { class, dimensions }
        }

        // Only `iinc` has a different shape. Any other sub-opcode gets a 2-byte index, whether or
        // not it is one the verifier would accept after `wide`.
        Opcode::Wide => {
            let widened = cursor.u8()?;
            if widened == Opcode::IInc.byte() {
                Instruction::WideIInc {
                    index: cursor.u16()?,
                    constant: cursor.i16()?,
                }
            } else {
                Instruction::Wide {
                    opcode: widened,
                    index: cursor.u16()?,
                }
            }
        }
    };

    Ok(instruction)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_file::{Constant, ConstantKind, ConstantPool};

    fn read_all(code: &[u8], pool: &ConstantPool) -> Result<Vec<(u32, String)>, ClassFormatError> {
        InstructionReader::new(code, pool)
            .map(|result| result.map(|(pc, instruction)| (pc, instruction.to_string())))
            .collect()
    }

    #[test]
    fn cursor_reports_truncation_from_opcode() {
        let code = [0x00, 0x11, 0x01];
        let mut cursor = CodeCursor::new(&code, 1);
        assert_eq!(cursor.u8(), Ok(0x11));
        assert_eq!(
            cursor.i16(),
            Err(ClassFormatError::TruncatedCode {
                pc: 1,
                needed: 3,
                available: 2
            })
        );
    }

    #[test]
    fn switch_padding_is_relative_to_code_start() {
        for pc in 0..8 {
            let code = vec![0u8; 16];
            let mut cursor = CodeCursor::new(&code, pc);
            cursor.u8().unwrap();
            let padding = cursor.switch_padding().unwrap() as usize;
            assert_eq!((pc + 1 + padding) % 4, 0);
            assert!(padding < 4);
        }
    }

    #[test]
    fn tableswitch() {
        let pool = ConstantPool::new();
        #[rustfmt::skip]
        let code = [
            0x1a,                   // iload_0
            0xaa, 0x00, 0x00,       // tableswitch + 2 bytes padding
            0x00, 0x00, 0x00, 0x1c, // default: +28
            0x00, 0x00, 0x00, 0x01, // low: 1
            0x00, 0x00, 0x00, 0x02, // high: 2
            0x00, 0x00, 0x00, 0x18, // 1: +24
            0x00, 0x00, 0x00, 0x1a, // 2: +26
            0x04,                   // iconst_1
            0xac,                   // ireturn
            0x05,                   // iconst_2
            0xac,                   // ireturn
            0x03,                   // iconst_0
            0xac,                   // ireturn
        ];
        let instructions: Vec<_> = InstructionReader::new(&code, &pool)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(instructions.len(), 8);
        assert_eq!(
            instructions[1],
            (
                1,
                Instruction::TableSwitch(TableSwitch {
                    padding: 2,
                    default: 28,
                    low: 1,
                    high: 2,
                    offsets: vec![24, 26],
                })
            )
        );
        assert_eq!(instructions[2].0, 24);
    }

    #[test]
    fn lookupswitch() {
        let pool = ConstantPool::new();
        #[rustfmt::skip]
        let code = [
            0xab,                   // lookupswitch + 3 bytes padding
            0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x14, // default: +20
            0x00, 0x00, 0x00, 0x01, // npairs: 1
            0xff, 0xff, 0xff, 0xff, // -1: +20
            0x00, 0x00, 0x00, 0x14,
            0xb1,                   // return
        ];
        assert_eq!(
            read_all(&code, &pool),
            Ok(vec![
                (0, String::from("lookupswitch { -1: +20, default: +20 }")),
                (20, String::from("return")),
            ])
        );
    }

    #[test]
    fn impossible_switch_bounds() {
        let pool = ConstantPool::new();
        #[rustfmt::skip]
        let tableswitch = [
            0xaa, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x05, // low: 5
            0x00, 0x00, 0x00, 0x04, // high: 4
        ];
        assert_eq!(
            read_all(&tableswitch, &pool),
            Err(ClassFormatError::InvalidBytecode { pc: 0, opcode: 0xaa })
        );

        #[rustfmt::skip]
        let lookupswitch = [
            0xab, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x80, 0x00, 0x00, 0x00, // npairs: i32::MIN
        ];
        assert_eq!(
            read_all(&lookupswitch, &pool),
            Err(ClassFormatError::InvalidBytecode { pc: 0, opcode: 0xab })
        );
    }

    #[test]
    fn oversized_switch_table_is_truncated() {
        let pool = ConstantPool::new();
        #[rustfmt::skip]
        let code = [
            0xaa, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x80, 0x00, 0x00, 0x00, // low: i32::MIN
            0x7f, 0xff, 0xff, 0xff, // high: i32::MAX
        ];
        match read_all(&code, &pool) {
            Err(ClassFormatError::TruncatedCode { pc: 0, available, .. }) => {
                assert_eq!(available, 16)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn wide_forms() {
        let pool = ConstantPool::new();
        let code = [0xc4, 0x19, 0x01, 0x00, 0xc4, 0x84, 0x01, 0x2c, 0xff, 0xfb];
        assert_eq!(
            read_all(&code, &pool),
            Ok(vec![
                (0, String::from("wide aload 256")),
                (4, String::from("wide iinc 300, -5")),
            ])
        );

        // sub-opcodes outside the load/store family still take a 2-byte index
        assert_eq!(
            read_all(&[0xc4, 0x00, 0x01, 0x00, 0xb1], &pool),
            Ok(vec![
                (0, String::from("wide nop 256")),
                (4, String::from("return")),
            ])
        );
        assert_eq!(
            read_all(&[0xc4, 0xcb, 0x00, 0x02], &pool),
            Ok(vec![(0, String::from("wide 0xcb 2"))])
        );
        assert_eq!(
            read_all(&[0xc4, 0x15, 0x01], &pool),
            Err(ClassFormatError::TruncatedCode {
                pc: 0,
                needed: 4,
                available: 3
            })
        );
        assert_eq!(
            read_all(&[0xc4], &pool),
            Err(ClassFormatError::TruncatedCode {
                pc: 0,
                needed: 2,
                available: 1
            })
        );
    }

    #[test]
    fn constant_kinds_are_checked() {
        let mut pool = ConstantPool::new();
        let string = pool.get_string("hello").unwrap();
        let long = pool.push(Constant::Long(1)).unwrap();

        let ldc = [0x12, string.0 as u8];
        assert_eq!(read_all(&ldc, &pool), Ok(vec![(0, format!("ldc {}", string))]));

        let ldc_long = [0x12, long.0 as u8];
        assert_eq!(
            read_all(&ldc_long, &pool),
            Err(ClassFormatError::InvalidConstantPoolEntry {
                index: long,
                found: Some(ConstantKind::Long),
                expected: ConstantKinds::LOADABLE,
            })
        );

        let ldc2_w = [0x14, 0x00, long.0 as u8];
        assert!(read_all(&ldc2_w, &pool).is_ok());

        // slot after a `Long` is unusable
        let unusable = [0x14, 0x00, long.0 as u8 + 1];
        assert_eq!(
            read_all(&unusable, &pool),
            Err(ClassFormatError::InvalidConstantPoolEntry {
                index: ConstantIndex(long.0 + 1),
                found: None,
                expected: ConstantKinds::LOADABLE_WIDE,
            })
        );
    }

    #[test]
    fn truncation_wins_over_constant_kind() {
        let mut pool = ConstantPool::new();
        let method = pool
            .get_method_ref("java/lang/Object", "hashCode", "()I", false)
            .unwrap();
        let [hi, lo] = method.0.to_be_bytes();

        // `invokeinterface`, `invokedynamic`, and `multianewarray` all cut short, with an index of
        // the wrong kind
        for code in [vec![0xb9, hi, lo], vec![0xba, hi, lo, 0x00], vec![0xc5, hi, lo]] {
            match read_all(&code, &pool) {
                Err(ClassFormatError::TruncatedCode { pc: 0, available, .. }) => {
                    assert_eq!(available, code.len())
                }
                other => panic!("unexpected result {:?} for {:02x?}", other, code),
            }
        }

        // once complete, the kind check applies
        assert_eq!(
            read_all(&[0xb9, hi, lo, 0x01, 0x00], &pool),
            Err(ClassFormatError::InvalidConstantPoolEntry {
                index: method,
                found: Some(ConstantKind::MethodRef),
                expected: ConstantKinds::INTERFACE_METHOD_REF,
            })
        );
    }

    #[test]
    fn reader_stops_after_error() {
        let pool = ConstantPool::new();
        let mut reader = InstructionReader::new(&[0x00, 0xcb, 0x00], &pool);
        assert_eq!(reader.next(), Some(Ok((0, Instruction::Nop))));
        assert_eq!(
            reader.next(),
            Some(Err(ClassFormatError::InvalidBytecode { pc: 1, opcode: 0xcb }))
        );
        assert_eq!(reader.next(), None);
        assert_eq!(reader.pc(), 1);
    }
}
