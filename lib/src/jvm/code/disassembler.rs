use crate::jvm::class_file::{
    ClassConstantIndex, CodeBuffer, Constant, ConstantPoolView, NameAndTypeConstantIndex,
};
use crate::jvm::code::{decode, BytecodeVisitor, Instruction};
use crate::jvm::ClassFormatError;

/// Visitor that renders instructions in roughly the same textual form as `javap -c`
///
/// Every instruction goes on its own line, prefixed by its `pc`. Constant pool operands get a
/// trailing comment describing the entry they point to, and branch targets are printed as
/// absolute offsets instead of relative ones.
pub struct Disassembler<'p, P: ?Sized> {
    pool: &'p P,

    /// Number of columns the `pc` is right-aligned into
    pc_width: usize,

    listing: String,
}

impl<'p, P: ConstantPoolView + ?Sized> Disassembler<'p, P> {
    pub fn new(pool: &'p P, code_length: u32) -> Disassembler<'p, P> {
        Disassembler {
            pool,
            pc_width: code_length.to_string().len(),
            listing: String::new(),
        }
    }

    /// Text rendered so far
    pub fn listing(&self) -> &str {
        &self.listing
    }

    pub fn finish(self) -> String {
        self.listing
    }

    fn switch_case(&mut self, label: &str, target: i64) {
        let indent = self.pc_width + 6;
        self.listing
            .push_str(&format!("{:indent$}{}: {}\n", "", label, target, indent = indent));
    }
}

impl<'p, P: ConstantPoolView + ?Sized> BytecodeVisitor<'p> for Disassembler<'p, P> {
    fn visit(&mut self, pc: u32, instruction: &Instruction<'p>) {
        let target = |offset: i32| pc as i64 + offset as i64;
        let prefix = format!("{:>width$}: ", pc, width = self.pc_width);
        self.listing.push_str(&prefix);

        match instruction {
            Instruction::TableSwitch(table) => {
                self.listing.push_str("tableswitch\n");
                for (key, offset) in table.cases() {
                    self.switch_case(&format!("case {}", key), target(offset));
                }
                self.switch_case("default", target(table.default));
            }
            Instruction::LookupSwitch(lookup) => {
                self.listing.push_str("lookupswitch\n");
                for (key, offset) in &lookup.pairs {
                    self.switch_case(&format!("case {}", key), target(*offset));
                }
                self.switch_case("default", target(lookup.default));
            }
            other => {
                let mut line = match other.branch_offset() {
                    Some(offset) => format!("{} {}", other.opcode(), target(offset)),
                    None => other.to_string(),
                };
                if let Some(description) = other
                    .constant()
                    .and_then(|constant| describe(self.pool, constant.entry))
                {
                    line.push_str("  // ");
                    line.push_str(&description);
                }
                self.listing.push_str(&line);
                self.listing.push('\n');
            }
        }
    }
}

/// Disassemble a whole `Code` attribute, including its exception table
pub fn disassemble<P: ConstantPoolView + ?Sized>(
    code: &CodeBuffer,
    pool: &P,
) -> Result<String, ClassFormatError> {
    let mut disassembler = Disassembler::new(pool, code.code_length());
    decode(code, pool, &mut disassembler)?;
    let mut listing = disassembler.finish();

    if !code.exception_table.is_empty() {
        listing.push_str("Exception table:\n");
        listing.push_str("   from    to  target type\n");
        for handler in &code.exception_table {
            let catch_type = if handler.catches_all() {
                String::from("any")
            } else {
                match pool.class_name(handler.catch_type) {
                    Some(name) => format!("Class {}", name),
                    None => handler.catch_type.0.to_string(),
                }
            };
            listing.push_str(&format!(
                "{:>7} {:>5} {:>5}   {}\n",
                handler.start_pc.0, handler.end_pc.0, handler.handler_pc.0, catch_type
            ));
        }
    }

    Ok(listing)
}

/// Describe a constant pool entry the way `javap` comments do (eg. `class java/lang/Object`)
///
/// Returns `None` if the entry refers to entries that don't resolve.
fn describe<P: ConstantPoolView + ?Sized>(pool: &P, entry: &Constant) -> Option<String> {
    let description = match entry {
        Constant::Class(name) => format!("class {}", pool.utf8(*name)?),
        Constant::FieldRef(class, name_and_type) => {
            format!("Field {}", member(pool, *class, *name_and_type)?)
        }
        Constant::MethodRef {
            class,
            name_and_type,
            is_interface,
        } => format!(
            "{} {}",
            if *is_interface {
                "InterfaceMethod"
            } else {
                "Method"
            },
            member(pool, *class, *name_and_type)?
        ),
        Constant::String(value) => format!("String {:?}", pool.utf8(*value)?),
        Constant::Integer(value) => format!("int {}", value),
        Constant::Float(value) => format!("float {}f", value),
        Constant::Long(value) => format!("long {}l", value),
        Constant::Double(value) => format!("double {}d", value),
        Constant::MethodHandle {
            handle_kind,
            member,
        } => format!("MethodHandle {} {}", handle_kind.name(), member),
        Constant::MethodType { descriptor } => format!("MethodType {}", pool.utf8(*descriptor)?),
        Constant::InvokeDynamic {
            bootstrap_method,
            method_descriptor,
        } => {
            let (name, descriptor) = pool.name_and_type(*method_descriptor)?;
            format!("InvokeDynamic #{}:{}:{}", bootstrap_method, name, descriptor)
        }
        Constant::NameAndType { .. } | Constant::Utf8(_) => return None,
    };
    Some(description)
}

fn member<P: ConstantPoolView + ?Sized>(
    pool: &P,
    class: ClassConstantIndex,
    name_and_type: NameAndTypeConstantIndex,
) -> Option<String> {
    let class = pool.class_name(class)?;
    let (name, descriptor) = pool.name_and_type(name_and_type)?;
    Some(format!("{}.{}:{}", class, name, descriptor))
}
