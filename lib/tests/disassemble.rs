mod common;

use common::{be, hello_pool, init_logging};
use jvm_bytecode::jvm::class_file::{CodeBuffer, ConstantPool};
use jvm_bytecode::jvm::code::{decode_bytes, disassemble, Disassembler};
use jvm_bytecode::jvm::ClassFormatError;

#[test]
fn hello_world() {
    init_logging();
    let hello = hello_pool();
    let mut code = vec![0xb2];
    code.extend(be(hello.system_out));
    code.extend([0x12, hello.hello as u8, 0xb6]);
    code.extend(be(hello.println));
    code.extend([0x03, 0x99, 0x00, 0x04, 0x00, 0xb1]);
    let code = CodeBuffer::new(2, 1, code);

    let expected = format!(
        " 0: getstatic #{}  // Field java/lang/System.out:Ljava/io/PrintStream;\n \
         3: ldc #{}  // String \"hello\"\n \
         5: invokevirtual #{}  // Method java/io/PrintStream.println:(Ljava/lang/String;)V\n \
         8: iconst_0\n \
         9: ifeq 13\n\
         12: nop\n\
         13: return\n",
        hello.system_out, hello.hello, hello.println
    );
    assert_eq!(disassemble(&code, &hello.pool), Ok(expected));
}

#[test]
fn interface_calls_and_classes() {
    init_logging();
    let hello = hello_pool();
    let mut code = vec![0x2a, 0xb9];
    code.extend(be(hello.run));
    code.extend([0x01, 0x00, 0xbb]);
    code.extend(be(hello.string_builder));
    code.push(0xb1);
    let code = CodeBuffer::new(2, 1, code);

    let expected = format!(
        " 0: aload_0\n \
         1: invokeinterface #{}, 1  // InterfaceMethod java/lang/Runnable.run:()V\n \
         6: new #{}  // class java/lang/StringBuilder\n \
         9: return\n",
        hello.run, hello.string_builder
    );
    assert_eq!(disassemble(&code, &hello.pool), Ok(expected));
}

#[test]
fn tableswitch_targets() {
    init_logging();
    let pool = ConstantPool::new();
    let mut code = vec![0x1a, 0xaa, 0x00, 0x00];
    for word in [27i32, 0, 1, 23, 25] {
        code.extend(word.to_be_bytes());
    }
    code.extend([0x03, 0xac, 0x04, 0xac, 0x02, 0xac]);
    let code = CodeBuffer::new(1, 1, code);

    assert_eq!(
        disassemble(&code, &pool).unwrap(),
        " 0: iload_0\n \
         1: tableswitch\n        \
         case 0: 24\n        \
         case 1: 26\n        \
         default: 28\n\
         24: iconst_0\n\
         25: ireturn\n\
         26: iconst_1\n\
         27: ireturn\n\
         28: iconst_m1\n\
         29: ireturn\n"
    );
}

#[test]
fn partial_listing_on_error() {
    init_logging();
    let pool = ConstantPool::new();
    let code = [0x00, 0x10, 0x2a, 0xcb];
    let mut disassembler = Disassembler::new(&pool, code.len() as u32);
    assert_eq!(
        decode_bytes(&code, &pool, &mut disassembler),
        Err(ClassFormatError::InvalidBytecode { pc: 3, opcode: 0xcb })
    );
    assert_eq!(disassembler.listing(), "0: nop\n1: bipush 42\n");
}
