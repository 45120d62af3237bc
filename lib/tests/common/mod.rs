use jvm_bytecode::jvm::class_file::ConstantPool;

/// Route `log` output through the test harness (`RUST_LOG=trace` shows every instruction)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Constant pool with the entries needed for "hello world" style methods
pub struct HelloPool {
    pub pool: ConstantPool,
    pub system_out: u16,
    pub hello: u16,
    pub println: u16,
    pub run: u16,
    pub string_builder: u16,
    pub name_and_type: u16,
}

pub fn hello_pool() -> HelloPool {
    let mut pool = ConstantPool::new();
    let system_out = pool
        .get_field_ref("java/lang/System", "out", "Ljava/io/PrintStream;")
        .unwrap();
    let hello = pool.get_string("hello").unwrap();
    let println = pool
        .get_method_ref("java/io/PrintStream", "println", "(Ljava/lang/String;)V", false)
        .unwrap();
    let run = pool
        .get_method_ref("java/lang/Runnable", "run", "()V", true)
        .unwrap();
    let string_builder = pool.get_class("java/lang/StringBuilder").unwrap();
    let name_and_type = pool.get_name_and_type("length", "()I").unwrap();
    HelloPool {
        pool,
        system_out: system_out.0,
        hello: hello.0,
        println: println.0,
        run: run.0,
        string_builder: (string_builder.0).0,
        name_and_type: (name_and_type.0).0,
    }
}

/// Split a 16-bit constant pool index into its big-endian operand bytes
pub fn be(index: u16) -> [u8; 2] {
    index.to_be_bytes()
}
