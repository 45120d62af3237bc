//! Class file structures consumed by the bytecode decoder
//!
//! This is only a sliver of the [class file format][0]: the constant pool (as a lookup
//! capability, since building it is someone else's job) and the `Code` attribute of a method.
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html

mod attribute;
mod binary_format;
mod constants;

pub use attribute::*;
pub use binary_format::*;
pub use constants::*;
