//! JVM class file structures and the bytecode inside them
//!
//!   - [`class_file`] has the constant pool and the `Code` attribute
//!   - [`code`] decodes the instructions in a `Code` attribute

pub mod class_file;
pub mod code;
mod errors;

pub use errors::*;
