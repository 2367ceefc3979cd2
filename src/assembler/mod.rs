//! The Assembler module is in charge of taking SX64
//! assembly text and producing the flat binary image
//! the virtual machine loads.
//!
//! It does this by implementing a character-level
//! tokenizer and a single-pass code generator that
//! emits each instruction as it is consumed.

pub mod codegen;
pub mod error;
pub mod isa;
pub mod lexer;

use self::error::AsmError;

/// Assemble a full source string into its binary encoding.
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    let tokens = lexer::tokenize(source)?;
    codegen::CodeGen::new(tokens).run()
}
