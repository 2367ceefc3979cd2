//! Failures the tokenizer and code generator can report.
//! Every error aborts the assembly run; there is no recovery.

use thiserror::Error;

/// Positions count characters consumed from the start of the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    /// The scanner met a character it has no rule for.
    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { found: char, position: usize },

    /// `''`, or an opening quote at the end of the source.
    #[error("empty character literal at position {position}")]
    EmptyCharLiteral { position: usize },

    /// A character literal missing its closing quote.
    #[error("character literal not properly closed at position {position}")]
    UnterminatedCharLiteral { position: usize },

    /// A radix prefix with no digit valid in that base after it,
    /// e.g. `0x` at end of input, or `0b2`.
    #[error("expected a base-{base} digit at position {position}")]
    InvalidRadixDigit { base: u32, position: usize },

    /// A numeric literal too large for an unsigned 64-bit word.
    #[error("numeric literal at position {position} does not fit in 64 bits")]
    ValueOutOfRange { position: usize },

    /// A keyword that names no instruction.
    #[error("unknown instruction '{0}'")]
    UnknownInstruction(String),

    /// Something other than a register where a register operand is required.
    #[error("expected a register, got {0}")]
    ExpectedRegister(String),

    /// Something other than a number or character literal where an
    /// address or immediate operand is required.
    #[error("expected a number or character literal, got {0}")]
    ExpectedValue(String),

    /// Any other token kind mismatch.
    #[error("expected {expected}, got {found}")]
    ExpectedToken {
        expected: &'static str,
        found: String,
    },
}
