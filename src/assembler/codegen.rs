//! The CodeGen module takes a token stream (VecDeque<Token>) from the
//! lexer and encodes it directly into the flat binary form the virtual
//! machine executes. There is no intermediate representation; each
//! instruction's bytes are appended as its tokens are consumed.
use std::collections::VecDeque;

use super::error::AsmError;
use super::isa::{encode_word, Opcode, Operand, Register};
use super::lexer::Token;

pub struct CodeGen {
    tokens: VecDeque<Token>,
    output: Vec<u8>,
}

impl CodeGen {
    pub fn new(tokens: VecDeque<Token>) -> Self {
        let capacity = tokens.len();
        CodeGen { tokens, output: Vec::with_capacity(capacity) }
    }

    /// Run the generator, consuming itself and returning the encoded
    /// program. The first error aborts the run; the partial buffer is
    /// never returned.
    pub fn run(mut self) -> Result<Vec<u8>, AsmError> {
        while let Some(token) = self.consume() {
            match token {
                Token::Keyword(name) => self.instruction(&name)?,
                // Newlines separate instructions for the reader only.
                Token::Newline => {}
                other => {
                    return Err(AsmError::ExpectedToken {
                        expected: "an instruction",
                        found: other.to_string(),
                    })
                }
            }
        }

        Ok(self.output)
    }

    /// Encode one instruction: the opcode byte, then each operand in
    /// the order the opcode's schema lists them.
    fn instruction(&mut self, name: &str) -> Result<(), AsmError> {
        let opcode = Opcode::from_mnemonic(name)
            .ok_or_else(|| AsmError::UnknownInstruction(name.to_owned()))?;
        self.output.push(opcode as u8);

        for operand in opcode.operands() {
            match operand {
                Operand::Reg => self.register()?,
                Operand::Addr | Operand::Imm => self.value()?,
            }
        }

        Ok(())
    }

    /// Consume a register operand and append its index byte. A comma
    /// directly after the register is separator sugar and is consumed
    /// with it.
    fn register(&mut self) -> Result<(), AsmError> {
        match self.consume() {
            Some(Token::Register(name)) => {
                let register = Register::from_name(&name)
                    .ok_or(AsmError::ExpectedRegister(name))?;
                self.output.push(register.index());

                if let Some(Token::Comma) = self.tokens.front() {
                    self.consume();
                }
                Ok(())
            }
            Some(other) => Err(AsmError::ExpectedRegister(other.to_string())),
            None => Err(AsmError::ExpectedRegister("end of input".to_owned())),
        }
    }

    /// Consume an address or immediate operand and append its
    /// eight-byte little-endian encoding. Numbers and character
    /// literals are interchangeable here.
    fn value(&mut self) -> Result<(), AsmError> {
        match self.consume() {
            Some(Token::Number(value)) | Some(Token::Char(value)) => {
                self.output.extend_from_slice(&encode_word(value));
                Ok(())
            }
            Some(other) => Err(AsmError::ExpectedValue(other.to_string())),
            None => Err(AsmError::ExpectedValue("end of input".to_owned())),
        }
    }

    /// Pops a token off the input stream and returns it.
    /// Returns None if no tokens are left.
    #[inline]
    fn consume(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::assemble;

    #[test]
    fn test_register() {
        let tokens: VecDeque<Token> = VecDeque::from(vec![
            Token::Register("R3".to_owned()),
            Token::Register("R1".to_owned()),
            Token::Comma,
            Token::Register("R2".to_owned()),
        ]);
        let mut codegen = CodeGen::new(tokens);

        assert_eq!(codegen.register(), Ok(()));
        // The comma after R1 is swallowed along with it.
        assert_eq!(codegen.register(), Ok(()));
        assert_eq!(codegen.register(), Ok(()));
        assert_eq!(codegen.output, vec![3, 1, 2]);
        assert!(codegen.tokens.is_empty());

        // Test- Invalid
        let tokens: VecDeque<Token> = VecDeque::from(vec![
            Token::Number(5),
            Token::Register("R9".to_owned()),
        ]);
        let mut codegen = CodeGen::new(tokens);

        assert_eq!(
            codegen.register(),
            Err(AsmError::ExpectedRegister("number 5".to_owned()))
        );
        // A register token the table does not know. The lexer never
        // produces one, but the stream type allows it.
        assert_eq!(
            codegen.register(),
            Err(AsmError::ExpectedRegister("R9".to_owned()))
        );
        assert_eq!(
            codegen.register(),
            Err(AsmError::ExpectedRegister("end of input".to_owned()))
        );
    }

    #[test]
    fn test_value() {
        let tokens: VecDeque<Token> = VecDeque::from(vec![
            Token::Number(5),
            Token::Char(65),
            Token::Number(u64::MAX),
        ]);
        let mut codegen = CodeGen::new(tokens);

        assert_eq!(codegen.value(), Ok(()));
        assert_eq!(codegen.value(), Ok(()));
        assert_eq!(codegen.value(), Ok(()));

        let mut expected = vec![5, 0, 0, 0, 0, 0, 0, 0];
        expected.extend_from_slice(&[65, 0, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[0xFF; 8]);
        assert_eq!(codegen.output, expected);

        // Test- Invalid
        let tokens: VecDeque<Token> = VecDeque::from(vec![
            Token::Register("R0".to_owned()),
        ]);
        let mut codegen = CodeGen::new(tokens);

        assert_eq!(
            codegen.value(),
            Err(AsmError::ExpectedValue("register R0".to_owned()))
        );
        assert_eq!(
            codegen.value(),
            Err(AsmError::ExpectedValue("end of input".to_owned()))
        );
    }

    #[test]
    fn test_instruction() {
        let tokens: VecDeque<Token> = VecDeque::from(vec![
            Token::Register("R0".to_owned()),
            Token::Comma,
            Token::Number(5),
        ]);
        let mut codegen = CodeGen::new(tokens);

        assert_eq!(codegen.instruction("LDI"), Ok(()));
        assert_eq!(codegen.output, vec![0x04, 0x00, 5, 0, 0, 0, 0, 0, 0, 0]);

        let mut codegen = CodeGen::new(VecDeque::new());
        assert_eq!(
            codegen.instruction("FOO"),
            Err(AsmError::UnknownInstruction("FOO".to_owned()))
        );
        // Nothing is emitted for an unknown mnemonic.
        assert!(codegen.output.is_empty());
    }

    #[test]
    fn test_no_operand_ops() {
        assert_eq!(assemble("NOP"), Ok(vec![0x00]));
        assert_eq!(assemble("HLT"), Ok(vec![0x01]));
        assert_eq!(assemble("NOP\nNOP\nHLT"), Ok(vec![0x00, 0x00, 0x01]));
    }

    #[test]
    fn test_single_register_ops() {
        assert_eq!(assemble("PUSH R7"), Ok(vec![0x09, 7]));
        assert_eq!(assemble("POP R0"), Ok(vec![0x0A, 0]));
    }

    #[test]
    fn test_dual_register_ops() {
        assert_eq!(assemble("ADD R1, R2"), Ok(vec![0x05, 1, 2]));
        assert_eq!(assemble("SUB R1, R2"), Ok(vec![0x06, 1, 2]));
        assert_eq!(assemble("MUL R1, R2"), Ok(vec![0x07, 1, 2]));
        assert_eq!(assemble("DIV R1, R2"), Ok(vec![0x08, 1, 2]));
    }

    #[test]
    fn test_register_value_ops() {
        assert_eq!(
            assemble("LDI R0, 5"),
            Ok(vec![0x04, 0x00, 5, 0, 0, 0, 0, 0, 0, 0])
        );
        assert_eq!(
            assemble("WRITE R3, 'A'"),
            Ok(vec![0x02, 3, 65, 0, 0, 0, 0, 0, 0, 0])
        );
        assert_eq!(
            assemble("READ R1, 0xFF00"),
            Ok(vec![0x03, 1, 0x00, 0xFF, 0, 0, 0, 0, 0, 0])
        );
    }

    #[test]
    fn test_address_ops() {
        assert_eq!(assemble("JMP 2"), Ok(vec![0x0B, 2, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(assemble("CMP 2"), Ok(vec![0x0C, 2, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(assemble("JE 2"), Ok(vec![0x0D, 2, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(assemble("JNE 2"), Ok(vec![0x0E, 2, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_radix_forms_encode_identically() {
        let expected = assemble("LDI R0, 31");
        assert_eq!(assemble("LDI R0, 0x1F"), expected);
        assert_eq!(assemble("LDI R0, 0o37"), expected);
        assert_eq!(assemble("LDI R0, 0b11111"), expected);
    }

    #[test]
    fn test_commas_are_optional() {
        assert_eq!(assemble("ADD R1 R2"), assemble("ADD R1, R2"));
        assert_eq!(assemble("LDI R0 5"), assemble("LDI R0, 5"));
        assert_eq!(assemble("WRITE R3 'A'"), assemble("WRITE R3, 'A'"));
    }

    #[test]
    fn test_newlines_between_instructions() {
        // Newlines separate instructions; any number of them, or none
        // at all, encodes the same.
        let expected = assemble("NOP\nLDI R0, 5\nHLT");
        assert_eq!(assemble("NOP LDI R0, 5 HLT"), expected);
        assert_eq!(assemble("\n\nNOP\n\n\nLDI R0, 5\n\nHLT\n"), expected);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(assemble("ldi r0, 5"), assemble("LDI R0, 5"));
        assert_eq!(assemble("wRiTe R3, 'A'"), assemble("WRITE r3, 'A'"));
    }

    #[test]
    fn test_unknown_instruction() {
        assert_eq!(
            assemble("FOO R0, 5"),
            Err(AsmError::UnknownInstruction("FOO".to_owned()))
        );
        // Mnemonics are uppercased before the table lookup, so the
        // error reports the canonical spelling.
        assert_eq!(
            assemble("foo"),
            Err(AsmError::UnknownInstruction("FOO".to_owned()))
        );
    }

    #[test]
    fn test_missing_operands() {
        assert_eq!(
            assemble("LDI R0"),
            Err(AsmError::ExpectedValue("end of input".to_owned()))
        );
        assert_eq!(
            assemble("ADD R1"),
            Err(AsmError::ExpectedRegister("end of input".to_owned()))
        );
        assert_eq!(
            assemble("PUSH"),
            Err(AsmError::ExpectedRegister("end of input".to_owned()))
        );
    }

    #[test]
    fn test_wrong_operand_kind() {
        assert_eq!(
            assemble("ADD 5, R1"),
            Err(AsmError::ExpectedRegister("number 5".to_owned()))
        );
        assert_eq!(
            assemble("JMP R0"),
            Err(AsmError::ExpectedValue("register R0".to_owned()))
        );
        assert_eq!(
            assemble("LDI R0, R1"),
            Err(AsmError::ExpectedValue("register R1".to_owned()))
        );
        // A newline does not satisfy an operand slot.
        assert_eq!(
            assemble("PUSH\nR0"),
            Err(AsmError::ExpectedRegister("newline".to_owned()))
        );
    }

    #[test]
    fn test_stray_tokens() {
        assert_eq!(
            assemble("5"),
            Err(AsmError::ExpectedToken {
                expected: "an instruction",
                found: "number 5".to_owned(),
            })
        );
        assert_eq!(
            assemble("R0"),
            Err(AsmError::ExpectedToken {
                expected: "an instruction",
                found: "register R0".to_owned(),
            })
        );
        // A comma only belongs after a register operand.
        assert_eq!(
            assemble("NOP, HLT"),
            Err(AsmError::ExpectedToken {
                expected: "an instruction",
                found: "','".to_owned(),
            })
        );
        assert_eq!(
            assemble(":"),
            Err(AsmError::ExpectedToken {
                expected: "an instruction",
                found: "':'".to_owned(),
            })
        );
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(assemble(""), Ok(vec![]));
        assert_eq!(assemble("\n\n\n"), Ok(vec![]));
        assert_eq!(assemble("   \t  "), Ok(vec![]));
    }

    #[test]
    fn test_program() {
        let source = "
        LDI R0, 'A'
        WRITE R0, 0xFF00
        ADD R0, R1
        JNE 0b100
        HLT
        ";
        let expected = vec![
            0x04, 0x00, 0x41, 0, 0, 0, 0, 0, 0, 0,
            0x02, 0x00, 0x00, 0xFF, 0, 0, 0, 0, 0, 0,
            0x05, 0x00, 0x01,
            0x0E, 0x04, 0, 0, 0, 0, 0, 0, 0,
            0x01,
        ];

        assert_eq!(assemble(source), Ok(expected));
    }
}
