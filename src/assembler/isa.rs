//! Instruction and register encodings for the SX64 virtual machine.
//!
//! Execution begins with the first instruction in the image.
//! Instructions are variable length: a one-byte opcode, followed by
//! the operands its schema lists, in order. Register operands encode
//! as a one-byte index; address and immediate operands encode as
//! eight-byte little-endian unsigned words regardless of magnitude.
//!
//! Supported Instructions:
//!
//! ```text
//! NOP              no-op
//! HLT              stop the clock
//! WRITE RA, ADDR   store RA at memory address ADDR
//! READ  RA, ADDR   load RA from memory address ADDR
//! LDI   RA, VALUE  load the literal VALUE into RA
//! ADD   RA, RB     RA <= RA + RB
//! SUB   RA, RB     RA <= RA - RB
//! MUL   RA, RB     RA <= RA * RB
//! DIV   RA, RB     RA <= RA / RB
//! PUSH  RA         push RA onto the stack
//! POP   RA         pop the top of the stack into RA
//! JMP   ADDR       jump to ADDR
//! CMP   ADDR       compare against ADDR, setting the flags register
//! JE    ADDR       jump to ADDR if the last compare matched
//! JNE   ADDR       jump to ADDR if the last compare did not match
//! ```
//!
//! Example source file:
//!
//! ```text
//! LDI R0, 'A'
//! WRITE R0, 0xFF00
//! LDI R1 0b0010
//! ADD R0 R1
//! PUSH R0
//! POP R2
//! HLT
//! ```
//!
//! Mnemonics and register names are case-insensitive. Operands may be
//! separated by a comma, whitespace, or both. Values may be written in
//! decimal, hexadecimal (`0x`), octal (`0o`), binary (`0b`), or as a
//! character literal (`'A'`), which encodes its code point. There is
//! no comment syntax; every character must belong to a token.

/// One-byte opcodes, exactly as the virtual machine decodes them.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Opcode {
    NOP = 0x00,
    HLT = 0x01,
    WRITE = 0x02,
    READ = 0x03,
    LDI = 0x04,
    ADD = 0x05,
    SUB = 0x06,
    MUL = 0x07,
    DIV = 0x08,
    PUSH = 0x09,
    POP = 0x0A,
    JMP = 0x0B,
    CMP = 0x0C,
    JE = 0x0D,
    JNE = 0x0E,
}

/// The operand kinds an instruction schema can list.
///
/// Addresses and immediates share an encoding; they are kept distinct
/// here because the schemas document which one an instruction means.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    /// One-byte register index.
    Reg,
    /// Eight-byte little-endian address literal.
    Addr,
    /// Eight-byte little-endian immediate literal.
    Imm,
}

impl Opcode {
    /// Look up a mnemonic. Expects the uppercased form the lexer emits.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        use Opcode::*;
        match name {
            "NOP" => Some(NOP),
            "HLT" => Some(HLT),
            "WRITE" => Some(WRITE),
            "READ" => Some(READ),
            "LDI" => Some(LDI),
            "ADD" => Some(ADD),
            "SUB" => Some(SUB),
            "MUL" => Some(MUL),
            "DIV" => Some(DIV),
            "PUSH" => Some(PUSH),
            "POP" => Some(POP),
            "JMP" => Some(JMP),
            "CMP" => Some(CMP),
            "JE" => Some(JE),
            "JNE" => Some(JNE),
            _ => None,
        }
    }

    /// The operand schema of this instruction, in encoding order.
    pub fn operands(self) -> &'static [Operand] {
        use Opcode::*;
        match self {
            NOP | HLT => &[],
            WRITE | READ => &[Operand::Reg, Operand::Addr],
            LDI => &[Operand::Reg, Operand::Imm],
            ADD | SUB | MUL | DIV => &[Operand::Reg, Operand::Reg],
            PUSH | POP => &[Operand::Reg],
            JMP | CMP | JE | JNE => &[Operand::Addr],
        }
    }
}

/// The eight general purpose registers.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Register {
    /// Look up a register name. Expects the uppercased form the lexer
    /// emits; anything outside `R0`..`R7` is not a register.
    pub fn from_name(name: &str) -> Option<Register> {
        use Register::*;
        match name {
            "R0" => Some(R0),
            "R1" => Some(R1),
            "R2" => Some(R2),
            "R3" => Some(R3),
            "R4" => Some(R4),
            "R5" => Some(R5),
            "R6" => Some(R6),
            "R7" => Some(R7),
            _ => None,
        }
    }

    /// Convert the register to its one-byte operand index.
    pub fn index(self) -> u8 {
        use Register::*;
        match self {
            R0 => 0,
            R1 => 1,
            R2 => 2,
            R3 => 3,
            R4 => 4,
            R5 => 5,
            R6 => 6,
            R7 => 7,
        }
    }
}

/// Encode a literal value as the fixed eight-byte little-endian word
/// used for every address and immediate operand.
pub fn encode_word(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}
