//! Linear reachability scan for `SELFDESTRUCT` and `DELEGATECALL`.
//!
//! A single pass over deployed bytecode, skipping `PUSH`-embedded literals
//! and tracking a `halted` flag: bytes after a halting opcode are presumed
//! unreachable data until the next `JUMPDEST`. This is a cheap heuristic,
//! not a sound static analysis -- it can over- and under-approximate true
//! reachability, which is acceptable for a warning system.

use warden_core::CodeSafety;

const OP_STOP: u8 = 0x00;
const OP_JUMPDEST: u8 = 0x5b;
const OP_PUSH1: u8 = 0x60;
const OP_PUSH32: u8 = 0x7f;
const OP_RETURN: u8 = 0xf3;
const OP_DELEGATECALL: u8 = 0xf4;
const OP_REVERT: u8 = 0xfd;
const OP_INVALID: u8 = 0xfe;
const OP_SELFDESTRUCT: u8 = 0xff;

/// Classifies deployed bytecode. The caller is responsible for mapping
/// EOA/empty/trusted accounts before reaching this function.
pub fn scan_code(code: &[u8]) -> CodeSafety {
    let mut delegatecall = false;
    let mut halted = false;
    let mut offset = 0usize;

    while offset < code.len() {
        let opcode = code[offset];

        match opcode {
            // Literal data: never interpret the pushed bytes as opcodes.
            OP_PUSH1..=OP_PUSH32 => {
                let width = usize::from(opcode - OP_PUSH1) + 1;
                offset += 1 + width;
                continue;
            }
            OP_SELFDESTRUCT => {
                if !halted {
                    return CodeSafety::Selfdestruct;
                }
                // Already unreachable; still a halting opcode.
            }
            OP_DELEGATECALL => {
                if !halted {
                    // Keep scanning: a reachable selfdestruct anywhere
                    // later still takes priority.
                    delegatecall = true;
                }
            }
            OP_JUMPDEST => halted = false,
            _ => {}
        }

        if matches!(
            opcode,
            OP_STOP | OP_RETURN | OP_REVERT | OP_INVALID | OP_SELFDESTRUCT
        ) {
            halted = true;
        }

        offset += 1;
    }

    if delegatecall {
        CodeSafety::Delegatecall
    } else {
        CodeSafety::Safe
    }
}
