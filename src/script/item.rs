use std::io::{self, Read, Write};

use super::{ScriptError, ScriptResult};

/// A single bitcoin opcode byte, kept distinct from a raw `u8` so call sites
/// can't confuse an opcode with a push-data length by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

pub const OP_FALSE: Opcode = Opcode(0x00);
pub const OP_PUSHDATA1: Opcode = Opcode(0x4c);
pub const OP_PUSHDATA2: Opcode = Opcode(0x4d);
pub const OP_PUSHDATA4: Opcode = Opcode(0x4e);
pub const OP_1NEGATE: Opcode = Opcode(0x4f);
pub const OP_RESERVED: Opcode = Opcode(0x50);
pub const OP_1: Opcode = Opcode(0x51);
pub const OP_16: Opcode = Opcode(0x60);
pub const OP_RETURN: Opcode = Opcode(0x6a);

/// A tagged union of `{push-data(bytes), opcode(u8)}`, the smallest unit of
/// the wire format. Opcodes `OP_1`..`OP_16` and `OP_1NEGATE` encode the small
/// integers -1 and 1..16 without a length prefix; everything else that needs
/// to carry bytes is push-data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptItem {
    Op(Opcode),
    PushData(Vec<u8>),
}

impl ScriptItem {
    pub fn op(byte: u8) -> Self {
        ScriptItem::Op(Opcode(byte))
    }

    pub fn push(bytes: impl Into<Vec<u8>>) -> Self {
        ScriptItem::PushData(bytes.into())
    }

    pub fn as_push_data(&self) -> Option<&[u8]> {
        match self {
            ScriptItem::PushData(b) => Some(b),
            ScriptItem::Op(Opcode(0)) => Some(&[]),
            _ => None,
        }
    }
}

/// Writes a length-prefixed push of `bytes`, choosing the minimal push opcode
/// (direct length byte, `OP_PUSHDATA1/2/4`) for the size.
pub fn write_push_data<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    let len = bytes.len();
    if len == 0 {
        w.write_all(&[OP_FALSE.0])?;
    } else if len < OP_PUSHDATA1.0 as usize {
        w.write_all(&[len as u8])?;
    } else if len <= 0xff {
        w.write_all(&[OP_PUSHDATA1.0, len as u8])?;
    } else if len <= 0xffff {
        w.write_all(&[OP_PUSHDATA2.0])?;
        w.write_all(&(len as u16).to_le_bytes())?;
    } else {
        w.write_all(&[OP_PUSHDATA4.0])?;
        w.write_all(&(len as u32).to_le_bytes())?;
    }
    w.write_all(bytes)
}

/// Writes a single script item (opcode or push-data) to `w`.
pub fn write_script_item<W: Write>(w: &mut W, item: &ScriptItem) -> io::Result<()> {
    match item {
        ScriptItem::Op(op) => w.write_all(&[op.0]),
        ScriptItem::PushData(bytes) => write_push_data(w, bytes),
    }
}

fn read_exact_n<R: Read>(r: &mut R, n: usize) -> ScriptResult<Vec<u8>> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)
        .map_err(|_| ScriptError::Truncated { expected: n })?;
    Ok(buf)
}

fn read_u8<R: Read>(r: &mut R) -> ScriptResult<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)
        .map_err(|_| ScriptError::Truncated { expected: 1 })?;
    Ok(buf[0])
}

/// Reads a single script item from `r`. Both the dedicated small-integer
/// opcodes and ordinary push-data are accepted; the caller decides whether a
/// particular position demands a number.
pub fn read_script_item<R: Read>(r: &mut R) -> ScriptResult<ScriptItem> {
    let first = read_u8(r)?;
    match first {
        0x01..=0x4b => {
            let bytes = read_exact_n(r, first as usize)?;
            Ok(ScriptItem::PushData(bytes))
        }
        b if b == OP_PUSHDATA1.0 => {
            let len = read_u8(r)? as usize;
            let bytes = read_exact_n(r, len)?;
            Ok(ScriptItem::PushData(bytes))
        }
        b if b == OP_PUSHDATA2.0 => {
            let buf = read_exact_n(r, 2)?;
            let len = u16::from_le_bytes([buf[0], buf[1]]) as usize;
            let bytes = read_exact_n(r, len)?;
            Ok(ScriptItem::PushData(bytes))
        }
        b if b == OP_PUSHDATA4.0 => {
            let buf = read_exact_n(r, 4)?;
            let len = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
            let bytes = read_exact_n(r, len)?;
            Ok(ScriptItem::PushData(bytes))
        }
        other => Ok(ScriptItem::Op(Opcode(other))),
    }
}
