use std::io::{self, Read, Write};

use super::{ScriptError, ScriptResult};

/// Writes `value` as a bitcoin-style compact size (var-int).
pub fn write_var_int<W: Write>(w: &mut W, value: u64) -> io::Result<()> {
    if value < 0xfd {
        w.write_all(&[value as u8])
    } else if value <= 0xffff {
        w.write_all(&[0xfd])?;
        w.write_all(&(value as u16).to_le_bytes())
    } else if value <= 0xffff_ffff {
        w.write_all(&[0xfe])?;
        w.write_all(&(value as u32).to_le_bytes())
    } else {
        w.write_all(&[0xff])?;
        w.write_all(&value.to_le_bytes())
    }
}

/// Reads a bitcoin-style compact size (var-int). Rejects non-minimal
/// encodings (e.g. `0xfd 0x05 0x00` for the value 5).
pub fn read_var_int<R: Read>(r: &mut R) -> ScriptResult<u64> {
    let mut prefix = [0u8; 1];
    r.read_exact(&mut prefix)
        .map_err(|_| ScriptError::Truncated { expected: 1 })?;
    match prefix[0] {
        0xff => {
            let mut buf = [0u8; 8];
            r.read_exact(&mut buf)
                .map_err(|_| ScriptError::Truncated { expected: 8 })?;
            let value = u64::from_le_bytes(buf);
            if value <= 0xffff_ffff {
                return Err(ScriptError::NonMinimalVarInt);
            }
            Ok(value)
        }
        0xfe => {
            let mut buf = [0u8; 4];
            r.read_exact(&mut buf)
                .map_err(|_| ScriptError::Truncated { expected: 4 })?;
            let value = u32::from_le_bytes(buf) as u64;
            if value <= 0xffff {
                return Err(ScriptError::NonMinimalVarInt);
            }
            Ok(value)
        }
        0xfd => {
            let mut buf = [0u8; 2];
            r.read_exact(&mut buf)
                .map_err(|_| ScriptError::Truncated { expected: 2 })?;
            let value = u16::from_le_bytes(buf) as u64;
            if value < 0xfd {
                return Err(ScriptError::NonMinimalVarInt);
            }
            Ok(value)
        }
        other => Ok(other as u64),
    }
}
