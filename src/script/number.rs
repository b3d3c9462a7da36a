use super::item::{Opcode, OP_16, OP_1, OP_1NEGATE, OP_FALSE};
use super::{ScriptError, ScriptItem, ScriptResult};

/// Encodes `value` as a `ScriptItem`, preferring the dedicated opcode for
/// -1 and 1..=16, falling back to a minimal sign-magnitude push for anything
/// else (including 0, which is `OP_FALSE`).
pub fn push_number(value: i64) -> ScriptItem {
    if let Some(op) = small_int_opcode(value) {
        return ScriptItem::Op(op);
    }
    ScriptItem::PushData(encode_magnitude(value.unsigned_abs(), value < 0))
}

/// Encodes a non-negative `value`, using the same small-integer opcodes as
/// [`push_number`] where they apply.
pub fn push_number_unsigned(value: u64) -> ScriptItem {
    if value <= 16 {
        return ScriptItem::Op(small_int_opcode(value as i64).expect("0..=16 always has an opcode"));
    }
    ScriptItem::PushData(encode_magnitude(value, false))
}

fn small_int_opcode(value: i64) -> Option<Opcode> {
    match value {
        -1 => Some(OP_1NEGATE),
        0 => Some(OP_FALSE),
        1..=16 => Some(Opcode(OP_1.0 + (value as u8 - 1))),
        _ => None,
    }
}

fn encode_magnitude(mut magnitude: u64, negative: bool) -> Vec<u8> {
    if magnitude == 0 {
        return Vec::new();
    }
    let mut bytes = Vec::new();
    while magnitude != 0 {
        bytes.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }
    let top = *bytes.last().unwrap();
    if top & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        *bytes.last_mut().unwrap() |= 0x80;
    }
    bytes
}

fn decode_magnitude(bytes: &[u8]) -> ScriptResult<i64> {
    if bytes.is_empty() {
        return Ok(0);
    }
    if let Some(&last) = bytes.last() {
        if last & 0x7f == 0 && (bytes.len() <= 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
            return Err(ScriptError::NotMinimalNumber);
        }
    }
    let mut result: i64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        result |= (*byte as i64) << (8 * i);
    }
    let last_index = bytes.len() - 1;
    if bytes[last_index] & 0x80 != 0 {
        result &= !(0x80i64 << (8 * last_index));
        result = -result;
    }
    Ok(result)
}

/// Decodes a `ScriptItem` that is expected to hold a (possibly negative)
/// script number, accepting either the dedicated small-integer opcode form
/// or a minimal push-data form.
pub fn script_number_value(item: &ScriptItem) -> ScriptResult<i64> {
    match item {
        ScriptItem::Op(Opcode(0)) => Ok(0),
        ScriptItem::Op(op) if *op == OP_1NEGATE => Ok(-1),
        ScriptItem::Op(op) if op.0 >= OP_1.0 && op.0 <= OP_16.0 => Ok((op.0 - OP_1.0 + 1) as i64),
        ScriptItem::Op(_) => Err(ScriptError::NotANumber),
        ScriptItem::PushData(bytes) => decode_magnitude(bytes),
    }
}

/// Like [`script_number_value`] but rejects a negative decoded value.
pub fn script_number_value_unsigned(item: &ScriptItem) -> ScriptResult<u64> {
    let value = script_number_value(item)?;
    if value < 0 {
        return Err(ScriptError::UnexpectedNegative);
    }
    Ok(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_ints_use_dedicated_opcodes() {
        assert_eq!(push_number(0), ScriptItem::Op(OP_FALSE));
        assert_eq!(push_number(-1), ScriptItem::Op(OP_1NEGATE));
        assert_eq!(push_number(1), ScriptItem::Op(OP_1));
        assert_eq!(push_number(16), ScriptItem::Op(OP_16));
    }

    #[test]
    fn round_trips_arbitrary_values() {
        for value in [-1i64, 0, 1, 16, 17, -17, 127, 128, -128, 1_000_000, -1_000_000, i64::MAX / 2] {
            let item = push_number(value);
            assert_eq!(script_number_value(&item).unwrap(), value);
        }
    }

    #[test]
    fn unsigned_round_trip() {
        for value in [0u64, 1, 16, 17, 540_000, u32::MAX as u64] {
            let item = push_number_unsigned(value);
            assert_eq!(script_number_value_unsigned(&item).unwrap(), value);
        }
    }

    #[test]
    fn decoder_accepts_non_opcode_form_too() {
        // A decoder must accept either form for values in -1..=16.
        let pushed = ScriptItem::PushData(vec![16]);
        assert_eq!(script_number_value(&pushed).unwrap(), 16);
    }

    #[test]
    fn rejects_non_minimal_push() {
        let item = ScriptItem::PushData(vec![0x01, 0x00]);
        assert!(matches!(
            script_number_value(&item),
            Err(ScriptError::NotMinimalNumber)
        ));
    }
}
