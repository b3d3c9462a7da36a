//! The `SorValue` trait and its primitive implementations.
//!
//! Every type that can appear as a tagged field — or as an element of a
//! sequence field — implements `SorValue`. `marshal` produces the raw items
//! that represent just the value (no surrounding tag); `unmarshal` consumes a
//! prefix of a slice and reports how many items it used, so callers (the
//! record-level tag/length framing in [`super::record`]) can bound the read.

use crate::script::{
    push_number, push_number_unsigned, script_number_value, script_number_value_unsigned,
    ScriptItem,
};

use super::error::{SorError, SorResult};

pub trait SorValue: Sized {
    fn marshal(&self, out: &mut Vec<ScriptItem>);

    /// Parses `Self` from the front of `items`, returning the value and the
    /// number of items consumed.
    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)>;
}

macro_rules! impl_sor_value_signed {
    ($t:ty) => {
        impl SorValue for $t {
            fn marshal(&self, out: &mut Vec<ScriptItem>) {
                out.push(push_number(*self as i64));
            }
            fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
                let item = items.first().ok_or(SorError::TruncatedValue {
                    tag: 0,
                    expected: 1,
                    found: 0,
                })?;
                let value = script_number_value(item)?;
                Ok((value as $t, 1))
            }
        }
    };
}

macro_rules! impl_sor_value_unsigned {
    ($t:ty) => {
        impl SorValue for $t {
            fn marshal(&self, out: &mut Vec<ScriptItem>) {
                out.push(push_number_unsigned(*self as u64));
            }
            fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
                let item = items.first().ok_or(SorError::TruncatedValue {
                    tag: 0,
                    expected: 1,
                    found: 0,
                })?;
                let value = script_number_value_unsigned(item)?;
                Ok((value as $t, 1))
            }
        }
    };
}

impl_sor_value_signed!(i8);
impl_sor_value_signed!(i16);
impl_sor_value_signed!(i32);
impl_sor_value_signed!(i64);
impl_sor_value_unsigned!(u8);
impl_sor_value_unsigned!(u16);
impl_sor_value_unsigned!(u32);
impl_sor_value_unsigned!(u64);

impl SorValue for bool {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        out.push(push_number_unsigned(if *self { 1 } else { 0 }));
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (value, consumed) = u64::unmarshal(items)?;
        Ok((value != 0, consumed))
    }
}

impl SorValue for Vec<u8> {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        out.push(ScriptItem::PushData(self.clone()));
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let item = items.first().ok_or(SorError::TruncatedValue {
            tag: 0,
            expected: 1,
            found: 0,
        })?;
        let bytes = item
            .as_push_data()
            .ok_or(SorError::UnsupportedFieldKind(0))?;
        Ok((bytes.to_vec(), 1))
    }
}

impl SorValue for String {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        out.push(ScriptItem::PushData(self.as_bytes().to_vec()));
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (bytes, consumed) = Vec::<u8>::unmarshal(items)?;
        let s = String::from_utf8(bytes).map_err(|_| SorError::UnsupportedFieldKind(0))?;
        Ok((s, consumed))
    }
}

/// Fixed-size byte array (e.g. a 16-byte UUID or 32-byte hash), stored as a
/// single push-data item of the exact expected length.
impl<const N: usize> SorValue for [u8; N] {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        out.push(ScriptItem::PushData(self.to_vec()));
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (bytes, consumed) = Vec::<u8>::unmarshal(items)?;
        if bytes.len() != N {
            return Err(SorError::TruncatedValue {
                tag: 0,
                expected: N,
                found: bytes.len(),
            });
        }
        let mut arr = [0u8; N];
        arr.copy_from_slice(&bytes);
        Ok((arr, consumed))
    }
}

/// An optional value appearing as a sequence element (as opposed to an
/// optional *field*, which is elided entirely by [`super::FieldWriter`]):
/// `(present: bool, value?)`.
impl<T: SorValue> SorValue for Option<T> {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        match self {
            Some(value) => {
                true.marshal(out);
                value.marshal(out);
            }
            None => false.marshal(out),
        }
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (present, consumed_flag) = bool::unmarshal(items)?;
        if !present {
            return Ok((None, consumed_flag));
        }
        let (value, consumed_value) = T::unmarshal(&items[consumed_flag..])?;
        Ok((Some(value), consumed_flag + consumed_value))
    }
}

/// Sequence field: `(count, element*)`, each element recursively marshaled.
impl<T: SorValue> SorValue for Vec<T> {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        out.push(push_number_unsigned(self.len() as u64));
        for element in self {
            element.marshal(out);
        }
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let first = items.first().ok_or(SorError::TruncatedValue {
            tag: 0,
            expected: 1,
            found: 0,
        })?;
        let count = script_number_value_unsigned(first)? as usize;
        let mut pos = 1;
        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            let (value, consumed) = T::unmarshal(&items[pos..])?;
            pos += consumed;
            result.push(value);
        }
        Ok((result, pos))
    }
}
