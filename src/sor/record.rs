//! Tagged-field record framing shared by every SOR-encoded body and wrapper.
//!
//! A record is written as `field_count:number, (tag:number, len:number,
//! value_items[len])*` in ascending tag order. `len` is the number of raw
//! script items the field's value occupies, which lets a reader skip a field
//! whose tag it doesn't recognise without needing to understand its
//! contents — this is what makes unknown tags forward-compatible.

use std::collections::BTreeMap;

use crate::script::{push_number_unsigned, script_number_value_unsigned, ScriptItem};

use super::error::{SorError, SorResult};
use super::value::SorValue;

/// Builds the tagged-field encoding of a record. Fields must be added in
/// ascending tag order (the same order they'll appear on the wire);
/// `finish` does not re-sort them.
#[derive(Default)]
pub struct FieldWriter {
    fields: BTreeMap<u64, Vec<ScriptItem>>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a required field. Panics if `tag` is 0 (reserved) — a
    /// programmer error, not a runtime condition.
    pub fn field<T: SorValue>(&mut self, tag: u64, value: &T) -> &mut Self {
        assert_ne!(tag, 0, "tag 0 is reserved");
        let mut items = Vec::new();
        value.marshal(&mut items);
        self.fields.insert(tag, items);
        self
    }

    /// Writes an optional field, eliding it entirely when `value` is `None`.
    pub fn optional_field<T: SorValue>(&mut self, tag: u64, value: &Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.field(tag, v);
        }
        self
    }

    /// Assembles the record: `field_count, (tag, len, value_items...)*` in
    /// ascending tag order.
    pub fn finish(self) -> Vec<ScriptItem> {
        let mut out = Vec::new();
        out.push(push_number_unsigned(self.fields.len() as u64));
        for (tag, items) in self.fields {
            out.push(push_number_unsigned(tag));
            out.push(push_number_unsigned(items.len() as u64));
            out.extend(items);
        }
        out
    }
}

/// Parses the tagged-field encoding of a record, exposing each field's raw
/// item slice by tag so a caller can pull out the fields its schema knows
/// about and silently ignore the rest.
pub struct FieldReader<'a> {
    fields: BTreeMap<u64, &'a [ScriptItem]>,
}

impl<'a> FieldReader<'a> {
    /// Parses a record from the front of `items`, returning the reader and
    /// the number of items consumed.
    pub fn parse(items: &'a [ScriptItem]) -> SorResult<(Self, usize)> {
        let first = items
            .first()
            .ok_or(SorError::TruncatedValue { tag: 0, expected: 1, found: 0 })?;
        let field_count = script_number_value_unsigned(first)? as usize;
        let mut pos = 1;
        let mut fields = BTreeMap::new();
        let mut previous_tag: Option<u64> = None;

        for _ in 0..field_count {
            let tag_item = items
                .get(pos)
                .ok_or(SorError::TruncatedValue { tag: 0, expected: 1, found: 0 })?;
            let tag = script_number_value_unsigned(tag_item)?;
            if tag == 0 {
                return Err(SorError::ReservedTag);
            }
            pos += 1;

            let len_item = items
                .get(pos)
                .ok_or(SorError::TruncatedValue { tag, expected: 1, found: 0 })?;
            let len = script_number_value_unsigned(len_item)? as usize;
            pos += 1;

            if let Some(prev) = previous_tag {
                if tag == prev {
                    return Err(SorError::DuplicateTag(tag));
                } else if tag < prev {
                    return Err(SorError::TagOutOfOrder { tag, previous: prev });
                }
            }
            previous_tag = Some(tag);

            if pos + len > items.len() {
                return Err(SorError::TruncatedValue {
                    tag,
                    expected: len,
                    found: items.len() - pos,
                });
            }
            fields.insert(tag, &items[pos..pos + len]);
            pos += len;
        }

        Ok((FieldReader { fields }, pos))
    }

    /// Takes a field by tag, decoding it with `T::unmarshal`. Returns `Ok(None)`
    /// if the tag is absent (the field was elided on write). Errors if the
    /// value's declared item count wasn't fully consumed by `T::unmarshal`.
    pub fn take<T: SorValue>(&mut self, tag: u64) -> SorResult<Option<T>> {
        match self.fields.remove(&tag) {
            None => Ok(None),
            Some(slice) => {
                let (value, consumed) = T::unmarshal(slice)?;
                if consumed != slice.len() {
                    return Err(SorError::TruncatedValue {
                        tag,
                        expected: slice.len(),
                        found: consumed,
                    });
                }
                Ok(Some(value))
            }
        }
    }

    /// Like [`Self::take`] but errors with `MissingField` if the tag is absent.
    pub fn require<T: SorValue>(&mut self, tag: u64) -> SorResult<T> {
        self.take(tag)?.ok_or(SorError::MissingField(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_reader_round_trip() {
        let mut w = FieldWriter::new();
        w.field(1, &7u64);
        w.field(2, &"hello".to_string());
        w.optional_field::<u64>(3, &None);
        let items = w.finish();

        let (mut r, consumed) = FieldReader::parse(&items).unwrap();
        assert_eq!(consumed, items.len());
        assert_eq!(r.require::<u64>(1).unwrap(), 7);
        assert_eq!(r.take::<String>(2).unwrap(), Some("hello".to_string()));
        assert_eq!(r.take::<u64>(3).unwrap(), None);
    }

    #[test]
    fn unknown_tags_are_silently_skippable() {
        let mut w = FieldWriter::new();
        w.field(1, &1u64);
        w.field(5, &"future field".to_string());
        let items = w.finish();

        let (mut r, _) = FieldReader::parse(&items).unwrap();
        assert_eq!(r.require::<u64>(1).unwrap(), 1);
        // tag 5 is never read by this schema version; that's fine.
    }
}
