//! Script Object Representation (SOR): a reflection-free, tag-driven codec
//! that marshals structured records to an ordered sequence of script items
//! and back.
//!
//! Each record hand-implements [`SorRecord`], declaring its field tags (the
//! `bsor:"N"` schema of the source system, made explicit here since this
//! crate has no runtime reflection — see the crate's design notes).
//! [`SorRecord`] gets a blanket [`SorValue`] implementation so records can be
//! nested inside other records or used as sequence elements for free.

mod error;
mod record;
mod value;

pub use error::{SorError, SorResult};
pub use record::{FieldReader, FieldWriter};
pub use value::SorValue;

use crate::script::ScriptItem;

/// A record whose fields are tagged per a fixed schema. Implement this by
/// hand for every body/wrapper payload; [`SorValue`] is derived for free.
pub trait SorRecord: Sized {
    fn marshal_fields(&self, w: &mut FieldWriter);
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self>;
}

impl<T: SorRecord> SorValue for T {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        let mut w = FieldWriter::new();
        self.marshal_fields(&mut w);
        out.extend(w.finish());
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (mut r, consumed) = FieldReader::parse(items)?;
        let value = T::unmarshal_fields(&mut r)?;
        Ok((value, consumed))
    }
}

/// Encodes a top-level record to a flat `Vec<ScriptItem>`.
pub fn marshal<T: SorValue>(value: &T) -> Vec<ScriptItem> {
    let mut out = Vec::new();
    value.marshal(&mut out);
    out
}

/// Decodes a top-level record, requiring the entire slice to be consumed.
pub fn unmarshal<T: SorValue>(items: &[ScriptItem]) -> SorResult<T> {
    let (value, consumed) = T::unmarshal(items)?;
    if consumed != items.len() {
        return Err(SorError::TruncatedValue {
            tag: 0,
            expected: items.len(),
            found: consumed,
        });
    }
    Ok(value)
}
