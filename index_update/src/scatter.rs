//! Scatter and gather over linear offsets.
//!
//! `put` writes values at arbitrary offsets of a storage buffer and `take`
//! reads them back. Both check every offset before touching anything.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{array_data_map, ArrayData};
use crate::error::{IndexError, IndexResult};
use crate::trace::update_debug;

/// Order in which `put` issues its writes.
///
/// When several offsets coincide the last write wins, so the order decides
/// the winner. Which one that is stays unspecified to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScatterOrder {
    /// Selection order
    #[default]
    Forward,
    /// Reverse selection order
    Reverse,
}

impl ScatterOrder {
    pub fn name(&self) -> &'static str {
        match self {
            ScatterOrder::Forward => "forward",
            ScatterOrder::Reverse => "reverse",
        }
    }

    /// Parse an order name as used in configuration files
    pub fn parse(name: &str) -> IndexResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(ScatterOrder::Forward),
            "reverse" => Ok(ScatterOrder::Reverse),
            other => Err(IndexError::config_error(format!(
                "unknown scatter order '{}' (expected 'forward' or 'reverse')",
                other
            ))),
        }
    }
}

impl fmt::Display for ScatterOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check_offsets(offsets: &[usize], len: usize) -> IndexResult<()> {
    match offsets.iter().find(|&&offset| offset >= len) {
        Some(&offset) => Err(IndexError::offset_error(offset, len)),
        None => Ok(()),
    }
}

fn scatter<T: Copy>(
    target: &mut [T],
    offsets: &[usize],
    values: &[T],
    sources: &[usize],
    order: ScatterOrder,
) {
    let pairs = offsets.iter().zip(sources);
    match order {
        ScatterOrder::Forward => pairs.for_each(|(&o, &s)| target[o] = values[s]),
        ScatterOrder::Reverse => pairs.rev().for_each(|(&o, &s)| target[o] = values[s]),
    }
}

/// Write `values[sources[k]]` at `target[offsets[k]]` for every `k`.
///
/// `values` must have the target's element type. Offsets, sources and the
/// element type are all checked before the first write, so on error
/// `target` is left unchanged.
pub fn put(
    target: &mut ArrayData,
    offsets: &[usize],
    values: &ArrayData,
    sources: &[usize],
    order: ScatterOrder,
) -> IndexResult<()> {
    if offsets.len() != sources.len() {
        return Err(IndexError::argument_error(format!(
            "put needs one source per offset: {} offsets, {} sources",
            offsets.len(),
            sources.len()
        )));
    }
    check_offsets(offsets, target.len())?;
    check_offsets(sources, values.len())?;

    update_debug!("put: {} writes, {} order", offsets.len(), order);
    match (target, values) {
        (ArrayData::F32(t), ArrayData::F32(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::F64(t), ArrayData::F64(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::I8(t), ArrayData::I8(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::I16(t), ArrayData::I16(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::I32(t), ArrayData::I32(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::I64(t), ArrayData::I64(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::U8(t), ArrayData::U8(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::U16(t), ArrayData::U16(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::U32(t), ArrayData::U32(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::U64(t), ArrayData::U64(v)) => scatter(t, offsets, v, sources, order),
        (ArrayData::Bool(t), ArrayData::Bool(v)) => scatter(t, offsets, v, sources, order),
        (target, values) => {
            return Err(IndexError::type_error(format!(
                "cannot put {} values into {} storage",
                values.element_type(),
                target.element_type()
            )))
        }
    }
    Ok(())
}

/// Gather `data[offsets[k]]` into new storage of the same element type
pub fn take(data: &ArrayData, offsets: &[usize]) -> IndexResult<ArrayData> {
    check_offsets(offsets, data.len())?;
    Ok(array_data_map!(data, v => offsets.iter().map(|&o| v[o]).collect()))
}
