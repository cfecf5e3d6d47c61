//! Element type conversion
//!
//! Casting decides how update values are converted to the element type of
//! the array being updated.

use std::borrow::Cow;
use std::fmt;

use num_traits::NumCast;
use serde::{Deserialize, Serialize};

use crate::data::ArrayData;
use crate::element::ElementType;
use crate::error::{IndexError, IndexResult};
use crate::value::Scalar;

/// Rule for converting elements between element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casting {
    /// Any numeric conversion; float to integer truncates toward zero.
    /// NaN, infinities and out-of-range values are rejected.
    #[default]
    Unsafe,
    /// Only conversions that preserve every value.
    Safe,
}

impl Casting {
    /// Name used in configuration files and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Casting::Unsafe => "unsafe",
            Casting::Safe => "safe",
        }
    }

    /// Parse a rule name as used in configuration files
    pub fn parse(name: &str) -> IndexResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "unsafe" => Ok(Casting::Unsafe),
            "safe" => Ok(Casting::Safe),
            other => Err(IndexError::config_error(format!(
                "unknown casting rule '{}' (expected 'unsafe' or 'safe')",
                other
            ))),
        }
    }
}

impl fmt::Display for Casting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check_rule(from: ElementType, to: ElementType, casting: Casting) -> IndexResult<()> {
    if casting == Casting::Safe && !from.can_cast_safely(to) {
        return Err(IndexError::type_error(format!(
            "cannot cast {} to {} under the 'safe' casting rule",
            from, to
        )));
    }
    Ok(())
}

fn to_integer<T: NumCast>(value: Scalar) -> Option<T> {
    match value {
        Scalar::F32(v) => <T as NumCast>::from(v),
        Scalar::F64(v) => <T as NumCast>::from(v),
        Scalar::I8(v) => <T as NumCast>::from(v),
        Scalar::I16(v) => <T as NumCast>::from(v),
        Scalar::I32(v) => <T as NumCast>::from(v),
        Scalar::I64(v) => <T as NumCast>::from(v),
        Scalar::U8(v) => <T as NumCast>::from(v),
        Scalar::U16(v) => <T as NumCast>::from(v),
        Scalar::U32(v) => <T as NumCast>::from(v),
        Scalar::U64(v) => <T as NumCast>::from(v),
        Scalar::Bool(v) => <T as NumCast>::from(v as u8),
    }
}

/// Convert one scalar to `target` under `casting`
pub fn cast_scalar(value: Scalar, target: ElementType, casting: Casting) -> IndexResult<Scalar> {
    let from = value.element_type();
    if from == target {
        return Ok(value);
    }
    check_rule(from, target, casting)?;

    let inexact = || IndexError::type_error(format!("cannot convert {} to {}", value, target));

    let converted = match target {
        ElementType::Bool => Scalar::Bool(!value.is_zero()),
        ElementType::F32 => Scalar::F32(value.as_f64() as f32),
        ElementType::F64 => Scalar::F64(value.as_f64()),
        ElementType::I8 => Scalar::I8(to_integer(value).ok_or_else(inexact)?),
        ElementType::I16 => Scalar::I16(to_integer(value).ok_or_else(inexact)?),
        ElementType::I32 => Scalar::I32(to_integer(value).ok_or_else(inexact)?),
        ElementType::I64 => Scalar::I64(to_integer(value).ok_or_else(inexact)?),
        ElementType::U8 => Scalar::U8(to_integer(value).ok_or_else(inexact)?),
        ElementType::U16 => Scalar::U16(to_integer(value).ok_or_else(inexact)?),
        ElementType::U32 => Scalar::U32(to_integer(value).ok_or_else(inexact)?),
        ElementType::U64 => Scalar::U64(to_integer(value).ok_or_else(inexact)?),
    };
    Ok(converted)
}

/// Convert storage to `target`, borrowing it when no conversion is needed
pub fn cast_data(
    data: &ArrayData,
    target: ElementType,
    casting: Casting,
) -> IndexResult<Cow<'_, ArrayData>> {
    let from = data.element_type();
    if from == target {
        return Ok(Cow::Borrowed(data));
    }
    check_rule(from, target, casting)?;

    let values = data
        .iter_values()
        .map(|value| cast_scalar(value, target, casting))
        .collect::<IndexResult<Vec<_>>>()?;
    Ok(Cow::Owned(ArrayData::from_scalars(target, &values)?))
}
