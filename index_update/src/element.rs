//! Element type definitions for homogeneous typed arrays.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Element type (dtype) of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElementType {
    // Floating point types
    F32,
    #[default]
    F64,
    // Signed integer types
    I8,
    I16,
    I32,
    I64,
    // Unsigned integer types
    U8,
    U16,
    U32,
    U64,
    // Other types
    Bool,
}

impl ElementType {
    /// Every supported element type, in declaration order
    pub const ALL: [ElementType; 11] = [
        ElementType::F32,
        ElementType::F64,
        ElementType::I8,
        ElementType::I16,
        ElementType::I32,
        ElementType::I64,
        ElementType::U8,
        ElementType::U16,
        ElementType::U32,
        ElementType::U64,
        ElementType::Bool,
    ];

    /// Check if this is a floating point type
    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    /// Check if this is a signed integer type
    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            ElementType::I8 | ElementType::I16 | ElementType::I32 | ElementType::I64
        )
    }

    /// Check if this is an unsigned integer type
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            ElementType::U8 | ElementType::U16 | ElementType::U32 | ElementType::U64
        )
    }

    /// Check if this is any integer type (Bool excluded)
    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    /// Width of one element in bits (Bool counts as 8)
    pub fn bits(&self) -> u32 {
        match self {
            ElementType::I8 | ElementType::U8 | ElementType::Bool => 8,
            ElementType::I16 | ElementType::U16 => 16,
            ElementType::F32 | ElementType::I32 | ElementType::U32 => 32,
            ElementType::F64 | ElementType::I64 | ElementType::U64 => 64,
        }
    }

    /// Type name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::F32 => "Float32",
            ElementType::F64 => "Float64",
            ElementType::I8 => "Int8",
            ElementType::I16 => "Int16",
            ElementType::I32 => "Int32",
            ElementType::I64 => "Int64",
            ElementType::U8 => "UInt8",
            ElementType::U16 => "UInt16",
            ElementType::U32 => "UInt32",
            ElementType::U64 => "UInt64",
            ElementType::Bool => "Bool",
        }
    }

    /// Whether every value of `self` is exactly representable in `target`.
    pub fn can_cast_safely(&self, target: ElementType) -> bool {
        if *self == target || *self == ElementType::Bool {
            return true;
        }
        match target {
            ElementType::Bool => false,
            ElementType::F32 => self.is_integer() && self.bits() <= 16,
            ElementType::F64 => {
                *self == ElementType::F32 || (self.is_integer() && self.bits() <= 32)
            }
            _ if target.is_signed_integer() => {
                (self.is_signed_integer() && target.bits() >= self.bits())
                    || (self.is_unsigned_integer() && target.bits() > self.bits())
            }
            _ => self.is_unsigned_integer() && target.bits() >= self.bits(),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
