#[cfg(feature = "serde_types")]
use serde::{Deserialize, Serialize};

use crate::schema::types::{PhysicalType, PrimitiveConvertedType};

/// A descriptor for leaf-level primitive columns.
/// This encapsulates the constants of a column that page decoding depends on:
/// its physical type, its annotation and its maximum levels.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct ColumnDescriptor {
    // The path of this column. For instance, "a.b.c.d".
    path_in_schema: Vec<String>,

    physical_type: PhysicalType,

    converted_type: Option<PrimitiveConvertedType>,

    // The maximum definition level for this column
    max_def_level: i16,

    // The maximum repetition level for this column
    max_rep_level: i16,
}

impl ColumnDescriptor {
    /// Creates new descriptor for leaf-level column.
    pub fn new(
        path_in_schema: Vec<String>,
        physical_type: PhysicalType,
        converted_type: Option<PrimitiveConvertedType>,
        max_def_level: i16,
        max_rep_level: i16,
    ) -> Self {
        Self {
            path_in_schema,
            physical_type,
            converted_type,
            max_def_level,
            max_rep_level,
        }
    }

    /// Returns maximum definition level for this column.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// Returns maximum repetition level for this column.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }

    pub fn path_in_schema(&self) -> &[String] {
        &self.path_in_schema
    }

    /// Returns the [`PhysicalType`] of this leaf column.
    pub fn physical_type(&self) -> &PhysicalType {
        &self.physical_type
    }

    pub fn converted_type(&self) -> Option<&PrimitiveConvertedType> {
        self.converted_type.as_ref()
    }

    /// The number of bytes of one value, 0 for variable-width columns.
    pub fn type_length(&self) -> usize {
        self.physical_type.type_length()
    }

    /// Whether the values of this column are 32-bit integers that dictionary ids can
    /// stand in for: INT32 without annotation or annotated as a signed integer of at most
    /// 32 bits or a date.
    pub fn is_int_type(&self) -> bool {
        use PrimitiveConvertedType::*;
        match self.physical_type {
            PhysicalType::Int32 => matches!(
                self.converted_type,
                None | Some(Int8) | Some(Int16) | Some(Int32) | Some(Date)
            ),
            _ => false,
        }
    }

    /// Returns column name.
    pub fn name(&self) -> &str {
        self.path_in_schema
            .last()
            .map(|x| x.as_str())
            .unwrap_or_default()
    }
}
