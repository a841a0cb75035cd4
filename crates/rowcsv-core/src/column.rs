//! Column descriptors

use std::fmt;

use crate::error::{Error, Result};
use crate::value::FieldValue;
use crate::TYPED_HEADER_SEPARATOR;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnType {
    /// Unknown type, every field converts to null
    Unknown,
    /// Integer values
    Integer,
    /// Decimal values
    Decimal,
    /// Date / time values
    DateTime,
    /// Text values
    #[default]
    String,
    /// Boolean values
    Boolean,
}

impl ColumnType {
    /// Name used by the typed header dialect
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Unknown => "Unknown",
            ColumnType::Integer => "Integer",
            ColumnType::Decimal => "Decimal",
            ColumnType::DateTime => "DateTime",
            ColumnType::String => "String",
            ColumnType::Boolean => "Boolean",
        }
    }

    /// Parse a type name (case insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "unknown" => Some(ColumnType::Unknown),
            "integer" => Some(ColumnType::Integer),
            "decimal" => Some(ColumnType::Decimal),
            "datetime" => Some(ColumnType::DateTime),
            "string" => Some(ColumnType::String),
            "boolean" => Some(ColumnType::Boolean),
            _ => None,
        }
    }

    /// Type that naturally holds a value (null maps to String)
    pub fn of(value: &FieldValue) -> Self {
        match value {
            FieldValue::Int(_) => ColumnType::Integer,
            FieldValue::Decimal(_) => ColumnType::Decimal,
            FieldValue::Bool(_) => ColumnType::Boolean,
            FieldValue::Timestamp(_) => ColumnType::DateTime,
            FieldValue::Null | FieldValue::Text(_) => ColumnType::String,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and declared type of one file column
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type
    pub column_type: ColumnType,
}

impl Column {
    /// Create a new column
    pub fn new<S: Into<String>>(name: S, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Create a text column
    pub fn string<S: Into<String>>(name: S) -> Self {
        Self::new(name, ColumnType::String)
    }

    /// Parse a typed header cell (`Name|Type`)
    ///
    /// Unrecognized type names fall back to [`ColumnType::String`]; a cell that
    /// does not split into exactly two parts is a [`Error::MalformedHeader`].
    pub fn parse_typed(cell: &str) -> Result<Self> {
        let mut parts = cell.split(TYPED_HEADER_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(type_name), None) => Ok(Self::new(
                name,
                ColumnType::from_name(type_name).unwrap_or_default(),
            )),
            _ => Err(Error::MalformedHeader(cell.to_string())),
        }
    }

    /// Header cell text for the typed header dialect
    pub fn typed_header(&self) -> String {
        format!(
            "{}{}{}",
            self.name,
            TYPED_HEADER_SEPARATOR,
            self.column_type.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_typed_header_cell() {
        assert_eq!(
            Column::parse_typed("age|integer").unwrap(),
            Column::new("age", ColumnType::Integer)
        );
        assert_eq!(
            Column::parse_typed("when|DATETIME").unwrap(),
            Column::new("when", ColumnType::DateTime)
        );
        // unrecognized types read as text
        assert_eq!(
            Column::parse_typed("notes|blob").unwrap(),
            Column::string("notes")
        );
    }

    #[test]
    fn test_parse_typed_header_cell_rejects_malformed() {
        assert!(matches!(
            Column::parse_typed("age"),
            Err(Error::MalformedHeader(cell)) if cell == "age"
        ));
        assert!(Column::parse_typed("a|b|c").is_err());
    }

    #[test]
    fn test_typed_header_text() {
        let column = Column::new("price", ColumnType::Decimal);
        assert_eq!(column.typed_header(), "price|Decimal");
        assert_eq!(Column::parse_typed(&column.typed_header()).unwrap(), column);
    }

    #[test]
    fn test_column_type_of_value() {
        assert_eq!(ColumnType::of(&FieldValue::Int(1)), ColumnType::Integer);
        assert_eq!(ColumnType::of(&FieldValue::Decimal(1.5)), ColumnType::Decimal);
        assert_eq!(ColumnType::of(&FieldValue::Bool(true)), ColumnType::Boolean);
        assert_eq!(ColumnType::of(&FieldValue::Null), ColumnType::String);
    }
}
