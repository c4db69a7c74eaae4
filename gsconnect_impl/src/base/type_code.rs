/// The column types of the database.
///
/// `TypeCode` is what a [`ColumnDescriptor`](crate::ColumnDescriptor) reports as
/// `type_code`. Each variant knows its JDBC type number and its DB-API category.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum TypeCode {
    /// Boolean, JDBC `BIT`.
    BOOL,
    /// 8-bit signed integer, JDBC `TINYINT`.
    BYTE,
    /// 16-bit signed integer, JDBC `SMALLINT`.
    SHORT,
    /// 32-bit signed integer, JDBC `INTEGER`.
    INTEGER,
    /// 64-bit signed integer, JDBC `BIGINT`.
    LONG,
    /// 32-bit floating point, JDBC `FLOAT`.
    FLOAT,
    /// 64-bit floating point, JDBC `DOUBLE`.
    DOUBLE,
    /// Point in time, with precision 3, 6 or 9; JDBC `TIMESTAMP`.
    TIMESTAMP,
    /// Unicode text, JDBC `VARCHAR`.
    STRING,
    /// Binary large object, JDBC `BLOB`.
    BLOB,
    /// Anything else, JDBC `OTHER`.
    UNKNOWN,
}

/// Type categories as used by DB-API type objects.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TypeCategory {
    /// Numeric columns, including BOOL.
    Number,
    /// Text columns.
    String,
    /// Binary columns.
    Binary,
    /// Date and time columns.
    DateTime,
    /// Columns of unknown type.
    Other,
}

impl TypeCode {
    /// The JDBC type number (`java.sql.Types`).
    pub fn jdbc_type(self) -> i32 {
        match self {
            Self::BOOL => -7,
            Self::BYTE => -6,
            Self::SHORT => 5,
            Self::INTEGER => 4,
            Self::LONG => -5,
            Self::FLOAT => 6,
            Self::DOUBLE => 8,
            Self::TIMESTAMP => 93,
            Self::STRING => 12,
            Self::BLOB => 2004,
            Self::UNKNOWN => 1111,
        }
    }

    /// The category, for comparisons with DB-API type objects.
    pub fn category(self) -> TypeCategory {
        match self {
            Self::BOOL
            | Self::BYTE
            | Self::SHORT
            | Self::INTEGER
            | Self::LONG
            | Self::FLOAT
            | Self::DOUBLE => TypeCategory::Number,
            Self::TIMESTAMP => TypeCategory::DateTime,
            Self::STRING => TypeCategory::String,
            Self::BLOB => TypeCategory::Binary,
            Self::UNKNOWN => TypeCategory::Other,
        }
    }

    /// The type name as used in DDL.
    pub fn name(self) -> &'static str {
        match self {
            Self::BOOL => "BOOL",
            Self::BYTE => "BYTE",
            Self::SHORT => "SHORT",
            Self::INTEGER => "INTEGER",
            Self::LONG => "LONG",
            Self::FLOAT => "FLOAT",
            Self::DOUBLE => "DOUBLE",
            Self::TIMESTAMP => "TIMESTAMP",
            Self::STRING => "STRING",
            Self::BLOB => "BLOB",
            Self::UNKNOWN => "UNKNOWN",
        }
    }

    /// Resolves a DDL type keyword, case-insensitively.
    ///
    /// Besides the native names, the usual SQL aliases are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "BOOL" | "BOOLEAN" => Self::BOOL,
            "BYTE" | "TINYINT" => Self::BYTE,
            "SHORT" | "SMALLINT" => Self::SHORT,
            "INTEGER" | "INT" => Self::INTEGER,
            "LONG" | "BIGINT" => Self::LONG,
            "FLOAT" | "REAL" => Self::FLOAT,
            "DOUBLE" => Self::DOUBLE,
            "TIMESTAMP" => Self::TIMESTAMP,
            "STRING" | "VARCHAR" | "CHAR" | "TEXT" => Self::STRING,
            "BLOB" => Self::BLOB,
            _ => return None,
        })
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test {
    use super::{TypeCategory, TypeCode};

    #[test]
    fn test_type_code() {
        assert_eq!(Some(TypeCode::INTEGER), TypeCode::from_name("integer"));
        assert_eq!(Some(TypeCode::STRING), TypeCode::from_name("String"));
        assert_eq!(Some(TypeCode::LONG), TypeCode::from_name("BIGINT"));
        assert_eq!(None, TypeCode::from_name("GEOMETRY"));
        assert_eq!(93, TypeCode::TIMESTAMP.jdbc_type());
        assert_eq!(1111, TypeCode::UNKNOWN.jdbc_type());
        assert_eq!(TypeCategory::Number, TypeCode::BOOL.category());
        assert_eq!(TypeCategory::Binary, TypeCode::BLOB.category());
        assert_eq!("TIMESTAMP", TypeCode::TIMESTAMP.to_string());
    }
}
