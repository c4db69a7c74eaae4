use crate::{types_impl::timestamp::TimePrecision, TypeCode};

/// Describes one column of a result set.
///
/// This is the Rust shape of the seven-item DB-API column description:
/// name, type code, display size, internal size, precision, scale, nullability.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    name: String,
    type_code: TypeCode,
    precision: i32,
    null_ok: bool,
}

impl ColumnDescriptor {
    /// Display size and internal size reported for every column.
    pub const COLUMN_SIZE: i32 = 128 * 1024;

    /// Creates a descriptor; `precision` is only meaningful for `TIMESTAMP` columns.
    pub fn new<S: Into<String>>(
        name: S,
        type_code: TypeCode,
        precision: Option<TimePrecision>,
        null_ok: bool,
    ) -> Self {
        Self {
            name: name.into(),
            type_code,
            precision: match (type_code, precision) {
                (TypeCode::TIMESTAMP, Some(p)) => i32::from(p.digits()),
                _ => 0,
            },
            null_ok,
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column type.
    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Always [`ColumnDescriptor::COLUMN_SIZE`].
    pub fn display_size(&self) -> i32 {
        Self::COLUMN_SIZE
    }

    /// Always [`ColumnDescriptor::COLUMN_SIZE`].
    pub fn internal_size(&self) -> i32 {
        Self::COLUMN_SIZE
    }

    /// 3, 6, or 9 for timestamp columns, 0 otherwise.
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// The timestamp precision, if this is a timestamp column.
    pub fn time_precision(&self) -> Option<TimePrecision> {
        match self.type_code {
            TypeCode::TIMESTAMP => u32::try_from(self.precision)
                .ok()
                .and_then(TimePrecision::from_digits),
            _ => None,
        }
    }

    /// Always 0.
    pub fn scale(&self) -> i32 {
        0
    }

    /// Whether the column can contain NULL.
    pub fn null_ok(&self) -> bool {
        self.null_ok
    }
}

impl std::fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {}, {})",
            self.name,
            self.type_code,
            self.display_size(),
            self.internal_size(),
            self.precision,
            self.scale(),
            u8::from(self.null_ok)
        )
    }
}

/// The descriptors of all columns of a result set.
///
/// Derefs to `Vec<ColumnDescriptor>`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResultSetMetadata(Vec<ColumnDescriptor>);

impl ResultSetMetadata {
    pub(crate) fn new(descriptors: Vec<ColumnDescriptor>) -> Self {
        Self(descriptors)
    }

    /// Returns the index of the column with the given name, compared case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|cd| cd.name().eq_ignore_ascii_case(name))
    }
}

impl std::ops::Deref for ResultSetMetadata {
    type Target = Vec<ColumnDescriptor>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ResultSetMetadata {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(fmt)?;
        for cd in &self.0 {
            write!(fmt, "{}, ", cd.name())?;
        }
        writeln!(fmt)
    }
}

#[cfg(test)]
mod test {
    use super::{ColumnDescriptor, ResultSetMetadata};
    use crate::{types_impl::timestamp::TimePrecision, TypeCode};

    #[test]
    fn test_descriptor() {
        let cd = ColumnDescriptor::new("ts", TypeCode::TIMESTAMP, Some(TimePrecision::Micro), true);
        assert_eq!(6, cd.precision());
        assert_eq!(Some(TimePrecision::Micro), cd.time_precision());
        assert_eq!(131_072, cd.display_size());
        assert_eq!(131_072, cd.internal_size());
        assert_eq!(0, cd.scale());
        assert_eq!("(ts, TIMESTAMP, 131072, 131072, 6, 0, 1)", cd.to_string());

        let cd = ColumnDescriptor::new("id", TypeCode::INTEGER, Some(TimePrecision::Nano), false);
        assert_eq!(0, cd.precision());
        assert_eq!(None, cd.time_precision());
        assert!(!cd.null_ok());
    }

    #[test]
    fn test_index_of() {
        let md = ResultSetMetadata::new(vec![
            ColumnDescriptor::new("id", TypeCode::INTEGER, None, false),
            ColumnDescriptor::new("Value", TypeCode::STRING, None, true),
        ]);
        assert_eq!(Some(1), md.index_of("value"));
        assert_eq!(None, md.index_of("other"));
        assert_eq!(2, md.len());
    }
}
