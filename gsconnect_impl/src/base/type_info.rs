use crate::TypeCode;

/// One entry of the list of types a connection supports,
/// see [`Connection::type_info`](crate::Connection::type_info).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TypeInfo {
    type_name: String,
    type_code: TypeCode,
    precision: i32,
    nullable: bool,
}

impl TypeInfo {
    /// Creates a new entry.
    pub fn new<S: Into<String>>(
        type_name: S,
        type_code: TypeCode,
        precision: i32,
        nullable: bool,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            type_code,
            precision,
            nullable,
        }
    }

    /// Name of the type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Type code.
    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Maximal precision; the number of fractional digits for timestamps.
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Whether columns of this type can be nullable.
    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} ({}), precision {}",
            self.type_name,
            self.type_code.jdbc_type(),
            self.precision
        )
    }
}
