use crate::TypeCode;

/// Direction of a parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterMode {
    /// Input parameter.
    In,
}

/// Metadata of one placeholder of the last executed statement.
///
/// The database does not describe parameters, so every placeholder is reported
/// with type name `UNKNOWN`, type code [`TypeCode::UNKNOWN`], mode `In`,
/// precision and scale 0, and as nullable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParameterDescriptor {
    position: usize,
}

impl ParameterDescriptor {
    pub(crate) fn new(position: usize) -> Self {
        Self { position }
    }

    /// One-based position of the placeholder in the statement.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Always `"UNKNOWN"`.
    pub fn type_name(&self) -> &'static str {
        TypeCode::UNKNOWN.name()
    }

    /// Always [`TypeCode::UNKNOWN`].
    pub fn type_code(&self) -> TypeCode {
        TypeCode::UNKNOWN
    }

    /// Always [`ParameterMode::In`].
    pub fn mode(&self) -> ParameterMode {
        ParameterMode::In
    }

    /// Always 0.
    pub fn precision(&self) -> i32 {
        0
    }

    /// Always 0.
    pub fn scale(&self) -> i32 {
        0
    }

    /// Always true.
    pub fn nullable(&self) -> bool {
        true
    }
}
