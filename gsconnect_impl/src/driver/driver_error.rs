/// Describes an error that is reported by the driver.
///
/// The error code follows the numbering of the GridDB JDBC driver; the constants
/// on this type name the codes this crate produces or reacts on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DriverError {
    code: i32,
    message: String,
}

impl DriverError {
    /// The requested feature is not supported.
    pub const NOT_SUPPORTED: i32 = 147_001;
    /// The addressed resource is already closed.
    pub const ALREADY_CLOSED: i32 = 147_004;
    /// A column index is out of range.
    pub const COLUMN_INDEX_OUT_OF_RANGE: i32 = 147_005;
    /// A parameter or a value is not acceptable.
    pub const ILLEGAL_PARAMETER: i32 = 147_008;
    /// The operation is not possible in the current state.
    pub const ILLEGAL_STATE: i32 = 147_010;

    /// Creates a new `DriverError`.
    pub fn new<S: Into<String>>(code: i32, message: S) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the error text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for DriverError {}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
