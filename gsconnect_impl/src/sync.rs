mod columnar;
mod connection;
mod cursor;
mod result_set;

pub use columnar::{arrow_schema, ColumnarBatches};
pub use connection::{connect, Connection};
pub use cursor::Cursor;
