// Glue between the value and row types of this crate and `serde_db`.

mod de;
