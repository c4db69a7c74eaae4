use super::parser::ColumnDef;
use crate::{
    driver::{DriverError, DriverValue},
    types_impl::timestamp::TimePrecision,
    ColumnDescriptor, TypeCode,
};
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

// All tables of one database in one cluster; table names are case-insensitive.
#[derive(Debug, Default)]
pub(super) struct Catalog {
    tables: RwLock<HashMap<String, Table>>,
}

impl Catalog {
    pub(super) fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Table>>, DriverError> {
        self.tables.read().map_err(|_| poisoned())
    }

    pub(super) fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, Table>>, DriverError> {
        self.tables.write().map_err(|_| poisoned())
    }
}

pub(super) fn table_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

fn poisoned() -> DriverError {
    DriverError::new(DriverError::ILLEGAL_STATE, "catalog lock is poisoned")
}

#[derive(Debug)]
pub(super) struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<DriverValue>>,
}

impl Table {
    pub(super) fn new(name: String, defs: Vec<ColumnDef>) -> Result<Self, DriverError> {
        let mut columns: Vec<Column> = Vec::with_capacity(defs.len());
        for def in defs {
            if columns.iter().any(|c| c.name.eq_ignore_ascii_case(&def.name)) {
                return Err(illegal_parameter(format!(
                    "column {} is defined twice",
                    def.name
                )));
            }
            columns.push(Column {
                name: def.name,
                type_code: def.type_code,
                precision: def.precision,
                primary_key: def.primary_key,
                not_null: def.not_null,
            });
        }
        if columns.iter().filter(|c| c.primary_key).count() > 1 {
            return Err(illegal_parameter(format!(
                "table {name} can have only one primary key column"
            )));
        }
        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    pub(super) fn column_index(&self, name: &str) -> Result<usize, DriverError> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                illegal_parameter(format!("column {name} does not exist in table {}", self.name))
            })
    }

    pub(super) fn primary_key_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.primary_key)
    }

    // fails if the given rows contain a primary key twice
    pub(super) fn check_unique_keys<'a, I>(&self, rows: I) -> Result<(), DriverError>
    where
        I: IntoIterator<Item = &'a Vec<DriverValue>>,
    {
        if let Some(pk) = self.primary_key_index() {
            let mut seen: Vec<&DriverValue> = Vec::new();
            for row in rows {
                let key = &row[pk];
                if seen
                    .iter()
                    .any(|other| compare(other, key) == Ok(Some(Ordering::Equal)))
                {
                    return Err(DriverError::new(
                        DriverError::ILLEGAL_STATE,
                        format!(
                            "duplicate value {key} for primary key {} of table {}",
                            self.columns[pk].name, self.name
                        ),
                    ));
                }
                seen.push(key);
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct Column {
    pub name: String,
    pub type_code: TypeCode,
    pub precision: Option<TimePrecision>,
    pub primary_key: bool,
    pub not_null: bool,
}

impl Column {
    pub(super) fn descriptor(&self) -> ColumnDescriptor {
        ColumnDescriptor::new(&self.name, self.type_code, self.precision, !self.not_null)
    }

    // converts a value into the representation this column stores
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub(super) fn coerce(&self, value: DriverValue) -> Result<DriverValue, DriverError> {
        if value.is_null() {
            return if self.not_null {
                Err(illegal_parameter(format!(
                    "column {} must not be NULL",
                    self.name
                )))
            } else {
                Ok(DriverValue::Null)
            };
        }
        let mismatch = |value: &DriverValue| {
            illegal_parameter(format!(
                "value {value} does not fit column {} of type {}",
                self.name, self.type_code
            ))
        };
        let out_of_range = |i: i64| {
            illegal_parameter(format!(
                "value {i} is out of range for column {} of type {}",
                self.name, self.type_code
            ))
        };

        Ok(match self.type_code {
            TypeCode::BOOL => match value {
                DriverValue::Bool(b) => DriverValue::Bool(b),
                other => return Err(mismatch(&other)),
            },
            TypeCode::BYTE | TypeCode::SHORT | TypeCode::INTEGER | TypeCode::LONG => {
                let i = as_integer(&value).ok_or_else(|| mismatch(&value))?;
                match self.type_code {
                    TypeCode::BYTE => {
                        DriverValue::Byte(i8::try_from(i).map_err(|_| out_of_range(i))?)
                    }
                    TypeCode::SHORT => {
                        DriverValue::Short(i16::try_from(i).map_err(|_| out_of_range(i))?)
                    }
                    TypeCode::INTEGER => {
                        DriverValue::Integer(i32::try_from(i).map_err(|_| out_of_range(i))?)
                    }
                    _ => DriverValue::Long(i),
                }
            }
            TypeCode::FLOAT => match value {
                DriverValue::Float(f) => DriverValue::Float(f),
                DriverValue::Double(f) => DriverValue::Float(f as f32),
                other => DriverValue::Float(as_integer(&other).ok_or_else(|| mismatch(&other))? as f32),
            },
            TypeCode::DOUBLE => match value {
                DriverValue::Float(f) => DriverValue::Double(f64::from(f)),
                DriverValue::Double(f) => DriverValue::Double(f),
                other => {
                    DriverValue::Double(as_integer(&other).ok_or_else(|| mismatch(&other))? as f64)
                }
            },
            TypeCode::STRING => match value {
                DriverValue::String(s) => DriverValue::String(s),
                other => return Err(mismatch(&other)),
            },
            TypeCode::BLOB => match value {
                DriverValue::Blob(b) => DriverValue::Blob(b),
                DriverValue::Bytes(_) => {
                    return Err(illegal_parameter(format!(
                        "column {} of type BLOB requires a Blob value, not a byte array",
                        self.name
                    )))
                }
                other => return Err(mismatch(&other)),
            },
            TypeCode::TIMESTAMP => match value {
                DriverValue::Timestamp(ts) => DriverValue::Timestamp(
                    ts.with_precision(self.precision.unwrap_or(TimePrecision::Milli)),
                ),
                other => return Err(mismatch(&other)),
            },
            TypeCode::UNKNOWN => return Err(mismatch(&value)),
        })
    }
}

fn as_integer(value: &DriverValue) -> Option<i64> {
    match value {
        DriverValue::Byte(i) => Some(i64::from(*i)),
        DriverValue::Short(i) => Some(i64::from(*i)),
        DriverValue::Integer(i) => Some(i64::from(*i)),
        DriverValue::Long(i) => Some(*i),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_float(value: &DriverValue) -> Option<f64> {
    match value {
        DriverValue::Float(f) => Some(f64::from(*f)),
        DriverValue::Double(f) => Some(*f),
        other => as_integer(other).map(|i| i as f64),
    }
}

/// Compares two values; `Ok(None)` if one of them is NULL or the order is undefined.
///
/// # Errors
///
/// `DriverError` with code `ILLEGAL_PARAMETER` if the values cannot be compared.
pub(super) fn compare(
    left: &DriverValue,
    right: &DriverValue,
) -> Result<Option<Ordering>, DriverError> {
    Ok(match (left, right) {
        (DriverValue::Null, _) | (_, DriverValue::Null) => None,
        (DriverValue::Bool(l), DriverValue::Bool(r)) => Some(l.cmp(r)),
        (DriverValue::String(l), DriverValue::String(r)) => Some(l.cmp(r)),
        (DriverValue::Timestamp(l), DriverValue::Timestamp(r)) => {
            Some((l.seconds(), l.nanos()).cmp(&(r.seconds(), r.nanos())))
        }
        (DriverValue::Blob(l), DriverValue::Blob(r)) => Some(l.as_bytes().cmp(r.as_bytes())),
        (DriverValue::Bytes(l), DriverValue::Bytes(r)) => Some(l.cmp(r)),
        (DriverValue::Blob(l), DriverValue::Bytes(r)) => Some(l.as_bytes().cmp(r.as_slice())),
        (DriverValue::Bytes(l), DriverValue::Blob(r)) => Some(l.as_slice().cmp(r.as_bytes())),
        (l, r) => match (as_integer(l), as_integer(r)) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => match (as_float(l), as_float(r)) {
                (Some(l), Some(r)) => l.partial_cmp(&r),
                _ => {
                    return Err(illegal_parameter(format!(
                        "values {l} and {r} cannot be compared"
                    )))
                }
            },
        },
    })
}

pub(super) fn illegal_parameter(message: String) -> DriverError {
    DriverError::new(DriverError::ILLEGAL_PARAMETER, message)
}
