use super::{
    catalog::{compare, illegal_parameter, table_key, Catalog, Table},
    parser::{CompareOp, Condition, Expr, Statement},
};
use crate::{
    driver::{DriverError, DriverOutcome, DriverResultSet, DriverTimestamp, DriverValue},
    ColumnDescriptor,
};
use std::cmp::Ordering;

pub(super) fn execute(
    catalog: &Catalog,
    statement: Statement,
    params: &[DriverValue],
) -> Result<DriverOutcome, DriverError> {
    match statement {
        Statement::CreateTable {
            table,
            if_not_exists,
            columns,
        } => {
            let mut tables = catalog.write()?;
            let key = table_key(&table);
            if tables.contains_key(&key) {
                if if_not_exists {
                    return Ok(DriverOutcome::RowCount(0));
                }
                return Err(illegal_state(format!("table {table} already exists")));
            }
            let new_table = Table::new(table, columns)?;
            tables.insert(key, new_table);
            Ok(DriverOutcome::RowCount(0))
        }

        Statement::DropTable { table, if_exists } => {
            let mut tables = catalog.write()?;
            if tables.remove(&table_key(&table)).is_none() && !if_exists {
                return Err(missing_table(&table));
            }
            Ok(DriverOutcome::RowCount(0))
        }

        Statement::Insert {
            table,
            columns,
            rows,
        } => {
            let mut tables = catalog.write()?;
            let table = tables
                .get_mut(&table_key(&table))
                .ok_or_else(|| missing_table(&table))?;

            let targets: Vec<usize> = match columns {
                Some(names) => names
                    .iter()
                    .map(|name| table.column_index(name))
                    .collect::<Result<_, _>>()?,
                None => (0..table.columns.len()).collect(),
            };

            let mut new_rows = Vec::with_capacity(rows.len());
            for exprs in rows {
                if exprs.len() != targets.len() {
                    return Err(illegal_parameter(format!(
                        "{} values given for {} columns",
                        exprs.len(),
                        targets.len()
                    )));
                }
                let mut row = vec![DriverValue::Null; table.columns.len()];
                for (expr, idx) in exprs.into_iter().zip(&targets) {
                    row[*idx] = resolve(expr, params)?;
                }
                let row = row
                    .into_iter()
                    .zip(&table.columns)
                    .map(|(value, column)| column.coerce(value))
                    .collect::<Result<Vec<_>, _>>()?;
                new_rows.push(row);
            }
            table.check_unique_keys(table.rows.iter().chain(new_rows.iter()))?;

            let count = new_rows.len();
            table.rows.extend(new_rows);
            Ok(row_count(count))
        }

        Statement::Select {
            table,
            projection,
            filter,
            order_by,
        } => {
            let tables = catalog.read()?;
            let table = tables
                .get(&table_key(&table))
                .ok_or_else(|| missing_table(&table))?;

            let indices: Vec<usize> = match projection {
                Some(names) => names
                    .iter()
                    .map(|name| table.column_index(name))
                    .collect::<Result<_, _>>()?,
                None => (0..table.columns.len()).collect(),
            };

            let mut selected = Vec::new();
            for row in &table.rows {
                if matches(table, filter.as_ref(), row, params)? {
                    selected.push(row);
                }
            }
            if let Some((column, descending)) = order_by {
                let idx = table.column_index(&column)?;
                // NULL sorts first
                selected.sort_by(|l, r| {
                    let ordering = match (&l[idx], &r[idx]) {
                        (DriverValue::Null, DriverValue::Null) => Ordering::Equal,
                        (DriverValue::Null, _) => Ordering::Less,
                        (_, DriverValue::Null) => Ordering::Greater,
                        (lv, rv) => compare(lv, rv).ok().flatten().unwrap_or(Ordering::Equal),
                    };
                    if descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
            }

            let rows: Vec<Vec<DriverValue>> = selected
                .into_iter()
                .map(|row| indices.iter().map(|i| row[*i].clone()).collect())
                .collect();
            let columns = indices
                .iter()
                .map(|i| table.columns[*i].descriptor())
                .collect();
            Ok(DriverOutcome::ResultSet(Box::new(LoopbackResultSet::new(
                columns, rows,
            ))))
        }

        Statement::Update {
            table,
            assignments,
            filter,
        } => {
            let mut tables = catalog.write()?;
            let table = tables
                .get_mut(&table_key(&table))
                .ok_or_else(|| missing_table(&table))?;

            let mut resolved = Vec::with_capacity(assignments.len());
            for (column, expr) in assignments {
                let idx = table.column_index(&column)?;
                resolved.push((idx, table.columns[idx].coerce(resolve(expr, params)?)?));
            }

            let mut updated_rows = table.rows.clone();
            let mut count = 0;
            for row in &mut updated_rows {
                if matches(table, filter.as_ref(), row, params)? {
                    for (idx, value) in &resolved {
                        row[*idx] = value.clone();
                    }
                    count += 1;
                }
            }
            table.check_unique_keys(updated_rows.iter())?;
            table.rows = updated_rows;
            Ok(row_count(count))
        }

        Statement::Delete { table, filter } => {
            let mut tables = catalog.write()?;
            let table = tables
                .get_mut(&table_key(&table))
                .ok_or_else(|| missing_table(&table))?;

            let mut keep = Vec::with_capacity(table.rows.len());
            for row in &table.rows {
                keep.push(!matches(table, filter.as_ref(), row, params)?);
            }
            let before = table.rows.len();
            let mut keep = keep.into_iter();
            table.rows.retain(|_| keep.next().unwrap_or(true));
            Ok(row_count(before - table.rows.len()))
        }
    }
}

fn row_count(count: usize) -> DriverOutcome {
    DriverOutcome::RowCount(i64::try_from(count).unwrap_or(i64::MAX))
}

fn resolve(expr: Expr, params: &[DriverValue]) -> Result<DriverValue, DriverError> {
    Ok(match expr {
        Expr::Null => DriverValue::Null,
        Expr::Bool(b) => DriverValue::Bool(b),
        Expr::Integer(i) => DriverValue::Long(i),
        Expr::Decimal(f) => DriverValue::Double(f),
        Expr::Str(s) => DriverValue::String(s),
        Expr::Timestamp(ts, precision) => {
            DriverValue::Timestamp(DriverTimestamp::new(&ts, precision))
        }
        Expr::Param(i) => params.get(i).cloned().ok_or_else(|| {
            illegal_parameter(format!("no value bound for parameter {}", i + 1))
        })?,
    })
}

fn matches(
    table: &Table,
    filter: Option<&Condition>,
    row: &[DriverValue],
    params: &[DriverValue],
) -> Result<bool, DriverError> {
    let Some(condition) = filter else {
        return Ok(true);
    };
    Ok(match condition {
        Condition::And(l, r) => {
            matches(table, Some(&**l), row, params)? && matches(table, Some(&**r), row, params)?
        }
        Condition::Or(l, r) => {
            matches(table, Some(&**l), row, params)? || matches(table, Some(&**r), row, params)?
        }
        Condition::IsNull { column, negated } => {
            row[table.column_index(column)?].is_null() != *negated
        }
        Condition::Compare { column, op, value } => {
            let value = resolve(value.clone(), params)?;
            match compare(&row[table.column_index(column)?], &value)? {
                None => false,
                Some(ordering) => match op {
                    CompareOp::Eq => ordering == Ordering::Equal,
                    CompareOp::Ne => ordering != Ordering::Equal,
                    CompareOp::Lt => ordering == Ordering::Less,
                    CompareOp::Le => ordering != Ordering::Greater,
                    CompareOp::Gt => ordering == Ordering::Greater,
                    CompareOp::Ge => ordering != Ordering::Less,
                },
            }
        }
    })
}

fn missing_table(table: &str) -> DriverError {
    illegal_state(format!("table {table} does not exist"))
}

fn illegal_state(message: String) -> DriverError {
    DriverError::new(DriverError::ILLEGAL_STATE, message)
}

// Rows are copied at execution time.
#[derive(Debug)]
pub(super) struct LoopbackResultSet {
    columns: Vec<ColumnDescriptor>,
    rows: std::vec::IntoIter<Vec<DriverValue>>,
    closed: bool,
}

impl LoopbackResultSet {
    fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Vec<DriverValue>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
            closed: false,
        }
    }
}

impl DriverResultSet for LoopbackResultSet {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<DriverValue>>, DriverError> {
        if self.closed {
            return Err(DriverError::new(
                DriverError::ALREADY_CLOSED,
                "result set is already closed",
            ));
        }
        Ok(self.rows.next())
    }

    fn close(&mut self) {
        self.closed = true;
        self.rows = Vec::new().into_iter();
    }
}
