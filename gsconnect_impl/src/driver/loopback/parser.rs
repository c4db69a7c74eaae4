use crate::{driver::DriverError, types_impl::timestamp::TimePrecision, Timestamp, TypeCode};
use sqlparser::{
    ast as sql_ast,
    dialect::GenericDialect,
    parser::Parser as SqlParser,
    tokenizer::{Token, Tokenizer},
};

#[derive(Debug, PartialEq)]
pub(super) enum Statement {
    CreateTable {
        table: String,
        if_not_exists: bool,
        columns: Vec<ColumnDef>,
    },
    DropTable {
        table: String,
        if_exists: bool,
    },
    Insert {
        table: String,
        columns: Option<Vec<String>>,
        rows: Vec<Vec<Expr>>,
    },
    Select {
        table: String,
        projection: Option<Vec<String>>,
        filter: Option<Condition>,
        order_by: Option<(String, bool)>,
    },
    Update {
        table: String,
        assignments: Vec<(String, Expr)>,
        filter: Option<Condition>,
    },
    Delete {
        table: String,
        filter: Option<Condition>,
    },
}

#[derive(Debug, PartialEq)]
pub(super) struct ColumnDef {
    pub name: String,
    pub type_code: TypeCode,
    pub precision: Option<TimePrecision>,
    pub primary_key: bool,
    pub not_null: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) enum Expr {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Str(String),
    Timestamp(Timestamp, TimePrecision),
    // zero-based position of the placeholder
    Param(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, PartialEq)]
pub(super) enum Condition {
    Compare {
        column: String,
        op: CompareOp,
        value: Expr,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

/// A parsed statement, together with the number of its placeholders.
#[derive(Debug)]
pub(super) struct Parsed {
    pub statement: Statement,
    pub param_count: usize,
}

const SUPPORTED_STATEMENTS: [&str; 6] = ["CREATE", "DROP", "INSERT", "SELECT", "UPDATE", "DELETE"];

/// Parses a single SQL statement with the generic dialect of `sqlparser`
/// and reduces it to the statement forms the loopback store can execute.
pub(super) fn parse(sql: &str) -> Result<Parsed, DriverError> {
    let dialect = GenericDialect {};
    check_statement_type(&dialect, sql)?;

    let mut statements =
        SqlParser::parse_sql(&dialect, sql).map_err(|e| syntax_error(&e.to_string()))?;
    if statements.len() != 1 {
        return Err(syntax_error(&format!(
            "expected exactly one statement, found {}",
            statements.len()
        )));
    }

    let mut reducer = Reducer { param_count: 0 };
    let statement = reducer.statement(statements.remove(0))?;
    Ok(Parsed {
        statement,
        param_count: reducer.param_count,
    })
}

pub(super) fn syntax_error(detail: &str) -> DriverError {
    DriverError::new(
        DriverError::ILLEGAL_PARAMETER,
        format!("SQL syntax error: {detail}"),
    )
}

fn not_supported(detail: &str) -> DriverError {
    DriverError::new(
        DriverError::NOT_SUPPORTED,
        format!("{detail} is not supported"),
    )
}

// Statements that sqlparser knows but the store cannot run are rejected by their
// leading keyword, so that they fail with NOT_SUPPORTED rather than a syntax error.
fn check_statement_type(dialect: &GenericDialect, sql: &str) -> Result<(), DriverError> {
    let tokens = Tokenizer::new(dialect, sql)
        .tokenize()
        .map_err(|e| syntax_error(&e.to_string()))?;
    let first_word = tokens.into_iter().find_map(|token| match token {
        Token::Word(w) => Some(w.value.to_ascii_uppercase()),
        _ => None,
    });
    match first_word {
        Some(word) if !SUPPORTED_STATEMENTS.contains(&word.as_str()) => {
            Err(not_supported(&format!("statement type {word}")))
        }
        _ => Ok(()),
    }
}

// Walks the AST in source order, so placeholders are numbered as they appear.
struct Reducer {
    param_count: usize,
}

impl Reducer {
    fn statement(&mut self, statement: sql_ast::Statement) -> Result<Statement, DriverError> {
        match statement {
            sql_ast::Statement::CreateTable {
                name,
                columns,
                constraints,
                if_not_exists,
                ..
            } => {
                if !constraints.is_empty() {
                    return Err(not_supported("table constraint"));
                }
                Ok(Statement::CreateTable {
                    table: object_name(&name)?,
                    if_not_exists,
                    columns: columns
                        .into_iter()
                        .map(column_def)
                        .collect::<Result<_, _>>()?,
                })
            }
            sql_ast::Statement::Drop {
                object_type: sql_ast::ObjectType::Table,
                if_exists,
                names,
                ..
            } => {
                let [name] = names.as_slice() else {
                    return Err(not_supported("dropping several tables at once"));
                };
                Ok(Statement::DropTable {
                    table: object_name(name)?,
                    if_exists,
                })
            }
            sql_ast::Statement::Drop { object_type, .. } => {
                Err(not_supported(&format!("DROP {object_type}")))
            }
            sql_ast::Statement::Insert {
                table_name,
                columns,
                source,
                ..
            } => self.insert(&table_name, columns, source),
            sql_ast::Statement::Query(query) => self.select(*query),
            sql_ast::Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => {
                let table = table_name(&table)?;
                let assignments = assignments
                    .into_iter()
                    .map(|assignment| {
                        let [column] = assignment.id.as_slice() else {
                            return Err(not_supported("qualified assignment target"));
                        };
                        Ok((column.value.clone(), self.value(assignment.value)?))
                    })
                    .collect::<Result<_, DriverError>>()?;
                let filter = selection.map(|e| self.condition(e)).transpose()?;
                Ok(Statement::Update {
                    table,
                    assignments,
                    filter,
                })
            }
            sql_ast::Statement::Delete {
                from, selection, ..
            } => {
                let [from] = from.as_slice() else {
                    return Err(syntax_error("DELETE needs exactly one table"));
                };
                let table = table_name(from)?;
                let filter = selection.map(|e| self.condition(e)).transpose()?;
                Ok(Statement::Delete { table, filter })
            }
            other => Err(not_supported(&format!("statement {other}"))),
        }
    }

    fn insert(
        &mut self,
        table_name: &sql_ast::ObjectName,
        columns: Vec<sql_ast::Ident>,
        source: Option<Box<sql_ast::Query>>,
    ) -> Result<Statement, DriverError> {
        let table = object_name(table_name)?;
        let columns = if columns.is_empty() {
            None
        } else {
            Some(columns.into_iter().map(|ident| ident.value).collect())
        };
        let source = source.ok_or_else(|| syntax_error("INSERT needs a VALUES clause"))?;
        let sql_ast::SetExpr::Values(values) = *source.body else {
            return Err(not_supported("INSERT from a query"));
        };
        let rows = values
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|e| self.value(e))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;
        Ok(Statement::Insert {
            table,
            columns,
            rows,
        })
    }

    fn select(&mut self, query: sql_ast::Query) -> Result<Statement, DriverError> {
        if query.with.is_some() || query.limit.is_some() || query.offset.is_some() {
            return Err(not_supported("WITH, LIMIT, or OFFSET"));
        }
        let sql_ast::SetExpr::Select(select) = *query.body else {
            return Err(not_supported("compound query"));
        };
        if select.distinct.is_some() || select.having.is_some() {
            return Err(not_supported("DISTINCT or HAVING"));
        }
        match select.group_by {
            sql_ast::GroupByExpr::Expressions(ref exprs) if exprs.is_empty() => {}
            _ => return Err(not_supported("GROUP BY")),
        }

        let [from] = select.from.as_slice() else {
            return Err(syntax_error("SELECT needs exactly one table"));
        };
        let table = table_name(from)?;

        let projection = if let [sql_ast::SelectItem::Wildcard(_)] = select.projection.as_slice()
        {
            None
        } else {
            Some(
                select
                    .projection
                    .into_iter()
                    .map(|item| match item {
                        sql_ast::SelectItem::UnnamedExpr(expr) => column_name(expr),
                        other => Err(not_supported(&format!("select item {other}"))),
                    })
                    .collect::<Result<_, _>>()?,
            )
        };

        let filter = select.selection.map(|e| self.condition(e)).transpose()?;

        let mut order_by = query.order_by.into_iter();
        let order_by = match (order_by.next(), order_by.next()) {
            (None, _) => None,
            (Some(order), None) => Some((column_name(order.expr)?, order.asc == Some(false))),
            (Some(_), Some(_)) => return Err(not_supported("ordering by several columns")),
        };

        Ok(Statement::Select {
            table,
            projection,
            filter,
            order_by,
        })
    }

    fn condition(&mut self, expr: sql_ast::Expr) -> Result<Condition, DriverError> {
        match expr {
            sql_ast::Expr::Nested(inner) => self.condition(*inner),
            sql_ast::Expr::IsNull(inner) => Ok(Condition::IsNull {
                column: column_name(*inner)?,
                negated: false,
            }),
            sql_ast::Expr::IsNotNull(inner) => Ok(Condition::IsNull {
                column: column_name(*inner)?,
                negated: true,
            }),
            sql_ast::Expr::BinaryOp { left, op, right } => {
                let op = match op {
                    sql_ast::BinaryOperator::And => {
                        let left = self.condition(*left)?;
                        let right = self.condition(*right)?;
                        return Ok(Condition::And(Box::new(left), Box::new(right)));
                    }
                    sql_ast::BinaryOperator::Or => {
                        let left = self.condition(*left)?;
                        let right = self.condition(*right)?;
                        return Ok(Condition::Or(Box::new(left), Box::new(right)));
                    }
                    sql_ast::BinaryOperator::Eq => CompareOp::Eq,
                    sql_ast::BinaryOperator::NotEq => CompareOp::Ne,
                    sql_ast::BinaryOperator::Lt => CompareOp::Lt,
                    sql_ast::BinaryOperator::LtEq => CompareOp::Le,
                    sql_ast::BinaryOperator::Gt => CompareOp::Gt,
                    sql_ast::BinaryOperator::GtEq => CompareOp::Ge,
                    other => return Err(syntax_error(&format!("unsupported operator {other}"))),
                };
                Ok(Condition::Compare {
                    column: column_name(*left)?,
                    op,
                    value: self.value(*right)?,
                })
            }
            other => Err(syntax_error(&format!("unsupported condition {other}"))),
        }
    }

    fn value(&mut self, expr: sql_ast::Expr) -> Result<Expr, DriverError> {
        match expr {
            sql_ast::Expr::Nested(inner) => self.value(*inner),
            sql_ast::Expr::Value(value) => self.literal(value),
            sql_ast::Expr::UnaryOp {
                op: sql_ast::UnaryOperator::Minus,
                expr,
            } => match *expr {
                sql_ast::Expr::Value(sql_ast::Value::Number(n, _)) => number(&format!("-{n}")),
                other => Err(syntax_error(&format!("expected a number, found {other}"))),
            },
            sql_ast::Expr::Function(function) => timestamp_literal(function),
            other => Err(syntax_error(&format!("unexpected {other} in value position"))),
        }
    }

    fn literal(&mut self, value: sql_ast::Value) -> Result<Expr, DriverError> {
        match value {
            sql_ast::Value::Null => Ok(Expr::Null),
            sql_ast::Value::Boolean(b) => Ok(Expr::Bool(b)),
            sql_ast::Value::Number(n, _) => number(&n),
            sql_ast::Value::SingleQuotedString(s) => Ok(Expr::Str(s)),
            sql_ast::Value::Placeholder(p) if p == "?" => {
                self.param_count += 1;
                Ok(Expr::Param(self.param_count - 1))
            }
            other => Err(syntax_error(&format!("unsupported literal {other}"))),
        }
    }
}

fn column_def(column: sql_ast::ColumnDef) -> Result<ColumnDef, DriverError> {
    // the display form is stable across sqlparser's variants for custom type names
    let type_text = column.data_type.to_string().to_ascii_uppercase();
    let (type_name, type_args) = match type_text.split_once('(') {
        Some((name, args)) => (name.trim(), Some(args.trim_end_matches(')').trim())),
        None => (type_text.trim(), None),
    };
    let type_code = TypeCode::from_name(type_name)
        .ok_or_else(|| syntax_error(&format!("unknown column type {type_text}")))?;

    let precision = if type_code == TypeCode::TIMESTAMP {
        match type_args {
            Some(digits) => Some(
                digits
                    .parse::<u32>()
                    .ok()
                    .and_then(TimePrecision::from_digits)
                    .ok_or_else(|| syntax_error("timestamp precision must be 3, 6, or 9"))?,
            ),
            None => Some(TimePrecision::Milli),
        }
    } else {
        None
    };

    let mut primary_key = false;
    let mut not_null = false;
    for option in column.options {
        match option.option {
            sql_ast::ColumnOption::Null => {}
            sql_ast::ColumnOption::NotNull => not_null = true,
            sql_ast::ColumnOption::Unique {
                is_primary: true, ..
            } => {
                primary_key = true;
                not_null = true;
            }
            other => return Err(not_supported(&format!("column option {other}"))),
        }
    }
    Ok(ColumnDef {
        name: column.name.value,
        type_code,
        precision,
        primary_key,
        not_null,
    })
}

fn object_name(name: &sql_ast::ObjectName) -> Result<String, DriverError> {
    match name.0.as_slice() {
        [ident] => Ok(ident.value.clone()),
        _ => Err(not_supported(&format!("qualified name {name}"))),
    }
}

fn table_name(table: &sql_ast::TableWithJoins) -> Result<String, DriverError> {
    if !table.joins.is_empty() {
        return Err(not_supported("JOIN"));
    }
    match &table.relation {
        sql_ast::TableFactor::Table {
            name, alias: None, ..
        } => object_name(name),
        sql_ast::TableFactor::Table {
            alias: Some(alias), ..
        } => Err(syntax_error(&format!("unexpected '{alias}' after table name"))),
        other => Err(not_supported(&format!("table reference {other}"))),
    }
}

fn column_name(expr: sql_ast::Expr) -> Result<String, DriverError> {
    match expr {
        sql_ast::Expr::Identifier(ident) => Ok(ident.value),
        other => Err(syntax_error(&format!("expected a column name, found {other}"))),
    }
}

fn timestamp_literal(function: sql_ast::Function) -> Result<Expr, DriverError> {
    let name = function.name.to_string().to_ascii_uppercase();
    let precision = match name.as_str() {
        "TIMESTAMP" | "TIMESTAMP_MS" => TimePrecision::Milli,
        "TIMESTAMP_US" => TimePrecision::Micro,
        "TIMESTAMP_NS" => TimePrecision::Nano,
        _ => return Err(not_supported(&format!("function {name}"))),
    };
    let text = match function.args.as_slice() {
        [sql_ast::FunctionArg::Unnamed(sql_ast::FunctionArgExpr::Expr(sql_ast::Expr::Value(
            sql_ast::Value::SingleQuotedString(s),
        )))] => s.clone(),
        _ => {
            return Err(syntax_error(&format!(
                "{name} expects a single timestamp text"
            )))
        }
    };
    let ts = Timestamp::parse_rfc3339(&text)
        .or_else(|_| Timestamp::parse_rfc3339(&text.replacen(' ', "T", 1)))
        .map_err(|e| {
            DriverError::new(
                DriverError::ILLEGAL_PARAMETER,
                format!("invalid timestamp '{text}': {e}"),
            )
        })?;
    Ok(Expr::Timestamp(ts.truncate(precision), precision))
}

fn number(text: &str) -> Result<Expr, DriverError> {
    if let Ok(i) = text.parse::<i64>() {
        Ok(Expr::Integer(i))
    } else {
        text.parse::<f64>()
            .map(Expr::Decimal)
            .map_err(|_| syntax_error(&format!("invalid number {text}")))
    }
}
