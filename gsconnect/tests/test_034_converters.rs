
use flexi_logger::LoggerHandle;
use gsconnect::{
    driver::{DriverType, DriverValue},
    params, Adapter, Connection, Converter, GsError, GsResult, GsValue, HostType,
};
use log::info;

const CLUSTER: &str = "test_034";

// cargo test --test test_034_converters -- --nocapture
#[test]
fn test_034_converters() -> GsResult<()> {
    let mut log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let connection = test_utils::get_authenticated_connection(CLUSTER)?;
    test_utils::create_sample_table(&connection)?;

    raw_converter(&mut log_handle, &connection)?;
    custom_converter(&mut log_handle, &connection)?;
    removed_converter(&mut log_handle, &connection)?;
    custom_adapter(&mut log_handle, &connection)?;
    removed_adapter(&mut log_handle, &connection)?;
    per_connection(&mut log_handle, &connection)?;
    reentrant_converter(&mut log_handle)?;

    test_utils::closing_info(connection, start)
}

fn raw_converter(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("the raw converter hands out the driver values");
    let previous = connection.set_converter(DriverType::Integer, Converter::raw())?;
    assert!(previous.is_some());

    let row = connection.query_single_row("SELECT * FROM Sample WHERE id = 1")?;
    assert_eq!(GsValue::DRIVER(DriverValue::Integer(1)), row[0]);
    assert_eq!(GsValue::STRING("test1".to_string()), row[1]);

    // deserialization does not care
    let id: i32 = connection
        .query("SELECT id FROM Sample WHERE id = 1")?
        .try_into()?;
    assert_eq!(1, id);

    connection.reset_converters()?;
    let row = connection.query_single_row("SELECT * FROM Sample WHERE id = 1")?;
    assert_eq!(GsValue::INTEGER(1), row[0]);
    Ok(())
}

fn custom_converter(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("a custom converter for STRING values");
    connection.set_converter(
        DriverType::String,
        Converter::new(|dv| match dv {
            DriverValue::String(s) => Ok(GsValue::STRING(s.to_uppercase())),
            other => Converter::standard().convert(other),
        }),
    )?;
    let values: Vec<String> = connection
        .query("SELECT value FROM Sample WHERE id < 2 ORDER BY id")?
        .try_into()?;
    assert_eq!(vec!["TEST0", "TEST1"], values);

    // a failing converter makes the fetch fail
    connection.set_converter(
        DriverType::String,
        Converter::new(|_| Err(GsError::Conversion("no strings today".to_string()))),
    )?;
    let err = connection
        .query("SELECT value FROM Sample WHERE id = 0")?
        .fetch_one()
        .unwrap_err();
    info!("{err}");
    assert!(matches!(err, GsError::Conversion(_)));

    // the converters apply only to fetched values, not to conditions
    connection.reset_converters()?;
    let n = connection
        .query("SELECT * FROM Sample WHERE value = 'test3'")?
        .fetch_all()?
        .len();
    assert_eq!(1, n);
    Ok(())
}

fn removed_converter(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("without converter, values stay unconverted");
    let removed = connection.remove_converter(DriverType::String)?;
    assert!(removed.is_some());
    assert!(connection.remove_converter(DriverType::String)?.is_none());

    let row = connection.query_single_row("SELECT * FROM Sample WHERE id = 2")?;
    assert_eq!(GsValue::INTEGER(2), row[0]);
    assert_eq!(
        GsValue::DRIVER(DriverValue::String("test2".to_string())),
        row[1]
    );

    // NULL values never need a converter
    connection.multiple_statements_ignore_err(vec!["DROP TABLE Notes"]);
    connection.exec("CREATE TABLE Notes (id INTEGER PRIMARY KEY, note STRING)")?;
    connection.dml("INSERT INTO Notes VALUES (1, NULL)")?;
    let row = connection.query_single_row("SELECT note FROM Notes")?;
    assert_eq!(GsValue::NULL, row[0]);

    connection.reset_converters()?;
    let row = connection.query_single_row("SELECT * FROM Sample WHERE id = 2")?;
    assert_eq!(GsValue::STRING("test2".to_string()), row[1]);
    Ok(())
}

fn custom_adapter(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("a custom adapter for BOOL parameters");
    connection.multiple_statements_ignore_err(vec!["DROP TABLE Flags"]);
    connection.exec("CREATE TABLE Flags (id INTEGER PRIMARY KEY, flag INTEGER)")?;

    // bools are stored as 0 or 1
    connection.set_adapter(
        HostType::Bool,
        Adapter::new(|value| match value {
            GsValue::BOOL(b) => Ok(DriverValue::Integer(i32::from(b))),
            other => Err(GsError::Conversion(format!("unexpected value {other}"))),
        }),
    )?;
    let mut cursor = connection.cursor()?;
    cursor.execute_many(
        "INSERT INTO Flags VALUES (?, ?)",
        vec![params![1, true], params![2, false]],
    )?;
    assert_eq!(2, cursor.row_count());

    let flags: Vec<(i32, i32)> = connection
        .query("SELECT * FROM Flags ORDER BY id")?
        .try_into()?;
    assert_eq!(vec![(1, 1), (2, 0)], flags);

    // without the adapter, the driver rejects a bool for an INTEGER column
    connection.reset_adapters()?;
    let err = cursor
        .execute("INSERT INTO Flags VALUES (?, ?)", &params![3, true])
        .unwrap_err();
    assert!(matches!(err, GsError::DbError { .. }));
    Ok(())
}

fn removed_adapter(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("binding values without adapter fails");
    let removed = connection.remove_adapter(HostType::String)?;
    assert!(removed.is_some());

    let mut cursor = connection.cursor()?;
    let err = cursor
        .execute("INSERT INTO Sample VALUES (?, ?)", &params![5, "test5"])
        .unwrap_err();
    info!("{err}");
    assert!(matches!(err, GsError::Conversion(_)));

    // other types, NULL, and unconverted driver values still work
    cursor.execute(
        "INSERT INTO Sample VALUES (?, ?)",
        &[
            GsValue::INTEGER(5),
            GsValue::DRIVER(DriverValue::String("test5".to_string())),
        ],
    )?;
    cursor.execute("SELECT * FROM Sample WHERE id = ?", &params![5])?;
    assert_eq!(1, cursor.fetch_all()?.len());

    connection.reset_adapters()?;
    cursor.execute("DELETE FROM Sample WHERE value = ?", &params!["test5"])?;
    assert_eq!(1, cursor.row_count());
    Ok(())
}

fn per_connection(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("each connection has its own registries");
    let other = test_utils::get_authenticated_connection(CLUSTER)?;
    other.set_converter(DriverType::Integer, Converter::raw())?;

    let row = connection.query_single_row("SELECT id FROM Sample WHERE id = 0")?;
    assert_eq!(GsValue::INTEGER(0), row[0]);
    let row = other.query_single_row("SELECT id FROM Sample WHERE id = 0")?;
    assert_eq!(GsValue::DRIVER(DriverValue::Integer(0)), row[0]);

    // clones share them
    let clone = other.clone();
    let row = clone.query_single_row("SELECT id FROM Sample WHERE id = 0")?;
    assert!(matches!(row[0], GsValue::DRIVER(_)));
    other.close()
}

fn reentrant_converter(_log_handle: &mut LoggerHandle) -> GsResult<()> {
    info!("converters and adapters may use their own connection");
    let connection = test_utils::get_authenticated_connection(CLUSTER)?;
    let inner = connection.clone();
    connection.set_converter(
        DriverType::String,
        Converter::new(move |dv| {
            inner.set_converter(DriverType::Integer, Converter::raw())?;
            Converter::standard().convert(dv)
        }),
    )?;
    let row = connection.query_single_row("SELECT * FROM Sample WHERE id = 1")?;
    assert_eq!(GsValue::STRING("test1".to_string()), row[1]);
    let row = connection.query_single_row("SELECT id FROM Sample WHERE id = 1")?;
    assert_eq!(GsValue::DRIVER(DriverValue::Integer(1)), row[0]);

    let inner = connection.clone();
    connection.set_adapter(
        HostType::Long,
        Adapter::new(move |value| {
            inner.reset_converters()?;
            Adapter::standard().adapt(value)
        }),
    )?;
    let mut cursor = connection.cursor()?;
    cursor.execute("SELECT id FROM Sample WHERE id = ?", &[GsValue::LONG(1)])?;
    let row = cursor.fetch_one()?.unwrap();
    assert_eq!(GsValue::INTEGER(1), row[0]);
    connection.close()
}
