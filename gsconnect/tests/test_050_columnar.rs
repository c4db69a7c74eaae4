
use flexi_logger::LoggerHandle;
use gsconnect::{
    arrow::{
        array::{Array, BooleanArray, Float64Array, Int32Array, StringArray, TimestampNanosecondArray},
        datatypes::{DataType, TimeUnit},
    },
    driver::DriverType,
    Connection, ConnectionConfiguration, Converter, GsError, GsResult,
};
use log::{debug, info};

const CLUSTER: &str = "test_050";

// cargo test --test test_050_columnar -- --nocapture
#[test]
fn test_050_columnar() -> GsResult<()> {
    let mut log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let connection = test_utils::get_authenticated_connection(CLUSTER)?;

    prepare(&mut log_handle, &connection)?;
    batch_sizes(&mut log_handle, &connection)?;
    column_access(&mut log_handle, &connection)?;
    converters_are_bypassed(&mut log_handle, &connection)?;
    configured_batch_size(&mut log_handle)?;
    columnar_errors(&mut log_handle, &connection)?;

    test_utils::closing_info(connection, start)
}

fn prepare(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("create a table with 25 rows");
    connection.multiple_statements_ignore_err(vec!["DROP TABLE Measures"]);
    connection.exec(
        "CREATE TABLE Measures (id INTEGER PRIMARY KEY, sensor STRING, value DOUBLE, \
         ok BOOL, ts TIMESTAMP)",
    )?;
    let rows: Vec<_> = (0..25_i32)
        .map(|i| {
            let value = if i % 5 == 0 {
                None
            } else {
                Some(f64::from(i) / 2.0)
            };
            gsconnect::params![
                i,
                format!("sensor{}", i % 3),
                value,
                i % 2 == 0,
                gsconnect::timestamp_from_epoch_seconds(1_716_033_600.0 + f64::from(i)).unwrap()
            ]
        })
        .collect();
    connection
        .cursor()?
        .execute_many("INSERT INTO Measures VALUES (?, ?, ?, ?, ?)", &rows)?;
    Ok(())
}

fn batch_sizes(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("batches hold at most the target size");
    for (target, expected) in [
        (1, vec![1; 25]),
        (10, vec![10, 10, 5]),
        (25, vec![25]),
        (100, vec![25]),
    ] {
        let mut cursor = connection.query("SELECT * FROM Measures ORDER BY id")?;
        let sizes = cursor
            .columnar_batches(Some(target))?
            .map(|batch| batch.map(|b| b.num_rows()))
            .collect::<GsResult<Vec<usize>>>()?;
        assert_eq!(expected, sizes);
        // the result set is drained
        assert!(cursor.fetch_all()?.is_empty());
    }

    // only the rows that were not fetched yet
    let mut cursor = connection.query("SELECT * FROM Measures ORDER BY id")?;
    cursor.fetch_many(Some(20))?;
    let batches = cursor
        .columnar_batches(Some(10))?
        .collect::<GsResult<Vec<_>>>()?;
    assert_eq!(1, batches.len());
    let ids = batches[0]
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(20, ids.value(0));

    // an empty result set yields no batch
    let mut cursor = connection.query("SELECT * FROM Measures WHERE id < 0")?;
    assert_eq!(0, cursor.columnar_batches(None)?.count());
    Ok(())
}

fn column_access(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("access the columns of a batch");
    let mut cursor = connection.query("SELECT * FROM Measures WHERE id < 10 ORDER BY id")?;
    let mut batches = cursor.columnar_batches(None)?;
    let schema = batches.schema();
    let batch = batches.next().transpose()?.unwrap();
    debug!("{batch:?}");
    assert_eq!(schema, batch.schema());
    assert_eq!(10, batch.num_rows());
    assert_eq!(5, batch.num_columns());
    assert_eq!("sensor", schema.field(1).name());
    assert_eq!(&DataType::Utf8, schema.field(1).data_type());
    assert!(!schema.field(0).is_nullable());

    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(
        (0..10).map(Some).collect::<Vec<_>>(),
        ids.iter().collect::<Vec<_>>()
    );

    let values = batch
        .column_by_name("value")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(10, values.len());
    assert_eq!(2, values.null_count());
    assert!(values.is_null(0));
    assert!(values.is_null(5));
    assert_eq!(0.5, values.value(1));

    let sensors = batch
        .column_by_name("sensor")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!("sensor2", sensors.value(2));
    assert_eq!(0, sensors.null_count());

    let flags = batch
        .column_by_name("ok")
        .unwrap()
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    assert_eq!(5, flags.true_count());

    assert_eq!(
        &DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into())),
        schema.field(4).data_type()
    );
    let ts = batch
        .column_by_name("ts")
        .unwrap()
        .as_any()
        .downcast_ref::<TimestampNanosecondArray>()
        .unwrap();
    assert_eq!(1_716_033_609_000_000_000, ts.value(9));
    assert!(batch.column_by_name("nope").is_none());
    Ok(())
}

fn converters_are_bypassed(
    _log_handle: &mut LoggerHandle,
    connection: &Connection,
) -> GsResult<()> {
    info!("columnar export does not apply converters");
    connection.set_converter(DriverType::Integer, Converter::raw())?;
    connection.remove_converter(DriverType::String)?;

    let mut cursor = connection.query("SELECT id, sensor FROM Measures WHERE id = 4")?;
    let batch = cursor
        .columnar_batches(Some(5))?
        .next()
        .transpose()?
        .unwrap();
    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(vec![Some(4)], ids.iter().collect::<Vec<_>>());
    let sensors = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!("sensor1", sensors.value(0));
    connection.reset_converters()
}

fn configured_batch_size(_log_handle: &mut LoggerHandle) -> GsResult<()> {
    info!("the default target size comes from the configuration");
    let config = ConnectionConfiguration::default().with_columnar_batch_size(7);
    let connection = test_utils::get_authenticated_connection_with_configuration(CLUSTER, &config)?;
    assert_eq!(7, connection.columnar_batch_size()?);

    let mut cursor = connection.query("SELECT * FROM Measures")?;
    let sizes: Vec<usize> = cursor
        .columnar_batches(None)?
        .map(|batch| batch.map(|b| b.num_rows()))
        .collect::<GsResult<_>>()?;
    assert_eq!(vec![7, 7, 7, 4], sizes);

    connection.set_columnar_batch_size(12)?;
    let mut cursor = connection.query("SELECT * FROM Measures")?;
    let sizes: Vec<usize> = cursor
        .columnar_batches(None)?
        .map(|batch| batch.map(|b| b.num_rows()))
        .collect::<GsResult<_>>()?;
    assert_eq!(vec![12, 12, 1], sizes);

    assert!(matches!(
        connection.set_columnar_batch_size(0).unwrap_err(),
        GsError::Usage(_)
    ));
    assert_eq!(12, connection.columnar_batch_size()?);

    // fetched rows are counted
    connection.reset_statistics()?;
    let mut cursor = connection.query("SELECT * FROM Measures")?;
    assert_eq!(3, cursor.columnar_batches(None)?.count());
    assert_eq!(25, connection.statistics()?.fetched_rows());
    connection.close()
}

fn columnar_errors(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("columnar export needs a result set and a positive target size");
    let mut cursor = connection.query("SELECT * FROM Measures")?;
    assert!(matches!(
        cursor.columnar_batches(Some(0)).unwrap_err(),
        GsError::Usage(_)
    ));

    let mut cursor = connection.cursor()?;
    assert!(matches!(
        cursor.columnar_batches(None).unwrap_err(),
        GsError::NoResultSet
    ));
    cursor.execute("DELETE FROM Measures WHERE id > 99", &[])?;
    assert!(matches!(
        cursor.columnar_batches(None).unwrap_err(),
        GsError::NoResultSet
    ));

    cursor.close()?;
    assert!(matches!(
        cursor.columnar_batches(None).unwrap_err(),
        GsError::ClosedResource(_)
    ));
    Ok(())
}
