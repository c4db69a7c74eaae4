
use flexi_logger::LoggerHandle;
use gsconnect::{driver::DriverError, params, Connection, GsError, GsResult};
use log::info;

const CLUSTER: &str = "test_040";

// cargo test --test test_040_unsupported -- --nocapture
#[test]
fn test_040_unsupported() -> GsResult<()> {
    let mut log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let connection = test_utils::get_authenticated_connection(CLUSTER)?;
    test_utils::create_sample_table(&connection)?;

    cursor_features(&mut log_handle, &connection)?;
    transactions(&mut log_handle, &connection)?;
    unsupported_statements(&mut log_handle, &connection)?;

    test_utils::closing_info(connection, start)
}

fn cursor_features(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("stored procedures, row ids, and multiple result sets are not available");
    let mut cursor = connection.query("SELECT * FROM Sample")?;
    assert!(matches!(
        cursor.call_proc("my_proc", &params![1]).unwrap_err(),
        GsError::Unsupported(_)
    ));
    assert!(matches!(
        cursor.last_row_id().unwrap_err(),
        GsError::Unsupported(_)
    ));
    assert!(!cursor.next_set()?);

    // the result set is still intact
    assert_eq!(5, cursor.fetch_all()?.len());
    Ok(())
}

fn transactions(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("every statement is committed immediately");
    connection.set_autocommit(false)?;
    connection.dml("DELETE FROM Sample WHERE id = 4")?;
    let err = connection.rollback().unwrap_err();
    info!("{err}");
    assert!(matches!(err, GsError::Unsupported(_)));
    assert!(matches!(connection.commit().unwrap_err(), GsError::Unsupported(_)));

    // the delete was not undone
    let other = test_utils::get_authenticated_connection(CLUSTER)?;
    assert_eq!(4, other.query("SELECT * FROM Sample")?.fetch_all()?.len());
    other.close()
}

fn unsupported_statements(
    _log_handle: &mut LoggerHandle,
    connection: &Connection,
) -> GsResult<()> {
    info!("statements the driver does not know");
    for sql in ["CALL my_proc()", "GRANT ALL ON Sample TO meier"] {
        let err = connection.exec(sql).unwrap_err();
        info!("{}", err.display_with_inner());
        assert_eq!(
            Some(DriverError::NOT_SUPPORTED),
            err.driver_error().map(DriverError::code)
        );
    }

    // syntax errors are reported as illegal parameters
    let err = connection.exec("SELECT FROM WHERE").unwrap_err();
    assert_eq!(
        Some(DriverError::ILLEGAL_PARAMETER),
        err.driver_error().map(DriverError::code)
    );
    assert!(matches!(err, GsError::DbError { .. }));
    Ok(())
}
