extern crate serde;


use flexi_logger::LoggerHandle;
use gsconnect::{params, Connection, GsError, GsResult, GsValue, Row};
use log::{debug, info};
use serde::Deserialize;

const CLUSTER: &str = "test_020";

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    id: i32,
    value: String,
}

// cargo test --test test_020_deser -- --nocapture
#[test]
fn test_020_deser() -> GsResult<()> {
    let mut log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let connection = test_utils::get_authenticated_connection(CLUSTER)?;
    test_utils::create_sample_table(&connection)?;

    deser_result_sets(&mut log_handle, &connection)?;
    deser_rows(&mut log_handle, &connection)?;
    deser_values(&mut log_handle, &connection)?;
    deser_nulls_and_numbers(&mut log_handle, &connection)?;
    deser_errors(&mut log_handle, &connection)?;

    test_utils::closing_info(connection, start)
}

fn deser_result_sets(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("deserialize complete result sets");
    let all: Vec<Sample> = connection
        .query("SELECT * FROM Sample ORDER BY id")?
        .try_into()?;
    assert_eq!(5, all.len());
    assert_eq!(
        Sample {
            id: 3,
            value: "test3".to_string()
        },
        all[3]
    );

    let tuples: Vec<(i64, String)> = connection
        .query("SELECT id, value FROM Sample ORDER BY id DESC")?
        .try_into()?;
    assert_eq!((4, "test4".to_string()), tuples[0]);

    let one: Sample = connection
        .query("SELECT * FROM Sample WHERE id = 1")?
        .try_into()?;
    assert_eq!("test1", one.value);

    let ids: Vec<u8> = connection.query("SELECT id FROM Sample ORDER BY id")?.try_into()?;
    assert_eq!(vec![0, 1, 2, 3, 4], ids);

    let id: u32 = connection
        .query("SELECT id FROM Sample WHERE value = 'test2'")?
        .try_into()?;
    assert_eq!(2, id);

    let maybe: Option<String> = connection
        .query("SELECT value FROM Sample WHERE id = 2")?
        .try_into()?;
    assert_eq!(Some("test2".to_string()), maybe);

    let empty: Vec<Sample> = connection
        .query("SELECT * FROM Sample WHERE id > 100")?
        .try_into()?;
    assert!(empty.is_empty());

    // only the remaining rows are deserialized
    let mut cursor = connection.query("SELECT * FROM Sample ORDER BY id")?;
    cursor.fetch_many(Some(3))?;
    let rest: Vec<Sample> = cursor.try_into()?;
    assert_eq!(vec![3, 4], rest.iter().map(|s| s.id).collect::<Vec<_>>());
    Ok(())
}

fn deser_rows(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("deserialize single rows");
    let mut cursor = connection.cursor()?;
    cursor.execute("SELECT * FROM Sample WHERE id > ? ORDER BY id", &params![2])?;
    for row in &mut cursor {
        let row: Row = row?;
        debug!("{row}");
        assert_eq!(2, row.len());
        assert_eq!("id", row.metadata()[0].name());
        let sample: Sample = row.try_into()?;
        assert!(sample.id > 2);
    }

    let row = connection.query_single_row("SELECT * FROM Sample WHERE id = 4")?;
    assert_eq!(GsValue::INTEGER(4), row[0]);
    let pair: Pair = row.try_into()?;
    assert_eq!(Pair(4, "test4".to_string()), pair);

    let mut row = connection.query_single_row("SELECT * FROM Sample WHERE id = 4")?;
    let id: i16 = row.next_try_into()?;
    let value: String = row.next_try_into()?;
    assert_eq!((4, "test4"), (id, value.as_str()));
    assert!(row.is_empty());

    let single = connection
        .query_single_row("SELECT value FROM Sample WHERE id = 0")?
        .into_single_value()?;
    assert_eq!(GsValue::STRING("test0".to_string()), single);
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Pair(u16, String);

fn deser_values(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("deserialize single values");
    let mut row = connection.query_single_row("SELECT id, value FROM Sample WHERE id = 3")?;
    let id: i64 = row.next_value().unwrap_or(GsValue::NULL).try_into()?;
    let value: Option<String> = row.next_value().unwrap_or(GsValue::NULL).try_into()?;
    assert_eq!(3, id);
    assert_eq!(Some("test3".to_string()), value);

    let rows: Vec<(i32, String)> = connection
        .query("SELECT * FROM Sample WHERE id < 2 ORDER BY id")?
        .try_into()?;
    let json = serde_json::to_string(&rows).unwrap();
    debug!("as json: {json}");
    assert_eq!(r#"[[0,"test0"],[1,"test1"]]"#, json);
    Ok(())
}

fn deser_nulls_and_numbers(
    _log_handle: &mut LoggerHandle,
    connection: &Connection,
) -> GsResult<()> {
    info!("NULL values and numeric conversions");
    connection.multiple_statements_ignore_err(vec!["DROP TABLE Numbers"]);
    connection.exec(
        "CREATE TABLE Numbers (id INTEGER PRIMARY KEY, b BYTE, s SHORT, l LONG, \
         f FLOAT, d DOUBLE, flag BOOL, note STRING)",
    )?;
    let mut cursor = connection.cursor()?;
    cursor.execute(
        "INSERT INTO Numbers VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        &params![1, 7_i8, 300_i16, 5_000_000_000_i64, 1.5_f32, 2.25_f64, true, "n"],
    )?;
    cursor.execute(
        "INSERT INTO Numbers VALUES (2, NULL, NULL, NULL, NULL, NULL, NULL, NULL)",
        &[],
    )?;

    #[derive(Debug, Deserialize)]
    struct Numbers {
        id: u64,
        b: Option<i64>,
        s: Option<i32>,
        l: Option<i64>,
        f: Option<f64>,
        d: Option<f64>,
        flag: Option<bool>,
        note: Option<String>,
    }
    let numbers: Vec<Numbers> = connection
        .query("SELECT * FROM Numbers ORDER BY id")?
        .try_into()?;
    debug!("{numbers:?}");
    assert_eq!(2, numbers.len());
    assert_eq!(1, numbers[0].id);
    assert_eq!(Some(7), numbers[0].b);
    assert_eq!(Some(300), numbers[0].s);
    assert_eq!(Some(5_000_000_000), numbers[0].l);
    assert_eq!(Some(1.5), numbers[0].f);
    assert_eq!(Some(2.25), numbers[0].d);
    assert_eq!(Some(true), numbers[0].flag);
    assert_eq!(Some("n".to_string()), numbers[0].note);
    assert!(numbers[1].b.is_none() && numbers[1].note.is_none() && numbers[1].flag.is_none());

    // plain fields can take values from nullable columns, as long as no NULL shows up
    let bs: Vec<i8> = connection
        .query("SELECT b FROM Numbers WHERE b IS NOT NULL")?
        .try_into()?;
    assert_eq!(vec![7], bs);
    Ok(())
}

fn deser_errors(_log_handle: &mut LoggerHandle, connection: &Connection) -> GsResult<()> {
    info!("deserialization errors");
    // NULL into a plain field
    let err = connection
        .query("SELECT b FROM Numbers WHERE id = 2")?
        .try_into::<i8>()
        .unwrap_err();
    assert!(matches!(err, GsError::Deserialization { .. }));

    // lossy integer conversion
    let err = connection
        .query("SELECT s FROM Numbers WHERE id = 1")?
        .try_into::<u8>()
        .unwrap_err();
    info!("{}", err.display_with_inner());
    assert!(matches!(err, GsError::Deserialization { .. }));

    // more than one row for a single struct
    assert!(connection
        .query("SELECT * FROM Sample")?
        .try_into::<Sample>()
        .is_err());

    // more columns than the tuple can take
    assert!(connection
        .query("SELECT * FROM Sample")?
        .try_into::<Vec<(i32,)>>()
        .is_err());

    // missing field
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Other {
        id: i32,
        name: String,
    }
    assert!(connection
        .query("SELECT * FROM Sample")?
        .try_into::<Vec<Other>>()
        .is_err());
    Ok(())
}
