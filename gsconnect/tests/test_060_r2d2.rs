#![cfg(feature = "r2d2_pool")]


use flexi_logger::LoggerHandle;
use gsconnect::{ConnectionConfiguration, ConnectionManager, GsResult};
use log::info;
use std::thread;

const CLUSTER: &str = "test_060";

// cargo test --features r2d2_pool --test test_060_r2d2 -- --nocapture
#[test]
fn test_060_r2d2() -> GsResult<()> {
    let mut log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let connection = test_utils::get_authenticated_connection(CLUSTER)?;
    test_utils::create_sample_table(&connection)?;

    pooled_connections(&mut log_handle)?;
    pool_with_configuration(&mut log_handle)?;
    broken_connections(&mut log_handle)?;

    test_utils::closing_info(connection, start)
}

fn pooled_connections(_log_handle: &mut LoggerHandle) -> GsResult<()> {
    info!("use pooled connections from several threads");
    let manager = ConnectionManager::new(test_utils::get_cp_builder(CLUSTER)?)?;
    let pool = r2d2::Pool::builder().max_size(4).build(manager).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pool = pool.clone();
            thread::spawn(move || -> GsResult<usize> {
                let conn = pool.get().unwrap();
                conn.query(format!("SELECT * FROM Sample WHERE id >= {}", i % 5))?
                    .fetch_all()
                    .map(|rows| rows.len())
            })
        })
        .collect();
    let mut counts: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect::<GsResult<_>>()?;
    counts.sort_unstable();
    assert_eq!(vec![1, 2, 3, 3, 4, 4, 5, 5], counts);
    assert!(pool.state().connections <= 4);
    Ok(())
}

fn pool_with_configuration(_log_handle: &mut LoggerHandle) -> GsResult<()> {
    info!("pooled connections use the given configuration");
    let manager = ConnectionManager::with_configuration(
        test_utils::get_cp_builder(CLUSTER)?,
        ConnectionConfiguration::default().with_array_size(3),
    )?;
    let pool = r2d2::Pool::builder().max_size(2).build(manager).unwrap();
    let conn = pool.get().unwrap();
    assert_eq!(3, conn.array_size()?);
    assert_eq!(3, conn.query("SELECT * FROM Sample")?.fetch_many(None)?.len());
    Ok(())
}

fn broken_connections(_log_handle: &mut LoggerHandle) -> GsResult<()> {
    info!("closed connections are not handed out again");
    let manager = ConnectionManager::new(test_utils::get_cp_builder(CLUSTER)?)?;
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .test_on_check_out(true)
        .build(manager)
        .unwrap();
    {
        let conn = pool.get().unwrap();
        conn.close()?;
    }
    let conn = pool.get().unwrap();
    assert!(!conn.is_closed());
    assert_eq!(5, conn.query("SELECT * FROM Sample")?.fetch_all()?.len());
    Ok(())
}
