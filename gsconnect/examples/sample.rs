use gsconnect::{connect, params, Credentials, GsResult};

pub fn main() -> GsResult<()> {
    // The loopback driver keeps its tables in memory
    let connection = connect(
        "jdbc:loopback://localhost:20001/sampleCluster/public",
        &Credentials::new("admin", "admin"),
    )?;
    let mut cursor = connection.cursor()?;

    // Set up the table
    cursor.execute("DROP TABLE IF EXISTS Sample", &[])?;
    cursor.execute(
        "CREATE TABLE IF NOT EXISTS Sample (id INTEGER PRIMARY KEY, value STRING)",
        &[],
    )?;

    // Insert some rows
    let rows: Vec<_> = (0..5).map(|i| params![i, format!("test{i}")]).collect();
    cursor.execute_many("INSERT INTO Sample VALUES (?, ?)", &rows)?;
    println!("inserted {} rows", cursor.row_count());

    // Fetch the matching rows one by one
    cursor.execute("SELECT * FROM Sample WHERE id > ?", &params![2])?;
    while let Some(row) = cursor.fetch_one()? {
        let (id, value): (i32, String) = row.try_into()?;
        println!("{id}: {value}");
    }

    cursor.close()?;
    connection.close()
}
