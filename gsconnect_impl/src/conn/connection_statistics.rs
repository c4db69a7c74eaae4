// docu is written at re-exports of the frontend crate (gsconnect/lib.rs)
#[derive(Debug, Clone)]
pub struct ConnectionStatistics {
    call_count: u32,
    fetched_rows: u64,
    created_at: time::OffsetDateTime,
    last_reset_at: time::OffsetDateTime,
    wait_time: std::time::Duration,
}
impl Default for ConnectionStatistics {
    fn default() -> Self {
        let timestamp = time::OffsetDateTime::now_utc();
        Self {
            created_at: timestamp,
            last_reset_at: timestamp,
            call_count: 0,
            fetched_rows: 0,
            wait_time: std::time::Duration::default(),
        }
    }
}
impl ConnectionStatistics {
    pub(crate) fn new() -> Self {
        Self::default()
    }
    pub(crate) fn reset(&mut self) {
        *self = Self {
            created_at: self.created_at,
            last_reset_at: time::OffsetDateTime::now_utc(),
            ..Default::default()
        };
    }

    pub(crate) fn add_call(&mut self, wait_time: std::time::Duration) {
        self.call_count += 1;
        self.wait_time += wait_time;
    }

    pub(crate) fn add_fetched_rows(&mut self, count: usize) {
        self.fetched_rows += count as u64;
    }

    /// Returns the number of statements that were sent to the driver through this connection
    /// since the last reset.
    pub fn call_count(&self) -> u32 {
        self.call_count
    }

    /// Returns the number of rows that were fetched through this connection
    /// since the last reset.
    pub fn fetched_rows(&self) -> u64 {
        self.fetched_rows
    }

    /// Returns the total time spent waiting for the driver
    /// since the last reset.
    pub fn accumulated_wait_time(&self) -> std::time::Duration {
        self.wait_time
    }

    /// Returns when the connection was opened.
    pub fn created_at(&self) -> time::OffsetDateTime {
        self.created_at
    }

    /// Returns when the statistics were last reset.
    pub fn last_reset_at(&self) -> time::OffsetDateTime {
        self.last_reset_at
    }
}

impl std::fmt::Display for ConnectionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Connection statistics")?;
        writeln!(f, "Created at:     {}", self.created_at)?;
        writeln!(f, "Last reset at:  {}", self.last_reset_at)?;
        writeln!(f, "Total number of calls:    {}", self.call_count)?;
        writeln!(f, "Total number of rows:     {}", self.fetched_rows)?;
        writeln!(f, "Total wait time:          {:?}", self.wait_time)?;
        Ok(())
    }
}
