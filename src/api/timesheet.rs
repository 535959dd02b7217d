// src/api/timesheet.rs

use tracing::debug;

use super::paths;
use crate::client::AuthClient;
use crate::error::Result;
use crate::models::{DateRange, NewTimesheetEntry, TimesheetEntry};

pub struct TimesheetApi<'a> {
    client: &'a AuthClient,
}

impl AuthClient {
    pub fn timesheet(&self) -> TimesheetApi<'_> {
        TimesheetApi { client: self }
    }
}

impl TimesheetApi<'_> {
    /// Entries in `range`, or every entry when no range is given
    pub async fn list(&self, range: Option<DateRange>) -> Result<Vec<TimesheetEntry>> {
        let query: Vec<(&str, String)> = range
            .map(|r| r.query().into_iter().collect())
            .unwrap_or_default();

        let entries: Vec<TimesheetEntry> = self.client.get_json(paths::TIMESHEET, &query).await?;
        debug!(count = entries.len(), ?range, "loaded timesheet entries");
        Ok(entries)
    }

    pub async fn create(&self, entry: &NewTimesheetEntry) -> Result<()> {
        self.client.post_json(paths::TIMESHEET, entry).await?;
        debug!(date = %entry.date, "created timesheet entry");
        Ok(())
    }
}
