use allie_core::error::{AllieError, Result};
use allie_core::types::ScheduleEvent;
use chrono::DateTime;
use libsql::{Builder, Connection, Database, Row};

pub struct ScheduleStore {
    db: Database,
}

fn map_err(e: libsql::Error) -> AllieError {
    AllieError::Database(e.to_string())
}

const EVENT_COLUMNS: &str = "id, task, task_lower, time, date, created_at";

fn row_to_event(row: &Row) -> Result<ScheduleEvent> {
    let millis = row.get::<i64>(5).map_err(map_err)?;
    let created_at = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AllieError::Database(format!("invalid created_at: {millis}")))?;
    Ok(ScheduleEvent {
        id: row.get::<String>(0).map_err(map_err)?,
        task: row.get::<String>(1).map_err(map_err)?,
        task_lower: row.get::<String>(2).map_err(map_err)?,
        time: row.get::<String>(3).map_err(map_err)?,
        date: row.get::<String>(4).map_err(map_err)?,
        created_at,
    })
}

impl ScheduleStore {
    /// Open a local libsql database at the given file path.
    pub async fn new(path: &str) -> Result<Self> {
        let db = Builder::new_local(path).build().await.map_err(map_err)?;
        let store = Self { db };
        store.init_tables().await?;
        Ok(store)
    }

    /// Open a remote Turso database.
    pub async fn new_remote(url: &str, token: &str) -> Result<Self> {
        let db = Builder::new_remote(url.to_string(), token.to_string())
            .build()
            .await
            .map_err(map_err)?;
        let store = Self { db };
        store.init_tables().await?;
        Ok(store)
    }

    /// Fresh connection per operation; remote streams expire when held.
    fn conn(&self) -> Result<Connection> {
        self.db.connect().map_err(map_err)
    }

    async fn init_tables(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schedules (
                id TEXT PRIMARY KEY,
                task TEXT NOT NULL,
                task_lower TEXT NOT NULL,
                time TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(map_err)?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS schedules_created_idx ON schedules(created_at)",
            (),
        )
        .await
        .map_err(map_err)?;
        Ok(())
    }

    pub async fn insert(&self, event: &ScheduleEvent) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO schedules (id, task, task_lower, time, date, created_at) VALUES (?, ?, ?, ?, ?, ?)",
                libsql::params![
                    event.id.clone(),
                    event.task.clone(),
                    event.task_lower.clone(),
                    event.time.clone(),
                    event.date.clone(),
                    event.created_at.timestamp_millis(),
                ],
            )
            .await
            .map_err(map_err)?;
        tracing::debug!(id = %event.id, task = %event.task, "schedule event inserted");
        Ok(())
    }

    /// Every event, newest first. Events created in the same millisecond keep
    /// reverse insertion order.
    pub async fn list(&self) -> Result<Vec<ScheduleEvent>> {
        let mut rows = self
            .conn()?
            .query(
                &format!("SELECT {EVENT_COLUMNS} FROM schedules ORDER BY created_at DESC, rowid DESC"),
                (),
            )
            .await
            .map_err(map_err)?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await.map_err(map_err)? {
            events.push(row_to_event(&row)?);
        }
        Ok(events)
    }

    /// Events whose lowercased task contains `keyword`, newest first.
    pub async fn find_by_task(&self, keyword: &str) -> Result<Vec<ScheduleEvent>> {
        let mut rows = self
            .conn()?
            .query(
                &format!(
                    "SELECT {EVENT_COLUMNS} FROM schedules WHERE instr(task_lower, ?) > 0 ORDER BY created_at DESC, rowid DESC"
                ),
                libsql::params![keyword.to_lowercase()],
            )
            .await
            .map_err(map_err)?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await.map_err(map_err)? {
            events.push(row_to_event(&row)?);
        }
        Ok(events)
    }

    /// Delete by id. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn()?
            .execute("DELETE FROM schedules WHERE id = ?", libsql::params![id.to_string()])
            .await
            .map_err(map_err)?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    async fn open() -> (tempfile::TempDir, ScheduleStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedules.db");
        let store = ScheduleStore::new(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    fn event_at(task: &str, minutes_ago: i64) -> ScheduleEvent {
        let mut event = ScheduleEvent::new(task, "5pm", "today");
        event.created_at = Utc::now() - Duration::minutes(minutes_ago);
        event
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (_dir, store) = open().await;
        store.insert(&event_at("older", 10)).await.unwrap();
        store.insert(&event_at("newest", 0)).await.unwrap();
        store.insert(&event_at("middle", 5)).await.unwrap();

        let tasks: Vec<_> = store.list().await.unwrap().into_iter().map(|e| e.task).collect();
        assert_eq!(tasks, ["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_roundtrip_keeps_fields() {
        let (_dir, store) = open().await;
        let event = ScheduleEvent::new("Call Mom", "5pm", "tomorrow");
        store.insert(&event).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, event.id);
        assert_eq!(listed[0].task_lower, "call mom");
        assert_eq!(
            listed[0].created_at.timestamp_millis(),
            event.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_find_by_task_is_substring_on_lowercase() {
        let (_dir, store) = open().await;
        store.insert(&event_at("Dentist appointment", 2)).await.unwrap();
        store.insert(&event_at("Call the dentist back", 1)).await.unwrap();
        store.insert(&event_at("Buy milk", 0)).await.unwrap();

        assert_eq!(store.find_by_task("DENTIST").await.unwrap().len(), 2);
        assert_eq!(store.find_by_task("milk").await.unwrap()[0].task, "Buy milk");
        assert!(store.find_by_task("gym").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let (_dir, store) = open().await;
        let event = ScheduleEvent::new("gym", "unspecified", "unspecified");
        store.insert(&event).await.unwrap();

        assert!(store.delete(&event.id).await.unwrap());
        assert!(!store.delete(&event.id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
