use crate::error::LedgerError;
use crate::store::Store;
use crate::store::schema::SQLITE_INIT;
use crate::types::Expense;
use crate::types::timestamp;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Store backed by an `expenses` table; row order is kept in `position`.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    url: String,
}

impl SqliteStore {
    /// Connect to `database_url`, creating the file and schema when missing.
    pub async fn connect(database_url: &str) -> Result<Self, LedgerError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // a single connection matches the single-writer actor in front of it
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await?;
        let store = Self {
            pool,
            url: database_url.to_string(),
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), LedgerError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<Expense, LedgerError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let nominal: f64 = row.try_get("nominal")?;
        let category: String = row.try_get("category")?;
        let date_str: String = row.try_get("date")?;

        let date = timestamp::parse_lenient(&date_str).ok_or_else(|| {
            sqlx::Error::Decode(format!("invalid expense date: {date_str}").into())
        })?;

        Ok(Expense {
            id,
            name,
            nominal,
            category,
            date,
        })
    }
}

#[ractor::async_trait]
impl Store for SqliteStore {
    async fn load(&self) -> Result<Vec<Expense>, LedgerError> {
        let rows = sqlx::query(
            r#"SELECT id, name, nominal, category, date
               FROM expenses ORDER BY position"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    /// Rewrite the whole table inside one transaction.
    async fn persist(&self, expenses: &[Expense]) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM expenses")
            .execute(&mut *tx)
            .await?;

        for (position, expense) in expenses.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO expenses (position, id, name, nominal, category, date)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(position as i64)
            .bind(expense.id)
            .bind(expense.name.as_str())
            .bind(expense.nominal)
            .bind(expense.category.as_str())
            .bind(timestamp::format(&expense.date))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_db() -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ledger-sqlite-{}-{}.sqlite",
            std::process::id(),
            nanos
        ))
    }

    fn expense(id: i64, name: &str) -> Expense {
        Expense {
            id,
            name: name.into(),
            nominal: 2.5,
            category: "Food".into(),
            date: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
        }
    }

    #[tokio::test]
    async fn persist_replaces_whole_table_in_order() -> Result<(), LedgerError> {
        let path = temp_db();
        let url = format!("sqlite:{}", path.display());
        let store = SqliteStore::connect(&url).await?;
        assert!(store.load().await?.is_empty());

        store
            .persist(&[expense(2, "b"), expense(1, "a"), expense(7, "c")])
            .await?;
        let ids: Vec<i64> = store.load().await?.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 7]);

        store.persist(&[expense(1, "a")]).await?;
        drop(store);

        let reopened = SqliteStore::connect(&url).await?;
        assert_eq!(reopened.load().await?, vec![expense(1, "a")]);

        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
