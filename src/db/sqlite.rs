use crate::db::models::{DbCredential, DbPayer, DbPayment, NewPayer, NewPayment};
use crate::db::schema::SQLITE_INIT;
use crate::error::PaygateError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url`, creating the file if needed, and ensure the schema.
    pub async fn connect(database_url: &str) -> Result<Self, PaygateError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), PaygateError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn insert_credential(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, PaygateError> {
        let res = sqlx::query("INSERT INTO credentials (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    /// First credential stored under `username`, if any.
    pub async fn find_credential(
        &self,
        username: &str,
    ) -> Result<Option<DbCredential>, PaygateError> {
        let cred = sqlx::query_as::<_, DbCredential>(
            "SELECT id, username, password_hash FROM credentials WHERE username = ? ORDER BY id LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cred)
    }

    pub async fn count_credentials(&self, username: &str) -> Result<i64, PaygateError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM credentials WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn insert_payer(&self, payer: NewPayer) -> Result<i64, PaygateError> {
        let res = sqlx::query(
            r#"
            INSERT INTO payers (name, vin, email, contact, payment_method, amount)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payer.name)
        .bind(payer.vin)
        .bind(payer.email)
        .bind(payer.contact)
        .bind(payer.payment_method)
        .bind(payer.amount)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn find_payer(&self, id: i64) -> Result<Option<DbPayer>, PaygateError> {
        let payer = sqlx::query_as::<_, DbPayer>(
            r#"SELECT id, name, vin, email, contact, payment_method, amount
               FROM payers WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payer)
    }

    pub async fn insert_payment(&self, payment: NewPayment) -> Result<DbPayment, PaygateError> {
        let res = sqlx::query("INSERT INTO payments (transaction_id, date, payer_id) VALUES (?, ?, ?)")
            .bind(&payment.transaction_id)
            .bind(payment.date.to_rfc3339())
            .bind(payment.payer_id)
            .execute(&self.pool)
            .await?;
        Ok(payment.into_stored(res.last_insert_rowid()))
    }

    pub async fn list_payments(&self, transaction_id: &str) -> Result<Vec<DbPayment>, PaygateError> {
        let rows = sqlx::query(
            r#"SELECT id, transaction_id, date, payer_id
               FROM payments WHERE transaction_id = ? ORDER BY id"#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_payment).collect()
    }

    fn row_to_payment(row: SqliteRow) -> Result<DbPayment, PaygateError> {
        let id: i64 = row.try_get("id")?;
        let transaction_id: String = row.try_get("transaction_id")?;
        let date_str: String = row.try_get("date")?;
        let payer_id: i64 = row.try_get("payer_id")?;

        let date: DateTime<Utc> = DateTime::parse_from_rfc3339(&date_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbPayment {
            id,
            transaction_id,
            date,
            payer_id,
        })
    }
}
