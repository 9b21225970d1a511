use crate::db::traits::UserStore;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row};

const USER_COLUMNS: &str = "id, username, password_hash, created_at";

/// libsql-backed credential store (in-memory, local file or remote Turso).
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Ephemeral database living as long as this client.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!("Failed to create {}: {}", parent.display(), e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        // One shared connection: every `connect()` on `:memory:` would open a fresh,
        // empty database.
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// Handle to the shared connection.
    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        // AUTOINCREMENT keeps ids of deleted users from being handed out again,
        // so a still-unexpired token can never resolve to a different account.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }

    async fn query_one_user(&self, sql: &str, param: libsql::Value) -> Result<Option<User>> {
        let conn = self.connection();

        let mut rows = conn
            .query(sql, [param])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(User::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserStore for TursoClient {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        let conn = self.connection();
        let now = Utc::now().timestamp();

        let mut rows = conn
            .query(
                "INSERT INTO users (username, password_hash, created_at)
                 VALUES (?, ?, ?) RETURNING id",
                (username, password_hash, now),
            )
            .await
            .map_err(insert_error)?;

        let row = rows
            .next()
            .await
            .map_err(insert_error)?
            .ok_or_else(|| AppError::Database("Insert returned no id".to_string()))?;

        row.get::<i64>(0)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.query_one_user(
            &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
            libsql::Value::Text(username.to_string()),
        )
        .await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.query_one_user(
            &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
            libsql::Value::Integer(id),
        )
        .await
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        let conn = self.connection();

        let affected = conn
            .execute("DELETE FROM users WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }
}

fn insert_error(e: libsql::Error) -> AppError {
    if e.to_string().contains("UNIQUE constraint failed") {
        AppError::conflict(crate::auth::flows::MSG_USERNAME_TAKEN, "username")
    } else {
        AppError::Database(format!("Failed to create user: {}", e))
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}

impl User {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(User {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}
