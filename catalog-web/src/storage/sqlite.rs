//! SQLite-backed store

use async_trait::async_trait;
use catalog_core::{
    already_exists_error, not_found_error, storage_error, Account, AccountStore, CatalogError,
    CatalogResult, Item, ItemStore, Role,
};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{path::Path, str::FromStr};
use tracing::{debug, error, info};
use uuid::Uuid;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price REAL NOT NULL,
        stock INTEGER NOT NULL,
        owner_id TEXT NOT NULL REFERENCES accounts(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_items_owner ON items(owner_id)",
];

#[derive(Debug, sqlx::FromRow)]
struct AccountRecord {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl AccountRecord {
    fn into_account(self) -> CatalogResult<Account> {
        Ok(Account {
            id: parse_uuid(&self.id)?,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: Role::from_str(&self.role)
                .map_err(|e| storage_error!(e, "sqlite_store"))?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRecord {
    id: String,
    name: String,
    description: String,
    price: f64,
    stock: i64,
    owner_id: String,
    created_at: String,
    updated_at: String,
}

impl ItemRecord {
    fn into_item(self) -> CatalogResult<Item> {
        Ok(Item {
            id: parse_uuid(&self.id)?,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            owner_id: parse_uuid(&self.owner_id)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_uuid(value: &str) -> CatalogResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| storage_error!("Corrupt id column", "sqlite_store", e))
}

fn parse_timestamp(value: &str) -> CatalogResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| storage_error!("Corrupt timestamp column", "sqlite_store", e))
}

fn query_failed(operation: &str, err: sqlx::Error) -> CatalogError {
    error!(operation = operation, "SQLite query failed: {}", err);
    storage_error!(format!("{} failed", operation), "sqlite_store", err)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Store over a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` and create the tables if needed.
    ///
    /// File databases get their parent directory created. In-memory databases
    /// are pinned to a single connection so every query sees the same data.
    pub async fn connect(database_url: &str) -> CatalogResult<Self> {
        info!("Connecting to database: {}", database_url);

        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        if !in_memory {
            let path = database_url
                .strip_prefix("sqlite://")
                .or_else(|| database_url.strip_prefix("sqlite:"))
                .unwrap_or(database_url);
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    info!("Creating database directory: {}", parent.display());
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| storage_error!("Invalid database URL", "sqlite_store", e))?
            .create_if_missing(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| query_failed("connect", e))?;

        let store = Self { pool };
        store.create_tables().await?;
        info!("Database connection established");
        Ok(store)
    }

    async fn create_tables(&self) -> CatalogResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| query_failed("create_tables", e))?;
        }
        debug!("Database tables ready");
        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn create(&self, account: &Account) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.created_at.to_rfc3339())
        .bind(account.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                already_exists_error!(format!("account {}", account.email), "sqlite_store")
            } else {
                query_failed("insert_account", e)
            }
        })?;

        debug!(account_id = %account.id, "Account inserted");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> CatalogResult<Option<Account>> {
        sqlx::query_as::<_, AccountRecord>("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("find_account_by_email", e))?
            .map(AccountRecord::into_account)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Account>> {
        sqlx::query_as::<_, AccountRecord>("SELECT * FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("find_account_by_id", e))?
            .map(AccountRecord::into_account)
            .transpose()
    }

    async fn list(&self) -> CatalogResult<Vec<Account>> {
        sqlx::query_as::<_, AccountRecord>("SELECT * FROM accounts ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("list_accounts", e))?
            .into_iter()
            .map(AccountRecord::into_account)
            .collect()
    }

    async fn ping(&self) -> CatalogResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| query_failed("ping", e))
    }
}

#[async_trait]
impl ItemStore for SqliteStore {
    async fn create(&self, item: &Item) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, price, stock, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.stock)
        .bind(item.owner_id.to_string())
        .bind(item.created_at.to_rfc3339())
        .bind(item.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| query_failed("insert_item", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Item>> {
        sqlx::query_as::<_, ItemRecord>("SELECT * FROM items WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("find_item", e))?
            .map(ItemRecord::into_item)
            .transpose()
    }

    async fn update(&self, item: &Item) -> CatalogResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = ?, description = ?, price = ?, stock = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.stock)
        .bind(item.updated_at.to_rfc3339())
        .bind(item.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| query_failed("update_item", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error!("Item", "sqlite_store"));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete_item", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error!("Item", "sqlite_store"));
        }
        Ok(())
    }

    async fn list(&self) -> CatalogResult<Vec<Item>> {
        sqlx::query_as::<_, ItemRecord>("SELECT * FROM items ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("list_items", e))?
            .into_iter()
            .map(ItemRecord::into_item)
            .collect()
    }
}
