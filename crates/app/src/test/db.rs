//! Per-test PostgreSQL databases
//!
//! One container is started lazily and shared by every test in the binary.
//! Each [`TestDb`] gets a fresh database inside it with all migrations
//! applied, so tests never see each other's rows.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, query};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

use crate::database;

const USER: &str = "joinery_test";
const PASSWORD: &str = "joinery_test_password";

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Databases waiting to be dropped once their `TestDb` goes away.
static DROPS: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("failed to start PostgreSQL container")
}

async fn spawn_dropper() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("failed to drop test database '{name}': {error}");
            }
        }
    });

    sender
}

async fn server_url(database: &str) -> String {
    let container = CONTAINER.get_or_init(start_container).await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to read container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if CONTAINER.get().is_none() {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&server_url("postgres").await).await?;

    query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// An isolated, migrated database. Dropped in the background when this
/// value is dropped.
#[derive(Debug, Clone)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROPS.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        DROPS.get_or_init(spawn_dropper).await;

        // Only hex digits after the prefix, so the name needs no quoting rules.
        let name = format!("joinery_test_{}", Uuid::now_v7().simple());

        let mut admin = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("failed to connect to the maintenance database");

        query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("failed to create test database");

        admin.close().await.expect("failed to close admin connection");

        let pool = PgPool::connect(&server_url(&name).await)
            .await
            .expect("failed to connect to test database");

        database::migrate(&pool)
            .await
            .expect("failed to run migrations");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_database_is_migrated() {
        let db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM information_schema.tables WHERE table_name IN ('carts', 'orders', 'order_items')",
        )
        .fetch_one(db.pool())
        .await
        .expect("query should succeed");

        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn databases_are_isolated() {
        let a = TestDb::new().await;
        let b = TestDb::new().await;

        sqlx::query("INSERT INTO carts (uuid, user_uuid) VALUES ($1, $2)")
            .bind(Uuid::now_v7())
            .bind(Uuid::now_v7())
            .execute(a.pool())
            .await
            .expect("insert should succeed");

        let rows: i64 = sqlx::query_scalar("SELECT count(*) FROM carts")
            .fetch_one(b.pool())
            .await
            .expect("count should succeed");

        assert_eq!(rows, 0);
    }
}
