//! Postgres test harness. One container is started for the whole test binary; each
//! test gets its own freshly migrated database so the table-wide sync routines never
//! see another test's rows.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

struct SharedPostgres {
    host: String,
    port: u16,
    admin: PgPool,
    // Keeps the container alive for the whole run
    _container: ContainerAsync<Postgres>,
}

static SHARED: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let container = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;
        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(5432).await?;

        let admin = PgPool::connect(&database_url(&host, port, "postgres"))
            .await
            .context("Failed to connect to Postgres container")?;

        Ok(Self {
            host,
            port,
            admin,
            _container: container,
        })
    }

    async fn get() -> &'static Self {
        SHARED
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres container")
            })
            .await
    }
}

fn database_url(host: &str, port: u16, name: &str) -> String {
    format!("postgresql://postgres:postgres@{host}:{port}/{name}")
}

/// A new database with every migration applied.
pub async fn fresh_database() -> Result<PgPool> {
    let shared = SharedPostgres::get().await;
    let name = format!("t_{}", Uuid::new_v4().simple());

    // Name is generated above from hex digits only.
    sqlx::query(&format!("CREATE DATABASE {name}"))
        .execute(&shared.admin)
        .await
        .with_context(|| format!("Failed to create database {name}"))?;

    let pool = PgPool::connect(&database_url(&shared.host, shared.port, &name))
        .await
        .context("Failed to connect to test database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    Ok(pool)
}

pub async fn insert_listing(
    pool: &PgPool,
    user_id: Uuid,
    slug: &str,
    created_at: DateTime<Utc>,
) -> Result<Uuid> {
    let id = sqlx::query_scalar(
        "INSERT INTO listings (user_id, title, slug, created_at, updated_at) \
         VALUES ($1, $2, $2, $3, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(slug)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn insert_membership(
    pool: &PgPool,
    user_id: Uuid,
    tier: &str,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<()> {
    sqlx::query("INSERT INTO memberships (user_id, tier, starts_at, ends_at) VALUES ($1, $2, $3, $4)")
        .bind(user_id)
        .bind(tier)
        .bind(starts_at)
        .bind(ends_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// `(is_featured, is_premium, is_vip)` as stored.
pub async fn stored_flags(pool: &PgPool, slug: &str) -> Result<(bool, bool, bool)> {
    Ok(
        sqlx::query_as("SELECT is_featured, is_premium, is_vip FROM listings WHERE slug = $1")
            .bind(slug)
            .fetch_one(pool)
            .await?,
    )
}
