// Data access layer: one cloneable handle, per-entity query modules.

use color_eyre::Result;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub use models::*;

pub mod player;
pub mod question;

mod migrations;
mod round;
mod token;
mod user;

#[derive(Clone)]
pub struct Db {
    pool: sqlx::PgPool,
}

impl Db {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(8).connect(url).await?;

        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        migrations::run(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }
}
