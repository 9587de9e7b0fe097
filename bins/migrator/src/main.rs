//! Database migration runner for Bursar.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show applied and pending migrations
//!   migrator fresh   - Drop everything and re-apply
//!
//! Reads the connection string from `DATABASE_URL`.

use bursar_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
