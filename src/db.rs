use anyhow::Context;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{Connection, MySqlConnection, MySqlPool};
use tracing::info;

use crate::config::Config;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS attendance_records (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
    employee_name VARCHAR(255) NOT NULL,
    employee_id VARCHAR(64) NOT NULL,
    date DATE NOT NULL,
    status VARCHAR(16) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (id),
    UNIQUE KEY uniq_employee_date (employee_id, date)
)
"#;

fn server_options(config: &Config) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
}

/// Ensures the database and table exist, then returns the pool the
/// service runs on. Any failure here is fatal to startup.
pub async fn bootstrap(config: &Config) -> anyhow::Result<MySqlPool> {
    // First connection is serverless: the database may not exist yet.
    let mut conn = MySqlConnection::connect_with(&server_options(config))
        .await
        .context("failed to connect to MySQL server")?;

    sqlx::query(&format!(
        "CREATE DATABASE IF NOT EXISTS `{}`",
        config.db_name
    ))
    .execute(&mut conn)
    .await
    .with_context(|| format!("failed to create database `{}`", config.db_name))?;

    conn.close().await.ok();

    let pool = MySqlPoolOptions::new()
        .connect_with(server_options(config).database(&config.db_name))
        .await
        .with_context(|| format!("failed to open pool on `{}`", config.db_name))?;

    sqlx::query(CREATE_TABLE_SQL)
        .execute(&pool)
        .await
        .context("failed to create attendance_records table")?;

    info!(database = %config.db_name, "Schema bootstrap complete");

    Ok(pool)
}
