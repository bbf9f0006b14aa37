//! PostgreSQL table import with schema and table discovery.
//!
//! The adapter owns a connection pool for the lifetime of a session.
//! Catalog listings come from `information_schema`; table loads decode
//! every column through one of four canonical wire shapes (int8, float8,
//! bool, text) by casting in the select list, which keeps the row
//! decoding independent of the exact column types.

use std::time::Duration;

use polars::prelude::*;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{Pool, Postgres, Row};
use tracing::{info, warn};

use crate::error::{LensError, Result};
use crate::types::{LoadedDataset, SourceKind};

/// Connection credentials as entered by the user.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

/// Pooling and timeout configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Maximum connections in the pool.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Query timeout in seconds.
    pub query_timeout_secs: u64,
    /// Row cap applied to table loads.
    pub max_rows: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            connect_timeout_secs: 10,
            query_timeout_secs: 30,
            max_rows: 100_000,
        }
    }
}

/// An open PostgreSQL connection, reusable across commands.
#[derive(Debug)]
pub struct DatabaseSource {
    pool: Pool<Postgres>,
    config: ConnectionConfig,
    label: String,
}

/// Canonical decode shape for a column, chosen from its catalog type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PgCategory {
    Int,
    Float,
    Bool,
    Text,
}

fn categorize(data_type: &str) -> PgCategory {
    match data_type {
        "smallint" | "integer" | "bigint" => PgCategory::Int,
        "real" | "double precision" | "numeric" => PgCategory::Float,
        "boolean" => PgCategory::Bool,
        _ => PgCategory::Text,
    }
}

/// Quote an identifier for interpolation into a query.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Select-list expression that casts a column to its canonical shape.
fn select_expr(name: &str, category: PgCategory) -> String {
    let quoted = quote_ident(name);
    match category {
        PgCategory::Int => format!("{quoted}::int8 AS {quoted}"),
        PgCategory::Float => format!("{quoted}::float8 AS {quoted}"),
        PgCategory::Bool => quoted,
        PgCategory::Text => format!("{quoted}::text AS {quoted}"),
    }
}

/// Per-column accumulator for decoded values.
enum ColumnData {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    fn with_capacity(category: PgCategory, capacity: usize) -> Self {
        match category {
            PgCategory::Int => Self::Int(Vec::with_capacity(capacity)),
            PgCategory::Float => Self::Float(Vec::with_capacity(capacity)),
            PgCategory::Bool => Self::Bool(Vec::with_capacity(capacity)),
            PgCategory::Text => Self::Text(Vec::with_capacity(capacity)),
        }
    }

    fn push_from_row(&mut self, row: &PgRow, index: usize) -> std::result::Result<(), sqlx::Error> {
        match self {
            Self::Int(values) => values.push(row.try_get::<Option<i64>, _>(index)?),
            Self::Float(values) => values.push(row.try_get::<Option<f64>, _>(index)?),
            Self::Bool(values) => values.push(row.try_get::<Option<bool>, _>(index)?),
            Self::Text(values) => values.push(row.try_get::<Option<String>, _>(index)?),
        }
        Ok(())
    }

    fn into_series(self, name: &str) -> Series {
        match self {
            Self::Int(values) => Series::new(name.into(), values),
            Self::Float(values) => Series::new(name.into(), values),
            Self::Bool(values) => Series::new(name.into(), values),
            Self::Text(values) => Series::new(name.into(), values),
        }
    }
}

impl DatabaseSource {
    /// Open a connection pool and verify it with a health-check query.
    pub async fn connect(params: &ConnectionParams, config: ConnectionConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .database(&params.database)
            .username(&params.user)
            .password(&params.password);

        let connect = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options);

        let pool = tokio::time::timeout(
            Duration::from_secs(config.connect_timeout_secs),
            connect,
        )
        .await
        .map_err(|_| {
            LensError::Connection(format!(
                "connection timed out after {} seconds",
                config.connect_timeout_secs
            ))
        })?
        .map_err(|e| LensError::Connection(e.to_string()))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| LensError::Connection(format!("health check failed: {e}")))?;

        let label = format!("{}:{}/{}", params.host, params.port, params.database);
        info!("connected to {}", label);

        Ok(Self {
            pool,
            config,
            label,
        })
    }

    /// `host:port/database` label for status display.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Enumerate user schemas, ordered by name.
    pub async fn list_schemas(&self) -> Result<Vec<String>> {
        let sql = "SELECT schema_name FROM information_schema.schemata \
                   WHERE schema_name NOT IN ('pg_catalog', 'information_schema', 'pg_toast') \
                   ORDER BY schema_name";

        let rows = self.fetch_all(sqlx::query(sql)).await?;
        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("schema_name")
                    .map_err(|e| LensError::Query(e.to_string()))
            })
            .collect()
    }

    /// Enumerate base tables within a schema, ordered by name.
    pub async fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        let sql = "SELECT table_name FROM information_schema.tables \
                   WHERE table_schema = $1 AND table_type = 'BASE TABLE' \
                   ORDER BY table_name";

        let rows = self.fetch_all(sqlx::query(sql).bind(schema)).await?;
        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("table_name")
                    .map_err(|e| LensError::Query(e.to_string()))
            })
            .collect()
    }

    /// Load a table into a dataset, capped at `max_rows` rows.
    pub async fn load_table(&self, schema: &str, table: &str) -> Result<LoadedDataset> {
        let columns = self.table_columns(schema, table).await?;
        if columns.is_empty() {
            return Err(LensError::Query(format!(
                "table {}.{} not found or has no columns",
                schema, table
            )));
        }

        let select_list: Vec<String> = columns
            .iter()
            .map(|(name, category)| select_expr(name, *category))
            .collect();
        let sql = format!(
            "SELECT {} FROM {}.{} LIMIT {}",
            select_list.join(", "),
            quote_ident(schema),
            quote_ident(table),
            self.config.max_rows
        );

        let rows = self.fetch_all(sqlx::query(&sql)).await?;
        if rows.len() == self.config.max_rows {
            warn!(
                "table {}.{} truncated to the first {} rows",
                schema, table, self.config.max_rows
            );
        }

        let mut buffers: Vec<ColumnData> = columns
            .iter()
            .map(|(_, category)| ColumnData::with_capacity(*category, rows.len()))
            .collect();
        for row in &rows {
            for (index, buffer) in buffers.iter_mut().enumerate() {
                buffer
                    .push_from_row(row, index)
                    .map_err(|e| LensError::Query(e.to_string()))?;
            }
        }

        let series: Vec<Column> = columns
            .iter()
            .zip(buffers)
            .map(|((name, _), buffer)| buffer.into_series(name).into())
            .collect();
        let df = DataFrame::new(series)?;

        info!(
            "loaded {}.{} ({} rows x {} columns)",
            schema,
            table,
            df.height(),
            df.width()
        );

        Ok(LoadedDataset {
            df,
            name: table.to_string(),
            origin: SourceKind::Database,
        })
    }

    /// Close the pool. Called when the handle is replaced or the
    /// session ends.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Column names and decode shapes from the catalog, in table order.
    async fn table_columns(&self, schema: &str, table: &str) -> Result<Vec<(String, PgCategory)>> {
        let sql = "SELECT column_name, data_type FROM information_schema.columns \
                   WHERE table_schema = $1 AND table_name = $2 \
                   ORDER BY ordinal_position";

        let rows = self
            .fetch_all(sqlx::query(sql).bind(schema).bind(table))
            .await?;
        rows.iter()
            .map(|row| {
                let name: String = row
                    .try_get("column_name")
                    .map_err(|e| LensError::Query(e.to_string()))?;
                let data_type: String = row
                    .try_get("data_type")
                    .map_err(|e| LensError::Query(e.to_string()))?;
                Ok((name, categorize(&data_type)))
            })
            .collect()
    }

    async fn fetch_all(
        &self,
        query: sqlx::query::Query<'_, Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<PgRow>> {
        tokio::time::timeout(
            Duration::from_secs(self.config.query_timeout_secs),
            query.fetch_all(&self.pool),
        )
        .await
        .map_err(|_| {
            LensError::Query(format!(
                "query timed out after {} seconds",
                self.config.query_timeout_secs
            ))
        })?
        .map_err(|e| LensError::Query(e.to_string()))
    }
}
