//! Database connection and catalog commands.
//!
//! Listing failures are soft: they print a warning and leave the shell
//! running with an empty listing instead of failing the command.

use datalens_processing::sources::{ConnectionConfig, ConnectionParams, DatabaseSource};
use datalens_processing::{LensError, SourceKind};
use tracing::warn;

use crate::session::Session;

/// `connect <host> <port> <database> <user> <password>`
pub async fn connect(
    session: &mut Session,
    host: String,
    port: u16,
    database: String,
    user: String,
    password: String,
) -> Result<(), LensError> {
    let params = ConnectionParams {
        host,
        port,
        database,
        user,
        password,
    };
    let connection = DatabaseSource::connect(&params, ConnectionConfig::default()).await?;
    println!("Connected to {}", connection.label());

    if let Some(previous) = session.replace_connection(connection) {
        previous.close().await;
    }
    session.set_source(SourceKind::Database);
    Ok(())
}

/// `schemas` — list schemas, served from cache when available.
pub async fn schemas(session: &mut Session) -> Result<(), LensError> {
    if let Some(cached) = session.schemas() {
        print_names("Schemas", cached);
        return Ok(());
    }

    let listed = {
        let connection = session.require_connection()?;
        connection.list_schemas().await
    };
    match listed {
        Ok(names) => {
            print_names("Schemas", &names);
            session.set_schemas(names);
            Ok(())
        }
        Err(e) if e.is_warning() => {
            warn!("schema listing failed: {e}");
            print_names("Schemas", &[]);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// `use <schema>` — select the active schema.
pub fn use_schema(session: &mut Session, schema: String) -> Result<(), LensError> {
    session.require_connection()?;
    println!("Using schema {schema}");
    session.select_schema(schema);
    Ok(())
}

/// `tables` — list base tables in the active schema.
pub async fn tables(session: &mut Session) -> Result<(), LensError> {
    if let Some(cached) = session.tables() {
        print_names("Tables", cached);
        return Ok(());
    }

    let schema = match session.selected_schema() {
        Some(schema) => schema.clone(),
        None => {
            println!("No schema selected; run 'use <schema>' first.");
            return Ok(());
        }
    };

    let listed = {
        let connection = session.require_connection()?;
        connection.list_tables(&schema).await
    };
    match listed {
        Ok(names) => {
            print_names("Tables", &names);
            session.set_tables(names);
            Ok(())
        }
        Err(e) if e.is_warning() => {
            warn!("table listing failed: {e}");
            print_names("Tables", &[]);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// `load <table>` — load a table from the active schema.
pub async fn load_table(session: &mut Session, table: &str) -> Result<(), LensError> {
    let dataset = {
        let connection = session.require_connection()?;
        let schema = session
            .selected_schema()
            .ok_or_else(|| LensError::Query("no schema selected; run 'use <schema>' first".to_string()))?
            .clone();
        connection.load_table(&schema, table).await?
    };

    println!(
        "Loaded {} ({} rows x {} columns, database)",
        dataset.name,
        dataset.df.height(),
        dataset.df.width()
    );
    super::load::print_sample(&dataset.df, 5);
    session.set_dataset(dataset);
    Ok(())
}

fn print_names(label: &str, names: &[String]) {
    if names.is_empty() {
        println!("{label}: (none)");
        return;
    }
    println!("{label}:");
    for name in names {
        println!("  {name}");
    }
}
