//! Command parsing and dispatch for the interactive shell.
//!
//! Every handler receives `&mut Session` and returns a `LensError` on
//! failure; the REPL converts errors into printed messages and keeps
//! running, so no single bad action ends the session.

mod analyze;
mod database;
mod load;

use std::path::PathBuf;

use datalens_processing::LensError;

use crate::session::Session;

pub use load::open_file;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Sheet(String),
    Connect {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: String,
    },
    Schemas,
    Use(String),
    Tables,
    Load(String),
    Sample(usize),
    Analyze,
    Reset,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Returns a usage message on bad input.
    pub fn parse(line: &str) -> Result<Command, String> {
        let mut parts = line.split_whitespace();
        let keyword = match parts.next() {
            Some(k) => k.to_ascii_lowercase(),
            None => return Err("empty command".to_string()),
        };
        let args: Vec<&str> = parts.collect();

        match keyword.as_str() {
            "open" => match args.as_slice() {
                [path] => Ok(Command::Open(PathBuf::from(path))),
                _ => Err("usage: open <file.csv>".to_string()),
            },
            "sheet" => match args.as_slice() {
                [link] => Ok(Command::Sheet(link.to_string())),
                _ => Err("usage: sheet <share-link>".to_string()),
            },
            "connect" => match args.as_slice() {
                [host, port, database, user, password] => {
                    let port: u16 = port
                        .parse()
                        .map_err(|_| format!("invalid port: {port}"))?;
                    Ok(Command::Connect {
                        host: host.to_string(),
                        port,
                        database: database.to_string(),
                        user: user.to_string(),
                        password: password.to_string(),
                    })
                }
                _ => Err("usage: connect <host> <port> <database> <user> <password>".to_string()),
            },
            "schemas" => Ok(Command::Schemas),
            "use" => match args.as_slice() {
                [schema] => Ok(Command::Use(schema.to_string())),
                _ => Err("usage: use <schema>".to_string()),
            },
            "tables" => Ok(Command::Tables),
            "load" => match args.as_slice() {
                [table] => Ok(Command::Load(table.to_string())),
                _ => Err("usage: load <table>".to_string()),
            },
            "sample" => match args.as_slice() {
                [] => Ok(Command::Sample(10)),
                [n] => n
                    .parse()
                    .map(Command::Sample)
                    .map_err(|_| format!("invalid row count: {n}")),
                _ => Err("usage: sample [rows]".to_string()),
            },
            "analyze" => Ok(Command::Analyze),
            "reset" => Ok(Command::Reset),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

/// Run one command against the session.
pub async fn dispatch(command: Command, session: &mut Session) -> Result<(), LensError> {
    match command {
        Command::Open(path) => load::open_file(session, &path),
        Command::Sheet(link) => load::open_sheet(session, &link).await,
        Command::Connect {
            host,
            port,
            database,
            user,
            password,
        } => database::connect(session, host, port, database, user, password).await,
        Command::Schemas => database::schemas(session).await,
        Command::Use(schema) => database::use_schema(session, schema),
        Command::Tables => database::tables(session).await,
        Command::Load(table) => database::load_table(session, &table).await,
        Command::Sample(rows) => analyze::sample(session, rows),
        Command::Analyze => analyze::analyze(session),
        Command::Reset => analyze::reset(session),
        Command::Status => analyze::status(session),
        Command::Help => {
            println!("{}", help_text());
            Ok(())
        }
        // Quit is handled by the REPL loop before dispatch
        Command::Quit => Ok(()),
    }
}

pub fn help_text() -> &'static str {
    "Commands:\n\
  open <file.csv>                              load a CSV file\n\
  sheet <share-link>                           load a shared spreadsheet\n\
  connect <host> <port> <db> <user> <pass>     open a PostgreSQL connection\n\
  schemas                                      list schemas\n\
  use <schema>                                 select the active schema\n\
  tables                                       list tables in the active schema\n\
  load <table>                                 load a table from the active schema\n\
  sample [rows]                                show the first rows of the dataset\n\
  analyze                                      generate the profiling report\n\
  reset                                        clear the cached report path\n\
  status                                       show session state\n\
  help                                         show this help\n\
  quit                                         leave the shell"
}
