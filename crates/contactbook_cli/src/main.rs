//! Interactive contact book entry point.
//!
//! # Responsibility
//! - Build store and logging configuration from the environment.
//! - Open the book and hand stdin/stdout to the menu session.

mod input;
mod menu;

use contactbook_core::{
    core_version, default_log_level, init_logging, ContactBook, FlatFileStore, LoadStatus,
    StoreConfig,
};
use menu::{Session, SessionEnd};
use std::env;
use std::io;
use std::process::ExitCode;

const DATA_FILE_ENV: &str = "CONTACTBOOK_DATA_FILE";
const LOG_LEVEL_ENV: &str = "CONTACTBOOK_LOG_LEVEL";
const LOG_DIR_ENV: &str = "CONTACTBOOK_LOG_DIR";

fn main() -> ExitCode {
    let level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    let log_dir = env::var(LOG_DIR_ENV).unwrap_or_else(|_| {
        env::temp_dir()
            .join("contactbook-logs")
            .to_string_lossy()
            .into_owned()
    });
    if let Err(err) = init_logging(&level, &log_dir) {
        eprintln!("logging disabled: {err}");
    }

    let config = match env::var_os(DATA_FILE_ENV) {
        Some(path) => StoreConfig::with_data_file(path),
        None => StoreConfig::default(),
    };
    let store = match FlatFileStore::new(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut book = match ContactBook::open(store) {
        Ok(book) => book,
        Err(err) => {
            eprintln!("error: could not open `{}`: {err}", config.data_file.display());
            return ExitCode::FAILURE;
        }
    };

    println!("contactbook {}", core_version());
    match book.load_status() {
        LoadStatus::Loaded { contacts, meetings } => {
            println!("Loaded {contacts} contacts and {meetings} meetings.");
        }
        LoadStatus::Missing => println!("Starting with an empty contact book."),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match Session::new(&mut book, stdin.lock(), stdout.lock()).run() {
        Ok(SessionEnd::Quit { flushed: true }) => ExitCode::SUCCESS,
        Ok(SessionEnd::InputClosed { flushed: true }) => {
            eprintln!("input closed; data saved");
            ExitCode::FAILURE
        }
        Ok(SessionEnd::Quit { flushed: false } | SessionEnd::InputClosed { flushed: false }) => {
            eprintln!("error: data could not be saved");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
