use chrono::Utc;
use log::{LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::AppError;
use crate::settings::Settings;

pub const LOG_FILE_NAME: &str = "narrator.log";

// Writes every record to stderr and appends it to a log file.
#[derive(Debug)]
struct SimpleLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

static LOGGER: OnceCell<SimpleLogger> = OnceCell::new();

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_entry = format_entry(record);
        eprint!("{log_entry}");
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(log_entry.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn format_entry(record: &Record) -> String {
    format!(
        "{} {:<5} {} - {}\n",
        Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        record.level(),
        record.target(),
        record.args()
    )
}

// Unknown level names fall back to `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or(LevelFilter::Info)
}

pub fn init(settings: &Settings) -> Result<(), AppError> {
    let log_dir = Path::new(&settings.log_dir);
    create_dir_all(log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))?;
    let level = parse_level(&settings.log_level);

    let logger = LOGGER.get_or_init(|| SimpleLogger {
        level,
        file: Mutex::new(file),
    });

    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
