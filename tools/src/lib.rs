use std::error::Error;
use std::fmt::Display;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use env_logger::Env;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Debug)]
pub struct ErrorMessage(pub String);
impl std::error::Error for ErrorMessage {}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Log at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

/// Read a whole file, or stdin when the path is `-`.
pub fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = vec![];
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    std::fs::read(Path::new(path)).map_err(|e| ErrorMessage(format!("{}: {}", path, e)).into())
}

/// Write `bytes` to a new file, or to stdout when the path is `-`.
pub fn write_output(path: &str, bytes: &[u8]) -> Result<()> {
    if path == "-" {
        let mut out = std::io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()?;
        return Ok(());
    }

    let mut file = std::fs::File::create(Path::new(path))
        .map_err(|e| ErrorMessage(format!("{}: {}", path, e)))?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Parse a millisecond count given on the command line.
pub fn parse_millis(value: &str) -> Result<Duration> {
    let ms: u64 = value
        .parse()
        .map_err(|_| ErrorMessage(format!("not a number of milliseconds: {}", value)))?;
    Ok(Duration::from_millis(ms))
}
