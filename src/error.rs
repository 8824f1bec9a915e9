use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnakeError {
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("the terminal is {width}x{height}, the field needs at least {needed}x{needed}")]
    TerminalTooSmall { width: u16, height: u16, needed: u16 },

    #[error("could not open log file {path}: {source}")]
    LogFile { path: String, source: std::io::Error },
}

pub type SnakeResult<T> = Result<T, SnakeError>;
