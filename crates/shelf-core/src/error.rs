use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference error: {0}")]
    Prefs(String),

    #[error("Population error: {0}")]
    Population(String),
}

pub type Result<T> = std::result::Result<T, Error>;
