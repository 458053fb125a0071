use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatLifeError {
    #[error("I don't know a cat called '{0}'.")]
    UnknownCat(String),

    #[error("I don't know a room called '{0}'.")]
    UnknownRoom(String),

    #[error("I don't understand '{0}'. Type 'help' for options.")]
    UnknownCommand(String),

    #[error("Not enough energy: {action} needs {needed}, you have {available}.")]
    InsufficientEnergy {
        action: &'static str,
        needed: u32,
        available: u32,
    },

    #[error("{0} has already been fed.")]
    AlreadyFed(String),

    #[error("{0}")]
    InvalidAction(String),

    #[error("The game is over. Start a new game to play again!")]
    GameOver,

    #[error("The day is over. Start a new day first.")]
    DayOver,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CatLifeError>;
