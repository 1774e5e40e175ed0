#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid fixture: {0}")]
    Fixture(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Content store error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
