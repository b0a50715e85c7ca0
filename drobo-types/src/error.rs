pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField {
        field: String,
        value: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}
