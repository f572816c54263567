use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("could not encode execution inputs: {0}")]
    Encode(String),
}
