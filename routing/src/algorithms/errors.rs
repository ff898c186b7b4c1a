use common::types::errors::UnknownStopIdError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::Display;

pub type QueryResult<O> = Result<O, QueryError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    UnknownStop(String),
}

impl From<UnknownStopIdError> for QueryError {
    fn from(err: UnknownStopIdError) -> Self {
        QueryError::UnknownStop(err.0)
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueryError::UnknownStop(stop_id) => write!(f, "{}", UnknownStopIdError(stop_id.clone())),
        }
    }
}

impl Serialize for QueryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
