use crate::types::enums::RequestStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotherError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum VolunteerError {
    #[error("volunteer not registered")]
    NotRegistered,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("case not found")]
    NotFound,
    #[error("invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("not authorized for this case")]
    Unauthorized,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("dialogue not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum HayatError {
    #[error(transparent)]
    Mother(#[from] MotherError),
    #[error(transparent)]
    Volunteer(#[from] VolunteerError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Dialogue(#[from] DialogueError),
    #[error("internal error: {message}")]
    Internal { message: String },
}
