pub mod casecode;
pub mod collaborator;
pub mod command;
pub mod dialogue;
pub mod dialogues;
pub mod error;
pub mod hayat;
pub mod matching;
pub mod mothers;
pub mod normalize;
pub mod phone;
pub mod replies;
pub mod requests;
pub mod responses;
pub mod sms;
pub mod store;
pub mod volunteers;

pub mod types;

pub use crate::error::HayatError;
pub use crate::hayat::Hayat;
pub use crate::store::Store;
