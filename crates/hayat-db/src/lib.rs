pub mod dialogue_repo;
pub mod mother_repo;
pub mod request_repo;
pub mod response_repo;
pub mod schema;
pub mod sequence;
pub mod store;
pub mod util;
pub mod volunteer_repo;

pub use store::DbStore;
