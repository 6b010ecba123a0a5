pub mod request;
pub mod response;

pub use request::{StorageMode, UploadRequest};
pub use response::UploadOutcome;
