mod api;
mod link;
pub mod timestamp;

pub use api::{CreateUrlRequest, CreateUrlResponse, LinkResponse, UpdateUrlRequest};
pub use link::{LinkRecord, NewLink};
