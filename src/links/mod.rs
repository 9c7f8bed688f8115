//! Slug allocation, resolution and link administration.

pub mod admin;
pub mod allocator;
pub mod destination;
pub mod resolver;
pub mod slug;

mod error;

pub use admin::{AdminContext, LinkAdmin};
pub use allocator::Allocator;
pub use destination::normalize_destination;
pub use error::AllocationError;
pub use resolver::{Outcome, Resolver};
