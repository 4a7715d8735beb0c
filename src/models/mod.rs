//! Data models for Alexandria

pub mod book;
pub mod borrow;
pub mod category;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookStatus, BookSummary};
pub use borrow::{Borrow, CreateBorrow};
pub use category::Category;
pub use user::{Capability, Role, User, UserClaims};
