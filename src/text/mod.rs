pub mod cache;
pub mod layout;
