pub mod handlers;
pub mod requests;
