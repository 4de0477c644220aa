pub mod auth;
pub mod comic;
pub mod shared;
