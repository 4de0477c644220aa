pub mod comic;
pub mod user;
