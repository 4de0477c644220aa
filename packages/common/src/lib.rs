pub mod comic;
pub mod slug;
pub mod storage;

pub use comic::{ComicType, ParseEnumError, PegiRating, ReleaseStatus};
