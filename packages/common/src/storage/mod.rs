mod error;
mod layout;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemMediaStore;
pub use layout::{ComicLayout, ImageKind};
pub use traits::{BoxReader, MediaStore};
