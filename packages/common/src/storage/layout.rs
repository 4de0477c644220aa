/// Subdirectory holding banner images.
pub const BANNERS_DIR: &str = "banners";
/// Subdirectory holding the cover image.
pub const COVER_DIR: &str = "cover";
/// Subdirectory reserved for chapter pages.
pub const CHAPTERS_DIR: &str = "chapters";

const COVER_FILE: &str = "cover.jpg";
const BANNER_FILE: &str = "banner.jpg";

/// The two images every catalog entry carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Cover,
    Banner,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Banner => "banner",
        }
    }

    /// Fixed filename of the image inside its subdirectory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Cover => COVER_FILE,
            Self::Banner => BANNER_FILE,
        }
    }

    fn dir(&self) -> &'static str {
        match self {
            Self::Cover => COVER_DIR,
            Self::Banner => BANNERS_DIR,
        }
    }
}

/// Media keys for one catalog entry, derived from its alternative name.
///
/// ```text
/// <alternative_name>/
///     banners/banner.jpg
///     cover/cover.jpg
///     chapters/
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ComicLayout<'a> {
    alternative_name: &'a str,
}

impl<'a> ComicLayout<'a> {
    pub fn new(alternative_name: &'a str) -> Self {
        Self { alternative_name }
    }

    /// Key of the entry's root directory.
    pub fn root(&self) -> &'a str {
        self.alternative_name
    }

    /// Keys of the subdirectories created for every entry.
    pub fn directories(&self) -> [String; 3] {
        [BANNERS_DIR, COVER_DIR, CHAPTERS_DIR].map(|dir| format!("{}/{dir}", self.root()))
    }

    /// Key of the given image file.
    pub fn image(&self, kind: ImageKind) -> String {
        format!("{}/{}/{}", self.root(), kind.dir(), kind.file_name())
    }
}
