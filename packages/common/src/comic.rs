use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication format of a catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ComicType {
    Manga,
    /// Korean and Chinese vertical-scroll comics (manhwa, manhua).
    Webtoon,
    Comic,
    #[serde(rename = "Life Comic")]
    LifeComic,
    #[serde(rename = "Web Comic")]
    WebComic,
    Manuscript,
}

impl ComicType {
    pub const ALL: &'static [ComicType] = &[
        Self::Manga,
        Self::Webtoon,
        Self::Comic,
        Self::LifeComic,
        Self::WebComic,
        Self::Manuscript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manga => "Manga",
            Self::Webtoon => "Webtoon",
            Self::Comic => "Comic",
            Self::LifeComic => "Life Comic",
            Self::WebComic => "Web Comic",
            Self::Manuscript => "Manuscript",
        }
    }
}

impl fmt::Display for ComicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComicType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "manga" => Ok(Self::Manga),
            "webtoon" | "manhwa" | "manhva" | "manhua" => Ok(Self::Webtoon),
            "comic" => Ok(Self::Comic),
            "lifecomic" => Ok(Self::LifeComic),
            "webcomic" => Ok(Self::WebComic),
            "manuscript" => Ok(Self::Manuscript),
            _ => Err(ParseEnumError::new("type_comics", s, Self::ALL)),
        }
    }
}

/// Age rating band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
pub enum PegiRating {
    #[serde(rename = "3+")]
    Three,
    #[serde(rename = "6+")]
    Six,
    #[serde(rename = "12+")]
    Twelve,
    #[serde(rename = "16+")]
    Sixteen,
    #[serde(rename = "18+")]
    Eighteen,
}

impl PegiRating {
    pub const ALL: &'static [PegiRating] = &[
        Self::Three,
        Self::Six,
        Self::Twelve,
        Self::Sixteen,
        Self::Eighteen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Three => "3+",
            Self::Six => "6+",
            Self::Twelve => "12+",
            Self::Sixteen => "16+",
            Self::Eighteen => "18+",
        }
    }

    /// Minimum reader age for this band.
    pub fn min_age(&self) -> u8 {
        match self {
            Self::Three => 3,
            Self::Six => 6,
            Self::Twelve => 12,
            Self::Sixteen => 16,
            Self::Eighteen => 18,
        }
    }
}

impl fmt::Display for PegiRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PegiRating {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "16" is accepted as shorthand for "16+".
        match s.trim().trim_end_matches('+') {
            "3" => Ok(Self::Three),
            "6" => Ok(Self::Six),
            "12" => Ok(Self::Twelve),
            "16" => Ok(Self::Sixteen),
            "18" => Ok(Self::Eighteen),
            _ => Err(ParseEnumError::new("pegi", s, Self::ALL)),
        }
    }
}

/// Release or translation lifecycle state.
///
/// The canonical labels are the ones the catalog has always stored; the
/// English variant names are accepted on input as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ReleaseStatus {
    #[serde(rename = "В процессе")]
    Ongoing,
    #[serde(rename = "Окончено")]
    Finished,
    #[serde(rename = "Приостановлено")]
    Paused,
    #[serde(rename = "Заброшено")]
    Abandoned,
    #[serde(rename = "Анонсировано")]
    Announced,
}

impl ReleaseStatus {
    pub const ALL: &'static [ReleaseStatus] = &[
        Self::Ongoing,
        Self::Finished,
        Self::Paused,
        Self::Abandoned,
        Self::Announced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "В процессе",
            Self::Finished => "Окончено",
            Self::Paused => "Приостановлено",
            Self::Abandoned => "Заброшено",
            Self::Announced => "Анонсировано",
        }
    }

    /// Returns true if no further chapters are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Abandoned)
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::ALL.iter().find(|v| v.as_str() == trimmed) {
            return Ok(*status);
        }
        match trimmed.to_lowercase().as_str() {
            "ongoing" | "started" => Ok(Self::Ongoing),
            "finished" | "completed" => Ok(Self::Finished),
            "paused" => Ok(Self::Paused),
            "abandoned" => Ok(Self::Abandoned),
            "announced" => Ok(Self::Announced),
            _ => Err(ParseEnumError::new("status", s, Self::ALL)),
        }
    }
}

/// Error when parsing an invalid enumeration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    field: &'static str,
    invalid: String,
    valid: Vec<&'static str>,
}

impl ParseEnumError {
    fn new<T: EnumLabel>(field: &'static str, invalid: &str, all: &[T]) -> Self {
        Self {
            field,
            invalid: invalid.to_string(),
            valid: all.iter().map(EnumLabel::label).collect(),
        }
    }

    /// Name of the field the value was supplied for.
    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.field,
            self.invalid,
            self.valid.join(", ")
        )
    }
}

impl std::error::Error for ParseEnumError {}

trait EnumLabel {
    fn label(&self) -> &'static str;
}

impl EnumLabel for ComicType {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl EnumLabel for PegiRating {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl EnumLabel for ReleaseStatus {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}
