//! Service-agnostic media records produced by the metadata client.

use std::fmt;
use std::str::FromStr;

/// Which side of the catalogue a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Anime,
    Manga,
}

impl Category {
    pub const ALL: &[Category] = &[Self::Anime, Self::Manga];

    /// Convert to AniList GraphQL `MediaType` enum value.
    pub fn to_anilist_str(self) -> &'static str {
        match self {
            Self::Anime => "ANIME",
            Self::Manga => "MANGA",
        }
    }

    /// Lowercase identifier, as written into note front matter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Manga => "manga",
        }
    }

    /// Vault sub-folder holding notes of this category.
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Anime => "Anime",
            Self::Manga => "Manga",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Returned when a string names neither anime nor manga.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anime" => Ok(Self::Anime),
            "manga" => Ok(Self::Manga),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// A title with its localized variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

impl MediaTitle {
    /// Best display title: english, then romaji, then native. Blank variants are skipped.
    pub fn preferred(&self) -> Option<&str> {
        [&self.english, &self.romaji, &self.native]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .find(|t| !t.trim().is_empty())
    }
}

/// A short search hit shown to the user before the detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    pub title: MediaTitle,
}

impl Candidate {
    pub fn display_title(&self) -> &str {
        self.title.preferred().unwrap_or("(untitled)")
    }
}

/// A date where month and day may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyDate {
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCredit {
    pub name: String,
    pub role: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterCredit {
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioCredit {
    pub name: String,
    pub is_main: bool,
}

/// Category-specific length information.
///
/// Counts are `None` when the service omits them or sends something that is not a whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaExtent {
    Anime {
        episodes: Option<u32>,
        /// Minutes per episode.
        duration: Option<u32>,
    },
    Manga {
        chapters: Option<u32>,
        volumes: Option<u32>,
    },
}

/// A fully detailed anime or manga record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub id: u64,
    pub title: MediaTitle,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub genres: Vec<String>,
    pub staff: Vec<StaffCredit>,
    pub characters: Vec<CharacterCredit>,
    pub studios: Vec<StudioCredit>,
    pub start_date: Option<FuzzyDate>,
    pub season: Option<String>,
    pub season_year: Option<u32>,
    pub source: Option<String>,
    pub site_url: String,
    pub extent: MediaExtent,
}

impl MediaRecord {
    pub fn category(&self) -> Category {
        match self.extent {
            MediaExtent::Anime { .. } => Category::Anime,
            MediaExtent::Manga { .. } => Category::Manga,
        }
    }
}
