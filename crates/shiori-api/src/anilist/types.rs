use serde::{Deserialize, Deserializer};

use super::error::AniListError;
use crate::models::{
    Candidate, Category, CharacterCredit, FuzzyDate, MediaExtent, MediaRecord, MediaTitle,
    StaffCredit, StudioCredit,
};

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// Joined error messages, for diagnostics when `data` is missing.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            "response has no data".into()
        } else {
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

// ── Search query ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: PageData,
}

#[derive(Debug, Deserialize)]
pub struct PageData {
    pub media: Vec<SearchMedia>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMedia {
    pub id: u64,
    pub title: Option<AniListTitle>,
}

// ── Detail query ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct AniListMedia {
    pub id: u64,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub title: Option<AniListTitle>,
    pub description: Option<String>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<CoverImage>,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "siteUrl")]
    pub site_url: Option<String>,
    pub studios: Option<StudioConnection>,
    pub staff: Option<StaffConnection>,
    pub characters: Option<CharacterConnection>,
    #[serde(rename = "startDate")]
    pub start_date: Option<AniListDate>,
    pub season: Option<String>,
    #[serde(rename = "seasonYear")]
    pub season_year: Option<u32>,
    pub source: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    pub episodes: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    pub chapters: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    pub volumes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoverImage {
    #[serde(rename = "extraLarge")]
    pub extra_large: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudioConnection {
    #[serde(default)]
    pub edges: Vec<StudioEdge>,
}

#[derive(Debug, Deserialize)]
pub struct StudioEdge {
    #[serde(rename = "isMain", default)]
    pub is_main: bool,
    pub node: Option<NamedNode>,
}

#[derive(Debug, Deserialize)]
pub struct NamedNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StaffConnection {
    #[serde(default)]
    pub edges: Vec<StaffEdge>,
}

#[derive(Debug, Deserialize)]
pub struct StaffEdge {
    pub role: Option<String>,
    pub node: Option<PersonNode>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterConnection {
    #[serde(default)]
    pub edges: Vec<CharacterEdge>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterEdge {
    pub node: Option<PersonNode>,
}

/// Staff and character nodes share the same name/image shape.
#[derive(Debug, Deserialize)]
pub struct PersonNode {
    pub name: Option<PersonName>,
    pub image: Option<PersonImage>,
}

#[derive(Debug, Deserialize)]
pub struct PersonName {
    pub full: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PersonImage {
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AniListDate {
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// Accept only JSON integers; strings, floats and nulls all become `None`.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok()))
}

// ── Conversions ──────────────────────────────────────────────────

impl From<AniListTitle> for MediaTitle {
    fn from(t: AniListTitle) -> Self {
        MediaTitle {
            romaji: t.romaji,
            english: t.english,
            native: t.native,
        }
    }
}

impl PersonNode {
    fn into_parts(self) -> (String, Option<String>) {
        let name = self.name.and_then(|n| n.full).unwrap_or_default();
        let image = self.image.and_then(|i| i.large);
        (name, image)
    }
}

impl SearchMedia {
    pub fn into_candidate(self) -> Candidate {
        Candidate {
            id: self.id,
            title: self.title.map(MediaTitle::from).unwrap_or_default(),
        }
    }
}

impl AniListMedia {
    /// Convert into a [`MediaRecord`], rejecting records without a type or any usable title.
    pub fn into_record(self) -> Result<MediaRecord, AniListError> {
        let category = self
            .media_type
            .as_deref()
            .and_then(|t| t.parse::<Category>().ok())
            .ok_or_else(|| {
                AniListError::Shape(format!("media {} has no usable type", self.id))
            })?;

        let title = self.title.map(MediaTitle::from).unwrap_or_default();
        if title.preferred().is_none() {
            return Err(AniListError::Shape(format!("media {} has no title", self.id)));
        }

        let extent = match category {
            Category::Anime => MediaExtent::Anime {
                episodes: self.episodes,
                duration: self.duration,
            },
            Category::Manga => MediaExtent::Manga {
                chapters: self.chapters,
                volumes: self.volumes,
            },
        };

        let site_url = self
            .site_url
            .unwrap_or_else(|| format!("https://anilist.co/{}/{}", category.as_str(), self.id));

        let studios = self
            .studios
            .map(|c| c.edges)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| {
                edge.node.map(|node| StudioCredit {
                    name: node.name,
                    is_main: edge.is_main,
                })
            })
            .collect();

        let staff = self
            .staff
            .map(|c| c.edges)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| {
                let (name, image_url) = edge.node?.into_parts();
                Some(StaffCredit {
                    name,
                    role: edge.role.unwrap_or_default(),
                    image_url,
                })
            })
            .collect();

        let characters = self
            .characters
            .map(|c| c.edges)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| {
                let (name, image_url) = edge.node?.into_parts();
                Some(CharacterCredit { name, image_url })
            })
            .collect();

        Ok(MediaRecord {
            id: self.id,
            title,
            description: self.description,
            cover_url: self
                .cover_image
                .and_then(|c| c.extra_large.or(c.large)),
            genres: self.genres.unwrap_or_default(),
            staff,
            characters,
            studios,
            start_date: self.start_date.map(|d| FuzzyDate {
                year: d.year,
                month: d.month,
                day: d.day,
            }),
            season: self.season,
            season_year: self.season_year,
            source: self.source,
            site_url,
            extent,
        })
    }
}
