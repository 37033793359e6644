//! Note serialization: front matter followed by a Markdown body.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shiori_api::{MediaExtent, MediaRecord};

use super::fields::{
    format_release_date, format_season, format_source, main_studio, or_unknown, watch_time,
};
use super::text::{compact_genre, normalize_description};
use crate::error::ShioriError;
use crate::models::UserAnnotation;

/// Which field set a note carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentVariant {
    /// Status, title, score, genres, cover, link and description.
    Minimal,
    /// Everything: release data, lengths, studio, season, staff and characters.
    #[default]
    Extended,
}

impl fmt::Display for DocumentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimal => f.write_str("minimal"),
            Self::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for DocumentVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "extended" => Ok(Self::Extended),
            other => Err(format!(
                "unknown document variant {other:?} (expected minimal or extended)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub variant: DocumentVariant,
    pub wrap_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            variant: DocumentVariant::Extended,
            wrap_width: 100,
        }
    }
}

/// Resolve the display title, failing if the record has none.
pub fn display_title(record: &MediaRecord) -> Result<&str, ShioriError> {
    record
        .title
        .preferred()
        .ok_or_else(|| ShioriError::MalformedRecord(format!("media {} has no title", record.id)))
}

/// Build the full note text.
///
/// `cover` is the file name of the downloaded cover, or `None` if the download failed.
pub fn render_document(
    record: &MediaRecord,
    annotation: &UserAnnotation,
    cover: Option<&str>,
    options: &RenderOptions,
) -> Result<String, ShioriError> {
    let note = Note {
        title: display_title(record)?,
        record,
        annotation,
        cover: cover.unwrap_or_default(),
        options,
    };
    Ok(note.to_string())
}

/// A record paired with everything needed to print it.
struct Note<'a> {
    title: &'a str,
    record: &'a MediaRecord,
    annotation: &'a UserAnnotation,
    cover: &'a str,
    options: &'a RenderOptions,
}

impl Note<'_> {
    fn extended(&self) -> bool {
        self.options.variant == DocumentVariant::Extended
    }

    fn score(&self) -> String {
        self.annotation
            .score
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    fn write_front_matter(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        let category = record.category();
        let genres: Vec<String> = record.genres.iter().map(|g| compact_genre(g)).collect();

        writeln!(f, "---")?;
        writeln!(f, "status: {}", self.annotation.status.label(category))?;
        writeln!(f, "title: \"{}\"", escape_quoted(self.title))?;
        write_field(f, "score", &self.score())?;
        writeln!(f, "genres: [{}]", genres.join(", "))?;
        if self.extended() {
            writeln!(f, "release_date: {}", format_release_date(record.start_date.as_ref()))?;
            match record.extent {
                MediaExtent::Anime { episodes, duration } => {
                    writeln!(f, "episodes: {}", or_unknown(episodes))?;
                    writeln!(f, "episode_duration: {}", or_unknown(duration))?;
                    writeln!(f, "watch_time: {}", or_unknown(watch_time(episodes, duration)))?;
                }
                MediaExtent::Manga { chapters, volumes } => {
                    writeln!(f, "chapters: {}", or_unknown(chapters))?;
                    writeln!(f, "volumes: {}", or_unknown(volumes))?;
                }
            }
            writeln!(f, "source: {}", format_source(record.source.as_deref()))?;
        }
        write_field(f, "cover", self.cover)?;
        writeln!(f, "anilist_url: {}", record.site_url)?;
        writeln!(f, "media_type: {}", category.as_str())?;
        writeln!(f, "---")
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let score = self.score();
        let shown = if score.is_empty() { "-" } else { score.as_str() };
        writeln!(f, "### **Score**: {shown}")?;
        writeln!(f, "![[{}]]", self.cover)?;
        writeln!(f)?;
        writeln!(f, "## Description")?;
        writeln!(
            f,
            "{}",
            normalize_description(self.record.description.as_deref(), self.options.wrap_width)
        )
    }

    fn write_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;

        writeln!(f)?;
        writeln!(f, "---")?;
        if let MediaExtent::Anime { .. } = record.extent {
            writeln!(f, "### **Studio**: {}", main_studio(&record.studios))?;
            writeln!(
                f,
                "### **Season**: {}",
                format_season(record.season.as_deref(), record.season_year)
            )?;
        }
        writeln!(f, "### **Released**: {}", format_release_date(record.start_date.as_ref()))?;
        writeln!(f, "### **Source**: {}", format_source(record.source.as_deref()))?;
        writeln!(f, "---")?;

        writeln!(f, "### **Staff**")?;
        writeln!(f)?;
        for member in &record.staff {
            writeln!(f, "#### {} - *{}*", member.name, member.role)?;
            writeln!(f, "![]({})", member.image_url.as_deref().unwrap_or_default())?;
            writeln!(f)?;
        }

        writeln!(f, "---")?;
        writeln!(f, "### Characters")?;
        writeln!(f)?;
        for character in &record.characters {
            writeln!(f, "#### {}", character.name)?;
            writeln!(f, "![]({})", character.image_url.as_deref().unwrap_or_default())?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Note<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_front_matter(f)?;
        writeln!(f)?;
        self.write_summary(f)?;
        if self.extended() {
            self.write_details(f)?;
        }
        Ok(())
    }
}

/// `key: value`, or a bare `key:` (YAML null) when the value is empty.
fn write_field(f: &mut fmt::Formatter<'_>, key: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        writeln!(f, "{key}:")
    } else {
        writeln!(f, "{key}: {value}")
    }
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
