//! Turns a fetched record into a note (plus cover image) inside the vault.
//!
//! Layout under the vault root:
//!
//! ```text
//! <root>/Anime/<Title>.md
//! <root>/Anime/Covers/<Title>.jpg
//! <root>/Manga/<Title>.md
//! <root>/Manga/Covers/<Title>.jpg
//! ```

mod cover;
mod document;
mod fields;
mod text;

use std::path::{Path, PathBuf};

use shiori_api::{Category, MediaRecord};

pub use cover::{CoverDownloader, CoverError};
pub use document::{display_title, render_document, DocumentVariant, RenderOptions};
pub use fields::{format_release_date, format_season, main_studio, watch_time, UNKNOWN};
pub use text::{compact_genre, normalize_description, sanitize_filename, strip_markup, wrap};

use crate::error::ShioriError;
use crate::models::UserAnnotation;

const COVERS_DIR: &str = "Covers";

/// Where a note and its cover live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePaths {
    pub dir: PathBuf,
    pub document: PathBuf,
    pub cover: PathBuf,
    /// File name of the cover, as referenced from the note.
    pub cover_name: String,
}

impl NotePaths {
    pub fn new(root: &Path, category: Category, title: &str) -> Self {
        let stem = sanitize_filename(title);
        let dir = root.join(category.folder_name());
        let cover_name = format!("{stem}.jpg");
        Self {
            document: dir.join(format!("{stem}.md")),
            cover: dir.join(COVERS_DIR).join(&cover_name),
            cover_name,
            dir,
        }
    }
}

/// What a render produced on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNote {
    pub document: PathBuf,
    /// `None` when the cover could not be downloaded.
    pub cover: Option<PathBuf>,
}

/// Writes notes into one vault.
pub struct DocumentRenderer {
    root: PathBuf,
    options: RenderOptions,
    covers: CoverDownloader,
}

impl DocumentRenderer {
    pub fn new(root: PathBuf, options: RenderOptions, covers: CoverDownloader) -> Self {
        Self {
            root,
            options,
            covers,
        }
    }

    /// Render `record` into the vault, overwriting any previous note of the same title.
    ///
    /// A failed cover download is logged and leaves the cover reference empty. Failing to
    /// create the category folder or write the note is an error, and removes the cover
    /// downloaded for it.
    pub async fn render(
        &self,
        record: &MediaRecord,
        annotation: &UserAnnotation,
    ) -> Result<RenderedNote, ShioriError> {
        let title = display_title(record)?;
        let paths = NotePaths::new(&self.root, record.category(), title);

        std::fs::create_dir_all(&paths.dir)
            .map_err(ShioriError::fs("create directory", &paths.dir))?;

        let cover = match self
            .covers
            .download(record.cover_url.as_deref(), &paths.cover)
            .await
        {
            Ok(()) => Some(paths.cover.clone()),
            Err(e) => {
                tracing::warn!(error = %e, title, "Failed to download cover, continuing without it");
                None
            }
        };
        let cover_name = cover.as_ref().map(|_| paths.cover_name.as_str());

        let written =
            render_document(record, annotation, cover_name, &self.options).and_then(|doc| {
                write_atomic(&paths.document, doc.as_bytes())
                    .map_err(ShioriError::fs("write", &paths.document))
            });
        if let Err(e) = written {
            if let Some(cover) = &cover {
                let _ = std::fs::remove_file(cover);
            }
            return Err(e);
        }

        tracing::info!(path = %paths.document.display(), title, "Note saved");
        Ok(RenderedNote {
            document: paths.document,
            cover,
        })
    }
}

/// Write through a temporary sibling and rename, so readers never see a partial file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    if let Err(e) = std::fs::write(&tmp, contents) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    std::fs::rename(&tmp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use shiori_api::{MediaExtent, MediaTitle};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::WatchStatus;

    fn record(cover_url: Option<String>) -> MediaRecord {
        MediaRecord {
            id: 20,
            title: MediaTitle {
                romaji: Some("NARUTO".into()),
                english: Some("Naruto".into()),
                native: None,
            },
            description: None,
            cover_url,
            genres: vec!["Action".into()],
            staff: vec![],
            characters: vec![],
            studios: vec![],
            start_date: None,
            season: None,
            season_year: None,
            source: None,
            site_url: "https://anilist.co/anime/20".into(),
            extent: MediaExtent::Anime {
                episodes: Some(220),
                duration: Some(23),
            },
        }
    }

    fn renderer(root: &Path) -> DocumentRenderer {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        DocumentRenderer::new(
            root.to_path_buf(),
            RenderOptions::default(),
            CoverDownloader::new(http),
        )
    }

    const ANNOTATION: UserAnnotation = UserAnnotation {
        score: Some(8),
        status: WatchStatus::Completed,
    };

    #[test]
    fn test_note_paths() {
        let paths = NotePaths::new(Path::new("/vault"), Category::Manga, "Fate/Zero");
        assert_eq!(paths.document, PathBuf::from("/vault/Manga/Fate_Zero.md"));
        assert_eq!(paths.cover, PathBuf::from("/vault/Manga/Covers/Fate_Zero.jpg"));
        assert_eq!(paths.cover_name, "Fate_Zero.jpg");
    }

    #[tokio::test]
    async fn test_render_with_cover() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let note = renderer(dir.path())
            .render(&record(Some(format!("{}/20.jpg", server.uri()))), &ANNOTATION)
            .await
            .unwrap();

        assert_eq!(note.document, dir.path().join("Anime").join("Naruto.md"));
        assert_eq!(
            note.cover.as_deref(),
            Some(dir.path().join("Anime/Covers/Naruto.jpg").as_path())
        );
        let doc = std::fs::read_to_string(&note.document).unwrap();
        assert!(doc.contains("\ncover: Naruto.jpg\n"));
        assert!(doc.contains("![[Naruto.jpg]]"));
        assert!(doc.contains("No description available."));
        assert!(!dir.path().join("Anime/Naruto.md.tmp").exists());
    }

    #[tokio::test]
    async fn test_cover_failure_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let note = renderer(dir.path())
            .render(&record(Some(format!("{}/20.jpg", server.uri()))), &ANNOTATION)
            .await
            .unwrap();

        assert!(note.cover.is_none());
        let doc = std::fs::read_to_string(&note.document).unwrap();
        assert!(doc.contains("\ncover:\n"));
        assert!(!dir.path().join("Anime/Covers/Naruto.jpg").exists());
    }

    #[tokio::test]
    async fn test_render_overwrites_existing_note() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderer(dir.path());
        r.render(&record(None), &ANNOTATION).await.unwrap();

        let rescored = UserAnnotation {
            score: Some(10),
            ..ANNOTATION
        };
        let note = r.render(&record(None), &rescored).await.unwrap();
        let doc = std::fs::read_to_string(&note.document).unwrap();
        assert!(doc.contains("\nscore: 10\n"));
        assert!(!doc.contains("\nscore: 8\n"));
    }

    #[tokio::test]
    async fn test_failed_note_write_removes_cover() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Anime/Naruto.md")).unwrap();

        let err = renderer(dir.path())
            .render(&record(Some(format!("{}/20.jpg", server.uri()))), &ANNOTATION)
            .await
            .unwrap_err();

        assert!(matches!(err, ShioriError::Filesystem { .. }));
        assert!(!dir.path().join("Anime/Covers/Naruto.jpg").exists());
        assert!(!dir.path().join("Anime/Naruto.md.tmp").exists());
    }

    #[tokio::test]
    async fn test_long_title_still_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut long = record(None);
        long.title.english = Some("Tensei Shitara ".repeat(20));

        let note = renderer(dir.path())
            .render(&long, &ANNOTATION)
            .await
            .unwrap();

        assert!(note.document.exists());
        let name = note.document.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.len() <= 255);
        assert!(name.ends_with(".md"));
    }

    #[tokio::test]
    async fn test_unwritable_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = renderer(&blocker)
            .render(&record(None), &ANNOTATION)
            .await
            .unwrap_err();
        assert!(matches!(err, ShioriError::Filesystem { .. }));
    }
}
