use shiori_api::Category;

/// Highest score a user can give.
pub const MAX_SCORE: u8 = 10;

/// Where the user stands with a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    Completed,
    InProgress,
    Planning,
}

impl WatchStatus {
    pub const ALL: &[WatchStatus] = &[Self::Completed, Self::InProgress, Self::Planning];

    /// Label written into notes. In-progress reads differently for anime and manga.
    pub fn label(self, category: Category) -> &'static str {
        match (self, category) {
            (Self::Completed, _) => "Completed",
            (Self::InProgress, Category::Anime) => "Watching",
            (Self::InProgress, Category::Manga) => "Reading",
            (Self::Planning, _) => "Planning",
        }
    }

    /// Menu code shown at the status prompt.
    pub fn menu_code(self) -> &'static str {
        match self {
            Self::Completed => "1",
            Self::InProgress => "2",
            Self::Planning => "3",
        }
    }

    /// Map a status menu answer. Anything unrecognised means Planning.
    pub fn from_menu_code(code: &str) -> Self {
        match code.trim() {
            "1" => Self::Completed,
            "2" => Self::InProgress,
            _ => Self::Planning,
        }
    }
}

/// The user's own take on a record: score and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAnnotation {
    pub score: Option<u8>,
    pub status: WatchStatus,
}

/// Parse a free-text score. Only plain digits in `0..=10` count; everything else is no score.
pub fn parse_score(input: &str) -> Option<u8> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input
        .parse::<u32>()
        .ok()
        .filter(|s| *s <= u32::from(MAX_SCORE))
        .and_then(|s| u8::try_from(s).ok())
}
