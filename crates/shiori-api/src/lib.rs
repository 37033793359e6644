pub mod anilist;
pub mod models;
pub mod retry;
pub mod traits;

pub use anilist::{AniListClient, AniListError, ClientConfig};
pub use models::{
    Candidate, Category, CharacterCredit, FuzzyDate, MediaExtent, MediaRecord, MediaTitle,
    StaffCredit, StudioCredit,
};
pub use retry::RetryPolicy;
pub use traits::MetadataService;
