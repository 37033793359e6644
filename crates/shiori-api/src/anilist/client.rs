use reqwest::Client;
use url::Url;

use super::error::AniListError;
use super::types::{GraphQLResponse, MediaResponse, PageResponse, SearchMedia};
use crate::models::{Candidate, Category, MediaRecord};
use crate::retry::{with_retry, RetryPolicy};
use crate::traits::MetadataService;

pub const DEFAULT_API_URL: &str = "https://graphql.anilist.co";

const SEARCH_QUERY: &str = r#"
query ($search: String, $type: MediaType, $perPage: Int) {
    Page(perPage: $perPage) {
        media(search: $search, type: $type) {
            id
            title { romaji english native }
        }
    }
}
"#;

const DETAIL_QUERY: &str = r#"
query ($id: Int, $staffPerPage: Int, $charactersPerPage: Int) {
    Media(id: $id) {
        id
        type
        title { romaji english native }
        description(asHtml: false)
        coverImage { extraLarge large }
        genres
        siteUrl
        studios { edges { isMain node { name } } }
        staff(perPage: $staffPerPage) {
            edges {
                role
                node { name { full } image { large } }
            }
        }
        characters(perPage: $charactersPerPage, sort: [ROLE, RELEVANCE]) {
            edges {
                node { name { full } image { large } }
            }
        }
        startDate { year month day }
        season
        seasonYear
        source
        episodes
        duration
        chapters
        volumes
    }
}
"#;

/// Connection settings for [`AniListClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub page_size: u32,
    pub staff_limit: u32,
    pub character_limit: u32,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default AniList URL is valid"),
            page_size: 10,
            staff_limit: 2,
            character_limit: 3,
            retry: RetryPolicy::default(),
        }
    }
}

/// AniList GraphQL API client. Anonymous: only public queries are issued.
pub struct AniListClient {
    http: Client,
    config: ClientConfig,
}

impl AniListClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(http: Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<GraphQLResponse<T>, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let resp = self
            .http
            .post(self.config.api_url.clone())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(AniListError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        resp.json::<GraphQLResponse<T>>()
            .await
            .map_err(|e| AniListError::Parse(e.to_string()))
    }

    async fn search_once(
        &self,
        category: Category,
        query: &str,
    ) -> Result<Vec<Candidate>, AniListError> {
        let resp: GraphQLResponse<PageResponse> = self
            .graphql_request(
                "Search",
                SEARCH_QUERY,
                serde_json::json!({
                    "search": query,
                    "type": category.to_anilist_str(),
                    "perPage": self.config.page_size,
                }),
            )
            .await?;

        let summary = resp.error_summary();
        let page = resp.data.ok_or(AniListError::Parse(summary))?.page;
        Ok(page
            .media
            .into_iter()
            .take(self.config.page_size as usize)
            .map(SearchMedia::into_candidate)
            .collect())
    }

    async fn fetch_details_once(&self, id: u64) -> Result<MediaRecord, AniListError> {
        let resp: GraphQLResponse<MediaResponse> = self
            .graphql_request(
                "GetMedia",
                DETAIL_QUERY,
                serde_json::json!({
                    "id": id,
                    "staffPerPage": self.config.staff_limit,
                    "charactersPerPage": self.config.character_limit,
                }),
            )
            .await?;

        let summary = resp.error_summary();
        let media = resp
            .data
            .and_then(|d| d.media)
            .ok_or_else(|| AniListError::Shape(format!("no Media for id {id}: {summary}")))?;
        media.into_record()
    }
}

impl MetadataService for AniListClient {
    type Error = AniListError;

    async fn search(
        &self,
        category: Category,
        query: &str,
    ) -> Result<Vec<Candidate>, AniListError> {
        let results = with_retry(&self.config.retry, "Search", || {
            self.search_once(category, query)
        })
        .await?;
        tracing::debug!(count = results.len(), %category, query, "Search complete");
        Ok(results)
    }

    async fn fetch_details(&self, id: u64) -> Result<MediaRecord, AniListError> {
        let record = with_retry(&self.config.retry, "GetMedia", || self.fetch_details_once(id))
            .await?;
        Ok(record)
    }
}
