//! AniList API client.
//!
//! Configuration can be set via environment variables:
//! - `ANILIST_URL`: GraphQL endpoint (default: https://graphql.anilist.co)
//! - `ANILIST_TIMEOUT`: Request timeout in seconds (default: 30)

use crate::models::media::{MetadataCandidate, TitleVariants};
use crate::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://graphql.anilist.co";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PER_PAGE: u32 = 10;

const SEARCH_QUERY: &str = r#"
query ($search: String, $perPage: Int) {
  Page(page: 1, perPage: $perPage) {
    media(search: $search, type: ANIME) {
      id
      title { romaji english native }
      format
      episodes
      seasonYear
      coverImage { large medium }
    }
  }
}
"#;

/// AniList client configuration.
#[derive(Debug, Clone)]
pub struct AniListConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub per_page: u32,
}

impl AniListConfig {
    /// Create configuration from environment variables.
    /// Falls back to defaults if not set.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ANILIST_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("ANILIST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            timeout_secs,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Default for AniListConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// AniList GraphQL client.
pub struct AniListClient {
    config: AniListConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: SearchVariables<'a>,
}

#[derive(Debug, Serialize)]
struct SearchVariables<'a> {
    search: &'a str,
    #[serde(rename = "perPage")]
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<SearchData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(rename = "Page")]
    page: SearchPage,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    media: Vec<AniListMedia>,
}

/// A media item as returned by AniList.
#[derive(Debug, Deserialize)]
pub struct AniListMedia {
    pub id: u64,
    pub title: AniListTitle,
    pub format: Option<String>,
    pub episodes: Option<u32>,
    #[serde(rename = "seasonYear")]
    pub season_year: Option<u32>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<AniListCoverImage>,
}

#[derive(Debug, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AniListCoverImage {
    pub large: Option<String>,
    pub medium: Option<String>,
}

impl From<AniListMedia> for MetadataCandidate {
    fn from(media: AniListMedia) -> Self {
        MetadataCandidate {
            id: media.id,
            title: TitleVariants {
                romaji: media.title.romaji,
                english: media.title.english,
                native: media.title.native,
            },
            format: media.format,
            episodes: media.episodes,
            season_year: media.season_year,
            cover_image: media.cover_image.and_then(|c| c.large.or(c.medium)),
        }
    }
}

impl AniListClient {
    /// Create a new client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(AniListConfig::default())
    }

    /// Create a new client with custom configuration.
    pub fn with_config(config: AniListConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Search anime by title. Results keep AniList's relevance order and may
    /// be empty.
    pub async fn search(&self, query: &str) -> Result<Vec<MetadataCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!("Searching AniList for {:?}", query);

        let request = GraphQlRequest {
            query: SEARCH_QUERY,
            variables: SearchVariables {
                search: query,
                per_page: self.config.per_page,
            },
        };

        let resp = self
            .client
            .post(&self.config.base_url)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(crate::Error::MetadataSearchError(format!(
                "AniList returned HTTP {}",
                resp.status()
            )));
        }

        let body: GraphQlResponse = resp.json().await?;
        let candidates = parse_search_response(body)?;
        tracing::info!("AniList returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

fn parse_search_response(body: GraphQlResponse) -> Result<Vec<MetadataCandidate>> {
    if let Some(error) = body.errors.first() {
        return Err(crate::Error::MetadataSearchError(error.message.clone()));
    }

    Ok(body
        .data
        .map(|d| d.page.media.into_iter().map(MetadataCandidate::from).collect())
        .unwrap_or_default())
}
