use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Movie, MovieResult, OmdbMovieDetails, OmdbSearchHit, OmdbSearchResponse},
};

use super::{with_providers, MovieSearcher, ProviderLookup};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

/// Movie search backed by the OMDb API
#[derive(Clone)]
pub struct OmdbMovieSearch {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    providers: Option<Arc<dyn ProviderLookup>>,
}

impl OmdbMovieSearch {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        providers: Option<Arc<dyn ProviderLookup>>,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
            providers,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, params: &[(&str, &str)]) -> AppResult<T> {
        let response = self
            .http_client
            .get(format!("{}/", self.api_url.trim_end_matches('/')))
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, response = %text, "Failed to deserialize OMDb response");
            AppError::ExternalApi(format!("Failed to parse OMDb response: {}", e))
        })
    }

    /// Fuzzy title search; `NotFound` when OMDb has no match
    async fn search_hits(&self, title: &str) -> AppResult<Vec<OmdbSearchHit>> {
        let response: OmdbSearchResponse = self.get(&[("s", title)]).await?;
        if !response.found() || response.search.is_empty() {
            return Err(AppError::NotFound("No movies found".to_string()));
        }
        Ok(response.search)
    }

    async fn movie_details(&self, imdb_id: &str) -> AppResult<Movie> {
        let details: OmdbMovieDetails = self.get(&[("i", imdb_id)]).await?;
        Ok(details.into())
    }

    async fn search_uncached(&self, title: &str) -> AppResult<Vec<MovieResult>> {
        let hits = self.search_hits(title).await?;
        tracing::info!(query = %title, hits = hits.len(), "OMDb search completed");

        let mut tasks = Vec::new();
        for hit in hits {
            let search = self.clone();
            tasks.push(tokio::spawn(async move {
                let movie = search.movie_details(&hit.imdb_id).await?;
                Ok::<_, AppError>(with_providers(search.providers.as_deref(), movie).await)
            }));
        }

        let mut results = Vec::new();
        let mut failures = 0usize;
        for task in tasks {
            match task.await {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Movie detail fetch failed");
                    failures += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                success_count = results.len(),
                error_count = failures,
                "Partial movie detail failure"
            );
        }

        if results.is_empty() {
            return Err(AppError::ExternalApi(
                "Failed to fetch any movie details".to_string(),
            ));
        }

        Ok(results)
    }
}

#[async_trait]
impl MovieSearcher for OmdbMovieSearch {
    async fn search(&self, title: &str) -> AppResult<Vec<MovieResult>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title required".to_string()));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(title.to_string()),
            SEARCH_CACHE_TTL,
            self.search_uncached(title)
        )
    }
}
