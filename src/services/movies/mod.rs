//! Movie lookup and the OTT platforms carrying a title.
//!
//! Search goes to OMDb; the platform list comes from a text-generation API and
//! is best effort: a failed lookup leaves the list empty.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Movie, MovieResult},
};

pub mod gemini;
pub mod omdb;

pub use gemini::GeminiProviderLookup;
pub use omdb::OmdbMovieSearch;

/// Searches movies by (fuzzy) title
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieSearcher: Send + Sync {
    async fn search(&self, title: &str) -> AppResult<Vec<MovieResult>>;
}

/// Reports which OTT platforms carry a title
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderLookup: Send + Sync {
    async fn providers_for(&self, title: &str) -> AppResult<Vec<String>>;
}

/// Turns free-form provider text such as `"**Netflix**, Prime Video,"` into
/// a clean list of names
pub fn parse_providers(text: &str) -> Vec<String> {
    text.replace("**", "")
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Attaches providers to a movie, falling back to an empty list on failure
pub async fn with_providers(lookup: Option<&dyn ProviderLookup>, movie: Movie) -> MovieResult {
    let providers = match lookup {
        Some(lookup) => match lookup.providers_for(&movie.title).await {
            Ok(providers) => providers,
            Err(e) => {
                tracing::warn!(error = %e, title = %movie.title, "Provider lookup failed");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    MovieResult { movie, providers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn movie(title: &str) -> Movie {
        Movie {
            title: title.to_string(),
            year: Some("2010".to_string()),
            genre: None,
            plot: None,
            actors: None,
            imdb_rating: None,
            poster: None,
        }
    }

    #[test]
    fn test_parse_providers_strips_markup() {
        assert_eq!(
            parse_providers("**Netflix**, Prime Video ,, JioCinema\n"),
            vec!["Netflix", "Prime Video", "JioCinema"]
        );
    }

    #[test]
    fn test_parse_providers_empty() {
        assert!(parse_providers("").is_empty());
        assert!(parse_providers(" , ** ,").is_empty());
    }

    #[tokio::test]
    async fn test_with_providers_uses_lookup() {
        let mut lookup = MockProviderLookup::new();
        lookup
            .expect_providers_for()
            .withf(|title: &str| title == "Inception")
            .returning(|_| Ok(vec!["Netflix".to_string()]));

        let result = with_providers(Some(&lookup), movie("Inception")).await;
        assert_eq!(result.providers, vec!["Netflix"]);
    }

    #[tokio::test]
    async fn test_with_providers_swallows_failure() {
        let mut lookup = MockProviderLookup::new();
        lookup
            .expect_providers_for()
            .returning(|_| Err(AppError::ExternalApi("quota".to_string())));

        let result = with_providers(Some(&lookup), movie("Inception")).await;
        assert!(result.providers.is_empty());
        assert_eq!(result.movie.title, "Inception");

        let result = with_providers(None, movie("Inception")).await;
        assert!(result.providers.is_empty());
    }
}
