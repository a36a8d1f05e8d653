use serde::{Deserialize, Serialize};

/// Movie facts returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub plot: Option<String>,
    pub actors: Option<String>,
    pub imdb_rating: Option<String>,
    pub poster: Option<String>,
}

/// A movie together with the OTT platforms reported to carry it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResult {
    pub movie: Movie,
    pub providers: Vec<String>,
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw response of an OMDb `s=` search
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchHit>,
}

impl OmdbSearchResponse {
    pub fn found(&self) -> bool {
        self.response != "False"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchHit {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
}

/// Raw response of an OMDb `i=` detail lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbMovieDetails {
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
}

impl From<OmdbMovieDetails> for Movie {
    fn from(details: OmdbMovieDetails) -> Self {
        Movie {
            title: details.title,
            year: details.year,
            genre: details.genre,
            plot: details.plot,
            actors: details.actors,
            imdb_rating: details.imdb_rating,
            poster: details.poster,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omdb_search_not_found() {
        let json = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.found());
        assert!(resp.search.is_empty());
    }

    #[test]
    fn test_omdb_details_to_movie() {
        let json = r#"{
            "Title": "Inception",
            "Year": "2010",
            "Genre": "Action, Adventure, Sci-Fi",
            "Plot": "A thief who steals corporate secrets",
            "Actors": "Leonardo DiCaprio",
            "imdbRating": "8.8",
            "Poster": "https://example.com/p.jpg",
            "imdbID": "tt1375666"
        }"#;

        let details: OmdbMovieDetails = serde_json::from_str(json).unwrap();
        let movie: Movie = details.into();
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.imdb_rating.as_deref(), Some("8.8"));

        let out = serde_json::to_value(&movie).unwrap();
        assert_eq!(out["imdbRating"], "8.8");
    }
}
