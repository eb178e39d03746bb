//! Candidate list retrieval.
//!
//! The build pass starts from a newline-delimited list of image URLs hosted
//! remotely. Fetching it is all-or-nothing: a build without the full list is
//! not worth starting.

use crate::config::BuildConfig;
use crate::error::FetchError;
use std::time::Duration;

/// Retrieves and parses the candidate image list.
pub struct ListFetcher {
    url: String,
    client: reqwest::Client,
}

impl ListFetcher {
    /// Create a fetcher for the given list URL, or the configured default
    /// when none is supplied.
    pub fn new(config: &BuildConfig, url_override: Option<&str>) -> Result<Self, FetchError> {
        let url = url_override.unwrap_or(&config.list_url).to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { url, client })
    }

    /// The list URL this fetcher reads from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the list and split it into image URLs, one per line.
    pub async fn fetch(&self) -> Result<Vec<String>, FetchError> {
        tracing::debug!("Fetching candidate list from {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| FetchError::Transport {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        Ok(parse_list(&body))
    }
}

/// Split raw list text into candidate URLs.
///
/// Blank lines are dropped (a trailing newline would otherwise yield an
/// empty URL that can never classify) and CRLF endings are tolerated.
pub fn parse_list(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_one_per_line() {
        let urls = parse_list("http://a.jpg\nhttp://b.jpg\nhttp://c.jpg");
        assert_eq!(urls, vec!["http://a.jpg", "http://b.jpg", "http://c.jpg"]);
    }

    #[test]
    fn test_parse_list_drops_trailing_newline_entry() {
        let urls = parse_list("http://a.jpg\nhttp://b.jpg\n");
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_parse_list_drops_blank_lines() {
        let urls = parse_list("http://a.jpg\n\n\nhttp://b.jpg\n");
        assert_eq!(urls, vec!["http://a.jpg", "http://b.jpg"]);
    }

    #[test]
    fn test_parse_list_handles_crlf() {
        let urls = parse_list("http://a.jpg\r\nhttp://b.jpg\r\n");
        assert_eq!(urls, vec!["http://a.jpg", "http://b.jpg"]);
    }

    #[test]
    fn test_parse_list_empty_input() {
        assert!(parse_list("").is_empty());
    }
}
