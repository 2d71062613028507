//! DuckDuckGo HTML search (free, no API key, best-effort)

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AgentError, Result};
use crate::http_client::build_http_client;

use super::{RetrievedSource, SearchProvider};

pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            client: build_http_client(),
            base_url: "https://html.duckduckgo.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RetrievedSource>> {
        let url = format!("{}/html/?q={}", self.base_url, urlencoding::encode(query));
        let response = self
            .client
            .get(&url)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::Retrieval(format!(
                "DuckDuckGo returned status {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        parse_duckduckgo_html(&html, max_results)
    }
}

/// Parse DuckDuckGo HTML lite results page
fn parse_duckduckgo_html(html: &str, max_results: usize) -> Result<Vec<RetrievedSource>> {
    let selector = |css: &str| {
        Selector::parse(css)
            .map_err(|e| AgentError::InvalidFormat(format!("bad selector {css}: {e}")))
    };
    let result_sel = selector(".result")?;
    let link_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let link = element.select(&link_sel).next();
        let title = link
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
            .trim()
            .to_string();
        let url = link
            .and_then(|el| el.value().attr("href"))
            .map(normalize_duckduckgo_url)
            .unwrap_or_default();
        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
            .trim()
            .to_string();

        if !title.is_empty() && !url.is_empty() {
            results.push(RetrievedSource::new(title, url, snippet));
        }
    }

    Ok(results)
}

/// Normalize DuckDuckGo tracking links to the destination URL.
///
/// DDG HTML results often return links like:
/// https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com
fn normalize_duckduckgo_url(raw_url: &str) -> String {
    let absolute = if raw_url.starts_with("//") {
        format!("https:{raw_url}")
    } else {
        raw_url.to_string()
    };

    let Ok(parsed) = url::Url::parse(&absolute) else {
        return raw_url.to_string();
    };

    if parsed.domain() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        if let Some((_, value)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
            return value.into_owned();
        }
    }

    absolute
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TWO_RESULTS: &str = r#"
        <html><body>
            <div class="result">
                <a class="result__a" href="https://example.com">Example Title</a>
                <a class="result__snippet">This is a snippet about example.</a>
            </div>
            <div class="result">
                <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Ftest.com%2Fpost">Test Title</a>
                <a class="result__snippet">This is a test snippet.</a>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_empty_page() {
        let results = parse_duckduckgo_html("<html><body></body></html>", 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_results_and_decode_redirects() {
        let results = parse_duckduckgo_html(TWO_RESULTS, 5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Example Title");
        assert_eq!(results[0].source, "https://example.com");
        assert_eq!(results[0].content, "This is a snippet about example.");
        assert_eq!(results[1].source, "https://test.com/post");
    }

    #[test]
    fn test_parse_respects_limit() {
        let results = parse_duckduckgo_html(TWO_RESULTS, 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "rust lang"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_RESULTS))
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new().with_base_url(server.uri());
        let results = search.search("rust lang", 3).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new().with_base_url(server.uri());
        assert!(matches!(
            search.search("rust", 3).await,
            Err(AgentError::Retrieval(_))
        ));
    }
}
