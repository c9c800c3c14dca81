//! TMDB resource fetchers

use anyhow::Context;
use cinepipe_core::{HttpTransport, Transport};
use serde_json::Value;

use crate::config::Config;

/// The three resources the job reads. `None` means the fetch failed after
/// retries; implementations never return errors.
pub trait MovieSource {
    /// One page of the popular-movies listing
    fn popular_page(&self, page: u32) -> Option<Value>;
    /// Detail record for one movie
    fn movie_detail(&self, id: u64) -> Option<Value>;
    /// Cast and crew for one movie
    fn movie_credits(&self, id: u64) -> Option<Value>;
}

/// URL builder over a [`Transport`]
#[derive(Debug)]
pub struct TmdbClient<T = HttpTransport> {
    transport: T,
    api_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient<HttpTransport> {
    /// HTTP client honoring the configured timeout and retry policy
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(config.timeout, config.retry_policy())
            .context("Failed to build HTTP client")?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> TmdbClient<T> {
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            transport,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    pub fn popular_url(&self, page: u32) -> String {
        format!(
            "{}/movie/popular?api_key={}&language={}&page={page}",
            self.api_url, self.api_key, self.language
        )
    }

    pub fn detail_url(&self, id: u64) -> String {
        format!(
            "{}/movie/{id}?api_key={}&language={}",
            self.api_url, self.api_key, self.language
        )
    }

    pub fn credits_url(&self, id: u64) -> String {
        format!(
            "{}/movie/{id}/credits?api_key={}&language={}",
            self.api_url, self.api_key, self.language
        )
    }
}

impl<T: Transport> MovieSource for TmdbClient<T> {
    fn popular_page(&self, page: u32) -> Option<Value> {
        self.transport.fetch_json(&self.popular_url(page))
    }

    fn movie_detail(&self, id: u64) -> Option<Value> {
        self.transport.fetch_json(&self.detail_url(id))
    }

    fn movie_credits(&self, id: u64) -> Option<Value> {
        self.transport.fetch_json(&self.credits_url(id))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    /// Records requested URLs, answers with a fixed payload
    struct Recorder {
        urls: RefCell<Vec<String>>,
        reply: Option<Value>,
    }

    impl Transport for Recorder {
        fn fetch_json(&self, url: &str) -> Option<Value> {
            self.urls.borrow_mut().push(url.to_string());
            self.reply.clone()
        }
    }

    fn client(reply: Option<Value>) -> TmdbClient<Recorder> {
        let config = Config {
            api_key: "KEY".to_string(),
            api_url: "http://localhost:8080/3/".to_string(),
            ..Default::default()
        };
        TmdbClient::with_transport(
            &config,
            Recorder {
                urls: RefCell::new(Vec::new()),
                reply,
            },
        )
    }

    #[test]
    fn popular_url_has_page_key_and_language() {
        assert_eq!(
            client(None).popular_url(3),
            "http://localhost:8080/3/movie/popular?api_key=KEY&language=en-US&page=3"
        );
    }

    #[test]
    fn detail_url() {
        assert_eq!(
            client(None).detail_url(550),
            "http://localhost:8080/3/movie/550?api_key=KEY&language=en-US"
        );
    }

    #[test]
    fn credits_url() {
        assert_eq!(
            client(None).credits_url(550),
            "http://localhost:8080/3/movie/550/credits?api_key=KEY&language=en-US"
        );
    }

    #[test]
    fn fetchers_delegate_to_transport() {
        let c = client(Some(json!({"ok": true})));
        assert_eq!(c.popular_page(1), Some(json!({"ok": true})));
        assert!(c.movie_detail(7).is_some());
        assert!(c.movie_credits(7).is_some());

        let urls = c.transport.urls.borrow();
        assert_eq!(urls.len(), 3);
        assert!(urls[0].contains("/movie/popular?"));
        assert!(urls[1].contains("/movie/7?"));
        assert!(urls[2].contains("/movie/7/credits?"));
    }

    #[test]
    fn failure_passes_through() {
        let c = client(None);
        assert!(c.popular_page(1).is_none());
        assert!(c.movie_detail(1).is_none());
        assert!(c.movie_credits(1).is_none());
    }
}
