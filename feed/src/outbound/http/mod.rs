//! HTTP adapters for the feed REST endpoints.
//!
//! Both adapters share a reqwest client configuration, status mapping, and
//! the JSON envelope types in `dto`.

mod dto;
mod error_mapping;
mod feed_source;
mod like_gateway;

pub use feed_source::HttpFeedSource;
pub use like_gateway::HttpLikeGateway;

use std::time::Duration;

use reqwest::{Client, Url};

/// Header carrying the active trace identifier on outbound calls.
pub const TRACE_ID_HEADER: &str = "trace-id";

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Join `path` onto `base`, keeping any path prefix already on the base.
fn endpoint(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let prefix = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{prefix}/{path}"));
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080/api", "http://localhost:8080/api/posts")]
    #[case("http://localhost:8080/api/", "http://localhost:8080/api/posts")]
    #[case("http://localhost:8080", "http://localhost:8080/posts")]
    fn endpoint_keeps_base_path(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base");
        assert_eq!(endpoint(&base, "posts").as_str(), expected);
    }
}
