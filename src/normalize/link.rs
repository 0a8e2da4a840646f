use super::{HOST, TITLE, URL};
use crate::dataset::Dataset;
use crate::error::Result;
use arrow::array::StringArray;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Network location of `raw` exactly as written: `user:pass@Host:port`.
/// Empty when `raw` does not parse or has no `//` authority.
pub fn host_of(raw: &str) -> String {
    let raw = raw.trim();
    if Url::parse(raw).is_err() {
        debug!(url = raw, "unparseable url, empty host");
        return String::new();
    }

    let Some(rest) = raw
        .split_once(':')
        .and_then(|(_, rest)| rest.strip_prefix("//"))
    else {
        return String::new();
    };
    let end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
    rest[..end].to_string()
}

/// Title guessed from the last path segment, `big-news-story` → `big news story`.
/// Percent-escapes in the segment are decoded.
pub fn title_from_url(raw: &str, last_segment: &Regex) -> String {
    let parsed = Url::parse(raw).ok();
    let path = parsed.as_ref().map(Url::path).unwrap_or(raw);
    let slug = last_segment
        .captures(path)
        .and_then(|c| c.name("slug"))
        .map(|m| m.as_str())
        .unwrap_or_default();

    let decoded = urlencoding::decode_binary(slug.as_bytes());
    String::from_utf8_lossy(&decoded)
        .split('-')
        .collect::<Vec<_>>()
        .join(" ")
}

/// Add `host`, the network location of each row's `url`.
pub fn extract_host(dataset: Dataset) -> Result<Dataset> {
    info!("extracting host from urls");
    let hosts: StringArray = dataset
        .string_column(URL)?
        .iter()
        .map(|url| Some(url.map(host_of).unwrap_or_default()))
        .collect();
    dataset.with_column(HOST, Arc::new(hosts))
}

/// Fill null titles from the url slug. Present titles are left alone.
pub fn fill_missing_titles(dataset: Dataset) -> Result<Dataset> {
    info!("filling missing titles");
    let last_segment = Regex::new(r"(?P<slug>[^/]+)$").expect("slug pattern is valid");

    let urls = dataset.string_column(URL)?;
    let titles = dataset.string_column(TITLE)?;
    let mut filled = 0usize;
    let out: StringArray = titles
        .iter()
        .zip(urls.iter())
        .map(|(title, url)| match title {
            Some(t) => Some(t.to_string()),
            None => {
                filled += 1;
                Some(url.map(|u| title_from_url(u, &last_segment)).unwrap_or_default())
            }
        })
        .collect();
    debug!(filled, "titles derived from urls");

    dataset.with_column(TITLE, Arc::new(out))
}
