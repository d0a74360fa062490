use super::models::{Event, SearchFilters};
use super::normalize::{parse_event_response, parse_search_response};
use crate::config::Config;
use crate::error::{event_api_error, PulseResult};
use crate::utils::time::{to_iso_datetime, DayBound};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Source of event listings
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Search events matching the filters
    async fn search(&self, filters: &SearchFilters) -> PulseResult<Vec<Event>>;

    /// Fetch a single event by its id
    async fn event_details(&self, event_id: &str) -> PulseResult<Event>;
}

/// Ticketmaster Discovery API v2 client
#[derive(Clone)]
pub struct TicketmasterClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl TicketmasterClient {
    pub fn new(config: &Config) -> PulseResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| event_api_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.ticketmaster_base_url.clone(),
            api_key: config.ticketmaster_api_key.clone(),
            page_size: config.page_size,
        })
    }

    async fn get(&self, url: Url) -> PulseResult<(StatusCode, String)> {
        debug!("Ticketmaster request: {}", redact(&url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| event_api_error(&format!("Failed to fetch events: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| event_api_error(&format!("Failed to read events response: {}", e)))?;

        debug!("Ticketmaster response: HTTP {}", status);
        Ok((status, body))
    }
}

#[async_trait]
impl EventSource for TicketmasterClient {
    async fn search(&self, filters: &SearchFilters) -> PulseResult<Vec<Event>> {
        let url = build_search_url(&self.base_url, &self.api_key, filters, self.page_size)?;
        let (status, body) = self.get(url).await?;

        if !status.is_success() {
            return Err(event_api_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, body
            )));
        }

        parse_search_response(&body)
    }

    async fn event_details(&self, event_id: &str) -> PulseResult<Event> {
        let url = build_event_url(&self.base_url, &self.api_key, event_id)?;
        let (status, body) = self.get(url).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(event_api_error("Event not found"));
        }
        if !status.is_success() {
            return Err(event_api_error(&format!(
                "Failed to fetch event {}: HTTP {} - {}",
                event_id, status, body
            )));
        }

        parse_event_response(&body)
    }
}

/// Build the `events.json` search URL; empty filter fields are left out
pub fn build_search_url(
    base_url: &str,
    api_key: &str,
    filters: &SearchFilters,
    page_size: u32,
) -> PulseResult<Url> {
    let mut url = parse_url(&format!("{}/events.json", base_url.trim_end_matches('/')))?;

    let start = non_empty(&filters.start_date)
        .map(|d| to_iso_datetime(d, DayBound::Start))
        .transpose()?;
    let end = non_empty(&filters.end_date)
        .map(|d| to_iso_datetime(d, DayBound::End))
        .transpose()?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("apikey", api_key);
        if let Some(city) = non_empty(&filters.city) {
            query.append_pair("city", city);
        }
        if let Some(keyword) = non_empty(&filters.keyword) {
            query.append_pair("keyword", keyword);
        }
        if let Some(category) = non_empty(&filters.category) {
            query.append_pair("classificationName", category);
        }
        if let Some(start) = &start {
            query.append_pair("startDateTime", start);
        }
        if let Some(end) = &end {
            query.append_pair("endDateTime", end);
        }
        query.append_pair("size", &page_size.to_string());
    }

    Ok(url)
}

/// Build the single-event URL. The id always lands in one path segment,
/// percent-encoded, so it cannot point the request at another endpoint.
pub fn build_event_url(base_url: &str, api_key: &str, event_id: &str) -> PulseResult<Url> {
    if event_id.trim().is_empty() {
        return Err(event_api_error("Event id must not be empty"));
    }

    let mut url = parse_url(base_url)?;
    url.path_segments_mut()
        .map_err(|_| event_api_error(&format!("Base URL cannot take a path: {}", base_url)))?
        .pop_if_empty()
        .push("events")
        .push(&format!("{}.json", event_id));
    url.query_pairs_mut().append_pair("apikey", api_key);
    Ok(url)
}

fn parse_url(raw: &str) -> PulseResult<Url> {
    Url::parse(raw).map_err(|e| event_api_error(&format!("Failed to parse URL: {}", e)))
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Render a URL for logs with the API key masked
pub(crate) fn redact(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "apikey" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://app.ticketmaster.com/discovery/v2";

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_search_url_with_all_filters() {
        let filters = SearchFilters {
            city: "Cluj-Napoca".to_string(),
            keyword: "jazz night".to_string(),
            category: "Music".to_string(),
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-30".to_string(),
        };
        let url = build_search_url(BASE, "secret", &filters, 50).unwrap();

        assert_eq!(url.path(), "/discovery/v2/events.json");
        assert_eq!(
            query(&url),
            vec![
                ("apikey".to_string(), "secret".to_string()),
                ("city".to_string(), "Cluj-Napoca".to_string()),
                ("keyword".to_string(), "jazz night".to_string()),
                ("classificationName".to_string(), "Music".to_string()),
                ("startDateTime".to_string(), "2024-06-01T00:00:00Z".to_string()),
                ("endDateTime".to_string(), "2024-06-30T23:59:59Z".to_string()),
                ("size".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_skips_empty_filters() {
        let url = build_search_url(BASE, "secret", &SearchFilters::for_city("Iasi"), 20).unwrap();
        let keys: Vec<String> = query(&url).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["apikey", "city", "size"]);
    }

    #[test]
    fn test_search_url_rejects_bad_date() {
        let filters = SearchFilters {
            start_date: "tomorrow".to_string(),
            ..Default::default()
        };
        assert!(build_search_url(BASE, "secret", &filters, 50).is_err());
    }

    #[test]
    fn test_event_url() {
        let url = build_event_url(BASE, "secret", "G5diZfkn0B-bh").unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.ticketmaster.com/discovery/v2/events/G5diZfkn0B-bh.json?apikey=secret"
        );
    }

    #[test]
    fn test_event_url_keeps_id_in_one_segment() {
        for id in ["../../attractions/x", "a#frag", "/etc", "a?apikey=other"] {
            let url = build_event_url(BASE, "secret", id).unwrap();
            let segments: Vec<&str> = url.path_segments().unwrap().collect();

            assert_eq!(segments.len(), 4, "{} -> {}", id, url);
            assert_eq!(&segments[..3], &["discovery", "v2", "events"]);
            assert!(url.fragment().is_none());
            assert_eq!(query(&url), vec![("apikey".to_string(), "secret".to_string())]);
        }
    }

    #[test]
    fn test_event_url_trailing_slash_and_empty_id() {
        let url = build_event_url("https://app.ticketmaster.com/discovery/v2/", "k", "abc").unwrap();
        assert_eq!(url.path(), "/discovery/v2/events/abc.json");
        assert!(build_event_url(BASE, "k", "  ").is_err());
    }

    #[test]
    fn test_redact_hides_key() {
        let url = build_event_url(BASE, "secret", "abc").unwrap();
        let logged = redact(&url);
        assert!(!logged.contains("secret"));
        assert!(logged.contains("apikey=***"));
    }

    #[test]
    fn test_redact_hides_encoded_key() {
        let key = "a+b/c d&e";
        let filters = SearchFilters::for_city("Iasi");
        let url = build_search_url(BASE, key, &filters, 20).unwrap();
        let logged = redact(&url);

        assert!(!logged.contains("a%2Bb"));
        assert!(!logged.contains("a+b"));
        assert!(logged.contains("apikey=***"));
        assert!(logged.contains("city=Iasi"));
    }
}
