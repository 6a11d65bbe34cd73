//! Public holiday calendar client.
//!
//! Fetches the national holidays of a year from a JSON API that returns
//! `[{"dia": 1, "mes": 1, "motivo": "Año Nuevo", ...}, ...]`. Other fields in
//! each object are ignored.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use wh_core::{Holiday, HolidaySource};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Public endpoint for Argentine national holidays.
pub const DEFAULT_BASE_URL: &str = "https://nolaborables.com.ar/api/v2/feriados";

/// Holiday client errors.
#[derive(Debug, Error)]
pub enum HolidayError {
    /// The configured base URL was empty.
    #[error("invalid holiday API URL: {reason}")]
    InvalidBaseUrl { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned a non-success status.
    #[error("holiday API error: status {status}")]
    Api { status: reqwest::StatusCode },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Holiday API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty, or if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, HolidayError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Like [`Client::new`] with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HolidayError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(HolidayError::InvalidBaseUrl {
                reason: "URL cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HolidayError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    /// URL queried for `year`.
    pub fn year_url(&self, year: i32) -> String {
        format!("{}/{year}", self.base_url)
    }

    /// Fetches the public holidays of `year`.
    ///
    /// The returned holidays have no owner and are marked as synced.
    pub async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        let url = self.year_url(year);
        debug!(%url, "fetching holidays");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HolidayError::Api { status });
        }

        let body = response.text().await?;
        let holidays = parse_holidays(&body, year)?;
        debug!(year, count = holidays.len(), "fetched holidays");
        Ok(holidays)
    }
}

#[derive(Debug, Deserialize)]
struct HolidayPayload {
    dia: u32,
    mes: u32,
    motivo: String,
}

/// Parses the API body for `year` into synced holidays, ordered by date.
fn parse_holidays(body: &str, year: i32) -> Result<Vec<Holiday>, HolidayError> {
    let payload: Vec<HolidayPayload> =
        serde_json::from_str(body).map_err(|err| HolidayError::InvalidResponse(err.to_string()))?;

    let mut holidays = Vec::with_capacity(payload.len());
    for item in payload {
        let date = NaiveDate::from_ymd_opt(year, item.mes, item.dia).ok_or_else(|| {
            HolidayError::InvalidResponse(format!(
                "invalid date {year}-{:02}-{:02} for '{}'",
                item.mes, item.dia, item.motivo
            ))
        })?;
        holidays.push(Holiday {
            date,
            reason: item.motivo.trim().to_string(),
            user_id: None,
            source: HolidaySource::Sync,
        });
    }
    holidays.sort_by_key(|h| h.date);
    Ok(holidays)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_rejects_empty_url() {
        assert!(matches!(
            Client::new("  "),
            Err(HolidayError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn year_url_strips_trailing_slash() {
        let client = Client::new("https://example.test/feriados/").unwrap();
        assert_eq!(client.year_url(2025), "https://example.test/feriados/2025");
    }

    #[test]
    fn default_url_is_accepted() {
        let client = Client::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            client.year_url(2024),
            "https://nolaborables.com.ar/api/v2/feriados/2024"
        );
    }

    #[test]
    fn parse_holidays_accepts_api_payload() {
        let body = r#"[
            {"motivo":"Día de la Independencia","tipo":"inamovible","dia":9,"mes":7,"id":"independencia"},
            {"motivo":"Año Nuevo","tipo":"inamovible","dia":1,"mes":1,"id":"año-nuevo"},
            {"motivo":" Carnaval ","tipo":"trasladable","dia":3,"mes":3}
        ]"#;
        let holidays = parse_holidays(body, 2025).unwrap();

        let summary: Vec<_> = holidays
            .iter()
            .map(|h| (h.date.to_string(), h.reason.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("2025-01-01".to_string(), "Año Nuevo"),
                ("2025-03-03".to_string(), "Carnaval"),
                ("2025-07-09".to_string(), "Día de la Independencia"),
            ]
        );
        assert!(
            holidays
                .iter()
                .all(|h| h.user_id.is_none() && h.source == HolidaySource::Sync)
        );
    }

    #[test]
    fn parse_holidays_accepts_empty_list() {
        assert!(parse_holidays("[]", 2025).unwrap().is_empty());
    }

    #[test]
    fn parse_holidays_rejects_invalid_json() {
        let err = parse_holidays("not-json", 2025).unwrap_err();
        assert!(matches!(err, HolidayError::InvalidResponse(_)));
    }

    #[test]
    fn parse_holidays_rejects_impossible_dates() {
        let err = parse_holidays(r#"[{"motivo":"x","dia":30,"mes":2}]"#, 2025).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid response: invalid date 2025-02-30 for 'x'"
        );
    }

    #[tokio::test]
    async fn fetch_reports_connection_errors() {
        let client = Client::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.fetch_holidays(2025).await.unwrap_err();
        assert!(matches!(err, HolidayError::Request(_)), "{err:?}");
    }
}
