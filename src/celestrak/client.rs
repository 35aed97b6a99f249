use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::celestrak::{FetchError, LookupError};
use crate::ephemeris::catalog::{is_line1, is_line2};
use crate::ephemeris::TleRecord;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Source of bulk TLE feeds.
pub trait TleFetcher {
    fn fetch_feed(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Client for the CelesTrak GP catalog.
#[derive(Clone)]
pub struct CelestrakClient {
    http: Client,
    gp_url: String,
}

impl CelestrakClient {
    pub fn new(gp_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            gp_url: gp_url.to_string(),
        })
    }

    /// Fetch the current TLE of one satellite. All-digit queries are treated
    /// as NORAD catalog numbers, anything else as a name.
    pub async fn lookup_satellite(&self, query: &str) -> Result<TleRecord, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let request = if query.chars().all(|c| c.is_ascii_digit()) {
            self.http.get(&self.gp_url).query(&[("CATNR", query)])
        } else {
            self.http
                .get(&self.gp_url)
                .query(&[("NAME", query), ("FORMAT", "TLE")])
        };

        log::info!("Fetching TLE for '{}'", query);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await?;
        parse_lookup_response(&body).ok_or_else(|| LookupError::NotFound(query.to_string()))
    }
}

impl TleFetcher for CelestrakClient {
    async fn fetch_feed(&self, url: &str) -> Result<String, FetchError> {
        log::info!("Downloading TLE feed {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        log::debug!("Feed {} returned {} bytes", url, body.len());
        Ok(body)
    }
}

/// Extract the first TLE set from a lookup response. Anything without both
/// data lines (e.g. "No GP data found") is `None`.
pub fn parse_lookup_response(body: &str) -> Option<TleRecord> {
    let lines: Vec<&str> = body
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let i = (0..lines.len().saturating_sub(1))
        .find(|&i| is_line1(lines[i]) && is_line2(lines[i + 1]))?;

    let name = match i.checked_sub(1).map(|p| lines[p]) {
        Some(title) if !is_line2(title) => title.strip_prefix("0 ").unwrap_or(title).trim(),
        _ => lines[i].get(2..7).unwrap_or_default().trim(),
    };
    let name = if name.chars().all(|c| c.is_ascii_digit()) {
        format!("NORAD {}", name)
    } else {
        name.to_string()
    };

    Some(TleRecord {
        name,
        line1: lines[i].to_string(),
        line2: lines[i + 1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::catalog::tests::{ISS_LINE1, ISS_LINE2, ISS_NAME};

    #[test]
    fn three_line_response_uses_title() {
        let body = format!("{ISS_NAME}        \r\n{ISS_LINE1}\r\n{ISS_LINE2}\r\n");
        let record = parse_lookup_response(&body).unwrap();
        assert_eq!(record.name, ISS_NAME);
        assert_eq!(record.line1, ISS_LINE1);
        assert_eq!(record.line2, ISS_LINE2);
    }

    #[test]
    fn two_line_response_is_named_by_catalog_number() {
        let body = format!("{ISS_LINE1}\n{ISS_LINE2}\n");
        assert_eq!(parse_lookup_response(&body).unwrap().name, "NORAD 25544");
    }

    #[test]
    fn takes_first_of_several_matches() {
        let body = format!("STARLINK-1\n{ISS_LINE1}\n{ISS_LINE2}\nSTARLINK-2\n{ISS_LINE1}\n{ISS_LINE2}\n");
        assert_eq!(parse_lookup_response(&body).unwrap().name, "STARLINK-1");
    }

    #[test]
    fn missing_data_lines_is_not_found() {
        assert!(parse_lookup_response("No GP data found").is_none());
        assert!(parse_lookup_response("").is_none());
        assert!(parse_lookup_response(&format!("{ISS_NAME}\n{ISS_LINE1}\n")).is_none());
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_request() {
        let client = CelestrakClient::new("http://127.0.0.1:9/gp.php", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.lookup_satellite("   ").await,
            Err(LookupError::EmptyQuery)
        ));
    }
}
