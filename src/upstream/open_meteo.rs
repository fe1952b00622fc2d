//! Open-Meteo forecast client.
//!
//! Query shapes are fixed so identical requests produce identical URLs,
//! which double as response cache keys.

use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::config::Place;
use crate::upstream::UpstreamError;

const UPSTREAM: &str = "open-meteo";

const DAILY_FIELDS: &str = "temperature_2m_min,temperature_2m_max,precipitation_sum";
const CURRENT_FIELDS: &str = "temperature_2m,precipitation,weather_code";
const FORECAST_DAYS: &str = "7";

/// Status and decoded body of an upstream reply.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    /// JSON body, or `Null` when the body was not JSON.
    pub data: Value,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Client for the forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base: Url,
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        let base = Url::parse(base_url).map_err(|_| UpstreamError::InvalidUrl {
            upstream: UPSTREAM,
            url: base_url.to_string(),
        })?;
        Ok(Self { client, base })
    }

    /// 7-day daily forecast for one coordinate pair.
    pub fn daily_forecast_url(&self, lat: &str, lon: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("latitude", lat)
            .append_pair("longitude", lon)
            .append_pair("daily", DAILY_FIELDS)
            .append_pair("timezone", "auto")
            .append_pair("forecast_days", FORECAST_DAYS);
        url
    }

    /// Current conditions plus 7-day daily forecast for several places.
    pub fn regions_url(&self, places: &[Place]) -> Url {
        let join = |f: fn(&Place) -> f64| {
            places
                .iter()
                .map(|p| f(p).to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("latitude", &join(|p| p.lat))
            .append_pair("longitude", &join(|p| p.lon))
            .append_pair("current", CURRENT_FIELDS)
            .append_pair("daily", DAILY_FIELDS)
            .append_pair("forecast_days", FORECAST_DAYS)
            .append_pair("timezone", "auto");
        url
    }

    /// GET `url`; any HTTP status is a reply, only transport failures error.
    pub async fn fetch(&self, url: &Url) -> Result<UpstreamReply, UpstreamError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::transport(UPSTREAM, e))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(UPSTREAM, e))?;
        let data = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        if !(200..300).contains(&status) {
            crate::observability::metrics::record_upstream_failure(UPSTREAM);
            tracing::warn!(status, url = %url, "Open-Meteo returned an error status");
        }
        Ok(UpstreamReply { status, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;

    fn client() -> OpenMeteoClient {
        OpenMeteoClient::new(reqwest::Client::new(), "https://api.open-meteo.com/v1/forecast")
            .unwrap()
    }

    #[test]
    fn test_daily_forecast_url() {
        let url = client().daily_forecast_url("-0.18", "-78.47");
        assert_eq!(
            url.as_str(),
            "https://api.open-meteo.com/v1/forecast?latitude=-0.18&longitude=-78.47\
             &daily=temperature_2m_min%2Ctemperature_2m_max%2Cprecipitation_sum\
             &timezone=auto&forecast_days=7"
        );
    }

    #[test]
    fn test_regions_url_joins_coordinates() {
        let url = client().regions_url(&WeatherConfig::default().places);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs[0],
            (
                "latitude".to_string(),
                "-0.1807,0.05,0.234,-0.6808,-1.3964".to_string()
            )
        );
        assert_eq!(
            pairs[1],
            (
                "longitude".to_string(),
                "-78.4678,-78.776,-78.262,-78.4376,-78.4246".to_string()
            )
        );
        assert_eq!(
            pairs[2],
            (
                "current".to_string(),
                "temperature_2m,precipitation,weather_code".to_string()
            )
        );
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn test_base_query_is_replaced() {
        let client =
            OpenMeteoClient::new(reqwest::Client::new(), "http://127.0.0.1:9/v1/forecast?x=1")
                .unwrap();
        let url = client.daily_forecast_url("1", "2");
        assert!(!url.as_str().contains("x=1"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            OpenMeteoClient::new(reqwest::Client::new(), "not a url"),
            Err(UpstreamError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_reply_success_range() {
        let reply = |status| UpstreamReply {
            status,
            data: Value::Null,
        };
        assert!(reply(200).is_success());
        assert!(reply(204).is_success());
        assert!(!reply(429).is_success());
    }
}
