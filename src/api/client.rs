use std::future::Future;

use geo::Coord;
use reqwest::Client;
use tracing::debug;

use crate::{config::Config, store::RawRoof};

use super::{error::FetchError, identify::parse_identify, search::{SearchHit, parse_search}};

/// Anything that can list the roofs around one sample point.
pub trait RoofSource {
    fn fetch_at(&self, point: Coord<f64>) -> impl Future<Output = Result<Vec<RawRoof>, FetchError>>;
}

/// Anything that can turn a search text into candidate locations.
pub trait LocationSource {
    fn search(&self, text: &str) -> impl Future<Output = Result<Vec<SearchHit>, FetchError>>;
}

/// Client for the geo.admin.ch REST services.
#[derive(Debug, Clone)]
pub struct GeoAdminClient {
    http: Client,
    config: Config,
}

impl GeoAdminClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder().user_agent(config.user_agent.as_str()).build()?;
        Ok(Self { http, config: config.clone() })
    }

    /// Query parameters of one identify request centered on `point`.
    pub(crate) fn identify_query(&self, point: Coord<f64>) -> Vec<(&'static str, String)> {
        let c = &self.config;
        let h = c.identify_half_extent;
        let [w, hgt, dpi] = c.image_display;
        vec![
            ("geometryType", "esriGeometryPoint".into()),
            ("layers", format!("all:{}", c.roof_layer)),
            ("geometry", format!("{},{}", point.x, point.y)),
            ("mapExtent", format!("{},{},{},{}", point.x - h, point.y - h, point.x + h, point.y + h)),
            ("imageDisplay", format!("{w},{hgt},{dpi}")),
            ("tolerance", c.identify_tolerance.to_string()),
            ("sr", c.spatial_reference.to_string()),
        ]
    }

    /// Query parameters of one location search.
    pub(crate) fn search_query(&self, text: &str) -> Vec<(&'static str, String)> {
        let c = &self.config;
        vec![
            ("type", "locations".into()),
            ("features", c.search_features.clone()),
            ("origins", "address".into()),
            ("searchText", text.to_string()),
            ("limit", c.search_limit.to_string()),
            ("sr", c.spatial_reference.to_string()),
        ]
    }

    async fn get_bytes(&self, url: &str, query: &[(&'static str, String)]) -> Result<Vec<u8>, FetchError> {
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status));
        }
        Ok(resp.bytes().await?.to_vec())
    }

    /// Look up addresses matching `text`. Texts shorter than the configured
    /// minimum return no options without contacting the service.
    pub async fn search_locations(&self, text: &str) -> Result<Vec<SearchHit>, FetchError> {
        if text.chars().count() < self.config.min_search_chars {
            return Ok(Vec::new());
        }
        let body = self.get_bytes(&self.config.search_url, &self.search_query(text)).await?;
        parse_search(&body)
    }

    /// Identify the roofs around `point` (one request).
    pub async fn identify_roofs(&self, point: Coord<f64>) -> Result<Vec<RawRoof>, FetchError> {
        let body = self.get_bytes(&self.config.identify_url, &self.identify_query(point)).await?;
        let roofs = parse_identify(&body)?;
        debug!(x = point.x, y = point.y, rings = roofs.len(), "identify finished");
        Ok(roofs)
    }
}

impl RoofSource for GeoAdminClient {
    fn fetch_at(&self, point: Coord<f64>) -> impl Future<Output = Result<Vec<RawRoof>, FetchError>> {
        self.identify_roofs(point)
    }
}

impl LocationSource for GeoAdminClient {
    fn search(&self, text: &str) -> impl Future<Output = Result<Vec<SearchHit>, FetchError>> {
        self.search_locations(text)
    }
}
