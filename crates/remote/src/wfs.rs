//! WFS layer loader.

use std::time::Duration;

use geojson::GeoJson;
use percent_encoding::percent_decode_str;
use tracing::{info, warn};
use url::Url;

use geoview_core::io::read_geojson;
use geoview_core::{FeatureCollection, Style};

use crate::error::{RemoteError, Result};
use crate::http::HttpClient;

/// A fetched WFS layer. Features are in EPSG:4326.
#[derive(Debug, Clone)]
pub struct WfsLayer {
    pub title: String,
    pub url: String,
    pub features: FeatureCollection,
    pub style: Style,
}

impl WfsLayer {
    /// Build a layer from a GeoJSON response body.
    pub fn from_geojson_str(url: &str, body: &str, style: Option<Style>) -> Result<Self> {
        let geojson: GeoJson = body.parse().map_err(geoview_core::Error::from)?;
        if !matches!(geojson, GeoJson::FeatureCollection(_)) {
            return Err(RemoteError::NotFeatureCollection {
                url: url.to_string(),
            });
        }
        Ok(Self {
            title: layer_title(url),
            url: url.to_string(),
            features: read_geojson(geojson)?,
            style: style.unwrap_or_default(),
        })
    }
}

/// Client for GeoJSON-over-HTTP feature services.
pub struct WfsClient {
    http: HttpClient,
}

impl WfsClient {
    /// Create a client with a 30 s request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(timeout)?,
        })
    }

    /// Fetch one layer with a single GET.
    pub async fn fetch_layer(&self, url: &str, style: Option<Style>) -> Result<WfsLayer> {
        let body = self.http.get_text(url).await?;
        let layer = WfsLayer::from_geojson_str(url, &body, style)?;
        info!("WFS '{}': {} features", layer.title, layer.features.len());
        Ok(layer)
    }

    /// Fetch several layers concurrently. Results keep the input order and
    /// one failure does not cancel the others.
    pub async fn fetch_layers(&self, requests: &[(&str, Option<Style>)]) -> Vec<Result<WfsLayer>> {
        use futures::stream::{FuturesOrdered, StreamExt};

        let mut futs = FuturesOrdered::new();
        for (url, style) in requests {
            futs.push_back(self.fetch_layer(url, style.clone()));
        }

        let mut results = Vec::with_capacity(requests.len());
        while let Some(res) = futs.next().await {
            if let Err(e) = &res {
                warn!("WFS fetch failed: {}", e);
            }
            results.push(res);
        }
        results
    }
}

/// Layer title from a WFS URL: the `typeName`/`typeNames` query parameter
/// if present, else the last path segment, else the whole URL.
pub fn layer_title(url: &str) -> String {
    let Some(parsed) = parse_url(url) else {
        return url.to_string();
    };

    let type_name = parsed.query_pairs().find_map(|(key, value)| {
        let key = key.to_ascii_lowercase();
        ((key == "typename" || key == "typenames") && !value.is_empty()).then(|| value.into_owned())
    });
    if let Some(name) = type_name {
        return name;
    }

    parsed
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .unwrap_or_else(|| url.to_string())
}

/// Parse absolute URLs as-is and resolve relative ones (`/geoserver/wfs?..`)
/// against a placeholder origin so their path and query can still be read.
fn parse_url(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/").ok()?.join(url).ok()
        }
        Err(_) => None,
    }
}
