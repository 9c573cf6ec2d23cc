use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::RaterError;
use crate::fetch::{Response, Transport};
use crate::services::boundary_api::{BoundaryApi, ZipBoundary};

pub fn boundary_path(state: &str) -> String {
    format!("/geo-zipcode/{state}")
}

/// Reads ZIP boundaries from the `/geo-zipcode/{state}` GeoJSON endpoint.
pub struct GeoBoundaryClient<T> {
    transport: T,
}

impl<T: Transport> GeoBoundaryClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: Transport> BoundaryApi for GeoBoundaryClient<T> {
    #[tracing::instrument(skip(self))]
    async fn zip_boundaries(&self, state: &str) -> Result<Vec<ZipBoundary>> {
        let path = boundary_path(state);
        let payload = match self.transport.get(&path).await {
            Response::Success(payload) => payload,
            Response::NotFound => {
                warn!("No ZIP boundaries found for state");
                return Ok(Vec::new());
            }
            Response::QuotaExceeded => {
                return Err(RaterError::Request {
                    path,
                    reason: "quota exceeded".to_string(),
                }
                .into());
            }
            Response::Failure(reason) => return Err(RaterError::Request { path, reason }.into()),
        };

        let boundaries = parse_feature_collection(&payload);
        info!(count = boundaries.len(), "Received ZIP boundaries");
        Ok(boundaries)
    }
}

/// Extracts `(properties.zip, geometry)` from each feature. Features without
/// a ZIP or a geometry are dropped.
pub fn parse_feature_collection(payload: &Value) -> Vec<ZipBoundary> {
    let Some(features) = payload["features"].as_array() else {
        return Vec::new();
    };

    features
        .iter()
        .filter_map(|feature| {
            let zip = match &feature["properties"]["zip"] {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let geometry = feature.get("geometry").filter(|g| !g.is_null())?.clone();
            Some(ZipBoundary { zip, geometry })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct OneShot(Response);

    #[async_trait]
    impl Transport for OneShot {
        async fn get(&self, path: &str) -> Response {
            assert_eq!(path, "/geo-zipcode/TX");
            self.0.clone()
        }
    }

    fn collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"zip": "75201"}, "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}},
                {"properties": {"zip": 75202}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"properties": {}, "geometry": {"type": "Point", "coordinates": [0, 0]}},
                {"properties": {"zip": "75203"}, "geometry": null}
            ]
        })
    }

    #[test]
    fn test_parse_keeps_geometry_untouched() {
        let boundaries = parse_feature_collection(&collection());
        let zips: Vec<&str> = boundaries.iter().map(|b| b.zip.as_str()).collect();
        assert_eq!(zips, vec!["75201", "75202"]);
        assert_eq!(boundaries[1].geometry, json!({"type": "Point", "coordinates": [1, 2]}));
    }

    #[test]
    fn test_parse_without_features_is_empty() {
        assert!(parse_feature_collection(&json!({"type": "FeatureCollection"})).is_empty());
        assert!(parse_feature_collection(&json!([])).is_empty());
    }

    #[tokio::test]
    async fn test_zip_boundaries_success() {
        let api = GeoBoundaryClient::new(OneShot(Response::Success(collection())));
        assert_eq!(api.zip_boundaries("TX").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zip_boundaries_not_found_is_empty() {
        let api = GeoBoundaryClient::new(OneShot(Response::NotFound));
        assert!(api.zip_boundaries("TX").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zip_boundaries_failure_is_error() {
        let api = GeoBoundaryClient::new(OneShot(Response::Failure("boom".into())));
        let err = api.zip_boundaries("TX").await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
