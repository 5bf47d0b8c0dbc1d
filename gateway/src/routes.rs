use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use corridor_sites::{export, CatalogueError, DerivedRecord, MapView, Selection};

use crate::AppState;

#[derive(Serialize)]
pub struct CorridorInfo {
    pub name: String,
    pub sites: Vec<String>,
}

#[derive(Serialize)]
pub struct CorridorsResponse {
    pub corridors: Vec<CorridorInfo>,
    pub initial: Option<Selection>,
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub record: DerivedRecord,
    pub file_name: String,
}

/// Health check plus the corridor API under `/api/v1`.
pub fn router(state: AppState) -> Router {
    let corridor_routes = Router::new()
        .route("/corridors", get(list_corridors))
        .route("/corridors/:corridor/sites", get(list_sites))
        .route("/corridors/:corridor/sites/:site", get(get_record))
        .route("/corridors/:corridor/sites/:site/map", get(get_map))
        .route("/corridors/:corridor/sites/:site/geojson", get(get_geojson))
        .route("/corridors/:corridor/sites/:site/export", get(export_csv))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health))
        .with_state(state)
        .nest("/api/v1", corridor_routes)
}

/// Stale selections become 404s; anything else is a 500.
fn api_error(err: CatalogueError) -> (StatusCode, String) {
    if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            format!("selection no longer valid, please reselect: {}", err),
        )
    } else {
        tracing::error!("Request failed: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

fn evaluate(
    state: &AppState,
    corridor: String,
    site: String,
) -> Result<DerivedRecord, (StatusCode, String)> {
    Selection::new(corridor, site)
        .evaluate(&state.catalogue)
        .map_err(api_error)
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "corridor-gateway",
        "corridors": state.catalogue.corridors().len(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn list_corridors(State(state): State<AppState>) -> Json<CorridorsResponse> {
    let corridors = state
        .catalogue
        .corridors()
        .iter()
        .map(|c| CorridorInfo {
            name: c.name().to_string(),
            sites: c.site_names().map(String::from).collect(),
        })
        .collect();

    Json(CorridorsResponse {
        corridors,
        initial: Selection::initial(&state.catalogue),
    })
}

pub async fn list_sites(
    State(state): State<AppState>,
    Path(corridor): Path<String>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let sites = state
        .catalogue
        .site_names(&corridor)
        .map_err(api_error)?;

    Ok(Json(sites.into_iter().map(String::from).collect()))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path((corridor, site)): Path<(String, String)>,
) -> Result<Json<RecordResponse>, (StatusCode, String)> {
    let record = evaluate(&state, corridor, site)?;
    tracing::debug!(
        "Record {} / {}: {} km, {} km",
        record.corridor,
        record.site,
        record.distance_to_substation_km,
        record.distance_to_solar_km
    );

    Ok(Json(RecordResponse {
        file_name: record.file_name(),
        record,
    }))
}

pub async fn get_map(
    State(state): State<AppState>,
    Path((corridor, site)): Path<(String, String)>,
) -> Result<Json<MapView>, (StatusCode, String)> {
    let record = evaluate(&state, corridor, site)?;
    Ok(Json(MapView::from_record(&record)))
}

pub async fn get_geojson(
    State(state): State<AppState>,
    Path((corridor, site)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let record = evaluate(&state, corridor, site)?;
    Ok(Json(MapView::from_record(&record).to_geojson()))
}

/// Download the selected record as a one-row CSV file
pub async fn export_csv(
    State(state): State<AppState>,
    Path((corridor, site)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = evaluate(&state, corridor, site)?;
    let body = export::to_csv(&record).map_err(api_error)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        record.file_name().replace('"', "'")
    );
    tracing::info!(
        "Exporting {} / {} as {}",
        record.corridor,
        record.site,
        record.file_name()
    );

    Ok((
        [
            (header::CONTENT_TYPE, export::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use corridor_sites::Catalogue;
    use std::sync::Arc;
    use tower::ServiceExt;

    const DERA_BASSI: &str = "/api/v1/corridors/Ambala%20to%20Jalandhar/sites/Dera%20Bassi%20Site";

    fn app() -> Router {
        router(AppState {
            catalogue: Arc::new(Catalogue::ev_corridors().unwrap()),
        })
    }

    async fn request(uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, _, body) = request(uri).await;
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["corridors"], 1);
    }

    #[tokio::test]
    async fn test_list_corridors() {
        let (status, json) = get_json("/api/v1/corridors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["corridors"][0]["name"], "Ambala to Jalandhar");
        assert_eq!(json["corridors"][0]["sites"][2], "Uchana Site");
        assert_eq!(json["initial"]["site"], "Dera Bassi Site");
    }

    #[tokio::test]
    async fn test_list_sites_unknown_corridor() {
        let (status, _, body) = request("/api/v1/corridors/Nowhere/sites").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8(body).unwrap().starts_with("selection no longer valid"));
    }

    #[tokio::test]
    async fn test_get_record() {
        let (status, json) = get_json(DERA_BASSI).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["file_name"], "Ambala_to_Jalandhar_data.csv");
        assert_eq!(json["record"]["corridor"], "Ambala to Jalandhar");
        assert_eq!(json["record"]["site"], "Dera Bassi Site");
        assert_eq!(json["record"]["distance_to_substation_km"], 0.64);
        assert_eq!(json["record"]["distance_to_solar_km"], 0.69);
    }

    #[tokio::test]
    async fn test_unknown_site_is_not_found() {
        let (status, _, _) =
            request("/api/v1/corridors/Ambala%20to%20Jalandhar/sites/NoSuchSite").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_map() {
        let (status, json) = get_json(&format!("{}/map", DERA_BASSI)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["zoom"], 13);
        assert_eq!(json["markers"].as_array().unwrap().len(), 3);
        assert_eq!(json["lines"][0]["tooltip"], "Distance to Substation: 0.64 km");
        assert_eq!(json["lines"][1]["unit"], "km");
    }

    #[tokio::test]
    async fn test_get_geojson() {
        let (status, json) = get_json(&format!("{}/geojson", DERA_BASSI)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (status, headers, body) = request(&format!("{}/export", DERA_BASSI)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Ambala_to_Jalandhar_data.csv\""
        );

        let csv = String::from_utf8(body).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(export::EXPORT_HEADERS.join(",").as_str()));
        assert!(lines
            .next()
            .unwrap()
            .starts_with("Ambala to Jalandhar,Dera Bassi Site,30.5445,76.8215"));
    }
}
