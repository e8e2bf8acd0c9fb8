//! API routes and handlers.

use std::time::Instant;

use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use bidforge_core::{BidForgeError, BidPackage};

use crate::error::ApiError;
use crate::schemas::{
    AnalyzeBlueprintRequest, AnalyzeBlueprintResponse, GenerateBidRequest, GenerateBidResponse,
};
use crate::state::AppState;

/// Build the Axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    // Local frontends during development.
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://localhost:19006"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze-blueprint", post(analyze_blueprint))
        .route("/generate-bid", post(generate_bid))
        .layer(cors)
        .with_state(state)
}

/// Handler for `GET /health`.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Handler for `POST /analyze-blueprint`.
async fn analyze_blueprint(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeBlueprintRequest>,
) -> Result<Json<AnalyzeBlueprintResponse>, ApiError> {
    let started = Instant::now();
    info!(
        blueprint_id = %request.blueprint_id,
        s3_key = %request.s3_key,
        "analyze blueprint request"
    );

    match run_analysis(&state, &request, started).await {
        Ok(response) => {
            info!(
                blueprint_id = %request.blueprint_id,
                processing_time_ms = response.processing_time_ms,
                confidence = response.confidence_score,
                "blueprint analysis complete"
            );
            Ok(Json(response))
        }
        Err(e) => {
            error!(blueprint_id = %request.blueprint_id, error = %e, "blueprint analysis failed");
            Err(e.into())
        }
    }
}

async fn run_analysis(
    state: &AppState,
    request: &AnalyzeBlueprintRequest,
    started: Instant,
) -> Result<AnalyzeBlueprintResponse, BidForgeError> {
    let file_bytes = state.s3().download(&request.s3_key).await?;

    // PDF rasterization is handled upstream; the key suffix only feeds
    // provider context here.
    let file_type = if request.s3_key.to_lowercase().ends_with(".pdf") {
        "pdf"
    } else {
        "image"
    };

    let ocr = state.ocr().extract_text(&file_bytes).await?;

    let mut context = match &request.options {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    context.insert("file_type".to_string(), json!(file_type));
    if let Some(project_name) = &request.project_name {
        context.insert("project_name".to_string(), json!(project_name));
    }

    let analysis = state
        .vision()
        .analyze(&file_bytes, &ocr.raw_text, Some(&Value::Object(context)))
        .await?;

    Ok(AnalyzeBlueprintResponse {
        blueprint_id: request.blueprint_id.clone(),
        status: "completed".to_string(),
        rooms: analysis.rooms,
        openings: analysis.openings,
        fixtures: analysis.fixtures,
        measurements: analysis.measurements,
        materials: analysis.materials,
        raw_ocr_text: Some(ocr.raw_text),
        scale_info: analysis.scale_info,
        trade: analysis.trade,
        confidence_score: analysis.confidence_score,
        processing_time_ms: started.elapsed().as_millis() as u64,
    })
}

/// Handler for `POST /generate-bid`.
async fn generate_bid(
    State(state): State<AppState>,
    Json(request): Json<GenerateBidRequest>,
) -> Result<Json<GenerateBidResponse>, ApiError> {
    info!(
        project_id = %request.project_id,
        blueprint_id = %request.blueprint_id,
        markup = request.markup_percentage,
        "generate bid request"
    );

    if !(0.0..=100.0).contains(&request.markup_percentage) {
        return Err(BidForgeError::Validation(format!(
            "markup_percentage {} outside [0, 100]",
            request.markup_percentage
        ))
        .into());
    }

    let project_info = json!({
        "project_id": request.project_id,
        "blueprint_id": request.blueprint_id,
    });

    let package = state
        .bid()
        .generate_bid(
            &request.takeoff_data,
            request.pricing_rules.as_ref(),
            request.company_info.as_ref(),
            &project_info,
            request.markup_percentage,
        )
        .await
        .map_err(|e| {
            error!(project_id = %request.project_id, error = %e, "bid generation failed");
            ApiError(e)
        })?;

    info!(bid_id = %package.bid_id, total_price = package.total_price, "bid generation complete");
    Ok(Json(bid_response(package, request.project_id.clone())))
}

fn bid_response(package: BidPackage, project_id: String) -> GenerateBidResponse {
    GenerateBidResponse {
        bid_id: package.bid_id,
        project_id,
        status: "completed".to_string(),
        scope_of_work: package.scope_of_work,
        line_items: package.line_items,
        labor_cost: package.labor_cost,
        material_cost: package.material_cost,
        subtotal: package.subtotal,
        markup_amount: package.markup_amount,
        total_price: package.total_price,
        exclusions: package.exclusions,
        inclusions: package.inclusions,
        schedule: package.schedule,
        payment_terms: package.payment_terms,
        warranty_terms: package.warranty_terms,
        closing_statement: package.closing_statement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidforge_config::Settings;

    fn test_state() -> AppState {
        // Default settings carry no provider credentials, so handlers run
        // entirely on mock provider paths.
        AppState::new(Settings::default())
    }

    #[tokio::test]
    async fn health_reports_ok_and_version() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn out_of_range_markup_is_rejected_with_422() {
        let request = GenerateBidRequest {
            project_id: "p-1".to_string(),
            blueprint_id: "b-1".to_string(),
            takeoff_data: json!({}),
            pricing_rules: None,
            company_info: None,
            markup_percentage: 150.0,
        };
        let result = generate_bid(State(test_state()), Json(request)).await;
        let err = result.err().expect("markup validation should fail");
        assert_eq!(err.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn generate_bid_returns_consistent_totals() {
        let request = GenerateBidRequest {
            project_id: "p-1".to_string(),
            blueprint_id: "b-1".to_string(),
            takeoff_data: json!({
                "materials": [
                    { "material_name": "Drywall", "quantity": 100.0, "unit": "sq ft" }
                ]
            }),
            pricing_rules: None,
            company_info: None,
            markup_percentage: 20.0,
        };
        let Json(response) = generate_bid(State(test_state()), Json(request))
            .await
            .expect("bid generation should succeed on the mock path");

        assert_eq!(response.status, "completed");
        assert_eq!(response.project_id, "p-1");
        let item_sum: f64 = response.line_items.iter().map(|i| i.total).sum();
        assert!((response.subtotal - item_sum).abs() < 1e-9);
        assert!(
            (response.total_price - (response.subtotal + response.markup_amount)).abs() < 1e-9
        );
    }
}
