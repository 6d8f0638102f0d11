use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, App, HttpRequest, HttpServer, HttpResponse, Result as ActixResult};
use actix_cors::Cors;
use hotspot_core::{FeatureVector, RawRecord};
use hotspot_inference::{CrimeQuery, InferenceContext, InferenceError, Label};
use hotspot_schema::{AlignPolicy, AlignmentReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize)]
struct SchemaInfo<'a> {
    feature_names: &'a [String],
    families: BTreeMap<&'a str, Vec<&'a str>>,
    classes: &'a [Label],
    policy: AlignPolicy,
}

#[derive(Serialize)]
struct AlignResponse {
    features: FeatureVector,
    report: AlignmentReport,
}

#[derive(Serialize)]
struct PredictResponse {
    reporting_district: Label,
    report: AlignmentReport,
}

pub struct RestApi;

impl RestApi {
    /// Register the routes on an actix app
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health", web::get().to(health))
            .route("/schema", web::get().to(get_schema))
            .route("/align", web::post().to(align_record))
            .route("/predict", web::post().to(predict));
    }

    pub async fn start(
        context: Arc<InferenceContext>,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(context.clone()))
                .configure(RestApi::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    })))
}

async fn get_schema(
    context: web::Data<Arc<InferenceContext>>,
) -> ActixResult<HttpResponse> {
    let aligner = context.aligner();
    let info = SchemaInfo {
        feature_names: aligner.schema().columns(),
        families: aligner.family_columns(),
        classes: context.classes(),
        policy: aligner.policy(),
    };
    Ok(HttpResponse::Ok().json(info))
}

async fn align_record(
    context: web::Data<Arc<InferenceContext>>,
    req: web::Json<RawRecord>,
) -> ActixResult<HttpResponse> {
    match context.aligner().align_explained(&req) {
        Ok((features, report)) => Ok(HttpResponse::Ok().json(AlignResponse { features, report })),
        Err(e) => Ok(error_response(&InferenceError::from(e))),
    }
}

async fn predict(
    context: web::Data<Arc<InferenceContext>>,
    req: web::Json<CrimeQuery>,
) -> ActixResult<HttpResponse> {
    match context.predict_query(&req) {
        Ok(prediction) => Ok(HttpResponse::Ok().json(PredictResponse {
            reporting_district: prediction.label,
            report: prediction.report,
        })),
        Err(e) => Ok(error_response(&e)),
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": err.to_string()
    }));
    InternalError::from_response(err, response).into()
}

fn error_response(e: &InferenceError) -> HttpResponse {
    let body = serde_json::json!({
        "error": e.to_string()
    });
    if e.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        warn!("Prediction failed: {}", e);
        HttpResponse::InternalServerError().json(body)
    }
}
