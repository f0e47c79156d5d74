mod common;
mod config;
mod quantize_service;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, RawBody},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use common::{read_body, Error, ErrorResponse};
use config::Config;
use handlebars::Handlebars;
use mstquant::palette::to_hex;
use quantize_service::{QuantizeRequest, QuantizeService, QuantizeServiceHandle, Smoothing};
use serde::{Deserialize, Serialize};

/// Mask size used when a request asks for smoothing without giving one.
const DEFAULT_MASK_SIZE: usize = 5;

#[derive(Serialize)]
struct IndexData {
    root: String,
    default_colors: usize,
    default_mask_size: usize,
    max_upload_bytes: usize,
    max_pixels: usize,
    max_distinct_colors: usize,
}

fn render_index(index_data: IndexData) -> String {
    const INDEX_HBS: &str = include_str!("index.hbs");
    let mut hbs = Handlebars::new();
    hbs.register_template_string("index_hbs", INDEX_HBS)
        .expect("error in index.hbs template");

    hbs.render("index_hbs", &index_data)
        .expect("cannot render index template")
}

struct State {
    /// The index containing documentation.
    index: String,

    /// Requests with larger bodies are rejected before decoding.
    max_upload_bytes: usize,

    /// The quantize service.
    quantize_service: QuantizeServiceHandle,
}

async fn index(state: Arc<State>) -> Html<String> {
    Html(state.index.clone())
}

#[derive(Deserialize)]
struct QuantizeParams {
    colors: Option<usize>,
    sigma: Option<f64>,
    mask_size: Option<usize>,
}

fn header_value(value: String) -> Result<HeaderValue, ErrorResponse> {
    HeaderValue::try_from(value).map_err(|_| Error::InvalidHeader.to_response())
}

async fn quantize(
    state: Arc<State>,
    Query(params): Query<QuantizeParams>,
    headers: HeaderMap,
    RawBody(body): RawBody,
) -> Result<Response, ErrorResponse> {
    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    tracing::debug!(
        colors = ?params.colors,
        sigma = ?params.sigma,
        ?content_length,
        "serving quantize request"
    );

    let limit = state.max_upload_bytes;
    if let Some(size) = content_length.filter(|&size| size > limit) {
        return Err(Error::UploadTooLarge { size, limit }.to_response());
    }
    let body = read_body(body, limit)
        .await
        .map_err(|e| e.to_response())?;
    if body.is_empty() {
        return Err(Error::MissingBody.to_response());
    }

    let smoothing = params.sigma.map(|sigma| Smoothing {
        sigma,
        mask_size: params.mask_size.unwrap_or(DEFAULT_MASK_SIZE),
    });
    let result = state
        .quantize_service
        .quantize(QuantizeRequest {
            image: body,
            colors: params.colors,
            smoothing,
        })
        .await
        .map_err(|e| e.to_response())?;

    let palette: Vec<_> = result.palette.iter().map(|&c| to_hex(c)).collect();
    let distinct_count = header_value(result.distinct_count.to_string())?;
    let mst_weight = header_value(format!("{:.2}", result.mst_weight))?;
    let palette = header_value(palette.join(","))?;

    let mut response = result.png.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert("x-distinct-colors", distinct_count);
    headers.insert("x-mst-weight", mst_weight);
    headers.insert("x-palette", palette);
    Ok(response)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config_path = Config::path();
    tracing::debug!("loading config from {config_path:?}");
    let config = std::fs::read_to_string(&config_path).expect("failed to load config file");
    let config: Config = toml::from_str(&config).expect("config TOML deserialization error");

    let index_html = render_index(IndexData {
        root: config.server.root.clone(),
        default_colors: config.quantize_service.default_colors,
        default_mask_size: DEFAULT_MASK_SIZE,
        max_upload_bytes: config.server.max_upload_bytes,
        max_pixels: config.quantize_service.max_pixels,
        max_distinct_colors: config.quantize_service.max_distinct_colors,
    });
    let quantize_service = QuantizeService::spawn(config.quantize_service);

    let state = Arc::new(State {
        index: index_html,
        max_upload_bytes: config.server.max_upload_bytes,
        quantize_service,
    });

    let app = Router::new()
        .route(
            "/",
            get({
                let state = Arc::clone(&state);
                move || index(state)
            }),
        )
        .route(
            "/quantize",
            post({
                let state = Arc::clone(&state);
                move |params, headers, body| quantize(state, params, headers, body)
            }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .expect("failed to start server");
}
