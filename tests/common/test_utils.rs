use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use banknote_detector::{
    config::ServerConfig,
    model::{Classifier, RobustScaler, Scorer},
    server::{self, AppState},
};
use serde_json::Value;
use std::sync::Arc;

pub const HEADER: &str = "diagonal,height_left,height_right,margin_low,margin_up,length";

pub const BOUNDARY: &str = "banknote-test-boundary";

/// One genuine-looking and one counterfeit-looking banknote.
pub const SAMPLE_ROWS: [&str; 2] = [
    "172.0,104.0,103.8,4.0,3.0,113.2",
    "171.6,104.3,104.2,5.8,3.5,111.0",
];

pub fn csv_with_rows(header: &str, rows: &[&str]) -> String {
    let mut csv = format!("{header}\n");
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

pub fn sample_csv() -> String {
    csv_with_rows(HEADER, &SAMPLE_ROWS)
}

/// Router over an identity scaler and the given classifier.
pub fn create_test_app(classifier: Arc<dyn Classifier>) -> Router {
    create_test_app_with_config(classifier, &ServerConfig::default())
}

pub fn create_test_app_with_config(classifier: Arc<dyn Classifier>, config: &ServerConfig) -> Router {
    let scorer = Scorer::new(RobustScaler::identity(), classifier);
    let state = AppState {
        scorer: Arc::new(scorer),
    };
    server::router(state, config).unwrap()
}

pub fn multipart_body(field: &str, file_name: &str, content_type: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\
         \r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

pub fn predict_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn csv_upload_request(content: &str) -> Request<Body> {
    predict_request(multipart_body("file", "billets.csv", "text/csv", content))
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn artifact_path(name: &str) -> String {
    format!("{}/models/{name}", env!("CARGO_MANIFEST_DIR"))
}
