//! Exercises the reqwest-backed inference client against a local HTTP
//! server speaking the `/predict` contract, including the failure shapes
//! the engine must keep distinguishable.

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use estate_ai::workflows::estimation::{
    HttpInferenceClient, InferenceError, InferenceGateway, PredictionRequest,
};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind an ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server runs");
    });
    format!("http://{addr}/predict")
}

fn prediction_request() -> PredictionRequest {
    PredictionRequest {
        city_code: "34101".to_string(),
        features: [120.0, 6.5, 18.0, 60.0, 200.0],
    }
}

fn client(endpoint: String) -> HttpInferenceClient {
    HttpInferenceClient::new(endpoint, Duration::from_secs(2)).expect("client builds")
}

#[tokio::test]
async fn successful_prediction_round_trips() {
    let router = Router::new().route(
        "/predict",
        post(|Json(body): Json<serde_json::Value>| async move {
            // Echo the code back so the test can confirm the payload shape.
            Json(json!({
                "predicted_price": 28_500_000,
                "city_code": body["city_code"],
            }))
        }),
    );

    let endpoint = serve(router).await;
    let price = client(endpoint)
        .predict(&prediction_request())
        .await
        .expect("prediction succeeds");

    assert_eq!(price, 28_500_000.0);
}

#[tokio::test]
async fn zero_prediction_is_returned_not_rejected() {
    let router = Router::new().route(
        "/predict",
        post(|| async { Json(json!({ "predicted_price": 0 })) }),
    );

    let endpoint = serve(router).await;
    let price = client(endpoint)
        .predict(&prediction_request())
        .await
        .expect("zero is a valid prediction");

    assert_eq!(price, 0.0);
}

#[tokio::test]
async fn non_success_status_is_an_inference_failure() {
    let router = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
    );

    let endpoint = serve(router).await;
    let error = client(endpoint)
        .predict(&prediction_request())
        .await
        .expect_err("HTTP 500 fails");

    assert!(matches!(error, InferenceError::Status(500)));
}

#[tokio::test]
async fn missing_predicted_price_is_reported_distinctly() {
    let router = Router::new().route(
        "/predict",
        post(|| async { Json(json!({ "price": 123 })) }),
    );

    let endpoint = serve(router).await;
    let error = client(endpoint)
        .predict(&prediction_request())
        .await
        .expect_err("field is required");

    assert!(matches!(error, InferenceError::MissingPrediction));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let router = Router::new().route("/predict", post(|| async { "predicted_price=1" }));

    let endpoint = serve(router).await;
    let error = client(endpoint)
        .predict(&prediction_request())
        .await
        .expect_err("body must be JSON");

    assert!(matches!(error, InferenceError::MalformedBody(_)));
}

#[tokio::test]
async fn negative_prediction_is_malformed() {
    let router = Router::new().route(
        "/predict",
        post(|| async { Json(json!({ "predicted_price": -1 })) }),
    );

    let endpoint = serve(router).await;
    let error = client(endpoint)
        .predict(&prediction_request())
        .await
        .expect_err("prices are non-negative");

    assert!(matches!(error, InferenceError::MalformedBody(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let router = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "predicted_price": 1 }))
        }),
    );

    let endpoint = serve(router).await;
    let client =
        HttpInferenceClient::new(endpoint, Duration::from_millis(100)).expect("client builds");
    let error = client
        .predict(&prediction_request())
        .await
        .expect_err("timeout bounds the call");

    assert!(matches!(error, InferenceError::Timeout));
}
