//! 决策接口的状态码映射测试
//!
//! 使用 mockito 模拟决策服务的各种响应。

use std::sync::Arc;

use admoai::{
    AdMoai, ApiError, ApiMessage, HttpStatus, Placement, SdkConfig, StaticDetailsProvider,
};
use mockito::{Matcher, Server};

fn sdk(config: SdkConfig) -> AdMoai {
    AdMoai::with_details_provider(config, Arc::new(StaticDetailsProvider::default()))
        .expect("sdk should initialize")
}

fn home_request(sdk: &AdMoai) -> admoai::DecisionRequest {
    sdk.create_request_builder()
        .add_placement(Placement::new("home"))
        .build()
}

const SUCCESS_BODY: &str = r#"{
    "success": true,
    "data": [
        {
            "placement": "home",
            "creatives": [
                {
                    "contents": [
                        {"key": "headline", "value": "Ride in style", "type": "text"},
                        {"key": "rating", "value": 4.5, "type": "number"}
                    ],
                    "advertiser": {"name": "Ride Share Co"},
                    "tracking": {
                        "impressions": [{"key": "default", "url": "https://t.example.com/imp"}],
                        "clicks": [{"key": "default", "url": "https://t.example.com/click"}]
                    },
                    "metadata": {"adId": "ad-1", "priority": "high"},
                    "delivery": "json"
                }
            ]
        }
    ],
    "errors": null,
    "warnings": [{"code": 2001, "message": "count capped"}]
}"#;

#[tokio::test]
async fn test_success_with_warnings() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SUCCESS_BODY)
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let response = sdk.request_ads(&home_request(&sdk)).await.unwrap();

    assert_eq!(response.status, 200);
    assert!(response.body.success);
    assert!(response.body.has_warnings());
    assert_eq!(response.body.warnings(), &[ApiMessage::new(2001, "count capped")]);
    assert!(response.raw_body.as_deref().unwrap().contains("Ride in style"));

    let decisions = response.body.data.unwrap();
    assert_eq!(decisions.len(), 1);
    let creative = &decisions[0].creatives()[0];
    assert!(creative.is_json_delivery());
    assert_eq!(
        creative.tracking.get_impression_url("default"),
        Some("https://t.example.com/imp")
    );
}

#[tokio::test]
async fn test_validation_error_carries_server_messages() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success": false, "data": null,
                "errors": [{"code": 1001, "message": "Invalid placement key: nope"},
                           {"code": 1002, "message": "Invalid count"}],
                "warnings": null}"#,
        )
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();

    match err {
        ApiError::ValidationError(errors) => assert_eq!(
            errors,
            vec![
                ApiMessage::new(1001, "Invalid placement key: nope"),
                ApiMessage::new(1002, "Invalid count"),
            ]
        ),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_validation_error_with_garbage_body() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(422)
        .with_body("not json")
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();
    assert!(matches!(&err, ApiError::ValidationError(errors) if errors.is_empty()));
    assert_eq!(err.to_string(), "Validation error: Unknown");
}

#[tokio::test]
async fn test_server_error_ignores_body() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(500)
        .with_body(SUCCESS_BODY)
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();
    assert!(matches!(err, ApiError::ServerError(500)));
}

#[tokio::test]
async fn test_client_errors() {
    for (code, expected) in [
        (400, HttpStatus::BadRequest),
        (404, HttpStatus::NotFound),
        (405, HttpStatus::MethodNotAllowed),
        (410, HttpStatus::Gone),
        (429, HttpStatus::TooManyRequests),
    ] {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/decision")
            .with_status(code)
            .create_async()
            .await;

        let sdk = sdk(SdkConfig::new(server.url()));
        match sdk.request_ads(&home_request(&sdk)).await {
            Err(ApiError::ClientError(status)) => assert_eq!(status, expected),
            other => panic!("status {}: unexpected result {:?}", code, other),
        }
    }
}

#[tokio::test]
async fn test_unlisted_status_is_unexpected() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(418)
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedStatusCode(418)));
}

#[tokio::test]
async fn test_empty_success_body_is_decoding_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(200)
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();
    assert!(matches!(err, ApiError::DecodingError(_)));
}

#[tokio::test]
async fn test_non_object_success_body_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(200)
        .with_body(r#"["home"]"#)
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse));
}

#[tokio::test]
async fn test_malformed_success_body_is_decoding_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(200)
        .with_body(r#"{"success": "yes"}"#)
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();
    assert!(matches!(err, ApiError::DecodingError(_)));
}

#[tokio::test]
async fn test_optional_headers_are_sent() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/v1/decision")
        .match_header("x-decision-version", "2025-01-01")
        .match_header("accept-language", "es-ES")
        .match_header("accept", "application/json")
        .match_body(Matcher::PartialJsonString(
            r#"{"placements": [{"key": "home", "count": 1}]}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"success": true, "data": []}"#)
        .create_async()
        .await;

    let config = SdkConfig::new(server.url())
        .with_api_version("2025-01-01")
        .with_default_language("es-ES");
    let sdk = sdk(config);
    let response = sdk.request_ads(&home_request(&sdk)).await.unwrap();
    assert_eq!(response.body.data.map(|d| d.len()), Some(0));
    m.assert_async().await;
}

#[tokio::test]
async fn test_debug_mode_returns_validation_envelope() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/decision")
        .with_status(422)
        .with_body(
            r#"{"success": false, "errors": [{"code": 1001, "message": "Invalid placement key: nope"}]}"#,
        )
        .create_async()
        .await;

    let sdk = sdk(SdkConfig::new(server.url()).with_debug_responses(true));
    let response = sdk.request_ads(&home_request(&sdk)).await.unwrap();
    assert_eq!(response.status, 422);
    assert!(!response.body.success);
    assert_eq!(response.body.errors()[0].code, 1001);
    assert!(response.body.data.is_none());
}

#[tokio::test]
async fn test_invalid_base_url() {
    let sdk = sdk(SdkConfig::new("not a url"));
    let err = sdk.request_ads(&home_request(&sdk)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_non_finite_location_is_encoding_error() {
    let server = Server::new_async().await;
    let sdk = sdk(SdkConfig::new(server.url()));
    let request = sdk
        .create_request_builder()
        .add_placement_key("home")
        .add_location_targeting(f64::NAN, 0.0)
        .build();
    let err = sdk.request_ads(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::EncodingError(_)));
}
