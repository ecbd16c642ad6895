// src/mock_server.rs

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::routing::{get, post};
use axum::{serve, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::decision::request::DecisionRequest;
use crate::model::placements::Placement;

/// 模拟服务认识的广告位
pub const KNOWN_PLACEMENTS: [&str; 7] = [
    "home",
    "search",
    "menu",
    "promotions",
    "waiting",
    "vehicleSelection",
    "rideSummary",
];

/// 每个广告位最多返回的创意数
pub const MAX_CREATIVES: u32 = 3;

#[derive(Clone, Debug)]
pub struct MockState {
    base_url: String,
    tracked: Arc<Mutex<Vec<String>>>,
}

impl MockState {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            tracked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 已收到的追踪请求（path + query）
    pub fn tracked_urls(&self) -> Vec<String> {
        self.tracked.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

/// 模拟决策接口
/// 未知广告位或空广告位列表返回 422，count 超过上限时截断并给出 warning。
async fn handle_decision(
    State(state): State<MockState>,
    Json(request): Json<DecisionRequest>,
) -> (StatusCode, Json<Value>) {
    info!(
        "Mock decision server received request: placements={}",
        request.placements().len()
    );

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if request.placements().is_empty() {
        errors.push(json!({"code": 1000, "message": "At least one placement is required"}));
    }

    for placement in request.placements() {
        if !KNOWN_PLACEMENTS.contains(&placement.key.as_str()) {
            errors.push(json!({
                "code": 1001,
                "message": format!("Invalid placement key: {}", placement.key)
            }));
        } else if placement.count() > MAX_CREATIVES {
            warnings.push(json!({
                "code": 2001,
                "message": format!("Placement '{}' count capped at {}", placement.key, MAX_CREATIVES)
            }));
        }
    }

    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"success": false, "data": null, "errors": errors, "warnings": null})),
        );
    }

    let decisions: Vec<Value> = request
        .placements()
        .iter()
        .map(|placement| decision_for(&state.base_url, placement))
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": decisions,
            "errors": null,
            "warnings": if warnings.is_empty() { Value::Null } else { json!(warnings) },
        })),
    )
}

fn decision_for(base_url: &str, placement: &Placement) -> Value {
    let count = placement.count().clamp(1, MAX_CREATIVES);
    let creatives: Vec<Value> = (1..=count)
        .map(|index| {
            if placement.key == "waiting" {
                video_creative(base_url, &placement.key, index)
            } else {
                native_creative(base_url, placement, index)
            }
        })
        .collect();
    json!({"placement": placement.key, "creatives": creatives})
}

fn tracking_url(base_url: &str, event: &str, placement: &str, index: u32) -> String {
    format!(
        "{}/track?event={}&placement={}&creative={}",
        base_url, event, placement, index
    )
}

fn native_creative(base_url: &str, placement: &Placement, index: u32) -> Value {
    let key = placement.key.as_str();
    json!({
        "contents": [
            {"key": "headline", "value": format!("Mock {} ad #{}", key, index), "type": "text"},
            {"key": "body", "value": "Experience premium rides with exceptional comfort and safety.", "type": "text"},
            {"key": "coverImage", "value": "https://picsum.photos/800/400", "type": "image"},
            {"key": "destinationURL", "value": "https://example.com/book-ride", "type": "url"},
            {"key": "rating", "value": 4.5, "type": "number"}
        ],
        "advertiser": {
            "name": "Ride Share Co",
            "legalName": "Ride Share Corporation",
            "logoUrl": "https://picsum.photos/200"
        },
        "template": {"key": key, "style": "default"},
        "tracking": {
            "impressions": [{"key": "default", "url": tracking_url(base_url, "impression", key, index)}],
            "clicks": [{"key": "default", "url": tracking_url(base_url, "click", key, index)}],
            "custom": null
        },
        "metadata": {
            "adId": format!("ad-{}-{}", key, index),
            "creativeId": format!("creative-{}", index),
            "advertiserId": placement.advertiser_id.clone().unwrap_or_else(|| "adv-1".to_string()),
            "templateId": placement.template_id.clone().unwrap_or_else(|| key.to_string()),
            "placementId": key,
            "priority": "high",
            "language": "en"
        },
        "delivery": "json"
    })
}

fn video_creative(base_url: &str, key: &str, index: u32) -> Value {
    json!({
        "contents": [
            {"key": "headline", "value": format!("Mock video ad #{}", index), "type": "text"},
            {"key": "isSkippable", "value": true, "type": "boolean"},
            {"key": "skipOffset", "value": "00:00:05", "type": "text"}
        ],
        "advertiser": {"name": "Ride Share Co"},
        "tracking": {
            "impressions": [{"key": "default", "url": tracking_url(base_url, "impression", key, index)}],
            "videoEvents": [
                {"key": "start", "url": tracking_url(base_url, "start", key, index)},
                {"key": "complete", "url": tracking_url(base_url, "complete", key, index)}
            ]
        },
        "metadata": {
            "adId": format!("ad-{}-{}", key, index),
            "duration": 30,
            "aspectRatio": "16:9",
            "isSkippable": true
        },
        "delivery": "vast_tag",
        "vast": {"tagUrl": format!("{}/vast/{}.xml", base_url, index)},
        "verificationScriptResources": [
            {"vendorKey": "iabtechlab.com-omid", "scriptUrl": "https://verify.example.com/omid.js"}
        ]
    })
}

/// 记录追踪请求
async fn handle_track(State(state): State<MockState>, uri: Uri) -> StatusCode {
    info!("Mock decision server received tracking: {}", uri);
    if let Ok(mut tracked) = state.tracked.lock() {
        tracked.push(uri.to_string());
    }
    StatusCode::NO_CONTENT
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/v1/decision", post(handle_decision))
        .route("/track", get(handle_track))
        .with_state(state)
}

/// 启动模拟决策服务，返回实际监听地址（addr 可以用端口 0）
pub async fn spawn_mock_server(addr: &str) -> std::io::Result<(SocketAddr, MockState)> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let state = MockState::new(format!("http://{}", local_addr));
    let app = router(state.clone());

    tokio::spawn(async move {
        if let Err(e) = serve(listener, app).await {
            error!("Mock decision server stopped: {}", e);
        }
    });

    info!("Mock decision server running at http://{}", local_addr);
    Ok((local_addr, state))
}
