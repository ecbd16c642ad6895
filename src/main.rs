// src/main.rs

use clap::Parser;
use std::time::Duration;
use tracing::{error, info, warn};

use admoai::logging::init_tracing;
use admoai::mock_server::spawn_mock_server;
use admoai::{
    AdMoai, ApiError, Consent, ContentsExt, Creative, DynamicValue, Placement, SdkConfig,
    UserConfigPatch, DEFAULT_TRACKING_KEY,
};

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "AdMoai decision API demo client")]
struct CliArgs {
    /// 决策服务地址
    #[arg(long, default_value = "http://localhost:8080")]
    base_url: String,
    /// JSON 格式的 SDK 配置文件，优先于 --base-url
    #[arg(long)]
    config: Option<String>,
    #[arg(short, long = "placement", default_value = "home")]
    placements: Vec<String>,
    #[arg(long, default_value_t = 1)]
    count: u32,
    #[arg(long = "geo")]
    geo: Vec<u64>,
    /// 形如 "40.7128,-74.0060"
    #[arg(long = "location", value_parser = parse_location)]
    locations: Vec<(f64, f64)>,
    /// 形如 "category=sports"
    #[arg(long = "custom", value_parser = parse_custom)]
    custom: Vec<(String, DynamicValue)>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    user_ip: Option<String>,
    #[arg(long)]
    timezone: Option<String>,
    #[arg(long)]
    gdpr: bool,
    #[arg(long)]
    no_app: bool,
    #[arg(long)]
    no_device: bool,
    #[arg(long)]
    api_version: Option<String>,
    #[arg(long)]
    language: Option<String>,
    /// 在本地端口启动模拟决策服务并向它发请求
    #[arg(long)]
    mock: Option<u16>,
    /// 只打印 HTTP 请求，不发送
    #[arg(long)]
    dry_run: bool,
    #[arg(long)]
    fire_impressions: bool,
    #[arg(long, default_value = "logs")]
    log_dir: String,
}

fn parse_location(raw: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{}\"", raw))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| format!("latitude: {}", e))?;
    let lon = lon.trim().parse::<f64>().map_err(|e| format!("longitude: {}", e))?;
    Ok((lat, lon))
}

// 值依次尝试 bool / 整数 / 浮点数，都不是则按字符串处理
fn parse_custom(raw: &str) -> Result<(String, DynamicValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected \"key=value\", got \"{}\"", raw))?;
    if key.is_empty() {
        return Err("custom targeting key must not be empty".to_string());
    }
    let value = if let Ok(b) = value.parse::<bool>() {
        DynamicValue::Bool(b)
    } else if let Ok(i) = value.parse::<i64>() {
        DynamicValue::Int(i)
    } else if let Ok(f) = value.parse::<f64>() {
        DynamicValue::Double(f)
    } else {
        DynamicValue::String(value.to_string())
    };
    Ok((key.to_string(), value))
}

fn print_creative(index: usize, creative: &Creative) {
    let headline = creative
        .contents
        .get_content("headline")
        .map(|c| c.value.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  [{}] {} (advertiser: {}, delivery: {})",
        index,
        headline,
        creative.advertiser.name.as_deref().unwrap_or("-"),
        creative.delivery.as_deref().unwrap_or("json"),
    );
    if let Some(tag) = creative.get_vast_tag_url(None, None) {
        println!("      vast tag: {}", tag);
    }
    if creative.is_skippable() {
        println!(
            "      skippable after {}",
            creative.get_skip_offset().unwrap_or_else(|| "0".to_string())
        );
    }
    if creative.has_om_verification() {
        println!("      OM verification resources attached");
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化全局 tracing 日志
    let _guard = match init_tracing(&args.log_dir, "admoai_demo.json") {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args).await {
        error!("Demo failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SdkConfig::from_json_file(path)?,
        None => SdkConfig::new(args.base_url.clone()),
    };

    if let Some(port) = args.mock {
        let (addr, _state) = spawn_mock_server(&format!("127.0.0.1:{}", port)).await?;
        config.base_url = format!("http://{}", addr);
        info!("Using mock decision server at {}", config.base_url);
    }
    if let Some(version) = &args.api_version {
        config = config.with_api_version(version.clone());
    }
    if let Some(language) = &args.language {
        config = config.with_default_language(language.clone());
    }

    let mut sdk = AdMoai::new(config)?;
    sdk.set_user_config(UserConfigPatch {
        id: args.user_id.clone(),
        ip: args.user_ip.clone(),
        timezone: args.timezone.clone(),
        consent: Some(Consent::new(args.gdpr)),
    });

    let mut builder = sdk.create_request_builder();
    for key in &args.placements {
        builder = builder.add_placement(Placement::new(key.clone()).with_count(args.count));
    }
    for geo in &args.geo {
        builder = builder.add_geo_targeting(*geo);
    }
    for (lat, lon) in &args.locations {
        builder = builder.add_location_targeting(*lat, *lon);
    }
    for (key, value) in &args.custom {
        builder = builder.add_custom_targeting(key.clone(), value.clone());
    }
    if args.no_app {
        builder = builder.disable_app_collection();
    }
    if args.no_device {
        builder = builder.disable_device_collection();
    }
    let request = builder.build();

    if args.dry_run {
        let http = sdk.get_http_request(&request)?;
        println!("{} {}{}", http.method.as_str(), sdk.config().base_url, http.path);
        for (name, value) in &http.headers {
            println!("{}: {}", name, value);
        }
        println!();
        println!("{}", http.body_text().unwrap_or_default());
        return Ok(());
    }

    let response = match sdk.request_ads(&request).await {
        Ok(response) => response,
        Err(ApiError::ValidationError(errors)) => {
            for e in &errors {
                println!("error [{}] {}", e.code, e.message);
            }
            return Err(ApiError::ValidationError(errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("HTTP {} (success: {})", response.status, response.body.success);
    for w in response.body.warnings() {
        warn!(code = w.code, "Decision warning: {}", w.message);
        println!("warning [{}] {}", w.code, w.message);
    }
    for e in response.body.errors() {
        println!("error [{}] {}", e.code, e.message);
    }

    let decisions = response.body.data.unwrap_or_default();
    for decision in &decisions {
        println!("placement {}: {} creative(s)", decision.placement, decision.creatives().len());
        for (index, creative) in decision.creatives().iter().enumerate() {
            print_creative(index + 1, creative);
            if args.fire_impressions {
                sdk.fire_impression(&creative.tracking, DEFAULT_TRACKING_KEY);
            }
        }
    }

    if args.fire_impressions {
        // 追踪请求在后台发送，留出时间让它们完成
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Ok(())
}
