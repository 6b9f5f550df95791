use std::sync::Arc;

use chrono::{Days, NaiveDate};
use price_cache::store::BarStore;
use price_ingestor::providers::yahoo_chart::{YahooChartConfig, YahooChartProvider};
use serde_json::json;
use vol_analytics::percentile::Bucket;
use vol_service::{ErrorBody, ErrorClass, VolatilityService};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

mod common;
use common::{CannedProvider, harness, history, today};

#[tokio::test]
async fn first_request_fetches_then_cache_serves() {
    let provider = CannedProvider::new(history(400));
    let h = harness(provider.clone());

    let first = h.service.get_volatility("spy", None).await.unwrap();
    assert_eq!(provider.calls(), 1);
    assert_eq!(first.ticker, "SPY");
    assert_eq!(first.history.len(), 252);
    assert!(first.returns.ytd.is_some());
    assert_eq!(h.service.freshness("SPY").unwrap(), Some(today()));

    let second = h.service.get_volatility("SPY", Some(5)).await.unwrap();
    assert_eq!(provider.calls(), 1, "same-day request must not refetch");
    assert_eq!(first, second);
}

#[tokio::test]
async fn report_serializes_with_wire_names() {
    let h = harness(CannedProvider::new(history(200)));
    let report = h.service.get_volatility("QQQ", Some(1)).await.unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["ticker"], "QQQ");
    assert!(value["percentile_thresholds"]["30d"]["p50"].is_number());
    assert!(value["returns"]["week"].is_number());
    let bucket = value["vol_90d_bucket"].as_str().unwrap();
    assert!(["<p50", "p50-p90", "p90-p99", ">p99"].contains(&bucket));
    assert_eq!(value["history"].as_array().unwrap().len(), 200 - 90);
    assert!(matches!(
        report.vol_30d_bucket,
        Bucket::BelowP50 | Bucket::P50ToP90 | Bucket::P90ToP99 | Bucket::AboveP99
    ));
}

#[tokio::test]
async fn ytd_is_absent_when_no_bar_is_in_the_current_year() {
    let last_session = NaiveDate::from_ymd_opt(2023, 12, 15).unwrap();
    let shift = Days::new((today() - last_session).num_days() as u64);
    let bars = history(300)
        .into_iter()
        .map(|mut bar| {
            bar.date = bar.date - shift;
            bar
        })
        .collect();
    let h = harness(CannedProvider::new(bars));

    let report = h.service.get_volatility("OLD", None).await.unwrap();
    assert_eq!(report.returns.ytd, None);
    assert!(report.returns.daily.is_some());
    assert_eq!(report.history.last().unwrap().date, last_session);
}

#[tokio::test]
async fn short_history_is_not_found() {
    let h = harness(CannedProvider::new(history(60)));
    let err = h.service.get_volatility("IPO", None).await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::NotFound);
    assert_eq!(err.detail(), "Not enough data to calculate volatility for IPO");
}

#[tokio::test]
async fn empty_provider_answer_is_not_found() {
    let h = harness(CannedProvider::new(Vec::new()));
    let err = h.service.get_volatility("nada", None).await.unwrap_err();

    assert_eq!(err.class().status_code(), 404);
    assert_eq!(
        ErrorBody::from(&err),
        ErrorBody {
            detail: "No data found for ticker: NADA".into()
        }
    );
}

#[tokio::test]
async fn bad_requests() {
    let provider = CannedProvider::new(history(200));
    let h = harness(provider.clone());

    let zero = h.service.get_volatility("SPY", Some(0)).await.unwrap_err();
    assert_eq!(zero.class(), ErrorClass::BadRequest);

    let blank = h.service.get_volatility("   ", None).await.unwrap_err();
    assert_eq!(blank.class(), ErrorClass::BadRequest);

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn health_does_not_need_a_service() {
    assert_eq!(VolatilityService::health().status, "healthy");
}

fn chart_payload(days: u64) -> serde_json::Value {
    let start = today() - Days::new(days - 1);
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let bars = history(days);
    let timestamps: Vec<i64> = (0..days)
        .map(|i| (start + Days::new(i) - epoch).num_seconds() + 14 * 3600)
        .collect();
    let col = |f: fn(&price_ingestor::models::bar::Bar) -> f64| -> Vec<f64> { bars.iter().map(f).collect() };

    json!({
        "chart": {
            "result": [{
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": col(|b| b.open),
                        "high": col(|b| b.high),
                        "low": col(|b| b.low),
                        "close": col(|b| b.close),
                        "volume": vec![1000; days as usize]
                    }]
                }
            }],
            "error": null
        }
    })
}

fn chart_harness(server: &MockServer) -> common::Harness {
    let provider = YahooChartProvider::with_config(YahooChartConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();
    harness(Arc::new(provider))
}

#[tokio::test]
async fn end_to_end_through_chart_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/MSFT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload(150)))
        .expect(1)
        .mount(&server)
        .await;

    let h = chart_harness(&server);
    let report = h.service.get_volatility("msft", Some(1)).await.unwrap();

    assert_eq!(report.ticker, "MSFT");
    assert_eq!(report.history.len(), 60);
    assert_eq!(report.history.last().unwrap().date, today());
    // Adjusted close falls back to close when the payload has none.
    let stored = h.store.read_range("MSFT", today(), today()).unwrap();
    assert_eq!(stored.bars[0].adjusted_close, stored.bars[0].close);
    assert_eq!(stored.bars[0].volume, 1000);

    // Served from the cache now; the mock's expect(1) verifies on drop.
    h.service.get_volatility("MSFT", Some(1)).await.unwrap();
}

#[tokio::test]
async fn upstream_failure_is_internal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = chart_harness(&server);
    let err = h.service.get_volatility("SPY", None).await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::Internal);
    assert!(err.detail().starts_with("Error calculating volatility: "), "{}", err.detail());
    assert!(err.provider_error().is_some());
    assert_eq!(h.service.freshness("SPY").unwrap(), None);
}

#[tokio::test]
async fn unknown_symbol_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } }
        })))
        .mount(&server)
        .await;

    let h = chart_harness(&server);
    let err = h.service.get_volatility("XXXX", None).await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::NotFound);
    assert_eq!(err.detail(), "No data found for ticker: XXXX");
}
