#![cfg(target_arch = "wasm32")]

use gloo_timers::future::sleep;
use std::time::Duration;
use trading_chart_wasm::application::RequestSequencer;
use trading_chart_wasm::config::{DataSourceConfig, Theme};
use trading_chart_wasm::domain::logging::TimeProvider;
use trading_chart_wasm::domain::market_data::Symbol;
use trading_chart_wasm::infrastructure::{AlphaVantageClient, BrowserTimeProvider};
use trading_chart_wasm::presentation::wasm_api::theme_from_search;
use wasm_bindgen_test::*;
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test(async)]
async fn superseded_fetch_is_aborted() {
    let mut sequencer = RequestSequencer::new();
    let (_, slow) = sequencer.begin(sleep(Duration::from_millis(50)));
    let (_, fast) = sequencer.begin(sleep(Duration::from_millis(1)));

    assert!(slow.await.is_err());
    assert!(fast.await.is_ok());
}

#[wasm_bindgen_test]
fn request_url_encodes_symbol() {
    let client = AlphaVantageClient::new(DataSourceConfig::default());
    let request = client.request(&client.daily_params(&Symbol::from("at&t"))).build().unwrap();
    let url = request.url();

    assert!(url.starts_with("https://www.alphavantage.co/query?"));
    assert!(url.contains("symbol=AT%26T&"));
    assert!(url.contains("outputsize=full"));
    assert!(!url.contains("&T&"));
}

#[wasm_bindgen_test]
fn theme_is_read_from_decoded_query() {
    assert_eq!(theme_from_search("?theme=light"), Theme::Light);
    assert_eq!(theme_from_search("?lang=en&theme=%6Cight"), Theme::Light);
    assert_eq!(theme_from_search("?theme=neon"), Theme::Dark);
    assert_eq!(theme_from_search(""), Theme::Dark);
}

#[wasm_bindgen_test]
fn browser_clock_formats_time_of_day() {
    let clock = BrowserTimeProvider::new();
    let now = clock.current_timestamp();
    assert!(now > 0);

    let text = clock.format_timestamp(now);
    assert_eq!(text.len(), "00:00:00.000".len());
    assert_eq!(text.matches(':').count(), 2);
}
