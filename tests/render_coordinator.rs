mod common;

use common::{RecordingNotifier, indexed, intraday_keys, raw_from_keys, trading_year};
use futures::future::ready;
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;
use trading_chart_wasm::application::{
    OHLC_SERIES, RSI_SERIES, RenderCoordinator, RenderOutcome, SMA_SERIES, VOLUME_SERIES,
};
use trading_chart_wasm::config::ChartConfig;
use trading_chart_wasm::domain::chart::{AxisInterval, AxisKind, PaneKind, RenderSurface, SeriesData};
use trading_chart_wasm::domain::errors::{ChartError, FetchError};
use trading_chart_wasm::domain::events::DomainEvent;
use trading_chart_wasm::domain::market_data::{Granularity, RawSeries, Symbol};
use trading_chart_wasm::infrastructure::SceneSurface;

fn coordinator() -> RenderCoordinator<SceneSurface> {
    RenderCoordinator::new(SceneSurface::new(), ChartConfig::default()).unwrap()
}

fn render(
    coordinator: &mut RenderCoordinator<SceneSurface>,
    symbol: &str,
    raw: RawSeries,
    notifier: &RecordingNotifier,
) -> RenderOutcome {
    let symbol = Symbol::from(symbol);
    let granularity = coordinator.granularity();
    let (ticket, _) = coordinator.begin_request(&symbol, ready(()));
    coordinator.complete_request(ticket, &symbol, granularity, Ok(raw), notifier)
}

#[test]
fn trading_year_renders_locked_panes() {
    let mut coordinator = coordinator();
    let notifier = RecordingNotifier::default();

    let outcome = render(&mut coordinator, "aapl", trading_year(), &notifier);
    let RenderOutcome::Rendered(summary) = outcome else {
        panic!("expected a render, got {outcome:?}");
    };

    assert_eq!(summary.points, 252);
    assert!(summary.ticks <= 12);
    assert_eq!(summary.density, NonZeroUsize::new(1));

    let layout = coordinator.panes();
    let master = coordinator.master().unwrap();
    assert_eq!(Some(master), layout.rsi);

    let scene = coordinator.surface();
    let full = AxisInterval::new(0.0, 251.0);
    for pane in layout.iter() {
        assert_eq!(scene.x_interval(pane).unwrap(), full);
    }
    assert_eq!(scene.y_interval(layout.rsi.unwrap()).unwrap(), AxisInterval::new(0.0, 100.0));
    assert_eq!(scene.ticks(master, AxisKind::X).len(), summary.ticks);
    assert_eq!(scene.title(layout.price.unwrap()).as_deref(), Some("AAPL history (1 year)"));
    assert_eq!(scene.series(layout.price.unwrap(), OHLC_SERIES).unwrap().label, "AAPL history");
    assert!(notifier.messages.borrow().is_empty());
}

#[test]
fn rsi_axis_has_fixed_reference_levels() {
    let coordinator = coordinator();
    let rsi = coordinator.panes().rsi.unwrap();
    let ticks = coordinator.surface().ticks(rsi, AxisKind::Y);

    let levels: Vec<(f64, &str, bool)> =
        ticks.iter().map(|t| (t.position, t.label.as_str(), t.show_gridline)).collect();
    assert_eq!(
        levels,
        vec![(0.0, "0", false), (30.0, "30", true), (70.0, "70", true), (100.0, "100", false)]
    );
    assert_eq!(coordinator.surface().title(rsi).as_deref(), Some("RSI"));
}

#[test]
fn render_is_a_single_frame() {
    let mut coordinator = coordinator();
    let before = coordinator.surface().frame();
    render(&mut coordinator, "ibm", trading_year(), &RecordingNotifier::default());
    assert_eq!(coordinator.surface().frame(), before + 1);
}

#[test]
fn new_symbol_discards_previous_ticks() {
    let mut coordinator = coordinator();
    let notifier = RecordingNotifier::default();
    render(&mut coordinator, "ibm", trading_year(), &notifier);

    coordinator.select_granularity(Granularity::Month);
    let outcome = render(&mut coordinator, "msft", raw_from_keys(&intraday_keys(&[2, 2, 3, 3, 4])), &notifier);
    assert!(matches!(outcome, RenderOutcome::Rendered(_)));

    let master = coordinator.master().unwrap();
    let labels: Vec<String> =
        coordinator.surface().ticks(master, AxisKind::X).into_iter().map(|t| t.label).collect();
    assert_eq!(labels, vec!["02", "03", "04"]);
    // RSI reference levels plus the new date ticks
    assert_eq!(coordinator.surface().tick_count(), 4 + 3);
    assert_eq!(coordinator.installed_tick_count(), 3);
    assert_eq!(coordinator.current_symbol(), Some(&Symbol::from("MSFT")));
}

#[test]
fn indicator_windows_follow_density() {
    let config = ChartConfig::default();
    let symbol = Symbol::from("ibm");

    let daily = RenderCoordinator::<SceneSurface>::prepare(&config, &symbol, Granularity::Year, &trading_year())
        .unwrap();
    let Some(SeriesData::Line(sma)) = daily.layer(SMA_SERIES).map(|l| &l.data) else {
        panic!("missing SMA layer");
    };
    // 13 days at one point per day
    assert_eq!(sma.len(), 252 - 12);
    assert_eq!(sma[0].x, 12.0);

    // 4 points per day, one-day intraday window
    let days: Vec<u32> = (2..=6).flat_map(|d| [d; 4]).collect();
    let intraday =
        RenderCoordinator::<SceneSurface>::prepare(&config, &symbol, Granularity::Month, &raw_from_keys(&intraday_keys(&days)))
            .unwrap();
    assert_eq!(intraday.density, NonZeroUsize::new(4));
    let Some(SeriesData::Line(rsi)) = intraday.layer(RSI_SERIES).map(|l| &l.data) else {
        panic!("missing RSI layer");
    };
    assert_eq!(rsi.first().map(|p| p.x), Some(4.0));
    assert_eq!(intraday.name, "IBM intraday");
}

#[test]
fn empty_response_alerts_and_keeps_chart() {
    let mut coordinator = coordinator();
    let notifier = RecordingNotifier::default();
    render(&mut coordinator, "ibm", trading_year(), &notifier);
    let frame = coordinator.surface().frame();

    let outcome = render(&mut coordinator, "zzzz", RawSeries::new(), &notifier);

    assert!(matches!(outcome, RenderOutcome::Failed(_)));
    assert_eq!(coordinator.surface().frame(), frame);
    assert_eq!(coordinator.current_symbol(), Some(&Symbol::from("IBM")));
    let messages = notifier.messages.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Data for 'ZZZZ' not found. May be that:"));
}

#[test]
fn fetch_error_alerts_user() {
    let mut coordinator = coordinator();
    let notifier = RecordingNotifier::default();
    let symbol = Symbol::from("ibm");
    let (ticket, _) = coordinator.begin_request(&symbol, ready(()));

    let outcome = coordinator.complete_request(
        ticket,
        &symbol,
        Granularity::Year,
        Err(FetchError::Api("call frequency exceeded".to_string())),
        &notifier,
    );

    assert_eq!(outcome, RenderOutcome::Failed("data provider error: call frequency exceeded".to_string()));
    assert_eq!(notifier.messages.borrow().len(), 1);
    assert!(!coordinator.state().data_exists);
}

#[test]
fn superseded_request_is_discarded() {
    let mut coordinator = coordinator();
    let notifier = RecordingNotifier::default();
    let first = Symbol::from("ibm");
    let second = Symbol::from("msft");

    let (old, _) = coordinator.begin_request(&first, ready(()));
    let (new, _) = coordinator.begin_request(&second, ready(()));

    let stale = coordinator.complete_request(old, &first, Granularity::Year, Ok(trading_year()), &notifier);
    assert_eq!(stale, RenderOutcome::Stale);
    assert!(!coordinator.state().data_exists);

    let fresh = coordinator.complete_request(new, &second, Granularity::Year, Ok(trading_year()), &notifier);
    assert!(matches!(fresh, RenderOutcome::Rendered(_)));
    assert_eq!(coordinator.current_symbol(), Some(&second));
    assert!(notifier.messages.borrow().is_empty());
}

#[test]
fn range_change_asks_for_a_new_search_only_with_data() {
    let mut coordinator = coordinator();
    assert!(!coordinator.select_granularity(Granularity::Month));

    coordinator.select_granularity(Granularity::Year);
    render(&mut coordinator, "ibm", trading_year(), &RecordingNotifier::default());

    assert!(!coordinator.select_granularity(Granularity::Year));
    assert!(coordinator.select_granularity(Granularity::TenYears));
    assert_eq!(coordinator.granularity(), Granularity::TenYears);
}

#[test]
fn dragging_any_pane_moves_all_of_them() {
    let mut coordinator = coordinator();
    render(&mut coordinator, "ibm", trading_year(), &RecordingNotifier::default());
    let price = coordinator.panes().price.unwrap();

    let report = coordinator.on_axis_changed(price, AxisInterval::new(100.0, 150.0)).unwrap();

    assert_eq!(report.writes, 2);
    for pane in coordinator.panes().iter() {
        assert_eq!(coordinator.surface().x_interval(pane).unwrap(), AxisInterval::new(100.0, 150.0));
    }
    assert_eq!(coordinator.format_position(100.2), "22 May 2023");
}

#[test]
fn master_is_lowest_shown_pane() {
    let config = ChartConfig::from_json(r#"{ "rsi": { "show": false } }"#).unwrap();
    let coordinator = RenderCoordinator::new(SceneSurface::new(), config).unwrap();
    assert_eq!(coordinator.master(), coordinator.panes().volume);
    let master = coordinator.master().unwrap();
    assert_eq!(coordinator.surface().pane_kind(master), Some(PaneKind::Volume));
    assert_eq!(coordinator.panes().iter().count(), 2);

    let mut hidden = ChartConfig::default();
    hidden.ohlc.show = false;
    hidden.volume.show = false;
    hidden.rsi.show = false;
    assert!(matches!(
        RenderCoordinator::new(SceneSurface::new(), hidden),
        Err(ChartError::NoPanes)
    ));
}

#[test]
fn events_describe_what_happened() {
    let mut coordinator = coordinator();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    coordinator.events_mut().subscribe_to_chart_events(move |event| sink.borrow_mut().push(event.event_type()));

    let notifier = RecordingNotifier::default();
    render(&mut coordinator, "ibm", trading_year(), &notifier);
    render(&mut coordinator, "none", RawSeries::new(), &notifier);
    let price = coordinator.panes().price.unwrap();
    coordinator.on_axis_changed(price, AxisInterval::new(3.0, 30.0)).unwrap();

    assert_eq!(*seen.borrow(), vec!["SeriesRendered", "DataSearchFailed", "AxesSynchronized"]);
}

#[test]
fn volume_pane_shows_histogram_steps() {
    let mut coordinator = coordinator();
    let series = indexed(&intraday_keys(&[2, 2, 3]));
    render(&mut coordinator, "ibm", raw_from_keys(&intraday_keys(&[2, 2, 3])), &RecordingNotifier::default());

    let volume = coordinator.panes().volume.unwrap();
    let stored = coordinator.surface().series(volume, VOLUME_SERIES).unwrap();
    assert_eq!(stored.data.len(), series.len() * 2 - 1);
}
