use super::request_sequencer::{RequestSequencer, RequestTicket};
use crate::config::ChartConfig;
use crate::domain::chart::{
    AxisInterval, AxisKind, AxisSynchronizer, PaneId, PaneKind, PropagationReport, RenderSurface, SeriesData, Tick,
    TickPlanner, XOhlc,
};
use crate::domain::errors::{ChartError, ChartResult, FetchError, SeriesError};
use crate::domain::events::{ChartEvent, EventDispatcher, InMemoryEventDispatcher};
use crate::domain::logging::{LogComponent, get_logger};
use crate::{log_debug, log_error, log_warn};
use crate::domain::market_data::indicator_engine::{
    bollinger_bands, exponential_moving_average, relative_strength_index, simple_moving_average, volume_histogram,
};
use crate::domain::market_data::repositories::data_not_found_message;
use crate::domain::market_data::{DensityEstimator, Granularity, IndexedSeries, RawSeries, Symbol};
use futures::future::Abortable;
use std::future::Future;
use std::num::NonZeroUsize;

pub const OHLC_SERIES: &str = "OHLC";
pub const SMA_SERIES: &str = "SMA";
pub const EMA_SERIES: &str = "EMA";
pub const BOLLINGER_SERIES: &str = "Bollinger";
pub const VOLUME_SERIES: &str = "Volume";
pub const RSI_SERIES: &str = "RSI";

/// RSI is always shown on this vertical range
pub const RSI_RANGE: AxisInterval = AxisInterval { start: 0.0, end: 100.0 };

/// RSI reference levels and whether they draw a gridline
pub const RSI_LEVELS: [(f64, bool); 4] = [(0.0, false), (30.0, true), (70.0, true), (100.0, false)];

/// Tells the user something went wrong. Browser builds show an alert.
pub trait UserNotifier {
    fn alert(&self, message: &str);
}

/// Panes created from the configuration, top to bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneLayout {
    pub price: Option<PaneId>,
    pub volume: Option<PaneId>,
    pub rsi: Option<PaneId>,
}

impl PaneLayout {
    pub fn get(&self, kind: PaneKind) -> Option<PaneId> {
        match kind {
            PaneKind::Price => self.price,
            PaneKind::Volume => self.volume,
            PaneKind::Rsi => self.rsi,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PaneId> {
        [self.price, self.volume, self.rsi].into_iter().flatten()
    }

    /// Lowest shown pane; its time axis carries the date ticks.
    pub fn bottom(&self) -> Option<PaneId> {
        self.rsi.or(self.volume).or(self.price)
    }
}

/// What the chart currently shows.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub granularity: Granularity,
    /// Symbol of the rendered data
    pub symbol: Option<Symbol>,
    /// Symbol of the latest search, rendered or not
    pub requested: Option<Symbol>,
    pub series: Option<IndexedSeries>,
    pub data_exists: bool,
    pub density: Option<NonZeroUsize>,
}

/// One named series destined for one pane.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLayer {
    pub pane: PaneKind,
    pub name: &'static str,
    pub data: SeriesData,
}

/// Everything computed from a fetch before any pane is touched.
#[derive(Debug, Clone)]
pub struct PreparedRender {
    /// `<symbol> <mode>`, e.g. `AAPL history`
    pub name: String,
    pub symbol: Symbol,
    pub granularity: Granularity,
    pub series: IndexedSeries,
    pub density: Option<NonZeroUsize>,
    pub layers: Vec<SeriesLayer>,
    pub ticks: Vec<Tick>,
}

impl PreparedRender {
    pub fn layer(&self, name: &str) -> Option<&SeriesLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub points: usize,
    pub ticks: usize,
    pub writes: usize,
    pub density: Option<NonZeroUsize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Rendered(RenderSummary),
    /// A newer search was started; nothing was changed.
    Stale,
    /// The user was alerted; nothing was changed.
    Failed(String),
}

/// Drives a rendering surface through data loads and axis changes.
pub struct RenderCoordinator<S: RenderSurface> {
    surface: S,
    config: ChartConfig,
    panes: PaneLayout,
    synchronizer: AxisSynchronizer,
    tick_planner: TickPlanner,
    sequencer: RequestSequencer,
    state: AppState,
    events: InMemoryEventDispatcher,
}

impl<S: RenderSurface> RenderCoordinator<S> {
    /// Create the configured panes and lock their time axes together.
    pub fn new(mut surface: S, config: ChartConfig) -> ChartResult<Self> {
        let mut panes = PaneLayout::default();
        if config.ohlc.show {
            panes.price = Some(surface.create_pane(PaneKind::Price, config.ohlc.vertical_spans));
        }
        if config.volume.show {
            let pane = surface.create_pane(PaneKind::Volume, config.volume.vertical_spans);
            surface.set_title(pane, "Volume")?;
            panes.volume = Some(pane);
        }
        if config.rsi.show {
            let pane = surface.create_pane(PaneKind::Rsi, config.rsi.vertical_spans);
            surface.set_title(pane, "RSI")?;
            surface.set_y_interval(pane, RSI_RANGE)?;
            for (level, gridline) in RSI_LEVELS {
                surface.add_tick(pane, AxisKind::Y, Tick::new(level, level.to_string(), gridline))?;
            }
            panes.rsi = Some(pane);
        }

        let master = panes.bottom().ok_or(ChartError::NoPanes)?;
        let mut synchronizer = AxisSynchronizer::new();
        for pane in panes.iter() {
            synchronizer.bind(pane);
        }
        synchronizer.set_master(master)?;
        // Creating panes may have queued notifications; nothing is loaded yet.
        surface.take_notifications();

        get_logger().info(
            LogComponent::Application("RenderCoordinator"),
            &format!("created {} panes, master axis on {}", synchronizer.panes().len(), master),
        );

        Ok(Self {
            surface,
            config,
            panes,
            synchronizer,
            tick_planner: TickPlanner::new(),
            sequencer: RequestSequencer::new(),
            state: AppState::default(),
            events: InMemoryEventDispatcher::new(),
        })
    }

    /// Parse, index and derive every series. Touches no pane.
    pub fn prepare(
        config: &ChartConfig,
        symbol: &Symbol,
        granularity: Granularity,
        raw: &RawSeries,
    ) -> Result<PreparedRender, SeriesError> {
        let series = IndexedSeries::build(raw)?;
        if series.is_empty() {
            return Err(SeriesError::Empty);
        }

        let density = DensityEstimator::estimate(&series);
        let window = |days: f64| DensityEstimator::window_positions(days, density);
        let mut layers = Vec::new();

        if config.ohlc.show {
            let candles = series
                .points()
                .iter()
                .enumerate()
                .map(|(x, point)| {
                    XOhlc::new(
                        x as f64,
                        point.ohlcv.open.value(),
                        point.ohlcv.high.value(),
                        point.ohlcv.low.value(),
                        point.ohlcv.close.value(),
                    )
                })
                .collect();
            layers.push(SeriesLayer { pane: PaneKind::Price, name: OHLC_SERIES, data: SeriesData::Ohlc(candles) });

            let sma_window = window(config.ohlc.sma.days_for(granularity));
            if config.ohlc.sma.show {
                let sma = simple_moving_average(&series, sma_window);
                layers.push(SeriesLayer { pane: PaneKind::Price, name: SMA_SERIES, data: SeriesData::Line(sma) });
            }
            if config.ohlc.ema_show {
                let ema = exponential_moving_average(&series, sma_window);
                layers.push(SeriesLayer { pane: PaneKind::Price, name: EMA_SERIES, data: SeriesData::Line(ema) });
            }
            if config.ohlc.bollinger.show {
                let bands = bollinger_bands(&series, window(config.ohlc.bollinger.days_for(granularity)));
                layers.push(SeriesLayer {
                    pane: PaneKind::Price,
                    name: BOLLINGER_SERIES,
                    data: SeriesData::Band(bands),
                });
            }
        }

        if config.volume.show {
            layers.push(SeriesLayer {
                pane: PaneKind::Volume,
                name: VOLUME_SERIES,
                data: SeriesData::Line(volume_histogram(&series)),
            });
        }

        if config.rsi.show && config.rsi.window.show {
            let rsi = relative_strength_index(&series, window(config.rsi.window.days_for(granularity)));
            layers.push(SeriesLayer { pane: PaneKind::Rsi, name: RSI_SERIES, data: SeriesData::Line(rsi) });
        }

        let ticks = TickPlanner::plan(&series, granularity);

        Ok(PreparedRender {
            name: format!("{} {}", symbol, granularity.fetch_mode()),
            symbol: symbol.clone(),
            granularity,
            series,
            density,
            layers,
            ticks,
        })
    }

    /// Push a prepared render to the surface as one frame.
    pub fn apply(&mut self, mut prepared: PreparedRender) -> ChartResult<RenderSummary> {
        let master = self.synchronizer.master().ok_or(ChartError::NoPanes)?;
        // Settle any user change still queued before the master axis moves.
        self.synchronizer.dispatch(&mut self.surface)?;

        self.surface.begin_batch();
        let result = self.apply_batched(master, &mut prepared);
        self.surface.commit_batch();
        let summary = result?;

        get_logger().info(
            LogComponent::Application("RenderCoordinator"),
            &format!(
                "rendered {}: {} points, {} ticks, density {:?}",
                prepared.name, summary.points, summary.ticks, summary.density
            ),
        );

        self.events.publish_chart_event(ChartEvent::SeriesRendered {
            name: prepared.name.clone(),
            granularity: prepared.granularity,
            point_count: summary.points,
            tick_count: summary.ticks,
        });

        self.state.symbol = Some(prepared.symbol);
        self.state.series = Some(prepared.series);
        self.state.density = prepared.density;
        self.state.data_exists = true;
        Ok(summary)
    }

    fn apply_batched(&mut self, master: PaneId, prepared: &mut PreparedRender) -> ChartResult<RenderSummary> {
        for layer in std::mem::take(&mut prepared.layers) {
            if let Some(pane) = self.panes.get(layer.pane) {
                self.surface.replace_series(pane, layer.name, layer.data)?;
            }
        }

        if let Some(pane) = self.panes.price {
            self.surface.set_series_label(pane, OHLC_SERIES, &prepared.name)?;
            self.surface.fit(pane, AxisKind::Y)?;
            let title = format!("{} ({})", prepared.name, prepared.granularity.range_label());
            self.surface.set_title(pane, &title)?;
        }
        if let Some(pane) = self.panes.volume {
            self.surface.fit(pane, AxisKind::Y)?;
        }
        if let Some(pane) = self.panes.rsi {
            self.surface.set_y_interval(pane, RSI_RANGE)?;
        }

        let last = prepared.series.last_position().unwrap_or(0);
        let full = AxisInterval::new(0.0, last as f64);
        if self.surface.x_interval(master)? != full {
            self.surface.set_x_interval(master, full)?;
        }
        let mut writes = self.synchronizer.notify(&mut self.surface, master, full)?;
        writes += self.synchronizer.dispatch(&mut self.surface)?.writes;

        let ticks = self.tick_planner.install(&mut self.surface, master, std::mem::take(&mut prepared.ticks))?;

        Ok(RenderSummary { points: prepared.series.len(), ticks, writes, density: prepared.density })
    }

    /// Start a search. Any search still running is aborted.
    pub fn begin_request<F: Future>(&mut self, symbol: &Symbol, fetch: F) -> (RequestTicket, Abortable<F>) {
        let (ticket, fetch) = self.sequencer.begin(fetch);
        self.state.requested = Some(symbol.clone());
        log_debug!(
            LogComponent::Application("RenderCoordinator"),
            "{} started for {} ({})",
            ticket,
            symbol,
            self.state.granularity
        );
        (ticket, fetch)
    }

    /// Finish a search: render it, report it stale, or alert the user.
    pub fn complete_request(
        &mut self,
        ticket: RequestTicket,
        symbol: &Symbol,
        granularity: Granularity,
        result: Result<RawSeries, FetchError>,
        notifier: &dyn UserNotifier,
    ) -> RenderOutcome {
        let latest = self.sequencer.finish(ticket);
        if !latest || matches!(result, Err(FetchError::Aborted)) {
            log_debug!(
                LogComponent::Application("RenderCoordinator"),
                "{} for {} superseded, discarding",
                ticket,
                symbol
            );
            self.events.publish_chart_event(ChartEvent::StaleResponseDiscarded { symbol: symbol.clone() });
            return RenderOutcome::Stale;
        }

        let prepared = result.map_err(|e| e.to_string()).and_then(|raw| {
            Self::prepare(&self.config, symbol, granularity, &raw).map_err(|e| e.to_string())
        });

        match prepared {
            Ok(prepared) => match self.apply(prepared) {
                Ok(summary) => RenderOutcome::Rendered(summary),
                Err(e) => {
                    log_error!(LogComponent::Application("RenderCoordinator"), "render of {} failed: {}", symbol, e);
                    RenderOutcome::Failed(e.to_string())
                }
            },
            Err(reason) => self.search_failed(symbol, reason, notifier),
        }
    }

    fn search_failed(&mut self, symbol: &Symbol, reason: String, notifier: &dyn UserNotifier) -> RenderOutcome {
        log_warn!(LogComponent::Application("RenderCoordinator"), "no data found for '{}': {}", symbol, reason);
        notifier.alert(&data_not_found_message(symbol.value()));
        self.events.publish_chart_event(ChartEvent::DataSearchFailed { symbol: symbol.clone(), reason: reason.clone() });
        RenderOutcome::Failed(reason)
    }

    /// Switch the active range. Returns `true` when the current search should
    /// be repeated for the new range.
    pub fn select_granularity(&mut self, granularity: Granularity) -> bool {
        let changed = self.state.granularity != granularity;
        self.state.granularity = granularity;
        changed && (self.state.data_exists || self.sequencer.has_in_flight())
    }

    /// A pane's time axis was moved by the user.
    pub fn on_axis_changed(&mut self, pane: PaneId, interval: AxisInterval) -> ChartResult<PropagationReport> {
        if !self.synchronizer.panes().contains(&pane) {
            return Err(ChartError::UnknownPane(pane.index()));
        }
        if self.surface.x_interval(pane)? != interval {
            self.surface.set_x_interval(pane, interval)?;
        }
        self.synchronize()
    }

    /// Propagate every pending axis change on the surface.
    pub fn synchronize(&mut self) -> ChartResult<PropagationReport> {
        let report = self.synchronizer.dispatch(&mut self.surface)?;
        if report.writes > 0
            && let Some(interval) = self.synchronizer.common_interval(&self.surface)?
        {
            self.events.publish_chart_event(ChartEvent::AxesSynchronized { interval, writes: report.writes });
        }
        Ok(report)
    }

    /// Date text for an X position of the loaded series.
    pub fn format_position(&self, x: f64) -> String {
        self.state
            .series
            .as_ref()
            .map(|series| series.format_position(x, self.state.granularity))
            .unwrap_or_default()
    }

    pub fn granularity(&self) -> Granularity {
        self.state.granularity
    }

    pub fn current_symbol(&self) -> Option<&Symbol> {
        self.state.symbol.as_ref()
    }

    pub fn last_requested(&self) -> Option<&Symbol> {
        self.state.requested.as_ref()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn panes(&self) -> PaneLayout {
        self.panes
    }

    pub fn master(&self) -> Option<PaneId> {
        self.synchronizer.master()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn installed_tick_count(&self) -> usize {
        self.tick_planner.installed_count()
    }

    pub fn events_mut(&mut self) -> &mut InMemoryEventDispatcher {
        &mut self.events
    }
}
