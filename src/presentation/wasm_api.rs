use crate::application::{RenderCoordinator, RenderOutcome, SearchDataUseCase};
use crate::config::{ChartConfig, Theme};
use crate::domain::chart::{AxisInterval, PaneId};
use crate::domain::errors::{AppError, AppResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::Granularity;
use crate::infrastructure::{AlphaVantageClient, BrowserNotifier, SceneSurface};
use gloo::utils::format::JsValueSerdeExt;
use js_sys::Promise;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlInputElement;

pub const CONTAINER_ID: &str = "trading-chart-container";
pub const SEARCH_INPUT_ID: &str = "trading-data-search-input";
pub const SEARCH_ACTIVATE_ID: &str = "trading-data-search-activate";

/// Range selectors and the range each one activates
pub const RANGE_SELECTORS: [(&str, Granularity); 3] = [
    ("trading-data-search-range-1", Granularity::Month),
    ("trading-data-search-range-2", Granularity::Year),
    ("trading-data-search-range-3", Granularity::TenYears),
];

/// Every element the host page must provide.
pub fn required_anchors() -> impl Iterator<Item = &'static str> {
    [CONTAINER_ID, SEARCH_INPUT_ID, SEARCH_ACTIVATE_ID]
        .into_iter()
        .chain(RANGE_SELECTORS.iter().map(|(id, _)| *id))
}

/// Fails with the first anchor `has_element` does not find.
pub fn verify_anchors(has_element: impl Fn(&str) -> bool) -> AppResult<()> {
    match required_anchors().find(|id| !has_element(id)) {
        Some(missing) => Err(AppError::MissingAnchor(missing.to_string())),
        None => Ok(()),
    }
}

/// Theme requested by the page's query string, e.g. `?theme=light`.
pub fn theme_from_search(search: &str) -> Theme {
    let value = web_sys::UrlSearchParams::new_with_str(search).ok().and_then(|params| params.get("theme"));
    Theme::from_param(value.as_deref())
}

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn outcome_to_js(outcome: &RenderOutcome) -> JsValue {
    match outcome {
        RenderOutcome::Rendered(summary) => JsValue::from_str(&format!("rendered {} points", summary.points)),
        RenderOutcome::Stale => JsValue::from_str("stale"),
        RenderOutcome::Failed(reason) => JsValue::from_str(&format!("failed: {reason}")),
    }
}

/// Chart engine exposed to the host page
#[wasm_bindgen]
pub struct ChartEngine {
    search: SearchDataUseCase<SceneSurface>,
    theme: Theme,
}

#[wasm_bindgen]
impl ChartEngine {
    /// Check the page layout and build the chart. `config` is optional JSON.
    pub fn mount(config: Option<String>) -> Result<ChartEngine, JsValue> {
        let window = web_sys::window().ok_or_else(|| to_js(AppError::MissingAnchor("window".to_string())))?;
        let document = window.document().ok_or_else(|| to_js(AppError::MissingAnchor("document".to_string())))?;
        verify_anchors(|id| document.get_element_by_id(id).is_some()).map_err(to_js)?;

        let config = match config {
            Some(json) => ChartConfig::from_json(&json).map_err(to_js)?,
            None => ChartConfig::default(),
        };
        let theme = window.location().search().map(|search| theme_from_search(&search)).unwrap_or_default();

        let source = Rc::new(AlphaVantageClient::new(config.data_source.clone()));
        let coordinator = RenderCoordinator::new(SceneSurface::new(), config).map_err(to_js)?;
        let search = SearchDataUseCase::new(Rc::new(RefCell::new(coordinator)), source, Rc::new(BrowserNotifier));

        get_logger().info(
            LogComponent::Presentation("ChartEngine"),
            &format!("mounted on #{} with {} theme", CONTAINER_ID, theme),
        );
        Ok(Self { search, theme })
    }

    pub fn theme(&self) -> String {
        self.theme.to_string()
    }

    /// Search data for `symbol` in the active range.
    pub fn search(&self, symbol: String) -> Promise {
        let search = self.search.clone();
        future_to_promise(async move {
            let outcome = search.execute(&symbol).await.map_err(to_js)?;
            Ok(outcome_to_js(&outcome))
        })
    }

    /// Search for whatever the search input holds.
    #[wasm_bindgen(js_name = searchFromInput)]
    pub fn search_from_input(&self) -> Result<Promise, JsValue> {
        let input = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(SEARCH_INPUT_ID))
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .ok_or_else(|| to_js(AppError::MissingAnchor(SEARCH_INPUT_ID.to_string())))?;
        Ok(self.search(input.value()))
    }

    /// Switch to `"month"`, `"year"` or `"ten-years"`.
    #[wasm_bindgen(js_name = selectRange)]
    pub fn select_range(&self, range: String) -> Result<Promise, JsValue> {
        let granularity: Granularity = range
            .parse()
            .map_err(|_| to_js(AppError::InvalidInput(format!("unknown range '{range}'"))))?;
        let search = self.search.clone();
        Ok(future_to_promise(async move {
            let outcome = search.change_range(granularity).await.map_err(to_js)?;
            Ok(outcome.as_ref().map(outcome_to_js).unwrap_or(JsValue::NULL))
        }))
    }

    /// The user moved the time axis of `pane`. Returns how many panes followed.
    #[wasm_bindgen(js_name = axisChanged)]
    pub fn axis_changed(&self, pane: usize, start: f64, end: f64) -> Result<usize, JsValue> {
        let report = self
            .search
            .coordinator()
            .borrow_mut()
            .on_axis_changed(PaneId::from(pane), AxisInterval::new(start, end))
            .map_err(to_js)?;
        Ok(report.writes)
    }

    /// Current scene as JSON text.
    pub fn frame(&self) -> Result<String, JsValue> {
        self.search.coordinator().borrow().surface().frame_json().map_err(to_js)
    }

    /// Current scene as a JavaScript object.
    #[wasm_bindgen(js_name = frameObject)]
    pub fn frame_object(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.search.coordinator().borrow().surface().snapshot();
        JsValue::from_serde(&snapshot).map_err(to_js)
    }

    /// Date text for a cursor at `x`.
    #[wasm_bindgen(js_name = formatPosition)]
    pub fn format_position(&self, x: f64) -> String {
        self.search.coordinator().borrow().format_position(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_first_missing_anchor() {
        assert!(verify_anchors(|_| true).is_ok());

        let err = verify_anchors(|id| id != SEARCH_ACTIVATE_ID).unwrap_err();
        assert!(matches!(err, AppError::MissingAnchor(ref id) if id == SEARCH_ACTIVATE_ID));
        assert_eq!(err.to_string(), "DOM element not found: trading-data-search-activate");
    }

    #[test]
    fn range_selectors_cover_every_granularity() {
        let ranges: Vec<Granularity> = RANGE_SELECTORS.iter().map(|(_, g)| *g).collect();
        assert_eq!(ranges, vec![Granularity::Month, Granularity::Year, Granularity::TenYears]);
        assert_eq!(required_anchors().count(), 6);
    }
}
