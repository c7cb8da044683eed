use super::coordinator::{RenderCoordinator, RenderOutcome, UserNotifier};
use super::data_cache::DataCacheRegistry;
use crate::domain::chart::RenderSurface;
use crate::domain::errors::{AppError, FetchError};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use crate::domain::market_data::{DataSource, Granularity, Symbol};
use std::cell::RefCell;
use std::rc::Rc;

/// Use Case: search data for a symbol and render it.
///
/// Holds the coordinator behind `Rc<RefCell<_>>`; no borrow is kept across
/// an await, so axis changes can be handled while a fetch is pending.
pub struct SearchDataUseCase<S: RenderSurface> {
    coordinator: Rc<RefCell<RenderCoordinator<S>>>,
    cache: Rc<RefCell<DataCacheRegistry>>,
    source: Rc<dyn DataSource>,
    notifier: Rc<dyn UserNotifier>,
}

impl<S: RenderSurface> Clone for SearchDataUseCase<S> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Rc::clone(&self.coordinator),
            cache: Rc::clone(&self.cache),
            source: Rc::clone(&self.source),
            notifier: Rc::clone(&self.notifier),
        }
    }
}

impl<S: RenderSurface> SearchDataUseCase<S> {
    pub fn new(
        coordinator: Rc<RefCell<RenderCoordinator<S>>>,
        source: Rc<dyn DataSource>,
        notifier: Rc<dyn UserNotifier>,
    ) -> Self {
        let capacity = coordinator.borrow().config().cache_capacity;
        Self { coordinator, cache: Rc::new(RefCell::new(DataCacheRegistry::new(capacity))), source, notifier }
    }

    pub fn coordinator(&self) -> &Rc<RefCell<RenderCoordinator<S>>> {
        &self.coordinator
    }

    pub fn cache(&self) -> &Rc<RefCell<DataCacheRegistry>> {
        &self.cache
    }

    /// Fetch (or reuse) data for `input` in the active range and render it.
    pub async fn execute(&self, input: &str) -> Result<RenderOutcome, AppError> {
        let symbol = Symbol::new(input).map_err(AppError::InvalidInput)?;
        let granularity = self.coordinator.borrow().granularity();

        let fetch = self.cache.borrow_mut().fetch(self.source.as_ref(), &symbol, granularity);
        let (ticket, fetch) = self.coordinator.borrow_mut().begin_request(&symbol, fetch);

        let result = fetch.await.unwrap_or(Err(FetchError::Aborted));
        if result.is_err() {
            self.cache.borrow_mut().evict_failed(&symbol, granularity);
        }

        let outcome =
            self.coordinator.borrow_mut().complete_request(ticket, &symbol, granularity, result, self.notifier.as_ref());
        Ok(outcome)
    }

    /// Switch range; repeats the last search when the chart already has data.
    pub async fn change_range(&self, granularity: Granularity) -> Result<Option<RenderOutcome>, AppError> {
        let research = self.coordinator.borrow_mut().select_granularity(granularity);
        let symbol = self.coordinator.borrow().last_requested().cloned();

        match (research, symbol) {
            (true, Some(symbol)) => {
                log_debug!(
                    LogComponent::Application("SearchData"),
                    "range changed to {}, searching {} again",
                    granularity,
                    symbol
                );
                self.execute(symbol.value()).await.map(Some)
            }
            _ => Ok(None),
        }
    }
}
