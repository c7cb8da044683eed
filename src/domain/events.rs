use crate::domain::chart::AxisInterval;
use crate::domain::market_data::{Granularity, Symbol};
use std::fmt::Debug;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// Events raised by the render coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    SeriesRendered {
        name: String,
        granularity: Granularity,
        point_count: usize,
        tick_count: usize,
    },
    AxesSynchronized {
        interval: AxisInterval,
        writes: usize,
    },
    DataSearchFailed {
        symbol: Symbol,
        reason: String,
    },
    StaleResponseDiscarded {
        symbol: Symbol,
    },
}

impl DomainEvent for ChartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ChartEvent::SeriesRendered { .. } => "SeriesRendered",
            ChartEvent::AxesSynchronized { .. } => "AxesSynchronized",
            ChartEvent::DataSearchFailed { .. } => "DataSearchFailed",
            ChartEvent::StaleResponseDiscarded { .. } => "StaleResponseDiscarded",
        }
    }
}

/// Event dispatcher for publishing events
pub trait EventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent);
}

/// Simple in-memory event dispatcher
#[derive(Default)]
pub struct InMemoryEventDispatcher {
    chart_handlers: Vec<Box<dyn Fn(&ChartEvent)>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_to_chart_events<F>(&mut self, handler: F)
    where
        F: Fn(&ChartEvent) + 'static,
    {
        self.chart_handlers.push(Box::new(handler));
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent) {
        for handler in &self.chart_handlers {
            handler(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn handlers_receive_published_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = InMemoryEventDispatcher::new();
        let sink = Rc::clone(&seen);
        dispatcher.subscribe_to_chart_events(move |e| sink.borrow_mut().push(e.event_type()));

        dispatcher.publish_chart_event(ChartEvent::StaleResponseDiscarded { symbol: Symbol::from("ibm") });
        assert_eq!(*seen.borrow(), vec!["StaleResponseDiscarded"]);
    }
}
