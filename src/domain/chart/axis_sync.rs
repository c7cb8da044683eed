use super::{AxisInterval, AxisNotification, PaneId, RenderSurface};
use crate::domain::errors::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Propagating,
}

/// Outcome of draining a surface's notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropagationReport {
    pub notifications: usize,
    pub writes: usize,
}

/// Keeps the horizontal axes of several panes on the same interval.
///
/// Writing an axis raises a notification on that axis, so the channel is
/// cyclic. A pane is only written when its interval differs from the target,
/// which makes every echo a no-op and bounds one user change to at most
/// `N - 1` writes followed by `N - 1` empty echoes.
#[derive(Debug, Default)]
pub struct AxisSynchronizer {
    panes: Vec<PaneId>,
    master: Option<PaneId>,
    state: SyncState,
}

impl AxisSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a pane. The first bound pane is master until [`Self::set_master`].
    pub fn bind(&mut self, pane: PaneId) {
        if !self.panes.contains(&pane) {
            self.panes.push(pane);
        }
        if self.master.is_none() {
            self.master = Some(pane);
        }
    }

    pub fn set_master(&mut self, pane: PaneId) -> ChartResult<()> {
        if !self.panes.contains(&pane) {
            return Err(ChartError::UnknownPane(pane.index()));
        }
        self.master = Some(pane);
        Ok(())
    }

    pub fn master(&self) -> Option<PaneId> {
        self.master
    }

    pub fn panes(&self) -> &[PaneId] {
        &self.panes
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Propagate `interval` from `origin` to every other bound pane that is
    /// not already there. Returns the number of writes.
    ///
    /// A call made while a propagation is running is dropped.
    pub fn notify<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        origin: PaneId,
        interval: AxisInterval,
    ) -> ChartResult<usize> {
        if self.state == SyncState::Propagating || !self.panes.contains(&origin) {
            return Ok(0);
        }

        self.state = SyncState::Propagating;
        let result = self.propagate(surface, origin, interval);
        self.state = SyncState::Idle;
        result
    }

    fn propagate<S: RenderSurface>(&self, surface: &mut S, origin: PaneId, interval: AxisInterval) -> ChartResult<usize> {
        let mut writes = 0;
        for &pane in self.panes.iter().filter(|&&p| p != origin) {
            if surface.x_interval(pane)? != interval {
                surface.set_x_interval(pane, interval)?;
                writes += 1;
            }
        }
        Ok(writes)
    }

    /// Drain the surface's notifications until none are left.
    ///
    /// Each notification propagates the origin's interval as it is now, not
    /// the value it carried: a queued notification can be outdated by an
    /// earlier one in the same drain.
    pub fn dispatch<S: RenderSurface>(&mut self, surface: &mut S) -> ChartResult<PropagationReport> {
        let mut report = PropagationReport::default();
        loop {
            let pending = surface.take_notifications();
            if pending.is_empty() {
                return Ok(report);
            }
            for AxisNotification { pane, .. } in pending {
                report.notifications += 1;
                let current = surface.x_interval(pane)?;
                report.writes += self.notify(surface, pane, current)?;
            }
        }
    }

    /// Interval every bound pane agrees on, or `None` while they differ.
    pub fn common_interval<S: RenderSurface>(&self, surface: &S) -> ChartResult<Option<AxisInterval>> {
        let mut common: Option<AxisInterval> = None;
        for &pane in &self.panes {
            let current = surface.x_interval(pane)?;
            match common {
                None => common = Some(current),
                Some(c) if c != current => return Ok(None),
                Some(_) => {}
            }
        }
        Ok(common)
    }
}
