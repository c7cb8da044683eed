use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use trading_chart_wasm::domain::chart::{
    AxisInterval, AxisSynchronizer, PaneId, PaneKind, RenderSurface, SyncState,
};
use trading_chart_wasm::domain::errors::ChartError;
use trading_chart_wasm::infrastructure::SceneSurface;

fn bound_panes(count: usize) -> (SceneSurface, AxisSynchronizer, Vec<PaneId>) {
    let mut scene = SceneSurface::new();
    let mut sync = AxisSynchronizer::new();
    let panes: Vec<PaneId> = (0..count).map(|_| scene.create_pane(PaneKind::Price, 1)).collect();
    for &pane in &panes {
        sync.bind(pane);
    }
    (scene, sync, panes)
}

#[quickcheck]
fn user_change_settles_in_one_pass(count: u8, origin: u8, start: i16, span: u8) -> TestResult {
    let count = usize::from(count % 12) + 1;
    let origin = usize::from(origin) % count;
    let interval = AxisInterval::new(f64::from(start), f64::from(start) + f64::from(span) + 1.0);
    if interval == AxisInterval::default() {
        return TestResult::discard();
    }

    let (mut scene, mut sync, panes) = bound_panes(count);
    scene.set_x_interval(panes[origin], interval).unwrap();
    let report = sync.dispatch(&mut scene).unwrap();

    let all_equal = panes.iter().all(|&p| scene.x_interval(p).unwrap() == interval);
    // one write per follower, then one empty echo per write
    let bounded = report.writes == count - 1 && report.notifications == count;
    let settled = sync.dispatch(&mut scene).unwrap().notifications == 0;

    TestResult::from_bool(all_equal && bounded && settled && sync.state() == SyncState::Idle)
}

#[test]
fn repeating_the_same_interval_writes_nothing() {
    let (mut scene, mut sync, panes) = bound_panes(3);
    let interval = AxisInterval::new(5.0, 50.0);

    assert_eq!(sync.notify(&mut scene, panes[0], interval).unwrap(), 2);
    sync.dispatch(&mut scene).unwrap();
    scene.set_x_interval(panes[0], interval).unwrap();
    assert_eq!(sync.notify(&mut scene, panes[0], interval).unwrap(), 0);
}

#[test]
fn queued_changes_resolve_to_the_latest_value() {
    let (mut scene, mut sync, panes) = bound_panes(3);
    scene.set_x_interval(panes[1], AxisInterval::new(1.0, 2.0)).unwrap();
    scene.set_x_interval(panes[1], AxisInterval::new(3.0, 9.0)).unwrap();
    sync.dispatch(&mut scene).unwrap();

    assert_eq!(sync.common_interval(&scene).unwrap(), Some(AxisInterval::new(3.0, 9.0)));
}

#[test]
fn unbound_panes_are_left_alone() {
    let (mut scene, mut sync, panes) = bound_panes(2);
    let loose = scene.create_pane(PaneKind::Volume, 1);

    scene.set_x_interval(loose, AxisInterval::new(0.0, 3.0)).unwrap();
    let report = sync.dispatch(&mut scene).unwrap();

    assert_eq!(report.writes, 0);
    assert_eq!(scene.x_interval(panes[0]).unwrap(), AxisInterval::default());
}

#[test]
fn first_bound_pane_is_master_until_changed() {
    let (_, mut sync, panes) = bound_panes(3);
    assert_eq!(sync.master(), Some(panes[0]));

    sync.set_master(panes[2]).unwrap();
    assert_eq!(sync.master(), Some(panes[2]));
    assert_eq!(sync.set_master(PaneId::from(9)), Err(ChartError::UnknownPane(9)));
}
