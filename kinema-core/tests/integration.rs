//! Integration Tests for the Update Core
//!
//! These tests verify that import, dirt propagation, and interpolator
//! rebuilds work together the way a host drives them frame by frame.

use std::any::Any;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use kinema_core::interp::calc_bezier;
use kinema_core::{
    ArtboardImporter, Component, ComponentId, CubicInterpolator, DirtMask, DirtReason, Error,
    ImportStack, SolverConfig, StatusCode, UpdateScheduler,
};

/// A keyframe-like component that samples an interpolator while updating.
struct Track {
    updates: Arc<AtomicU32>,
}

impl Component for Track {
    fn name(&self) -> &str {
        "Track"
    }

    fn update(&mut self, _dirt: DirtMask) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn curve(scheduler: &UpdateScheduler, id: ComponentId) -> &CubicInterpolator {
    scheduler.component::<CubicInterpolator>(id).unwrap()
}

/// Import an ease-in-out curve and a track that depends on it.
fn import_scene() -> (UpdateScheduler, ComponentId, ComponentId, Arc<AtomicU32>) {
    let updates = Arc::new(AtomicU32::new(0));
    let mut artboard = ArtboardImporter::new();

    let (ease, track) = {
        let mut stack = ImportStack::with_artboard(&mut artboard);
        let ease = CubicInterpolator::new(0.42, 0.0, 0.58, 1.0)
            .import(&mut stack)
            .unwrap();
        let track = stack
            .attach(Box::new(Track {
                updates: updates.clone(),
            }))
            .unwrap();
        (ease, track)
    };
    artboard.add_dependency(ease, track).unwrap();

    (artboard.finish(), ease, track, updates)
}

/// The table is built by the first update pass, before any query.
#[test]
fn first_pass_builds_the_table() {
    let (mut scheduler, ease, track, updates) = import_scene();
    assert!(!curve(&scheduler, ease).is_built());

    let report = scheduler.update().unwrap();

    assert!(curve(&scheduler, ease).is_built());
    assert_eq!(curve(&scheduler, ease).rebuild_count(), 1);
    let ease_at = report.position(ease).unwrap();
    let track_at = report.position(track).unwrap();
    assert!(ease_at < track_at);
    assert_eq!(updates.load(Ordering::SeqCst), 1);

    let t = curve(&scheduler, ease).get_t(0.5);
    assert!(t > 0.45 && t < 0.55);
}

/// Editing a control point and signalling Parameters rebuilds the table
/// on the next pass and re-runs dependents.
#[test]
fn parameter_edit_rebuilds_on_next_pass() {
    let (mut scheduler, ease, _track, updates) = import_scene();
    scheduler.update().unwrap();
    let before = *curve(&scheduler, ease).table();

    scheduler
        .edit::<CubicInterpolator, _, _>(ease, DirtReason::Parameters, |c| c.set_x1(0.1))
        .unwrap();

    // Not rebuilt until the pass runs.
    assert_eq!(*curve(&scheduler, ease).table(), before);
    assert!(curve(&scheduler, ease).is_stale());

    scheduler.update().unwrap();

    let after = *curve(&scheduler, ease).table();
    assert_eq!(curve(&scheduler, ease).rebuild_count(), 2);
    assert!((1..after.len() - 1).any(|i| after[i] != before[i]));
    assert_eq!(updates.load(Ordering::SeqCst), 2);
}

/// Dirt that the curve does not care about leaves its table alone.
#[test]
fn unrelated_dirt_does_not_rebuild() {
    let (mut scheduler, ease, _track, updates) = import_scene();
    scheduler.update().unwrap();

    scheduler.add_dirt(ease, DirtReason::Paint, true).unwrap();
    let report = scheduler.update().unwrap();

    assert!(report.contains(ease));
    assert_eq!(curve(&scheduler, ease).rebuild_count(), 1);
    assert_eq!(updates.load(Ordering::SeqCst), 2);
}

/// Setting one reason on clean dirt escalates to the base reasons.
#[test]
fn path_dirt_escalates() {
    let mask = DirtMask::none().combine(DirtReason::Path);
    assert!(mask.has(DirtReason::Path));
    assert!(mask.has(DirtReason::Components));
}

/// An interpolator imported without an artboard never joins a graph.
#[test]
fn missing_artboard_is_propagated() {
    let mut stack = ImportStack::new();
    let result = CubicInterpolator::new(0.25, 0.1, 0.25, 1.0).import(&mut stack);

    assert_eq!(StatusCode::from(&result), StatusCode::MissingObject);
    assert!(matches!(result, Err(Error::MissingObject(_))));
}

/// Independently configured curves in the same graph do not interfere.
#[test]
fn curves_keep_their_own_solver_config() {
    let mut artboard = ArtboardImporter::new();
    let (strict, loose) = {
        let mut stack = ImportStack::with_artboard(&mut artboard);
        let strict = CubicInterpolator::new(0.0, 0.0, 0.58, 1.0)
            .import(&mut stack)
            .unwrap();
        let loose_config = SolverConfig::from_json(r#"{ "subdivision_precision": 0.01 }"#).unwrap();
        let loose = CubicInterpolator::new(0.0, 0.0, 0.58, 1.0)
            .with_config(loose_config)
            .import(&mut stack)
            .unwrap();
        (strict, loose)
    };
    let mut scheduler = artboard.finish();
    scheduler.update().unwrap();

    let strict = curve(&scheduler, strict).solve(1e-5);
    let loose = curve(&scheduler, loose).solve(1e-5);
    assert!(loose.iterations < strict.iterations);
}

/// Eased values round-trip through the graph-owned curve.
#[test]
fn graph_owned_curve_inverts_densely() {
    let (mut scheduler, ease, _, _) = import_scene();
    scheduler.update().unwrap();
    let curve = curve(&scheduler, ease);

    for i in 0..=100 {
        let x = i as f32 / 100.0;
        let back = calc_bezier(curve.get_t(x), curve.x1(), curve.x2());
        assert!((back - x).abs() < 1e-4, "x = {x}");
    }
}
