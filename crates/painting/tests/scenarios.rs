//! End-to-end gestures through an `AmbientRenderer<CpuSurface>`

use painting::{
    AmbientRenderer, CpuSurface, ElementInfo, ExclusionSet, LockState, PointerKind,
    PointerOutcome, PointerSample, SequenceJitter, TargetPath, XorShift64,
};
use pigment_config::{DisplayConfig, LockMode, PainterConfig};

fn renderer(config: PainterConfig) -> AmbientRenderer<CpuSurface> {
    let exclusions = ExclusionSet::parse(&config.gate.exclusions).unwrap();
    let mut r = AmbientRenderer::new(
        Some(CpuSurface::new(1, 1)),
        config,
        Box::new(exclusions),
        Box::new(XorShift64::new(0x5eed)),
    );
    r.resize(DisplayConfig::new(320, 240));
    r
}

fn page() -> TargetPath {
    TargetPath::new(vec![
        ElementInfo::new("p").with_class("lede"),
        ElementInfo::new("main"),
        ElementInfo::new("body"),
    ])
}

#[test]
fn test_tap_leaves_one_mark_for_its_lifespan() {
    let mut r = renderer(PainterConfig::default());
    let min_radius = r.config().brush.min_radius;

    let outcome = r.pointer_down(
        PointerSample::new(100.0, 100.0, 0.5, 0.0),
        PointerKind::Mouse,
        &page(),
    );
    assert_eq!(outcome, PointerOutcome::Started);
    r.pointer_up(5.0);

    assert_eq!(r.mark_count(), 1);
    let mark = *r.marks().next().unwrap();
    assert_eq!(mark.radius_x, min_radius);
    assert_eq!(mark.radius_y, min_radius);

    assert_eq!(r.render_frame(2999.0).drawn, 1);
    let report = r.render_frame(3000.0);
    assert_eq!(report.drawn, 0);
    assert_eq!(report.expired, 1);
    assert_eq!(r.surface().unwrap().painted_pixel_count(), 0);
}

#[test]
fn test_drag_speed_and_radius_stay_in_range() {
    let mut r = renderer(PainterConfig::default());
    let (min, max) = (r.config().brush.min_radius, r.config().brush.max_radius);

    r.pointer_down(PointerSample::new(0.0, 0.0, 0.5, 0.0), PointerKind::Mouse, &page());
    r.pointer_move(PointerSample::new(100.0, 0.0, 0.5, 16.0));
    assert!((r.brush().last_raw_speed() - 6.25).abs() < 1e-4);

    // A violent flick and a pressure spike still land inside the clamp
    r.pointer_move(PointerSample::new(5000.0, 0.0, 1.0, 17.0));
    r.pointer_move(PointerSample::new(5000.0, 0.0, f32::NAN, 17.0));
    for mark in r.marks() {
        assert!(mark.radius_x >= min && mark.radius_x <= max);
        assert!(mark.radius_y >= min && mark.radius_y <= max);
        assert!((0.0..=1.0).contains(&mark.base_alpha));
    }
}

#[test]
fn test_marks_fade_linearly() {
    let mut r = renderer(PainterConfig::default());
    r.pointer_down(PointerSample::new(50.0, 50.0, 0.5, 0.0), PointerKind::Pen, &page());
    let mark = *r.marks().next().unwrap();

    for (now, life) in [(0.0, 1.0), (750.0, 0.75), (1500.0, 0.5), (2700.0, 0.1)] {
        let alpha = mark.alpha_at(now, 3000.0).unwrap();
        assert!((alpha - mark.base_alpha * life).abs() < 1e-5);
    }
    assert_eq!(mark.alpha_at(3000.0, 3000.0), None);
}

#[test]
fn test_excluded_targets_are_left_alone() {
    let mut r = renderer(PainterConfig::default());

    let cases = [
        TargetPath::new(vec![ElementInfo::new("span"), ElementInfo::new("a")]),
        TargetPath::single(ElementInfo::new("div").with_attribute("role", "dialog")),
        TargetPath::new(vec![
            ElementInfo::new("li"),
            ElementInfo::new("ul").with_class_list("menu open"),
        ]),
        TargetPath::single(ElementInfo::new("section").with_attribute("data-no-paint", "")),
    ];

    for target in &cases {
        let outcome = r.pointer_down(
            PointerSample::new(10.0, 10.0, 0.5, 0.0),
            PointerKind::Touch,
            target,
        );
        assert_eq!(outcome, PointerOutcome::Excluded);
        assert_eq!(r.mark_count(), 0);
        assert!(!r.is_stroking());
    }
}

#[test]
fn test_excluded_press_does_not_end_running_stroke() {
    let mut r = renderer(PainterConfig::default());
    r.pointer_down(PointerSample::new(10.0, 10.0, 0.5, 0.0), PointerKind::Mouse, &page());
    let before = r.mark_count();

    let button = TargetPath::single(ElementInfo::new("button"));
    r.pointer_down(PointerSample::new(90.0, 90.0, 0.5, 5.0), PointerKind::Touch, &button);

    assert!(r.is_stroking());
    assert_eq!(r.mark_count(), before);
}

#[test]
fn test_locked_page_unlocks_paints_and_relocks() {
    let mut config = PainterConfig::default();
    config.gate.lock = LockMode::long_press();
    let mut r = renderer(config);
    assert_eq!(r.lock_state(), LockState::Locked);

    // Presses below the top band never unlock
    r.pointer_down(PointerSample::new(100.0, 200.0, 0.5, 0.0), PointerKind::Touch, &page());
    assert_eq!(r.render_frame(1000.0).lock_change, None);
    r.pointer_up(1000.0);

    r.pointer_down(PointerSample::new(100.0, 40.0, 0.5, 2000.0), PointerKind::Touch, &page());
    assert_eq!(r.render_frame(2700.0).lock_change, Some(LockState::Unlocked));
    r.pointer_up(2800.0);

    r.pointer_down(PointerSample::new(100.0, 150.0, 0.5, 3000.0), PointerKind::Touch, &page());
    for i in 1..=10 {
        let t = 3000.0 + 16.0 * i as f64;
        r.pointer_move(PointerSample::new(100.0 + 8.0 * i as f32, 150.0, 0.5, t));
    }
    assert!(r.mark_count() > 1);

    // Last activity at 3160: relock fires at 9160 and ends the held stroke
    assert_eq!(r.render_frame(9159.0).lock_change, None);
    assert_eq!(r.render_frame(9160.0).lock_change, Some(LockState::Locked));
    assert!(!r.is_stroking());
    assert_eq!(
        r.pointer_down(PointerSample::new(100.0, 150.0, 0.5, 9200.0), PointerKind::Mouse, &page()),
        PointerOutcome::Locked
    );
}

#[test]
fn test_missing_surface_is_a_quiet_noop() {
    let mut r: AmbientRenderer<CpuSurface> = AmbientRenderer::new(
        None,
        PainterConfig::default(),
        Box::new(ExclusionSet::none()),
        Box::new(SequenceJitter::constant(0.25)),
    );
    r.resize(DisplayConfig::new(640, 480).with_scale(2.0));

    r.pointer_down(PointerSample::new(1.0, 1.0, 0.5, 0.0), PointerKind::Mouse, &page());
    r.pointer_move(PointerSample::new(40.0, 1.0, 0.5, 16.0));
    let report = r.render_frame(20.0);
    assert_eq!(report.drawn, 0);
    assert!(r.surface().is_none());
}

#[test]
fn test_from_config_uses_json_knobs() {
    let config = PainterConfig::from_json(
        r#"{ "lifespan_ms": 500, "gate": { "exclusions": ["footer"] } }"#,
    )
    .unwrap();
    let mut r = AmbientRenderer::from_config(Some(CpuSurface::new(1, 1)), config).unwrap();
    r.resize(DisplayConfig::new(100, 100));

    let footer = TargetPath::single(ElementInfo::new("footer"));
    let button = TargetPath::single(ElementInfo::new("button"));
    let point = PointerSample::new(10.0, 10.0, 0.5, 0.0);
    assert_eq!(r.pointer_down(point, PointerKind::Mouse, &footer), PointerOutcome::Excluded);
    assert_eq!(r.pointer_down(point, PointerKind::Mouse, &button), PointerOutcome::Started);

    assert_eq!(r.render_frame(500.0).expired, 1);
}
