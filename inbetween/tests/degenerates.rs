use inbetween::algorithms::topology::{resolve, PairKind};
use inbetween::{
    compute_tween, BindingSet, CorrespondenceGroup, Frame, MatchStrategy, Point, Stroke, TweenConfig, TweenEngine,
};

fn line(id: u32, y: f32) -> Stroke {
    Stroke::from_xy(id, &[(0.0, y), (100.0, y)])
}

#[test]
fn empty_source_frame_yields_nothing() {
    let prev = Frame::new(0, vec![]);
    let next = Frame::new(10, vec![line(1, 0.0)]);
    let out = compute_tween(5, &prev, &next, &BindingSet::new(), MatchStrategy::Index, &TweenConfig::default());
    assert!(out.is_empty());
}

#[test]
fn empty_target_frame_holds_the_source() {
    let prev = Frame::new(0, vec![line(1, 0.0)]);
    let next = Frame::new(10, vec![]);
    let out = compute_tween(5, &prev, &next, &BindingSet::new(), MatchStrategy::Index, &TweenConfig::default());
    assert_eq!(out, prev.strokes);
}

#[test]
fn same_index_keyframes_return_the_source() {
    let prev = Frame::new(3, vec![line(1, 0.0)]);
    let next = Frame::new(3, vec![line(2, 50.0)]);
    let out = compute_tween(3, &prev, &next, &BindingSet::new(), MatchStrategy::Index, &TweenConfig::default());
    assert_eq!(out, prev.strokes);
}

#[test]
fn too_many_children_fall_back_to_mesh() {
    let cfg = TweenConfig::default();
    let single = line(1, 0.0);
    let children: Vec<Stroke> = (0..9).map(|i| line(10 + i, 10.0 * i as f32)).collect();
    let group = CorrespondenceGroup::new(0, 10, vec![1; 9], children.iter().map(|s| s.id).collect());
    let pairs = resolve(&[single], &children, &[group], MatchStrategy::Index, &cfg);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].kind, PairKind::Mesh);
    assert_eq!(pairs[0].start.len(), cfg.mesh_samples);
    assert_eq!(pairs[0].end.len(), cfg.mesh_samples);
    assert_eq!(pairs[0].parents(), vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18]);
}

#[test]
fn zero_length_single_path_falls_back_to_mesh() {
    let cfg = TweenConfig::default();
    let dot = Stroke::from_xy(1, &[(5.0, 5.0), (5.0, 5.0)]);
    let children = vec![line(2, 0.0), line(3, 20.0)];
    let group = CorrespondenceGroup::new(0, 10, vec![1, 1], vec![2, 3]);
    let pairs = resolve(&[dot], &children, &[group], MatchStrategy::Index, &cfg);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].kind, PairKind::Mesh);
    assert!(pairs[0].start.iter().all(|p| p.x == 5.0 && p.y == 5.0));
}

#[test]
fn strokes_without_points_are_skipped() {
    let prev = Frame::new(0, vec![Stroke::new(1, Vec::<Point>::new()), line(2, 0.0)]);
    let next = Frame::new(10, vec![line(3, 10.0)]);
    let out = compute_tween(5, &prev, &next, &BindingSet::new(), MatchStrategy::Index, &TweenConfig::default());
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].parents, vec![2, 3]);
    assert!(out[1].points.is_empty());
    assert_eq!(out[1].parents, vec![1]);
}

#[test]
fn bindings_for_other_keyframes_are_ignored() {
    let prev = Frame::new(0, vec![line(1, 0.0), line(2, 50.0)]);
    let next = Frame::new(10, vec![line(3, 0.0), line(4, 50.0)]);
    let elsewhere = BindingSet::from_groups(vec![CorrespondenceGroup::new(10, 20, vec![1], vec![4])]);
    let out = compute_tween(5, &prev, &next, &elsewhere, MatchStrategy::Index, &TweenConfig::default());
    assert_eq!(out[0].parents, vec![1, 3]);
    assert_eq!(out[1].parents, vec![2, 4]);
}

#[test]
fn group_with_only_missing_targets_is_ignored() {
    let prev = Frame::new(0, vec![line(1, 0.0)]);
    let next = Frame::new(10, vec![line(3, 10.0)]);
    let bindings = BindingSet::from_groups(vec![CorrespondenceGroup::new(0, 10, vec![1, 1], vec![7, 8])]);
    let out = compute_tween(5, &prev, &next, &bindings, MatchStrategy::Index, &TweenConfig::default());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].parents, vec![1, 3]);
}

#[test]
fn engine_matches_pure_function() {
    let prev = Frame::new(0, vec![line(1, 0.0)]);
    let next = Frame::new(10, vec![line(2, 40.0)]);
    let bindings = BindingSet::new();
    let cfg = TweenConfig::default();
    let mut engine = TweenEngine::new(cfg.clone());
    for f in 0..=10 {
        let pure = compute_tween(f, &prev, &next, &bindings, MatchStrategy::Index, &cfg);
        assert_eq!(engine.compute(f, &prev, &next, &bindings, MatchStrategy::Index), pure);
    }
}
