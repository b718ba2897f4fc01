//! Solver scenarios, regression polygons and fuzzing.

use super::*;
use crate::error::SkeletonError;
use crate::polygon::{polygon_signed_area, Polygon};
use crate::primitives::{Ellipse2, Point2};
use crate::tolerance::{orient2d, Orientation};
use approx::assert_relative_eq;
use proptest::prelude::*;
use std::collections::HashMap;
use std::f64::consts::{PI, SQRT_2, TAU};

fn points(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
    coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

fn clockwise(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
    let mut ring = points(coords);
    if polygon_signed_area(&ring) > 0.0 {
        ring.reverse();
    }
    ring
}

fn regular(n: usize, radius: f64) -> Vec<Point2<f64>> {
    let coords: Vec<_> = (0..n)
        .map(|k| {
            let angle = TAU * k as f64 / n as f64;
            (5.0 + radius * angle.cos(), 5.0 + radius * angle.sin())
        })
        .collect();
    clockwise(&coords)
}

fn star(n: usize) -> Vec<Point2<f64>> {
    let coords: Vec<_> = (0..2 * n)
        .map(|k| {
            let r = if k % 2 == 0 { 4.0 } else { 1.6 };
            let angle = PI * k as f64 / n as f64;
            (5.0 + r * angle.cos(), 5.0 + r * angle.sin())
        })
        .collect();
    clockwise(&coords)
}

fn square() -> Vec<Point2<f64>> {
    points(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)])
}

fn rectangle() -> Vec<Point2<f64>> {
    points(&[(0.0, 0.0), (0.0, 2.0), (4.0, 2.0), (4.0, 0.0)])
}

fn house() -> Vec<Point2<f64>> {
    points(&[(0.0, 2.0), (0.0, 6.0), (4.0, 6.0), (4.0, 2.0), (2.0, 0.0)])
}

fn l_shape() -> Vec<Point2<f64>> {
    points(&[(0.0, 0.0), (0.0, 2.0), (1.0, 2.0), (1.0, 1.0), (2.0, 1.0), (2.0, 0.0)])
}

fn t_shape() -> Vec<Point2<f64>> {
    clockwise(&[
        (0.0, 3.0),
        (4.0, 3.0),
        (4.0, 2.0),
        (2.5, 2.0),
        (2.5, 0.0),
        (1.5, 0.0),
        (1.5, 2.0),
        (0.0, 2.0),
    ])
}

fn u_shape() -> Vec<Point2<f64>> {
    clockwise(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (3.0, 3.0),
        (2.0, 3.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 3.0),
        (0.0, 3.0),
    ])
}

fn cross() -> Vec<Point2<f64>> {
    clockwise(&[
        (1.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (3.0, 1.0),
        (3.0, 2.0),
        (2.0, 2.0),
        (2.0, 3.0),
        (1.0, 3.0),
        (1.0, 2.0),
        (0.0, 2.0),
        (0.0, 1.0),
        (1.0, 1.0),
    ])
}

fn arrow() -> Vec<Point2<f64>> {
    clockwise(&[
        (0.0, 1.0),
        (3.0, 1.0),
        (3.0, 0.0),
        (5.0, 2.0),
        (3.0, 4.0),
        (3.0, 3.0),
        (0.0, 3.0),
    ])
}

fn zigzag() -> Vec<Point2<f64>> {
    clockwise(&[
        (0.0, 0.0),
        (6.0, 0.0),
        (6.0, 2.0),
        (5.0, 1.0),
        (4.0, 2.0),
        (3.0, 1.0),
        (2.0, 2.0),
        (1.0, 1.0),
        (0.0, 2.0),
    ])
}

fn notch() -> Vec<Point2<f64>> {
    clockwise(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 3.0),
        (2.2, 3.0),
        (2.0, 1.5),
        (1.8, 3.0),
        (0.0, 3.0),
    ])
}

fn battery() -> Vec<(&'static str, Vec<Point2<f64>>)> {
    vec![
        ("square", square()),
        ("rectangle", rectangle()),
        ("triangle", points(&[(0.0, 0.0), (2.0, 4.0), (4.0, 0.0)])),
        ("house", house()),
        ("l", l_shape()),
        ("t", t_shape()),
        ("u", u_shape()),
        ("cross", cross()),
        ("hexagon", regular(6, 3.0)),
        ("heptagon", regular(7, 3.0)),
        ("star", star(5)),
        ("arrow", arrow()),
        ("zigzag", zigzag()),
        ("notch", notch()),
    ]
}

/// Runs the solver to completion and checks the structural invariants.
fn solve_checked(ring: &[Point2<f64>]) -> Result<Graph, SkeletonError> {
    let config = SolverConfig::default();
    let mut solver = SkeletonSolver::new(ring, &config)?;
    while solver.step()? != StepOutcome::Complete {}

    let ctx = solver.context();
    let graph = solver.graph();
    let n = ring.len();
    let tol = ctx.tolerance();

    assert!(ctx.is_complete(), "unaccepted edges remain");
    assert!(ctx.active_bisectors().is_empty());
    assert_eq!(graph.num_exterior_nodes(), n);
    assert_eq!(graph.edges().len(), n + graph.interior_edges().len());

    let bounds = ctx.bounds().inflated(tol);
    for node in graph.interior_nodes() {
        assert!(
            bounds.contains_point(node.position),
            "node {} at {:?} outside the input",
            node.id,
            node.position
        );
    }
    for edge in &graph.edges()[n..] {
        assert!(edge.target.is_some(), "interior edge {} never ended", edge.id);
    }
    Ok(graph.clone())
}

fn assert_has_node(graph: &Graph, x: f64, y: f64) {
    let target = Point2::new(x, y);
    assert!(
        graph
            .interior_nodes()
            .iter()
            .any(|node| node.position.approx_eq(target, 1e-6)),
        "no node near ({x}, {y}) in {:?}",
        graph.interior_nodes().iter().map(|n| n.position).collect::<Vec<_>>()
    );
}

#[test]
fn test_square() {
    let graph = solve_checked(&square()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 1);
    assert_eq!(graph.edges().len(), 8);
    assert_has_node(&graph, 1.0, 1.0);
    assert_relative_eq!(graph.total_length(), 4.0 * SQRT_2, epsilon = 1e-9);
}

#[test]
fn test_rectangle() {
    let graph = solve_checked(&rectangle()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 2);
    assert_eq!(graph.edges().len(), 9);
    assert_has_node(&graph, 1.0, 1.0);
    assert_has_node(&graph, 3.0, 1.0);
    assert_relative_eq!(graph.total_length(), 4.0 * SQRT_2 + 2.0, epsilon = 1e-9);

    // The ridge is born between the two long sides, which run opposite ways.
    let ridge = graph.interior_edge(8);
    assert_eq!(ridge.widdershins_parent, 3);
    assert_eq!(ridge.clockwise_parent, 1);
    assert_relative_eq!(graph.edge(8).basis.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(graph.edge(8).basis.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(ridge.length, 2.0, epsilon = 1e-9);
}

#[test]
fn test_triangle() {
    let graph = solve_checked(&points(&[(0.0, 0.0), (2.0, 4.0), (4.0, 0.0)])).unwrap();
    assert_eq!(graph.interior_nodes().len(), 1);
    assert_has_node(&graph, 2.0, 5.0_f64.sqrt() - 1.0);
}

#[test]
fn test_house() {
    let graph = solve_checked(&house()).unwrap();
    assert_eq!(graph.nodes().len(), 7);
    assert_eq!(graph.edges().len(), 11);
    assert_has_node(&graph, 2.0, 2.0 * SQRT_2);
    assert_has_node(&graph, 2.0, 4.0);
}

#[test]
fn test_l_shape_splits_at_reflex_corner() {
    let graph = solve_checked(&l_shape()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 3);
    assert_eq!(graph.edges().len(), 14);
    assert_has_node(&graph, 0.5, 1.5);
    assert_has_node(&graph, 1.5, 0.5);
    assert_has_node(&graph, 0.5, 0.5);
}

#[test]
fn test_t_shape() {
    let graph = solve_checked(&t_shape()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 4);
    for (x, y) in [(0.5, 2.5), (3.5, 2.5), (2.0, 0.5), (2.0, 2.5)] {
        assert_has_node(&graph, x, y);
    }
    assert_relative_eq!(graph.total_length(), 10.656854249492381, epsilon = 1e-9);
}

#[test]
fn test_u_shape() {
    let graph = solve_checked(&u_shape()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 4);
    assert_relative_eq!(graph.total_length(), 11.656854249492381, epsilon = 1e-9);
}

#[test]
fn test_cross_meets_in_the_middle() {
    let graph = solve_checked(&cross()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 5);
    assert_eq!(graph.edges().len(), 28);
    for (x, y) in [(1.5, 1.5), (1.5, 0.5), (0.5, 1.5), (1.5, 2.5), (2.5, 1.5)] {
        assert_has_node(&graph, x, y);
    }
    assert_relative_eq!(graph.total_length(), 12.485281374238573, epsilon = 1e-9);
}

#[test]
fn test_zigzag_splits_every_tooth() {
    let graph = solve_checked(&zigzag()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 7);
    for x in [1.0, 3.0, 5.0] {
        assert_has_node(&graph, x, SQRT_2 - 1.0);
    }
    assert_relative_eq!(graph.total_length(), 14.045078631306945, epsilon = 1e-9);
}

#[test]
fn test_arrow() {
    let graph = solve_checked(&arrow()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 4);
    assert_relative_eq!(graph.total_length(), 13.157995925915765, epsilon = 1e-9);
}

#[test]
fn test_notch_split() {
    let graph = solve_checked(&notch()).unwrap();
    assert_eq!(graph.interior_nodes().len(), 5);
    assert_has_node(&graph, 2.0, 0.1751032793389542);
    assert_relative_eq!(graph.total_length(), 14.112870378084079, epsilon = 1e-9);
}

#[test]
fn test_regular_hexagon_collapses_to_centre() {
    let graph = solve_checked(&regular(6, 3.0)).unwrap();
    assert_eq!(graph.interior_nodes().len(), 1);
    assert_has_node(&graph, 5.0, 5.0);
}

#[test]
fn test_battery_keeps_invariants() {
    for (name, ring) in battery() {
        if let Err(err) = solve_checked(&ring) {
            panic!("{name}: {err}");
        }
    }
}

#[test]
fn test_accepted_lengths_are_frozen() {
    for (name, ring) in battery() {
        let mut solver = SkeletonSolver::new(&ring, &SolverConfig::default()).unwrap();
        let n = ring.len();
        let mut frozen: HashMap<usize, f64> = HashMap::new();

        loop {
            let outcome = solver.step().unwrap();
            let ctx = solver.context();
            let graph = solver.graph();
            for id in n..graph.edges().len() {
                if !ctx.accepted_edges[id] {
                    continue;
                }
                let length = graph.interior_edge(id).length;
                match frozen.get(&id) {
                    Some(&before) => assert_eq!(before, length, "{name}: edge {id} changed length"),
                    None => {
                        let target = graph.edge(id).target.unwrap();
                        let travelled = graph.source_position(id).distance(graph.node(target).position);
                        assert_relative_eq!(length, travelled, epsilon = 1e-6);
                        frozen.insert(id, length);
                    }
                }
            }
            if outcome == StepOutcome::Complete {
                break;
            }
        }
        assert_eq!(frozen.len(), solver.graph().interior_edges().len(), "{name}");
    }
}

#[test]
fn test_deterministic() {
    for (name, ring) in battery() {
        assert_eq!(solve(&ring), solve(&ring), "{name}");
    }
}

#[test]
fn test_too_few_points() {
    let err = solve(&points(&[(0.0, 0.0), (1.0, 1.0)]));
    assert_eq!(err, Err(SkeletonError::TooFewPoints { count: 2 }));
}

#[test]
fn test_degenerate_inputs() {
    let duplicate = points(&[(0.0, 0.0), (0.0, 2.0), (0.0, 2.0), (2.0, 0.0)]);
    assert_eq!(solve(&duplicate), Err(SkeletonError::DegenerateInput));

    let collinear = points(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    assert_eq!(solve(&collinear), Err(SkeletonError::DegenerateInput));

    let nan = points(&[(0.0, 0.0), (0.0, f64::NAN), (2.0, 0.0)]);
    assert_eq!(solve(&nan), Err(SkeletonError::DegenerateInput));
}

#[test]
fn test_counter_clockwise_input() {
    let mut ring = square();
    ring.reverse();
    assert_eq!(solve(&ring), Err(SkeletonError::WrongWinding));

    let graph = straight_skeleton(&Polygon::new(ring)).unwrap();
    assert_eq!(graph, solve(&square()).unwrap());
}

#[test]
fn test_scaled_input_with_coarser_epsilon() {
    let ring: Vec<_> = house().iter().map(|p| Point2::new(p.x * 1e3, p.y * 1e3)).collect();
    let config = SolverConfig::default().with_epsilon(1e-7);
    let graph = solve_with_config(&ring, &config).unwrap();
    assert_eq!(graph.interior_nodes().len(), 2);
    assert_has_node(&graph, 2e3, 4e3);
}

#[test]
fn test_stepping_the_rectangle() {
    let mut solver = SkeletonSolver::new(&rectangle(), &SolverConfig::default()).unwrap();

    assert!(matches!(
        solver.step(),
        Ok(StepOutcome::Resolved { members: 2, spawned: 1, .. })
    ));
    assert!(matches!(
        solver.step(),
        Ok(StepOutcome::Resolved { members: 3, spawned: 0, .. })
    ));
    assert_eq!(solver.step(), Ok(StepOutcome::Complete));
    assert!(solver.is_complete());
    assert_eq!(solver.steps(), 2);

    // Further steps are no-ops.
    assert_eq!(solver.step(), Ok(StepOutcome::Complete));
    assert_eq!(solver.steps(), 2);
}

#[test]
fn test_trace_snapshots() {
    let trace = solve_with_trace(&rectangle(), &SolverConfig::default()).unwrap();
    assert_eq!(trace.len(), 3);
    assert!(trace[0].interior_nodes().is_empty());
    assert_eq!(trace[1].interior_nodes().len(), 1);
    assert_eq!(trace[2], solve(&rectangle()).unwrap());
}

#[test]
fn test_step_limit() {
    let config = SolverConfig::default().with_max_steps(1);
    let err = solve_with_config(&rectangle(), &config);
    assert_eq!(err, Err(SkeletonError::ConvergenceFailed { iterations: 1 }));
}

#[test]
fn test_square_gathers_all_four_bisectors() {
    let solver = SkeletonSolver::new(&square(), &SolverConfig::default()).unwrap();
    let ctx = solver.context();
    let pending = *ctx.pending(4).unwrap();

    let group = gather_input_group(ctx, 4, &pending);
    let mut members = group.members.clone();
    members.sort_unstable();
    assert_eq!(members, vec![4, 5, 6, 7]);
    assert!(group.splits.is_empty());
    assert_relative_eq!(group.offset, 1.0, epsilon = 1e-12);
}

/// An H whose top right corner is nudged by a few nanometres. The two
/// co-linear slots close at the same offset and the resulting multi-edge
/// pairing is left with wavefront that never collides.
#[test]
#[ignore = "known failure: co-linear multi-edge pairing"]
fn test_known_failure_nudged_h() {
    let ring = points(&[
        (0.0, 3.0),
        (1.0, 3.0),
        (1.0, 2.0),
        (2.0, 2.0),
        (2.0, 3.0),
        (3.0000000096922532, 2.99999818830937),
        (3.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 0.0),
        (0.0, 0.0),
    ]);
    solve_checked(&ring).unwrap();
}

fn segments_cross(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> bool {
    let straddles = |p: Point2<f64>, q: Point2<f64>, r: Point2<f64>, s: Point2<f64>| {
        let (first, second) = (orient2d(p, q, r, 0.0), orient2d(p, q, s, 0.0));
        first != Orientation::Collinear && second != Orientation::Collinear && first != second
    };
    straddles(a, b, c, d) && straddles(c, d, a, b)
}

fn is_simple(ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    for i in 0..n {
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_cross(ring[i], ring[(i + 1) % n], ring[j], ring[(j + 1) % n]) {
                return false;
            }
        }
    }
    true
}

/// Moves vertex `index` to a point inside a small ellipse around it.
///
/// The ellipse has the vertex and its mirror across the perpendicular
/// bisector of its neighbours as foci and passes through both neighbours,
/// shrunk and re-centred on the vertex.
fn perturb(ring: &[Point2<f64>], index: usize, angle: f64, radius: f64) -> Option<Vec<Point2<f64>>> {
    let n = ring.len();
    let v = ring[index];
    let prev = ring[(index + n - 1) % n];
    let next = ring[(index + 1) % n];

    let axis = (next - prev).normalize()?;
    let along = (v - prev.midpoint(next)).dot(axis);
    let mirror = v - axis * (2.0 * along);

    let ellipse = Ellipse2::from_foci(v, mirror, prev)?.scaled(0.15).recentered(v);
    let moved = v + (ellipse.point_at(angle) - v) * radius.sqrt();

    let mut out = ring.to_vec();
    out[index] = moved;
    Some(out)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn perturbed_battery_keeps_invariants(
        which in 0usize..14,
        vertex in 0usize..64,
        angle in 0.0..TAU,
        radius in 0.0f64..1.0,
    ) {
        let (name, ring) = battery().swap_remove(which);
        let index = vertex % ring.len();
        let moved = perturb(&ring, index, angle, radius);
        prop_assume!(moved.as_ref().is_some_and(|r| is_simple(r)));
        let polygon = Polygon::new(moved.unwrap_or_default());

        let mut ring = polygon.clone();
        ring.ensure_clockwise();
        let result = solve_checked(&ring.vertices);
        prop_assert!(result.is_ok(), "{name} vertex {index}: {:?} on {:?}", result, ring.vertices);
        prop_assert_eq!(result.ok(), straight_skeleton(&polygon).ok());
    }
}
