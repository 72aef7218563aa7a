use std::collections::HashSet;

use qmeans_seq::{Halton, LowDiscrepancy, SequenceKind, Sobol};

fn take(g: &mut dyn LowDiscrepancy, n: usize) -> Vec<Vec<f64>> {
    (0..n).map(|_| g.next_point().to_vec()).collect()
}

fn keys(points: &[Vec<f64>]) -> HashSet<Vec<u64>> {
    points
        .iter()
        .map(|p| p.iter().map(|x| x.to_bits()).collect())
        .collect()
}

#[test]
fn sobol_2d_first_thousand_unique_and_in_range() {
    let mut g = Sobol::new(2).unwrap();
    let pts = take(&mut g, 1000);
    for p in &pts[..3] {
        assert!(p.iter().all(|x| (0.0..1.0).contains(x)), "{p:?} outside unit square");
    }
    for p in &pts {
        assert!(p.iter().all(|x| (0.0..1.0).contains(x)));
    }
    assert_eq!(keys(&pts).len(), 1000, "draws must not repeat");
}

#[test]
fn halton_2d_first_thousand_unique() {
    let mut g = Halton::new(2).unwrap();
    let pts = take(&mut g, 1000);
    assert_eq!(keys(&pts).len(), 1000);
}

#[test]
fn reset_reproduces_fresh_generator() {
    for kind in [SequenceKind::Sobol, SequenceKind::Halton] {
        for dim in [1, 2, 7] {
            let mut g = kind.build(dim).unwrap();
            let first = take(g.as_mut(), 257);
            g.reset();
            let again = take(g.as_mut(), 257);
            assert_eq!(first, again, "{kind} dim {dim}");

            let mut fresh = kind.build(dim).unwrap();
            assert_eq!(take(fresh.as_mut(), 257), first, "{kind} dim {dim}");
        }
    }
}

#[test]
fn independent_generators_do_not_interfere() {
    let mut a = Sobol::new(3).unwrap();
    let mut b = Sobol::new(3).unwrap();
    a.next_point();
    a.next_point();
    let b_first = b.next_point().to_vec();
    a.reset();
    assert_eq!(a.next_point(), b_first.as_slice());
}

#[test]
fn sobol_covers_quadrants_evenly() {
    // Sobol points 0..2^k form a (0, k, 2)-net in the first two coordinates:
    // every 1/4 x 1/4 box receives exactly one of 16 consecutive points.
    let mut g = Sobol::new(2).unwrap();
    let mut pts = vec![vec![0.0, 0.0]];
    pts.extend(take(&mut g, 15));
    let mut boxes = [[0usize; 4]; 4];
    for p in &pts {
        boxes[(p[0] * 4.0) as usize][(p[1] * 4.0) as usize] += 1;
    }
    for row in boxes {
        assert_eq!(row, [1, 1, 1, 1]);
    }
}
