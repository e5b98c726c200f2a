//! Splitting of connected sums at pinch points.
//!
//! Two distinct arcs that border the same pair of faces (with the same face
//! on the left of each) are crossed exactly once each by a circle that passes
//! through those two faces and nothing else. The circle cuts the diagram into
//! two summands, and the arcs can be rerouted so that each summand closes up
//! on its own side. Afterward the summands are separate diagram components of
//! the same store and are read as factors of a connected sum; see
//! [`Diagram::split_components`] to pull them apart.
//!
//! Face data is computed once, before the splitter runs, and is never
//! updated by it. A pass may perform several splits, but only at pinch
//! points whose faces have not been touched by an earlier split of the same
//! pass.

use itertools::Itertools;
use rustc_hash::{ FxHashMap, FxHashSet };
use tracing::trace;
use crate::diagram::FaceId;
use super::*;

/// Split a diagram at a pinch point formed by arcs `a` and `b`.
///
/// Depending on how many crossings `a` and `b` already share:
/// - none: the heads of `a` and `b` are exchanged, which leaves the crossing
///   count unchanged;
/// - one: the shared crossing is nugatory and is smoothed away (counted as a
///   Reidemeister I move);
/// - two: `a` and `b` form a bigon whose crossings are both nugatory and both
///   smoothed away (counted as two Reidemeister I moves).
///
/// Leftover closed strands without crossings are recorded as unlinks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectedSum;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SumKind {
    // no shared crossings
    Disjoint,
    // tail(a) == head(b)
    Shared,
    // tail(a) == head(b) and head(a) == tail(b)
    Bigon,
}

/// Output of [`ConnectedSum::find`].
#[derive(Debug)]
pub struct ConnectedSumData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) a: ArcId,
    pub(crate) b: ArcId,
    pub(crate) kind: SumKind,
}

// order `a` and `b` so that a single shared crossing is at the tail of `a`
fn classify(dg: &Diagram, a: ArcId, b: ArcId) -> Option<(ArcId, ArcId, SumKind)> {
    let ta = dg.arc_crossing(a, End::Tail);
    let ha = dg.arc_crossing(a, End::Head);
    let tb = dg.arc_crossing(b, End::Tail);
    let hb = dg.arc_crossing(b, End::Head);
    if ta == ha || tb == hb { return None; }
    match (ta == hb, ha == tb) {
        (true, true) => {
            let a_prev = dg.next_arc(a, End::Tail);
            let b_next = dg.next_arc(b, End::Head);
            let a_next = dg.next_arc(a, End::Head);
            let b_prev = dg.next_arc(b, End::Tail);
            (a_prev != b && a_next != b && a_prev != a_next && b_prev != b_next)
                .then_some((a, b, SumKind::Bigon))
        },
        (true, false) => {
            (dg.next_arc(a, End::Tail) != b).then_some((a, b, SumKind::Shared))
        },
        (false, true) => {
            (dg.next_arc(b, End::Tail) != a).then_some((b, a, SumKind::Shared))
        },
        (false, false) => (ha != hb).then_some((a, b, SumKind::Disjoint)),
    }
}

impl<'f> MoveFinder<(&'f Faces, ArcId, ArcId)> for ConnectedSum {
    type Output<'a> = ConnectedSumData<'a>;

    fn find<'d>(self, dg: &'d mut Diagram, site: (&'f Faces, ArcId, ArcId))
        -> Option<Self::Output<'d>>
    {
        let (faces, a, b) = site;
        if a == b || !dg.arc_active(a) || !dg.arc_active(b) { return None; }
        let fa = (faces.left_face(a)?, faces.right_face(a)?);
        let fb = (faces.left_face(b)?, faces.right_face(b)?);
        if fa != fb || fa.0 == fa.1 { return None; }
        let (a, b, kind) = classify(dg, a, b)?;
        Some(ConnectedSumData { dg, a, b, kind })
    }
}

impl<'a> Move for ConnectedSumData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, a, b, kind } = self;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            match kind {
                SumKind::Disjoint => {
                    let ca = dg.arc_crossing(a, End::Head);
                    let cb = dg.arc_crossing(b, End::Head);
                    let pa = dg.end_port(a, End::Head);
                    let pb = dg.end_port(b, End::Head);
                    dg.set_end(a, End::Head, cb);
                    dg.set_end(b, End::Head, ca);
                    dg.set_port(ca, pa, b);
                    dg.set_port(cb, pb, a);
                    rw.touched.extend([ca, cb]);
                },
                SumKind::Shared => {
                    let c = dg.arc_crossing(a, End::Tail);
                    let a_prev = dg.next_arc(a, End::Tail);
                    let b_next = dg.next_arc(b, End::Head);
                    if a_prev != b_next {
                        rw.reconnect(dg, a_prev, End::Head, b_next)?;
                    } else {
                        rw.unlink(dg);
                        rw.remove(dg, &[a_prev], &[]);
                    }
                    rw.reconnect(dg, a, End::Tail, b)?;
                    rw.remove(dg, &[], &[c]);
                    rw.touched.push(c);
                    rw.counts.reidemeister_i += 1;
                },
                SumKind::Bigon => {
                    let c0 = dg.arc_crossing(a, End::Tail);
                    let c1 = dg.arc_crossing(a, End::Head);
                    let a_prev = dg.next_arc(a, End::Tail);
                    let b_next = dg.next_arc(b, End::Head);
                    let a_next = dg.next_arc(a, End::Head);
                    let b_prev = dg.next_arc(b, End::Tail);
                    if a_prev != b_next {
                        rw.reconnect(dg, a_prev, End::Head, b_next)?;
                    } else {
                        rw.unlink(dg);
                        rw.remove(dg, &[a_prev], &[]);
                    }
                    if a_next != b_prev {
                        rw.reconnect(dg, a_next, End::Tail, b_prev)?;
                    } else {
                        rw.unlink(dg);
                        rw.remove(dg, &[a_next], &[]);
                    }
                    rw.remove(dg, &[a, b], &[c0, c1]);
                    rw.touched.extend([c0, c1]);
                    rw.counts.reidemeister_i += 2;
                },
            }
            rw.counts.splits += 1;
            Ok(rw)
        })
    }
}

impl Diagram {
    /// Find all pinch points with respect to `faces`: pairs of distinct
    /// arcs with the same left face and the same right face (the two being
    /// different), one pair per pair of faces, ordered by face.
    pub fn pinch_points(&self, faces: &Faces) -> Vec<(ArcId, ArcId)> {
        let mut by_faces: FxHashMap<(FaceId, FaceId), Vec<ArcId>>
            = FxHashMap::default();
        for a in self.arcs() {
            if self.arc_crossing(a, End::Tail) == self.arc_crossing(a, End::Head) {
                continue;
            }
            let (Some(l), Some(r)) = (faces.left_face(a), faces.right_face(a))
                else { continue; };
            if l != r { by_faces.entry((l, r)).or_default().push(a); }
        }
        by_faces.into_iter()
            .filter(|(_, arcs)| arcs.len() > 1)
            .sorted_by_key(|(key, _)| *key)
            .map(|(_, arcs)| (arcs[0], arcs[1]))
            .collect()
    }

    /// Perform one pass of the connected-sum splitter with face data
    /// computed beforehand.
    ///
    /// The number of splits performed is `counts.splits` of the returned
    /// [`Rewrite`]. The pass is atomic: on error, every split already made in
    /// it is rolled back.
    pub fn split_connected_sums(&mut self, faces: &Faces) -> DiagramResult<Rewrite> {
        let pinches = self.pinch_points(faces);
        if pinches.is_empty() { return Ok(Rewrite::default()); }
        // faces meeting at each crossing, as of `faces`
        let corners: Vec<Vec<FaceId>>
            = (0..self.crossing_capacity())
            .map(|c| {
                if !self.crossing_active(c) { return Vec::new(); }
                self.crossing_arcs(c).into_iter()
                    .flat_map(|a| [faces.left_face(a), faces.right_face(a)])
                    .flatten()
                    .unique()
                    .collect()
            })
            .collect();
        self.transaction(|dg| {
            let mut total = Rewrite::default();
            let mut dirty: FxHashSet<FaceId> = FxHashSet::default();
            for (a, b) in pinches {
                let (Some(f), Some(g)) = (faces.left_face(a), faces.right_face(a))
                    else { continue; };
                if dirty.contains(&f) || dirty.contains(&g) {
                    trace!(a, b, "skipping pinch point on modified faces");
                    continue;
                }
                if let Outcome::Applied(rw) = dg.apply_move(ConnectedSum, (faces, a, b))? {
                    dirty.extend([f, g]);
                    rw.touched.iter()
                        .filter_map(|&c| corners.get(c))
                        .for_each(|fs| { dirty.extend(fs.iter().copied()); });
                    total.counts += rw.counts;
                    total.touched.extend(rw.touched);
                }
            }
            Ok(total)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::*;

    // two trefoils joined through arcs 0 and 6
    fn build_sum() -> Diagram {
        pd(vec![
            [ 5,  2,  0,  3, -1],
            [ 3,  6,  4,  1, -1],
            [ 1,  4,  2,  5, -1],
            [11,  8,  6,  9, -1],
            [ 9,  0, 10,  7, -1],
            [ 7, 10,  8, 11, -1],
        ])
    }

    // as `build_sum`, but the joining strands cross once more at crossing 6
    fn build_nugatory() -> Diagram {
        pd(vec![
            [ 5,  2,  0,  3, -1],
            [ 3, 13,  4,  1, -1],
            [ 1,  4,  2,  5, -1],
            [11,  8,  6,  9, -1],
            [ 9, 12, 10,  7, -1],
            [ 7, 10,  8, 11, -1],
            [ 6, 12, 13,  0,  1],
        ])
    }

    // as `build_sum`, but the joining strands cross twice, at crossings 6 and
    // 7, with arcs 12 and 14 between them
    fn build_full_twist() -> Diagram {
        pd(vec![
            [ 5,  2,  0,  3, -1],
            [ 3, 15,  4,  1, -1],
            [ 1,  4,  2,  5, -1],
            [11,  8,  6,  9, -1],
            [ 9, 13, 10,  7, -1],
            [ 7, 10,  8, 11, -1],
            [14, 12, 15,  0,  1],
            [ 6, 13, 14, 12,  1],
        ])
    }

    #[test]
    fn swap_heads() {
        let mut dg = build_sum();
        assert!(dg.check().is_ok());
        let faces = dg.faces();
        assert_eq!(dg.pinch_points(&faces), vec![(0, 6)]);
        let rw = dg.split_connected_sums(&faces).unwrap();
        assert_eq!(rw.counts.splits, 1);
        assert_eq!(rw.counts.total(), 1);
        assert_eq!(dg.count_crossings(), 6);
        assert_eq!(dg.arc_crossing(0, End::Head), 1);
        assert_eq!(dg.arc_crossing(6, End::Head), 4);
        assert_eq!(dg.diagram_components().len(), 2);
        assert!(dg.check().is_ok());
        let faces = dg.faces();
        assert!(dg.pinch_points(&faces).is_empty());
    }

    #[test]
    fn smooth_nugatory() {
        let mut dg = build_nugatory();
        assert!(dg.check().is_ok());
        let faces = dg.faces();
        assert_eq!(dg.pinch_points(&faces).len(), 2);
        let rw = dg.split_connected_sums(&faces).unwrap();
        assert_eq!(rw.counts.splits,         1);
        assert_eq!(rw.counts.reidemeister_i, 1);
        assert!(!dg.crossing_active(6));
        assert_eq!(dg.count_crossings(), 6);
        assert!(dg.check().is_ok());
        let pieces = dg.split_components();
        assert_eq!(pieces.len(), 2);
        for piece in pieces.iter() {
            assert_eq!(piece.count_crossings(), 3);
            assert_eq!(piece.writhe(),         -3);
            assert!(piece.check().is_ok());
        }
    }

    #[test]
    fn smooth_bigon() {
        let mut dg = build_full_twist();
        assert!(dg.check().is_ok());
        let faces = dg.faces();
        assert!(dg.pinch_points(&faces).contains(&(12, 14)));
        let rw = dg.apply_move(ConnectedSum, (&faces, 12, 14))
            .unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.splits,         1);
        assert_eq!(rw.counts.reidemeister_i, 2);
        assert_eq!(rw.counts.unlinks,        0);
        assert_eq!(dg.count_crossings(), 6);
        assert_eq!(dg.arc_crossing(0, End::Head),  1);
        assert_eq!(dg.arc_crossing(13, End::Tail), 3);
        assert_eq!(dg.diagram_components().len(), 2);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn prime_knot_has_no_pinch() {
        let mut dg = build_trefoil();
        let faces = dg.faces();
        assert!(dg.pinch_points(&faces).is_empty());
        assert!(dg.find_move(ConnectedSum, (&faces, 0, 3)).is_none());
        let rw = dg.split_connected_sums(&faces).unwrap();
        assert_eq!(rw, Rewrite::default());
        assert_eq!(dg, build_trefoil());
    }
}
