use super::*;

/// Turn over a curl that `a` runs through.
///
/// The vertical strands at `c0` and `c1` belong to one loop, closed above
/// `a` by `n0 == n1` and crossing itself at `c2` below (`e2 == s1`), or
/// closed below by `s0 == s1` and crossing itself at `c3` above
/// (`e3 == n1`). `a` passes over the loop at one of `c0`, `c1` and under it
/// at the other. When the loop's level at its self-crossing matches its level
/// at `c0`, the loop can be flipped across `a`: the self-crossing goes away
/// and the loop then runs through `c1` before `c0`, keeping the sequence of
/// levels along it.
///
/// If the outer arcs at the self-crossing are one and the same, that
/// crossing is a plain kink and is removed as in Reidemeister I.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReidemeisterIa;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CurlSide {
    Below(Below),
    Above(Above),
}

/// Output of [`ReidemeisterIa::find`].
#[derive(Debug)]
pub struct ReidemeisterIaData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
    pub(crate) side: CurlSide,
}

impl MoveFinder<ArcNbhd> for ReidemeisterIa {
    type Output<'a> = ReidemeisterIaData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        let ArcNbhd { c0, c1, n0, s0, s1, n1, o0, o1, .. } = nb;
        if c0 == c1 || o0 == o1 { return None; }
        let side =
            if n0 == n1 {
                let below = nb.below(dg)?;
                (below.e2 == s1 && below.o2 == o0)
                    .then_some(CurlSide::Below(below))?
            } else if s0 == s1 {
                let above = nb.above(dg)?;
                (above.e3 == n1 && above.o3 == o0)
                    .then_some(CurlSide::Above(above))?
            } else {
                return None;
            };
        Some(ReidemeisterIaData { dg, nb, side })
    }
}

impl<'a> Move for ReidemeisterIaData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, nb, side } = self;
        let ArcNbhd { a, c0, c1, u0, n0, w0, s0, u1, s1, e1, n1, o0, o1, .. } = nb;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            match side {
                CurlSide::Below(Below { c2, w2, s2, .. }) if w2 == s2 => {
                    rw.erase(dg, &[c2])?;
                    rw.counts.reidemeister_i += 1;
                },
                CurlSide::Above(Above { c3, n3, w3, .. }) if w3 == n3 => {
                    rw.erase(dg, &[c3])?;
                    rw.counts.reidemeister_i += 1;
                },
                // both vertical strands reverse direction
                CurlSide::Below(Below { c2, w2, s2, .. }) => {
                    rw.place(dg, c0, Layout {
                        west: w0, east: a, north: n0, south: w2, up: u1, over: o1 })?;
                    rw.place(dg, c1, Layout {
                        west: a, east: e1, north: n0, south: s2, up: u0, over: o0 })?;
                    rw.remove(dg, &[s0, s1], &[c2]);
                    rw.counts.reidemeister_ia += 1;
                },
                CurlSide::Above(Above { c3, n3, w3, .. }) => {
                    rw.place(dg, c0, Layout {
                        west: w0, east: a, north: w3, south: s0, up: u1, over: o1 })?;
                    rw.place(dg, c1, Layout {
                        west: a, east: e1, north: n3, south: s0, up: u0, over: o0 })?;
                    rw.remove(dg, &[n0, n1], &[c3]);
                    rw.counts.reidemeister_ia += 1;
                },
            }
            Ok(rw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::Handedness;
    use crate::rules::testing::*;

    // unknot with three crossings: arc 0 runs through a curl closed above it,
    // and arc 3 through one closed below it
    fn build_threaded_kink() -> Diagram {
        pd(vec![
            [2, 0, 3, 5,  1],
            [0, 4, 1, 3,  1],
            [1, 4, 2, 5, -1],
        ])
    }

    // arc 7 runs through a curl closed above it, crossing itself at
    // crossing 2; no other arcs coincide
    fn build_curl_below() -> Diagram {
        pd(vec![
            [2, 0, 3, 7,  1],
            [0, 5, 1, 6, -1],
            [1, 5, 2, 4,  1],
            [6, 4, 7, 3,  1],
        ])
    }

    #[test]
    fn turn_over_below() {
        let mut dg = build_threaded_kink();
        assert!(dg.check().is_ok());
        let nb = dg.arc_nbhd(0, false).unwrap();
        assert_eq!(nb.n0, nb.n1);
        assert!(!nb.o0 && nb.o1);
        let rw = dg.apply_move(ReidemeisterIa, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_ia,    1);
        assert_eq!(rw.counts.crossings_removed(), 1);
        assert!(!dg.crossing_active(2));
        assert!(!dg.arc_active(2) && !dg.arc_active(4));
        assert_eq!(dg.count_crossings(), 2);
        assert_eq!(dg.count_arcs(),      4);
        assert_eq!(dg.crossing_arcs(0), [5, 5, 0, 3]);
        assert_eq!(dg.crossing_arcs(1), [1, 1, 3, 0]);
        // the arc closing the curl now runs backward
        assert_eq!(dg.arc_crossing(3, End::Tail), 1);
        assert_eq!(dg.arc_crossing(3, End::Head), 0);
        assert_eq!(dg.handedness(0), Some(Handedness::RightHanded));
        assert_eq!(dg.handedness(1), Some(Handedness::RightHanded));
        assert_eq!(dg.count_link_components(), 1);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn turn_over_above() {
        let mut dg = build_threaded_kink();
        let nb = dg.arc_nbhd(3, false).unwrap();
        assert_eq!(nb.s0, nb.s1);
        assert!(nb.o0 && !nb.o1);
        let rw = dg.apply_move(ReidemeisterIa, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_ia, 1);
        assert!(!dg.crossing_active(2));
        assert!(!dg.arc_active(1) && !dg.arc_active(5));
        assert_eq!(dg.crossing_arcs(0), [0, 3, 2, 2]);
        assert_eq!(dg.crossing_arcs(1), [3, 0, 4, 4]);
        assert_eq!(dg.arc_crossing(0, End::Tail), 1);
        assert_eq!(dg.arc_crossing(0, End::Head), 0);
        assert_eq!(dg.writhe(), 2);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn turn_over_keeps_levels_along_curl() {
        let mut dg = build_curl_below();
        assert!(dg.check().is_ok());
        let writhe = dg.writhe();
        let nb = dg.arc_nbhd(7, true).unwrap();
        let (o0, o1) = (nb.o0, nb.o1);
        assert_ne!(o0, o1);
        let rw = dg.apply_move(ReidemeisterIa, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_ia, 1);
        assert_eq!(dg.count_crossings(), 3);
        assert_eq!(dg.count_arcs(),      6);
        assert_eq!(dg.writhe(), writhe - 1);
        let nb = dg.arc_nbhd(7, true).unwrap();
        assert_eq!((nb.o0, nb.o1), (o1, o0));
        assert_eq!(nb.n0, nb.n1);
        assert_eq!(dg.count_link_components(), 1);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn unlinked_curl_is_a_kink() {
        // arc 5 runs through a curl whose self-crossing, crossing 0, is a
        // kink; the curl and arc 5 belong to different components
        let mut dg = pd(vec![
            [3, 1, 0, 0,  1],
            [2, 5, 3, 4, -1],
            [4, 1, 5, 2, -1],
        ]);
        assert_eq!(dg.count_link_components(), 2);
        let nb = dg.arc_nbhd(5, false).unwrap();
        let rw = dg.apply_move(ReidemeisterIa, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_i,  1);
        assert_eq!(rw.counts.reidemeister_ia, 0);
        assert_eq!(rw.counts.unlinks,         0);
        assert!(!dg.crossing_active(0));
        assert_eq!(dg.count_crossings(), 2);
        assert_eq!(dg.count_link_components(), 2);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn same_levels_do_not_match() {
        let mut dg = build_threaded_kink();
        dg.switch_crossing(1).unwrap();
        let nb = dg.arc_nbhd(0, true).unwrap();
        assert_eq!(nb.o0, nb.o1);
        assert!(dg.find_move(ReidemeisterIa, nb).is_none());
        let mut dg = build_threaded_kink();
        dg.switch_crossing(2).unwrap();
        let nb = dg.arc_nbhd(0, true).unwrap();
        assert!(dg.find_move(ReidemeisterIa, nb).is_none());
    }
}
