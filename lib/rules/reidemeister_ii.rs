use super::*;

/// Pull the vertical strand off arc `a` when it passes on the same level at
/// both `c0` and `c1` and the two crossings bound a bigon, i.e. `o0 == o1`
/// and `n0 == n1` or `s0 == s1` (Reidemeister II).
///
/// If both `n0 == n1` and `s0 == s1`, the vertical strand is a closed loop
/// and is split off as an unlink, provided [`ArcNbhd::multi_component`] is
/// set.
///
/// If the strand closing the bigon then runs through a kink that also takes
/// in the other side of the bigon (`e2 == s1` below an upper bigon, `e3 ==
/// n1` above a lower one), the kink goes with it. When that kink's loop is a
/// single arc, the rest of the diagram may be a separate component, so this
/// case too waits for [`ArcNbhd::multi_component`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReidemeisterII;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BigonSide {
    // n0 == n1
    Above,
    // s0 == s1, n0 != n1
    Below,
    // n0 == n1, with a kink at c2 joining s0 to s1
    KinkBelow(Below),
    // s0 == s1, n0 != n1, with a kink at c3 joining n0 to n1
    KinkAbove(Above),
}

/// Output of [`ReidemeisterII::find`].
#[derive(Debug)]
pub struct ReidemeisterIIData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
    pub(crate) side: BigonSide,
}

impl MoveFinder<ArcNbhd> for ReidemeisterII {
    type Output<'a> = ReidemeisterIIData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        let ArcNbhd { c0, c1, n0, w0, s0, s1, e1, n1, o0, o1, .. } = nb;
        if c0 == c1 || o0 != o1 { return None; }
        let side =
            if n0 == n1 {
                if let Some(below) = nb.below(dg).filter(|b| b.e2 == s1) {
                    if below.w2 == below.s2 && !nb.multi_component {
                        return None;
                    }
                    BigonSide::KinkBelow(below)
                } else {
                    if s0 == s1 && !nb.multi_component { return None; }
                    if !distinct(&[w0, e1, s0]) || !distinct(&[w0, e1, s1]) {
                        return None;
                    }
                    BigonSide::Above
                }
            } else if s0 == s1 {
                if let Some(above) = nb.above(dg).filter(|t| t.e3 == n1) {
                    if above.w3 == above.n3 && !nb.multi_component {
                        return None;
                    }
                    BigonSide::KinkAbove(above)
                } else {
                    if !distinct(&[w0, e1, n0, n1]) { return None; }
                    BigonSide::Below
                }
            } else {
                return None;
            };
        Some(ReidemeisterIIData { dg, nb, side })
    }
}

impl<'a> Move for ReidemeisterIIData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, nb, side } = self;
        let ArcNbhd { a, c0, c1, u0, n0, w0, s0, s1, e1, n1, .. } = nb;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            let kink =
                match side {
                    BigonSide::KinkBelow(Below { c2, .. }) => Some(c2),
                    BigonSide::KinkAbove(Above { c3, .. }) => Some(c3),
                    _ => None,
                };
            if let Some(k) = kink {
                rw.erase(dg, &[c0, c1, k])?;
                rw.counts.reidemeister_i += 1;
            } else {
                rw.reconnect(dg, w0, End::Head, e1)?;
                match side {
                    BigonSide::Above if s0 == s1 => {
                        rw.unlink(dg);
                        rw.remove(dg, &[s0, n0], &[]);
                    },
                    BigonSide::Above => {
                        rw.reconnect(dg, s0, End::from_bool(u0), s1)?;
                        rw.remove(dg, &[n0], &[]);
                    },
                    BigonSide::Below => {
                        rw.reconnect(dg, n0, End::from_bool(!u0), n1)?;
                        rw.remove(dg, &[s0], &[]);
                    },
                    BigonSide::KinkBelow(_) | BigonSide::KinkAbove(_) => { },
                }
                rw.remove(dg, &[a], &[c0, c1]);
            }
            rw.counts.reidemeister_ii += 1;
            Ok(rw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::*;

    // two circles, each with a kink (crossings 2 and 3), overlapping in a
    // bigon where arc 1 lies over arc 0
    fn build_bigon() -> Diagram {
        pd(vec![
            [4, 2, 0, 1, -1],
            [0, 3, 5, 1,  1],
            [6, 6, 2, 3,  1],
            [7, 7, 4, 5,  1],
        ])
    }

    #[test]
    fn pull_apart() {
        let mut dg = build_bigon();
        assert!(dg.check().is_ok());
        let nb = dg.arc_nbhd(0, false).unwrap();
        assert_eq!(nb.n0, nb.n1);
        assert!(nb.o0 && nb.o1);
        let rw = dg.apply_move(ReidemeisterII, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_ii, 1);
        assert_eq!(rw.counts.unlinks,         0);
        assert!(rw.touched.contains(&2) && rw.touched.contains(&3));
        assert_eq!(dg.count_crossings(), 2);
        assert_eq!(dg.count_arcs(),      4);
        assert_eq!(dg.writhe(),          2);
        assert!(dg.check().is_ok());
        assert_eq!(dg.arc_crossing(4, End::Head), 3);
        assert_eq!(dg.arc_crossing(2, End::Head), 2);
    }

    #[test]
    fn mixed_levels_do_not_match() {
        let mut dg = build_bigon();
        dg.switch_crossing(1).unwrap();
        let nb = dg.arc_nbhd(0, true).unwrap();
        assert_ne!(nb.o0, nb.o1);
        assert!(dg.find_move(ReidemeisterII, nb).is_none());
    }

    // unknot with three crossings; arcs 2 and 1 each bound a bigon whose
    // far side runs through a kink
    fn build_kinked_bigon() -> Diagram {
        pd(vec![
            [2, 0, 3, 5,  1],
            [0, 4, 1, 3,  1],
            [1, 4, 2, 5, -1],
        ])
    }

    #[test]
    fn pull_apart_with_kink_below() {
        let mut dg = build_kinked_bigon();
        let nb = dg.arc_nbhd(2, false).unwrap();
        assert_eq!(nb.n0, nb.n1);
        let below = nb.below(&dg).unwrap();
        assert_eq!(below.e2, nb.s1);
        assert_eq!(nb.w0, below.w2);
        assert_eq!(nb.e1, below.s2);
        let rw = dg.apply_move(ReidemeisterII, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_ii, 1);
        assert_eq!(rw.counts.reidemeister_i,  1);
        assert_eq!(rw.counts.unlinks,         1);
        assert_eq!(rw.counts.crossings_removed(), 3);
        assert_eq!(dg.count_crossings(), 0);
        assert_eq!(dg.count_arcs(),      0);
        assert_eq!(dg.count_unlinks(),   1);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn pull_apart_with_kink_above() {
        let mut dg = build_kinked_bigon();
        let nb = dg.arc_nbhd(1, false).unwrap();
        assert_eq!(nb.s0, nb.s1);
        assert_eq!(nb.above(&dg).unwrap().e3, nb.n1);
        let rw = dg.apply_move(ReidemeisterII, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_ii, 1);
        assert_eq!(rw.counts.reidemeister_i,  1);
        assert_eq!(rw.counts.unlinks,         1);
        assert_eq!(dg.count_crossings(), 0);
        assert_eq!(dg.count_unlinks(),   1);
    }

    #[test]
    fn pull_apart_through_kink() {
        // the bigon at arc 0 closes below through a kink at crossing 3;
        // crossing 2 is left as a kink of its own
        let mut dg = pd(vec![
            [0, 3, 1, 4, -1],
            [7, 5, 0, 4,  1],
            [6, 2, 7, 1,  1],
            [5, 2, 6, 3, -1],
        ]);
        let nb = dg.arc_nbhd(0, false).unwrap();
        assert_eq!((nb.c0, nb.c1), (1, 0));
        let rw = dg.apply_move(ReidemeisterII, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_ii, 1);
        assert_eq!(rw.counts.reidemeister_i,  1);
        assert_eq!(rw.counts.unlinks,         0);
        assert_eq!(dg.count_crossings(), 1);
        assert_eq!(dg.count_arcs(),      2);
        assert_eq!(dg.crossing_arcs(2), [2, 2, 7, 7]);
        assert_eq!(dg.arc_crossing(7, End::Tail), 2);
        assert_eq!(dg.arc_crossing(7, End::Head), 2);
        assert!(dg.check().is_ok());
    }
}
