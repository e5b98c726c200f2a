use super::*;

/// Undo a half twist between two strands: `a` and a second arc both run
/// between `c0` and `c1`, with the second arc wrapping around `c1` (either
/// `n0 == s1` or `s0 == n1`).
///
/// Both crossings are removed regardless of their handedness. If one of the
/// remaining ends closes up in a kink, the move degenerates into two
/// Reidemeister I moves, possibly leaving an unlink.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Twist;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TwistKind {
    // n0 == s1
    North,
    // s0 == n1
    South,
}

/// Output of [`Twist::find`].
#[derive(Debug)]
pub struct TwistData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
    pub(crate) kind: TwistKind,
}

impl MoveFinder<ArcNbhd> for Twist {
    type Output<'a> = TwistData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        if nb.c0 == nb.c1 { return None; }
        let kind =
            if nb.n0 == nb.s1 {
                TwistKind::North
            } else if nb.s0 == nb.n1 {
                TwistKind::South
            } else {
                return None;
            };
        Some(TwistData { dg, nb, kind })
    }
}

impl<'a> Move for TwistData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, nb, kind } = self;
        let ArcNbhd { a, c0, c1, u0, n0, w0, s0, s1, e1, n1, .. } = nb;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            // `wrap` is the second arc between c0 and c1; `side` is the arc at
            // c0 opposite to it and `far` its counterpart at c1
            let (wrap, side, far) =
                match kind {
                    TwistKind::North => (n0, s0, n1),
                    TwistKind::South => (s0, n0, s1),
                };
            if w0 == side {
                if e1 != far {
                    rw.reconnect(dg, e1, End::Tail, far)?;
                    rw.remove(dg, &[w0, a, wrap], &[c0, c1]);
                } else {
                    rw.unlink(dg);
                    rw.remove(dg, &[w0, e1, a, wrap], &[c0, c1]);
                }
                rw.counts.reidemeister_i += 2;
            } else if e1 == far {
                rw.reconnect(dg, w0, End::Head, side)?;
                rw.remove(dg, &[wrap, a, e1], &[c0, c1]);
                rw.counts.reidemeister_i += 2;
            } else if e1 == side {
                // the two strands are joined directly past the twist
                if w0 == far {
                    rw.unlink(dg);
                    rw.remove(dg, &[w0, e1], &[]);
                } else {
                    rw.reconnect(dg, w0, End::Head, far)?;
                    rw.remove(dg, &[e1], &[]);
                }
                rw.remove(dg, &[a, wrap], &[c0, c1]);
                rw.counts.twist += 1;
            } else {
                rw.reconnect(dg, w0, End::Head, e1)?;
                let end =
                    match kind {
                        TwistKind::North => End::from_bool(u0),
                        TwistKind::South => End::from_bool(!u0),
                    };
                rw.reconnect(dg, side, end, far)?;
                rw.remove(dg, &[a, wrap], &[c0, c1]);
                rw.counts.twist += 1;
            }
            Ok(rw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::*;

    // unknot with a half twist between arc 0 and arc 1, which wraps around
    // crossing 1; kinks at crossings 2 and 3 sit on either side of it
    fn build_twist() -> Diagram {
        pd(vec![
            [5, 4, 0, 1, 1],
            [0, 1, 2, 3, 1],
            [6, 6, 3, 2, 1],
            [7, 7, 5, 4, 1],
        ])
    }

    #[test]
    fn untwist() {
        let mut dg = build_twist();
        assert!(dg.check().is_ok());
        let nb = dg.arc_nbhd(0, true).unwrap();
        assert_eq!(nb.n0, nb.s1);
        let rw = dg.apply_move(Twist, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.twist,   1);
        assert_eq!(rw.counts.unlinks, 0);
        assert_eq!(dg.count_crossings(), 2);
        assert_eq!(dg.count_arcs(),      4);
        assert_eq!(dg.arc_crossing(5, End::Head), 2);
        assert_eq!(dg.arc_crossing(4, End::Tail), 2);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn no_match_on_trefoil() {
        let mut dg = build_trefoil();
        for a in 0..6 {
            let nb = dg.arc_nbhd(a, true).unwrap();
            assert!(dg.find_move(Twist, nb).is_none());
        }
    }
}
