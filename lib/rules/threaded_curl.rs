use super::*;

/// Remove the self-crossing of a curl that is threaded by arc `a`.
///
/// The vertical strand at `c0` runs through `c1`, crosses itself at a third
/// crossing (`c2` below or `c3` above), and `a` passes over the loop at one
/// of `c0`, `c1` and under it at the other. Turning the loop over around `a`
/// removes the self-crossing. This configuration needs a second link
/// component, so the move is only tried when
/// [`ArcNbhd::multi_component`] is set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThreadedCurl;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Threaded {
    Below(Below),
    Above(Above),
}

/// Output of [`ThreadedCurl::find`].
#[derive(Debug)]
pub struct ThreadedCurlData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
    pub(crate) at: Threaded,
}

impl MoveFinder<ArcNbhd> for ThreadedCurl {
    type Output<'a> = ThreadedCurlData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        let ArcNbhd { c0, c1, n0, s0, s1, n1, o0, o1, multi_component, .. } = nb;
        if !multi_component || c0 == c1 || o0 == o1 { return None; }
        let at =
            if n0 == n1 {
                let below = nb.below(dg)?;
                (below.w2 == s1).then_some(Threaded::Below(below))?
            } else if s0 == s1 {
                let above = nb.above(dg)?;
                (above.w3 == n1).then_some(Threaded::Above(above))?
            } else {
                return None;
            };
        Some(ThreadedCurlData { dg, nb, at })
    }
}

impl<'a> Move for ThreadedCurlData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, at, .. } = self;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            match at {
                Threaded::Below(Below { c2, .. }) => rw.erase(dg, &[c2])?,
                Threaded::Above(Above { c3, .. }) => rw.erase(dg, &[c3])?,
            }
            rw.counts.reidemeister_i += 1;
            Ok(rw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::*;

    // arcs 0 and 4 form a circle threading the curl of the second component,
    // which crosses itself at crossing 2; its outer lobe carries a kink
    fn build_threaded() -> Diagram {
        pd(vec![
            [2, 0, 1, 4, 1],
            [0, 3, 4, 1, 1],
            [6, 5, 2, 3, 1],
            [7, 7, 6, 5, 1],
        ])
    }

    #[test]
    fn unthread() {
        let mut dg = build_threaded();
        assert!(dg.check().is_ok());
        assert_eq!(dg.count_link_components(), 2);
        let nb = dg.arc_nbhd(0, false).unwrap();
        assert!(dg.find_move(ThreadedCurl, nb).is_none());
        let nb = dg.arc_nbhd(0, true).unwrap();
        assert_eq!(nb.n0, nb.n1);
        let rw = dg.apply_move(ThreadedCurl, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_i, 1);
        assert_eq!(rw.counts.unlinks,        0);
        assert!(!dg.crossing_active(2));
        assert!(!dg.arc_active(2) && !dg.arc_active(5));
        assert_eq!(dg.arc_crossing(3, End::Head), 3);
        assert_eq!(dg.arc_crossing(6, End::Head), 0);
        assert_eq!(dg.crossing_arcs(0), [6, 0, 1, 4]);
        assert_eq!(dg.count_crossings(), 3);
        assert_eq!(dg.count_arcs(),      6);
        assert_eq!(dg.count_link_components(), 2);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn unthread_kinked_loop() {
        // the loop's self-crossing is itself a kink; only the Hopf link of
        // arcs 0, 5 and 1, 2 remains
        let mut dg = pd(vec![
            [0, 2, 1, 5, 1],
            [4, 0, 5, 1, 1],
            [2, 4, 3, 3, 1],
        ]);
        let nb = dg.arc_nbhd(1, true).unwrap();
        let below = nb.below(&dg).unwrap();
        assert_eq!(below.s2, below.e2);
        let rw = dg.apply_move(ThreadedCurl, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_i, 1);
        assert_eq!(rw.counts.unlinks,        0);
        assert_eq!(dg.count_crossings(), 2);
        assert_eq!(dg.count_arcs(),      4);
        assert_eq!(dg.crossing_arcs(1), [2, 0, 5, 1]);
        assert_eq!(dg.arc_crossing(2, End::Tail), 0);
        assert_eq!(dg.arc_crossing(2, End::Head), 1);
        assert_eq!(dg.writhe(), 2);
        assert_eq!(dg.count_link_components(), 2);
        assert!(dg.check().is_ok());
    }
}
