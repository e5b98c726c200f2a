use super::*;

/// Remove a kink formed by an arc that leaves and re-enters the same
/// crossing (Reidemeister I).
///
/// If the other strand through the crossing is a loop as well, the whole
/// figure-eight closes up into an unlink.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SelfLoop;

/// Output of [`SelfLoop::find`].
#[derive(Debug)]
pub struct SelfLoopData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) c: CrossingId, // kinked crossing
    pub(crate) a: ArcId, // loop
    pub(crate) inc: ArcId, // other strand, incoming
    pub(crate) out: ArcId, // other strand, outgoing
}

impl MoveFinder<ArcNbhd> for SelfLoop {
    type Output<'a> = SelfLoopData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        let ArcNbhd { a, c0, c1, n0, w0, s0, .. } = nb;
        if c0 != c1 { return None; }
        let out =
            if s0 == a {
                n0
            } else if n0 == a {
                s0
            } else {
                return None;
            };
        Some(SelfLoopData { dg, c: c0, a, inc: w0, out })
    }
}

impl<'a> Move for SelfLoopData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, c, a, inc, out } = self;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            if inc == out {
                rw.unlink(dg);
                rw.remove(dg, &[inc], &[]);
            } else {
                rw.reconnect(dg, inc, End::Head, out)?;
            }
            rw.remove(dg, &[a], &[c]);
            rw.counts.reidemeister_i += 1;
            Ok(rw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::*;

    #[test]
    fn kink() {
        let mut dg = pd(vec![[0, 0, 1, 1, 1]]);
        let nb = dg.arc_nbhd(0, true).unwrap();
        assert_eq!(nb.c0, nb.c1);
        let rw = dg.apply_move(SelfLoop, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_i, 1);
        assert_eq!(rw.counts.unlinks,        1);
        assert_eq!(dg.count_crossings(), 0);
        assert_eq!(dg.count_arcs(),      0);
        assert_eq!(dg.count_unlinks(),   1);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn kink_on_longer_strand() {
        // a kink at crossing 0 on the unknot drawn with two kinks
        let mut dg = pd(vec![[0, 0, 1, 2, 1], [3, 3, 2, 1, 1]]);
        assert!(dg.check().is_ok());
        let nb = dg.arc_nbhd(0, true).unwrap();
        let rw = dg.apply_move(SelfLoop, nb).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_i, 1);
        assert_eq!(rw.counts.unlinks,        0);
        assert_eq!(dg.count_crossings(), 1);
        assert_eq!(dg.count_arcs(),      2);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn no_match_off_loop() {
        let mut dg = build_trefoil();
        let nb = dg.arc_nbhd(0, true).unwrap();
        assert!(dg.find_move(SelfLoop, nb).is_none());
    }
}
