use super::*;

/// Remove a kink at a single crossing: an arc leaving and re-entering the
/// crossing on the same side (Reidemeister I).
///
/// This is the crossing-based form of [`SelfLoop`], used to seed the
/// simplification worklist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReidemeisterI;

/// Output of [`ReidemeisterI::find`].
#[derive(Debug)]
pub struct ReidemeisterIData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) c: CrossingId,
    pub(crate) kink: ArcId,
    pub(crate) inc: ArcId, // other strand, incoming
    pub(crate) out: ArcId, // other strand, outgoing
}

impl MoveFinder<CrossingId> for ReidemeisterI {
    type Output<'a> = ReidemeisterIData<'a>;

    fn find(self, dg: &mut Diagram, c: CrossingId) -> Option<Self::Output<'_>> {
        if !dg.crossing_active(c) { return None; }
        let side =
            [Side::Right, Side::Left].into_iter()
            .find(|&side| {
                dg.crossing_arc(c, Port::new(Io::Out, side))
                    == dg.crossing_arc(c, Port::new(Io::In, side))
            })?;
        let kink = dg.crossing_arc(c, Port::new(Io::Out, side));
        let inc = dg.crossing_arc(c, Port::new(Io::In, side.flip()));
        let out = dg.crossing_arc(c, Port::new(Io::Out, side.flip()));
        Some(ReidemeisterIData { dg, c, kink, inc, out })
    }
}

impl<'a> Move for ReidemeisterIData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, c, kink, inc, out } = self;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            if inc != out {
                rw.reconnect(dg, inc, End::Head, out)?;
            } else {
                rw.unlink(dg);
                rw.remove(dg, &[inc], &[]);
            }
            rw.remove(dg, &[kink], &[c]);
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
    fn single_kink() {
        let mut dg = pd(vec![[0, 0, 1, 1, -1]]);
        let rw = dg.reidemeister_i(0).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_i, 1);
        assert_eq!(rw.counts.unlinks,        1);
        assert_eq!(dg.count_crossings(), 0);
        assert_eq!(dg.count_unlinks(),   1);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn kink_on_strand() {
        // kinks at crossings 0 and 1; arcs 1 and 2 join them
        let mut dg = pd(vec![[0, 0, 1, 2, 1], [3, 3, 2, 1, 1]]);
        let rw = dg.reidemeister_i(1).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.reidemeister_i, 1);
        assert_eq!(rw.counts.unlinks,        0);
        assert!(rw.touched.contains(&0));
        assert_eq!(dg.count_crossings(), 1);
        assert!(dg.check().is_ok());
        let rw = dg.reidemeister_i(0).unwrap().rewrite().unwrap();
        assert_eq!(rw.counts.unlinks, 1);
        assert_eq!(dg.count_crossings(), 0);
        assert_eq!(dg.count_unlinks(),   1);
    }

    #[test]
    fn no_kink() {
        let mut dg = build_trefoil();
        for c in 0..3 {
            assert_eq!(dg.reidemeister_i(c), Ok(Outcome::NoMatch));
        }
        assert_eq!(dg.reidemeister_i(7), Ok(Outcome::NoMatch));
    }
}
