use super::*;

/// Remove a closed strand made of exactly two arcs, `a` and `w0 == e1`, when
/// it passes on the same level at both of its crossings (Reidemeister II
/// followed by an unlink).
///
/// A two-arc loop passing over at one crossing and under at the other is
/// left alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TwoLoop;

/// Output of [`TwoLoop::find`].
#[derive(Debug)]
pub struct TwoLoopData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
}

impl MoveFinder<ArcNbhd> for TwoLoop {
    type Output<'a> = TwoLoopData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        (nb.c0 != nb.c1 && nb.w0 == nb.e1 && nb.o0 == nb.o1)
            .then_some(TwoLoopData { dg, nb })
    }
}

impl<'a> Move for TwoLoopData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, nb } = self;
        let ArcNbhd { a, c0, c1, u0, n0, w0, s0, u1, s1, n1, .. } = nb;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            match (n0 == n1, s0 == s1) {
                (true, true) => {
                    // the vertical strand closes up too
                    rw.unlink(dg);
                    rw.remove(dg, &[n0, s0], &[]);
                },
                (true, false) => {
                    rw.reconnect(dg, s0, End::from_bool(u0), s1)?;
                    rw.remove(dg, &[n0], &[]);
                },
                (false, true) => {
                    rw.reconnect(dg, n0, End::from_bool(!u0), n1)?;
                    rw.remove(dg, &[s0], &[]);
                },
                (false, false) => {
                    rw.reconnect(dg, s0, End::from_bool(u0), n0)?;
                    rw.reconnect(dg, s1, End::from_bool(u1), n1)?;
                },
            }
            rw.unlink(dg);
            rw.remove(dg, &[w0, a], &[c0, c1]);
            rw.counts.reidemeister_ii += 1;
            Ok(rw)
        })
    }
}
