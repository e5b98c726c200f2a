use super::*;

/// Slide a bigon off arc `a`.
///
/// The vertical strands at `c0` and `c1` cross each other twice, at `c2`
/// below `a` and at `c3` above it (`e2 == s1` and `e3 == n1`), with the same
/// strand on top both times. The bigon is slid past `a` and then removed as
/// in Reidemeister II, so that afterward `a` crosses the other strand at each
/// of `c0` and `c1`.
///
/// This is allowed when `a` lies on the same level at `c0` and `c1`, or when
/// `a` lies between the two bigon strands (the non-cyclic Reidemeister III
/// configuration).
///
/// - If the vertical strands run the same way, the outer arcs at `c2` and
///   `c3` are joined to `c0` and `c1`. When the levels at `c0` and `c1`
///   differ, the handedness of the two crossings is exchanged so that each
///   strand keeps its level relative to `a`.
/// - If they run opposite ways, both strands reverse direction across `a`,
///   and `c0` and `c1` are laid out anew.
/// - If they run the same way, `a` lies on one level, and the lower bigon
///   strand closes into the upper one (`s2 == w3`), the four crossings form
///   a twist around `a` and are all removed. If either of `w0 == w2` or
///   `e1 == n3` holds, the twist is a pair of kinks instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReidemeisterIIa;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slide {
    Collapse,
    Parallel,
    Antiparallel,
}

/// Output of [`ReidemeisterIIa::find`].
#[derive(Debug)]
pub struct ReidemeisterIIaData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
    pub(crate) below: Below,
    pub(crate) above: Above,
    pub(crate) slide: Slide,
}

impl MoveFinder<ArcNbhd> for ReidemeisterIIa {
    type Output<'a> = ReidemeisterIIaData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        let ArcNbhd { c0, c1, u0, s1, u1, n1, o0, o1, .. } = nb;
        if c0 == c1 { return None; }
        let below = nb.below(dg)?;
        let above = nb.above(dg)?;
        if below.e2 != s1 || above.e3 != n1 || below.c2 == above.c3 {
            return None;
        }
        if below.o2 != above.o3 || (o0 != o1 && below.o2 != o0) { return None; }
        let slide =
            if u0 != u1 {
                Slide::Antiparallel
            } else if o0 == o1 && below.s2 == above.w3 {
                Slide::Collapse
            } else {
                Slide::Parallel
            };
        Some(ReidemeisterIIaData { dg, nb, below, above, slide })
    }
}

impl<'a> Move for ReidemeisterIIaData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, nb, below, above, slide } = self;
        let ArcNbhd { a, c0, c1, u0, n0, w0, s0, u1, s1, e1, n1, o0, o1, .. } = nb;
        let Below { c2, w2, s2, .. } = below;
        let Above { c3, n3, w3, .. } = above;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            match slide {
                Slide::Collapse => {
                    rw.erase(dg, &[c0, c1, c2, c3])?;
                    if w0 == w2 || e1 == n3 {
                        rw.counts.reidemeister_i += 2;
                    } else {
                        rw.counts.twist += 1;
                    }
                },
                Slide::Parallel => {
                    rw.reconnect(dg, w3, End::from_bool(!u0), n0)?;
                    rw.reconnect(dg, w2, End::from_bool(u0), s0)?;
                    rw.reconnect(dg, n3, End::from_bool(!u1), n1)?;
                    rw.reconnect(dg, s2, End::from_bool(u1), s1)?;
                    rw.remove(dg, &[], &[c2, c3]);
                    if o0 != o1 {
                        if let (Some(h0), Some(h1)) = (dg.handedness(c0), dg.handedness(c1)) {
                            dg.set_handedness(c0, h1);
                            dg.set_handedness(c1, h0);
                        }
                    }
                    rw.touched.extend([c0, c1]);
                },
                Slide::Antiparallel => {
                    rw.place(dg, c0, Layout {
                        west: w0, east: a, north: w3, south: w2, up: u1, over: o1 })?;
                    rw.place(dg, c1, Layout {
                        west: a, east: e1, north: n3, south: s2, up: u0, over: o0 })?;
                    rw.remove(dg, &[n0, s0, n1, s1], &[c2, c3]);
                },
            }
            rw.counts.reidemeister_iia += 1;
            Ok(rw)
        })
    }
}
