use super::*;

/// Remove a kink at the tail crossing `c0` of an arc (Reidemeister I), i.e.
/// where `n0 == w0` or `s0 == w0`.
///
/// If `a` itself becomes a kink at `c1` afterward, it is removed in the same
/// step; if that closes the strand, the result is an unlink.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CurlAtTail;

/// Output of [`CurlAtTail::find`].
#[derive(Debug)]
pub struct CurlAtTailData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
    pub(crate) next: ArcId, // vertical arc at c0 not in the kink
    pub(crate) far: ArcId, // its counterpart at c1
    pub(crate) other: ArcId, // remaining vertical arc at c1
}

impl MoveFinder<ArcNbhd> for CurlAtTail {
    type Output<'a> = CurlAtTailData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        if nb.c0 == nb.c1 { return None; }
        let (next, far, other) =
            if nb.n0 == nb.w0 {
                (nb.s0, nb.s1, nb.n1)
            } else if nb.s0 == nb.w0 {
                (nb.n0, nb.n1, nb.s1)
            } else {
                return None;
            };
        Some(CurlAtTailData { dg, nb, next, far, other })
    }
}

impl<'a> Move for CurlAtTailData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, nb, next, far, other } = self;
        let ArcNbhd { a, c0, c1, w0, e1, .. } = nb;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            if next != far {
                rw.reconnect(dg, a, End::Tail, next)?;
                rw.remove(dg, &[w0], &[c0]);
                rw.counts.reidemeister_i += 1;
            } else if e1 != other {
                rw.reconnect(dg, e1, End::Tail, other)?;
                rw.remove(dg, &[w0, next, a], &[c0, c1]);
                rw.counts.reidemeister_i += 2;
            } else {
                rw.unlink(dg);
                rw.remove(dg, &[w0, e1, next, a], &[c0, c1]);
                rw.counts.reidemeister_i += 2;
            }
            Ok(rw)
        })
    }
}

/// Remove a kink at the head crossing `c1` of an arc (Reidemeister I), i.e.
/// where `s1 == e1` or `n1 == e1`.
///
/// If `a` itself becomes a kink at `c0` afterward, it is removed in the same
/// step; if that closes the strand, the result is an unlink.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CurlAtHead;

/// Output of [`CurlAtHead::find`].
#[derive(Debug)]
pub struct CurlAtHeadData<'a> {
    pub(crate) dg: &'a mut Diagram,
    pub(crate) nb: ArcNbhd,
    pub(crate) next: ArcId, // vertical arc at c1 not in the kink
    pub(crate) far: ArcId, // its counterpart at c0
    pub(crate) other: ArcId, // remaining vertical arc at c0
}

impl MoveFinder<ArcNbhd> for CurlAtHead {
    type Output<'a> = CurlAtHeadData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        if nb.c0 == nb.c1 { return None; }
        let (next, far, other) =
            if nb.s1 == nb.e1 {
                (nb.n1, nb.n0, nb.s0)
            } else if nb.n1 == nb.e1 {
                (nb.s1, nb.s0, nb.n0)
            } else {
                return None;
            };
        Some(CurlAtHeadData { dg, nb, next, far, other })
    }
}

impl<'a> Move for CurlAtHeadData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        let Self { dg, nb, next, far, other } = self;
        let ArcNbhd { a, c0, c1, w0, e1, .. } = nb;
        dg.transaction(|dg| {
            let mut rw = Rewrite::default();
            if next != far {
                rw.reconnect(dg, a, End::Head, next)?;
                rw.remove(dg, &[e1], &[c1]);
                rw.counts.reidemeister_i += 1;
            } else if w0 != other {
                rw.reconnect(dg, w0, End::Head, other)?;
                rw.remove(dg, &[next, e1, a], &[c0, c1]);
                rw.counts.reidemeister_i += 2;
            } else {
                rw.unlink(dg);
                rw.remove(dg, &[w0, e1, next, a], &[c0, c1]);
                rw.counts.reidemeister_i += 2;
            }
            Ok(rw)
        })
    }
}
