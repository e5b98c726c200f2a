//! Local rewrite moves for diagram simplification.
//!
//! Application of particular moves is facilitated through the [`MoveFinder`]
//! and [`Move`] traits. A move is represented by a type implementing
//! `MoveFinder` for some kind of *site* (an [`ArcNbhd`], a crossing, or a
//! [`Faces`] computation), which is passed to [`Diagram::find_move`] or
//! [`Diagram::apply_move`] along with the site.
//!
//! Every move either completes or leaves the diagram exactly as it was: moves
//! are applied inside [`Diagram::transaction`], so a structural error midway
//! through rolls back all prior changes.
//!
//! See [`SimplifyArc`] for the master list of arc-based moves, in the order
//! they are tried.

use itertools::Itertools;
use rustc_hash::FxHashSet;
use tracing::debug;
use crate::{
    diagram::{
        Diagram,
        DiagramResult,
        ArcId,
        CrossingId,
        End,
        Io,
        Port,
        Side,
        Handedness,
        Faces,
    },
    session::MoveCounts,
};

/// A trait for types that can inspect a site of a [`Diagram`] and find a
/// particular configuration to rewrite.
///
/// Types implementing this trait (usually unit structs) have the only purpose
/// of denoting the existence of a particular move. Finders never modify the
/// diagram; the [`Self::Output`] they produce holds a mutable reference to the
/// diagram it will rewrite.
pub trait MoveFinder<S> {
    /// The type representing the instantiated (but not executed) move.
    type Output<'a>: Move;

    /// Inspect `site` to find a particular configuration. Returns `None` if
    /// the move does not apply there.
    fn find(self, dg: &mut Diagram, site: S) -> Option<Self::Output<'_>>;
}

/// A trait representing an unexecuted move on a [`Diagram`].
///
/// No type implementing this trait implements [`Clone`] or [`Copy`].
pub trait Move {
    /// Execute the move, consuming self and releasing the inner hold on the
    /// diagram.
    ///
    /// On error the diagram is left in its state from before the call.
    fn apply(self) -> DiagramResult<Rewrite>;
}

/// Counter increments and touched crossings of one applied move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub counts: MoveCounts,
    /// Crossings whose neighbourhood changed; some may have been removed by
    /// the same move.
    pub touched: Vec<CrossingId>,
}

impl Rewrite {
    /// Reconnect through [`Diagram::reconnect`], recording the repointed
    /// crossing and both ends of `a` as touched.
    pub(crate) fn reconnect(
        &mut self,
        dg: &mut Diagram,
        a: ArcId,
        end: End,
        b: ArcId,
    ) -> DiagramResult<()>
    {
        let c = dg.reconnect(a, end, b)?;
        self.touched.push(c);
        self.touched.push(dg.arc_crossing(a, End::Tail));
        self.touched.push(dg.arc_crossing(a, End::Head));
        Ok(())
    }

    /// Record a closed component without crossings.
    pub(crate) fn unlink(&mut self, dg: &mut Diagram) {
        dg.add_unlinks(1);
        self.counts.unlinks += 1;
    }

    pub(crate) fn remove(
        &mut self,
        dg: &mut Diagram,
        arcs: &[ArcId],
        crossings: &[CrossingId],
    ) {
        arcs.iter().for_each(|&a| { dg.deactivate_arc(a); });
        crossings.iter().for_each(|&c| { dg.deactivate_crossing(c); });
    }

    /// Remove `crossings` and let every strand through them run straight
    /// across.
    ///
    /// Each arc entering the group takes over the head of the arc on which
    /// its strand leaves it; strands that never leave the group are closed
    /// and counted as unlinks. Whether this is an isotopy is up to the
    /// caller.
    pub(crate) fn erase(&mut self, dg: &mut Diagram, crossings: &[CrossingId])
        -> DiagramResult<()>
    {
        for &c in crossings.iter() { dg.check_crossing(c)?; }
        let inside = |dg: &Diagram, a: ArcId, end: End| {
            crossings.contains(&dg.arc_crossing(a, end))
        };
        let arcs: Vec<ArcId> =
            crossings.iter()
            .flat_map(|&c| dg.crossing_arcs(c))
            .unique()
            .collect();
        let mut joins: Vec<(ArcId, ArcId)> = Vec::new();
        let mut through: FxHashSet<ArcId> = FxHashSet::default();
        for &x in arcs.iter().filter(|&&x| !inside(dg, x, End::Tail)) {
            let mut y = dg.next_arc(x, End::Head);
            while inside(dg, y, End::Head) && through.len() < arcs.len() {
                through.insert(y);
                y = dg.next_arc(y, End::Head);
            }
            joins.push((x, y));
        }
        let mut closed: FxHashSet<ArcId> = FxHashSet::default();
        let mut loops: usize = 0;
        for &a0 in arcs.iter() {
            if through.contains(&a0) || closed.contains(&a0)
                || !inside(dg, a0, End::Tail) || !inside(dg, a0, End::Head)
            {
                continue;
            }
            loops += 1;
            let mut a = a0;
            while closed.insert(a) { a = dg.next_arc(a, End::Head); }
        }
        for (x, y) in joins {
            self.reconnect(dg, x, End::Head, y)?;
        }
        (0..loops).for_each(|_| { self.unlink(dg); });
        let dead: Vec<ArcId> = through.into_iter().chain(closed).collect();
        self.remove(dg, &dead, crossings);
        Ok(())
    }

    /// Rewrite all four ports of crossing `c` according to `layout`,
    /// repointing the arcs' ends to match.
    pub(crate) fn place(&mut self, dg: &mut Diagram, c: CrossingId, layout: Layout)
        -> DiagramResult<()>
    {
        let Layout { west, east, north, south, up, over } = layout;
        dg.check_crossing(c)?;
        let arcs =
            if up {
                [south, east, north, west]
            } else {
                [west, south, east, north]
            };
        for (port, a) in Port::CCW.into_iter().zip(arcs) {
            dg.check_arc(a)?;
            let end = if port.io == Io::Out { End::Tail } else { End::Head };
            dg.set_port(c, port, a);
            dg.set_end(a, end, c);
        }
        // the vertical strand sits on the slash exactly when it runs down
        let h =
            if up == over {
                Handedness::LeftHanded
            } else {
                Handedness::RightHanded
            };
        dg.set_handedness(c, h);
        self.touched.push(c);
        for a in arcs {
            self.touched.push(dg.arc_crossing(a, End::Tail));
            self.touched.push(dg.arc_crossing(a, End::Head));
        }
        Ok(())
    }
}

/// Target arrangement of a crossing for [`Rewrite::place`], drawn with a
/// horizontal strand running east.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) west: ArcId,
    pub(crate) east: ArcId,
    pub(crate) north: ArcId,
    pub(crate) south: ArcId,
    /// The vertical strand runs north.
    pub(crate) up: bool,
    /// The vertical strand passes over.
    pub(crate) over: bool,
}

/// Result of trying a move at a site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied(Rewrite),
    NoMatch,
}

impl Outcome {
    pub fn is_applied(&self) -> bool { matches!(self, Self::Applied(_)) }

    pub fn rewrite(self) -> Option<Rewrite> {
        match self {
            Self::Applied(rw) => Some(rw),
            Self::NoMatch => None,
        }
    }
}

/// Neighbourhood of an arc `a` running from crossing `c0` to crossing `c1`.
///
/// Draw `a` horizontally, pointing east. At `c0` the other arcs are named by
/// compass position: `n0`, `w0`, `s0` (counterclockwise from `a`); at `c1`
/// they are `s1`, `e1`, `n1`. `u0` is `true` if `a` leaves `c0` through its
/// `Out/Right` port, in which case the vertical strand at `c0` runs north;
/// `u1` is `true` if `a` enters `c1` through its `In/Left` port, in which case
/// the vertical strand at `c1` runs north. `o0` and `o1` are `true` if the
/// vertical strand passes over at `c0` and `c1` respectively.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArcNbhd {
    pub a: ArcId,
    pub c0: CrossingId,
    pub c1: CrossingId,
    pub u0: bool,
    pub n0: ArcId,
    pub w0: ArcId,
    pub s0: ArcId,
    pub u1: bool,
    pub s1: ArcId,
    pub e1: ArcId,
    pub n1: ArcId,
    pub o0: bool,
    pub o1: bool,
    /// Whether moves here may split off closed components.
    pub multi_component: bool,
}

/// The crossing `c2` at the far end of `s0`, with its arcs named as seen
/// from `c0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Below {
    pub c2: CrossingId,
    pub w2: ArcId,
    pub s2: ArcId,
    pub e2: ArcId,
    pub o2: bool,
}

/// The crossing `c3` at the far end of `n0`, with its arcs named as seen
/// from `c0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Above {
    pub c3: CrossingId,
    pub e3: ArcId,
    pub n3: ArcId,
    pub w3: ArcId,
    pub o3: bool,
}

impl ArcNbhd {
    /// Load the neighbourhood of an active arc.
    pub fn load(dg: &Diagram, a: ArcId, multi_component: bool) -> Option<Self> {
        if !dg.arc_active(a) { return None; }
        let c0 = dg.arc_crossing(a, End::Tail);
        let c1 = dg.arc_crossing(a, End::Head);
        if !dg.crossing_active(c0) || !dg.crossing_active(c1) { return None; }
        let p0 = dg.end_port(a, End::Tail);
        let p1 = dg.end_port(a, End::Head);
        Some(Self {
            a,
            c0,
            c1,
            u0: p0 == Port::OUT_RIGHT,
            n0: dg.crossing_arc(c0, p0.rotate(1)),
            w0: dg.crossing_arc(c0, p0.rotate(2)),
            s0: dg.crossing_arc(c0, p0.rotate(3)),
            u1: p1 == Port::IN_LEFT,
            s1: dg.crossing_arc(c1, p1.rotate(1)),
            e1: dg.crossing_arc(c1, p1.rotate(2)),
            n1: dg.crossing_arc(c1, p1.rotate(3)),
            o0: dg.strand_over(c0, p0.rotate(1)),
            o1: dg.strand_over(c1, p1.rotate(3)),
            multi_component,
        })
    }

    /// Load the crossing below `c0`, if it is distinct from `c0` and `c1`.
    pub fn below(&self, dg: &Diagram) -> Option<Below> {
        let end = if self.u0 { End::Tail } else { End::Head };
        let c2 = dg.arc_crossing(self.s0, end);
        if c2 == self.c0 || c2 == self.c1 || !dg.crossing_active(c2) {
            return None;
        }
        let p = dg.end_port(self.s0, end);
        Some(Below {
            c2,
            w2: dg.crossing_arc(c2, p.rotate(1)),
            s2: dg.crossing_arc(c2, p.rotate(2)),
            e2: dg.crossing_arc(c2, p.rotate(3)),
            o2: dg.strand_over(c2, p),
        })
    }

    /// Load the crossing above `c0`, if it is distinct from `c0` and `c1`.
    pub fn above(&self, dg: &Diagram) -> Option<Above> {
        let end = if self.u0 { End::Head } else { End::Tail };
        let c3 = dg.arc_crossing(self.n0, end);
        if c3 == self.c0 || c3 == self.c1 || !dg.crossing_active(c3) {
            return None;
        }
        let p = dg.end_port(self.n0, end);
        Some(Above {
            c3,
            e3: dg.crossing_arc(c3, p.rotate(1)),
            n3: dg.crossing_arc(c3, p.rotate(2)),
            w3: dg.crossing_arc(c3, p.rotate(3)),
            o3: dg.strand_over(c3, p),
        })
    }
}

// true if no two of `xs` are equal
pub(crate) fn distinct(xs: &[usize]) -> bool {
    xs.iter().enumerate().all(|(k, x)| !xs[k + 1..].contains(x))
}

mod self_loop;
pub use self_loop::*;
mod twist;
pub use twist::*;
mod curl;
pub use curl::*;
mod two_loop;
pub use two_loop::*;
mod reidemeister_i;
pub use reidemeister_i::*;
mod reidemeister_ii;
pub use reidemeister_ii::*;
mod reidemeister_ia;
pub use reidemeister_ia::*;
mod threaded_curl;
pub use threaded_curl::*;
mod reidemeister_iia;
pub use reidemeister_iia::*;
mod connected_sum;
pub use connected_sum::*;

/// Master list of arc-based moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimplifyArc {
    SelfLoop,
    Twist,
    CurlAtTail,
    CurlAtHead,
    TwoLoop,
    ReidemeisterII,
    ReidemeisterIa,
    ThreadedCurl,
    ReidemeisterIIa,
}

impl SimplifyArc {
    /// All arc-based moves in the order they are tried.
    pub const ORDER: [Self; 9] = [
        Self::SelfLoop,
        Self::Twist,
        Self::CurlAtTail,
        Self::CurlAtHead,
        Self::TwoLoop,
        Self::ReidemeisterII,
        Self::ReidemeisterIa,
        Self::ThreadedCurl,
        Self::ReidemeisterIIa,
    ];
}

/// Output of [`SimplifyArc::find`].
#[derive(Debug)]
pub enum SimplifyArcData<'a> {
    SelfLoopData(SelfLoopData<'a>),
    TwistData(TwistData<'a>),
    CurlAtTailData(CurlAtTailData<'a>),
    CurlAtHeadData(CurlAtHeadData<'a>),
    TwoLoopData(TwoLoopData<'a>),
    ReidemeisterIIData(ReidemeisterIIData<'a>),
    ReidemeisterIaData(ReidemeisterIaData<'a>),
    ThreadedCurlData(ThreadedCurlData<'a>),
    ReidemeisterIIaData(ReidemeisterIIaData<'a>),
}

impl MoveFinder<ArcNbhd> for SimplifyArc {
    type Output<'a> = SimplifyArcData<'a>;

    fn find(self, dg: &mut Diagram, nb: ArcNbhd) -> Option<Self::Output<'_>> {
        use SimplifyArcData::*;
        match self {
            Self::SelfLoop => SelfLoop.find(dg, nb).map(SelfLoopData),
            Self::Twist => Twist.find(dg, nb).map(TwistData),
            Self::CurlAtTail => CurlAtTail.find(dg, nb).map(CurlAtTailData),
            Self::CurlAtHead => CurlAtHead.find(dg, nb).map(CurlAtHeadData),
            Self::TwoLoop => TwoLoop.find(dg, nb).map(TwoLoopData),
            Self::ReidemeisterII => ReidemeisterII.find(dg, nb).map(ReidemeisterIIData),
            Self::ReidemeisterIa => ReidemeisterIa.find(dg, nb).map(ReidemeisterIaData),
            Self::ThreadedCurl => ThreadedCurl.find(dg, nb).map(ThreadedCurlData),
            Self::ReidemeisterIIa => ReidemeisterIIa.find(dg, nb).map(ReidemeisterIIaData),
        }
    }
}

impl<'a> Move for SimplifyArcData<'a> {
    fn apply(self) -> DiagramResult<Rewrite> {
        match self {
            Self::SelfLoopData(data) => data.apply(),
            Self::TwistData(data) => data.apply(),
            Self::CurlAtTailData(data) => data.apply(),
            Self::CurlAtHeadData(data) => data.apply(),
            Self::TwoLoopData(data) => data.apply(),
            Self::ReidemeisterIIData(data) => data.apply(),
            Self::ReidemeisterIaData(data) => data.apply(),
            Self::ThreadedCurlData(data) => data.apply(),
            Self::ReidemeisterIIaData(data) => data.apply(),
        }
    }
}

impl Diagram {
    /// Inspect a site for a particular move, returning the instantiated move
    /// if it applies.
    pub fn find_move<S, M>(&mut self, mv: M, site: S) -> Option<M::Output<'_>>
    where M: MoveFinder<S>
    {
        mv.find(self, site)
    }

    /// Find and immediately apply a move at a site.
    pub fn apply_move<S, M>(&mut self, mv: M, site: S) -> DiagramResult<Outcome>
    where M: MoveFinder<S> + Copy + std::fmt::Debug
    {
        match mv.find(self, site) {
            Some(data) => {
                let rw = data.apply()?;
                debug!(?mv, touched = ?rw.touched, "applied move");
                Ok(Outcome::Applied(rw))
            },
            None => Ok(Outcome::NoMatch),
        }
    }

    /// Load the neighbourhood of an arc; see [`ArcNbhd`].
    pub fn arc_nbhd(&self, a: ArcId, multi_component: bool) -> Option<ArcNbhd> {
        ArcNbhd::load(self, a, multi_component)
    }

    /// Try every arc-based move in [`SimplifyArc::ORDER`] on arc `a`, applying
    /// the first that matches.
    pub fn simplify_arc(&mut self, a: ArcId, multi_component: bool)
        -> DiagramResult<Outcome>
    {
        let Some(nb) = self.arc_nbhd(a, multi_component) else {
            return Ok(Outcome::NoMatch);
        };
        for mv in SimplifyArc::ORDER {
            if let Outcome::Applied(rw) = self.apply_move(mv, nb)? {
                return Ok(Outcome::Applied(rw));
            }
        }
        Ok(Outcome::NoMatch)
    }

    /// Remove a kink at crossing `c`, if it has one; see [`ReidemeisterI`].
    pub fn reidemeister_i(&mut self, c: CrossingId) -> DiagramResult<Outcome> {
        self.apply_move(ReidemeisterI, c)
    }

    /// Repeatedly try all arc-based moves on every arc until none applies or
    /// `max` moves have been made, returning the accumulated counts.
    pub fn simplify_arcs_n(
        &mut self,
        multi_component: bool,
        max: Option<usize>,
    ) -> DiagramResult<MoveCounts>
    {
        let mut counts = MoveCounts::default();
        let mut applied: usize = 0;
        'outer: while max.map_or(true, |m| applied < m) {
            let arcs: Vec<ArcId> = self.arcs().collect();
            for a in arcs {
                if let Outcome::Applied(rw) = self.simplify_arc(a, multi_component)? {
                    counts += rw.counts;
                    applied += 1;
                    continue 'outer;
                }
            }
            break;
        }
        Ok(counts)
    }
}
