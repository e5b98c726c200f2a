use itertools::Itertools;
use tracing::warn;
use crate::diagram::{
    DiagramError,
    DiagramResult,
    CrossingId,
    ArcId,
    Label,
    End,
    Io,
    Side,
    Port,
    Handedness,
    CrossingState,
    ArcState,
};
use DiagramError::*;

// single reversible change recorded while a transaction is open
#[derive(Copy, Clone, Debug)]
enum Undo {
    Port(CrossingId, usize, ArcId),
    End(ArcId, End, CrossingId),
    Crossing(CrossingId, CrossingState),
    Arc(ArcId, ArcState),
}

/// Flat, handle-indexed store of a planar diagram.
///
/// All crossing and arc slots are allocated up front. Slots are never reused
/// and never grow: rewrites only repoint existing ports and arc ends and
/// deactivate what they remove. Closed components without crossings are
/// tracked as a plain count of unlinks.
#[derive(Clone, Debug, Default)]
pub struct Diagram {
    pub(crate) ports: Vec<[ArcId; 4]>, // counterclockwise from In/Right
    pub(crate) cstate: Vec<CrossingState>,
    pub(crate) clabel: Vec<Label>,
    pub(crate) ends: Vec<[CrossingId; 2]>, // tail, head
    pub(crate) astate: Vec<ArcState>,
    pub(crate) alabel: Vec<Label>,
    pub(crate) crossing_count: usize,
    pub(crate) arc_count: usize,
    pub(crate) unlinks: usize,
    journal: Option<Vec<Undo>>,
}

impl PartialEq for Diagram {
    fn eq(&self, other: &Self) -> bool {
        self.ports == other.ports
            && self.cstate == other.cstate
            && self.clabel == other.clabel
            && self.ends == other.ends
            && self.astate == other.astate
            && self.alabel == other.alabel
            && self.crossing_count == other.crossing_count
            && self.arc_count == other.arc_count
            && self.unlinks == other.unlinks
    }
}

impl Eq for Diagram { }

impl Diagram {
    /// Create a new, empty diagram.
    pub fn new() -> Self { Self::default() }

    /// Create a diagram with only `n` unlinked circles.
    pub fn unlinks(n: usize) -> Self { Self { unlinks: n, ..Self::default() } }

    /// Build a diagram from the arcs around each crossing, listed
    /// counterclockwise from `In/Right`, and the crossings' handedness.
    ///
    /// Arcs are numbered `0..2n` for `n` crossings; each must leave exactly
    /// one `Out` port and enter exactly one `In` port. Labels are the initial
    /// handles.
    pub fn from_parts(
        ports: Vec<[ArcId; 4]>,
        handedness: Vec<Handedness>,
        unlinks: usize,
    ) -> DiagramResult<Self>
    {
        if ports.len() != handedness.len() {
            return Err(LengthMismatch {
                ports: ports.len(),
                handedness: handedness.len(),
            });
        }
        let n = ports.len();
        let mut ends: Vec<[Option<CrossingId>; 2]> = vec![[None; 2]; 2 * n];
        for (c, row) in ports.iter().enumerate() {
            for (k, &a) in row.iter().enumerate() {
                if a >= 2 * n {
                    return Err(LabelOutOfRange { label: a as i64, crossings: n });
                }
                let end =
                    if Port::from_ccw(k).io == Io::Out { End::Tail } else { End::Head };
                let slot = &mut ends[a][end as usize];
                if slot.is_some() { return Err(DuplicateEnd(a, end)); }
                *slot = Some(c);
            }
        }
        let ends: Vec<[CrossingId; 2]> =
            ends.into_iter().enumerate()
            .map(|(a, [t, h])| {
                let t = t.ok_or(UnusedLabel(a, End::Tail))?;
                let h = h.ok_or(UnusedLabel(a, End::Head))?;
                Ok([t, h])
            })
            .collect::<DiagramResult<_>>()?;
        Ok(Self {
            ports,
            cstate: handedness.into_iter().map(CrossingState::from).collect(),
            clabel: (0..n).collect(),
            ends,
            astate: vec![ArcState::Active; 2 * n],
            alabel: (0..2 * n).collect(),
            crossing_count: n,
            arc_count: 2 * n,
            unlinks,
            journal: None,
        })
    }

    /// Return the number of active crossings.
    pub fn count_crossings(&self) -> usize { self.crossing_count }

    /// Return the number of active arcs.
    pub fn count_arcs(&self) -> usize { self.arc_count }

    /// Return the number of closed components without crossings.
    pub fn count_unlinks(&self) -> usize { self.unlinks }

    /// Return the number of crossing slots, active or not.
    pub fn crossing_capacity(&self) -> usize { self.cstate.len() }

    /// Return the number of arc slots, active or not.
    pub fn arc_capacity(&self) -> usize { self.astate.len() }

    /// Return `true` if the diagram has no crossings.
    pub fn is_trivial(&self) -> bool { self.crossing_count == 0 }

    pub fn crossing_active(&self, c: CrossingId) -> bool {
        self.cstate.get(c).is_some_and(|s| s.is_active())
    }

    pub fn arc_active(&self, a: ArcId) -> bool {
        self.astate.get(a).is_some_and(|s| s.is_active())
    }

    pub fn crossing_state(&self, c: CrossingId) -> Option<CrossingState> {
        self.cstate.get(c).copied()
    }

    /// Return the handedness of an active crossing.
    pub fn handedness(&self, c: CrossingId) -> Option<Handedness> {
        self.cstate.get(c).and_then(|s| s.handedness())
    }

    pub fn crossing_label(&self, c: CrossingId) -> Option<Label> {
        self.clabel.get(c).copied()
    }

    pub fn arc_label(&self, a: ArcId) -> Option<Label> {
        self.alabel.get(a).copied()
    }

    /// Return the arc held at a port of a crossing.
    ///
    /// *Panics if `c` is out of bounds.*
    pub fn crossing_arc(&self, c: CrossingId, port: Port) -> ArcId {
        self.ports[c][port.ccw()]
    }

    /// Return the four arcs of a crossing in counterclockwise order from
    /// `In/Right`.
    ///
    /// *Panics if `c` is out of bounds.*
    pub fn crossing_arcs(&self, c: CrossingId) -> [ArcId; 4] { self.ports[c] }

    /// Return the crossing at one end of an arc.
    ///
    /// *Panics if `a` is out of bounds.*
    pub fn arc_crossing(&self, a: ArcId, end: End) -> CrossingId {
        self.ends[a][end as usize]
    }

    /// Return the port of kind `io` at which crossing `c` holds arc `a`, if
    /// any.
    pub fn port_of(&self, c: CrossingId, a: ArcId, io: Io) -> Option<Port> {
        let row = self.ports.get(c)?;
        [Side::Left, Side::Right].into_iter()
            .map(|side| Port::new(io, side))
            .find(|port| row[port.ccw()] == a)
    }

    /// Return the port through which arc `a` meets the crossing at its `end`.
    ///
    /// The store's invariants guarantee the port exists for an active arc;
    /// otherwise the result is unspecified.
    pub fn end_port(&self, a: ArcId, end: End) -> Port {
        let c = self.arc_crossing(a, end);
        let left = Port::new(end.io(), Side::Left);
        if self.ports[c][left.ccw()] == a {
            left
        } else {
            Port::new(end.io(), Side::Right)
        }
    }

    /// Return `true` if the strand through `port` of crossing `c` is the
    /// over-strand.
    pub fn strand_over(&self, c: CrossingId, port: Port) -> bool {
        match self.handedness(c) {
            Some(Handedness::RightHanded) => port.on_slash(),
            Some(Handedness::LeftHanded) => !port.on_slash(),
            None => false,
        }
    }

    /// Return `true` if arc `a` passes over the crossing at its `end`.
    pub fn arc_over(&self, a: ArcId, end: End) -> bool {
        self.strand_over(self.arc_crossing(a, end), self.end_port(a, end))
    }

    /// Return the arc continuing the strand of `a` through the crossing at
    /// its `end`.
    pub fn next_arc(&self, a: ArcId, end: End) -> ArcId {
        let c = self.arc_crossing(a, end);
        self.crossing_arc(c, self.end_port(a, end).through())
    }

    /// Iterate over all active crossings.
    pub fn crossings(&self) -> impl Iterator<Item = CrossingId> + '_ {
        self.cstate.iter().enumerate()
            .filter_map(|(c, s)| s.is_active().then_some(c))
    }

    /// Iterate over all active arcs.
    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.astate.iter().enumerate()
            .filter_map(|(a, s)| s.is_active().then_some(a))
    }

    /// Return the sum of the signs of all active crossings.
    pub fn writhe(&self) -> i64 {
        self.crossings()
            .filter_map(|c| self.handedness(c))
            .map(|h| h.sign())
            .sum()
    }

    fn record(&mut self, undo: Undo) {
        if let Some(journal) = self.journal.as_mut() { journal.push(undo); }
    }

    pub(crate) fn set_port(&mut self, c: CrossingId, port: Port, a: ArcId) {
        let k = port.ccw();
        let prev = self.ports[c][k];
        self.record(Undo::Port(c, k, prev));
        self.ports[c][k] = a;
    }

    pub(crate) fn set_end(&mut self, a: ArcId, end: End, c: CrossingId) {
        let prev = self.ends[a][end as usize];
        self.record(Undo::End(a, end, prev));
        self.ends[a][end as usize] = c;
    }

    pub(crate) fn set_handedness(&mut self, c: CrossingId, h: Handedness) {
        let prev = self.cstate[c];
        self.record(Undo::Crossing(c, prev));
        self.cstate[c] = h.into();
    }

    pub(crate) fn add_unlinks(&mut self, n: usize) { self.unlinks += n; }

    /// Mark a crossing inactive. Does nothing if it is already inactive.
    pub fn deactivate_crossing(&mut self, c: CrossingId) {
        if !self.crossing_active(c) { return; }
        let prev = self.cstate[c];
        self.record(Undo::Crossing(c, prev));
        self.cstate[c] = CrossingState::Inactive;
        self.crossing_count -= 1;
    }

    /// Mark an arc inactive. Does nothing if it is already inactive.
    pub fn deactivate_arc(&mut self, a: ArcId) {
        if !self.arc_active(a) { return; }
        self.record(Undo::Arc(a, ArcState::Active));
        self.astate[a] = ArcState::Inactive;
        self.arc_count -= 1;
    }

    pub(crate) fn check_crossing(&self, c: CrossingId) -> DiagramResult<()> {
        if c >= self.crossing_capacity() { return Err(MissingCrossing(c)); }
        if !self.crossing_active(c) { return Err(InactiveCrossing(c)); }
        Ok(())
    }

    pub(crate) fn check_arc(&self, a: ArcId) -> DiagramResult<()> {
        if a >= self.arc_capacity() { return Err(MissingArc(a)); }
        if !self.arc_active(a) { return Err(InactiveArc(a)); }
        Ok(())
    }

    /// Move the `end` of arc `a` onto the crossing currently at the `end` of
    /// arc `b`, replacing `b` in that crossing's port, then deactivate `b`.
    ///
    /// Returns the crossing that was repointed.
    pub fn reconnect(&mut self, a: ArcId, end: End, b: ArcId)
        -> DiagramResult<CrossingId>
    {
        if a == b { return Err(SelfReconnect(a)); }
        self.check_arc(a)?;
        self.check_arc(b)?;
        let c = self.arc_crossing(b, end);
        self.check_crossing(c)?;
        let io = end.io();
        let port = self.port_of(c, b, io)
            .ok_or(PortMismatch { crossing: c, arc: b, io })?;
        self.set_end(a, end, c);
        self.set_port(c, port, a);
        self.deactivate_arc(b);
        Ok(c)
    }

    /// Run `f` as a single atomic edit.
    ///
    /// If `f` returns `Err`, every change it made to ports, arc ends, states,
    /// live counters and the unlink count is rolled back before the error is
    /// passed on. Nested calls join the outermost transaction.
    pub fn transaction<T, F>(&mut self, f: F) -> DiagramResult<T>
    where F: FnOnce(&mut Self) -> DiagramResult<T>
    {
        if self.journal.is_some() { return f(self); }
        let counts = (self.crossing_count, self.arc_count, self.unlinks);
        self.journal = Some(Vec::new());
        let res = f(self);
        let journal = self.journal.take().unwrap_or_default();
        if res.is_err() {
            for undo in journal.into_iter().rev() {
                match undo {
                    Undo::Port(c, k, a) => { self.ports[c][k] = a; },
                    Undo::End(a, end, c) => { self.ends[a][end as usize] = c; },
                    Undo::Crossing(c, s) => { self.cstate[c] = s; },
                    Undo::Arc(a, s) => { self.astate[a] = s; },
                }
            }
            (self.crossing_count, self.arc_count, self.unlinks) = counts;
        }
        res
    }

    /// Walk the whole store and return the first violated invariant, if any.
    pub fn check(&self) -> DiagramResult<()> {
        let crossings = self.crossings().count();
        let arcs = self.arcs().count();
        if crossings != self.crossing_count
            || arcs != self.arc_count
            || 2 * crossings != arcs
        {
            return Err(CountMismatch {
                crossings: self.crossing_count,
                arcs: self.arc_count,
            });
        }
        for a in self.arcs() {
            for end in [End::Tail, End::Head] {
                let c = self.arc_crossing(a, end);
                self.check_crossing(c)?;
                let held =
                    [Side::Left, Side::Right].into_iter()
                    .filter(|&side| {
                        self.crossing_arc(c, Port::new(end.io(), side)) == a
                    })
                    .count();
                if held != 1 {
                    return Err(PortMismatch { crossing: c, arc: a, io: end.io() });
                }
            }
        }
        for c in self.crossings() {
            for port in Port::CCW {
                let a = self.crossing_arc(c, port);
                if !self.arc_active(a) {
                    return Err(DeadPort { crossing: c, port, arc: a });
                }
                let end =
                    if port.io == Io::Out { End::Tail } else { End::Head };
                if self.arc_crossing(a, end) != c {
                    return Err(DanglingPort { crossing: c, port, arc: a, end });
                }
            }
        }
        Ok(())
    }

    // Build a fresh store holding exactly the arcs listed, in that order, and
    // the crossings they leave, in order of first departure. `arcs` must be
    // closed under the crossings it touches.
    pub(crate) fn rebuild(&self, arcs: &[ArcId], unlinks: usize) -> Self {
        let mut amap: Vec<Option<ArcId>> = vec![None; self.arc_capacity()];
        arcs.iter().enumerate().for_each(|(k, &a)| { amap[a] = Some(k); });
        let crossings: Vec<CrossingId> =
            arcs.iter()
            .map(|&a| self.arc_crossing(a, End::Tail))
            .unique()
            .collect();
        let mut cmap: Vec<Option<CrossingId>> = vec![None; self.crossing_capacity()];
        crossings.iter().enumerate().for_each(|(k, &c)| { cmap[c] = Some(k); });
        let ports: Vec<[ArcId; 4]> =
            crossings.iter()
            .map(|&c| self.ports[c].map(|a| amap[a].unwrap_or(0)))
            .collect();
        let ends: Vec<[CrossingId; 2]> =
            arcs.iter()
            .map(|&a| self.ends[a].map(|c| cmap[c].unwrap_or(0)))
            .collect();
        Self {
            ports,
            cstate: crossings.iter().map(|&c| self.cstate[c]).collect(),
            clabel: crossings.iter().map(|&c| self.clabel[c]).collect(),
            ends,
            astate: vec![ArcState::Active; arcs.len()],
            alabel: arcs.iter().map(|&a| self.alabel[a]).collect(),
            crossing_count: crossings.len(),
            arc_count: arcs.len(),
            unlinks,
            journal: None,
        }
    }

    /// Return a compacted copy of `self` with no inactive slots.
    ///
    /// Arcs are renumbered in traversal order, component by component, and
    /// crossings in order of first departure. Labels and the unlink count are
    /// preserved.
    pub fn compress(&self) -> Self {
        let arcs: Vec<ArcId> =
            self.link_components().into_iter().flatten().collect();
        self.rebuild(&arcs, self.unlinks)
    }

    /// Find the crossing carrying label `l`.
    ///
    /// Logs a warning and returns the handle `0` if no crossing carries it.
    pub fn crossing_by_label(&self, l: Label) -> CrossingId {
        self.clabel.iter().position(|&x| x == l)
            .unwrap_or_else(|| {
                warn!("no crossing with label {l}");
                0
            })
    }

    /// Find the arc carrying label `l`.
    ///
    /// Logs a warning and returns the handle `0` if no arc carries it.
    pub fn arc_by_label(&self, l: Label) -> ArcId {
        self.alabel.iter().position(|&x| x == l)
            .unwrap_or_else(|| {
                warn!("no arc with label {l}");
                0
            })
    }

    /// Return a one-line description of a crossing.
    pub fn crossing_string(&self, c: CrossingId) -> String {
        let Some(state) = self.crossing_state(c) else {
            return format!("crossing {c} (missing)");
        };
        let ports =
            Port::CCW.iter()
            .map(|&p| format!("{:?}/{:?}={}", p.io, p.side, self.crossing_arc(c, p)))
            .join(" ");
        format!("crossing {c} (label {}, {state:?}): {ports}", self.clabel[c])
    }

    /// Return a one-line description of an arc.
    pub fn arc_string(&self, a: ArcId) -> String {
        let Some(state) = self.astate.get(a) else {
            return format!("arc {a} (missing)");
        };
        format!(
            "arc {a} (label {}, {state:?}): {} -> {}",
            self.alabel[a],
            self.arc_crossing(a, End::Tail),
            self.arc_crossing(a, End::Head),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // alternating trefoil, all crossings left-handed
    fn build_trefoil() -> Diagram {
        Diagram::from_parts(
            vec![
                [2, 0, 3, 5], // 0
                [0, 4, 1, 3], // 1
                [4, 2, 5, 1], // 2
            ],
            vec![Handedness::LeftHanded; 3],
            0,
        ).unwrap()
    }

    // unknot drawn with a single kink
    fn build_curl() -> Diagram {
        Diagram::from_parts(
            vec![[0, 0, 1, 1]],
            vec![Handedness::RightHanded],
            0,
        ).unwrap()
    }

    #[test]
    fn counts() {
        let dg = build_trefoil();
        assert_eq!(dg.count_crossings(),   3);
        assert_eq!(dg.count_arcs(),        6);
        assert_eq!(dg.count_unlinks(),     0);
        assert_eq!(dg.crossing_capacity(), 3);
        assert_eq!(dg.arc_capacity(),      6);
        assert_eq!(dg.writhe(),           -3);
        assert!(dg.check().is_ok());

        let dg = build_curl();
        assert_eq!(dg.count_crossings(), 1);
        assert_eq!(dg.count_arcs(),      2);
        assert_eq!(dg.writhe(),          1);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn navigation() {
        let dg = build_trefoil();
        assert_eq!(dg.arc_crossing(0, End::Tail), 0);
        assert_eq!(dg.arc_crossing(0, End::Head), 1);
        assert_eq!(dg.end_port(0, End::Tail), Port::OUT_RIGHT);
        assert_eq!(dg.end_port(0, End::Head), Port::IN_RIGHT);
        assert_eq!(dg.next_arc(0, End::Head), 1);
        assert_eq!(dg.next_arc(0, End::Tail), 5);
        assert_eq!(dg.port_of(0, 3, Io::Out), Some(Port::OUT_LEFT));
        assert_eq!(dg.port_of(0, 3, Io::In), None);
        assert!(!dg.arc_over(0, End::Tail));
        assert!(dg.arc_over(3, End::Tail));
        assert!(dg.arc_over(5, End::Head) == dg.arc_over(0, End::Tail));
    }

    #[test]
    fn from_parts_rejects_bad_ports() {
        let res = Diagram::from_parts(
            vec![[0, 0, 0, 1]], vec![Handedness::LeftHanded], 0);
        assert_eq!(res, Err(DuplicateEnd(0, End::Tail)));
        let res = Diagram::from_parts(
            vec![[0, 1, 2, 1]], vec![Handedness::LeftHanded], 0);
        assert_eq!(res, Err(LabelOutOfRange { label: 2, crossings: 1 }));
    }

    #[test]
    fn from_parts_rejects_unequal_lengths() {
        let res = Diagram::from_parts(
            vec![[2, 0, 3, 5], [0, 4, 1, 3], [4, 2, 5, 1]],
            vec![Handedness::LeftHanded; 2],
            0,
        );
        assert_eq!(res, Err(LengthMismatch { ports: 3, handedness: 2 }));
        let res = Diagram::from_parts(
            vec![[0, 0, 1, 1]],
            vec![Handedness::RightHanded; 2],
            0,
        );
        assert_eq!(res, Err(LengthMismatch { ports: 1, handedness: 2 }));
        assert!(Diagram::from_parts(vec![], vec![], 2).is_ok_and(|dg| dg.count_unlinks() == 2));
    }

    #[test]
    fn reconnect_checks() {
        let mut dg = build_trefoil();
        assert_eq!(dg.reconnect(0, End::Head, 0), Err(SelfReconnect(0)));
        assert_eq!(dg.reconnect(0, End::Head, 9), Err(MissingArc(9)));
        dg.deactivate_arc(2);
        assert_eq!(dg.reconnect(0, End::Head, 2), Err(InactiveArc(2)));
    }

    #[test]
    fn reconnect_repoints() {
        let mut dg = build_trefoil();
        // arc 0's head now sits where arc 1's head was
        let c = dg.reconnect(0, End::Head, 1).unwrap();
        assert_eq!(c, 2);
        assert_eq!(dg.arc_crossing(0, End::Head), 2);
        assert_eq!(dg.crossing_arc(2, Port::IN_LEFT), 0);
        assert!(!dg.arc_active(1));
        assert_eq!(dg.count_arcs(), 5);
    }

    #[test]
    fn transaction_rolls_back() {
        let mut dg = build_trefoil();
        let before = dg.clone();
        let res: DiagramResult<()> =
            dg.transaction(|dg| {
                dg.reconnect(0, End::Head, 1)?;
                dg.deactivate_crossing(1);
                dg.add_unlinks(1);
                dg.reconnect(0, End::Head, 0)?;
                Ok(())
            });
        assert_eq!(res, Err(SelfReconnect(0)));
        assert_eq!(dg, before);
        assert!(dg.check().is_ok());
    }

    #[test]
    fn check_catches_dangling_arc() {
        let mut dg = build_trefoil();
        dg.deactivate_arc(4);
        assert!(dg.check().is_err());
    }

    #[test]
    fn compress_keeps_labels() {
        let dg = build_curl();
        let dg = dg.compress();
        assert_eq!(dg.count_crossings(), 1);
        assert_eq!(dg.crossing_label(0), Some(0));
        assert!(dg.check().is_ok());
    }

    #[test]
    fn label_lookup() {
        let dg = build_trefoil();
        assert_eq!(dg.crossing_by_label(2), 2);
        assert_eq!(dg.arc_by_label(5), 5);
        assert_eq!(dg.crossing_by_label(17), 0);
        assert_eq!(dg.arc_by_label(17), 0);
        assert!(dg.crossing_string(0).starts_with("crossing 0 (label 0"));
        assert_eq!(dg.arc_string(0), "arc 0 (label 0, Active): 0 -> 1");
    }
}
