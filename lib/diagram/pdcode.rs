//! Import and export of diagrams as planar-diagram (PD) codes.
//!
//! A PD code lists one row of five integers per crossing: the four arc labels
//! met going counterclockwise around the crossing, starting from the incoming
//! under-strand, followed by the crossing's sign (`> 0` for right-handed).
//! Arcs are labelled `0..2n` for `n` crossings. Closed components without
//! crossings have no rows and are carried as a separate count.

use tracing::error;
use crate::diagram::{
    Diagram,
    DiagramError,
    DiagramResult,
    ArcId,
    CrossingId,
    End,
    Handedness,
};

/// A PD code together with a count of unlinked circles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdCode {
    pub crossings: Vec<[i64; 5]>,
    pub unlinks: usize,
}

impl PdCode {
    pub fn new(crossings: Vec<[i64; 5]>, unlinks: usize) -> Self {
        Self { crossings, unlinks }
    }

    /// Return the number of crossing rows.
    pub fn len(&self) -> usize { self.crossings.len() }

    pub fn is_empty(&self) -> bool { self.crossings.is_empty() }
}

impl From<Vec<[i64; 5]>> for PdCode {
    fn from(crossings: Vec<[i64; 5]>) -> Self { Self { crossings, unlinks: 0 } }
}

// counterclockwise position of the incoming under-strand
fn start_port(h: Handedness) -> usize {
    match h {
        Handedness::RightHanded => 0,
        Handedness::LeftHanded => 3,
    }
}

impl Diagram {
    /// Build a diagram from a PD code.
    ///
    /// Fails if a label lies outside `[0, 2n)`, if some end of an arc is
    /// assigned twice, or if some arc is never used.
    pub fn try_from_pd_code(pd: &PdCode) -> DiagramResult<Self> {
        let n = pd.crossings.len();
        let mut ports: Vec<[ArcId; 4]> = Vec::with_capacity(n);
        let mut handedness: Vec<Handedness> = Vec::with_capacity(n);
        for row in pd.crossings.iter() {
            let h =
                if row[4] > 0 {
                    Handedness::RightHanded
                } else {
                    Handedness::LeftHanded
                };
            let start = start_port(h);
            let mut arcs: [ArcId; 4] = [0; 4];
            for (k, &label) in row[..4].iter().enumerate() {
                if label < 0 || label >= 2 * n as i64 {
                    return Err(DiagramError::LabelOutOfRange { label, crossings: n });
                }
                arcs[(start + k) % 4] = label as ArcId;
            }
            ports.push(arcs);
            handedness.push(h);
        }
        Self::from_parts(ports, handedness, pd.unlinks)
    }

    /// Build a diagram from a PD code, logging the error and returning an
    /// empty diagram if the code is malformed.
    pub fn from_pd_code(pd: &PdCode) -> Self {
        Self::try_from_pd_code(pd)
            .unwrap_or_else(|err| {
                error!("malformed PD code: {err}");
                Self::new()
            })
    }

    // Arcs in traversal order, component by component, preferring to start
    // each component on an arc that leaves its tail as the under-strand.
    pub(crate) fn traversal(&self) -> Vec<Vec<ArcId>> {
        let mut seen: Vec<bool> = vec![false; self.arc_capacity()];
        let mut components: Vec<Vec<ArcId>> = Vec::new();
        for prefer_under in [true, false] {
            for a0 in self.arcs() {
                if seen[a0] || (prefer_under && self.arc_over(a0, End::Tail)) {
                    continue;
                }
                let mut component: Vec<ArcId> = Vec::new();
                let mut a = a0;
                while !seen[a] && component.len() < self.count_arcs() {
                    seen[a] = true;
                    component.push(a);
                    a = self.next_arc(a, End::Head);
                }
                components.push(component);
            }
        }
        components
    }

    /// Export the diagram as a PD code.
    ///
    /// Crossings and arcs are relabelled in order of first encounter along a
    /// component-by-component traversal.
    pub fn pd_code(&self) -> PdCode {
        let mut clab: Vec<Option<usize>> = vec![None; self.crossing_capacity()];
        let mut alab: Vec<usize> = vec![0; self.arc_capacity()];
        let mut order: Vec<CrossingId> = Vec::with_capacity(self.count_crossings());
        let mut next_arc: usize = 0;
        for component in self.traversal() {
            for a in component {
                for end in [End::Tail, End::Head] {
                    let c = self.arc_crossing(a, end);
                    if clab[c].is_none() {
                        clab[c] = Some(order.len());
                        order.push(c);
                    }
                }
                alab[a] = next_arc;
                next_arc += 1;
            }
        }
        let crossings: Vec<[i64; 5]> =
            order.into_iter()
            .filter_map(|c| {
                let h = self.handedness(c)?;
                let start = start_port(h);
                let arcs = self.crossing_arcs(c);
                let mut row: [i64; 5] = [0; 5];
                (0..4).for_each(|k| { row[k] = alab[arcs[(start + k) % 4]] as i64; });
                row[4] = h.sign();
                Some(row)
            })
            .collect();
        PdCode { crossings, unlinks: self.count_unlinks() }
    }

    /// Export the diagram as a signed Gauss code.
    ///
    /// One entry per arc in the same traversal as [`pd_code`][Self::pd_code]:
    /// the label of the arc's tail crossing plus one, positive if the arc
    /// leaves it as the over-strand. Components are concatenated.
    pub fn gauss_code(&self) -> Vec<i64> {
        let mut clab: Vec<Option<i64>> = vec![None; self.crossing_capacity()];
        let mut next: i64 = 1;
        let mut code: Vec<i64> = Vec::with_capacity(self.count_arcs());
        for a in self.traversal().into_iter().flatten() {
            let c = self.arc_crossing(a, End::Tail);
            let label = *clab[c].get_or_insert_with(|| { next += 1; next - 1 });
            code.push(if self.arc_over(a, End::Tail) { label } else { -label });
        }
        code
    }
}
