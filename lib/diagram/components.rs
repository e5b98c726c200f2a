//! Link components (closed strands) and diagram components (connected
//! pieces of the crossing graph).

use rustc_hash::FxHashSet;
use crate::diagram::{ Diagram, ArcId, CrossingId, End, Port };

impl Diagram {
    /// Return each closed strand of the diagram as its arcs in traversal
    /// order.
    ///
    /// Unlinks have no arcs and are not listed.
    pub fn link_components(&self) -> Vec<Vec<ArcId>> {
        let mut seen: FxHashSet<ArcId> = FxHashSet::default();
        let mut components: Vec<Vec<ArcId>> = Vec::new();
        for a0 in self.arcs() {
            if seen.contains(&a0) { continue; }
            let mut component: Vec<ArcId> = Vec::new();
            let mut a = a0;
            while seen.insert(a) {
                component.push(a);
                a = self.next_arc(a, End::Head);
            }
            components.push(component);
        }
        components
    }

    /// Return the number of closed strands, counting unlinks.
    pub fn count_link_components(&self) -> usize {
        self.link_components().len() + self.count_unlinks()
    }

    /// Return the crossings of each connected piece of the diagram.
    pub fn diagram_components(&self) -> Vec<Vec<CrossingId>> {
        let mut seen: FxHashSet<CrossingId> = FxHashSet::default();
        let mut components: Vec<Vec<CrossingId>> = Vec::new();
        for c0 in self.crossings() {
            if !seen.insert(c0) { continue; }
            let mut component: Vec<CrossingId> = vec![c0];
            let mut stack: Vec<CrossingId> = vec![c0];
            while let Some(c) = stack.pop() {
                for port in Port::CCW {
                    let a = self.crossing_arc(c, port);
                    for end in [End::Tail, End::Head] {
                        let d = self.arc_crossing(a, end);
                        if seen.insert(d) {
                            component.push(d);
                            stack.push(d);
                        }
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Split the diagram into one compacted diagram per connected piece.
    ///
    /// Unlinks are attached to the first piece. A diagram without crossings
    /// yields a single diagram holding only its unlinks.
    pub fn split_components(&self) -> Vec<Diagram> {
        let strands = self.link_components();
        let mut pieces: Vec<Diagram> =
            self.diagram_components().into_iter()
            .map(|crossings| {
                let crossings: FxHashSet<CrossingId> =
                    crossings.into_iter().collect();
                let arcs: Vec<ArcId> =
                    strands.iter()
                    .filter(|strand| {
                        strand.first()
                            .is_some_and(|&a| {
                                crossings.contains(&self.arc_crossing(a, End::Tail))
                            })
                    })
                    .flatten()
                    .copied()
                    .collect();
                self.rebuild(&arcs, 0)
            })
            .collect();
        match pieces.first_mut() {
            Some(first) => { first.unlinks = self.count_unlinks(); },
            None => { pieces.push(Diagram::unlinks(self.count_unlinks())); },
        }
        pieces
    }
}
