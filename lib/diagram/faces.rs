//! Faces of the planar embedding of a diagram.
//!
//! Every active arc borders two faces. Travelling along an arc in its own
//! direction, the face on the left is its *left face*; travelling against it,
//! the face on the left is its *right face*. A face boundary is traced by
//! arriving at a crossing and turning onto the port immediately clockwise of
//! the arrival port, which keeps the same face on the left.

use crate::diagram::{ Diagram, ArcId, End, Io };

/// Handle to a face of a [`Faces`] computation.
pub type FaceId = usize;

/// An arc together with a direction of travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirectedArc {
    pub arc: ArcId,
    pub forward: bool,
}

impl DirectedArc {
    fn index(self) -> usize { 2 * self.arc + usize::from(!self.forward) }
}

/// Face structure of one diagram, computed once and read-only afterward.
#[derive(Clone, Debug)]
pub struct Faces {
    face_of: Vec<Option<FaceId>>, // indexed by directed arc
    boundaries: Vec<Vec<DirectedArc>>,
}

// the directed arc that follows `d` around the face to its left
fn next_left(dg: &Diagram, d: DirectedArc) -> DirectedArc {
    let end = if d.forward { End::Head } else { End::Tail };
    let c = dg.arc_crossing(d.arc, end);
    let port = dg.end_port(d.arc, end).rotate(3);
    DirectedArc { arc: dg.crossing_arc(c, port), forward: port.io == Io::Out }
}

impl Faces {
    /// Trace all faces of `dg`.
    pub fn new(dg: &Diagram) -> Self {
        let mut face_of: Vec<Option<FaceId>> = vec![None; 2 * dg.arc_capacity()];
        let mut boundaries: Vec<Vec<DirectedArc>> = Vec::new();
        let limit = 2 * dg.count_arcs();
        for a in dg.arcs() {
            for forward in [true, false] {
                let start = DirectedArc { arc: a, forward };
                if face_of[start.index()].is_some() { continue; }
                let f = boundaries.len();
                let mut boundary: Vec<DirectedArc> = Vec::new();
                let mut d = start;
                while face_of[d.index()].is_none() && boundary.len() < limit {
                    face_of[d.index()] = Some(f);
                    boundary.push(d);
                    d = next_left(dg, d);
                }
                boundaries.push(boundary);
            }
        }
        Self { face_of, boundaries }
    }

    /// Return the face to the left of arc `a` along its direction.
    pub fn left_face(&self, a: ArcId) -> Option<FaceId> {
        self.face_of.get(2 * a).copied().flatten()
    }

    /// Return the face to the right of arc `a` along its direction.
    pub fn right_face(&self, a: ArcId) -> Option<FaceId> {
        self.face_of.get(2 * a + 1).copied().flatten()
    }

    /// Return the number of faces.
    pub fn count(&self) -> usize { self.boundaries.len() }

    /// Return the boundary of face `f` as directed arcs, each with `f` on its
    /// left.
    pub fn boundary(&self, f: FaceId) -> Option<&[DirectedArc]> {
        self.boundaries.get(f).map(|b| b.as_slice())
    }
}

impl Diagram {
    /// Compute the faces of `self`.
    pub fn faces(&self) -> Faces { Faces::new(self) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::PdCode;

    fn build_trefoil() -> Diagram {
        Diagram::from_pd_code(&PdCode::from(vec![
            [5, 2, 0, 3, -1],
            [3, 0, 4, 1, -1],
            [1, 4, 2, 5, -1],
        ]))
    }

    #[test]
    fn euler_characteristic() {
        let dg = build_trefoil();
        let faces = dg.faces();
        assert_eq!(faces.count(), 5);
        let total: usize =
            (0..faces.count())
            .map(|f| faces.boundary(f).unwrap().len())
            .sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn each_arc_borders_two_faces() {
        let dg = build_trefoil();
        let faces = dg.faces();
        for a in dg.arcs() {
            let l = faces.left_face(a).unwrap();
            let r = faces.right_face(a).unwrap();
            assert_ne!(l, r);
            assert!(faces.boundary(l).unwrap()
                .contains(&DirectedArc { arc: a, forward: true }));
            assert!(faces.boundary(r).unwrap()
                .contains(&DirectedArc { arc: a, forward: false }));
        }
    }

    #[test]
    fn curl_faces() {
        let dg = Diagram::from_pd_code(&PdCode::from(vec![[0, 0, 1, 1, 1]]));
        let faces = dg.faces();
        assert_eq!(faces.count(), 3);
        assert_eq!(faces.left_face(0), Some(0));
        assert_eq!(faces.right_face(1), Some(0));
        assert_ne!(faces.right_face(0), faces.left_face(1));
    }
}
