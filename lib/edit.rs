//! Single-crossing edits made by hand rather than by simplification.
//!
//! Neither edit preserves the knot type in general: [`Diagram::break_crossing`]
//! smooths a crossing along the orientation and [`Diagram::switch_crossing`]
//! is a crossing change.

use tracing::debug;
use crate::{
    diagram::{
        Diagram,
        DiagramError,
        DiagramResult,
        CrossingId,
        End,
        Io,
        Side,
        Port,
        Handedness,
    },
    rules::{ Outcome, Rewrite },
};

impl Diagram {
    /// Remove crossing `c` by joining each incoming strand to the outgoing
    /// strand on the same side.
    ///
    /// If `c` carries a kink, it is removed as in
    /// [`ReidemeisterI`][crate::rules::ReidemeisterI] instead and the move is
    /// counted. Otherwise the arc entering through `In/Left` takes over the
    /// head of the arc leaving through `Out/Left`, and likewise on the right;
    /// no move is counted. A strand that closes up on itself becomes an
    /// unlink.
    pub fn break_crossing(&mut self, c: CrossingId) -> DiagramResult<Rewrite> {
        self.check_crossing(c)?;
        if let Outcome::Applied(rw) = self.reidemeister_i(c)? {
            return Ok(rw);
        }
        self.transaction(|dg| {
            let mut rw = Rewrite::default();
            for side in [Side::Left, Side::Right] {
                // re-read: the first join may have moved an arc into `c`
                let inc = dg.crossing_arc(c, Port::new(Io::In, side));
                let out = dg.crossing_arc(c, Port::new(Io::Out, side));
                if inc == out {
                    rw.unlink(dg);
                    rw.remove(dg, &[inc], &[]);
                } else {
                    rw.reconnect(dg, inc, End::Head, out)?;
                }
            }
            rw.remove(dg, &[], &[c]);
            debug!(c, "broke crossing");
            Ok(rw)
        })
    }

    /// Flip the handedness of crossing `c` in place, returning the new
    /// handedness.
    pub fn switch_crossing(&mut self, c: CrossingId) -> DiagramResult<Handedness> {
        self.check_crossing(c)?;
        let h = self.handedness(c)
            .ok_or(DiagramError::InactiveCrossing(c))?
            .flip();
        self.set_handedness(c, h);
        Ok(h)
    }
}
