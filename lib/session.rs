//! Worklist-driven simplification of a [`Diagram`].
//!
//! A [`Session`] holds the state of one or more simplification runs: its
//! configuration, the running [`MoveCounts`], and a worklist of crossings
//! that may admit a move. The diagram itself carries none of this, so the
//! same store can be simplified by different sessions or edited by hand in
//! between runs.
//!
//! One call to [`Session::simplify`] alternates two phases until neither
//! changes the diagram:
//! - drain the worklist, trying [`ReidemeisterI`][crate::rules::ReidemeisterI]
//!   at each popped crossing and then every move of
//!   [`SimplifyArc`][crate::rules::SimplifyArc] on its incident arcs, pushing
//!   the crossings touched by each applied move;
//! - run the connected-sum splitter over freshly computed faces, and reseed
//!   the worklist with every active crossing if anything was split.
//!
//! Every applied move removes at least one crossing, and every split either
//! removes crossings or adds a diagram component, so the loop terminates on
//! its own; [`SimplifyConfig::max_rounds`] only bounds the number of
//! alternations.

use std::ops::AddAssign;
use itertools::Itertools;
use tracing::{ debug, error, instrument, trace, warn };
use crate::{
    diagram::{ Diagram, DiagramResult, CrossingId },
    rules::{ Outcome, Rewrite },
};

/// Running totals of applied moves and their side effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCounts {
    pub reidemeister_i: usize,
    /// Curls turned over across a strand; each removes one crossing.
    pub reidemeister_ia: usize,
    pub reidemeister_ii: usize,
    pub reidemeister_iia: usize,
    pub twist: usize,
    /// Closed components without crossings split off the diagram.
    pub unlinks: usize,
    /// Connected-sum splits.
    pub splits: usize,
}

impl MoveCounts {
    /// Total number of moves and splits, not counting unlinks.
    pub fn total(&self) -> usize {
        self.reidemeister_i
            + self.reidemeister_ia
            + self.reidemeister_ii
            + self.reidemeister_iia
            + self.twist
            + self.splits
    }

    /// Number of crossings removed by the counted moves.
    pub fn crossings_removed(&self) -> usize {
        self.reidemeister_i
            + self.reidemeister_ia
            + 2 * (self.reidemeister_ii + self.reidemeister_iia + self.twist)
    }

    /// Return `true` if nothing has been counted.
    pub fn is_empty(&self) -> bool { self == &Self::default() }
}

impl AddAssign for MoveCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.reidemeister_i += rhs.reidemeister_i;
        self.reidemeister_ia += rhs.reidemeister_ia;
        self.reidemeister_ii += rhs.reidemeister_ii;
        self.reidemeister_iia += rhs.reidemeister_iia;
        self.twist += rhs.twist;
        self.unlinks += rhs.unlinks;
        self.splits += rhs.splits;
    }
}

/// Settings for a [`Session`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifyConfig {
    /// Allow moves that split closed components off a strand. Only needed
    /// for links; for knots the result is the same either way.
    pub multi_component: bool,
    /// Return structural errors to the caller instead of logging them and
    /// skipping the failed move.
    pub strict: bool,
    /// Maximum number of drain/split rounds per call to
    /// [`Session::simplify`].
    pub max_rounds: usize,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            multi_component: true,
            strict: cfg!(debug_assertions),
            max_rounds: 64,
        }
    }
}

impl SimplifyConfig {
    pub fn with_multi_component(mut self, multi_component: bool) -> Self {
        self.multi_component = multi_component;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

/// Whether a [`Session`] is in the middle of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    #[default]
    Idle,
    Processing,
}

/// Driver for the simplification of diagrams.
#[derive(Clone, Debug, Default)]
pub struct Session {
    config: SimplifyConfig,
    counts: MoveCounts,
    worklist: Vec<CrossingId>,
    state: SessionState,
}

impl Session {
    /// Create a new session.
    pub fn new(config: SimplifyConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &SimplifyConfig { &self.config }

    /// Return the counts accumulated over all runs of this session.
    pub fn counts(&self) -> &MoveCounts { &self.counts }

    pub fn state(&self) -> SessionState { self.state }

    /// Reset the accumulated counts to zero.
    pub fn reset_counts(&mut self) { self.counts = MoveCounts::default(); }

    /// Simplify `dg` to a fixpoint of the local moves and the connected-sum
    /// splitter, returning the counts of this run.
    ///
    /// The worklist is initially seeded with all active crossings, lowest
    /// handle first.
    pub fn simplify(&mut self, dg: &mut Diagram) -> DiagramResult<MoveCounts> {
        let seed = dg.crossings().collect_vec();
        self.simplify_from(dg, seed.into_iter().rev())
    }

    /// Like [`Self::simplify`], but seed the first round with `seed`, the
    /// last element being processed first. Later rounds are seeded with all
    /// active crossings.
    #[instrument(skip_all, fields(crossings = dg.count_crossings()))]
    pub fn simplify_from<I>(&mut self, dg: &mut Diagram, seed: I)
        -> DiagramResult<MoveCounts>
    where I: IntoIterator<Item = CrossingId>
    {
        self.state = SessionState::Processing;
        self.worklist.clear();
        self.worklist.extend(seed);
        let res = self.rounds(dg);
        self.worklist.clear();
        self.state = SessionState::Idle;
        let counts = res?;
        debug!(?counts, crossings = dg.count_crossings(), "simplified");
        self.counts += counts.clone();
        Ok(counts)
    }

    fn rounds(&mut self, dg: &mut Diagram) -> DiagramResult<MoveCounts> {
        let mut counts = MoveCounts::default();
        let mut rounds: usize = 0;
        let mut changed = true;
        while changed && rounds < self.config.max_rounds {
            if rounds > 0 {
                let seed = dg.crossings().collect_vec();
                self.worklist.extend(seed.into_iter().rev());
            }
            rounds += 1;
            self.drain(dg, &mut counts)?;
            changed = self.split(dg, &mut counts)?;
        }
        if changed {
            warn!(rounds, "stopped simplification at the round limit");
        }
        Ok(counts)
    }

    // pop crossings until the worklist is empty
    fn drain(&mut self, dg: &mut Diagram, counts: &mut MoveCounts)
        -> DiagramResult<()>
    {
        while let Some(c) = self.worklist.pop() {
            if !dg.crossing_active(c) { continue; }
            trace!(c, "pop");
            if let Some(rw) = self.step(dg, c)? {
                *counts += rw.counts;
                self.worklist.extend(
                    rw.touched.into_iter()
                        .chain([c])
                        .filter(|&t| dg.crossing_active(t))
                        .unique()
                );
            }
        }
        Ok(())
    }

    // try the first applicable move at `c`
    fn step(&self, dg: &mut Diagram, c: CrossingId) -> DiagramResult<Option<Rewrite>> {
        if let Some(rw) = self.attempt(c, dg.reidemeister_i(c))? {
            return Ok(Some(rw));
        }
        for a in dg.crossing_arcs(c) {
            if !dg.crossing_active(c) { break; }
            let res = dg.simplify_arc(a, self.config.multi_component);
            if let Some(rw) = self.attempt(c, res)? {
                return Ok(Some(rw));
            }
        }
        Ok(None)
    }

    // apply the error policy to the result of a move
    fn attempt(&self, c: CrossingId, res: DiagramResult<Outcome>)
        -> DiagramResult<Option<Rewrite>>
    {
        match res {
            Ok(outcome) => Ok(outcome.rewrite()),
            Err(err) => {
                error!(c, %err, "move failed; diagram left unchanged");
                if self.config.strict { Err(err) } else { Ok(None) }
            },
        }
    }

    // run one pass of the connected-sum splitter; true if anything was split
    fn split(&self, dg: &mut Diagram, counts: &mut MoveCounts) -> DiagramResult<bool> {
        if dg.is_trivial() { return Ok(false); }
        let faces = dg.faces();
        match dg.split_connected_sums(&faces) {
            Ok(rw) => {
                let splits = rw.counts.splits;
                if splits > 0 { debug!(splits, "split connected sums"); }
                *counts += rw.counts;
                Ok(splits > 0)
            },
            Err(err) => {
                error!(%err, "connected-sum split failed; diagram left unchanged");
                if self.config.strict { Err(err) } else { Ok(false) }
            },
        }
    }
}

impl Diagram {
    /// Simplify with a fresh [`Session`]; see [`Session::simplify`].
    pub fn simplify(&mut self, config: SimplifyConfig) -> DiagramResult<MoveCounts> {
        Session::new(config).simplify(self)
    }
}
