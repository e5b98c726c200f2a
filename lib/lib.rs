#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! This package contains tools for simplifying [planar diagrams][pd] of knots
//! and links by local rewriting.
//!
//! - [`diagram`] provides the flat, handle-indexed [`Diagram`] store, its
//! conversion to and from PD codes, and derived structure: faces, link
//! components and connected pieces.
//! - [`rules`] implements the local moves (Reidemeister I and II, the
//! Reidemeister II slide, turning a curl over, and removal of twists, curls
//! and threaded curls) and the connected-sum splitter, each as an atomic,
//! rollback-safe rewrite.
//! - [`session`] drives the moves over a worklist of crossings until the
//! diagram is irreducible, accumulating [`MoveCounts`].
//! - [`edit`] adds the manual single-crossing edits, breaking and switching a
//! crossing.
//!
//! ```
//! use pd_rewrite::{ Diagram, PdCode, SimplifyConfig };
//!
//! // the unknot drawn with two kinks
//! let pd = PdCode::from(vec![[0, 0, 1, 2, 1], [3, 3, 2, 1, 1]]);
//! let mut dg = Diagram::try_from_pd_code(&pd).unwrap();
//! let counts = dg.simplify(SimplifyConfig::default()).unwrap();
//! assert_eq!(counts.reidemeister_i, 2);
//! assert_eq!(dg.count_crossings(),  0);
//! assert_eq!(dg.count_unlinks(),    1);
//! ```
//!
//! [pd]: https://katlas.org/wiki/Planar_Diagrams
//!
//! # Further reading
//! - C. Adams, *The Knot Book*. American Mathematical Society (2004).
//! - D. Bar-Natan *et al.*, "The Knot Atlas." <https://katlas.org>
//!

pub mod diagram;
pub mod rules;
pub mod session;
pub mod edit;

pub use diagram::{ Diagram, DiagramError, DiagramResult, PdCode };
pub use rules::{ Outcome, Rewrite };
pub use session::{ MoveCounts, Session, SimplifyConfig };
