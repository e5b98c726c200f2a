//! Planar diagrams of knots and links stored as a 4-regular graph of
//! crossings and oriented arcs.
//!
//! Crossings and arcs live in flat, handle-indexed arenas allocated once when
//! a diagram is built (usually from a [PD code][PdCode]). Rewrites never
//! allocate: they repoint arc ends and crossing ports and deactivate what they
//! remove, so handles stay stable for the lifetime of a [`Diagram`].
//!
//! Each crossing has four ports, identified by an [`Io`] and a [`Side`]. In
//! counterclockwise order these are `In/Right`, `Out/Right`, `Out/Left`,
//! `In/Left`; opposite ports are joined by one strand through the crossing.
//! An arc leaves its tail crossing through an `Out` port and enters its head
//! crossing through an `In` port.

use thiserror::Error;

/// Errors for fallible operations on planar diagrams.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiagramError {
    /// Returned when a crossing handle is outside the store.
    #[error("missing crossing {0}")]
    MissingCrossing(CrossingId),

    /// Returned when an arc handle is outside the store.
    #[error("missing arc {0}")]
    MissingArc(ArcId),

    /// Returned when an operation needs an active crossing.
    #[error("crossing {0} is inactive")]
    InactiveCrossing(CrossingId),

    /// Returned when an operation needs an active arc.
    #[error("arc {0} is inactive")]
    InactiveArc(ArcId),

    /// Returned when an arc would be reconnected to itself.
    #[error("cannot reconnect arc {0} onto itself")]
    SelfReconnect(ArcId),

    /// Returned when a crossing does not hold an arc at any port of the
    /// expected kind.
    #[error("crossing {crossing} holds no {io:?} port with arc {arc}")]
    PortMismatch { crossing: CrossingId, arc: ArcId, io: Io },

    /// Returned when a port of an active crossing holds an arc that does not
    /// point back to it.
    #[error("crossing {crossing} port {port:?} holds arc {arc}, whose {end:?} is elsewhere")]
    DanglingPort { crossing: CrossingId, port: Port, arc: ArcId, end: End },

    /// Returned when a port of an active crossing holds an inactive arc.
    #[error("crossing {crossing} port {port:?} holds inactive arc {arc}")]
    DeadPort { crossing: CrossingId, port: Port, arc: ArcId },

    /// Returned when the live counters disagree with the arenas or with each
    /// other.
    #[error("inconsistent counts: {crossings} crossing(s), {arcs} arc(s)")]
    CountMismatch { crossings: usize, arcs: usize },

    /// Returned when a diagram is built from unequal numbers of port rows and
    /// handedness entries.
    #[error("{ports} port row(s) but {handedness} handedness value(s)")]
    LengthMismatch { ports: usize, handedness: usize },

    /// Returned when a PD code label lies outside `[0, 2n)`.
    #[error("PD label {label} out of range for {crossings} crossing(s)")]
    LabelOutOfRange { label: i64, crossings: usize },

    /// Returned when a PD code assigns the same end of an arc twice.
    #[error("PD label {0} has its {1:?} assigned more than once")]
    DuplicateEnd(Label, End),

    /// Returned when a PD code never assigns some end of an arc.
    #[error("PD label {0} has no {1:?}")]
    UnusedLabel(Label, End),
}
pub type DiagramResult<T> = Result<T, DiagramError>;

/// Handle to a crossing.
pub type CrossingId = usize;

/// Handle to an arc.
pub type ArcId = usize;

/// Immutable label carried by a crossing or arc through compaction.
pub type Label = usize;

/// One of the two ends of an oriented arc.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum End {
    Tail = 0,
    Head = 1,
}

impl End {
    /// Return the other end.
    pub fn flip(self) -> Self {
        match self {
            Self::Tail => Self::Head,
            Self::Head => Self::Tail,
        }
    }

    /// `false` is the tail, `true` is the head.
    pub fn from_bool(head: bool) -> Self {
        if head { Self::Head } else { Self::Tail }
    }

    /// The kind of port through which an arc meets the crossing at this end.
    pub fn io(self) -> Io {
        match self {
            Self::Tail => Io::Out,
            Self::Head => Io::In,
        }
    }
}

/// Whether a port is on the outgoing or the incoming side of a crossing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Io {
    Out = 0,
    In = 1,
}

/// Left or right side of a crossing, seen along the direction of travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    pub fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A port of a crossing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    pub io: Io,
    pub side: Side,
}

impl Port {
    pub const IN_RIGHT: Self = Self { io: Io::In, side: Side::Right };
    pub const OUT_RIGHT: Self = Self { io: Io::Out, side: Side::Right };
    pub const OUT_LEFT: Self = Self { io: Io::Out, side: Side::Left };
    pub const IN_LEFT: Self = Self { io: Io::In, side: Side::Left };

    /// All four ports in counterclockwise order.
    pub const CCW: [Self; 4] =
        [Self::IN_RIGHT, Self::OUT_RIGHT, Self::OUT_LEFT, Self::IN_LEFT];

    pub fn new(io: Io, side: Side) -> Self { Self { io, side } }

    /// Position of the port in counterclockwise order, starting at
    /// `In/Right`.
    pub fn ccw(self) -> usize {
        match (self.io, self.side) {
            (Io::In, Side::Right) => 0,
            (Io::Out, Side::Right) => 1,
            (Io::Out, Side::Left) => 2,
            (Io::In, Side::Left) => 3,
        }
    }

    /// Inverse of [`ccw`][Self::ccw]; the index is taken mod 4.
    pub fn from_ccw(k: usize) -> Self { Self::CCW[k % 4] }

    /// The port `k` steps counterclockwise from `self`.
    pub fn rotate(self, k: usize) -> Self { Self::from_ccw(self.ccw() + k) }

    /// The port joined to `self` by a strand through the crossing.
    pub fn through(self) -> Self { self.rotate(2) }

    /// `true` for the ports of the strand running from `In/Left` to
    /// `Out/Right`.
    pub fn on_slash(self) -> bool { self.ccw() % 2 == 1 }
}

/// Chirality of a crossing.
///
/// A right-handed crossing has its `In/Left -> Out/Right` strand on top; a
/// left-handed crossing has its `In/Right -> Out/Left` strand on top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Handedness {
    RightHanded,
    LeftHanded,
}

impl Handedness {
    pub fn flip(self) -> Self {
        match self {
            Self::RightHanded => Self::LeftHanded,
            Self::LeftHanded => Self::RightHanded,
        }
    }

    /// Sign of the crossing as it appears in a PD code.
    pub fn sign(self) -> i64 {
        match self {
            Self::RightHanded => 1,
            Self::LeftHanded => -1,
        }
    }
}

/// Lifecycle state of a crossing slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CrossingState {
    RightHanded,
    LeftHanded,
    Inactive,
}

impl CrossingState {
    pub fn is_active(self) -> bool { self != Self::Inactive }

    pub fn handedness(self) -> Option<Handedness> {
        match self {
            Self::RightHanded => Some(Handedness::RightHanded),
            Self::LeftHanded => Some(Handedness::LeftHanded),
            Self::Inactive => None,
        }
    }
}

impl From<Handedness> for CrossingState {
    fn from(h: Handedness) -> Self {
        match h {
            Handedness::RightHanded => Self::RightHanded,
            Handedness::LeftHanded => Self::LeftHanded,
        }
    }
}

/// Lifecycle state of an arc slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArcState {
    Active,
    Inactive,
}

impl ArcState {
    pub fn is_active(self) -> bool { self == Self::Active }
}

pub(crate) mod store;
pub use store::*;

pub mod pdcode;
pub use pdcode::PdCode;

pub mod faces;
pub use faces::{ Faces, FaceId };

pub mod components;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_and_port_helpers() {
        assert_eq!(End::from_bool(true),  End::Head);
        assert_eq!(End::from_bool(false), End::Tail);
        assert_eq!(End::Tail.flip(), End::Head);
        assert_eq!(End::Tail.io(), Io::Out);
        assert_eq!(End::Head.io(), Io::In);
        assert_eq!(Side::Left.flip(), Side::Right);
        assert_eq!(Port::new(Io::In, Side::Right.flip()), Port::IN_LEFT);
        assert_eq!(Port::OUT_RIGHT.through(), Port::IN_LEFT);
        assert_eq!(Port::IN_RIGHT.rotate(3), Port::IN_LEFT);
    }
}
