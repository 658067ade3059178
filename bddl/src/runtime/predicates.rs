//! Builtin predicate library.
//!
//! Each [`BuiltinPredicate`] is a stateless boolean test over resolved
//! arguments. Composite conditions are written in task goals as conjunctions
//! of these, not as new monolithic predicates.

use crate::geometry::Axis;
use crate::runtime::error::{EvalError, EvalResult};
use crate::runtime::object_state::{ObjectState, DEFAULT_ONTOP_XY_THRESHOLD};
use std::fmt;
use tracing::info;

/// Kind of value a predicate parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Object, fixture or region name resolved against the world.
    Object,
    Number,
    /// One of `x`, `y`, `z`.
    Axis,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Object => write!(f, "object"),
            ArgKind::Number => write!(f, "number"),
            ArgKind::Axis => write!(f, "axis"),
        }
    }
}

/// Parameter list of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Fixed(Vec<ArgKind>),
    /// Accepts any number of arguments of any kind.
    Variadic,
}

impl Signature {
    pub fn objects(count: usize) -> Self {
        Signature::Fixed(vec![ArgKind::Object; count])
    }

    pub fn arity_label(&self) -> String {
        match self {
            Signature::Fixed(kinds) => kinds.len().to_string(),
            Signature::Variadic => "any number of".to_string(),
        }
    }

    pub fn accepts_arity(&self, count: usize) -> bool {
        match self {
            Signature::Fixed(kinds) => kinds.len() == count,
            Signature::Variadic => true,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Fixed(kinds) => {
                let parts: Vec<String> = kinds.iter().map(ArgKind::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
            Signature::Variadic => write!(f, "(..)"),
        }
    }
}

/// A predicate argument after resolution against the world.
#[derive(Clone, Copy)]
pub enum Arg<'w> {
    Object(&'w dyn ObjectState),
    Number(f64),
    Axis(Axis),
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Object(obj) => write!(f, "Object({})", obj.name()),
            Arg::Number(n) => write!(f, "Number({})", n),
            Arg::Axis(a) => write!(f, "Axis({})", a),
        }
    }
}

impl<'w> Arg<'w> {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Object(_) => ArgKind::Object,
            Arg::Number(_) => ArgKind::Number,
            Arg::Axis(_) => ArgKind::Axis,
        }
    }
}

fn mismatch(predicate: &str, position: usize, expected: ArgKind, actual: Option<&Arg<'_>>) -> EvalError {
    match actual {
        Some(arg) => EvalError::TypeMismatch {
            predicate: predicate.to_string(),
            position,
            expected: expected.to_string(),
            actual: arg.kind().to_string(),
        },
        None => EvalError::InvalidArgument {
            predicate: predicate.to_string(),
            message: format!("missing argument {}", position),
        },
    }
}

/// Typed accessors used by predicate bodies.
pub fn object_arg<'w>(predicate: &str, args: &[Arg<'w>], i: usize) -> EvalResult<&'w dyn ObjectState> {
    match args.get(i) {
        Some(Arg::Object(obj)) => Ok(*obj),
        other => Err(mismatch(predicate, i, ArgKind::Object, other)),
    }
}

pub fn number_arg(predicate: &str, args: &[Arg<'_>], i: usize) -> EvalResult<f64> {
    match args.get(i) {
        Some(Arg::Number(n)) => Ok(*n),
        other => Err(mismatch(predicate, i, ArgKind::Number, other)),
    }
}

pub fn axis_arg(predicate: &str, args: &[Arg<'_>], i: usize) -> EvalResult<Axis> {
    match args.get(i) {
        Some(Arg::Axis(a)) => Ok(*a),
        other => Err(mismatch(predicate, i, ArgKind::Axis, other)),
    }
}

// Thresholds carried over from the benchmark's predicate definitions.
const UP_HEIGHT: f64 = 1.0;
const STACK_XY_THRESHOLD: f64 = 0.02;
const STACK_Z_MIN_GAP: f64 = 0.001;
const STACK_Z_MAX_GAP: f64 = 0.5;
const OPEN_RATIO_TOLERANCE: f64 = 0.2;
const STAIRCASE_MIN_RATIO: f64 = 0.1;
const UPSIDE_DOWN_Z: f64 = -0.95;
const UPRIGHT_Z: f64 = 0.9;
const ON_CENTRE_XY_THRESHOLD: f64 = 0.005;
const ABOVE_XY_THRESHOLD: f64 = 0.02;

/// The closed set of predicates shipped with the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinPredicate {
    True,
    False,
    InContact,
    In,
    On,
    RelaxedOn,
    Up,
    StackBowl,
    PrintJointState,
    Open,
    Close,
    OpenRatio,
    StairCase,
    InAir,
    TurnOn,
    TurnOff,
    UpsideDown,
    Upright,
    AxisAlignedWithin,
    Under,
    PosiGreaterThan,
    PositionWithin,
    OnCentre,
    Above,
    Between,
}

impl BuiltinPredicate {
    pub const ALL: [BuiltinPredicate; 25] = [
        BuiltinPredicate::True,
        BuiltinPredicate::False,
        BuiltinPredicate::InContact,
        BuiltinPredicate::In,
        BuiltinPredicate::On,
        BuiltinPredicate::RelaxedOn,
        BuiltinPredicate::Up,
        BuiltinPredicate::StackBowl,
        BuiltinPredicate::PrintJointState,
        BuiltinPredicate::Open,
        BuiltinPredicate::Close,
        BuiltinPredicate::OpenRatio,
        BuiltinPredicate::StairCase,
        BuiltinPredicate::InAir,
        BuiltinPredicate::TurnOn,
        BuiltinPredicate::TurnOff,
        BuiltinPredicate::UpsideDown,
        BuiltinPredicate::Upright,
        BuiltinPredicate::AxisAlignedWithin,
        BuiltinPredicate::Under,
        BuiltinPredicate::PosiGreaterThan,
        BuiltinPredicate::PositionWithin,
        BuiltinPredicate::OnCentre,
        BuiltinPredicate::Above,
        BuiltinPredicate::Between,
    ];

    /// Registry key (lower-case).
    pub fn name(self) -> &'static str {
        match self {
            BuiltinPredicate::True => "true",
            BuiltinPredicate::False => "false",
            BuiltinPredicate::InContact => "incontact",
            BuiltinPredicate::In => "in",
            BuiltinPredicate::On => "on",
            BuiltinPredicate::RelaxedOn => "relaxedon",
            BuiltinPredicate::Up => "up",
            BuiltinPredicate::StackBowl => "stackbowl",
            BuiltinPredicate::PrintJointState => "printjointstate",
            BuiltinPredicate::Open => "open",
            BuiltinPredicate::Close => "close",
            BuiltinPredicate::OpenRatio => "openratio",
            BuiltinPredicate::StairCase => "staircase",
            BuiltinPredicate::InAir => "inair",
            BuiltinPredicate::TurnOn => "turnon",
            BuiltinPredicate::TurnOff => "turnoff",
            BuiltinPredicate::UpsideDown => "upsidedown",
            BuiltinPredicate::Upright => "upright",
            BuiltinPredicate::AxisAlignedWithin => "axisalignedwithin",
            BuiltinPredicate::Under => "under",
            BuiltinPredicate::PosiGreaterThan => "posigreaterthan",
            BuiltinPredicate::PositionWithin => "positionwithin",
            BuiltinPredicate::OnCentre => "oncentre",
            BuiltinPredicate::Above => "above",
            BuiltinPredicate::Between => "between",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.to_lowercase();
        Self::ALL.into_iter().find(|p| p.name() == key)
    }

    pub fn signature(self) -> Signature {
        use ArgKind::{Axis as A, Number as N, Object as O};
        match self {
            BuiltinPredicate::True | BuiltinPredicate::False => Signature::Variadic,
            BuiltinPredicate::InContact
            | BuiltinPredicate::In
            | BuiltinPredicate::On
            | BuiltinPredicate::RelaxedOn
            | BuiltinPredicate::StackBowl
            | BuiltinPredicate::Under
            | BuiltinPredicate::OnCentre
            | BuiltinPredicate::Above => Signature::objects(2),
            BuiltinPredicate::Up
            | BuiltinPredicate::PrintJointState
            | BuiltinPredicate::Open
            | BuiltinPredicate::Close
            | BuiltinPredicate::TurnOn
            | BuiltinPredicate::TurnOff
            | BuiltinPredicate::UpsideDown
            | BuiltinPredicate::Upright => Signature::objects(1),
            BuiltinPredicate::StairCase => Signature::objects(3),
            BuiltinPredicate::OpenRatio | BuiltinPredicate::InAir => Signature::Fixed(vec![O, N]),
            BuiltinPredicate::AxisAlignedWithin => Signature::Fixed(vec![O, A, N, N]),
            BuiltinPredicate::PosiGreaterThan => Signature::Fixed(vec![O, A, N]),
            BuiltinPredicate::PositionWithin => Signature::Fixed(vec![O, N, N, N, N, N, N]),
            BuiltinPredicate::Between => Signature::Fixed(vec![O, O, O, A]),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuiltinPredicate::True => "always holds",
            BuiltinPredicate::False => "never holds",
            BuiltinPredicate::InContact => "the two objects touch",
            BuiltinPredicate::In => "first object is inside and touching the second",
            BuiltinPredicate::On => "first object rests on the second, centred within 3cm",
            BuiltinPredicate::RelaxedOn => "first object rests on the second, any alignment",
            BuiltinPredicate::Up => "object is lifted to at least 1.0m",
            BuiltinPredicate::StackBowl => "objects touch, are aligned in xy and vertically stacked",
            BuiltinPredicate::PrintJointState => "logs the joint state and holds",
            BuiltinPredicate::Open => "articulated object is open",
            BuiltinPredicate::Close => "articulated object is closed",
            BuiltinPredicate::OpenRatio => "open ratio within 0.2 of the expected ratio",
            BuiltinPredicate::StairCase => "three drawers opened in increasing amounts",
            BuiltinPredicate::InAir => "object is above the given height",
            BuiltinPredicate::TurnOn => "switchable object is on",
            BuiltinPredicate::TurnOff => "switchable object is off",
            BuiltinPredicate::UpsideDown => "object's z-axis points down",
            BuiltinPredicate::Upright => "object's z-axis points up",
            BuiltinPredicate::AxisAlignedWithin => "body axis within [min, max] degrees of world z",
            BuiltinPredicate::Under => "first object is not higher than the second",
            BuiltinPredicate::PosiGreaterThan => "position along axis exceeds the value",
            BuiltinPredicate::PositionWithin => "position within per-axis thresholds of a point",
            BuiltinPredicate::OnCentre => "first object sits on the centre of the second",
            BuiltinPredicate::Above => "first object is above the second, aligned in xy",
            BuiltinPredicate::Between => "middle object lies between the outer two along axis",
        }
    }

    /// Evaluate against already-resolved arguments.
    pub fn evaluate(self, args: &[Arg<'_>]) -> EvalResult<bool> {
        let name = self.name();
        if !self.signature().accepts_arity(args.len()) {
            return Err(EvalError::ArityMismatch {
                predicate: name.to_string(),
                expected: self.signature().arity_label(),
                actual: args.len(),
            });
        }
        let obj = |i: usize| object_arg(name, args, i);
        let num = |i: usize| number_arg(name, args, i);
        let axis = |i: usize| axis_arg(name, args, i);

        let result = match self {
            BuiltinPredicate::True => true,
            BuiltinPredicate::False => false,
            BuiltinPredicate::InContact => obj(0)?.check_contact(obj(1)?),
            BuiltinPredicate::In => {
                let (inner, outer) = (obj(0)?, obj(1)?);
                outer.check_contact(inner) && outer.check_contain(inner)
            }
            BuiltinPredicate::On => obj(1)?.check_ontop(obj(0)?, DEFAULT_ONTOP_XY_THRESHOLD),
            BuiltinPredicate::RelaxedOn => obj(1)?.check_ontop(obj(0)?, f64::INFINITY),
            BuiltinPredicate::Up => obj(0)?.geom_state().pos[2] >= UP_HEIGHT,
            BuiltinPredicate::StackBowl => {
                let (a, b) = (obj(0)?, obj(1)?);
                let (p1, p2) = (a.geom_state().pos, b.geom_state().pos);
                let horizontally_aligned = (p1[0] - p2[0]).abs() < STACK_XY_THRESHOLD
                    && (p1[1] - p2[1]).abs() < STACK_XY_THRESHOLD;
                let gap = (p1[2] - p2[2]).abs();
                let vertical_stack = STACK_Z_MIN_GAP < gap && gap < STACK_Z_MAX_GAP;
                a.check_contact(b) && horizontally_aligned && vertical_stack
            }
            BuiltinPredicate::PrintJointState => {
                let target = obj(0)?;
                info!(object = target.name(), joints = ?target.joint_state(), "joint state");
                true
            }
            BuiltinPredicate::Open => obj(0)?.is_open(),
            BuiltinPredicate::Close => obj(0)?.is_close(),
            BuiltinPredicate::OpenRatio => {
                (obj(0)?.open_ratio() - num(1)?).abs() < OPEN_RATIO_TOLERANCE
            }
            BuiltinPredicate::StairCase => {
                let (r1, r2, r3) = (obj(0)?.open_ratio(), obj(1)?.open_ratio(), obj(2)?.open_ratio());
                r1 > STAIRCASE_MIN_RATIO && r1 < r2 && r2 < r3
            }
            BuiltinPredicate::InAir => obj(0)?.geom_state().pos[2] > num(1)?,
            BuiltinPredicate::TurnOn => obj(0)?.turn_on(),
            BuiltinPredicate::TurnOff => obj(0)?.turn_off(),
            BuiltinPredicate::UpsideDown => {
                obj(0)?.geom_state().quat.axis(Axis::Z)[2] < UPSIDE_DOWN_Z
            }
            BuiltinPredicate::Upright => obj(0)?.geom_state().quat.axis(Axis::Z)[2] >= UPRIGHT_Z,
            BuiltinPredicate::AxisAlignedWithin => {
                let (target, body_axis) = (obj(0)?, axis(1)?);
                let (min_deg, max_deg) = (num(2)?, num(3)?);
                if !(0.0..=180.0).contains(&min_deg) || !(min_deg..=180.0).contains(&max_deg) {
                    return Err(EvalError::InvalidArgument {
                        predicate: name.to_string(),
                        message: "Degrees must satisfy 0 <= min_deg <= max_deg <= 180".to_string(),
                    });
                }
                let cos_min = min_deg.to_radians().cos();
                let cos_max = max_deg.to_radians().cos();
                let cos_angle = target.geom_state().quat.axis(body_axis)[2];
                cos_max <= cos_angle && cos_angle <= cos_min
            }
            BuiltinPredicate::Under => {
                obj(0)?.geom_state().pos[2] <= obj(1)?.geom_state().pos[2]
            }
            BuiltinPredicate::PosiGreaterThan => {
                obj(0)?.geom_state().pos[axis(1)?.index()] > num(2)?
            }
            BuiltinPredicate::PositionWithin => {
                let pos = obj(0)?.geom_state().pos;
                let target = [num(1)?, num(2)?, num(3)?];
                let tolerance = [num(4)?, num(5)?, num(6)?];
                (0..3).all(|i| (pos[i] - target[i]).abs() <= tolerance[i])
            }
            BuiltinPredicate::OnCentre => {
                let (top, base) = (obj(0)?, obj(1)?);
                let (top_geom, base_geom) = (top.geom_state(), base.geom_state());
                base_geom.pos[2] <= top_geom.pos[2]
                    && base.check_contact(top)
                    && base_geom.xy_distance(&top_geom) < ON_CENTRE_XY_THRESHOLD
            }
            BuiltinPredicate::Above => {
                let (p1, p2) = (obj(0)?.geom_state().pos, obj(1)?.geom_state().pos);
                (p1[0] - p2[0]).abs() < ABOVE_XY_THRESHOLD
                    && (p1[1] - p2[1]).abs() < ABOVE_XY_THRESHOLD
                    && p1[2] > p2[2]
            }
            BuiltinPredicate::Between => {
                let (left, middle, right) = (obj(0)?, obj(1)?, obj(2)?);
                let i = axis(3)?.index();
                let (l, m, r) = (
                    left.geom_state().pos[i],
                    middle.geom_state().pos[i],
                    right.geom_state().pos[i],
                );
                ((l < m && m < r) || (r < m && m < l))
                    && left.check_contact(middle)
                    && middle.check_contact(right)
            }
        };
        Ok(result)
    }
}

impl fmt::Display for BuiltinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
