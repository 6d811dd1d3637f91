//! Values and value sequences.

use std::fmt;

use smol_str::SmolStr;

use super::range::IntRange;
use crate::hir::ElementId;

/// A single model-level value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Real(f64),
    String(SmolStr),
    /// `*`, the unbounded upper limit of a multiplicity.
    Infinity,
    /// A model element, such as a feature without a bound value.
    Ref(ElementId),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Real(_) => "Real",
            Value::String(_) => "String",
            Value::Infinity => "Infinity",
            Value::Ref(_) => "element",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<ElementId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r:?}"),
            Value::String(s) => f.write_str(s),
            Value::Infinity => f.write_str("*"),
            Value::Ref(id) => write!(f, "{id}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

/// A run of a sequence: literal values, or a lazy integer range.
#[derive(Debug, Clone)]
enum Segment {
    Values(Vec<Value>),
    Range(IntRange),
}

impl Segment {
    fn len(&self) -> usize {
        match self {
            Segment::Values(values) => values.len(),
            Segment::Range(range) => range.len(),
        }
    }

    fn get(&self, index: usize) -> Option<Value> {
        match self {
            Segment::Values(values) => values.get(index).cloned(),
            Segment::Range(range) => range.at(i64::try_from(index).ok()?).map(Value::Int),
        }
    }

    fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        let (values, range) = match self {
            Segment::Values(values) => (Some(values.iter().cloned()), None),
            Segment::Range(range) => (None, Some(range.iter().map(Value::Int))),
        };
        values.into_iter().flatten().chain(range.into_iter().flatten())
    }
}

/// The result of an expression: an ordered, possibly empty sequence of
/// values. Integer ranges stay lazy until something needs their elements,
/// including after concatenation.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    /// Never holds an empty segment or two adjacent `Values` segments.
    segments: Vec<Segment>,
}

impl Sequence {
    pub fn empty() -> Self {
        Sequence {
            segments: Vec::new(),
        }
    }

    pub fn single(value: impl Into<Value>) -> Self {
        Sequence {
            segments: vec![Segment::Values(vec![value.into()])],
        }
    }

    fn from_segment(segment: Segment) -> Self {
        let mut seq = Sequence::empty();
        seq.push(segment);
        seq
    }

    fn push(&mut self, segment: Segment) {
        if segment.len() == 0 {
            return;
        }
        match (self.segments.last_mut(), segment) {
            (Some(Segment::Values(values)), Segment::Values(more)) => values.extend(more),
            (_, segment) => self.segments.push(segment),
        }
    }

    /// Number of values, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.segments
            .iter()
            .fold(0usize, |len, segment| len.saturating_add(segment.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Element at a 0-based index.
    pub fn get(&self, mut index: usize) -> Option<Value> {
        for segment in &self.segments {
            let len = segment.len();
            if index < len {
                return segment.get(index);
            }
            index -= len;
        }
        None
    }

    /// Element at a 1-based index, as `seq[n]` and `seq#(n)` address it.
    pub fn at(&self, index: i64) -> Option<Value> {
        if index < 1 {
            return None;
        }
        self.get(usize::try_from(index - 1).ok()?)
    }

    pub fn first(&self) -> Option<Value> {
        self.segments.first().and_then(|segment| segment.get(0))
    }

    pub fn last(&self) -> Option<Value> {
        let segment = self.segments.last()?;
        segment.get(segment.len().checked_sub(1)?)
    }

    /// The only value, if there is exactly one.
    pub fn single_value(&self) -> Option<Value> {
        if self.len() == 1 { self.get(0) } else { None }
    }

    /// The only value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        self.single_value().and_then(|v| v.as_bool())
    }

    /// The range this sequence consists of, if it is exactly one range.
    pub fn as_range(&self) -> Option<&IntRange> {
        match self.segments.as_slice() {
            [Segment::Range(range)] => Some(range),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.segments.iter().flat_map(Segment::iter)
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// This sequence followed by `other`. Ranges on either side stay lazy.
    pub fn concat(mut self, other: Sequence) -> Sequence {
        for segment in other.segments {
            self.push(segment);
        }
        self
    }

    /// Everything but the first value.
    pub fn tail(&self) -> Sequence {
        let mut segments = self.segments.iter();
        let mut tail = match segments.next() {
            Some(Segment::Values(values)) => Sequence::from(values[1..].to_vec()),
            Some(Segment::Range(range)) => Sequence::from(range.skip_first()),
            None => return Sequence::empty(),
        };
        for segment in segments {
            tail.push(segment.clone());
        }
        tail
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl From<Value> for Sequence {
    fn from(value: Value) -> Self {
        Sequence::single(value)
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(values: Vec<Value>) -> Self {
        Sequence::from_segment(Segment::Values(values))
    }
}

impl From<IntRange> for Sequence {
    fn from(range: IntRange) -> Self {
        Sequence::from_segment(Segment::Range(range))
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Sequence::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        let mut first = true;
        for segment in &self.segments {
            match segment {
                Segment::Range(range) => {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{}..{}", range.start(), range.stop())?;
                    if range.step() != 1 {
                        write!(f, " step {}", range.step())?;
                    }
                }
                Segment::Values(values) => {
                    for value in values {
                        if !first {
                            f.write_str(", ")?;
                        }
                        first = false;
                        write!(f, "{value}")?;
                    }
                }
            }
        }
        f.write_str(")")
    }
}
