//! Built-in functions, keyed by the library package that declares them and
//! their operator or function name.
//!
//! Every built-in receives its arguments already evaluated, one
//! [`Sequence`] per argument. An empty argument where a single value is
//! expected propagates as an empty result; several values, or a value of
//! the wrong type, fail with [`EvalError::TypeMismatch`]. The short-circuit
//! operators (`and`, `or`, `implies`, `??`, `if`) need their operands
//! unevaluated and are handled by the evaluator itself.

use std::cmp::Ordering;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use super::error::EvalError;
use super::range::IntRange;
use super::value::{Sequence, Value};

pub type BuiltinFn = fn(&str, &[Sequence]) -> Result<Sequence, EvalError>;

pub const DATA_FUNCTIONS: &str = "DataFunctions";
pub const BASE_FUNCTIONS: &str = "BaseFunctions";
pub const BOOLEAN_FUNCTIONS: &str = "BooleanFunctions";
pub const STRING_FUNCTIONS: &str = "StringFunctions";
pub const SEQUENCE_FUNCTIONS: &str = "SequenceFunctions";
pub const NUMERICAL_FUNCTIONS: &str = "NumericalFunctions";
pub const INTEGER_FUNCTIONS: &str = "IntegerFunctions";

const BUILTINS: &[(&str, &str, BuiltinFn)] = &[
    (DATA_FUNCTIONS, "+", add),
    (DATA_FUNCTIONS, "-", sub),
    (DATA_FUNCTIONS, "*", mul),
    (DATA_FUNCTIONS, "/", div),
    (DATA_FUNCTIONS, "%", rem),
    (DATA_FUNCTIONS, "^", pow),
    (DATA_FUNCTIONS, "**", pow),
    (DATA_FUNCTIONS, "<", compare),
    (DATA_FUNCTIONS, ">", compare),
    (DATA_FUNCTIONS, "<=", compare),
    (DATA_FUNCTIONS, ">=", compare),
    (DATA_FUNCTIONS, "max", max),
    (DATA_FUNCTIONS, "min", min),
    (BASE_FUNCTIONS, "==", equals),
    (BASE_FUNCTIONS, "!=", equals),
    (BASE_FUNCTIONS, "===", same),
    (BASE_FUNCTIONS, "!==", same),
    (BASE_FUNCTIONS, "ToString", to_string),
    (BOOLEAN_FUNCTIONS, "not", not),
    (BOOLEAN_FUNCTIONS, "xor", logical),
    (BOOLEAN_FUNCTIONS, "&", logical),
    (BOOLEAN_FUNCTIONS, "|", logical),
    (STRING_FUNCTIONS, "Length", length),
    (STRING_FUNCTIONS, "Substring", substring),
    (SEQUENCE_FUNCTIONS, "size", size),
    (SEQUENCE_FUNCTIONS, "isEmpty", is_empty),
    (SEQUENCE_FUNCTIONS, "notEmpty", is_empty),
    (SEQUENCE_FUNCTIONS, "includes", includes),
    (SEQUENCE_FUNCTIONS, "excludes", includes),
    (SEQUENCE_FUNCTIONS, "head", head),
    (SEQUENCE_FUNCTIONS, "last", last),
    (SEQUENCE_FUNCTIONS, "tail", tail),
    (SEQUENCE_FUNCTIONS, "#", index),
    (NUMERICAL_FUNCTIONS, "abs", abs),
    (NUMERICAL_FUNCTIONS, "sum", sum),
    (NUMERICAL_FUNCTIONS, "max", max),
    (NUMERICAL_FUNCTIONS, "min", min),
    (INTEGER_FUNCTIONS, "..", range),
    (INTEGER_FUNCTIONS, "Range", range),
];

/// A registered built-in function.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub package: &'static str,
    pub name: &'static str,
    imp: BuiltinFn,
}

impl Builtin {
    pub fn call(&self, args: &[Sequence]) -> Result<Sequence, EvalError> {
        (self.imp)(self.name, args)
    }
}

/// Static table of built-ins.
#[derive(Debug)]
pub struct Registry {
    by_key: FxHashMap<(&'static str, &'static str), Builtin>,
    /// First registration of each bare name.
    by_name: FxHashMap<&'static str, Builtin>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let mut by_key = FxHashMap::default();
    let mut by_name = FxHashMap::default();
    for &(package, name, imp) in BUILTINS {
        let builtin = Builtin { package, name, imp };
        by_key.insert((package, name), builtin);
        by_name.entry(name).or_insert(builtin);
    }
    Registry { by_key, by_name }
});

pub fn registry() -> &'static Registry {
    &REGISTRY
}

impl Registry {
    pub fn get(&self, package: &str, name: &str) -> Option<&Builtin> {
        self.by_key
            .iter()
            .find(|((p, n), _)| *p == package && *n == name)
            .map(|(_, builtin)| builtin)
    }

    /// Look a function up by name alone, for calls whose callee does not
    /// resolve to a library declaration.
    pub fn by_name(&self, name: &str) -> Option<&Builtin> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

// ============================================================================
// ARGUMENT HELPERS
// ============================================================================

fn arity(name: &str, args: &[Sequence], allowed: &[usize], expected: &'static str) -> Result<(), EvalError> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(EvalError::ArgumentCount {
            name: name.into(),
            expected,
            found: args.len(),
        })
    }
}

/// The single value of an argument, `None` for an empty argument.
fn scalar(name: &str, arg: &Sequence) -> Result<Option<Value>, EvalError> {
    match arg.len() {
        0 => Ok(None),
        1 => Ok(arg.first()),
        n => Err(EvalError::mismatch(name, format!("expected a single value, got {n}"))),
    }
}

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Real(f64),
}

impl Num {
    fn real(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Real(r) => r,
        }
    }
}

impl From<Num> for Value {
    fn from(n: Num) -> Self {
        match n {
            Num::Int(i) => Value::Int(i),
            Num::Real(r) => Value::Real(r),
        }
    }
}

fn number(name: &str, value: &Value) -> Result<Num, EvalError> {
    match value {
        Value::Int(i) => Ok(Num::Int(*i)),
        Value::Real(r) => Ok(Num::Real(*r)),
        Value::Ref(_) => Err(EvalError::NotEvaluable(name.to_string())),
        other => Err(EvalError::mismatch(
            name,
            format!("expected a number, got {}", other.type_name()),
        )),
    }
}

fn boolean(name: &str, value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Ref(_) => Err(EvalError::NotEvaluable(name.to_string())),
        other => Err(EvalError::mismatch(
            name,
            format!("expected a Boolean, got {}", other.type_name()),
        )),
    }
}

fn integer(name: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Ref(_) => Err(EvalError::NotEvaluable(name.to_string())),
        other => Err(EvalError::mismatch(
            name,
            format!("expected an Integer, got {}", other.type_name()),
        )),
    }
}

/// Both operands of a binary function, or `None` if either is empty.
fn pair(name: &str, args: &[Sequence]) -> Result<Option<(Value, Value)>, EvalError> {
    arity(name, args, &[2], "2")?;
    let lhs = scalar(name, &args[0])?;
    let rhs = scalar(name, &args[1])?;
    Ok(lhs.zip(rhs))
}

fn overflow(name: &str) -> EvalError {
    EvalError::Overflow(name.into())
}

// ============================================================================
// ARITHMETIC
// ============================================================================

fn unary_numeric(
    name: &str,
    arg: &Sequence,
    op: fn(Num) -> Option<Num>,
) -> Result<Sequence, EvalError> {
    let Some(value) = scalar(name, arg)? else {
        return Ok(Sequence::empty());
    };
    let n = number(name, &value)?;
    let result = op(n).ok_or_else(|| overflow(name))?;
    Ok(Sequence::single(result))
}

fn binary_numeric(
    name: &str,
    lhs: &Value,
    rhs: &Value,
    int: fn(i64, i64) -> Option<i64>,
    real: fn(f64, f64) -> f64,
) -> Result<Sequence, EvalError> {
    let result = match (number(name, lhs)?, number(name, rhs)?) {
        (Num::Int(a), Num::Int(b)) => Value::Int(int(a, b).ok_or_else(|| overflow(name))?),
        (a, b) => Value::Real(real(a.real(), b.real())),
    };
    Ok(Sequence::single(result))
}

fn add(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    if args.len() == 1 {
        return unary_numeric(name, &args[0], Some);
    }
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    match (&lhs, &rhs) {
        (Value::String(a), Value::String(b)) => Ok(Sequence::single(Value::String(
            format!("{a}{b}").into(),
        ))),
        (Value::String(_), _) | (_, Value::String(_)) => Err(EvalError::mismatch(
            name,
            format!("cannot add {} and {}", lhs.type_name(), rhs.type_name()),
        )),
        _ => binary_numeric(name, &lhs, &rhs, i64::checked_add, |a, b| a + b),
    }
}

fn sub(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    if args.len() == 1 {
        return unary_numeric(name, &args[0], |n| match n {
            Num::Int(i) => i.checked_neg().map(Num::Int),
            Num::Real(r) => Some(Num::Real(-r)),
        });
    }
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    binary_numeric(name, &lhs, &rhs, i64::checked_sub, |a, b| a - b)
}

fn mul(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    binary_numeric(name, &lhs, &rhs, i64::checked_mul, |a, b| a * b)
}

/// Integer division stays integral when exact and yields a real otherwise.
fn div(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    let (a, b) = (number(name, &lhs)?, number(name, &rhs)?);
    if b.real() == 0.0 {
        return Err(EvalError::DivisionByZero(name.into()));
    }
    let result = match (a, b) {
        (Num::Int(a), Num::Int(b)) if a.checked_rem(b) == Some(0) => {
            Value::Int(a.checked_div(b).ok_or_else(|| overflow(name))?)
        }
        (a, b) => Value::Real(a.real() / b.real()),
    };
    Ok(Sequence::single(result))
}

fn rem(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    if number(name, &rhs)?.real() == 0.0 {
        return Err(EvalError::DivisionByZero(name.into()));
    }
    binary_numeric(name, &lhs, &rhs, i64::checked_rem, |a, b| a % b)
}

fn pow(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    let result = match (number(name, &lhs)?, number(name, &rhs)?) {
        (Num::Int(base), Num::Int(exp)) if exp >= 0 => {
            Value::Int(checked_pow(base, exp).ok_or_else(|| overflow(name))?)
        }
        (base, exp) => Value::Real(base.real().powf(exp.real())),
    };
    Ok(Sequence::single(result))
}

/// Integer power by squaring; `None` on overflow.
fn checked_pow(mut base: i64, mut exp: i64) -> Option<i64> {
    let mut acc: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.checked_mul(base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base)?;
        }
    }
    Some(acc)
}

fn ordering(name: &str, lhs: &Value, rhs: &Value) -> Result<Ordering, EvalError> {
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        _ => {
            let (a, b) = (number(name, lhs)?.real(), number(name, rhs)?.real());
            a.partial_cmp(&b)
                .ok_or_else(|| EvalError::mismatch(name, "values are not comparable"))
        }
    }
}

fn compare(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    let ord = ordering(name, &lhs, &rhs)?;
    let result = match name {
        "<" => ord == Ordering::Less,
        ">" => ord == Ordering::Greater,
        "<=" => ord != Ordering::Greater,
        _ => ord != Ordering::Less,
    };
    Ok(Sequence::single(result))
}

/// Largest (`max`) or smallest (`min`) of two values or of one sequence.
fn extremum(name: &str, args: &[Sequence], want: Ordering) -> Result<Sequence, EvalError> {
    arity(name, args, &[1, 2], "1 or 2")?;
    let mut best: Option<Value> = None;
    for value in args.iter().flat_map(Sequence::iter) {
        best = Some(match best {
            Some(current) if ordering(name, &value, &current)? != want => current,
            _ => value,
        });
    }
    Ok(best.map(Sequence::single).unwrap_or_default())
}

fn max(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    extremum(name, args, Ordering::Greater)
}

fn min(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    extremum(name, args, Ordering::Less)
}

fn abs(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    unary_numeric(name, &args[0], |n| match n {
        Num::Int(i) => i.checked_abs().map(Num::Int),
        Num::Real(r) => Some(Num::Real(r.abs())),
    })
}

fn sum(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    let mut total = Num::Int(0);
    for value in args[0].iter() {
        total = match (total, number(name, &value)?) {
            (Num::Int(a), Num::Int(b)) => Num::Int(a.checked_add(b).ok_or_else(|| overflow(name))?),
            (a, b) => Num::Real(a.real() + b.real()),
        };
    }
    Ok(Sequence::single(total))
}

// ============================================================================
// EQUALITY AND LOGIC
// ============================================================================

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Real(b)) | (Value::Real(b), Value::Int(a)) => (*a as f64) == *b,
        _ => lhs == rhs,
    }
}

/// `==` and `!=` compare values, numbers across Integer and Real.
fn equals(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[2], "2")?;
    let equal = args[0].len() == args[1].len()
        && args[0].iter().zip(args[1].iter()).all(|(a, b)| values_equal(&a, &b));
    Ok(Sequence::single(if name == "==" { equal } else { !equal }))
}

/// `===` and `!==` also require the same kind of value; elements compare by
/// identity.
fn same(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[2], "2")?;
    let equal = args[0] == args[1];
    Ok(Sequence::single(if name == "===" { equal } else { !equal }))
}

fn to_string(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    Ok(scalar(name, &args[0])?
        .map(|v| Sequence::single(Value::String(v.to_string().into())))
        .unwrap_or_default())
}

fn not(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    let Some(value) = scalar(name, &args[0])? else {
        return Ok(Sequence::empty());
    };
    Ok(Sequence::single(!boolean(name, &value)?))
}

/// `&`, `|` and `xor`: both operands are always evaluated.
fn logical(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    let Some((lhs, rhs)) = pair(name, args)? else {
        return Ok(Sequence::empty());
    };
    let (a, b) = (boolean(name, &lhs)?, boolean(name, &rhs)?);
    let result = match name {
        "&" => a && b,
        "|" => a || b,
        _ => a != b,
    };
    Ok(Sequence::single(result))
}

// ============================================================================
// STRINGS
// ============================================================================

fn string<'v>(name: &str, value: &'v Value) -> Result<&'v str, EvalError> {
    value.as_str().ok_or_else(|| {
        EvalError::mismatch(name, format!("expected a String, got {}", value.type_name()))
    })
}

fn length(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    let Some(value) = scalar(name, &args[0])? else {
        return Ok(Sequence::empty());
    };
    let len = string(name, &value)?.chars().count();
    Ok(Sequence::single(len as i64))
}

/// `Substring(s, lo, hi)` with 1-based inclusive bounds.
fn substring(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[3], "3")?;
    let (Some(s), Some(lo), Some(hi)) = (
        scalar(name, &args[0])?,
        scalar(name, &args[1])?,
        scalar(name, &args[2])?,
    ) else {
        return Ok(Sequence::empty());
    };
    let chars: Vec<char> = string(name, &s)?.chars().collect();
    let (lo, hi) = (integer(name, &lo)?, integer(name, &hi)?);
    let len = chars.len();
    if lo < 1 || hi > len as i64 || lo > hi + 1 {
        return Err(EvalError::SubstringBounds { lo, hi, len });
    }
    let text: String = chars[(lo - 1) as usize..hi as usize].iter().collect();
    Ok(Sequence::single(Value::String(text.into())))
}

// ============================================================================
// SEQUENCES
// ============================================================================

fn size(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    let len = i64::try_from(args[0].len()).map_err(|_| overflow(name))?;
    Ok(Sequence::single(len))
}

fn is_empty(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    let empty = args[0].is_empty();
    Ok(Sequence::single(if name == "isEmpty" { empty } else { !empty }))
}

fn includes(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[2], "2")?;
    let included = match (args[0].as_range(), scalar(name, &args[1])?) {
        (Some(range), Some(Value::Int(i))) => range.contains(i),
        (_, Some(needle)) => args[0].iter().any(|v| values_equal(&v, &needle)),
        (_, None) => true,
    };
    Ok(Sequence::single(if name == "includes" { included } else { !included }))
}

fn head(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    Ok(args[0].first().map(Sequence::single).unwrap_or_default())
}

fn last(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    Ok(args[0].last().map(Sequence::single).unwrap_or_default())
}

fn tail(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[1], "1")?;
    Ok(args[0].tail())
}

/// `seq#(n)` and `seq[n]`: 1-based, empty when out of bounds.
fn index(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[2], "2")?;
    let Some(n) = scalar(name, &args[1])? else {
        return Ok(Sequence::empty());
    };
    let n = integer(name, &n)?;
    Ok(args[0].at(n).map(Sequence::single).unwrap_or_default())
}

/// `a..b` and `Range(start, stop[, step])`.
fn range(name: &str, args: &[Sequence]) -> Result<Sequence, EvalError> {
    arity(name, args, &[2, 3], "2 or 3")?;
    let mut bounds = [0i64; 3];
    bounds[2] = 1;
    for (slot, arg) in bounds.iter_mut().zip(args) {
        let Some(value) = scalar(name, arg)? else {
            return Ok(Sequence::empty());
        };
        *slot = integer(name, &value)?;
    }
    Ok(IntRange::with_step(bounds[0], bounds[1], bounds[2])?.into())
}
