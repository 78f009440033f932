//! Dynamically shaped payloads and case values

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::table::{EnumTable, Method};
use crate::unit::Unit;

/// Payload of a dynamically constructed case.
///
/// `Unit` is the sentinel for cases without a payload and is distinct from
/// both `Null` and an empty `Object`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Case(Box<CaseValue>),
}

impl Value {
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn object<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn empty_object() -> Self {
        Value::Object(BTreeMap::new())
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Tuple(_) => "tuple",
            Value::Object(_) => "object",
            Value::Case(_) => "case",
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    /// Looks up a field by key.
    ///
    /// Tuples answer to their decimal indices, so `("x", 7)` and
    /// `{"0": "x", "1": 7}` are read the same way.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            Value::Tuple(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    pub fn index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Tuple(items) => items.get(index),
            Value::Object(fields) => fields.get(&index.to_string()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_case(&self) -> Option<&CaseValue> {
        match self {
            Value::Case(case) => Some(case),
            _ => None,
        }
    }
}

impl From<Unit> for Value {
    fn from(_: Unit) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }
}

impl From<CaseValue> for Value {
    fn from(case: CaseValue) -> Self {
        Value::Case(Box::new(case))
    }
}

/// One constructed member of a dynamic enum.
///
/// The tag and payload are fixed at construction; the only way to get a
/// different case is to construct a new value. Equality compares tag and
/// payload structurally and ignores which table produced the value.
#[derive(Clone)]
pub struct CaseValue {
    case: Arc<str>,
    payload: Value,
    table: EnumTable,
}

impl CaseValue {
    pub(crate) fn new(case: Arc<str>, payload: Value, table: EnumTable) -> Self {
        CaseValue {
            case,
            payload,
            table,
        }
    }

    pub fn case(&self) -> &str {
        &self.case
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    pub fn is_unit(&self) -> bool {
        self.payload.is_unit()
    }

    pub fn table(&self) -> &EnumTable {
        &self.table
    }

    pub fn belongs_to(&self, table: &EnumTable) -> bool {
        self.table.ptr_eq(table)
    }

    /// Returns the payload if this value is the `expected` case.
    pub fn narrow(&self, expected: &str) -> Result<&Value> {
        if &*self.case == expected {
            Ok(&self.payload)
        } else {
            Err(Error::CaseMismatch {
                expected: expected.to_owned(),
                found: self.case.to_string(),
            })
        }
    }

    /// The shared behavior method registered under `name`.
    pub fn method(&self, name: &str) -> Result<&Method> {
        self.table.method(name)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = self.table.method(name)?;
        method(&self.table, self, args)
    }
}

impl PartialEq for CaseValue {
    fn eq(&self, other: &Self) -> bool {
        self.case == other.case && self.payload == other.payload
    }
}

impl fmt::Debug for CaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseValue")
            .field("case", &&*self.case)
            .field("payload", &self.payload)
            .finish()
    }
}
