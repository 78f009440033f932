//! Runtime enum factory for case sets known only at run time
//!
//! [`EnumTable`] is the dynamic counterpart of the `make_enum!` macro: a
//! finite table of case constructors, an optional set of statics and a shared
//! behavior table, all fixed when [`EnumBuilder::build`] succeeds.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::case::Registry;
use crate::error::{Error, Result};
use crate::value::{CaseValue, Value};

/// Behavior method shared by every value of one table.
///
/// Methods receive the finished table explicitly, so they can construct
/// sibling cases without holding a reference back into the table.
pub type Method = Arc<dyn Fn(&EnumTable, &CaseValue, &[Value]) -> Result<Value> + Send + Sync>;

/// Static function attached to a table.
pub type StaticFn = Arc<dyn Fn(&EnumTable, &[Value]) -> Result<Value> + Send + Sync>;

/// Declared shape of a case's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// No payload; the value carries the [`Value::Unit`] sentinel.
    Unit,
    /// A single value of any kind.
    Value,
    /// An object with at least one required field.
    Object,
    /// An object whose fields are all optional; constructible with no argument.
    OptionalObject,
    /// A positional tuple of the given length.
    Tuple(usize),
}

impl PayloadShape {
    /// Largest number of arguments the constructor accepts.
    pub fn max_args(self) -> usize {
        match self {
            PayloadShape::Unit => 0,
            PayloadShape::Value | PayloadShape::Object | PayloadShape::OptionalObject => 1,
            PayloadShape::Tuple(len) => len.max(1),
        }
    }

    fn describe(self) -> String {
        match self {
            PayloadShape::Unit => "no".to_owned(),
            PayloadShape::Value => "a".to_owned(),
            PayloadShape::Object | PayloadShape::OptionalObject => "an object".to_owned(),
            PayloadShape::Tuple(len) => format!("a {len}-tuple"),
        }
    }

    fn accept(self, case: &str, arg: &Value) -> Result<Value> {
        let mismatch = || Error::PayloadMismatch {
            case: case.to_owned(),
            expected: self.describe(),
            found: arg.kind(),
        };

        // `Unit` marks a case without payload and never travels as one
        if arg.is_unit() {
            return Err(mismatch());
        }

        match self {
            PayloadShape::Unit => Err(mismatch()),
            PayloadShape::Value => Ok(arg.clone()),
            PayloadShape::Object | PayloadShape::OptionalObject => match arg {
                Value::Object(_) => Ok(arg.clone()),
                _ => Err(mismatch()),
            },
            PayloadShape::Tuple(len) => match arg {
                Value::Tuple(items) if items.len() == len => Ok(arg.clone()),
                _ if len == 1 => Ok(Value::Tuple(vec![arg.clone()])),
                _ => Err(mismatch()),
            },
        }
    }
}

/// A static member of a table.
#[derive(Clone)]
pub enum Static {
    Value(Value),
    Function(StaticFn),
}

impl fmt::Debug for Static {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Static::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Static::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Result of looking a name up on a table.
#[derive(Debug)]
pub enum Member<'a> {
    Static(&'a Static),
    Constructor(Constructor),
}

/// Constructor for one case of a table.
#[derive(Debug, Clone)]
pub struct Constructor {
    table: EnumTable,
    index: usize,
}

impl Constructor {
    pub fn case(&self) -> &str {
        &self.table.inner.cases[self.index].name
    }

    pub fn shape(&self) -> PayloadShape {
        self.table.inner.cases[self.index].shape
    }

    pub fn call(&self, args: &[Value]) -> Result<CaseValue> {
        self.table.construct_at(self.index, args)
    }
}

struct CaseDecl {
    name: Arc<str>,
    shape: PayloadShape,
}

struct TableInner {
    name: String,
    cases: Vec<CaseDecl>,
    registry: Registry,
    proto: BTreeMap<String, Method>,
    statics: BTreeMap<String, Static>,
}

/// A finished enum: constructors, statics and behavior.
///
/// Cloning is cheap and every clone refers to the same table.
#[derive(Clone)]
pub struct EnumTable {
    inner: Arc<TableInner>,
}

impl EnumTable {
    pub fn builder(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder {
            name: name.into(),
            cases: Vec::new(),
            methods: Vec::new(),
            statics: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The case registry: every declared case name mapped to itself.
    pub fn cases(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn shape(&self, case: &str) -> Result<PayloadShape> {
        self.index_of(case).map(|index| self.inner.cases[index].shape)
    }

    /// Resolves `name` to a static member or a case constructor.
    ///
    /// Statics are consulted first; a table can never hold a static and a
    /// case with the same name.
    pub fn get(&self, name: &str) -> Result<Member<'_>> {
        if let Some(member) = self.inner.statics.get(name) {
            return Ok(Member::Static(member));
        }
        self.constructor(name).map(Member::Constructor)
    }

    pub fn constructor(&self, case: &str) -> Result<Constructor> {
        let index = self.index_of(case)?;
        Ok(Constructor {
            table: self.clone(),
            index,
        })
    }

    /// Builds a value of `case` from the constructor arguments.
    ///
    /// ```
    /// use make_enum::{EnumTable, PayloadShape, Value};
    ///
    /// let table = EnumTable::builder("Pair")
    ///     .case("Both", PayloadShape::Tuple(2))
    ///     .build()
    ///     .unwrap();
    ///
    /// let positional = table.construct("Both", &[Value::from("x"), Value::from(7)]).unwrap();
    /// let packed = table
    ///     .construct("Both", &[Value::tuple([Value::from("x"), Value::from(7)])])
    ///     .unwrap();
    /// assert_eq!(positional, packed);
    /// ```
    pub fn construct(&self, case: &str, args: &[Value]) -> Result<CaseValue> {
        let index = self.index_of(case)?;
        self.construct_at(index, args)
    }

    pub fn static_value(&self, name: &str) -> Result<&Value> {
        match self.lookup_static(name)? {
            Static::Value(value) => Ok(value),
            Static::Function(_) => Err(Error::NotAValue(name.to_owned())),
        }
    }

    pub fn call_static(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.lookup_static(name)? {
            Static::Function(function) => function(self, args),
            Static::Value(_) => Err(Error::NotCallable(name.to_owned())),
        }
    }

    pub fn method(&self, name: &str) -> Result<&Method> {
        self.inner
            .proto
            .get(name)
            .ok_or_else(|| Error::UnknownMethod {
                enum_name: self.inner.name.clone(),
                name: name.to_owned(),
            })
    }

    pub fn ptr_eq(&self, other: &EnumTable) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lookup_static(&self, name: &str) -> Result<&Static> {
        self.inner
            .statics
            .get(name)
            .ok_or_else(|| Error::UnknownStatic {
                enum_name: self.inner.name.clone(),
                name: name.to_owned(),
            })
    }

    fn index_of(&self, case: &str) -> Result<usize> {
        self.inner
            .cases
            .iter()
            .position(|decl| &*decl.name == case)
            .ok_or_else(|| Error::UnknownCase {
                enum_name: self.inner.name.clone(),
                name: case.to_owned(),
            })
    }

    fn construct_at(&self, index: usize, args: &[Value]) -> Result<CaseValue> {
        let decl = &self.inner.cases[index];
        let too_many = || Error::TooManyArguments {
            case: decl.name.to_string(),
            expected: decl.shape.max_args(),
            got: args.len(),
        };

        let payload = match (decl.shape, args) {
            (PayloadShape::Unit, []) => Value::Unit,
            (PayloadShape::Unit, _) => return Err(too_many()),
            (PayloadShape::OptionalObject, []) => Value::empty_object(),
            (PayloadShape::Tuple(0), []) => Value::Tuple(Vec::new()),
            (_, []) => return Err(Error::MissingPayload(decl.name.to_string())),
            (shape, [arg]) => shape.accept(&decl.name, arg)?,
            (PayloadShape::Tuple(len), args) if args.len() == len => Value::Tuple(args.to_vec()),
            _ => return Err(too_many()),
        };

        Ok(CaseValue::new(decl.name.clone(), payload, self.clone()))
    }
}

impl fmt::Debug for EnumTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumTable")
            .field("name", &self.inner.name)
            .field("cases", &self.inner.registry)
            .field("methods", &self.inner.proto.keys().collect::<Vec<_>>())
            .field("statics", &self.inner.statics)
            .finish()
    }
}

/// Collects the declaration of an [`EnumTable`].
///
/// Every configuration (cases only, with behavior, with statics, or both)
/// goes through the same [`build`](EnumBuilder::build).
pub struct EnumBuilder {
    name: String,
    cases: Vec<(String, PayloadShape)>,
    methods: Vec<(String, Method)>,
    statics: Vec<(String, Static)>,
}

impl EnumBuilder {
    pub fn case(mut self, name: impl Into<String>, shape: PayloadShape) -> Self {
        self.cases.push((name.into(), shape));
        self
    }

    pub fn unit(self, name: impl Into<String>) -> Self {
        self.case(name, PayloadShape::Unit)
    }

    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&EnumTable, &CaseValue, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let method: Method = Arc::new(method);
        self.methods.push((name.into(), method));
        self
    }

    pub fn static_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.push((name.into(), Static::Value(value.into())));
        self
    }

    pub fn static_fn<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&EnumTable, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let function: StaticFn = Arc::new(function);
        self.statics.push((name.into(), Static::Function(function)));
        self
    }

    pub fn build(self) -> Result<EnumTable> {
        let EnumBuilder {
            name,
            cases,
            methods,
            statics,
        } = self;

        check_name(&name)?;
        if cases.is_empty() {
            return Err(Error::NoCases(name));
        }

        let mut decls: Vec<CaseDecl> = Vec::with_capacity(cases.len());
        for (case, shape) in cases {
            check_name(&case)?;
            if decls.iter().any(|decl| *decl.name == *case) {
                return Err(Error::DuplicateCase {
                    enum_name: name,
                    name: case,
                });
            }
            decls.push(CaseDecl {
                name: case.into(),
                shape,
            });
        }

        let mut proto = BTreeMap::new();
        for (method, function) in methods {
            check_name(&method)?;
            if proto.contains_key(&method) {
                return Err(Error::DuplicateMethod {
                    enum_name: name,
                    name: method,
                });
            }
            proto.insert(method, function);
        }

        let mut table_statics = BTreeMap::new();
        for (member, value) in statics {
            check_name(&member)?;
            if decls.iter().any(|decl| *decl.name == *member) {
                return Err(Error::StaticCollision {
                    enum_name: name,
                    name: member,
                });
            }
            if table_statics.contains_key(&member) {
                return Err(Error::DuplicateStatic {
                    enum_name: name,
                    name: member,
                });
            }
            table_statics.insert(member, value);
        }

        let registry = Registry::from_owned(decls.iter().map(|decl| decl.name.to_string()));

        Ok(EnumTable {
            inner: Arc::new(TableInner {
                name,
                cases: decls,
                registry,
                proto,
                statics: table_statics,
            }),
        })
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(Error::InvalidName(name.to_owned()));
    }
    Ok(())
}
