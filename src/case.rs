//! Case registries and the traits implemented by generated enums

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

/// Error returned when parsing a case name that is not declared.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{name}` is not a case of `{enum_name}`")]
pub struct ParseCaseError {
    pub enum_name: &'static str,
    pub name: String,
}

/// Fieldless companion of a generated enum, one variant per declared case.
///
/// Implemented by `make_enum!` as `<Enum>Case`. It is the typed form of a case
/// name: build lookup tables keyed by it instead of string literals.
pub trait Case: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Every case, in declaration order.
    const ALL: &'static [Self];

    /// The case names, in declaration order.
    const NAMES: &'static [&'static str];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|case| case.name() == name)
    }

    fn registry() -> Registry {
        Registry::from_static(Self::NAMES)
    }
}

/// A value that belongs to exactly one declared case.
pub trait Tagged {
    type Case: Case;

    fn case(&self) -> Self::Case;

    fn case_name(&self) -> &'static str {
        self.case().name()
    }

    /// Whether the payload is the [`Unit`](crate::Unit) sentinel.
    fn is_unit(&self) -> bool;

    /// The registry of every case of this enum.
    fn cases() -> Registry
    where
        Self: Sized,
    {
        <Self::Case as Case>::registry()
    }
}

/// Mapping from every case name to itself.
///
/// ```
/// use make_enum::Registry;
///
/// let cases = Registry::from_static(&["None", "Some"]);
/// assert_eq!(cases.get("Some"), Some("Some"));
/// assert_eq!(cases.get("Nothing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    names: Vec<Cow<'static, str>>,
}

impl Registry {
    pub fn from_static(names: &'static [&'static str]) -> Self {
        Registry {
            names: names.iter().map(|name| Cow::Borrowed(*name)).collect(),
        }
    }

    pub(crate) fn from_owned(names: impl IntoIterator<Item = String>) -> Self {
        Registry {
            names: names.into_iter().map(Cow::Owned).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|declared| &***declared == name)
            .map(|declared| &**declared)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
