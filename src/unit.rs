//! The zero-payload sentinel

use std::fmt;

/// Marker payload for cases that carry no data.
///
/// `Unit` is deliberately its own type rather than `()` or `Option::None`,
/// so that a case without a payload can never be confused with a case whose
/// payload happens to be empty or absent.
///
/// ```
/// use make_enum::{Unit, UNIT};
///
/// assert_eq!(Unit, UNIT);
/// assert_eq!(UNIT.to_string(), "Unit");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Unit;

/// The single value of [`Unit`].
pub const UNIT: Unit = Unit;

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unit")
    }
}
