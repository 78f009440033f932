//! Tagged unions with constructor tables, case registries and shared behavior.
//!
//! There are two ways to declare a union:
//!
//! * [`make_enum!`] for case sets known at compile time. It generates a
//!   native Rust enum with one constructor per case, a typed case registry,
//!   narrowing helpers, and an inherent impl holding the union's behavior and
//!   statics. Generic unions use ordinary type parameters.
//! * [`EnumTable`] for case sets known only at run time (configuration,
//!   deserialized input, scripting). Constructors check their arguments and
//!   unknown cases are rejected instead of being invented on access.
//!
//! In both forms a case without a payload carries the [`Unit`] sentinel.
//!
//! ```
//! use make_enum::{make_enum, Tagged, Unit};
//!
//! make_enum! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum Maybe<T> {
//!         None,
//!         Some(T),
//!     }
//!
//!     pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
//!         None => Maybe::none(),
//!         Some(value) => Maybe::some(f(value)),
//!     }
//! }
//!
//! let squared = Maybe::some(42).map(|x| x * x);
//! assert_eq!(squared, Maybe::some(1764));
//! assert_eq!(squared.case_name(), "Some");
//! assert_eq!(Maybe::<i32>::none().as_none(), Some(&Unit));
//! ```

mod case;
mod error;
mod table;
mod unit;
mod value;

pub use make_enum_macros::make_enum;

pub use case::{Case, ParseCaseError, Registry, Tagged};
pub use error::{Error, Result};
pub use table::{Constructor, EnumBuilder, EnumTable, Member, Method, PayloadShape, Static, StaticFn};
pub use unit::{Unit, UNIT};
pub use value::{CaseValue, Value};
