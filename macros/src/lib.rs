mod case_gen;
mod codegen;
mod enum_parser;
mod helpers;
mod type_analysis;

use proc_macro::TokenStream;

use enum_parser::ParsedEnum;

/// Function-like macro for declaring a tagged union together with its
/// constructors, case registry, narrowing helpers, behavior and statics.
///
/// Every case is either payload-less, a single value, a positional tuple, or
/// an object. Object payloads are generated as a struct named after the enum
/// and the case.
///
/// # Example
///
/// Declare cases and get one constructor per case.
///
/// ```ignore
/// make_enum! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum Shape {
///         Empty,                           // Shape::empty()
///         Circle(f64),                     // Shape::circle(1.0)
///         Segment(f64, f64),               // Shape::segment((0.0, 1.0))
///         Rect { w: f64, h: f64 },         // Shape::rect(ShapeRect { w, h })
///         Style { fill: Option<u32> },     // Shape::style() or Shape::style_with(..)
///     }
/// }
/// ```
///
/// Or generic over any number of type parameters, with shared behavior written
/// as one arm per case. Functions with a `self` receiver are behavior; the
/// others, and any `const`, are statics.
///
/// ```ignore
/// make_enum! {
///     #[derive(Debug, PartialEq)]
///     pub enum Maybe<T> {
///         None,
///         Some(T),
///     }
///
///     pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
///         None => Maybe::none(),
///         Some(value) => Maybe::some(f(value)),
///     }
///
///     pub fn from_option(value: Option<T>) -> Self {
///         value.map_or_else(Self::none, Self::some)
///     }
/// }
/// ```
///
/// A static or behavior item whose name matches a generated constructor or
/// helper is rejected at compile time.
#[proc_macro]
pub fn make_enum(input: TokenStream) -> TokenStream {
    let parsed = match syn::parse::<ParsedEnum>(input) {
        Ok(p) => p,
        Err(e) => return e.to_compile_error().into(),
    };

    match codegen::expand(parsed) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}
