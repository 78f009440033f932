//! Type parameter analysis and payload shape classification

use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::ToTokens;
use std::collections::HashSet;
use syn::{
    Fields, GenericArgument, GenericParam, Generics, Lifetime, Path, PathArguments, ReturnType,
    Type, TypeParamBound, TypePath,
};

/// How a case carries its payload
pub enum PayloadKind {
    /// No payload; narrows to the `Unit` sentinel
    Unit,
    /// A single value, `Case(T)`
    Single(Type),
    /// A positional tuple, `Case(A, B)`, stored as `(A, B)`
    Tuple(Vec<Type>),
    /// An object, `Case { .. }`, stored in a generated struct
    Object { all_optional: bool },
}

impl PayloadKind {
    pub fn of(fields: &Fields) -> Self {
        match fields {
            Fields::Unit => PayloadKind::Unit,
            Fields::Unnamed(fields) => {
                let mut types: Vec<Type> = fields.unnamed.iter().map(|f| f.ty.clone()).collect();
                match types.len() {
                    0 => PayloadKind::Unit,
                    1 => PayloadKind::Single(types.remove(0)),
                    _ => PayloadKind::Tuple(types),
                }
            }
            Fields::Named(fields) => PayloadKind::Object {
                all_optional: fields.named.iter().all(|f| is_option_type(&f.ty)),
            },
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, PayloadKind::Unit)
    }
}

/// Whether a field type is `Option<..>` (by its last path segment)
pub fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path.segments.last().is_some_and(|segment| {
            segment.ident == "Option"
                && matches!(&segment.arguments, PathArguments::AngleBracketed(args) if args.args.len() == 1)
        }),
        Type::Paren(p) => is_option_type(&p.elem),
        Type::Group(g) => is_option_type(&g.elem),
        _ => false,
    }
}

/// Extract all generic parameters used in a given type.
///
/// Lifetimes are tracked by their full text (`'a`), type and const parameters
/// by their identifier.
pub fn extract_used_params(ty: &Type, available_params: &HashSet<String>) -> HashSet<String> {
    let mut used = HashSet::new();
    collect_type_params(ty, available_params, &mut used);
    used
}

/// Recursively collect generic parameter names from a type
fn collect_type_params(ty: &Type, available: &HashSet<String>, used: &mut HashSet<String>) {
    match ty {
        Type::Path(TypePath { qself, path }) => {
            if let Some(qself) = qself {
                collect_type_params(&qself.ty, available, used);
            }
            collect_path_params(path, available, used);
        }
        Type::Reference(r) => {
            if let Some(lifetime) = &r.lifetime {
                collect_lifetime(lifetime, available, used);
            }
            collect_type_params(&r.elem, available, used)
        }
        Type::Tuple(t) => t
            .elems
            .iter()
            .for_each(|elem| collect_type_params(elem, available, used)),
        Type::Array(a) => {
            collect_type_params(&a.elem, available, used);
            collect_token_params(a.len.to_token_stream(), available, used);
        }
        Type::Ptr(p) => collect_type_params(&p.elem, available, used),
        Type::Slice(s) => collect_type_params(&s.elem, available, used),
        Type::Paren(p) => collect_type_params(&p.elem, available, used),
        Type::Group(g) => collect_type_params(&g.elem, available, used),
        Type::BareFn(f) => {
            f.inputs
                .iter()
                .for_each(|arg| collect_type_params(&arg.ty, available, used));
            if let ReturnType::Type(_, output) = &f.output {
                collect_type_params(output, available, used);
            }
        }
        Type::TraitObject(t) => collect_bound_params(&t.bounds, available, used),
        Type::ImplTrait(t) => collect_bound_params(&t.bounds, available, used),
        // Opaque until expansion, so fall back to the raw tokens
        Type::Macro(m) => collect_token_params(m.mac.tokens.clone(), available, used),
        _ => {}
    }
}

fn collect_path_params(path: &Path, available: &HashSet<String>, used: &mut HashSet<String>) {
    for segment in &path.segments {
        let ident = segment.ident.to_string();
        if available.contains(&ident) {
            used.insert(ident);
        }

        match &segment.arguments {
            PathArguments::AngleBracketed(args) => {
                for arg in &args.args {
                    match arg {
                        GenericArgument::Type(inner_ty) => {
                            collect_type_params(inner_ty, available, used)
                        }
                        GenericArgument::Lifetime(lifetime) => {
                            collect_lifetime(lifetime, available, used)
                        }
                        GenericArgument::AssocType(assoc) => {
                            collect_type_params(&assoc.ty, available, used)
                        }
                        GenericArgument::Constraint(constraint) => {
                            collect_bound_params(&constraint.bounds, available, used)
                        }
                        other => collect_token_params(other.to_token_stream(), available, used),
                    }
                }
            }
            PathArguments::Parenthesized(args) => {
                args.inputs
                    .iter()
                    .for_each(|input| collect_type_params(input, available, used));
                if let ReturnType::Type(_, output) = &args.output {
                    collect_type_params(output, available, used);
                }
            }
            PathArguments::None => {}
        }
    }
}

fn collect_bound_params<'a>(
    bounds: impl IntoIterator<Item = &'a TypeParamBound>,
    available: &HashSet<String>,
    used: &mut HashSet<String>,
) {
    for bound in bounds {
        match bound {
            TypeParamBound::Trait(bound) => collect_path_params(&bound.path, available, used),
            TypeParamBound::Lifetime(lifetime) => collect_lifetime(lifetime, available, used),
            other => collect_token_params(other.to_token_stream(), available, used),
        }
    }
}

fn collect_lifetime(lifetime: &Lifetime, available: &HashSet<String>, used: &mut HashSet<String>) {
    let name = lifetime.to_string();
    if available.contains(&name) {
        used.insert(name);
    }
}

/// Token-level scan for parameter names, used where no type structure is available
pub fn collect_token_params(
    tokens: TokenStream2,
    available: &HashSet<String>,
    used: &mut HashSet<String>,
) {
    let mut after_quote = false;
    for tree in tokens {
        match tree {
            TokenTree::Ident(ident) => {
                let name = if after_quote {
                    format!("'{}", ident)
                } else {
                    ident.to_string()
                };
                if available.contains(&name) {
                    used.insert(name);
                }
                after_quote = false;
            }
            TokenTree::Punct(punct) => after_quote = punct.as_char() == '\'',
            TokenTree::Group(group) => {
                collect_token_params(group.stream(), available, used);
                after_quote = false;
            }
            TokenTree::Literal(_) => after_quote = false,
        }
    }
}

/// Collect all generic parameters used by a case's fields
pub fn collect_case_params(fields: &Fields, available_params: &HashSet<String>) -> HashSet<String> {
    fields
        .iter()
        .flat_map(|field| extract_used_params(&field.ty, available_params))
        .collect()
}

/// Name of a generic parameter as tracked by the usage analysis
pub fn param_name(param: &GenericParam) -> String {
    match param {
        GenericParam::Type(t) => t.ident.to_string(),
        GenericParam::Lifetime(l) => l.lifetime.to_string(),
        GenericParam::Const(c) => c.ident.to_string(),
    }
}

/// Collect the names of every lifetime, type and const parameter
pub fn collect_all_param_names(generics: &Generics) -> HashSet<String> {
    generics.params.iter().map(param_name).collect()
}
