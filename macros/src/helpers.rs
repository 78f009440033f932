//! Helper functions for identifiers, generics and attributes

use proc_macro2::{Ident, Span};
use quote::ToTokens;
use std::collections::HashSet;
use syn::{
    punctuated::Punctuated, Attribute, GenericParam, Generics, Path, Token, WhereClause,
    WherePredicate,
};

use crate::type_analysis::{collect_all_param_names, collect_token_params, param_name};

/// Convert a case name to snake_case (e.g., "HttpError" -> "http_error", "IOError" -> "io_error")
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Build an identifier, falling back to a raw identifier for keywords
pub fn make_ident(name: &str, span: Span) -> syn::Result<Ident> {
    if syn::parse_str::<Ident>(name).is_ok() {
        return Ok(Ident::new(name, span));
    }
    match name {
        "self" | "Self" | "super" | "crate" | "_" => Err(syn::Error::new(
            span,
            format!("`{}` cannot be used as a generated identifier", name),
        )),
        _ => Ok(Ident::new_raw(name, span)),
    }
}

/// Strip a leading `r#` from an identifier's text
pub fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Build payload-struct generics containing only the parameters its fields use.
///
/// Bounds, defaults and where predicates that mention a dropped parameter are
/// removed along with it.
pub fn build_payload_generics(generics: &Generics, used_params: &HashSet<String>) -> Generics {
    let dropped: HashSet<String> = collect_all_param_names(generics)
        .difference(used_params)
        .cloned()
        .collect();
    let clean = |tokens: &dyn ToTokens| !mentions_any(tokens, &dropped);

    let mut payload_generics = generics.clone();
    payload_generics.params = generics
        .params
        .iter()
        .filter(|param| used_params.contains(&param_name(param)))
        .cloned()
        .map(|mut param| {
            match &mut param {
                GenericParam::Type(t) => {
                    t.bounds = t.bounds.iter().filter(|b| clean(*b)).cloned().collect();
                    if t.bounds.is_empty() {
                        t.colon_token = None;
                    }
                    if t.default.as_ref().is_some_and(|ty| !clean(ty)) {
                        t.default = None;
                        t.eq_token = None;
                    }
                }
                GenericParam::Lifetime(l) => {
                    l.bounds = l.bounds.iter().filter(|b| clean(*b)).cloned().collect();
                    if l.bounds.is_empty() {
                        l.colon_token = None;
                    }
                }
                GenericParam::Const(c) => {
                    if c.default.as_ref().is_some_and(|expr| !clean(expr)) {
                        c.default = None;
                        c.eq_token = None;
                    }
                }
            }
            param
        })
        .collect();

    payload_generics.where_clause = generics.where_clause.as_ref().and_then(|where_clause| {
        let predicates: Punctuated<WherePredicate, Token![,]> = where_clause
            .predicates
            .iter()
            .filter_map(|predicate| match predicate {
                WherePredicate::Type(p) if clean(&p.bounded_ty) => {
                    let mut p = p.clone();
                    p.bounds = p.bounds.iter().filter(|b| clean(*b)).cloned().collect();
                    (!p.bounds.is_empty()).then_some(WherePredicate::Type(p))
                }
                WherePredicate::Lifetime(p) if clean(&p.lifetime) => {
                    let mut p = p.clone();
                    p.bounds = p.bounds.iter().filter(|b| clean(*b)).cloned().collect();
                    (!p.bounds.is_empty()).then_some(WherePredicate::Lifetime(p))
                }
                _ => None,
            })
            .collect();
        (!predicates.is_empty()).then(|| WhereClause {
            where_token: where_clause.where_token,
            predicates,
        })
    });
    payload_generics
}

fn mentions_any(tokens: &dyn ToTokens, params: &HashSet<String>) -> bool {
    let mut found = HashSet::new();
    collect_token_params(tokens.to_token_stream(), params, &mut found);
    !found.is_empty()
}

/// Derive attributes of the enum to repeat on generated payload structs.
///
/// `Default` is dropped: fully optional payloads get a bound-free impl instead.
pub fn payload_derives(attrs: &[Attribute]) -> syn::Result<Vec<Attribute>> {
    let mut derives = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let paths = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
        let kept: Vec<Path> = paths
            .into_iter()
            .filter(|path| {
                path.segments
                    .last()
                    .map_or(true, |segment| segment.ident != "Default")
            })
            .collect();
        if !kept.is_empty() {
            derives.push(syn::parse_quote!(#[derive(#(#kept),*)]));
        }
    }
    Ok(derives)
}
