//! Whole-enum code generation: the enum, its case registry, `Tagged`, and the
//! inherent impl holding constructors, behavior and statics

use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use std::collections::{HashMap, HashSet};
use syn::{Arm, Expr, FnArg, Pat, PatPath, Path, Type};

use crate::case_gen::CaseInfo;
use crate::enum_parser::{MethodBody, ParsedEnum, ParsedItem, ParsedMethod};
use crate::helpers::{payload_derives, unraw};
use crate::type_analysis::collect_all_param_names;

pub fn expand(parsed: ParsedEnum) -> syn::Result<TokenStream2> {
    let ParsedEnum {
        attrs,
        vis,
        ident: enum_name,
        generics,
        cases,
        items,
    } = &parsed;

    let all_params = collect_all_param_names(generics);
    let derives = payload_derives(attrs)?;

    let infos = cases
        .iter()
        .map(|case| CaseInfo::new(case, enum_name, generics, &all_params, &derives, vis))
        .collect::<syn::Result<Vec<_>>>()?;

    check_collisions(&infos, items)?;

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let registry_name = format_ident!("{}Case", enum_name);
    let case_names: HashSet<String> = infos.iter().map(|info| info.ident().to_string()).collect();

    let variants = infos.iter().map(CaseInfo::variant);
    let payload_structs = infos.iter().filter_map(|info| info.payload_struct.as_ref());
    let registry = generate_registry(enum_name, &registry_name, &infos, vis);
    let tagged = generate_tagged(enum_name, &registry_name, &infos, generics);
    let constructors = infos.iter().map(|info| info.constructors(vis));
    let narrowing = infos.iter().map(|info| info.narrowing(vis));
    let members = items
        .iter()
        .map(|item| generate_item(item, &case_names))
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        #(#attrs)*
        #vis enum #enum_name #generics #where_clause {
            #(#variants,)*
        }

        #(#payload_structs)*

        #registry

        #tagged

        #[allow(dead_code)]
        impl #impl_generics #enum_name #ty_generics #where_clause {
            #(#constructors)*

            #(#narrowing)*

            #(#members)*
        }
    })
}

/// Reject any declared item that would clash with a generated associated function,
/// and generated functions clashing with each other
fn check_collisions(infos: &[CaseInfo<'_>], items: &[ParsedItem]) -> syn::Result<()> {
    let mut generated: HashMap<String, &Ident> = HashMap::new();

    for info in infos {
        for name in info.generated_names() {
            let key = unraw(&name);
            if let Some(owner) = generated.get(&key) {
                return Err(syn::Error::new_spanned(
                    info.ident(),
                    format!(
                        "case `{}` generates `{}`, which is already generated for case `{}`",
                        info.ident(),
                        key,
                        owner
                    ),
                ));
            }
            generated.insert(key, info.ident());
        }
    }

    let mut declared: HashSet<String> = HashSet::new();
    for item in items {
        let key = unraw(item.ident());
        if let Some(owner) = generated.get(&key) {
            return Err(syn::Error::new_spanned(
                item.ident(),
                format!(
                    "`{}` collides with the function generated for case `{}`",
                    key, owner
                ),
            ));
        }
        if !declared.insert(key.clone()) {
            return Err(syn::Error::new_spanned(
                item.ident(),
                format!("`{}` is declared more than once", key),
            ));
        }
    }

    Ok(())
}

/// Generate the fieldless `<Enum>Case` registry enum
fn generate_registry(
    enum_name: &Ident,
    registry_name: &Ident,
    infos: &[CaseInfo<'_>],
    vis: &syn::Visibility,
) -> TokenStream2 {
    let idents: Vec<&Ident> = infos.iter().map(CaseInfo::ident).collect();
    let names: Vec<String> = idents.iter().map(|ident| unraw(ident)).collect();
    let enum_name_str = enum_name.to_string();
    let doc = format!("The cases of [`{}`].", enum_name);

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #vis enum #registry_name {
            #(#idents,)*
        }

        impl ::make_enum::Case for #registry_name {
            const ALL: &'static [Self] = &[#(Self::#idents,)*];
            const NAMES: &'static [&'static str] = &[#(#names,)*];

            fn name(self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }
        }

        impl ::core::fmt::Display for #registry_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(::make_enum::Case::name(*self))
            }
        }

        impl ::core::str::FromStr for #registry_name {
            type Err = ::make_enum::ParseCaseError;

            fn from_str(name: &str) -> ::core::result::Result<Self, Self::Err> {
                <Self as ::make_enum::Case>::from_name(name).ok_or_else(|| ::make_enum::ParseCaseError {
                    enum_name: #enum_name_str,
                    name: ::std::string::String::from(name),
                })
            }
        }
    }
}

/// Generate `impl Tagged` for the enum
fn generate_tagged(
    enum_name: &Ident,
    registry_name: &Ident,
    infos: &[CaseInfo<'_>],
    generics: &syn::Generics,
) -> TokenStream2 {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let case_arms = infos.iter().map(|info| {
        let pattern = info.wildcard_pattern();
        let ident = info.ident();
        quote! { #pattern => #registry_name::#ident }
    });

    let unit_patterns: Vec<TokenStream2> = infos
        .iter()
        .filter(|info| info.kind.is_unit())
        .map(CaseInfo::wildcard_pattern)
        .collect();
    let is_unit = if unit_patterns.is_empty() {
        quote! { false }
    } else {
        quote! { ::core::matches!(self, #(#unit_patterns)|*) }
    };

    quote! {
        impl #impl_generics ::make_enum::Tagged for #enum_name #ty_generics #where_clause {
            type Case = #registry_name;

            fn case(&self) -> #registry_name {
                match self {
                    #(#case_arms,)*
                }
            }

            fn is_unit(&self) -> bool {
                #is_unit
            }
        }
    }
}

/// Emit a behavior method or static as an inherent item
fn generate_item(item: &ParsedItem, case_names: &HashSet<String>) -> syn::Result<TokenStream2> {
    match item {
        ParsedItem::Const(item) => Ok(quote! { #item }),
        ParsedItem::Method(method) => generate_method(method, case_names),
    }
}

fn generate_method(method: &ParsedMethod, case_names: &HashSet<String>) -> syn::Result<TokenStream2> {
    let ParsedMethod {
        attrs,
        vis,
        sig,
        body,
    } = method;

    let arms = match body {
        MethodBody::Block(block) => return Ok(quote! { #(#attrs)* #vis #sig #block }),
        MethodBody::Arms(arms) => arms,
    };

    if !method.is_behavior() {
        return Err(syn::Error::new_spanned(
            &sig.ident,
            format!(
                "`{}` has no `self` receiver, so its body must be a block rather than case arms",
                sig.ident
            ),
        ));
    }

    let scrutinee = if is_boxed_receiver(method) {
        quote! { *self }
    } else {
        quote! { self }
    };

    let arms: Vec<Arm> = arms
        .iter()
        .cloned()
        .map(|mut arm| {
            qualify_case_pattern(&mut arm.pat, case_names);
            if arm.comma.is_none() && !is_block_like(&arm.body) {
                arm.comma = Some(Default::default());
            }
            arm
        })
        .collect();

    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            match #scrutinee {
                #(#arms)*
            }
        }
    })
}

/// `self: Box<Self>` must be matched through the box
fn is_boxed_receiver(method: &ParsedMethod) -> bool {
    let Some(FnArg::Receiver(receiver)) = method.sig.inputs.first() else {
        return false;
    };
    if receiver.reference.is_some() || receiver.colon_token.is_none() {
        return false;
    }
    match receiver.ty.as_ref() {
        Type::Path(ty) => ty
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Box"),
        _ => false,
    }
}

fn is_block_like(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Block(_)
            | Expr::If(_)
            | Expr::Match(_)
            | Expr::Loop(_)
            | Expr::While(_)
            | Expr::ForLoop(_)
            | Expr::Unsafe(_)
    )
}

/// Prefix top-level case names in an arm pattern with `Self::` (e.g. "Some(x)" -> "Self::Some(x)")
fn qualify_case_pattern(pat: &mut Pat, case_names: &HashSet<String>) {
    match pat {
        Pat::Ident(binding) => {
            if let Some((_, sub)) = &mut binding.subpat {
                qualify_case_pattern(sub, case_names);
            } else if binding.by_ref.is_none()
                && binding.mutability.is_none()
                && case_names.contains(&binding.ident.to_string())
            {
                *pat = Pat::Path(PatPath {
                    attrs: binding.attrs.clone(),
                    qself: None,
                    path: self_path(&binding.ident),
                });
            }
        }
        Pat::Path(p) => qualify_path(&mut p.path, case_names),
        Pat::TupleStruct(p) => qualify_path(&mut p.path, case_names),
        Pat::Struct(p) => qualify_path(&mut p.path, case_names),
        Pat::Or(p) => p
            .cases
            .iter_mut()
            .for_each(|case| qualify_case_pattern(case, case_names)),
        Pat::Paren(p) => qualify_case_pattern(&mut p.pat, case_names),
        _ => {}
    }
}

fn qualify_path(path: &mut Path, case_names: &HashSet<String>) {
    if path.leading_colon.is_none() && path.segments.len() == 1 {
        let ident = path.segments[0].ident.clone();
        if case_names.contains(&ident.to_string()) {
            let arguments = std::mem::take(&mut path.segments[0].arguments);
            *path = self_path(&ident);
            path.segments[1].arguments = arguments;
        }
    }
}

fn self_path(ident: &Ident) -> Path {
    let self_ident = Ident::new("Self", Span::call_site());
    syn::parse_quote!(#self_ident::#ident)
}
