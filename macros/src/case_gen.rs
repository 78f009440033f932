//! Per-case code generation: payload structs, constructors and narrowing helpers

use proc_macro2::{Ident, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::{Attribute, Fields, Generics, Type, Visibility};

use crate::enum_parser::ParsedCase;
use crate::helpers::{build_payload_generics, make_ident, to_snake_case, unraw};
use crate::type_analysis::{collect_case_params, PayloadKind};

/// A case together with everything generated for it
pub struct CaseInfo<'a> {
    pub case: &'a ParsedCase,
    pub kind: PayloadKind,
    /// Type stored in the enum variant, `None` for unit cases
    pub payload_ty: Option<TokenStream2>,
    /// Generated payload struct for object cases
    pub payload_struct: Option<TokenStream2>,
    pub ctor: Ident,
}

impl<'a> CaseInfo<'a> {
    pub fn new(
        case: &'a ParsedCase,
        enum_name: &Ident,
        generics: &Generics,
        all_params: &HashSet<String>,
        derives: &[Attribute],
        vis: &Visibility,
    ) -> syn::Result<Self> {
        let name = unraw(&case.ident);
        let snake = to_snake_case(&name);
        if snake == name {
            return Err(syn::Error::new_spanned(
                &case.ident,
                format!(
                    "case `{}` must be written in UpperCamelCase so its constructor `{}` does not shadow it",
                    name, snake
                ),
            ));
        }
        let ctor = make_ident(&snake, case.ident.span())?;

        let kind = PayloadKind::of(&case.fields);
        let (payload_ty, payload_struct) = match &kind {
            PayloadKind::Unit => (None, None),
            PayloadKind::Single(ty) => (Some(quote! { #ty }), None),
            PayloadKind::Tuple(types) => (Some(quote! { (#(#types),*) }), None),
            PayloadKind::Object { all_optional } => {
                if name == "Case" {
                    return Err(syn::Error::new_spanned(
                        &case.ident,
                        format!(
                            "an object payload for case `Case` would collide with the registry `{}Case`",
                            enum_name
                        ),
                    ));
                }
                let struct_name = format_ident!("{}{}", enum_name, name);
                let used = collect_case_params(&case.fields, all_params);
                let struct_generics = build_payload_generics(generics, &used);
                let (_, ty_generics, _) = struct_generics.split_for_impl();
                let payload_ty = quote! { #struct_name #ty_generics };
                let payload_struct = generate_payload_struct(
                    &struct_name,
                    &struct_generics,
                    &case.fields,
                    *all_optional,
                    derives,
                    vis,
                );
                (Some(payload_ty), Some(payload_struct))
            }
        };

        Ok(CaseInfo {
            case,
            kind,
            payload_ty,
            payload_struct,
            ctor,
        })
    }

    pub fn ident(&self) -> &Ident {
        &self.case.ident
    }

    /// Pattern matching this case regardless of payload, e.g. `Self::Circle(..)`
    pub fn wildcard_pattern(&self) -> TokenStream2 {
        let ident = self.ident();
        if self.kind.is_unit() {
            quote! { Self::#ident }
        } else {
            quote! { Self::#ident(..) }
        }
    }

    /// The variant as declared in the generated enum
    pub fn variant(&self) -> TokenStream2 {
        let attrs = &self.case.attrs;
        let ident = self.ident();
        match &self.payload_ty {
            Some(payload_ty) => quote! { #(#attrs)* #ident(#payload_ty) },
            None => quote! { #(#attrs)* #ident },
        }
    }

    /// Names of the associated functions generated for this case
    pub fn generated_names(&self) -> Vec<Ident> {
        let name = self.ctor.to_string();
        let name = name.trim_start_matches("r#");
        let span = self.ctor.span();
        let mut names = vec![
            self.ctor.clone(),
            format_ident!("is_{}", name, span = span),
            format_ident!("as_{}", name, span = span),
            format_ident!("into_{}", name, span = span),
        ];
        if let Some(with) = self.with_ctor() {
            names.push(with);
        }
        names
    }

    /// Second constructor taking an explicit payload, for fully optional objects
    fn with_ctor(&self) -> Option<Ident> {
        match self.kind {
            PayloadKind::Object { all_optional: true } => {
                let name = self.ctor.to_string();
                Some(format_ident!(
                    "{}_with",
                    name.trim_start_matches("r#"),
                    span = self.ctor.span()
                ))
            }
            _ => None,
        }
    }

    /// Constructor(s) for this case
    pub fn constructors(&self, vis: &Visibility) -> TokenStream2 {
        let ident = self.ident();
        let ctor = &self.ctor;
        let doc_name = unraw(ident);

        match (&self.kind, &self.payload_ty) {
            (PayloadKind::Object { all_optional: true }, Some(payload_ty)) => {
                let with = self.with_ctor();
                let doc = format!("Construct `{}` with every payload field unset.", doc_name);
                let doc_with = format!("Construct `{}` from an explicit payload.", doc_name);
                quote! {
                    #[doc = #doc]
                    #vis fn #ctor() -> Self {
                        Self::#ident(::core::default::Default::default())
                    }

                    #[doc = #doc_with]
                    #vis fn #with(payload: #payload_ty) -> Self {
                        Self::#ident(payload)
                    }
                }
            }
            (_, Some(payload_ty)) => {
                let doc = format!("Construct `{}`.", doc_name);
                quote! {
                    #[doc = #doc]
                    #vis fn #ctor(payload: #payload_ty) -> Self {
                        Self::#ident(payload)
                    }
                }
            }
            (_, None) => {
                let doc = format!("Construct `{}`.", doc_name);
                quote! {
                    #[doc = #doc]
                    #vis fn #ctor() -> Self {
                        Self::#ident
                    }
                }
            }
        }
    }

    /// `is_*`, `as_*` and `into_*` for this case
    pub fn narrowing(&self, vis: &Visibility) -> TokenStream2 {
        let ident = self.ident();
        let name = self.ctor.to_string();
        let name = name.trim_start_matches("r#");
        let span = self.ctor.span();
        let is_fn = format_ident!("is_{}", name, span = span);
        let as_fn = format_ident!("as_{}", name, span = span);
        let into_fn = format_ident!("into_{}", name, span = span);
        let wildcard = self.wildcard_pattern();

        let (as_body, into_body, payload_ty) = match &self.payload_ty {
            Some(payload_ty) => (
                quote! {
                    match self {
                        Self::#ident(payload) => ::core::option::Option::Some(payload),
                        #[allow(unreachable_patterns)]
                        _ => ::core::option::Option::None,
                    }
                },
                quote! {
                    match self {
                        Self::#ident(payload) => ::core::result::Result::Ok(payload),
                        #[allow(unreachable_patterns)]
                        other => ::core::result::Result::Err(other),
                    }
                },
                payload_ty.clone(),
            ),
            None => (
                quote! {
                    match self {
                        Self::#ident => ::core::option::Option::Some(&::make_enum::Unit),
                        #[allow(unreachable_patterns)]
                        _ => ::core::option::Option::None,
                    }
                },
                quote! {
                    match self {
                        Self::#ident => ::core::result::Result::Ok(::make_enum::Unit),
                        #[allow(unreachable_patterns)]
                        other => ::core::result::Result::Err(other),
                    }
                },
                quote! { ::make_enum::Unit },
            ),
        };

        quote! {
            #vis fn #is_fn(&self) -> bool {
                ::core::matches!(self, #wildcard)
            }

            #vis fn #as_fn(&self) -> ::core::option::Option<&#payload_ty> {
                #as_body
            }

            #vis fn #into_fn(self) -> ::core::result::Result<#payload_ty, Self> {
                #into_body
            }
        }
    }
}

/// Generate the struct holding an object payload
pub fn generate_payload_struct(
    struct_name: &Ident,
    struct_generics: &Generics,
    fields: &Fields,
    all_optional: bool,
    derives: &[Attribute],
    vis: &Visibility,
) -> TokenStream2 {
    let Fields::Named(named) = fields else {
        return TokenStream2::new();
    };

    let fields_with_vis = named.named.iter().map(|field| {
        let attrs = &field.attrs;
        let ident = &field.ident;
        let ty: &Type = &field.ty;
        let field_vis = match &field.vis {
            Visibility::Inherited => vis,
            declared => declared,
        };
        quote! { #(#attrs)* #field_vis #ident: #ty }
    });

    let (impl_generics, ty_generics, where_clause) = struct_generics.split_for_impl();
    let struct_def = quote! {
        #(#derives)*
        #vis struct #struct_name #struct_generics #where_clause {
            #(#fields_with_vis,)*
        }
    };

    if !all_optional {
        return struct_def;
    }

    let idents = named.named.iter().map(|field| &field.ident);
    quote! {
        #struct_def

        impl #impl_generics ::core::default::Default for #struct_name #ty_generics #where_clause {
            fn default() -> Self {
                Self {
                    #(#idents: ::core::option::Option::None,)*
                }
            }
        }
    }
}
