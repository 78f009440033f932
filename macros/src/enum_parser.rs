//! Parser for the `make_enum!` input: one enum declaration followed by items

use proc_macro2::Ident;
use syn::{
    parse::{discouraged::Speculative, Parse, ParseStream},
    Arm, Attribute, Block, Fields, Generics, ImplItem, ImplItemConst, Signature, Token, Visibility,
};

/// A declared case. `fields` is the payload as written.
pub struct ParsedCase {
    pub attrs: Vec<Attribute>,
    pub ident: Ident,
    pub fields: Fields,
}

/// Body of a method: an ordinary block, or one `Case(..) => expr` arm per case
pub enum MethodBody {
    Block(Block),
    Arms(Vec<Arm>),
}

pub struct ParsedMethod {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub sig: Signature,
    pub body: MethodBody,
}

impl ParsedMethod {
    /// Methods with a `self` receiver belong to the shared behavior, the rest are statics
    pub fn is_behavior(&self) -> bool {
        self.sig.receiver().is_some()
    }
}

pub enum ParsedItem {
    Method(ParsedMethod),
    Const(ImplItemConst),
}

impl ParsedItem {
    pub fn ident(&self) -> &Ident {
        match self {
            ParsedItem::Method(method) => &method.sig.ident,
            ParsedItem::Const(item) => &item.ident,
        }
    }
}

pub struct ParsedEnum {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub ident: Ident,
    pub generics: Generics,
    pub cases: Vec<ParsedCase>,
    pub items: Vec<ParsedItem>,
}

impl Parse for ParsedEnum {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<Token![enum]>()?;

        let ident: Ident = input.parse()?;
        let mut generics: Generics = input.parse()?;
        generics.where_clause = input.parse()?;

        let content;
        let brace = syn::braced!(content in input);

        let mut cases = Vec::new();
        while !content.is_empty() {
            let case_attrs = content.call(Attribute::parse_outer)?;
            let case_ident: Ident = content.parse()?;

            let fields = if content.peek(syn::token::Brace) {
                Fields::Named(content.parse()?)
            } else if content.peek(syn::token::Paren) {
                Fields::Unnamed(content.parse()?)
            } else {
                Fields::Unit
            };

            cases.push(ParsedCase {
                attrs: case_attrs,
                ident: case_ident,
                fields,
            });

            // Optional trailing comma
            if !content.is_empty() {
                content.parse::<Token![,]>()?;
            }
        }

        if cases.is_empty() {
            return Err(syn::Error::new(
                brace.span.join(),
                format!("enum `{}` must declare at least one case", ident),
            ));
        }

        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(parse_item(input)?);
        }

        Ok(ParsedEnum {
            attrs,
            vis,
            ident,
            generics,
            cases,
            items,
        })
    }
}

fn parse_item(input: ParseStream) -> syn::Result<ParsedItem> {
    // Ordinary items first; a body made of match arms is not a valid block
    let fork = input.fork();
    if let Ok(item) = fork.parse::<ImplItem>() {
        input.advance_to(&fork);
        return match item {
            ImplItem::Fn(item) => Ok(ParsedItem::Method(ParsedMethod {
                attrs: item.attrs,
                vis: item.vis,
                sig: item.sig,
                body: MethodBody::Block(item.block),
            })),
            ImplItem::Const(item) => Ok(ParsedItem::Const(item)),
            other => Err(syn::Error::new_spanned(
                other,
                "expected a method, an associated function or an associated const",
            )),
        };
    }

    let attrs = input.call(Attribute::parse_outer)?;
    let vis = input.parse()?;
    let sig: Signature = input.parse()?;

    let content;
    syn::braced!(content in input);

    let mut arms = Vec::new();
    while !content.is_empty() {
        arms.push(content.call(Arm::parse)?);
    }

    Ok(ParsedItem::Method(ParsedMethod {
        attrs,
        vis,
        sig,
        body: MethodBody::Arms(arms),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_cases() {
        let input: ParsedEnum = parse_quote! {
            pub enum Shape {
                Empty,
                Circle(f64),
                Segment(f64, f64),
                Rect { w: f64, h: f64 },
            }
        };

        assert_eq!(input.ident.to_string(), "Shape");
        assert_eq!(input.cases.len(), 4);
        assert!(matches!(input.cases[0].fields, Fields::Unit));
        assert_eq!(input.cases[2].fields.len(), 2);
        assert!(matches!(input.cases[3].fields, Fields::Named(_)));
        assert!(input.items.is_empty());
    }

    #[test]
    fn test_parse_items() {
        let input: ParsedEnum = parse_quote! {
            enum Maybe<T> where T: Clone {
                None,
                Some(T)
            }

            fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
                None => Maybe::none(),
                Some(x) => Maybe::some(f(x)),
            }

            pub fn from_option(value: Option<T>) -> Self {
                value.map_or_else(Self::none, Self::some)
            }

            const LIMIT: usize = 6;
        };

        assert!(input.generics.where_clause.is_some());
        assert_eq!(input.items.len(), 3);

        let ParsedItem::Method(map) = &input.items[0] else {
            panic!("expected a method");
        };
        assert!(map.is_behavior());
        assert!(matches!(&map.body, MethodBody::Arms(arms) if arms.len() == 2));

        let ParsedItem::Method(from_option) = &input.items[1] else {
            panic!("expected a function");
        };
        assert!(!from_option.is_behavior());
        assert!(matches!(from_option.body, MethodBody::Block(_)));

        assert_eq!(input.items[2].ident().to_string(), "LIMIT");
    }

    #[test]
    fn test_reject_empty_enum() {
        let result = syn::parse2::<ParsedEnum>(quote::quote! { enum Never {} });
        assert!(result.is_err());
    }
}
