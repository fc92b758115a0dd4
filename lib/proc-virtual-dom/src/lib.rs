use std::{collections::HashMap, str::Chars};

use proc_macro2::{Span, TokenStream, TokenTree};
use quote::quote;
use syn::{parse::Parse, parse_macro_input, token::Brace, Block, Expr, Ident, Stmt};
use virtual_dom::{parse_html, Html};

// using https://github.com/chinedufn/percy/blob/master/crates/html-macro/src/lib.rs as example
/// Parse html into `virtual_dom::DomNode`'s with minimal variable interpolation
///
/// Interpolated variables are written as `{name}` either as a child or inside an attribute
/// value. A child variable is appended with `append_child` so anything that is
/// `Into<DomNode>` works (`&str`, `&String`, `String`, `DomNode`). Attribute variables need to
/// implement `Display`.
///
/// Because of the nature of macros whitespace is fairly arbitrary and might spawn spaces or
/// newlines in between text one way to prevent this it to explicitly add quotes around your text.
///
/// ```
/// use proc_virtual_dom::dom;
/// dom!(<p>" Licensed under "</p>);
/// ```
///
/// # Examples
///
/// ```
/// use proc_virtual_dom::dom;
/// let author_title = "Author";
/// let author = String::from("Lyr");
/// let item = dom! {
///     <div><h6>{author_title}</h6><p>{author}</p></div>
/// };
/// ```
#[proc_macro]
pub fn dom(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // TokenStream.to_string() may insert newlines inside tags
    let parsed_content = input.to_string().replace('\n', " ");
    let template = parse_macro_input!(input as Template);

    let tokens = parse_html(&parsed_content);
    if tokens.is_empty() {
        let e = syn::Error::new(Span::call_site(), "no html given");
        return proc_macro::TokenStream::from(e.to_compile_error());
    }

    let html = match to_tokens(&tokens, &template, None, 0) {
        Ok(html) => html,
        Err(e) => return proc_macro::TokenStream::from(e.to_compile_error()),
    };

    let body = if html.len() > 1 {
        quote!(vec![#({#html},)*])
    } else {
        let html = &html[0];
        quote!(#html)
    };

    quote! {
        {
            use ::virtual_dom::*;
            #body
        }
    }
    .into()
}

/// collect all interpolated variables
#[derive(Clone)]
struct Template {
    variables: HashMap<String, Ident>,
}

impl Parse for Template {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut variables = HashMap::new();

        while !input.is_empty() {
            if input.peek(Brace) {
                let content;
                syn::braced!(content in input);
                for s in content.call(Block::parse_within)? {
                    match s {
                        Stmt::Expr(Expr::Path(p), _) => {
                            let ident = p
                                .path
                                .get_ident()
                                .ok_or_else(|| {
                                    syn::Error::new_spanned(&p, "expected a single variable name")
                                })?
                                .clone();
                            variables.insert(ident.to_string(), ident);
                        }
                        Stmt::Expr(e, _) => {
                            return Err(syn::Error::new_spanned(
                                e,
                                "only variables can be interpolated, bind the expression first",
                            ));
                        }
                        Stmt::Local(_) | Stmt::Item(_) | Stmt::Macro(_) => {
                            return Err(input.error("unexpected statement"));
                        }
                    }
                }

                continue;
            }
            // parse other expressions
            let t = input.parse::<TokenTree>()?;

            // attribute values are literals, check them for braces
            if let TokenTree::Literal(l) = t {
                let text = l.to_string();
                let mut chars = text.chars();
                while let Some(c) = chars.next() {
                    if c == '{' {
                        if let Ok(var) = parse_braces(&mut chars) {
                            let ident = Ident::new(&var, l.span());
                            variables.insert(var, ident);
                        }
                    }
                }
            }
        }

        Ok(Template { variables })
    }
}

impl Template {
    fn variable(&self, name: &str) -> syn::Result<&Ident> {
        self.variables.get(name).ok_or_else(|| {
            syn::Error::new(
                Span::call_site(),
                format!("failed to parse or find variable '{name}'"),
            )
        })
    }
}

/// parse a text with braces and return the variable name if syntax is valid otherwise return raw
/// string
fn parse_braces(chars: &mut Chars) -> Result<String, String> {
    let mut raw = String::new();
    let mut variable_name = String::new();
    let mut var_has_whitespace = false;
    for c in chars.by_ref() {
        raw.push(c);
        match c {
            ' ' | '\n' if !variable_name.is_empty() => {
                var_has_whitespace = true;
            }
            ' ' | '\n' => {}
            '}' if !variable_name.is_empty() => {
                return Ok(variable_name);
            }
            c if c.is_alphabetic() || c == '_' || (c.is_ascii_digit() && !variable_name.is_empty()) => {
                // whitespace in between characters is not a variable
                if var_has_whitespace {
                    return Err(raw);
                }
                variable_name.push(c)
            }
            _ => return Err(raw),
        }
    }

    Err(raw)
}

/// check if string has interpolated variables, if so format them in
fn interpolate_string(text: &str, template: &Template) -> syn::Result<TokenStream> {
    let mut chars = text.chars();
    let mut variables = vec![];
    let mut format_string = String::new();
    while let Some(c) = chars.next() {
        match c {
            '{' => match parse_braces(&mut chars) {
                Ok(variable_name) => {
                    let variable = template.variable(&variable_name)?;
                    format_string.push_str("{}");
                    variables.push(quote!(#variable));
                }
                Err(t) => {
                    format_string.push_str("{{");
                    format_string.push_str(&t.replace('{', "{{").replace('}', "}}"));
                }
            },
            '}' => format_string.push_str("}}"),
            c => format_string.push(c),
        }
    }
    if !variables.is_empty() {
        return Ok(quote!(format!(#format_string, #(#variables,)*)));
    }
    Ok(quote!(String::from(#text)))
}

fn append_or_return(parent: Option<&Ident>, node: TokenStream) -> TokenStream {
    match parent {
        Some(parent) => quote!(#parent.append_child(#node)),
        None => quote!(DomNode::from(#node)),
    }
}

fn to_tokens(
    tokens: &[Html],
    template: &Template,
    parent: Option<&Ident>,
    mut i: usize,
) -> syn::Result<Vec<TokenStream>> {
    let mut items = vec![];

    for t in tokens {
        i += 1;
        match t {
            Html::Comment { .. } => {}
            Html::Text { text } => {
                // text wrapped in quotes keeps its whitespace, remove the quotes
                let text = match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
                    Some("") => continue,
                    Some(t) => t,
                    None => text.as_str(),
                };

                let mut chars = text.chars();
                let mut text = String::new();
                while let Some(c) = chars.next() {
                    if c != '{' {
                        text.push(c);
                        continue;
                    }
                    match parse_braces(&mut chars) {
                        Ok(variable_name) => {
                            let variable = template.variable(&variable_name)?;
                            if !text.is_empty() {
                                items.push(append_or_return(
                                    parent,
                                    quote!(DomNode::create_text(#text)),
                                ));
                                text.clear();
                            }
                            items.push(append_or_return(parent, quote!(#variable)));
                        }
                        Err(t) => {
                            text.push('{');
                            text.push_str(&t);
                        }
                    }
                }
                if !text.is_empty() {
                    items.push(append_or_return(
                        parent,
                        quote!(DomNode::create_text(#text)),
                    ));
                }
            }
            Html::Element {
                tag,
                attributes,
                children,
            } => {
                let attributes_values = attributes
                    .iter()
                    .map(|(key, value)| {
                        let key = interpolate_string(key, template)?;
                        let value = interpolate_string(value, template)?;
                        Ok(quote! {
                            attributes.insert(#key, #value);
                        })
                    })
                    .collect::<syn::Result<Vec<TokenStream>>>()?;

                let id = Ident::new(&format!("node_{i}"), Span::call_site());
                let children = to_tokens(children, template, Some(&id), i + tokens.len())?;

                let el = quote!(
                    let mut attributes = Attributes::new();
                    #(#attributes_values)*
                    let #id = DomNode::create_element_with_attributes(#tag, attributes);
                    #({#children})*
                );

                match parent {
                    Some(parent) => items.push(quote!(
                        #el
                        #parent.append_child(#id);
                    )),
                    None => items.push(quote!(
                        #el
                        #id
                    )),
                }
            }
        }
    }

    Ok(items)
}
