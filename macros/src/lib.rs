//! Набор универсальных макросов для приложений Market Sim.
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive-макрос для `Enum`: автоматически добавляет реализации
/// [`std::fmt::Display`] и [`std::str::FromStr`].
///
/// Строковое представление варианта задаётся атрибутом `#[str("...")]`,
/// при его отсутствии используется имя варианта в нижнем регистре.
/// Разбор строки нечувствителен к регистру и пробелам по краям.
///
/// В области видимости должен находиться тип `MarketError`
/// (`commons::errors::MarketError`).
///
/// ## Пример
///
/// ```ignore
/// use commons::errors::MarketError;
/// use macros::MarketEnumDisplay;
///
/// #[derive(Debug, Clone, MarketEnumDisplay)]
/// enum Region {
///     #[str("US")]
///     Us,
///     #[str("Global")]
///     Global,
/// }
///
/// assert_eq!(Region::Us.to_string(), "US");
/// assert!(matches!("us".parse::<Region>(), Ok(Region::Us)));
/// ```
#[proc_macro_derive(MarketEnumDisplay, attributes(str))]
pub fn derive_display_fromstr(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match input.data {
        Data::Enum(e) => e.variants,
        _ => panic!("MarketEnumDisplay допустимо использовать только с enum"),
    };

    let mut to_arms = Vec::new();
    let mut from_arms = Vec::new();

    for v in variants {
        let ident = v.ident;
        if !matches!(v.fields, Fields::Unit) {
            panic!("Только unit-variants");
        }
        let mut lit = ident.to_string().to_lowercase();
        for attr in v.attrs {
            if attr.path().is_ident("str") {
                let s: LitStr = attr.parse_args().expect("str(\"...\")");
                lit = s.value();
            }
        }
        let display_lit = LitStr::new(&lit, proc_macro2::Span::call_site());
        // Сравнение при разборе ведётся в нижнем регистре.
        let parse_lit = LitStr::new(&lit.to_lowercase(), proc_macro2::Span::call_site());
        to_arms.push(quote! { #name::#ident => f.pad(#display_lit), });
        from_arms.push(quote! { #parse_lit => Ok(#name::#ident), });
    }

    let expanded = quote! {
        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                match self { #(#to_arms)* }
            }
        }

        impl std::str::FromStr for #name {
            type Err = MarketError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    #(#from_arms)*
                    _ => Err(MarketError::value_err(format!(
                        "Некорректное значение {}: {}",
                        stringify!(#name), s
                    ))),
                }
            }
        }
    };

    TokenStream::from(expanded)
}
