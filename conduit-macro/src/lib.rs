/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */
#![forbid(unsafe_code)]

//! Conduit Macro Library
//!
//! Procedural macros that remove the derive boilerplate from Conduit payload and
//! component types.
//!
//! # Payload Macro
//!
//! ```ignore
//! #[conduit_payload]
//! pub struct Temperature {
//!     pub celsius: f32,
//! }
//! ```
//!
//! # Component Macro
//!
//! ```ignore
//! #[conduit_component]
//! pub struct Thermostat {
//!     pub reading: ValueSink<f32>,
//! }
//! ```

use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, DeriveInput};

fn has_derive(input: &DeriveInput, trait_name: &str) -> bool {
    input.attrs.iter().any(|attr| {
        if attr.path().is_ident("derive") {
            let mut found = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(trait_name) {
                    found = true;
                }
                Ok(())
            });
            found
        } else {
            false
        }
    })
}

/// Options parsed from `#[conduit_payload(...)]`.
#[derive(Default)]
struct PayloadConfig {
    /// Also derive `PartialEq`, which most test assertions on payloads need.
    eq: bool,
}

impl PayloadConfig {
    fn parse(attr: &TokenStream) -> Self {
        let mut config = Self::default();
        let attr_string = attr.to_string();
        for part in attr_string.split(',') {
            if part.trim() == "eq" {
                config.eq = true;
            }
        }
        config
    }
}

/// Derives what a type needs to travel through an event channel.
///
/// Expands to `#[derive(Clone, Debug)]` (skipping traits already derived) plus a
/// compile-time assertion that the type is `'static`. Any type satisfying those
/// bounds implements `ChannelPayload` through its blanket impl.
///
/// ```ignore
/// #[conduit_payload]
/// pub struct Ping;
///
/// #[conduit_payload(eq)]
/// pub struct Reading(pub f32);
/// ```
///
/// The `eq` option additionally derives `PartialEq`.
#[proc_macro_attribute]
pub fn conduit_payload(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = PayloadConfig::parse(&attr);
    let input = parse_macro_input!(item as DeriveInput);

    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let derives = {
        let mut traits = Vec::new();
        if !has_derive(&input, "Clone") {
            traits.push(quote!(Clone));
        }
        if !has_derive(&input, "Debug") {
            traits.push(quote!(Debug));
        }
        if config.eq && !has_derive(&input, "PartialEq") {
            traits.push(quote!(PartialEq));
        }
        if traits.is_empty() {
            quote!()
        } else {
            quote!(#[derive(#(#traits),*)])
        }
    };

    let assert_ident = quote::format_ident!("_AssertConduitPayload_{}", name);

    let expanded = quote! {
        #derives
        #input

        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: Clone + ::std::fmt::Debug + 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    };

    TokenStream::from(expanded)
}

/// Derives `Debug` for a component type and asserts it is `'static`.
///
/// Components are shared as `Rc<RefCell<_>>` and referenced weakly by their
/// sinks, so they must not borrow from their environment.
///
/// ```ignore
/// #[conduit_component]
/// pub struct Listener {
///     pub input: EventSink<i32>,
///     pub seen: Vec<i32>,
/// }
/// ```
#[proc_macro_attribute]
pub fn conduit_component(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let derives = if has_derive(&input, "Debug") {
        quote!()
    } else {
        quote!(#[derive(Debug)])
    };

    let assert_ident = quote::format_ident!("_AssertConduitComponent_{}", name);

    let expanded = quote! {
        #derives
        #input

        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    };

    TokenStream::from(expanded)
}
