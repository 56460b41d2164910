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

use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, ItemFn};

/// Turns a synchronous function into a `#[test]` that runs inside a tracing span
/// named after the test and reports any panic as a single cleaned line.
///
/// The wrapped function may return `()` or any `Result` whose error is `Debug`;
/// an `Err` fails the test.
#[proc_macro_attribute]
pub fn conduit_test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let vis = &input.vis;
    let sig = &input.sig;
    let body = &input.block;
    let attrs = &input.attrs;
    let name = &sig.ident;
    let inputs = &sig.inputs;
    let output = &sig.output;

    if sig.asyncness.is_some() {
        return syn::Error::new_spanned(sig.fn_token, "#[conduit_test] functions must be synchronous")
            .to_compile_error()
            .into();
    }

    let inner_name = syn::Ident::new(&format!("__{}_body", name), name.span());

    let output = quote! {
        #[test]
        #(#attrs)*
        #vis fn #name() {
            use std::sync::atomic::{AtomicBool, Ordering};
            use std::sync::Arc;
            use std::panic;
            use ::conduit_test::__private::parking_lot;
            use ::conduit_test::__private::tracing;

            #[derive(Clone, Default)]
            struct PanicInfo {
                occurred: Arc<AtomicBool>,
                message: Arc<parking_lot::Mutex<Option<String>>>,
                location: Arc<parking_lot::Mutex<Option<String>>>,
            }

            let panic_info = Arc::new(PanicInfo::default());
            let panic_info_clone = Arc::clone(&panic_info);

            let orig_hook = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                panic_info_clone.occurred.store(true, Ordering::SeqCst);
                *panic_info_clone.message.lock() = info
                    .payload()
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| info.payload().downcast_ref::<String>().cloned());
                *panic_info_clone.location.lock() = info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
                let message = panic_info_clone.message.lock().clone();
                let cleaned_message = message
                    .unwrap_or_else(|| "No error message".to_string())
                    .trim()
                    .replace('\n', " ");
                tracing::error!("Panic: {}", cleaned_message);
                orig_hook(info);
            }));

            let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                let test_span = tracing::info_span!("conduit_test", name = stringify!(#name));
                let _enter = test_span.enter();
                ::conduit_test::__private::TestOutcome::into_outcome(#inner_name())
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(error)) => panic!("test returned an error: {}", error),
                Err(payload) => {
                    if !panic_info.occurred.load(Ordering::SeqCst) {
                        panic::resume_unwind(payload);
                    }
                    let message = panic_info.message.lock().clone();
                    let location = panic_info.location.lock().clone();
                    let location_str = location.unwrap_or_else(|| "unknown location".to_string());
                    let cleaned_message = message
                        .unwrap_or_else(|| "No error message".to_string())
                        .trim()
                        .replace('\n', " ");
                    panic!("Panic at {}: {}", location_str, cleaned_message);
                }
            }
        }

        fn #inner_name(#inputs) #output #body
    };

    output.into()
}
