mod attrs;
mod impls;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::Result as SynResult;

/// Implements `wiring::injector::Construct` for the type of an `impl` block.
///
/// Exactly one associated function of the block must be annotated with
/// `#[inject]`. Its parameters are `Arc<T>` and are taken from the positional
/// arguments of the binding in declaration order. It returns `Self` or
/// `Result<Self, E>`.
///
/// `#[constructor(Output, post_processor)]` additionally converts the built
/// object with `post_processor` before it is handed out as `Output`.
#[proc_macro_attribute]
pub fn constructor(attr: TokenStream, item: TokenStream) -> TokenStream {
    match constructor_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn constructor_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    let attr_data = attrs::parse_attributes(attr)?;
    let expanded = impls::expand_implementation(item, attr_data)?;
    Ok(expanded)
}
