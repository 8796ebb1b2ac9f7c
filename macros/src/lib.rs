extern crate proc_macro;
mod macro_utils;
mod ctor_parser;
mod ctor;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

/// Registers every `#[ctor]` associated fn of an inherent impl block as a constructor.
///
/// ```ignore
/// #[constructors]
/// impl Point {
///     #[ctor]
///     pub fn new(x: i32, y: i32) -> Self { Point { x, y } }
///     #[ctor]
///     pub fn parse(raw: String) -> Result<Self, ParsePointError> { .. }
/// }
/// ```
#[proc_macro_attribute]
#[proc_macro_error]
pub fn constructors(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut item_impl = parse_macro_input!(item as ItemImpl);
    let defs = match ctor_parser::parse_impl(&mut item_impl) {
        Ok(defs) => defs,
        Err(e) => {
            let err = e.to_compile_error();
            return quote! {
                #item_impl
                #err
            }.into();
        }
    };
    let registrations = ctor::registrations(&defs, "impl");
    let stream = quote! {
        #item_impl
        #registrations
    };
    macro_utils::emit(stream, &defs.type_ident, "impl")
}

/// Registers the memberwise constructor of a struct, parameters in field order.
#[proc_macro_derive(Constructible)]
#[proc_macro_error]
pub fn derive_constructible(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let defs = match ctor_parser::parse_struct(&ast) {
        Ok(defs) => defs,
        Err(e) => return e.to_compile_error().into(),
    };
    let stream = ctor::registrations(&defs, "derive");
    macro_utils::emit(stream, &defs.type_ident, "derive")
}
