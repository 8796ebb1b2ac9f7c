use crate::ctor_parser::{Construction, CtorDef, CtorDefs};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};
use syn::Type;

/// Wrapper fns plus the `inventory` submission of every constructor in `defs`.
pub fn registrations(defs: &CtorDefs, prefix: &str) -> TokenStream {
    let streams = defs.ctors.iter().map(|ctor| registration(&defs.type_ident, &defs.self_ty, ctor, prefix));
    quote! { #(#streams)* }
}

fn registration(type_ident: &Ident, self_ty: &Type, ctor: &CtorDef, prefix: &str) -> TokenStream {
    let suffix = match &ctor.construction {
        Construction::Method { ident, .. } => ident.to_string(),
        _ => "fields".to_string(),
    };
    let params_fn = format_ident!("__quickctor_{}_{}_{}_params", prefix, type_ident, suffix);
    let invoke_fn = format_ident!("__quickctor_{}_{}_{}_invoke", prefix, type_ident, suffix);
    let name = Literal::string(&ctor.name);
    let params = &ctor.params;
    let arity = params.len();
    let indices: Vec<usize> = (0..arity).collect();
    let arg_idents: Vec<Ident> = indices.iter().map(|i| format_ident!("__arg{}", i)).collect();
    let construct = construct_stream(self_ty, ctor, &arg_idents);

    quote! {
        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #params_fn() -> ::std::vec::Vec<::quickctor::TypeDescriptor> {
            ::std::vec![#(::quickctor::TypeDescriptor::of::<#params>()),*]
        }

        #[doc(hidden)]
        #[allow(non_snake_case, unused_mut, unused_variables)]
        fn #invoke_fn(args: ::std::vec::Vec<::quickctor::Arg>) -> ::std::result::Result<::quickctor::Instance, ::quickctor::FactoryError> {
            ::quickctor::expect_arity(&args, #arity, #name)?;
            let mut args = args.into_iter();
            #( let #arg_idents = ::quickctor::next_arg::<#params>(&mut args, #indices, #name)?; )*
            #construct
        }

        ::quickctor::inventory::submit! {
            ::quickctor::ConstructorInfo {
                name: #name,
                target: ::quickctor::TypeDescriptor::of::<#self_ty>,
                params: #params_fn,
                invoke: #invoke_fn,
            }
        }
    }
}

fn construct_stream(self_ty: &Type, ctor: &CtorDef, args: &[Ident]) -> TokenStream {
    match &ctor.construction {
        Construction::Method { ident, fallible: false } => quote! {
            ::std::result::Result::Ok(::std::boxed::Box::new(<#self_ty>::#ident(#(#args),*)))
        },
        Construction::Method { ident, fallible: true } => quote! {
            let value = <#self_ty>::#ident(#(#args),*).map_err(::quickctor::FactoryError::construction)?;
            ::std::result::Result::Ok(::std::boxed::Box::new(value))
        },
        Construction::Named(fields) => quote! {
            ::std::result::Result::Ok(::std::boxed::Box::new(#self_ty { #(#fields: #args),* }))
        },
        Construction::Tuple => quote! {
            ::std::result::Result::Ok(::std::boxed::Box::new(#self_ty(#(#args),*)))
        },
        Construction::Unit => quote! {
            ::std::result::Result::Ok(::std::boxed::Box::new(#self_ty))
        },
    }
}
