use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenTree};
use quote::quote;
use std::path::{Path, PathBuf};
use std::{env, fs, io};
use syn::spanned::Spanned;
use syn::{GenericArgument, PathArguments, ReturnType, Type};

/// `Self`, or a path ending in the implementing type's ident.
pub fn is_self_type(ty: &Type, type_ident: &Ident) -> bool {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => {
            tp.path.is_ident("Self") || tp.path.segments.last().is_some_and(|seg| &seg.ident == type_ident && seg.arguments.is_none())
        }
        Type::Paren(p) => is_self_type(&p.elem, type_ident),
        _ => false,
    }
}

/// Whether the return type is `Result<Self, _>`, errors out if it is neither that nor `Self`.
pub fn classify_return(output: &ReturnType, type_ident: &Ident) -> Result<bool, syn::Error> {
    let ty = match output {
        ReturnType::Default => {
            return Err(syn::Error::new(output.span(), "#[ctor] fn must return `Self` or `Result<Self, E>`"));
        }
        ReturnType::Type(_, ty) => ty,
    };
    if is_self_type(ty, type_ident) {
        return Ok(false);
    }
    if let Type::Path(tp) = ty.as_ref() {
        if let Some(seg) = tp.path.segments.last() {
            if seg.ident == "Result" {
                if let PathArguments::AngleBracketed(args) = &seg.arguments {
                    if let Some(GenericArgument::Type(ok)) = args.args.first() {
                        if is_self_type(ok, type_ident) {
                            return Ok(true);
                        }
                    }
                }
            }
        }
    }
    Err(syn::Error::new(ty.span(), "#[ctor] fn must return `Self` or `Result<Self, E>`"))
}

pub fn mentions_self(ty: &Type) -> bool {
    fn walk(tokens: proc_macro2::TokenStream) -> bool {
        tokens.into_iter().any(|tt| match tt {
            TokenTree::Ident(ident) => ident == "Self",
            TokenTree::Group(group) => walk(group.stream()),
            _ => false,
        })
    }
    walk(quote!(#ty))
}

/// Parameters are stored as `Box<dyn Any>`, so they must be owned or `'static`.
pub fn validate_param_type(ty: &Type) -> Result<(), syn::Error> {
    match ty {
        Type::Reference(r) if !matches!(&r.lifetime, Some(l) if l.ident == "static") => {
            Err(syn::Error::new(ty.span(), "constructor parameters must be owned types or `&'static` references"))
        }
        Type::ImplTrait(_) => Err(syn::Error::new(ty.span(), "`impl Trait` parameters cannot be registered, use a concrete type")),
        Type::Infer(_) => Err(syn::Error::new(ty.span(), "parameter types must be spelled out")),
        _ if mentions_self(ty) => Err(syn::Error::new(ty.span(), "use the type name instead of `Self` in constructor parameters")),
        _ => Ok(()),
    }
}

pub fn type_key(types: &[Type]) -> String {
    quote!(#(#types),*).to_string()
}

/// Directory named by `QUICKCTOR_EXPAND_DIR`, expansions are only dumped when it is set.
pub const EXPAND_DIR_VAR: &str = "QUICKCTOR_EXPAND_DIR";

/// Pretty-printed source of a generated item list, raw tokens if it does not parse as a file.
pub fn render(stream: &proc_macro2::TokenStream) -> String {
    match syn::parse2::<syn::File>(stream.clone()) {
        Ok(ast) => prettyplease::unparse(&ast),
        Err(_) => stream.to_string(),
    }
}

/// Writes `<dir>/<Type>_<origin>.rs`, replacing an earlier dump of the same expansion.
pub fn dump_expansion(dir: &Path, type_ident: &Ident, origin: &str, source: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}.rs", type_ident, origin));
    fs::write(&path, source)?;
    Ok(path)
}

/// Hands `stream` back to the compiler, dumping it first if `QUICKCTOR_EXPAND_DIR` is set.
pub fn emit(stream: proc_macro2::TokenStream, type_ident: &Ident, origin: &str) -> TokenStream {
    if let Some(dir) = env::var_os(EXPAND_DIR_VAR) {
        if let Err(e) = dump_expansion(Path::new(&dir), type_ident, origin, &render(&stream)) {
            eprintln!("quickctor: cannot dump {} expansion of {}: {}", origin, type_ident, e);
        }
    }
    stream.into()
}
