use crate::macro_utils;
use proc_macro2::Ident;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, FnArg, ImplItem, ItemImpl, PathArguments, Type};

#[derive(Clone)]
pub enum Construction {
    /// `Type::method(args..)`, `fallible` when it returns `Result<Self, E>`.
    Method { ident: Ident, fallible: bool },
    Named(Vec<Ident>),
    Tuple,
    Unit,
}

#[derive(Clone)]
pub struct CtorDef {
    pub name: String,
    pub params: Vec<Type>,
    pub construction: Construction,
}

pub struct CtorDefs {
    pub type_ident: Ident,
    pub self_ty: Type,
    pub ctors: Vec<CtorDef>,
}

fn concrete_type_ident(self_ty: &Type) -> Result<Ident, syn::Error> {
    match self_ty {
        Type::Path(tp) if tp.qself.is_none() => match tp.path.segments.last() {
            Some(seg) if matches!(seg.arguments, PathArguments::None) => Ok(seg.ident.clone()),
            Some(seg) => Err(syn::Error::new(seg.arguments.span(), "generic arguments are not supported here, register a type alias instead")),
            None => Err(syn::Error::new(self_ty.span(), "expected a type path")),
        },
        _ => Err(syn::Error::new(self_ty.span(), "`#[constructors]` only supports named types")),
    }
}

/// Strips every `#[ctor]` marker from the impl block and collects the marked fns.
pub fn parse_impl(item: &mut ItemImpl) -> Result<CtorDefs, syn::Error> {
    let mut marked = Vec::new();
    for impl_item in item.items.iter_mut() {
        if let ImplItem::Fn(f) = impl_item {
            let before = f.attrs.len();
            f.attrs.retain(|attr| !attr.path().is_ident("ctor"));
            if f.attrs.len() != before {
                marked.push(f.sig.clone());
            }
        }
    }

    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(path.span(), "`#[constructors]` must be applied to an inherent impl block"));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(item.generics.span(), "`#[constructors]` cannot register generic types"));
    }
    let type_ident = concrete_type_ident(&item.self_ty)?;
    if marked.is_empty() {
        return Err(syn::Error::new(item.self_ty.span(), "`#[constructors]` found no `#[ctor]` fn in this impl block"));
    }

    let mut ctors: Vec<CtorDef> = Vec::new();
    let mut seen: Vec<(String, Ident)> = Vec::new();
    for sig in marked {
        let fn_ident = sig.ident.clone();
        if let Some(receiver) = sig.receiver() {
            return Err(syn::Error::new(receiver.span(), "#[ctor] fn cannot take `self`"));
        }
        if let Some(asyncness) = sig.asyncness {
            return Err(syn::Error::new(asyncness.span(), "#[ctor] fn cannot be async"));
        }
        if !sig.generics.params.is_empty() {
            return Err(syn::Error::new(sig.generics.span(), "#[ctor] fn cannot be generic"));
        }
        let fallible = macro_utils::classify_return(&sig.output, &type_ident)?;

        let mut params = Vec::new();
        for input in sig.inputs.iter() {
            if let FnArg::Typed(pat_type) = input {
                macro_utils::validate_param_type(&pat_type.ty)?;
                params.push((*pat_type.ty).clone());
            }
        }

        let key = macro_utils::type_key(&params);
        if let Some((_, other)) = seen.iter().find(|(k, _)| *k == key) {
            return Err(syn::Error::new(
                fn_ident.span(),
                format!("duplicate constructor signature, `{}` already takes ({})", other, key),
            ));
        }
        seen.push((key, fn_ident.clone()));

        ctors.push(CtorDef {
            name: format!("{}::{}", type_ident, fn_ident),
            params,
            construction: Construction::Method { ident: fn_ident, fallible },
        });
    }

    Ok(CtorDefs { type_ident, self_ty: (*item.self_ty).clone(), ctors })
}

/// The memberwise constructor of a struct, parameters in field declaration order.
pub fn parse_struct(ast: &DeriveInput) -> Result<CtorDefs, syn::Error> {
    let fields = match &ast.data {
        Data::Struct(data) => &data.fields,
        _ => return Err(syn::Error::new(ast.span(), "`#[derive(Constructible)]` only supports structs")),
    };
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(ast.generics.span(), "`#[derive(Constructible)]` cannot register generic types"));
    }
    let params: Vec<Type> = fields.iter().map(|f| f.ty.clone()).collect();
    for ty in params.iter() {
        macro_utils::validate_param_type(ty)?;
    }
    let construction = match fields {
        Fields::Named(named) => Construction::Named(named.named.iter().filter_map(|f| f.ident.clone()).collect()),
        Fields::Unnamed(_) => Construction::Tuple,
        Fields::Unit => Construction::Unit,
    };
    let type_ident = ast.ident.clone();
    let self_ty: Type = syn::parse_quote!(#type_ident);
    let ctor = CtorDef { name: type_ident.to_string(), params, construction };
    Ok(CtorDefs { type_ident, self_ty, ctors: vec![ctor] })
}
