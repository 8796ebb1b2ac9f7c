//! quickctor builds fast, memoized constructor calls from a target type and an exact parameter-type signature.
//!
//! Constructors are registered at compile time by `#[constructors]` / `#[ctor]` and `#[derive(Constructible)]`,
//! which generate a monomorphic wrapper per constructor and submit it to an [`inventory`] registry.
//! At runtime a [`FactoryCache`] resolves a [`Signature`] against that registry once and hands out
//! the same [`Factory`] for every later request of that signature.
//!
//! ```
//! use quickctor::*;
//!
//! #[derive(Debug, PartialEq, Constructible)]
//! struct Point { x: i32, y: i32 }
//!
//! let factory = get_or_build_factory(TypeDescriptor::of::<Point>(), &[TypeDescriptor::of::<i32>(); 2]).unwrap();
//! let point = invoke(&factory, args![3, 4]).unwrap();
//! assert_eq!(point.downcast_ref::<Point>(), Some(&Point { x: 3, y: 4 }));
//! ```

extern crate self as quickctor;

#[macro_use]
pub mod logger;
mod macro_defs;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod factory;
pub mod shape;
pub mod cache;
pub mod settings;

pub use inventory;
pub use macros::constructors;
pub use macros::Constructible;
pub use descriptor::{Arg, Instance, Signature, TypeDescriptor};
pub use error::FactoryError;
pub use registry::{expect_arity, next_arg, ConstructorInfo, ConstructorRegistry};
pub use factory::Factory;
pub use shape::{FactoryShape, TypedFactory};
pub use cache::FactoryCache;
pub use settings::Settings;
pub use logger::LogLevel;
pub use std::sync::Arc;

/// Fetches or builds the factory of `target` taking exactly `params`, from the global cache.
pub fn get_or_build_factory(target: TypeDescriptor, params: &[TypeDescriptor]) -> Result<Arc<Factory>, FactoryError> {
    FactoryCache::global().get_or_build_factory(target, params)
}

/// Constructs a new instance through `factory`, forwarding `args` positionally.
pub fn invoke(factory: &Factory, args: Vec<Arg>) -> Result<Instance, FactoryError> {
    factory.invoke(args)
}

/// Like [`get_or_build_factory`] with target and params taken from the shape `F`, e.g. `fn(i32, i32) -> Point`.
pub fn get_or_build_typed_factory<F: FactoryShape>() -> Result<TypedFactory<F>, FactoryError> {
    FactoryCache::global().get_or_build_typed_factory::<F>()
}
