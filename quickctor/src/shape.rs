use crate::descriptor::{join_names, Arg, TypeDescriptor};
use crate::error::FactoryError;
use crate::factory::Factory;
use crate::macro_defs::impl_factory_shape;
use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

/// A caller-chosen callable shape, `fn(A, B, ..) -> R`, that describes a constructor signature.
pub trait FactoryShape: 'static {
    type Args;
    type Output: 'static;

    fn params() -> Vec<TypeDescriptor>;

    fn pack(args: Self::Args) -> Vec<Arg>;

    fn output() -> TypeDescriptor {
        TypeDescriptor::of::<Self::Output>()
    }

    fn describe() -> &'static str {
        type_name::<Self>()
    }

    /// Shapes returning `()` cannot construct anything.
    fn check_returns_value() -> Result<(), FactoryError> {
        if Self::output().is::<()>() {
            return Err(FactoryError::InvalidFactoryShape { shape: Self::describe() });
        }
        Ok(())
    }
}

impl_factory_shape!(
    (),
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F),
    (A, B, C, D, E, F, G),
    (A, B, C, D, E, F, G, H),
);

/// A [`Factory`] whose argument and return types are fixed by `F`.
pub struct TypedFactory<F: FactoryShape> {
    inner: Arc<Factory>,
    _shape: PhantomData<fn() -> F>,
}

impl<F: FactoryShape> TypedFactory<F> {
    pub fn bind(inner: Arc<Factory>) -> Result<Self, FactoryError> {
        F::check_returns_value()?;
        let mismatch = |reason: String| FactoryError::SignatureMismatch {
            shape: F::describe(),
            signature: inner.signature().to_string(),
            reason,
        };
        if F::output() != inner.target() {
            return Err(mismatch(format!("returns {}, constructor builds {}", F::output(), inner.target())));
        }
        let params = F::params();
        if params.len() != inner.arity() {
            return Err(mismatch(format!("takes {} parameter(s), constructor takes {}", params.len(), inner.arity())));
        }
        if params.as_slice() != inner.signature().params() {
            return Err(mismatch(format!("takes ({}), constructor takes ({})", join_names(&params), inner.signature().params_display())));
        }
        Ok(TypedFactory { inner, _shape: PhantomData })
    }

    pub fn call(&self, args: F::Args) -> Result<F::Output, FactoryError> {
        self.inner.invoke_as::<F::Output>(F::pack(args))
    }

    pub fn factory(&self) -> &Arc<Factory> {
        &self.inner
    }
}

impl<F: FactoryShape> Clone for TypedFactory<F> {
    fn clone(&self) -> Self {
        TypedFactory { inner: Arc::clone(&self.inner), _shape: PhantomData }
    }
}

impl<F: FactoryShape> std::fmt::Debug for TypedFactory<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedFactory")
            .field("shape", &F::describe())
            .field("factory", &self.inner)
            .finish()
    }
}
