use crate::descriptor::{Arg, Instance, Signature, TypeDescriptor};
use crate::error::FactoryError;
use crate::registry::ConstructorInfo;
use crate::shape::{FactoryShape, TypedFactory};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// A constructor bound to its exact signature.
pub struct Factory {
    signature: Signature,
    ctor: ConstructorInfo,
}

impl Factory {
    pub(crate) fn bind(signature: Signature, ctor: ConstructorInfo) -> Self {
        Factory { signature, ctor }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn target(&self) -> TypeDescriptor {
        self.signature.target()
    }

    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    /// Name of the bound constructor, e.g. `Point::new`.
    pub fn constructor_name(&self) -> &'static str {
        self.ctor.name
    }

    pub fn invoke(&self, args: Vec<Arg>) -> Result<Instance, FactoryError> {
        if args.len() != self.arity() {
            return Err(FactoryError::ArgumentCountMismatch {
                signature: self.signature.to_string(),
                expected: self.arity(),
                actual: args.len(),
            });
        }
        for (index, (arg, param)) in args.iter().zip(self.signature.params()).enumerate() {
            if arg.type_descriptor() != *param {
                return Err(FactoryError::ArgumentTypeMismatch {
                    signature: self.signature.to_string(),
                    index,
                    expected: param.name(),
                    actual: arg.type_descriptor().name(),
                });
            }
        }
        (self.ctor.invoke)(args)
    }

    pub fn invoke_as<T: 'static>(&self, args: Vec<Arg>) -> Result<T, FactoryError> {
        if !self.target().is::<T>() {
            return Err(FactoryError::SignatureMismatch {
                shape: type_name::<T>(),
                signature: self.signature.to_string(),
                reason: format!("requested {}, constructor builds {}", type_name::<T>(), self.target()),
            });
        }
        let instance = self.invoke(args)?;
        instance.downcast::<T>().map(|v| *v).map_err(|_| FactoryError::SignatureMismatch {
            shape: type_name::<T>(),
            signature: self.signature.to_string(),
            reason: format!("constructor {} returned a foreign type", self.ctor.name),
        })
    }

    /// Views this factory through a statically typed fn shape.
    pub fn typed<F: FactoryShape>(self: &Arc<Self>) -> Result<TypedFactory<F>, FactoryError> {
        TypedFactory::bind(Arc::clone(self))
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("signature", &self.signature)
            .field("constructor", &self.ctor.name)
            .finish()
    }
}
