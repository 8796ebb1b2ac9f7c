use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a Rust type, comparable and hashable by its [`TypeId`].
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeDescriptor { id: TypeId::of::<T>(), name: type_name::<T>() }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Cache key: the target type plus the exact, ordered parameter types of one constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    target: TypeDescriptor,
    params: Vec<TypeDescriptor>,
}

impl Signature {
    pub fn new(target: TypeDescriptor, params: Vec<TypeDescriptor>) -> Self {
        Signature { target, params }
    }

    pub fn target(&self) -> TypeDescriptor {
        self.target
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params_display(&self) -> String {
        join_names(&self.params)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.target, self.params_display())
    }
}

pub(crate) fn join_names(types: &[TypeDescriptor]) -> String {
    types.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
}

/// Constructed value handed back by a factory.
pub type Instance = Box<dyn Any>;

/// A type-erased argument that still knows what it is.
pub struct Arg {
    value: Box<dyn Any>,
    tpe: TypeDescriptor,
}

impl Arg {
    pub fn new<T: Any>(value: T) -> Self {
        Arg { value: Box::new(value), tpe: TypeDescriptor::of::<T>() }
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.tpe
    }

    pub fn is<T: Any>(&self) -> bool {
        self.tpe.is::<T>()
    }

    /// Unwraps the value, handing the argument back untouched if it holds a different type.
    pub fn take<T: Any>(self) -> Result<T, Arg> {
        let tpe = self.tpe;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Arg { value, tpe }),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arg<{}>", self.tpe)
    }
}
