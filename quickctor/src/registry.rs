use crate::descriptor::{join_names, Arg, Instance, Signature, TypeDescriptor};
use crate::error::FactoryError;
use std::collections::HashMap;
use std::fmt;

/// One constructor, as emitted by `#[constructors]` / `#[derive(Constructible)]`.
///
/// `invoke` is a monomorphic wrapper around the real constructor, it expects the
/// arguments to already be in the order and of the types reported by `params`.
#[derive(Clone, Copy)]
pub struct ConstructorInfo {
    pub name: &'static str,
    pub target: fn() -> TypeDescriptor,
    pub params: fn() -> Vec<TypeDescriptor>,
    pub invoke: fn(Vec<Arg>) -> Result<Instance, FactoryError>,
}

impl ConstructorInfo {
    pub fn signature(&self) -> Signature {
        Signature::new((self.target)(), (self.params)())
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("name", &self.name)
            .field("signature", &self.signature())
            .finish()
    }
}

inventory::collect!(ConstructorInfo);

/// Arity check used by the generated `invoke` wrappers.
pub fn expect_arity(args: &[Arg], expected: usize, name: &str) -> Result<(), FactoryError> {
    if args.len() != expected {
        return Err(FactoryError::ArgumentCountMismatch { signature: name.to_string(), expected, actual: args.len() });
    }
    Ok(())
}

/// Pops the next positional argument, downcasting it to the parameter type.
pub fn next_arg<T: 'static>(args: &mut impl Iterator<Item = Arg>, index: usize, name: &str) -> Result<T, FactoryError> {
    match args.next() {
        Some(arg) => arg.take::<T>().map_err(|arg| FactoryError::ArgumentTypeMismatch {
            signature: name.to_string(),
            index,
            expected: TypeDescriptor::of::<T>().name(),
            actual: arg.type_descriptor().name(),
        }),
        None => Err(FactoryError::ArgumentCountMismatch { signature: name.to_string(), expected: index + 1, actual: index }),
    }
}

/// Every known constructor, indexed by exact signature.
#[derive(Default)]
pub struct ConstructorRegistry {
    by_signature: HashMap<Signature, Vec<ConstructorInfo>>,
}

impl ConstructorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Gathers all constructors registered through the proc macros in the final binary.
    pub fn collect() -> Self {
        let mut registry = Self::empty();
        for info in inventory::iter::<ConstructorInfo> {
            registry.register(*info);
        }
        for (signature, candidates) in registry.by_signature.iter().filter(|(_, c)| c.len() > 1) {
            warn!("{} is registered {} times: {}", signature, candidates.len(), names(candidates));
        }
        registry
    }

    pub fn register(&mut self, info: ConstructorInfo) -> &mut Self {
        self.by_signature.entry(info.signature()).or_default().push(info);
        self
    }

    pub fn with(mut self, info: ConstructorInfo) -> Self {
        self.register(info);
        self
    }

    /// Exact-match lookup, no conversions or overload ranking.
    pub fn resolve(&self, signature: &Signature) -> Result<ConstructorInfo, FactoryError> {
        match self.by_signature.get(signature).map(|c| c.as_slice()) {
            Some([info]) => Ok(*info),
            Some(candidates) if candidates.len() > 1 => Err(FactoryError::AmbiguousConstructor {
                signature: signature.to_string(),
                candidates: names(candidates),
            }),
            _ => {
                let target = signature.target();
                let available = self
                    .signatures_of(target)
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(FactoryError::NoMatchingConstructor {
                    target: target.name(),
                    params: join_names(signature.params()),
                    available,
                })
            }
        }
    }

    pub fn signatures_of(&self, target: TypeDescriptor) -> Vec<Signature> {
        let mut signatures: Vec<Signature> = self.by_signature.keys().filter(|s| s.target() == target).cloned().collect();
        signatures.sort_by_key(|s| s.arity());
        signatures
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.by_signature.keys()
    }

    pub fn len(&self) -> usize {
        self.by_signature.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_signature.is_empty()
    }
}

fn names(candidates: &[ConstructorInfo]) -> String {
    candidates.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}
