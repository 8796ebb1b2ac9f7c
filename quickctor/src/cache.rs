use crate::descriptor::{Signature, TypeDescriptor};
use crate::error::FactoryError;
use crate::factory::Factory;
use crate::registry::ConstructorRegistry;
use crate::settings::Settings;
use crate::shape::{FactoryShape, TypedFactory};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, RwLock,
    },
};

static GLOBAL: Lazy<FactoryCache> = Lazy::new(|| {
    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("Invalid quickctor settings, using defaults: {}", e);
        Settings::default()
    });
    crate::logger::set_max_level(settings.log_level);
    FactoryCache::with_settings(ConstructorRegistry::collect(), &settings)
});

/// Process-lifetime memoization of factories by exact signature.
///
/// Entries are never evicted. When two threads miss on the same key concurrently, the
/// first insertion wins and the loser returns the winner's factory, so a key maps to
/// exactly one `Arc<Factory>` for the life of the cache.
pub struct FactoryCache {
    registry: ConstructorRegistry,
    entries: RwLock<HashMap<Signature, Arc<Factory>>>,
    builds: AtomicUsize,
}

impl FactoryCache {
    pub fn new(registry: ConstructorRegistry) -> Self {
        Self { registry, entries: RwLock::new(HashMap::new()), builds: AtomicUsize::new(0) }
    }

    /// Leaves the process log level alone, only the global cache applies `settings.log_level`.
    pub fn with_settings(registry: ConstructorRegistry, settings: &Settings) -> Self {
        let cache = Self::new(registry);
        if settings.prewarm {
            match cache.prewarm() {
                Ok(built) => info!("Prewarmed {} factories", built),
                Err(e) => warn!("Prewarm aborted: {}", e),
            }
        }
        cache
    }

    /// The shared cache, built from every `inventory`-registered constructor on first use.
    pub fn global() -> &'static FactoryCache {
        &GLOBAL
    }

    pub fn registry(&self) -> &ConstructorRegistry {
        &self.registry
    }

    pub fn get_or_build_factory(&self, target: TypeDescriptor, params: &[TypeDescriptor]) -> Result<Arc<Factory>, FactoryError> {
        self.get_or_build(Signature::new(target, params.to_vec()))
    }

    pub fn factory_for<T: 'static>(&self, params: &[TypeDescriptor]) -> Result<Arc<Factory>, FactoryError> {
        self.get_or_build_factory(TypeDescriptor::of::<T>(), params)
    }

    pub fn get_or_build_typed_factory<F: FactoryShape>(&self) -> Result<TypedFactory<F>, FactoryError> {
        F::check_returns_value()?;
        let factory = self.get_or_build(Signature::new(F::output(), F::params()))?;
        TypedFactory::bind(factory)
    }

    pub fn get_or_build(&self, signature: Signature) -> Result<Arc<Factory>, FactoryError> {
        if let Some(factory) = self.entries.read()?.get(&signature) {
            return Ok(Arc::clone(factory));
        }
        let ctor = self.registry.resolve(&signature)?;
        let mut entries = self.entries.write()?;
        let factory = entries.entry(signature).or_insert_with_key(|signature| {
            self.builds.fetch_add(1, Ordering::SeqCst);
            debug!("Built factory {} via {}", signature, ctor.name);
            Arc::new(Factory::bind(signature.clone(), ctor))
        });
        Ok(Arc::clone(factory))
    }

    /// Builds a factory for every unambiguous registered signature, returns how many were new.
    pub fn prewarm(&self) -> Result<usize, FactoryError> {
        let before = self.builds();
        for signature in self.registry.signatures() {
            match self.get_or_build(signature.clone()) {
                Ok(_) | Err(FactoryError::AmbiguousConstructor { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(self.builds() - before)
    }

    /// Number of factories ever inserted.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Arg, Instance};
    use crate::registry::{expect_arity, next_arg, ConstructorInfo};
    use crate::{args, logger::{self, LogLevel}};
    use std::sync::Barrier;
    use std::thread;

    #[derive(Debug, PartialEq)]
    struct Rgb(u8, u8, u8);

    fn rgb_params() -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::of::<u8>(); 3]
    }

    fn rgb_invoke(args: Vec<Arg>) -> Result<Instance, FactoryError> {
        expect_arity(&args, 3, "Rgb")?;
        let mut args = args.into_iter();
        let r = next_arg::<u8>(&mut args, 0, "Rgb")?;
        let g = next_arg::<u8>(&mut args, 1, "Rgb")?;
        let b = next_arg::<u8>(&mut args, 2, "Rgb")?;
        Ok(Box::new(Rgb(r, g, b)))
    }

    fn grey_params() -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::of::<u8>()]
    }

    fn grey_invoke(args: Vec<Arg>) -> Result<Instance, FactoryError> {
        expect_arity(&args, 1, "Rgb::grey")?;
        let mut args = args.into_iter();
        let v = next_arg::<u8>(&mut args, 0, "Rgb::grey")?;
        Ok(Box::new(Rgb(v, v, v)))
    }

    fn registry() -> ConstructorRegistry {
        ConstructorRegistry::empty()
            .with(ConstructorInfo { name: "Rgb", target: TypeDescriptor::of::<Rgb>, params: rgb_params, invoke: rgb_invoke })
            .with(ConstructorInfo { name: "Rgb::grey", target: TypeDescriptor::of::<Rgb>, params: grey_params, invoke: grey_invoke })
    }

    #[test]
    fn builds_once_per_signature() {
        let cache = FactoryCache::new(registry());
        let first = cache.factory_for::<Rgb>(&rgb_params()).unwrap();
        let second = cache.factory_for::<Rgb>(&rgb_params()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);

        let grey = cache.factory_for::<Rgb>(&grey_params()).unwrap();
        assert!(!Arc::ptr_eq(&first, &grey));
        assert_eq!(cache.builds(), 2);
        assert_eq!(cache.len(), 2);

        assert_eq!(first.invoke_as::<Rgb>(args![1u8, 2u8, 3u8]).unwrap(), Rgb(1, 2, 3));
        assert_eq!(grey.invoke_as::<Rgb>(args![9u8]).unwrap(), Rgb(9, 9, 9));
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = FactoryCache::new(registry());
        let err = cache.factory_for::<Rgb>(&[TypeDescriptor::of::<u16>()]).unwrap_err();
        assert!(matches!(err, FactoryError::NoMatchingConstructor { .. }));
        assert!(cache.is_empty());
        assert_eq!(cache.builds(), 0);
    }

    #[test]
    fn typed_factories_share_the_untyped_entry() {
        let cache = FactoryCache::new(registry());
        let typed = cache.get_or_build_typed_factory::<fn(u8) -> Rgb>().unwrap();
        let untyped = cache.factory_for::<Rgb>(&grey_params()).unwrap();
        assert!(Arc::ptr_eq(typed.factory(), &untyped));
        assert_eq!(typed.call((4,)).unwrap(), Rgb(4, 4, 4));
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn typed_factory_without_return_value_is_invalid() {
        let cache = FactoryCache::new(registry());
        let err = cache.get_or_build_typed_factory::<fn(u8)>().unwrap_err();
        assert!(matches!(err, FactoryError::InvalidFactoryShape { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_misses_converge_on_one_factory() {
        let cache = Arc::new(FactoryCache::new(registry()));
        let threads = 16;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let factory = cache.factory_for::<Rgb>(&rgb_params()).unwrap();
                    let v = i as u8;
                    assert_eq!(factory.invoke_as::<Rgb>(args![v, v, v]).unwrap(), Rgb(v, v, v));
                    factory
                })
            })
            .collect();
        let factories: Vec<Arc<Factory>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(factories.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn prewarm_fills_every_signature() {
        let settings = Settings { log_level: LogLevel::Warn, prewarm: true };
        let cache = FactoryCache::with_settings(registry(), &settings);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.prewarm().unwrap(), 0);
    }

    #[test]
    fn private_cache_keeps_process_log_level() {
        let before = logger::max_level();
        let noisy = if before == LogLevel::Debug { LogLevel::Off } else { LogLevel::Debug };
        let cache = FactoryCache::with_settings(registry(), &Settings { log_level: noisy, prewarm: false });
        assert!(cache.is_empty());
        assert_eq!(logger::max_level(), before);
    }
}
