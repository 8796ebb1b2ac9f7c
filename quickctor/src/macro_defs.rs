/// Builds the positional argument list of a factory call.
///
/// ```
/// use quickctor::{args, Arg};
/// let args: Vec<Arg> = args![3, "three".to_string()];
/// assert!(args[0].is::<i32>());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::new($value)),+]
    };
}

/// Implements [`crate::FactoryShape`] for `fn(A, B, ..) -> R` pointer types of the given arities.
macro_rules! impl_factory_shape {
    ($( ( $($param:ident),* ) ),* $(,)?) => {
        $(
            impl<R: 'static, $($param: 'static),*> $crate::shape::FactoryShape for fn($($param),*) -> R {
                type Args = ($($param,)*);
                type Output = R;

                fn params() -> Vec<$crate::TypeDescriptor> {
                    vec![$($crate::TypeDescriptor::of::<$param>()),*]
                }

                #[allow(non_snake_case)]
                fn pack(args: Self::Args) -> Vec<$crate::Arg> {
                    let ($($param,)*) = args;
                    vec![$($crate::Arg::new($param)),*]
                }
            }
        )*
    };
}

pub(crate) use impl_factory_shape;
