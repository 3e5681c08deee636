use crate::{marshal::Marshaller, Argument, InvokeError, Value};
use alloc::{boxed::Box, collections::BTreeMap, rc::Rc, vec::Vec};
use ctorbridge_core::{
    raise::{Raise, RaiseWith as _},
    site::CallSite,
};
use ctorbridge_info::CallableInfo;

/// The signature of a native function.
///
/// Native functions receive their arguments in order, and return a single [`Argument`]. Errors
/// are reported using the host error type `E`.
pub type NativeFn<E> = dyn Fn(&[Argument]) -> Result<Argument, E>;

/// A set of native functions, looked up by symbol.
pub struct Library<E> {
    name: Box<str>,
    symbols: BTreeMap<Box<str>, Rc<NativeFn<E>>>,
}

impl<E> Library<E> {
    /// Creates an empty library.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            symbols: BTreeMap::new(),
        }
    }

    /// The name of the library.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a native function under the given `symbol`, replacing any existing one.
    ///
    /// # Safety
    ///
    /// Values returned by `function` must be valid for the return type of every [`CallableInfo`]
    /// it is invoked through. In particular, object pointers must either be null or point to a
    /// live object whose reference is described by [`CallableInfo::caller_owns()`].
    pub unsafe fn define<F>(&mut self, symbol: &str, function: F) -> &mut Self
    where
        F: Fn(&[Argument]) -> Result<Argument, E> + 'static,
    {
        self.symbols.insert(symbol.into(), Rc::new(function));
        self
    }

    /// Returns `true` if a native function is registered under the given `symbol`.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Looks up a native function.
    pub fn resolve(&self, symbol: &str) -> Option<&Rc<NativeFn<E>>> {
        self.symbols.get(symbol)
    }

    /// Calls the native function described by `info` with the given `args`.
    ///
    /// The arguments are converted according to the argument types of `info`, in order. For
    /// methods, the instance is expected as the first value. Exactly one call to the native
    /// function is made if the arguments could be converted.
    ///
    /// The returned [`Argument`] is not interpreted. If it contains a pointer, ownership of the
    /// pointed-to value is described by [`CallableInfo::caller_owns()`].
    ///
    /// # Errors
    ///
    /// Returns an [`InvokeError`] if the symbol could not be resolved, the number of `args` is
    /// wrong, or a value could not be converted. Errors returned by the native function itself
    /// are passed through unchanged.
    pub fn invoke_raw(
        &self,
        info: &CallableInfo,
        args: &[Value],
        site: Option<&'static CallSite>,
    ) -> Result<Argument, E>
    where
        E: Raise<InvokeError>,
    {
        let function = self
            .resolve(info.symbol())
            .ok_or_else(|| InvokeError::UnresolvedSymbol {
                symbol: info.symbol().into(),
            })
            .raise_with(site)?;

        let instance_count = usize::from(info.is_method());
        let expected = info.n_args() + instance_count;
        if args.len() != expected {
            return Err(E::raise(
                InvokeError::ArityMismatch {
                    function: info.symbol().into(),
                    expected,
                    actual: args.len(),
                },
                site,
            ));
        }

        let mut marshaller = Marshaller::default();
        let mut native_args = Vec::with_capacity(expected);

        let (instance, values) = args.split_at(instance_count);
        if let Some(instance) = instance.first() {
            native_args.push(marshaller.instance(info, instance).raise_with(site)?);
        }

        for (index, (arg, value)) in info.args().iter().zip(values).enumerate() {
            native_args.push(marshaller.marshal(index, arg, value).raise_with(site)?);
        }

        tracing::trace!(
            library = %self.name,
            symbol = info.symbol(),
            args = native_args.len(),
            "calling native function"
        );

        let result = (function)(&native_args);

        // Strings and objects passed to the function are kept alive until here.
        drop(marshaller);

        result
    }
}

impl<E> core::fmt::Debug for Library<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Library")
            .field("name", &self.name)
            .field("symbols", &self.symbols.keys().collect::<Vec<_>>())
            .finish()
    }
}
