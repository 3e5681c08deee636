use crate::{Arity, BridgeCause, BridgeError, Class, Method, Runtime};
use alloc::{boxed::Box, format, rc::Rc, vec::Vec};
use ctorbridge_core::{raise::RaiseWith as _, site::CallSite};
use ctorbridge_info::{BaseInfo, CallableInfo, InfoType};
use ctorbridge_invoke::Value;

/// Customizes how a [`Loader`] defines the classes of a namespace.
///
/// Every method has a default implementation that does nothing special.
pub trait LoadHooks {
    /// Called before any class of the `namespace` is defined.
    ///
    /// # Errors
    ///
    /// An error stops the loader before any class is defined.
    fn pre_load(&mut self, runtime: &Runtime, namespace: &str) -> Result<(), BridgeError> {
        let _ = (runtime, namespace);
        Ok(())
    }

    /// Called after all classes of the `namespace` are defined.
    ///
    /// # Errors
    ///
    /// The error is returned by [`Loader::load()`], though the classes stay defined.
    fn post_load(&mut self, runtime: &Runtime, namespace: &str) -> Result<(), BridgeError> {
        let _ = (runtime, namespace);
        Ok(())
    }

    /// Returns `true` if no class should be defined for `info`.
    fn skip(&self, info: &BaseInfo) -> bool {
        let _ = info;
        false
    }

    /// Returns `true` if instances created by the `constructor` of `class` can be shared between
    /// calls with equal arguments.
    ///
    /// See [`Runtime::construct_cached()`] for the arguments that allow reuse.
    fn may_be_cached(&self, constructor: &CallableInfo, class: &Class) -> bool {
        let _ = (constructor, class);
        false
    }
}

impl LoadHooks for () {}

static LOAD: CallSite = CallSite::new("Loader", "load");

/// Defines host classes for the object types of a namespace.
///
/// Each object type becomes a class named `Namespace::Name`, deriving from the class of its
/// parent type when that class is defined. Each constructor becomes a class-level method named
/// after the constructor, which creates an instance with [`Runtime::construct()`].
#[derive(Debug)]
pub struct Loader<'rt, H = ()> {
    runtime: &'rt Runtime,
    hooks: H,
    version: Option<Box<str>>,
}

impl<'rt> Loader<'rt> {
    /// Creates a loader without any hooks.
    pub fn new(runtime: &'rt Runtime) -> Self {
        Self::with_hooks(runtime, ())
    }
}

impl<'rt, H: LoadHooks> Loader<'rt, H> {
    #[allow(missing_docs)]
    pub fn with_hooks(runtime: &'rt Runtime, hooks: H) -> Self {
        Self {
            runtime,
            hooks,
            version: None,
        }
    }

    /// Requires a specific version of the namespace.
    pub fn version(&mut self, version: &str) -> &mut Self {
        self.version = Some(version.into());
        self
    }

    #[allow(missing_docs)]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    #[allow(missing_docs)]
    pub fn into_hooks(self) -> H {
        self.hooks
    }

    /// Defines the classes of the given `namespace`, returning them in the order their
    /// descriptors appear in the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace could not be found in the repository, if a hook failed,
    /// or if a class was already defined with a different parent.
    pub fn load(&mut self, namespace: &str) -> Result<Vec<Rc<Class>>, BridgeError> {
        self.runtime.init_constructor_info()?;

        let infos = self
            .runtime
            .repository()
            .require(namespace, self.version.as_deref())
            .raise_with::<BridgeError>(Some(&LOAD))?
            .infos();

        tracing::debug!(namespace, infos = infos.len(), "loading namespace");

        self.hooks.pre_load(self.runtime, namespace)?;

        let mut classes = Vec::new();
        for info in infos {
            if info.info_type() != InfoType::Object {
                continue;
            }

            if self.hooks.skip(info) {
                tracing::trace!(%info, "skipped");
                continue;
            }

            classes.push(self.define_object(namespace, info)?);
        }

        self.hooks.post_load(self.runtime, namespace)?;

        tracing::debug!(namespace, classes = classes.len(), "loaded namespace");
        Ok(classes)
    }

    fn parent_class(
        &self,
        namespace: &str,
        info: &BaseInfo,
    ) -> Result<Option<Rc<Class>>, BridgeError> {
        let Some(parent) = info.parent() else {
            return Ok(None);
        };

        if parent.namespace() == namespace && !self.hooks.skip(parent) {
            if let Some(parent) = self.runtime.repository().find(namespace, parent.name()) {
                return self.define_object(namespace, &parent).map(Some);
            }
        }

        Ok(self.runtime.class(&class_name(parent)))
    }

    fn define_object(&self, namespace: &str, info: &BaseInfo) -> Result<Rc<Class>, BridgeError> {
        let name = class_name(info);
        if let Some(existing) = self.runtime.class(&name) {
            return Ok(existing);
        }

        let parent = self.parent_class(namespace, info)?;
        let gtype = self
            .runtime
            .types_mut()
            .register_object(&name, parent.as_ref().and_then(|parent| parent.gtype()));
        let class = self
            .runtime
            .define_class(&name, parent.as_ref(), Some(gtype))?;

        for constructor in info.constructors() {
            let cacheable = self.hooks.may_be_cached(constructor, &class);
            class.define_class_method(constructor_method(constructor, cacheable));
        }

        Ok(class)
    }
}

fn class_name(info: &BaseInfo) -> alloc::string::String {
    format!("{}::{}", info.namespace(), info.name())
}

fn constructor_method(constructor: &CallableInfo, cacheable: bool) -> Method {
    let info = constructor.clone();
    Method::new(constructor.name(), Arity::variadic(0), move |runtime, this, args| {
        let class = this.downcast_foreign::<Class>().ok_or_else(|| {
            BridgeError::new(
                BridgeCause::WrongType {
                    expected: "class",
                    actual: this.kind(),
                },
                None,
            )
        })?;

        let receiver = if cacheable {
            runtime.construct_cached(&class, &info, args)?
        } else {
            runtime.construct(&class, &info, args)?
        };

        Ok(Value::foreign(receiver))
    })
}
