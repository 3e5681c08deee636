//! The host runtime: registered types, classes and their methods.

use crate::{BridgeCause, BridgeError, ConstructorInfo, Receiver, RejectedReturn};
use alloc::{boxed::Box, collections::BTreeMap, format, rc::Rc, vec::Vec};
use core::{
    cell::{RefCell, RefMut},
    num::NonZeroUsize,
};
use ctorbridge_core::{raise::Raise, site::CallSite};
use ctorbridge_info::{CallableInfo, Repository};
use ctorbridge_invoke::{ForeignValue, Library, Value};

/// Identifies a type registered in a [`TypeRegistry`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct GType(NonZeroUsize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TypeKind {
    Boxed,
    Object,
}

#[derive(Debug)]
struct TypeEntry {
    name: Box<str>,
    kind: TypeKind,
    parent: Option<GType>,
}

/// Assigns a [`GType`] to each registered type name.
///
/// Registration is idempotent: registering a name again returns the [`GType`] it was first
/// given.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    names: BTreeMap<Box<str>, GType>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, kind: TypeKind, parent: Option<GType>) -> GType {
        if let Some(existing) = self.names.get(name) {
            return *existing;
        }

        let gtype = GType(NonZeroUsize::MIN.saturating_add(self.entries.len()));
        self.entries.push(TypeEntry {
            name: name.into(),
            kind,
            parent,
        });
        self.names.insert(name.into(), gtype);

        tracing::debug!(name, ?gtype, ?kind, "registered type");
        gtype
    }

    /// Registers a boxed type.
    ///
    /// Values of boxed types are reference counted: copying one adds a reference, and freeing it
    /// releases one.
    pub fn register_boxed(&mut self, name: &str) -> GType {
        self.register(name, TypeKind::Boxed, None)
    }

    /// Registers an object type deriving from the given `parent`.
    pub fn register_object(&mut self, name: &str, parent: Option<GType>) -> GType {
        self.register(name, TypeKind::Object, parent)
    }

    fn entry(&self, gtype: GType) -> Option<&TypeEntry> {
        self.entries.get(gtype.0.get() - 1)
    }

    /// Looks up a type by name.
    pub fn from_name(&self, name: &str) -> Option<GType> {
        self.names.get(name).copied()
    }

    #[allow(missing_docs)]
    pub fn name(&self, gtype: GType) -> Option<&str> {
        self.entry(gtype).map(|entry| &*entry.name)
    }

    #[allow(missing_docs)]
    pub fn parent(&self, gtype: GType) -> Option<GType> {
        self.entry(gtype).and_then(|entry| entry.parent)
    }

    /// Returns `true` if the `gtype` was registered with [`TypeRegistry::register_boxed()`].
    pub fn is_boxed(&self, gtype: GType) -> bool {
        self.entry(gtype)
            .is_some_and(|entry| entry.kind == TypeKind::Boxed)
    }

    /// Returns `true` if `gtype` is `ancestor` or derives from it.
    pub fn is_a(&self, gtype: GType, ancestor: GType) -> bool {
        let mut current = Some(gtype);
        while let Some(gtype) = current {
            if gtype == ancestor {
                return true;
            }

            current = self.parent(gtype);
        }

        false
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The number of arguments a [`Method`] accepts.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Arity {
    /// Exactly this many arguments.
    Fixed(usize),
    /// At least `required` arguments.
    #[non_exhaustive]
    Variadic {
        #[allow(missing_docs)]
        required: usize,
    },
}

impl Arity {
    /// Any number of arguments, at least `required`.
    pub const fn variadic(required: usize) -> Self {
        Self::Variadic { required }
    }

    /// Returns `true` if a call with `count` arguments is allowed.
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Fixed(expected) => count == expected,
            Self::Variadic { required } => count >= required,
        }
    }
}

impl core::fmt::Display for Arity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(expected) => write!(f, "{expected}"),
            Self::Variadic { required } => write!(f, "{required}+"),
        }
    }
}

/// The signature of a host method implementation.
///
/// Methods receive the runtime, the value the method was called on (`self`), and the arguments.
pub type MethodFn = dyn Fn(&Runtime, &Value, &[Value]) -> Result<Value, BridgeError>;

/// A host method.
#[derive(Clone)]
pub struct Method {
    name: Box<str>,
    arity: Arity,
    function: Rc<MethodFn>,
}

impl Method {
    /// Creates a method with the given `name` and `arity`.
    pub fn new<F>(name: &str, arity: Arity, function: F) -> Self
    where
        F: Fn(&Runtime, &Value, &[Value]) -> Result<Value, BridgeError> + 'static,
    {
        Self {
            name: name.into(),
            arity,
            function: Rc::new(function),
        }
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(missing_docs)]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Calls the method, after checking the number of `args`.
    ///
    /// # Errors
    ///
    /// Returns an `ArgumentError` if the method does not accept that many arguments, or any error
    /// produced by the method itself.
    pub fn call(
        &self,
        runtime: &Runtime,
        this: &Value,
        args: &[Value],
    ) -> Result<Value, BridgeError> {
        if !self.arity.accepts(args.len()) {
            return Err(BridgeError::new(
                BridgeCause::ArgumentCount {
                    method: self.name.clone(),
                    given: args.len(),
                    expected: self.arity,
                },
                None,
            ));
        }

        (self.function)(runtime, this, args)
    }
}

impl core::fmt::Debug for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A host class, with instance methods and class-level methods.
///
/// Method lookup walks the chain of parent classes. Classes are themselves host values, and
/// class-level methods are called on the class.
pub struct Class {
    name: Box<str>,
    parent: Option<Rc<Class>>,
    gtype: Option<GType>,
    methods: RefCell<BTreeMap<Box<str>, Method>>,
    class_methods: RefCell<BTreeMap<Box<str>, Method>>,
}

impl Class {
    /// The fully qualified name of the class, such as `Demo::Widget`.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(missing_docs)]
    pub fn parent(&self) -> Option<&Rc<Class>> {
        self.parent.as_ref()
    }

    /// The type of the native values wrapped by instances of the class.
    pub fn gtype(&self) -> Option<GType> {
        self.gtype
    }

    /// Defines an instance method, replacing any existing one with the same name.
    pub fn define_method(&self, method: Method) {
        self.methods.borrow_mut().insert(method.name.clone(), method);
    }

    /// Defines a class-level method, replacing any existing one with the same name.
    pub fn define_class_method(&self, method: Method) {
        self.class_methods
            .borrow_mut()
            .insert(method.name.clone(), method);
    }

    fn lookup(
        &self,
        name: &str,
        table: fn(&Class) -> &RefCell<BTreeMap<Box<str>, Method>>,
    ) -> Option<Method> {
        let mut class = Some(self);
        while let Some(current) = class {
            if let Some(method) = table(current).borrow().get(name) {
                return Some(method.clone());
            }

            class = current.parent.as_deref();
        }

        None
    }

    /// Finds an instance method defined on this class or one of its parents.
    pub fn find_method(&self, name: &str) -> Option<Method> {
        self.lookup(name, |class| &class.methods)
    }

    /// Finds a class-level method defined on this class or one of its parents.
    pub fn find_class_method(&self, name: &str) -> Option<Method> {
        self.lookup(name, |class| &class.class_methods)
    }

    /// Returns `true` if this class is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut class = Some(self);
        while let Some(current) = class {
            if core::ptr::eq(current, other) {
                return true;
            }

            class = current.parent.as_deref();
        }

        false
    }
}

impl ForeignValue for Class {
    fn kind(&self) -> &'static str {
        "class"
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn core::any::Any> {
        self
    }
}

impl core::fmt::Debug for Class {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .field("gtype", &self.gtype)
            .field("methods", &self.methods.borrow().keys().collect::<Vec<_>>())
            .field(
                "class_methods",
                &self.class_methods.borrow().keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A host value wrapping a [`CallableInfo`], as an instance of `FunctionInfo` or
/// `ConstructorInfo`.
///
/// Cloning adds a reference to the descriptor.
#[derive(Clone, Debug)]
pub struct InfoValue {
    class: Rc<Class>,
    info: CallableInfo,
}

impl InfoValue {
    #[allow(missing_docs)]
    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    #[allow(missing_docs)]
    pub fn info(&self) -> &CallableInfo {
        &self.info
    }
}

impl ForeignValue for InfoValue {
    fn kind(&self) -> &'static str {
        if self.info.is_constructor() {
            "constructor info"
        } else {
            "function info"
        }
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn core::any::Any> {
        self
    }
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum CacheKey {
    Nil,
    Bool(bool),
    Integer(i64),
    String(Rc<str>),
}

impl CacheKey {
    fn from_args(args: &[Value]) -> Option<Vec<Self>> {
        args.iter()
            .map(|arg| match arg {
                Value::Nil => Some(Self::Nil),
                Value::Bool(b) => Some(Self::Bool(*b)),
                Value::Integer(i) => Some(Self::Integer(*i)),
                Value::String(s) => Some(Self::String(s.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Cached instances are keyed by class, since constructors are inherited by subclasses.
type ConstructorKey = (Box<str>, Box<str>, Vec<CacheKey>);

static CONSTRUCTOR_INFO_INVOKE: CallSite = CallSite::new("ConstructorInfo", "invoke");
static CONSTRUCT: CallSite = CallSite::new("Class", "new");

/// Used to create a [`Runtime`].
///
/// ```
/// # use ctorbridge::{RejectedReturn, Runtime};
/// let runtime = Runtime::builder()
///     .base_module("Introspection")
///     .rejected_return(RejectedReturn::Release)
///     .build();
///
/// assert_eq!(runtime.base_module(), "Introspection");
/// ```
#[derive(Debug)]
pub struct RuntimeBuilder {
    base_module: Box<str>,
    repository: Repository,
    library: Option<Library<BridgeError>>,
    rejected_return: RejectedReturn,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    /// Gets the default options.
    pub fn new() -> Self {
        Self {
            base_module: "GObjectIntrospection".into(),
            repository: Repository::new(),
            library: None,
            rejected_return: RejectedReturn::default(),
        }
    }

    /// Sets the name of the module containing the `FunctionInfo` and `ConstructorInfo` classes.
    /// Defaults to `GObjectIntrospection`.
    pub fn base_module(&mut self, name: &str) -> &mut Self {
        self.base_module = name.into();
        self
    }

    /// Sets the repository that namespaces are loaded from.
    pub fn repository(&mut self, repository: Repository) -> &mut Self {
        self.repository = repository;
        self
    }

    /// Sets the library that native functions are resolved in.
    pub fn library(&mut self, library: Library<BridgeError>) -> &mut Self {
        self.library = Some(library);
        self
    }

    /// Sets what happens to values returned by constructors whose return type is refused.
    /// Defaults to [`RejectedReturn::Leak`].
    ///
    /// See the documentation for [`RejectedReturn`] for more information.
    pub fn rejected_return(&mut self, policy: RejectedReturn) -> &mut Self {
        self.rejected_return = policy;
        self
    }

    /// Creates the [`Runtime`], leaving the default options in the builder.
    pub fn build(&mut self) -> Runtime {
        let options = core::mem::take(self);
        Runtime {
            library: options
                .library
                .unwrap_or_else(|| Library::new(&options.base_module)),
            base_module: options.base_module,
            repository: options.repository,
            rejected_return: options.rejected_return,
            types: RefCell::default(),
            classes: RefCell::default(),
            constructor_cache: RefCell::default(),
        }
    }
}

/// Contains the host classes and the native functions they call.
pub struct Runtime {
    base_module: Box<str>,
    repository: Repository,
    library: Library<BridgeError>,
    rejected_return: RejectedReturn,
    types: RefCell<TypeRegistry>,
    classes: RefCell<BTreeMap<Box<str>, Rc<Class>>>,
    constructor_cache: RefCell<BTreeMap<ConstructorKey, Rc<Receiver>>>,
}

impl Runtime {
    /// Gets the default options for creating a [`Runtime`].
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    #[allow(missing_docs)]
    pub fn base_module(&self) -> &str {
        &self.base_module
    }

    #[allow(missing_docs)]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    #[allow(missing_docs)]
    pub fn library(&self) -> &Library<BridgeError> {
        &self.library
    }

    #[allow(missing_docs)]
    pub fn rejected_return(&self) -> RejectedReturn {
        self.rejected_return
    }

    /// Calls `f` with the registered types.
    ///
    /// # Panics
    ///
    /// Panics if `f` registers types, for example by loading a namespace.
    pub fn with_types<R>(&self, f: impl FnOnce(&TypeRegistry) -> R) -> R {
        f(&self.types.borrow())
    }

    pub(crate) fn types_mut(&self) -> RefMut<'_, TypeRegistry> {
        self.types.borrow_mut()
    }

    /// Defines a class with the given fully qualified `name`.
    ///
    /// If the class already exists, it is returned as is.
    ///
    /// # Errors
    ///
    /// Returns a `TypeError` if the class already exists with a different parent.
    pub fn define_class(
        &self,
        name: &str,
        parent: Option<&Rc<Class>>,
        gtype: Option<GType>,
    ) -> Result<Rc<Class>, BridgeError> {
        let mut classes = self.classes.borrow_mut();
        if let Some(existing) = classes.get(name) {
            let same_parent = match (existing.parent(), parent) {
                (None, None) => true,
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                _ => false,
            };

            return if same_parent {
                Ok(existing.clone())
            } else {
                Err(BridgeError::new(
                    BridgeCause::SuperclassMismatch { class: name.into() },
                    None,
                ))
            };
        }

        let class = Rc::new(Class {
            name: name.into(),
            parent: parent.cloned(),
            gtype,
            methods: RefCell::default(),
            class_methods: RefCell::default(),
        });

        tracing::debug!(
            name,
            parent = ?parent.map(|parent| parent.name()),
            "defined class"
        );

        classes.insert(name.into(), class.clone());
        Ok(class)
    }

    /// Looks up a class by its fully qualified name.
    pub fn class(&self, name: &str) -> Option<Rc<Class>> {
        self.classes.borrow().get(name).cloned()
    }

    /// Gets the class of a host value, if it has one.
    pub fn class_of(&self, value: &Value) -> Option<Rc<Class>> {
        if let Some(receiver) = value.downcast_foreign_ref::<Receiver>() {
            Some(receiver.class().clone())
        } else {
            value
                .downcast_foreign_ref::<InfoValue>()
                .map(|info| info.class().clone())
        }
    }

    /// Calls the method named `method` on the value `this`.
    ///
    /// If `this` is a [`Class`], a class-level method is called. Otherwise, an instance method of
    /// the class of `this` is called.
    ///
    /// # Errors
    ///
    /// Returns a `NoMethodError` if no such method is defined, or any error produced by the
    /// method.
    pub fn call(&self, this: &Value, method: &str, args: &[Value]) -> Result<Value, BridgeError> {
        if let Some(class) = this.downcast_foreign_ref::<Class>() {
            let found = class.find_class_method(method);
            return self.call_found(found, class.name(), this, method, args);
        }

        match self.class_of(this) {
            Some(class) => {
                let found = class.find_method(method);
                self.call_found(found, class.name(), this, method, args)
            }
            None => self.call_found(None, this.kind(), this, method, args),
        }
    }

    fn call_found(
        &self,
        found: Option<Method>,
        receiver: &str,
        this: &Value,
        method: &str,
        args: &[Value],
    ) -> Result<Value, BridgeError> {
        let Some(found) = found else {
            return Err(BridgeError::new(
                BridgeCause::UndefinedMethod {
                    receiver: receiver.into(),
                    method: method.into(),
                },
                None,
            ));
        };

        tracing::trace!(receiver, method, args = args.len(), "calling method");
        found.call(self, this, args)
    }

    fn init_function_info(&self) -> Result<Rc<Class>, BridgeError> {
        let gtype = self.types_mut().register_boxed("GIFunctionInfo");
        let name = format!("{}::FunctionInfo", self.base_module);
        let class = self.define_class(&name, None, Some(gtype))?;

        class.define_method(Method::new("name", Arity::Fixed(0), |_, this, _| {
            Ok(Value::from(info_of(this)?.name()))
        }));
        class.define_method(Method::new("symbol", Arity::Fixed(0), |_, this, _| {
            Ok(Value::from(info_of(this)?.symbol()))
        }));
        class.define_method(Method::new("n_args", Arity::Fixed(0), |_, this, _| {
            let n_args = info_of(this)?.n_args();
            Ok(Value::Integer(i64::try_from(n_args).unwrap_or(i64::MAX)))
        }));

        Ok(class)
    }

    /// Registers the `GIConstructorInfo` boxed type, and defines the `ConstructorInfo` class
    /// deriving from `FunctionInfo`, in the base module.
    ///
    /// `ConstructorInfo` has a single method, `invoke`, which takes a [`Receiver`] followed by
    /// the arguments to the native constructor, calls [`ConstructorInfo::invoke()`], and returns
    /// the receiver.
    ///
    /// Calling this more than once returns the same class.
    ///
    /// [`ConstructorInfo::invoke()`]: crate::ConstructorInfo::invoke()
    ///
    /// # Errors
    ///
    /// Returns an error if either class was already defined differently.
    pub fn init_constructor_info(&self) -> Result<Rc<Class>, BridgeError> {
        let function_info = self.init_function_info()?;
        let gtype = self.types_mut().register_boxed("GIConstructorInfo");
        let name = format!("{}::ConstructorInfo", self.base_module);
        let class = self.define_class(&name, Some(&function_info), Some(gtype))?;

        class.define_method(Method::new("invoke", Arity::variadic(1), invoke_constructor));

        Ok(class)
    }

    /// Wraps a descriptor as an instance of `ConstructorInfo` if it describes a constructor, or
    /// of `FunctionInfo` otherwise.
    ///
    /// # Errors
    ///
    /// See [`Runtime::init_constructor_info()`].
    pub fn wrap_info(&self, info: &CallableInfo) -> Result<Value, BridgeError> {
        let constructor_info = self.init_constructor_info()?;
        let class = match constructor_info.parent() {
            Some(function_info) if !info.is_constructor() => function_info.clone(),
            _ => constructor_info,
        };

        Ok(Value::foreign(Rc::new(InfoValue {
            class,
            info: info.clone(),
        })))
    }

    /// Creates a new instance of `class`, initialized by the native constructor described by
    /// `info`.
    ///
    /// # Errors
    ///
    /// Returns any error produced by [`ConstructorInfo::invoke()`].
    pub fn construct(
        &self,
        class: &Rc<Class>,
        info: &CallableInfo,
        args: &[Value],
    ) -> Result<Rc<Receiver>, BridgeError> {
        let receiver = Receiver::new(class);
        ConstructorInfo::new(info.clone())
            .with_rejected_return(self.rejected_return)
            .invoke(&self.library, &receiver, args, Some(&CONSTRUCT))
    }

    /// Like [`Runtime::construct()`], except that the same instance is returned for repeated
    /// calls on the same `class` with equal arguments.
    ///
    /// Only calls where every argument is `nil`, a boolean, an integer or a string are cached.
    /// Other calls always create a new instance.
    ///
    /// # Errors
    ///
    /// Returns any error produced by [`ConstructorInfo::invoke()`]. Errors are not cached.
    pub fn construct_cached(
        &self,
        class: &Rc<Class>,
        info: &CallableInfo,
        args: &[Value],
    ) -> Result<Rc<Receiver>, BridgeError> {
        let Some(key) = CacheKey::from_args(args) else {
            return self.construct(class, info, args);
        };

        let key: ConstructorKey = (class.name().into(), info.symbol().into(), key);
        if let Some(cached) = self.constructor_cache.borrow().get(&key) {
            tracing::trace!(constructor = info.symbol(), "reusing cached instance");
            return Ok(cached.clone());
        }

        let receiver = self.construct(class, info, args)?;
        self.constructor_cache
            .borrow_mut()
            .insert(key, receiver.clone());
        Ok(receiver)
    }
}

impl core::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Runtime")
            .field("base_module", &self.base_module)
            .field("library", &self.library)
            .field("rejected_return", &self.rejected_return)
            .field("classes", &self.classes.borrow().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn info_of(this: &Value) -> Result<&CallableInfo, BridgeError> {
    this.downcast_foreign_ref::<InfoValue>()
        .map(InfoValue::info)
        .ok_or_else(|| {
            BridgeError::new(
                BridgeCause::WrongType {
                    expected: "function info",
                    actual: this.kind(),
                },
                None,
            )
        })
}

fn invoke_constructor(
    runtime: &Runtime,
    this: &Value,
    args: &[Value],
) -> Result<Value, BridgeError> {
    let site = Some(&CONSTRUCTOR_INFO_INVOKE);
    let info = info_of(this).map_err(|e| e.with_site(&CONSTRUCTOR_INFO_INVOKE))?;

    let Some((receiver, args)) = args.split_first() else {
        return Err(BridgeError::raise(
            BridgeCause::ArgumentCount {
                method: "invoke".into(),
                given: 0,
                expected: Arity::variadic(1),
            },
            site,
        ));
    };

    let receiver = receiver.downcast_foreign::<Receiver>().ok_or_else(|| {
        BridgeError::raise(
            BridgeCause::WrongType {
                expected: "instance",
                actual: receiver.kind(),
            },
            site,
        )
    })?;

    ConstructorInfo::new(info.clone())
        .with_rejected_return(runtime.rejected_return)
        .invoke(&runtime.library, &receiver, args, site)
        .map(Value::foreign)
}
