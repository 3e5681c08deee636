use crate::{CallableInfo, InfoType};
use alloc::{boxed::Box, rc::Rc, vec::Vec};

struct Data {
    namespace: Box<str>,
    name: Box<str>,
    info_type: InfoType,
    parent: Option<BaseInfo>,
    methods: Box<[CallableInfo]>,
}

/// Describes a named entity of a namespace, such as an object, struct or function.
///
/// A [`BaseInfo`] is reference counted: [`clone()`] takes a new reference to the same descriptor,
/// and dropping it releases that reference.
///
/// Two [`BaseInfo`]s are equal if they have the same namespace, name and [`InfoType`]. The
/// descriptor returned by [`TypeInfo::interface()`] is a *reference* to the named type, which
/// compares equal to the full descriptor stored in the [`Repository`] but does not list methods.
///
/// [`clone()`]: Clone::clone()
/// [`TypeInfo::interface()`]: crate::TypeInfo::interface()
/// [`Repository`]: crate::Repository
#[derive(Clone)]
pub struct BaseInfo(Rc<Data>);

impl BaseInfo {
    /// Creates a descriptor without a parent or methods.
    pub fn new(namespace: &str, name: &str, info_type: InfoType) -> Self {
        Self::builder(namespace, name, info_type).build()
    }

    /// Begins building a descriptor, allowing a parent and methods to be specified.
    pub fn builder(namespace: &str, name: &str, info_type: InfoType) -> BaseInfoBuilder {
        BaseInfoBuilder {
            namespace: namespace.into(),
            name: name.into(),
            info_type,
            parent: None,
            methods: Vec::new(),
        }
    }

    /// The name of the namespace containing this descriptor.
    pub fn namespace(&self) -> &str {
        &self.0.namespace
    }

    /// The name of the descriptor, without the namespace.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The category of the descriptor.
    pub fn info_type(&self) -> InfoType {
        self.0.info_type
    }

    /// The parent class, for [`InfoType::Object`] descriptors that derive from another object.
    pub fn parent(&self) -> Option<&BaseInfo> {
        self.0.parent.as_ref()
    }

    /// The methods of this descriptor, including constructors.
    pub fn methods(&self) -> &[CallableInfo] {
        &self.0.methods
    }

    /// Finds a method by name.
    pub fn find_method(&self, name: &str) -> Option<&CallableInfo> {
        self.0.methods.iter().find(|method| method.name() == name)
    }

    /// Iterates over the methods marked as constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &CallableInfo> + '_ {
        self.0.methods.iter().filter(|method| method.is_constructor())
    }

    /// Creates a descriptor that only names this one, dropping its parent and methods.
    ///
    /// Used for the descriptors referred to by a [`TypeInfo`], which would otherwise form a
    /// reference cycle through the constructors of an object.
    ///
    /// [`TypeInfo`]: crate::TypeInfo
    pub fn to_reference(&self) -> Self {
        if self.0.parent.is_none() && self.0.methods.is_empty() {
            return self.clone();
        }

        Self::new(self.namespace(), self.name(), self.info_type())
    }

    /// The number of references to this descriptor.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl PartialEq for BaseInfo {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.0.info_type == other.0.info_type
                && self.0.name == other.0.name
                && self.0.namespace == other.0.namespace)
    }
}

impl Eq for BaseInfo {}

impl core::fmt::Debug for BaseInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BaseInfo")
            .field("namespace", &self.namespace())
            .field("name", &self.name())
            .field("info_type", &self.info_type())
            .finish_non_exhaustive()
    }
}

impl core::fmt::Display for BaseInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.namespace(), self.name())
    }
}

/// Builds a [`BaseInfo`]. Created by [`BaseInfo::builder()`].
#[derive(Debug)]
#[must_use]
pub struct BaseInfoBuilder {
    namespace: Box<str>,
    name: Box<str>,
    info_type: InfoType,
    parent: Option<BaseInfo>,
    methods: Vec<CallableInfo>,
}

impl BaseInfoBuilder {
    /// Sets the parent class.
    pub fn parent(mut self, parent: &BaseInfo) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Adds a method.
    pub fn method(mut self, method: CallableInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds multiple methods.
    pub fn methods<I: IntoIterator<Item = CallableInfo>>(mut self, methods: I) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Creates the [`BaseInfo`].
    pub fn build(self) -> BaseInfo {
        BaseInfo(Rc::new(Data {
            namespace: self.namespace,
            name: self.name,
            info_type: self.info_type,
            parent: self.parent,
            methods: self.methods.into_boxed_slice(),
        }))
    }
}
