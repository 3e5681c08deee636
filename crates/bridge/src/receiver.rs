use crate::runtime::Class;
use alloc::rc::Rc;
use core::cell::OnceCell;
use ctorbridge_object::Object;

/// An instance of a host [`Class`], whose native object is supplied by a constructor.
///
/// A receiver starts out empty, and is bound to an object at most once, typically by
/// [`ConstructorInfo::invoke()`].
///
/// [`ConstructorInfo::invoke()`]: crate::ConstructorInfo::invoke()
pub struct Receiver {
    class: Rc<Class>,
    object: OnceCell<Object>,
}

impl Receiver {
    /// Creates an empty instance of the given `class`.
    pub fn new(class: &Rc<Class>) -> Rc<Self> {
        Rc::new(Self {
            class: class.clone(),
            object: OnceCell::new(),
        })
    }

    /// The class of the instance.
    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    /// Returns `true` if the instance is bound to an object.
    pub fn is_initialized(&self) -> bool {
        self.object.get().is_some()
    }

    /// Gets the object the instance is bound to.
    pub fn object(&self) -> Option<&Object> {
        self.object.get()
    }

    /// Binds the instance to the given `object`, taking ownership of its reference.
    ///
    /// If the instance is already bound, the `object` is handed back.
    pub(crate) fn initialize(&self, object: Object) -> Result<(), Object> {
        self.object.set(object)
    }
}

impl ctorbridge_invoke::ForeignValue for Receiver {
    fn kind(&self) -> &'static str {
        "instance"
    }

    fn object(&self) -> Option<Object> {
        self.object.get().cloned()
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn core::any::Any> {
        self
    }
}

impl core::fmt::Debug for Receiver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Receiver")
            .field("class", &self.class.name())
            .field("object", &self.object.get())
            .finish()
    }
}
