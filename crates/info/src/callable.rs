use crate::TypeInfo;
use alloc::{boxed::Box, rc::Rc, vec::Vec};

/// Indicates whether ownership of a value moves across a native call.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Transfer {
    /// The receiving side must take its own reference if it wants to keep the value.
    #[default]
    Nothing,
    /// Only the container (such as an array) is transferred, not its elements.
    Container,
    /// The receiving side owns the value.
    Everything,
}

/// The direction in which an argument is passed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

/// Flags describing a [`CallableInfo`].
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct FunctionFlags(u8);

impl FunctionFlags {
    /// No flags are set.
    pub const NONE: Self = Self(0);
    /// The function takes an instance as its first argument.
    pub const IS_METHOD: Self = Self(1);
    /// The function creates a new instance of its container.
    pub const IS_CONSTRUCTOR: Self = Self(1 << 1);
    /// The function may report an error through an `GError**` out parameter.
    pub const THROWS: Self = Self(1 << 2);

    /// Returns `true` if all of the flags in `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl core::ops::BitOr for FunctionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl core::fmt::Debug for FunctionFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut set = f.debug_set();
        for (flag, name) in [
            (Self::IS_METHOD, "IS_METHOD"),
            (Self::IS_CONSTRUCTOR, "IS_CONSTRUCTOR"),
            (Self::THROWS, "THROWS"),
        ] {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// Describes an argument of a [`CallableInfo`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArgInfo {
    name: Box<str>,
    type_info: TypeInfo,
    direction: Direction,
    transfer: Transfer,
    may_be_null: bool,
}

impl ArgInfo {
    /// Describes an input argument that does not transfer ownership and may not be `NULL`.
    pub fn new(name: &str, type_info: TypeInfo) -> Self {
        Self {
            name: name.into(),
            type_info,
            direction: Direction::In,
            transfer: Transfer::Nothing,
            may_be_null: false,
        }
    }

    /// Sets the direction of the argument.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the ownership transfer of the argument. With [`Transfer::Everything`], the callee
    /// receives a reference of its own, which the caller never releases.
    #[must_use]
    pub fn with_transfer(mut self, transfer: Transfer) -> Self {
        self.transfer = transfer;
        self
    }

    /// Allows the argument to be `NULL`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.may_be_null = true;
        self
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(missing_docs)]
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    #[allow(missing_docs)]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[allow(missing_docs)]
    pub fn transfer(&self) -> Transfer {
        self.transfer
    }

    /// Returns `true` if `NULL` may be passed for this argument.
    pub fn may_be_null(&self) -> bool {
        self.may_be_null
    }
}

struct Data {
    name: Box<str>,
    symbol: Box<str>,
    container: Option<Box<str>>,
    flags: FunctionFlags,
    args: Box<[ArgInfo]>,
    return_type: TypeInfo,
    caller_owns: Transfer,
}

/// Describes the signature of a native function.
///
/// Like [`BaseInfo`], a [`CallableInfo`] is reference counted, and cloning it is cheap.
///
/// [`BaseInfo`]: crate::BaseInfo
#[derive(Clone)]
pub struct CallableInfo(Rc<Data>);

impl CallableInfo {
    /// Begins building the description of the native function with the given `name` and C
    /// `symbol`.
    pub fn builder(name: &str, symbol: &str) -> CallableInfoBuilder {
        CallableInfoBuilder {
            name: name.into(),
            symbol: symbol.into(),
            container: None,
            flags: FunctionFlags::NONE,
            args: Vec::new(),
            return_type: TypeInfo::VOID,
            caller_owns: Transfer::Nothing,
        }
    }

    /// The name of the function, without the name of its container.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The symbol used to look up the native function.
    pub fn symbol(&self) -> &str {
        &self.0.symbol
    }

    /// The name of the object or struct that this function is a method of.
    pub fn container(&self) -> Option<&str> {
        self.0.container.as_deref()
    }

    #[allow(missing_docs)]
    pub fn flags(&self) -> FunctionFlags {
        self.0.flags
    }

    /// Returns `true` if the [`FunctionFlags::IS_CONSTRUCTOR`] flag is set.
    pub fn is_constructor(&self) -> bool {
        self.0.flags.contains(FunctionFlags::IS_CONSTRUCTOR)
    }

    /// Returns `true` if the [`FunctionFlags::IS_METHOD`] flag is set.
    pub fn is_method(&self) -> bool {
        self.0.flags.contains(FunctionFlags::IS_METHOD)
    }

    /// The arguments of the function, in order.
    pub fn args(&self) -> &[ArgInfo] {
        &self.0.args
    }

    /// The number of arguments.
    pub fn n_args(&self) -> usize {
        self.0.args.len()
    }

    /// Loads the type of the value returned by the function.
    pub fn return_type(&self) -> &TypeInfo {
        &self.0.return_type
    }

    /// How ownership of the returned value is transferred to the caller.
    pub fn caller_owns(&self) -> Transfer {
        self.0.caller_owns
    }

    /// The number of references to this descriptor.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl PartialEq for CallableInfo {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CallableInfo {}

impl core::fmt::Debug for CallableInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallableInfo")
            .field("name", &self.name())
            .field("symbol", &self.symbol())
            .field("flags", &self.flags())
            .field("args", &self.n_args())
            .field("return_type", self.return_type())
            .finish_non_exhaustive()
    }
}

/// Builds a [`CallableInfo`]. Created by [`CallableInfo::builder()`].
#[derive(Debug)]
#[must_use]
pub struct CallableInfoBuilder {
    name: Box<str>,
    symbol: Box<str>,
    container: Option<Box<str>>,
    flags: FunctionFlags,
    args: Vec<ArgInfo>,
    return_type: TypeInfo,
    caller_owns: Transfer,
}

impl CallableInfoBuilder {
    /// Sets the name of the object or struct containing the function.
    pub fn container(mut self, container: &str) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Adds to the flags of the function.
    pub fn flags(mut self, flags: FunctionFlags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    /// Marks the function as a constructor.
    pub fn constructor(self) -> Self {
        self.flags(FunctionFlags::IS_CONSTRUCTOR)
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: ArgInfo) -> Self {
        self.args.push(arg);
        self
    }

    /// Sets the return type, and how ownership of the returned value is transferred.
    pub fn returns(mut self, return_type: TypeInfo, caller_owns: Transfer) -> Self {
        self.return_type = return_type;
        self.caller_owns = caller_owns;
        self
    }

    /// Creates the [`CallableInfo`].
    pub fn build(self) -> CallableInfo {
        CallableInfo(Rc::new(Data {
            name: self.name,
            symbol: self.symbol,
            container: self.container,
            flags: self.flags,
            args: self.args.into_boxed_slice(),
            return_type: self.return_type,
            caller_owns: self.caller_owns,
        }))
    }
}
