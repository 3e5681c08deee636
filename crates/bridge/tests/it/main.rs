//! Integration tests for constructor invocation, the host runtime and the loader.

mod loader;

use ctorbridge::{
    info::{ArgInfo, BaseInfo, BasicType, CallableInfo, InfoType, Repository, Transfer, TypeInfo},
    invoke::{Argument, Library},
    object::new_floating,
    BridgeError,
};
use std::{cell::RefCell, rc::Rc};

/// The value stored in `Demo.Widget` objects.
#[derive(Debug, PartialEq)]
pub struct Widget {
    pub size: i32,
    pub label: String,
}

/// The value stored in `Demo.Cursor` objects.
#[derive(Debug, PartialEq)]
pub struct Cursor {
    pub name: String,
}

/// Records the native calls made through [`demo_library()`].
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn object_type(name: &str) -> TypeInfo {
    TypeInfo::interface(&BaseInfo::new("Demo", name, InfoType::Object))
}

pub fn widget_new() -> CallableInfo {
    CallableInfo::builder("new", "demo_widget_new")
        .container("Widget")
        .constructor()
        .arg(ArgInfo::new("size", TypeInfo::basic(BasicType::Int32)))
        .arg(ArgInfo::new("label", TypeInfo::basic(BasicType::Utf8)))
        .returns(object_type("Widget"), Transfer::Nothing)
        .build()
}

pub fn button_new_with_label() -> CallableInfo {
    CallableInfo::builder("new_with_label", "demo_button_new_with_label")
        .container("Button")
        .constructor()
        .arg(ArgInfo::new("label", TypeInfo::basic(BasicType::Utf8)))
        .returns(object_type("Button"), Transfer::Nothing)
        .build()
}

pub fn cursor_new_from_name() -> CallableInfo {
    CallableInfo::builder("new_from_name", "demo_cursor_new_from_name")
        .container("Cursor")
        .constructor()
        .arg(ArgInfo::new("name", TypeInfo::basic(BasicType::Utf8)))
        .returns(object_type("Cursor"), Transfer::Everything)
        .build()
}

pub fn point_new() -> CallableInfo {
    let point = BaseInfo::new("Demo", "Point", InfoType::Struct);
    CallableInfo::builder("new", "demo_point_new")
        .container("Point")
        .constructor()
        .arg(ArgInfo::new("x", TypeInfo::basic(BasicType::Double)))
        .arg(ArgInfo::new("y", TypeInfo::basic(BasicType::Double)))
        .returns(TypeInfo::interface(&point), Transfer::Everything)
        .build()
}

/// Defines the `Demo` namespace, with `Button` listed before its parent `Widget`.
pub fn demo_repository() -> Repository {
    let widget = BaseInfo::builder("Demo", "Widget", InfoType::Object)
        .method(widget_new())
        .method(
            CallableInfo::builder("show", "demo_widget_show")
                .container("Widget")
                .build(),
        )
        .build();

    let button = BaseInfo::builder("Demo", "Button", InfoType::Object)
        .parent(&widget)
        .method(button_new_with_label())
        .build();

    let cursor = BaseInfo::builder("Demo", "Cursor", InfoType::Object)
        .method(cursor_new_from_name())
        .build();

    let point = BaseInfo::builder("Demo", "Point", InfoType::Struct)
        .method(point_new())
        .build();

    let mut repository = Repository::new();
    repository
        .define("Demo", "1.0", [button, widget, cursor, point])
        .unwrap();
    repository
}

/// Native implementations of the `Demo` constructors.
pub fn demo_library() -> (Library<BridgeError>, CallLog) {
    let log = CallLog::default();
    let mut library = Library::new("libdemo");

    let widget_new = {
        let log = log.clone();
        move |args: &[Argument]| {
            // SAFETY: argument types are described by `widget_new()`.
            let (size, label) =
                unsafe { (args[0].as_i32(), args[1].as_utf8().unwrap_or_default()) };
            log.borrow_mut()
                .push(format!("demo_widget_new({size}, {label:?})"));
            Ok(Argument::from_object(new_floating(Widget {
                size,
                label: label.into(),
            })))
        }
    };

    let button_new_with_label = {
        let log = log.clone();
        move |args: &[Argument]| {
            // SAFETY: argument types are described by `button_new_with_label()`.
            let label = unsafe { args[0].as_utf8().unwrap_or_default() };
            log.borrow_mut()
                .push(format!("demo_button_new_with_label({label:?})"));
            Ok(Argument::from_object(new_floating(Widget {
                size: 0,
                label: label.into(),
            })))
        }
    };

    let cursor_new_from_name = {
        let log = log.clone();
        move |args: &[Argument]| {
            // SAFETY: argument types are described by `cursor_new_from_name()`.
            let name = unsafe { args[0].as_utf8().unwrap_or_default() };
            log.borrow_mut()
                .push(format!("demo_cursor_new_from_name({name:?})"));
            Ok(Argument::from_object(new_floating(Cursor { name: name.into() })))
        }
    };

    let point_new = {
        let log = log.clone();
        move |args: &[Argument]| {
            // SAFETY: argument types are described by `point_new()`.
            let (x, y) = unsafe { (args[0].as_f64(), args[1].as_f64()) };
            log.borrow_mut().push(format!("demo_point_new({x}, {y})"));
            Ok(Argument::ZERO)
        }
    };

    // SAFETY: each function returns a new floating object, or null for `Demo.Point`.
    unsafe {
        library
            .define("demo_widget_new", widget_new)
            .define("demo_button_new_with_label", button_new_with_label)
            .define("demo_cursor_new_from_name", cursor_new_from_name)
            .define("demo_point_new", point_new);
    }

    (library, log)
}
