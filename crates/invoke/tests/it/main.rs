//! Tests for argument marshalling and raw invocation.

use ctorbridge_core::{raise::Raise, site::CallSite};
use ctorbridge_info::{ArgInfo, BaseInfo, BasicType, CallableInfo, InfoType, Transfer, TypeInfo};
use ctorbridge_invoke::{Argument, InvokeError, Library, Value};
use ctorbridge_object::{new_owned, Object};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

#[derive(Debug, PartialEq)]
enum TestError {
    Invoke(InvokeError, Option<&'static CallSite>),
    Native(&'static str),
}

impl Raise<InvokeError> for TestError {
    fn raise(cause: InvokeError, site: Option<&'static CallSite>) -> Self {
        Self::Invoke(cause, site)
    }
}

static SITE: CallSite = CallSite::new("FunctionInfo", "invoke");

fn set_label() -> CallableInfo {
    CallableInfo::builder("set_label", "demo_set_label")
        .arg(ArgInfo::new("size", TypeInfo::basic(BasicType::Int8)))
        .arg(ArgInfo::new("label", TypeInfo::basic(BasicType::Utf8)))
        .arg(ArgInfo::new("visible", TypeInfo::basic(BasicType::Boolean)))
        .returns(TypeInfo::basic(BasicType::Int32), Default::default())
        .build()
}

#[test]
fn arguments_are_forwarded_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut library = Library::<TestError>::new("demo");
    let set_label_fn = {
        let seen = seen.clone();
        move |args: &[Argument]| {
            // SAFETY: argument types are described by `set_label()`.
            unsafe {
                seen.borrow_mut().push((
                    args[0].as_i8(),
                    args[1].as_utf8().map(String::from),
                    args[2].as_bool(),
                ));
            }
            Ok(Argument::from_i32(args.len() as i32))
        }
    };

    // SAFETY: returns a `gint32`.
    unsafe {
        library.define("demo_set_label", set_label_fn);
    }

    let result = library
        .invoke_raw(
            &set_label(),
            &[Value::from(42), Value::from("label"), Value::from(true)],
            Some(&SITE),
        )
        .unwrap();

    // SAFETY: return type is `gint32`.
    assert_eq!(unsafe { result.as_i32() }, 3);
    assert_eq!(
        *seen.borrow(),
        vec![(42, Some(String::from("label")), true)]
    );
}

#[test]
fn arity_is_checked_before_calling() {
    let calls = Rc::new(RefCell::new(0));

    let mut library = Library::<TestError>::new("demo");
    // SAFETY: returns a `gint32`.
    unsafe {
        library.define("demo_set_label", {
            let calls = calls.clone();
            move |_| {
                *calls.borrow_mut() += 1;
                Ok(Argument::ZERO)
            }
        });
    }

    let result = library.invoke_raw(&set_label(), &[Value::from(1)], Some(&SITE));
    let (error, site) = match result {
        Err(TestError::Invoke(error, site)) => (error, site),
        other => panic!("expected arity mismatch, got {other:?}"),
    };

    assert_eq!(site, Some(&SITE));
    assert_eq!(*calls.borrow(), 0);
    insta::assert_snapshot!(
        error,
        @"demo_set_label: wrong number of arguments (given 1, expected 3)"
    );
}

#[test]
fn marshalling_errors() {
    let mut library = Library::<TestError>::new("demo");
    // SAFETY: never returns.
    unsafe {
        library.define("demo_set_label", |_| panic!("native function should not be called"));
    }

    let invoke = |args: &[Value]| match library.invoke_raw(&set_label(), args, None) {
        Err(TestError::Invoke(error, None)) => error.to_string(),
        other => panic!("expected marshalling error, got {other:?}"),
    };

    insta::assert_snapshot!(
        invoke(&[Value::from(300), Value::from("a"), Value::from(false)]),
        @"argument #1: 300 is out of range for gint8"
    );
    insta::assert_snapshot!(
        invoke(&[Value::from(1), Value::Nil, Value::from(false)]),
        @"argument #2 (label) may not be nil"
    );
    insta::assert_snapshot!(
        invoke(&[Value::from(1), Value::from("a\0b"), Value::from(false)]),
        @"argument #2: string contains a NUL byte"
    );
    insta::assert_snapshot!(
        invoke(&[Value::from(1), Value::from("a"), Value::from(2.5)]),
        @"argument #3 (visible) must be gboolean, not float"
    );
}

#[test]
fn unresolved_symbol() {
    let library = Library::<TestError>::new("demo");
    let result = library.invoke_raw(&set_label(), &[], None);
    match result {
        Err(TestError::Invoke(InvokeError::UnresolvedSymbol { symbol, .. }, None)) => {
            assert_eq!(&*symbol, "demo_set_label");
        }
        other => panic!("expected unresolved symbol, got {other:?}"),
    }
}

#[test]
fn native_errors_pass_through() {
    let mut library = Library::<TestError>::new("demo");
    // SAFETY: never returns a value.
    unsafe {
        library.define("demo_fail", |_| Err(TestError::Native("native failure")));
    }

    let info = CallableInfo::builder("fail", "demo_fail").build();
    assert_eq!(
        library.invoke_raw(&info, &[], None).unwrap_err(),
        TestError::Native("native failure")
    );
}

#[test]
fn objects_and_enums() {
    let widget = BaseInfo::new("Demo", "Widget", InfoType::Object);
    let align = BaseInfo::new("Demo", "Align", InfoType::Enum);

    let info = CallableInfo::builder("attach", "demo_attach")
        .arg(ArgInfo::new("child", TypeInfo::interface(&widget)))
        .arg(ArgInfo::new("parent", TypeInfo::interface(&widget)).nullable())
        .arg(ArgInfo::new("align", TypeInfo::interface(&align)))
        .build();

    let child = new_owned(String::from("child"));
    let expected = child.as_raw();

    let mut library = Library::<TestError>::new("demo");
    let attach_fn = move |args: &[Argument]| {
        // SAFETY: argument types are described by `info`.
        unsafe {
            assert_eq!(args[0].as_object(), Some(expected));
            assert_eq!(args[1].as_object(), None);
            assert_eq!(args[2].as_i32(), 2);
        }
        Ok(Argument::ZERO)
    };

    // SAFETY: returns nothing.
    unsafe {
        library.define("demo_attach", attach_fn);
    }

    library
        .invoke_raw(
            &info,
            &[Value::from(child.clone()), Value::Nil, Value::from(2)],
            None,
        )
        .unwrap();

    assert_eq!(child.ref_count(), 1, "marshalled references are released");

    let result = library.invoke_raw(&info, &[Value::from(1), Value::Nil, Value::from(2)], None);
    assert!(
        matches!(
            &result,
            Err(TestError::Invoke(InvokeError::ArgumentType { index: 0, actual: "integer", .. }, _))
        ),
        "integers are not objects, got {result:?}"
    );
}

#[test]
fn transferred_objects_keep_a_reference() {
    let widget = BaseInfo::new("Demo", "Widget", InfoType::Object);
    let info = CallableInfo::builder("adopt", "demo_adopt")
        .arg(
            ArgInfo::new("child", TypeInfo::interface(&widget)).with_transfer(Transfer::Everything),
        )
        .build();

    let adopted = Rc::new(Cell::new(None));
    let mut library = Library::<TestError>::new("demo");
    let adopt_fn = {
        let adopted = adopted.clone();
        move |args: &[Argument]| {
            // SAFETY: argument types are described by `info`.
            adopted.set(unsafe { args[0].as_object() });
            Ok(Argument::ZERO)
        }
    };

    // SAFETY: returns nothing.
    unsafe {
        library.define("demo_adopt", adopt_fn);
    }

    let child = new_owned(String::from("child"));
    library
        .invoke_raw(&info, &[Value::from(child.clone())], None)
        .unwrap();

    assert_eq!(child.ref_count(), 2, "the callee owns a reference");

    // SAFETY: the reference was given to `demo_adopt`.
    drop(unsafe { Object::from_raw_full(adopted.take().unwrap()) });
    assert_eq!(child.ref_count(), 1);
}
