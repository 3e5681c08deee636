//! Tests for reference counting and floating references.

use ctorbridge_object::{new_floating, new_owned, ref_sink, Object, ObjectClass, RawObject};
use std::{cell::Cell, rc::Rc};

#[derive(Debug)]
struct Widget {
    size: u32,
    finalized: Rc<Cell<bool>>,
}

impl Drop for Widget {
    fn drop(&mut self) {
        self.finalized.set(true);
    }
}

fn widget(size: u32) -> (RawObject, Rc<Cell<bool>>) {
    let finalized = Rc::new(Cell::new(false));
    let raw = new_floating(Widget {
        size,
        finalized: finalized.clone(),
    });
    (raw, finalized)
}

#[test]
fn sink_floating_reference() {
    let (raw, finalized) = widget(5);

    // SAFETY: the floating reference keeps the object alive.
    unsafe {
        assert!(raw.is_floating());
        assert_eq!(raw.ref_count(), 1);
    }

    // SAFETY: object is alive.
    let object = unsafe { ref_sink(raw) };
    assert_eq!(object.ref_count(), 1, "sinking a floating reference must not add one");
    assert!(!object.is_floating());
    assert_eq!(object.downcast_ref::<Widget>().map(|w| w.size), Some(5));

    drop(object);
    assert!(finalized.get(), "last reference was released");
}

#[test]
fn sink_owned_reference_is_additive() {
    let finalized = Rc::new(Cell::new(false));
    let kept_by_library = new_owned(Widget {
        size: 1,
        finalized: finalized.clone(),
    });

    // SAFETY: `kept_by_library` keeps the object alive.
    let sunk = unsafe { ref_sink(kept_by_library.as_raw()) };
    assert_eq!(sunk.ref_count(), 2);
    assert!(Object::ptr_eq(&sunk, &kept_by_library));

    drop(sunk);
    assert!(!finalized.get());
    assert_eq!(kept_by_library.ref_count(), 1);

    drop(kept_by_library);
    assert!(finalized.get());
}

#[test]
fn clone_and_raw_round_trip() {
    let (raw, finalized) = widget(2);

    // SAFETY: the floating reference is adopted without sinking it.
    let object = unsafe { Object::from_raw_full(raw) };
    assert!(object.is_floating());

    let cloned = object.clone();
    assert_eq!(object.ref_count(), 2);

    let carried = cloned.into_raw();
    assert_eq!(object.ref_count(), 2, "into_raw must not release the reference");

    // SAFETY: `carried` carries the reference given up by `into_raw`.
    drop(unsafe { Object::from_raw_full(carried) });
    assert_eq!(object.ref_count(), 1);

    // SAFETY: `object` keeps it alive.
    let borrowed = unsafe { Object::from_raw_none(object.as_raw()) };
    assert_eq!(borrowed.ref_count(), 2);
    drop(borrowed);
    drop(object);
    assert!(finalized.get());
}

#[test]
fn raw_pointer_conversion() {
    let object = new_owned(7u64);
    let pointer = object.as_raw().as_ptr();

    // SAFETY: pointer originates from `as_ptr`.
    let raw = unsafe { RawObject::from_ptr(pointer) };
    assert_eq!(raw, Some(object.as_raw()));

    // SAFETY: null is allowed.
    assert_eq!(unsafe { RawObject::from_ptr(std::ptr::null_mut()) }, None);
}

#[test]
fn downcast_checks_class() {
    let object = new_owned(42i32);
    assert_eq!(object.downcast_ref::<i32>(), Some(&42));
    assert_eq!(object.downcast_ref::<u32>(), None);
    assert_eq!(object.class(), ObjectClass::of::<i32>());
    assert_ne!(object.class(), ObjectClass::of::<u32>());
    assert_eq!(object.type_name(), "i32");
}

#[test]
fn debug_output() {
    let object = new_owned(42i32);
    insta::assert_snapshot!(
        format!("{object:?}"),
        @r###"Object { type_name: "i32", ref_count: 1, value: 42 }"###
    );
}
