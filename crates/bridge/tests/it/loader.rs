use crate::{cursor_new_from_name, demo_library, demo_repository, Cursor, Widget};
use ctorbridge::{
    info::{BaseInfo, CallableInfo},
    invoke::Value,
    BridgeError, Class, ExceptionClass, LoadHooks, Loader, Receiver, Runtime,
};
use std::rc::Rc;

fn demo_runtime() -> (Runtime, crate::CallLog) {
    let (library, log) = demo_library();
    let runtime = Runtime::builder()
        .repository(demo_repository())
        .library(library)
        .build();
    (runtime, log)
}

fn construct(runtime: &Runtime, class: &str, constructor: &str, args: &[Value]) -> Rc<Receiver> {
    let class = runtime.class(class).unwrap();
    runtime
        .call(&Value::foreign(class), constructor, args)
        .unwrap()
        .downcast_foreign::<Receiver>()
        .unwrap()
}

#[test]
fn load_defines_object_classes() {
    let (runtime, _) = demo_runtime();
    let classes = Loader::new(&runtime).load("Demo").unwrap();

    let names = classes.iter().map(|class| class.name()).collect::<Vec<_>>();
    assert_eq!(names, ["Demo::Button", "Demo::Widget", "Demo::Cursor"]);
    assert!(runtime.class("Demo::Point").is_none(), "structs are not loaded");
    assert!(
        runtime.class("GObjectIntrospection::ConstructorInfo").is_some(),
        "loading initializes ConstructorInfo"
    );

    let button = &classes[0];
    let widget = &classes[1];
    assert!(Rc::ptr_eq(button.parent().unwrap(), widget));

    runtime.with_types(|types| {
        assert!(types.is_a(button.gtype().unwrap(), widget.gtype().unwrap()));
        assert_eq!(types.name(button.gtype().unwrap()), Some("Demo::Button"));
    });

    assert!(widget.find_class_method("new").is_some());
    assert!(
        widget.find_class_method("show").is_none(),
        "only constructors become class-level methods"
    );

    // Loading again reuses the existing classes.
    let again = Loader::new(&runtime).load("Demo").unwrap();
    assert!(Rc::ptr_eq(&again[0], button));
}

#[test]
fn class_level_constructors() {
    let (runtime, log) = demo_runtime();
    Loader::new(&runtime).load("Demo").unwrap();

    let button = construct(&runtime, "Demo::Button", "new_with_label", &[Value::from("OK")]);
    assert_eq!(button.class().name(), "Demo::Button");
    assert_eq!(
        button.object().unwrap().downcast_ref::<Widget>(),
        Some(&Widget {
            size: 0,
            label: String::from("OK"),
        })
    );

    // Inherited from `Demo::Widget`.
    let inherited = construct(
        &runtime,
        "Demo::Button",
        "new",
        &[Value::from(3), Value::from("Cancel")],
    );
    assert_eq!(inherited.class().name(), "Demo::Button");
    assert_eq!(inherited.object().unwrap().ref_count(), 1);

    assert_eq!(
        *log.borrow(),
        [
            "demo_button_new_with_label(\"OK\")",
            "demo_widget_new(3, \"Cancel\")"
        ]
    );

    let widget = runtime.class("Demo::Widget").unwrap();
    let error = runtime
        .call(&Value::foreign(widget), "new", &[Value::from("3")])
        .unwrap_err();
    assert_eq!(error.exception_class(), ExceptionClass::ArgumentError);
    insta::assert_snapshot!(
        error,
        @"demo_widget_new: wrong number of arguments (given 1, expected 2) (in Class#new)"
    );
}

struct CursorCache;

impl LoadHooks for CursorCache {
    fn may_be_cached(&self, constructor: &CallableInfo, class: &Class) -> bool {
        class.name() == "Demo::Cursor" && constructor.name() == "new_from_name"
    }
}

#[test]
fn cached_constructors() {
    let (runtime, log) = demo_runtime();
    Loader::with_hooks(&runtime, CursorCache)
        .load("Demo")
        .unwrap();

    let pointer = construct(&runtime, "Demo::Cursor", "new_from_name", &[Value::from("pointer")]);
    let again = construct(&runtime, "Demo::Cursor", "new_from_name", &[Value::from("pointer")]);
    let text = construct(&runtime, "Demo::Cursor", "new_from_name", &[Value::from("text")]);

    assert!(Rc::ptr_eq(&pointer, &again));
    assert!(!Rc::ptr_eq(&pointer, &text));
    assert_eq!(
        pointer.object().unwrap().downcast_ref::<Cursor>(),
        Some(&Cursor {
            name: String::from("pointer")
        })
    );
    assert_eq!(
        *log.borrow(),
        [
            "demo_cursor_new_from_name(\"pointer\")",
            "demo_cursor_new_from_name(\"text\")"
        ]
    );

    let fancy = runtime
        .define_class("Demo::FancyCursor", Some(pointer.class()), None)
        .unwrap();
    let inherited = runtime
        .call(&Value::foreign(fancy), "new_from_name", &[Value::from("pointer")])
        .unwrap()
        .downcast_foreign::<Receiver>()
        .unwrap();
    let plain = construct(&runtime, "Demo::Cursor", "new_from_name", &[Value::from("pointer")]);

    assert_eq!(inherited.class().name(), "Demo::FancyCursor");
    assert_eq!(plain.class().name(), "Demo::Cursor");
    assert!(Rc::ptr_eq(&plain, &pointer), "subclasses have their own cached instances");
    assert_eq!(log.borrow().len(), 3);

    // Constructors that are not cacheable always call the native function.
    let class = runtime.class("Demo::Cursor").unwrap();
    let first = runtime
        .construct(&class, &cursor_new_from_name(), &[Value::from("pointer")])
        .unwrap();
    assert!(!Rc::ptr_eq(&first, &pointer));
    assert_eq!(log.borrow().len(), 4);
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl LoadHooks for Recorder {
    fn pre_load(&mut self, runtime: &Runtime, namespace: &str) -> Result<(), BridgeError> {
        assert!(runtime.class("Demo::Button").is_none());
        self.events.push(format!("pre_load {namespace}"));
        Ok(())
    }

    fn post_load(&mut self, runtime: &Runtime, namespace: &str) -> Result<(), BridgeError> {
        assert!(runtime.class("Demo::Button").is_some());
        self.events.push(format!("post_load {namespace}"));
        Ok(())
    }

    fn skip(&self, info: &BaseInfo) -> bool {
        info.name() == "Widget"
    }
}

#[test]
fn load_hooks() {
    let (runtime, _) = demo_runtime();
    let mut loader = Loader::with_hooks(&runtime, Recorder::default());
    let classes = loader.load("Demo").unwrap();

    assert_eq!(loader.hooks().events, ["pre_load Demo", "post_load Demo"]);
    assert_eq!(classes.len(), 2);
    assert!(runtime.class("Demo::Widget").is_none());

    let button = runtime.class("Demo::Button").unwrap();
    assert!(button.parent().is_none(), "parent was skipped");
    assert!(button.find_class_method("new").is_none());
}

struct FailingPreLoad;

impl LoadHooks for FailingPreLoad {
    fn pre_load(&mut self, _: &Runtime, _: &str) -> Result<(), BridgeError> {
        Err(BridgeError::native("Demo requires a display"))
    }
}

#[test]
fn load_errors() {
    let (runtime, _) = demo_runtime();

    let error = Loader::new(&runtime).load("Missing").unwrap_err();
    assert_eq!(error.exception_class(), ExceptionClass::RuntimeError);
    insta::assert_snapshot!(
        error,
        @"typelib file for namespace 'Missing' not found (in Loader#load)"
    );

    let error = Loader::new(&runtime)
        .version("2.0")
        .load("Demo")
        .unwrap_err();
    insta::assert_snapshot!(
        error,
        @"requiring namespace 'Demo' version '2.0', but '1.0' is already loaded (in Loader#load)"
    );

    let error = Loader::with_hooks(&runtime, FailingPreLoad)
        .load("Demo")
        .unwrap_err();
    insta::assert_snapshot!(error, @"Demo requires a display");
    assert!(runtime.class("Demo::Widget").is_none());
}
