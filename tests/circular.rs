use ferrous_locator::{
    ClassDef, ContainerError, DiError, Injectable, LocatorConfig, Param, ServiceLocator, TypeCatalog, Value,
};

fn circular_path(err: DiError) -> Vec<String> {
    match err {
        DiError::Container(ContainerError::Circular(path)) => path,
        other => panic!("expected a circular dependency, got {:?}", other),
    }
}

#[test]
fn test_two_node_cycle() {
    let locator = ServiceLocator::new(TypeCatalog::new());
    locator
        .bind("A", Injectable::service("B"))
        .bind("B", Injectable::service("A"));

    let path = circular_path(locator.get("A").unwrap_err());
    assert_eq!(path, vec!["A", "B", "A"]);
}

#[test]
fn test_self_reference() {
    let locator = ServiceLocator::new(TypeCatalog::new());
    locator.bind("Loop", Injectable::service("Loop"));

    let path = circular_path(locator.get("Loop").unwrap_err());
    assert_eq!(path, vec!["Loop", "Loop"]);
}

#[test]
fn test_constructor_cycle() {
    let mut catalog = TypeCatalog::new();
    catalog
        .add_class(ClassDef::concrete("Chicken").constructor(vec![Param::class("egg", "Egg")], |_, _| Ok(())))
        .add_class(ClassDef::concrete("Egg").constructor(vec![Param::class("chicken", "Chicken")], |_, _| Ok(())));
    let locator = ServiceLocator::new(catalog);

    let path = circular_path(locator.get("Chicken").unwrap_err());
    assert_eq!(path, vec!["Chicken", "Egg", "Chicken"]);
}

#[test]
fn test_cycle_through_alias_strings() {
    let locator = ServiceLocator::new(TypeCatalog::new());
    locator.bind("first", "second").bind("second", "third").bind("third", "first");

    let path = circular_path(locator.get("second").unwrap_err());
    assert_eq!(path, vec!["second", "third", "first", "second"]);
}

fn chain(locator: &ServiceLocator, length: usize) {
    for i in 0..length - 1 {
        locator.bind(&format!("s{}", i), format!("s{}", i + 1));
    }
    locator.bind(&format!("s{}", length - 1), Value::Int(0));
}

#[test]
fn test_chain_at_the_depth_limit_resolves() {
    let locator = ServiceLocator::with_config(TypeCatalog::new(), LocatorConfig::default().max_resolution_depth(5));
    chain(&locator, 5);

    assert_eq!(locator.get("s0").unwrap(), Value::Int(0));
}

#[test]
fn test_chain_past_the_depth_limit_fails() {
    let locator = ServiceLocator::with_config(TypeCatalog::new(), LocatorConfig::default().max_resolution_depth(5));
    chain(&locator, 6);

    match locator.get("s0").unwrap_err() {
        DiError::Container(ContainerError::DepthExceeded { limit, path }) => {
            assert_eq!(limit, 5);
            assert_eq!(path, vec!["s0", "s1", "s2", "s3", "s4", "s5"]);
        }
        other => panic!("expected depth error, got {:?}", other),
    }

    // starting lower in the chain fits
    assert_eq!(locator.get("s1").unwrap(), Value::Int(0));
}

#[test]
fn test_default_depth_limit() {
    let locator = ServiceLocator::new(TypeCatalog::new());
    chain(&locator, 15);
    assert_eq!(locator.get("s0").unwrap(), Value::Int(0));

    let deeper = ServiceLocator::new(TypeCatalog::new());
    chain(&deeper, 16);
    match deeper.get("s0").unwrap_err() {
        DiError::Container(ContainerError::DepthExceeded { limit, path }) => {
            assert_eq!(limit, 15);
            assert_eq!(path.len(), 16);
            assert_eq!(path.last().map(String::as_str), Some("s15"));
        }
        other => panic!("expected depth error, got {:?}", other),
    }
}

#[test]
fn test_stack_is_clean_after_errors() {
    let locator = ServiceLocator::new(TypeCatalog::new());
    locator
        .bind("A", Injectable::service("B"))
        .bind("B", Injectable::service("A"))
        .bind("B2", Value::Int(2));

    assert!(locator.get("A").is_err());
    assert!(locator.get("A").is_err());

    // the failed ids are not left in flight
    locator.bind("B", Injectable::service("B2"));
    assert_eq!(locator.get("A").unwrap(), Value::Int(2));
    assert_eq!(locator.get("B").unwrap(), Value::Int(2));
}

#[test]
fn test_repeated_dependency_is_not_a_cycle() {
    let mut catalog = TypeCatalog::new();
    catalog
        .add_class(ClassDef::concrete("Clock"))
        .add_class(ClassDef::concrete("Pair").constructor(
            vec![Param::class("left", "Clock"), Param::class("right", "Clock")],
            |this, args| {
                this.set("left", args.get(0));
                this.set("right", args.get(1));
                Ok(())
            },
        ));
    let locator = ServiceLocator::new(catalog);

    let pair = locator.get("Pair").unwrap();
    assert_eq!(pair.at_path("left").as_object().unwrap().class(), "Clock");
    assert_eq!(pair.at_path("right").as_object().unwrap().class(), "Clock");
}

#[test]
fn test_data_store_cycle() {
    let locator = ServiceLocator::new(TypeCatalog::new());
    let data = locator.data();
    data.set("x", Injectable::datum("y")).set("y", Injectable::datum("x"));

    let path = circular_path(data.get("x").unwrap_err());
    assert_eq!(path, vec!["datum:x", "datum:y", "datum:x"]);

    // the failure is not memoized
    data.set("y", Value::Int(1));
    assert_eq!(data.get("x").unwrap(), Value::Int(1));
}

#[test]
fn test_cycle_across_locator_and_data() {
    let locator = ServiceLocator::new(TypeCatalog::new());
    locator.bind("Settings", Injectable::datum("settings"));
    locator.data().set("settings", Injectable::service("Settings"));

    let err = locator.get("Settings").unwrap_err();
    assert_eq!(circular_path(err), vec!["Settings", "datum:settings", "Settings"]);
}

#[test]
fn test_data_frames_count_toward_depth() {
    let config = LocatorConfig::default().max_resolution_depth(2);
    let locator = ServiceLocator::with_config(TypeCatalog::new(), config);
    locator.bind("port", Value::Int(80));
    locator.data().set("listen", Injectable::service("port"));

    // datum:listen then port
    assert_eq!(locator.data().get("listen").unwrap(), Value::Int(80));

    let tight = ServiceLocator::with_config(TypeCatalog::new(), LocatorConfig::default().max_resolution_depth(1));
    tight.bind("port", Value::Int(80));
    tight.data().set("listen", Injectable::service("port"));
    match tight.data().get("listen").unwrap_err() {
        DiError::Container(ContainerError::DepthExceeded { limit, path }) => {
            assert_eq!(limit, 1);
            assert_eq!(path, vec!["datum:listen", "port"]);
        }
        other => panic!("expected depth error, got {:?}", other),
    }
}
