//! Strict Kind Registry Tests
//!
//! - Same parameters always yield the same kind
//! - Different parameters never share a kind
//! - Concurrent first use agrees on one kind

use modelstore::{registry, strict_dict, strict_list, ElementType, KindKey};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn every_parameter_pair_is_idempotent() {
    for key in ElementType::ALL {
        for value in ElementType::ALL {
            let a = strict_dict(key, value);
            let b = strict_dict(key, value);
            assert!(Arc::ptr_eq(&a, &b), "{} not stable", a.name());
        }
    }
}

#[test]
fn differing_value_type_gives_distinct_kind() {
    for value in ElementType::ALL {
        for other in ElementType::ALL {
            if value == other {
                continue;
            }
            let a = strict_dict(ElementType::Str, value);
            let b = strict_dict(ElementType::Str, other);
            assert!(!Arc::ptr_eq(&a, &b));
            assert_ne!(a, b);
        }
    }
}

#[test]
fn lookup_by_key_matches_constructor() {
    let kind = strict_list(ElementType::Float);
    let looked_up = registry::lookup(KindKey::List {
        item: ElementType::Float,
    });
    assert!(Arc::ptr_eq(&kind, &looked_up));
    assert_eq!(kind.key(), KindKey::List { item: ElementType::Float });
}

#[test]
fn concurrent_first_use_of_str_int_dict() {
    const THREADS: usize = 16;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                strict_dict(ElementType::Str, ElementType::Int)
            })
        })
        .collect();

    let kinds: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(kinds.iter().all(|k| Arc::ptr_eq(k, &kinds[0])));
    assert_eq!(kinds[0].name(), "StrictDict_str_int");
}

#[test]
fn concurrent_first_use_across_many_keys() {
    let barrier = Arc::new(Barrier::new(ElementType::ALL.len() * 2));

    let handles: Vec<_> = ElementType::ALL
        .iter()
        .chain(ElementType::ALL.iter())
        .map(|&item| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (item, strict_list(item))
            })
        })
        .collect();

    for handle in handles {
        let (item, kind) = handle.join().unwrap();
        assert!(Arc::ptr_eq(&kind, &strict_list(item)));
    }
}
