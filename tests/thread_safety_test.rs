//! Tests for sharing one engine between threads.

mod common;

use std::sync::Arc;
use std::thread;

use common::{Bag, Category, Leaf};
use validgraph::Engine;

#[test]
fn test_concurrent_validation() {
    let engine = Arc::new(Engine::builder().root::<Bag>().build().unwrap());

    let handles: Vec<_> = (0..10usize)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let items = (0..i)
                    .map(|n| if n % 2 == 0 { Leaf::empty() } else { Leaf::filled("x") })
                    .collect();
                let response = engine.validate(&Bag { items });
                assert_eq!(response.len(), i.div_ceil(2));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_recursive_validation() {
    let engine = Arc::new(Engine::builder().root::<Category>().build().unwrap());

    let handles: Vec<_> = (1..=8)
        .map(|depth| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let response = engine.validate(&Category::chain(depth));
                assert_eq!(response.len(), depth);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_parallel_batch() {
    let engine = Engine::builder().root::<Leaf>().build().unwrap();
    let leaves: Vec<_> = (0..100)
        .map(|n| if n % 3 == 0 { Leaf::empty() } else { Leaf::filled("ok") })
        .collect();

    let responses = engine.validate_all(&leaves);

    assert_eq!(responses.len(), 100);
    let invalid = responses.iter().filter(|r| !r.is_valid()).count();
    assert_eq!(invalid, 34);
}
