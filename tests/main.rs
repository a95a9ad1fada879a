use jsonpath_rfc9535::Environment;
use serde_json::{json, Value};
use test_log::test;

fn spec_example_json() -> Value {
    json!({
        "store": {
            "book": [
                {
                    "category": "reference",
                    "author": "Nigel Rees",
                    "title": "Sayings of the Century",
                    "price": 8.95
                },
                {
                    "category": "fiction",
                    "author": "Evelyn Waugh",
                    "title": "Sword of Honour",
                    "price": 12.99
                },
                {
                    "category": "fiction",
                    "author": "Herman Melville",
                    "title": "Moby Dick",
                    "isbn": "0-553-21311-3",
                    "price": 8.99
                },
                {
                    "category": "fiction",
                    "author": "J. R. R. Tolkien",
                    "title": "The Lord of the Rings",
                    "isbn": "0-395-19395-8",
                    "price": 22.99
                }
            ],
            "bicycle": {
                "color": "red",
                "price": 399
            }
        }
    })
}

#[test]
fn spec_example_1() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$.store.book[*].author", &value).unwrap().all();
    assert_eq!(
        nodes,
        vec![
            "Nigel Rees",
            "Evelyn Waugh",
            "Herman Melville",
            "J. R. R. Tolkien"
        ]
    );
}

#[test]
fn spec_example_2() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$..author", &value).unwrap().all();
    assert_eq!(
        nodes,
        vec![
            "Nigel Rees",
            "Evelyn Waugh",
            "Herman Melville",
            "J. R. R. Tolkien"
        ]
    );
}

#[test]
fn spec_example_3() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$.store.*", &value).unwrap().all();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().any(|&node| node == value.pointer("/store/book").unwrap()));
}

#[test]
fn spec_example_4() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$.store..price", &value).unwrap().all();
    assert_eq!(nodes, vec![8.95, 12.99, 8.99, 22.99, 399.]);
}

#[test]
fn spec_example_5() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$..book[2]", &value).unwrap();
    let node = nodes.exactly_one().unwrap();
    assert_eq!(node, value.pointer("/store/book/2").unwrap());
}

#[test]
fn spec_example_6() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$..book[-1]", &value).unwrap();
    let node = nodes.exactly_one().unwrap();
    assert_eq!(node, value.pointer("/store/book/3").unwrap());
}

#[test]
fn spec_example_7() {
    let value = spec_example_json();
    let env = Environment::new();
    {
        let nodes = env.find("$..book[0,1]", &value).unwrap();
        assert_eq!(nodes.len(), 2);
    }
    {
        let nodes = env.find("$..book[:2]", &value).unwrap();
        assert_eq!(nodes.len(), 2);
    }
}

#[test]
fn spec_example_8() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$..book[?@.isbn]", &value).unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn spec_example_9() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$..book[?@.price<10]", &value).unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn spec_example_10() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$..*", &value).unwrap();
    assert_eq!(nodes.len(), 27);
}

#[test]
fn test_length() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env.find("$.store.book[?length(@.title) > 10]", &value).unwrap();
    assert_eq!(3, nodes.len());
}

#[test]
fn test_count() {
    tracing::info!("counting!");
    let value = json!([
        {"foo": [1]},
        {"foo": [1, 2]},
    ]);
    let env = Environment::new();
    let nodes = env.find("$[?count(@.foo.*) > 1]", &value).unwrap();
    assert_eq!(1, nodes.len());
}

#[test]
fn test_match_and_search() {
    let value = json!([{"name": "alice"}, {"name": "bob"}]);
    let env = Environment::new();
    let matched = env.find("$[?match(@.name, 'a.*')]", &value).unwrap();
    assert_eq!(matched.len(), 1);
    let searched = env.find("$[?search(@.name, 'li')]", &value).unwrap();
    assert_eq!(searched.len(), 1);
}

#[test]
fn test_value_function() {
    let value = spec_example_json();
    let env = Environment::new();
    let nodes = env
        .find("$.store.book[?value(@.isbn) == '0-553-21311-3']", &value)
        .unwrap();
    assert_eq!(nodes.len(), 1);
}

#[test]
fn test_non_standard_keys_selector() {
    let value = json!({"a": 1, "b": 2, "c": 3});
    let env = Environment::new();
    let nodes = env.find("$.~", &value).unwrap();
    assert_eq!(nodes.len(), 3);
}

#[test]
fn test_reports_syntax_error_offset() {
    let value = json!({});
    let env = Environment::new();
    let err = env.find("$.", &value).unwrap_err();
    assert!(err.offset().is_some());
}

#[test]
fn test_recursion_limit_is_enforced() {
    let mut value = json!(1);
    for _ in 0..10 {
        value = json!({ "a": value });
    }
    let env = Environment::new().with_max_recursion_depth(3);
    let err = env.find("$..a", &value).unwrap_err();
    assert!(matches!(err, jsonpath_rfc9535::Error::Recursion { max: 3 }));
}
