use jsonpath_rfc9535::Query;
use serde::Deserialize;
use serde_json::{from_value, json, to_value};

#[derive(Deserialize)]
struct Config {
    pub path: Query,
}

#[test]
fn can_deserialize_compiled_query() {
    let config_json = json!({ "path": "$.foo.*" });
    let config = from_value::<Config>(config_json).expect("deserializes");
    let value = json!({"foo": [1, 2, 3]});
    let nodes = config.path.query(&value).unwrap().all();
    assert_eq!(nodes, vec![1, 2, 3]);
}

#[test]
fn invalid_query_string_fails_to_deserialize() {
    let config_json = json!({ "path": "$." });
    assert!(from_value::<Config>(config_json).is_err());
}

#[test]
fn serializes_back_to_a_query_string() {
    let query: Query = from_value(json!("$['bar'][1:10]")).expect("deserializes");
    let round_tripped = to_value(&query).expect("serializes");
    assert_eq!(round_tripped, json!("$['bar'][1:10]"));
}
