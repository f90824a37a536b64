use aha_mcp::fields::{
    partition, partition_feature_fields, partition_release_fields, STANDARD_FEATURE_FIELDS,
};
use serde_json::{json, Map, Value};
use speculate2::speculate;

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().expect("object literal").clone()
}

speculate! {
    describe "partition" {
        it "splits by membership in the standard set" {
            let split = partition_feature_fields(&fields(json!({
                "name": "Login",
                "due_date": "2025-05-01",
                "go_live_date": "2025-04-01"
            })));

            assert_eq!(Value::Object(split.standard), json!({ "name": "Login", "due_date": "2025-05-01" }));
            assert_eq!(Value::Object(split.extension), json!({ "go_live_date": "2025-04-01" }));
        }

        it "keys outside the set are extension fields" {
            let split = partition(&fields(json!({ "a": 1, "go_live_date": "2025-04-01" })), STANDARD_FEATURE_FIELDS);

            assert!(split.standard.is_empty());
            assert_eq!(split.extension.len(), 2);
        }

        it "is total over the empty mapping" {
            let split = partition_feature_fields(&Map::new());
            assert!(split.standard.is_empty());
            assert!(split.extension.is_empty());
        }

        it "covers every standard feature field" {
            let all: Map<String, Value> = STANDARD_FEATURE_FIELDS
                .iter()
                .map(|k| (k.to_string(), json!(true)))
                .collect();
            let split = partition_feature_fields(&all);
            assert_eq!(split.standard.len(), 25);
            assert!(split.extension.is_empty());
        }

        it "uses the release set for releases" {
            let split = partition_release_fields(&fields(json!({
                "release_date": "2027-03-31",
                "workflow_kind": "new"
            })));
            assert!(split.standard.contains_key("release_date"));
            assert!(split.extension.contains_key("workflow_kind"));
        }
    }

    describe "into_body" {
        it "omits custom_fields when there are no extension fields" {
            let body = partition_feature_fields(&fields(json!({ "name": "Login" }))).into_body("feature");
            assert_eq!(body, json!({ "feature": { "name": "Login" } }));
        }

        it "nests extension fields under custom_fields" {
            let body = partition_feature_fields(&fields(json!({
                "name": "Login",
                "go_live_date": "2025-04-01"
            }))).into_body("feature");

            assert_eq!(body, json!({
                "feature": {
                    "name": "Login",
                    "custom_fields": { "go_live_date": "2025-04-01" }
                }
            }));
        }

        it "emits custom_fields alone when nothing is standard" {
            let body = partition_release_fields(&fields(json!({ "budget": 10 }))).into_body("release");
            assert_eq!(body, json!({ "release": { "custom_fields": { "budget": 10 } } }));
        }
    }
}
