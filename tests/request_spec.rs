use aha_mcp::reference::Reference;
use aha_mcp::request::{self, ReadOptions};
use reqwest::Method;
use serde_json::json;
use speculate2::speculate;

fn reference(value: &str) -> Reference {
    Reference::parse(value).expect("valid reference")
}

speculate! {
    describe "read_query" {
        it "uses the feature query for feature references" {
            let req = request::read_query(&reference("PROJ-1"), ReadOptions::default());
            assert_eq!(req.root_field(), "feature");
            assert_eq!(req.variables, json!({ "id": "PROJ-1" }));
        }

        it "uses the requirement query for requirement references" {
            let req = request::read_query(&reference("PROJ-1-1"), ReadOptions::default());
            assert_eq!(req.root_field(), "requirement");
            assert!(req.query.contains("requirement(id: $id)"));
        }

        it "leaves parent out of page queries by default" {
            let req = request::read_query(&reference("DOC-N-1"), ReadOptions::default());
            assert_eq!(req.root_field(), "page");
            assert!(req.query.contains("children {"));
            assert!(!req.query.contains("parent"));
        }

        it "selects parent when asked" {
            let req = request::read_query(&reference("DOC-N-1"), ReadOptions { include_parent: true });
            assert!(req.query.contains("parent { referenceNum name }"));
        }

        it "ignores include_parent for non-page kinds" {
            let req = request::read_query(&reference("PROJ-1"), ReadOptions { include_parent: true });
            assert!(!req.query.contains("parent"));
        }
    }

    describe "graphql bodies" {
        it "serializes as query plus variables" {
            let body = serde_json::to_value(request::search_documents_query("login", "Page")).expect("serialize");
            assert!(body["query"].as_str().expect("query").contains("searchDocuments("));
            assert_eq!(body["variables"], json!({ "query": "login", "searchableType": ["Page"] }));
        }

        it "introspects the Feature type" {
            let req = request::introspect_feature_query();
            assert!(req.query.contains("__type(name: \"Feature\")"));
            assert_eq!(req.variables, json!({}));
        }
    }

    describe "rest requests" {
        it "templates feature paths" {
            let req = request::get_feature(&reference("PROJ-12"));
            assert_eq!(req.method, Method::GET);
            assert_eq!(req.path, "/features/PROJ-12");
            assert!(req.query.is_empty());
        }

        it "puts feature updates with a body" {
            let req = request::update_feature(&reference("PROJ-12"), json!({ "feature": {} }));
            assert_eq!(req.method, Method::PUT);
            assert_eq!(req.body, Some(json!({ "feature": {} })));
        }

        it "pages release features" {
            let req = request::release_features_page("PROJ-R-3", 2, 50);
            assert_eq!(req.path, "/releases/PROJ-R-3/features");
            assert_eq!(req.query_param("page"), Some("2"));
            assert_eq!(req.query_param("per_page"), Some("50"));
        }

        it "pages products and product releases" {
            assert_eq!(request::products_page(4).query_param("page"), Some("4"));
            let req = request::product_releases_page("12345", 1);
            assert_eq!(req.path, "/products/12345/releases");
        }

        it "puts release updates" {
            let req = request::update_release("PROJ-R-3", json!({ "release": { "name": "x" } }));
            assert_eq!(req.method, Method::PUT);
            assert_eq!(req.path, "/releases/PROJ-R-3");
        }

        it "encodes unsafe characters in path segments" {
            let req = request::release_features_page("R 1/2", 1, 10);
            assert_eq!(req.path, "/releases/R%201%2F2/features");
        }
    }
}
