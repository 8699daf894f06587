use std::fs;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;

use hitmap_core::config::{Config, PaginationSettings};
use hitmap_core::{Document, Error, HitFactory, SearchResponse, Scored, SourceFactory, TotalRelation};

fn sample_response() -> serde_json::Value {
    json!({
        "took": 5,
        "timed_out": false,
        "_shards": {"total": 1, "successful": 1, "failed": 0},
        "hits": {
            "total": 2,
            "max_score": 1.0,
            "hits": [
                {"_index": "blog", "_type": "post", "_id": "1", "_score": 1.0, "_source": {"title": "first"}},
                {"_index": "blog", "_type": "post", "_id": "2", "_score": 0.5, "_version": 3, "_source": {"title": "second"}}
            ]
        }
    })
}

#[test]
fn parses_well_formed_response() {
    let response = SearchResponse::from_value(sample_response()).expect("parse");
    assert_eq!(response.took_duration(), Duration::from_millis(5));
    assert!(!response.timed_out);
    assert_eq!(response.shards["successful"], json!(1));
    assert_eq!(response.hits.hits.len(), 2);
    assert_eq!(response.hits.hits[1].version, Some(3));
    assert!(response.aggregations.is_none());
}

#[test]
fn missing_top_level_field_is_malformed() {
    for field in ["took", "timed_out", "_shards", "hits"] {
        let mut value = sample_response();
        value.as_object_mut().unwrap().remove(field);
        match SearchResponse::from_value(value) {
            Err(Error::MalformedResponse(msg)) => assert!(msg.contains(field), "message names '{}': {}", field, msg),
            other => panic!("expected MalformedResponse for '{}', got {:?}", field, other),
        }
    }
}

#[test]
fn hits_list_must_be_an_array() {
    let mut value = sample_response();
    value["hits"]["hits"] = json!({"not": "a list"});
    assert!(matches!(SearchResponse::from_value(value), Err(Error::MalformedResponse(_))));
}

#[test]
fn invalid_json_text_is_malformed() {
    let err = "{\"took\": ".parse::<SearchResponse>().unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[test]
fn object_total_keeps_relation() {
    let mut value = sample_response();
    value["hits"]["total"] = json!({"value": 10000, "relation": "gte"});
    let response = SearchResponse::from_value(value).expect("parse");
    let (meta, hits) = response.hits.into_parts();
    assert_eq!(meta.total, 10000);
    assert_eq!(meta.total_relation, TotalRelation::Gte);
    assert_eq!(hits.len(), 2);
}

#[test]
fn document_factory_hydrates_from_hit() {
    let response = SearchResponse::from_value(sample_response()).expect("parse");
    let hit = &response.hits.hits[1];
    let doc = Document::factory("post").build_from_hit(hit).expect("build");
    assert_eq!(doc.id, "2");
    assert_eq!(doc.doc_type, "post");
    assert_eq!(doc.score, Some(0.5));
    assert_eq!(doc.version, Some(3));
    assert_eq!(doc.get_str("title"), Some("second"));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Post {
    title: String,
}

#[test]
fn source_factory_decodes_typed_records() {
    let response = SearchResponse::from_value(sample_response()).expect("parse");
    let factory = SourceFactory::<Post>::new();
    let scored: Scored<Post> = factory.build_from_hit(&response.hits.hits[0]).expect("build");
    assert_eq!(scored.id, "1");
    assert_eq!(scored.record, Post { title: "first".into() });

    let mut bad = response.hits.hits[0].clone();
    bad.source.insert("title".into(), json!(42));
    assert!(factory.build_from_hit(&bad).is_err());
}

#[test]
fn config_defaults_apply_without_overrides() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("hitmap.toml");
    fs::write(&path, "").unwrap();

    let settings = Config::from_file(&path).expect("load").settings().expect("settings");
    assert_eq!(settings.pagination, PaginationSettings::default());
    assert_eq!(settings.pagination.per_page, 25);
    assert!(settings.registry.types.is_empty());
}

#[test]
fn config_file_overrides_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("hitmap.toml");
    fs::write(&path, "[pagination]\nper_page = 10\nbase_path = \"/search\"\n\n[registry]\ntypes = [\"post\", \"comment\"]\n").unwrap();

    let config = Config::from_file(&path).expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.pagination.per_page, 10);
    assert_eq!(settings.pagination.base_path, "/search");
    assert_eq!(settings.pagination.page_name, "page", "untouched keys keep defaults");
    assert_eq!(settings.registry.types, vec!["post".to_string(), "comment".to_string()]);
    let per_page: usize = config.get("pagination.per_page").expect("get");
    assert_eq!(per_page, 10);
}

#[test]
fn config_rejects_zero_page_size() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("hitmap.toml");
    fs::write(&path, "[pagination]\nper_page = 0\n").unwrap();
    assert!(matches!(Config::from_file(&path), Err(Error::InvalidConfig(_))));
}

#[test]
fn config_missing_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(Config::from_file(&tmp.path().join("absent.toml")), Err(Error::InvalidConfig(_))));
}

#[test]
fn load_layers_env_file_and_env_vars() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("hitmap.toml", "[pagination]\nper_page = 10\nbase_path = \"/base\"\n")?;
        jail.create_file("hitmap.test.toml", "[pagination]\nbase_path = \"/test\"\npage_name = \"p\"\n")?;
        jail.set_env("RUST_ENV", "test");
        jail.set_env("HITMAP_PAGINATION__PER_PAGE", "7");

        let settings = Config::load().map_err(|e| e.to_string())?.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.pagination.per_page, 7, "env var overrides both files");
        assert_eq!(settings.pagination.base_path, "/test", "env file overrides hitmap.toml");
        assert_eq!(settings.pagination.page_name, "p");
        assert_eq!(settings.pagination.on_each_side, 3, "untouched keys keep defaults");
        Ok(())
    });
}

#[test]
fn load_skips_files_for_other_envs() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("hitmap.toml", "[pagination]\nper_page = 10\nbase_path = \"/base\"\n")?;
        jail.create_file("hitmap.test.toml", "[pagination]\nbase_path = \"/test\"\n")?;
        jail.set_env("RUST_ENV", "prod");

        let settings = Config::load().map_err(|e| e.to_string())?.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.pagination.per_page, 10);
        assert_eq!(settings.pagination.base_path, "/base");
        Ok(())
    });
}

#[test]
fn load_rejects_zero_page_size_from_env() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("RUST_ENV", "dev");
        jail.set_env("HITMAP_PAGINATION__PER_PAGE", "0");
        assert!(matches!(Config::load(), Err(Error::InvalidConfig(_))));
        Ok(())
    });
}
