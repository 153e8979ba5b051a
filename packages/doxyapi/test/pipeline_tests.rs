//! Pipeline Tests
//!
//! Doxygen XML for the `coffee` fixture through parsing, patching,
//! collapsing and link mapping, and out as JSON.

use doxyapi::api::{Api, Entity, Link, ParagraphElement, TypeToken};
use doxyapi::{
    generate, to_json, write_json, ApiConfig, ApiError, ApiPatch, LogLevel, MemoryLogger,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

const CPPREFERENCE: &str = "https://en.cppreference.com/w/cpp";

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test/data/coffee/xml")
}

fn config(collapse: &[&str]) -> ApiConfig {
    let mut config = ApiConfig::new("/project");
    config.include_paths = vec![PathBuf::from("/project/src")];
    config.collapse_inline_namespaces = collapse.iter().map(|s| s.to_string()).collect();
    config
}

fn run(config: &ApiConfig) -> Api {
    generate(&fixture(), config, &MemoryLogger::new(LogLevel::Error)).unwrap()
}

#[test]
fn test_documentation_links_to_provider() {
    let api = run(&config(&[]));
    let Entity::Function(make) = &api["coffee::make_machine(level_t)"] else {
        panic!("make_machine is not a function");
    };

    assert_eq!(
        make.briefdescription,
        vec![vec![
            ParagraphElement::text("Create a machine. See"),
            ParagraphElement::linked_text(
                "std::vector",
                Link::external(format!("{}/container/vector", CPPREFERENCE))
            ),
            ParagraphElement::text("for details."),
        ]]
    );
    assert_eq!(
        make.parameters[0].type_,
        vec![TypeToken::linked("level_t", Link::internal("coffee::level_t"))]
    );
}

#[test]
fn test_builtin_types_link_to_reference() {
    let api = run(&config(&[]));

    let Entity::Function(constructor) = &api["coffee::Machine::Machine(int)"] else {
        panic!("constructor is not a function");
    };
    assert_eq!(
        constructor.parameters[0].type_,
        vec![TypeToken::linked(
            "int",
            Link::external(format!("{}/language/types", CPPREFERENCE))
        )]
    );

    let Entity::Using(level) = &api["coffee::level_t"] else {
        panic!("level_t is not a using alias");
    };
    assert_eq!(
        level.type_,
        vec![TypeToken::linked(
            "std::uint32_t",
            Link::external(format!("{}/types/integer", CPPREFERENCE))
        )]
    );
}

#[test]
fn test_scoped_names_in_text_link_to_entities() {
    let api = run(&config(&[]));
    let Entity::Function(size) = &api["coffee::v1::Cup::size()const"] else {
        panic!("size is not a function");
    };

    assert_eq!(
        size.briefdescription,
        vec![vec![
            ParagraphElement::text("Volume, at most"),
            ParagraphElement::linked_text("coffee::v1::max_cups", Link::internal("coffee::v1::max_cups")),
            ParagraphElement::text("."),
        ]]
    );
}

#[test]
fn test_collapsed_namespace_disappears_from_output() {
    let logger = MemoryLogger::new(LogLevel::Debug);
    let api = generate(&fixture(), &config(&["coffee::v1"]), &logger).unwrap();

    assert!(api.keys().all(|key| !key.starts_with("coffee::v1")));
    assert_eq!(api["coffee::Cup"].scope(), Some("coffee"));
    assert!(logger.contains(LogLevel::Debug, "Collapsed inline namespaces: coffee::v1"));

    // Text is rewritten only where it names a whole scope, so the old
    // spelling in running text no longer resolves.
    let Entity::Function(size) = &api["coffee::Cup::size()const"] else {
        panic!("size is not a function");
    };
    assert_eq!(
        size.briefdescription,
        vec![vec![ParagraphElement::text("Volume, at most coffee::v1::max_cups.")]]
    );
}

#[test]
fn test_patches_apply_before_linking() {
    let mut config = config(&[]);
    config.patch_api = vec![
        ApiPatch {
            selector: "VERSION".to_string(),
            key: "initializer".to_string(),
            value: json!("11"),
        },
        ApiPatch {
            selector: "coffee::Heat".to_string(),
            key: "location::line".to_string(),
            value: json!(23),
        },
    ];
    let api = run(&config);

    let Entity::Define(version) = &api["VERSION"] else {
        panic!("VERSION is not a define");
    };
    assert_eq!(version.initializer.as_deref(), Some("11"));

    let Entity::Struct(heat) = &api["coffee::Heat"] else {
        panic!("Heat is not a struct");
    };
    assert_eq!(heat.location.line, 23);
}

#[test]
fn test_stage_errors_stop_the_pipeline() {
    let logger = MemoryLogger::new(LogLevel::Error);

    let result = generate(&fixture(), &config(&["coffee"]), &logger);
    assert!(matches!(result, Err(ApiError::NotInlineNamespace { .. })));

    let mut patched = config(&[]);
    patched.patch_api = vec![ApiPatch {
        selector: "coffee::Kettle".to_string(),
        key: "name".to_string(),
        value: json!("Pot"),
    }];
    let result = generate(&fixture(), &patched, &logger);
    assert!(matches!(result, Err(ApiError::SelectorNotFound { .. })));

    let result = generate(&fixture().join("missing"), &config(&[]), &logger);
    assert!(matches!(result, Err(ApiError::Io { .. })));
}

#[test]
fn test_json_output_is_sorted_and_stable() {
    let api = run(&config(&["coffee::v1"]));
    let json = to_json(&api).unwrap();
    assert_eq!(json, to_json(&run(&config(&["coffee::v1"]))).unwrap());

    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["VERSION"]["kind"], "define");
    assert_eq!(value["VERSION"]["location"]["line"], 5);
    assert!(value["brew_all()"]["scope"].is_null());
    assert_eq!(value["coffee::Cup"]["kind"], "class");

    // Entity fields come out alphabetically.
    let brew_all = json.find("\"brew_all()\"").unwrap();
    let access = brew_all + json[brew_all..].find("\"access\"").unwrap();
    let scope = brew_all + json[brew_all..].find("\"scope\"").unwrap();
    assert!(access < scope);
}

#[test]
fn test_write_json_and_load_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("doxyapi.json");
    fs::write(
        &config_path,
        r#"{
            "project_root": "/project",
            "include_paths": ["src"],
            "collapse_inline_namespaces": ["coffee::v1"]
        }"#,
    )
    .unwrap();

    let loaded = ApiConfig::load(&config_path).unwrap();
    assert_eq!(loaded.include_paths, vec![PathBuf::from("/project/src")]);

    let api = run(&loaded);
    assert_eq!(api, run(&config(&["coffee::v1"])));

    let output = dir.path().join("api.json");
    write_json(&api, &output).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, format!("{}\n", to_json(&api).unwrap()));
}
