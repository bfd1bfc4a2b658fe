//! Integration tests for loading templates from disk

use std::cell::RefCell;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use yaml_fragments::{
    load, load_with_config, load_with_resolver, FragmentsConfig, LoadConfig, LoadError, Params,
    ResolveError, ResolveEvent, Resolver,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn yaml(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_load_serverless_template() {
    let value = load(fixture("serverless.yml"), &params(&[("stage", "prod")])).expect("Should load");

    let expected = yaml(
        r#"
service: webhook
provider:
  name: aws
  stage: prod
  region: eu-west-1
  runtime: nodejs18.x
functions:
  hello:
    handler: handler.hello
    events:
      - http:
          path: hello
          method: get
"#,
    );
    assert_eq!(value, expected);
}

#[test]
fn test_comment_placeholders_survive() {
    let config = LoadConfig::new().with_param("stage", "prod");
    let loaded = load_with_config(fixture("serverless.yml"), &config).expect("Should load");

    assert!(loaded
        .text
        .starts_with("# ${opt:stage} inside a comment is left alone\n"));
    assert!(loaded.text.contains("  stage: prod\n"));
}

#[test]
fn test_includes_are_reindented() {
    let loaded = load_with_config(fixture("serverless.yml"), &LoadConfig::new()).expect("Should load");

    assert!(loaded
        .text
        .contains("  region: eu-west-1\n  runtime: nodejs18.x\n"));
    assert!(loaded
        .text
        .contains("  hello:\n    handler: handler.hello\n    events:\n      - http:\n"));
}

#[test]
fn test_defaults_apply_without_params() {
    let value = load(fixture("serverless.yml"), &Params::new()).expect("Should load");
    assert_eq!(value["provider"]["stage"], yaml("dev"));
    assert_eq!(value["service"], yaml("webhook"));
}

#[test]
fn test_params_reach_nested_includes() {
    let config = LoadConfig::new().with_param("runtime", "python3.12");
    let loaded = load_with_config(fixture("serverless.yml"), &config).expect("Should load");

    assert_eq!(loaded.value["provider"]["runtime"], yaml("python3.12"));
    assert_eq!(
        loaded.value["functions"]["hello"]["events"][0]["http"]["path"],
        yaml("hello")
    );
}

#[test]
fn test_nested_placeholder() {
    let value = load(
        fixture("nested.yml"),
        &params(&[("stage", "prod"), ("table-prod", "orders")]),
    )
    .unwrap();
    assert_eq!(value["table"], yaml("orders"));

    let value = load(fixture("nested.yml"), &params(&[("stage", "dev")])).unwrap();
    assert_eq!(value["table"], yaml("none"));

    let value = load(fixture("nested.yml"), &Params::new()).unwrap();
    assert_eq!(value["table"], yaml("none"));
}

#[test]
fn test_empty_include() {
    let value = load(fixture("with_empty.yml"), &Params::new()).unwrap();
    assert_eq!(value, yaml("before: 1\nempty: null\nafter: 2\n"));
}

#[test]
fn test_missing_include_is_fatal() {
    let err = load(fixture("missing.yml"), &Params::new()).unwrap_err();
    match err {
        LoadError::Resolve(ResolveError::Io { path, .. }) => {
            assert!(path.ends_with("resources/nope.yml"));
        }
        other => panic!("Expected missing include error, got {:?}", other),
    }
}

#[test]
fn test_malformed_directive_reports_location() {
    let err = load(fixture("malformed.yml"), &Params::new()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Resolve(ResolveError::MalformedDirective { .. })
    ));

    let report = err.format();
    assert!(report.contains("malformed.yml"));
    assert!(report.contains("missing file path"));
}

#[test]
fn test_circular_include() {
    let err = load(fixture("cycle/a.yml"), &Params::new()).unwrap_err();
    match err {
        LoadError::Resolve(ResolveError::CircularInclude { chain }) => {
            assert!(chain.contains("a.yml -> "));
            assert!(chain.contains("b.yml -> "));
            assert!(chain.ends_with("a.yml"));
        }
        other => panic!("Expected circular include error, got {:?}", other),
    }
}

#[test]
fn test_config_file_params() {
    let config = FragmentsConfig::from_file(&fixture("fragments.toml"))
        .unwrap()
        .into_load_config();
    let loaded = load_with_config(fixture("serverless.yml"), &config).unwrap();

    assert_eq!(loaded.value["service"], yaml("orders"));
    assert_eq!(loaded.value["provider"]["stage"], yaml("prod"));
}

#[test]
fn test_generated_outputs_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("serverless.generated.yml");
    let annotated = dir.path().join("serverless.debug.txt");

    let config = LoadConfig::new()
        .with_param("stage", "prod")
        .with_output(&output)
        .with_annotated_output(&annotated);
    let loaded = load_with_config(fixture("serverless.yml"), &config).unwrap();

    let generated = std::fs::read_to_string(&output).unwrap();
    assert!(generated.starts_with("# Generated by yaml-fragments.\n"));
    assert!(generated.ends_with(&format!("\n{}\n", loaded.text)));
    assert_eq!(yaml(&generated), loaded.value);

    let annotated = std::fs::read_to_string(&annotated).unwrap();
    let first = annotated.lines().next().unwrap();
    assert!(first.ends_with(":# ${opt:stage} inside a comment is left alone"));
    assert!(first.trim_start().starts_with("1:"));
}

#[test]
fn test_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoadConfig::new().with_output(dir.path().join("no/such/dir/out.yml"));

    let err = load_with_config(fixture("with_empty.yml"), &config).unwrap_err();
    assert!(matches!(err, LoadError::Write { .. }));
}

#[test]
fn test_observer_sees_includes() {
    let seen = RefCell::new(Vec::new());
    let observer = |event: &ResolveEvent<'_>| match event {
        ResolveEvent::Processing { path, .. } => {
            seen.borrow_mut().push(format!("processing {}", file_name(path)));
        }
        ResolveEvent::FileIncluded {
            path, indentation, ..
        } => {
            seen.borrow_mut()
                .push(format!("include {} @{}", file_name(path), indentation));
        }
        _ => {}
    };

    let resolver = Resolver::default().with_observer(&observer);
    load_with_resolver(&fixture("serverless.yml"), &LoadConfig::new(), &resolver).unwrap();

    assert_eq!(
        seen.into_inner(),
        vec![
            "processing serverless.yml",
            "include provider.yml @2",
            "include functions.yml @2",
            "include events.json @6",
        ]
    );
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
