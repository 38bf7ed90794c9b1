use std::path::Path;

use argscope_core::ParseError;
use argscope_schema::{CommandSpec, SpecError, SpecFormat, TypedValue, describe};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GIT_LIKE: &str = r#"
name: vcs
description: Toy version control
flags:
  - { name: verbose, short: v }
subcommands:
  - name: commit
    required:
      - { name: message, short: m }
    flags:
      - { name: all, short: a }
  - name: remote
    subcommands:
      - name: add
        positionals:
          - { name: name }
          - { name: url }
"#;

fn write(dir: &Path, file: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_yaml_and_json_agree() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = write(dir.path(), "vcs.yaml", GIT_LIKE);
    let from_yaml = CommandSpec::load(&yaml).unwrap();

    let json = write(
        dir.path(),
        "vcs.json",
        &SpecFormat::Json.render(&from_yaml).unwrap(),
    );
    let from_json = CommandSpec::load(&json).unwrap();
    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CommandSpec::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, SpecError::IoError(_)));
}

#[test]
fn test_load_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.yml", "name: [unterminated");
    assert!(matches!(
        CommandSpec::load(&path).unwrap_err(),
        SpecError::YamlError(_)
    ));
}

#[test]
fn test_load_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "spec.txt", "name: x");
    let err = CommandSpec::load(&path).unwrap_err();
    assert!(err.to_string().starts_with("unsupported spec format"));
}

// ---------------------------------------------------------------------------
// Building and parsing
// ---------------------------------------------------------------------------

#[test]
fn test_nested_dispatch_report() {
    let spec = CommandSpec::from_yaml_str(GIT_LIKE).unwrap();
    let mut parser = spec.build().unwrap();
    parser
        .parse(["remote", "add", "origin", "https://example.com/repo"])
        .unwrap();

    let report = spec.report(&parser).unwrap();
    assert_eq!(report.flags["verbose"], false);
    let add = report.innermost();
    assert_eq!(add.command, "add");
    let urls: Vec<_> = add.positionals.iter().map(|p| p.value.clone()).collect();
    assert_eq!(
        urls,
        vec![
            TypedValue::String("origin".into()),
            TypedValue::String("https://example.com/repo".into()),
        ]
    );
}

#[test]
fn test_subcommand_error_path() {
    let spec = CommandSpec::from_yaml_str(GIT_LIKE).unwrap();
    let mut parser = spec.build().unwrap();

    let err = parser.parse(["commit", "-a"]).unwrap_err();
    assert_eq!(err.subcommand_path(), vec!["commit"]);
    assert!(matches!(err.root(), ParseError::MissingMandatory { .. }));
}

#[test]
fn test_reparse_is_independent() {
    let spec = CommandSpec::from_yaml_str(GIT_LIKE).unwrap();
    let mut parser = spec.build().unwrap();

    parser.parse(["commit", "-m", "first", "-a"]).unwrap();
    let first = spec.report(&parser).unwrap();
    assert_eq!(first.innermost().flags["all"], true);

    parser.parse(["-v"]).unwrap();
    let second = spec.report(&parser).unwrap();
    assert!(second.subcommand.is_none());
    assert_eq!(second.flags["verbose"], true);
}

#[test]
fn test_duplicate_subcommand_names_rejected() {
    let mut spec = CommandSpec::from_yaml_str(GIT_LIKE).unwrap();
    spec.subcommands.push(CommandSpec::new("commit"));
    assert!(matches!(
        spec.build().unwrap_err(),
        SpecError::Registration { .. }
    ));
}

// ---------------------------------------------------------------------------
// Describe
// ---------------------------------------------------------------------------

#[test]
fn test_describe_serializes_tree() {
    let spec = CommandSpec::from_yaml_str(GIT_LIKE).unwrap();
    let parser = spec.build().unwrap();
    let summary = describe(&spec.name, &spec.description, &parser);

    let yaml = SpecFormat::Yaml.render(&summary).unwrap();
    assert!(yaml.contains("name: vcs"));

    let json: serde_json::Value =
        serde_json::from_str(&SpecFormat::Json.render(&summary).unwrap()).unwrap();
    assert_eq!(json["subcommands"][1]["subcommands"][0]["name"], "add");
    assert_eq!(json["subcommands"][1]["subcommands"][0]["positionals"], 2);
    assert_eq!(json["entries"][0]["kind"], "flag");
}
