#![allow(clippy::unwrap_used, reason = "Fine in tests")]
use std::fs;

use mdxprep::{
  cli::{Cli, Commands, IoArgs},
  commands::{
    challenges_document,
    init_config,
    prepare_document,
    run,
    to_json,
    toc_document,
  },
};
use mdxprep_config::Config;
use serde_json::{Value, json};
use tempfile::TempDir;

const PAGE: &str = r#"[
  {"type": "h2", "props": {"id": "intro", "children": "Intro"}},
  "Some prose",
  {"type": "Sandpack", "props": {"children": "App.js"}},
  {"type": "Challenges", "props": {"children": [
    {"type": "h3", "props": {"id": "fix", "children": "Fix it"}},
    {"type": "p", "props": {"children": "It is broken."}},
    {"type": "Hint", "props": {"children": "Look closer"}},
    {"type": "Solution", "props": {"children": "Fixed"}}
  ]}}
]"#;

fn cli_for(command: Commands, config_overrides: Vec<String>) -> Cli {
  Cli {
    command,
    verbose: false,
    config_files: Vec::new(),
    config_overrides,
  }
}

#[test]
fn test_prepare_document_includes_all_parts_by_default() {
  let output = prepare_document(&Config::default(), PAGE).unwrap();

  assert_eq!(output["version"], json!(4));
  assert_eq!(output["toc"].as_array().unwrap().len(), 3);

  let children = output["children"].as_array().unwrap();
  let types: Vec<&str> = children
    .iter()
    .map(|c| c["type"].as_str().unwrap())
    .collect();
  assert_eq!(types, vec!["MaxWidth", "Sandpack", "Challenges"]);
  assert_eq!(children[0]["key"], json!("2"));
}

#[test]
fn test_prepare_document_respects_config() {
  let config = Config {
    include_toc: false,
    include_version: false,
    ..Config::default()
  };

  let output = prepare_document(&config, PAGE).unwrap();
  let object = output.as_object().unwrap();
  assert_eq!(object.keys().collect::<Vec<_>>(), vec!["children"]);
}

#[test]
fn test_prepare_document_reports_bad_input() {
  let err = prepare_document(&Config::default(), "{not json").unwrap_err();
  assert!(err.to_string().contains("Failed to read content tree"));
}

#[test]
fn test_toc_document() {
  let output = toc_document(&Config::default(), PAGE).unwrap();
  assert_eq!(
    output,
    json!([
      {"url": "#", "depth": 2, "text": "Overview"},
      {"url": "#intro", "depth": 2, "text": "Intro"},
      {"url": "#challenges", "depth": 2, "text": "Challenges"}
    ])
  );
}

#[test]
fn test_challenges_document() {
  let output = challenges_document(PAGE).unwrap();
  let blocks = output.as_array().unwrap();
  assert_eq!(blocks.len(), 1);

  let block = &blocks[0];
  assert_eq!(block["is_recipes"], json!(false));
  assert_eq!(block["title_id"], json!("challenges"));
  assert_eq!(block["title_text"], json!("Prueba algunos desafíos"));

  let challenge = &block["challenges"][0];
  assert_eq!(challenge["id"], json!("fix"));
  assert_eq!(challenge["name"], json!("Fix it"));
  assert_eq!(challenge["order"], json!(1));
  assert_eq!(challenge["hint"]["type"], json!("Hint"));
  assert_eq!(challenge["content"].as_array().unwrap().len(), 1);
}

#[test]
fn test_compact_json() {
  let rendered = to_json(&json!({"a": [1, 2]}), false).unwrap();
  assert_eq!(rendered, r#"{"a":[1,2]}"#);
}

#[test]
fn test_run_prepare_writes_output_file() {
  let dir = TempDir::new().unwrap();
  let input = dir.path().join("page.json");
  let output = dir.path().join("out").join("prepared.json");
  fs::create_dir_all(output.parent().unwrap()).unwrap();
  fs::write(&input, PAGE).unwrap();

  let cli = cli_for(
    Commands::Prepare {
      io: IoArgs {
        input:  Some(input),
        output: Some(output.clone()),
      },
    },
    vec!["pretty=false".to_string(), "toc_depth=0".to_string()],
  );
  run(&cli).unwrap();

  let written = fs::read_to_string(&output).unwrap();
  assert!(written.ends_with('\n'));
  assert_eq!(written.lines().count(), 1);

  let value: Value = serde_json::from_str(&written).unwrap();
  assert_eq!(value["children"].as_array().unwrap().len(), 3);
}

#[test]
fn test_run_rejects_bad_override() {
  let cli = cli_for(
    Commands::Toc {
      io: IoArgs::default(),
    },
    vec!["toc_depth=many".to_string()],
  );
  let err = run(&cli).unwrap_err();
  assert!(err.to_string().contains("Failed to load configuration"));
}

#[test]
fn test_init_config_refuses_overwrite() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("nested").join("mdxprep.toml");

  init_config(&path, "toml", false).unwrap();
  assert_eq!(Config::from_file(&path).unwrap(), Config::default());

  assert!(init_config(&path, "toml", false).is_err());
  init_config(&path, "toml", true).unwrap();
}
