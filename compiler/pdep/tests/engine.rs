//! Building an analysis from files on disk.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs;

use pdep::{Config, Engine, EngineError};
use pretty_assertions::assert_eq;

#[test]
fn files_on_disk_form_one_model() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Shape.php"),
        "<?php\nnamespace Geo;\n\ninterface Shape\n{\n    public function area();\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Square.php"),
        "<?php\nnamespace Geo;\n\nclass Square implements Shape\n{\n    private $side = 1;\n\n    public function area()\n    {\n        return $this->side * $this->side;\n    }\n}\n",
    )
    .unwrap();

    let mut engine = Engine::default();
    let shape = engine.add_file(dir.path().join("Shape.php"));
    let square = engine.add_file(dir.path().join("Square.php"));
    let missing = engine.add_file(dir.path().join("Circle.php"));
    assert!(shape.is_some() && square.is_some());
    assert!(missing.is_none());

    let analysis = engine.finish();
    assert_eq!(analysis.errors().len(), 1);
    assert!(matches!(&analysis.errors()[0], EngineError::Io { path, .. } if path.ends_with("Circle.php")));

    let model = analysis.model();
    let square = model.find_type("Geo\\Square").unwrap();
    let shape = model.find_type("geo\\shape").unwrap();
    assert!(model.is_subtype_of(square, shape).unwrap());
    assert_eq!(model.properties(square).len(), 1);
    assert!(analysis.check_traits().is_empty());

    let namespaces: Vec<&str> = analysis
        .namespaces()
        .into_iter()
        .map(|ns| model.namespace(ns).name())
        .collect();
    assert_eq!(namespaces, vec!["Geo"]);
}

#[test]
fn config_file_drives_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pdep.toml");
    fs::write(
        &path,
        "without_annotations = true\ncache_tokens = false\nexcluded_namespaces = [\"Tests\\\\*\"]\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.without_annotations);
    assert!(!config.cache_tokens);

    let mut engine = Engine::new(config);
    engine.add_source("t.php", "<?php namespace Tests\\Unit; class SquareTest {}");
    engine.add_source("s.php", "<?php namespace Geo; class Square {}");
    let analysis = engine.finish();

    assert!(analysis.token_cache().is_none());
    let namespaces: Vec<&str> = analysis
        .namespaces()
        .into_iter()
        .map(|ns| analysis.model().namespace(ns).name())
        .collect();
    assert_eq!(namespaces, vec!["Geo"]);
}
