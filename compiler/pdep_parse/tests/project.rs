//! Parsing several files into one code model.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pdep_code::{CodeBuilder, CodeModel, TypeKind};
use pdep_parse::{parse_unit, ParseError, ParserConfig};
use pretty_assertions::assert_eq;

const PRICED: &str = "<?php
namespace Shop;

interface Priced
{
    public function price(): float;
}
";

const ITEM: &str = "<?php
namespace Shop\\Model;

use Shop\\Priced;

abstract class Item implements Priced
{
    protected $name;

    public function name()
    {
        return $this->name;
    }
}
";

const BOOK: &str = "<?php
namespace Shop\\Model;

use Shop\\Io\\Logger;

final class Book extends Item
{
    const FORMAT = 'paper';

    /**
     * @throws \\Shop\\Io\\IoError
     */
    public function price(): float
    {
        try {
            $log = new Logger();
        } catch (\\Shop\\Io\\IoError $e) {
            return 0.0;
        }
        return 9.5;
    }
}
";

fn build(files: &[(&str, &str)]) -> (CodeModel, Vec<Result<(), ParseError>>) {
    let mut builder = CodeBuilder::new();
    let config = ParserConfig::default();
    let results = files
        .iter()
        .map(|(path, source)| {
            parse_unit(&mut builder, Some((*path).into()), (*source).to_owned(), &config, None).map(|_| ())
        })
        .collect();
    (builder.finish(), results)
}

fn names(model: &CodeModel, types: &[pdep_code::TypeId]) -> Vec<String> {
    types.iter().map(|&t| model.type_decl(t).qualified_name()).collect()
}

#[test]
fn hierarchy_spans_files() {
    let (model, results) = build(&[("Priced.php", PRICED), ("Item.php", ITEM), ("Book.php", BOOK)]);
    assert!(results.iter().all(Result::is_ok));

    let book = model.find_type("Shop\\Model\\Book").unwrap();
    let priced = model.find_type("Shop\\Priced").unwrap();
    let item = model.find_type("Shop\\Model\\Item").unwrap();

    assert_eq!(model.type_decl(priced).kind(), TypeKind::Interface);
    assert!(model.type_decl(item).is_abstract());
    assert!(model.type_decl(book).is_final());
    assert!(model.is_subtype_of(book, priced).unwrap());
    assert_eq!(names(&model, &model.parent_classes(book).unwrap()), vec!["Shop\\Model\\Item"]);
}

#[test]
fn each_file_is_its_own_unit() {
    let (model, _) = build(&[("Priced.php", PRICED), ("Item.php", ITEM), ("Book.php", BOOK)]);

    let files: Vec<String> = model
        .units()
        .map(|(_, unit)| unit.file().unwrap().display().to_string())
        .collect();
    assert_eq!(files, vec!["Priced.php", "Item.php", "Book.php"]);
    for (_, unit) in model.units() {
        assert_eq!(unit.types().len(), 1);
    }
}

#[test]
fn inherited_methods_keep_their_origin() {
    let (model, _) = build(&[("Priced.php", PRICED), ("Item.php", ITEM), ("Book.php", BOOK)]);
    let book = model.find_type("Shop\\Model\\Book").unwrap();
    let item = model.find_type("Shop\\Model\\Item").unwrap();

    let methods = model.all_methods(book).unwrap();
    assert_eq!(methods["name"].origin, item);
    assert_eq!(methods["price"].origin, book);
    assert!(!methods["price"].is_abstract());
    assert!(methods["name"].modifiers.is_public());
}

#[test]
fn body_references_become_dependencies() {
    let (model, _) = build(&[("Priced.php", PRICED), ("Item.php", ITEM), ("Book.php", BOOK)]);
    let book = model.find_type("Shop\\Model\\Book").unwrap();
    let price = model.find_own_method(book, "price").unwrap();

    let mut deps = names(&model, &model.callable_dependencies(price));
    deps.sort();
    assert_eq!(deps, vec!["Shop\\Io\\IoError", "Shop\\Io\\Logger"]);

    let logger = model.find_type("Shop\\Io\\Logger").unwrap();
    assert!(!model.type_decl(logger).is_user_defined());
    assert_eq!(model.own_constants(book).len(), 1);
}

#[test]
fn a_broken_file_does_not_lose_the_others() {
    let (model, results) = build(&[("Priced.php", PRICED), ("Broken.php", "<?php class { }")]);

    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected token: {, line: 1, col: 13, file: Broken.php"
    );
    assert_eq!(err.line(), Some(1));
    assert!(model.find_type("Shop\\Priced").is_some());
}
