use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sniffs::rules::type_registry::{PARAMETER_TYPES, RETURN_TYPES};
use sniffs::{Diagnostic, Ruleset};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(path: &Path) -> String {
    fs::read_to_string(path).expect("fixture read failed")
}

fn errors_per_line(diagnostics: &[Diagnostic]) -> BTreeMap<usize, usize> {
    let mut lines = BTreeMap::new();
    for diagnostic in diagnostics {
        *lines.entry(diagnostic.line).or_insert(0) += 1;
    }
    lines
}

fn case_variants(keyword: &str) -> Vec<String> {
    let upper = keyword.to_ascii_uppercase();
    let capitalized = format!("{}{}", &upper[..1], &keyword[1..]);
    let alternating: String = keyword
        .chars()
        .enumerate()
        .map(|(idx, ch)| {
            if idx % 2 == 1 {
                ch.to_ascii_uppercase()
            } else {
                ch
            }
        })
        .collect();
    vec![upper, capitalized, alternating]
}

#[test]
fn fixture_reports_expected_lines() {
    let path = fixtures_root().join("lowercase_type_declaration.inc");
    let source = load_fixture(&path);
    let diagnostics = Ruleset::standard().check(&path, &source);

    let expected: BTreeMap<usize, usize> = [
        // Parameter type declarations.
        (19, 1),
        (20, 1),
        (21, 1),
        (22, 1),
        (23, 1),
        (24, 1),
        (25, 1),
        (26, 1),
        (27, 1),
        (28, 2),
        (29, 1),
        (30, 2),
        (31, 1),
        // Return type declarations.
        (47, 1),
        (48, 1),
        (49, 1),
        (50, 1),
        (51, 1),
        (52, 1),
        (53, 1),
        (54, 1),
        (55, 1),
        (56, 1),
        (57, 1),
        (58, 1),
        // Methods.
        (61, 3),
        (62, 2),
    ]
    .into_iter()
    .collect();

    assert_eq!(errors_per_line(&diagnostics), expected);
    assert!(diagnostics.iter().all(|d| d.fixable));
}

#[test]
fn fixture_fixes_match_fixed_file() {
    let path = fixtures_root().join("lowercase_type_declaration.inc");
    let source = load_fixture(&path);
    let fixed = load_fixture(&fixtures_root().join("lowercase_type_declaration.inc.fixed"));

    let outcome = Ruleset::standard().fix(&path, &source);
    assert!(outcome.converged);
    assert_eq!(outcome.fixes_applied, 32);
    assert!(outcome.remaining.is_empty(), "left: {:?}", outcome.remaining);
    assert_eq!(outcome.contents, fixed);
}

#[test]
fn fixed_fixture_is_clean() {
    let path = fixtures_root().join("lowercase_type_declaration.inc.fixed");
    let source = load_fixture(&path);
    let diagnostics = Ruleset::standard().check(&path, &source);
    assert!(diagnostics.is_empty(), "unexpected: {:?}", diagnostics);
}

#[test]
fn every_parameter_keyword_variant_is_fixed() {
    let ruleset = Ruleset::standard();
    for keyword in &PARAMETER_TYPES {
        for variant in case_variants(keyword.name) {
            if variant == keyword.name {
                continue;
            }
            let source = format!("<?php function check({variant} $value) {{}}");
            let diagnostics = ruleset.check(Path::new("variant.php"), &source);
            assert_eq!(diagnostics.len(), 1, "{variant}: {diagnostics:?}");
            assert_eq!(diagnostics[0].code(), "ParameterTypeFound");
            assert_eq!(diagnostics[0].data, vec![keyword.name.to_string(), variant.clone()]);

            let outcome = ruleset.fix(Path::new("variant.php"), &source);
            assert_eq!(
                outcome.contents,
                format!("<?php function check({} $value) {{}}", keyword.name)
            );
        }
    }
}

#[test]
fn every_return_keyword_variant_is_fixed() {
    let ruleset = Ruleset::standard();
    for keyword in &RETURN_TYPES {
        for variant in case_variants(keyword) {
            let source = format!("<?php function check(): {variant} {{}}");
            let diagnostics = ruleset.check(Path::new("variant.php"), &source);
            assert_eq!(diagnostics.len(), 1, "{variant}: {diagnostics:?}");
            assert_eq!(diagnostics[0].code(), "ReturnTypeFound");

            let outcome = ruleset.fix(Path::new("variant.php"), &source);
            assert_eq!(outcome.contents, format!("<?php function check(): {keyword} {{}}"));
        }
    }
}

#[test]
fn diagnostics_serialize_for_reports() {
    let diagnostics = Ruleset::standard().check(
        Path::new("a.php"),
        "<?php function foo(Int $a) {}",
    );
    let json = serde_json::to_value(&diagnostics).expect("serialize");
    assert_eq!(
        json[0]["source"],
        "PHP.LowerCaseTypeDeclaration.ParameterTypeFound"
    );
    assert_eq!(json[0]["severity"], "error");
    assert_eq!(json[0]["fixable"], true);
    assert!(json[0].get("token").is_none());
}

#[test]
fn arrow_function_only_return_type_is_checked() {
    let ruleset = Ruleset::standard();
    let source = "<?php\n$f = fn(Int $x): Int => $x;\n";
    let diagnostics = ruleset.check(Path::new("arrow.php"), source);
    let codes: Vec<_> = diagnostics.iter().map(Diagnostic::code).collect();
    assert_eq!(codes, vec!["ReturnTypeFound"]);

    let outcome = ruleset.fix(Path::new("arrow.php"), source);
    assert_eq!(outcome.contents, "<?php\n$f = fn(Int $x): int => $x;\n");
}
