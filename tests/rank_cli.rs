//! CLI contract tests for the `tsrank` binary.
#![cfg(feature = "cli")]

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn tsrank() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("tsrank").expect("binary builds with the cli feature")
}

fn write_fixtures(root: &Path) -> (String, String) {
    let vector = root.join("vector.json");
    let query = root.join("query.json");
    fs::write(
        &vector,
        r#"[
            {"lexeme": "cat", "positions": [{"pos": 1, "weight": "A"}]},
            {"lexeme": "dog", "positions": [{"pos": 3, "weight": "A"}]}
        ]"#,
    )
    .expect("write vector");
    fs::write(
        &query,
        r#"[
            {"operand": {"lexeme": "cat"}},
            {"operand": {"lexeme": "dog"}},
            {"operator": "and"}
        ]"#,
    )
    .expect("write query");
    (
        vector.to_str().unwrap().to_string(),
        query.to_str().unwrap().to_string(),
    )
}

#[test]
fn rank_scores_an_and_query() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (vector, query) = write_fixtures(tmp.path());

    tsrank()
        .args(["rank", "--vector", &vector, "--query", &query])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rank: 0.98"));
}

#[test]
fn rank_cd_scores_and_covers_dump_agrees() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (vector, query) = write_fixtures(tmp.path());

    tsrank()
        .args(["rank-cd", "--vector", &vector, "--query", &query])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rank_cd: 0.5"));

    tsrank()
        .args(["covers", "--vector", &vector, "--query", &query])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("cover: p=1 q=3 width=2")
                .and(predicate::str::contains("ok: 1 covers")),
        );
}

#[test]
fn method_mask_divides_by_unique_lexemes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (vector, query) = write_fixtures(tmp.path());

    // 0x08 = divide by distinct lexeme count (2).
    tsrank()
        .args([
            "rank", "--vector", &vector, "--query", &query, "--method", "8",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rank: 0.49"));
}

#[test]
fn malformed_weight_arrays_are_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (vector, query) = write_fixtures(tmp.path());

    tsrank()
        .args([
            "rank", "--vector", &vector, "--query", &query, "--weights", "[0.1, 0.2, 0.4]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));

    tsrank()
        .args([
            "rank", "--vector", &vector, "--query", &query, "--weights",
            "[0.1, null, 0.4, 1.0]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not contain nulls"));

    tsrank()
        .args([
            "rank", "--vector", &vector, "--query", &query, "--weights",
            "[[0.1, 0.2], [0.4, 1.0]]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("one-dimensional"));

    tsrank()
        .args([
            "rank", "--vector", &vector, "--query", &query, "--weights", "[0.1, 0.2, 0.4, 1.5]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn malformed_queries_are_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (vector, _) = write_fixtures(tmp.path());
    let bad_query = tmp.path().join("bad.json");
    fs::write(
        &bad_query,
        r#"[{"operand": {"lexeme": "cat"}}, {"operator": "and"}]"#,
    )
    .expect("write query");

    tsrank()
        .args([
            "rank", "--vector", &vector, "--query", bad_query.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed query"));
}
