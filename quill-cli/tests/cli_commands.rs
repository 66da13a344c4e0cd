use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn quill_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("quill"));
    cmd.current_dir(cwd).env("RUST_LOG", "off");
    cmd
}

fn site(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    for (rel, body) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write");
    }
    dir
}

#[test]
fn render_wraps_template_in_layout() {
    let dir = site(&[
        ("views/page.html", "hi {{ who }}"),
        ("views/side.html", "side"),
        ("views/layout.html", "[{{ LayoutContent }}|{{ Side }}|{{ Head }}]"),
    ]);

    quill_cmd(dir.path())
        .args(["render", "page.html", "--set", "who=bo"])
        .args(["--layout", "layout.html", "--section", "Side=side.html", "--section", "Head="])
        .assert()
        .success()
        .stdout(predicate::eq("[hi bo|side|]"));
}

#[test]
fn render_reads_data_file_and_writes_output() {
    let dir = site(&[("views/list.tpl", "{% for n in nums %}{{ n }};{% endfor %}")]);
    fs::write(dir.path().join("data.json"), r#"{ "nums": [1, 2, 3] }"#).expect("data");

    quill_cmd(dir.path())
        .args(["render", "list.tpl", "--data", "data.json", "--output", "out.txt"])
        .args(["--mode", "production"])
        .assert()
        .success();

    let out = fs::read_to_string(dir.path().join("out.txt")).expect("out");
    assert_eq!(out, "1;2;3;");
}

#[test]
fn render_missing_template_fails() {
    let dir = site(&[("views/page.html", "x")]);

    quill_cmd(dir.path())
        .args(["render", "nope.html"])
        .assert()
        .failure()
        .stderr(contains("nope.html"));
}

#[test]
fn build_reports_failures_and_exits_nonzero() {
    let dir = site(&[
        ("views/ok.html", "fine"),
        ("views/broken.html", r#"{% include "gone.html" %}"#),
    ]);

    quill_cmd(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stdout(contains("ok.html"))
        .stdout(contains("broken.html"))
        .stderr(contains("1 template(s) failed"));
}

#[test]
fn build_without_views_directory_is_a_no_op() {
    let dir = TempDir::new().expect("tempdir");

    quill_cmd(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(contains("No templates found"));
}

#[test]
fn list_honours_config_file() {
    let dir = site(&[
        ("site/index.html", "x"),
        ("site/blog/post.tera", "y"),
        ("site/notes.txt", "z"),
    ]);
    fs::write(
        dir.path().join("quill.yaml"),
        "views_path: site\nextensions: [html, tera]\n",
    )
    .expect("config");

    quill_cmd(dir.path())
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"blog/post.tera\""))
        .stdout(contains("\"index.html\""))
        .stdout(contains("notes.txt").not());
}

#[test]
fn invalid_mode_is_rejected() {
    let dir = TempDir::new().expect("tempdir");

    quill_cmd(dir.path())
        .args(["list", "--mode", "staging"])
        .assert()
        .failure()
        .stderr(contains("staging"));
}
