//! CLI integration tests for `envmanager unload` and `envmanager current`.

mod support;
use support::*;

#[test]
fn test_unload_leaves_dependencies_loaded() {
    let t = Test::with_config(CONST_PROFILES);

    let output = t.unload("child,root", &["child"]);
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "export ENVMANAGER_LOADED=\"root\";unset CHILD"
    );
}

#[test]
fn test_unload_several() {
    let t = Test::with_config(CONST_PROFILES);

    let output = t.unload("child,root,other", &["child", "other"]);
    assert_success(&output);
    assert_eq!(
        statements(&output),
        vec![
            "export ENVMANAGER_LOADED=\"root\"",
            "unset CHILD",
            "unset OTHER",
        ]
    );
}

#[test]
fn test_unload_all() {
    let t = Test::with_config(CONST_PROFILES);

    let output = t.unload("child,root", &["--all"]);
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "export ENVMANAGER_LOADED=\"\";unset CHILD;unset ROOT"
    );
}

#[test]
fn test_unload_all_with_nothing_loaded() {
    let t = Test::with_config(CONST_PROFILES);

    let output = t.unload("", &["--all"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export ENVMANAGER_LOADED=\"\"");
}

#[test]
fn test_unload_requires_profiles() {
    let t = Test::with_config(CONST_PROFILES);

    let output = t.unload("root", &[]);
    assert_no_statements(&output);
    assert_stderr_contains(&output, "you must specify at least one profile to unload");
}

#[test]
fn test_unload_unknown_profile() {
    let t = Test::with_config(CONST_PROFILES);

    let output = t.unload("root", &["ghost"]);
    assert_no_statements(&output);
    assert_stderr_contains(&output, "profile with name ghost does not exist");
}

#[test]
fn test_unload_profile_that_is_not_loaded() {
    let t = Test::with_config(CONST_PROFILES);

    let output = t.unload("root", &["other"]);
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "export ENVMANAGER_LOADED=\"root\";unset OTHER"
    );
}

#[cfg(unix)]
#[test]
fn test_unload_never_reads_storage() {
    let t = Test::new();
    let store = t.home.path().join("store");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(t.config_path(), pass_config(&store)).unwrap();

    // no gpg installed and no secret file: unloading must still work
    let output = t.unload("api", &["api"]);
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "export ENVMANAGER_LOADED=\"\";unset API_TOKEN;unset API_USER"
    );
}

#[test]
fn test_current_sorted() {
    let t = Test::new();

    let output = t.current("root,child,,other");
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "child\nother\nroot");
}

#[test]
fn test_current_nothing_loaded() {
    let t = Test::new();

    let output = t.current("");
    assert_success(&output);
    assert_stdout_contains(&output, "No profiles loaded");
}

#[test]
fn test_loaded_alias() {
    let t = Test::new();

    let output = t
        .cmd_loaded("root")
        .arg("loaded")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "root");
}

#[test]
fn test_current_needs_no_config() {
    let t = Test::new();
    assert!(!t.config_path().exists());

    assert_success(&t.current("root"));
}
