use super::{PathRouter, PatternRouter};
use crate::error::ConfigError;
use std::sync::Arc;

#[test]
fn test_root_path() {
    let (re, params, _) = PathRouter::path_to_regex("/").unwrap();
    assert!(re.is_match("/"));
    assert!(!re.is_match("/x"));
    assert!(params.is_empty());
}

#[test]
fn test_colon_and_brace_params() {
    let (re, params, literals) = PathRouter::path_to_regex("/widgets/:id").unwrap();
    assert!(re.is_match("/widgets/42"));
    assert!(!re.is_match("/widgets/42/edit"));
    assert_eq!(params, vec![Arc::<str>::from("id")]);
    assert_eq!(literals, 1);

    let (re, params, _) = PathRouter::path_to_regex("/a/{b}/c").unwrap();
    assert!(re.is_match("/a/1/c"));
    assert_eq!(params, vec![Arc::<str>::from("b")]);
}

#[test]
fn test_literal_segments_are_escaped() {
    let (re, _, _) = PathRouter::path_to_regex("/files/v1.0").unwrap();
    assert!(re.is_match("/files/v1.0"));
    assert!(!re.is_match("/files/v1x0"));
}

#[test]
fn test_invalid_patterns_rejected() {
    assert!(matches!(
        PathRouter::path_to_regex("/widgets/:"),
        Err(ConfigError::InvalidPattern { .. })
    ));
    assert!(matches!(
        PathRouter::path_to_regex("/files/*/tail"),
        Err(ConfigError::InvalidPattern { .. })
    ));
}

#[test]
fn test_recognize_extracts_and_decodes_params() {
    let router = PathRouter::new(["/", "/widgets/:id", "/users/:user/posts/:post"]).unwrap();

    let m = router.recognize("/widgets/hello%20world").unwrap();
    assert_eq!(m.pattern.as_ref(), "/widgets/:id");
    assert_eq!(m.params.get("id"), Some("hello world"));

    let m = router.recognize("/users/7/posts/abc?draft=1#top").unwrap();
    assert_eq!(m.params.positional(0), Some("7"));
    assert_eq!(m.params.positional(1), Some("abc"));
    assert_eq!(m.params.get("post"), Some("abc"));

    let m = router.recognize("").unwrap();
    assert_eq!(m.pattern.as_ref(), "/");
    assert!(router.recognize("/nope").is_none());
}

#[test]
fn test_literal_beats_param() {
    let router = PathRouter::new(["/widgets/:id", "/widgets/new"]).unwrap();
    assert_eq!(
        router.recognize("/widgets/new").unwrap().pattern.as_ref(),
        "/widgets/new"
    );
    assert_eq!(
        router.recognize("/widgets/9").unwrap().pattern.as_ref(),
        "/widgets/:id"
    );
}

#[test]
fn test_splat_captures_remainder() {
    let router = PathRouter::new(["/docs/*"]).unwrap();
    let m = router.recognize("/docs/guide/intro").unwrap();
    assert_eq!(m.params.get("splat"), Some("guide/intro"));
}

#[test]
fn test_params_to_json() {
    let router = PathRouter::new(["/widgets/:id"]).unwrap();
    let m = router.recognize("/widgets/42").unwrap();
    assert_eq!(m.params.to_json(), serde_json::json!({ "id": "42" }));
}
