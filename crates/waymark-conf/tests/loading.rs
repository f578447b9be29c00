//! Loading settings from disk and building routing components from them.

use rstest::rstest;
use std::collections::HashMap;
use std::io::Write;
use waymark_conf::{Env, RouterSettings, SettingsError};
use waymark_urls::RewriteDirection;

const SETTINGS: &str = r#"
app_root = "/service/"

[[rewrite]]
pattern = "/blog/regex:(\\d+)"
target = "/pages/post/$1"
"#;

#[rstest]
fn test_from_file() {
	// Arrange
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(SETTINGS.as_bytes()).unwrap();

	// Act
	let settings = RouterSettings::from_file(file.path()).unwrap();

	// Assert
	assert_eq!(settings.app_root.as_deref(), Some("/service/"));
	assert_eq!(settings.index_module, "index");
	let rewriter = settings.build_rewriter().unwrap();
	assert_eq!(rewriter.get("/blog/3", RewriteDirection::ToInternal), "/pages/post/3");
	assert_eq!(rewriter.get("/pages/post/3", RewriteDirection::ToExternal), "/blog/3");
}

#[rstest]
fn test_missing_file_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("waymark.toml");

	let err = RouterSettings::from_file(&path).unwrap_err();

	match err {
		SettingsError::Io { path: reported, .. } => assert_eq!(reported, path),
		other => panic!("expected io error, got {:?}", other),
	}
}

#[rstest]
fn test_environment_wins_over_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("waymark.toml");
	std::fs::write(&path, SETTINGS).unwrap();
	let env = Env::from_map(HashMap::from([(
		"WAYMARK_APP_ROOT".to_string(),
		"/staging/".to_string(),
	)]));

	let settings = RouterSettings::from_file(&path).unwrap().apply_env_from(&env);

	assert_eq!(settings.app_root.as_deref(), Some("/staging/"));
	assert!(settings.validate().is_ok());
}

#[cfg(feature = "history")]
#[rstest]
fn test_build_router_url() {
	let url = RouterSettings::from_toml_str(SETTINGS)
		.unwrap()
		.build_router_url()
		.unwrap();

	assert_eq!(url.app_root(), Some("/service/"));
	assert_eq!(url.external_url("/pages/post/9?x=1"), "/service/blog/9?x=1");
}

#[cfg(feature = "ssr")]
#[rstest]
#[tokio::test]
async fn test_build_pipeline() {
	use std::sync::Arc;
	use waymark_ssr::{InMemoryModuleSource, ModuleDef, PageRequest, RenderOptions, render_fn};

	let settings = RouterSettings::from_toml_str(SETTINGS).unwrap();
	let source = InMemoryModuleSource::new().with_module("pages/post/4", ModuleDef::new());
	let pipeline = settings
		.build_pipeline(
			Arc::new(source),
			render_fn(|options, _| Ok(options.module_name.clone())),
		)
		.unwrap();

	let result = pipeline
		.get_page_source(RenderOptions::new(), &PageRequest::new("/blog/4"), |_| {}, |_| {})
		.await;

	assert_eq!(result.html(), Some("pages/post/4"));
}
