use std::path::Path;

#[test]
fn test_project_config_round_trip() {
	let dir = tempfile::TempDir::new().unwrap();
	let path = dir.path().join("quarry.toml");
	std::fs::write(
		&path,
		r#"
			[database]
			default = "main"

			[database.pools.main]
			url = "sqlite://quarry.db"
			strategy = "queue"
			max_size = 4
			max_idle = 2
		"#,
	)
	.unwrap();

	let output = std::process::Command::new(env!("CARGO_BIN_EXE_quarry"))
		.arg("--config")
		.arg(&path)
		.arg("status")
		.output()
		.unwrap();
	assert!(output.status.success(), "{:?}", output);
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("main"), "{}", stdout);
	assert!(stdout.contains("[queue]"), "{}", stdout);
}

#[test]
fn test_missing_config_fails_with_hint() {
	let dir = tempfile::TempDir::new().unwrap();
	let missing = dir.path().join("quarry.toml");
	assert!(!Path::new(&missing).exists());

	let output = std::process::Command::new(env!("CARGO_BIN_EXE_quarry"))
		.arg("--config")
		.arg(&missing)
		.arg("status")
		.output()
		.unwrap();
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("quarry init"), "{}", stderr);
}
