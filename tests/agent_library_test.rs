//! Tests for AgentLibrary config directory scanning and AgentConfig presets.

use std::fs;
use tempfile::TempDir;

use gomoku_arena::{AgentConfig, AgentLibrary, LlmProvider, Move};

/// Creates a temporary directory with one or more agent TOML files.
fn make_agent_toml(dir: &TempDir, filename: &str, name: &str) {
    let content = format!(
        r#"name = "{name}"
llm_provider = "anthropic"
llm_model = "claude-3-5-haiku-20241022"
llm_max_tokens = 50
"#
    );
    fs::write(dir.path().join(filename), content).expect("Failed to write TOML");
}

#[test]
fn test_scan_loads_valid_configs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    make_agent_toml(&dir, "agent_a.toml", "AgentA");
    make_agent_toml(&dir, "agent_b.toml", "AgentB");

    let library = AgentLibrary::scan(dir.path()).expect("Scan failed");
    assert_eq!(library.len(), 2);
}

#[test]
fn test_scan_sorted_by_name() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    make_agent_toml(&dir, "zzz.toml", "Zebra");
    make_agent_toml(&dir, "aaa.toml", "Apple");
    make_agent_toml(&dir, "mmm.toml", "Mango");

    let library = AgentLibrary::scan(dir.path()).expect("Scan failed");
    let names: Vec<&str> = library.agents().iter().map(|a| a.name().as_str()).collect();
    assert_eq!(names, ["Apple", "Mango", "Zebra"]);
}

#[test]
fn test_scan_skips_non_toml_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    make_agent_toml(&dir, "valid.toml", "ValidAgent");
    fs::write(dir.path().join("notes.txt"), "not a config").expect("Write failed");
    fs::write(dir.path().join("config.json"), "{}").expect("Write failed");

    let library = AgentLibrary::scan(dir.path()).expect("Scan failed");
    assert_eq!(library.len(), 1);
    assert_eq!(library.agents()[0].name(), "ValidAgent");
}

#[test]
fn test_scan_skips_invalid_toml() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    make_agent_toml(&dir, "good.toml", "GoodAgent");
    fs::write(dir.path().join("bad.toml"), "this is not valid toml !!!@@@").expect("Write failed");

    let library = AgentLibrary::scan(dir.path()).expect("Scan should succeed despite bad file");
    assert_eq!(library.len(), 1);
    assert_eq!(library.agents()[0].name(), "GoodAgent");
}

#[test]
fn test_scan_keeps_first_of_duplicate_names() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("a_deepseek.toml"),
        "name = \"DeepSeek\"\nllm_model = \"deepseek-ai/DeepSeek-R1\"\n",
    )
    .expect("Write failed");
    fs::write(
        dir.path().join("b_deepseek.toml"),
        "name = \"deepseek\"\nllm_model = \"deepseek-chat\"\n",
    )
    .expect("Write failed");

    let library = AgentLibrary::scan(dir.path()).expect("Scan failed");
    assert_eq!(library.len(), 1);
    let agent = library.find("DEEPSEEK").expect("Agent missing");
    assert_eq!(agent.llm_model(), "deepseek-ai/DeepSeek-R1");
}

#[test]
fn test_scan_empty_directory_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let result = AgentLibrary::scan(dir.path());
    assert!(result.is_err(), "Empty directory should return error");
}

#[test]
fn test_scan_nonexistent_directory_fails() {
    let result = AgentLibrary::scan("/this/path/does/not/exist/at/all");
    assert!(result.is_err());
}

#[test]
fn test_scan_file_path_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = dir.path().join("a_file.toml");
    fs::write(&file_path, "name = \"X\"\n").expect("Write failed");

    let result = AgentLibrary::scan(&file_path);
    assert!(result.is_err(), "File path should return error");
}

#[test]
fn test_find_ignores_case() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    make_agent_toml(&dir, "alpha.toml", "Alpha");
    make_agent_toml(&dir, "beta.toml", "Beta");

    let library = AgentLibrary::scan(dir.path()).expect("Scan failed");
    let found = library.find("alpha").expect("Alpha should be found");
    assert_eq!(found.name(), "Alpha");
}

#[test]
fn test_find_not_found() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    make_agent_toml(&dir, "agent.toml", "SomeAgent");

    let library = AgentLibrary::scan(dir.path()).expect("Scan failed");
    assert!(library.find("NoSuchAgent").is_none());
}

#[test]
fn test_is_empty_false_when_loaded() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    make_agent_toml(&dir, "agent.toml", "SomeAgent");

    let library = AgentLibrary::scan(dir.path()).expect("Scan failed");
    assert!(!library.is_empty());
}

#[test]
fn test_scan_bundled_presets() {
    // agents/ ships the default presets; verify the directory scan works end-to-end.
    let library = AgentLibrary::scan("agents").expect("Scan of agents/ failed");
    assert!(library.find("DeepSeek").is_some());
    assert!(library.find("Gemini").is_some());
}

#[test]
fn test_defaults_fill_missing_fields() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("min.toml"), "name = \"Minimal\"\n").expect("Write failed");

    let config = AgentConfig::from_file(dir.path().join("min.toml")).expect("Load failed");
    assert_eq!(*config.llm_provider(), LlmProvider::OpenAI);
    assert_eq!(config.llm_model(), "gpt-4o-mini");
    assert_eq!(*config.llm_max_tokens(), 2048);
    assert_eq!(config.api_key_var(), "OPENAI_API_KEY");
}

#[test]
fn test_marker_configures_parser() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("r1.toml"),
        "name = \"R1\"\napi_key_env = \"MODELSCOPE_API_KEY\"\nfinal_answer_marker = \"=== Final Answer ===\"\n",
    )
    .expect("Write failed");

    let config = AgentConfig::from_file(dir.path().join("r1.toml")).expect("Load failed");
    assert_eq!(config.api_key_var(), "MODELSCOPE_API_KEY");

    let parser = config.parser();
    let text = "maybe [1,1]\n=== Final Answer ===\n[7,8]";
    assert_eq!(parser.parse(text), Some(Move::new(7, 8)));
}

#[test]
fn test_marker_reaches_llm_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    // PATH is always set, so the key lookup succeeds without real credentials.
    fs::write(
        dir.path().join("qwq.toml"),
        "name = \"QwQ\"\napi_key_env = \"PATH\"\nbase_url = \"https://example.invalid/v1/\"\nfinal_answer_marker = \"=== Final Answer ===\"\n",
    )
    .expect("Write failed");

    let config = AgentConfig::from_file(dir.path().join("qwq.toml")).expect("Load failed");
    let llm = config.create_llm_config().expect("Config failed");
    assert_eq!(llm.final_answer_marker(), Some("=== Final Answer ==="));
    assert_eq!(llm.base_url(), Some("https://example.invalid/v1"));
}

#[test]
fn test_missing_api_key_is_config_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    // A variable name no environment will define.
    fs::write(
        dir.path().join("nokey.toml"),
        "name = \"NoKey\"\napi_key_env = \"GOMOKU_ARENA_TEST_UNSET_KEY_9F2A\"\n",
    )
    .expect("Write failed");

    let config = AgentConfig::from_file(dir.path().join("nokey.toml")).expect("Load failed");
    let err = config
        .create_provider()
        .err()
        .expect("Missing key should fail");
    assert!(err.message.contains("GOMOKU_ARENA_TEST_UNSET_KEY_9F2A"));
}
