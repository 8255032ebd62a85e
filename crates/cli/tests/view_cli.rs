use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn make_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn write_file(path: &Path, body: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, body).expect("write file");
    path.to_path_buf()
}

fn write_conversation(path: &Path, count: usize) -> PathBuf {
    let messages: Vec<Value> = (0..count)
        .map(|idx| {
            let kind = if idx % 2 == 0 { "user" } else { "agent" };
            json!({"idx": idx, "type": kind, "content": format!("message {idx}")})
        })
        .collect();
    write_file(path, &serde_json::to_string(&messages).expect("encode"))
}

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_agentview"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("run agentview")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[test]
fn merge_resolves_tool_calls_across_files() {
    let home = make_home();
    let history = write_file(
        &home.path().join("history.json"),
        r#"[
            {"idx":0,"type":"user","content":"hi"},
            {"idx":1,"type":"agent","tool_calls":[{"name":"bash","tool_call_id":"x"}]}
        ]"#,
    );
    let live = write_file(
        &home.path().join("live.jsonl"),
        "{\"idx\":1,\"type\":\"agent\",\"tool_calls\":[{\"name\":\"bash\",\"tool_call_id\":\"x\"}]}\n\
         {\"idx\":2,\"type\":\"tool\",\"tool_call_id\":\"x\",\"tool_result\":\"ok\"}\n",
    );

    let output = run(
        home.path(),
        &["merge", history.to_str().unwrap(), live.to_str().unwrap()],
    );
    let merged: Value = serde_json::from_str(&stdout(&output)).expect("merge json");
    let merged = merged.as_array().expect("array");

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0]["idx"], 0);
    assert_eq!(merged[1]["tool_calls"][0]["result_message"]["idx"], 2);
}

#[test]
fn view_shows_baseline_window() {
    let home = make_home();
    let file = write_conversation(&home.path().join("conv.json"), 50);

    let output = run(
        home.path(),
        &["view", file.to_str().unwrap(), "--baseline", "10"],
    );
    let text = stdout(&output);
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("# showing 10 of 50 messages (40 older)"));
    assert_eq!(lines.next(), Some("[40] user: message 40"));
    assert_eq!(text.lines().last(), Some("[49] agent: message 49"));
}

#[test]
fn view_zero_baseline_still_shows_latest() {
    let home = make_home();
    let file = write_conversation(&home.path().join("conv.json"), 5);

    let output = run(
        home.path(),
        &["view", file.to_str().unwrap(), "--baseline", "0"],
    );
    let text = stdout(&output);

    assert_eq!(text.lines().next(), Some("# showing 1 of 5 messages (4 older)"));
    assert_eq!(text.lines().last(), Some("[4] user: message 4"));
}

#[test]
fn view_loads_older_chunks() {
    let home = make_home();
    let file = write_conversation(&home.path().join("conv.json"), 50);

    let output = run(
        home.path(),
        &[
            "view",
            file.to_str().unwrap(),
            "--baseline",
            "10",
            "--older",
            "5",
            "--format",
            "json",
        ],
    );
    let view: Value = serde_json::from_str(&stdout(&output)).expect("view json");

    assert_eq!(view["total"], 50);
    assert_eq!(view["shown"], 50);
    assert_eq!(view["older_remaining"], 0);
    assert_eq!(view["messages"][0]["idx"], 0);
}

#[test]
fn view_reads_config_file() {
    let home = make_home();
    let file = write_conversation(&home.path().join("conv.json"), 12);
    let config = write_file(
        &home.path().join("agentview.toml"),
        "[timeline]\nbaseline_count = 5\nload_chunk_size = 3\n",
    );

    let output = run(
        home.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "view",
            file.to_str().unwrap(),
            "--older",
            "1",
        ],
    );
    let text = stdout(&output);
    assert_eq!(text.lines().next(), Some("# showing 8 of 12 messages (4 older)"));
}

#[test]
fn view_hides_control_markers() {
    let home = make_home();
    let file = write_file(
        &home.path().join("conv.json"),
        r#"[
            {"idx":0,"type":"user","content":"hi"},
            {"idx":1,"type":"slug","content":"fix-parser"},
            {"idx":2,"type":"agent","content":"hello"}
        ]"#,
    );

    let text = stdout(&run(home.path(), &["view", file.to_str().unwrap()]));
    assert_eq!(text.lines().next(), Some("# showing 2 of 2 messages (0 older)"));
    assert!(!text.contains("fix-parser"));
}

#[test]
fn invalid_message_file_fails() {
    let home = make_home();
    let file = write_file(&home.path().join("bad.jsonl"), "not json\n");

    let output = run(home.path(), &["view", file.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse messages"), "stderr: {stderr}");
}

#[test]
fn config_init_then_show() {
    let home = make_home();

    let init = stdout(&run(home.path(), &["config", "--init"]));
    assert!(init.contains("agentview.toml"));
    assert!(home
        .path()
        .join(".config/agentview/agentview.toml")
        .exists());

    let shown = stdout(&run(home.path(), &["config"]));
    assert!(shown.contains("baseline_count = 30"));
    assert!(shown.contains("drop_empty_messages = false"));
}
