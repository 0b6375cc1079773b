use std::fs;

use agendo::clients::mock::MockCalendar;
use agendo::input::ScriptedPrompter;
use agendo::models::category::CategoryRegistry;
use agendo::service::plan;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

#[derive(Deserialize)]
struct ScriptLine {
    tokens: Vec<String>,
    answers: Vec<String>,
    expect_name: String,
    expect_start: NaiveDateTime,
}

#[tokio::test]
async fn script_drives_add_resolution() {
    let temp_dir = std::env::temp_dir().join(format!("agendo_script_{}", uuid::Uuid::new_v4()));
    let script_path = temp_dir.join("script.jsonl");
    fs::create_dir_all(&temp_dir).unwrap();
    fs::write(
        &script_path,
        r#"{"tokens":["2024-03-01","09:00","10:30"],"answers":["work","standup"],"expect_name":"standup","expect_start":"2024-03-01T09:00:00"}
{"tokens":["lunch"],"answers":["today","12:00","13:00","pasta"],"expect_name":"pasta","expect_start":"2024-03-15T12:00:00"}
{"tokens":[],"answers":["tomorrow","08:00","09:00","sport","swim"],"expect_name":"swim","expect_start":"2024-03-16T08:00:00"}"#,
    )
    .unwrap();

    let now = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(13, 37, 0)
        .unwrap();
    let backend = MockCalendar::new();
    let registry = CategoryRegistry::from_config_value("work=red").unwrap();

    let content = fs::read_to_string(&script_path).unwrap();
    for line in content.lines() {
        let step: ScriptLine = serde_json::from_str(line).unwrap();
        let mut prompter = ScriptedPrompter::new(step.answers.clone());
        plan::add(&backend, &registry, &step.tokens, now, &mut prompter)
            .await
            .unwrap();

        let event = backend
            .events()
            .into_iter()
            .find(|e| e.name == step.expect_name)
            .expect("scripted event should be inserted");
        assert_eq!(event.start, step.expect_start, "event {}", step.expect_name);
    }

    assert_eq!(backend.events().len(), 3);
}
