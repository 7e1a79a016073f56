//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use jenkins_triage::domain::ports::{GenerationError, TextGenerator};

/// Generator replaying canned replies in order and recording every prompt.
/// Once the script runs out, the last reply repeats.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    last: Mutex<Option<Result<String, GenerationError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn failing(error: GenerationError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn generator_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = next {
            *last = Some(reply);
        }
        last.clone()
            .unwrap_or_else(|| Err(GenerationError::EmptyResponse("no script".to_string())))
    }
}

/// A well-formed analysis reply wrapped in chatter.
pub fn analysis_reply(cause: &str) -> String {
    format!(
        r#"Here is my analysis:
```json
{{
  "causes": [{{"cause": "{cause}", "confidence": "high", "technical_details": "details"}}],
  "solutions": [{{"solution": "Fix {cause}", "priority": "medium", "implementation_steps": ["step one"]}}]
}}
```"#
    )
}

/// Allure-style record JSON.
pub fn record_json(class: &str, name: &str, status: &str) -> String {
    serde_json::json!({
        "name": name,
        "fullName": format!("{class}.{name}"),
        "status": status,
        "statusMessage": format!("{name} failed: expected true"),
        "statusTrace": format!(
            "java.lang.AssertionError: expected true\n\tat org.junit.Assert.fail(Assert.java:89)\n\tat {class}.{name}({}.java:42)",
            class.rsplit('.').next().unwrap_or(class)
        ),
        "labels": [
            {"name": "suite", "value": "smoke"},
            {"name": "testClass", "value": class}
        ],
        "beforeStages": [{"name": "setUp", "status": "passed"}],
        "testStage": {"status": status},
        "afterStages": [],
        "time": {"start": 1_700_000_000_000_i64, "stop": 1_700_000_001_250_i64, "duration": 1250},
        "extra": {
            "history": {
                "statistic": {"total": 10, "passed": 7, "failed": 2, "broken": 1, "skipped": 0, "unknown": 0},
                "items": [
                    {"uid": "1", "status": "failed"},
                    {"uid": "2", "status": "passed"}
                ]
            }
        }
    })
    .to_string()
}
