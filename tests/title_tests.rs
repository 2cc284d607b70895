// Integration tests for the title generator
//
// Titles are enrichment only: every failure path must end in the heuristic
// fallback or the default title, never an error.

use noting_capture::{
    GenerationConfig, GenerationResult, TextGenerator, TitleConfig, TitleGenerator, DEFAULT_TITLE,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ScriptedGenerator {
    responses: Mutex<VecDeque<anyhow::Result<GenerationResult>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    fn new(
        responses: impl IntoIterator<Item = anyhow::Result<GenerationResult>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

fn text_result(text: &str) -> anyhow::Result<GenerationResult> {
    Ok(GenerationResult {
        text: text.to_string(),
        finish_reason: Some("STOP".to_string()),
    })
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> anyhow::Result<GenerationResult> {
        self.calls
            .lock()
            .unwrap()
            .push((config.model.clone(), prompt.to_string()));

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GenerationResult::default()))
    }
}

fn config(fallback_model: Option<&str>, max_words: usize) -> TitleConfig {
    TitleConfig {
        model: "primary-model".to_string(),
        fallback_model: fallback_model.map(str::to_string),
        max_words,
    }
}

fn without_generator(max_words: usize) -> TitleGenerator {
    TitleGenerator::new(None, config(None, max_words))
}

#[tokio::test]
async fn empty_transcript_gets_the_default_title() {
    assert_eq!(without_generator(8).title("").await, DEFAULT_TITLE);
    assert_eq!(without_generator(8).title("  \n ").await, DEFAULT_TITLE);
}

#[tokio::test]
async fn missing_credentials_fall_back_to_first_sentence() {
    let titles = without_generator(8);

    let title = titles.title("Meeting about budget. Decided X.").await;

    assert_eq!(title, "Meeting about budget");
}

#[tokio::test]
async fn heuristic_truncates_to_the_word_budget() {
    let titles = without_generator(3);

    let title = titles
        .title("The quarterly planning meeting ran long again today. More tomorrow.")
        .await;

    assert_eq!(title, "The quarterly planning");
}

#[tokio::test]
async fn model_title_is_cleaned_up() {
    let generator = ScriptedGenerator::new([text_result("\"Budget  Planning\n Meeting.\"")]);
    let titles = TitleGenerator::new(Some(generator), config(None, 8));

    let title = titles.title("We met about the budget.").await;

    assert_eq!(title, "Budget Planning Meeting");
}

#[tokio::test]
async fn only_one_quote_layer_is_stripped() {
    let generator = ScriptedGenerator::new([text_result("\"\"Nested\"\"")]);
    let titles = TitleGenerator::new(Some(generator), config(None, 8));

    assert_eq!(titles.title("Anything at all.").await, "\"Nested\"");
}

#[tokio::test]
async fn empty_primary_is_retried_with_reworded_prompt_on_fallback_model() {
    let generator = ScriptedGenerator::new([text_result(""), text_result("Weekly Sync")]);
    let titles = TitleGenerator::new(Some(generator.clone()), config(Some("backup-model"), 8));

    let title = titles.title("The weekly sync covered hiring.").await;

    assert_eq!(title, "Weekly Sync");

    let calls = generator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "primary-model");
    assert_eq!(calls[1].0, "backup-model");
    assert_ne!(
        calls[0].1, calls[1].1,
        "the retry uses a differently worded prompt"
    );
}

#[tokio::test]
async fn no_distinct_fallback_model_means_no_retry() {
    let generator = ScriptedGenerator::new([text_result("")]);
    let titles = TitleGenerator::new(Some(generator.clone()), config(Some("primary-model"), 8));

    let title = titles.title("Standup notes. Backend is blocked.").await;

    assert_eq!(generator.calls().len(), 1);
    assert_eq!(title, "Standup notes");
}

#[tokio::test]
async fn whitespace_or_punctuation_only_output_uses_the_heuristic() {
    let generator = ScriptedGenerator::new([text_result("  ...  ")]);
    let titles = TitleGenerator::new(Some(generator), config(None, 8));

    let title = titles.title("Retro went well. Actions assigned.").await;

    assert_eq!(title, "Retro went well");
}

#[tokio::test]
async fn generator_errors_are_absorbed_into_the_heuristic() {
    let generator = ScriptedGenerator::new([Err(anyhow::anyhow!("boom"))]);
    let titles = TitleGenerator::new(Some(generator), config(None, 8));

    let title = titles.title("Incident review for the outage. Root cause found.").await;

    assert_eq!(title, "Incident review for the outage");
}

#[tokio::test]
async fn transcript_without_terminal_punctuation_still_gets_a_title() {
    let titles = without_generator(4);

    let title = titles.title("rough unpunctuated voice memo text").await;

    assert_eq!(title, "rough unpunctuated voice memo");
}
