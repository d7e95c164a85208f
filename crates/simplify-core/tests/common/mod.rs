//! Scripted collaborators for orchestrator tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use simplify_core::{
    ArtifactRenderer, Artifacts, ContractSession, Document, RenderError, RewriteClient, Section,
    ServiceError, Simplifier,
};

/// Replays canned replies in order and records every prompt it receives
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, ServiceError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, error: ServiceError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RewriteClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("script exhausted".to_string())))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Renders section titles into the HTML; can be switched into failure mode
#[derive(Default)]
pub struct CountingRenderer {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl CountingRenderer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ArtifactRenderer for CountingRenderer {
    fn render(&self, document: &Document, source_label: &str) -> Result<Artifacts, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RenderError::Compile(vec!["unknown font".to_string()]));
        }

        let titles: Vec<&str> = document.sections().iter().map(|s| s.title.as_str()).collect();
        Ok(Artifacts {
            html: format!("{}|{}", source_label, titles.join("|")),
            pdf: b"%PDF-1.7 fake".to_vec(),
        })
    }
}

pub fn simplifier(client: &Arc<ScriptedClient>, renderer: &Arc<CountingRenderer>) -> Simplifier {
    Simplifier::new(client.clone(), renderer.clone())
}

pub fn section_json(title: &str, body: &str, rationale: &str) -> String {
    serde_json::json!({
        "section_title": title,
        "simplified_text": body,
        "justification": rationale,
    })
    .to_string()
}

pub fn document_json(sections: &[(&str, &str, &str)]) -> String {
    let sections: Vec<serde_json::Value> = sections
        .iter()
        .map(|(t, b, r)| {
            serde_json::json!({"section_title": t, "simplified_text": b, "justification": r})
        })
        .collect();
    serde_json::json!({ "sections": sections }).to_string()
}

pub fn two_sections() -> Document {
    Document::new(vec![
        Section::new("1. Entrega", "El arrendador entrega la casa.", "Voz activa."),
        Section::new("2. Pago", "El arrendatario paga cada mes.", "Oración corta."),
    ])
}

pub fn simplified_session() -> ContractSession {
    ContractSession::with_document(
        "arriendo.docx",
        "CLÁUSULA PRIMERA. EL ARRENDADOR entregará el inmueble...",
        two_sections(),
    )
}
