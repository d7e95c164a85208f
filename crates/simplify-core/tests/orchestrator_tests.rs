//! Ingestion and edit behavior against scripted collaborators

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use pretty_assertions::assert_eq;
use simplify_core::{
    ContractSession, EditRequest, Section, ServiceError, SimplifierOptions, SimplifyError,
    SourceContextPolicy,
};

#[tokio::test]
async fn test_ingest_installs_document_and_renders() {
    let client = Arc::new(ScriptedClient::new().reply(document_json(&[(
        "1. Entrega",
        "El arrendador entrega la casa.",
        "Se usó voz activa.",
    )])));
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = ContractSession::new("arriendo.pdf", "EL ARRENDADOR entregará...");

    let outcome = simplifier(&client, &renderer).ingest(&mut session).await.unwrap();

    assert_eq!(outcome.revision, 1);
    assert_eq!(outcome.sections, 1);
    assert!(outcome.artifacts_fresh());
    assert_eq!(session.sections()[0].title, "1. Entrega");
    assert_eq!(session.sections()[0].body, "El arrendador entrega la casa.");
    assert_eq!(
        session.artifacts().map(|a| a.html.as_str()),
        Some("arriendo.pdf|1. Entrega")
    );
    assert_eq!(client.calls(), 1);
    assert_eq!(renderer.calls(), 1);
    assert!(client
        .last_prompt()
        .unwrap()
        .ends_with("## Contrato Original para Simplificar:\n\nEL ARRENDADOR entregará..."));
}

#[tokio::test]
async fn test_ingest_fenced_empty_sections() {
    let client = Arc::new(ScriptedClient::new().reply("```json\n{\"sections\": []}\n```"));
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = ContractSession::new("vacio.docx", "texto");

    let outcome = simplifier(&client, &renderer).ingest(&mut session).await.unwrap();

    assert_eq!(outcome.sections, 0);
    assert!(session.is_simplified());
    assert!(session.sections().is_empty());
    assert!(session.has_fresh_artifacts());
}

#[tokio::test]
async fn test_ingest_missing_sections_leaves_session_unsimplified() {
    let client = Arc::new(
        ScriptedClient::new()
            .reply(r#"{"clausulas": []}"#)
            .reply(document_json(&[("A", "B", "C")])),
    );
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer);
    let mut session = ContractSession::new("c.pdf", "texto");

    let err = simplifier.ingest(&mut session).await.unwrap_err();
    assert!(matches!(err, SimplifyError::Validation { .. }));
    assert!(!session.is_simplified());
    assert_eq!(session.revision(), 0);
    assert_eq!(renderer.calls(), 0);

    // resubmission from the stored raw text
    simplifier.ingest(&mut session).await.unwrap();
    assert_eq!(session.sections().len(), 1);
}

#[tokio::test]
async fn test_ingest_twice_is_rejected() {
    let client = Arc::new(ScriptedClient::new());
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = simplified_session();

    let err = simplifier(&client, &renderer).ingest(&mut session).await.unwrap_err();

    assert_eq!(err, SimplifyError::AlreadySimplified);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_section_edit_updates_only_that_slot() {
    let client = Arc::new(ScriptedClient::new().reply(format!(
        "Claro, aquí está:\n```json\n{}\n```",
        section_json("2. Pago", "Pagas el día 5 de cada mes.", "Se precisó la fecha.")
    )));
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = simplified_session();
    let before = session.sections().to_vec();

    let outcome = simplifier(&client, &renderer)
        .apply(&mut session, &EditRequest::section(1, "Indica la fecha de pago"))
        .await
        .unwrap();

    assert_eq!(outcome.revision, 2);
    assert_eq!(session.sections()[0], before[0]);
    assert_eq!(
        session.sections()[1],
        Section::new("2. Pago", "Pagas el día 5 de cada mes.", "Se precisó la fecha.")
    );

    let prompt = client.last_prompt().unwrap();
    assert!(prompt.contains("Título: 2. Pago"));
    assert!(prompt.contains("El arrendatario paga cada mes."));
    assert!(prompt.contains("Indica la fecha de pago"));
}

#[tokio::test]
async fn test_section_edit_out_of_range_makes_no_call() {
    let client = Arc::new(ScriptedClient::new());
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = simplified_session();

    let err = simplifier(&client, &renderer)
        .apply(&mut session, &EditRequest::section(5, "x"))
        .await
        .unwrap_err();

    assert_eq!(err, SimplifyError::SectionOutOfRange { index: 5, len: 2 });
    assert_eq!(client.calls(), 0);
    assert_eq!(session.sections(), two_sections().sections());
}

#[tokio::test]
async fn test_section_edit_service_failure_is_atomic() {
    let client = Arc::new(ScriptedClient::new().fail(ServiceError::Http {
        status: 503,
        body: "overloaded".to_string(),
    }));
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer);
    let mut session = simplified_session();
    simplifier.regenerate_artifacts(&mut session).await.unwrap();
    let revision = session.revision();

    let err = simplifier
        .edit_section(&mut session, 0, "más formal")
        .await
        .unwrap_err();

    assert!(matches!(err, SimplifyError::Service(ServiceError::Http { status: 503, .. })));
    assert_eq!(session.sections(), two_sections().sections());
    assert_eq!(session.revision(), revision);
    assert!(session.has_fresh_artifacts());
}

#[tokio::test]
async fn test_section_edit_invalid_reply_is_atomic() {
    let client = Arc::new(
        ScriptedClient::new().reply(r#"{"section_title": "1. Entrega", "simplified_text": "x"}"#),
    );
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = simplified_session();

    let err = simplifier(&client, &renderer)
        .edit_section(&mut session, 0, "más formal")
        .await
        .unwrap_err();

    assert!(matches!(err, SimplifyError::Validation { detail, .. } if detail.contains("justification")));
    assert_eq!(session.sections(), two_sections().sections());
    assert_eq!(session.revision(), 1);
}

#[tokio::test]
async fn test_empty_instruction_rejected_before_call() {
    let client = Arc::new(ScriptedClient::new());
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer);
    let mut session = simplified_session();

    for request in [EditRequest::section(0, "   "), EditRequest::document("\n\t")] {
        let err = simplifier.apply(&mut session, &request).await.unwrap_err();
        assert_eq!(err, SimplifyError::EmptyInstruction);
    }
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_edits_require_a_document() {
    let client = Arc::new(ScriptedClient::new());
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer);
    let mut session = ContractSession::new("c.pdf", "texto");

    for request in [EditRequest::section(0, "x"), EditRequest::document("x")] {
        let err = simplifier.apply(&mut session, &request).await.unwrap_err();
        assert_eq!(err, SimplifyError::NoDocument);
    }
    assert_eq!(
        simplifier.regenerate_artifacts(&mut session).await,
        Err(SimplifyError::NoDocument)
    );
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_document_edit_replaces_all_sections() {
    let client = Arc::new(ScriptedClient::new().reply(document_json(&[
        ("1. Objeto", "a", "x"),
        ("2. Entrega", "b", "y"),
        ("3. Pago", "c", "z"),
    ])));
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = simplified_session();

    let outcome = simplifier(&client, &renderer)
        .apply(&mut session, &EditRequest::document("Divide en tres cláusulas"))
        .await
        .unwrap();

    assert_eq!(outcome.sections, 3);
    let titles: Vec<&str> = session.sections().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["1. Objeto", "2. Entrega", "3. Pago"]);
    assert_eq!(
        session.artifacts().map(|a| a.html.as_str()),
        Some("arriendo.docx|1. Objeto|2. Entrega|3. Pago")
    );

    let prompt = client.last_prompt().unwrap();
    assert!(prompt.contains("\"section_title\": \"1. Entrega\""));
    assert!(prompt.contains("\"section_title\": \"2. Pago\""));
}

#[tokio::test]
async fn test_document_edit_decode_failure_keeps_document() {
    let client = Arc::new(ScriptedClient::new().reply("{\"sections\": [ {\"section_title\": "));
    let renderer = Arc::new(CountingRenderer::default());
    let mut session = simplified_session();

    let err = simplifier(&client, &renderer)
        .edit_document(&mut session, "une todo")
        .await
        .unwrap_err();

    assert!(matches!(err, SimplifyError::Decode { .. }));
    assert!(err.raw_response().is_some());
    assert_eq!(session.sections(), two_sections().sections());
}

#[tokio::test]
async fn test_source_text_attached_only_when_needed() {
    let reply = document_json(&[("A", "B", "C")]);
    let client = Arc::new(ScriptedClient::new().reply(reply.clone()).reply(reply));
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer);
    let mut session = simplified_session();

    simplifier
        .edit_document(&mut session, "Hazlo más breve")
        .await
        .unwrap();
    assert!(!client.last_prompt().unwrap().contains("EL ARRENDADOR entregará"));

    simplifier
        .edit_document(&mut session, "Añade la cláusula penal que omitiste del original")
        .await
        .unwrap();
    assert!(client.last_prompt().unwrap().contains("EL ARRENDADOR entregará"));
}

#[tokio::test]
async fn test_source_context_policy_never() {
    let client = Arc::new(ScriptedClient::new().reply(document_json(&[("A", "B", "C")])));
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer).with_options(SimplifierOptions {
        source_context: SourceContextPolicy::Never,
        ..SimplifierOptions::default()
    });
    let mut session = simplified_session();

    simplifier
        .edit_document(&mut session, "Recupera lo que falta del original")
        .await
        .unwrap();
    assert!(!client.last_prompt().unwrap().contains("EL ARRENDADOR entregará"));
}

#[tokio::test]
async fn test_timeout_is_distinct_and_not_applied() {
    let client = Arc::new(
        ScriptedClient::with_delay(Duration::from_secs(5))
            .reply(section_json("late", "late", "late")),
    );
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer).with_options(SimplifierOptions {
        call_timeout: Some(Duration::from_millis(20)),
        ..SimplifierOptions::default()
    });
    let mut session = simplified_session();

    let err = simplifier
        .edit_section(&mut session, 0, "más breve")
        .await
        .unwrap_err();

    assert_eq!(err, SimplifyError::Service(ServiceError::Timeout(20)));
    assert!(err.is_timeout());
    assert_eq!(session.sections(), two_sections().sections());
}

#[tokio::test]
async fn test_render_failure_keeps_commit_and_hides_stale_artifacts() {
    let client = Arc::new(
        ScriptedClient::new().reply(section_json("1. Entrega", "Nuevo texto.", "Cambio.")),
    );
    let renderer = Arc::new(CountingRenderer::default());
    let simplifier = simplifier(&client, &renderer);
    let mut session = simplified_session();
    simplifier.regenerate_artifacts(&mut session).await.unwrap();
    assert!(session.has_fresh_artifacts());

    renderer.set_failing(true);
    let outcome = simplifier
        .edit_section(&mut session, 0, "cambia el texto")
        .await
        .unwrap();

    assert!(!outcome.artifacts_fresh());
    assert!(outcome.render_error.unwrap().contains("unknown font"));
    assert_eq!(session.sections()[0].body, "Nuevo texto.");
    assert!(session.artifacts().is_none());

    renderer.set_failing(false);
    let revision = simplifier.regenerate_artifacts(&mut session).await.unwrap();
    assert_eq!(revision, session.revision());
    assert_eq!(
        session.artifacts().map(|a| a.html.as_str()),
        Some("arriendo.docx|1. Entrega|2. Pago")
    );
}
