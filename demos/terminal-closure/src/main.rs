//! Demo: a terminal case closure crossing the compliance bridge.
//!
//! Walks the full gateway contract:
//!
//! 1. A plain audit event for a non-terminal update
//! 2. A terminal closure: evidence pack built and processed, artifacts
//!    digested, seal issued, cross-linked audit event emitted
//! 3. Seal re-verification
//! 4. Fail-closed rejections: non-terminal action, nil org id
//!
//! Invariants demonstrated:
//! - no sealed evidence, no committed terminal transition
//! - `audit_event.metadata["seal_digest"]` equals the seal's pack digest
//! - doomed requests never reach the evidence or sealing collaborators

use std::sync::Arc;

use colored::Colorize;
use sealgate::{
    Artifact, ComplianceBridge, EmitAuditRequest, EvidenceRequest, NotificationRequest,
    SimulatedDispatcher, SimulatedEvidencePipeline, SimulatedSealingService, TERMINAL_ACTIONS,
};

const ORG: &str = "3f1c9a2e-8d4b-4c6f-9e21-7b5a0d8c4f13";

fn header(title: &str) {
    println!();
    println!("{}", "═".repeat(72).cyan());
    println!("  {}", title.cyan().bold());
    println!("{}", "═".repeat(72).cyan());
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let pipeline = Arc::new(SimulatedEvidencePipeline::new());
    let sealer = Arc::new(SimulatedSealingService::new());
    let dispatcher = Arc::new(SimulatedDispatcher::new());
    let bridge = ComplianceBridge::new(pipeline.clone(), sealer.clone(), dispatcher.clone());

    header("Terminal actions requiring sealed evidence");
    for action in TERMINAL_ACTIONS {
        println!("  - {}", action.as_str().yellow());
    }

    header("1. Plain audit: non-terminal case update");
    let event = bridge
        .emit_audit(EmitAuditRequest {
            action: "case_updated".into(),
            org_id: ORG.into(),
            actor_id: "clerk-12".into(),
            correlation_id: "corr-0001".into(),
            entity_type: "case".into(),
            entity_id: "case-42".into(),
            from_state: Some("open".into()),
            to_state: Some("open".into()),
            ..Default::default()
        })
        .expect("valid audit request");
    println!("  audit event {} ({})", event.id, event.action.to_string().green());

    header("2. Terminal closure: evidence sealed before commitment");
    let record = bridge
        .trigger_evidence(EvidenceRequest {
            action: "case_closed".into(),
            org_id: ORG.into(),
            actor_id: "registrar-3".into(),
            correlation_id: "corr-0002".into(),
            entity_type: "case".into(),
            entity_id: "case-42".into(),
            from_state: Some("open".into()),
            to_state: Some("closed".into()),
            artifacts: vec![
                Artifact {
                    name: "closure-report.pdf".into(),
                    content: b"final closure report".to_vec(),
                },
                Artifact {
                    name: "decision-notice.pdf".into(),
                    content: b"notice of final decision".to_vec(),
                },
            ],
            summary: Some("case closed after final decision".into()),
        })
        .await
        .expect("terminal closure seals");

    println!("  evidence pack  {}", record.evidence_pack.pack_id.green());
    println!("  seal digest    {}", record.seal.pack_digest.green());
    println!(
        "  audit metadata seal_digest = {}",
        record.audit_event.metadata["seal_digest"]
    );
    let cross_linked =
        record.audit_event.metadata["seal_digest"].as_str() == Some(record.seal.pack_digest.as_str());
    println!(
        "  cross-link invariant: {}",
        if cross_linked { "HOLDS".green().bold() } else { "BROKEN".red().bold() }
    );

    header("3. Seal re-verification");
    let verification = bridge.verify_seal(&record.seal).await.expect("sealer reachable");
    println!(
        "  seal valid: {}",
        if verification.valid { "yes".green() } else { "no".red() }
    );

    header("4. Fail-closed rejections");
    let err = bridge
        .trigger_evidence(EvidenceRequest {
            action: "case_updated".into(),
            org_id: ORG.into(),
            actor_id: "clerk-12".into(),
            correlation_id: "corr-0003".into(),
            entity_type: "case".into(),
            entity_id: "case-42".into(),
            ..Default::default()
        })
        .await
        .expect_err("non-terminal action must be rejected");
    println!("  non-terminal: {}", err.to_string().red());

    let err = bridge
        .trigger_evidence(EvidenceRequest {
            action: "case_closed".into(),
            org_id: "00000000-0000-0000-0000-000000000000".into(),
            actor_id: "clerk-12".into(),
            correlation_id: "corr-0004".into(),
            entity_type: "case".into(),
            entity_id: "case-42".into(),
            ..Default::default()
        })
        .await
        .expect_err("nil org must be rejected");
    println!("  nil org:      {}", err.to_string().red());
    println!(
        "  packs processed: {} (doomed requests never reached the pipeline)",
        pipeline.processed().len()
    );

    header("5. Side-effect notification (outside the sealing invariant)");
    bridge
        .dispatch_notification(NotificationRequest {
            channel: "Compliance-Ops".into(),
            subject: "case-42 closed with sealed evidence".into(),
            body: format!("pack {} sealed", record.evidence_pack.pack_id),
        })
        .await
        .expect("dispatcher reachable");
    println!("  dispatched {} notification(s)", dispatcher.sent().len());
}
