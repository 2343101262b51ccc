//! Experiment Comparison Example
//!
//! Builds a baseline vs. two alternatives comparison, ranks repetitions by
//! an evaluator score and walks through the selection operations.
//!
//! Run with: RUST_LOG=debug cargo run --example compare_session
//!
//! Optionally pass a JSON config path as the first argument.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trueno_compare::config::ComparisonConfig;
use trueno_compare::experiment::{
    AnnotationRecord, ExperimentCatalog, ExperimentRecord, ReferenceOutput, RunRecord,
};
use trueno_compare::session::ComparisonSession;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Trueno-Compare Experiment Comparison ===\n");

    // -------------------------------------------------------------------------
    // 1. Load the catalog (normally supplied by the data-fetching layer)
    // -------------------------------------------------------------------------
    println!("1. Loading catalog...");
    let catalog = demo_catalog()?;
    println!("   Experiments: {}", catalog.experiment_count());
    println!("   Completed runs: {}", catalog.run_count());
    println!("   Annotations: {:?}", catalog.annotation_names());

    // -------------------------------------------------------------------------
    // 2. Configure the session
    // -------------------------------------------------------------------------
    println!("\n2. Configuring session...");
    let config = match std::env::args().nth(1) {
        Some(path) => ComparisonConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => ComparisonConfig::from_json_str(
            r#"{
                "baseline_id": "prompt-v1",
                "comparison_ids": ["prompt-v2", "prompt-v3"],
                "sort_annotation": "correctness",
                "sort_direction": "desc"
            }"#,
        )?,
    };
    println!("   {}", serde_json::to_string(&config)?);

    let mut session = ComparisonSession::builder(config.baseline_id.clone())
        .config(config)
        .reference_output(ReferenceOutput::new(serde_json::json!({"answer": "Paris"})))
        .trace_dialog(|trace_id: &str, project_id: &str, title: &str| {
            info!(trace_id, project_id, title, "open trace requested");
        })
        .build(catalog)
        .context("failed to start comparison session")?;
    info!(grouping = ?session.grouping_mode(), "session ready");

    // -------------------------------------------------------------------------
    // 3. Ranked view
    // -------------------------------------------------------------------------
    println!("\n3. Ranked by {:?} ({})", session.sort_annotation(), session.sort_direction());
    print_groups(&session);

    session.toggle_sort_direction();
    println!("\n   Direction toggled ({})", session.sort_direction());
    print_groups(&session);

    // -------------------------------------------------------------------------
    // 4. Selection
    // -------------------------------------------------------------------------
    println!("\n4. Hiding prompt-v3 and repetition 2 of the baseline...");
    session.set_experiment_selection("prompt-v3", false);
    session.set_repetition_selection("prompt-v1", 2, false);
    println!("   prompt-v1 all selected: {}", session.all_selected_for("prompt-v1"));
    println!("   prompt-v1 some selected: {}", session.some_selected_for("prompt-v1"));
    println!("   Visible groups: {}", session.selected_groups().len());

    println!("\n   Deselecting everything...");
    session.set_all_selection(false);
    println!("   No runs selected: {}", session.no_runs_selected());

    // -------------------------------------------------------------------------
    // 5. Trace pass-through and snapshot
    // -------------------------------------------------------------------------
    session.open_trace_dialog("trace-prompt-v1-1", "demo-project", "Experiment Run Trace");
    println!("\n5. Snapshot (version {}):", session.version());
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);

    Ok(())
}

fn demo_catalog() -> Result<ExperimentCatalog> {
    let scores: [(&str, [(f64, &str); 3]); 3] = [
        ("prompt-v1", [(1.0, "correct"), (0.0, "incorrect"), (1.0, "correct")]),
        ("prompt-v2", [(1.0, "correct"), (1.0, "correct"), (0.5, "partial")]),
        ("prompt-v3", [(0.0, "incorrect"), (0.5, "partial"), (0.0, "incorrect")]),
    ];

    let mut catalog = ExperimentCatalog::new();
    for (id, runs) in scores {
        catalog.add_experiment(ExperimentRecord::builder(id, 3).name(format!("{id} (gpt-4o-mini)")).build());
        for ((score, label), number) in runs.into_iter().zip(1..) {
            let run = RunRecord::builder(format!("{id}-run-{number}"), number)
                .output(serde_json::json!({"answer": if score > 0.0 { "Paris" } else { "Lyon" }}))
                .trace_id(format!("trace-{id}-{number}"))
                .annotation(AnnotationRecord::scored("correctness", score).with_label(label))
                .build();
            catalog.add_run(id, run)?;
        }
    }
    Ok(catalog)
}

fn print_groups(session: &ComparisonSession) {
    for group in session.composed_groups() {
        let cells: Vec<String> = group
            .repetitions()
            .iter()
            .map(|repetition| {
                let score = repetition
                    .annotation("correctness")
                    .and_then(AnnotationRecord::score)
                    .map_or_else(|| "-".to_string(), |score| format!("{score:.1}"));
                format!("#{} {score}", repetition.repetition_number())
            })
            .collect();
        println!("   {:<10} {}", group.experiment_id(), cells.join("  "));
    }
}
