use std::path::PathBuf;

use coin_coref::{
    training::{TrainerInvocation, TrainingConfig},
    CorefError,
};

fn config() -> TrainingConfig {
    TrainingConfig {
        train_data_path: PathBuf::from("data/train.jsonl"),
        dev_data_path: PathBuf::from("data/dev.jsonl"),
        ..TrainingConfig::default()
    }
}

fn rejected_field(config: &TrainingConfig) -> &'static str {
    match config.validate() {
        Err(CorefError::InvalidConfig { field, .. }) => field,
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[test]
fn defaults_validate() {
    config().validate().unwrap();
}

#[test]
fn missing_training_split_is_rejected() {
    assert_eq!(rejected_field(&TrainingConfig::default()), "train_data_path");
}

#[test]
fn out_of_range_values_are_rejected() {
    let mut c = config();
    c.spans.spans_per_word = 1.5;
    assert_eq!(rejected_field(&c), "spans_per_word");

    let mut c = config();
    c.spans.inference_order = 0;
    assert_eq!(rejected_field(&c), "inference_order");

    let mut c = config();
    c.ffnn.dropout = 1.0;
    assert_eq!(rejected_field(&c), "ffnn_dropout");

    let mut c = config();
    c.optimizer.transformer_learning_rate = 0.0;
    assert_eq!(rejected_field(&c), "transformer_learning_rate");

    let mut c = config();
    c.optimizer.validation_metric = "coref_f1".to_string();
    assert_eq!(rejected_field(&c), "validation_metric");
}

#[test]
fn pass_through_context_keeps_encoder_width() {
    let c = config();
    let rendered = c.to_json();
    assert_eq!(rendered["model"]["context_layer"]["type"], "pass_through");
    assert_eq!(c.span_embedding_dim(), 3 * 768 + 20);
    assert_eq!(
        rendered["model"]["mention_feedforward"]["input_dim"],
        3 * 768 + 20
    );
    assert_eq!(
        rendered["model"]["antecedent_feedforward"]["input_dim"],
        3 * (3 * 768 + 20) + 20
    );
    assert_eq!(
        rendered["model"]["text_field_embedder"]["token_embedders"]["tokens"]["train_parameters"],
        true
    );
    assert!(rendered.get("test_data_path").is_none());
}

#[test]
fn lstm_context_changes_span_width() {
    let mut c = config();
    c.contextualize_embeddings = true;
    c.encoder.freeze = true;
    c.test_data_path = Some(PathBuf::from("data/test.jsonl"));
    let rendered = c.to_json();
    assert_eq!(rendered["model"]["context_layer"]["type"], "lstm");
    assert_eq!(c.span_embedding_dim(), 2 * 400 + 20 + 768);
    assert_eq!(
        rendered["model"]["text_field_embedder"]["token_embedders"]["tokens"]["train_parameters"],
        false
    );
    assert_eq!(rendered["test_data_path"], "data/test.jsonl");
    assert_eq!(rendered["evaluate_on_test"], true);
}

#[test]
fn invocation_writes_config_and_builds_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let invocation = TrainerInvocation {
        bin: "allennlp".to_string(),
        package: "id.coref.training".to_string(),
        serialization_dir: dir.path().join("run"),
    };
    let path = invocation.write_config(&config()).unwrap();
    assert!(path.exists());

    let args = invocation.train_args();
    assert_eq!(args[0], "train");
    assert_eq!(args[2], "-s");
    assert_eq!(args.last().map(String::as_str), Some("id.coref.training"));
    assert!(invocation.model_archive().ends_with("run/model.tar.gz"));
}

#[tokio::test]
async fn test_split_is_scored_by_the_single_train_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let calls = dir.path().join("calls.log");
    let script = dir.path().join("trainer.sh");
    std::fs::write(
        &script,
        format!("#!/bin/sh\necho \"$1\" >> {}\n", calls.display()),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let invocation = TrainerInvocation {
        bin: script.display().to_string(),
        package: "id.coref.training".to_string(),
        serialization_dir: dir.path().join("run"),
    };
    let config = TrainingConfig {
        test_data_path: Some(PathBuf::from("data/test.jsonl")),
        ..config()
    };
    invocation.run(&config).await.unwrap();

    assert_eq!(std::fs::read_to_string(&calls).unwrap(), "train\n");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(invocation.config_path()).unwrap())
            .unwrap();
    assert_eq!(written["evaluate_on_test"], true);
}

#[tokio::test]
async fn failing_trainer_reports_stage() {
    let dir = tempfile::tempdir().unwrap();
    let invocation = TrainerInvocation {
        bin: "false".to_string(),
        package: "id.coref.training".to_string(),
        serialization_dir: dir.path().join("run"),
    };
    match invocation.run(&config()).await {
        Err(CorefError::Trainer { stage, .. }) => assert_eq!(stage, "train"),
        other => panic!("expected trainer failure, got {other:?}"),
    }
}
