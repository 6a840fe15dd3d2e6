//! Typed view of the coarse-to-fine coreference trainer configuration.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    config::{env_flag, env_or, Settings},
    error::{CorefError, Result},
};

/// Pretrained transformer encoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncoderConfig {
    pub model_name: String,
    pub embedding_dim: usize,
    pub max_segment_length: usize,
    /// Disable gradient updates to the encoder.
    pub freeze: bool,
}

/// Candidate span enumeration and antecedent search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanConfig {
    pub max_span_width: usize,
    pub feature_size: usize,
    pub spans_per_word: f64,
    pub max_antecedents: usize,
    pub coarse_to_fine: bool,
    pub inference_order: usize,
}

/// Shape shared by the mention and antecedent scorers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedForwardConfig {
    pub layers: usize,
    pub hidden_dim: usize,
    pub dropout: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizerConfig {
    /// Learning rate of the task parameters.
    pub learning_rate: f64,
    /// Learning rate of the transformer parameters.
    pub transformer_learning_rate: f64,
    /// Warm-up fraction of the slanted triangular schedule.
    pub cut_frac: f64,
    pub num_epochs: usize,
    pub patience: usize,
    pub validation_metric: String,
    pub batch_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingConfig {
    pub encoder: EncoderConfig,
    /// Use a bidirectional LSTM over the encoder output instead of a
    /// pass-through.
    pub contextualize_embeddings: bool,
    pub lstm_hidden_size: usize,
    pub spans: SpanConfig,
    pub ffnn: FeedForwardConfig,
    pub optimizer: OptimizerConfig,
    pub train_data_path: PathBuf,
    pub dev_data_path: PathBuf,
    /// Evaluated after training when present.
    pub test_data_path: Option<PathBuf>,
    pub cuda_device: i32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderConfig {
                model_name: "indolem/indobert-base-uncased".to_string(),
                embedding_dim: 768,
                max_segment_length: 512,
                freeze: false,
            },
            contextualize_embeddings: false,
            lstm_hidden_size: 200,
            spans: SpanConfig {
                max_span_width: 30,
                feature_size: 20,
                spans_per_word: 0.4,
                max_antecedents: 50,
                coarse_to_fine: true,
                inference_order: 2,
            },
            ffnn: FeedForwardConfig {
                layers: 2,
                hidden_dim: 1500,
                dropout: 0.3,
            },
            optimizer: OptimizerConfig {
                learning_rate: 3e-4,
                transformer_learning_rate: 1e-5,
                cut_frac: 0.06,
                num_epochs: 40,
                patience: 10,
                validation_metric: "+coref_f1".to_string(),
                batch_size: 1,
            },
            train_data_path: PathBuf::new(),
            dev_data_path: PathBuf::new(),
            test_data_path: None,
            cuda_device: -1,
        }
    }
}

impl TrainingConfig {
    /// Defaults overlaid with the settings and hyperparameter env overrides.
    pub fn from_settings(settings: &Settings) -> Self {
        let base = Self::default();
        Self {
            encoder: EncoderConfig {
                model_name: settings.transformer_model.clone(),
                embedding_dim: env_or("EMBEDDING_DIM", base.encoder.embedding_dim),
                max_segment_length: env_or("MAX_SEGMENT_LENGTH", base.encoder.max_segment_length),
                freeze: env_flag("FREEZE_TRANSFORMER", base.encoder.freeze),
            },
            contextualize_embeddings: env_flag(
                "CONTEXTUALIZE_EMBEDDINGS",
                base.contextualize_embeddings,
            ),
            spans: SpanConfig {
                max_span_width: env_or("MAX_SPAN_WIDTH", base.spans.max_span_width),
                inference_order: env_or("INFERENCE_ORDER", base.spans.inference_order),
                ..base.spans
            },
            optimizer: OptimizerConfig {
                learning_rate: env_or("LEARNING_RATE", base.optimizer.learning_rate),
                transformer_learning_rate: env_or(
                    "TRANSFORMER_LEARNING_RATE",
                    base.optimizer.transformer_learning_rate,
                ),
                num_epochs: env_or("NUM_EPOCHS", base.optimizer.num_epochs),
                patience: env_or("PATIENCE", base.optimizer.patience),
                ..base.optimizer
            },
            train_data_path: settings.train_data_path.clone(),
            dev_data_path: settings.dev_data_path.clone(),
            test_data_path: Some(settings.test_data_path.clone())
                .filter(|path| path.exists()),
            cuda_device: settings.cuda_device,
            ..base
        }
    }

    /// Width of the sequence fed to the span extractors.
    pub fn context_dim(&self) -> usize {
        if self.contextualize_embeddings {
            2 * self.lstm_hidden_size
        } else {
            self.encoder.embedding_dim
        }
    }

    /// Endpoint pair, width feature and attended encoder embedding.
    pub fn span_embedding_dim(&self) -> usize {
        2 * self.context_dim() + self.spans.feature_size + self.encoder.embedding_dim
    }

    /// Target, antecedent, their product, and the distance feature.
    pub fn antecedent_input_dim(&self) -> usize {
        3 * self.span_embedding_dim() + self.spans.feature_size
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("embedding_dim", self.encoder.embedding_dim),
            ("max_segment_length", self.encoder.max_segment_length),
            ("max_span_width", self.spans.max_span_width),
            ("feature_size", self.spans.feature_size),
            ("max_antecedents", self.spans.max_antecedents),
            ("inference_order", self.spans.inference_order),
            ("ffnn_layers", self.ffnn.layers),
            ("ffnn_hidden_dim", self.ffnn.hidden_dim),
            ("num_epochs", self.optimizer.num_epochs),
            ("batch_size", self.optimizer.batch_size),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(CorefError::invalid_config(field, "must be at least 1"));
            }
        }
        if self.contextualize_embeddings && self.lstm_hidden_size == 0 {
            return Err(CorefError::invalid_config(
                "lstm_hidden_size",
                "must be at least 1 when contextualizing",
            ));
        }
        if !(self.spans.spans_per_word > 0.0 && self.spans.spans_per_word <= 1.0) {
            return Err(CorefError::invalid_config(
                "spans_per_word",
                format!("{} is outside (0, 1]", self.spans.spans_per_word),
            ));
        }
        if !(0.0..1.0).contains(&self.ffnn.dropout) {
            return Err(CorefError::invalid_config(
                "ffnn_dropout",
                format!("{} is outside [0, 1)", self.ffnn.dropout),
            ));
        }
        let rates = [
            ("learning_rate", self.optimizer.learning_rate),
            (
                "transformer_learning_rate",
                self.optimizer.transformer_learning_rate,
            ),
        ];
        for (field, value) in rates {
            if !(value > 0.0) {
                return Err(CorefError::invalid_config(field, "must be positive"));
            }
        }
        if !(0.0..1.0).contains(&self.optimizer.cut_frac) {
            return Err(CorefError::invalid_config("cut_frac", "must be in [0, 1)"));
        }
        let metric = &self.optimizer.validation_metric;
        if metric.len() < 2 || !(metric.starts_with('+') || metric.starts_with('-')) {
            return Err(CorefError::invalid_config(
                "validation_metric",
                format!("`{metric}` needs a + or - direction prefix"),
            ));
        }
        if self.train_data_path.as_os_str().is_empty() {
            return Err(CorefError::invalid_config("train_data_path", "is not set"));
        }
        if self.dev_data_path.as_os_str().is_empty() {
            return Err(CorefError::invalid_config("dev_data_path", "is not set"));
        }
        Ok(())
    }

    /// Render the trainer's JSON configuration document.
    pub fn to_json(&self) -> Value {
        let encoder = &self.encoder;
        let train_parameters = !encoder.freeze;
        let context_layer = if self.contextualize_embeddings {
            json!({
                "type": "lstm",
                "bidirectional": true,
                "input_size": encoder.embedding_dim,
                "hidden_size": self.lstm_hidden_size,
                "num_layers": 1,
            })
        } else {
            json!({
                "type": "pass_through",
                "input_dim": encoder.embedding_dim,
            })
        };
        let feedforward = |input_dim: usize| {
            json!({
                "input_dim": input_dim,
                "num_layers": self.ffnn.layers,
                "hidden_dims": self.ffnn.hidden_dim,
                "activations": "relu",
                "dropout": self.ffnn.dropout,
            })
        };

        let mut config = json!({
            "dataset_reader": {
                "type": "coref-id",
                "token_indexers": {
                    "tokens": {
                        "type": "pretrained_transformer_mismatched",
                        "model_name": encoder.model_name,
                        "max_length": encoder.max_segment_length,
                    }
                },
                "max_span_width": self.spans.max_span_width,
            },
            "train_data_path": self.train_data_path.display().to_string(),
            "validation_data_path": self.dev_data_path.display().to_string(),
            "model": {
                "type": "coref",
                "text_field_embedder": {
                    "token_embedders": {
                        "tokens": {
                            "type": "pretrained_transformer_mismatched",
                            "model_name": encoder.model_name,
                            "max_length": encoder.max_segment_length,
                            "train_parameters": train_parameters,
                        }
                    }
                },
                "context_layer": context_layer,
                "mention_feedforward": feedforward(self.span_embedding_dim()),
                "antecedent_feedforward": feedforward(self.antecedent_input_dim()),
                "initializer": {
                    "regexes": [
                        [".*_span_updating_gated_sum.*weight", {"type": "xavier_normal"}],
                        [".*linear_layers.*weight", {"type": "xavier_normal"}],
                        [".*scorer.*weight", {"type": "xavier_normal"}],
                        ["_distance_embedding.weight", {"type": "xavier_normal"}],
                        ["_span_width_embedding.weight", {"type": "xavier_normal"}],
                        ["_context_layer._module.weight_ih.*", {"type": "xavier_normal"}],
                        ["_context_layer._module.weight_hh.*", {"type": "orthogonal"}],
                    ]
                },
                "feature_size": self.spans.feature_size,
                "max_span_width": self.spans.max_span_width,
                "spans_per_word": self.spans.spans_per_word,
                "max_antecedents": self.spans.max_antecedents,
                "coarse_to_fine": self.spans.coarse_to_fine,
                "inference_order": self.spans.inference_order,
            },
            "data_loader": {
                "batch_sampler": {
                    "type": "bucket",
                    "sorting_keys": ["text"],
                    "batch_size": self.optimizer.batch_size,
                }
            },
            "trainer": {
                "num_epochs": self.optimizer.num_epochs,
                "patience": self.optimizer.patience,
                "cuda_device": self.cuda_device,
                "validation_metric": self.optimizer.validation_metric,
                "learning_rate_scheduler": {
                    "type": "slanted_triangular",
                    "cut_frac": self.optimizer.cut_frac,
                },
                "optimizer": {
                    "type": "huggingface_adamw",
                    "lr": self.optimizer.learning_rate,
                    "parameter_groups": [
                        [[".*transformer.*"], {"lr": self.optimizer.transformer_learning_rate}]
                    ],
                },
            },
        });

        if let (Some(test), Some(root)) = (&self.test_data_path, config.as_object_mut()) {
            root.insert(
                "test_data_path".to_string(),
                Value::String(test.display().to_string()),
            );
            root.insert("evaluate_on_test".to_string(), Value::Bool(true));
        }
        config
    }
}
