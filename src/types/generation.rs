//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Settings controlling text generation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_leaves_unset_fields_none() {
        let settings = GenerationSettings::builder().temperature(0.2).build();
        assert_eq!(settings.temperature, Some(0.2));
        assert!(settings.max_tokens.is_none());
        assert!(settings.stop_sequences.is_none());
    }

    #[test]
    fn maybe_setters_take_options() {
        let settings = GenerationSettings::builder()
            .maybe_temperature(None)
            .maybe_max_tokens(Some(256))
            .build();
        assert!(settings.temperature.is_none());
        assert_eq!(settings.max_tokens, Some(256));
    }
}
