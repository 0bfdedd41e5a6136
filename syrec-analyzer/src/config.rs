//! Analyzer configuration, loaded once per invocation and threaded through
//! the builders as shared, immutable context.

use serde::{Deserialize, Serialize};
use syrec_ir::IntegerConstantTruncationMode;

fn default_bitwidth() -> u32 {
    32
}

/// The options a host (a CLI, a test, an editor plugin) may configure
/// before analyzing a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadProgramSettings {
    /// Applied to any variable declaration that omits its bit-width.
    pub default_bitwidth: u32,
    /// Applied when a constant must shrink to fit an operand bit-width.
    pub integer_constant_truncation_mode: IntegerConstantTruncationMode,
}

impl Default for ReadProgramSettings {
    fn default() -> Self {
        Self {
            default_bitwidth: default_bitwidth(),
            integer_constant_truncation_mode: IntegerConstantTruncationMode::default(),
        }
    }
}

impl ReadProgramSettings {
    /// Deserialize settings from a TOML document. Left generic over the
    /// concrete deserializer a host chooses; this crate stays agnostic
    /// about which format crate backs it.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let settings = ReadProgramSettings::default();
        assert_eq!(settings.default_bitwidth, 32);
        assert_eq!(
            settings.integer_constant_truncation_mode,
            IntegerConstantTruncationMode::Modulo
        );
    }

    #[test]
    fn partial_toml_fills_in_remaining_defaults() {
        let settings = ReadProgramSettings::from_toml_str("default_bitwidth = 8").unwrap();
        assert_eq!(settings.default_bitwidth, 8);
        assert_eq!(
            settings.integer_constant_truncation_mode,
            IntegerConstantTruncationMode::Modulo
        );
    }
}
