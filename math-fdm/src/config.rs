//! JSON configuration for Poisson runs

use crate::error::{FdmError, Result};
use serde::{Deserialize, Serialize};
use solvers::{CgConfig, RealField};
use std::fs;
use std::path::Path;

/// Complete run configuration loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoissonConfig {
    /// Grid resolution
    #[serde(default)]
    pub grid: GridConfig,
    /// CG settings
    #[serde(default)]
    pub solver: SolverSettings,
    /// Frame output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Grid resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Interior points per axis
    #[serde(default = "default_n")]
    pub n: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { n: default_n() }
    }
}

fn default_n() -> usize {
    500
}

/// Conjugate Gradient settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Absolute tolerance on the norm of the search direction
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Log progress every N iterations (0 = silent)
    #[serde(default)]
    pub print_interval: usize,
    /// Verbosity level (0 = quiet, 1 = summary)
    #[serde(default)]
    pub verbosity: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            print_interval: 0,
            verbosity: 0,
        }
    }
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    2000
}

impl SolverSettings {
    /// CG configuration in the working precision
    pub fn cg_config<T: RealField>(&self) -> CgConfig<T> {
        CgConfig {
            max_iterations: self.max_iterations,
            tolerance: T::from_f64_lossy(self.tolerance),
            print_interval: self.print_interval,
        }
    }
}

/// Frame output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory/tag for frame files; no output when absent
    #[serde(default)]
    pub tag: Option<String>,
    /// Index of the first frame written
    #[serde(default)]
    pub frame: usize,
}

impl PoissonConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.grid.n == 0 {
            return Err(FdmError::InvalidConfig(
                "grid.n must be at least 1".to_string(),
            ));
        }
        if self.solver.tolerance.is_nan() || self.solver.tolerance < 0.0 {
            return Err(FdmError::InvalidConfig(format!(
                "solver.tolerance must be >= 0, got {}",
                self.solver.tolerance
            )));
        }
        if let Some(tag) = &self.output.tag {
            if tag.is_empty() || tag.contains(['/', '\\']) {
                return Err(FdmError::InvalidConfig(format!(
                    "output.tag must be a plain directory name, got {tag:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = PoissonConfig::default();
        assert_eq!(config.grid.n, 500);
        assert_eq!(config.solver.tolerance, 1e-6);
        assert_eq!(config.solver.max_iterations, 2000);
        assert!(config.output.tag.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = PoissonConfig::from_json_str(r#"{ "grid": { "n": 64 } }"#).unwrap();
        assert_eq!(config.grid.n, 64);
        assert_eq!(config.solver, SolverSettings::default());

        let config =
            PoissonConfig::from_json_str(r#"{ "solver": { "tolerance": 1e-9 } }"#).unwrap();
        assert_eq!(config.grid.n, 500);
        assert_eq!(config.solver.tolerance, 1e-9);
        assert_eq!(config.solver.max_iterations, 2000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = PoissonConfig::from_json_str(r#"{ "grid": { "n": 0 } }"#).unwrap_err();
        assert!(err.is_config_error());

        let err =
            PoissonConfig::from_json_str(r#"{ "solver": { "tolerance": -1.0 } }"#).unwrap_err();
        assert!(err.is_config_error());

        let err =
            PoissonConfig::from_json_str(r#"{ "output": { "tag": "../x" } }"#).unwrap_err();
        assert!(err.is_config_error());

        let err = PoissonConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FdmError::Config(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut config = PoissonConfig::default();
        config.grid.n = 33;
        config.output.tag = Some("cg".to_string());

        config.to_file(&path).unwrap();
        assert_eq!(PoissonConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_cg_config_in_single_precision() {
        let settings = SolverSettings {
            tolerance: 1e-4,
            max_iterations: 10,
            print_interval: 2,
            verbosity: 0,
        };
        let cg: CgConfig<f32> = settings.cg_config();
        assert_eq!(cg.max_iterations, 10);
        assert!((cg.tolerance - 1e-4).abs() < 1e-10);
        assert_eq!(cg.print_interval, 2);
    }
}
