use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::planner::{CategoryLimits, FoodClassifier, OptimizerConfig, TargetConfig};

/// Every tunable table of the planner. Each section falls back to its
/// built-in defaults when absent from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub targets: TargetConfig,
    pub optimizer: OptimizerConfig,
    pub limits: CategoryLimits,
    pub classifier: FoodClassifier,
}

impl PlannerConfig {
    /// Read and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!(path = %path.display(), "loaded planner config");
        Ok(config)
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.targets.validate()?;
        self.optimizer.validate()?;
        self.limits.validate(self.optimizer.min_grams)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;
    use crate::planner::PortionCategory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let json = r#"{
            "optimizer": {"max_iterations": 40},
            "limits": {"caps": {"oil": 20}}
        }"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = PlannerConfig::load(file.path()).unwrap();
        assert_eq!(config.optimizer.max_iterations, 40);
        assert_eq!(config.optimizer.min_grams, 10.0);
        assert_eq!(config.limits.cap_for(PortionCategory::Oil, MealType::Lunch), 20.0);
        // caps replaced wholesale: unlisted categories use the default cap
        assert_eq!(
            config.limits.cap_for(PortionCategory::Nuts, MealType::Lunch),
            config.limits.default_cap
        );
        assert_eq!(config.targets.daily_deficit_kcal, 1000.0);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let json = r#"{"optimizer": {"min_grams": 20}, "limits": {"caps": {"oil": 15}}}"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        assert!(PlannerConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_path_gives_defaults() {
        let config = PlannerConfig::load_or_default(None::<&str>).unwrap();
        assert_eq!(config.optimizer.max_foods, 5);
    }
}
