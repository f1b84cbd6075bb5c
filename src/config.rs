use failure::Error;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Fail)]
#[fail(display = "invalid configuration: {}", reason)]
pub struct ConfigError {
    reason: String,
}

impl ConfigError {
    fn new(reason: String) -> ConfigError {
        ConfigError { reason }
    }
}

/// Base seeds for the nine logical random streams. Each stream decorrelates
/// one concern: arrival timing, group sizing, routing, the three service
/// times, and the three billing accruals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSeeds {
    pub arrival_interval: u64,
    pub group_size: u64,
    pub route_choice: u64,
    pub hot_food_service: u64,
    pub sandwich_service: u64,
    pub drinks_service: u64,
    pub hot_food_billing: u64,
    pub sandwich_billing: u64,
    pub drinks_billing: u64,
}

impl Default for StreamSeeds {
    fn default() -> StreamSeeds {
        StreamSeeds {
            arrival_interval: 100,
            group_size: 200,
            route_choice: 300,
            hot_food_service: 400,
            sandwich_service: 500,
            drinks_service: 600,
            hot_food_billing: 700,
            sandwich_billing: 800,
            drinks_billing: 900,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation horizon in seconds of simulated time.
    pub horizon: f64,
    /// Mean of the exponential inter-arrival gap between customer groups.
    pub mean_arrival_interval: f64,
    pub hot_food_employees: u32,
    pub sandwich_employees: u32,
    /// Number of cashier lanes, each a single-capacity FIFO queue.
    pub cashier_lanes: u32,
    pub seeds: StreamSeeds,
}

impl Default for SimulationConfig {
    fn default() -> SimulationConfig {
        SimulationConfig {
            horizon: 5400.0,
            mean_arrival_interval: 30.0,
            hot_food_employees: 1,
            sandwich_employees: 1,
            cashier_lanes: 2,
            seeds: StreamSeeds::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, Error> {
        let file = File::open(path)?;

        let config: SimulationConfig = serde_json::from_reader(file)?;

        config.validate()?;

        Ok(config)
    }

    /// A run must not start from an invalid configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(ConfigError::new(format!(
                "horizon must be a positive duration, got {}",
                self.horizon
            ))
            .into());
        }

        if !self.mean_arrival_interval.is_finite() || self.mean_arrival_interval <= 0.0 {
            return Err(ConfigError::new(format!(
                "mean arrival interval must be positive, got {}",
                self.mean_arrival_interval
            ))
            .into());
        }

        if self.hot_food_employees == 0 {
            return Err(
                ConfigError::new("hot-food station needs at least one employee".into()).into(),
            );
        }

        if self.sandwich_employees == 0 {
            return Err(
                ConfigError::new("sandwich station needs at least one employee".into()).into(),
            );
        }

        if self.cashier_lanes == 0 {
            return Err(ConfigError::new("there must be at least one cashier lane".into()).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SimulationConfig;

    #[test]
    fn default_configuration_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_horizon() {
        let mut config = SimulationConfig::default();
        config.horizon = 0.0;

        assert!(config.validate().is_err());

        config.horizon = -5.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_counts() {
        let mut config = SimulationConfig::default();
        config.cashier_lanes = 0;

        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.hot_food_employees = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "horizon": 600.0, "cashier_lanes": 3 }"#).unwrap();

        assert_eq!(config.horizon, 600.0);
        assert_eq!(config.cashier_lanes, 3);
        assert_eq!(config.mean_arrival_interval, 30.0);
        assert_eq!(config.seeds.route_choice, 300);
    }
}
