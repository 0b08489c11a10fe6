use std::env;
use std::fmt;

use chrono::NaiveDate;

use crate::workflows::admission::{Department, DepartmentId};

/// Seat plan seeded when no environment override is present, matching the
/// departments the admissions office opens by default.
const DEFAULT_SEAT_PLAN: &[(&str, u32)] = &[("CS", 300), ("Mechanical", 100), ("Civil", 100)];

/// Top-level configuration for an admission cycle.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Departments open this cycle with their fixed seat capacities,
    /// immutable during a single allocation run.
    pub seat_plan: Vec<Department>,
    /// Date ages are computed against, so ranking runs are reproducible.
    pub reference_date: NaiveDate,
    pub telemetry: TelemetryConfig,
}

impl AdmissionConfig {
    /// Load from the environment, falling back to the default seat plan and
    /// today's date.
    ///
    /// `ADMISSION_SEAT_PLAN` uses `Name=seats` entries separated by commas,
    /// e.g. `CS=300,Mechanical=100,Civil=100`; `ADMISSION_REFERENCE_DATE`
    /// is `YYYY-MM-DD`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let seat_plan = match env::var("ADMISSION_SEAT_PLAN") {
            Ok(raw) => parse_seat_plan(&raw)?,
            Err(_) => default_seat_plan(),
        };

        let reference_date = match env::var("ADMISSION_REFERENCE_DATE") {
            Ok(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidReferenceDate { value: raw })?,
            Err(_) => chrono::Utc::now().date_naive(),
        };

        let log_level = env::var("ADMISSION_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            seat_plan,
            reference_date,
            telemetry: TelemetryConfig { log_level },
        })
    }

    /// Configuration for a single in-process run with an explicit seat plan
    /// and reference date; used by embedding code and tests.
    pub fn for_run(seat_plan: Vec<Department>, reference_date: NaiveDate) -> Self {
        Self {
            seat_plan,
            reference_date,
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

fn default_seat_plan() -> Vec<Department> {
    DEFAULT_SEAT_PLAN
        .iter()
        .map(|(name, capacity)| Department {
            id: DepartmentId::new(*name),
            capacity: *capacity,
        })
        .collect()
}

fn parse_seat_plan(raw: &str) -> Result<Vec<Department>, ConfigError> {
    let mut plan = Vec::new();

    for entry in raw.split(',') {
        let entry = entry.trim();
        let (name, seats) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidSeatPlan {
            entry: entry.to_string(),
        })?;

        let name = name.trim();
        let seats: i64 = seats
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidSeatPlan {
                entry: entry.to_string(),
            })?;

        if name.is_empty() {
            return Err(ConfigError::InvalidSeatPlan {
                entry: entry.to_string(),
            });
        }
        if seats < 0 {
            return Err(ConfigError::InvalidCapacity {
                department: name.to_string(),
                found: seats,
            });
        }

        plan.push(Department {
            id: DepartmentId::new(name),
            capacity: seats as u32,
        });
    }

    if plan.is_empty() {
        return Err(ConfigError::InvalidSeatPlan {
            entry: raw.to_string(),
        });
    }

    Ok(plan)
}

/// Tracing controls for embedding binaries.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSeatPlan { entry: String },
    InvalidCapacity { department: String, found: i64 },
    InvalidReferenceDate { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeatPlan { entry } => {
                write!(f, "ADMISSION_SEAT_PLAN entry '{entry}' must look like Name=seats")
            }
            ConfigError::InvalidCapacity { department, found } => {
                write!(f, "department {department} has negative seat capacity {found}")
            }
            ConfigError::InvalidReferenceDate { value } => {
                write!(f, "ADMISSION_REFERENCE_DATE '{value}' must be YYYY-MM-DD")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
