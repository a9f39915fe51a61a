//! Status Tool
//!
//! Runtime status of the service and the coaching workflow guide.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Workflow guide for AI assistants driving the tools
pub const GS_INSTRUCTIONS: &str = r#"
# GS Coach Instructions

GS Coach stores client profiles, body measurements, meal plans and training
plans, and exports a one-page client sheet as PDF.

## Suggested Workflow

1. Register the client with `create_client` (only `name` is required).
2. Record initial measurements with `add_measurement`.
3. Generate a meal plan with `generate_meal_plan` (GS preset). Use
   `preview_meal_plan` first to try other activity levels or objectives
   without saving anything.
4. Save the routine with `add_training_plan`.
5. Export the client sheet with `export_client_pdf`.

---

## Energy Estimate

BMR uses Mifflin-St Jeor:

- Men: `10 x weight_kg + 6.25 x height_cm - 5 x age + 5`
- Women and other: `10 x weight_kg + 6.25 x height_cm - 5 x age - 161`

TDEE = BMR x activity multiplier:

| activity_level | multiplier |
|---|---|
| sedentary | 1.2 |
| light | 1.375 |
| moderate (default) | 1.55 |
| high | 1.725 |
| athlete | 1.9 |

Unknown activity labels are treated as `moderate`.

---

## GS Preset Meal Plan

Calorie target = TDEE + objective offset:

| objective | offset (kcal) |
|---|---|
| fat_loss | -300 |
| recomposition (default) | -100 |
| maintenance | 0 |
| muscle_gain | +200 |

Macros always use a 30 / 25 / 45 split (protein / fat / carbs) of the target,
at 4 / 9 / 4 kcal per gram, rounded to whole grams. Meals rotate through
breakfast, lunch and dinner templates up to `meals_per_day`.

Inputs not passed to `generate_meal_plan` come from the client profile,
then default to 70 kg, 170 cm, 30 years and 3 meals per day.

---

## Input Ranges

| field | range |
|---|---|
| age | 1 - 120 |
| height_cm | 80 - 230 |
| weight_kg | 10 - 400 |
| body_fat_pct, muscle_pct | 0 - 80 |
| visceral_fat | 0 - 30 |
| meals_per_day | 1 - 8 |
| waist, hip, chest, thigh (cm) | 20 - 200 |
| arm (cm) | 10 - 80 |
| days_per_week | 1 - 7 |
| session_duration_min | 30 - 180 |

Dates use ISO format `YYYY-MM-DD` and default to today when omitted.

---

## Notes

- Deleting a client deletes its measurements and plans.
- The PDF includes a weight / body fat chart once the client has at least
  two measurements.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct GsStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub export_dir: String,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    export_dir: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, export_dir: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            export_dir,
        }
    }

    pub fn get_status(&self) -> GsStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path).ok().map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys.process(Pid::from_u32(pid)).map(|p| p.memory()).unwrap_or(0);

        GsStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            export_dir: self.export_dir.display().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(
            PathBuf::from("/nonexistent/gs_coach.db"),
            PathBuf::from("/tmp/exports"),
        );
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.export_dir, "/tmp/exports");
    }

    #[test]
    fn test_status_reports_database_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gs.db");
        std::fs::write(&path, b"0123456789").unwrap();

        let status = StatusTracker::new(path, dir.path().to_path_buf()).get_status();
        assert_eq!(status.database_size_bytes, Some(10));
    }
}
