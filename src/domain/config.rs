use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::record::Field;

pub const DEFAULT_ACTIVITY_CODES: [&str; 5] = ["DEV", "TEST", "MEETING", "TRAINING", "SUPPORT"];
pub const DEFAULT_EVIDENCE_SAMPLE_CAP: usize = 20;
pub const DEFAULT_MAX_DAILY_HOURS: f64 = 24.0;

/// Named threshold presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Isolated bad activity codes and sporadic whitespace are tolerated as noise.
    #[default]
    Tolerant,
    /// Every invalid activity code fails and every whitespace row warns.
    Strict,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tolerant => "tolerant",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule-engine checks in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    NullRatio,
    HoursRange,
    DailyOverbooking,
    ActivityCode,
    FutureDate,
    Whitespace,
    Duplicates,
}

impl CheckId {
    pub const ALL: [CheckId; 7] = [
        Self::NullRatio,
        Self::HoursRange,
        Self::DailyOverbooking,
        Self::ActivityCode,
        Self::FutureDate,
        Self::Whitespace,
        Self::Duplicates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NullRatio => "null_ratio",
            Self::HoursRange => "hours_range",
            Self::DailyOverbooking => "daily_overbooking",
            Self::ActivityCode => "activity_code",
            Self::FutureDate => "future_date",
            Self::Whitespace => "whitespace",
            Self::Duplicates => "duplicates",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-check enable switches. Every check runs unless switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckToggles {
    pub null_ratio: bool,
    pub hours_range: bool,
    pub daily_overbooking: bool,
    pub activity_code: bool,
    pub future_date: bool,
    pub whitespace: bool,
    pub duplicates: bool,
}

impl Default for CheckToggles {
    fn default() -> Self {
        Self {
            null_ratio: true,
            hours_range: true,
            daily_overbooking: true,
            activity_code: true,
            future_date: true,
            whitespace: true,
            duplicates: true,
        }
    }
}

impl CheckToggles {
    pub fn is_enabled(&self, check: CheckId) -> bool {
        match check {
            CheckId::NullRatio => self.null_ratio,
            CheckId::HoursRange => self.hours_range,
            CheckId::DailyOverbooking => self.daily_overbooking,
            CheckId::ActivityCode => self.activity_code,
            CheckId::FutureDate => self.future_date,
            CheckId::Whitespace => self.whitespace,
            CheckId::Duplicates => self.duplicates,
        }
    }
}

/// Resolved thresholds injected into the rule engine.
///
/// Ratio thresholds are exclusive: a check fires when the affected ratio is strictly
/// greater than the threshold, so `0.0` means "any affected row".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateConfig {
    pub profile: Profile,
    pub null_threshold: f64,
    pub activity_code_invalid_ratio_threshold: f64,
    pub whitespace_warn_ratio: f64,
    pub evidence_sample_cap: usize,
    pub max_daily_hours: f64,
    pub allowed_activity_codes: Vec<String>,
    pub whitespace_fields: Vec<Field>,
    pub checks: CheckToggles,
}

impl GateConfig {
    pub fn for_profile(profile: Profile) -> Self {
        let (activity_code_invalid_ratio_threshold, whitespace_warn_ratio) = match profile {
            Profile::Tolerant => (0.01, 0.02),
            Profile::Strict => (0.0, 0.0),
        };
        Self {
            profile,
            null_threshold: 0.05,
            activity_code_invalid_ratio_threshold,
            whitespace_warn_ratio,
            evidence_sample_cap: DEFAULT_EVIDENCE_SAMPLE_CAP,
            max_daily_hours: DEFAULT_MAX_DAILY_HOURS,
            allowed_activity_codes: DEFAULT_ACTIVITY_CODES
                .iter()
                .map(ToString::to_string)
                .collect(),
            whitespace_fields: vec![Field::Description, Field::ActivityCode],
            checks: CheckToggles::default(),
        }
    }

    /// Builds the effective configuration: an explicit profile wins over the file's
    /// `profile`, and every field set in the file overrides the profile default.
    pub fn resolve(
        profile: Option<Profile>,
        overrides: Option<ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let overrides = overrides.unwrap_or_default();
        let profile = profile.or(overrides.profile).unwrap_or_default();
        let mut config = Self::for_profile(profile);

        if let Some(value) = overrides.null_threshold {
            config.null_threshold = value;
        }
        if let Some(value) = overrides.activity_code_invalid_ratio_threshold {
            config.activity_code_invalid_ratio_threshold = value;
        }
        if let Some(value) = overrides.whitespace_warn_ratio {
            config.whitespace_warn_ratio = value;
        }
        if let Some(value) = overrides.evidence_sample_cap {
            config.evidence_sample_cap = value;
        }
        if let Some(value) = overrides.max_daily_hours {
            config.max_daily_hours = value;
        }
        if let Some(codes) = overrides.allowed_activity_codes {
            config.allowed_activity_codes = codes;
        }
        if let Some(fields) = overrides.whitespace_fields {
            config.whitespace_fields = fields;
        }
        if let Some(checks) = overrides.checks {
            config.checks = checks;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ratio("null_threshold", self.null_threshold)?;
        validate_ratio(
            "activity_code_invalid_ratio_threshold",
            self.activity_code_invalid_ratio_threshold,
        )?;
        validate_ratio("whitespace_warn_ratio", self.whitespace_warn_ratio)?;

        if self.evidence_sample_cap == 0 {
            return Err(ConfigError::invalid(
                "evidence_sample_cap",
                "must be at least 1",
            ));
        }
        if !self.max_daily_hours.is_finite() || self.max_daily_hours <= 0.0 {
            return Err(ConfigError::invalid(
                "max_daily_hours",
                "must be a positive number",
            ));
        }
        if self.allowed_activity_codes.is_empty() {
            return Err(ConfigError::invalid(
                "allowed_activity_codes",
                "must list at least one code",
            ));
        }
        if let Some(field) = self.whitespace_fields.iter().find(|field| !field.is_text()) {
            return Err(ConfigError::invalid(
                "whitespace_fields",
                format!("`{field}` is not a text column"),
            ));
        }
        Ok(())
    }

    pub fn is_activity_code_allowed(&self, code: &str) -> bool {
        self.allowed_activity_codes
            .iter()
            .any(|allowed| allowed == code)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

/// Configuration file contents; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub profile: Option<Profile>,
    pub null_threshold: Option<f64>,
    pub activity_code_invalid_ratio_threshold: Option<f64>,
    pub whitespace_warn_ratio: Option<f64>,
    pub evidence_sample_cap: Option<usize>,
    pub max_daily_hours: Option<f64>,
    pub allowed_activity_codes: Option<Vec<String>>,
    pub whitespace_fields: Option<Vec<Field>>,
    pub checks: Option<CheckToggles>,
}

fn validate_ratio(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(name, "must be within 0.0..=1.0"));
    }
    Ok(())
}
