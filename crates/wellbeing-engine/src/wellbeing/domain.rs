use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The ten daily measurements every submission is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellbeingField {
    ScreenTime,
    StudyHours,
    SleepHours,
    SocialMediaHours,
    PhysicalActivity,
    Breaks,
    UnlockCount,
    FocusHours,
    StressIndex,
    BurnoutLevel,
}

impl WellbeingField {
    /// Canonical column order shared by the normalizer and the score model.
    pub const ALL: [WellbeingField; 10] = [
        WellbeingField::ScreenTime,
        WellbeingField::StudyHours,
        WellbeingField::SleepHours,
        WellbeingField::SocialMediaHours,
        WellbeingField::PhysicalActivity,
        WellbeingField::Breaks,
        WellbeingField::UnlockCount,
        WellbeingField::FocusHours,
        WellbeingField::StressIndex,
        WellbeingField::BurnoutLevel,
    ];

    pub fn key(self) -> &'static str {
        match self {
            WellbeingField::ScreenTime => "screen_time",
            WellbeingField::StudyHours => "study_hours",
            WellbeingField::SleepHours => "sleep_hours",
            WellbeingField::SocialMediaHours => "social_media_hours",
            WellbeingField::PhysicalActivity => "physical_activity",
            WellbeingField::Breaks => "breaks",
            WellbeingField::UnlockCount => "unlock_count",
            WellbeingField::FocusHours => "focus_hours",
            WellbeingField::StressIndex => "stress_index",
            WellbeingField::BurnoutLevel => "burnout_level",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Fixed-schema numeric record derived from a raw submission.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedInput {
    pub screen_time: f64,
    pub study_hours: f64,
    pub sleep_hours: f64,
    pub social_media_hours: f64,
    pub physical_activity: f64,
    pub breaks: f64,
    pub unlock_count: f64,
    pub focus_hours: f64,
    pub stress_index: f64,
    pub burnout_level: f64,
}

impl NormalizedInput {
    pub fn get(&self, field: WellbeingField) -> f64 {
        match field {
            WellbeingField::ScreenTime => self.screen_time,
            WellbeingField::StudyHours => self.study_hours,
            WellbeingField::SleepHours => self.sleep_hours,
            WellbeingField::SocialMediaHours => self.social_media_hours,
            WellbeingField::PhysicalActivity => self.physical_activity,
            WellbeingField::Breaks => self.breaks,
            WellbeingField::UnlockCount => self.unlock_count,
            WellbeingField::FocusHours => self.focus_hours,
            WellbeingField::StressIndex => self.stress_index,
            WellbeingField::BurnoutLevel => self.burnout_level,
        }
    }

    fn slot(&mut self, field: WellbeingField) -> &mut f64 {
        match field {
            WellbeingField::ScreenTime => &mut self.screen_time,
            WellbeingField::StudyHours => &mut self.study_hours,
            WellbeingField::SleepHours => &mut self.sleep_hours,
            WellbeingField::SocialMediaHours => &mut self.social_media_hours,
            WellbeingField::PhysicalActivity => &mut self.physical_activity,
            WellbeingField::Breaks => &mut self.breaks,
            WellbeingField::UnlockCount => &mut self.unlock_count,
            WellbeingField::FocusHours => &mut self.focus_hours,
            WellbeingField::StressIndex => &mut self.stress_index,
            WellbeingField::BurnoutLevel => &mut self.burnout_level,
        }
    }

    /// Single tabular row keyed by field name, in canonical column order.
    pub fn as_row(&self) -> [(WellbeingField, f64); 10] {
        WellbeingField::ALL.map(|field| (field, self.get(field)))
    }

    /// Coerce a raw key/value submission, substituting `0.0` for anything unusable.
    pub fn normalize(raw: &Map<String, Value>) -> Normalization {
        let mut input = NormalizedInput::default();
        let mut defaulted = Vec::new();

        for field in WellbeingField::ALL {
            match raw.get(field.key()).and_then(coerce_number) {
                Some(value) => *input.slot(field) = value,
                None => defaulted.push(field),
            }
        }

        Normalization { input, defaulted }
    }
}

/// Normalizer result: always usable, with the fields that fell back to `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub input: NormalizedInput,
    pub defaulted: Vec<WellbeingField>,
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }?;

    number.is_finite().then_some(number)
}
