use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::NormalizedInput;

/// Badges a single submission can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    GoldAchiever,
    SilverPerformer,
    KeepImproving,
    FocusMaster,
    SleepHero,
    LowScreenChamp,
    StarterReward,
}

impl Badge {
    /// Persisted identifier; matches the labels already stored in existing ledgers.
    pub fn label(self) -> &'static str {
        match self {
            Badge::GoldAchiever => "🏅 Gold Achiever",
            Badge::SilverPerformer => "🥈 Silver Performer",
            Badge::KeepImproving => "💪 Keep Improving",
            Badge::FocusMaster => "🎯 Focus Master",
            Badge::SleepHero => "😴 Sleep Hero",
            Badge::LowScreenChamp => "📵 Low Screen Champ",
            Badge::StarterReward => "✨ Starter Reward",
        }
    }

    pub fn points(self) -> u64 {
        match self {
            Badge::GoldAchiever => 50,
            Badge::SilverPerformer => 30,
            Badge::KeepImproving => 10,
            Badge::FocusMaster | Badge::SleepHero => 5,
            Badge::LowScreenChamp => 3,
            Badge::StarterReward => 0,
        }
    }

    /// Exactly one tier badge applies to any score; NaN lands in the lowest tier.
    pub fn tier_for(score: f64) -> Badge {
        if score >= 80.0 {
            Badge::GoldAchiever
        } else if score >= 60.0 {
            Badge::SilverPerformer
        } else {
            Badge::KeepImproving
        }
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

struct BonusRule {
    applies: fn(&NormalizedInput) -> bool,
    badge: Badge,
}

const BONUS_RULES: [BonusRule; 3] = [
    BonusRule {
        applies: |input| input.focus_hours >= 6.0,
        badge: Badge::FocusMaster,
    },
    BonusRule {
        applies: |input| input.sleep_hours >= 7.0,
        badge: Badge::SleepHero,
    },
    BonusRule {
        applies: |input| input.screen_time <= 2.0,
        badge: Badge::LowScreenChamp,
    },
];

/// Points and badges earned by one submission, before merging into the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarnedRewards {
    pub points: u64,
    pub badges: Vec<Badge>,
}

pub fn earned_rewards(input: &NormalizedInput, score: f64) -> EarnedRewards {
    let mut badges = vec![Badge::tier_for(score)];
    badges.extend(
        BONUS_RULES
            .iter()
            .filter(|rule| (rule.applies)(input))
            .map(|rule| rule.badge),
    );

    if badges.is_empty() {
        badges.push(Badge::StarterReward);
    }

    let points = badges.iter().map(|badge| badge.points()).sum();
    EarnedRewards { points, badges }
}

/// Cumulative reward totals persisted across submissions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: u64,
    #[serde(default)]
    pub badges: Vec<String>,
}

/// Accepts whole numbers and truncates finite non-negative floats such as `12.0`.
fn lenient_points<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(points) = number.as_u64() {
        return Ok(points);
    }

    match number.as_f64() {
        Some(points) if points.is_finite() && points >= 0.0 => Ok(points.trunc() as u64),
        _ => Err(D::Error::custom(format!(
            "points must be a non-negative number, got {number}"
        ))),
    }
}

impl LedgerState {
    /// Add points and append unseen badges, keeping first-insertion order.
    pub fn merge(&mut self, earned: &EarnedRewards) {
        self.points = self.points.saturating_add(earned.points);
        for badge in &earned.badges {
            if !self.badges.iter().any(|held| held == badge.label()) {
                self.badges.push(badge.label().to_string());
            }
        }
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.iter().any(|held| held == badge.label())
    }
}

/// Outcome of one award: this submission's delta plus the merged totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwardResult {
    pub points_delta: u64,
    pub badges_awarded: Vec<Badge>,
    pub state: LedgerState,
}
