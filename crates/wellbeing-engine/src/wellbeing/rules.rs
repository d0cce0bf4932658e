//! Threshold rules turning a normalized submission into alert, recommendation,
//! and daily plan text.
//!
//! Every table is evaluated top to bottom and each matching rule contributes its
//! message, so output order always follows declaration order. Alert and
//! recommendation thresholds on the same field differ and are evaluated
//! independently.

use super::domain::NormalizedInput;

struct Rule {
    applies: fn(&NormalizedInput) -> bool,
    message: &'static str,
}

enum PlanStep {
    Always(&'static str),
    When(Rule),
}

pub const NO_ALERTS: &str = "👍 No alerts today! You're doing great.";
pub const MAINTAIN_ROUTINE: &str = "Great job! Maintain your healthy routine.";

const ALERT_RULES: [Rule; 5] = [
    Rule {
        applies: |input| input.stress_index >= 7.0,
        message: "⚠️ High Stress: You should take relaxation breaks today.",
    },
    Rule {
        applies: |input| input.burnout_level >= 6.0,
        message: "🔥 Burnout Risk: Reduce workload and rest properly.",
    },
    Rule {
        applies: |input| input.sleep_hours < 7.0,
        message: "😴 Low Sleep: Aim for 7–8 hours tonight.",
    },
    Rule {
        applies: |input| input.screen_time >= 6.0,
        message: "📱 High Screen Time: Reduce mobile usage during work hours.",
    },
    Rule {
        applies: |input| input.unlock_count >= 50.0,
        message: "🔓 Too Many Phone Unlocks: Enable focus mode for 1–2 hours.",
    },
];

const RECOMMENDATION_RULES: [Rule; 9] = [
    Rule {
        applies: |input| input.sleep_hours < 7.0,
        message: "Sleep 7–8 hours tonight for better clarity.",
    },
    Rule {
        applies: |input| input.study_hours < 3.0,
        message: "Increase focused work/study by 1 hour.",
    },
    Rule {
        applies: |input| input.screen_time > 5.0,
        message: "Reduce screen time by at least 1–2 hours.",
    },
    Rule {
        applies: |input| input.physical_activity < 1.0,
        message: "Do a 20-minute walk or light exercise today.",
    },
    Rule {
        applies: |input| input.breaks < 3.0,
        message: "Take 3–4 mindful breaks during the day.",
    },
    Rule {
        applies: |input| input.unlock_count > 50.0,
        message: "Reduce phone checks using DND or focus mode.",
    },
    Rule {
        applies: |input| input.social_media_hours > 1.0,
        message: "Limit social media to under 1 hour.",
    },
    Rule {
        applies: |input| input.stress_index > 5.0,
        message: "Do a 3-minute breathing exercise to reduce stress.",
    },
    Rule {
        applies: |input| input.burnout_level > 5.0,
        message: "Take a lighter schedule today to prevent burnout.",
    },
];

const DAILY_PLAN: [PlanStep; 8] = [
    PlanStep::When(Rule {
        applies: |input| input.sleep_hours < 7.0,
        message: "Sleep early today and target 7–8 hours.",
    }),
    PlanStep::Always("Do one 45-minute deep work session in the morning."),
    PlanStep::Always("Take a 10-minute mindful break every 90 minutes."),
    PlanStep::When(Rule {
        applies: |input| input.physical_activity < 1.0,
        message: "Do a 20-minute walk or light exercise.",
    }),
    PlanStep::When(Rule {
        applies: |input| input.screen_time > 5.0,
        message: "Keep your phone away during work periods.",
    }),
    PlanStep::When(Rule {
        applies: |input| input.unlock_count > 50.0,
        message: "Turn on Do Not Disturb for 2 hours.",
    }),
    PlanStep::When(Rule {
        applies: |input| input.social_media_hours > 1.0,
        message: "Use social media only during breaks.",
    }),
    PlanStep::Always("Review your tasks in the evening for 5 minutes."),
];

fn fired_or(rules: &[Rule], input: &NormalizedInput, fallback: &'static str) -> Vec<String> {
    let mut messages: Vec<String> = rules
        .iter()
        .filter(|rule| (rule.applies)(input))
        .map(|rule| rule.message.to_string())
        .collect();

    if messages.is_empty() {
        messages.push(fallback.to_string());
    }

    messages
}

/// Stress, burnout, sleep, and phone-usage warnings.
pub fn alerts(input: &NormalizedInput) -> Vec<String> {
    fired_or(&ALERT_RULES, input, NO_ALERTS)
}

pub fn recommendations(input: &NormalizedInput) -> Vec<String> {
    fired_or(&RECOMMENDATION_RULES, input, MAINTAIN_ROUTINE)
}

/// Ordered plan for the day; the fixed steps guarantee at least three entries.
pub fn daily_plan(input: &NormalizedInput) -> Vec<String> {
    DAILY_PLAN
        .iter()
        .filter_map(|step| match step {
            PlanStep::Always(message) => Some(message.to_string()),
            PlanStep::When(rule) => (rule.applies)(input).then(|| rule.message.to_string()),
        })
        .collect()
}
