//! Chat categories
//!
//! A category narrows the assistant's conversational context. The active
//! category is attached to every outgoing request; changing it only affects
//! messages sent afterwards.

use crate::error::HealthChatError;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topic category for a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatCategory {
    /// General health questions
    #[default]
    General,
    /// Diet, food, and nutrients
    Nutrition,
    /// Exercise and physical activity
    Fitness,
    /// Stress, mood, and emotional wellbeing
    MentalHealth,
    /// Sleep quality and habits
    Sleep,
    /// Medication questions and interactions
    Medication,
}

impl ChatCategory {
    /// Every category in display order
    pub const ALL: [ChatCategory; 6] = [
        ChatCategory::General,
        ChatCategory::Nutrition,
        ChatCategory::Fitness,
        ChatCategory::MentalHealth,
        ChatCategory::Sleep,
        ChatCategory::Medication,
    ];

    /// Parse a category from a string
    ///
    /// Matching is case-insensitive and treats `-`, `_` and spaces alike.
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::category::ChatCategory;
    ///
    /// assert_eq!(ChatCategory::parse_str("Mental-Health").unwrap(), ChatCategory::MentalHealth);
    /// assert!(ChatCategory::parse_str("astrology").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, HealthChatError> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "general" => Ok(Self::General),
            "nutrition" | "diet" => Ok(Self::Nutrition),
            "fitness" | "exercise" => Ok(Self::Fitness),
            "mental_health" | "mentalhealth" | "mental" => Ok(Self::MentalHealth),
            "sleep" => Ok(Self::Sleep),
            "medication" | "medications" => Ok(Self::Medication),
            _ => Err(HealthChatError::UnknownCategory(s.trim().to_string())),
        }
    }

    /// Machine-readable key (matches the serde representation)
    pub fn key(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Nutrition => "nutrition",
            Self::Fitness => "fitness",
            Self::MentalHealth => "mental_health",
            Self::Sleep => "sleep",
            Self::Medication => "medication",
        }
    }

    /// Short user-facing description
    pub fn description(&self) -> &'static str {
        match self {
            Self::General => "General health and wellness questions",
            Self::Nutrition => "Food, diet, and nutrient questions",
            Self::Fitness => "Exercise, training, and activity",
            Self::MentalHealth => "Stress, mood, and emotional wellbeing",
            Self::Sleep => "Sleep quality, routines, and rest",
            Self::Medication => "Medications, dosing, and interactions",
        }
    }

    /// Guidance handed to the assistant while this category is active
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::General => {
                "Answer general health and wellness questions. Keep advice broadly applicable."
            }
            Self::Nutrition => {
                "Focus on nutrition: foods, nutrients, portion sizes, and meal planning. \
                 Respect the user's allergies and dietary restrictions at all times."
            }
            Self::Fitness => {
                "Focus on physical activity: exercise selection, intensity, and recovery. \
                 Scale suggestions to the user's age, height, weight, and conditions."
            }
            Self::MentalHealth => {
                "Focus on emotional wellbeing: stress management, mood, and coping strategies. \
                 If the user describes a crisis, urge them to contact emergency services."
            }
            Self::Sleep => {
                "Focus on sleep: routines, sleep hygiene, and factors that disturb rest."
            }
            Self::Medication => {
                "Focus on medications: general usage, common side effects, and interactions \
                 with the user's current medications. Never prescribe or change dosages."
            }
        }
    }

    /// Colored tag for terminal prompts, e.g. `[NUTRITION]`
    pub fn colored_tag(&self) -> String {
        let label = self.to_string().to_uppercase();
        match self {
            Self::General => format!("[{}]", label.cyan()),
            Self::Nutrition => format!("[{}]", label.green()),
            Self::Fitness => format!("[{}]", label.yellow()),
            Self::MentalHealth => format!("[{}]", label.purple()),
            Self::Sleep => format!("[{}]", label.blue()),
            Self::Medication => format!("[{}]", label.red()),
        }
    }
}

impl fmt::Display for ChatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "General"),
            Self::Nutrition => write!(f, "Nutrition"),
            Self::Fitness => write!(f, "Fitness"),
            Self::MentalHealth => write!(f, "Mental Health"),
            Self::Sleep => write!(f, "Sleep"),
            Self::Medication => write!(f, "Medication"),
        }
    }
}

impl FromStr for ChatCategory {
    type Err = HealthChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_general() {
        assert_eq!(ChatCategory::default(), ChatCategory::General);
    }

    #[test]
    fn test_parse_str_accepts_keys() {
        for category in ChatCategory::ALL {
            assert_eq!(ChatCategory::parse_str(category.key()).unwrap(), category);
        }
    }

    #[test]
    fn test_parse_str_accepts_display_names() {
        for category in ChatCategory::ALL {
            assert_eq!(
                ChatCategory::parse_str(&category.to_string()).unwrap(),
                category
            );
        }
    }

    #[test]
    fn test_parse_str_is_case_and_separator_insensitive() {
        assert_eq!(
            ChatCategory::parse_str("MENTAL-health").unwrap(),
            ChatCategory::MentalHealth
        );
        assert_eq!(
            ChatCategory::parse_str("  sleep ").unwrap(),
            ChatCategory::Sleep
        );
    }

    #[test]
    fn test_parse_str_unknown() {
        let err = ChatCategory::parse_str("astrology").unwrap_err();
        assert!(matches!(err, HealthChatError::UnknownCategory(ref s) if s == "astrology"));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let yaml = serde_yaml::to_string(&ChatCategory::MentalHealth).unwrap();
        assert!(yaml.contains("mental_health"));
        let parsed: ChatCategory = serde_yaml::from_str("nutrition").unwrap();
        assert_eq!(parsed, ChatCategory::Nutrition);
    }

    #[test]
    fn test_every_category_has_guidance() {
        for category in ChatCategory::ALL {
            assert!(!category.guidance().is_empty());
            assert!(!category.description().is_empty());
        }
    }
}
