//! System prompts for health chat sessions
//!
//! This module builds the system prompt that accompanies every request. The
//! prompt combines a fixed assistant role, guidance for the active
//! [`ChatCategory`], and the user's frozen [`HealthProfile`].

pub mod profile_context;

use crate::category::ChatCategory;
use crate::profile::HealthProfile;

/// Closing reminder appended to every system prompt
pub const MEDICAL_DISCLAIMER: &str = "You are not a doctor. Remind the user to consult a qualified \
healthcare professional before acting on advice about symptoms, diagnoses, or medication changes.";

/// Builds the system prompt for one request
///
/// # Arguments
///
/// * `category` - The category active when the message was sent
/// * `profile` - The submitted health profile
///
/// # Returns
///
/// A string containing the role, category guidance, profile context, and
/// disclaimer
///
/// # Examples
///
/// ```
/// use healthchat::category::ChatCategory;
/// use healthchat::profile::{HealthProfile, ProfileField};
/// use healthchat::prompts::build_system_prompt;
///
/// let mut profile = HealthProfile::new();
/// profile.set(ProfileField::Name, "Ana");
/// profile.set(ProfileField::Allergies, "peanuts");
///
/// let prompt = build_system_prompt(ChatCategory::Nutrition, &profile);
/// assert!(prompt.contains("NUTRITION"));
/// assert!(prompt.contains("Ana"));
/// assert!(prompt.contains("peanuts"));
/// ```
pub fn build_system_prompt(category: ChatCategory, profile: &HealthProfile) -> String {
    format!(
        r#"You are HealthChat, a friendly assistant that gives general health and wellness information.

TOPIC: {topic}
{guidance}

{context}

GUIDELINES:
- Tailor answers to the profile above when it is relevant
- Keep answers short and practical
- Say so when a question falls outside the current topic

{disclaimer}"#,
        topic = category.to_string().to_uppercase(),
        guidance = category.guidance(),
        context = profile_context::render_profile_context(profile),
        disclaimer = MEDICAL_DISCLAIMER,
    )
}
