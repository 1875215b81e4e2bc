//! Profile section of the system prompt

use crate::profile::{HealthProfile, ProfileField};

/// Renders the `USER PROFILE:` block
///
/// Scalar fields are listed with their labels. List fields are split on commas
/// and rendered as `none reported` when empty, so the assistant never guesses
/// at missing allergies or medications.
///
/// # Examples
///
/// ```
/// use healthchat::profile::{HealthProfile, ProfileField};
/// use healthchat::prompts::profile_context::render_profile_context;
///
/// let mut profile = HealthProfile::new();
/// profile.set(ProfileField::Medications, "metformin, lisinopril");
/// let block = render_profile_context(&profile);
/// assert!(block.contains("Medications: metformin; lisinopril"));
/// assert!(block.contains("Allergies: none reported"));
/// ```
pub fn render_profile_context(profile: &HealthProfile) -> String {
    let mut lines = vec!["USER PROFILE:".to_string()];

    for field in ProfileField::ALL {
        let value = if field.is_list() {
            let items = profile.list(field);
            if items.is_empty() {
                "none reported".to_string()
            } else {
                items.join("; ")
            }
        } else {
            match profile.get(field).trim() {
                "" => "not provided".to_string(),
                v => v.to_string(),
            }
        };
        lines.push(format!("- {}: {}", prompt_label(field), value));
    }

    lines.join("\n")
}

fn prompt_label(field: ProfileField) -> &'static str {
    match field {
        ProfileField::MedicalConditions => "Medical conditions",
        ProfileField::Allergies => "Allergies",
        ProfileField::Medications => "Medications",
        ProfileField::DietaryRestrictions => "Dietary restrictions",
        other => other.label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_renders_placeholders() {
        let block = render_profile_context(&HealthProfile::new());
        assert!(block.starts_with("USER PROFILE:"));
        assert!(block.contains("not provided"));
        assert!(block.contains("none reported"));
        assert_eq!(block.lines().count(), 1 + ProfileField::ALL.len());
    }

    #[test]
    fn test_scalar_fields_are_trimmed() {
        let mut profile = HealthProfile::new();
        profile.set(ProfileField::Age, "  42 ");
        let block = render_profile_context(&profile);
        assert!(block.contains("- Age: 42\n"));
    }
}
