//! Health profile model
//!
//! The profile is collected before a chat starts and is frozen for the
//! lifetime of the session. Name, age, height, and weight are required; the
//! remaining fields are optional comma-separated lists.

use crate::error::{HealthChatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A user's health profile
///
/// Numeric fields are kept as strings, exactly as entered, so that a draft
/// can hold partial input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthProfile {
    /// Display name
    pub name: String,
    /// Age in years
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    /// Weight in kilograms
    #[serde(deserialize_with = "string_or_number")]
    pub weight: String,
    /// Height in centimeters
    #[serde(deserialize_with = "string_or_number")]
    pub height: String,
    /// Comma-separated medical conditions
    pub medical_conditions: String,
    /// Comma-separated allergies
    pub allergies: String,
    /// Comma-separated current medications
    pub medications: String,
    /// Comma-separated dietary restrictions
    pub dietary_restrictions: String,
}

/// Accept `age: 30` as well as `age: "30"` in profile files
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

/// Identifies one field of a [`HealthProfile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Age,
    Weight,
    Height,
    MedicalConditions,
    Allergies,
    Medications,
    DietaryRestrictions,
}

impl ProfileField {
    /// All fields in intake order
    pub const ALL: [ProfileField; 8] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::Height,
        ProfileField::Weight,
        ProfileField::MedicalConditions,
        ProfileField::Allergies,
        ProfileField::Medications,
        ProfileField::DietaryRestrictions,
    ];

    /// Field key as used in profile files
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::MedicalConditions => "medical_conditions",
            Self::Allergies => "allergies",
            Self::Medications => "medications",
            Self::DietaryRestrictions => "dietary_restrictions",
        }
    }

    /// Human-readable label shown during intake
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Age => "Age",
            Self::Weight => "Weight (kg)",
            Self::Height => "Height (cm)",
            Self::MedicalConditions => "Medical Conditions (comma-separated)",
            Self::Allergies => "Allergies (comma-separated)",
            Self::Medications => "Current Medications (comma-separated)",
            Self::DietaryRestrictions => "Dietary Restrictions (comma-separated)",
        }
    }

    /// Whether the field must be non-empty at submission
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Name | Self::Age | Self::Weight | Self::Height)
    }

    /// Whether the field holds a number
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Age | Self::Weight | Self::Height)
    }

    /// Whether the field is a comma-separated list
    pub fn is_list(&self) -> bool {
        !self.is_required()
    }

    /// Validate a single input value for this field
    ///
    /// Required fields must be non-empty, numeric fields must parse as a
    /// positive number. Optional list fields accept anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::profile::ProfileField;
    ///
    /// assert!(ProfileField::Age.validate_value("30").is_ok());
    /// assert!(ProfileField::Age.validate_value("thirty").is_err());
    /// assert!(ProfileField::Allergies.validate_value("").is_ok());
    /// ```
    pub fn validate_value(&self, value: &str) -> std::result::Result<(), HealthChatError> {
        let value = value.trim();

        if value.is_empty() {
            if self.is_required() {
                return Err(HealthChatError::MissingProfileFields(vec![self
                    .label()
                    .to_string()]));
            }
            return Ok(());
        }

        if self.is_numeric() {
            match value.parse::<f64>() {
                Ok(n) if n.is_finite() && n > 0.0 => {}
                _ => {
                    return Err(HealthChatError::InvalidProfileField {
                        field: self.label().to_string(),
                        message: format!("'{}' is not a positive number", value),
                    })
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProfileField {
    type Err = HealthChatError;

    /// Accepts `snake_case`, `camelCase`, or the bare label
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "name" => Ok(Self::Name),
            "age" => Ok(Self::Age),
            "weight" | "weightkg" => Ok(Self::Weight),
            "height" | "heightcm" => Ok(Self::Height),
            "medicalconditions" | "conditions" => Ok(Self::MedicalConditions),
            "allergies" => Ok(Self::Allergies),
            "medications" | "currentmedications" => Ok(Self::Medications),
            "dietaryrestrictions" | "diet" => Ok(Self::DietaryRestrictions),
            _ => Err(HealthChatError::UnknownProfileField(s.trim().to_string())),
        }
    }
}

impl HealthProfile {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a profile from a YAML file
    ///
    /// Missing keys stay empty, so a file may pre-fill only part of a draft.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HealthChatError::Config(format!(
                "Failed to read profile file {}: {}",
                path.display(),
                e
            ))
        })?;
        let profile: HealthProfile = serde_yaml::from_str(&contents).map_err(|e| {
            HealthChatError::Config(format!(
                "Failed to parse profile file {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %path.display(), "Loaded profile file");
        Ok(profile)
    }

    /// Read a field value
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Age => &self.age,
            ProfileField::Weight => &self.weight,
            ProfileField::Height => &self.height,
            ProfileField::MedicalConditions => &self.medical_conditions,
            ProfileField::Allergies => &self.allergies,
            ProfileField::Medications => &self.medications,
            ProfileField::DietaryRestrictions => &self.dietary_restrictions,
        }
    }

    /// Overwrite a single field, leaving the others untouched
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::Name => self.name = value,
            ProfileField::Age => self.age = value,
            ProfileField::Weight => self.weight = value,
            ProfileField::Height => self.height = value,
            ProfileField::MedicalConditions => self.medical_conditions = value,
            ProfileField::Allergies => self.allergies = value,
            ProfileField::Medications => self.medications = value,
            ProfileField::DietaryRestrictions => self.dietary_restrictions = value,
        }
    }

    /// Split a comma-separated field into trimmed, non-empty items
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::profile::{HealthProfile, ProfileField};
    ///
    /// let mut profile = HealthProfile::new();
    /// profile.set(ProfileField::Allergies, "peanuts, , shellfish ");
    /// assert_eq!(profile.list(ProfileField::Allergies), vec!["peanuts", "shellfish"]);
    /// ```
    pub fn list(&self, field: ProfileField) -> Vec<String> {
        self.get(field)
            .split(',')
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    }

    /// Required fields that are still empty
    pub fn missing_required(&self) -> Vec<ProfileField> {
        ProfileField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).trim().is_empty())
            .collect()
    }

    /// True when every field is empty
    pub fn is_empty(&self) -> bool {
        ProfileField::ALL
            .into_iter()
            .all(|f| self.get(f).is_empty())
    }

    /// Validate the whole profile for submission
    ///
    /// # Errors
    ///
    /// Returns `MissingProfileFields` listing every empty required field, or
    /// `InvalidProfileField` for the first malformed numeric field.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(HealthChatError::MissingProfileFields(
                missing.iter().map(|f| f.label().to_string()).collect(),
            )
            .into());
        }

        for field in ProfileField::ALL {
            field.validate_value(self.get(field))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ana() -> HealthProfile {
        HealthProfile {
            name: "Ana".to_string(),
            age: "30".to_string(),
            height: "165".to_string(),
            weight: "60".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_profile_is_empty() {
        let profile = HealthProfile::new();
        assert!(profile.is_empty());
        assert_eq!(profile.missing_required().len(), 4);
    }

    #[test]
    fn test_set_only_touches_one_field() {
        let mut profile = ana();
        profile.set(ProfileField::Allergies, "peanuts");
        assert_eq!(profile.allergies, "peanuts");
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.medications, "");
    }

    #[test]
    fn test_validate_accepts_required_only() {
        assert!(ana().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_all_missing_fields() {
        let profile = HealthProfile {
            name: "Ana".to_string(),
            ..Default::default()
        };
        let err = profile.validate().unwrap_err();
        match err.downcast_ref::<HealthChatError>() {
            Some(HealthChatError::MissingProfileFields(fields)) => {
                assert_eq!(fields.len(), 3);
                assert!(fields.contains(&"Age".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_non_numeric_age() {
        let mut profile = ana();
        profile.age = "thirty".to_string();
        let err = profile.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HealthChatError>(),
            Some(HealthChatError::InvalidProfileField { .. })
        ));
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut profile = ana();
        profile.name = "   ".to_string();
        assert_eq!(profile.missing_required(), vec![ProfileField::Name]);
    }

    #[test]
    fn test_validate_value_rejects_zero_and_negative() {
        assert!(ProfileField::Weight.validate_value("0").is_err());
        assert!(ProfileField::Height.validate_value("-170").is_err());
        assert!(ProfileField::Height.validate_value("170.5").is_ok());
    }

    #[test]
    fn test_field_from_str_variants() {
        assert_eq!(
            "medicalConditions".parse::<ProfileField>().unwrap(),
            ProfileField::MedicalConditions
        );
        assert_eq!(
            "dietary_restrictions".parse::<ProfileField>().unwrap(),
            ProfileField::DietaryRestrictions
        );
        assert_eq!(
            "Height (cm)".parse::<ProfileField>().unwrap(),
            ProfileField::Height
        );
        assert!("shoe_size".parse::<ProfileField>().is_err());
    }

    #[test]
    fn test_list_splits_and_trims() {
        let mut profile = ana();
        profile.medications = " metformin,lisinopril , ".to_string();
        assert_eq!(
            profile.list(ProfileField::Medications),
            vec!["metformin".to_string(), "lisinopril".to_string()]
        );
        assert!(profile.list(ProfileField::Allergies).is_empty());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: Ana\nage: 30\nweight: \"60\"\nallergies: peanuts").unwrap();

        let profile = HealthProfile::from_file(file.path()).unwrap();
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.age, "30");
        assert_eq!(profile.weight, "60");
        assert_eq!(profile.allergies, "peanuts");
        assert_eq!(profile.height, "");
    }

    #[test]
    fn test_from_file_missing() {
        assert!(HealthProfile::from_file("/nonexistent/profile.yaml").is_err());
    }
}
