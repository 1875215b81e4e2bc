//! Interactive health profile intake
//!
//! Prompts for each profile field in order and writes accepted answers into
//! the [`SessionGate`] draft. Required and numeric fields are re-prompted
//! until they validate.

use crate::error::Result;
use crate::profile::{HealthProfile, ProfileField};
use crate::session::SessionGate;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run intake until every field is answered
///
/// Fields already holding a valid value are skipped. When `prefilled` is true
/// (a profile file was loaded) empty optional fields are skipped too.
///
/// # Returns
///
/// `Ok(true)` when the profile is complete, `Ok(false)` when the user pressed
/// Ctrl-C or Ctrl-D.
///
/// # Errors
///
/// Returns error if the terminal cannot be read
pub fn run_intake(rl: &mut DefaultEditor, gate: &mut SessionGate, prefilled: bool) -> Result<bool> {
    print_intake_banner();

    for field in ProfileField::ALL {
        if !needs_prompt(gate.profile(), field, prefilled) {
            println!("{}: {}", field.label(), gate.profile().get(field).dimmed());
            continue;
        }

        loop {
            match rl.readline(&field_prompt(field)) {
                Ok(line) => match submit_answer(gate, field, &line) {
                    Ok(()) => break,
                    Err(e) => println!("{}", e.to_string().red()),
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
                Err(e) => return Err(e.into()),
            }
        }
    }

    gate.profile().validate()?;
    Ok(true)
}

/// Whether intake has to ask for `field`
pub fn needs_prompt(profile: &HealthProfile, field: ProfileField, prefilled: bool) -> bool {
    let value = profile.get(field).trim();
    if value.is_empty() {
        return field.is_required() || !prefilled;
    }
    field.validate_value(value).is_err()
}

/// Validate one answer and store it in the draft
///
/// # Errors
///
/// Returns the validation error, leaving the draft unchanged
pub fn submit_answer(gate: &mut SessionGate, field: ProfileField, input: &str) -> Result<()> {
    field.validate_value(input)?;
    gate.update_field(field, input.trim())
}

fn field_prompt(field: ProfileField) -> String {
    if field.is_required() {
        format!("{}{}: ", field.label(), "*".red())
    } else {
        format!("{} {}: ", field.label(), "(optional)".dimmed())
    }
}

fn print_intake_banner() {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                 HealthChat - Your Health Profile             ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Fields marked {} are required.\n", "*".red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::fake::ScriptedProvider;
    use crate::test_utils::{test_chat_config, test_profile};
    use std::sync::Arc;

    fn gate() -> SessionGate {
        SessionGate::new(Arc::new(ScriptedProvider::new(Vec::new())), test_chat_config())
    }

    #[test]
    fn test_submit_answer_stores_trimmed_value() {
        let mut gate = gate();
        submit_answer(&mut gate, ProfileField::Name, "  Ana ").unwrap();
        assert_eq!(gate.profile().name, "Ana");
    }

    #[test]
    fn test_submit_answer_rejects_invalid_number() {
        let mut gate = gate();
        let err = submit_answer(&mut gate, ProfileField::Weight, "heavy").unwrap_err();
        assert!(err.to_string().contains("Weight"));
        assert!(gate.profile().weight.is_empty());
    }

    #[test]
    fn test_submit_answer_rejects_empty_required() {
        let mut gate = gate();
        assert!(submit_answer(&mut gate, ProfileField::Age, "   ").is_err());
        assert!(submit_answer(&mut gate, ProfileField::Allergies, "").is_ok());
    }

    #[test]
    fn test_needs_prompt() {
        let profile = test_profile();
        assert!(!needs_prompt(&profile, ProfileField::Name, false));
        assert!(needs_prompt(&profile, ProfileField::Allergies, false));
        assert!(!needs_prompt(&profile, ProfileField::Allergies, true));

        let mut bad = test_profile();
        bad.set(ProfileField::Age, "old");
        assert!(needs_prompt(&bad, ProfileField::Age, true));
        assert!(needs_prompt(&HealthProfile::new(), ProfileField::Height, true));
    }
}
