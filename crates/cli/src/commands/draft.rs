//! Checkout draft commands.
//!
//! # Usage
//!
//! ```bash
//! pocket-cli draft save --field full_name="Ada Lovelace" --field phone=555-0100
//! ```

use clap::Subcommand;
use pocketshop_client_state::{CheckoutForm, ClientState};

use super::{CommandError, print_json};

#[derive(Subcommand)]
pub enum DraftAction {
    /// Print the saved draft
    Show,
    /// Replace the draft with the given form fields
    Save {
        /// Form field as `name=value` (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Delete the draft
    Clear,
}

/// Run a draft subcommand.
pub async fn run(state: &ClientState, action: DraftAction) -> Result<(), CommandError> {
    match action {
        DraftAction::Show => print_json(&state.checkout().get().await),
        DraftAction::Save { fields } => {
            let form = parse_form(&fields)?;
            print_json(&state.checkout().save(&form).await)
        }
        DraftAction::Clear => {
            state.checkout().clear().await;
            tracing::info!("Checkout draft cleared");
            Ok(())
        }
    }
}

/// Build a form from `name=value` pairs. Names accept snake or camel case.
fn parse_form(fields: &[String]) -> Result<CheckoutForm, CommandError> {
    let mut form = CheckoutForm::default();

    for field in fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| CommandError::InvalidField(format!("expected NAME=VALUE, got {field}")))?;

        let slot = match name.trim() {
            "full_name" | "fullName" => &mut form.full_name,
            "email" => &mut form.email,
            "phone" => &mut form.phone,
            "alternate_phone" | "alternatePhone" => &mut form.alternate_phone,
            "address" => &mut form.address,
            "landmark" => &mut form.landmark,
            "notes" => &mut form.notes,
            other => return Err(CommandError::InvalidField(format!("unknown field {other}"))),
        };
        value.clone_into(slot);
    }

    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_form() {
        let form = parse_form(&args(&[
            "full_name=Ada Lovelace",
            "alternatePhone=555",
            "address=1 Main St, Apt=4",
            "notes=ring twice",
        ]))
        .unwrap();
        assert_eq!(form.full_name, "Ada Lovelace");
        assert_eq!(form.alternate_phone, "555");
        assert_eq!(form.address, "1 Main St, Apt=4");
        assert_eq!(form.notes, "ring twice");
        assert_eq!(form.email, "");
    }

    #[test]
    fn test_parse_form_rejects_unknown_field() {
        assert!(matches!(
            parse_form(&args(&["card_number=4111"])),
            Err(CommandError::InvalidField(_))
        ));
    }

    #[test]
    fn test_parse_form_rejects_missing_equals() {
        assert!(matches!(
            parse_form(&args(&["email"])),
            Err(CommandError::InvalidField(_))
        ));
    }
}
