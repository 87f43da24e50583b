//! Contact form command.
//!
//! There is no mail backend; a message that validates is acknowledged and
//! logged.

use jblinx_storefront::AppError;
use jblinx_storefront::contact::ContactForm;
use tracing::info;

use super::emit;

/// Validate the form and print the confirmation.
pub fn send(name: String, email: String, message: String) -> Result<(), Box<dyn std::error::Error>> {
    let form = ContactForm {
        name,
        email,
        message,
    };

    let submission = form.validate().map_err(AppError::from)?;
    info!(
        email_domain = submission.email.domain(),
        length = submission.message.len(),
        "Contact message accepted"
    );

    emit([submission.confirmation().message])?;
    Ok(())
}
