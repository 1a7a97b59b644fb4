//! Contact form - field validation and simulated submission.
//!
//! All four fields are required (after trimming) and the email must look like
//! `local@domain.tld`. Invalid fields get the `ERROR` class until edited. A
//! valid submission disables the button, waits a fixed delay on the timeline,
//! then reports success and resets the form.
//!
//! # Example
//!
//! ```ignore
//! let form = ContactForm::new(&surface, notifier, &timeline, 2000);
//! match form.submit(&input) {
//!     SubmitOutcome::Rejected(errors) => { /* fields already marked */ }
//!     SubmitOutcome::Sending => { /* success arrives 2000ms later */ }
//! }
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::scheduler::Timeline;
use crate::state::Notifier;
use crate::surface::{live, RenderTarget, Surface};
use crate::types::{ElementClass, Millis};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const SENDING_LABEL: &str = "Sending...";
pub const SUBMIT_LABEL: &str = "Send Message";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    /// Element id of the input.
    pub fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blocked; the listed fields are marked.
    Rejected(Vec<FieldError>),
    /// Accepted; success is reported after the submit delay.
    Sending,
    /// A previous submission is still in flight.
    Busy,
}

// =============================================================================
// VALIDATION
// =============================================================================

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check every field, in form order.
pub fn validate(input: &FormInput) -> Vec<FieldError> {
    Field::ALL
        .into_iter()
        .filter_map(|field| {
            let value = input.value(field).trim();
            let message = if value.is_empty() {
                match field {
                    Field::Name => "Name is required",
                    Field::Email => "Email is required",
                    Field::Subject => "Subject is required",
                    Field::Message => "Message is required",
                }
            } else if field == Field::Email && !is_valid_email(value) {
                "Please enter a valid email address"
            } else {
                return None;
            };
            Some(FieldError { field, message })
        })
        .collect()
}

// =============================================================================
// FORM
// =============================================================================

pub struct ContactForm {
    fields: Vec<(Field, Option<Rc<dyn RenderTarget>>)>,
    button: Option<Rc<dyn RenderTarget>>,
    notifier: Notifier,
    timeline: Timeline,
    submit_delay_ms: Millis,
    sending: Rc<Cell<bool>>,
}

impl ContactForm {
    pub fn new(
        surface: &dyn Surface,
        notifier: Notifier,
        timeline: &Timeline,
        submit_delay_ms: Millis,
    ) -> Self {
        Self {
            fields: Field::ALL
                .into_iter()
                .map(|f| (f, surface.target(&f.id().into())))
                .collect(),
            button: surface.target(&"contactSubmit".into()),
            notifier,
            timeline: timeline.clone(),
            submit_delay_ms,
            sending: Rc::new(Cell::new(false)),
        }
    }

    /// Validate and, if clean, start the simulated send.
    pub fn submit(&self, input: &FormInput) -> SubmitOutcome {
        if self.sending.get() {
            return SubmitOutcome::Busy;
        }

        for (_, target) in &self.fields {
            if let Some(target) = live(target) {
                target.remove_class(ElementClass::ERROR);
            }
        }

        let errors = validate(input);
        if !errors.is_empty() {
            for error in &errors {
                if let Some(target) = self.field_target(error.field) {
                    target.add_class(ElementClass::ERROR);
                    target.set_attribute("data-error", error.message);
                }
            }
            warn!(count = errors.len(), "contact form rejected");
            self.notifier
                .error("Please fill in all required fields correctly.");
            return SubmitOutcome::Rejected(errors);
        }

        info!("contact form sending");
        self.sending.set(true);
        if let Some(button) = live(&self.button) {
            button.set_text(SENDING_LABEL);
            button.add_class(ElementClass::DISABLED);
        }

        let sending = self.sending.clone();
        let notifier = self.notifier.clone();
        let button = self.button.clone();
        let fields: Vec<_> = self.fields.iter().filter_map(|(_, t)| t.clone()).collect();
        self.timeline.schedule(self.submit_delay_ms, move || {
            notifier.success("Message sent successfully! I'll get back to you soon.");
            for field in fields.iter().filter(|t| t.is_attached()) {
                field.set_text("");
            }
            if let Some(button) = live(&button) {
                button.set_text(SUBMIT_LABEL);
                button.remove_class(ElementClass::DISABLED);
            }
            sending.set(false);
            info!("contact form sent");
        });
        SubmitOutcome::Sending
    }

    /// The user edited `field`: drop its error marking.
    pub fn on_input(&self, field: Field) {
        if let Some(target) = self.field_target(field) {
            target.remove_class(ElementClass::ERROR);
        }
    }

    pub fn is_sending(&self) -> bool {
        self.sending.get()
    }

    fn field_target(&self, field: Field) -> Option<&Rc<dyn RenderTarget>> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, t)| live(t))
    }
}
