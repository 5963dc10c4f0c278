// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Notification email rendering.
//!
//! The HTML and plain text bodies are Handlebars templates compiled into the
//! binary. Submitted values are HTML-escaped in the HTML body unless
//! `escape_html` is switched off.

use crate::clock::Clock;
use crate::validator::ContactSubmission;
use handlebars::Handlebars;
use serde_json::json;
use std::sync::Arc;

const HTML_TEMPLATE: &str = "contact.html";
const TEXT_TEMPLATE: &str = "contact.txt";

/// A composed notification, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Renders contact submissions into notification emails.
pub struct EmailRenderer {
    handlebars: Handlebars<'static>,
    clock: Arc<dyn Clock>,
}

impl EmailRenderer {
    /// Compile the built-in templates.
    pub fn new(
        escape_html: bool,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, handlebars::TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        if !escape_html {
            handlebars.register_escape_fn(handlebars::no_escape);
        }

        handlebars.register_template_string(
            HTML_TEMPLATE,
            include_str!("../templates/contact.html.hbs"),
        )?;
        handlebars.register_template_string(
            TEXT_TEMPLATE,
            include_str!("../templates/contact.txt.hbs"),
        )?;

        Ok(Self { handlebars, clock })
    }

    /// Render the notification for one validated submission.
    pub fn render(
        &self,
        submission: &ContactSubmission,
    ) -> Result<RenderedEmail, handlebars::RenderError> {
        let sent_at = self
            .clock
            .now()
            .format("%A, %B %-d, %Y at %I:%M %p UTC")
            .to_string();

        let vars = json!({
            "name": submission.name,
            "email": submission.email,
            "company": submission.company,
            "project_label": submission.project_label(),
            "message": submission.message,
            "sent_at": sent_at,
        });

        Ok(RenderedEmail {
            subject: format!("Portfolio Contact - {}", submission.project_type),
            html: self.handlebars.render(HTML_TEMPLATE, &vars)?,
            text: self.handlebars.render(TEXT_TEMPLATE, &vars)?,
        })
    }
}
