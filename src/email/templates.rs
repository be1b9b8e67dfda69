use askama::Template;

#[derive(Template)]
#[template(path = "email/owner_notification.html")]
struct OwnerNotificationHtml<'a> {
    name: &'a str,
    email: &'a str,
    submitted: &'a str,
    lines: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationHtml<'a> {
    name: &'a str,
    lines: Vec<&'a str>,
}

pub fn render_direct_feedback(name: &str, email: &str, message: &str, uid: &str) -> String {
    format!("User: {name}\nEmail: {email}\nMessage: {message}\nUser ID: {uid}")
}

pub fn render_owner_notification_text(
    name: &str,
    email: &str,
    message: &str,
    submitted: &str,
) -> String {
    format!(
        "New feedback received for Chrono.\n\n\
         From: {name}\n\
         Email: {email}\n\
         Submitted: {submitted}\n\n\
         Message:\n{message}\n"
    )
}

/// User content is HTML-escaped; newlines become `<br>`.
pub fn render_owner_notification_html(
    name: &str,
    email: &str,
    message: &str,
    submitted: &str,
) -> Result<String, String> {
    OwnerNotificationHtml {
        name,
        email,
        submitted,
        lines: split_lines(message),
    }
    .render()
    .map_err(|e| format!("Failed to render owner notification: {e}"))
}

pub fn render_confirmation_text(name: &str, message: &str) -> String {
    format!(
        "Hi {name},\n\n\
         We received your feedback on Chrono and will read it carefully. \
         Here is what you sent us:\n\n\
         {message}\n\n\
         The Chrono Team\n"
    )
}

pub fn render_confirmation_html(name: &str, message: &str) -> Result<String, String> {
    ConfirmationHtml {
        name,
        lines: split_lines(message),
    }
    .render()
    .map_err(|e| format!("Failed to render confirmation: {e}"))
}

fn split_lines(message: &str) -> Vec<&str> {
    message.lines().collect()
}
