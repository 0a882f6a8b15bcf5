//! Server-rendered HTML. Every interpolated string goes through [`escape`].

use std::fmt::Write as _;

use agronomy_core::Feature;
use axum::response::Html;

use super::session::{Flash, SessionUser};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared chrome: navigation, account links and pending flash messages.
pub struct Layout<'a> {
    pub user: Option<&'a SessionUser>,
    pub flashes: &'a [Flash],
}

impl Layout<'_> {
    pub fn render(&self, title: &str, body: &str) -> Html<String> {
        let mut nav = String::from(
            r#"<a href="/">Home</a> <a href="/about">About</a> <a href="/services">Services</a> <a href="/products">Products</a> <a href="/blogs">Blogs</a> <a href="/predict">Predict</a> <a href="/contact">Contact</a>"#,
        );
        match self.user {
            Some(user) => {
                let _ = write!(
                    nav,
                    r#" <span class="user">{}</span> <a href="/logout">Log out</a>"#,
                    escape(&user.username)
                );
            }
            None => nav.push_str(r#" <a href="/login">Log in</a> <a href="/signup">Sign up</a>"#),
        }

        let mut flashes = String::new();
        for flash in self.flashes {
            let _ = write!(
                flashes,
                r#"<div class="alert alert-{}">{}</div>"#,
                flash.level.as_str(),
                escape(&flash.message)
            );
        }

        Html(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} | Crop Recommendation</title></head>\n<body>\n<nav>{nav}</nav>\n{flashes}\n<main>\n{body}\n</main>\n</body>\n</html>\n",
            title = escape(title),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    Index,
    About,
    Services,
    Products,
    Blogs,
}

impl StaticPage {
    pub fn title(&self) -> &'static str {
        match self {
            StaticPage::Index => "Home",
            StaticPage::About => "About",
            StaticPage::Services => "Services",
            StaticPage::Products => "Products",
            StaticPage::Blogs => "Blogs",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            StaticPage::Index => {
                r#"<h1>Crop Recommendation System</h1>
<p>Enter your soil nutrients and local climate to find the crop best suited to your field.</p>
<p><a href="/predict">Get a recommendation</a></p>"#
            }
            StaticPage::About => {
                r#"<h1>About</h1>
<p>Recommendations come from a classifier trained on soil and climate measurements for 22 crops.</p>"#
            }
            StaticPage::Services => {
                r#"<h1>Services</h1>
<ul><li>Crop recommendation from soil and weather data</li><li>History of your past recommendations</li></ul>"#
            }
            StaticPage::Products => {
                r#"<h1>Products</h1>
<p>Rice, maize, pulses, fruits, fibres and coffee: the model covers 22 crops.</p>"#
            }
            StaticPage::Blogs => {
                r#"<h1>Blogs</h1>
<p>Notes on soil health and seasonal planning.</p>"#
            }
        }
    }
}

fn input_label(feature: Feature) -> &'static str {
    match feature {
        Feature::Nitrogen => "Nitrogen",
        Feature::Phosphorus => "Phosphorus",
        Feature::Potassium => "Potassium",
        Feature::Temperature => "Temperature (°C)",
        Feature::Humidity => "Humidity (%)",
        Feature::Ph => "pH",
        Feature::Rainfall => "Rainfall (mm)",
    }
}

pub fn predict_body(result: Option<&str>) -> String {
    let mut body = String::from("<h1>Crop Recommendation</h1>\n<form method=\"post\" action=\"/predict\">\n");
    for feature in Feature::ALL {
        let _ = writeln!(
            body,
            r#"<label>{label} <input type="number" step="any" name="{name}" required></label>"#,
            label = escape(input_label(feature)),
            name = feature.form_name(),
        );
    }
    body.push_str("<button type=\"submit\">Get recommendation</button>\n</form>");
    if let Some(result) = result {
        let _ = write!(body, "\n<p class=\"result\">{}</p>", escape(result));
    }
    body
}

fn error_paragraph(error: Option<&str>) -> String {
    error
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape(message)))
        .unwrap_or_default()
}

pub fn contact_body(error: Option<&str>) -> String {
    format!(
        r#"<h1>Contact</h1>
{error}<form method="post" action="/contact">
<label>Name <input name="name" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Subject <input name="subject" required></label>
<label>Message <textarea name="message" required></textarea></label>
<button type="submit">Send</button>
</form>"#,
        error = error_paragraph(error),
    )
}

pub fn signup_body(error: Option<&str>) -> String {
    format!(
        r#"<h1>Sign up</h1>
{error}<form method="post" action="/signup">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<label>Confirm password <input type="password" name="confirm_password" required></label>
<button type="submit">Create account</button>
</form>"#,
        error = error_paragraph(error),
    )
}

pub fn login_body(error: Option<&str>) -> String {
    format!(
        r#"<h1>Log in</h1>
{error}<form method="post" action="/login">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        error = error_paragraph(error),
    )
}
