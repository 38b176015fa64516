//! HTML rendering of the prediction form and its result card.

use std::fmt::Write;

use pipeline::{Category, Region, Sex, Smoker};
use serde::Deserialize;

use crate::currency::format_usd;

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; background: #f6f9fc; color: #1e1e1e; }
@media (prefers-color-scheme: dark) { body { background: #0e1117; color: #f5f5f5; } .card { background: #161b22; } }
main { max-width: 720px; margin: 4rem auto; padding: 0 1rem; }
h2, .subtitle { text-align: center; }
.columns { display: flex; gap: 2rem; }
.columns > div { flex: 1; display: flex; flex-direction: column; gap: .5rem; }
input, select { padding: .4rem; font-size: 1rem; }
button { margin-top: 1.5rem; border-radius: 10px; font-size: 18px; padding: 10px 20px; }
.card { background: #fff; padding: 25px; border-radius: 18px; text-align: center; margin-top: 20px; box-shadow: 0 4px 12px rgba(0,0,0,.1); }
.amount { font-size: 30px; font-weight: 700; }
.error { color: #b42318; }
";

/// The form fields exactly as submitted, kept as text so the page can be
/// re-rendered with the user's values whatever they contain.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormInput {
    pub age: String,
    pub bmi: String,
    pub children: String,
    pub sex: String,
    pub smoker: String,
    pub region: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            age: "0".into(),
            bmi: "10.0".into(),
            children: "0".into(),
            sex: Sex::ALL[0].label().into(),
            smoker: Smoker::ALL[0].label().into(),
            region: Region::ALL[0].label().into(),
        }
    }
}

/// What to show under the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `awaiting_input`: nothing has been submitted yet.
    Pending,
    /// `computed`: the estimated annual charge.
    Estimate(f64),
    /// The submission was rejected.
    Rejected(String),
}

/// Renders the whole page.
///
/// # Arguments
/// * `input` - The values to pre-fill the form with.
/// * `outcome` - The card to show under the form.
///
/// # Returns
/// A complete HTML document.
pub fn render_page(input: &FormInput, outcome: &Outcome) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Medical Insurance Predictor</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<main>\n");
    html.push_str("<h2>Medical Insurance Cost Predictor</h2>\n");
    html.push_str(
        "<p class=\"subtitle\">Predict your yearly medical insurance cost instantly.</p>\n",
    );

    html.push_str("<form method=\"post\" action=\"/\">\n<div class=\"columns\">\n<div>\n");
    number_input(&mut html, "age", "Age", &input.age, "0", "100", "1");
    number_input(&mut html, "bmi", "BMI", &input.bmi, "10.0", "60.0", "0.1");
    number_input(&mut html, "children", "Children", &input.children, "0", "10", "1");
    html.push_str("</div>\n<div>\n");
    select::<Sex>(&mut html, "Gender", &input.sex);
    select::<Smoker>(&mut html, "Smoker", &input.smoker);
    select::<Region>(&mut html, "Region", &input.region);
    html.push_str("</div>\n</div>\n");
    html.push_str("<button type=\"submit\">Predict Insurance Cost</button>\n</form>\n");

    match outcome {
        Outcome::Pending => {}
        Outcome::Estimate(amount) => {
            let _ = write!(
                html,
                "<div class=\"card\">\n<h3>Estimated Annual Charge</h3>\n\
                 <p class=\"amount\">{}</p>\n</div>\n",
                escape(&format_usd(*amount))
            );
        }
        Outcome::Rejected(msg) => {
            let _ = write!(
                html,
                "<div class=\"card error\">\n<h3>Cannot estimate</h3>\n<p>{}</p>\n</div>\n",
                escape(msg)
            );
        }
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn number_input(
    html: &mut String,
    name: &str,
    label: &str,
    value: &str,
    min: &str,
    max: &str,
    step: &str,
) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" value=\"{}\" \
         min=\"{min}\" max=\"{max}\" step=\"{step}\" required>\n",
        escape(value)
    );
}

fn select<C: Category>(html: &mut String, label: &str, selected: &str) {
    let name = C::FIELD;
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n"
    );
    for option in C::ALL {
        let value = option.label();
        let attr = if value == selected { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{value}\"{attr}>{value}</option>");
    }
    html.push_str("</select>\n");
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_page_has_no_result_card() {
        let html = render_page(&FormInput::default(), &Outcome::Pending);

        assert!(html.contains("<form method=\"post\""));
        assert!(!html.contains("class=\"card"));
        assert!(!html.contains("Estimated Annual Charge"));
    }

    #[test]
    fn default_form_selects_first_options() {
        let html = render_page(&FormInput::default(), &Outcome::Pending);

        assert!(html.contains("<option value=\"male\" selected>"));
        assert!(html.contains("<option value=\"yes\" selected>"));
        assert!(html.contains("<option value=\"northeast\" selected>"));
        assert!(html.contains("name=\"bmi\" value=\"10.0\" min=\"10.0\" max=\"60.0\" step=\"0.1\""));
    }

    #[test]
    fn estimate_is_rendered_as_currency() {
        let html = render_page(&FormInput::default(), &Outcome::Estimate(4449.462));

        assert!(html.contains("Estimated Annual Charge"));
        assert!(html.contains("<p class=\"amount\">$4,449.46</p>"));
    }

    #[test]
    fn submitted_values_stay_selected() {
        let input = FormInput {
            age: "52".into(),
            bmi: "30.8".into(),
            children: "3".into(),
            sex: "female".into(),
            smoker: "no".into(),
            region: "southwest".into(),
        };

        let html = render_page(&input, &Outcome::Estimate(1.0));

        assert!(html.contains("name=\"age\" value=\"52\""));
        assert!(html.contains("<option value=\"female\" selected>"));
        assert!(html.contains("<option value=\"male\">"));
        assert!(html.contains("<option value=\"no\" selected>"));
        assert!(html.contains("<option value=\"southwest\" selected>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let input = FormInput {
            age: "\"><script>".into(),
            ..FormInput::default()
        };

        let html = render_page(&input, &Outcome::Rejected("bad <b>region</b>".into()));

        assert!(!html.contains("<script>"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("bad &lt;b&gt;region&lt;/b&gt;"));
    }
}
