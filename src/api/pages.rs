//! Front desk HTML pages: sign-in form and confirmation

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{error::AppError, models::visitor::Visitor};

/// Fields posted by the sign-in form
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorForm {
    pub full_name: Option<String>,
    pub age: Option<String>,
    pub date_of_visit: Option<String>,
    pub time_of_visit: Option<String>,
    pub assistant_full_name: Option<String>,
    pub comments: Option<String>,
}

impl VisitorForm {
    /// Convert form strings to the JSON shape the visitors service expects.
    ///
    /// A non-numeric age is passed on as text so that validation reports it;
    /// blank comments are dropped so the default applies.
    pub fn into_visitor_data(self) -> Value {
        let mut data = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                data.insert(key.to_string(), value);
            }
        };

        put("name", self.full_name.map(Value::from));
        put(
            "age",
            self.age.map(|age| match age.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::from(age),
            }),
        );
        put("dateOfVisit", self.date_of_visit.map(Value::from));
        put("timeOfVisit", self.time_of_visit.map(Value::from));
        put("assistorName", self.assistant_full_name.map(Value::from));
        put(
            "comments",
            self.comments
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .map(Value::from),
        );

        Value::Object(data)
    }
}

/// Sign-in form
pub async fn new_visitor_form() -> Html<&'static str> {
    Html(include_str!("../../public/index.html"))
}

/// Handle a form submission and render the outcome
pub async fn thank_you(
    State(state): State<crate::AppState>,
    form: Result<Form<VisitorForm>, FormRejection>,
) -> Response {
    let data = match form {
        Ok(Form(form)) => form.into_visitor_data(),
        Err(rejection) => return render_error(AppError::from(rejection)),
    };

    match state.services.visitors.add_visitor(&data).await {
        Ok(visitor) => (StatusCode::OK, Html(render_thank_you(&visitor))).into_response(),
        Err(e) => render_error(e),
    }
}

fn render_error(error: AppError) -> Response {
    let status = error.status_code();
    let body = format!(
        r#"{head}
  <main class="card error">
    <h1>Sign-in failed</h1>
    <p>{message}</p>
    <a href="/new_visitor">Back to the form</a>
  </main>
</body>
</html>"#,
        head = page_head("Sign-in failed"),
        message = escape_html(&error.public_message()),
    );
    (status, Html(body)).into_response()
}

fn render_thank_you(visitor: &Visitor) -> String {
    let rows = [
        ("Visitor number", visitor.id.to_string()),
        ("Name", visitor.name.clone()),
        ("Age", visitor.age.to_string()),
        ("Date of visit", visitor.date_of_visit.format("%Y-%m-%d").to_string()),
        ("Time of visit", visitor.time_of_visit.format("%H:%M").to_string()),
        ("Assisted by", visitor.assistor_name.clone()),
        ("Comments", visitor.comments.clone().unwrap_or_default()),
    ]
    .iter()
    .map(|(label, value)| {
        format!(
            "      <tr><th>{}</th><td>{}</td></tr>",
            label,
            escape_html(value)
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        r#"{head}
  <main class="card">
    <h1>Thank you, {name}!</h1>
    <p>Your visit has been recorded.</p>
    <table>
{rows}
    </table>
    <a href="/new_visitor">Sign in another visitor</a>
  </main>
</body>
</html>"#,
        head = page_head("Thank you"),
        name = escape_html(&visitor.name),
        rows = rows,
    )
}

fn page_head(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{}</title>
  <link rel="stylesheet" href="/styles.css">
</head>
<body>"#,
        title
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
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
