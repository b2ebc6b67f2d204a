//! The prediction form
//!
//! Categorical inputs are rendered as drop-downs straight from the shared
//! vocabulary, so the page can only offer values the encoder knows.

use salescast_core::validation::FieldKind;
use salescast_core::Field;

const STYLE: &str = r#"
        body {
            font-family: Arial, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            padding: 20px;
            background: #f5f5f5;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #4CAF50;
            padding-bottom: 10px;
        }
        label { display: block; margin-top: 12px; font-weight: bold; }
        input, select { width: 100%; padding: 6px; margin-top: 4px; }
        button { margin-top: 20px; padding: 10px 24px; background: #4CAF50; color: white; border: none; }
        #result { margin-top: 20px; font-size: 1.3em; }
        .error { color: #b00020; font-size: 0.8em; }
"#;

const SCRIPT: &str = r#"
        document.getElementById('predict-form').addEventListener('submit', async (event) => {
            event.preventDefault();
            const body = new URLSearchParams(new FormData(event.target));
            const out = document.getElementById('result');
            out.textContent = 'Predicting...';
            try {
                const resp = await fetch('/predict', { method: 'POST', body });
                const data = await resp.json();
                if (data.success) {
                    out.innerHTML = 'Predicted sales: <strong>' + data.formatted_prediction + '</strong>';
                } else {
                    const details = Array.isArray(data.details) ? data.details : [data.details];
                    out.innerHTML = '<div class="error">' + data.error + '<ul>' +
                        details.map(d => '<li>' + d + '</li>').join('') + '</ul></div>';
                }
            } catch (err) {
                out.innerHTML = '<div class="error">Request failed: ' + err + '</div>';
            }
        });
"#;

fn render_input(html: &mut String, field: Field) {
    let key = field.key();
    html.push_str(&format!(
        "            <label for=\"{key}\">{}</label>\n",
        field.title()
    ));
    let input = match field.kind() {
        FieldKind::Categorical(feature) => {
            let options: String = feature
                .values()
                .iter()
                .map(|value| format!("                <option value=\"{value}\">{value}</option>\n"))
                .collect();
            format!(
                "            <select id=\"{key}\" name=\"{key}\" required>\n{options}            </select>\n"
            )
        }
        FieldKind::Text => {
            format!("            <input id=\"{key}\" name=\"{key}\" type=\"text\" required>\n")
        }
        FieldKind::Number(_) => format!(
            "            <input id=\"{key}\" name=\"{key}\" type=\"number\" step=\"any\" required>\n"
        ),
        FieldKind::Integer(_) => format!(
            "            <input id=\"{key}\" name=\"{key}\" type=\"number\" step=\"1\" required>\n"
        ),
    };
    html.push_str(&input);
}

/// Full HTML document for `GET /`
pub fn render_form() -> String {
    let mut inputs = String::new();
    for field in Field::ALL {
        render_input(&mut inputs, field);
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>SalesCast</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
        <h1>Item Outlet Sales Prediction</h1>
        <form id="predict-form">
{inputs}            <button type="submit">Predict</button>
        </form>
        <div id="result"></div>
    </div>
    <script>{SCRIPT}</script>
</body>
</html>
"#
    )
}
