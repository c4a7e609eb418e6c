//! Server-rendered pages: the input form and the history table.
//!
//! The form is static. Its script fills the selects from `/api/options` and
//! writes results with `textContent`, so nothing user-supplied is parsed as
//! markup. The history table is rendered here and every cell is escaped.

use axum::response::Html;

use crate::config::APP_NAME;
use crate::history::HistoryRecord;

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const HISTORY_COLUMNS: [&str; 8] = [
    "Date",
    "Name",
    "Gender",
    "City",
    "Symptoms",
    "Predicted Disease",
    "Precautions",
    "Doctor",
];

/// Full HTML page listing `records` in the given order.
pub fn render_history_html(records: &[HistoryRecord]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{APP_NAME} - Prediction History</title>\n"));
    html.push_str(HISTORY_STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>Prediction History</h1>\n<p><a href=\"/\">Back to the form</a></p>\n");

    if records.is_empty() {
        html.push_str("<p class=\"empty\">No predictions recorded yet.</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr>");
        for column in HISTORY_COLUMNS {
            html.push_str(&format!("<th>{column}</th>"));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for r in records {
            html.push_str("<tr>");
            for cell in [
                &r.date,
                &r.name,
                &r.gender,
                &r.city,
                &r.symptoms,
                &r.predicted_disease,
                &r.precautions,
                &r.doctor,
            ] {
                html.push_str("<td>");
                html.push_str(&escape_html(cell));
                html.push_str("</td>");
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

const HISTORY_STYLE: &str = r#"<style>
  body { font-family: -apple-system, system-ui, sans-serif; margin: 24px; color: #1f2937; }
  table { border-collapse: collapse; width: 100%; font-size: 14px; }
  th, td { border: 1px solid #d1d5db; padding: 6px 8px; text-align: left; vertical-align: top; }
  th { background: #e0f2fe; }
  tr:nth-child(even) td { background: #f9fafb; }
  .empty { color: #6b7280; }
</style>
"#;

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>MediVision - AI Health Advisor</title>
  <style>
    * { box-sizing: border-box; }
    body { font-family: -apple-system, system-ui, sans-serif; margin: 0; color: #1f2937; background: #f8fafc; }
    .layout { display: flex; gap: 24px; padding: 24px; max-width: 1100px; margin: 0 auto; }
    aside { width: 260px; flex-shrink: 0; background: #fff; border-radius: 8px; padding: 16px; }
    main { flex: 1; background: #fff; border-radius: 8px; padding: 24px; }
    h1 { margin-top: 0; color: #0c4a6e; }
    label { display: block; margin-top: 12px; font-weight: 600; }
    input, select { width: 100%; padding: 8px; margin-top: 4px; border: 1px solid #cbd5e1; border-radius: 4px; }
    select[multiple] { height: 180px; }
    button { margin-top: 16px; padding: 10px 20px; background: #0284c7; color: #fff; border: 0; border-radius: 4px; cursor: pointer; }
    button:disabled { background: #94a3b8; }
    .hidden { display: none; }
    .error { color: #b91c1c; margin-top: 12px; }
    .warning { color: #b45309; margin-top: 12px; }
    #result { margin-top: 24px; border-top: 1px solid #e2e8f0; padding-top: 16px; }
    #download { display: inline-block; margin-top: 12px; }
  </style>
</head>
<body>
<div class="layout">
  <aside>
    <h3>Top Predicted Diseases</h3>
    <ol id="top-diseases"></ol>
    <p><a href="/history">Full history</a></p>
  </aside>
  <main>
    <h1>MediVision - AI Health Advisor</h1>
    <form id="form">
      <label for="name">Full Name</label>
      <input id="name" required>
      <label for="age">Age</label>
      <input id="age" type="number">
      <label for="gender">Gender</label>
      <select id="gender"></select>
      <label for="city">City</label>
      <select id="city"></select>
      <input id="custom-city" class="hidden" placeholder="Enter your city">
      <label for="symptoms">Symptoms</label>
      <select id="symptoms" multiple></select>
      <button id="submit" type="submit">Predict Disease</button>
      <div id="error" class="error"></div>
    </form>
    <section id="result" class="hidden">
      <h2>Predicted Disease: <span id="disease"></span></h2>
      <p>Confidence: <span id="confidence"></span></p>
      <h3>Recommended Precautions</h3>
      <ul id="precautions"></ul>
      <h3>Suggested Doctor</h3>
      <p id="doctor"></p>
      <div id="warning" class="warning"></div>
      <a id="download" href="#">Download Report</a>
    </section>
  </main>
</div>
<script>
  const $ = (id) => document.getElementById(id);

  function fill(select, values) {
    select.replaceChildren();
    for (const v of values) {
      const opt = document.createElement('option');
      opt.value = v;
      opt.textContent = v;
      select.appendChild(opt);
    }
  }

  function fillList(list, items) {
    list.replaceChildren();
    for (const text of items) {
      const li = document.createElement('li');
      li.textContent = text;
      list.appendChild(li);
    }
  }

  async function loadOptions() {
    const res = await fetch('/api/options');
    const opts = await res.json();
    fill($('gender'), opts.genders);
    fill($('city'), opts.cities);
    fill($('symptoms'), opts.symptoms);
    $('age').min = opts.min_age;
    $('age').max = opts.max_age;
    $('age').value = opts.default_age;
  }

  async function loadTopDiseases() {
    const res = await fetch('/api/history/top-diseases?limit=10');
    if (!res.ok) return;
    const rows = await res.json();
    fillList($('top-diseases'), rows.map((r) => r.disease + ' (' + r.count + ')'));
  }

  $('city').addEventListener('change', () => {
    $('custom-city').classList.toggle('hidden', $('city').value !== 'Other');
  });

  $('form').addEventListener('submit', async (e) => {
    e.preventDefault();
    $('error').textContent = '';
    $('result').classList.add('hidden');

    const city = $('city').value === 'Other' ? $('custom-city').value : $('city').value;
    const body = {
      name: $('name').value,
      age: Number($('age').value),
      gender: $('gender').value,
      city: city,
      symptoms: Array.from($('symptoms').selectedOptions).map((o) => o.value),
    };

    $('submit').disabled = true;
    try {
      const res = await fetch('/api/predict', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      const data = await res.json();
      if (!res.ok) {
        $('error').textContent = data.error ? data.error.message : 'Request failed';
        return;
      }
      $('disease').textContent = data.disease;
      $('confidence').textContent = data.confidence_label;
      fillList($('precautions'), data.precautions);
      $('doctor').textContent = data.doctor;
      $('warning').textContent = data.persistence_warning || '';
      $('download').href = 'data:application/pdf;base64,' + data.report.content_base64;
      $('download').download = data.report.filename;
      $('result').classList.remove('hidden');
      loadTopDiseases();
    } catch (err) {
      $('error').textContent = 'Network error: ' + err.message;
    } finally {
      $('submit').disabled = false;
    }
  });

  loadOptions();
  loadTopDiseases();
</script>
</body>
</html>
"##;
