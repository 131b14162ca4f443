// The single HTML page of the browser UI: an upload tab and a media library
// tab that fetches `/api/media`.

/// Escape text for embedding in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the index page, optionally with a status message above the tabs.
pub fn render_index_html(message: Option<&str>) -> String {
    let message_html = match message {
        Some(text) if !text.is_empty() => format!(r#"<div class="msg">{}</div>"#, escape_html(text)),
        _ => String::new(),
    };
    INDEX_TEMPLATE.replace("{{message}}", &message_html)
}

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="nl">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Floriday Magic Wand UI</title>
  <style>
    body { font-family: sans-serif; margin: 2rem; max-width: 900px; }
    .tabs { display: flex; gap: .5rem; margin-bottom: 1rem; }
    .tab { padding: .6rem 1rem; border: 1px solid #999; border-radius: .4rem; cursor: pointer; }
    .tab.active { background: #1f6feb; color: white; border-color: #1f6feb; }
    .panel { display:none; border:1px solid #ddd; padding:1rem; border-radius:.5rem; }
    .panel.active { display:block; }
    .msg { margin-bottom: 1rem; padding:.6rem; background:#f6f8fa; border:1px solid #d0d7de; border-radius:.4rem; }
    .media-item { border-bottom:1px solid #eee; padding:.5rem 0; }
    pre { white-space: pre-wrap; word-break: break-word; }
  </style>
</head>
<body>
  <h1>Floriday Magic Wand</h1>
  {{message}}

  <div class="tabs">
    <button class="tab active" data-target="upload-panel">Upload &amp; Vrijstaand</button>
    <button class="tab" data-target="media-panel">Beeldbank</button>
  </div>

  <section id="upload-panel" class="panel active">
    <form action="/upload" method="post" enctype="multipart/form-data">
      <p><label>Afbeelding: <input type="file" name="image" accept="image/*" required /></label></p>
      <p><label>Titel (optioneel): <input type="text" name="title" /></label></p>
      <p><button type="submit">Vrijstaand maken + uploaden</button></p>
    </form>
  </section>

  <section id="media-panel" class="panel">
    <p><button id="refresh-media">Vernieuw beeldbank</button></p>
    <div id="media-list">Nog niet geladen.</div>
  </section>

<script>
const tabs = document.querySelectorAll('.tab');
for (const tab of tabs) {
  tab.addEventListener('click', () => {
    tabs.forEach(t => t.classList.remove('active'));
    document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
    tab.classList.add('active');
    document.getElementById(tab.dataset.target).classList.add('active');
  });
}

function escapeHtml(text) {
  const div = document.createElement('div');
  div.textContent = String(text);
  return div.innerHTML;
}

document.getElementById('refresh-media').addEventListener('click', async () => {
  const list = document.getElementById('media-list');
  list.textContent = 'Laden...';
  try {
    const response = await fetch('/api/media');
    const data = await response.json();
    if (!Array.isArray(data) || data.length === 0) {
      list.textContent = data && data.error ? 'Kon beeldbank niet laden: ' + data.error : 'Geen media gevonden.';
      return;
    }
    list.innerHTML = data.map(item => `
      <div class="media-item">
        <strong>${escapeHtml(item.title || item.name || 'Zonder titel')}</strong>
        <pre>${escapeHtml(JSON.stringify(item, null, 2))}</pre>
      </div>
    `).join('');
  } catch (error) {
    list.textContent = 'Kon beeldbank niet laden: ' + error;
  }
});
</script>
</body>
</html>
"#;
