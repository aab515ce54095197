//! Landing page rendered from the registry.

use axum::extract::State;
use axum::response::Html;

use gamehub_registry::GameRegistry;

use crate::state::AppState;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>GameHub</title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<header class="header"><h1>GameHub</h1></header>
<main id="main-content">
"#;

const TAIL: &str = r#"</main>
<script>
async function loadFiles(section) {
  const game = section.dataset.game;
  const list = section.querySelector(".files");
  try {
    const response = await fetch(`/api/files/${encodeURIComponent(game)}?t=${Date.now()}`);
    const data = await response.json();
    list.replaceChildren();
    if (!data.files || data.files.length === 0) {
      list.textContent = "Нет файлов";
      return;
    }
    for (const file of data.files) {
      const item = document.createElement("li");
      const link = document.createElement("a");
      link.href = file.url;
      link.textContent = file.name;
      item.append(link, ` ${file.size_human} · ${file.modified}`);
      list.append(item);
    }
  } catch (e) {
    list.textContent = "Ошибка загрузки";
  }
}
document.querySelectorAll(".game").forEach(loadFiles);
</script>
</body>
</html>
"#;

/// `GET /`
pub(crate) async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render(state.library.registry()))
}

fn render(registry: &GameRegistry) -> String {
    let mut html = String::from(HEAD);
    for game in registry.list_all() {
        let id = escape(&game.id);
        html.push_str(&format!(
            "<section class=\"game\" id=\"{id}\" data-game=\"{id}\">\
             <img src=\"/static/icons/{icon}\" alt=\"{name}\">\
             <h2>{name}</h2><p>{description}</p>\
             <ul class=\"files\" id=\"{id}-files\"></ul></section>\n",
            icon = escape(&game.icon),
            name = escape(&game.name),
            description = escape(&game.description),
        ));
    }
    html.push_str(TAIL);
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
