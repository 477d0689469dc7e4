//! # views — HTML rendering
//!
//! Pages are plain `format!` templates wrapped by [`layout`]. Anything that
//! came from a user or the database goes through [`escape`] first.

mod pages;

pub use pages::*;

use axum::response::Html;

use crate::session::Session;

/// What every page needs besides its own body.
#[derive(Debug, Default, Clone)]
pub struct PageContext {
    pub username: Option<String>,
    pub flashes:  Vec<String>,
}

impl PageContext {
    /// Reads the user and drains the flash queue.
    pub async fn load(session: &Session) -> Self {
        Self {
            username: session.user().await.map(|u| u.username),
            flashes:  session.take_flashes().await,
        }
    }
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _    => out.push(ch),
        }
    }
    out
}

pub fn layout(ctx: &PageContext, title: &str, main: &str) -> Html<String> {
    let nav = match &ctx.username {
        Some(username) => format!(
            r#"<ul class="nav">
        <li><a href="/quote">Quote</a></li>
        <li><a href="/buy">Buy</a></li>
        <li><a href="/sell">Sell</a></li>
        <li><a href="/history">History</a></li>
      </ul>
      <ul class="nav right">
        <li class="user">{}</li>
        <li><a href="/logout">Log Out</a></li>
      </ul>"#,
            escape(username)
        ),
        None => r#"<ul class="nav right">
        <li><a href="/register">Register</a></li>
        <li><a href="/login">Log In</a></li>
      </ul>"#
            .to_string(),
    };

    let flashes: String = ctx
        .flashes
        .iter()
        .map(|msg| format!(r#"<div class="flash" role="alert">{}</div>"#, escape(msg)))
        .collect();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="initial-scale=1, width=device-width">
    <title>Finance: {title}</title>
    <style>
      body {{ font-family: system-ui, sans-serif; margin: 0; }}
      header {{ display: flex; justify-content: space-between; align-items: center; padding: 0.5rem 1rem; border-bottom: 1px solid #ddd; }}
      .brand {{ font-weight: bold; text-decoration: none; color: #333; }}
      .nav {{ display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }}
      .flash {{ background: #e7f1ff; border-bottom: 1px solid #b6d4fe; padding: 0.75rem; text-align: center; }}
      main {{ max-width: 960px; margin: 2rem auto; text-align: center; }}
      table {{ margin: 0 auto; border-collapse: collapse; }}
      td, th {{ padding: 0.4rem 0.8rem; border-bottom: 1px solid #eee; }}
      td.num, th.num {{ text-align: right; }}
      form.inline {{ display: inline; }}
      input, select, button {{ margin: 0.25rem; padding: 0.35rem; }}
    </style>
  </head>
  <body>
    <header>
      <a class="brand" href="/">C$50 Finance</a>
      {nav}
    </header>
    {flashes}
    <main>
{main}
    </main>
    <datalist id="symbols"></datalist>
    <script>
      document.querySelectorAll("input[list=symbols]").forEach((input) => {{
        input.addEventListener("input", async () => {{
          const res = await fetch("/symbols?q=" + encodeURIComponent(input.value));
          if (!res.ok) return;
          const list = document.getElementById("symbols");
          list.innerHTML = "";
          for (const item of await res.json()) {{
            const option = document.createElement("option");
            option.value = item.symbol;
            option.textContent = item.name;
            list.appendChild(option);
          }}
        }});
      }});
    </script>
  </body>
</html>
"#,
        title = escape(title),
    ))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
