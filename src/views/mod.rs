//! Server-rendered HTML.
//!
//! Every view is a pure function from already-fetched state to markup; no
//! view performs I/O or owns business state. All interpolated text goes
//! through [`escape`].

pub mod admin;
pub mod home;
pub mod login;

use chrono::{Datelike, Local};

use crate::models::auth::AuthState;
use crate::services::session::{Notice, NoticeTone};

/// Inputs shared by every page: who is looking and the footer year.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub auth: AuthState,
    pub year: i32,
}

impl PageContext {
    pub fn new(auth: AuthState) -> Self {
        Self { auth, year: Local::now().year() }
    }
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
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

const STYLES: &str = r#"
body{margin:0;background:#111827;color:#f9fafb;font-family:Georgia,serif}
a{color:#34d399}
.nav{position:fixed;top:0;width:100%;display:flex;justify-content:space-between;align-items:center;padding:1rem 1.5rem;background:rgba(17,24,39,.9);box-sizing:border-box;z-index:30}
.brand{font-size:1.75rem;color:#fde047;font-weight:bold;letter-spacing:.2em;text-decoration:none}
.nav-links{display:flex;gap:1rem;align-items:center}
.pill{font-size:.85rem;padding:.25rem .75rem;border-radius:999px;background:#047857;color:#fef9c3;border:0;cursor:pointer;text-decoration:none}
.pill.danger{background:#b91c1c;color:#fff}
main{padding-top:4.5rem}
section{padding:4rem 1.5rem}
.container{max-width:72rem;margin:0 auto}
.narrow{max-width:42rem;margin:0 auto}
h2{font-size:2.5rem;color:#fde047;text-align:center}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:2rem}
.card{background:#1f2937;padding:1.5rem;border-radius:.75rem}
.card img{width:100%;height:10rem;object-fit:cover;border-radius:.5rem}
.badge{font-size:.7rem;text-transform:uppercase;padding:.25rem .75rem;border-radius:999px}
.badge.ok{background:#059669}.badge.off{background:#b91c1c}
.price{font-size:1.75rem;color:#fde047;font-weight:bold}
label{display:block;font-size:.85rem;color:#d1d5db}
input,select,textarea{width:100%;padding:.75rem;margin-top:.25rem;background:#1f2937;border:1px solid #374151;color:#fef9c3;border-radius:.375rem;box-sizing:border-box}
input.invalid,textarea.invalid{border-color:#ef4444}
.field{margin-bottom:1.25rem}
.field-error{color:#f87171;font-size:.85rem;margin-top:.25rem}
.banner{padding:1rem;margin-bottom:1rem;text-align:center;border-radius:.5rem}
.banner.pending{color:#34d399;border:1px solid #34d399}
.banner.success{background:#059669}
.banner.error{color:#ef4444;border:1px solid #ef4444}
button.primary{width:100%;padding:.75rem;background:#059669;color:#fff;border:0;border-radius:.5rem;text-transform:uppercase;letter-spacing:.1em;cursor:pointer}
button.primary:disabled{opacity:.5;cursor:not-allowed}
table{width:100%;border-collapse:collapse}
th,td{padding:.75rem 1rem;text-align:left;border-bottom:1px solid #1f2937}
.tabs{display:flex;gap:1rem;border-bottom:1px solid #374151;margin-bottom:2rem}
.tab{padding:.5rem 1rem;color:#9ca3af;text-decoration:none}
.tab.active{color:#34d399;border-bottom:2px solid #34d399}
.status-Pending{background:#ca8a04;color:#111827}.status-Confirmed{background:#059669}.status-Cancelled{background:#b91c1c}
.inline{display:inline}
.link-button{background:none;border:0;color:#34d399;cursor:pointer;font:inherit}
footer{border-top:1px solid #1f2937;padding:3rem 1.5rem;color:#6b7280}
"#;

/// Clears a field's inline error as soon as it is edited and dismisses
/// timed banners.
const SCRIPT: &str = r#"
document.querySelectorAll('form [name]').forEach(function(el){
  el.addEventListener('input',function(){
    var err=document.getElementById(el.name+'-error');
    if(err){err.remove();}
    el.classList.remove('invalid');
  });
});
document.querySelectorAll('[data-dismiss-after]').forEach(function(el){
  setTimeout(function(){el.remove();},parseInt(el.dataset.dismissAfter,10));
});
"#;

/// Wrap a page body in the site chrome.
pub fn layout(ctx: &PageContext, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLES}</style>
</head>
<body>
{nav}
<main>
{body}
</main>
{footer}
<script>{SCRIPT}</script>
</body>
</html>"#,
        title = escape(title),
        nav = navbar(&ctx.auth),
        footer = footer(ctx.year),
    )
}

/// Top navigation; admin links depend on the login state.
pub fn navbar(auth: &AuthState) -> String {
    let admin_links = if auth.is_logged_in() {
        r#"<a href="/admin" class="pill" id="nav-dashboard">Dashboard</a>
<form method="post" action="/logout" class="inline"><button type="submit" class="pill danger" id="nav-logout">Logout</button></form>"#
    } else {
        r#"<a href="/login" class="pill" id="nav-login">Admin Login</a>"#
    };

    format!(
        r#"<nav class="nav">
<a href="/" class="brand">Bellagio</a>
<div class="nav-links">
<a href="/">Home</a>
{admin_links}
</div>
</nav>"#
    )
}

pub fn footer(year: i32) -> String {
    format!(
        r#"<footer>
<div class="container grid">
<div>
<h4>Ristorante Bellagio</h4>
<p>&copy; {year} | Italian Elegance</p>
<p>Made with passion and Rust.</p>
</div>
<div>
<h4>Contact Info</h4>
<p>123 Via Roma, 00100 Rome, Italy</p>
<p>Phone: +39 06 1234 5678</p>
</div>
<div>
<h4>Working Hours</h4>
<p>Monday - Friday: 11:00 AM - 11:00 PM</p>
<p>Saturday: 12:00 PM - 12:00 AM</p>
<p>Sunday: Closed</p>
</div>
</div>
</footer>"#
    )
}

/// Flash banner for an admin notice.
pub fn notice_banner(notice: Option<&Notice>) -> String {
    match notice {
        Some(notice) => {
            let tone = match notice.tone {
                NoticeTone::Success => "success",
                NoticeTone::Error => "error",
            };
            format!(
                r#"<div class="banner {tone}" id="notice">{}</div>"#,
                escape(&notice.text)
            )
        }
        None => String::new(),
    }
}
