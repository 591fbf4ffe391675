use super::{escape, layout, PageContext};

pub fn render_login(ctx: &PageContext, error: Option<&str>, email: &str) -> String {
    let banner = error
        .map(|message| format!(r#"<div class="banner error" id="login-error">{}</div>"#, escape(message)))
        .unwrap_or_default();

    let body = format!(
        r#"<section id="login">
<div class="narrow card" style="max-width:28rem">
<h1 style="color:#fde047;text-align:center">Admin Login</h1>
<p style="text-align:center;color:#9ca3af">Ristorante Bellagio Management</p>
{banner}
<form method="post" action="/login">
<div class="field">
<label for="email">Email</label>
<input type="email" name="email" id="email" required value="{email}">
</div>
<div class="field">
<label for="password">Password</label>
<input type="password" name="password" id="password" required>
</div>
<button type="submit" class="primary">Log In</button>
</form>
</div>
</section>"#,
        email = escape(email),
    );
    layout(ctx, "Admin Login | Bellagio", &body)
}
