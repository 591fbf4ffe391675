use chrono_tz::Tz;
use strum::IntoEnumIterator;

use crate::models::dish::{Dish, DishCategory, DishFields};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::services::session::Notice;

use super::{escape, layout, notice_banner, PageContext};

pub const SESSION_EXPIRED: &str = "Authentication required or session expired.";

/// Dashboard tab, selected with `?view=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Reservations,
    Menu,
}

impl AdminTab {
    pub fn from_query(view: Option<&str>) -> Self {
        match view {
            Some("menu") => AdminTab::Menu,
            _ => AdminTab::Reservations,
        }
    }

    pub fn query_value(self) -> &'static str {
        match self {
            AdminTab::Reservations => "reservations",
            AdminTab::Menu => "menu",
        }
    }
}

pub struct DashboardView<'a> {
    pub tab: AdminTab,
    pub reservations: &'a [Reservation],
    pub dishes: &'a [Dish],
    pub notice: Option<&'a Notice>,
    /// Dish loaded into the form for editing.
    pub editing: Option<&'a Dish>,
    /// Zone reservation timestamps are shown in.
    pub timezone: Tz,
}

pub fn render_dashboard(ctx: &PageContext, view: &DashboardView<'_>) -> String {
    let tab_link = |tab: AdminTab, label: String| {
        let active = if tab == view.tab { " active" } else { "" };
        format!(
            r#"<a href="/admin?view={}" class="tab{active}">{label}</a>"#,
            tab.query_value()
        )
    };

    let content = match view.tab {
        AdminTab::Reservations => reservation_table(view.reservations, view.timezone),
        AdminTab::Menu => dish_management(view.dishes, view.editing),
    };

    let body = format!(
        r#"<section id="dashboard" class="container">
<h1 style="color:#fde047">Admin Dashboard - Ristorante Bellagio</h1>
<nav class="tabs">{reservations_tab}{menu_tab}</nav>
{notice}
{content}
</section>"#,
        reservations_tab = tab_link(
            AdminTab::Reservations,
            format!("Reservations ({})", view.reservations.len())
        ),
        menu_tab = tab_link(AdminTab::Menu, format!("Menu Management ({})", view.dishes.len())),
        notice = notice_banner(view.notice),
    );
    layout(ctx, "Admin Dashboard | Bellagio", &body)
}

/// Full-page error shown instead of a partial dashboard.
pub fn render_admin_error(ctx: &PageContext, message: &str) -> String {
    let body = format!(
        r#"<section id="admin-error" class="container" style="text-align:center">
<p class="field-error" style="font-size:1.25rem">ERROR: {}</p>
<p><a href="/login">Go to login</a></p>
</section>"#,
        escape(message)
    );
    layout(ctx, "Error | Bellagio", &body)
}

/// Confirmation step in front of every delete.
pub fn render_confirm_delete(ctx: &PageContext, prompt: &str, action: &str, back: &str) -> String {
    let body = format!(
        r#"<section id="confirm-delete" class="narrow card">
<p style="font-size:1.25rem">{prompt}</p>
<form method="post" action="{action}" class="inline">
<input type="hidden" name="confirm" value="yes">
<button type="submit" class="pill danger" id="confirm-yes">Delete</button>
</form>
<a href="{back}" class="pill" id="confirm-no">Keep</a>
</section>"#,
        prompt = escape(prompt),
        action = escape(action),
        back = escape(back),
    );
    layout(ctx, "Confirm delete | Bellagio", &body)
}

fn status_action(id: &str, status: ReservationStatus, label: &str) -> String {
    format!(
        r#"<form method="post" action="/admin/reservations/{id}/status" class="inline">
<input type="hidden" name="status" value="{status}">
<button type="submit" class="link-button" title="{label} Reservation">{label}</button>
</form>"#,
        id = escape(id),
    )
}

pub fn reservation_table(reservations: &[Reservation], tz: Tz) -> String {
    let rows: String = reservations
        .iter()
        .map(|r| {
            let mut actions = String::new();
            if r.status == ReservationStatus::Pending {
                actions.push_str(&status_action(&r.id, ReservationStatus::Confirmed, "Confirm"));
            }
            if r.status != ReservationStatus::Cancelled {
                actions.push_str(&status_action(&r.id, ReservationStatus::Cancelled, "Cancel"));
            }
            actions.push_str(&format!(
                r#"<a href="/admin/reservations/{}/delete" title="Permanently Delete">Delete</a>"#,
                escape(&r.id)
            ));

            format!(
                r#"<tr class="reservation" data-id="{id}">
<td><div>{date}</div><div style="color:#9ca3af">{time}</div></td>
<td><div>{name}</div><div style="color:#9ca3af">{email}</div></td>
<td>{guests}</td>
<td><span class="badge status-{status}">{status}</span></td>
<td style="text-align:right">{actions}</td>
</tr>"#,
                id = escape(&r.id),
                date = escape(&r.display_date(tz)),
                time = escape(&r.display_time(tz)),
                name = escape(&r.name),
                email = escape(&r.email),
                guests = r.number_of_guests,
                status = r.status,
            )
        })
        .collect();

    let empty = if reservations.is_empty() {
        r#"<div id="reservations-empty" style="padding:1.5rem;text-align:center;color:#6b7280">No reservations found.</div>"#
    } else {
        ""
    };

    format!(
        r#"<div class="card" id="reservations">
<h3 style="color:#fde047">All Reservations</h3>
<table>
<thead><tr><th>Date/Time</th><th>Name/Email</th><th>Guests</th><th>Status</th><th style="text-align:right">Actions</th></tr></thead>
<tbody>{rows}</tbody>
</table>
{empty}
</div>"#
    )
}

pub fn dish_management(dishes: &[Dish], editing: Option<&Dish>) -> String {
    let fields = editing.map(DishFields::from_dish).unwrap_or_default();
    let (heading, action, submit) = match editing {
        Some(dish) => (
            format!("Edit Dish: {}", escape(&dish.name)),
            format!("/admin/dishes/{}", escape(&dish.id)),
            "Save Changes",
        ),
        None => ("Add New Dish".to_string(), "/admin/dishes".to_string(), "Create Dish"),
    };

    let options: String = DishCategory::iter()
        .map(|category| {
            let selected = if category == fields.category { " selected" } else { "" };
            format!(r#"<option value="{category}"{selected}>{category}</option>"#)
        })
        .collect();

    let edit_extras = match editing {
        Some(dish) => {
            let current = dish
                .image_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(|url| {
                    format!(
                        r#"<input type="hidden" name="imageUrl" value="{url}">
<p id="current-image" style="color:#9ca3af;font-size:.85rem">Current path: {url}</p>"#,
                        url = escape(url)
                    )
                })
                .unwrap_or_default();
            format!(r#"{current}<a href="/admin?view=menu" class="pill" id="cancel-edit">Cancel Edit</a>"#)
        }
        None => String::new(),
    };
    let autofocus = if editing.is_some() { " autofocus" } else { "" };

    let list: String = dishes
        .iter()
        .map(|dish| {
            format!(
                r##"<div class="card dish-row" data-id="{id}" style="display:flex;justify-content:space-between;margin-bottom:.75rem">
<div><strong>{name}</strong><p style="color:#9ca3af">{category} | {price} | {availability}</p></div>
<div><a href="/admin?view=menu&amp;edit={id}#dish-form">Edit</a> <a href="/admin/dishes/{id}/delete">Delete</a></div>
</div>"##,
                id = escape(&dish.id),
                name = escape(&dish.name),
                category = escape(&dish.category),
                price = escape(&dish.display_price()),
                availability = if dish.is_available { "Available" } else { "Out of Stock" },
            )
        })
        .collect();
    let list = if dishes.is_empty() {
        r#"<p id="dishes-empty" style="color:#6b7280">No dishes on the menu yet.</p>"#.to_string()
    } else {
        list
    };

    format!(
        r#"<div class="card" id="dish-form">
<h3 style="color:#fde047">{heading}</h3>
<form method="post" action="{action}" enctype="multipart/form-data">
<div class="field"><label for="dish-name">Name</label>
<input type="text" name="name" id="dish-name" required value="{name}"{autofocus}></div>
<div class="field"><label for="dish-price">Price</label>
<input type="number" name="price" id="dish-price" required min="0" step="0.01" value="{price}"></div>
<div class="field"><label for="dish-category">Category</label>
<select name="category" id="dish-category">{options}</select></div>
<div class="field"><label><input type="checkbox" name="isAvailable" value="true"{checked} style="width:auto"> Available for Order</label></div>
<div class="field"><label for="dish-description">Description</label>
<textarea name="description" id="dish-description" rows="3">{description}</textarea></div>
<div class="field"><label for="dishImage">Image</label>
<input type="file" name="dishImage" id="dishImage" accept="image/*"></div>
<button type="submit" class="primary" id="dish-submit">{submit}</button>
{edit_extras}
</form>
</div>
<div class="card" id="dish-list" style="margin-top:2rem">
<h3 style="color:#fde047">Current Menu Items</h3>
{list}
</div>"#,
        name = escape(&fields.name),
        price = if editing.is_some() { format!("{:.2}", fields.price) } else { String::new() },
        checked = if fields.is_available { " checked" } else { "" },
        description = escape(&fields.description),
    )
}
