use chrono::{Days, NaiveDate};

use crate::models::dish::Dish;
use crate::models::reservation::{Field, ReservationDraft, DATE_TIME_INPUT_FORMAT};
use crate::services::reservation_flow::{ReservationWorkflow, SubmissionStatus};
use crate::services::validation::{FieldErrorMap, MAX_GUESTS, MIN_GUESTS};

use super::{escape, layout, PageContext};

pub const MENU_UNAVAILABLE: &str = "Failed to load menu. Please try again later.";
pub const MENU_EMPTY: &str = "The kitchen is preparing new delights! Menu coming soon.";
pub const SENDING: &str = "Sending your request...";
pub const RESERVATION_SUCCESS: &str =
    "Reservation successful! We will confirm your booking via email shortly.";

/// Furthest bookable day, counted from today.
const BOOKING_HORIZON_DAYS: u64 = 90;

/// Result of loading the public menu.
#[derive(Debug, Clone)]
pub enum MenuState {
    Loaded(Vec<Dish>),
    Unavailable,
}

pub struct HomeView<'a> {
    pub menu: &'a MenuState,
    pub reservation: &'a ReservationWorkflow,
    pub image_base_url: &'a str,
    pub today: NaiveDate,
    pub banner_secs: u64,
}

pub fn render_home(ctx: &PageContext, view: &HomeView<'_>) -> String {
    let body = [
        hero(),
        menu_section(view.menu, view.image_base_url),
        reservation_section(view.reservation, view.today, view.banner_secs),
        about(),
    ]
    .concat();
    layout(ctx, "Ristorante Bellagio", &body)
}

fn hero() -> String {
    r##"<section id="hero" class="container" style="text-align:center;padding-top:8rem;padding-bottom:8rem">
<h1 style="font-size:3.5rem;color:#fde047">Ristorante Bellagio</h1>
<p style="font-size:1.25rem;color:#d1d5db">Authentic Italian cuisine in the heart of Rome.</p>
<p><a href="#reservation" class="pill">Book a Table</a> <a href="#menu" class="pill">View Menu</a></p>
</section>"##
        .to_string()
}

fn about() -> String {
    r#"<section id="about" style="text-align:center">
<h3 style="font-size:2rem;color:#fde047">Our Story</h3>
<p class="narrow" style="color:#9ca3af">Founded on the passion for authentic Italian cuisine and the art of fine dining, Bellagio offers an experience that transports you straight to the heart of Tuscany.</p>
</section>"#
        .to_string()
}

pub fn menu_section(menu: &MenuState, image_base_url: &str) -> String {
    let content = match menu {
        MenuState::Unavailable => {
            format!(r#"<p class="field-error" id="menu-error" style="text-align:center">{MENU_UNAVAILABLE}</p>"#)
        }
        MenuState::Loaded(dishes) if dishes.is_empty() => {
            format!(r#"<p id="menu-empty" style="text-align:center;color:#6b7280">{MENU_EMPTY}</p>"#)
        }
        MenuState::Loaded(dishes) => {
            let cards: String = dishes.iter().map(|d| dish_card(d, image_base_url)).collect();
            format!(r#"<div class="grid">{cards}</div>"#)
        }
    };

    format!(
        r#"<section id="menu" class="container">
<h2>Our Exquisite Menu</h2>
<p style="text-align:center;color:#9ca3af">A selection of our finest traditional Italian dishes.</p>
{content}
</section>"#
    )
}

pub fn dish_card(dish: &Dish, image_base_url: &str) -> String {
    let image = dish
        .image_src(image_base_url)
        .map(|src| format!(r#"<img src="{}" alt="{}">"#, escape(&src), escape(&dish.name)))
        .unwrap_or_default();
    let badge = if dish.is_available { "ok" } else { "off" };

    format!(
        r#"<article class="card dish">
{image}
<span class="badge {badge}">{availability}</span>
<h3>{name}</h3>
<p style="color:#9ca3af">{description}</p>
<div style="display:flex;justify-content:space-between;align-items:center">
<span class="price">{price}</span>
<span class="category" style="color:#34d399">{category}</span>
</div>
</article>"#,
        availability = dish.availability_label(),
        name = escape(&dish.name),
        description = escape(&dish.description),
        price = escape(&dish.display_price()),
        category = escape(&dish.category),
    )
}

/// Banner above the form for the current submission status.
pub fn status_banner(status: &SubmissionStatus, banner_secs: u64) -> String {
    let dismiss = banner_secs * 1000;
    match status {
        SubmissionStatus::Idle | SubmissionStatus::Validating => String::new(),
        SubmissionStatus::Submitting => {
            format!(r#"<div class="banner pending" id="reservation-status">{SENDING}</div>"#)
        }
        SubmissionStatus::Succeeded => format!(
            r#"<div class="banner success" id="reservation-status" data-dismiss-after="{dismiss}">{RESERVATION_SUCCESS}</div>"#
        ),
        SubmissionStatus::Failed(message) => format!(
            r#"<div class="banner error" id="reservation-status" data-dismiss-after="{dismiss}">Error: {}</div>"#,
            escape(message)
        ),
    }
}

fn field_error(errors: &FieldErrorMap, field: Field) -> String {
    errors
        .get(field)
        .map(|message| {
            format!(
                r#"<p class="field-error" id="{field}-error">{}</p>"#,
                escape(message)
            )
        })
        .unwrap_or_default()
}

fn invalid_class(errors: &FieldErrorMap, field: Field) -> &'static str {
    if errors.contains(field) {
        "invalid"
    } else {
        ""
    }
}

pub fn reservation_section(flow: &ReservationWorkflow, today: NaiveDate, banner_secs: u64) -> String {
    let draft: &ReservationDraft = flow.draft();
    let errors = flow.errors();
    let submitting = flow.is_submitting();

    let value = |field: Field| escape(&draft.input_value(field));
    let min_date = today.and_hms_opt(0, 0, 0).map(|d| d.format(DATE_TIME_INPUT_FORMAT).to_string());
    let max_date = today
        .checked_add_days(Days::new(BOOKING_HORIZON_DAYS))
        .and_then(|d| d.and_hms_opt(23, 0, 0))
        .map(|d| d.format(DATE_TIME_INPUT_FORMAT).to_string());

    format!(
        r#"<section id="reservation">
<div class="narrow">
<h2>Book Your Table</h2>
<p style="text-align:center;color:#9ca3af">Secure your place for an unforgettable dining experience.</p>
{banner}
<form method="post" action="/reservations" novalidate>
<div class="field">
<label for="name">Full Name (Required)</label>
<input type="text" name="name" id="name" required value="{name}" class="{name_class}">
{name_error}
</div>
<div class="field">
<label for="email">Email (Required)</label>
<input type="email" name="email" id="email" required value="{email}" class="{email_class}">
{email_error}
</div>
<div class="field">
<label for="phone">Phone (Optional)</label>
<input type="tel" name="phone" id="phone" value="{phone}">
</div>
<div class="field">
<label for="dateTime">Date &amp; Time (Required)</label>
<input type="datetime-local" name="dateTime" id="dateTime" required step="1800" min="{min_date}" max="{max_date}" value="{date_time}" class="{date_class}">
{date_error}
</div>
<div class="field">
<label for="guests">Guests (Required)</label>
<input type="number" name="guests" id="guests" required min="{MIN_GUESTS}" max="{MAX_GUESTS}" value="{guests}" class="{guests_class}">
{guests_error}
</div>
<div class="field">
<label for="message">Special Requests (Optional)</label>
<textarea name="message" id="message" rows="3">{message}</textarea>
</div>
<button type="submit" class="primary" id="reservation-submit"{disabled}>{button}</button>
</form>
</div>
</section>"#,
        banner = status_banner(flow.status(), banner_secs),
        name = value(Field::Name),
        name_class = invalid_class(errors, Field::Name),
        name_error = field_error(errors, Field::Name),
        email = value(Field::Email),
        email_class = invalid_class(errors, Field::Email),
        email_error = field_error(errors, Field::Email),
        phone = value(Field::Phone),
        min_date = min_date.unwrap_or_default(),
        max_date = max_date.unwrap_or_default(),
        date_time = value(Field::DateTime),
        date_class = invalid_class(errors, Field::DateTime),
        date_error = field_error(errors, Field::DateTime),
        guests = value(Field::Guests),
        guests_class = invalid_class(errors, Field::Guests),
        guests_error = field_error(errors, Field::Guests),
        message = value(Field::Message),
        disabled = if submitting { " disabled" } else { "" },
        button = if submitting { "Processing..." } else { "Confirm Reservation" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::AuthState;
    use crate::services::validation::NAME_REQUIRED;
    use chrono::{Duration, NaiveDateTime};
    use scraper::{Html, Selector};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn dish(name: &str, available: bool) -> Dish {
        Dish {
            id: format!("id-{name}"),
            name: name.to_string(),
            description: "Fresh".to_string(),
            price: 12.5,
            is_available: available,
            category: "Main Course".to_string(),
            image_url: None,
        }
    }

    fn select<'a>(doc: &'a Html, css: &str) -> Vec<scraper::ElementRef<'a>> {
        let selector = Selector::parse(css).unwrap();
        doc.select(&selector).collect()
    }

    #[test]
    fn test_menu_states() {
        let doc = Html::parse_fragment(&menu_section(&MenuState::Unavailable, ""));
        assert_eq!(select(&doc, "#menu-error").len(), 1);

        let doc = Html::parse_fragment(&menu_section(&MenuState::Loaded(vec![]), ""));
        assert_eq!(select(&doc, "#menu-empty").len(), 1);

        let menu = MenuState::Loaded(vec![dish("Lasagna", true), dish("Gelato", false)]);
        let doc = Html::parse_fragment(&menu_section(&menu, ""));
        let cards = select(&doc, "article.dish");
        assert_eq!(cards.len(), 2);
        let text: String = cards[1].text().collect();
        assert!(text.contains("Sold Out"));
        assert!(text.contains("$12.50"));
    }

    #[test]
    fn test_form_shows_field_errors_inline() {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, Duration::seconds(3));
        flow.begin_submit(noon());

        let html = reservation_section(&flow, noon().date(), 3);
        let doc = Html::parse_fragment(&html);
        let name_error = select(&doc, "#name-error");
        assert_eq!(name_error.len(), 1);
        assert_eq!(name_error[0].text().collect::<String>(), NAME_REQUIRED);
        assert_eq!(select(&doc, "#phone-error").len(), 0);
        assert_eq!(select(&doc, "input.invalid").len(), 2);

        let banner = select(&doc, "#reservation-status");
        assert_eq!(banner[0].value().attr("data-dismiss-after"), Some("3000"));
    }

    #[test]
    fn test_submit_button_disabled_while_submitting() {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, Duration::seconds(3));
        flow.edit(Field::Name, "Ana", noon());
        flow.edit(Field::Email, "ana@example.com", noon());
        flow.begin_submit(noon());

        let doc = Html::parse_fragment(&reservation_section(&flow, noon().date(), 3));
        let button = select(&doc, "#reservation-submit");
        assert!(button[0].value().attr("disabled").is_some());
        assert_eq!(button[0].text().collect::<String>(), "Processing...");
        assert_eq!(select(&doc, "#reservation-status")[0].text().collect::<String>(), SENDING);
    }

    #[test]
    fn test_draft_values_are_escaped() {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, Duration::seconds(3));
        flow.edit(Field::Name, r#""><script>"#, noon());
        let html = reservation_section(&flow, noon().date(), 3);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_home_page_has_all_sections() {
        let flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, Duration::seconds(3));
        let menu = MenuState::Loaded(vec![]);
        let view = HomeView {
            menu: &menu,
            reservation: &flow,
            image_base_url: "",
            today: noon().date(),
            banner_secs: 3,
        };
        let ctx = PageContext { auth: AuthState::LoggedOut, year: 2026 };
        let doc = Html::parse_document(&render_home(&ctx, &view));
        for id in ["#hero", "#menu", "#reservation", "#about"] {
            assert_eq!(select(&doc, id).len(), 1, "missing {id}");
        }
        assert!(doc.root_element().text().any(|t| t.contains("2026 | Italian Elegance")));
    }
}
