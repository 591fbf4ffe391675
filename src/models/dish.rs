use garde::Validate;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Name of the multipart file part the backend's upload handler reads.
pub const IMAGE_PART: &str = "dishImage";

/// Menu categories offered by the admin form.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "title_case")]
pub enum DishCategory {
    Appetizer,
    #[default]
    MainCourse,
    Dessert,
    Beverage,
}

/// A dish as served by `GET /api/dishes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(rename = "isAvailable", default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

fn default_available() -> bool {
    true
}

impl Dish {
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    pub fn availability_label(&self) -> &'static str {
        if self.is_available {
            "Available"
        } else {
            "Sold Out"
        }
    }

    /// Absolute image URL, when the dish has one.
    pub fn image_src(&self, image_base_url: &str) -> Option<String> {
        let path = self.image_url.as_deref().filter(|p| !p.is_empty())?;
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        Some(format!(
            "{}/{}",
            image_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

/// Editable fields of the admin dish form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct DishFields {
    #[garde(length(min = 1, max = 120))]
    pub name: String,

    #[garde(length(max = 1000))]
    pub description: String,

    #[garde(custom(valid_price))]
    pub price: f64,

    #[garde(skip)]
    pub category: DishCategory,

    #[garde(skip)]
    pub is_available: bool,

    /// Existing image path, resent on edits that don't upload a new file.
    #[garde(skip)]
    pub image_url: Option<String>,
}

fn valid_price(value: &f64, _ctx: &()) -> garde::Result {
    if !value.is_finite() || *value < 0.0 {
        return Err(garde::Error::new("price must be a non-negative amount"));
    }
    Ok(())
}

impl Default for DishFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: 0.0,
            category: DishCategory::default(),
            is_available: true,
            image_url: None,
        }
    }
}

impl DishFields {
    /// Pre-fill the form from an existing dish.
    pub fn from_dish(dish: &Dish) -> Self {
        Self {
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price,
            category: dish.category.parse().unwrap_or_default(),
            is_available: dish.is_available,
            image_url: dish.image_url.clone(),
        }
    }
}

/// An uploaded dish photo.
#[derive(Clone, PartialEq)]
pub struct ImageBlob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Uploaded file is not a supported image.")]
pub struct UnsupportedImage(#[from] image::ImageError);

impl ImageBlob {
    /// Sniff the format from the bytes; the browser-supplied content type is not trusted.
    pub fn sniff(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UnsupportedImage> {
        let format = image::guess_format(&bytes)?;
        Ok(Self {
            file_name: file_name.into(),
            content_type: format.to_mime_type().to_string(),
            bytes,
        })
    }
}

/// Body of `POST /api/dishes` and `PUT /api/dishes/:id`.
#[derive(Debug, Clone, PartialEq)]
pub struct DishWritePayload {
    pub fields: DishFields,
    pub image: Option<ImageBlob>,
}

impl DishWritePayload {
    /// Text parts in the order they are sent.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let fields = &self.fields;
        let mut parts = vec![
            ("name", fields.name.clone()),
            ("description", fields.description.clone()),
            ("price", fields.price.to_string()),
            ("category", fields.category.to_string()),
            ("isAvailable", fields.is_available.to_string()),
        ];
        if self.image.is_none() {
            if let Some(url) = fields.image_url.as_ref().filter(|u| !u.is_empty()) {
                parts.push(("imageUrl", url.clone()));
            }
        }
        parts
    }

    pub fn to_multipart(&self) -> reqwest::Result<Form> {
        let mut form = self
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        if let Some(image) = &self.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part(IMAGE_PART, part);
        }
        Ok(form)
    }
}
