//! The persisted profile configuration record.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::palette::ThemeColor;
use super::service::Service;
use crate::error::{AdminError, Result};
use crate::gallery::{DEFAULT_PROFILE_IMAGE, HERO_GALLERY};

/// The single configuration record describing the public profile.
///
/// Updates always replace the whole record; see [`crate::store::ConfigStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub professional_name: String,
    pub slogan: String,
    pub phone: String,
    pub location_text: String,
    pub instagram_url: String,
    pub theme_color: ThemeColor,
    pub profile_image: String,
    pub hero_image: String,
    pub is_onboarded: bool,
    pub services: Vec<Service>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            professional_name: "Your Name".to_string(),
            slogan: "Train smarter, live stronger".to_string(),
            phone: String::new(),
            location_text: "Your city".to_string(),
            instagram_url: String::new(),
            theme_color: ThemeColor::Orange,
            profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
            hero_image: HERO_GALLERY[0].full.to_string(),
            is_onboarded: false,
            services: default_services(),
        }
    }
}

fn default_services() -> Vec<Service> {
    let sample = |id: &str, title: &str, tag: &str, duration: &str, image: &str, popular| {
        Service {
            id: id.to_string(),
            title: title.to_string(),
            tag: tag.to_string(),
            duration: duration.to_string(),
            image: image.to_string(),
            popular,
            details: std::collections::BTreeMap::new(),
        }
    };
    vec![
        sample(
            "personal",
            "Personal Training",
            "1:1",
            "60 min",
            HERO_GALLERY[2].thumb,
            true,
        ),
        sample(
            "online",
            "Online Coaching",
            "Remote",
            "4 weeks",
            HERO_GALLERY[1].thumb,
            false,
        ),
        sample(
            "group",
            "Small Group Class",
            "Group",
            "45 min",
            HERO_GALLERY[3].thumb,
            false,
        ),
    ]
}

impl AppConfig {
    /// Current value of a scalar field, rendered as text.
    #[must_use]
    pub fn field(&self, field: Field) -> String {
        match field {
            Field::ProfessionalName => self.professional_name.clone(),
            Field::Slogan => self.slogan.clone(),
            Field::Phone => self.phone.clone(),
            Field::LocationText => self.location_text.clone(),
            Field::InstagramUrl => self.instagram_url.clone(),
            Field::ThemeColor => self.theme_color.to_string(),
        }
    }

    /// Set a scalar field from text. Returns whether the value changed.
    ///
    /// The theme color must parse into the palette; the record is left
    /// untouched otherwise.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<bool> {
        let slot = match field {
            Field::ThemeColor => {
                let color: ThemeColor = value.parse()?;
                let changed = self.theme_color != color;
                self.theme_color = color;
                return Ok(changed);
            }
            Field::ProfessionalName => &mut self.professional_name,
            Field::Slogan => &mut self.slogan,
            Field::Phone => &mut self.phone,
            Field::LocationText => &mut self.location_text,
            Field::InstagramUrl => &mut self.instagram_url,
        };
        if slot == value {
            return Ok(false);
        }
        value.clone_into(slot);
        Ok(true)
    }

    /// Image stored in the given slot.
    #[must_use]
    pub fn image(&self, slot: ImageSlot) -> &str {
        match slot {
            ImageSlot::Profile => &self.profile_image,
            ImageSlot::Hero => &self.hero_image,
        }
    }

    /// Mutable access to the image stored in the given slot.
    pub fn image_mut(&mut self, slot: ImageSlot) -> &mut String {
        match slot {
            ImageSlot::Profile => &mut self.profile_image,
            ImageSlot::Hero => &mut self.hero_image,
        }
    }

    /// Look up a service by id.
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// First word of the professional name, used for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.professional_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
    }
}

/// Scalar fields editable through `set_field`.
///
/// The onboarding flag is deliberately absent: normal editing never touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProfessionalName,
    Slogan,
    Phone,
    LocationText,
    InstagramUrl,
    ThemeColor,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::ProfessionalName,
        Self::Slogan,
        Self::Phone,
        Self::LocationText,
        Self::InstagramUrl,
        Self::ThemeColor,
    ];

    /// Name of the field as stored (camelCase).
    pub const fn key(self) -> &'static str {
        match self {
            Self::ProfessionalName => "professionalName",
            Self::Slogan => "slogan",
            Self::Phone => "phone",
            Self::LocationText => "locationText",
            Self::InstagramUrl => "instagramUrl",
            Self::ThemeColor => "themeColor",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = AdminError;

    /// Accepts camelCase, snake_case and kebab-case spellings.
    fn from_str(s: &str) -> Result<Self> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.key().to_lowercase() == folded)
            .ok_or_else(|| AdminError::UnknownField {
                name: s.to_string(),
            })
    }
}

/// Image slots on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    /// Round profile picture.
    Profile,
    /// Wide cover image at the top of the page.
    Hero,
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Profile => "profile",
            Self::Hero => "hero",
        })
    }
}
