//! Profile configuration data model.
//!
//! One [`AppConfig`] record holds everything shown on the public profile:
//! identity, contact details, theme, images and the ordered service list.

mod config;
mod diff;
mod palette;
mod service;

pub use config::{AppConfig, Field, ImageSlot};
pub use diff::{Change, diff};
pub use palette::ThemeColor;
pub use service::{Service, find_duplicate_id};
