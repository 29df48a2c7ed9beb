//! Omnibar URL Bar
//!
//! Display text handling for a single-line URL field: which part of a long
//! URL is rendered, how far it is scrolled, and which prefix is visible.

mod config;
mod display;
mod ellipsis;
mod error;
mod hint;
mod scroll;
mod truncation;
mod url_bar;

pub use config::{DisplayMetrics, UrlBarConfig};
pub use display::DisplayText;
pub use ellipsis::{apply_ellipsis, ellipsis_span, ELLIPSIS};
pub use error::{UrlBarError, UrlBarResult};
pub use hint::VisibleHintCache;
pub use scroll::{
    calculate_visible_hint, ScrollOutcome, ScrollPositionCalculator, ScrollRequest, ScrollState,
    ScrollType,
};
pub use truncation::{RenderSurface, TruncationEstimator};
pub use url_bar::{UrlBar, UrlDirection, DEFAULT_FONT_SIZE};

pub use omnibar_text::{Direction, TextLayout};
