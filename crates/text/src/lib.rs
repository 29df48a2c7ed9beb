//! Omnibar Text
//!
//! Text measurement and single-line layout for the URL bar.

mod bidi;
mod error;
mod line;
mod shaper;

pub use bidi::{contains_rtl, first_strong_direction, is_rtl, is_strong_rtl, Direction};
pub use error::{TextError, TextResult};
pub use line::{LayoutParams, LineLayout, TextLayout};
pub use shaper::{FixedAdvanceShaper, FontShaper, TextShaper};
