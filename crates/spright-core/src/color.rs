//! Colors of preview elements.
//!
//! Style settings are parsed into [`Color`] when the configuration is
//! validated, so a typo in a color is reported before anything is drawn.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A CSS color, parsed with the `color` crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parses a CSS color such as `"#00a0ff"`, `"rgb(0, 160, 255)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spright_core::color::Color;
    ///
    /// let sprite = Color::new("#00a0ff").unwrap();
    /// let pivot = Color::new("red").unwrap();
    /// assert_ne!(sprite, pivot);
    /// assert!(Color::new("bluish").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
