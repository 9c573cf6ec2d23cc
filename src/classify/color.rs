use serde::Serialize;
use std::fmt;

/// A CSS hex color handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorToken(&'static str);

impl ColorToken {
    pub const DARK_GREEN: ColorToken = ColorToken("#006400");
    pub const GREEN: ColorToken = ColorToken("#228B22");
    pub const LIGHT_GREEN: ColorToken = ColorToken("#90EE90");
    pub const ORANGE: ColorToken = ColorToken("#FFA500");
    pub const RED: ColorToken = ColorToken("#FF0000");
    pub const GRAY: ColorToken = ColorToken("#808080");

    pub(crate) const fn hex(value: &'static str) -> Self {
        ColorToken(value)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
