use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 110, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 190, b: 90 };
pub const SEPARATOR: Color = Color::TrueColor { r: 110, g: 110, b: 120 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 215, g: 215, b: 220 };
pub const ONLINE: Color = Color::TrueColor { r: 90, g: 220, b: 120 };
pub const OFFLINE: Color = Color::TrueColor { r: 240, g: 90, b: 90 };
pub const IPV4_ADDR: Color = Color::TrueColor { r: 170, g: 150, b: 255 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 200, g: 140, b: 230 };
