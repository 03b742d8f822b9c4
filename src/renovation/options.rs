//! User-selectable renovation options: style, wall colour, palette.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::ValidationError;
use crate::image::extension_for_mime;

/// Wire value of the "leave walls as they are" option.
pub const NO_CHANGE: &str = "no-change";

/// The fixed set of décor styles offered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum InteriorStyle {
    #[default]
    Modern,
    Scandinavian,
    Minimalist,
    Industrial,
    Boho,
    Japandi,
    Rustic,
    MidCenturyModern,
    Contemporary,
}

impl InteriorStyle {
    /// All styles, in the order they are presented.
    pub const ALL: [InteriorStyle; 9] = [
        Self::Modern,
        Self::Scandinavian,
        Self::Minimalist,
        Self::Industrial,
        Self::Boho,
        Self::Japandi,
        Self::Rustic,
        Self::MidCenturyModern,
        Self::Contemporary,
    ];

    /// Value used in form fields and inside the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Scandinavian => "scandinavian",
            Self::Minimalist => "minimalist",
            Self::Industrial => "industrial",
            Self::Boho => "boho",
            Self::Japandi => "japandi",
            Self::Rustic => "rustic",
            Self::MidCenturyModern => "mid-century modern",
            Self::Contemporary => "contemporary",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Scandinavian => "Scandinavian",
            Self::Minimalist => "Minimalist",
            Self::Industrial => "Industrial",
            Self::Boho => "Boho",
            Self::Japandi => "Japandi",
            Self::Rustic => "Rustic",
            Self::MidCenturyModern => "Mid-Century Modern",
            Self::Contemporary => "Contemporary",
        }
    }

    /// Filename-safe form of the wire value.
    pub fn slug(&self) -> String {
        self.as_str().replace(' ', "-")
    }

    /// Parses an optional form value; blank means the default style.
    pub fn parse_or_default(value: Option<&str>) -> Result<Self, ValidationError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(v) => v.parse(),
        }
    }
}

impl FromStr for InteriorStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted || style.slug() == wanted)
            .ok_or_else(|| ValidationError::UnsupportedStyle(s.trim().to_string()))
    }
}

impl fmt::Display for InteriorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested wall treatment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum WallColor {
    /// Keep the existing wall colour; no paint instruction is emitted.
    #[default]
    NoChange,
    /// Paint the walls; always normalized to uppercase `#RRGGBB`.
    Hex(String),
}

impl WallColor {
    /// Value used in form fields.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoChange => NO_CHANGE,
            Self::Hex(hex) => hex,
        }
    }

    /// Colour token for filenames: hex digits without `#`, or `no-change`.
    pub fn file_token(&self) -> &str {
        self.as_str().trim_start_matches('#')
    }

    /// Parses an optional form value; blank resolves to `default`.
    pub fn parse_or(value: Option<&str>, default: &WallColor) -> Result<Self, ValidationError> {
        match value.map(str::trim) {
            None | Some("") => Ok(default.clone()),
            Some(v) => v.parse(),
        }
    }
}

impl FromStr for WallColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(NO_CHANGE) {
            return Ok(Self::NoChange);
        }

        let unsupported = || ValidationError::UnsupportedWallColor(trimmed.to_string());
        let digits = trimmed.strip_prefix('#').ok_or_else(unsupported)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(unsupported());
        }

        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(unsupported()),
        };
        Ok(Self::Hex(format!("#{}", expanded.to_ascii_uppercase())))
    }
}

impl fmt::Display for WallColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named entry of the wall colour picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Swatch {
    /// Form value: `#RRGGBB` or `no-change`.
    pub value: &'static str,
    /// Display label.
    pub label: &'static str,
}

/// Colour picker entries; `no-change` first.
pub const PALETTE: [Swatch; 10] = [
    Swatch { value: NO_CHANGE, label: "No change" },
    Swatch { value: "#F8BBD0", label: "Pink" },
    Swatch { value: "#B3E5FC", label: "Blue" },
    Swatch { value: "#C8E6C9", label: "Green" },
    Swatch { value: "#FFF9C4", label: "Yellow" },
    Swatch { value: "#E1BEE7", label: "Purple" },
    Swatch { value: "#FFCCBC", label: "Orange" },
    Swatch { value: "#D7CCC8", label: "Brown" },
    Swatch { value: "#CFD8DC", label: "Gray" },
    Swatch { value: "#FFFFFF", label: "White" },
];

/// Options for one transformation, rebuilt from the form on every submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Target décor style.
    pub style: InteriorStyle,
    /// Wall treatment.
    pub wall_color: WallColor,
}

impl TransformOptions {
    /// Bundles a style and wall colour.
    pub fn new(style: InteriorStyle, wall_color: WallColor) -> Self {
        Self { style, wall_color }
    }

    /// Suggested filename for downloading the generated image.
    pub fn download_filename(&self, mime_type: &str) -> String {
        format!(
            "visualization-{}-{}.{}",
            self.style.slug(),
            self.wall_color.file_token(),
            extension_for_mime(mime_type)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse() {
        assert_eq!("industrial".parse::<InteriorStyle>(), Ok(InteriorStyle::Industrial));
        assert_eq!(" Japandi ".parse::<InteriorStyle>(), Ok(InteriorStyle::Japandi));
        assert_eq!(
            "mid-century modern".parse::<InteriorStyle>(),
            Ok(InteriorStyle::MidCenturyModern)
        );
        assert_eq!(
            "mid-century-modern".parse::<InteriorStyle>(),
            Ok(InteriorStyle::MidCenturyModern)
        );
        assert_eq!(
            "baroque".parse::<InteriorStyle>(),
            Err(ValidationError::UnsupportedStyle("baroque".into()))
        );
    }

    #[test]
    fn test_style_default_on_blank() {
        assert_eq!(
            InteriorStyle::parse_or_default(None),
            Ok(InteriorStyle::Modern)
        );
        assert_eq!(
            InteriorStyle::parse_or_default(Some("   ")),
            Ok(InteriorStyle::Modern)
        );
    }

    #[test]
    fn test_all_styles_round_trip_wire_value() {
        for style in InteriorStyle::ALL {
            assert_eq!(style.as_str().parse::<InteriorStyle>(), Ok(style));
        }
    }

    #[test]
    fn test_wall_color_parse() {
        assert_eq!("no-change".parse::<WallColor>(), Ok(WallColor::NoChange));
        assert_eq!("NO-CHANGE".parse::<WallColor>(), Ok(WallColor::NoChange));
        assert_eq!("#f8bbd0".parse::<WallColor>(), Ok(WallColor::Hex("#F8BBD0".into())));
        assert_eq!("#fff".parse::<WallColor>(), Ok(WallColor::Hex("#FFFFFF".into())));
        for bad in ["pink", "F8BBD0", "#F8BBD", "#GGGGGG", "#"] {
            assert_eq!(
                bad.parse::<WallColor>(),
                Err(ValidationError::UnsupportedWallColor(bad.into())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_wall_color_blank_uses_default() {
        let pink = WallColor::Hex("#F8BBD0".into());
        assert_eq!(WallColor::parse_or(None, &pink), Ok(pink.clone()));
        assert_eq!(WallColor::parse_or(Some(""), &pink), Ok(pink));
        assert_eq!(
            WallColor::parse_or(Some("no-change"), &WallColor::Hex("#FFFFFF".into())),
            Ok(WallColor::NoChange)
        );
    }

    #[test]
    fn test_palette_values_parse() {
        for swatch in PALETTE {
            let color: WallColor = swatch.value.parse().unwrap();
            assert_eq!(color.as_str(), swatch.value);
        }
    }

    #[test]
    fn test_download_filename() {
        let opts = TransformOptions::new(
            InteriorStyle::MidCenturyModern,
            WallColor::Hex("#FFFFFF".into()),
        );
        assert_eq!(
            opts.download_filename("image/png"),
            "visualization-mid-century-modern-FFFFFF.png"
        );

        let opts = TransformOptions::new(InteriorStyle::Boho, WallColor::NoChange);
        assert_eq!(
            opts.download_filename("image/jpeg"),
            "visualization-boho-no-change.jpg"
        );
    }
}
