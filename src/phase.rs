use crate::error::PlotError;
use log::error;
use plotters::prelude::RGBColor;
use serde::Deserialize;
use std::fmt;

/// A fill color for a phase segment.
///
/// Deserializes from `#rrggbb`, from a gray level in `[0, 1]` written as a
/// string (`"0.35"`), or from one of the named colors in `from_label`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub fn from_label(label: &str) -> Result<Color, PlotError> {
        match label {
            "black" => Ok(Color(0, 0, 0)),
            "white" => Ok(Color(255, 255, 255)),
            "red" => Ok(Color(255, 0, 0)),
            "green" => Ok(Color(0, 128, 0)),
            "blue" => Ok(Color(0, 0, 255)),
            "cyan" => Ok(Color(0, 255, 255)),
            "dark-red" => Ok(Color(130, 1, 1)),
            "dark-blue" => Ok(Color(1, 6, 130)),
            "dark-green" => Ok(Color(0, 97, 29)),
            "dark-orange" => Ok(Color(163, 99, 2)),
            "dark-yellow" => Ok(Color(179, 176, 0)),
            _ => {
                error!("unrecognized label for color (label={label})");
                Err(PlotError::InvalidConfig(format!(
                    "unrecognized color (label={label})"
                )))
            }
        }
    }

    pub fn parse(text: &str) -> Result<Color, PlotError> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(PlotError::InvalidConfig(format!(
                    "hex color must have six digits (color={text})"
                )));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| {
                    PlotError::InvalidConfig(format!("bad hex color (color={text}, error={e})"))
                })
            };
            return Ok(Color(channel(0)?, channel(2)?, channel(4)?));
        }

        if let Ok(level) = text.parse::<f64>() {
            if !(0.0..=1.0).contains(&level) {
                return Err(PlotError::InvalidConfig(format!(
                    "gray level out of range (color={text})"
                )));
            }
            let v = (level * 255.0).round() as u8;
            return Ok(Color(v, v, v));
        }

        Color::from_label(text)
    }
}

impl TryFrom<String> for Color {
    type Error = PlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for RGBColor {
    fn from(c: Color) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Pattern stroked over a segment fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hatch {
    #[default]
    None,
    Dots,
    Diagonal,
    Horizontal,
}

/// One timing stage of a benchmark run, bound to a column of the result
/// tables and to a fixed fill style.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Phase {
    pub column: String,
    pub name: String,
    pub color: Color,
    #[serde(default)]
    pub hatch: Hatch,
}

impl Phase {
    pub fn new(column: &str, name: &str, color: Color, hatch: Hatch) -> Self {
        Phase {
            column: column.to_string(),
            name: name.to_string(),
            color,
            hatch,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub const KEYGEN_COLUMN: &str = "t_keygen";
pub const ENCRYPTION_COLUMN: &str = "t_input_encryption";
pub const COMPUTATION_COLUMN: &str = "t_computation";
pub const DECRYPTION_COLUMN: &str = "t_decryption";

/// Color schemes used by the benchmark reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Nn,
    Cardio,
    Kernel,
}

impl Palette {
    fn fills(&self) -> [(Color, Hatch); 4] {
        match self {
            Palette::Nn => [
                (Color(0x15, 0x60, 0x7a), Hatch::None),
                (Color(0xff, 0xbd, 0x70), Hatch::None),
                (Color(0xe7, 0xe7, 0xe7), Hatch::None),
                (Color(0xff, 0x48, 0x3a), Hatch::None),
            ],
            Palette::Cardio => [
                (Color(255, 0, 0), Hatch::None),
                (Color(0, 0, 255), Hatch::None),
                (Color(0, 128, 0), Hatch::None),
                (Color(0, 255, 255), Hatch::None),
            ],
            // Gray levels 0.1, 0.35, 0.5 and 0.85
            Palette::Kernel => [
                (Color(26, 26, 26), Hatch::None),
                (Color(89, 89, 89), Hatch::Dots),
                (Color(128, 128, 128), Hatch::Diagonal),
                (Color(217, 217, 217), Hatch::None),
            ],
        }
    }

    /// The four homomorphic-encryption phases, bottom to top.
    pub fn phases(&self) -> Vec<Phase> {
        let [keygen, enc, comp, dec] = self.fills();
        vec![
            Phase::new(KEYGEN_COLUMN, "Key Generation", keygen.0, keygen.1),
            Phase::new(ENCRYPTION_COLUMN, "Encryption", enc.0, enc.1),
            Phase::new(COMPUTATION_COLUMN, "Computation", comp.0, comp.1),
            Phase::new(DECRYPTION_COLUMN, "Decryption", dec.0, dec.1),
        ]
    }
}

pub fn default_phases() -> Vec<Phase> {
    Palette::Nn.phases()
}
