use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Unsupported hex color format: {0}")]
    BadHex(String),

    #[error("Unknown color name: {0}")]
    UnknownName(String),
}

/// Parse a color spec into an RGB triple.
///
/// Accepts `#RRGGBB`, `#RGB` (each digit doubled), or one of a small set of
/// color names. Callers that cannot tolerate a parse failure substitute
/// white instead of propagating the error.
pub fn parse_color(spec: &str) -> Result<[u8; 3], ColorParseError> {
    let spec = spec.trim();

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::BadHex(spec.to_string()));
    }

    match spec.to_ascii_lowercase().as_str() {
        "white" => Ok([255, 255, 255]),
        "black" => Ok([0, 0, 0]),
        "red" => Ok([255, 0, 0]),
        "green" => Ok([0, 128, 0]),
        "blue" => Ok([0, 0, 255]),
        "yellow" => Ok([255, 255, 0]),
        _ => Err(ColorParseError::UnknownName(spec.to_string())),
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            // Each digit doubles: #F00 -> #FF0000
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some([r * 17, g * 17, b * 17])
        }
        _ => None,
    }
}
