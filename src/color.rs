use image::Rgba;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}' (expected #RGB, #RRGGBB or #RRGGBBAA)")]
pub struct ColorError(pub String);

/// Parse a CSS-style hex color such as `#FF6600`.
pub fn parse_hex(input: &str) -> Result<Rgba<u8>, ColorError> {
    let err = || ColorError(input.to_string());
    let digits = input.trim().strip_prefix('#').ok_or_else(err)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err());
    }
    let channel = |idx: usize| u8::from_str_radix(&digits[idx..idx + 2], 16).map_err(|_| err());
    match digits.len() {
        3 => {
            let mut out = [0xff; 4];
            for (idx, ch) in digits.chars().enumerate() {
                let nibble = ch.to_digit(16).ok_or_else(err)? as u8;
                out[idx] = nibble * 0x11;
            }
            Ok(Rgba(out))
        }
        6 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 0xff])),
        8 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => Err(err()),
    }
}

pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 0xff])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(parse_hex("#FF6600").unwrap(), Rgba([0xff, 0x66, 0x00, 0xff]));
        assert_eq!(parse_hex("#fff").unwrap(), Rgba([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(parse_hex("#11223344").unwrap(), Rgba([0x11, 0x22, 0x33, 0x44]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hex("FF6600").is_err());
        assert!(parse_hex("#GG0000").is_err());
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#ééé").is_err());
    }
}
