//! Hex color parsing and rgba formatting

/// An opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GRAY: Rgb = Rgb {
        r: 0x88,
        g: 0x88,
        b: 0x88,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            6 => Some(Self {
                r: u8::from_str_radix(&digits[0..2], 16).ok()?,
                g: u8::from_str_radix(&digits[2..4], 16).ok()?,
                b: u8::from_str_radix(&digits[4..6], 16).ok()?,
            }),
            3 => {
                let expand = |i: usize| -> Option<u8> {
                    let v = u8::from_str_radix(&digits[i..i + 1], 16).ok()?;
                    Some(v * 17)
                };
                Some(Self {
                    r: expand(0)?,
                    g: expand(1)?,
                    b: expand(2)?,
                })
            }
            _ => None,
        }
    }

    /// CSS `rgba(...)` with the given alpha
    pub fn rgba(&self, alpha: f64) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, fmt_num(alpha))
    }
}

/// Format a number with at most three decimals, dropping trailing zeros
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", rounded)
}
