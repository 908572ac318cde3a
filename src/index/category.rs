use serde::Serialize;

/// Display color in both screen and print spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub c: u8,
    pub m: u8,
    pub y: u8,
    pub k: u8,
}

impl Color {
    /// `#RRGGBB`, upper-case.
    pub fn rgb_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Named index bracket with its official color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexCategory {
    pub name: &'static str,
    pub low: i32,
    pub high: i32,
    pub color: Color,
}

const fn bracket(
    name: &'static str,
    low: i32,
    high: i32,
    rgb: [u8; 3],
    cmyk: [u8; 4],
) -> IndexCategory {
    IndexCategory {
        name,
        low,
        high,
        color: color(rgb, cmyk),
    }
}

const fn color(rgb: [u8; 3], cmyk: [u8; 4]) -> Color {
    Color {
        r: rgb[0],
        g: rgb[1],
        b: rgb[2],
        c: cmyk[0],
        m: cmyk[1],
        y: cmyk[2],
        k: cmyk[3],
    }
}

/// The six brackets, shared by EPA and MEP.
pub static CATEGORIES: [IndexCategory; 6] = [
    bracket("GREEN", 0, 50, [0, 228, 0], [40, 0, 100, 0]),
    bracket("YELLOW", 51, 100, [255, 255, 0], [0, 0, 100, 0]),
    bracket("ORANGE", 101, 150, [255, 126, 0], [0, 52, 100, 0]),
    bracket("RED", 151, 200, [255, 0, 0], [0, 100, 100, 0]),
    bracket("PURPLE", 201, 300, [153, 0, 76], [10, 100, 40, 30]),
    bracket("MAROON", 301, 500, [126, 0, 35], [30, 100, 100, 30]),
];

/// Looks up the bracket for an index value.
///
/// | Range        | Category |
/// |--------------|----------|
/// | 0–50         | GREEN    |
/// | 51–100       | YELLOW   |
/// | 101–150      | ORANGE   |
/// | 151–200      | RED      |
/// | 201–300      | PURPLE   |
/// | >= 301       | MAROON   |
/// | < 0          | none     |
///
/// The 911 overflow sentinel falls in MAROON.
pub fn category(index: i32) -> Option<&'static IndexCategory> {
    match index {
        i if i < 0 => None,
        i if i <= 50 => Some(&CATEGORIES[0]),
        i if i <= 100 => Some(&CATEGORIES[1]),
        i if i <= 150 => Some(&CATEGORIES[2]),
        i if i <= 200 => Some(&CATEGORIES[3]),
        i if i <= 300 => Some(&CATEGORIES[4]),
        _ => Some(&CATEGORIES[5]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(index: i32) -> Option<&'static str> {
        category(index).map(|c| c.name)
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(name(0), Some("GREEN"));
        assert_eq!(name(50), Some("GREEN"));
        assert_eq!(name(51), Some("YELLOW"));
        assert_eq!(name(100), Some("YELLOW"));
        assert_eq!(name(101), Some("ORANGE"));
        assert_eq!(name(150), Some("ORANGE"));
        assert_eq!(name(151), Some("RED"));
        assert_eq!(name(200), Some("RED"));
        assert_eq!(name(201), Some("PURPLE"));
        assert_eq!(name(300), Some("PURPLE"));
        assert_eq!(name(301), Some("MAROON"));
        assert_eq!(name(500), Some("MAROON"));
        assert_eq!(name(911), Some("MAROON"));
        assert_eq!(name(-1), None);
        assert_eq!(name(-911), None);
    }

    #[test]
    fn test_rgb_hex() {
        let c = color([63, 255, 118], [0, 0, 0, 0]);
        assert_eq!(c.rgb_hex(), "#3FFF76");
        assert_eq!(CATEGORIES[0].color.rgb_hex(), "#00E400");
    }

    #[test]
    fn test_brackets_are_contiguous() {
        for pair in CATEGORIES.windows(2) {
            assert_eq!(pair[0].high + 1, pair[1].low);
        }
    }
}
