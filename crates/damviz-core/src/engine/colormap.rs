use image::Rgb;
use phf::{Map, phf_map};
use thiserror::Error;

#[rustfmt::skip]
const VIRIDIS: &[[u8; 3]] = &[
    [68, 1, 84], [71, 45, 123], [59, 82, 139], [44, 114, 142], [33, 145, 140],
    [40, 174, 128], [94, 201, 98], [173, 220, 48], [253, 231, 37],
];

#[rustfmt::skip]
const PLASMA: &[[u8; 3]] = &[
    [13, 8, 135], [76, 2, 161], [126, 3, 168], [169, 35, 149], [204, 71, 120],
    [229, 107, 93], [248, 149, 64], [253, 197, 39], [240, 249, 33],
];

#[rustfmt::skip]
const INFERNO: &[[u8; 3]] = &[
    [0, 0, 4], [27, 12, 65], [74, 12, 107], [120, 28, 109], [165, 44, 96],
    [207, 68, 70], [237, 105, 37], [251, 155, 6], [252, 255, 164],
];

#[rustfmt::skip]
const MAGMA: &[[u8; 3]] = &[
    [0, 0, 4], [24, 15, 61], [68, 15, 118], [114, 31, 129], [158, 47, 127],
    [205, 64, 113], [241, 96, 93], [253, 150, 104], [252, 253, 191],
];

#[rustfmt::skip]
const CIVIDIS: &[[u8; 3]] = &[
    [0x00, 0x22, 0x4e], [0x12, 0x35, 0x70], [0x3b, 0x49, 0x6c], [0x57, 0x5d, 0x6d],
    [0x70, 0x71, 0x73], [0x8a, 0x86, 0x78], [0xa5, 0x9c, 0x74], [0xc3, 0xb3, 0x69],
    [0xe1, 0xcc, 0x55], [0xfe, 0xe8, 0x38],
];

const GREYS: &[[u8; 3]] = &[[255, 255, 255], [0, 0, 0]];

/// Colour maps by lowercase name, as evenly spaced RGB stops from low to high.
static COLORMAPS: Map<&'static str, &'static [[u8; 3]]> = phf_map! {
    "viridis" => VIRIDIS,
    "plasma" => PLASMA,
    "inferno" => INFERNO,
    "magma" => MAGMA,
    "cividis" => CIVIDIS,
    "greys" => GREYS,
};

#[rustfmt::skip]
static NAMED_COLORS: Map<&'static str, [u8; 3]> = phf_map! {
    "white" => [255, 255, 255], "black" => [0, 0, 0],
    "red" => [255, 0, 0], "green" => [0, 128, 0], "blue" => [0, 0, 255],
    "yellow" => [255, 255, 0], "cyan" => [0, 255, 255], "magenta" => [255, 0, 255],
    "orange" => [255, 165, 0], "purple" => [128, 0, 128], "brown" => [165, 42, 42],
    "pink" => [255, 192, 203], "navy" => [0, 0, 128],
    "gray" => [128, 128, 128], "grey" => [128, 128, 128],
    "lightgray" => [211, 211, 211], "lightgrey" => [211, 211, 211],
    "darkgray" => [169, 169, 169], "darkgrey" => [169, 169, 169],
};

/// A linear-segmented colour map over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colormap {
    name: &'static str,
    stops: &'static [[u8; 3]],
}

impl Colormap {
    /// Looks up a colour map by case-insensitive name.
    pub fn by_name(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase();
        COLORMAPS
            .get_entry(key.as_str())
            .map(|(&name, &stops)| Self { name, stops })
    }

    /// Sorted names of every available colour map.
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<_> = COLORMAPS.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Interpolates the colour at `t`, clamped to `[0, 1]`. NaN maps to the low end.
    pub fn sample(&self, t: f64) -> Rgb<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let index = (pos.floor() as usize).min(last);
        let next = (index + 1).min(last);
        let frac = pos - index as f64;

        let (a, b) = (self.stops[index], self.stops[next]);
        Rgb(std::array::from_fn(|c| {
            (a[c] as f64 + (b[c] as f64 - a[c] as f64) * frac).round() as u8
        }))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized colour '{0}': use a name such as 'red' or a hex code such as '#ff0000'")]
pub struct ColorParseError(pub String);

/// Parses a named colour or a `#rrggbb` / `#rgb` hex code.
pub fn parse_color(input: &str) -> Result<Rgb<u8>, ColorParseError> {
    let trimmed = input.trim();
    let err = || ColorParseError(input.to_string());

    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        return match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                Ok(Rgb([
                    channel(0).map_err(|_| err())?,
                    channel(2).map_err(|_| err())?,
                    channel(4).map_err(|_| err())?,
                ]))
            }
            3 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Ok(Rgb([
                    channel(0).map_err(|_| err())?,
                    channel(1).map_err(|_| err())?,
                    channel(2).map_err(|_| err())?,
                ]))
            }
            _ => Err(err()),
        };
    }

    NAMED_COLORS
        .get(trimmed.to_ascii_lowercase().as_str())
        .map(|&rgb| Rgb(rgb))
        .ok_or_else(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let map = Colormap::by_name("Viridis").unwrap();
        assert_eq!(map.name(), "viridis");
        assert!(Colormap::by_name("jet").is_none());
    }

    #[test]
    fn names_are_sorted_and_include_default() {
        let names = Colormap::names();
        assert!(names.contains(&"viridis"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn endpoints_match_first_and_last_stop() {
        let map = Colormap::by_name("viridis").unwrap();
        assert_eq!(map.sample(0.0), Rgb([68, 1, 84]));
        assert_eq!(map.sample(1.0), Rgb([253, 231, 37]));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let map = Colormap::by_name("plasma").unwrap();
        assert_eq!(map.sample(-3.0), map.sample(0.0));
        assert_eq!(map.sample(7.0), map.sample(1.0));
        assert_eq!(map.sample(f64::NAN), map.sample(0.0));
    }

    #[test]
    fn midpoints_are_interpolated() {
        let map = Colormap::by_name("greys").unwrap();
        assert_eq!(map.sample(0.5), Rgb([128, 128, 128]));
        let viridis = Colormap::by_name("viridis").unwrap();
        assert_eq!(viridis.sample(0.5), Rgb([33, 145, 140]));
    }

    #[test]
    fn parses_named_and_hex_colours() {
        assert_eq!(parse_color("red").unwrap(), Rgb([255, 0, 0]));
        assert_eq!(parse_color(" White ").unwrap(), Rgb([255, 255, 255]));
        assert_eq!(parse_color("#10a0ff").unwrap(), Rgb([0x10, 0xa0, 0xff]));
        assert_eq!(parse_color("#f00").unwrap(), Rgb([255, 0, 0]));
    }

    #[test]
    fn rejects_unknown_colours() {
        assert!(parse_color("chartreuse-ish").is_err());
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gg0000").is_err());
        assert!(parse_color("#ééé").is_err());
    }
}
