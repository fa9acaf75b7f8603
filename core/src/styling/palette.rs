//! Sequential colour scales for heatmaps.
//!
//! Each scale is stored as its 9-class ColorBrewer anchors. Palettes of any
//! size are sampled evenly over the anchors with linear RGB interpolation.

use std::fmt;
use std::str::FromStr;

use crate::error::StyleError;

/// Opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a colour from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Linear interpolation between two colours.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Named sequential colour scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScale {
    Blues,
    BuGn,
    BuPu,
    GnBu,
    Greens,
    Greys,
    OrRd,
    Oranges,
    PuBu,
    PuBuGn,
    PuRd,
    Purples,
    RdPu,
    Reds,
    YlGn,
    YlGnBu,
    YlOrBr,
    YlOrRd,
}

impl ColorScale {
    /// Every scale, in alphabetical order.
    pub const ALL: [ColorScale; 18] = [
        ColorScale::Blues,
        ColorScale::BuGn,
        ColorScale::BuPu,
        ColorScale::GnBu,
        ColorScale::Greens,
        ColorScale::Greys,
        ColorScale::OrRd,
        ColorScale::Oranges,
        ColorScale::PuBu,
        ColorScale::PuBuGn,
        ColorScale::PuRd,
        ColorScale::Purples,
        ColorScale::RdPu,
        ColorScale::Reds,
        ColorScale::YlGn,
        ColorScale::YlGnBu,
        ColorScale::YlOrBr,
        ColorScale::YlOrRd,
    ];

    /// Scale name as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ColorScale::Blues => "Blues",
            ColorScale::BuGn => "BuGn",
            ColorScale::BuPu => "BuPu",
            ColorScale::GnBu => "GnBu",
            ColorScale::Greens => "Greens",
            ColorScale::Greys => "Greys",
            ColorScale::OrRd => "OrRd",
            ColorScale::Oranges => "Oranges",
            ColorScale::PuBu => "PuBu",
            ColorScale::PuBuGn => "PuBuGn",
            ColorScale::PuRd => "PuRd",
            ColorScale::Purples => "Purples",
            ColorScale::RdPu => "RdPu",
            ColorScale::Reds => "Reds",
            ColorScale::YlGn => "YlGn",
            ColorScale::YlGnBu => "YlGnBu",
            ColorScale::YlOrBr => "YlOrBr",
            ColorScale::YlOrRd => "YlOrRd",
        }
    }

    /// The 9 anchor colours, lightest first.
    fn anchors(self) -> [Rgb; 9] {
        let hex = |values: [u32; 9]| values.map(Rgb::hex);
        match self {
            ColorScale::Blues => hex([0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b]),
            ColorScale::BuGn => hex([0xf7fcfd, 0xe5f5f9, 0xccece6, 0x99d8c9, 0x66c2a4, 0x41ae76, 0x238b45, 0x006d2c, 0x00441b]),
            ColorScale::BuPu => hex([0xf7fcfd, 0xe0ecf4, 0xbfd3e6, 0x9ebcda, 0x8c96c6, 0x8c6bb1, 0x88419d, 0x810f7c, 0x4d004b]),
            ColorScale::GnBu => hex([0xf7fcf0, 0xe0f3db, 0xccebc5, 0xa8ddb5, 0x7bccc4, 0x4eb3d3, 0x2b8cbe, 0x0868ac, 0x084081]),
            ColorScale::Greens => hex([0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c, 0x00441b]),
            ColorScale::Greys => hex([0xffffff, 0xf0f0f0, 0xd9d9d9, 0xbdbdbd, 0x969696, 0x737373, 0x525252, 0x252525, 0x000000]),
            ColorScale::OrRd => hex([0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0xb30000, 0x7f0000]),
            ColorScale::Oranges => hex([0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603, 0x7f2704]),
            ColorScale::PuBu => hex([0xfff7fb, 0xece7f2, 0xd0d1e6, 0xa6bddb, 0x74a9cf, 0x3690c0, 0x0570b0, 0x045a8d, 0x023858]),
            ColorScale::PuBuGn => hex([0xfff7fb, 0xece2f0, 0xd0d1e6, 0xa6bddb, 0x67a9cf, 0x3690c0, 0x02818a, 0x016c59, 0x014636]),
            ColorScale::PuRd => hex([0xf7f4f9, 0xe7e1ef, 0xd4b9da, 0xc994c7, 0xdf65b0, 0xe7298a, 0xce1256, 0x980043, 0x67001f]),
            ColorScale::Purples => hex([0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f, 0x3f007d]),
            ColorScale::RdPu => hex([0xfff7f3, 0xfde0dd, 0xfcc5c0, 0xfa9fb5, 0xf768a1, 0xdd3497, 0xae017e, 0x7a0177, 0x49006a]),
            ColorScale::Reds => hex([0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d]),
            ColorScale::YlGn => hex([0xffffe5, 0xf7fcb9, 0xd9f0a3, 0xaddd8e, 0x78c679, 0x41ab5d, 0x238443, 0x006837, 0x004529]),
            ColorScale::YlGnBu => hex([0xffffd9, 0xedf8b1, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x253494, 0x081d58]),
            ColorScale::YlOrBr => hex([0xffffe5, 0xfff7bc, 0xfee391, 0xfec44f, 0xfe9929, 0xec7014, 0xcc4c02, 0x993404, 0x662506]),
            ColorScale::YlOrRd => hex([0xffffcc, 0xffeda0, 0xfed976, 0xfeb24c, 0xfd8d3c, 0xfc4e2a, 0xe31a1c, 0xbd0026, 0x800026]),
        }
    }

    /// A palette of `steps` colours from lightest to darkest.
    ///
    /// A single step gives the middle anchor.
    pub fn colors(self, steps: usize) -> Vec<Rgb> {
        let anchors = self.anchors();
        let last = anchors.len() - 1;

        match steps {
            0 => Vec::new(),
            1 => vec![anchors[last / 2]],
            _ => (0..steps)
                .map(|j| {
                    let pos = (j * last) as f64 / (steps - 1) as f64;
                    let lo = (pos.floor() as usize).min(last);
                    let hi = (lo + 1).min(last);
                    anchors[lo].lerp(anchors[hi], pos - lo as f64)
                })
                .collect(),
        }
    }
}

impl FromStr for ColorScale {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorScale::ALL
            .iter()
            .copied()
            .find(|scale| scale.name() == s)
            .ok_or_else(|| StyleError::UnknownColorScale(s.to_string()))
    }
}

impl fmt::Display for ColorScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex_and_display() {
        let color = Rgb::hex(0x08306b);
        assert_eq!(color, Rgb::new(8, 48, 107));
        assert_eq!(color.to_string(), "rgb(8,48,107)");
    }

    #[test]
    fn test_lerp_boundaries() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 100, 10);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(128, 50, 5));
    }

    #[test]
    fn test_nine_steps_match_anchors() {
        let colors = ColorScale::Blues.colors(9);
        assert_eq!(colors.len(), 9);
        assert_eq!(colors[0].to_string(), "rgb(247,251,255)");
        assert_eq!(colors[8].to_string(), "rgb(8,48,107)");
    }

    #[test]
    fn test_palette_sizes() {
        for scale in ColorScale::ALL {
            for steps in 1..=12 {
                assert_eq!(scale.colors(steps).len(), steps);
            }
        }
        let five = ColorScale::Greys.colors(5);
        assert_eq!(five[0], Rgb::hex(0xffffff));
        assert_eq!(five[2], Rgb::hex(0x969696));
        assert_eq!(five[4], Rgb::hex(0x000000));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("YlGnBu".parse::<ColorScale>().unwrap(), ColorScale::YlGnBu);
        for scale in ColorScale::ALL {
            assert_eq!(scale.name().parse::<ColorScale>().unwrap(), scale);
        }
        assert!(matches!(
            "Viridis".parse::<ColorScale>(),
            Err(StyleError::UnknownColorScale(_))
        ));
    }
}
