//! CIELab to sRGB conversion.
//!
//! The sensor reports colour as an L*a*b* triple relative to the D65/2°
//! white point. Conversion goes Lab -> XYZ -> linear sRGB -> companded sRGB,
//! after which each channel is clamped to `[0, 1]` and truncated to 8 bits.

/// D65/2° reference white, Y normalised to 1.
const WHITE_D65: [f64; 3] = [0.950_47, 1.0, 1.088_83];

/// XYZ (D65) to linear sRGB primaries.
const XYZ_TO_LINEAR_SRGB: [[f64; 3]; 3] = [
    [3.240_454_2, -1.537_138_5, -0.498_531_4],
    [-0.969_266_0, 1.876_010_8, 0.041_556_0],
    [0.055_643_4, -0.204_025_9, 1.057_225_2],
];

const EPSILON: f64 = 6.0 / 29.0;

/// A colour in CIE L*a*b*.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }
}

/// An 8-bit-per-channel display colour.
///
/// # Examples
/// ```
/// use snapshot_core::colour::Rgb8;
///
/// let rgb = Rgb8 { r: 0xA1, g: 0xB2, b: 0x03 };
/// assert_eq!(rgb.to_hex(), "#A1B203");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Convert Lab to companded sRGB. Channels are not clamped, so out-of-gamut
/// colours fall outside `[0, 1]`.
pub fn lab_to_srgb(lab: Lab) -> [f64; 3] {
    let xyz = lab_to_xyz(lab);
    let mut rgb = [0.0; 3];
    for (channel, row) in rgb.iter_mut().zip(XYZ_TO_LINEAR_SRGB.iter()) {
        let linear = row[0] * xyz[0] + row[1] * xyz[1] + row[2] * xyz[2];
        *channel = compand(linear);
    }
    rgb
}

/// Convert Lab to a clamped 8-bit display colour.
///
/// # Examples
/// ```
/// use snapshot_core::colour::{Lab, lab_to_rgb8};
///
/// let white = lab_to_rgb8(Lab::new(100.0, 0.0, 0.0));
/// assert!(white.r >= 0xFE && white.g >= 0xFE && white.b >= 0xFE);
/// ```
pub fn lab_to_rgb8(lab: Lab) -> Rgb8 {
    let [r, g, b] = lab_to_srgb(lab);
    Rgb8 {
        r: to_u8(r),
        g: to_u8(g),
        b: to_u8(b),
    }
}

fn lab_to_xyz(lab: Lab) -> [f64; 3] {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;
    [
        WHITE_D65[0] * f_inverse(fx),
        WHITE_D65[1] * f_inverse(fy),
        WHITE_D65[2] * f_inverse(fz),
    ]
}

fn f_inverse(t: f64) -> f64 {
    if t > EPSILON {
        t * t * t
    } else {
        3.0 * EPSILON * EPSILON * (t - 4.0 / 29.0)
    }
}

fn compand(linear: f64) -> f64 {
    if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

fn to_u8(channel: f64) -> u8 {
    // Truncates; NaN saturates to 0.
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}
