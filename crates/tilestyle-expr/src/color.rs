use std::fmt;
use std::ops::{Add, Div, Mul, Rem, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn from_bytes(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self::new(red / 255.0, green / 255.0, blue / 255.0, alpha / 255.0)
    }

    pub fn from_css_str(input: &str) -> Option<Self> {
        let parsed: csscolorparser::Color = input.trim().parse().ok()?;
        let [red, green, blue, alpha] = parsed.to_rgba8();
        Some(Self::from_bytes(
            f32::from(red),
            f32::from(green),
            f32::from(blue),
            f32::from(alpha),
        ))
    }

    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let hue = hue % 1.0;
        if saturation == 0.0 {
            let gray = lightness as f32;
            return Self::new(gray, gray, gray, alpha as f32);
        }

        let m2 = if lightness < 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let m1 = 2.0 * lightness - m2;
        Self::new(
            hue_to_rgb(m1, m2, hue + 1.0 / 3.0) as f32,
            hue_to_rgb(m1, m2, hue) as f32,
            hue_to_rgb(m1, m2, hue - 1.0 / 3.0) as f32,
            alpha as f32,
        )
    }

    pub fn component(&self, index: usize) -> Option<f32> {
        match index {
            0 => Some(self.red),
            1 => Some(self.green),
            2 => Some(self.blue),
            3 => Some(self.alpha),
            _ => None,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Color {
        Color::new(f(self.red), f(self.green), f(self.blue), f(self.alpha))
    }

    fn zip(self, other: Color, f: impl Fn(f32, f32) -> f32) -> Color {
        Color::new(
            f(self.red, other.red),
            f(self.green, other.green),
            f(self.blue, other.blue),
            f(self.alpha, other.alpha),
        )
    }
}

macro_rules! componentwise_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Color {
            type Output = Color;

            fn $method(self, other: Color) -> Color {
                self.zip(other, |left, right| left $op right)
            }
        }
    };
}

componentwise_op!(Add, add, +);
componentwise_op!(Sub, sub, -);
componentwise_op!(Mul, mul, *);
componentwise_op!(Div, div, /);
componentwise_op!(Rem, rem, %);

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, scalar: f32) -> Color {
        self.map(|channel| channel * scalar)
    }
}

impl Div<f32> for Color {
    type Output = Color;

    fn div(self, scalar: f32) -> Color {
        self.map(|channel| channel / scalar)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.red, self.green, self.blue, self.alpha)
    }
}

fn hue_to_rgb(m1: f64, m2: f64, mut hue: f64) -> f64 {
    if hue < 0.0 {
        hue += 1.0;
    }
    if hue > 1.0 {
        hue -= 1.0;
    }
    if hue * 6.0 < 1.0 {
        return m1 + (m2 - m1) * 6.0 * hue;
    }
    if hue * 2.0 < 1.0 {
        return m2;
    }
    if hue * 3.0 < 2.0 {
        return m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0;
    }
    m1
}

#[cfg(test)]
#[path = "color_test.rs"]
mod tests;
