// THEORY:
// `Color` is the most fundamental unit of the clustering engine: three 8-bit
// channels and nothing else. It is a "dumb" value type. It knows how to build
// itself from the `image` crate's pixel types and how to hand itself back, and
// it carries no identity beyond its components.
//
// A pixel buffer is simply `[Color]`, borrowed read-only by the engine. All
// comparisons between colors live in `distance`, all averaging in `cluster`.

pub mod color {
    pub type Channel = u8;

    /// A single RGB color.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Color {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Color {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Color { red, green, blue }
        }

        pub fn channels(&self) -> [Channel; 3] {
            [self.red, self.green, self.blue]
        }
    }

    impl From<[Channel; 3]> for Color {
        fn from([red, green, blue]: [Channel; 3]) -> Self {
            Color::new(red, green, blue)
        }
    }

    impl From<(Channel, Channel, Channel)> for Color {
        fn from((red, green, blue): (Channel, Channel, Channel)) -> Self {
            Color::new(red, green, blue)
        }
    }

    impl From<image::Rgb<Channel>> for Color {
        fn from(pixel: image::Rgb<Channel>) -> Self {
            Color::from(pixel.0)
        }
    }

    impl From<Color> for image::Rgb<Channel> {
        fn from(color: Color) -> Self {
            image::Rgb(color.channels())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::color::Color;

    #[test]
    fn converts_to_and_from_image_rgb() {
        let color = Color::new(12, 34, 56);
        let rgb: image::Rgb<u8> = color.into();

        assert_eq!(rgb.0, [12, 34, 56]);
        assert_eq!(Color::from(rgb), color);
    }

    #[test]
    fn tuple_and_array_constructors_agree() {
        assert_eq!(Color::from((1, 2, 3)), Color::from([1, 2, 3]));
        assert_eq!(Color::default(), Color::new(0, 0, 0));
    }
}
