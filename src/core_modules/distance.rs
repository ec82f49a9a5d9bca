// THEORY:
// Distance is squared Euclidean distance in RGB space. The square root is never
// taken: it is monotonic, so nearest-neighbour decisions are identical, and the
// integer result is exact. The largest possible value is 3 * 255^2 = 195075,
// comfortably inside a `u32`.

pub mod distance {
    use crate::core_modules::color::color::Color;

    pub type ColorDistance = u32;

    #[inline]
    pub fn squared_distance(a: &Color, b: &Color) -> ColorDistance {
        let dr = a.red as i32 - b.red as i32;
        let dg = a.green as i32 - b.green as i32;
        let db = a.blue as i32 - b.blue as i32;

        (dr * dr + dg * dg + db * db) as ColorDistance
    }
}
