// Fast floor/ceil for coordinates derived from continuous positions.
//
// Adding a large power of two before truncating moves every input in range
// into positive territory, where `as i32` truncation equals floor. Valid for
// |v| < 2^30.

const FLOOR_OFFSET_F: f64 = 1_073_741_824.0;
const FLOOR_OFFSET_I: i32 = 1_073_741_824;

#[inline]
pub fn fast_floor(v: f64) -> i32 {
    (v + FLOOR_OFFSET_F) as i32 - FLOOR_OFFSET_I
}

#[inline]
pub fn fast_ceil(v: f64) -> i32 {
    FLOOR_OFFSET_I - (FLOOR_OFFSET_F - v) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_std_floor_and_ceil() {
        for v in [-3.5, -1.0, -0.25, 0.0, 0.25, 1.0, 2.999, 1234.5, -98765.125] {
            assert_eq!(fast_floor(v), v.floor() as i32, "floor {v}");
            assert_eq!(fast_ceil(v), v.ceil() as i32, "ceil {v}");
        }
    }
}
