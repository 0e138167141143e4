//! Volume percentage to codec attenuation mapping.

/// Largest attenuation the output stage accepts, in dB below full scale.
const MAX_ATTENUATION_DB: i32 = 102;

/// Map a user-facing volume percentage to the codec's signed attenuation
/// control value.
///
/// `100` is full scale (`0`), `0` is maximum attenuation (`-102`).
/// Out-of-range percentages clamp to full scale.
pub fn volume_to_ctrl(percent: u8) -> i8 {
    let percent = i32::from(percent.min(100));
    let ctrl = percent
        .saturating_mul(MAX_ATTENUATION_DB)
        .wrapping_div(100)
        .saturating_sub(MAX_ATTENUATION_DB);
    // Range is [-102, 0] by construction.
    #[allow(clippy::cast_possible_truncation)]
    {
        ctrl as i8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        assert_eq!(volume_to_ctrl(100), 0);
        assert_eq!(volume_to_ctrl(0), -102);
    }

    #[test]
    fn midpoint_is_half_attenuation() {
        assert_eq!(volume_to_ctrl(50), -51);
    }

    #[test]
    fn over_range_clamps_to_full_scale() {
        assert_eq!(volume_to_ctrl(255), 0);
        assert_eq!(volume_to_ctrl(101), 0);
    }

    #[test]
    fn monotone_nondecreasing() {
        let mut previous = volume_to_ctrl(0);
        for percent in 1..=100u8 {
            let ctrl = volume_to_ctrl(percent);
            assert!(ctrl >= previous, "regression at {percent}%");
            previous = ctrl;
        }
    }
}
