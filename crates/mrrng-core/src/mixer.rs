//! Byte mixer: folds arbitrary byte buffers into the 64-bit generator state.
//!
//! The state is treated as two independent 32-bit lanes. Byte `i` of the
//! input mixes into lane `i % 2`: lane 0 is the low half of the word, lane 1
//! the high half. Zero bytes are skipped, so a buffer made only of zeros
//! leaves the state untouched.
//!
//! Lanes are addressed with shifts and masks rather than by reinterpreting
//! the word in memory, so the result does not depend on host byte order.

/// Golden-ratio increment added to a lane before each byte is folded in.
pub const GOLDEN_GAMMA: u32 = 0x9e37_79b9;

/// Odd multiplier of the per-lane scramble step (invertible mod 2^32).
pub const LANE_MULTIPLIER: u32 = 0xffff_ffed;

/// Odd increment of the per-lane scramble step.
pub const LANE_INCREMENT: u32 = 0xffff_ffc3;

const LOW_LANE_MASK: u64 = 0xffff_ffff;

// ---------------------------------------------------------------------------
// Lane access
// ---------------------------------------------------------------------------

/// Read lane `index` (0 = low 32 bits, 1 = high 32 bits) of `state`.
#[inline(always)]
pub fn lane(state: u64, index: usize) -> u32 {
    if index == 0 {
        (state & LOW_LANE_MASK) as u32
    } else {
        (state >> 32) as u32
    }
}

#[inline(always)]
fn with_lane(state: u64, index: usize, value: u32) -> u64 {
    if index == 0 {
        (state & !LOW_LANE_MASK) | value as u64
    } else {
        (state & LOW_LANE_MASK) | ((value as u64) << 32)
    }
}

// ---------------------------------------------------------------------------
// Mixing
// ---------------------------------------------------------------------------

/// Fold a single non-zero byte into one lane.
#[inline(always)]
fn mix_lane(lane: u32, byte: u8) -> u32 {
    let lane = lane.wrapping_add(GOLDEN_GAMMA) ^ byte as u32;
    lane.wrapping_mul(LANE_MULTIPLIER)
        .wrapping_add(LANE_INCREMENT)
}

/// Mix `buffer` into `state` and return the new state.
///
/// Pure function: the same `(state, buffer)` pair always yields the same
/// result. Zero bytes contribute nothing, although they still advance the
/// byte offset and therefore the lane parity of the bytes after them.
pub fn mix(state: u64, buffer: &[u8]) -> u64 {
    let mut lanes = [lane(state, 0), lane(state, 1)];
    for (i, &byte) in buffer.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        let idx = i % 2;
        lanes[idx] = mix_lane(lanes[idx], byte);
    }
    with_lane(with_lane(state, 0, lanes[0]), 1, lanes[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_is_deterministic() {
        let buf = [0x12, 0x34, 0x00, 0xff, 0x80, 0x01];
        assert_eq!(
            mix(0xdead_beef_0bad_f00d, &buf),
            mix(0xdead_beef_0bad_f00d, &buf)
        );
    }

    #[test]
    fn zero_buffer_is_identity() {
        for state in [0u64, 1, 0x0123_4567_89ab_cdef, u64::MAX] {
            assert_eq!(mix(state, &[0u8; 16]), state);
            assert_eq!(mix(state, &[]), state);
        }
    }

    #[test]
    fn single_byte_touches_low_lane_only() {
        let state = 0x1111_2222_3333_4444u64;
        let mixed = mix(state, &[0x5a]);
        assert_ne!(lane(mixed, 0), lane(state, 0));
        assert_eq!(lane(mixed, 1), lane(state, 1));
    }

    #[test]
    fn odd_offset_touches_high_lane_only() {
        let state = 0x1111_2222_3333_4444u64;
        let mixed = mix(state, &[0x00, 0x5a]);
        assert_eq!(lane(mixed, 0), lane(state, 0));
        assert_ne!(lane(mixed, 1), lane(state, 1));
    }

    #[test]
    fn known_single_byte_value() {
        // (0 + 0x9e3779b9) ^ 1 = 0x9e3779b8
        // 0x9e3779b8 * 0xffffffed + 0xffffffc3 (mod 2^32)
        let expected = 0x9e37_79b8u32
            .wrapping_mul(0xffff_ffed)
            .wrapping_add(0xffff_ffc3);
        assert_eq!(mix(0, &[1]), expected as u64);
    }

    #[test]
    fn lane_arithmetic_wraps() {
        // Saturated lanes must wrap rather than panic in debug builds.
        let mixed = mix(u64::MAX, &[0xff, 0xff, 0xff, 0xff]);
        assert_ne!(mixed, u64::MAX);
    }

    #[test]
    fn byte_order_matters() {
        assert_ne!(mix(0, &[1, 2, 3]), mix(0, &[3, 2, 1]));
    }

    #[test]
    fn zero_bytes_shift_lane_parity() {
        // [0, b] lands b in lane 1, [b] lands it in lane 0.
        assert_ne!(mix(0, &[0, 7]), mix(0, &[7]));
    }
}
