//! # Nearest-Neighbor Scaler
//!
//! The hot loop of the magnifier: expands a captured pixel block into the
//! fixed-size output buffer by pure pixel replication. No interpolation,
//! no averaging, no gamma handling.
//!
//! The iteration visits `capture × capture` source pixels and writes each
//! one into a `ratio × ratio` destination block, so the work per frame is
//! O(output_size²) regardless of the magnification factor.
//!
//! Pixels are 32-bit ZPixmap values (BGRX on little-endian depth-24
//! visuals). Only the first three channels are copied; the fourth byte of
//! every output pixel keeps whatever value it held on the previous frame.
//! The server ignores that byte when blitting, and skipping it saves a
//! store per pixel in the inner loop.

/// Magnify `src` into `dst` by integer pixel replication.
///
/// `src` holds a `capture_size × capture_size` block with rows of
/// `src_stride` bytes; `dst` is the `output_size × output_size` output
/// buffer, 4 bytes per pixel. All writes are bounds-checked, so ratios
/// that do not divide `output_size` and short source buffers degrade to
/// partial frames instead of panics.
pub fn magnify_into(
    src: &[u8],
    src_stride: usize,
    capture_size: u32,
    dst: &mut [u8],
    output_size: u32,
    ratio: u32,
) {
    let cap = capture_size as usize;
    let out = output_size as usize;
    let ratio = ratio as usize;

    for sy in 0..cap {
        let src_row = sy * src_stride;
        for sx in 0..cap {
            let i = src_row + sx * 4;
            if i + 4 > src.len() {
                return;
            }
            let (b, g, r) = (src[i], src[i + 1], src[i + 2]);

            let base = sy * out * ratio + sx * ratio;
            for ry in 0..ratio {
                let mut bn = (base + ry * out) * 4;
                for _ in 0..ratio {
                    if bn + 4 > dst.len() {
                        break;
                    }
                    dst[bn] = b;
                    dst[bn + 1] = g;
                    dst[bn + 2] = r;
                    // dst[bn + 3] is intentionally left as-is.
                    bn += 4;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a capture block where every pixel encodes its own coordinates.
    fn coordinate_block(size: usize) -> Vec<u8> {
        let mut src = vec![0u8; size * size * 4];
        for y in 0..size {
            for x in 0..size {
                let i = (y * size + x) * 4;
                src[i] = x as u8;
                src[i + 1] = y as u8;
                src[i + 2] = (x + y) as u8;
                src[i + 3] = 0xff;
            }
        }
        src
    }

    #[test]
    fn ratio_one_is_identity_on_copied_channels() {
        let size = 8;
        let src = coordinate_block(size);
        let mut dst = vec![0u8; size * size * 4];
        magnify_into(&src, size * 4, size as u32, &mut dst, size as u32, 1);

        for px in 0..size * size {
            let i = px * 4;
            assert_eq!(&dst[i..i + 3], &src[i..i + 3]);
        }
    }

    #[test]
    fn each_source_pixel_fills_its_ratio_block() {
        let cap = 4;
        let out = 8;
        let ratio = 2;
        let src = coordinate_block(cap);
        let mut dst = vec![0u8; out * out * 4];
        magnify_into(&src, cap * 4, cap as u32, &mut dst, out as u32, ratio as u32);

        for sy in 0..cap {
            for sx in 0..cap {
                let s = (sy * cap + sx) * 4;
                for ry in 0..ratio {
                    for rx in 0..ratio {
                        let d = ((sy * ratio + ry) * out + sx * ratio + rx) * 4;
                        assert_eq!(&dst[d..d + 3], &src[s..s + 3], "block ({sx},{sy})");
                    }
                }
            }
        }
    }

    #[test]
    fn fourth_byte_keeps_previous_frame_value() {
        let cap = 4;
        let src = coordinate_block(cap);
        let mut dst = vec![0xaau8; 8 * 8 * 4];
        magnify_into(&src, cap * 4, cap as u32, &mut dst, 8, 2);

        for px in 0..8 * 8 {
            assert_eq!(dst[px * 4 + 3], 0xaa);
        }
    }

    #[test]
    fn non_divisor_ratio_does_not_panic() {
        let cap = 3;
        let src = coordinate_block(cap);
        let mut dst = vec![0u8; 10 * 10 * 4];
        magnify_into(&src, cap * 4, cap as u32, &mut dst, 10, 3);

        // Top-left 9x9 region is written, the trailing strip is untouched.
        assert_eq!(dst[0], src[0]);
        let last_row_start = 9 * 10 * 4;
        assert!(dst[last_row_start..].iter().all(|&b| b == 0));
    }

    #[test]
    fn short_source_buffer_degrades_to_partial_frame() {
        let cap = 4;
        let src = vec![7u8; cap * 4]; // one row instead of four
        let mut dst = vec![0u8; 8 * 8 * 4];
        magnify_into(&src, cap * 4, cap as u32, &mut dst, 8, 2);
        assert_eq!(dst[0], 7);
    }
}
