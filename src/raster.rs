// Software rasterizer: everything on screen is drawn here, pixel by pixel.
// Visual results:
// 1) The visible part of the image, scaled nearest-neighbor into its letterbox.
// 2) Flat redaction boxes (committed ones opaque, the live preview translucent).
// 3) A crosshair following the pointer.
// The same blend is used at commit time to burn boxes into the image itself.

use std::ops::Range;

use crate::geometry::{Rect, Vec2};
use crate::types::{Color, PixelBuffer};

/// "Source over destination" with 8-bit integer math.
///
/// Alpha 0 leaves `dst` untouched and alpha 255 replaces it, bit for bit.
/// In between, the source weight is `a + 1` out of 256 so that the shift by 8
/// does not bias results towards zero.
#[inline]
pub fn blend(dst: Color, src: Color) -> Color {
    match src.a {
        0 => dst,
        255 => src,
        _ => {
            let alpha = src.a as u32 + 1;
            let inv = 256 - alpha;
            let out_a = (alpha * 256 + dst.a as u32 * inv) >> 8;
            if out_a == 0 {
                return Color { a: 0, ..dst };
            }
            // Can exceed 255 when the destination is nearly transparent; the `as u8` wrap is intended.
            let channel = |s: u8, d: u8| -> u8 {
                (((s as u32 * alpha * 256 + d as u32 * dst.a as u32 * inv) / out_a) >> 8) as u8
            };
            Color {
                r: channel(src.r, dst.r),
                g: channel(src.g, dst.g),
                b: channel(src.b, dst.b),
                a: out_a as u8,
            }
        }
    }
}

/// Pixel indices whose centers fall in [start, start + len), limited to [0, limit).
fn pixel_span(start: f32, len: f32, limit: usize) -> Range<usize> {
    let lo = (start - 0.5).ceil().max(0.0) as usize;
    let hi = (start + len - 0.5).ceil().max(0.0) as usize;
    lo.min(limit)..hi.min(limit)
}

/// Sample `image` (its `part` sub-rectangle) into `dst` on `target`.
/// Nearest-neighbor: each target pixel center is pulled back
/// target -> unit square -> image space and floored to a source index.
pub fn draw_image(target: &mut PixelBuffer, image: &PixelBuffer, part: Rect, dst: Rect) {
    if image.is_empty() || dst.is_empty() {
        return;
    }
    let clip = dst.intersect(&target.bounds());
    if clip.is_empty() {
        return;
    }
    let Some(to_unit) = dst.invert() else {
        return;
    };
    let to_image = to_unit.compose(&part);
    let (max_x, max_y) = (image.width() - 1, image.height() - 1);

    for y in pixel_span(clip.y, clip.height, target.height()) {
        for x in pixel_span(clip.x, clip.width, target.width()) {
            let p = to_image.transform(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            let sx = (p.x.floor().max(0.0) as usize).min(max_x);
            let sy = (p.y.floor().max(0.0) as usize).min(max_y);
            let (Some(src), Some(out)) = (image.get(sx, sy), target.get_mut(x, y)) else {
                continue;
            };
            *out = blend(*out, src);
        }
    }
}

/// Fill `rect` with a flat color, clipped to `target`.
pub fn draw_rectangle(target: &mut PixelBuffer, rect: Rect, color: Color) {
    if color.a == 0 || rect.is_empty() {
        return;
    }
    let clip = rect.intersect(&target.bounds());
    if clip.is_empty() {
        return;
    }
    for y in pixel_span(clip.y, clip.height, target.height()) {
        for x in pixel_span(clip.x, clip.width, target.width()) {
            if let Some(out) = target.get_mut(x, y) {
                *out = blend(*out, color);
            }
        }
    }
}

/// Blend a single pixel if (x,y) is inside bounds.
#[inline]
fn put_pixel(target: &mut PixelBuffer, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 {
        return;
    }
    if let Some(out) = target.get_mut(x as usize, y as usize) {
        *out = blend(*out, color);
    }
}

/// Small "+" centered at (cx,cy) with a gap in the middle, so the exact
/// pixel under the pointer stays visible.
pub fn draw_crosshair(target: &mut PixelBuffer, cx: i32, cy: i32, size: i32, color: Color) {
    for d in 3..=size {
        put_pixel(target, cx - d, cy, color);
        put_pixel(target, cx + d, cy, color);
        put_pixel(target, cx, cy - d, color);
        put_pixel(target, cx, cy + d, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> PixelBuffer {
        let mut img = PixelBuffer::new(width, height, Color::WHITE);
        for y in 0..height {
            for x in 0..width {
                *img.get_mut(x, y).unwrap() = Color::rgba((x * 10) as u8, (y * 10) as u8, 7, 255);
            }
        }
        img
    }

    #[test]
    fn opaque_source_replaces_destination() {
        let src = Color::rgba(12, 34, 56, 255);
        for dst in [Color::WHITE, Color::BLANK, Color::rgba(200, 100, 50, 128)] {
            assert_eq!(blend(dst, src), src);
        }
    }

    #[test]
    fn transparent_source_leaves_destination() {
        let src = Color::rgba(12, 34, 56, 0);
        for dst in [Color::WHITE, Color::BLANK, Color::rgba(200, 100, 50, 128)] {
            assert_eq!(blend(dst, src), dst);
        }
    }

    #[test]
    fn partial_alpha_matches_integer_over() {
        // alpha = 128 + 1; out_a = (129*256 + 255*127) >> 8 = 255
        // r = ((0*129*256 + 255*255*127) / 255) >> 8 = 126
        let out = blend(Color::WHITE, Color::rgba(0, 0, 0, 128));
        assert_eq!(out, Color::rgba(126, 126, 126, 255));

        // 0.7 black over white, as used by the live preview.
        let out = blend(Color::WHITE, Color::BLACK.with_alpha(0.7));
        assert_eq!(out.a, 255);
        assert!(out.r < 80 && out.r == out.g && out.g == out.b);
    }

    #[test]
    fn partial_alpha_onto_transparent_keeps_source_color() {
        let out = blend(Color::BLANK, Color::rgba(200, 100, 50, 100));
        assert_eq!((out.r, out.g, out.b), (200, 100, 50));
        assert_eq!(out.a, 101);
    }

    #[test]
    fn nearly_transparent_pair_wraps_like_an_8bit_cast() {
        // out_a = (2*256 + 1*254) >> 8 = 2; r = ((255*2*256 + 255*254) / 2) >> 8 = 381 -> 125
        let faint = Color::rgba(255, 255, 255, 1);
        assert_eq!(blend(faint, faint), Color::rgba(125, 125, 125, 2));
    }

    #[test]
    fn rectangle_covers_pixel_centers_and_clips() {
        let mut fb = PixelBuffer::new(100, 100, Color::WHITE);
        draw_rectangle(&mut fb, Rect::new(10.0, 10.0, 40.0, 40.0), Color::BLACK);
        let black = fb.pixels().iter().filter(|c| **c == Color::BLACK).count();
        assert_eq!(black, 40 * 40);
        assert_eq!(fb.get(10, 10), Some(Color::BLACK));
        assert_eq!(fb.get(49, 49), Some(Color::BLACK));
        assert_eq!(fb.get(50, 49), Some(Color::WHITE));
        assert_eq!(fb.get(9, 10), Some(Color::WHITE));

        let mut fb = PixelBuffer::new(10, 10, Color::WHITE);
        draw_rectangle(&mut fb, Rect::new(-5.0, 8.0, 100.0, 100.0), Color::BLACK);
        let black = fb.pixels().iter().filter(|c| **c == Color::BLACK).count();
        assert_eq!(black, 10 * 2);
    }

    #[test]
    fn rectangle_outside_target_draws_nothing() {
        let mut fb = PixelBuffer::new(10, 10, Color::WHITE);
        draw_rectangle(&mut fb, Rect::new(20.0, 20.0, 5.0, 5.0), Color::BLACK);
        draw_rectangle(&mut fb, Rect::new(2.0, 2.0, 0.0, 5.0), Color::BLACK);
        assert!(fb.pixels().iter().all(|c| *c == Color::WHITE));
    }

    #[test]
    fn image_at_one_to_one_is_copied() {
        let img = checker(8, 6);
        let mut fb = PixelBuffer::new(8, 6, Color::DARK_GRAY);
        let bounds = fb.bounds();
        draw_image(&mut fb, &img, img.bounds(), bounds);
        assert_eq!(fb, img);
    }

    #[test]
    fn image_scaled_up_repeats_nearest_pixel() {
        let img = checker(2, 2);
        let mut fb = PixelBuffer::new(4, 4, Color::DARK_GRAY);
        let bounds = fb.bounds();
        draw_image(&mut fb, &img, img.bounds(), bounds);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(fb.get(x, y), img.get(x / 2, y / 2), "at {x},{y}");
            }
        }
    }

    #[test]
    fn image_part_is_sampled_into_offset_destination() {
        let img = checker(10, 10);
        let mut fb = PixelBuffer::new(12, 12, Color::DARK_GRAY);
        // Show the 4x4 block starting at (3,5), doubled, at screen (2,2).
        draw_image(&mut fb, &img, Rect::new(3.0, 5.0, 4.0, 4.0), Rect::new(2.0, 2.0, 8.0, 8.0));
        assert_eq!(fb.get(1, 1), Some(Color::DARK_GRAY));
        assert_eq!(fb.get(10, 10), Some(Color::DARK_GRAY));
        assert_eq!(fb.get(2, 2), img.get(3, 5));
        assert_eq!(fb.get(9, 9), img.get(6, 8));
        assert_eq!(fb.get(5, 4), img.get(4, 6));
    }

    #[test]
    fn image_larger_than_target_is_clipped() {
        let img = checker(4, 4);
        let mut fb = PixelBuffer::new(3, 3, Color::DARK_GRAY);
        draw_image(&mut fb, &img, img.bounds(), Rect::new(-1.0, -1.0, 4.0, 4.0));
        assert_eq!(fb.get(0, 0), img.get(1, 1));
        assert_eq!(fb.get(2, 2), img.get(3, 3));
    }

    #[test]
    fn crosshair_leaves_center_and_clips() {
        let mut fb = PixelBuffer::new(20, 20, Color::WHITE);
        draw_crosshair(&mut fb, 1, 10, 6, Color::BLACK);
        assert_eq!(fb.get(1, 10), Some(Color::WHITE));
        assert_eq!(fb.get(5, 10), Some(Color::BLACK));
        assert_eq!(fb.get(1, 4), Some(Color::BLACK));
        assert_eq!(fb.get(1, 16), Some(Color::BLACK));
    }
}
