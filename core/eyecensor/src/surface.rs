use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;

use crate::landmarks::Point;

/// A 2D affine transform in column form `[a b c d e f]`:
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(dx: f32, dy: f32) -> Transform {
        Transform {
            e: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    fn rotation(angle: f32) -> Transform {
        let (sin, cos) = angle.sin_cos();
        Transform {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Compose with a further transform applied in the current frame, i.e.
    /// `other` maps into this transform's coordinate space first.
    fn concat(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Map a point through the transform.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// An owned RGBA raster with a current affine transform, the single shared
/// resource the renderer writes to.
///
/// The transform can only be changed inside a [`TransformScope`], which
/// restores the previous transform when it drops, so a translation or
/// rotation cannot leak into later drawing operations.
pub struct Surface {
    image: RgbaImage,
    transform: Transform,
}

impl Surface {
    /// Wrap an image with an identity transform.
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            transform: Transform::IDENTITY,
        }
    }

    /// Width of the underlying raster in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the underlying raster in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The current transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Open a scope in which the transform may be adjusted and fills
    /// performed. Dropping the scope restores the transform in effect when
    /// the scope was opened.
    pub fn scope(&mut self) -> TransformScope<'_> {
        let saved = self.transform;
        TransformScope {
            surface: self,
            saved,
        }
    }

    /// Consume the surface, yielding the raster.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn fill_quad(&mut self, corners: [Point; 4], color: Rgba<u8>) {
        let mut poly: Vec<imageproc::point::Point<i32>> = corners
            .iter()
            .map(|p| imageproc::point::Point::new(p.x.round() as i32, p.y.round() as i32))
            .collect();
        poly.dedup();
        if poly.len() > 1 && poly.first() == poly.last() {
            poly.pop();
        }
        // A sub-pixel rectangle collapses under rounding; there is nothing
        // to fill.
        if poly.len() < 3 {
            return;
        }
        draw_polygon_mut(&mut self.image, &poly, color);
    }
}

/// Scoped access to a [`Surface`]'s transform.
///
/// Restores the saved transform on drop, so early returns and error paths
/// cannot leave a stale frame on the surface.
pub struct TransformScope<'a> {
    surface: &'a mut Surface,
    saved: Transform,
}

impl TransformScope<'_> {
    /// Move the origin of the current frame.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.surface.transform = self
            .surface
            .transform
            .concat(&Transform::translation(dx, dy));
    }

    /// Rotate the current frame by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        self.surface.transform = self.surface.transform.concat(&Transform::rotation(angle));
    }

    /// Fill an axis-aligned rectangle of the current frame with a solid
    /// color. The rectangle is mapped through the transform before
    /// rasterization, so a rotated frame yields a rotated fill.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        let t = self.surface.transform;
        let corners = [
            t.apply(Point::new(x, y)),
            t.apply(Point::new(x + width, y)),
            t.apply(Point::new(x + width, y + height)),
            t.apply(Point::new(x, y + height)),
        ];
        self.surface.fill_quad(corners, color);
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.surface.transform = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn white_surface(width: u32, height: u32) -> Surface {
        Surface::new(RgbaImage::from_pixel(width, height, WHITE))
    }

    #[test]
    fn scope_restores_transform_on_drop() {
        let mut surface = white_surface(10, 10);
        {
            let mut scope = surface.scope();
            scope.translate(3.0, 4.0);
            scope.rotate(0.5);
            assert_ne!(scope.surface.transform, Transform::IDENTITY);
        }
        assert_eq!(surface.transform(), Transform::IDENTITY);
    }

    #[test]
    fn scope_restores_on_early_exit() {
        fn draw_until(surface: &mut Surface, bail: bool) -> Result<(), ()> {
            let mut scope = surface.scope();
            scope.translate(5.0, 5.0);
            if bail {
                return Err(());
            }
            scope.fill_rect(0.0, 0.0, 2.0, 2.0, BLACK);
            Ok(())
        }

        let mut surface = white_surface(10, 10);
        assert!(draw_until(&mut surface, true).is_err());
        assert_eq!(surface.transform(), Transform::IDENTITY);
    }

    #[test]
    fn nested_scopes_restore_in_order() {
        let mut surface = white_surface(10, 10);
        let mut outer = surface.scope();
        outer.translate(1.0, 0.0);
        let after_outer = outer.surface.transform;
        {
            let mut inner = outer.surface.scope();
            inner.rotate(1.0);
        }
        assert_eq!(outer.surface.transform, after_outer);
        drop(outer);
        assert_eq!(surface.transform(), Transform::IDENTITY);
    }

    #[test]
    fn identity_fill_covers_rectangle() {
        let mut surface = white_surface(20, 20);
        {
            let mut scope = surface.scope();
            scope.fill_rect(5.0, 5.0, 10.0, 10.0, BLACK);
        }
        let image = surface.into_image();
        assert_eq!(image.get_pixel(10, 10), &BLACK);
        assert_eq!(image.get_pixel(6, 6), &BLACK);
        assert_eq!(image.get_pixel(2, 2), &WHITE);
        assert_eq!(image.get_pixel(18, 18), &WHITE);
    }

    #[test]
    fn translated_fill_lands_at_offset() {
        let mut surface = white_surface(20, 20);
        {
            let mut scope = surface.scope();
            scope.translate(10.0, 10.0);
            scope.fill_rect(-2.0, -2.0, 4.0, 4.0, BLACK);
        }
        let image = surface.into_image();
        assert_eq!(image.get_pixel(10, 10), &BLACK);
        assert_eq!(image.get_pixel(4, 4), &WHITE);
    }

    #[test]
    fn rotated_fill_covers_rotated_corners() {
        // A 12×2 bar rotated 90° around the surface center becomes a 2×12
        // vertical bar.
        let mut surface = white_surface(21, 21);
        {
            let mut scope = surface.scope();
            scope.translate(10.0, 10.0);
            scope.rotate(std::f32::consts::FRAC_PI_2);
            scope.fill_rect(-6.0, -1.0, 12.0, 2.0, BLACK);
        }
        let image = surface.into_image();
        assert_eq!(image.get_pixel(10, 5), &BLACK);
        assert_eq!(image.get_pixel(10, 15), &BLACK);
        assert_eq!(image.get_pixel(5, 10), &WHITE);
        assert_eq!(image.get_pixel(15, 10), &WHITE);
    }

    #[test]
    fn out_of_bounds_fill_is_clipped() {
        let mut surface = white_surface(10, 10);
        {
            let mut scope = surface.scope();
            scope.fill_rect(-20.0, -20.0, 100.0, 25.0, BLACK);
        }
        let image = surface.into_image();
        assert_eq!(image.get_pixel(0, 0), &BLACK);
        assert_eq!(image.get_pixel(9, 4), &BLACK);
        assert_eq!(image.get_pixel(5, 9), &WHITE);
    }

    #[test]
    fn degenerate_fill_draws_nothing() {
        let mut surface = white_surface(10, 10);
        {
            let mut scope = surface.scope();
            scope.fill_rect(5.0, 5.0, 0.2, 0.2, BLACK);
        }
        let image = surface.into_image();
        assert_eq!(image.get_pixel(5, 5), &WHITE);
    }

    #[test]
    fn transform_apply_composes_translate_then_rotate() {
        let translated = Transform::IDENTITY.concat(&Transform::translation(10.0, 0.0));
        let rotated = translated.concat(&Transform::rotation(std::f32::consts::FRAC_PI_2));
        // Local (1, 0) rotates onto the y axis, then shifts by the earlier
        // translation.
        let p = rotated.apply(Point::new(1.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }
}
