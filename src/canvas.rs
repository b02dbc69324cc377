//! Raster output
//!
//! [`Canvas`] composites a frame: background, tinted glass with solid outlines, then the light layer added on
//! top, then the suns.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::{scene::PathSink, scene::Scene, tracer::TracedPath, Point, Result};

pub const BACKGROUND: [u8; 3] = [5, 5, 10];
const GLASS_FILL_ALPHA: u8 = 20;
const SUN_RADIUS: i64 = 12;

/// Convert hue (degrees), saturation and value (percent) to RGB
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> [u8; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = (value / 100.0).clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r, g, b].map(|channel| scale_color(channel + m))
}

/// scale the color to between 0 and 255
fn scale_color(val: f64) -> u8 {
    (255.0 * val.clamp(0.0, 1.0)).round() as u8
}

fn blend(px: &mut Rgb<u8>, color: [u8; 3], alpha: u8) {
    let a = alpha as u16;
    for (dst, src) in px.0.iter_mut().zip(color) {
        *dst = ((*dst as u16 * (255 - a) + src as u16 * a) / 255) as u8;
    }
}

fn add(px: &mut Rgb<u8>, color: [u8; 3]) {
    for (dst, src) in px.0.iter_mut().zip(color) {
        *dst = dst.saturating_add(src);
    }
}

/// Bresenham line, calling `plot` for each in-bounds pixel
fn draw_line(image: &mut RgbImage, from: &Point, to: &Point, mut plot: impl FnMut(&mut Rgb<u8>)) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let (mut x0, mut y0) = (from[0].round() as i64, from[1].round() as i64);
    let (x1, y1) = (to[0].round() as i64, to[1].round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w).contains(&x0) && (0..h).contains(&y0) {
            plot(image.get_pixel_mut(x0 as u32, y0 as u32));
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Even-odd test
fn inside(polygon: &[Point], x: f64, y: f64) -> bool {
    let Some(mut j) = polygon.len().checked_sub(1) else {
        return false;
    };
    let mut inside = false;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi[1] > y) != (pj[1] > y) && x < (pj[0] - pi[0]) * (y - pi[1]) / (pj[1] - pi[1]) + pi[0]
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn fill_polygon(image: &mut RgbImage, polygon: &[Point], color: [u8; 3], alpha: u8) {
    let (w, h) = (image.width() as f64, image.height() as f64);
    let (min, max) = polygon.iter().fold(
        (Point::repeat(f64::INFINITY), Point::repeat(f64::NEG_INFINITY)),
        |(min, max), p| (min.inf(p), max.sup(p)),
    );
    let x_range = min[0].floor().max(0.0) as u32..max[0].ceil().min(w) as u32;
    let y_range = min[1].floor().max(0.0) as u32..max[1].ceil().min(h) as u32;

    for y in y_range {
        for x in x_range.clone() {
            if inside(polygon, x as f64 + 0.5, y as f64 + 0.5) {
                blend(image.get_pixel_mut(x, y), color, alpha);
            }
        }
    }
}

fn fill_disc(image: &mut RgbImage, center: &Point, radius: i64, color: [u8; 3]) {
    let (cx, cy) = (center[0].round() as i64, center[1].round() as i64);
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let inside_image = (0..image.width() as i64).contains(&x)
                && (0..image.height() as i64).contains(&y);
            if inside_image && (x - cx).pow(2) + (y - cy).pow(2) <= radius.pow(2) {
                image.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}

/// An RGB raster the frame is composited onto
pub struct Canvas {
    image: RgbImage,
    light: RgbImage,
}
impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(BACKGROUND)),
            light: RgbImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}
impl PathSink for Canvas {
    fn draw(&mut self, scene: &Scene, paths: &[TracedPath]) {
        self.image = RgbImage::from_pixel(scene.width, scene.height, Rgb(BACKGROUND));
        self.light = RgbImage::new(scene.width, scene.height);

        for shard in scene.shards().iter() {
            let color = hsv_to_rgb(shard.hue, shard.saturation, 100.0);
            let outline = shard.boundary();
            fill_polygon(&mut self.image, outline, color, GLASS_FILL_ALPHA);
            // outline is opaque, only the fill lets the background through
            for edge in shard.edges() {
                draw_line(&mut self.image, &edge.start, &edge.end, |px| *px = Rgb(color));
            }
        }

        for path in paths {
            let color = path.color();
            for segment in path.points.windows(2) {
                draw_line(&mut self.light, &segment[0], &segment[1], |px| add(px, color));
            }
        }
        for (dst, src) in self.image.pixels_mut().zip(self.light.pixels()) {
            add(dst, src.0);
        }

        for light in &scene.lights {
            fill_disc(&mut self.image, &light.position, SUN_RADIUS, light.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{light::Channel, tracer::Tracer};

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 100.0, 100.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(120.0, 100.0, 100.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(240.0, 100.0, 100.0), [0, 0, 255]);
        assert_eq!(hsv_to_rgb(360.0, 100.0, 100.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(77.0, 0.0, 100.0), [255, 255, 255]);
    }

    #[test]
    fn additive_light_saturates() {
        let mut px = Rgb([200, 0, 10]);
        add(&mut px, [100, 255, 0]);
        assert_eq!(px, Rgb([255, 255, 10]));
    }

    #[test]
    fn lines_are_clipped_to_the_image() {
        let mut image = RgbImage::new(10, 10);
        draw_line(
            &mut image,
            &Point::new(-20.0, 5.0),
            &Point::new(30.0, 5.0),
            |px| add(px, [0, 0, 255]),
        );
        assert!((0..10).all(|x| image.get_pixel(x, 5).0 == [0, 0, 255]));
        assert_eq!(image.get_pixel(0, 4).0, [0, 0, 0]);
    }

    #[test]
    fn even_odd_inside_test() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        assert!(inside(&square, 2.0, 2.0));
        assert!(!inside(&square, 5.0, 2.0));
        assert!(!inside(&[], 0.0, 0.0));
    }

    #[test]
    fn overlapping_paths_add_up() {
        let scene = Scene::new(20, 20, Vec::new(), Tracer::default());
        let paths = vec![
            TracedPath {
                channel: Channel::Red,
                points: vec![Point::new(0.0, 2.0), Point::new(19.0, 2.0)],
            },
            TracedPath {
                channel: Channel::Blue,
                points: vec![Point::new(0.0, 2.0), Point::new(19.0, 2.0)],
            },
        ];
        let mut canvas = Canvas::new(20, 20);
        canvas.draw(&scene, &paths);
        assert_eq!(canvas.image().get_pixel(3, 2).0, [255, 5, 255]);
        assert_eq!(canvas.image().get_pixel(3, 0).0, BACKGROUND);
    }

    #[test]
    fn shard_outline_is_opaque_and_fill_translucent() {
        use crate::shard::{Shard, ShardParams, Still};

        let mut scene = Scene::new(40, 40, Vec::new(), Tracer::default());
        let mut shard = Shard::new(
            vec![
                Point::new(5.0, 5.0),
                Point::new(30.0, 5.0),
                Point::new(30.0, 30.0),
                Point::new(5.0, 30.0),
            ],
            ShardParams {
                base_index: 1.5,
                volatility: 0.003,
            },
            Box::new(Still),
        );
        shard.hue = 120.0;
        scene.insert_shard(shard).unwrap();

        let mut canvas = Canvas::new(40, 40);
        canvas.draw(&scene, &[]);
        assert_eq!(canvas.image().get_pixel(12, 5).0, [0, 255, 0]);
        let fill = canvas.image().get_pixel(15, 15).0;
        assert_ne!(fill, [0, 255, 0]);
        assert!(fill[1] > BACKGROUND[1]);
        assert_eq!(canvas.image().get_pixel(35, 35).0, BACKGROUND);
    }
}
