use super::camera::Camera;
use super::error::EngineError;
use super::scene::{BoxOverlay, Legend, Scene, SceneAtom};
use super::text;
use image::{Rgb, RgbImage};
use nalgebra::Vector3;

/// Turns a scene seen through a camera into one video frame.
pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<RgbImage, EngineError>;
}

const AMBIENT: f64 = 0.35;
const DIFFUSE: f64 = 0.65;
const SPECULAR: f64 = 0.25;
const LINE_DEPTH_BIAS: f64 = 1e-3;
const LEGEND_TICKS: usize = 5;

/// Software z-buffer renderer drawing atoms as shaded sphere impostors.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    depth: Vec<f64>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset_depth(&mut self, width: u32, height: u32) {
        let len = width as usize * height as usize;
        self.depth.clear();
        self.depth.resize(len, f64::INFINITY);
    }

    /// Writes `color` at (x, y) if `depth` is nearer than what the pixel already holds.
    fn plot(&mut self, image: &mut RgbImage, x: i64, y: i64, depth: f64, color: Rgb<u8>) {
        let (width, height) = image.dimensions();
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return;
        }
        let index = y as usize * width as usize + x as usize;
        if depth < self.depth[index] {
            self.depth[index] = depth;
            image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn draw_atom(
        &mut self,
        image: &mut RgbImage,
        atom: &SceneAtom,
        camera: &Camera,
        radius: f64,
        light: &Vector3<f64>,
    ) {
        let (width, height) = image.dimensions();
        let Some(center) = camera.project(&atom.position, width, height) else {
            return;
        };
        // World units covered by one pixel at the atom's depth.
        let world_per_pixel = center.depth / camera.focal_length_pixels(height);

        let reach = radius.ceil() as i64;
        let (cx, cy) = (center.x.floor() as i64, center.y.floor() as i64);
        for y in (cy - reach)..=(cy + reach) {
            for x in (cx - reach)..=(cx + reach) {
                let dx = (x as f64 + 0.5 - center.x) / radius;
                let dy = (y as f64 + 0.5 - center.y) / radius;
                let r2 = dx * dx + dy * dy;
                if r2 > 1.0 {
                    continue;
                }
                let nz = (1.0 - r2).sqrt();
                let normal = Vector3::new(dx, -dy, nz);
                let diffuse = normal.dot(light).max(0.0);
                let half = (light + Vector3::z()).normalize();
                let specular = normal.dot(&half).max(0.0).powi(24);
                let shade = AMBIENT + DIFFUSE * diffuse;

                let color = Rgb(std::array::from_fn(|c| {
                    let lit = atom.color.0[c] as f64 * shade + 255.0 * SPECULAR * specular;
                    lit.round().clamp(0.0, 255.0) as u8
                }));
                let depth = center.depth - nz * radius * world_per_pixel;
                self.plot(image, x, y, depth, color);
            }
        }
    }

    fn draw_box(&mut self, image: &mut RgbImage, overlay: &BoxOverlay, camera: &Camera) {
        let (width, height) = image.dimensions();
        let thickness = overlay.line_width.round().max(1.0) as i64;
        let lead = (thickness - 1) / 2;

        for (a, b) in &overlay.edges {
            let (Some(p), Some(q)) = (
                camera.project(a, width, height),
                camera.project(b, width, height),
            ) else {
                continue;
            };
            let steps = (q.x - p.x).abs().max((q.y - p.y).abs()).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let x = (p.x + (q.x - p.x) * t).floor() as i64;
                let y = (p.y + (q.y - p.y) * t).floor() as i64;
                let depth = p.depth + (q.depth - p.depth) * t - LINE_DEPTH_BIAS;
                for oy in 0..thickness {
                    for ox in 0..thickness {
                        self.plot(image, x - lead + ox, y - lead + oy, depth, overlay.color);
                    }
                }
            }
        }
    }
}

fn draw_legend(image: &mut RgbImage, legend: &Legend) {
    let (width, height) = (image.width() as f64, image.height() as f64);
    let style = &legend.style;

    let left = (style.position_x * width).round() as i64;
    let bar_width = ((style.width * width).round() as i64).max(2);
    let bottom = (height - style.position_y * height).round() as i64;
    let bar_height = ((style.height * height).round() as i64).max(2);
    let top = bottom - bar_height;

    let in_frame = |x: i64, y: i64| x >= 0 && y >= 0 && x < width as i64 && y < height as i64;
    for x in 0..bar_width {
        let color = legend.colormap.sample(x as f64 / (bar_width - 1) as f64);
        for y in top..bottom {
            if in_frame(left + x, y) {
                image.put_pixel((left + x) as u32, y as u32, color);
            }
        }
    }
    for x in left - 1..=left + bar_width {
        for y in [top - 1, bottom] {
            if in_frame(x, y) {
                image.put_pixel(x as u32, y as u32, style.color);
            }
        }
    }
    for y in top - 1..=bottom {
        for x in [left - 1, left + bar_width] {
            if in_frame(x, y) {
                image.put_pixel(x as u32, y as u32, style.color);
            }
        }
    }

    let (_, tick_height) = text::text_size("0", style.label_font_size);
    for tick in 0..LEGEND_TICKS {
        let value = tick as f64 / (LEGEND_TICKS - 1) as f64;
        let x = left as f64 + value * (bar_width - 1) as f64;
        let y = bottom as f64 + 4.0 + tick_height as f64 / 2.0;
        text::draw_text_centered(
            image,
            &format!("{:.2}", value),
            x,
            y,
            style.label_font_size,
            style.color,
            style.bold,
        );
    }

    let (_, title_height) = text::text_size(&style.title, style.title_font_size);
    let title_y = top as f64 - style.title_offset_y * height - title_height as f64 / 2.0;
    text::draw_text_centered(
        image,
        &style.title,
        left as f64 + bar_width as f64 / 2.0,
        title_y,
        style.title_font_size,
        style.color,
        style.bold,
    );
}

impl FrameRenderer for RasterRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<RgbImage, EngineError> {
        if scene.width == 0 || scene.height == 0 {
            return Err(EngineError::Render(format!(
                "frame size {}x{} is empty",
                scene.width, scene.height
            )));
        }
        let mut image = RgbImage::from_pixel(scene.width, scene.height, scene.background);
        self.reset_depth(scene.width, scene.height);

        let light = Vector3::new(-0.4, 0.5, 1.0).normalize();
        let radius = (scene.point_size / 2.0).max(0.5);
        for atom in &scene.atoms {
            self.draw_atom(&mut image, atom, camera, radius, &light);
        }

        if let Some(overlay) = &scene.bounding_box {
            self.draw_box(&mut image, overlay, camera);
        }

        for label in &scene.labels {
            if let Some(anchor) = camera.project(&label.anchor, scene.width, scene.height) {
                text::draw_text_centered(
                    &mut image,
                    &label.text,
                    anchor.x,
                    anchor.y,
                    label.style.font_size,
                    label.style.color,
                    label.style.bold,
                );
            }
        }

        if let Some(legend) = &scene.legend {
            draw_legend(&mut image, legend);
        }

        Ok(image)
    }
}
