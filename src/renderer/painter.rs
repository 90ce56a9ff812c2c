//! Draws the scene with the egui painter
//!
//! Every body is a sphere tessellated on a lat/lon grid, projected through
//! the camera and shaded per vertex by the scene lights. The Earth mesh
//! carries equirectangular texture coordinates when a map is loaded;
//! without one it is a lit ocean sphere with a graticule. Bodies are drawn
//! far to near and back-facing triangles are dropped.

use egui::epaint::{Vertex, WHITE_UV};
use egui::{Color32, Mesh, Pos2, Rect, Shape, Stroke, TextureId};
use glam::{DVec2, DVec3};

use crate::geo::to_cartesian;
use crate::scene::{BodyKind, Material, Renderable, Scene};

use super::{equirect_uv, is_occluded, lit_color, shade, Camera, Star};

const BACKGROUND: Color32 = Color32::from_rgb(5, 5, 15);
const OCEAN: [u8; 3] = [25, 60, 120];
/// Below this screen radius a body is painted as a dot
const MIN_MESH_RADIUS: f32 = 3.0;
/// Graticule spacing in degrees
const GRID_STEP: i32 = 30;
/// Samples per graticule line
const GRID_SAMPLES: i32 = 72;

/// Pointer position inside `rect` as normalised device coordinates
pub fn screen_to_ndc(rect: Rect, pos: Pos2) -> DVec2 {
    let x = (pos.x - rect.left()) / rect.width() * 2.0 - 1.0;
    let y = -((pos.y - rect.top()) / rect.height() * 2.0 - 1.0);
    DVec2::new(x as f64, y as f64)
}

pub fn ndc_to_screen(rect: Rect, ndc: DVec3) -> Pos2 {
    let center = rect.center();
    Pos2::new(
        center.x + ndc.x as f32 * rect.width() * 0.5,
        center.y - ndc.y as f32 * rect.height() * 0.5,
    )
}

pub fn aspect_ratio(rect: Rect) -> f64 {
    (rect.width() / rect.height().max(1.0)) as f64
}

fn to_screen(camera: &Camera, rect: Rect, point: DVec3) -> Option<Pos2> {
    let ndc = camera.project(point, aspect_ratio(rect))?;
    if !(0.0..1.0).contains(&ndc.z) {
        return None;
    }
    Some(ndc_to_screen(rect, ndc))
}

/// Paint one frame
pub fn paint_scene(
    painter: &egui::Painter,
    rect: Rect,
    scene: &Scene,
    camera: &Camera,
    stars: &[Star],
    earth_texture: Option<TextureId>,
) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    for star in stars {
        if let Some(pos) = to_screen(camera, rect, star.position) {
            let level = (star.brightness * 255.0) as u8;
            painter.circle_filled(pos, 1.0, Color32::from_gray(level));
        }
    }

    let primary = scene
        .primary()
        .map(|object| (scene.primary_position(), object.radius));

    let mut bodies: Vec<&Renderable> = scene.renderables().collect();
    bodies.sort_by(|a, b| {
        let da = (a.position - camera.position).length() - a.radius;
        let db = (b.position - camera.position).length() - b.radius;
        db.total_cmp(&da)
    });

    for body in bodies {
        if let (Material::Solid(_), Some((centre, radius))) = (body.material, primary) {
            if is_occluded(camera.position, body.position, centre, radius) {
                continue;
            }
        }
        paint_body(painter, rect, camera, scene, body, earth_texture);
    }
}

fn graticule_color() -> Color32 {
    Color32::from_rgba_unmultiplied(60, 110, 170, 160)
}

/// Lit sphere mesh for `body`, front faces only
pub fn sphere_mesh(
    camera: &Camera,
    rect: Rect,
    body: &Renderable,
    texture: Option<TextureId>,
    base: [u8; 3],
) -> Mesh {
    let segments = body.segments.max(8);
    let rings = (segments / 2).max(4);
    let mut mesh = texture.map(Mesh::with_texture).unwrap_or_default();

    // Grid index -> mesh vertex index, None when the point does not project
    let mut slots: Vec<Option<u32>> = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    let mut normals: Vec<DVec3> = Vec::with_capacity(slots.capacity());
    for row in 0..=rings {
        let latitude = 90.0 - 180.0 * row as f64 / rings as f64;
        for col in 0..=segments {
            let longitude = -180.0 + 360.0 * col as f64 / segments as f64;
            let normal = to_cartesian(longitude, latitude, 1.0);
            let world = body.position + normal * body.radius;
            normals.push(normal);

            let Some(pos) = to_screen(camera, rect, world) else {
                slots.push(None);
                continue;
            };
            let uv = if texture.is_some() {
                equirect_uv(longitude, latitude)
            } else {
                WHITE_UV
            };
            slots.push(Some(mesh.vertices.len() as u32));
            mesh.vertices.push(Vertex {
                pos,
                uv,
                color: lit_color(shade(world, normal), base),
            });
        }
    }

    let stride = segments + 1;
    let grid = |row: u32, col: u32| (row * stride + col) as usize;
    let faces_camera = |cells: [usize; 3]| {
        let normal: DVec3 = cells.iter().map(|&i| normals[i]).sum::<DVec3>() / 3.0;
        let point = body.position + normal * body.radius;
        normal.dot(camera.position - point) > 0.0
    };

    for row in 0..rings {
        for col in 0..segments {
            let quad = [
                grid(row, col),
                grid(row, col + 1),
                grid(row + 1, col + 1),
                grid(row + 1, col),
            ];
            for cells in [[quad[0], quad[3], quad[1]], [quad[1], quad[3], quad[2]]] {
                if !faces_camera(cells) {
                    continue;
                }
                if let [Some(a), Some(b), Some(c)] = cells.map(|i| slots[i]) {
                    mesh.add_triangle(a, b, c);
                }
            }
        }
    }
    mesh
}

fn paint_body(
    painter: &egui::Painter,
    rect: Rect,
    camera: &Camera,
    scene: &Scene,
    body: &Renderable,
    earth_texture: Option<TextureId>,
) {
    let Some(centre) = to_screen(camera, rect, body.position) else {
        return;
    };
    let rim = to_screen(camera, rect, body.position + camera.up() * body.radius);
    let pixel_radius = rim.map(|p| (p - centre).length()).unwrap_or(1.0);

    match body.material {
        Material::Earth => {
            let base = if earth_texture.is_some() { [255; 3] } else { OCEAN };
            painter.add(Shape::mesh(sphere_mesh(camera, rect, body, earth_texture, base)));
            if earth_texture.is_none() {
                paint_graticule(painter, rect, camera, body);
            }
            for i in 1..=3 {
                let r = pixel_radius * (1.0 + i as f32 * 0.03);
                let alpha = (40 - i * 10) as u8;
                painter.circle_stroke(
                    centre,
                    r,
                    Stroke::new(2.0, Color32::from_rgba_unmultiplied(100, 150, 255, alpha)),
                );
            }
        }
        Material::Solid(rgb) => {
            // Keep tiny bodies visible at any zoom
            let size = pixel_radius.max(2.5);
            if pixel_radius >= MIN_MESH_RADIUS {
                painter.add(Shape::mesh(sphere_mesh(camera, rect, body, None, rgb)));
            } else {
                let facing = (camera.position - body.position).normalize_or_zero();
                let color = lit_color(shade(body.position + facing * body.radius, facing), rgb);
                painter.circle_filled(centre, size, color);
            }

            let is_satellite = scene
                .resolve_by_renderable(body.handle)
                .and_then(|name| scene.object(name))
                .filter(|object| object.kind == BodyKind::Satellite);
            if let Some(object) = is_satellite {
                painter.text(
                    centre + egui::vec2(size + 4.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    &object.name,
                    egui::FontId::proportional(11.0),
                    Color32::from_rgb(180, 180, 180),
                );
            }
        }
    }
}

fn paint_graticule(painter: &egui::Painter, rect: Rect, camera: &Camera, body: &Renderable) {
    let stroke = Stroke::new(1.0, graticule_color());
    let radius = body.radius * 1.001;
    let to_camera = camera.position - body.position;
    let visible = |p: DVec3| (p - body.position).dot(to_camera) > body.radius * body.radius;

    let draw_line = |points: Vec<DVec3>| {
        for pair in points.windows(2) {
            if !(visible(pair[0]) && visible(pair[1])) {
                continue;
            }
            if let (Some(a), Some(b)) = (
                to_screen(camera, rect, pair[0]),
                to_screen(camera, rect, pair[1]),
            ) {
                painter.line_segment([a, b], stroke);
            }
        }
    };

    for lat in (-90 + GRID_STEP..90).step_by(GRID_STEP as usize) {
        let points = (0..=GRID_SAMPLES)
            .map(|i| {
                let lon = -180.0 + 360.0 * i as f64 / GRID_SAMPLES as f64;
                body.position + to_cartesian(lon, lat as f64, radius)
            })
            .collect();
        draw_line(points);
    }

    for lon in (-180..180).step_by(GRID_STEP as usize) {
        let points = (0..=GRID_SAMPLES)
            .map(|i| {
                let lat = -90.0 + 180.0 * i as f64 / GRID_SAMPLES as f64;
                body.position + to_cartesian(lon as f64, lat, radius)
            })
            .collect();
        draw_line(points);
    }
}
