//! satglobe - interactive 3D Earth with live satellite positions

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use glam::DVec2;

use satglobe::config::AppConfig;
use satglobe::data::TleClient;
use satglobe::propagation::Sgp4Locator;
use satglobe::renderer::{
    aspect_ratio, generate_stars, load_earth_texture, paint_scene, screen_to_ndc, EarthTexture,
    Star, DEFAULT_STAR_COUNT,
};
use satglobe::scene::Scene;
use satglobe::sync::SatelliteSync;
use satglobe::ui::{ActiveListPanel, HoverPanel, PanelAction, SearchPanel, ViewControls};
use satglobe::viewer::Viewer;

/// Application state
pub struct SatGlobeApp {
    scene: Scene,
    sync: SatelliteSync,
    viewer: Viewer,
    stars: Vec<Star>,
    /// Decoded map waiting for upload on the first frame
    earth_image: Option<EarthTexture>,
    earth_texture: Option<egui::TextureHandle>,

    // UI state
    search_panel: SearchPanel,
    camera_drag: Option<egui::Pos2>,

    last_log_time: Instant,
}

impl SatGlobeApp {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut scene = Scene::with_earth()?;

        log::info!("Using TLE API at {}", config.api_base);
        let client = TleClient::new(config.api_base.clone(), config.http_timeout())?;
        let mut sync = SatelliteSync::new(Arc::new(client), Arc::new(Sgp4Locator));

        let report = sync.reconcile(&mut scene, config.initial_satellites().collect());
        log::info!("Requested {} initial satellites", report.requested.len());

        if config.settle_on_start && !sync.settle(&mut scene, config.http_timeout() * 2) {
            log::warn!("Some initial lookups are still pending; continuing");
        }

        let earth_image = match load_earth_texture(&config.earth_texture) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("{:#}; drawing the Earth without a map", e);
                None
            }
        };

        Ok(Self {
            scene,
            sync,
            viewer: Viewer::new(!config.no_rotate),
            stars: generate_stars(DEFAULT_STAR_COUNT, config.star_seed),
            earth_image,
            earth_texture: None,
            search_panel: SearchPanel::default(),
            camera_drag: None,
            last_log_time: Instant::now(),
        })
    }

    fn apply_actions(&mut self, actions: Vec<PanelAction>) {
        for action in actions {
            match action {
                PanelAction::Add(id) => {
                    if !self.sync.request(&mut self.scene, &id) {
                        log::debug!("Satellite {} is already active", id);
                    }
                }
                PanelAction::Remove(id) => {
                    self.sync.remove(&mut self.scene, &id);
                    self.viewer.drop_stale_hover(&self.scene);
                }
                PanelAction::Retry(id) => {
                    self.sync.retry(&id);
                }
                PanelAction::ZoomIn => self.viewer.zoom_in(&self.scene),
                PanelAction::ZoomOut => self.viewer.zoom_out(&self.scene),
                PanelAction::ToggleRotation => {
                    self.viewer.toggle_rotation();
                }
            }
        }
    }

    fn handle_viewport_input(&mut self, ctx: &egui::Context, viewport_rect: egui::Rect) {
        let input = ctx.input(|i| i.clone());

        let Some(pos) = input.pointer.hover_pos() else {
            self.camera_drag = None;
            return;
        };
        if !viewport_rect.contains(pos) {
            self.camera_drag = None;
            return;
        }

        if input.pointer.is_moving() {
            let ndc = screen_to_ndc(viewport_rect, pos);
            self.viewer
                .pointer_moved(&self.scene, ndc, aspect_ratio(viewport_rect));
        }

        let scroll = input.raw_scroll_delta.y;
        if scroll != 0.0 {
            self.viewer.scroll(scroll as f64 * 0.01);
        }

        // Drag to orbit
        if input.pointer.button_down(egui::PointerButton::Primary) {
            if let Some(last_pos) = self.camera_drag {
                let delta = pos - last_pos;
                self.viewer.drag(DVec2::new(delta.x as f64, delta.y as f64));
            }
            self.camera_drag = Some(pos);
        } else {
            self.camera_drag = None;
        }
    }

    fn render_viewport(&mut self, ui: &mut egui::Ui) {
        let viewport_rect = ui.available_rect_before_wrap();
        self.handle_viewport_input(ui.ctx(), viewport_rect);

        let (response, painter) =
            ui.allocate_painter(viewport_rect.size(), egui::Sense::click_and_drag());
        paint_scene(
            &painter,
            response.rect,
            &self.scene,
            &self.viewer.camera,
            &self.stars,
            self.earth_texture.as_ref().map(|t| t.id()),
        );

        let angle = self.viewer.camera.angle();
        painter.text(
            response.rect.left_top() + egui::vec2(10.0, 10.0),
            egui::Align2::LEFT_TOP,
            format!(
                "Camera: r={:.1} lon={:.1}° lat={:.1}°\n\
                 Drag to orbit | Scroll to zoom",
                angle.radius, angle.longitude, angle.latitude,
            ),
            egui::FontId::monospace(12.0),
            egui::Color32::from_rgb(150, 150, 150),
        );
    }
}

impl eframe::App for SatGlobeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(image) = self.earth_image.take() {
            self.earth_texture = Some(ctx.load_texture(
                "earth",
                image.to_color_image(),
                egui::TextureOptions::LINEAR,
            ));
        }

        let summary = self.sync.poll(&mut self.scene);
        if summary.applied > 0 {
            log::debug!("Applied {} lookup results", summary.applied);
        }

        self.viewer.tick(&self.scene);

        if self.last_log_time.elapsed().as_secs_f32() > 10.0 {
            self.last_log_time = Instant::now();
            log::trace!(
                "Scene: {} bodies, {} lookups in flight, revision {}",
                self.scene.renderable_count(),
                self.sync.in_flight(),
                self.scene.revision()
            );
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("satglobe");
                ui.separator();
                ui.label(format!(
                    "Active: {} | Shown: {} | Loading: {}",
                    self.sync.desired().len(),
                    self.sync.displayed_ids().len(),
                    self.sync.in_flight()
                ));
            });
        });

        egui::SidePanel::left("left_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                self.search_panel.show(ui, &mut actions);
                ui.separator();
                ActiveListPanel::show(ui, &self.sync.entries(), &mut actions);
                ui.separator();
                ViewControls::show(
                    ui,
                    self.viewer.auto_rotate(),
                    self.viewer.rotation_label(),
                    &mut actions,
                );
                ui.separator();
                HoverPanel::show(ui, self.viewer.hover());
            });

        self.apply_actions(actions);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.render_viewport(ui);
            });

        ctx.request_repaint();
    }
}

fn main() -> Result<()> {
    let config = AppConfig::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    log::info!("Starting satglobe...");
    let app = SatGlobeApp::new(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_title("satglobe"),
        ..Default::default()
    };

    eframe::run_native(
        "satglobe",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
