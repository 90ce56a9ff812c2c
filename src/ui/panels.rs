//! UI panels: satellite search, active list, view controls and hover readout

use egui::{Color32, RichText, Ui};

use crate::sync::{ActiveEntry, EntryStatus};
use crate::viewer::HoverReadout;

/// Something the user asked for this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    Add(String),
    Remove(String),
    Retry(String),
    ZoomIn,
    ZoomOut,
    ToggleRotation,
}

/// Satellite id entry box
#[derive(Default)]
pub struct SearchPanel {
    pub query: String,
}

impl SearchPanel {
    pub fn show(&mut self, ui: &mut Ui, actions: &mut Vec<PanelAction>) {
        ui.heading("Add satellite");
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("NORAD id, e.g. 25544")
                    .desired_width(140.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add").clicked() || submitted {
                let id = self.query.trim();
                if !id.is_empty() {
                    actions.push(PanelAction::Add(id.to_string()));
                    self.query.clear();
                }
            }
        });
    }
}

/// List of desired satellites with their fetch status
pub struct ActiveListPanel;

impl ActiveListPanel {
    pub fn show(ui: &mut Ui, entries: &[ActiveEntry], actions: &mut Vec<PanelAction>) {
        ui.heading("Active satellites");
        if entries.is_empty() {
            ui.label(RichText::new("None").color(Color32::GRAY));
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(320.0)
            .show(ui, |ui| {
                for entry in entries {
                    ui.horizontal(|ui| {
                        match &entry.status {
                            EntryStatus::Displayed { name } => {
                                ui.label(format!("{} ({})", entry.id, name));
                            }
                            EntryStatus::Loading => {
                                ui.spinner();
                                ui.label(RichText::new(&entry.id).color(Color32::GRAY));
                            }
                            EntryStatus::Failed { reason } => {
                                ui.label(
                                    RichText::new(format!("{} (unavailable)", entry.id))
                                        .color(Color32::from_rgb(200, 120, 120)),
                                )
                                .on_hover_text(reason.as_str());
                                if ui.small_button("↻").on_hover_text("Retry").clicked() {
                                    actions.push(PanelAction::Retry(entry.id.clone()));
                                }
                            }
                        }
                        if ui.small_button("x").on_hover_text("Remove").clicked() {
                            actions.push(PanelAction::Remove(entry.id.clone()));
                        }
                    });
                }
            });
    }
}

/// Zoom buttons and the auto-rotate switch
pub struct ViewControls;

impl ViewControls {
    pub fn show(ui: &mut Ui, rotating: bool, label: &str, actions: &mut Vec<PanelAction>) {
        ui.horizontal(|ui| {
            if ui.button("Zoom in").clicked() {
                actions.push(PanelAction::ZoomIn);
            }
            if ui.button("Zoom out").clicked() {
                actions.push(PanelAction::ZoomOut);
            }
        });

        let mut checked = rotating;
        if ui.checkbox(&mut checked, label).changed() {
            actions.push(PanelAction::ToggleRotation);
        }
    }
}

/// Name and coordinates of whatever is under the pointer
pub struct HoverPanel;

impl HoverPanel {
    pub fn show(ui: &mut Ui, hover: Option<&HoverReadout>) {
        ui.heading("Pointer");
        match hover {
            Some(readout) => {
                ui.label(RichText::new(&readout.name).strong());
                for line in readout.lines() {
                    ui.monospace(line);
                }
            }
            None => {
                ui.label(RichText::new("Hover over the globe").color(Color32::GRAY));
            }
        }
    }
}
