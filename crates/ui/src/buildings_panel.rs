//! Buildings debug panel.
//!
//! An egui window editing the live [`BuildingConfig`] and sending generate /
//! reset requests. Keybind B toggles the panel.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use lots::carving::CarveMode;
use lots::generation::{Buildings, GenerateBuildings, ResetBuildings};
use lots::projection::CameraState;
use lots::BuildingConfig;
use rendering::building_render::BuildingRenderSettings;
use rendering::camera::toggle_projection;

// =============================================================================
// Resources
// =============================================================================

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct BuildingsPanel {
    pub visible: bool,
    /// Step shrink and divide one block per frame.
    pub animate: bool,
}

impl Default for BuildingsPanel {
    fn default() -> Self {
        Self {
            visible: true,
            animate: true,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// One-line status for the panel header.
pub fn status_line(buildings: &Buildings) -> String {
    if buildings.is_generating() {
        return format!(
            "{}... ({} blocks queued)",
            buildings.stage().label(),
            buildings.worker().remaining()
        );
    }
    match buildings.last_stats() {
        Some(stats) => format!(
            "{} lots, {} courtyards, {} interior lots cleared",
            buildings.lots().len(),
            stats.blocks_with_courtyards,
            stats.discarded_lots
        ),
        None => "No buildings".to_string(),
    }
}

fn config_sliders(ui: &mut egui::Ui, config: &mut BuildingConfig) {
    ui.label("Carving:");
    ui.horizontal(|ui| {
        for mode in CarveMode::ALL {
            if ui
                .selectable_label(config.mode == mode, mode.label())
                .clicked()
            {
                config.mode = mode;
            }
        }
    });
    ui.add(egui::Slider::new(&mut config.min_area, 10.0..=500.0).text("min lot area"));
    ui.add(egui::Slider::new(&mut config.max_length, 3..=50).text("max block nodes"));
    ui.add(egui::Slider::new(&mut config.shrink_spacing, 0.0..=20.0).text("street setback"));
    ui.add(
        egui::Slider::new(&mut config.chance_no_divide, 0.0..=1.0).text("chance keep whole"),
    );
    ui.add_enabled(
        config.mode == CarveMode::Courtyard,
        egui::Slider::new(&mut config.courtyard_depth, 5.0..=50.0).text("courtyard depth"),
    );

    ui.separator();
    ui.label("Heights:");
    ui.add(egui::Slider::new(&mut config.min_height, 0.0..=100.0).text("min height"));
    ui.add(egui::Slider::new(&mut config.height_range, 0.0..=100.0).text("height range"));
    ui.add(
        egui::Slider::new(&mut config.projection_distance, 200.0..=5000.0)
            .text("camera distance"),
    );
}

// =============================================================================
// Systems
// =============================================================================

#[allow(clippy::too_many_arguments)]
pub fn buildings_panel_ui(
    mut contexts: EguiContexts,
    mut panel: ResMut<BuildingsPanel>,
    mut config: ResMut<BuildingConfig>,
    mut render_settings: ResMut<BuildingRenderSettings>,
    mut camera: ResMut<CameraState>,
    buildings: Res<Buildings>,
    mut generate: EventWriter<GenerateBuildings>,
    mut reset: EventWriter<ResetBuildings>,
) {
    if !panel.visible {
        return;
    }

    let mut open = true;
    let mut edited = config.clone();
    let mut settings = render_settings.clone();
    let mut orthographic = camera.orthographic;
    let mut animate = panel.animate;

    egui::Window::new("Buildings")
        .open(&mut open)
        .resizable(false)
        .default_width(280.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.spacing_mut().item_spacing.y = 6.0;
            ui.label(status_line(&buildings));
            ui.separator();

            config_sliders(ui, &mut edited);

            ui.separator();
            ui.checkbox(&mut orthographic, "Orthographic (O)");
            ui.horizontal(|ui| {
                ui.checkbox(&mut settings.draw_streets, "Streets");
                ui.checkbox(&mut settings.draw_block_preview, "Blocks");
                ui.checkbox(&mut settings.draw_lots, "Lots");
                ui.checkbox(&mut settings.draw_buildings, "Buildings");
            });

            ui.separator();
            ui.checkbox(&mut animate, "Animate");
            ui.horizontal(|ui| {
                let idle = !buildings.is_generating();
                if ui
                    .add_enabled(idle, egui::Button::new("Add Buildings"))
                    .clicked()
                {
                    generate.send(GenerateBuildings { animate });
                }
                if ui.button("Reset").clicked() {
                    reset.send(ResetBuildings);
                }
            });
        });

    // Write back only on change so change detection stays quiet
    if edited != *config {
        *config = edited;
    }
    if settings != *render_settings {
        *render_settings = settings;
    }
    if orthographic != camera.orthographic {
        toggle_projection(&mut camera);
    }
    if animate != panel.animate {
        panel.animate = animate;
    }
    if !open {
        panel.visible = false;
    }
}

/// B: toggle the panel.
pub fn buildings_panel_keybind(
    keys: Res<ButtonInput<KeyCode>>,
    mut panel: ResMut<BuildingsPanel>,
) {
    if keys.just_pressed(KeyCode::KeyB) {
        panel.visible = !panel.visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lots::blocks::StreetGraph;
    use lots::LotRng;

    fn square_town() -> Buildings {
        let mut streets = StreetGraph::new();
        streets.add_ring(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ]);
        Buildings::new(streets)
    }

    #[test]
    fn test_status_line_before_generation() {
        assert_eq!(status_line(&square_town()), "No buildings");
    }

    #[test]
    fn test_status_line_mid_pass() {
        let mut buildings = square_town();
        buildings
            .generate(&BuildingConfig::default(), &mut LotRng::default().0, true)
            .expect("pass starts");
        let line = status_line(&buildings);
        assert!(line.starts_with("Blocks found"), "got: {line}");
        assert!(line.contains("1 blocks queued"), "got: {line}");
    }

    #[test]
    fn test_status_line_after_generation() {
        let mut buildings = square_town();
        let config = BuildingConfig {
            mode: CarveMode::Courtyard,
            ..default()
        };
        buildings
            .generate(&config, &mut LotRng::default().0, false)
            .expect("pass");
        let line = status_line(&buildings);
        assert!(line.contains("1 courtyards"), "got: {line}");
        assert!(line.starts_with(&format!("{} lots", buildings.lots().len())));
    }

    #[test]
    fn test_panel_defaults() {
        let panel = BuildingsPanel::default();
        assert!(panel.visible);
        assert!(panel.animate);
    }
}
