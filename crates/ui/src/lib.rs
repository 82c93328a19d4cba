use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod buildings_panel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<buildings_panel::BuildingsPanel>()
            .add_systems(
                Update,
                (
                    buildings_panel::buildings_panel_keybind,
                    buildings_panel::buildings_panel_ui,
                )
                    .chain()
                    .before(lots::LotsSet),
            );
    }
}
