pub mod components;
pub mod draw;
pub mod resources;
pub mod systems;

pub use resources::*;
use systems::*;

use bevy::prelude::*;

#[derive(Default)]
pub struct GraphRenderPlugin;

impl Plugin for GraphRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RedrawFlag>()
            .add_systems(Startup, (setup_scene, setup_unit_meshes))
            .add_systems(
                Update,
                (track_window, handle_pan_zoom, handle_keys, redraw_graph).chain(),
            );
    }
}
