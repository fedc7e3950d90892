use bevy::prelude::*;

use crate::graph::GraphScene;
use crate::render::{CurvesRes, GraphOptions, GraphRenderPlugin, ViewState};

fn insert_scene(app: &mut App, scene: GraphScene) {
    app.insert_resource(ClearColor(scene.background.into()))
        .insert_resource(CurvesRes(scene.curves))
        .insert_resource(ViewState {
            viewport: scene.viewport,
            show_grid: scene.show_grid,
        })
        .insert_resource(GraphOptions {
            sample: scene.sample,
            path: scene.path,
        });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_grapher(scene: GraphScene) {
    let mut app = App::new();
    insert_scene(&mut app, scene);
    app.add_plugins((
        DefaultPlugins.set(ImagePlugin::default_nearest()),
        GraphRenderPlugin,
    ))
    .run();
}

#[cfg(target_arch = "wasm32")]
pub fn run_grapher(scene: GraphScene, canvas_id: &str) {
    let mut app = App::new();
    insert_scene(&mut app, scene);
    app.add_plugins((
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    canvas: Some(format!("#{}", canvas_id)),
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
        GraphRenderPlugin,
    ))
    .run();
}
