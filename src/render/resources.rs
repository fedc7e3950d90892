use bevy::prelude::*;

use crate::core::CurveSet;
use crate::path::PathOptions;
use crate::sample::SampleOptions;
use crate::view::Viewport;

/// The session's curves. Read at the start of the redraw pass and
/// mutated only by the input systems, so one frame always sees one
/// consistent set.
#[derive(Resource, Clone)]
pub struct CurvesRes(pub CurveSet);

/// Current viewport and grid visibility.
#[derive(Resource, Clone, Copy)]
pub struct ViewState {
    pub viewport: Viewport,
    pub show_grid: bool,
}

/// Sampler and segmenter tuning for the session.
#[derive(Resource, Clone, Copy)]
pub struct GraphOptions {
    pub sample: SampleOptions,
    pub path: PathOptions,
}

/// Coalesces any number of mutations into one full rebuild per frame.
/// Starts dirty so the first frame draws.
#[derive(Resource)]
pub struct RedrawFlag(pub bool);

impl Default for RedrawFlag {
    fn default() -> Self {
        Self(true)
    }
}

#[derive(Resource)]
pub struct UnitMeshes {
    pub quad: Handle<Mesh>,
}

pub fn setup_scene(mut commands: Commands) {
    commands.spawn(Camera2d::default());
}

pub fn setup_unit_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let quad = meshes.add(Mesh::from(Rectangle::new(1.0, 1.0)));
    commands.insert_resource(UnitMeshes { quad });
}
