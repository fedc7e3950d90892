use bevy::prelude::*;

use crate::core::CurveId;

/// Root entity of everything rebuilt on a dirty frame: grid, axes,
/// curve strokes, legend and readout. Despawned wholesale before each
/// rebuild; nothing sampled survives a frame.
#[derive(Component)]
pub struct GraphRoot;

/// Marker on each stroke mesh with the curve it belongs to.
#[derive(Component)]
pub struct CurveStroke {
    pub id: CurveId,
}
