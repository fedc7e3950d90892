//! Full-frame drawing: grid, axes with tick labels, curve stroke meshes,
//! legend and zoom readout.

#![allow(clippy::too_many_arguments)]

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_math::DVec2;
use bevy_mesh::{Indices, PrimitiveTopology};

use super::components::CurveStroke;
use super::resources::{GraphOptions, UnitMeshes, ViewState};
use crate::core::CurveSet;
use crate::path::segment_strokes;
use crate::sample::sample_curve;
use crate::view::{Viewport, format_tick};

const GRID_Z: f32 = 0.0;
const AXIS_Z: f32 = 0.5;
const CURVE_Z: f32 = 1.0;
const LABEL_Z: f32 = 2.0;
const OVERLAY_Z: f32 = 3.0;

const STROKE_WIDTH: f32 = 2.5;
const SELECTED_STROKE_WIDTH: f32 = 4.0;

/// Tick labels inside this band at the canvas edge are skipped.
const LABEL_MARGIN_PX: f64 = 20.0;

/// Canvas pixels (top-left origin, y down) to Bevy world (center origin,
/// y up). The single place where the y-flip happens.
fn screen_to_bevy(s: DVec2, vp: &Viewport) -> Vec2 {
    Vec2::new(
        (s.x - vp.width / 2.0) as f32,
        (vp.height / 2.0 - s.y) as f32,
    )
}

pub fn draw_grid(
    commands: &mut Commands,
    root: Entity,
    vp: &Viewport,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
) {
    let mat = materials.add(ColorMaterial::from(Color::srgb(0.941, 0.941, 0.941)));
    let spacing = vp.grid_spacing();
    let (left, right) = vp.world_x_span();
    let (bottom, top) = vp.world_y_span();

    commands.entity(root).with_children(|parent| {
        for i in (left / spacing).floor() as i64..=(right / spacing).ceil() as i64 {
            let sx = vp.world_to_screen(DVec2::new(i as f64 * spacing, 0.0)).x;
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(mat.clone()),
                Transform {
                    translation: Vec3::new((sx - vp.width / 2.0) as f32, 0.0, GRID_Z),
                    scale: Vec3::new(1.0, vp.height as f32, 1.0),
                    ..default()
                },
            ));
        }

        for i in (bottom / spacing).floor() as i64..=(top / spacing).ceil() as i64 {
            let sy = vp.world_to_screen(DVec2::new(0.0, i as f64 * spacing)).y;
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(mat.clone()),
                Transform {
                    translation: Vec3::new(0.0, (vp.height / 2.0 - sy) as f32, GRID_Z),
                    scale: Vec3::new(vp.width as f32, 1.0, 1.0),
                    ..default()
                },
            ));
        }
    });
}

pub fn draw_axes(
    commands: &mut Commands,
    root: Entity,
    vp: &Viewport,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
) {
    let axis_mat = materials.add(ColorMaterial::from(Color::srgb(0.2, 0.2, 0.2)));
    let origin = vp.world_to_screen(DVec2::ZERO);
    let label_color = Color::srgb(0.4, 0.4, 0.4);

    commands.entity(root).with_children(|parent| {
        // X axis
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(axis_mat.clone()),
            Transform {
                translation: Vec3::new(0.0, (vp.height / 2.0 - origin.y) as f32, AXIS_Z),
                scale: Vec3::new(vp.width as f32, 2.0, 1.0),
                ..default()
            },
        ));

        // Y axis
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(axis_mat),
            Transform {
                translation: Vec3::new((origin.x - vp.width / 2.0) as f32, 0.0, AXIS_Z),
                scale: Vec3::new(2.0, vp.height as f32, 1.0),
                ..default()
            },
        ));

        let spacing = vp.grid_spacing();
        let (left, right) = vp.world_x_span();
        let (bottom, top) = vp.world_y_span();

        // X-axis tick labels, below the axis line
        for i in (left / spacing).floor() as i64..=(right / spacing).ceil() as i64 {
            if i == 0 {
                continue;
            }
            let x = i as f64 * spacing;
            let spos = vp.world_to_screen(DVec2::new(x, 0.0));
            if spos.x <= LABEL_MARGIN_PX || spos.x >= vp.width - LABEL_MARGIN_PX {
                continue;
            }
            let at = screen_to_bevy(DVec2::new(spos.x, spos.y + 12.0), vp);
            parent.spawn((
                Text2d::new(format_tick(x, spacing)),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(label_color),
                Transform::from_translation(at.extend(LABEL_Z)),
            ));
        }

        // Y-axis tick labels, to the right of the axis line
        for i in (bottom / spacing).floor() as i64..=(top / spacing).ceil() as i64 {
            if i == 0 {
                continue;
            }
            let y = i as f64 * spacing;
            let spos = vp.world_to_screen(DVec2::new(0.0, y));
            if spos.y <= LABEL_MARGIN_PX || spos.y >= vp.height - LABEL_MARGIN_PX {
                continue;
            }
            let at = screen_to_bevy(DVec2::new(spos.x + 16.0, spos.y), vp);
            parent.spawn((
                Text2d::new(format_tick(y, spacing)),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(label_color),
                Transform::from_translation(at.extend(LABEL_Z)),
            ));
        }
    });
}

/// Sample, segment and stroke every curve for the current viewport.
pub fn draw_curves(
    commands: &mut Commands,
    root: Entity,
    curves: &CurveSet,
    vp: &Viewport,
    opts: &GraphOptions,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    for (index, curve) in curves.iter().enumerate() {
        let samples = sample_curve(curve, vp, &opts.sample);
        let strokes = segment_strokes(&samples, vp, &opts.path);
        if strokes.is_empty() {
            continue;
        }

        let width = if curves.is_selected(curve.id) {
            SELECTED_STROKE_WIDTH
        } else {
            STROKE_WIDTH
        };
        let mat = materials.add(ColorMaterial::from(Color::from(curve.color)));
        let z = CURVE_Z + index as f32 * 0.01;
        let id = curve.id;

        commands.entity(root).with_children(|parent| {
            for stroke in &strokes {
                let points: Vec<Vec2> = stroke.iter().map(|p| screen_to_bevy(*p, vp)).collect();
                if let Some(mesh) = build_stroke_mesh(&points, width) {
                    parent.spawn((
                        Mesh2d(meshes.add(mesh)),
                        MeshMaterial2d(mat.clone()),
                        Transform::from_translation(Vec3::new(0.0, 0.0, z)),
                        CurveStroke { id },
                    ));
                }
            }
        });
    }
}

/// Build a triangle-list ribbon along the polyline: two offset vertices
/// per point, two triangles per segment. Per-vertex direction averages
/// the adjacent segments so joints stay tight.
fn build_stroke_mesh(points: &[Vec2], width: f32) -> Option<Mesh> {
    if points.len() < 2 {
        return None;
    }

    let half = width * 0.5;
    let n = points.len();

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n * 2);
    for i in 0..n {
        let dir = if i == 0 {
            points[1] - points[0]
        } else if i == n - 1 {
            points[n - 1] - points[n - 2]
        } else {
            points[i + 1] - points[i - 1]
        };
        let dir = if dir.length_squared() > 0.0 {
            dir.normalize()
        } else {
            Vec2::X
        };
        let normal = Vec2::new(-dir.y, dir.x) * half;

        let p = points[i];
        positions.push([p.x + normal.x, p.y + normal.y, 0.0]);
        positions.push([p.x - normal.x, p.y - normal.y, 0.0]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity((n - 1) * 6);
    for i in 0..(n - 1) {
        let a = (2 * i) as u32;
        indices.extend_from_slice(&[a, a + 1, a + 2]);
        indices.extend_from_slice(&[a + 1, a + 3, a + 2]);
    }

    let vertex_count = positions.len();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; vertex_count];
    let uvs: Vec<[f32; 2]> = vec![[0.0, 0.0]; vertex_count];

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));

    Some(mesh)
}

/// Curve list in the top-left corner: index, equation, palette color.
/// The selected entry renders larger.
pub fn draw_legend(commands: &mut Commands, root: Entity, curves: &CurveSet, vp: &Viewport) {
    commands.entity(root).with_children(|parent| {
        for (index, curve) in curves.iter().enumerate() {
            let selected = curves.is_selected(curve.id);
            let at = screen_to_bevy(
                DVec2::new(70.0, 20.0 + index as f64 * 18.0),
                vp,
            );
            parent.spawn((
                Text2d::new(format!("{}: {}", index + 1, curve.equation)),
                TextFont {
                    font_size: if selected { 15.0 } else { 13.0 },
                    ..default()
                },
                TextColor(Color::from(curve.color)),
                Transform::from_translation(at.extend(OVERLAY_Z)),
            ));
        }
    });
}

/// Zoom/grid readout in the top-right corner.
pub fn draw_readout(commands: &mut Commands, root: Entity, view: &ViewState) {
    let vp = &view.viewport;
    let text = format!(
        "Zoom: {:.1}x | Grid: {}",
        vp.zoom_level(),
        if view.show_grid { "ON" } else { "OFF" }
    );
    let at = screen_to_bevy(DVec2::new(vp.width - 90.0, 20.0), vp);

    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Text2d::new(text),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(Color::srgb(0.4, 0.4, 0.4)),
            Transform::from_translation(at.extend(OVERLAY_Z)),
        ));
    });
}
