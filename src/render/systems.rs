use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_math::DVec2;

use super::components::GraphRoot;
use super::draw;
use super::resources::*;
use crate::core::CurveKind;

const WHEEL_ZOOM_FACTOR: f64 = 1.1;
const KEY_ZOOM_FACTOR: f64 = 1.2;

/// Keep the viewport in sync with the window; any size or dpi change
/// invalidates the frame.
pub fn track_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut view: ResMut<ViewState>,
    mut redraw: ResMut<RedrawFlag>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let width = window.width() as f64;
    let height = window.height() as f64;
    let ratio = window.resolution.scale_factor() as f64;

    let vp = &mut view.viewport;
    if vp.width != width || vp.height != height || vp.pixel_ratio != ratio {
        vp.width = width;
        vp.height = height;
        vp.pixel_ratio = ratio;
        redraw.0 = true;
    }
}

/// Pointer interaction: left-drag pans, the wheel zooms about the cursor.
pub fn handle_pan_zoom(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut view: ResMut<ViewState>,
    mut redraw: ResMut<RedrawFlag>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel: MessageReader<MouseWheel>,
    mut motion: MessageReader<MouseMotion>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let mut pan_delta = Vec2::ZERO;
    if mouse.pressed(MouseButton::Left) {
        for event in motion.read() {
            pan_delta += event.delta;
        }
    }

    if pan_delta != Vec2::ZERO {
        view.viewport
            .pan_by(DVec2::new(pan_delta.x as f64, pan_delta.y as f64));
        redraw.0 = true;
    }

    let mut notches = 0i32;
    for event in wheel.read() {
        if event.y > 0.0 {
            notches += 1;
        } else if event.y < 0.0 {
            notches -= 1;
        }
    }

    if notches != 0 {
        if let Some(cursor) = window.cursor_position() {
            let anchor = DVec2::new(cursor.x as f64, cursor.y as f64);
            view.viewport
                .zoom_about(anchor, WHEEL_ZOOM_FACTOR.powi(notches));
            redraw.0 = true;
        }
    }
}

/// Keyboard actions: `G` grid, `R` reset view, `+`/`-` zoom, `1`-`9`
/// select the nth curve, `D`/`I`/`P` derive the selection, `Delete`
/// removes it, `C` clears everything.
pub fn handle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut curves: ResMut<CurvesRes>,
    mut view: ResMut<ViewState>,
    mut redraw: ResMut<RedrawFlag>,
) {
    let mut changed = false;

    if keys.just_pressed(KeyCode::KeyG) {
        view.show_grid = !view.show_grid;
        changed = true;
    }
    if keys.just_pressed(KeyCode::KeyR) {
        view.viewport.reset();
        changed = true;
    }
    if keys.just_pressed(KeyCode::Equal) || keys.just_pressed(KeyCode::NumpadAdd) {
        view.viewport.zoom(KEY_ZOOM_FACTOR);
        changed = true;
    }
    if keys.just_pressed(KeyCode::Minus) || keys.just_pressed(KeyCode::NumpadSubtract) {
        view.viewport.zoom(1.0 / KEY_ZOOM_FACTOR);
        changed = true;
    }

    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    for (index, key) in DIGITS.into_iter().enumerate() {
        if keys.just_pressed(key) {
            if let Some(id) = curves.0.get(index).map(|c| c.id) {
                curves.0.toggle_select(id);
                changed = true;
            }
        }
    }

    for (key, kind) in [
        (KeyCode::KeyD, CurveKind::Derivative),
        (KeyCode::KeyI, CurveKind::Reciprocal),
        (KeyCode::KeyP, CurveKind::Primitive),
    ] {
        if keys.just_pressed(key) {
            match curves.0.derive_selected(kind) {
                Some(curve) => {
                    info!("added curve {}", curve.equation);
                    changed = true;
                }
                None => debug!("nothing selected to derive"),
            }
        }
    }

    if keys.just_pressed(KeyCode::Delete) || keys.just_pressed(KeyCode::Backspace) {
        let selected = curves.0.selected_curve().map(|c| (c.id, c.equation.clone()));
        if let Some((id, equation)) = selected {
            curves.0.remove(id);
            info!("removed curve {equation}");
            changed = true;
        }
    }

    if keys.just_pressed(KeyCode::KeyC) && !curves.0.is_empty() {
        curves.0.clear();
        info!("cleared all curves");
        changed = true;
    }

    if changed {
        redraw.0 = true;
    }
}

/// Rebuild the whole frame when dirty: despawn the previous render root
/// and redraw grid, axes, every curve and the overlays from scratch for
/// the current viewport. No sampled point is cached across frames.
pub fn redraw_graph(
    mut commands: Commands,
    mut redraw: ResMut<RedrawFlag>,
    roots: Query<Entity, With<GraphRoot>>,
    curves: Res<CurvesRes>,
    view: Res<ViewState>,
    opts: Res<GraphOptions>,
    unit: Res<UnitMeshes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if !redraw.0 {
        return;
    }
    redraw.0 = false;

    for root in roots.iter() {
        commands.entity(root).try_despawn();
    }

    let root = commands
        .spawn((GraphRoot, Transform::default(), Visibility::default()))
        .id();

    if view.show_grid {
        draw::draw_grid(&mut commands, root, &view.viewport, &unit, &mut materials);
    }
    draw::draw_axes(&mut commands, root, &view.viewport, &unit, &mut materials);
    draw::draw_curves(
        &mut commands,
        root,
        &curves.0,
        &view.viewport,
        &opts,
        &mut meshes,
        &mut materials,
    );
    draw::draw_legend(&mut commands, root, &curves.0, &view.viewport);
    draw::draw_readout(&mut commands, root, &view);
}
