//! Input handling systems
//!
//! Every change the player makes is sent as a command; nothing here touches
//! simulation state directly.

use bevy::prelude::*;

use super::components::{
    BuildState, CursorMarker, MainCamera, SimWorldResource, ViewCommands, BUILD_PALETTE,
};
use super::world::{grid_to_world, world_to_grid};
use crate::simulation::{Command, FurnitureCategory, FurnitureId, GridCell, WorldSnapshot};

/// Handle basic keyboard input
pub fn handle_input(keyboard: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

/// System to track the grid cell under the mouse and move the highlight
pub fn update_cursor_cell(
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut marker_query: Query<(&mut Transform, &mut Visibility), With<CursorMarker>>,
    mut build_state: ResMut<BuildState>,
    sim_world: Res<SimWorldResource>,
) {
    build_state.cursor_cell = cursor_cell(&windows, &camera_query, &sim_world);

    let Ok((mut transform, mut visibility)) = marker_query.single_mut() else {
        return;
    };
    match build_state.cursor_cell {
        Some(cell) => {
            let size = sim_world.0.grid.size();
            transform.translation =
                grid_to_world(cell.col as f32, cell.row as f32, size) + Vec3::Y * 0.01;
            *visibility = Visibility::Visible;
        }
        None => *visibility = Visibility::Hidden,
    }
}

fn cursor_cell(
    windows: &Query<&Window>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    sim_world: &SimWorldResource,
) -> Option<GridCell> {
    let window = windows.single().ok()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    let cursor_position = window.cursor_position()?;

    // Cast ray from camera through cursor position onto the floor (y = 0)
    let ray = camera
        .viewport_to_world(camera_transform, cursor_position)
        .ok()?;
    let distance = ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))?;
    let point = ray.get_point(distance);

    let grid = &sim_world.0.grid;
    let (col, row) = world_to_grid(point, grid.size());
    let cell = GridCell::new(col.round() as i32, row.round() as i32);
    grid.in_bounds(cell).then_some(cell)
}

/// Topmost piece on a cell; tables and machines win over decor
fn furniture_at(
    snapshot: &WorldSnapshot,
    cell: GridCell,
) -> Option<(FurnitureId, FurnitureCategory)> {
    snapshot
        .furniture
        .iter()
        .rev()
        .filter(|f| f.grid_x == cell.col && f.grid_y == cell.row)
        .map(|f| (f.id, f.category))
        .max_by_key(|(_, category)| category.is_exclusive())
}

/// System to handle keyboard commands
pub fn handle_command_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut build_state: ResMut<BuildState>,
    sim_world: Res<SimWorldResource>,
    sender: Res<ViewCommands>,
) {
    if keyboard.just_pressed(KeyCode::KeyB) {
        build_state.enabled = !build_state.enabled;
        build_state.moving = None;
    }

    let digits = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
    for (key, kind) in digits.iter().zip(BUILD_PALETTE) {
        if keyboard.just_pressed(*key) {
            build_state.selected = kind;
            build_state.enabled = true;
            build_state.moving = None;
        }
    }

    let Some(snapshot) = sim_world.0.bridge.latest() else {
        return;
    };
    let under_cursor = build_state
        .cursor_cell
        .and_then(|cell| furniture_at(&snapshot, cell));

    if build_state.enabled {
        let Some((id, _)) = under_cursor else {
            return;
        };
        if keyboard.just_pressed(KeyCode::KeyR) {
            sender.0.send(Command::RotateFurniture { id });
        }
        if keyboard.just_pressed(KeyCode::Delete) {
            sender.0.send(Command::DeleteFurniture { id });
        }
        if keyboard.just_pressed(KeyCode::KeyM) {
            build_state.moving = Some(id);
        }
        return;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        // The machine under the cursor, or else the first one placed
        let machine = under_cursor
            .filter(|(_, category)| *category == FurnitureCategory::Machine)
            .map(|(id, _)| id)
            .or_else(|| {
                snapshot
                    .furniture
                    .iter()
                    .find(|f| f.category == FurnitureCategory::Machine)
                    .map(|f| f.id)
            });
        if let Some(id) = machine {
            sender.0.send(Command::BrewCoffee { id });
        }
    }

    if keyboard.just_pressed(KeyCode::KeyS) {
        let (cx, cy) = build_state
            .cursor_cell
            .map_or((0.0, 0.0), |cell| (cell.col as f32, cell.row as f32));
        let nearest = snapshot
            .customers
            .iter()
            .filter(|c| c.state == "sitting" && c.order.is_some())
            .min_by(|a, b| {
                let da = (a.grid_x - cx).powi(2) + (a.grid_y - cy).powi(2);
                let db = (b.grid_x - cx).powi(2) + (b.grid_y - cy).powi(2);
                da.total_cmp(&db)
            });
        if let Some(customer) = nearest {
            sender.0.send(Command::ServeCustomer { id: customer.id });
        }
    }
}

/// System to place or move furniture on left click in build mode
pub fn handle_build_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut build_state: ResMut<BuildState>,
    sender: Res<ViewCommands>,
) {
    if !build_state.enabled || !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(cell) = build_state.cursor_cell else {
        return;
    };

    let command = match build_state.moving.take() {
        Some(id) => Command::MoveFurniture {
            id,
            x: cell.col,
            y: cell.row,
        },
        None => Command::PlaceFurniture {
            item: build_state.selected.as_str().to_string(),
            x: cell.col,
            y: cell.row,
            id: None,
        },
    };
    sender.0.send(command);
}
