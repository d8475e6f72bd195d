//! World setup systems for camera, lighting, and the shop floor

use bevy::prelude::*;

use super::components::{CursorMarker, FloorTile, MainCamera, SimWorldResource};

/// Side of one floor tile in world units
pub const TILE_SIZE: f32 = 1.0;

/// World-space center of a (possibly fractional) grid coordinate. The floor
/// is centered on the origin, columns along +X and rows along +Z.
pub fn grid_to_world(col: f32, row: f32, grid_size: i32) -> Vec3 {
    let half = (grid_size - 1) as f32 / 2.0;
    Vec3::new((col - half) * TILE_SIZE, 0.0, (row - half) * TILE_SIZE)
}

/// Fractional grid coordinate of a point on the floor plane
pub fn world_to_grid(point: Vec3, grid_size: i32) -> (f32, f32) {
    let half = (grid_size - 1) as f32 / 2.0;
    (point.x / TILE_SIZE + half, point.z / TILE_SIZE + half)
}

/// System to setup the world environment (floor, lighting, camera)
pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
) {
    let grid = &sim_world.0.grid;
    let size = grid.size();

    // Isometric-style camera looking down at the floor
    let extent = size as f32 * TILE_SIZE;
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_xyz(extent, extent * 1.1, extent).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Checkerboard floor
    let tile_mesh = meshes.add(Cuboid::new(TILE_SIZE * 0.98, 0.05, TILE_SIZE * 0.98));
    let light_wood = materials.add(Color::srgb(0.76, 0.6, 0.42));
    let dark_wood = materials.add(Color::srgb(0.66, 0.5, 0.34));
    for cell in grid.cells() {
        let material = if (cell.col + cell.row) % 2 == 0 {
            light_wood.clone()
        } else {
            dark_wood.clone()
        };
        commands.spawn((
            FloorTile,
            Mesh3d(tile_mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(
                grid_to_world(cell.col as f32, cell.row as f32, size) - Vec3::Y * 0.025,
            ),
        ));
    }

    // Street in front of the shop
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(extent * 3.0, 0.02, TILE_SIZE * 2.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.35, 0.38))),
        Transform::from_translation(grid_to_world(
            (size - 1) as f32 / 2.0,
            sim_world.0.config.customers.door_row,
            size,
        )),
    ));

    commands.spawn((
        CursorMarker,
        Mesh3d(meshes.add(Cuboid::new(TILE_SIZE, 0.02, TILE_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::from_translation(Vec3::Y * 0.01),
        Visibility::Hidden,
    ));
}
