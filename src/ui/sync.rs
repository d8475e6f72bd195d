//! Systems for syncing Bevy entities with published snapshots
//!
//! The scene is rebuilt from the latest snapshot only when the publisher's
//! version has moved, never from live simulation state.

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::{
    CustomerLink, EntityMappings, FurnitureLink, SimSynced, SimWorldResource, ViewState,
};
use super::world::grid_to_world;
use crate::simulation::{
    CustomerId, CustomerSnapshot, FurnitureCategory, FurnitureId, FurnitureSnapshot,
};

/// System to run simulation tick
pub fn tick_simulation(time: Res<Time>, mut sim_world: ResMut<SimWorldResource>) {
    sim_world.0.tick(time.delta_secs());
}

fn furniture_mesh(category: FurnitureCategory) -> Mesh {
    match category {
        FurnitureCategory::Table => Cylinder::new(0.35, 0.6).into(),
        FurnitureCategory::Machine => Cuboid::new(0.5, 0.8, 0.4).into(),
        FurnitureCategory::Decor => Cuboid::new(0.25, 0.4, 0.25).into(),
    }
}

fn furniture_height(category: FurnitureCategory) -> f32 {
    match category {
        FurnitureCategory::Table => 0.3,
        FurnitureCategory::Machine => 0.4,
        FurnitureCategory::Decor => 0.2,
    }
}

fn furniture_color(snapshot: &FurnitureSnapshot, category: FurnitureCategory) -> Color {
    match category {
        FurnitureCategory::Table => match snapshot.item {
            "table_marble" => Color::srgb(0.9, 0.9, 0.92),
            "table_glass" => Color::srgba(0.7, 0.85, 0.95, 0.8),
            _ => Color::srgb(0.55, 0.35, 0.2),
        },
        FurnitureCategory::Machine => {
            if snapshot.state == Some("done") {
                Color::srgb(1.0, 0.8, 0.0)
            } else {
                // Tint from steel toward coffee brown as the brew advances
                let p = snapshot.progress.unwrap_or(0.0);
                Color::srgb(0.6 - 0.25 * p, 0.6 - 0.35 * p, 0.65 - 0.5 * p)
            }
        }
        FurnitureCategory::Decor => Color::srgb(0.3, 0.7, 0.35),
    }
}

fn furniture_transform(
    snapshot: &FurnitureSnapshot,
    category: FurnitureCategory,
    grid_size: i32,
) -> Transform {
    let base = grid_to_world(snapshot.grid_x as f32, snapshot.grid_y as f32, grid_size);
    Transform::from_translation(base + Vec3::Y * furniture_height(category))
        .with_rotation(Quat::from_rotation_y(-(snapshot.rotation as f32).to_radians()))
}

fn customer_color(snapshot: &CustomerSnapshot) -> Color {
    let base = Srgba::hex(snapshot.color)
        .map(Color::from)
        .unwrap_or(Color::WHITE);
    base.with_alpha(snapshot.opacity)
}

fn customer_transform(snapshot: &CustomerSnapshot, grid_size: i32) -> Transform {
    let height = if snapshot.state == "sitting" { 0.3 } else { 0.45 };
    Transform::from_translation(
        grid_to_world(snapshot.grid_x, snapshot.grid_y, grid_size) + Vec3::Y * height,
    )
}

/// System to sync furniture and customer visuals from the latest snapshot
#[allow(clippy::too_many_arguments)]
pub fn sync_view(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
    mut view_state: ResMut<ViewState>,
    mut mappings: ResMut<EntityMappings>,
    mut furniture_query: Query<
        (&mut Transform, &MeshMaterial3d<StandardMaterial>),
        (With<FurnitureLink>, Without<CustomerLink>),
    >,
    mut customer_query: Query<
        (&mut Transform, &MeshMaterial3d<StandardMaterial>),
        (With<CustomerLink>, Without<FurnitureLink>),
    >,
) {
    let bridge = &sim_world.0.bridge;
    let version = bridge.version();
    if version == view_state.rendered_version {
        return;
    }
    let Some(snapshot) = bridge.latest() else {
        return;
    };
    view_state.rendered_version = version;
    let grid_size = sim_world.0.grid.size();

    // Furniture: despawn removed pieces, update survivors, spawn new ones
    let live: HashSet<FurnitureId> = snapshot.furniture.iter().map(|f| f.id).collect();
    mappings.furniture.retain(|id, entity| {
        let keep = live.contains(id);
        if !keep {
            commands.entity(*entity).despawn();
        }
        keep
    });

    for piece in &snapshot.furniture {
        let category = piece.category;
        let transform = furniture_transform(piece, category, grid_size);
        let color = furniture_color(piece, category);

        if let Some(&entity) = mappings.furniture.get(&piece.id) {
            if let Ok((mut current, material)) = furniture_query.get_mut(entity) {
                *current = transform;
                if let Some(material) = materials.get_mut(&material.0) {
                    material.base_color = color;
                }
            }
            continue;
        }

        let entity = commands
            .spawn((
                SimSynced,
                FurnitureLink(piece.id),
                Mesh3d(meshes.add(furniture_mesh(category))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color,
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                })),
                transform,
            ))
            .id();
        mappings.furniture.insert(piece.id, entity);
    }

    // Customers
    let live: HashSet<CustomerId> = snapshot.customers.iter().map(|c| c.id).collect();
    mappings.customers.retain(|id, entity| {
        let keep = live.contains(id);
        if !keep {
            commands.entity(*entity).despawn();
        }
        keep
    });

    for customer in &snapshot.customers {
        let transform = customer_transform(customer, grid_size);
        let color = customer_color(customer);

        if let Some(&entity) = mappings.customers.get(&customer.id) {
            if let Ok((mut current, material)) = customer_query.get_mut(entity) {
                *current = transform;
                if let Some(material) = materials.get_mut(&material.0) {
                    material.base_color = color;
                }
            }
            continue;
        }

        let entity = commands
            .spawn((
                SimSynced,
                CustomerLink(customer.id),
                Mesh3d(meshes.add(Capsule3d::new(0.15, 0.5))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color,
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                })),
                transform,
            ))
            .id();
        mappings.customers.insert(customer.id, entity);
    }
}
