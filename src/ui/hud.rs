//! HUD overlay: progression, held drink, build mode and stock

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use super::components::{BuildState, HudText, SimWorldResource, BUILD_PALETTE};

/// System to setup the HUD panel
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Auto,
                height: Val::Auto,
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(5.0),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor::all(Color::srgb(0.55, 0.35, 0.2)),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            spawn_hud_text(parent, HudText::Gold, "Gold: 0", 18.0, Color::srgb(1.0, 0.84, 0.0));
            spawn_hud_text(
                parent,
                HudText::Level,
                "Level 1 (0/100 XP)",
                14.0,
                Color::srgb(0.9, 0.9, 0.9),
            );
            spawn_hud_text(
                parent,
                HudText::HeldDrink,
                "Hands: empty",
                14.0,
                Color::srgb(0.9, 0.9, 0.9),
            );
            spawn_hud_text(
                parent,
                HudText::Mode,
                "Serve mode",
                14.0,
                Color::srgb(1.0, 1.0, 0.5),
            );
            spawn_hud_text(
                parent,
                HudText::Inventory,
                "",
                13.0,
                Color::srgb(0.8, 0.8, 0.8),
            );
        });
}

fn spawn_hud_text(
    parent: &mut ChildSpawnerCommands,
    kind: HudText,
    text: &str,
    font_size: f32,
    color: Color,
) {
    parent.spawn((
        kind,
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
    ));
}

/// System to refresh HUD text from the latest snapshot and the build state
pub fn update_hud(
    sim_world: Res<SimWorldResource>,
    build_state: Res<BuildState>,
    mut text_query: Query<(&HudText, &mut Text)>,
) {
    let Some(snapshot) = sim_world.0.bridge.latest() else {
        return;
    };

    for (kind, mut text) in text_query.iter_mut() {
        match kind {
            HudText::Gold => {
                **text = format!("Gold: {}", snapshot.gold);
            }
            HudText::Level => {
                **text = format!(
                    "Level {} ({}/{} XP)",
                    snapshot.level, snapshot.xp, snapshot.next_level_xp
                );
            }
            HudText::HeldDrink => {
                **text = if snapshot.held_drink {
                    "Hands: fresh coffee".to_string()
                } else {
                    "Hands: empty".to_string()
                };
            }
            HudText::Mode => {
                **text = match (build_state.enabled, build_state.moving) {
                    (false, _) => "Serve mode [B to build]".to_string(),
                    (true, Some(id)) => format!("Moving {:?}: click a cell", id.0),
                    (true, None) => format!("Build mode: placing {}", build_state.selected),
                };
            }
            HudText::Inventory => {
                let lines: Vec<String> = BUILD_PALETTE
                    .iter()
                    .enumerate()
                    .map(|(index, kind)| {
                        let entry = snapshot.inventory.get(kind.as_str());
                        let (count, max) = entry.map_or((0, 0), |e| (e.count, e.max));
                        format!("[{}] {}: {}/{}", index + 1, kind, count, max)
                    })
                    .collect();
                **text = lines.join("\n");
            }
        }
    }
}
