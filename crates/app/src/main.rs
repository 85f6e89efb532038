use std::collections::VecDeque;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use roadworks::config::RoadToolConfig;
use roadworks::grid::WorldGrid;
use roadworks::props::{PropKind, PropStore};
use roadworks::road_tool::{handle_road_tool_input, RoadEditOutcome, RoadToolInput};
use roadworks::terrain::generate_terrain;
use roadworks::RoadworksPlugin;

const DEFAULT_TERRAIN_SEED: i32 = 1337;

fn main() {
    let mut app = App::new();

    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    // Optional JSON tunables, e.g. ROADWORKS_CONFIG=road_tool.json
    if let Ok(path) = std::env::var("ROADWORKS_CONFIG") {
        match std::fs::read_to_string(&path).map_err(|e| e.to_string()).and_then(|text| {
            RoadToolConfig::from_json(&text).map_err(|e| e.to_string())
        }) {
            Ok(config) => {
                app.insert_resource(config);
            }
            Err(e) => warn!("ignoring road tool config {path}: {e}"),
        }
    }

    let seed = std::env::var("ROADWORKS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TERRAIN_SEED);

    app.insert_resource(TerrainSeed(seed))
        .insert_resource(DemoScript::crossroads())
        .add_plugins(RoadworksPlugin)
        .add_systems(Startup, seed_terrain)
        .add_systems(
            Update,
            (
                play_script.before(handle_road_tool_input),
                report_outcomes.after(handle_road_tool_input),
            ),
        );

    app.run();
}

#[derive(Resource)]
struct TerrainSeed(i32);

fn seed_terrain(seed: Res<TerrainSeed>, mut grid: ResMut<WorldGrid>) {
    generate_terrain(&mut grid, seed.0);
    info!(
        "terrain seeded with {} (fingerprint {:08x})",
        seed.0,
        grid.fingerprint()
    );
}

/// Pointer events replayed one per frame.
#[derive(Resource)]
struct DemoScript {
    queue: VecDeque<RoadToolInput>,
}

impl DemoScript {
    fn gesture(&mut self, from: IVec2, to: IVec2, release: IVec2) {
        self.queue.push_back(RoadToolInput::Press { pointer: from });
        self.queue.push_back(RoadToolInput::Drag {
            pointer: to,
            last: from,
            started_at: 0.0,
        });
        self.queue.push_back(RoadToolInput::Release { pointer: release });
    }

    /// Two streets crossing, a side street bending off the first, and one
    /// gesture released off the map.
    fn crossroads() -> Self {
        let mut script = Self {
            queue: VecDeque::new(),
        };
        script.gesture(IVec2::new(16, 64), IVec2::new(112, 64), IVec2::new(112, 64));
        script.gesture(IVec2::new(64, 16), IVec2::new(64, 112), IVec2::new(64, 112));
        script.gesture(IVec2::new(112, 64), IVec2::new(112, 100), IVec2::new(112, 100));
        script.gesture(IVec2::new(30, 20), IVec2::new(30, 90), IVec2::new(30, 200));
        script
            .queue
            .push_back(RoadToolInput::MouseMove { pointer: IVec2::new(64, 64) });
        script
    }
}

fn play_script(
    mut script: ResMut<DemoScript>,
    mut inputs: EventWriter<RoadToolInput>,
    grid: Res<WorldGrid>,
    props: Res<PropStore>,
    mut exit: EventWriter<AppExit>,
) {
    match script.queue.pop_front() {
        Some(input) => {
            debug!("demo input {input:?}");
            inputs.send(input);
        }
        None => {
            info!(
                "demo finished: {} road cells, {} lampposts, {} road signs, {} traffic signs, grid {:08x}",
                grid.road_cell_count(),
                props.count_visible(PropKind::Lamppost),
                props.count_visible(PropKind::RoadSign),
                props.count_visible(PropKind::TrafficSign),
                grid.fingerprint()
            );
            exit.send(AppExit::Success);
        }
    }
}

fn report_outcomes(mut outcomes: EventReader<RoadEditOutcome>) {
    for RoadEditOutcome(outcome) in outcomes.read() {
        info!("gesture finished: {outcome:?}");
    }
}
