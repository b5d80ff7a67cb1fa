//! Flyover Demo - streamed terrain under a circling camera.
//!
//! The camera is the streaming observer; chunks appear ahead of it, hide
//! behind it and are destroyed once far enough away.
//!
//! Controls:
//! - Space: Pause/resume streaming
//! - Up/Down: Change flight speed
//!
//! Run with: `cargo run -p bevy_terrain_stream --example flyover`
//! Add `--features tracy` to stream spans to the Tracy profiler.
//! Pass a TOML path as the first argument to load a terrain config.

use bevy::prelude::*;
use bevy_terrain_stream::{StreamingObserver, StreamingState, TerrainConfig, TerrainStreamingPlugin};

const ORBIT_RADIUS: f32 = 180.0;
const ALTITUDE: f32 = 40.0;
const DEFAULT_SPEED: f32 = 0.15;

#[derive(Resource)]
struct Flight {
  angle: f32,
  speed: f32,
}

fn main() {
  let config = match std::env::args().nth(1) {
    Some(path) => TerrainConfig::load(&path).unwrap_or_else(|err| {
      eprintln!("Failed to load {path}: {err}, using defaults");
      TerrainConfig::default()
    }),
    None => TerrainConfig::default(),
  };

  #[cfg(feature = "tracy")]
  bevy_terrain_stream::init_tracy();

  let default_plugins = DefaultPlugins.set(WindowPlugin {
    primary_window: Some(Window {
      title: "Flyover Demo - Terrain Stream".to_string(),
      resolution: (1280, 720).into(),
      ..default()
    }),
    ..default()
  });
  #[cfg(feature = "tracy")]
  let default_plugins = default_plugins.disable::<bevy::log::LogPlugin>();

  App::new()
    .add_plugins(default_plugins)
    .add_plugins(TerrainStreamingPlugin::new(config))
    .insert_resource(Flight {
      angle: 0.0,
      speed: DEFAULT_SPEED,
    })
    .add_systems(Startup, setup)
    .add_systems(Update, (fly, controls))
    .run();
}

fn setup(mut commands: Commands) {
  commands.spawn((
    Camera3d::default(),
    Transform::from_xyz(ORBIT_RADIUS, ALTITUDE, 0.0).looking_at(Vec3::ZERO, Vec3::Y),
    StreamingObserver,
  ));
  commands.spawn((
    DirectionalLight {
      illuminance: 8000.0,
      shadows_enabled: true,
      ..default()
    },
    Transform::from_xyz(1.0, 2.0, 0.5).looking_at(Vec3::ZERO, Vec3::Y),
  ));
}

fn fly(time: Res<Time>, mut flight: ResMut<Flight>, mut camera: Query<&mut Transform, With<StreamingObserver>>) {
  flight.angle += flight.speed * time.delta_secs();
  let position = Vec3::new(flight.angle.cos(), 0.0, flight.angle.sin()) * ORBIT_RADIUS + Vec3::Y * ALTITUDE;
  let heading = Vec3::new(-flight.angle.sin(), -0.35, flight.angle.cos());

  for mut transform in &mut camera {
    transform.translation = position;
    transform.look_to(heading, Vec3::Y);
  }
}

fn controls(keys: Res<ButtonInput<KeyCode>>, mut flight: ResMut<Flight>, mut state: ResMut<StreamingState>) {
  if keys.just_pressed(KeyCode::Space) {
    if state.is_running() {
      state.halt();
    } else {
      state.resume();
    }
    info!("Streaming {:?}", *state);
  }
  if keys.pressed(KeyCode::ArrowUp) {
    flight.speed = (flight.speed + 0.01).min(2.0);
  }
  if keys.pressed(KeyCode::ArrowDown) {
    flight.speed = (flight.speed - 0.01).max(0.0);
  }
}
