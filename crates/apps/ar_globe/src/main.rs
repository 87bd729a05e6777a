use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;

use ar_globe::{GlobeSession, SessionConfig};
use formats::{load_city_batch, load_typeface, partition_valid};
use gpu::{ArCamera, RecordingBackend};
use runtime::{EventKind, ScriptedTracker};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_DT_S: f64 = 1.0 / 60.0;
const CAMERA_WIDTH: f64 = 640.0;
const CAMERA_HEIGHT: f64 = 480.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        error!(error = %e, "ar_globe failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut config = match env::var("AR_GLOBE_CONFIG") {
        Ok(path) => SessionConfig::load(&path)?,
        Err(_) => SessionConfig::default(),
    };
    config.apply_env_overrides(|key| env::var(key).ok())?;

    let cities_path = env::var("AR_GLOBE_CITIES")
        .unwrap_or_else(|_| concat!(env!("CARGO_MANIFEST_DIR"), "/assets/cities.json").to_string());
    let frames = env_var_u64("AR_GLOBE_FRAMES", 120);

    let texture_path = config.texture_path.clone();
    let font_path = config.font_path.clone();
    let mut session = GlobeSession::new(config);

    session.on_texture_loaded(check_texture(&texture_path));
    session.on_font_loaded(load_typeface(&font_path));
    session.on_camera_ready::<String>(Ok(ArCamera::perspective_projection(
        45f64.to_radians(),
        CAMERA_WIDTH / CAMERA_HEIGHT,
        0.01,
        100.0,
    )));

    match load_city_batch(&cities_path) {
        Ok(cities) => {
            let (valid, errors) = partition_valid(cities);
            for e in &errors {
                warn!(error = %e, "skipping city");
            }
            session.add_cities(&valid);
        }
        Err(e) => warn!(path = %cities_path, error = %e, "city batch unavailable; globe has no markers"),
    }

    // Marker found after the camera warms up, lost for a stretch, then found again.
    let script = (0..frames).map(|i| !(frames / 2..frames / 2 + 10).contains(&i));
    let mut tracker = ScriptedTracker::new(script).with_warmup(5);
    let mut backend = RecordingBackend::new();

    let mut found = 0usize;
    let mut lost = 0usize;
    let mut failed_resources = 0usize;
    for _ in 0..frames {
        tracker.tick();
        session.update(FRAME_DT_S, &mut tracker);
        session.render(&mut backend);
        for event in session.drain_events() {
            debug!(frame = event.frame_index, kind = event.kind.as_str(), message = %event.message, "event");
            match event.kind {
                EventKind::TrackingFound => found += 1,
                EventKind::TrackingLost => lost += 1,
                EventKind::ResourceFailed => failed_resources += 1,
                _ => {}
            }
        }
    }

    info!(
        frames = backend.frames().len(),
        cities = session.registry().len(),
        draws = backend.last().map(|f| f.draw_count()).unwrap_or(0),
        yaw_rad = session.rig().yaw_rad(session.world()),
        found,
        lost,
        failed_resources,
        "session finished"
    );
    Ok(())
}

fn check_texture(path: &Path) -> Result<String, String> {
    fs::metadata(path)
        .map(|_| path.display().to_string())
        .map_err(|e| format!("{}: {e}", path.display()))
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
