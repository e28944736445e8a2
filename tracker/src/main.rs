use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use shared::{PlaybackSpeed, TrackPeriod};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracker::animator::MarkerAnimator;
use tracker::error::TrackerError;
use tracker::loader::route_from_file;
use tracker::playback::{PlaybackClock, PlaybackController};
use tracker::scene;
use tracker::snap::{RoadSnapper, DEFAULT_OSRM_URL};
use tracker::speed::speed_label;

/// Replay a recorded vehicle route as a log of playback steps.
#[derive(Parser)]
struct Args {
    /// Route JSON file: an array of {latitude, longitude, timestamp} objects
    #[arg(long, default_value = "tracker/data/demo-route.json")]
    route: PathBuf,
    /// History period to replay
    #[arg(long, default_value = "today")]
    period: TrackPeriod,
    /// Playback speed preset: 0.5, 1, 2 or 5
    #[arg(long, default_value = "1")]
    speed: PlaybackSpeed,
    /// Replay the raw fixes without snapping them to the road network
    #[arg(long)]
    no_snap: bool,
    /// Base URL of an OSRM-compatible routing service
    #[arg(long, default_value = DEFAULT_OSRM_URL)]
    osrm_url: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        tracing::error!(error = %err, "replay failed");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), TrackerError> {
    let raw = route_from_file(&args.route)?;
    tracing::info!(points = raw.len(), path = %args.route.display(), "loaded route");

    let snapped = if args.no_snap {
        raw
    } else {
        RoadSnapper::with_base_url(&args.osrm_url).snap(&raw).await
    };

    let mut controller = PlaybackController::new(snapped);
    controller.set_period(args.period);
    controller.set_speed(args.speed);
    controller.show_history();
    controller.toggle_play();

    let start = controller.current_point().ok_or(TrackerError::EmptyRoute)?;
    let mut animator = MarkerAnimator::new(start);

    let mut clock = PlaybackClock::new(controller.speed());
    let mut frames = tokio::time::interval(Duration::from_millis(50));

    tracing::info!(
        period = %controller.period(),
        speed = %controller.speed(),
        window = controller.window().len(),
        "replaying history window"
    );

    loop {
        tokio::select! {
            _ = clock.tick() => {
                if controller.advance() {
                    if let Some(point) = controller.current_point() {
                        animator.set_target(point, Instant::now());
                        tracing::info!(
                            index = controller.current_index(),
                            lat = point.lat,
                            lng = point.lng,
                            speed_kmh = %speed_label(controller.current_index(), controller.window()),
                            "step"
                        );
                    }
                }
            }
            _ = frames.tick() => {
                animator.on_frame(Instant::now());
            }
        }

        if controller.at_end() && animator.is_settled() {
            break;
        }
    }

    if let Some(final_scene) = scene::compose(&controller, &animator) {
        tracing::info!(scene = %serde_json::to_string(&final_scene)?, "replay finished");
    }
    Ok(())
}
