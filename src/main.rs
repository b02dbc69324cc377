//! Render a stained glass scene to a sequence of PNG frames
use clap::Parser;
use indicatif::ProgressBar;
use log::{info, warn};

use stained_glass::prelude::*;
use stained_glass::Result;

mod cli;
use cli::{init_logger, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level);

    let mut config = match &args.scene {
        Some(path) => {
            info!("loading scene from {}", path.display());
            SceneConfig::from_file(path)?
        }
        None => SceneConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let events = std::mem::take(&mut config.events);
    let mut scene = Scene::from_config(config)?;
    let mut canvas = Canvas::new(scene.width, scene.height);

    std::fs::create_dir_all(&args.output)?;
    let every = args.every.max(1);

    let bar = ProgressBar::new(args.frames as u64);
    for frame in 0..args.frames {
        for scheduled in events.iter().filter(|e| e.frame == frame) {
            if let Err(err) = scene.apply(scheduled.event.clone().into()) {
                warn!("frame {frame}: skipping event: {err}");
            }
        }

        let time = frame as f64 * args.time_step;
        scene.render_frame(time, &mut canvas);

        if frame % every == 0 || frame + 1 == args.frames {
            let path = args.output.join(format!("frame_{frame:05}.png"));
            canvas.save(&path)?;
            info!("wrote {}", path.display());
        }
        bar.inc(1);
    }
    bar.finish();
    Ok(())
}
