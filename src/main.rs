//! Headless demo: renders one settled frame of the yard to a PNG
//!
//! Usage: `yard-viewport [config.toml]`. Without an argument, `yard.toml`
//! in the working directory is used when present.

use std::error::Error;

use yard_viewport::{ContainerRecord, ManualScheduler, YardConfig, YardViewport};

/// Upper bound on frames while waiting for the camera to settle
const MAX_FRAMES: usize = 1_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let mut config = YardConfig::load_from_file(&path)?;
            config.merge_with_env();
            config
        }
        None => YardConfig::load(),
    };

    let mut viewport = YardViewport::from_config(&config, ManualScheduler::new())?;
    viewport.set_on_select(|record| match record {
        Some(record) => println!("Selected {}", record.number),
        None => println!("Selection cleared"),
    });

    let containers = sample_containers();
    let focus = containers.get(1).cloned();
    viewport.set_containers(containers);
    viewport.set_selected(focus);

    let mut frames = 0;
    while viewport.scheduler_mut().take_frame() && frames < MAX_FRAMES {
        viewport.on_frame();
        frames += 1;
    }
    log::info!("camera settled after {} frames", frames);

    let Some(surface) = viewport.surface() else {
        return Err("no render surface attached".into());
    };
    surface.save_png(&config.render.output)?;
    println!(
        "Wrote {}x{} frame to {}",
        surface.width(),
        surface.height(),
        config.render.output.display()
    );

    Ok(())
}

fn sample_containers() -> Vec<ContainerRecord> {
    vec![
        ContainerRecord::new("1", "MSKU1234565", "Stack S3 / Tier 1")
            .with_client("MAERSK")
            .with_details("DRY", "40HC", "FULL"),
        ContainerRecord::new("2", "CMAU7654321", "Block S14, row 2")
            .with_client("CMA")
            .with_details("REEFER", "40ft", "EMPTY"),
        ContainerRecord::new("3", "TGHU2020202", "S14 tier 2")
            .with_client("HAPAG")
            .with_details("DRY", "20ft", "FULL"),
        ContainerRecord::new("4", "OOLU5550001", "S27")
            .with_client("ONE")
            .with_details("OPEN TOP", "40ft", "DAMAGED"),
        ContainerRecord::new("5", "ZIMU8080808", "Gate lane, awaiting slot")
            .with_client("ZIM")
            .with_details("DRY", "20ft", "FULL"),
    ]
}
