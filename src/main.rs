use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use config_file::FromConfigFile;

use randlicht::config::Config;
use randlicht::cutout::Cutouts;
use randlicht::devices::validate_bindings;
use randlicht::frame::Frame;
use randlicht::framegrabber::{FrameBuffer, FrameGrabber};
use randlicht::framesource::imagefile::ImageFile;
use randlicht::framesource::noise::Noise;
use randlicht::framesource::testpattern::TestPattern;
use randlicht::framesource::FrameSource;
use randlicht::olaoutput::OlaOutput;
use randlicht::photonizer::Photonizer;

#[derive(Parser)]
struct Cli {
    /// The configuration file to use
    #[arg(short, long, value_name = "FILE", default_value = "randlicht.toml")]
    config: std::path::PathBuf,

    /// Serve this image as the frame source
    #[arg(short, long, value_name = "FILE")]
    image: Option<std::path::PathBuf>,

    /// Use the random noise frame source
    #[arg(long)]
    noise: bool,

    /// Grab one frame per output cycle instead of running a grabber thread
    #[arg(long)]
    single_threaded: bool,
}

fn create_source(args: &Cli, config: &Config) -> Result<Box<dyn FrameSource>, String> {
    if let Some(image_path) = args.image.as_deref() {
        return match ImageFile::new(image_path) {
            Ok(source) => Ok(Box::new(source)),
            Err(err) => Err(err.to_string()),
        };
    };

    if args.noise {
        return Ok(Box::new(Noise::new(config.width, config.height)));
    };

    Ok(Box::new(TestPattern::new(config.width, config.height)))
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    log::info!("randlicht {} starting up", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_config_file(&args.config) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Cannot read {}: {}", args.config.display(), err);
            std::process::exit(1);
        }
    };

    let source = match create_source(&args, &config) {
        Ok(source) => source,
        Err(msg) => {
            log::error!("Cannot set up frame source: {}", msg);
            std::process::exit(1);
        }
    };

    let region = source.region();
    log::info!(
        "Capturing {}x{} pixels with the {:?} preset",
        region.width,
        region.height,
        config.preset
    );

    let cutouts = Cutouts::resolve(region.width, region.height, config.preset);
    let bindings = match validate_bindings(&config.devices, &cutouts) {
        Ok(bindings) => bindings,
        Err(err) => {
            log::error!("Device setup failed: {}", err);
            std::process::exit(1);
        }
    };
    log::info!("Driving {} device(s)", bindings.len());

    let ola_addr = match SocketAddr::from_str(&config.ola_address) {
        Ok(addr) => addr,
        Err(err) => {
            log::error!("Invalid OLA address '{}': {}", config.ola_address, err);
            std::process::exit(1);
        }
    };
    let ola = match OlaOutput::new(ola_addr) {
        Ok(ola) => ola,
        Err(err) => {
            log::error!("Cannot set up OLA output: {}", err);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(err) = ctrlc::set_handler(move || {
            log::info!("Shutting down");
            running.store(false, Ordering::Relaxed);
        }) {
            log::error!("Cannot install the shutdown handler: {}", err);
            std::process::exit(1);
        }
    }

    let buffer = Arc::new(FrameBuffer::new(Frame::new(region.width, region.height, 3)));
    let mut grabber = FrameGrabber::new(
        source,
        Arc::clone(&buffer),
        Arc::clone(&running),
        config.fps,
        config.suppress_performance_warnings,
    );

    let single_threaded = args.single_threaded || config.single_threaded;
    let mut grabber_thread = None;

    let photonizer_grabber = if single_threaded {
        Some(grabber)
    } else {
        let running = Arc::clone(&running);
        let res = thread::Builder::new()
            .name("FrameGrabber".to_string())
            .spawn(move || {
                if let Err(err) = grabber.run() {
                    log::error!("Frame source failed: {}", err);
                    running.store(false, Ordering::Relaxed);
                }
            });
        match res {
            Ok(handle) => grabber_thread = Some(handle),
            Err(err) => {
                log::error!("Failed to create thread: {}", err);
                std::process::exit(1);
            }
        }
        None
    };

    let mut photonizer = Photonizer::new(
        buffer,
        bindings,
        ola,
        photonizer_grabber,
        Arc::clone(&running),
        config.fps,
        config.suppress_performance_warnings,
    );
    photonizer.run();

    if let Some(handle) = grabber_thread {
        if handle.join().is_err() {
            log::error!("The frame grabber thread panicked");
        }
    }
}
