use coxwire::phase::NoopPhaseTracker;
use coxwire::trace::LogTrace;
use coxwire::transport::SerialSource;
use coxwire::{DecoderConfig, Measurement, ProtocolDecoder, TransferOutcome};
use std::time::Duration;
use tokio::time::interval;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Device path may be given as the first argument
    let mut config = DecoderConfig::default();
    if let Some(device) = std::env::args().nth(1) {
        config.device = device;
    }
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return;
    }

    let source = match SerialSource::open(&config.device) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot open rower: {}", e);
            return;
        }
    };

    println!("Monitoring rower on {}", config.device);
    println!("- Throttle: {:?}", config.throttle);

    let mut decoder = ProtocolDecoder::new(source, LogTrace, NoopPhaseTracker, &config);
    decoder.reset();

    let mut measurement = Measurement::default();
    let mut last_printed = measurement.clone();

    // Poll faster than the throttle so it decides the actual cadence
    let mut ticker = interval(Duration::from_millis(20));
    loop {
        ticker.tick().await;

        if let TransferOutcome::Decoded(_) = decoder.transfer(&mut measurement) {
            if measurement != last_printed {
                println!(
                    "{:>5}s {:>6}m strokes={:<4} rate={:<3} speed={:<5} pulse={}",
                    measurement.duration,
                    measurement.distance,
                    measurement.strokes,
                    measurement.stroke_rate,
                    measurement.speed,
                    measurement.pulse,
                );
                last_printed = measurement.clone();
            }
        }
    }
}
