use clap::Parser;
use std::{
    error::Error, net::SocketAddr, process::ExitCode, str::FromStr, thread, time::Duration,
};

use raspi_i2c_scanner::{
    raspi::{self, RaspiBus, RaspiPins},
    report, BusSpeed, ScanResult, Scanner,
};

#[derive(Debug, Parser)]
#[command(version, about = "Check I2C pull-ups and scan the bus for devices", long_about = None)]
struct Args {
    /// I2C bus number (/dev/i2c-N)
    #[arg(short, long, default_value_t = 1)]
    bus: u8,

    /// BCM number of the SCL pin
    #[arg(long, default_value_t = raspi::DEFAULT_SCL)]
    scl: u8,

    /// BCM number of the SDA pin
    #[arg(long, default_value_t = raspi::DEFAULT_SDA)]
    sda: u8,

    /// speeds to scan, in order; all of them when omitted
    #[arg(short, long, value_enum)]
    speed: Vec<BusSpeed>,

    /// per-transaction timeout in milliseconds
    #[arg(long, default_value_t = 100)]
    timeout_ms: u32,

    /// only run the pull-up check
    #[arg(long, conflicts_with = "skip_pin_check")]
    pins_only: bool,

    /// scan without checking the pull-ups first
    #[arg(long)]
    skip_pin_check: bool,

    /// print an i2cdetect-style table for each speed
    #[arg(long)]
    table: bool,

    /// serve prometheus metrics on this address and rescan periodically
    #[arg(short, long)]
    metrics: Option<String>,

    /// seconds between rescans when serving metrics
    #[arg(long, default_value_t = 60, requires = "metrics")]
    interval: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    log::info!("beginning I2C validation on /dev/i2c-{}", args.bus);

    if let Some(addr) = &args.metrics {
        if let Err(e) = init_prometheus(addr) {
            log::error!("failed to install prometheus exporter: {}", e);
            return ExitCode::FAILURE;
        }
        log::info!("start prometheus server at {:}", addr);
    }

    let mut buses = RaspiBus::new(args.bus, args.timeout_ms);

    if args.skip_pin_check {
        log::warn!("skipping pull-up check");
        loop {
            print_result(&raspi_i2c_scanner::scan_speeds(&mut buses, &args.speed), args.table);
            if args.metrics.is_none() {
                return ExitCode::SUCCESS;
            }
            thread::sleep(Duration::from_secs(args.interval));
        }
    }

    let pins = match RaspiPins::new(args.scl, args.sda) {
        Ok(pins) => pins,
        Err(e) => {
            log::error!("failed to open gpio: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut scanner = Scanner::new(pins, buses);

    if args.pins_only {
        return if scanner.verify_pins() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    loop {
        match scanner.verify_and_scan(&args.speed) {
            Ok(result) => print_result(&result, args.table),
            Err(e) => {
                log::error!("{}", e);
                if args.metrics.is_none() {
                    return ExitCode::FAILURE;
                }
            }
        }
        if args.metrics.is_none() {
            return ExitCode::SUCCESS;
        }
        thread::sleep(Duration::from_secs(args.interval));
    }
}

fn print_result(result: &ScanResult, table: bool) {
    for (speed, addresses) in result.iter() {
        println!("{}", report::summary_line(speed, addresses));
        if table {
            println!("{}", report::Grid::new(addresses));
        }
    }
}

fn init_prometheus(addr: &str) -> Result<(), Box<dyn Error>> {
    let socket = SocketAddr::from_str(addr)?;

    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    builder.with_http_listener(socket).install()?;

    return Ok(());
}
