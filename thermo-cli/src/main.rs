//! CLI for the thermo temperature store.
//!
//! Sends readings and statistics requests to a running `thermo-server`, and
//! benchmarks the store in-process.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use thermo::{ReadConsistency, Report, ReportBuilder, ReportRecord, Stats, Store};

/// thermo — Temperature statistics client and benchmark.
#[derive(Parser)]
#[command(name = "thermo", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Report one temperature reading for a sensor.
    Send {
        /// Sensor name.
        sensor: String,

        /// Temperature reading.
        #[arg(allow_negative_numbers = true)]
        temperature: i64,

        /// Server address.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },

    /// Request the daily cross-section report.
    Daily {
        /// As-of date (YYYY-MM-DD); the server's today if omitted.
        #[arg(long)]
        date: Option<String>,

        /// Server address.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },

    /// Request the weekly per-sensor report.
    Weekly {
        /// As-of date (YYYY-MM-DD); the server's today if omitted.
        #[arg(long)]
        date: Option<String>,

        /// Server address.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },

    /// Run a concurrent ingestion benchmark against an in-process store.
    Bench {
        /// Number of sensors to write.
        #[arg(long, default_value = "30")]
        sensors: u32,

        /// Readings per sensor, spread over the last eight days.
        #[arg(long, default_value = "100000")]
        readings: u32,

        /// Writer threads.
        #[arg(long, default_value = "4")]
        threads: u32,

        /// Read the store through a snapshot when building the report.
        #[arg(long)]
        snapshot: bool,

        /// Output format for the resulting weekly report.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for reports.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// One aligned line per record.
    Text,
    /// The report as a JSON object.
    Json,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Send {
            sensor,
            temperature,
            addr,
        } => cmd_send(&addr, &sensor, temperature),
        Commands::Daily { date, addr } => cmd_stats(&addr, "daily_stats", date.as_deref()),
        Commands::Weekly { date, addr } => cmd_stats(&addr, "weekly_stats", date.as_deref()),
        Commands::Bench {
            sensors,
            readings,
            threads,
            snapshot,
            format,
        } => cmd_bench(sensors, readings, threads, snapshot, &format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Implements `thermo send <sensor> <temperature>`.
fn cmd_send(addr: &str, sensor: &str, temperature: i64) -> Result<(), Box<dyn std::error::Error>> {
    if sensor.is_empty() {
        return Err("Sensor name must not be empty".into());
    }

    let request = serde_json::json!({
        "sensorname": sensor,
        "type": "info",
        "temperature": temperature,
    });

    print!("{}", exchange(addr, &request)?);
    Ok(())
}

/// Implements `thermo daily` and `thermo weekly`.
fn cmd_stats(
    addr: &str,
    kind: &str,
    date: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = serde_json::json!({ "type": kind });
    if let Some(date) = date {
        request["date"] = serde_json::Value::from(date);
    }

    print!("{}", exchange(addr, &request)?);
    Ok(())
}

/// Sends one request and returns the server's full reply.
fn exchange(addr: &str, request: &serde_json::Value) -> Result<String, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)
        .map_err(|e| format!("Cannot connect to thermo-server at '{addr}': {e}"))?;
    stream.set_read_timeout(Some(Duration::from_secs(30)))?;

    serde_json::to_writer(&mut stream, request)?;
    stream.flush()?;

    let mut reply = String::new();
    stream.read_to_string(&mut reply)?;
    Ok(reply)
}

/// Implements `thermo bench`.
#[allow(clippy::cast_precision_loss)] // Benchmark stats are fine with f64 precision
fn cmd_bench(
    sensor_count: u32,
    readings: u32,
    threads: u32,
    snapshot: bool,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if sensor_count == 0 || threads == 0 {
        return Err("--sensors and --threads must be at least 1".into());
    }

    println!("thermo ingestion benchmark");
    println!("  Sensors: {sensor_count}");
    println!("  Readings per sensor: {readings}");
    println!("  Writer threads: {threads}");
    println!();

    let store = Arc::new(Store::new());
    let today = store.today();
    let names: Vec<String> = (0..sensor_count).map(|i| format!("sensor_{i}")).collect();

    let start = Instant::now();

    thread::scope(|scope| {
        for worker in 0..threads {
            let store = &store;
            let names = &names;
            scope.spawn(move || {
                // Each worker owns every `threads`-th sensor.
                for name in names.iter().skip(worker as usize).step_by(threads as usize) {
                    for i in 0..readings {
                        let day = today.days_before(u64::from(i % 8)).unwrap_or(today);
                        store.ingest_on(name, day, i64::from(i % 60) - 10);
                    }
                }
            });
        }
    });

    let elapsed = start.elapsed();
    let total_writes = store.reading_count();
    let ns_per_write = elapsed.as_nanos() as f64 / total_writes.max(1) as f64;
    let writes_per_sec = total_writes as f64 / elapsed.as_secs_f64();

    println!("Results:");
    println!("  Total writes: {total_writes}");
    println!("  Elapsed: {elapsed:.3?}");
    println!("  Avg latency: {ns_per_write:.1} ns/write");
    println!("  Throughput: {writes_per_sec:.0} writes/sec");
    println!();

    let consistency = if snapshot {
        ReadConsistency::Snapshot
    } else {
        ReadConsistency::PerLookup
    };

    let report_start = Instant::now();
    let report = ReportBuilder::new(&store)
        .consistency(consistency)
        .weekly(&today.to_string());
    let report_elapsed = report_start.elapsed();

    match format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    println!();
    println!("  Report ({consistency:?}): {report_elapsed:.3?}");

    Ok(())
}

/// Prints a report as aligned text.
fn print_report(report: &Report) {
    println!("# {} report as of {}", report.kind, report.as_of);
    for record in &report.records {
        match record {
            ReportRecord::PerSensorDay {
                sensor,
                date,
                stats,
            } => println!("{date} {sensor:<16} {}", format_stats(stats)),
            ReportRecord::PerSensorMissing { sensor, date } => {
                println!("{date} {sensor:<16} no data");
            }
            ReportRecord::CrossSensorDay { date, stats } => {
                println!("{date} {:<16} {}", "(all)", format_stats(stats));
            }
            ReportRecord::PerSensorWeek { sensor, stats } => {
                println!("{sensor:<16} {}", format_stats(stats));
            }
            ReportRecord::PerSensorWeekMissing { sensor } => println!("{sensor:<16} no data"),
            ReportRecord::CrossSensorWeek { stats } => {
                println!("{:<16} {}", "(all)", format_stats(stats));
            }
            ReportRecord::StoreEmpty => println!("no data for any sensor"),
            ReportRecord::InvalidDate { input } => println!("invalid date: {input}"),
        }
    }
}

/// Formats statistics as fixed-width columns.
fn format_stats(stats: &Stats) -> String {
    format!(
        "min={:>6} max={:>6} avg={:>6} n={}",
        stats.min, stats.max, stats.avg, stats.count
    )
}
