//! lvmls: show where a logical extent lives and whether it is placed
//! contiguously.
//!
//! Run: lvmls <VG> <LV> <LE> [--pvs-file F --vgs-file F] [--config F] [--json]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lvmap::{CommandSource, Config, ExtentMap, Placement, RecordSource, TextSource};

#[derive(Parser, Debug)]
#[command(name = "lvmls", version, about = "Map LVM logical extents to physical extents")]
struct Args {
    /// Volume group name
    vg: String,

    /// Logical volume name
    lv: String,

    /// Logical extent number
    le: u64,

    /// Captured `pvs --noheadings --segments -o+lv_name,seg_start_pe,segtype --units=b` output
    #[arg(long, requires = "vgs_file")]
    pvs_file: Option<PathBuf>,

    /// Captured `vgs -o vg_name,vg_extent_size --noheadings --units=b` output
    #[arg(long, requires = "pvs_file")]
    vgs_file: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the logical volume's segments as JSON and exit
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lvmls: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::read_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };

    let mut source: Box<dyn RecordSource> = match (&args.pvs_file, &args.vgs_file) {
        (Some(pvs), Some(vgs)) => Box::new(TextSource::from_files(pvs, vgs)?),
        _ => Box::new(CommandSource::new(&config)),
    };

    let mut map = ExtentMap::with_policy(config.layout_policy);
    map.reload(source.as_mut()).context("loading extent layout")?;
    let q = map.query();

    let (vg, lv, le) = (args.vg.as_str(), args.lv.as_str(), args.le);
    let segments = q.segments_of(vg, lv);

    if args.json {
        println!("{}", serde_json::to_string_pretty(segments)?);
        return Ok(());
    }

    for s in segments {
        println!(
            "{} {}-{} ({}-{})",
            s.pv_name,
            s.pv_start,
            s.pe_end(),
            s.lv_start,
            s.le_end()
        );
    }

    let Some(location) = q.find_owning_segment(vg, lv, le) else {
        bail!("no LE {} in {}/{}", le, vg, lv);
    };
    let device = location.device;
    println!("LE no {} of {}-{} is at: {}:{}", le, vg, lv, device, location.pe);

    let extent_size = q.extent_size_bytes(vg);
    println!("vg: {}, extent size: {} bytes", vg, extent_size);

    println!(
        "vg: {}, pv: {}, free space: {}e ({}B)",
        vg,
        device,
        q.free_extent_count(vg, Some(device)),
        q.free_bytes(vg, Some(device))
    );

    println!(
        "Space used by lv {} on pv {}: {}e ({}B)",
        lv,
        device,
        q.used_extent_count(vg, lv, device)?,
        q.used_bytes(vg, lv, device)?
    );

    let Some(report) = q.placement(vg, lv, le) else {
        bail!("no placement for LE {} of {}/{}", le, vg, lv);
    };
    println!(
        "First LE on {} is {} at PE {}",
        report.first.device, report.first.le, report.first.pe
    );
    println!(
        "Optimal position for LE {} is at {}:{}",
        le, device, report.optimal_pe
    );

    let verdict = match report.verdict {
        Placement::Optimal => "allocated correctly".to_string(),
        Placement::Free => "free".to_string(),
        Placement::Allocated { owner, le } => format!("allocated to {}, LE: {}", owner, le),
        Placement::PastEnd => "after the end of the device".to_string(),
    };
    println!("{}:{} is {}", device, report.optimal_pe, verdict);

    Ok(())
}
