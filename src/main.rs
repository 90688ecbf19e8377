use clap::Parser;
use sheetcut::config::{PackConfig, SplitAxis};
use sheetcut::render;
use sheetcut::solver::Solver;
use sheetcut::types::{Grain, Part, Rect};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "sheetcut",
    about = "Guillotine cutting-stock optimizer with grain and offcut scoring"
)]
struct Cli {
    /// Stock sheet dimensions (WxH, e.g. 2700x1800)
    #[arg(long)]
    stock: String,

    /// Parts as WxH:qty[:grain] with grain lengthwise|widthwise|any
    /// (e.g. 800x600:3:lengthwise 400x300:5)
    #[arg(long = "parts", num_args = 1..)]
    parts: Vec<String>,

    /// Blade kerf width in mm
    #[arg(long, default_value_t = 3)]
    kerf: u32,

    /// Leftover axis to cut first: shorter (squarer offcuts) or longer
    /// (denser packing)
    #[arg(long, default_value = "shorter")]
    split_axis: SplitAxis,

    /// Smallest offcut dimension worth keeping, in mm
    #[arg(long, default_value_t = 150)]
    min_usable: u32,

    /// Try every preset and keep the best layout
    #[arg(long)]
    best: bool,

    /// Spend this many milliseconds on randomized restarts
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Seed for the randomized search
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_part(s: &str, index: usize) -> Result<Part, String> {
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(format!("invalid part '{}', expected WxH:qty[:grain]", s));
    }
    let rect = parse_dimensions(fields[0])?;
    let qty = fields[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if qty == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    let grain = match fields.get(2) {
        Some(g) => g.parse::<Grain>()?,
        None => Grain::Any,
    };
    Ok(Part {
        id: format!("part-{}", index + 1),
        rect,
        grain,
        qty,
    })
}

fn main() {
    let cli = Cli::parse();

    let stock = parse_dimensions(&cli.stock).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let parts: Vec<Part> = cli
        .parts
        .iter()
        .enumerate()
        .map(|(i, p)| parse_part(p, i))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let config = PackConfig {
        kerf: cli.kerf,
        split_axis_preference: cli.split_axis,
        min_usable_width: cli.min_usable,
        min_usable_height: cli.min_usable,
        ..Default::default()
    };

    let solver = Solver::new(stock, config, parts);
    let solution = match cli.budget_ms {
        Some(ms) => solver.solve_with_budget(Duration::from_millis(ms), cli.seed),
        None if cli.best => solver.solve_best(),
        None => solver.solve(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    for sheet in &solution.sheets {
        println!("Sheet {}:", sheet.index + 1);
        for p in &sheet.placements {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  {} {} @ ({}, {}){}", p.part_id, p.rect, p.x, p.y, rot);
        }
        for off in &sheet.usable_offcuts {
            println!("  offcut {} @ ({}, {})", off.rect, off.x, off.y);
        }
        if sheet.scrap_area > 0 {
            println!("  scrap: {} mm2", sheet.scrap_area);
        }
        if cli.layout {
            print!(
                "{}",
                render::render_sheet(stock, &sheet.placements, &sheet.usable_offcuts)
            );
        }
        println!();
    }

    println!(
        "Summary: {} sheet{} used, {:.1}% utilization, {:.1}% waste",
        solution.sheet_count(),
        if solution.sheet_count() == 1 { "" } else { "s" },
        solution.utilization * 100.0,
        solution.total_waste_percent(),
    );
}
