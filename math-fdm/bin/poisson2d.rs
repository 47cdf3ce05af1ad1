use anyhow::Context;
use clap::Parser;
use math_fdm::{
    GridFunction, PoissonConfig, apply_laplacian, solve_poisson_with, workspace, write_frame,
};
use solvers::VectorSpace;
use std::path::PathBuf;
use std::time::Instant;

const BGREEN: &str = "\x1b[1;32m";
const BYELLOW: &str = "\x1b[1;33m";
const BRED: &str = "\x1b[1;31m";
const NORMAL: &str = "\x1b[0;0m";

#[derive(Parser, Debug)]
#[command(
    name = "poisson2d",
    about = "Check the 5-point Laplacian and solve a Poisson problem on the unit square with CG"
)]
struct Cli {
    /// JSON configuration file (command-line flags take precedence)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interior grid points per dimension
    #[arg(long)]
    n: Option<usize>,

    /// Absolute CG tolerance on the search direction norm
    #[arg(long)]
    eps: Option<f64>,

    /// Maximum number of CG iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Log CG progress every N iterations (0 = silent)
    #[arg(long)]
    print_interval: Option<usize>,

    /// Write the solve test grids as frames under this directory
    #[arg(long)]
    output_tag: Option<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<PoissonConfig> {
        let mut config = match &self.config {
            Some(path) => PoissonConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => PoissonConfig::default(),
        };
        if let Some(n) = self.n {
            config.grid.n = n;
        }
        if let Some(eps) = self.eps {
            config.solver.tolerance = eps;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.solver.max_iterations = max_iterations;
        }
        if let Some(print_interval) = self.print_interval {
            config.solver.print_interval = print_interval;
        }
        if self.output_tag.is_some() {
            config.output.tag = self.output_tag;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Colour for a value that should be small: green below `good`, yellow below `fair`.
fn grade(value: f64, good: f64, fair: f64) -> &'static str {
    if value < good {
        BGREEN
    } else if value < fair {
        BYELLOW
    } else {
        BRED
    }
}

fn print_elapsed(start: Instant) {
    println!("  {:.2} ms", start.elapsed().as_secs_f64() * 1.0e3);
}

/// Radially symmetric dip around the centre of the square
fn bump(x: f64, y: f64) -> f64 {
    let r = (x - 0.5) * (x - 0.5) + (y - 0.5) * (y - 0.5);
    if r < 0.01 { 200.0 * r - 2.0 } else { 0.0 }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Cli::parse().into_config()?;
    let n = config.grid.n;
    let points = (n * n) as f64;

    println!(
        "Discretizing [0,1] x [0,1] by a grid with {} x {} ({}) points and mesh width {:.1e}",
        n,
        n,
        n * n,
        1.0 / (n as f64 + 1.0)
    );
    println!("Initializing grid functions");
    let start = Instant::now();
    let mut u = GridFunction::<f64>::new(n)?;
    let mut v = GridFunction::<f64>::new(n)?;
    let mut x = GridFunction::<f64>::new(n)?;
    let mut work = workspace::<f64>(n)?;
    print_elapsed(start);

    println!("Testing discrete Laplace operator:");
    let start = Instant::now();
    u.init_interior(|x, y| x + y);
    u.init_boundary(|x, y| x + y);
    apply_laplacian(1.0, &u, &mut v)?;
    print_elapsed(start);
    println!("  ||u|| = {:.5e}", u.norm() / points);
    let norm = v.norm() / points;
    println!("  ||v|| = {}{:.5e}{}", grade(norm, 1e-12, 1e-8), norm, NORMAL);

    println!("Solve for initial value using cg-method:");
    let start = Instant::now();
    u.init_interior(bump);
    u.init_boundary(|_, _| 0.0);
    v.clear();
    apply_laplacian(1.0, &u, &mut v)?;
    let solution = solve_poisson_with(&v, &mut x, &mut work, &config.solver)?;
    print_elapsed(start);
    println!(
        "  {} iterations, {}",
        solution.iterations,
        if solution.converged {
            "converged"
        } else {
            "iteration cap reached"
        }
    );

    if let Some(tag) = &config.output.tag {
        let frame = config.output.frame;
        write_frame(&u, tag, frame).with_context(|| format!("writing frame {frame}"))?;
        let path = write_frame(&x, tag, frame + 1)
            .with_context(|| format!("writing frame {}", frame + 1))?;
        log::info!("frames written to {}", path.parent().unwrap_or(&path).display());
    }

    let mut error = x;
    error.add_scaled(-1.0, &u)?;
    let norm = error.norm() / points / u.norm();
    println!(
        "  ||u - \\tilde u|| / ||u|| = {}{:.5e}{}",
        grade(norm, 1e-15, 1e-11),
        norm,
        NORMAL
    );

    println!("Cleaning up");
    let start = Instant::now();
    drop((u, v, error, work));
    print_elapsed(start);

    Ok(())
}
