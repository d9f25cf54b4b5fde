use exact_calc::{Settings, Solver, ABORTED};

use std::io::{BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Evaluates algebraic expressions exactly where it can: fractions stay
/// fractions until a long decimal or a function turns them approximate.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Deepest bracket nesting an expression may use.
    #[arg(long, default_value_t = Settings::default().max_depth)]
    max_depth: usize,

    /// Don't print the greeting.
    #[arg(short, long)]
    quiet: bool,

    /// Solve these lines in order instead of reading from stdin.
    expressions: Vec<String>,
}

fn report(solver: &mut Solver, line: &str) {
    match solver.solve_checked(line) {
        Ok(outcome) => println!("{outcome}"),
        Err(e) => {
            eprintln!("Error, {e}");
            println!("{ABORTED}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut solver = Solver::with_settings(Settings {
        max_depth: args.max_depth,
    });

    if !args.expressions.is_empty() {
        for line in &args.expressions {
            report(&mut solver, line);
        }
        return Ok(());
    }

    if !args.quiet {
        println!("Type an expression or a declaration such as 'x = 1/3'.");
        println!("Enter 'quit' to leave.");
    }

    let mut stdout = std::io::stdout();
    print!("> ");
    stdout.flush()?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();

        if line == "quit" {
            break;
        }
        if !line.is_empty() {
            report(&mut solver, line);
        }

        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}
