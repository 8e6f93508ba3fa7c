use argh::FromArgs;
use std::path::PathBuf;

use lu_trace::{io, solve, solve_text, LuError, SingularPolicy, Solution, SolverOptions};

#[derive(FromArgs)]
/// Solve Ax = b with LU decomposition and print every step.
struct Args {
    /// matrix A as text, rows separated by newlines or ';'
    #[argh(option)]
    matrix: Option<String>,

    /// vector b as text, whitespace separated
    #[argh(option)]
    vector: Option<String>,

    /// path to the matrix A, one row per line
    #[argh(option, short = 'm')]
    matrix_path: Option<PathBuf>,

    /// path to the vector b, whitespace separated
    #[argh(option, short = 'b')]
    vector_path: Option<PathBuf>,

    /// keep going on a zero pivot and print the non-finite results
    #[argh(switch)]
    propagate_singular: bool,

    /// pivots at or below this magnitude are treated as zero
    #[argh(option, default = "0.0")]
    pivot_tolerance: f64,

    /// print the solution as JSON instead of the text report
    #[argh(switch)]
    json: bool,

    /// also save the output to this file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Solver(#[from] LuError),
}

fn run(args: &Args) -> Result<Solution, CliError> {
    let options = SolverOptions {
        singular_policy: if args.propagate_singular {
            SingularPolicy::Propagate
        } else {
            SingularPolicy::Fail
        },
        pivot_tolerance: args.pivot_tolerance,
    };

    let solution = match (
        &args.matrix,
        &args.vector,
        &args.matrix_path,
        &args.vector_path,
    ) {
        (Some(matrix), Some(vector), None, None) => {
            // ';' lets a whole matrix fit on the command line
            let matrix = matrix.replace(';', "\n");
            log::info!("solving the system given inline");
            solve_text(&matrix, vector, &options)?
        }
        (None, None, Some(matrix_path), Some(vector_path)) => {
            let a = io::read_matrix(matrix_path)?;
            let b = io::read_vector(vector_path, a.nrows())?;
            log::info!("solving a {}x{} system", a.nrows(), a.ncols());
            solve(a, b, &options)?
        }
        _ => {
            return Err(CliError::InvalidInput(
                "give either --matrix and --vector, or --matrix-path and --vector-path",
            ))
        }
    };

    Ok(solution)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let solution = match run(&args) {
        Ok(solution) => solution,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", solution.to_json()?);
    } else {
        println!("{solution}");
    }

    if let Some(output) = &args.output {
        if args.json {
            io::write_json(output, &solution)?;
        } else {
            io::write_report(output, &solution)?;
        }
        log::info!("output saved to {}", output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(
        matrix: Option<&str>,
        vector: Option<&str>,
        matrix_path: Option<PathBuf>,
        vector_path: Option<PathBuf>,
    ) -> Args {
        Args {
            matrix: matrix.map(str::to_string),
            vector: vector.map(str::to_string),
            matrix_path,
            vector_path,
            propagate_singular: false,
            pivot_tolerance: 0.0,
            json: false,
            output: None,
        }
    }

    #[test]
    fn test_inline_input() -> Result<(), CliError> {
        let solution = run(&args(Some("2 1;4 3"), Some("5 11"), None, None))?;
        assert_eq!(solution.x, vec![2.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_inline_parse_error() {
        let res = run(&args(Some("2 1;4"), Some("5 11"), None, None));
        assert_eq!(
            res.map(|_| ()).map_err(|e| e.to_string()),
            Err("Row 2 has a different number of columns (1). All rows must have 2 columns."
                .to_string())
        );
    }

    #[test]
    fn test_inputs_are_exclusive() {
        let res = run(&args(
            Some("2 1;4 3"),
            Some("5 11"),
            Some(PathBuf::from("a.txt")),
            Some(PathBuf::from("b.txt")),
        ));
        assert!(matches!(res, Err(CliError::InvalidInput(_))));

        let res = run(&args(Some("2 1;4 3"), None, None, Some(PathBuf::from("b.txt"))));
        assert!(matches!(res, Err(CliError::InvalidInput(_))));

        let res = run(&args(None, None, None, None));
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
    }
}
