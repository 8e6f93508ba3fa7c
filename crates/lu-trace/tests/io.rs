use lu_trace::io::{read_matrix, read_vector, write_json, write_report};
use lu_trace::{solve, LuError, ParseError, Solution, SolverOptions};

#[test]
fn test_read_and_report() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let matrix_path = tmp_dir.path().join("a.txt");
    let vector_path = tmp_dir.path().join("b.txt");
    std::fs::write(&matrix_path, "2 1\n4 3\n")?;
    std::fs::write(&vector_path, "5 11\n")?;

    let a = read_matrix(&matrix_path)?;
    let b = read_vector(&vector_path, a.nrows())?;
    let solution = solve(a, b, &SolverOptions::default())?;

    let report_path = tmp_dir.path().join("report.txt");
    write_report(&report_path, &solution)?;
    let report = std::fs::read_to_string(&report_path)?;
    assert!(report.starts_with("LU Decomposition with Partial Pivoting Successful!"));
    assert!(report.ends_with("Solution x (Ux = y):\n2 1\n"));

    let json_path = tmp_dir.path().join("solution.json");
    write_json(&json_path, &solution)?;
    let back: Solution = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
    assert_eq!(back.x, solution.x);

    Ok(())
}

#[test]
fn test_read_errors() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;

    let missing = read_matrix(tmp_dir.path().join("missing.txt"));
    assert!(matches!(missing, Err(LuError::IoError(_))));

    let ragged_path = tmp_dir.path().join("ragged.txt");
    std::fs::write(&ragged_path, "1 2\n3\n")?;
    assert!(matches!(
        read_matrix(&ragged_path),
        Err(LuError::Parse(ParseError::RaggedRow {
            row: 2,
            len: 1,
            expected: 2
        }))
    ));

    Ok(())
}
