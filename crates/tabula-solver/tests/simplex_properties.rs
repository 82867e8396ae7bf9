use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tabula_solver::{Problem, RatioTest, RowId, SolveError, Solver, Step, Tableau, VarId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn textbook() -> Problem {
    Problem::new(vec![dec!(3), dec!(5)])
        .with_constraint(vec![dec!(1), dec!(0), dec!(1), dec!(0), dec!(0)], dec!(4))
        .with_constraint(vec![dec!(0), dec!(2), dec!(0), dec!(1), dec!(0)], dec!(12))
        .with_constraint(vec![dec!(3), dec!(2), dec!(0), dec!(0), dec!(1)], dec!(18))
}

fn three_variables() -> Problem {
    // Maximize: 2x1 + 3x2 + 4x3
    // Subject to:
    //   3x1 + 2x2 + x3 <= 10
    //   2x1 + 5x2 + 3x3 <= 15
    // Optimal: x3=5, obj=20
    Problem::new(vec![dec!(2), dec!(3), dec!(4)])
        .with_constraint(vec![dec!(3), dec!(2), dec!(1)], dec!(10))
        .with_constraint(vec![dec!(2), dec!(5), dec!(3)], dec!(15))
}

fn assert_basis_is_identity(t: &Tableau) {
    let tolerance = dec!(0.01);
    for row in t.row_ids() {
        let basic = t.basic_variable(row).unwrap();
        for other in t.row_ids() {
            let expected = if other == row { Decimal::ONE } else { Decimal::ZERO };
            let actual = t.cell(other, basic).unwrap();
            assert!(
                (actual - expected).abs() <= tolerance,
                "{} at row {}: {} (expected {})",
                t.variable(basic).unwrap().name,
                other.index(),
                actual,
                expected
            );
        }
        let reduced = t.objective(basic).unwrap();
        assert!(reduced.abs() <= tolerance, "reduced cost of basic column is {}", reduced);
    }
}

#[test]
fn test_textbook_terminates_at_36() {
    init_tracing();

    let tableau = Tableau::new(&textbook()).unwrap();
    assert_eq!(tableau.objective_row(), &[dec!(-3), dec!(-5), dec!(0), dec!(0), dec!(0)]);

    let solved = Solver::new().solve(tableau).unwrap();
    let summary = solved.tableau.summary();

    assert_eq!(summary.objective_value, dec!(36.00));
    assert_eq!(summary.value_of("x2"), Some(dec!(6.00)));
    assert_eq!(summary.value_of("x1"), Some(dec!(2.00)));
    assert_eq!(summary.value_of("x3"), Some(dec!(2.00)));
    assert_eq!(summary.non_basic, vec!["x4", "x5"]);
}

#[test]
fn test_basis_columns_stay_unit_after_every_pivot() {
    init_tracing();

    for problem in [textbook(), three_variables()] {
        let mut pivots = 0;
        let solved = Solver::new()
            .solve_with(Tableau::new(&problem).unwrap(), |_, tableau| {
                pivots += 1;
                assert_basis_is_identity(tableau);
            })
            .unwrap();
        assert!(pivots > 0);
        assert_eq!(pivots, solved.pivots);
    }
}

#[test]
fn test_objective_never_decreases() {
    init_tracing();

    for problem in [textbook(), three_variables()] {
        let mut values = vec![Decimal::ZERO];
        Solver::new()
            .solve_with(Tableau::new(&problem).unwrap(), |pivot, tableau| {
                assert_eq!(pivot.objective_value, tableau.objective_value());
                values.push(pivot.objective_value);
            })
            .unwrap();
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "objective went down: {:?}", values);
    }
}

#[test]
fn test_three_variable_optimum() {
    let solved = Solver::new().solve(Tableau::new(&three_variables()).unwrap()).unwrap();
    let summary = solved.tableau.summary();
    assert_eq!(summary.objective_value, dec!(20));
    assert_eq!(summary.value_of("x3"), Some(dec!(5)));
    assert_eq!(summary.value_of("x1"), Some(dec!(0)));
    assert_eq!(summary.value_of("x2"), Some(dec!(0)));
}

#[test]
fn test_non_negative_objective_needs_no_pivot() {
    let problem = Problem::new(vec![dec!(-2), dec!(-1)])
        .with_constraint(vec![dec!(1), dec!(1)], dec!(4))
        .with_constraint(vec![dec!(1), dec!(3)], dec!(6));
    let start = Tableau::new(&problem).unwrap();

    let solved = Solver::new().solve(start.clone()).unwrap();

    assert_eq!(solved.pivots, 0);
    assert_eq!(solved.tableau, start);
    assert_eq!(solved.tableau.summary().non_basic, vec!["x1", "x2"]);
}

#[test]
fn test_unbounded_column_fails_under_both_rules() {
    init_tracing();

    // x2 can grow without limit once x1 is bounded
    let problem = Problem::new(vec![dec!(1), dec!(4)])
        .with_constraint(vec![dec!(1), dec!(0)], dec!(3))
        .with_constraint(vec![dec!(1), dec!(0)], dec!(5));

    for rule in [RatioTest::Strict, RatioTest::Legacy] {
        let result = Solver::new()
            .with_ratio_test(rule)
            .solve(Tableau::new(&problem).unwrap());
        assert_eq!(
            result.unwrap_err(),
            SolveError::Unbounded {
                variable: "x2".to_string(),
                iteration: 1
            }
        );
    }
}

#[test]
fn test_ratio_tie_picks_first_row() {
    let problem = Problem::new(vec![dec!(1)])
        .with_constraint(vec![dec!(2)], dec!(6))
        .with_constraint(vec![dec!(1)], dec!(3));
    let mut tableau = Tableau::new(&problem).unwrap();

    let Step::Pivoted(pivot) = Solver::new().step(&mut tableau).unwrap() else {
        panic!("Expected a pivot");
    };
    assert_eq!(pivot.entering, VarId::new(0));
    assert_eq!(pivot.leaving, RowId::new(0));
    assert_eq!(tableau.row_name(RowId::new(0)).unwrap(), "x1");
    assert_eq!(tableau.rhs(RowId::new(1)).unwrap(), dec!(0));
}

#[test]
fn test_rejects_ragged_input() {
    let problem = Problem::new(vec![dec!(1), dec!(2)])
        .with_constraint(vec![dec!(1), dec!(1), dec!(1), dec!(1)], dec!(3));
    assert!(Tableau::new(&problem).is_err());
}
