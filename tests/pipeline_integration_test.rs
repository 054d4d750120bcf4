// ==========================================
// Pipeline integration tests
// ==========================================
// Goal: real workbook → validation → staging transaction → dashboard
// ==========================================


use chrono::NaiveDate;
use community_dashboard_loader::config::FixedClock;
use community_dashboard_loader::engine::{PipelineError, PipelineOrchestrator, RunMode};
use community_dashboard_loader::importer::ImportError;
use community_dashboard_loader::logging;
use community_dashboard_loader::repository::RepositoryError;
use test_helpers::*;

/// A run on 15 April 2024 expects March 2024 data
fn april_run(env: &TestEnv) -> PipelineOrchestrator {
    PipelineOrchestrator::new(
        env.config.clone(),
        FixedClock(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()),
    )
}

fn march_rows() -> Vec<Vec<Cell>> {
    vec![
        row("Referrals", "01/03/2024", "12", "Podiatry", "EMIS"),
        row("Contacts", "01/03/2024", "40.5", "Dietetics", "SystmOne"),
        row("Caseload", "01/02/2024", "7", "District Nursing", "EMIS"),
    ]
}

/// Seed staging + dashboard with a committed February load
fn seed_february(env: &TestEnv) {
    write_workbook(
        &env.source_file("February 2024-Community.xlsx"),
        &WorkbookSpec::new(vec![
            row("Referrals", "01/02/2024", "3", "Podiatry", "EMIS"),
            row("Contacts", "01/02/2024", "4", "Podiatry", "EMIS"),
        ]),
    )
    .unwrap();

    let orchestrator = PipelineOrchestrator::new(
        env.config.clone(),
        FixedClock(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()),
    );
    orchestrator.run().unwrap();
}

#[test]
fn test_full_run_loads_staging_and_dashboard() {
    logging::init_test();
    let env = TestEnv::new().unwrap();
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(march_rows()),
    )
    .unwrap();

    let summary = april_run(&env).run().unwrap();

    assert_eq!(summary.mode, RunMode::Load);
    assert_eq!(summary.rows_validated, 3);
    assert_eq!(summary.rows_loaded, 3);
    assert_eq!(
        summary.reporting_period.first_day(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
    assert!(summary.source_path.ends_with("March 2024-Community.xlsx"));

    assert_eq!(env.count(&env.config.staging.community_table), 3);
    assert_eq!(env.count(&env.config.staging.primary_table), 3);
    assert_eq!(env.count(DASHBOARD_TABLE), 3);

    // text "40.5" lands as REAL, date as ISO text
    let conn = env.open().unwrap();
    let (date, value, kind): (String, f64, String) = conn
        .query_row(
            r#"SELECT "Date", "DataValue", typeof("DataValue") FROM "Tbl_Dashboard_Data_STAGING_Community"
               WHERE "IndicatorName" = 'Contacts'"#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(date, "2024-03-01");
    assert_eq!(value, 40.5);
    assert_eq!(kind, "real");
}

#[test]
fn test_date_cells_are_accepted() {
    let env = TestEnv::new().unwrap();
    let mut rows = march_rows();
    rows[0][2] = Cell::Date(2024, 3, 1);
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(rows),
    )
    .unwrap();

    let summary = april_run(&env).validate_only().unwrap();
    assert_eq!(summary.rows_validated, 3);
}

#[test]
fn test_invalid_date_aborts_before_load() {
    let env = TestEnv::new().unwrap();
    seed_february(&env);

    let mut rows = march_rows();
    rows.push(row("Referrals", "32/01/2024", "1", "Podiatry", "EMIS"));
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(rows),
    )
    .unwrap();

    let err = april_run(&env).run().unwrap_err();
    assert_eq!(err.kind(), "invalid_date");
    match err {
        PipelineError::Import(ImportError::InvalidDate { row, value }) => {
            assert_eq!(row, 5);
            assert_eq!(value, "32/01/2024");
        }
        other => panic!("unexpected error: {other}"),
    }

    // February load untouched
    assert_eq!(env.count(&env.config.staging.community_table), 2);
    assert_eq!(env.count(DASHBOARD_TABLE), 2);
}

#[test]
fn test_missing_period_is_reported_separately() {
    let env = TestEnv::new().unwrap();
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(vec![
            row("Referrals", "01/02/2024", "12", "Podiatry", "EMIS"),
            row("Referrals", "01/01/2024", "11", "Podiatry", "EMIS"),
        ]),
    )
    .unwrap();

    let err = april_run(&env).run().unwrap_err();
    assert_eq!(err.kind(), "missing_period_data");
    assert!(matches!(
        err,
        PipelineError::Import(ImportError::MissingPeriodData { .. })
    ));
    assert_eq!(env.count(&env.config.staging.community_table), 0);
}

#[test]
fn test_in_month_but_off_period_date_lists_dates() {
    let env = TestEnv::new().unwrap();
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(vec![
            row("Referrals", "02/03/2024", "12", "Podiatry", "EMIS"),
            row("Contacts", "02/03/2024", "4", "Podiatry", "EMIS"),
        ]),
    )
    .unwrap();

    let err = april_run(&env).run().unwrap_err();
    assert!(err.to_string().contains("dates present: 2024-03-02"));
    match err {
        PipelineError::Import(ImportError::MissingPeriodData { expected, found }) => {
            assert_eq!(expected.first_day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
            assert_eq!(found, vec![NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unmapped_indicator_lists_distinct_values() {
    let env = TestEnv::new().unwrap();
    let mut rows = march_rows();
    rows.push(row("Waiting List", "01/03/2024", "1", "Podiatry", "EMIS"));
    rows.push(row("Waiting List", "02/03/2024", "2", "Podiatry", "EMIS"));
    rows.push(row("Discharges", "01/03/2024", "3", "Podiatry", "EMIS"));
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(rows),
    )
    .unwrap();

    match april_run(&env).run().unwrap_err() {
        PipelineError::Import(ImportError::UnmappedValue(findings)) => {
            assert_eq!(findings.len(), 1);
            assert_eq!(findings[0].sheet, "Indicator Name");
            assert_eq!(
                findings[0].values,
                vec!["Discharges".to_string(), "Waiting List".to_string()]
            );
            assert_eq!(findings[0].rows, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(env.count(&env.config.staging.community_table), 0);
}

#[test]
fn test_failing_procedure_leaves_pre_run_state() {
    let env = TestEnv::new().unwrap();
    seed_february(&env);

    // break the dashboard merge
    community_dashboard_loader::db::register_procedure(
        &env.open().unwrap(),
        &env.config.staging.process_procedure,
        "INSERT INTO no_such_table SELECT 1;",
    )
    .unwrap();

    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(march_rows()),
    )
    .unwrap();

    let err = april_run(&env).run().unwrap_err();
    assert_eq!(err.kind(), "database");
    match err {
        PipelineError::Repository(RepositoryError::StagingStepFailed { step, .. }) => {
            assert_eq!(step, "exec sp_dashboard_data_process_from_staging");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(env.count(&env.config.staging.community_table), 2);
    assert_eq!(env.count(&env.config.staging.primary_table), 2);
    assert_eq!(env.count(DASHBOARD_TABLE), 2);

    let conn = env.open().unwrap();
    let dates: i64 = conn
        .query_row(
            r#"SELECT COUNT(*) FROM "Tbl_Dashboard_Data_STAGING_Community" WHERE "Date" = '2024-02-01'"#,
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(dates, 2);
}

#[test]
fn test_validate_only_never_opens_database() {
    let env = TestEnv::new().unwrap();
    let mut config = env.config.clone();
    config.database_path = env.dir.path().join("absent.db");
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(march_rows()),
    )
    .unwrap();

    let orchestrator = PipelineOrchestrator::new(
        config.clone(),
        FixedClock(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
    );
    let summary = orchestrator.validate_only().unwrap();
    assert_eq!(summary.mode, RunMode::DryRun);
    assert_eq!(summary.rows_loaded, 0);
    assert!(!config.database_path.exists());
}

#[test]
fn test_missing_database_is_connection_error() {
    let env = TestEnv::new().unwrap();
    let mut config = env.config.clone();
    config.database_path = env.dir.path().join("absent.db");
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(march_rows()),
    )
    .unwrap();

    let orchestrator = PipelineOrchestrator::new(
        config.clone(),
        FixedClock(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
    );
    let err = orchestrator.run().unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Repository(RepositoryError::DatabaseConnectionError { .. })
    ));
    assert!(!config.database_path.exists());
}

#[test]
fn test_missing_required_column_is_source_error() {
    let env = TestEnv::new().unwrap();
    let mut spec = WorkbookSpec::new(vec![vec![
        text("Referrals"),
        text("Monthly"),
        text("01/03/2024"),
        text("12"),
        Cell::Number(1.0),
        text("Podiatry"),
    ]]);
    spec.header = HEADER[..6].to_vec();
    write_workbook(&env.source_file("March 2024-Community.xlsx"), &spec).unwrap();

    let err = april_run(&env).run().unwrap_err();
    assert_eq!(err.kind(), "source_read");
    assert!(err.to_string().contains("Source"));
}

#[test]
fn test_non_numeric_value_is_coercion_error() {
    let env = TestEnv::new().unwrap();
    let mut rows = march_rows();
    rows[1][3] = text("n/a");
    write_workbook(
        &env.source_file("March 2024-Community.xlsx"),
        &WorkbookSpec::new(rows),
    )
    .unwrap();

    let err = april_run(&env).run().unwrap_err();
    assert_eq!(err.kind(), "type_coercion");
    assert_eq!(env.count(&env.config.staging.community_table), 0);
}
