// AlumnosAdmin - tests/e2e_filter.rs
//
// End-to-end tests for the fetch -> filter -> chart/export pipeline.
//
// These tests read a real JSON snapshot from disk through `JsonFileStore`,
// run the filter engine through `AppState`, and drive the CLI commands
// against temporary copies of the snapshot. No mocks.

use alumnos_admin::app::session;
use alumnos_admin::app::state::AppState;
use alumnos_admin::app::store::{JsonFileStore, RecordStore};
use alumnos_admin::cli::{self, Cli, Command, Context, DraftArgs, FilterArgs, FormatArg};
use alumnos_admin::core::export::CSV_HEADERS;
use alumnos_admin::core::filter::{filter_records, FilterSpec, SearchQuery};
use alumnos_admin::core::model::{Alumno, RecordId, Sexo, SituacionLaboral};
use alumnos_admin::platform::config::AppConfig;
use alumnos_admin::util::error::{AlumnosError, ExportError, IssueKind, StoreError};
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn load_fixture() -> Vec<Alumno> {
    JsonFileStore::new(fixture("alumnos.json"))
        .list()
        .expect("fixture snapshot must load")
}

/// Copy the fixture into a temp dir so mutating commands leave it intact.
fn scratch_store(dir: &Path) -> PathBuf {
    let path = dir.join("alumnos.json");
    std::fs::copy(fixture("alumnos.json"), &path).unwrap();
    path
}

fn context(data_file: &Path, session_dir: Option<&Path>) -> Context {
    Context {
        store: Box::new(JsonFileStore::new(data_file)),
        config: AppConfig::default(),
        session_file: session_dir.map(session::session_path),
        today: today(),
    }
}

fn ids(records: &[&Alumno]) -> Vec<String> {
    records.iter().map(|a| a.id_label()).collect()
}

// =============================================================================
// Filter engine over the fixture
// =============================================================================

#[test]
fn e2e_fixture_decodes_nulls_and_sparse_records() {
    let records = load_fixture();
    assert_eq!(records.len(), 4);
    assert_eq!(records[2].direccion, "");
    assert_eq!(records[3].email, "");
}

#[test]
fn e2e_combined_ana_scenario() {
    let records = load_fixture();
    let spec = FilterSpec::default().with_sexo(Sexo::Femenino);
    let result = filter_records(&records, "ana", &spec, today()).unwrap();
    assert_eq!(ids(&result), vec!["1"]);
}

#[test]
fn e2e_term_matches_surname_and_phone() {
    let records = load_fixture();
    let spec = FilterSpec::default();

    // "anaya" is in Luis's surname; case folds for names.
    let result = filter_records(&records, "ANAYA", &spec, today()).unwrap();
    assert_eq!(ids(&result), vec!["3"]);

    // Phone digits match as a raw substring.
    let result = filter_records(&records, "0001", &spec, today()).unwrap();
    assert_eq!(ids(&result), vec!["4"]);
}

#[test]
fn e2e_empty_query_keeps_everything_in_order_and_is_idempotent() {
    let records = load_fixture();
    let spec = FilterSpec::default();
    let first = filter_records(&records, "", &spec, today()).unwrap();
    assert_eq!(ids(&first), vec!["1", "2", "3", "4"]);

    let again: Vec<Alumno> = first.iter().map(|&a| a.clone()).collect();
    let second = filter_records(&again, "", &spec, today()).unwrap();
    assert_eq!(ids(&second), ids(&first));
}

#[test]
fn e2e_age_boundary_and_unparsable_birth_date() {
    let records = load_fixture();
    let boundary = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    // Luis (2000-06-16) is still 23 on 2024-06-15.
    let spec = FilterSpec::default().with_edad(24, 24);
    let result = filter_records(&records, "", &spec, boundary).unwrap();
    assert_eq!(ids(&result), vec!["1"]);

    // Eva's unparsable birth date counts as age 0.
    let spec = FilterSpec::default().with_edad(0, 0);
    let result = filter_records(&records, "", &spec, today()).unwrap();
    assert_eq!(ids(&result), vec!["4"]);
}

#[test]
fn e2e_facets_match_exact_wire_values() {
    let records = load_fixture();
    let spec = FilterSpec::default()
        .with_situacion_laboral(SituacionLaboral::Ocupado)
        .with_pais("España")
        .with_provincia("Madrid");
    let result = filter_records(&records, "", &spec, today()).unwrap();
    assert_eq!(ids(&result), vec!["4"]);

    // Case differs from the stored value: no match.
    let spec = FilterSpec::default().with_pais("españa");
    assert!(filter_records(&records, "", &spec, today())
        .unwrap()
        .is_empty());
}

#[test]
fn e2e_state_summary_reflects_filtered_view() {
    let store = JsonFileStore::new(fixture("alumnos.json"));
    let mut state = AppState::new(today());
    state.load_from(&store).unwrap();
    state
        .set_query(SearchQuery::new(
            "",
            FilterSpec::default().with_sexo(Sexo::Femenino),
        ))
        .unwrap();

    let summary = state.summary();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.visible, 2);
    assert_eq!(summary.by_sexo.count_of("Femenino"), 2);
    assert_eq!(summary.by_sexo.count_of("Masculino"), 0);
}

// =============================================================================
// CLI commands against a scratch snapshot
// =============================================================================

#[test]
fn e2e_list_command_renders_matches_only() {
    let dir = TempDir::new().unwrap();
    let data = scratch_store(dir.path());
    let ctx = context(&data, None);

    let out = cli::execute(
        &Command::List(FilterArgs {
            search: Some("ana".to_string()),
            sexo: Some("femenino".to_string()),
            ..Default::default()
        }),
        &ctx,
    )
    .unwrap();
    assert!(out.contains("Lopez"));
    assert!(!out.contains("Diaz"));

    let out = cli::execute(
        &Command::List(FilterArgs {
            search: Some("nadie".to_string()),
            ..Default::default()
        }),
        &ctx,
    )
    .unwrap();
    assert_eq!(out, "No hay alumnos que coincidan con los filtros.");
}

#[test]
fn e2e_export_writes_filtered_csv() {
    let dir = TempDir::new().unwrap();
    let data = scratch_store(dir.path());
    let ctx = context(&data, None);
    let out_path = dir.path().join("export.csv");

    let msg = cli::execute(
        &Command::Export {
            filter: FilterArgs {
                pais: Some("España".to_string()),
                ..Default::default()
            },
            format: FormatArg::Csv,
            output: Some(out_path.clone()),
        },
        &ctx,
    )
    .unwrap();
    assert!(msg.starts_with("Exportados 3 alumnos"));

    let mut reader = csv::Reader::from_path(&out_path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, CSV_HEADERS.to_vec());
    let first_column: Vec<String> = reader
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect();
    assert_eq!(first_column, vec!["1", "2", "4"]);
}

#[test]
fn e2e_refused_export_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("big.json");
    let body = vec!["{}"; 100_001].join(",");
    std::fs::write(&data, format!("[{body}]")).unwrap();
    let out_path = dir.path().join("Alumnos.csv");
    std::fs::write(&out_path, "previous export\n").unwrap();
    let ctx = context(&data, None);

    let err = cli::execute(
        &Command::Export {
            filter: FilterArgs::default(),
            format: FormatArg::Csv,
            output: Some(out_path.clone()),
        },
        &ctx,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AlumnosError::Export(ExportError::TooManyRecords { count: 100_001, .. })
    ));
    assert_eq!(
        std::fs::read_to_string(&out_path).unwrap(),
        "previous export\n"
    );
    assert!(!dir.path().join("Alumnos.csv.tmp").exists());
}

#[test]
fn e2e_resume_restores_saved_filters() {
    let dir = TempDir::new().unwrap();
    let data = scratch_store(dir.path());
    let ctx = context(&data, Some(dir.path()));

    cli::execute(
        &Command::List(FilterArgs {
            status: Some("cliente".to_string()),
            ..Default::default()
        }),
        &ctx,
    )
    .unwrap();

    let out = cli::execute(
        &Command::List(FilterArgs {
            resume: true,
            ..Default::default()
        }),
        &ctx,
    )
    .unwrap();
    assert!(out.contains("Diaz"));
    assert!(!out.contains("Lopez"));
}

#[test]
fn e2e_add_update_delete_cycle() {
    let dir = TempDir::new().unwrap();
    let data = scratch_store(dir.path());
    let ctx = context(&data, None);

    let draft = DraftArgs {
        nombre: Some("Sara".to_string()),
        apellidos: Some("Gil".to_string()),
        email: Some("sara@example.com".to_string()),
        fecha_nacimiento: Some("1999-09-09".to_string()),
        dni: Some("44444444A".to_string()),
        sexo: Some("femenino".to_string()),
        disponibilidad: Some("tarde".to_string()),
        situacion: Some("Ocupado".to_string()),
        status: Some("lead templado".to_string()),
        ..Default::default()
    };
    let msg = cli::execute(&Command::Add(draft), &ctx).unwrap();
    assert_eq!(msg, "Alumno creado con id 5");

    let created = ctx.store.get(&RecordId::Number(5)).unwrap();
    assert_eq!(created.situacion_laboral, "ocupado");
    assert_eq!(created.status, "lead_templado");
    assert_eq!(created.creado, "2024-06-01");

    cli::execute(
        &Command::Update {
            id: "5".to_string(),
            fields: DraftArgs {
                telefono: Some("699111222".to_string()),
                ..Default::default()
            },
        },
        &ctx,
    )
    .unwrap();
    assert_eq!(
        ctx.store.get(&RecordId::Number(5)).unwrap().telefono,
        "699111222"
    );

    cli::execute(
        &Command::Delete {
            id: "5".to_string(),
            yes: true,
        },
        &ctx,
    )
    .unwrap();
    assert!(matches!(
        ctx.store.get(&RecordId::Number(5)),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn e2e_add_rejects_incomplete_draft() {
    let dir = TempDir::new().unwrap();
    let data = scratch_store(dir.path());
    let ctx = context(&data, None);

    let err = cli::execute(
        &Command::Add(DraftArgs {
            nombre: Some("Solo nombre".to_string()),
            email: Some("no-es-un-email".to_string()),
            ..Default::default()
        }),
        &ctx,
    )
    .unwrap_err();
    match err {
        AlumnosError::Validation(v) => {
            assert!(v.has_issue("apellidos", IssueKind::Missing));
            assert!(v.has_issue("email", IssueKind::Malformed));
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert_eq!(ctx.store.list().unwrap().len(), 4);
}

#[test]
fn e2e_provinces_resolve_country_by_name() {
    let dir = TempDir::new().unwrap();
    let data = scratch_store(dir.path());
    let ctx = context(&data, None);

    let out = cli::execute(
        &Command::Provinces {
            pais: "españa".to_string(),
        },
        &ctx,
    )
    .unwrap();
    assert!(out.contains("Madrid"));
    assert!(out.contains("Sevilla"));
    assert!(!out.contains("Lisboa"));

    let err = cli::execute(
        &Command::Provinces {
            pais: "Francia".to_string(),
        },
        &ctx,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AlumnosError::Store(StoreError::UnknownCountry { .. })
    ));
}

#[test]
fn e2e_stats_single_chart_via_cli_parse() {
    let dir = TempDir::new().unwrap();
    let data = scratch_store(dir.path());
    let cli = Cli::try_parse_from([
        "alumnos",
        "stats",
        "--chart",
        "status",
        "--data-file",
        data.to_str().unwrap(),
    ])
    .unwrap();
    let ctx = context(&data, None);

    let out = cli::execute(&cli.command, &ctx).unwrap();
    assert!(out.starts_with("Alumnos por estado (total 4)"));
    assert!(out.lines().any(|l| l.contains("cliente") && l.ends_with(" 1")));
}
