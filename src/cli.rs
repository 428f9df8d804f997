// AlumnosAdmin - cli.rs
//
// Command-line surface: argument definitions and command execution.
// Commands return their stdout text so they can be driven from tests;
// `main.rs` only prints it.

use crate::app::session::{self, SessionData};
use crate::app::state::AppState;
use crate::app::store::{HttpStore, JsonFileStore, RecordStore};
use crate::core::export::{self, ExportFormat};
use crate::core::filter::{FilterSpec, SearchQuery};
use crate::core::model::{
    resolve_country, Alumno, Disponibilidad, RecordId, SituacionLaboral, Sexo, Status,
};
use crate::core::stats::ChartKind;
use crate::core::validate::validate_draft;
use crate::platform::config::AppConfig;
use crate::platform::fs::write_atomic;
use crate::ui::panels;
use crate::util::error::{AlumnosError, Result, StoreError};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// AlumnosAdmin - search, filter, chart and export alumno records.
///
/// Records come from the backend REST API, or from a local JSON snapshot
/// with --data-file.
#[derive(Parser, Debug)]
#[command(name = "alumnos", version, about)]
pub struct Cli {
    /// Backend base URL (overrides [api] base_url).
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Use a local JSON snapshot instead of the API.
    #[arg(long = "data-file", global = true)]
    pub data_file: Option<PathBuf>,

    /// Config file to load instead of the platform default.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List alumnos matching the filters.
    List(FilterArgs),

    /// Show every field of one alumno.
    Show {
        id: String,
        /// Reference date for the derived age (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Create an alumno.
    Add(DraftArgs),

    /// Change fields of an existing alumno. Omitted fields keep their value.
    Update {
        id: String,
        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Delete an alumno.
    Delete {
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Charts for the alumnos matching the filters.
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
        /// Single chart to draw. Without it, the summary and every chart are shown.
        #[arg(long, value_enum)]
        chart: Option<ChartArg>,
    },

    /// Export the alumnos matching the filters.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        /// Output file. Defaults to Alumnos.<ext> in the export directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the country catalogue.
    Countries,

    /// List the provinces of a country (by catalogue id or name).
    Provinces { pais: String },
}

/// Search term and facet filters shared by list, stats and export.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Matches nombre/apellidos (case-insensitive) or telefono.
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub sexo: Option<String>,
    #[arg(long)]
    pub disponibilidad: Option<String>,
    #[arg(long = "situacion")]
    pub situacion: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub pais: Option<String>,
    #[arg(long)]
    pub provincia: Option<String>,
    #[arg(long = "edad-min")]
    pub edad_min: Option<String>,
    #[arg(long = "edad-max")]
    pub edad_max: Option<String>,
    /// Reference date for ages (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Start from the filters saved by the previous list/stats/export.
    #[arg(long)]
    pub resume: bool,
}

/// Record fields accepted by add and update.
#[derive(Args, Debug, Default, Clone)]
pub struct DraftArgs {
    #[arg(long)]
    pub nombre: Option<String>,
    #[arg(long)]
    pub apellidos: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub telefono: Option<String>,
    #[arg(long)]
    pub direccion: Option<String>,
    #[arg(long = "codigo-postal")]
    pub codigo_postal: Option<String>,
    #[arg(long = "fecha-nacimiento")]
    pub fecha_nacimiento: Option<String>,
    #[arg(long)]
    pub dni: Option<String>,
    #[arg(long)]
    pub pais: Option<String>,
    #[arg(long)]
    pub provincia: Option<String>,
    #[arg(long)]
    pub sexo: Option<String>,
    #[arg(long)]
    pub disponibilidad: Option<String>,
    #[arg(long)]
    pub propietario: Option<String>,
    /// Registration date. Defaults to today on add.
    #[arg(long)]
    pub creado: Option<String>,
    #[arg(long = "situacion")]
    pub situacion: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartArg {
    Sexo,
    Status,
    Disponibilidad,
    Situacion,
    Edad,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Sexo => ChartKind::Sexo,
            ChartArg::Status => ChartKind::Status,
            ChartArg::Disponibilidad => ChartKind::Disponibilidad,
            ChartArg::Situacion => ChartKind::SituacionLaboral,
            ChartArg::Edad => ChartKind::Edad,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

// =============================================================================
// Execution context
// =============================================================================

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub store: Box<dyn RecordStore>,
    pub config: AppConfig,
    /// Where `session.json` lives. `None` disables session persistence.
    pub session_file: Option<PathBuf>,
    /// Reference date used when a command gets no `--today`.
    pub today: NaiveDate,
}

impl Context {
    /// Pick the store from CLI flags and config: a snapshot file if
    /// `--data-file` was given, otherwise the API.
    pub fn from_cli(cli: &Cli, config: AppConfig, session_file: Option<PathBuf>) -> Self {
        let store: Box<dyn RecordStore> = match cli.data_file {
            Some(ref path) => {
                tracing::info!(path = %path.display(), "Using JSON snapshot store");
                Box::new(JsonFileStore::new(path.clone()))
            }
            None => {
                let base = cli.api_url.as_deref().unwrap_or(&config.api_base_url);
                tracing::info!(base_url = %base, "Using HTTP store");
                Box::new(HttpStore::new(base, config.http_timeout))
            }
        };
        Self {
            store,
            config,
            session_file,
            today: chrono::Local::now().date_naive(),
        }
    }
}

/// Run one command and return what it prints.
pub fn execute(command: &Command, ctx: &Context) -> Result<String> {
    match command {
        Command::List(filter) => {
            let state = load_filtered(filter, ctx)?;
            Ok(panels::list::render(&state.visible()))
        }
        Command::Show { id, today } => {
            let alumno = ctx.store.get(&parse_id(id))?;
            Ok(panels::detail::render(&alumno, today.unwrap_or(ctx.today)))
        }
        Command::Add(fields) => {
            let mut draft = Alumno::default();
            fields.apply_to(&mut draft);
            if draft.creado.trim().is_empty() {
                draft.creado = ctx.today.format("%Y-%m-%d").to_string();
            }
            validate_draft(&draft)?;
            let created = ctx.store.create(&draft)?;
            Ok(format!("Alumno creado con id {}", created.id_label()))
        }
        Command::Update { id, fields } => {
            let id = parse_id(id);
            let mut alumno = ctx.store.get(&id)?;
            fields.apply_to(&mut alumno);
            validate_draft(&alumno)?;
            ctx.store.update(&id, &alumno)?;
            Ok(format!("Alumno {id} actualizado"))
        }
        Command::Delete { id, yes } => {
            if !yes {
                return Err(AlumnosError::Usage(format!(
                    "Deleting alumno {id} cannot be undone. Re-run with --yes to confirm."
                )));
            }
            let id = parse_id(id);
            ctx.store.delete(&id)?;
            Ok(format!("Alumno {id} eliminado"))
        }
        Command::Stats { filter, chart } => {
            let state = load_filtered(filter, ctx)?;
            let visible = state.visible();
            match chart {
                Some(kind) => Ok(panels::charts::render(
                    &ChartKind::from(*kind).compute(&visible, state.today),
                )),
                None => {
                    let mut out = panels::summary::render(&state.summary());
                    for kind in ChartKind::all().iter().filter(|k| **k != ChartKind::Sexo) {
                        out.push('\n');
                        out.push_str(&panels::charts::render(&kind.compute(&visible, state.today)));
                    }
                    Ok(out)
                }
            }
        }
        Command::Export {
            filter,
            format,
            output,
        } => {
            let state = load_filtered(filter, ctx)?;
            let format = ExportFormat::from(*format);
            let path = match output {
                Some(p) => p.clone(),
                None => {
                    let dir = ctx
                        .config
                        .export_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("."));
                    format.default_path(&dir)
                }
            };

            // Render fully before touching the target so a refused export
            // leaves any previous file in place.
            let mut buf = Vec::new();
            let count = export::export(format, &state.visible(), &mut buf, &path)?;
            write_atomic(&path, &buf).map_err(|e| AlumnosError::Io {
                path: path.clone(),
                operation: "write export file",
                source: e,
            })?;

            tracing::info!(records = count, path = %path.display(), "Export complete");
            Ok(format!("Exportados {count} alumnos a {}", path.display()))
        }
        Command::Countries => Ok(panels::catalogue::render_countries(
            &ctx.store.countries()?,
        )),
        Command::Provinces { pais } => {
            let countries = ctx.store.countries()?;
            let country = resolve_country(&countries, pais).ok_or_else(|| {
                StoreError::UnknownCountry {
                    name: pais.clone(),
                }
            })?;
            Ok(panels::catalogue::render_provinces(
                &ctx.store.provinces(&country.id)?,
            ))
        }
    }
}

fn parse_id(raw: &str) -> RecordId {
    match RecordId::from_str(raw.trim()) {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

/// Fetch, build the query, filter, and remember the query for `--resume`.
fn load_filtered(filter: &FilterArgs, ctx: &Context) -> Result<AppState> {
    let query = build_query(filter, ctx)?;

    let mut state = AppState::new(filter.today.unwrap_or(ctx.today));
    state.load_from(ctx.store.as_ref())?;
    state.set_query(query)?;

    if let Some(ref path) = ctx.session_file {
        if let Err(e) = session::save(&SessionData::from_query(&state.query), path) {
            tracing::warn!(error = %e, "Could not save session");
        }
    }
    Ok(state)
}

/// Canonicalise a categorical flag value ("ocupado", "OCUPADO" and
/// "Ocupado" all become the canonical wire value).
fn canonical<T>(value: &str, as_str: fn(&T) -> &'static str) -> Result<String>
where
    T: FromStr<Err = crate::core::model::UnknownVariant>,
{
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    T::from_str(value)
        .map(|v| as_str(&v).to_string())
        .map_err(|e| AlumnosError::Usage(e.to_string()))
}

/// Combine the starting query (saved session or config defaults) with the
/// flags given on this invocation. Flags win.
pub fn build_query(filter: &FilterArgs, ctx: &Context) -> Result<SearchQuery> {
    let base = filter
        .resume
        .then(|| ctx.session_file.as_deref())
        .flatten()
        .and_then(session::load)
        .and_then(|data| data.to_query())
        .unwrap_or_else(|| {
            SearchQuery::new(
                "",
                FilterSpec::default()
                    .with_edad(ctx.config.default_age_min, ctx.config.default_age_max),
            )
        });

    let mut raw = base.spec.to_raw();
    if let Some(ref v) = filter.sexo {
        raw.sexo = Some(canonical::<Sexo>(v, Sexo::as_str)?);
    }
    if let Some(ref v) = filter.disponibilidad {
        raw.disponibilidad = Some(canonical::<Disponibilidad>(v, Disponibilidad::as_str)?);
    }
    if let Some(ref v) = filter.situacion {
        raw.situacion_laboral = Some(canonical::<SituacionLaboral>(v, SituacionLaboral::as_str)?);
    }
    if let Some(ref v) = filter.status {
        raw.status = Some(canonical::<Status>(v, Status::as_str)?);
    }
    if let Some(ref v) = filter.pais {
        raw.pais = Some(v.trim().to_string());
    }
    if let Some(ref v) = filter.provincia {
        raw.provincia = Some(v.trim().to_string());
    }
    if filter.edad_min.is_some() || filter.edad_max.is_some() {
        let [min, max] = raw.edad.take().unwrap_or_default();
        raw.edad = Some([
            filter.edad_min.clone().unwrap_or(min),
            filter.edad_max.clone().unwrap_or(max),
        ]);
    }

    let spec = FilterSpec::from_raw(&raw)?;
    let term = filter.search.clone().unwrap_or(base.term);
    Ok(SearchQuery::new(term, spec))
}

impl DraftArgs {
    /// Overwrite the fields that were given. Categorical values are
    /// canonicalised when recognised and left as typed otherwise, so
    /// validation can report them.
    pub fn apply_to(&self, alumno: &mut Alumno) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.trim().to_string();
            }
        }
        fn set_enum<T: FromStr>(
            target: &mut String,
            value: &Option<String>,
            as_str: fn(&T) -> &'static str,
        ) {
            if let Some(v) = value {
                *target = match T::from_str(v) {
                    Ok(parsed) => as_str(&parsed).to_string(),
                    Err(_) => v.trim().to_string(),
                };
            }
        }

        set(&mut alumno.nombre, &self.nombre);
        set(&mut alumno.apellidos, &self.apellidos);
        set(&mut alumno.email, &self.email);
        set(&mut alumno.telefono, &self.telefono);
        set(&mut alumno.direccion, &self.direccion);
        set(&mut alumno.codigo_postal, &self.codigo_postal);
        set(&mut alumno.fecha_nacimiento, &self.fecha_nacimiento);
        set(&mut alumno.dni, &self.dni);
        set(&mut alumno.pais, &self.pais);
        set(&mut alumno.provincia, &self.provincia);
        set(&mut alumno.propietario, &self.propietario);
        set(&mut alumno.creado, &self.creado);
        set_enum::<Sexo>(&mut alumno.sexo, &self.sexo, Sexo::as_str);
        set_enum::<Disponibilidad>(
            &mut alumno.disponibilidad,
            &self.disponibilidad,
            Disponibilidad::as_str,
        );
        set_enum::<SituacionLaboral>(
            &mut alumno.situacion_laboral,
            &self.situacion,
            SituacionLaboral::as_str,
        );
        set_enum::<Status>(&mut alumno.status, &self.status, Status::as_str);
    }
}
