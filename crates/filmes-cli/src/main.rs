//! filmes - local movie catalog with TMDB import and weather forecasts.

/// Search, details and import orchestration.
mod catalog;
/// Application configuration (TOML).
mod config;
/// CSV and XLSX export.
mod export;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use filmes_api::cache::ResponseCache;
use filmes_api::tmdb::{MetadataApi, MovieDetails, TmdbClient};
use filmes_api::weather::{ForecastApi, ForecastResult, OpenMeteoClient};
use filmes_db::{MovieRecord, NewMovie, SqliteCatalog, open_db};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::catalog::{
    CatalogService, DetailsView, ForecastOutcome, LocalLookup, RemoteDetails, SearchOutcome,
    parse_release_date,
};
use crate::config::{AppConfig, resolve_config_path};
use crate::export::ExportFormat;

/// User-Agent sent to both providers.
const USER_AGENT: &str = concat!("filmes/", env!("CARGO_PKG_VERSION"));

/// Fully wired catalog service.
type Service = CatalogService<TmdbClient, OpenMeteoClient, SqliteCatalog>;

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "filmes", about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Local movie catalog.
    Movies(MoviesCommand),
    /// Query TMDB and import movies.
    Tmdb(TmdbCommand),
    /// Query the Open-Meteo forecast.
    Weather(WeatherCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesCommand {
    /// Movies subcommand to run.
    #[command(subcommand)]
    command: MoviesSubcommands,
}

/// Available movies subcommands.
#[derive(Subcommand)]
enum MoviesSubcommands {
    /// List all local movies.
    List,
    /// Show a movie with TMDB details and the forecast at its coordinates.
    Show(ShowArgs),
    /// Add a movie by hand.
    Add(AddArgs),
    /// Edit a movie; omitted fields keep their values.
    Edit(EditArgs),
    /// Delete a movie.
    Delete(IdArgs),
    /// Export the catalog to CSV or XLSX.
    Export(ExportArgs),
}

/// Arguments for `movies show`.
#[derive(clap::Args)]
struct ShowArgs {
    /// Local movie ID.
    #[arg(long, required = true)]
    id: i64,
    /// TMDB ID to show when the local movie does not exist.
    #[arg(long)]
    tmdb_id: Option<u64>,
}

/// Arguments for `movies add`.
#[derive(clap::Args)]
struct AddArgs {
    /// Title.
    #[arg(long, required = true, value_parser = parse_required_text)]
    title: String,
    /// Synopsis.
    #[arg(long, required = true, value_parser = parse_required_text)]
    synopsis: String,
    /// Release date (YYYY-MM-DD).
    #[arg(long, required = true, value_parser = parse_date_arg)]
    release_date: NaiveDate,
    /// Original language code (e.g. "en").
    #[arg(long, required = true, value_parser = parse_required_text)]
    language: String,
    /// Rating (0-10).
    #[arg(long, default_value_t = 0.0, value_parser = parse_rating_arg)]
    rating: f64,
    /// Poster URL.
    #[arg(long, default_value = "")]
    poster_path: String,
    /// Latitude in degrees.
    #[arg(long, required = true, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude in degrees.
    #[arg(long, required = true, allow_negative_numbers = true)]
    lon: f64,
}

/// Arguments for `movies edit`.
#[derive(clap::Args)]
struct EditArgs {
    /// Local movie ID.
    #[arg(long, required = true)]
    id: i64,
    /// New title.
    #[arg(long, value_parser = parse_required_text)]
    title: Option<String>,
    /// New synopsis.
    #[arg(long, value_parser = parse_required_text)]
    synopsis: Option<String>,
    /// New release date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    release_date: Option<NaiveDate>,
    /// New original language code.
    #[arg(long, value_parser = parse_required_text)]
    language: Option<String>,
    /// New rating (0-10).
    #[arg(long, value_parser = parse_rating_arg)]
    rating: Option<f64>,
    /// New poster URL.
    #[arg(long)]
    poster_path: Option<String>,
    /// New latitude.
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    /// New longitude.
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
}

/// Arguments carrying a local movie ID.
#[derive(clap::Args)]
struct IdArgs {
    /// Local movie ID.
    #[arg(long, required = true)]
    id: i64,
}

/// Arguments for `movies export`.
#[derive(clap::Args)]
struct ExportArgs {
    /// Output file.
    #[arg(long, required = true)]
    output: PathBuf,
    /// Output format (default: from the file extension, CSV otherwise).
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// Search movies by title.
    Search(TmdbSearchArgs),
    /// List the images of a movie.
    Images(TmdbIdArgs),
    /// Import a movie into the local catalog.
    Import(TmdbImportArgs),
}

/// Arguments for `tmdb search`.
#[derive(clap::Args)]
struct TmdbSearchArgs {
    /// Search query (e.g. "The Matrix").
    #[arg(long, required = true)]
    query: String,
    /// Result page (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments carrying a TMDB movie ID.
#[derive(clap::Args)]
struct TmdbIdArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for `tmdb import`.
#[derive(clap::Args)]
struct TmdbImportArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Latitude to store (default: 0).
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude to store (default: 0).
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
}

/// Arguments for the `weather` subcommand.
#[derive(clap::Args)]
struct WeatherCommand {
    /// Weather subcommand to run.
    #[command(subcommand)]
    command: WeatherSubcommands,
}

/// Available weather subcommands.
#[derive(Subcommand)]
enum WeatherSubcommands {
    /// Daily min/max temperature forecast for a coordinate pair.
    Forecast(ForecastArgs),
}

/// Arguments for `weather forecast`.
#[derive(clap::Args)]
struct ForecastArgs {
    /// Latitude in degrees.
    #[arg(long, required = true, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude in degrees.
    #[arg(long, required = true, allow_negative_numbers = true)]
    lon: f64,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default values.
    Init,
}

/// Rejects values that are blank after trimming.
fn parse_required_text(value: &str) -> std::result::Result<String, String> {
    if value.trim().is_empty() {
        return Err(String::from("value must not be blank"));
    }
    Ok(String::from(value))
}

/// Parses a `YYYY-MM-DD` argument.
fn parse_date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_release_date(Some(value))
        .ok_or_else(|| format!("invalid date {value:?}, expected YYYY-MM-DD"))
}

/// Parses a rating argument in `0..=10`.
fn parse_rating_arg(value: &str) -> std::result::Result<f64, String> {
    let rating: f64 = value
        .parse()
        .map_err(|_| format!("invalid rating {value:?}"))?;
    if !(0.0..=10.0).contains(&rating) {
        return Err(format!("rating must be between 0 and 10, got {rating}"));
    }
    Ok(rating)
}

/// Loads `config.toml` for `dir`.
fn load_config(dir: Option<&Path>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds the TMDB client from config.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
fn build_tmdb_client(config: &AppConfig, cache: &Arc<ResponseCache>) -> Result<TmdbClient> {
    let base_url = Url::parse(&config.tmdb.base_url)
        .with_context(|| format!("invalid tmdb.base_url {:?}", config.tmdb.base_url))?;

    let mut builder = TmdbClient::builder()
        .base_url(base_url)
        .api_key(config.tmdb_api_key())
        .user_agent(USER_AGENT)
        .timeout(config.http_timeout())
        .cache(Arc::clone(cache));
    if let Some(language) = config.tmdb_language() {
        builder = builder.language(language);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the Open-Meteo client from config.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
fn build_weather_client(config: &AppConfig, cache: &Arc<ResponseCache>) -> Result<OpenMeteoClient> {
    let base_url = Url::parse(&config.weather.base_url)
        .with_context(|| format!("invalid weather.base_url {:?}", config.weather.base_url))?;

    OpenMeteoClient::builder()
        .base_url(base_url)
        .user_agent(USER_AGENT)
        .timeout(config.http_timeout())
        .cache(Arc::clone(cache))
        .build()
        .context("failed to build weather client")
}

/// Wires both clients, one shared cache and the catalog store.
///
/// # Errors
///
/// Returns an error if config loading, client construction or the
/// database open fails.
#[instrument(skip_all)]
fn build_service(dir: Option<&Path>) -> Result<Service> {
    let config = load_config(dir)?;
    let cache = Arc::new(ResponseCache::new(config.cache.max_entries));
    let tmdb = build_tmdb_client(&config, &cache)?;
    let weather = build_weather_client(&config, &cache)?;
    let conn = open_db(dir).context("failed to open database")?;
    Ok(CatalogService::new(tmdb, weather, SqliteCatalog::new(conn)))
}

/// Logs one catalog row.
fn log_movie_row(movie: &MovieRecord) {
    tracing::info!(
        "{}\t{}\t{}\t{}\t{:.1}\t{}",
        movie.id,
        movie
            .remote_id
            .map_or_else(|| String::from("-"), |id| id.to_string()),
        movie.release_date.format("%Y-%m-%d"),
        movie.language,
        movie.rating,
        movie.title,
    );
}

/// Runs `movies list`.
#[instrument(skip_all)]
fn run_movies_list(service: &Service) -> Result<()> {
    let movies = service.list().context("failed to load movies")?;
    if movies.is_empty() {
        tracing::info!("No movies in the catalog. Add one with `movies add` or `tmdb import`.");
        return Ok(());
    }

    tracing::info!("ID\tTMDB\tRelease\t\tLang\tRating\tTitle");
    for movie in &movies {
        log_movie_row(movie);
    }
    tracing::info!("Total: {} movies", movies.len());
    Ok(())
}

/// Runs `movies show`.
#[instrument(skip_all)]
async fn run_movies_show(service: &Service, args: &ShowArgs) -> Result<()> {
    let view = service.details(args.id, args.tmdb_id).await;
    log_details_view(&view);
    Ok(())
}

/// Logs every part of a details view, including absence indicators.
fn log_details_view(view: &DetailsView) {
    match &view.local {
        LocalLookup::Found(movie) => {
            tracing::info!("Local #{}: {}", movie.id, movie.title);
            tracing::info!("  Release: {}", movie.release_date.format("%Y-%m-%d"));
            tracing::info!("  Language: {}", movie.language);
            tracing::info!("  Rating: {:.1}", movie.rating);
            tracing::info!("  Poster: {}", movie.poster_path);
            tracing::info!("  Location: {}, {}", movie.latitude, movie.longitude);
            tracing::info!("  Synopsis: {}", movie.synopsis);
        }
        LocalLookup::NotFound(id) => tracing::info!("No local movie with ID {id}"),
    }

    match &view.remote {
        RemoteDetails::Found {
            details,
            poster_url,
        } => log_remote_details(details, poster_url),
        RemoteDetails::NotLinked => tracing::info!("TMDB: not linked"),
        RemoteDetails::Unavailable(id) => {
            tracing::info!("TMDB: details for {id} are unavailable right now");
        }
    }

    match &view.forecast {
        ForecastOutcome::Available(forecast) => log_forecast(forecast),
        ForecastOutcome::NoCoordinates => tracing::info!(
            "Forecast: this movie has no coordinates. Set them with `movies edit --lat --lon`."
        ),
        ForecastOutcome::Unavailable => {
            tracing::info!("Forecast: unavailable right now");
        }
    }
}

/// Logs TMDB details.
fn log_remote_details(details: &MovieDetails, poster_url: &str) {
    tracing::info!(
        "TMDB #{}: {}",
        details.remote_id,
        details.title.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "  Release: {}",
        details.release_date.as_deref().unwrap_or("-")
    );
    tracing::info!("  Language: {}", details.language.as_deref().unwrap_or("-"));
    tracing::info!("  Rating: {:.1}", details.rating);
    tracing::info!("  Poster: {poster_url}");
}

/// Logs a forecast, today's line first.
fn log_forecast(forecast: &ForecastResult) {
    let fmt_temp = |t: Option<f64>| t.map_or_else(|| String::from("-"), |v| format!("{v:.1}"));

    let today = forecast.local_date(Utc::now());
    tracing::info!(
        "Forecast for {}, {} ({})",
        forecast.latitude,
        forecast.longitude,
        forecast.timezone
    );
    if let Some(day) = forecast.day(today) {
        tracing::info!(
            "  Today: max {} °C, min {} °C",
            fmt_temp(day.max_celsius),
            fmt_temp(day.min_celsius)
        );
    }
    tracing::info!("  Date\t\tMax\tMin");
    for day in &forecast.days {
        tracing::info!(
            "  {}\t{}\t{}",
            day.date.format("%Y-%m-%d"),
            fmt_temp(day.max_celsius),
            fmt_temp(day.min_celsius)
        );
    }
}

/// Runs `movies add`.
#[instrument(skip_all)]
fn run_movies_add(service: &Service, args: AddArgs) -> Result<()> {
    let created = service
        .create(NewMovie {
            remote_id: None,
            title: args.title,
            synopsis: args.synopsis,
            release_date: args.release_date,
            language: args.language,
            rating: args.rating,
            poster_path: args.poster_path,
            latitude: args.lat,
            longitude: args.lon,
        })
        .context("failed to add movie")?;
    tracing::info!("Added movie {:?} with ID {}", created.title, created.id);
    Ok(())
}

/// Runs `movies edit`.
///
/// # Errors
///
/// Returns an error if the movie does not exist or the update fails.
#[instrument(skip_all)]
fn run_movies_edit(service: &Service, args: EditArgs) -> Result<()> {
    let Some(mut movie) = service.get(args.id).context("failed to load movie")? else {
        bail!("movie {} not found", args.id);
    };

    if let Some(title) = args.title {
        movie.title = title;
    }
    if let Some(synopsis) = args.synopsis {
        movie.synopsis = synopsis;
    }
    if let Some(release_date) = args.release_date {
        movie.release_date = release_date;
    }
    if let Some(language) = args.language {
        movie.language = language;
    }
    if let Some(rating) = args.rating {
        movie.rating = rating;
    }
    if let Some(poster_path) = args.poster_path {
        movie.poster_path = poster_path;
    }
    if let Some(lat) = args.lat {
        movie.latitude = lat;
    }
    if let Some(lon) = args.lon {
        movie.longitude = lon;
    }

    if !service.update(&movie).context("failed to update movie")? {
        bail!("movie {} not found", movie.id);
    }
    tracing::info!("Updated movie {}", movie.id);
    Ok(())
}

/// Runs `movies delete`.
///
/// # Errors
///
/// Returns an error if the movie does not exist or the delete fails.
#[instrument(skip_all)]
fn run_movies_delete(service: &Service, args: &IdArgs) -> Result<()> {
    if !service.delete(args.id).context("failed to delete movie")? {
        bail!("movie {} not found", args.id);
    }
    tracing::info!("Deleted movie {}", args.id);
    Ok(())
}

/// Runs `movies export`.
#[instrument(skip_all)]
fn run_movies_export(service: &Service, args: &ExportArgs) -> Result<()> {
    let movies = service.list().context("failed to load movies")?;
    let format = args
        .format
        .unwrap_or_else(|| ExportFormat::from_path(&args.output));
    export::export_catalog(&args.output, &movies, format)?;
    tracing::info!(
        "Exported {} movies to {}",
        movies.len(),
        args.output.display()
    );
    Ok(())
}

/// Runs `tmdb search`.
///
/// # Errors
///
/// Returns an error if TMDB does not answer.
#[instrument(skip_all)]
async fn run_tmdb_search(service: &Service, args: &TmdbSearchArgs) -> Result<()> {
    match service.search(&args.query, args.page).await {
        SearchOutcome::EmptyQuery => {
            tracing::info!("Enter a search term to look up movies on TMDB.");
            Ok(())
        }
        SearchOutcome::Unavailable => bail!("TMDB search failed; see the log for details"),
        SearchOutcome::Page {
            page,
            total_pages,
            total_results,
            hits,
        } => {
            tracing::info!("Page {page}/{total_pages} ({total_results} results)");
            tracing::info!("ID\tRelease\t\tRating\tTitle\tPoster");
            for hit in &hits {
                tracing::info!(
                    "{}\t{}\t{:.1}\t{}\t{}",
                    hit.summary.remote_id,
                    hit.summary
                        .release_date
                        .as_deref()
                        .filter(|d| !d.is_empty())
                        .unwrap_or("-"),
                    hit.summary.rating,
                    hit.summary.title.as_deref().unwrap_or("-"),
                    hit.poster_url,
                );
            }
            Ok(())
        }
    }
}

/// Runs `tmdb images`.
///
/// # Errors
///
/// Returns an error if the client fails to build or TMDB does not answer.
#[instrument(skip_all)]
async fn run_tmdb_images(dir: Option<&Path>, args: &TmdbIdArgs) -> Result<()> {
    let config = load_config(dir)?;
    let cache = Arc::new(ResponseCache::new(config.cache.max_entries));
    let client = build_tmdb_client(&config, &cache)?;

    let Some(images) = client.images(args.id).await else {
        bail!("TMDB images for movie {} are unavailable", args.id);
    };

    tracing::info!("Kind\tSize\t\tLang\tPath");
    let posters = images.posters.iter().map(|i| ("poster", i));
    let backdrops = images.backdrops.iter().map(|i| ("backdrop", i));
    for (kind, image) in posters.chain(backdrops) {
        tracing::info!(
            "{kind}\t{}x{}\t{}\t{}",
            image
                .width
                .map_or_else(|| String::from("?"), |w| w.to_string()),
            image
                .height
                .map_or_else(|| String::from("?"), |h| h.to_string()),
            image.language.as_deref().unwrap_or("-"),
            image.file_path,
        );
    }
    tracing::info!(
        "Total: {} posters, {} backdrops",
        images.posters.len(),
        images.backdrops.len()
    );
    Ok(())
}

/// Runs `tmdb import`.
///
/// # Errors
///
/// Returns an error if TMDB details are unavailable or the store fails.
#[instrument(skip_all)]
async fn run_tmdb_import(service: &Service, args: &TmdbImportArgs) -> Result<()> {
    let imported = service.import_movie(args.id, args.lat, args.lon).await?;
    tracing::info!(
        "Imported {:?} (TMDB {}) as local ID {}",
        imported.record.title,
        args.id,
        imported.record.id
    );
    if imported.release_date_defaulted {
        tracing::info!("TMDB sent no usable release date; stored 0001-01-01 instead.");
    }
    if imported.record.coordinates().is_none() {
        tracing::info!(
            "No coordinates stored. Set them with `movies edit --lat --lon` to see a forecast."
        );
    }
    Ok(())
}

/// Runs `weather forecast`.
///
/// # Errors
///
/// Returns an error if the client fails to build or the provider does not answer.
#[instrument(skip_all)]
async fn run_weather_forecast(dir: Option<&Path>, args: &ForecastArgs) -> Result<()> {
    let config = load_config(dir)?;
    let cache = Arc::new(ResponseCache::new(config.cache.max_entries));
    let client = build_weather_client(&config, &cache)?;

    let Some(forecast) = client.forecast(args.lat, args.lon).await else {
        bail!("forecast for {}, {} is unavailable", args.lat, args.lon);
    };
    log_forecast(&forecast);
    Ok(())
}

/// Runs `config init`.
///
/// # Errors
///
/// Returns an error if the file already exists or cannot be written.
#[instrument(skip_all)]
fn run_config_init(dir: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(dir).context("failed to resolve config path")?;
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::Movies(cmd) => {
            let service = build_service(dir)?;
            match cmd.command {
                MoviesSubcommands::List => run_movies_list(&service),
                MoviesSubcommands::Show(args) => run_movies_show(&service, &args).await,
                MoviesSubcommands::Add(args) => run_movies_add(&service, args),
                MoviesSubcommands::Edit(args) => run_movies_edit(&service, args),
                MoviesSubcommands::Delete(args) => run_movies_delete(&service, &args),
                MoviesSubcommands::Export(args) => run_movies_export(&service, &args),
            }
        }
        Commands::Tmdb(tmdb) => match tmdb.command {
            TmdbSubcommands::Search(args) => {
                run_tmdb_search(&build_service(dir)?, &args).await
            }
            TmdbSubcommands::Images(args) => run_tmdb_images(dir, &args).await,
            TmdbSubcommands::Import(args) => {
                run_tmdb_import(&build_service(dir)?, &args).await
            }
        },
        Commands::Weather(weather) => match weather.command {
            WeatherSubcommands::Forecast(args) => run_weather_forecast(dir, &args).await,
        },
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Init => run_config_init(dir),
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_date_arg() {
        // Arrange & Act & Assert
        assert_eq!(
            parse_date_arg("2002-08-30").unwrap(),
            NaiveDate::from_ymd_opt(2002, 8, 30).unwrap()
        );
        assert!(parse_date_arg("30/08/2002").is_err());
    }

    #[test]
    fn test_parse_required_text() {
        // Arrange & Act & Assert
        assert_eq!(parse_required_text("The Matrix").unwrap(), "The Matrix");
        assert!(parse_required_text("").is_err());
        assert!(parse_required_text("   ").is_err());
    }

    #[test]
    fn test_add_rejects_blank_required_fields() {
        // Arrange
        let args = |title: &str, synopsis: &str, language: &str| {
            vec![
                String::from("filmes"),
                String::from("movies"),
                String::from("add"),
                String::from("--title"),
                String::from(title),
                String::from("--synopsis"),
                String::from(synopsis),
                String::from("--release-date"),
                String::from("1999-03-30"),
                String::from("--language"),
                String::from(language),
                String::from("--lat"),
                String::from("1"),
                String::from("--lon"),
                String::from("2"),
            ]
        };

        // Act & Assert
        assert!(Cli::try_parse_from(args("", "s", "en")).is_err());
        assert!(Cli::try_parse_from(args("t", " ", "en")).is_err());
        assert!(Cli::try_parse_from(args("t", "s", "")).is_err());
        assert!(Cli::try_parse_from(args("t", "s", "en")).is_ok());
    }

    #[test]
    fn test_edit_rejects_blank_title() {
        // Arrange & Act
        let result = Cli::try_parse_from(["filmes", "movies", "edit", "--id", "1", "--title", ""]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rating_arg() {
        // Arrange & Act & Assert
        assert!((parse_rating_arg("8.5").unwrap() - 8.5).abs() < f64::EPSILON);
        assert!(parse_rating_arg("10").is_ok());
        assert!(parse_rating_arg("10.1").is_err());
        assert!(parse_rating_arg("-1").is_err());
        assert!(parse_rating_arg("abc").is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        // Arrange & Act & Assert
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_user_agent_names_crate_version() {
        // Arrange & Act & Assert
        assert!(USER_AGENT.starts_with("filmes/"));
    }
}
