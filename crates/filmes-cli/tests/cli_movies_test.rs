#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

fn filmes(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("filmes");
    cmd.arg("--dir")
        .arg(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env_remove("TMDB_API_KEY");
    cmd
}

fn add_matrix(dir: &Path) {
    filmes(dir)
        .args([
            "movies",
            "add",
            "--title",
            "The Matrix",
            "--synopsis",
            "A hacker learns the truth.",
            "--release-date",
            "1999-03-30",
            "--language",
            "en",
            "--rating",
            "8.2",
            "--lat",
            "-23.55",
            "--lon",
            "-46.63",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("with ID 1"));
}

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("filmes");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("movies"))
        .stdout(predicate::str::contains("tmdb"))
        .stdout(predicate::str::contains("weather"));
}

#[test]
fn test_movies_add_missing_title() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("filmes");
    cmd.args(["movies", "add", "--synopsis", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn test_movies_add_rejects_bad_date() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    filmes(dir.path())
        .args([
            "movies",
            "add",
            "--title",
            "X",
            "--synopsis",
            "S",
            "--release-date",
            "30/03/1999",
            "--language",
            "en",
            "--lat",
            "0",
            "--lon",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_movies_add_rejects_out_of_range_rating() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    filmes(dir.path())
        .args([
            "movies",
            "add",
            "--title",
            "X",
            "--synopsis",
            "S",
            "--release-date",
            "1999-03-30",
            "--language",
            "en",
            "--rating",
            "11",
            "--lat",
            "0",
            "--lon",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 10"));
}

#[test]
fn test_movies_add_rejects_blank_title() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    filmes(dir.path())
        .args([
            "movies",
            "add",
            "--title",
            "  ",
            "--synopsis",
            "S",
            "--release-date",
            "1999-03-30",
            "--language",
            "en",
            "--lat",
            "0",
            "--lon",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be blank"));
    filmes(dir.path())
        .args(["movies", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No movies in the catalog"));
}

#[test]
fn test_movies_edit_rejects_blank_language() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    add_matrix(dir.path());

    // Act & Assert
    filmes(dir.path())
        .args(["movies", "edit", "--id", "1", "--language", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be blank"));
}

#[test]
fn test_movies_list_empty_catalog() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    filmes(dir.path())
        .args(["movies", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No movies in the catalog"));
}

#[test]
fn test_movies_add_then_list() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    add_matrix(dir.path());

    // Act & Assert
    filmes(dir.path())
        .args(["movies", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Matrix"))
        .stdout(predicate::str::contains("1999-03-30"))
        .stdout(predicate::str::contains("Total: 1 movies"));
}

#[test]
fn test_movies_edit_changes_only_given_fields() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    add_matrix(dir.path());

    // Act
    filmes(dir.path())
        .args(["movies", "edit", "--id", "1", "--title", "Matrix Reloaded"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated movie 1"));

    // Assert
    filmes(dir.path())
        .args(["movies", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matrix Reloaded"))
        .stdout(predicate::str::contains("1999-03-30"));
}

#[test]
fn test_movies_edit_missing_id_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    filmes(dir.path())
        .args(["movies", "edit", "--id", "7", "--title", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("movie 7 not found"));
}

#[test]
fn test_movies_delete() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    add_matrix(dir.path());

    // Act
    filmes(dir.path())
        .args(["movies", "delete", "--id", "1"])
        .assert()
        .success();

    // Assert
    filmes(dir.path())
        .args(["movies", "delete", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("movie 1 not found"));
}

#[test]
fn test_movies_export_writes_csv() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    add_matrix(dir.path());
    let output = dir.path().join("export").join("catalog.csv");

    // Act
    filmes(dir.path())
        .args(["movies", "export", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 movies"));

    // Assert
    let text = std::fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Id,TmdbId,Title,Synopsis,ReleaseDate,OriginalLanguage,Rating,PosterPath,Latitude,Longitude"
    );
    assert!(lines.next().unwrap().starts_with("1,0,The Matrix,"));
}

#[test]
fn test_movies_export_writes_xlsx() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    add_matrix(dir.path());
    let output = dir.path().join("catalog.xlsx");

    // Act
    filmes(dir.path())
        .args(["movies", "export", "--output"])
        .arg(&output)
        .assert()
        .success();

    // Assert
    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_movies_export_format_flag_overrides_extension() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    add_matrix(dir.path());
    let output = dir.path().join("catalog.dat");

    // Act
    filmes(dir.path())
        .args(["movies", "export", "--format", "xlsx", "--output"])
        .arg(&output)
        .assert()
        .success();

    // Assert
    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_tmdb_search_blank_query_sends_nothing() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    filmes(dir.path())
        .args(["tmdb", "search", "--query", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter a search term"));
}

#[test]
fn test_weather_forecast_unreachable_provider_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[weather]\nbase_url = \"http://127.0.0.1:9/\"\n\n[http]\ntimeout_secs = 2\n",
    )
    .unwrap();

    // Act & Assert
    filmes(dir.path())
        .args(["weather", "forecast", "--lat", "-23.55", "--lon", "-46.63"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn test_config_init_writes_defaults_once() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    filmes(dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    // Assert
    let text = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(text.contains("[tmdb]"));
    filmes(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
