//! Full sessions against a mocked AniList endpoint and a temporary vault.

use std::io::Cursor;
use std::path::Path;

use reqwest::Client;
use serde_json::json;
use shiori_api::AniListClient;
use shiori_cli::app::{self, AppError, Outcome};
use shiori_cli::prompt::{PromptError, Prompter};
use shiori_core::config::AppConfig;
use shiori_core::render::{CoverDownloader, DocumentRenderer};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type ScriptedPrompter = Prompter<Cursor<Vec<u8>>, Vec<u8>>;

fn scripted(input: &str) -> ScriptedPrompter {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn console(prompter: &ScriptedPrompter) -> String {
    String::from_utf8_lossy(prompter.output()).into_owned()
}

/// Client and renderer wired the way the binary wires them, pointed at `server`.
fn session(server: &MockServer, vault: &Path) -> (AniListClient, DocumentRenderer) {
    let config = AppConfig::from_toml(&format!(
        r#"
        [api]
        url = "{}/graphql"
        retry_delay_secs = 0

        [output]
        root = "{}"
        "#,
        server.uri(),
        vault.display()
    ))
    .unwrap();

    let http = Client::new();
    let client = AniListClient::with_http_client(http.clone(), config.client_config().unwrap());
    let renderer = DocumentRenderer::new(
        config.output_root(),
        config.render_options(),
        CoverDownloader::new(http),
    );
    (client, renderer)
}

async fn mount_search(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": { "search": "Naruto", "type": "ANIME" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "Page": { "media": [
                { "id": 20, "title": { "romaji": "NARUTO", "english": "Naruto", "native": "ナルト" } },
                { "id": 1735, "title": { "romaji": "Naruto: Shippuuden", "english": "Naruto Shippuden", "native": null } }
            ] } }
        })))
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer, cover_url: &str) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "id": 20 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "Media": {
                "id": 20,
                "type": "ANIME",
                "title": { "romaji": "NARUTO", "english": "Naruto", "native": "ナルト" },
                "description": "Moments prior to Naruto Uzumaki's birth, a huge demon known as the Kyuubi attacked Konohagakure.<br><br>\n(Source: Anime News Network)",
                "coverImage": { "extraLarge": cover_url, "large": null },
                "genres": ["Action", "Adventure", "Martial Arts"],
                "siteUrl": "https://anilist.co/anime/20",
                "studios": { "edges": [
                    { "isMain": false, "node": { "name": "Aniplex" } },
                    { "isMain": true, "node": { "name": "Studio Pierrot" } }
                ] },
                "staff": { "edges": [
                    { "role": "Original Creator", "node": { "name": { "full": "Masashi Kishimoto" }, "image": { "large": null } } }
                ] },
                "characters": { "edges": [
                    { "node": { "name": { "full": "Naruto Uzumaki" }, "image": { "large": null } } }
                ] },
                "startDate": { "year": 2002, "month": 10, "day": 3 },
                "season": "FALL",
                "seasonYear": 2002,
                "source": "MANGA",
                "episodes": 220,
                "duration": 23,
                "chapters": null,
                "volumes": null
            } }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_session_writes_note_and_cover() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_details(&server, &format!("{}/covers/bx20.jpg", server.uri())).await;
    Mock::given(method("GET"))
        .and(path("/covers/bx20.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xFF\xD8\xFF".to_vec()))
        .mount(&server)
        .await;

    let vault = tempfile::tempdir().unwrap();
    let (client, renderer) = session(&server, vault.path());
    let mut prompter = scripted("1\nNaruto\n1\n9\n1\n");

    let outcome = app::run(&client, &renderer, &mut prompter).await.unwrap();
    let Outcome::Saved(note) = outcome else {
        panic!("expected a saved note");
    };

    let note_path = vault.path().join("Anime").join("Naruto.md");
    assert_eq!(note.document, note_path);
    assert_eq!(
        std::fs::read(vault.path().join("Anime/Covers/Naruto.jpg")).unwrap(),
        b"\xFF\xD8\xFF"
    );

    let doc = std::fs::read_to_string(&note_path).unwrap();
    assert!(doc.starts_with("---\nstatus: Completed\ntitle: \"Naruto\"\nscore: 9\n"));
    assert!(doc.contains("\ngenres: [Action, Adventure, MartialArts]\n"));
    assert!(doc.contains("\nrelease_date: 2002-10-03\n"));
    assert!(doc.contains("\nwatch_time: 5060\n"));
    assert!(doc.contains("\ncover: Naruto.jpg\n"));
    assert!(doc.contains("\nanilist_url: https://anilist.co/anime/20\n"));
    assert!(doc.contains("\nmedia_type: anime\n"));
    assert!(doc.contains("![[Naruto.jpg]]"));
    assert!(doc.contains("### **Studio**: Studio Pierrot\n"));
    assert!(doc.contains("### **Season**: Fall 2002\n"));
    assert!(doc.contains("Masashi Kishimoto"));
    assert!(!doc.contains("<br>"));

    let out = console(&prompter);
    assert!(out.contains("1: Naruto\n2: Naruto Shippuden\n"));
    assert!(out.contains(&format!("Entry for Naruto saved to {}", note_path.display())));
}

#[tokio::test]
async fn test_missing_cover_leaves_reference_empty() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_details(&server, &format!("{}/covers/gone.jpg", server.uri())).await;
    Mock::given(method("GET"))
        .and(path("/covers/gone.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let vault = tempfile::tempdir().unwrap();
    let (client, renderer) = session(&server, vault.path());
    let mut prompter = scripted("anime\nNaruto\n1\n\n3\n");

    let Outcome::Saved(note) = app::run(&client, &renderer, &mut prompter).await.unwrap() else {
        panic!("expected a saved note");
    };
    assert!(note.cover.is_none());

    let doc = std::fs::read_to_string(&note.document).unwrap();
    assert!(doc.contains("\nstatus: Planning\n"));
    assert!(doc.contains("\nscore:\n"));
    assert!(doc.contains("\ncover:\n"));
    assert!(doc.contains("\n![[]]\n"));
    assert!(!vault.path().join("Anime/Covers/Naruto.jpg").exists());
}

#[tokio::test]
async fn test_unavailable_search_reports_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(503))
        .expect(5)
        .mount(&server)
        .await;

    let vault = tempfile::tempdir().unwrap();
    let (client, renderer) = session(&server, vault.path());
    let mut prompter = scripted("1\nNaruto\n");

    let outcome = app::run(&client, &renderer, &mut prompter).await.unwrap();

    assert!(matches!(outcome, Outcome::NoResults));
    assert!(console(&prompter).contains("No results found."));
    assert!(!vault.path().join("Anime").exists());
}

#[tokio::test]
async fn test_out_of_range_choice_is_asked_again() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_details(&server, "").await;

    let vault = tempfile::tempdir().unwrap();
    let (client, renderer) = session(&server, vault.path());
    let mut prompter = scripted("1\nNaruto\n3\n0\n1\n7\n2\n");

    let Outcome::Saved(note) = app::run(&client, &renderer, &mut prompter).await.unwrap() else {
        panic!("expected a saved note");
    };

    let doc = std::fs::read_to_string(&note.document).unwrap();
    assert!(doc.contains("\nstatus: Watching\n"));
    assert!(doc.contains("\nscore: 7\n"));
    let out = console(&prompter);
    assert!(out.contains("Choice 3 is out of range"));
    assert!(out.contains("Choice 0 is out of range"));
}

#[tokio::test]
async fn test_closed_input_aborts_without_writing() {
    let server = MockServer::start().await;
    mount_search(&server).await;

    let vault = tempfile::tempdir().unwrap();
    let (client, renderer) = session(&server, vault.path());
    let mut prompter = scripted("1\nNaruto\n");

    let err = app::run(&client, &renderer, &mut prompter).await.unwrap_err();
    assert!(matches!(err, AppError::Prompt(PromptError::Closed)));
    assert!(!vault.path().join("Anime").exists());
}
