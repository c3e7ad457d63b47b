//! File round trips for saved games.

use tabula_core::{Action, Change, Effect, Game, GameConfig, Transform, Value};
use tabula_journal::{
    load_file_or_empty, load_from_file, save_to_file, Error, Exporter, StoreConfig,
};
use tempfile::TempDir;

/// A game touching every part of the ledger: characters, changes with
/// durations, a retracted value step, a cancelled creation and a timed effect.
fn campaign() -> Game {
    let game = Game::with_config(GameConfig {
        name: "Lost Mine".into(),
        timer_name: "Session clock".into(),
    })
    .add_character("Kolobok")
    .add_character("Baba Yaga");

    let goblin = Action::create(Value::new("goblin", 7).with_descriptions("small", "A sneaky goblin"));
    let game = game.make_action(&goblin);

    let (hurt, hit) = goblin.post_state().change_described(
        Some(Transform::sub(3.0)),
        None,
        &Change::named("Arrow").duration(6.0),
    );
    let game = game.make_action(&hit);
    let (hurt, _) = hurt.change(Some(Transform::sub(1.0)), None);
    let hurt = hurt.rollback_action(hit.id());
    let (_, slowed) = Effect::new("Slow", Transform::multiply(0.5))
        .with_duration(30.0)
        .apply(&hurt, None, None);
    let game = game.subscribe_effect(&slowed);

    let torch = Action::create(Value::new("torch", true));
    game.make_action(&torch).cancel_action(torch.id())
}

#[test]
fn ron_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign.ron");
    let game = campaign();
    let config = StoreConfig::default();

    save_to_file(&game, &path, &config).unwrap();
    let loaded = load_from_file(&path, &config).unwrap();

    assert_eq!(loaded, game);
    assert_eq!(Exporter::new(&loaded).to_text(), Exporter::new(&game).to_text());
}

#[test]
fn bincode_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign.bin");
    let game = campaign();
    let config = StoreConfig::bincode();

    save_to_file(&game, &path, &config).unwrap();
    assert_eq!(load_from_file(&path, &config).unwrap(), game);
}

#[test]
fn loaded_game_keeps_working() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign.ron");
    let game = campaign();
    save_to_file(&game, &path, &StoreConfig::default()).unwrap();

    let loaded = load_from_file(&path, &StoreConfig::default()).unwrap();
    let first = loaded.actions()[0].id();
    assert_eq!(loaded.cancel_action(first), game.cancel_action(first));
}

#[test]
fn missing_file_gives_empty_game() {
    let dir = TempDir::new().unwrap();
    let (game, error) = load_file_or_empty(dir.path().join("nope.ron"), &StoreConfig::default());

    assert_eq!(game, Game::new());
    assert!(matches!(error, Some(Error::Io(_))));
}

#[test]
fn wrong_format_gives_empty_game() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign.bin");
    save_to_file(&campaign(), &path, &StoreConfig::bincode()).unwrap();

    let (game, error) = load_file_or_empty(&path, &StoreConfig::default());
    assert_eq!(game, Game::new());
    assert!(error.is_some());
}
