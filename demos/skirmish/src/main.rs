//! Skirmish Example
//!
//! Demonstrates tabula with a short fight between two characters.
//! Damage is rolled from dice formulas, a timed blessing runs out, a summoned
//! wolf is retracted with everything done to it, and the game is saved and
//! reloaded before the ledger is printed.

use anyhow::{Context, Result};
use std::sync::Arc;
use tabula_core::{Action, Change, Effect, Game, GameConfig, Transform, Value, ValueId};
use tabula_dice::{Attack, Formula, GameRng};
use tabula_journal::{load_from_file, save_to_file, Exporter, StoreConfig};

fn current(game: &Game, id: ValueId) -> Result<Value> {
    game.entity(id)
        .cloned()
        .with_context(|| format!("entity {} is not in the game", id))
}

fn hit(game: &Game, target: ValueId, damage: i64, by: &str) -> Result<(Game, Arc<Action>)> {
    let value = current(game, target)?;
    let (_, action) = value.change_described(
        Some(Transform::sub(damage as f64)),
        None,
        &Change::named(format!("{} hits {}", by, value.name()))
            .short(format!("{} damage", damage))
            .duration(6.0),
    );
    Ok((game.make_action(&action), action))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== Tabula Skirmish Example ===\n");

    let seed = 42;
    tracing::info!(seed, "starting skirmish");
    let mut rng = GameRng::new(seed);
    let game = Game::with_config(GameConfig {
        name: "Skirmish at the Crossroads".into(),
        timer_name: "Combat clock".into(),
    })
    .add_character("Kolobok")
    .add_character("Baba Yaga");

    // Hit points live next to the character sheets
    let kolobok_hp = Action::create(Value::new("Kolobok HP", 18));
    let yaga_hp = Action::create(Value::new("Baba Yaga HP", 22));
    let game = game.make_action(&kolobok_hp).make_action(&yaga_hp);
    println!("Created {} entities", game.entities().count());

    // Kolobok rolls damage
    let attack = Attack::new("Rolling tackle", Formula::new("Rolling tackle", "2d6 + 1"));
    let roll = attack.roll(&mut rng)?;
    println!("{} ({}) = {}", roll.name, roll.formula.text, roll.value());
    let (game, _) = hit(&game, yaga_hp.target(), roll.value(), "Kolobok")?;

    // A blessing that lasts one minute of game time
    let hp = current(&game, kolobok_hp.target())?;
    let (blessed, blessing) = Effect::new("Bless", Transform::add(5.0))
        .with_duration(60.0)
        .apply(&hp, None, None);
    let bless_action = blessed
        .last_action()
        .cloned()
        .context("effect application recorded no action")?;
    let game = game.make_action(&bless_action).subscribe_effect(&blessing);
    println!(
        "Kolobok is blessed: {} HP",
        current(&game, kolobok_hp.target())?.payload()
    );

    // Baba Yaga summons a wolf, which bites
    let wolf = Action::create(Value::new("Wolf", 11));
    let game = game.make_action(&wolf);
    let bite = Attack::new("Bite", Formula::new("Bite", "d6 + 2")).roll(&mut rng)?;
    let (game, _) = hit(&game, kolobok_hp.target(), bite.value(), "Wolf")?;
    let (game, _) = hit(&game, wolf.target(), 4, "Kolobok")?;

    // Time passes until the blessing is over
    let hp = current(&game, kolobok_hp.target())?;
    let (_, rest) = hp.change_described(
        Some(Transform::Identity),
        None,
        &Change::named("Catch breath").duration(60.0),
    );
    let game = game.make_action(&rest);
    let finished = game
        .timer()
        .find_effect(blessing.id())
        .is_some_and(|effect| effect.is_finished());
    println!(
        "After {} seconds the blessing finished: {}",
        game.timer().seconds_passed(),
        finished
    );

    // The game master rules the summon illegal
    let game = game.cancel_action(wolf.id());
    println!(
        "Wolf retracted: {} actions, {} entities remain",
        game.actions().len(),
        game.entities().count()
    );

    // Save and reload
    let path = std::env::temp_dir().join("tabula-skirmish.ron");
    let config = StoreConfig::default();
    save_to_file(&game, &path, &config)
        .with_context(|| format!("saving to {}", path.display()))?;
    let reloaded = load_from_file(&path, &config)
        .with_context(|| format!("loading from {}", path.display()))?;
    anyhow::ensure!(reloaded == game, "reloaded game differs from the saved one");
    println!("Saved and reloaded {}\n", path.display());

    print!("{}", Exporter::new(&reloaded).to_text());
    Ok(())
}
