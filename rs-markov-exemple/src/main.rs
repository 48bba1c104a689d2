use std::time::Duration;

use rs_markov_core::model::engine::{Engine, DEFAULT_DATABASE};
use rs_markov_core::model::generation_input::Seed;
use rs_markov_core::model::monitor::WorkerSpec;

const FABLES: &str = "The fox ran through the field, and the crow watched from the tree. \
The fox called to the crow, and the crow dropped the cheese. The fox ate the cheese, \
and the crow flew away. The moral is simple: never trust a fox. The fox slept in the \
field, and the crow slept in the tree.";

const PETS: &str = "The cat sat on the mat, and the dog sat by the door. The cat \
chased the dog, and the dog chased the cat. The cat slept on the mat, and the dog \
slept by the door. So i fed the cat, and i fed the dog too.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Failed generation attempts are reported through the logger when
    // 'verbose' is set (RUST_LOG=info to see them)
    env_logger::init();

    let mut engine = Engine::new();

    // Feed one corpus into the default database and another one into a
    // separate, fully independent database
    engine.ingest(FABLES, DEFAULT_DATABASE, false);
    engine.ingest(PETS, "pets", false);

    // Create a generation input with the default budget (20 words, 100 attempts)
    let mut input = engine.make_generation_input();
    input.max_words = 12;
    input.verbose = true;

    // Unseeded generation: the starting word pair is drawn at random
    for i in 0..5 {
        println!("Fable {}: {}", i + 1, engine.generate(&input)?);
    }

    // Seed steering: bias the start toward a pair containing "crow".
    // 'Word' uses a single candidate, 'List' tries candidates in order
    input.seed = Seed::Word("crow".to_owned());
    println!("Seeded fable: {}", engine.generate(&input)?);

    input.seed = Seed::List(vec!["unicorn".to_owned(), "cheese".to_owned()]);
    println!("List-seeded fable: {}", engine.generate(&input)?);

    // Databases are isolated: the pets corpus never leaks into the fables
    input.database = "pets".to_owned();
    input.seed = Seed::None;
    println!("Pets: {}", engine.generate(&input)?);

    // Generating from a database that holds no data is a typed error
    input.database = "empty".to_owned();
    match engine.generate(&input) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Expected failure: {}", e),
    }

    // So is clearing a database that was never created
    match engine.clear(Some("unknown")) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Expected failure: {}", e),
    }

    // The liveness monitor revives its worker whenever it dies. This worker
    // exits immediately, so every check finds it dead and respawns it
    engine.start_monitor(
        Duration::from_millis(200),
        WorkerSpec::new("short-lived", || {
            println!("worker: doing one unit of work, then dying");
        }),
    )?;
    std::thread::sleep(Duration::from_millis(700));

    // Stopping is bounded by one interval
    engine.stop_monitor();
    assert!(!engine.monitor_is_running());

    Ok(())
}
