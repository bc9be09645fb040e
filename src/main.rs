use rand::rngs::StdRng;
use rand::SeedableRng;

use position_fixtures::config::AppConfig;
use position_fixtures::generator::{PositionGenerator, ReferenceTables};
use position_fixtures::ledger;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    position_fixtures::metrics::register_metrics();

    let config = AppConfig::from_env()?;
    let tables = ReferenceTables::builtin();

    let mut rng = match config.seed {
        Some(seed) => {
            tracing::info!(seed, "Using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    tracing::info!(
        count = config.count,
        symbols = tables.len(),
        output = %config.output_path.display(),
        "Generating position fixtures"
    );

    let generator = PositionGenerator::now(&tables, config.generator.clone())?;
    let settings = generator.settings();
    tracing::debug!(
        as_of = %generator.as_of(),
        open_probability = settings.open_probability,
        open_price_jitter = settings.open_price_jitter,
        close_price_jitter = settings.close_price_jitter,
        max_holding_days = settings.max_holding_days,
        "Generator configured"
    );
    let positions = generator.generate(config.count, &mut rng)?;

    ledger::write_ledger(&config.output_path, &positions)?;

    println!("Generated JSON file with {} positions.", positions.len());
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    // Logs go to stderr; stdout carries only the completion line.
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
