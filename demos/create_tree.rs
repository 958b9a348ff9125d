use dirfile_kit::{Options, Outcome, SlashMode};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let base = std::env::temp_dir().join("dirfile_demo");
    std::fs::create_dir_all(&base).unwrap();
    println!("Base dir: {}", base.display());

    let mut options = Options::new();
    options.set_slash_mode(SlashMode::Forward);
    options.set_base_dir(&base);
    options.set_rollback_on_failure(true);

    // `app` and `app/src` are created below the base dir, `main.rs` gets its contents,
    // `:>` climbs back into `app` for `README.md`
    let input = "/app/src/main.rs :\"fn main() {}\" > lib.rs :> README.md";
    let report = dirfile_kit::run(input, &options).unwrap();
    for (path, outcome) in report.entries() {
        println!("{outcome:?}: {}", path.display());
    }

    println!("Created {} entries", report.with_outcome(Outcome::Created).count());

    std::fs::remove_dir_all(&base).unwrap();
}
