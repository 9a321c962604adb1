use kb_statement_tools::{app, cli, settings::Settings};

static APP_NAME: &str = "KB:Balances";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let matches = cli::command(
        "kb-balance",
        "Writes the balances of a Komerční banka account, grouped by currency, as JSON.",
    )
    .get_matches();
    let options = cli::Options::from_matches(&matches);

    let settings = match Settings::load(&options.environment) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        }
    };
    app::init_tracing(&settings);
    app::banner(APP_NAME, &settings);

    let destination = options.destination(&settings);
    let result = app::run_balances(&settings, &destination).await;

    std::process::exit(app::finish(result, &destination));
}
