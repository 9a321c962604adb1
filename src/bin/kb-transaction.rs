use kb_statement_tools::{app, cli, settings::Settings};

static APP_NAME: &str = "KB:Transactions";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let matches = cli::command(
        "kb-transaction",
        "Writes the incoming and outgoing payments of a Komerční banka account \
         within REPORT_SCOPE as JSON.",
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
    let result = app::run_transactions(&settings, &destination).await;

    std::process::exit(app::finish(result, &destination));
}
