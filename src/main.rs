use clap::Parser;
use passcodec::cli::{commands, output, Cli, Commands};

fn main() {
    // Log to stderr so command output stays pipeable; RUST_LOG controls
    // verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => commands::list::execute(&cli),
        Commands::Encode {
            ref plain,
            ref scheme,
            ref salt,
            ref passphrase,
            prompt_passphrase,
            base64,
        } => commands::encode::execute(
            &cli,
            plain.as_deref(),
            scheme.as_deref(),
            salt.as_deref(),
            passphrase.as_deref(),
            prompt_passphrase,
            base64,
        ),
        Commands::Decode {
            ref encoded,
            ref scheme,
            base64,
            ref passphrase,
            prompt_passphrase,
        } => commands::decode::execute(
            &cli,
            encoded,
            scheme,
            base64,
            passphrase.as_deref(),
            prompt_passphrase,
        ),
        Commands::Verify {
            ref encoded,
            ref plain,
            ref scheme,
            base64,
            ref passphrase,
            prompt_passphrase,
        } => commands::verify::execute(
            &cli,
            encoded,
            plain.as_deref(),
            scheme.as_deref(),
            base64,
            passphrase.as_deref(),
            prompt_passphrase,
        ),
        Commands::Detect {
            ref encoded,
            base64,
        } => commands::detect::execute(&cli, encoded, base64),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
