use clap::{Parser, Subcommand};
use digitrec::client::{
    api::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT},
    render::{render_outcome, render_preview},
    Canvas, ClientError, DigitImage, PredictClient,
};
use digitrec::observability;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;

/// Recognize a handwritten digit with the prediction service.
#[derive(Parser)]
#[command(name = "digitrec", version)]
struct Cli {
    /// Base URL of the prediction service.
    #[arg(long, env = "DIGITREC_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Seconds to wait for the prediction before giving up.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Also write the processed 28x28 image to this PNG file.
    #[arg(long)]
    save: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict a digit drawn as freehand strokes (JSON list of [x, y] point lists on a 280x280 canvas).
    Draw { strokes: PathBuf },
    /// Predict a digit from a PNG, JPEG or BMP image.
    Upload { image: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init_tracing("warn");

    let digit = match acquire(&cli.command) {
        Ok(digit) => digit,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    println!("28x28 preview:\n{}", render_preview(&digit.normalized()));

    if let Some(path) = &cli.save {
        match digit.save_png(path) {
            Ok(()) => println!("Saved digit image to {}", path.display()),
            Err(e) => warn!(error = %e, path = %path.display(), "could not save digit image"),
        }
    }

    let outcome = predict(&cli, digit.to_sample()).await;
    let message = render_outcome(&outcome);
    match outcome {
        Ok(_) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(_) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn acquire(command: &Command) -> Result<DigitImage, ClientError> {
    match command {
        Command::Draw { strokes } => Ok(DigitImage::from_canvas(&Canvas::open(strokes)?)),
        Command::Upload { image } => DigitImage::from_upload_path(image),
    }
}

async fn predict(cli: &Cli, sample: Vec<f32>) -> Result<u8, ClientError> {
    let client = PredictClient::new(&cli.server, Duration::from_secs(cli.timeout_secs))?;
    tokio::select! {
        outcome = client.predict(sample) => outcome,
        _ = tokio::signal::ctrl_c() => Err(ClientError::Io(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            "prediction cancelled",
        ))),
    }
}
