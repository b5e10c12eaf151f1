//! tidbit - small deterministic utilities on the command line

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tidbit::card::check_card;
use tidbit::color::parse_color;
use tidbit::dice::DiceSpec;
use tidbit::horoscope::{ZodiacSign, reading};
use tidbit::otp::{OtpConfig, decode_base32, hotp, seconds_remaining, totp};
use tidbit::seed::{Generator, Seed};
use tidbit::shape::{BlobParams, generate_blob};
use tidbit::util::{decode_text, time_now_secs, time_seed};
use tidbit::{Result, render_markdown};

#[derive(Parser)]
#[command(name = "tidbit")]
#[command(version, about = "Small deterministic utilities", long_about = None)]
#[command(after_help = "EXAMPLES:
    tidbit md notes.md -o notes.html      Render markdown to HTML
    tidbit blob --seed avatar > blob.svg  Seeded SVG blob
    tidbit roll 3d6+2 --seed 42           Reproducible dice roll
    tidbit card '4111 1111 1111 1111'     Luhn check")]
struct Cli {
    /// Print structured results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render markdown to HTML
    Md {
        /// Input file, or `-` for stdin
        #[arg(value_name = "INPUT", default_value = "-")]
        input: String,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },
    /// Generate a seeded blob outline
    Blob {
        /// Integer or text seed (defaults to the clock)
        #[arg(long)]
        seed: Option<String>,

        #[arg(long, default_value_t = 6)]
        vertices: usize,

        #[arg(long, default_value_t = 0.4)]
        irregularity: f64,

        #[arg(long, default_value_t = 0.8)]
        smoothness: f64,

        #[arg(long, default_value_t = 200.0)]
        size: f64,

        /// Fill color for SVG output
        #[arg(long, default_value = "#7c3aed")]
        fill: String,

        #[arg(long, value_enum, default_value_t = BlobFormat::Svg)]
        format: BlobFormat,
    },
    /// Daily reading for a zodiac sign
    Horoscope {
        sign: String,

        /// Date label, e.g. 2024-05-01
        date: String,
    },
    /// Roll dice notation like 2d6+3
    Roll {
        notation: String,

        /// Integer or text seed (defaults to the clock)
        #[arg(long)]
        seed: Option<String>,
    },
    /// Check a card number with the Luhn algorithm
    Card { number: String },
    /// Convert a color between hex, rgb() and hsl()
    Color { value: String },
    /// Print a TOTP (or HOTP with --counter) code for a base32 secret
    Otp {
        secret: String,

        /// Unix time (defaults to now)
        #[arg(long)]
        time: Option<u64>,

        /// HOTP counter instead of time
        #[arg(long, conflicts_with = "time")]
        counter: Option<u64>,

        #[arg(long, default_value_t = 6)]
        digits: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BlobFormat {
    Svg,
    Path,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Md { input, output } => markdown(&input, output.as_deref()),
        Command::Blob {
            seed,
            vertices,
            irregularity,
            smoothness,
            size,
            fill,
            format,
        } => {
            let params = BlobParams {
                vertices,
                irregularity,
                smoothness,
                size,
            }
            .clamped();
            let seed = resolve_seed(seed.as_deref());
            tracing::info!(%seed, ?params, "blob");
            let path = generate_blob(seed, &params);
            match (json, format) {
                (true, _) | (_, BlobFormat::Json) => print_json(&path),
                (false, BlobFormat::Path) => print_line(&path.to_svg_path()),
                (false, BlobFormat::Svg) => print_line(&path.to_svg(&fill)),
            }
        }
        Command::Horoscope { sign, date } => {
            let sign: ZodiacSign = sign.parse()?;
            let r = reading(sign, &date);
            if json {
                return print_json(&r);
            }
            print_line(&format!(
                "{} {} ({})\nMood: {}\nLucky number: {}\nLucky color: {}\n{}",
                sign.symbol(),
                sign,
                r.date,
                r.mood,
                r.lucky_number,
                r.lucky_color,
                r.message
            ))
        }
        Command::Roll { notation, seed } => {
            let spec = DiceSpec::parse(&notation)?;
            let seed = resolve_seed(seed.as_deref());
            tracing::info!(%seed, %spec, "roll");
            let roll = spec.roll(&mut Generator::new(seed));
            if json {
                return print_json(&roll);
            }
            let dice: Vec<String> = roll.rolls.iter().map(u32::to_string).collect();
            print_line(&format!("{spec}: [{}] = {}", dice.join(", "), roll.total))
        }
        Command::Card { number } => {
            let check = check_card(&number);
            if json {
                return print_json(&check);
            }
            let verdict = if check.valid { "valid" } else { "invalid" };
            print_line(&format!("{verdict} ({})", check.brand))
        }
        Command::Color { value } => {
            let info = parse_color(&value)?;
            if json {
                return print_json(&info);
            }
            print_line(&format!("{}\n{}\n{}", info.hex, info.rgb, info.hsl))
        }
        Command::Otp {
            secret,
            time,
            counter,
            digits,
        } => {
            let key = decode_base32(&secret)?;
            let output = match counter {
                Some(counter) => OtpOutput {
                    code: hotp(&key, counter, digits),
                    seconds_remaining: None,
                },
                None => {
                    let config = OtpConfig {
                        digits,
                        ..OtpConfig::default()
                    };
                    let now = time.unwrap_or_else(time_now_secs);
                    OtpOutput {
                        code: totp(&key, now, &config),
                        seconds_remaining: Some(seconds_remaining(now, &config)),
                    }
                }
            };
            if json {
                return print_json(&output);
            }
            match output.seconds_remaining {
                Some(left) => print_line(&format!("{} ({left}s left)", output.code)),
                None => print_line(&output.code),
            }
        }
    }
}

#[derive(Serialize)]
struct OtpOutput {
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seconds_remaining: Option<u64>,
}

fn resolve_seed(seed: Option<&str>) -> Seed {
    match seed {
        Some(s) => Seed::parse(s),
        None => {
            let seed = time_seed();
            eprintln!("seed: {seed}");
            seed
        }
    }
}

fn markdown(input: &str, output: Option<&str>) -> Result<()> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(input)?
    };
    let text = decode_text(&bytes);
    tracing::debug!(input, bytes = bytes.len(), "rendering markdown");
    let html = render_markdown(&text);

    match output {
        Some(path) => fs::write(path, html)?,
        None => io::stdout().lock().write_all(html.as_bytes())?,
    }
    Ok(())
}

fn print_line(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{text}")?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
