use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use blackjack_protocol::config::GameConfig;
use blackjack_protocol::error::{ProtocolError, Result};
use blackjack_protocol::transport::client::{
    Client, Player, TableEvent, TableView, ThresholdPlayer,
};
use blackjack_protocol::utils::logging::init_logging;
use blackjack_protocol::{Decision, RoundResult};

/// Find a blackjack host on the local network and play.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file; environment variables are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Party name sent to the host
    #[arg(short, long)]
    name: Option<String>,

    /// Rounds per session; asked interactively when absent
    #[arg(short, long)]
    rounds: Option<u8>,

    /// Play automatically, standing once the hand reaches this total
    #[arg(long, value_name = "TOTAL")]
    auto: Option<u8>,

    /// Play a single session instead of looking for a new host afterwards
    #[arg(long)]
    once: bool,
}

type StdinLines = Lines<BufReader<Stdin>>;

async fn prompt(lines: &mut StdinLines, question: &str) -> Result<String> {
    print!("{question}");
    std::io::stdout().flush()?;
    match lines.next_line().await? {
        Some(line) => Ok(line),
        None => Err(ProtocolError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "standard input closed",
        ))),
    }
}

async fn ask_rounds(lines: &mut StdinLines) -> Result<u8> {
    loop {
        let answer = prompt(lines, "How many rounds would you like to play? ").await?;
        match answer.trim().parse::<u8>() {
            Ok(n) if n > 0 => return Ok(n),
            _ => println!("Please enter a number between 1 and 255."),
        }
    }
}

fn narrate(event: &TableEvent) {
    match event {
        TableEvent::RoundStarted { round, of } => println!("\n--- Round {round} of {of} ---"),
        TableEvent::PlayerCard { card, total } => println!("You got {card} (total {total})"),
        TableEvent::DealerCard { card, total } => {
            println!("Dealer shows {card} (total {total})")
        }
        TableEvent::RoundFinished {
            result,
            player_total,
            dealer_total,
        } => {
            let verdict = match result {
                RoundResult::Win => "You win!",
                RoundResult::Loss => "You lose.",
                RoundResult::Tie => "It's a tie.",
                RoundResult::Active => "Round still running.",
            };
            println!("{verdict} ({player_total} vs dealer {dealer_total})");
        }
    }
}

struct ConsolePlayer {
    lines: StdinLines,
}

impl Player for ConsolePlayer {
    async fn decide(&mut self, table: &TableView) -> Result<Decision> {
        loop {
            let question = format!("Your hand: {}. Hit or Stand? ", table.player);
            let answer = prompt(&mut self.lines, &question).await?;
            match Decision::from_input(&answer) {
                Ok(decision) => return Ok(decision),
                Err(_) => println!("Please type Hit or Stand."),
            }
        }
    }

    fn observe(&mut self, event: &TableEvent) {
        narrate(event);
    }
}

struct NarratedBot(ThresholdPlayer);

impl Player for NarratedBot {
    async fn decide(&mut self, table: &TableView) -> Result<Decision> {
        let decision = self.0.decide(table).await?;
        println!("Auto-player chooses {decision}");
        Ok(decision)
    }

    fn observe(&mut self, event: &TableEvent) {
        narrate(event);
    }
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::from_env()?,
    };
    if let Some(name) = &args.name {
        config.client.party_name = name.clone();
    }
    Ok(config)
}

async fn play_once<P: Player>(client: &Client, player: &mut P) -> Result<()> {
    let host = client.discover().await?;
    println!("Received offer from {} at {}", host.server_name, host.address);
    let session = client.play(&host, player).await?;
    println!("\n{session}");
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    init_logging(&config.logging)?;

    let mut client = Client::new(&config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let rounds = match args.rounds {
        Some(n) => n,
        None => ask_rounds(&mut lines).await?,
    };
    client.set_rounds(rounds)?;

    if let Some(threshold) = args.auto {
        let mut bot = NarratedBot(ThresholdPlayer::new(threshold));
        supervise(&client, &mut bot, args.once).await
    } else {
        let mut console = ConsolePlayer { lines };
        supervise(&client, &mut console, args.once).await
    }
}

/// Keep finding hosts and playing sessions; a failed session is reported and retried.
async fn supervise<P: Player>(client: &Client, player: &mut P, once: bool) -> Result<()> {
    loop {
        match play_once(client, player).await {
            Ok(()) if once => return Ok(()),
            Ok(()) => {}
            Err(e) if once => return Err(e),
            Err(e) if e.is_disconnect() => println!("Server disconnected, looking for another..."),
            Err(e @ ProtocolError::Io(_)) if is_stdin_eof(&e) => return Err(e),
            Err(e) => {
                warn!(error = %e, "Session failed");
                println!("Session failed: {e}. Looking for another server...");
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

fn is_stdin_eof(error: &ProtocolError) -> bool {
    matches!(error, ProtocolError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
}
