use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod round;
pub mod state;

use self::round::{Question, Scoreboard};
use self::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "palavra", about = "Quiz de vocabulário em português")]
struct Args {
    /// Only ask words from this category
    #[arg(short, long)]
    category: Option<String>,

    /// Ask a single word by name
    #[arg(short, long)]
    word: Option<String>,

    #[arg(short, long, default_value_t = 5)]
    rounds: u32,

    /// Fixed seed for word selection
    #[arg(long)]
    seed: Option<u64>,

    /// Print the categories and exit
    #[arg(long)]
    list_categories: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let state = AppState::load(palavra_config::Config::new()).await?;

    if args.list_categories {
        for category in state.quiz.corpus().categories() {
            match &category.description {
                Some(description) => println!("{}: {}", category.name, description),
                None => println!("{}", category.name),
            }
        }
        return Ok(());
    }

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl+c: {e}");
        }
    };

    run(&state, &args, shutdown).await
}

async fn run(
    state: &AppState,
    args: &Args,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let mut scoreboard = Scoreboard::default();

    tokio::select! {
        _ = shutdown => {
            tracing::info!("Shutdown requested");
        }
        result = play(state, args, &mut scoreboard) => result?,
    }

    println!(
        "\nPlacar: {}/{} corretas, {} parciais ({:.0}%)",
        scoreboard.correct,
        scoreboard.rounds,
        scoreboard.partial,
        scoreboard.accuracy() * 100.0
    );
    Ok(())
}

async fn play(state: &AppState, args: &Args, scoreboard: &mut Scoreboard) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let base_seed = args.seed.unwrap_or_else(clock_seed);
    let rounds = if args.word.is_some() { 1 } else { args.rounds };

    for round in 0..rounds {
        let question = match &args.word {
            Some(name) => round::prepare_word(state, name)
                .await
                .with_context(|| format!("palavra desconhecida: {name}"))?,
            None => round::prepare_round(
                state,
                args.category.as_deref(),
                base_seed.wrapping_add(u64::from(round)),
            )
            .await
            .context("nenhuma palavra disponível para a categoria escolhida")?,
        };

        show_question(&question);

        let Some(answer) = lines.next_line().await? else {
            break;
        };
        if answer.trim().eq_ignore_ascii_case("sair") {
            break;
        }

        let verdict = round::answer_round(state, &question, &answer)?;
        scoreboard.record(&verdict);

        println!(
            "{} (similaridade: {:.0}%)",
            verdict.feedback.as_str(),
            verdict.similarity * 100.0
        );
        if let Some(definition) = &verdict.correct_definition {
            println!("Definição oficial: {definition}");
        }
    }

    Ok(())
}

fn show_question(question: &Question) {
    println!("\nPalavra: {} ({})", question.word.word, question.word.category);
    for sentence in &question.context {
        println!("  - {sentence}");
    }
    println!("Qual é o significado? (digite 'sair' para terminar)");
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
