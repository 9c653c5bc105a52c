use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use rand::thread_rng;
use tos_chains::mentalmath::{check_answer, generate_question, update_score};

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Mental Math Practice".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    let easy_only = !read_line("Easy Only? ")?.is_empty();
    let minutes: u64 = read_line("How Many Minutes Do You Wish to Play For? ")?
        .parse()
        .context("Minutes must be a whole number")?;

    let mut rng = thread_rng();
    let mut score: i64 = 0;
    let mut rights = 0u32;
    let mut wrongs = 0u32;
    let start = Instant::now();
    let total_seconds = minutes * 60;

    loop {
        let question = generate_question(&mut rng, easy_only);
        println!("Question: {}", question.prompt.cyan());
        let input = read_line("Answer: ")?;

        // The time check runs after the read, so an answer typed past the
        // bell is not scored.
        if start.elapsed().as_secs() > total_seconds {
            println!();
            println!(
                "{} Minutes Passed, Total Score: {}",
                minutes,
                score.to_string().yellow().bold()
            );
            break;
        }

        let correct = check_answer(&question.answer, &input);
        if correct {
            rights += 1;
            println!("{}", "Correct!".green());
        } else {
            wrongs += 1;
            println!(
                "{} Correct Answer is: {}",
                "Inputted Answer was Wrong,".red(),
                question.answer.to_string().yellow()
            );
        }
        score = update_score(question.difficulty, correct, score);
    }

    println!(
        "{} right, {} wrong",
        rights.to_string().green(),
        wrongs.to_string().red()
    );
    Ok(())
}
